use std::num::NonZeroUsize;
use std::ops::Range;

/// Splits `len` entries into contiguous ranges, one per worker.
///
/// Produces `min(workers, len)` ranges of `len / count` entries each, with the
/// remainder added to the last range so nothing past the final full chunk is
/// lost. An empty input yields no ranges, and therefore no workers.
pub fn partition(len: usize, workers: NonZeroUsize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }

    let count = workers.get().min(len);
    let chunk = len / count;

    (0..count)
        .map(|i| {
            let start = i * chunk;
            let end = if i + 1 == count { len } else { start + chunk };
            start..end
        })
        .collect()
}
