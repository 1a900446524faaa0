use std::path::Path;

/// Case-insensitive substring match against the final path component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNameMatcher {
    needle: String,
}

impl FileNameMatcher {
    /// Creates a matcher for `pattern`. An empty pattern matches every name.
    pub fn new(pattern: &str) -> Self {
        Self {
            needle: pattern.to_lowercase(),
        }
    }

    pub fn matches_everything(&self) -> bool {
        self.needle.is_empty()
    }

    /// Checks a bare file name
    pub fn is_match_name(&self, name: &str) -> bool {
        self.matches_everything() || name.to_lowercase().contains(&self.needle)
    }

    /// Checks the file name of `path`; paths without one (`/`, `..`) never match
    pub fn is_match(&self, path: &Path) -> bool {
        match path.file_name() {
            Some(name) => self.is_match_name(&name.to_string_lossy()),
            None => false,
        }
    }
}
