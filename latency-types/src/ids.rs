//! Identity of observed marker-file events.

use std::fmt;

/// Identity of one marker-file event: file name plus formatted mtime.
///
/// Two scans of an unmodified file yield equal keys. Any rewrite that moves
/// the mtime yields a new key, so the file is reported again.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SeenKey(String);

impl SeenKey {
    /// Build a key from a file name and its formatted modification time.
    pub fn new(name: &str, formatted_mtime: &str) -> Self {
        let mut key = String::with_capacity(name.len() + formatted_mtime.len());
        key.push_str(name);
        key.push_str(formatted_mtime);
        Self(key)
    }

    /// The raw key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for SeenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SeenKey({})", self.0)
    }
}
