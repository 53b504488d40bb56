use std::fmt;

/// Crawl status of a frontier entry
///
/// Derived from the stores rather than persisted: an entry is `Visited` once it
/// is in the visited list, `Exhausted` once its failed attempts reach the
/// configured limit, and `Pending` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlStatus {
    /// Discovered, not yet downloaded
    Pending,

    /// Downloaded and its links committed
    Visited,

    /// Failed too many times; never dispatched again
    Exhausted,
}

impl UrlStatus {
    /// Returns true if the entry no longer keeps the crawl running
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Visited | Self::Exhausted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Visited => "visited",
            Self::Exhausted => "exhausted",
        }
    }
}

impl fmt::Display for UrlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
