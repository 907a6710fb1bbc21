use crate::error::{Error, Result};

/// Recursion budget threaded through every parse, print, encode, decode and
/// compare entry point.
///
/// An interval's element type may itself be a range or multirange type, so
/// these entry points can recurse. Each one calls [`Depth::descend`] before
/// doing any work and hands the returned value to the nested interval
/// functions.
///
/// # Examples
///
/// ```rust
/// use multirange::Depth;
///
/// let depth = Depth::with_limit(1);
/// let inner = depth.descend().unwrap();
/// assert!(inner.descend().is_err());
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Depth {
    level: u32,
    limit: u32,
}

impl Depth {
    /// Default number of nested entry points allowed.
    pub const DEFAULT_LIMIT: u32 = 100;

    /// A fresh budget with [`Depth::DEFAULT_LIMIT`].
    pub const fn new() -> Depth {
        Depth::with_limit(Depth::DEFAULT_LIMIT)
    }

    /// A fresh budget that allows `limit` nested entry points.
    pub const fn with_limit(limit: u32) -> Depth {
        Depth { level: 0, limit }
    }

    /// Number of entry points already entered.
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Enters one more level, failing once the limit is exceeded.
    pub fn descend(self) -> Result<Depth> {
        if self.level >= self.limit {
            tracing::debug!(limit = self.limit, "recursion guard tripped");
            return Err(Error::StackDepthExceeded { limit: self.limit });
        }
        Ok(Depth { level: self.level + 1, limit: self.limit })
    }
}

impl Default for Depth {
    fn default() -> Depth {
        Depth::new()
    }
}
