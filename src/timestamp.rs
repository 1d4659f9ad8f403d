//! Cell timestamps.

use std::fmt;

/// Version timestamp carried by every cell key.
///
/// Keys sharing row/family/qualifier/visibility order newest first, so the
/// greatest timestamp sorts before every other version of the same column.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Least possible timestamp.
    pub const MIN: Self = Self(i64::MIN);
    /// Greatest possible timestamp, used by boundary and synthetic keys.
    pub const MAX: Self = Self(i64::MAX);

    /// Construct a timestamp from a raw `i64`.
    #[inline]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw `i64` value backing this timestamp.
    #[inline]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Timestamp").field(&self.0).finish()
    }
}
