//! Cache Entry Module
//!
//! Defines the structure for individual TTL cache entries.

use std::time::{Duration, Instant};

// == TTL Entry ==
/// A stored value together with its absolute expiration instant.
///
/// Entries are immutable once stored: a repeated `put` installs a new entry
/// with a new generation instead of editing this one, so a reader never sees
/// a value paired with another write's expiry.
#[derive(Debug, Clone)]
pub(crate) struct TtlEntry<V> {
    /// The stored value
    pub value: V,
    /// Instant at which the entry stops being visible
    pub expires_at: Instant,
    /// Identity of this write; distinct for every `put`
    pub(crate) generation: u64,
}

impl<V> TtlEntry<V> {
    // == Constructor ==
    pub(crate) fn new(value: V, expires_at: Instant, generation: u64) -> Self {
        Self {
            value,
            expires_at,
            generation,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// Boundary condition: an entry is expired when `now` is greater than or
    /// equal to its expiration instant, so a zero-length TTL expires at once.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    // == Time To Live ==
    /// Returns the time left before expiry, or `Duration::ZERO` once expired.
    pub fn remaining_at(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_not_expired_before_deadline() {
        let now = Instant::now();
        let entry = TtlEntry::new("value", now + Duration::from_secs(60), 1);

        assert!(!entry.is_expired_at(now));
        assert!(!entry.is_expired_at(now + Duration::from_secs(59)));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = TtlEntry::new("value", now, 1);

        // Expires exactly at the deadline
        assert!(entry.is_expired_at(now), "Entry should be expired at boundary");
        assert!(entry.is_expired_at(now + Duration::from_nanos(1)));
    }

    #[test]
    fn test_remaining() {
        let now = Instant::now();
        let entry = TtlEntry::new("value", now + Duration::from_secs(10), 1);

        assert_eq!(entry.remaining_at(now), Duration::from_secs(10));
        assert_eq!(
            entry.remaining_at(now + Duration::from_secs(4)),
            Duration::from_secs(6)
        );
    }

    #[test]
    fn test_remaining_expired_is_zero() {
        let now = Instant::now();
        let entry = TtlEntry::new("value", now, 1);

        assert_eq!(entry.remaining_at(now + Duration::from_secs(1)), Duration::ZERO);
    }
}
