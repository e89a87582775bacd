//! # Priority tiers.
//!
//! [`Priority`] decides the relative order of listeners registered on the same event.
//! One dispatch walks the tiers in [`Priority::ORDER`]:
//!
//! ```text
//! emit(event) ──► Before[0..n] ──► Normal[0..n] ──► After[0..n]
//!                 (insertion order inside each tier)
//! ```
//!
//! The simpler three-level naming is available as [`Priority::HIGH`] and [`Priority::LOW`].

use std::fmt;

/// Dispatch phase of a listener.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    /// Runs before every `Normal` listener (validation, early observation).
    Before,
    /// Default tier.
    #[default]
    Normal,
    /// Runs after every `Normal` listener (final observation).
    After,
}

impl Priority {
    /// Tiers in dispatch order.
    pub const ORDER: [Priority; 3] = [Priority::Before, Priority::Normal, Priority::After];

    /// Alias of [`Priority::Before`].
    pub const HIGH: Priority = Priority::Before;

    /// Alias of [`Priority::After`].
    pub const LOW: Priority = Priority::After;

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Priority::Before => "before",
            Priority::Normal => "normal",
            Priority::After => "after",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_before_normal_after() {
        let mut sorted = Priority::ORDER;
        sorted.sort();
        assert_eq!(sorted, Priority::ORDER);
        assert_eq!(Priority::default(), Priority::Normal);
    }

    #[test]
    fn test_aliases() {
        assert_eq!(Priority::HIGH, Priority::Before);
        assert_eq!(Priority::LOW, Priority::After);
        assert_eq!(Priority::After.to_string(), "after");
    }
}
