// Rust guideline compliant 2026-02-23

//! Feature engineering for the premium-prediction pipeline.
//!
//! Turns a `domain::RawInput` into a `domain::FeatureVector`:
//! [`risk`] scores the medical history, [`encoder`] handles ordinal and
//! one-hot fields, and [`assembler`] merges everything in schema order.
//!
//! Entry point: [`assemble`].

pub mod assembler;
pub mod encoder;
pub mod risk;

pub use assembler::assemble;

// ---------------------------------------------------------------------------
// LookupTable
// ---------------------------------------------------------------------------

/// A static label-to-code dictionary with an explicit fallback.
///
/// Every lookup is total: labels outside the table resolve to `fallback`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupTable {
    entries: &'static [(&'static str, u32)],
    fallback: u32,
}

impl LookupTable {
    /// Build a table from `entries`; unknown labels resolve to `fallback`.
    #[must_use]
    pub const fn new(entries: &'static [(&'static str, u32)], fallback: u32) -> Self {
        Self { entries, fallback }
    }

    /// Code for `label` (exact, case-sensitive match).
    #[must_use]
    pub fn lookup(&self, label: &str) -> u32 {
        self.get(label).unwrap_or(self.fallback)
    }

    /// Code for `label`, or `None` when the table has no such entry.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<u32> {
        self.entries.iter().find(|(k, _)| *k == label).map(|(_, v)| *v)
    }

    /// Value returned for unknown labels.
    #[must_use]
    pub const fn fallback(&self) -> u32 {
        self.fallback
    }

    /// Smallest code in the table (fallback excluded).
    #[must_use]
    pub fn min(&self) -> Option<u32> {
        self.entries.iter().map(|(_, v)| *v).min()
    }

    /// Largest code in the table (fallback excluded).
    #[must_use]
    pub fn max(&self) -> Option<u32> {
        self.entries.iter().map(|(_, v)| *v).max()
    }
}

#[cfg(test)]
mod tests {
    use super::LookupTable;

    const TABLE: LookupTable = LookupTable::new(&[("a", 3), ("b", 7)], 0);

    #[test]
    fn known_labels_resolve() {
        assert_eq!(TABLE.lookup("a"), 3);
        assert_eq!(TABLE.get("b"), Some(7));
    }

    #[test]
    fn unknown_label_takes_fallback_branch() {
        assert_eq!(TABLE.get("c"), None);
        assert_eq!(TABLE.lookup("c"), TABLE.fallback());
        assert_eq!(TABLE.lookup("A"), 0, "lookup is case-sensitive");
    }

    #[test]
    fn min_max_ignore_fallback() {
        let t = LookupTable::new(&[("x", 4), ("y", 9)], 0);
        assert_eq!(t.min(), Some(4));
        assert_eq!(t.max(), Some(9));
        let empty = LookupTable::new(&[], 0);
        assert_eq!(empty.min(), None);
    }
}
