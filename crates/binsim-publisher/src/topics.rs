//! Subject naming for the dataset's topic-scoped channels.
//!
//! One fixed base with a per-tier suffix: `{base}.driveways`, `{base}.houses`,
//! `{base}.streets`, `{base}.suburb`, `{base}.bins`. The suburb subject
//! receives exactly one message per generation run; all others receive one
//! message per record.

use binsim_types::Tier;

/// Default subject base, matching the dataset's historical topic path.
pub const DEFAULT_SUBJECT_BASE: &str = "suburb.model.igention";

/// The set of per-tier subjects under one base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSet {
    base: String,
}

impl TopicSet {
    /// Create a topic set under `base` (trailing separators are trimmed).
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('.').to_owned(),
        }
    }

    /// The subject for a tier's records.
    pub fn for_tier(&self, tier: Tier) -> String {
        format!("{}.{}", self.base, tier.name())
    }

    /// The base all subjects share.
    pub fn base(&self) -> &str {
        &self.base
    }
}

impl Default for TopicSet {
    fn default() -> Self {
        Self::new(DEFAULT_SUBJECT_BASE)
    }
}
