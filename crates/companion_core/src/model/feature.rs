//! Feature identifiers shown in the main menu.
//!
//! # Invariants
//! - Every feature has exactly one stable label; the label is the value
//!   persisted in the menu order, so labels must never be renamed.
//! - `FeatureId::ALL` is the default menu order.

use serde::{Deserialize, Serialize};

/// Stable identifier of one feature screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureId {
    Todo,
    Notes,
    Calendar,
    Quiz,
    Weather,
}

impl FeatureId {
    /// Default menu order.
    pub const ALL: [FeatureId; 5] = [
        FeatureId::Todo,
        FeatureId::Notes,
        FeatureId::Calendar,
        FeatureId::Quiz,
        FeatureId::Weather,
    ];

    /// Persisted menu label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Todo => "To-Do-Liste",
            Self::Notes => "Notizbuch",
            Self::Calendar => "Kalender",
            Self::Quiz => "Quiz",
            Self::Weather => "Wetter",
        }
    }

    /// Resolves a persisted label. Surrounding whitespace is ignored.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|feature| feature.label() == label)
    }
}

#[cfg(test)]
mod tests {
    use super::FeatureId;

    #[test]
    fn labels_resolve_back_to_their_feature() {
        for feature in FeatureId::ALL {
            assert_eq!(FeatureId::from_label(feature.label()), Some(feature));
        }
        assert_eq!(FeatureId::from_label("Timer"), None);
    }
}
