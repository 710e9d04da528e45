//! Feature screen registry.
//!
//! # Responsibility
//! - Map each `FeatureId` to the factory that describes its screen.
//! - Resolve persisted menu labels back to feature ids.
//!
//! # Invariants
//! - At most one factory per feature id.
//! - Unknown labels and unregistered features are errors, never a fallback
//!   screen.

use crate::model::feature::FeatureId;
use crate::repo::StorageKey;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// How a feature screen gets its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenSource {
    /// Backed by one or more persisted keys.
    Stored,
    /// One-shot network fetch, nothing persisted.
    Fetched,
}

/// What the host needs to build one feature screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenDescriptor {
    pub feature: FeatureId,
    pub title: &'static str,
    pub source: ScreenSource,
    pub storage_keys: Vec<StorageKey>,
}

/// Builds the descriptor for one feature.
pub type ScreenFactory = Box<dyn Fn() -> ScreenDescriptor + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    DuplicateFeature(FeatureId),
    UnknownLabel(String),
    NotRegistered(FeatureId),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateFeature(feature) => {
                write!(f, "feature already registered: {}", feature.label())
            }
            Self::UnknownLabel(label) => write!(f, "unknown feature label: {label}"),
            Self::NotRegistered(feature) => {
                write!(f, "feature not registered: {}", feature.label())
            }
        }
    }
}

impl Error for RegistryError {}

#[derive(Default)]
pub struct FeatureRegistry {
    factories: BTreeMap<FeatureId, ScreenFactory>,
}

impl FeatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with a factory for every built-in feature.
    pub fn with_builtin() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for feature in FeatureId::ALL {
            registry.register(feature, Box::new(move || builtin_descriptor(feature)))?;
        }
        Ok(registry)
    }

    pub fn register(
        &mut self,
        feature: FeatureId,
        factory: ScreenFactory,
    ) -> Result<(), RegistryError> {
        if self.factories.contains_key(&feature) {
            return Err(RegistryError::DuplicateFeature(feature));
        }
        self.factories.insert(feature, factory);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub fn contains(&self, feature: FeatureId) -> bool {
        self.factories.contains_key(&feature)
    }

    pub fn resolve(&self, label: &str) -> Result<FeatureId, RegistryError> {
        FeatureId::from_label(label).ok_or_else(|| RegistryError::UnknownLabel(label.to_string()))
    }

    pub fn build(&self, feature: FeatureId) -> Result<ScreenDescriptor, RegistryError> {
        self.factories
            .get(&feature)
            .map(|factory| factory())
            .ok_or(RegistryError::NotRegistered(feature))
    }

    /// `resolve` then `build`.
    pub fn build_for_label(&self, label: &str) -> Result<ScreenDescriptor, RegistryError> {
        self.build(self.resolve(label)?)
    }
}

fn builtin_descriptor(feature: FeatureId) -> ScreenDescriptor {
    let (source, storage_keys) = match feature {
        FeatureId::Todo => (ScreenSource::Stored, vec![StorageKey::ToDoItems]),
        FeatureId::Notes => (ScreenSource::Stored, vec![StorageKey::Notes]),
        FeatureId::Calendar => (ScreenSource::Stored, vec![StorageKey::Appointments]),
        FeatureId::Quiz | FeatureId::Weather => (ScreenSource::Fetched, Vec::new()),
    };
    ScreenDescriptor {
        feature,
        title: feature.label(),
        source,
        storage_keys,
    }
}
