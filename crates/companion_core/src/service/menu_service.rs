//! Main menu ordering service.
//!
//! # Responsibility
//! - Load the user's feature order, falling back to the default order.
//! - Move menu entries and persist the new order immediately.
//!
//! # Invariants
//! - The in-memory order always contains every `FeatureId` exactly once.
//! - Unknown persisted labels are dropped; missing features are appended in
//!   default order.

use crate::model::feature::FeatureId;
use crate::repo::{KeyValueStore, ListRepository, RepoError, RepoResult, StorageKey};
use log::{info, warn};
use std::collections::BTreeSet;

/// Menu screen state over the `ItemOrder` list.
pub struct MenuService<S: KeyValueStore> {
    repo: ListRepository<S>,
    order: Vec<FeatureId>,
    load_issue: Option<RepoError>,
}

impl<S: KeyValueStore> MenuService<S> {
    pub fn open(store: S) -> Self {
        let repo = ListRepository::new(store);
        let (order, load_issue) = match repo.load::<String>(StorageKey::ItemOrder) {
            Ok(labels) if labels.is_empty() => (FeatureId::ALL.to_vec(), None),
            Ok(labels) => (normalize_order(&labels), None),
            Err(err) => {
                warn!(
                    "event=menu_open module=service status=degraded error={}",
                    err
                );
                (FeatureId::ALL.to_vec(), Some(err))
            }
        };

        Self {
            repo,
            order,
            load_issue,
        }
    }

    pub fn order(&self) -> &[FeatureId] {
        &self.order
    }

    /// Persisted labels in menu order.
    pub fn labels(&self) -> Vec<&'static str> {
        self.order.iter().map(|feature| feature.label()).collect()
    }

    pub fn load_issue(&self) -> Option<&RepoError> {
        self.load_issue.as_ref()
    }

    /// Moves the entries at `sources` so they land before the entry that was
    /// at `destination` (`destination == len` appends), then persists.
    ///
    /// Returns `false` without writing when the move is invalid.
    pub fn reorder(&mut self, sources: &[usize], destination: usize) -> RepoResult<bool> {
        let mut candidate = self.order.clone();
        if !move_items(&mut candidate, sources, destination) {
            return Ok(false);
        }

        let labels = candidate
            .iter()
            .map(|feature| feature.label().to_string())
            .collect::<Vec<_>>();
        self.repo.save(StorageKey::ItemOrder, &labels)?;
        info!(
            "event=menu_reorder module=service status=ok moved={} destination={}",
            sources.len(),
            destination
        );
        self.order = candidate;
        self.load_issue = None;
        Ok(true)
    }
}

/// Moves the elements at `sources` as one block to `destination`.
///
/// `destination` indexes the list before removal, so moving index 0 to
/// `len` places it last. Returns `false` and leaves `items` untouched when
/// `sources` is empty, repeats an index or is out of range, or when
/// `destination > len`.
pub fn move_items<T>(items: &mut Vec<T>, sources: &[usize], destination: usize) -> bool {
    let len = items.len();
    let unique = sources.iter().copied().collect::<BTreeSet<_>>();
    if unique.is_empty()
        || unique.len() != sources.len()
        || unique.iter().any(|&index| index >= len)
        || destination > len
    {
        return false;
    }

    let insert_at = destination - unique.iter().filter(|&&index| index < destination).count();

    let mut moved = Vec::with_capacity(unique.len());
    for &index in unique.iter().rev() {
        moved.push(items.remove(index));
    }
    moved.reverse();

    let tail = items.split_off(insert_at);
    items.extend(moved);
    items.extend(tail);
    true
}

fn normalize_order(labels: &[String]) -> Vec<FeatureId> {
    let mut order = Vec::with_capacity(FeatureId::ALL.len());
    for label in labels {
        match FeatureId::from_label(label) {
            Some(feature) if !order.contains(&feature) => order.push(feature),
            Some(_) => {}
            None => warn!("event=menu_open module=service status=unknown_label"),
        }
    }
    for feature in FeatureId::ALL {
        if !order.contains(&feature) {
            order.push(feature);
        }
    }
    order
}
