//! History Models
//!
//! Snapshot and delta types for the client-side undo/redo timeline. A
//! timeline entry is either a full snapshot or a sparse delta against the
//! state reconstructed at its predecessor. The oldest retained entry is
//! always a full snapshot so reconstruction never dangles.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use social_canvas_core::EditSource;

use crate::models::canvas::{FullCanvas, SectionKey};
use crate::models::impact_chain::ImpactField;

/// A full canvas snapshot as the history sees it: plain field→content
/// maps, a timestamp, and who authored the change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSnapshot {
    /// Section key → content
    pub sections: BTreeMap<String, String>,
    /// Impact chain field → content
    pub impact_chain: BTreeMap<String, String>,
    pub timestamp: DateTime<Utc>,
    pub source: EditSource,
}

impl CanvasSnapshot {
    /// Capture a snapshot from the full canvas read model.
    pub fn capture(canvas: &FullCanvas, source: EditSource) -> Self {
        let sections = canvas
            .sections
            .iter()
            .map(|s| (s.key.as_str().to_string(), s.content.clone()))
            .collect();
        let impact_chain = ImpactField::CHAIN_ORDER
            .iter()
            .map(|f| {
                (
                    f.as_str().to_string(),
                    canvas.impact_chain.get(*f).to_string(),
                )
            })
            .collect();
        Self {
            sections,
            impact_chain,
            timestamp: Utc::now(),
            source,
        }
    }

    /// An all-empty snapshot (the state before any edits).
    pub fn empty(source: EditSource) -> Self {
        let sections = SectionKey::ALL
            .iter()
            .map(|k| (k.as_str().to_string(), String::new()))
            .collect();
        let impact_chain = ImpactField::CHAIN_ORDER
            .iter()
            .map(|f| (f.as_str().to_string(), String::new()))
            .collect();
        Self {
            sections,
            impact_chain,
            timestamp: Utc::now(),
            source,
        }
    }

    /// Structural equality over content only; timestamp and source are
    /// bookkeeping, not state.
    pub fn content_eq(&self, other: &CanvasSnapshot) -> bool {
        self.sections == other.sections && self.impact_chain == other.impact_chain
    }

    /// Apply a delta, producing the successor snapshot.
    pub fn apply(&self, delta: &SnapshotDelta) -> CanvasSnapshot {
        let mut next = self.clone();
        for (key, content) in &delta.changed_sections {
            next.sections.insert(key.clone(), content.clone());
        }
        for (field, content) in &delta.changed_impact {
            next.impact_chain.insert(field.clone(), content.clone());
        }
        next.timestamp = delta.timestamp;
        next.source = delta.source;
        next
    }
}

/// Sparse changed-fields-only record of one timeline step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDelta {
    /// Sections whose content changed in this step
    pub changed_sections: BTreeMap<String, String>,
    /// Impact fields whose content changed in this step
    pub changed_impact: BTreeMap<String, String>,
    pub timestamp: DateTime<Utc>,
    pub source: EditSource,
}

impl SnapshotDelta {
    /// Compute the delta turning `prev` into `next`.
    pub fn between(prev: &CanvasSnapshot, next: &CanvasSnapshot) -> Self {
        let changed_sections = next
            .sections
            .iter()
            .filter(|(key, content)| prev.sections.get(*key) != Some(*content))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let changed_impact = next
            .impact_chain
            .iter()
            .filter(|(field, content)| prev.impact_chain.get(*field) != Some(*content))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self {
            changed_sections,
            changed_impact,
            timestamp: next.timestamp,
            source: next.source,
        }
    }
}

/// One timeline entry. Full snapshots anchor reconstruction; deltas bound
/// memory for older entries.
#[derive(Debug, Clone)]
pub enum HistoryEntry {
    Snapshot(Arc<CanvasSnapshot>),
    Delta(SnapshotDelta),
}

impl HistoryEntry {
    /// When this entry was recorded.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            HistoryEntry::Snapshot(s) => s.timestamp,
            HistoryEntry::Delta(d) => d.timestamp,
        }
    }

    /// Who authored this entry.
    pub fn source(&self) -> EditSource {
        match self {
            HistoryEntry::Snapshot(s) => s.source,
            HistoryEntry::Delta(d) => d.source,
        }
    }

    /// Whether this entry is a full snapshot.
    pub fn is_snapshot(&self) -> bool {
        matches!(self, HistoryEntry::Snapshot(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with(section: &str, content: &str, source: EditSource) -> CanvasSnapshot {
        let mut snap = CanvasSnapshot::empty(source);
        snap.sections.insert(section.to_string(), content.to_string());
        snap
    }

    #[test]
    fn test_empty_snapshot_covers_all_fields() {
        let snap = CanvasSnapshot::empty(EditSource::User);
        assert_eq!(snap.sections.len(), 10);
        assert_eq!(snap.impact_chain.len(), 8);
        assert!(snap.sections.values().all(String::is_empty));
    }

    #[test]
    fn test_content_eq_ignores_bookkeeping() {
        let a = snapshot_with("purpose", "We exist to help artisans", EditSource::User);
        let mut b = a.clone();
        b.timestamp = Utc::now();
        b.source = EditSource::Agent;
        assert!(a.content_eq(&b));

        let c = snapshot_with("purpose", "Different purpose", EditSource::User);
        assert!(!a.content_eq(&c));
    }

    #[test]
    fn test_delta_between_is_sparse() {
        let prev = CanvasSnapshot::empty(EditSource::User);
        let mut next = prev.clone();
        next.sections
            .insert("purpose".to_string(), "A new purpose statement".to_string());
        next.impact_chain
            .insert("issue".to_string(), "A named issue".to_string());
        next.source = EditSource::Agent;

        let delta = SnapshotDelta::between(&prev, &next);
        assert_eq!(delta.changed_sections.len(), 1);
        assert_eq!(delta.changed_impact.len(), 1);
        assert_eq!(delta.source, EditSource::Agent);
    }

    #[test]
    fn test_apply_delta_roundtrip() {
        let prev = CanvasSnapshot::empty(EditSource::User);
        let mut next = prev.clone();
        next.sections
            .insert("customers".to_string(), "Rural artisan cooperatives".to_string());
        next.impact_chain
            .insert("issue".to_string(), "Market access".to_string());

        let delta = SnapshotDelta::between(&prev, &next);
        let rebuilt = prev.apply(&delta);
        assert!(rebuilt.content_eq(&next));
    }

    #[test]
    fn test_no_change_produces_empty_delta() {
        let snap = snapshot_with("purpose", "Stable content here", EditSource::User);
        let delta = SnapshotDelta::between(&snap, &snap.clone());
        assert!(delta.changed_sections.is_empty());
        assert!(delta.changed_impact.is_empty());
    }

    #[test]
    fn test_entry_accessors() {
        let snap = CanvasSnapshot::empty(EditSource::Agent);
        let entry = HistoryEntry::Snapshot(Arc::new(snap.clone()));
        assert!(entry.is_snapshot());
        assert_eq!(entry.source(), EditSource::Agent);

        let delta = SnapshotDelta::between(&snap, &snap);
        let entry = HistoryEntry::Delta(delta);
        assert!(!entry.is_snapshot());
    }
}
