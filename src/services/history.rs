//! Canvas History
//!
//! Client-side undo/redo timeline over canvas snapshots, unifying human
//! and AI edits into one ordered stack. Rapid consecutive AI edits
//! collapse into a single undo step; older entries are converted to
//! sparse deltas to bound memory, with the oldest retained entry always a
//! full snapshot so reconstruction never dangles.
//!
//! The backing sequence is a persistent (structurally shared) vector.
//! Every mutation builds the next version and swaps it in under the lock
//! as one atomic replacement, so a concurrent reader holding a clone is
//! never exposed to a half-updated stack.

use std::sync::{Arc, RwLock};

use im::Vector;

use social_canvas_core::EditSource;

use crate::models::history::{CanvasSnapshot, HistoryEntry, SnapshotDelta};
use crate::models::settings::HistoryConfig;

struct HistoryState {
    entries: Vector<HistoryEntry>,
    /// Index of the entry the canvas currently shows
    pointer: usize,
}

/// Undo/redo timeline for one canvas.
pub struct CanvasHistory {
    config: HistoryConfig,
    state: RwLock<HistoryState>,
}

impl CanvasHistory {
    /// Create an empty history.
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            config,
            state: RwLock::new(HistoryState {
                entries: Vector::new(),
                pointer: 0,
            }),
        }
    }

    /// Number of entries in the timeline.
    pub fn len(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .len()
    }

    /// Whether the timeline is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current pointer position (meaningful only when non-empty).
    pub fn pointer(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .pointer
    }

    /// The snapshot the canvas currently shows.
    pub fn current(&self) -> Option<CanvasSnapshot> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        if state.entries.is_empty() {
            return None;
        }
        Some(Self::reconstruct(&state.entries, state.pointer))
    }

    // ── Push ─────────────────────────────────────────────────────────

    /// Record a new snapshot. Returns false when the push was a
    /// structural no-op (identical content).
    ///
    /// An AI-sourced snapshot arriving within the batching window of an
    /// AI-sourced entry at the tip replaces that entry in place instead of
    /// appending, collapsing rapid successive AI edits into one undo
    /// step. Any other push discards entries after the pointer (redo is
    /// lost on new edits), appends a full snapshot, and compacts.
    pub fn push(&self, snapshot: CanvasSnapshot) -> bool {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());

        if !state.entries.is_empty() {
            let current = Self::reconstruct(&state.entries, state.pointer);
            if current.content_eq(&snapshot) {
                return false;
            }

            // Collapse consecutive AI edits at the tip only; replacing an
            // interior entry would silently corrupt the redo tail.
            if snapshot.source == EditSource::Agent
                && state.pointer == state.entries.len() - 1
            {
                let tip = &state.entries[state.pointer];
                if tip.source() == EditSource::Agent {
                    let age = snapshot.timestamp.signed_duration_since(tip.timestamp());
                    let window = self.config.ai_batch_window_secs as i64;
                    if age.num_seconds() >= 0 && age.num_seconds() < window {
                        let mut entries = state.entries.clone();
                        entries.set(
                            state.pointer,
                            HistoryEntry::Snapshot(Arc::new(snapshot)),
                        );
                        state.entries = entries;
                        return true;
                    }
                }
            }
        }

        let mut entries: Vector<HistoryEntry> = if state.entries.is_empty() {
            Vector::new()
        } else {
            state.entries.clone().take(state.pointer + 1)
        };
        entries.push_back(HistoryEntry::Snapshot(Arc::new(snapshot)));

        let entries = self.compact(entries);
        state.pointer = entries.len() - 1;
        state.entries = entries;
        true
    }

    /// Convert entries older than the full-snapshot window into deltas
    /// and enforce the hard entry cap.
    fn compact(&self, mut entries: Vector<HistoryEntry>) -> Vector<HistoryEntry> {
        let window = self.config.full_snapshot_window;
        if entries.len() > window {
            let boundary = entries.len() - window;
            let mut prev = Self::reconstruct(&entries, 0);
            for i in 1..boundary {
                let cur = match &entries[i] {
                    HistoryEntry::Snapshot(s) => (**s).clone(),
                    HistoryEntry::Delta(d) => prev.apply(d),
                };
                if entries[i].is_snapshot() {
                    entries.set(i, HistoryEntry::Delta(SnapshotDelta::between(&prev, &cur)));
                }
                prev = cur;
            }
        }

        while entries.len() > self.config.max_entries {
            // Re-materialize the next entry as a full snapshot before the
            // current oldest is dropped, so nothing dangles.
            let next_full = Self::reconstruct(&entries, 1);
            entries.pop_front();
            entries.set(0, HistoryEntry::Snapshot(Arc::new(next_full)));
        }

        entries
    }

    // ── Undo / redo ──────────────────────────────────────────────────

    /// Step back one entry. None at the earliest entry.
    pub fn undo(&self) -> Option<CanvasSnapshot> {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if state.entries.is_empty() || state.pointer == 0 {
            return None;
        }
        state.pointer -= 1;
        Some(Self::reconstruct(&state.entries, state.pointer))
    }

    /// Step forward one entry. None at the latest entry.
    pub fn redo(&self) -> Option<CanvasSnapshot> {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if state.entries.is_empty() || state.pointer + 1 >= state.entries.len() {
            return None;
        }
        state.pointer += 1;
        Some(Self::reconstruct(&state.entries, state.pointer))
    }

    /// Rebuild the snapshot at `index`: walk backward to the nearest full
    /// snapshot at or before it, then re-apply deltas forward.
    fn reconstruct(entries: &Vector<HistoryEntry>, index: usize) -> CanvasSnapshot {
        let mut base_idx = index;
        loop {
            match &entries[base_idx] {
                HistoryEntry::Snapshot(_) => break,
                HistoryEntry::Delta(_) => {
                    debug_assert!(base_idx > 0, "oldest entry must be a full snapshot");
                    base_idx -= 1;
                }
            }
        }

        let mut snapshot = match &entries[base_idx] {
            HistoryEntry::Snapshot(s) => (**s).clone(),
            HistoryEntry::Delta(_) => unreachable!(),
        };
        for i in (base_idx + 1)..=index {
            match &entries[i] {
                HistoryEntry::Delta(d) => snapshot = snapshot.apply(d),
                HistoryEntry::Snapshot(s) => snapshot = (**s).clone(),
            }
        }
        snapshot
    }
}
