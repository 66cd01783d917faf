//! Workflow chain reconstruction.
//!
//! A workflow is stored as a flat set of directed `from -> to` edges that
//! share a name. For display the board needs a single left-to-right
//! pipeline, so this module linearizes the edge set into an ordered list of
//! status ids.
//!
//! The algorithm never fails. Branching, cyclic or disconnected edge sets
//! all produce a list containing every status exactly once:
//!
//! 1. Build `chain: from -> to`. When a status has more than one outgoing
//!    edge the last one processed wins; such statuses are reported in
//!    [`StatusChain::ambiguous_sources`].
//! 2. The start is the first status (in first-appearance order) that is
//!    never a value of `chain`. A pure cycle has no such status, in which
//!    case the caller-supplied nominal start is used.
//! 3. Walk `chain` from the start until the next status is missing or was
//!    already visited.
//! 4. Append every status the walk did not reach, in first-appearance order.
//!
//! Edges must be passed in ascending edge-id order for the result to be
//! deterministic across calls.

use std::collections::{HashMap, HashSet};

use crate::types::DbId;

/// One directed transition between two statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: DbId,
    pub to: DbId,
}

impl Edge {
    pub fn new(from: DbId, to: DbId) -> Self {
        Self { from, to }
    }
}

/// A status placed in the reconstructed pipeline. `order` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainEntry {
    pub status_id: DbId,
    pub order: i32,
}

/// Result of [`reconstruct_chain`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusChain {
    /// Every status of the workflow, walked prefix first.
    pub entries: Vec<ChainEntry>,
    /// The status the walk started from, `None` for an empty edge set.
    pub start: Option<DbId>,
    /// `true` when the walk stopped because it returned to a visited status.
    pub cycle_detected: bool,
    /// Statuses with more than one outgoing edge. Only the last edge of each
    /// was followed.
    pub ambiguous_sources: Vec<DbId>,
    walked: usize,
}

impl StatusChain {
    /// Status ids in pipeline order.
    pub fn status_ids(&self) -> Vec<DbId> {
        self.entries.iter().map(|e| e.status_id).collect()
    }

    /// Number of statuses reached by the walk before leftovers were appended.
    pub fn walked_len(&self) -> usize {
        self.walked
    }
}

/// Linearize a workflow's edges into an ordered status list.
///
/// `nominal_start` is only used when every status has an incoming edge.
/// Callers pass the `from` status of the edge the workflow was looked up by.
pub fn reconstruct_chain(edges: &[Edge], nominal_start: DbId) -> StatusChain {
    if edges.is_empty() {
        return StatusChain::default();
    }

    let mut chain: HashMap<DbId, DbId> = HashMap::with_capacity(edges.len());
    let mut all_statuses: Vec<DbId> = Vec::with_capacity(edges.len() + 1);
    let mut seen: HashSet<DbId> = HashSet::with_capacity(edges.len() + 1);
    let mut ambiguous_sources = Vec::new();

    for edge in edges {
        if chain.insert(edge.from, edge.to).is_some() && !ambiguous_sources.contains(&edge.from) {
            ambiguous_sources.push(edge.from);
        }
        for id in [edge.from, edge.to] {
            if seen.insert(id) {
                all_statuses.push(id);
            }
        }
    }

    let targets: HashSet<DbId> = chain.values().copied().collect();
    let start = all_statuses
        .iter()
        .copied()
        .find(|id| !targets.contains(id))
        .unwrap_or(nominal_start);

    let mut entries = Vec::with_capacity(all_statuses.len());
    let mut visited: HashSet<DbId> = HashSet::with_capacity(all_statuses.len());
    let mut cycle_detected = false;
    let mut current = start;

    loop {
        visited.insert(current);
        entries.push(ChainEntry {
            status_id: current,
            order: next_order(&entries),
        });
        match chain.get(&current) {
            None => break,
            Some(next) if visited.contains(next) => {
                cycle_detected = true;
                break;
            }
            Some(&next) => current = next,
        }
    }

    let walked = entries.len();

    for id in all_statuses {
        if visited.insert(id) {
            entries.push(ChainEntry {
                status_id: id,
                order: next_order(&entries),
            });
        }
    }

    StatusChain {
        entries,
        start: Some(start),
        cycle_detected,
        ambiguous_sources,
        walked,
    }
}

fn next_order(entries: &[ChainEntry]) -> i32 {
    entries.len() as i32 + 1
}
