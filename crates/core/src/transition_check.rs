//! Transition legality for the issue board.
//!
//! The board fetches every edge of the workflows attached to an issue type
//! and decides locally whether a card may be dropped into another column.

use crate::types::DbId;
use crate::workflow_chain::Edge;

/// Whether moving an issue from `from` to `to` is permitted by `edges`.
///
/// Staying in the same status is always allowed.
pub fn is_transition_allowed(edges: &[Edge], from: DbId, to: DbId) -> bool {
    from == to || edges.iter().any(|e| e.from == from && e.to == to)
}

/// Direct targets of `from`, in edge order, without duplicates.
pub fn direct_targets(edges: &[Edge], from: DbId) -> Vec<DbId> {
    let mut targets = Vec::new();
    for edge in edges.iter().filter(|e| e.from == from) {
        if !targets.contains(&edge.to) {
            targets.push(edge.to);
        }
    }
    targets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Vec<Edge> {
        vec![
            Edge::new(1, 2),
            Edge::new(2, 3),
            Edge::new(2, 1),
            Edge::new(1, 2),
        ]
    }

    #[test]
    fn existing_edge_is_allowed() {
        assert!(is_transition_allowed(&board(), 1, 2));
        assert!(is_transition_allowed(&board(), 2, 1));
    }

    #[test]
    fn missing_edge_is_rejected() {
        assert!(!is_transition_allowed(&board(), 1, 3));
        assert!(!is_transition_allowed(&board(), 3, 1));
    }

    #[test]
    fn same_status_is_allowed() {
        assert!(is_transition_allowed(&[], 7, 7));
    }

    #[test]
    fn direct_targets_are_deduplicated() {
        assert_eq!(direct_targets(&board(), 1), vec![2]);
        assert_eq!(direct_targets(&board(), 2), vec![3, 1]);
        assert!(direct_targets(&board(), 3).is_empty());
    }
}
