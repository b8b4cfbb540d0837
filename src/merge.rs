//! Task visibility merge.
//!
//! The task board is computed from two independently fetched batches: tasks
//! the viewer owns (any privacy) and non-private tasks owned by anyone else.
//! This module folds them into one deduplicated list ordered by creation
//! time, newest first. It is a pure read-time projection: nothing is cached
//! and nothing in the store is touched; every read of the board re-runs
//! fetch + merge against current store state.

use std::collections::HashSet;

use crate::task::Task;

/// Merge the owned and shared batches into the viewer's task board.
///
/// The owned batch is inserted first; a shared record with an id already
/// present is skipped, so the owned copy wins. The query predicates should
/// keep the batches disjoint, but the merge stays defensive about overlap.
///
/// Ordering is `created_at` descending and stable: records with equal
/// timestamps keep their relative batch order, so identical input always
/// produces identical output.
pub fn merge_visible(owned: Vec<Task>, shared: Vec<Task>) -> Vec<Task> {
    let mut seen: HashSet<String> = HashSet::with_capacity(owned.len() + shared.len());
    let mut board: Vec<Task> = Vec::with_capacity(owned.len() + shared.len());

    for task in owned.into_iter().chain(shared) {
        if seen.insert(task.id.clone()) {
            board.push(task);
        }
    }

    board.sort_by(|left, right| right.created_at.cmp(&left.created_at));
    board
}
