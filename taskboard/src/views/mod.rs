//! Task view engine.
//!
//! A pure derivation layer: given the task store's raw list, the user
//! store's raw list, and a query (search term plus optional assignee
//! filter), it produces the two ordered board partitions with assignee ids
//! resolved to display names. Nothing here holds state or talks to the
//! network; the presentation layer recomputes the board whenever any input
//! changes.

use crate::tasks::Task;
use crate::users::User;
use std::collections::HashMap;

/// Label rendered for tasks whose assignee cannot be resolved, whether
/// genuinely unassigned or referencing a user that has since been deleted.
pub const UNASSIGNED_LABEL: &str = "Unassigned";

/// User-entered predicates over the task list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskQuery {
    /// Free-text search, matched case-insensitively against title and
    /// description. Empty matches everything.
    pub search: String,
    /// When set, only tasks assigned to exactly this user match.
    pub assignee: Option<u64>,
}

impl TaskQuery {
    fn matches(&self, task: &Task) -> bool {
        self.matches_search(task) && self.matches_assignee(task)
    }

    fn matches_search(&self, task: &Task) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let term = self.search.to_lowercase();
        task.title.to_lowercase().contains(&term)
            || task.description.to_lowercase().contains(&term)
    }

    fn matches_assignee(&self, task: &Task) -> bool {
        match self.assignee {
            None => true,
            Some(user_id) => task.assignee_id == Some(user_id),
        }
    }
}

/// A task paired with its resolved assignee display name.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskView {
    pub task: Task,
    pub assignee_name: String,
}

/// The two ordered partitions of the filtered task list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    pub pending: Vec<TaskView>,
    pub completed: Vec<TaskView>,
}

/// Derives the board from raw state and the query.
///
/// Both partitions preserve the relative order of `tasks`; the store's fetch
/// order (typically server id order) is authoritative and no independent
/// sort is applied.
pub fn build_board(tasks: &[Task], users: &[User], query: &TaskQuery) -> Board {
    let names: HashMap<u64, &str> = users
        .iter()
        .map(|user| (user.id, user.username.as_str()))
        .collect();
    let mut board = Board::default();
    for task in tasks.iter().filter(|task| query.matches(task)) {
        let view = TaskView {
            assignee_name: resolve_name(task.assignee_id, &names),
            task: task.clone(),
        };
        if task.is_complete {
            board.completed.push(view);
        } else {
            board.pending.push(view);
        }
    }
    board
}

fn resolve_name(assignee_id: Option<u64>, names: &HashMap<u64, &str>) -> String {
    assignee_id
        .and_then(|id| names.get(&id))
        .map_or_else(|| UNASSIGNED_LABEL.to_string(), |name| name.to_string())
}
