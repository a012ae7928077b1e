//! Task domain: the task model, its wire encoding, and the store that keeps
//! the local task list synchronized with the remote API.
//!
//! Create and update both re-fetch the full list after the mutating call so
//! that server-computed fields (normalized dates in particular) are
//! reflected locally; delete splices the local list optimistically without a
//! re-fetch. Mutating calls are not sequenced against each other: a stale
//! refresh resolving after an optimistic delete can transiently resurrect
//! the deleted task until the next refresh, matching the behavior this store
//! was ported from.

use crate::connectors::api::{self, ApiConnector};
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

mod wire;

pub(crate) const TASKS_PATH: &str = "/task";

/// Errors that can occur during task store operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The underlying API call failed
    #[error("Something went wrong talking to the server")]
    Api(#[from] api::Error),
    /// The request body could not be encoded
    #[error("Could not encode the request body")]
    Encode(#[source] serde_json::Error),
    /// The server's response did not match the expected shape
    #[error("Could not decode the server's response")]
    Decode(#[source] serde_json::Error),
    /// A fetch by id found no matching task
    #[error("No task with id {0}")]
    NotFound(u64),
}

/// A task as the server knows it. Ids are server-assigned and immutable.
///
/// `assignee_id` may reference a user that has since been deleted; the store
/// does not enforce referential integrity and the view engine renders such
/// references as unassigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub description: String,
    #[serde(with = "wire::due_date")]
    pub due_date: Option<DateTime<Utc>>,
    pub is_complete: bool,
    #[serde(with = "wire::assignee_id")]
    pub assignee_id: Option<u64>,
}

/// Body of a create request: every task field minus the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    #[serde(with = "wire::due_date")]
    pub due_date: Option<DateTime<Utc>>,
    pub is_complete: bool,
    #[serde(with = "wire::assignee_id")]
    pub assignee_id: Option<u64>,
}

/// Partial update of a task. Absent fields are omitted from the request body
/// and left untouched by the server; `due_date` and `assignee_id` can also
/// be present-but-unset, which clears them via the wire sentinel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "wire::due_date::serialize_patch"
    )]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_complete: Option<bool>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "wire::assignee_id::serialize_patch"
    )]
    pub assignee_id: Option<Option<u64>>,
}

impl TaskPatch {
    /// Patch that only flips the completion flag, as the board's checkbox
    /// toggle does.
    pub fn completion(is_complete: bool) -> Self {
        Self {
            is_complete: Some(is_complete),
            ..Self::default()
        }
    }
}

/// Authoritative in-memory list of tasks.
///
/// A failed refresh leaves the previous list in place, stale but present; a
/// broken network call degrades to stale data rather than an empty board.
pub struct TaskStore<'a, API: ApiConnector> {
    api: &'a API,
    tasks: Vec<Task>,
}

impl<'a, API: ApiConnector> TaskStore<'a, API> {
    /// Creates an empty store. The consumer issues the first [`refresh`] as
    /// its initial load.
    ///
    /// [`refresh`]: TaskStore::refresh
    pub fn new(api: &'a API) -> Self {
        Self {
            api,
            tasks: Vec::new(),
        }
    }

    /// The current local task list, in server order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Fetches the full task list and replaces local state wholesale.
    pub async fn refresh(&mut self) -> Result<(), Error> {
        let body = self
            .api
            .get(TASKS_PATH)
            .await
            .inspect_err(|err| warn!("Failed to fetch tasks: {err}"))?;
        let tasks: Vec<Task> = decode(body)?;
        info!("Loaded {} tasks", tasks.len());
        self.tasks = tasks;
        Ok(())
    }

    /// Creates a task, then re-fetches the full list.
    pub async fn create(&mut self, task: &NewTask) -> Result<(), Error> {
        let body = encode(task)?;
        self.api
            .post(TASKS_PATH, body)
            .await
            .inspect_err(|err| warn!("Failed to create task: {err}"))?;
        self.refresh().await
    }

    /// Fetches a single task by id. Does not touch the bulk list.
    pub async fn task_by_id(&self, id: u64) -> Result<Task, Error> {
        match self.api.get(&format!("{TASKS_PATH}/{id}")).await {
            Ok(body) => decode(body),
            Err(api::Error::Api { status: 404, .. }) => Err(Error::NotFound(id)),
            Err(err) => {
                warn!("Failed to fetch task {id}: {err}");
                Err(err.into())
            }
        }
    }

    /// Applies a partial update, then re-fetches the full list.
    pub async fn update(&mut self, id: u64, patch: &TaskPatch) -> Result<(), Error> {
        let body = encode(patch)?;
        self.api
            .put(&format!("{TASKS_PATH}/{id}"), body)
            .await
            .inspect_err(|err| warn!("Failed to update task {id}: {err}"))?;
        self.refresh().await
    }

    /// Deletes a task and splices it out of the local list by id.
    ///
    /// Optimistic: once the server confirms the deletion, the task is gone
    /// locally before (and without) any re-fetch.
    pub async fn delete(&mut self, id: u64) -> Result<(), Error> {
        self.api
            .delete(&format!("{TASKS_PATH}/{id}"))
            .await
            .inspect_err(|err| warn!("Failed to delete task {id}: {err}"))?;
        self.tasks.retain(|task| task.id != id);
        Ok(())
    }

    /// Marks a task complete. `pending -> completed`.
    pub async fn mark_complete(&mut self, id: u64) -> Result<(), Error> {
        self.update(id, &TaskPatch::completion(true)).await
    }

    /// Marks a task pending again. `completed -> pending`.
    pub async fn mark_pending(&mut self, id: u64) -> Result<(), Error> {
        self.update(id, &TaskPatch::completion(false)).await
    }
}

fn encode<T: Serialize>(body: &T) -> Result<Value, Error> {
    serde_json::to_value(body).map_err(Error::Encode)
}

fn decode<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, Error> {
    serde_json::from_value(body).map_err(Error::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::api::MockApiConnector;
    use mockall::predicate::*;
    use serde_json::json;

    fn ship_release(is_complete: bool) -> Value {
        json!({
            "id": 1,
            "title": "Ship release",
            "description": "v1.2",
            "due_date": "2024-06-01T00:00:00.000Z",
            "is_complete": is_complete,
            "assignee_id": 3
        })
    }

    fn buy_milk() -> Value {
        json!({
            "id": 2,
            "title": "Buy milk",
            "description": "",
            "due_date": "",
            "is_complete": false,
            "assignee_id": 0
        })
    }

    #[tokio::test]
    async fn refresh_replaces_local_state_wholesale() {
        // Arrange
        let mut mock_api = MockApiConnector::new();
        mock_api
            .expect_get()
            .with(eq(TASKS_PATH))
            .times(1)
            .returning(|_| Ok(json!([ship_release(false), buy_milk()])));
        let mut store = TaskStore::new(&mock_api);

        // Act
        let result = store.refresh().await;

        // Assert: sentinels decode into explicit absence.
        assert!(result.is_ok(), "refresh should succeed");
        assert_eq!(store.tasks().len(), 2);
        assert_eq!(store.tasks()[0].assignee_id, Some(3));
        assert_eq!(store.tasks()[1].assignee_id, None);
        assert_eq!(store.tasks()[1].due_date, None);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_the_stale_list() {
        // Arrange
        let mut mock_api = MockApiConnector::new();
        mock_api
            .expect_get()
            .times(1)
            .returning(|_| Ok(json!([buy_milk()])));
        mock_api
            .expect_get()
            .times(1)
            .returning(|_| Err(api::Error::Transport("connection refused".to_string())));
        let mut store = TaskStore::new(&mock_api);
        store.refresh().await.unwrap();

        // Act
        let result = store.refresh().await;

        // Assert
        assert!(result.is_err(), "refresh should surface the failure");
        assert_eq!(store.tasks().len(), 1, "stale list must remain in place");
    }

    #[tokio::test]
    async fn create_posts_the_sentinel_encoded_body_then_refetches() {
        // Arrange
        let mut mock_api = MockApiConnector::new();
        mock_api
            .expect_post()
            .with(
                eq(TASKS_PATH),
                eq(json!({
                    "title": "Buy milk",
                    "description": "",
                    "due_date": "",
                    "is_complete": false,
                    "assignee_id": 0
                })),
            )
            .times(1)
            .returning(|_, _| Ok(json!({ "id": 2 })));
        mock_api
            .expect_get()
            .with(eq(TASKS_PATH))
            .times(1)
            .returning(|_| Ok(json!([buy_milk()])));
        let mut store = TaskStore::new(&mock_api);

        // Act
        let new_task = NewTask {
            title: "Buy milk".to_string(),
            description: String::new(),
            due_date: None,
            is_complete: false,
            assignee_id: None,
        };
        let result = store.create(&new_task).await;

        // Assert
        assert!(result.is_ok(), "create should succeed");
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].id, 2);
    }

    #[tokio::test]
    async fn update_puts_only_the_present_fields_then_refetches() {
        // Arrange
        let mut mock_api = MockApiConnector::new();
        mock_api
            .expect_put()
            .with(eq("/task/1"), eq(json!({ "title": "Ship v1.2" })))
            .times(1)
            .returning(|_, _| Ok(ship_release(false)));
        mock_api
            .expect_get()
            .times(1)
            .returning(|_| Ok(json!([ship_release(false)])));
        let mut store = TaskStore::new(&mock_api);

        // Act
        let patch = TaskPatch {
            title: Some("Ship v1.2".to_string()),
            ..TaskPatch::default()
        };
        let result = store.update(1, &patch).await;

        // Assert
        assert!(result.is_ok(), "update should succeed");
    }

    #[tokio::test]
    async fn patch_can_clear_due_date_and_assignee_via_the_sentinels() {
        // Arrange
        let mut mock_api = MockApiConnector::new();
        mock_api
            .expect_put()
            .with(eq("/task/1"), eq(json!({ "due_date": "", "assignee_id": 0 })))
            .times(1)
            .returning(|_, _| Ok(ship_release(false)));
        mock_api
            .expect_get()
            .times(1)
            .returning(|_| Ok(json!([ship_release(false)])));
        let mut store = TaskStore::new(&mock_api);

        // Act
        let patch = TaskPatch {
            due_date: Some(None),
            assignee_id: Some(None),
            ..TaskPatch::default()
        };
        let result = store.update(1, &patch).await;

        // Assert
        assert!(result.is_ok(), "clearing patch should succeed");
    }

    #[tokio::test]
    async fn delete_is_final_and_local_immediate() {
        // Arrange: no get expectation after the delete, so a re-fetch would
        // panic the mock.
        let mut mock_api = MockApiConnector::new();
        mock_api
            .expect_get()
            .times(1)
            .returning(|_| Ok(json!([ship_release(false), buy_milk()])));
        mock_api
            .expect_delete()
            .with(eq("/task/1"))
            .times(1)
            .returning(|_| Ok(()));
        let mut store = TaskStore::new(&mock_api);
        store.refresh().await.unwrap();

        // Act
        let result = store.delete(1).await;

        // Assert
        assert!(result.is_ok(), "delete should succeed");
        let ids: Vec<u64> = store.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2], "deleted task must be gone immediately");
    }

    #[tokio::test]
    async fn failed_delete_leaves_the_local_list_untouched() {
        // Arrange
        let mut mock_api = MockApiConnector::new();
        mock_api
            .expect_get()
            .times(1)
            .returning(|_| Ok(json!([buy_milk()])));
        mock_api
            .expect_delete()
            .times(1)
            .returning(|_| Err(api::Error::Transport("connection reset".to_string())));
        let mut store = TaskStore::new(&mock_api);
        store.refresh().await.unwrap();

        // Act
        let result = store.delete(2).await;

        // Assert
        assert!(result.is_err(), "delete should surface the failure");
        assert_eq!(store.tasks().len(), 1, "local list must be untouched");
    }

    #[tokio::test]
    async fn completion_toggle_round_trips() {
        // Arrange: complete then un-complete, each a put followed by a
        // re-fetch reflecting the server's new state.
        let mut mock_api = MockApiConnector::new();
        mock_api
            .expect_get()
            .times(1)
            .returning(|_| Ok(json!([ship_release(false)])));
        mock_api
            .expect_put()
            .with(eq("/task/1"), eq(json!({ "is_complete": true })))
            .times(1)
            .returning(|_, _| Ok(ship_release(true)));
        mock_api
            .expect_get()
            .times(1)
            .returning(|_| Ok(json!([ship_release(true)])));
        mock_api
            .expect_put()
            .with(eq("/task/1"), eq(json!({ "is_complete": false })))
            .times(1)
            .returning(|_, _| Ok(ship_release(false)));
        mock_api
            .expect_get()
            .times(1)
            .returning(|_| Ok(json!([ship_release(false)])));
        let mut store = TaskStore::new(&mock_api);
        store.refresh().await.unwrap();
        let before = store.tasks().to_vec();

        // Act
        store.mark_complete(1).await.unwrap();
        assert!(store.tasks()[0].is_complete, "toggle should be visible");
        store.mark_pending(1).await.unwrap();

        // Assert
        assert_eq!(
            store.tasks(),
            &before[..],
            "toggling twice must restore the starting state"
        );
    }

    #[tokio::test]
    async fn task_by_id_maps_404_to_not_found() {
        // Arrange
        let mut mock_api = MockApiConnector::new();
        mock_api.expect_get().times(1).returning(|_| {
            Err(api::Error::Api {
                status: 404,
                body: String::new(),
            })
        });
        let store = TaskStore::new(&mock_api);

        // Act
        let result = store.task_by_id(99).await;

        // Assert
        assert!(matches!(result, Err(Error::NotFound(99))));
    }

    #[tokio::test]
    async fn task_by_id_decodes_a_single_task() {
        // Arrange
        let mut mock_api = MockApiConnector::new();
        mock_api
            .expect_get()
            .with(eq("/task/1"))
            .times(1)
            .returning(|_| Ok(ship_release(false)));
        let store = TaskStore::new(&mock_api);

        // Act
        let task = store.task_by_id(1).await.unwrap();

        // Assert
        assert_eq!(task.title, "Ship release");
        assert!(store.tasks().is_empty(), "bulk list must stay untouched");
    }

    #[tokio::test]
    async fn malformed_list_body_is_a_decode_error() {
        // Arrange
        let mut mock_api = MockApiConnector::new();
        mock_api
            .expect_get()
            .times(1)
            .returning(|_| Ok(json!({ "unexpected": "shape" })));
        let mut store = TaskStore::new(&mock_api);

        // Act
        let result = store.refresh().await;

        // Assert
        assert!(matches!(result, Err(Error::Decode(_))));
        assert!(store.tasks().is_empty());
    }
}
