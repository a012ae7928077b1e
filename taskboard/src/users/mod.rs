//! User domain: the user model, its wire shapes, and the store that keeps
//! the local user list synchronized with the remote API.

use crate::connectors::api::{self, ApiConnector};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub(crate) const USERS_PATH: &str = "/users";
pub(crate) const REGISTER_PATH: &str = "/register";

/// Errors that can occur during user store operations.
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
    /// A fetch by id found no matching user
    #[error("No user with id {0}")]
    NotFound(u64),
}

/// A known user of the task service. Ids are server-assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    /// Free-form role tag; the server enforces no enum.
    pub role: String,
}

/// Body of a registration request. The server assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Partial update of a user. Absent fields are omitted from the request
/// body and left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Authoritative in-memory list of known users.
///
/// Mutations re-fetch the full list so that server-assigned ids and defaults
/// are reflected locally; only deletion splices the local list directly. A
/// failed refresh leaves the previous list in place, stale but present.
pub struct UserStore<'a, API: ApiConnector> {
    api: &'a API,
    users: Vec<User>,
}

impl<'a, API: ApiConnector> UserStore<'a, API> {
    /// Creates an empty store. The consumer issues the first [`refresh`].
    ///
    /// [`refresh`]: UserStore::refresh
    pub fn new(api: &'a API) -> Self {
        Self {
            api,
            users: Vec::new(),
        }
    }

    /// The current local user list, in server order.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Fetches the full user list and replaces local state wholesale.
    pub async fn refresh(&mut self) -> Result<(), Error> {
        let body = self
            .api
            .get(USERS_PATH)
            .await
            .inspect_err(|err| warn!("Failed to fetch users: {err}"))?;
        let users: Vec<User> = decode(body)?;
        info!("Loaded {} users", users.len());
        self.users = users;
        Ok(())
    }

    /// Registers a new user, then re-fetches the full list.
    ///
    /// There is no optimistic insert: the server is the source of truth for
    /// the assigned id and any defaulted fields.
    pub async fn register(&mut self, registration: &Registration) -> Result<(), Error> {
        let body = encode(registration)?;
        self.api
            .post(REGISTER_PATH, body)
            .await
            .inspect_err(|err| warn!("Failed to register user: {err}"))?;
        self.refresh().await
    }

    /// Fetches a single user by id. Does not touch the bulk list.
    pub async fn user_by_id(&self, id: u64) -> Result<User, Error> {
        match self.api.get(&format!("{USERS_PATH}/{id}")).await {
            Ok(body) => decode(body),
            Err(api::Error::Api { status: 404, .. }) => Err(Error::NotFound(id)),
            Err(err) => {
                warn!("Failed to fetch user {id}: {err}");
                Err(err.into())
            }
        }
    }

    /// Applies a partial update, then re-fetches the full list.
    pub async fn update(&mut self, id: u64, patch: &UserPatch) -> Result<(), Error> {
        let body = encode(patch)?;
        self.api
            .put(&format!("{USERS_PATH}/{id}"), body)
            .await
            .inspect_err(|err| warn!("Failed to update user {id}: {err}"))?;
        self.refresh().await
    }

    /// Deletes a user and splices it out of the local list by id.
    ///
    /// Optimistic: once the server confirms the deletion, mirroring it
    /// locally is assumed safe and no re-fetch is issued.
    pub async fn delete(&mut self, id: u64) -> Result<(), Error> {
        self.api
            .delete(&format!("{USERS_PATH}/{id}"))
            .await
            .inspect_err(|err| warn!("Failed to delete user {id}: {err}"))?;
        self.users.retain(|user| user.id != id);
        Ok(())
    }
}

fn encode<T: Serialize>(body: &T) -> Result<Value, Error> {
    serde_json::to_value(body).map_err(Error::Encode)
}

fn decode<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, Error> {
    serde_json::from_value(body).map_err(Error::Decode)
}
