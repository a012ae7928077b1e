//! Reqwest-based implementation of the remote API connector.

use crate::connectors::api::{ApiConnector, Error};
use crate::connectors::storage::TokenStore;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

/// API connector backed by a single configured reqwest client.
///
/// The token store is consulted on every outgoing request; a present token is
/// attached as a bearer credential, an absent one leaves the request
/// unauthenticated. Construct it with a shared reference to the same store
/// the session manager writes to.
pub struct HttpApiConnector<STORE: TokenStore> {
    client: Client,
    base_url: String,
    tokens: STORE,
}

impl<STORE: TokenStore> HttpApiConnector<STORE> {
    /// Creates a connector for the service rooted at `base_url`.
    pub fn new(base_url: impl Into<String>, tokens: STORE) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            tokens,
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.tokens.load() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, Error> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|err| Error::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse(response: Response) -> Result<Value, Error> {
        response
            .json()
            .await
            .map_err(|err| Error::Decode(err.to_string()))
    }
}

impl<STORE: TokenStore> ApiConnector for HttpApiConnector<STORE> {
    async fn get(&self, path: &str) -> Result<Value, Error> {
        let response = self.execute(self.client.get(self.url(path))).await?;
        Self::parse(response).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, Error> {
        let request = self.client.post(self.url(path)).json(&body);
        let response = self.execute(request).await?;
        Self::parse(response).await
    }

    async fn put(&self, path: &str, body: Value) -> Result<Value, Error> {
        let request = self.client.put(self.url(path)).json(&body);
        let response = self.execute(request).await?;
        Self::parse(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), Error> {
        self.execute(self.client.delete(self.url(path))).await?;
        Ok(())
    }
}
