//! # API Client
//!
//! `FinanceApi` is the seam between the data store and the network. The
//! production implementation, `ApiClient`, speaks JSON over HTTP with
//! `reqwest`; tests substitute an in-memory fake.
//!
//! Non-2xx responses are turned into `ClientError::Api` carrying the
//! server's `{ "error": ... }` message so callers can show it verbatim.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    Category, CategoryRequest, ClearAllResponse, ErrorResponse, HealthResponse, MessageResponse,
    SettingsRequest, Transaction, TransactionKind, TransactionRequest, UserSettings,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

#[async_trait]
pub trait FinanceApi: Send + Sync {
    async fn health(&self) -> ClientResult<HealthResponse>;

    async fn list_categories(&self) -> ClientResult<Vec<Category>>;
    async fn create_category(&self, request: &CategoryRequest) -> ClientResult<Category>;
    async fn update_category(&self, id: &str, request: &CategoryRequest) -> ClientResult<Category>;
    async fn delete_category(&self, id: &str) -> ClientResult<()>;
    async fn clear_categories(&self) -> ClientResult<ClearAllResponse>;

    async fn list_transactions(&self, kind: TransactionKind) -> ClientResult<Vec<Transaction>>;
    async fn create_transaction(
        &self,
        kind: TransactionKind,
        request: &TransactionRequest,
    ) -> ClientResult<Transaction>;
    async fn update_transaction(
        &self,
        kind: TransactionKind,
        id: &str,
        request: &TransactionRequest,
    ) -> ClientResult<Transaction>;
    async fn delete_transaction(&self, kind: TransactionKind, id: &str) -> ClientResult<()>;
    async fn clear_transactions(&self, kind: TransactionKind) -> ClientResult<ClearAllResponse>;

    async fn get_settings(&self) -> ClientResult<UserSettings>;
    async fn update_settings(&self, request: &SettingsRequest) -> ClientResult<UserSettings>;
}

#[async_trait]
impl<T: FinanceApi + ?Sized> FinanceApi for Arc<T> {
    async fn health(&self) -> ClientResult<HealthResponse> {
        (**self).health().await
    }

    async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        (**self).list_categories().await
    }

    async fn create_category(&self, request: &CategoryRequest) -> ClientResult<Category> {
        (**self).create_category(request).await
    }

    async fn update_category(&self, id: &str, request: &CategoryRequest) -> ClientResult<Category> {
        (**self).update_category(id, request).await
    }

    async fn delete_category(&self, id: &str) -> ClientResult<()> {
        (**self).delete_category(id).await
    }

    async fn clear_categories(&self) -> ClientResult<ClearAllResponse> {
        (**self).clear_categories().await
    }

    async fn list_transactions(&self, kind: TransactionKind) -> ClientResult<Vec<Transaction>> {
        (**self).list_transactions(kind).await
    }

    async fn create_transaction(
        &self,
        kind: TransactionKind,
        request: &TransactionRequest,
    ) -> ClientResult<Transaction> {
        (**self).create_transaction(kind, request).await
    }

    async fn update_transaction(
        &self,
        kind: TransactionKind,
        id: &str,
        request: &TransactionRequest,
    ) -> ClientResult<Transaction> {
        (**self).update_transaction(kind, id, request).await
    }

    async fn delete_transaction(&self, kind: TransactionKind, id: &str) -> ClientResult<()> {
        (**self).delete_transaction(kind, id).await
    }

    async fn clear_transactions(&self, kind: TransactionKind) -> ClientResult<ClearAllResponse> {
        (**self).clear_transactions(kind).await
    }

    async fn get_settings(&self) -> ClientResult<UserSettings> {
        (**self).get_settings().await
    }

    async fn update_settings(&self, request: &SettingsRequest) -> ClientResult<UserSettings> {
        (**self).update_settings(request).await
    }
}

/// HTTP implementation of [`FinanceApi`]
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);
        self.http.request(method, url)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = builder.send().await?;
        decode(response).await
    }
}

/// Parse a success body, or lift the server's error message out of a failure
async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if status.is_success() {
        return response.json::<T>().await.map_err(|e| ClientError::Decode(e.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.error)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

    warn!("API request failed with {}: {}", status, message);
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl FinanceApi for ApiClient {
    async fn health(&self) -> ClientResult<HealthResponse> {
        self.send(self.request(Method::GET, "/health")).await
    }

    async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        self.send(self.request(Method::GET, "/categories")).await
    }

    async fn create_category(&self, request: &CategoryRequest) -> ClientResult<Category> {
        self.send(self.request(Method::POST, "/categories").json(request)).await
    }

    async fn update_category(&self, id: &str, request: &CategoryRequest) -> ClientResult<Category> {
        let path = format!("/categories/{}", id);
        self.send(self.request(Method::PUT, &path).json(request)).await
    }

    async fn delete_category(&self, id: &str) -> ClientResult<()> {
        let path = format!("/categories/{}", id);
        let _: MessageResponse = self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    async fn clear_categories(&self) -> ClientResult<ClearAllResponse> {
        self.send(self.request(Method::DELETE, "/categories/clear-all")).await
    }

    async fn list_transactions(&self, kind: TransactionKind) -> ClientResult<Vec<Transaction>> {
        let path = format!("/{}", kind.collection());
        self.send(self.request(Method::GET, &path)).await
    }

    async fn create_transaction(
        &self,
        kind: TransactionKind,
        request: &TransactionRequest,
    ) -> ClientResult<Transaction> {
        let path = format!("/{}", kind.collection());
        self.send(self.request(Method::POST, &path).json(request)).await
    }

    async fn update_transaction(
        &self,
        kind: TransactionKind,
        id: &str,
        request: &TransactionRequest,
    ) -> ClientResult<Transaction> {
        let path = format!("/{}/{}", kind.collection(), id);
        self.send(self.request(Method::PUT, &path).json(request)).await
    }

    async fn delete_transaction(&self, kind: TransactionKind, id: &str) -> ClientResult<()> {
        let path = format!("/{}/{}", kind.collection(), id);
        let _: MessageResponse = self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    async fn clear_transactions(&self, kind: TransactionKind) -> ClientResult<ClearAllResponse> {
        let path = format!("/{}/clear-all", kind.collection());
        self.send(self.request(Method::DELETE, &path)).await
    }

    async fn get_settings(&self) -> ClientResult<UserSettings> {
        self.send(self.request(Method::GET, "/settings")).await
    }

    async fn update_settings(&self, request: &SettingsRequest) -> ClientResult<UserSettings> {
        self.send(self.request(Method::PUT, "/settings").json(request)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_comes_from_config() {
        let client = ApiClient::new(&ClientConfig::with_base_url("http://127.0.0.1:5999/api/")).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:5999/api");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_transport_error() {
        // Port 9 (discard) is not expected to be listening locally
        let client = ApiClient::new(&ClientConfig::with_base_url("http://127.0.0.1:9/api")).unwrap();
        let error = client.health().await.unwrap_err();
        assert!(error.is_retryable(), "unexpected error: {:?}", error);
    }
}
