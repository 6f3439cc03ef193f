use std::time::Duration;

use reqwest::{Response, StatusCode};
use thiserror::Error;

use crate::config::Config;
use crate::models::{Client, NewClient};

/// Errors returned by the backend client.
///
/// `NotFound` gets a dedicated variant because callers distinguish "the
/// record does not exist" from "the server returned an unexpected status."
/// All other non-2xx responses land in `Status` with the raw status code
/// and body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("record not found")]
    NotFound,

    #[error("server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response body: {0}")]
    Decode(String),
}

/// REST client for the backend service
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new ApiClient from the configured base URL
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url().trim_end_matches('/').to_string(),
        })
    }

    /// Get a reference to the backend base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // Client record operations

    /// Fetch the full client collection
    pub async fn list_clients(&self) -> Result<Vec<Client>, ApiError> {
        let response = self
            .http
            .get(format!("{}/users", self.base_url))
            .send()
            .await?;

        decode_json(ensure_success(response).await?).await
    }

    /// Fetch a single client record by id
    pub async fn get_client(&self, id: i32) -> Result<Client, ApiError> {
        let response = self
            .http
            .get(format!("{}/user/{}", self.base_url, id))
            .send()
            .await?;

        decode_json(ensure_success(response).await?).await
    }

    /// Create a new client record
    pub async fn create_client(&self, input: &NewClient) -> Result<(), ApiError> {
        let response = self
            .http
            .post(format!("{}/adduser", self.base_url))
            .json(input)
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }

    /// Replace a client record with the given full record
    pub async fn update_client(&self, client: &Client) -> Result<(), ApiError> {
        let response = self
            .http
            .put(format!("{}/updateuser", self.base_url))
            .json(client)
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }

    /// Delete a client record by id
    pub async fn delete_client(&self, id: i32) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(format!("{}/supprimerClient/{}", self.base_url, id))
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }
}

/// Map non-2xx responses to the appropriate `ApiError` variant.
async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Read a successful response body and deserialize it.
async fn decode_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}
