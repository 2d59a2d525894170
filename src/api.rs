use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, multipart};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::http_client::http_client;
use crate::model::{
    Created, Player, PlayerPayload, PlayerSuggestion, Team, TeamPayload, Transfer, TransferPayload,
};

const MAX_ERROR_MESSAGE: usize = 300;

/// Every call the console makes against the contract backend.
///
/// One call per method, no retries, no caching. Implemented over HTTP by
/// [`ApiClient`] and in memory by [`crate::fake_backend::FakeBackend`].
pub trait Backend: Send + Sync {
    fn list_players(&self) -> Result<Vec<Player>, ApiError>;
    fn get_player(&self, id: u32) -> Result<Player, ApiError>;
    fn create_player(&self, payload: &PlayerPayload) -> Result<u32, ApiError>;
    fn update_player(&self, id: u32, payload: &PlayerPayload) -> Result<(), ApiError>;
    fn delete_player(&self, id: u32) -> Result<(), ApiError>;
    fn search_players(&self, query: &str) -> Result<Vec<PlayerSuggestion>, ApiError>;

    fn list_teams(&self) -> Result<Vec<Team>, ApiError>;
    fn get_team(&self, id: u32) -> Result<Team, ApiError>;
    fn create_team(&self, payload: &TeamPayload) -> Result<u32, ApiError>;
    fn update_team(&self, id: u32, payload: &TeamPayload) -> Result<(), ApiError>;
    fn delete_team(&self, id: u32) -> Result<(), ApiError>;
    fn search_teams(&self, query: &str) -> Result<Vec<Team>, ApiError>;

    fn list_transfers(&self) -> Result<Vec<Transfer>, ApiError>;
    fn create_transfer(&self, payload: &TransferPayload) -> Result<u32, ApiError>;

    /// Returns the stored image URL.
    fn upload_player_image(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let client = http_client(timeout).map_err(|err| ApiError::Network(format!("{err:#}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: client.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = endpoint(&self.base_url, path);
        self.send_json(self.client.get(&url), "GET", &url)
    }

    fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let url = endpoint(&self.base_url, path);
        let body = self.send(self.client.get(&url), "GET", &url)?;
        parse_list(&body)
    }

    fn search<T: DeserializeOwned>(&self, resource: &str, query: &str) -> Result<Vec<T>, ApiError> {
        let url = endpoint(&self.base_url, &format!("/{resource}/search"));
        let req = self.client.get(&url).query(&[("query", query)]);
        let body = self.send(req, "GET", &url)?;
        parse_list(&body)
    }

    fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let url = endpoint(&self.base_url, path);
        self.send_json(self.client.post(&url).json(body), "POST", &url)
    }

    fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let url = endpoint(&self.base_url, path);
        self.send_json::<Value>(self.client.put(&url).json(body), "PUT", &url)
            .map(|_| ())
    }

    fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = endpoint(&self.base_url, path);
        self.send_json::<Value>(self.client.delete(&url), "DELETE", &url)
            .map(|_| ())
    }

    fn send_json<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        method: &str,
        url: &str,
    ) -> Result<T, ApiError> {
        let body = self.send(req, method, url)?;
        parse_body(&body)
    }

    fn send(&self, req: RequestBuilder, method: &str, url: &str) -> Result<String, ApiError> {
        debug!(%method, %url, "request");
        let resp = req.send().map_err(|err| {
            warn!(%method, %url, error = %err, "transport failure");
            ApiError::network(err)
        })?;
        let status = resp.status();
        let body = resp.text().map_err(ApiError::network)?;
        check_status(status, body).inspect_err(|err| {
            warn!(%method, %url, error = %err, "request rejected");
        })
    }
}

impl Backend for ApiClient {
    fn list_players(&self) -> Result<Vec<Player>, ApiError> {
        self.get_list("/players")
    }

    fn get_player(&self, id: u32) -> Result<Player, ApiError> {
        self.get(&format!("/players/{id}"))
    }

    fn create_player(&self, payload: &PlayerPayload) -> Result<u32, ApiError> {
        self.post::<_, Created>("/players", payload)
            .map(|created| created.id)
    }

    fn update_player(&self, id: u32, payload: &PlayerPayload) -> Result<(), ApiError> {
        self.put(&format!("/players/{id}"), payload)
    }

    fn delete_player(&self, id: u32) -> Result<(), ApiError> {
        self.delete(&format!("/players/{id}"))
    }

    fn search_players(&self, query: &str) -> Result<Vec<PlayerSuggestion>, ApiError> {
        self.search("players", query)
    }

    fn list_teams(&self) -> Result<Vec<Team>, ApiError> {
        self.get_list("/teams")
    }

    fn get_team(&self, id: u32) -> Result<Team, ApiError> {
        self.get(&format!("/teams/{id}"))
    }

    fn create_team(&self, payload: &TeamPayload) -> Result<u32, ApiError> {
        self.post::<_, Created>("/teams", payload)
            .map(|created| created.id)
    }

    fn update_team(&self, id: u32, payload: &TeamPayload) -> Result<(), ApiError> {
        self.put(&format!("/teams/{id}"), payload)
    }

    fn delete_team(&self, id: u32) -> Result<(), ApiError> {
        self.delete(&format!("/teams/{id}"))
    }

    fn search_teams(&self, query: &str) -> Result<Vec<Team>, ApiError> {
        self.search("teams", query)
    }

    fn list_transfers(&self) -> Result<Vec<Transfer>, ApiError> {
        self.get_list("/transfers")
    }

    fn create_transfer(&self, payload: &TransferPayload) -> Result<u32, ApiError> {
        self.post::<_, Created>("/transfers", payload)
            .map(|created| created.id)
    }

    fn upload_player_image(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, ApiError> {
        let url = endpoint(&self.base_url, "/upload_player_image");
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);
        let body: Value = self
            .send_json(self.client.post(&url).multipart(form), "POST", &url)
            .map_err(|err| match err {
                ApiError::Api { message, .. } => ApiError::Upload(message),
                other => other,
            })?;
        parse_upload_response(&body)
    }
}

pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Pass 2xx bodies through; turn anything else into `ApiError::Api`.
pub fn check_status(status: StatusCode, body: String) -> Result<String, ApiError> {
    if status.is_success() {
        return Ok(body);
    }
    Err(ApiError::Api {
        status: status.as_u16(),
        message: server_message(&body, status),
    })
}

/// Prefer `{"error": ..}` / `{"message": ..}`, else the raw body.
pub fn server_message(body: &str, status: StatusCode) -> String {
    let trimmed = body.trim();
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        for key in ["error", "message", "detail"] {
            if let Some(text) = map.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string();
    }
    if trimmed.chars().count() > MAX_ERROR_MESSAGE {
        let cut: String = trimmed.chars().take(MAX_ERROR_MESSAGE).collect();
        return format!("{cut}...");
    }
    trimmed.to_string()
}

pub fn parse_body<T: DeserializeOwned>(raw: &str) -> Result<T, ApiError> {
    let trimmed = raw.trim();
    let trimmed = if trimmed.is_empty() { "null" } else { trimmed };
    serde_json::from_str(trimmed).map_err(ApiError::decode)
}

/// List bodies; `null` or an empty body reads as no rows.
pub fn parse_list<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).map_err(ApiError::decode)
}

pub fn parse_upload_response(body: &Value) -> Result<String, ApiError> {
    body.get("image_url")
        .and_then(|v| v.as_str())
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::Upload("response carried no image_url".to_string()))
}
