//! `GameApi` over the engine's JSON HTTP endpoints.
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use game_core::{
    ActionResult, Definitions, LoadoutConfig, Move, PendingDecision, PieceId, Snapshot, TopupKind,
};

use crate::error::ApiError;
use crate::traits::{GameApi, Outcome};

/// Every engine response is wrapped in this envelope; which payload field is
/// present depends on the endpoint.
#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    state: Option<Snapshot>,
    #[serde(default)]
    result: Option<ActionResult>,
    #[serde(default)]
    pending: Option<PendingDecision>,
    #[serde(default)]
    moves: Option<Vec<Move>>,
    #[serde(default)]
    defs: Option<Definitions>,
}

impl Envelope {
    fn state(self) -> Result<Snapshot, ApiError> {
        self.state.ok_or(ApiError::MissingField("state"))
    }

    fn result(self) -> Result<ActionResult, ApiError> {
        self.result.ok_or(ApiError::MissingField("result"))
    }

    fn outcome(self) -> Result<Outcome, ApiError> {
        if let Some(result) = self.result {
            return Ok(Outcome::Result(Box::new(result)));
        }
        match (self.pending, self.state) {
            (Some(pending), Some(state)) => Ok(Outcome::Pending {
                pending,
                state: Box::new(state),
            }),
            (Some(_), None) => Err(ApiError::MissingField("state")),
            _ => Err(ApiError::MissingField("result")),
        }
    }
}

/// Decodes a response body. Rejections arrive with a 4xx status and an
/// `ok: false` envelope, so the body is inspected before the status.
fn decode_envelope(status: u16, body: &str) -> Result<Envelope, ApiError> {
    match serde_json::from_str::<Envelope>(body) {
        Ok(envelope) if envelope.ok => Ok(envelope),
        Ok(envelope) => Err(ApiError::Server(
            envelope.error.unwrap_or_else(|| format!("request failed ({status})")),
        )),
        Err(_) if !(200..300).contains(&status) => Err(ApiError::Status {
            status,
            body: body.trim().to_string(),
        }),
        Err(err) => Err(ApiError::Decode(err.to_string())),
    }
}

/// HTTP client for a running rules engine.
pub struct HttpGameApi {
    /// Base URL without trailing slash, e.g. `http://127.0.0.1:8000`.
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpGameApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    async fn finish(&self, path: &str, response: reqwest::Response) -> Result<Envelope, ApiError> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        let envelope = decode_envelope(status, &body);
        if let Err(err) = &envelope {
            tracing::debug!(path, status, error = %err, "engine request failed");
        }
        envelope
    }

    async fn get(&self, path: &str) -> Result<Envelope, ApiError> {
        tracing::trace!(path, "GET");
        let response = self.http_client.get(self.url(path)).send().await?;
        self.finish(path, response).await
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<Envelope, ApiError> {
        tracing::trace!(path, "POST");
        let response = self
            .http_client
            .post(self.url(path))
            .json(&body)
            .send()
            .await?;
        self.finish(path, response).await
    }
}

#[async_trait]
impl GameApi for HttpGameApi {
    async fn get_definitions(&self) -> Result<Definitions, ApiError> {
        self.get("defs")
            .await?
            .defs
            .ok_or(ApiError::MissingField("defs"))
    }

    async fn get_state(&self) -> Result<Snapshot, ApiError> {
        self.get("state").await?.state()
    }

    async fn get_legal_moves(&self) -> Result<Vec<Move>, ApiError> {
        Ok(self.get("legal").await?.moves.unwrap_or_default())
    }

    async fn apply(&self, mv: &Move) -> Result<Outcome, ApiError> {
        self.post("apply", json!({ "move": mv })).await?.outcome()
    }

    async fn decide(&self, pending_id: &str, choice: &str) -> Result<Outcome, ApiError> {
        self.post("decide", json!({ "id": pending_id, "choice": choice }))
            .await?
            .outcome()
    }

    async fn cancel(&self) -> Result<Snapshot, ApiError> {
        self.post("cancel", json!({})).await?.state()
    }

    async fn undo(&self) -> Result<ActionResult, ApiError> {
        self.post("undo", json!({})).await?.result()
    }

    async fn reset(&self) -> Result<Snapshot, ApiError> {
        self.post("reset", json!({})).await?.state()
    }

    async fn new_game(
        &self,
        white: &LoadoutConfig,
        black: &LoadoutConfig,
        seed: Option<u64>,
    ) -> Result<Snapshot, ApiError> {
        let mut body = json!({ "white": white, "black": black });
        if let Some(seed) = seed {
            body["rng_seed"] = json!(seed);
        }
        self.post("newgame", body).await?.state()
    }

    async fn resource_topup(
        &self,
        kind: TopupKind,
        target: Option<PieceId>,
    ) -> Result<ActionResult, ApiError> {
        let mut body = json!({ "kind": kind });
        if let Some(uid) = target {
            body["uid"] = json!(uid);
        }
        self.post("solar_topup", body).await?.result()
    }
}
