//! The engine-facing interface and its request/reply envelope.
//!
//! The frontend never awaits the engine inline. It builds an [`ApiRequest`],
//! hands it to a spawned task that calls [`dispatch`], and receives the
//! [`ApiReply`] back on its own loop turn.
use std::fmt;

use async_trait::async_trait;
use game_core::{ActionResult, Definitions, LoadoutConfig, Move, PendingDecision, PieceId, Snapshot, TopupKind};

use crate::error::ApiError;

/// Reply to a move or a decision: either it settled, or the engine needs
/// another choice first.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Result(Box<ActionResult>),
    Pending {
        pending: PendingDecision,
        state: Box<Snapshot>,
    },
}

/// Everything the client needs from the external rules engine.
#[async_trait]
pub trait GameApi: Send + Sync {
    async fn get_definitions(&self) -> Result<Definitions, ApiError>;

    async fn get_state(&self) -> Result<Snapshot, ApiError>;

    /// Legal moves for the side to move.
    async fn get_legal_moves(&self) -> Result<Vec<Move>, ApiError>;

    async fn apply(&self, mv: &Move) -> Result<Outcome, ApiError>;

    async fn decide(&self, pending_id: &str, choice: &str) -> Result<Outcome, ApiError>;

    /// Abandons the pending decision and rolls back to the pre-action state.
    async fn cancel(&self) -> Result<Snapshot, ApiError>;

    async fn undo(&self) -> Result<ActionResult, ApiError>;

    async fn reset(&self) -> Result<Snapshot, ApiError>;

    async fn new_game(
        &self,
        white: &LoadoutConfig,
        black: &LoadoutConfig,
        seed: Option<u64>,
    ) -> Result<Snapshot, ApiError>;

    async fn resource_topup(
        &self,
        kind: TopupKind,
        target: Option<PieceId>,
    ) -> Result<ActionResult, ApiError>;
}

#[derive(Clone, Debug, PartialEq, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ApiRequest {
    Definitions,
    State,
    LegalMoves,
    Apply(Move),
    Decide { pending_id: String, choice: String },
    Cancel,
    Undo,
    Reset,
    NewGame {
        white: LoadoutConfig,
        black: LoadoutConfig,
        seed: Option<u64>,
    },
    Topup {
        kind: TopupKind,
        target: Option<PieceId>,
    },
}

impl ApiRequest {
    /// Short endpoint-style name for logs.
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiRequest::Apply(mv) => write!(f, "apply {}", mv.uci()),
            ApiRequest::Decide { pending_id, choice } => write!(f, "decide {pending_id}={choice}"),
            ApiRequest::Topup { kind, target } => match target {
                Some(uid) => write!(f, "topup {kind:?} {uid}"),
                None => write!(f, "topup {kind:?}"),
            },
            other => f.write_str(other.name()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ApiReply {
    Definitions(Definitions),
    Snapshot(Box<Snapshot>),
    LegalMoves(Vec<Move>),
    Outcome(Outcome),
    Result(Box<ActionResult>),
}

/// Runs one request against the engine.
pub async fn dispatch(api: &dyn GameApi, request: &ApiRequest) -> Result<ApiReply, ApiError> {
    Ok(match request {
        ApiRequest::Definitions => ApiReply::Definitions(api.get_definitions().await?),
        ApiRequest::State => ApiReply::Snapshot(Box::new(api.get_state().await?)),
        ApiRequest::LegalMoves => ApiReply::LegalMoves(api.get_legal_moves().await?),
        ApiRequest::Apply(mv) => ApiReply::Outcome(api.apply(mv).await?),
        ApiRequest::Decide { pending_id, choice } => {
            ApiReply::Outcome(api.decide(pending_id, choice).await?)
        }
        ApiRequest::Cancel => ApiReply::Snapshot(Box::new(api.cancel().await?)),
        ApiRequest::Undo => ApiReply::Result(Box::new(api.undo().await?)),
        ApiRequest::Reset => ApiReply::Snapshot(Box::new(api.reset().await?)),
        ApiRequest::NewGame { white, black, seed } => {
            ApiReply::Snapshot(Box::new(api.new_game(white, black, *seed).await?))
        }
        ApiRequest::Topup { kind, target } => {
            ApiReply::Result(Box::new(api.resource_topup(*kind, *target).await?))
        }
    })
}
