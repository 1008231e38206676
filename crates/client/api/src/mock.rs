//! Scripted engine double for tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use game_core::{ActionResult, Definitions, LoadoutConfig, Move, PieceId, Snapshot, TopupKind};

use crate::error::ApiError;
use crate::traits::{ApiReply, ApiRequest, GameApi, Outcome};

/// Replays queued replies in order and records every call it receives.
///
/// Calls that find an empty queue, or a queued reply of the wrong shape, fail
/// with [`ApiError::Decode`] so a test notices the mismatch immediately.
#[derive(Clone, Default)]
pub struct ScriptedGameApi {
    replies: Arc<Mutex<VecDeque<Result<ApiReply, ApiError>>>>,
    calls: Arc<Mutex<Vec<ApiRequest>>>,
}

impl ScriptedGameApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, reply: Result<ApiReply, ApiError>) -> &Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn push_outcome(&self, outcome: Outcome) -> &Self {
        self.push(Ok(ApiReply::Outcome(outcome)))
    }

    pub fn push_result(&self, result: ActionResult) -> &Self {
        self.push(Ok(ApiReply::Result(Box::new(result))))
    }

    pub fn push_snapshot(&self, snapshot: Snapshot) -> &Self {
        self.push(Ok(ApiReply::Snapshot(Box::new(snapshot))))
    }

    pub fn push_error(&self, err: ApiError) -> &Self {
        self.push(Err(err))
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn pending_replies(&self) -> usize {
        self.replies.lock().unwrap().len()
    }

    fn next(&self, request: ApiRequest) -> Result<ApiReply, ApiError> {
        let name = request.name();
        self.calls.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Decode(format!("no scripted reply for {name}"))))
    }
}

fn unexpected(reply: ApiReply) -> ApiError {
    ApiError::Decode(format!("scripted reply has the wrong shape: {reply:?}"))
}

#[async_trait]
impl GameApi for ScriptedGameApi {
    async fn get_definitions(&self) -> Result<Definitions, ApiError> {
        match self.next(ApiRequest::Definitions)? {
            ApiReply::Definitions(defs) => Ok(defs),
            other => Err(unexpected(other)),
        }
    }

    async fn get_state(&self) -> Result<Snapshot, ApiError> {
        match self.next(ApiRequest::State)? {
            ApiReply::Snapshot(snapshot) => Ok(*snapshot),
            other => Err(unexpected(other)),
        }
    }

    async fn get_legal_moves(&self) -> Result<Vec<Move>, ApiError> {
        match self.next(ApiRequest::LegalMoves)? {
            ApiReply::LegalMoves(moves) => Ok(moves),
            other => Err(unexpected(other)),
        }
    }

    async fn apply(&self, mv: &Move) -> Result<Outcome, ApiError> {
        match self.next(ApiRequest::Apply(mv.clone()))? {
            ApiReply::Outcome(outcome) => Ok(outcome),
            ApiReply::Result(result) => Ok(Outcome::Result(result)),
            other => Err(unexpected(other)),
        }
    }

    async fn decide(&self, pending_id: &str, choice: &str) -> Result<Outcome, ApiError> {
        let request = ApiRequest::Decide {
            pending_id: pending_id.to_string(),
            choice: choice.to_string(),
        };
        match self.next(request)? {
            ApiReply::Outcome(outcome) => Ok(outcome),
            ApiReply::Result(result) => Ok(Outcome::Result(result)),
            other => Err(unexpected(other)),
        }
    }

    async fn cancel(&self) -> Result<Snapshot, ApiError> {
        match self.next(ApiRequest::Cancel)? {
            ApiReply::Snapshot(snapshot) => Ok(*snapshot),
            other => Err(unexpected(other)),
        }
    }

    async fn undo(&self) -> Result<ActionResult, ApiError> {
        match self.next(ApiRequest::Undo)? {
            ApiReply::Result(result) => Ok(*result),
            other => Err(unexpected(other)),
        }
    }

    async fn reset(&self) -> Result<Snapshot, ApiError> {
        match self.next(ApiRequest::Reset)? {
            ApiReply::Snapshot(snapshot) => Ok(*snapshot),
            other => Err(unexpected(other)),
        }
    }

    async fn new_game(
        &self,
        white: &LoadoutConfig,
        black: &LoadoutConfig,
        seed: Option<u64>,
    ) -> Result<Snapshot, ApiError> {
        let request = ApiRequest::NewGame {
            white: white.clone(),
            black: black.clone(),
            seed,
        };
        match self.next(request)? {
            ApiReply::Snapshot(snapshot) => Ok(*snapshot),
            other => Err(unexpected(other)),
        }
    }

    async fn resource_topup(
        &self,
        kind: TopupKind,
        target: Option<PieceId>,
    ) -> Result<ActionResult, ApiError> {
        match self.next(ApiRequest::Topup { kind, target })? {
            ApiReply::Result(result) => Ok(*result),
            other => Err(unexpected(other)),
        }
    }
}
