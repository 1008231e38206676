//! Serializes player actions against the engine and tracks multi-step decisions.
//!
//! The orchestrator never talks to the network itself. Actions are queued as
//! [`ApiRequest`]s; the frontend drains them one at a time through
//! [`DecisionOrchestrator::next_request`], runs them on a background task and
//! hands each reply back to [`DecisionOrchestrator::complete`] on its own loop
//! turn. At most one request is outstanding, so replies can never cross.
//!
//! ```text
//! Idle --submit--> ActionInFlight --pending--> PendingDecision --decide/cancel--> ActionInFlight
//!                        |                                                              |
//!                        +--result--> AnimationPlaying --renderer idle--> Idle <--------+
//! ```
mod topup;
mod variants;

pub use topup::{RedoTarget, TopupOffer};
pub use variants::{VariantPicker, is_ambiguous, variant_label, variants_between};

use std::collections::VecDeque;
use std::time::Duration;

use client_api::{ApiError, ApiReply, ApiRequest, Outcome};
use game_core::{
    ActionResult, Definitions, LoadoutConfig, Move, PendingDecision, PieceId, Snapshot,
    SnapshotDiff, Square, TopupKind,
};
use thiserror::Error;

use crate::config::FrontendConfig;
use crate::message::{MessageEntry, MessageLevel, MessageLog, NoticeBoard};
use crate::render::{DrawOverlays, Renderer};
use crate::store::SnapshotStore;

/// Player action that owns the in-flight slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Move,
    Decide,
    Cancel,
    Undo,
    Reset,
    NewGame,
    Topup,
}

impl Action {
    pub const fn label(self) -> &'static str {
        match self {
            Action::Move => "move",
            Action::Decide => "decision",
            Action::Cancel => "cancel",
            Action::Undo => "undo",
            Action::Reset => "reset",
            Action::NewGame => "new game",
            Action::Topup => "top-up",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum OrchestratorState {
    Idle,
    ActionInFlight(Action),
    PendingDecision(PendingDecision),
    AnimationPlaying,
}

impl OrchestratorState {
    pub fn label(&self) -> &'static str {
        match self {
            OrchestratorState::Idle => "idle",
            OrchestratorState::ActionInFlight(_) => "waiting for engine",
            OrchestratorState::PendingDecision(_) => "decision pending",
            OrchestratorState::AnimationPlaying => "animating",
        }
    }
}

/// Why an action was refused. Nothing is sent to the engine in any of these cases.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("busy: {0}")]
    Busy(&'static str),

    #[error("{0} is not a legal move")]
    IllegalMove(String),

    #[error("no decision is pending")]
    NoPendingDecision,

    #[error("the pending decision has no option `{0}`")]
    UnknownOption(String),

    #[error("no move variant picker is open")]
    NoPicker,

    #[error("top-up is not available")]
    TopupUnavailable,
}

pub struct DecisionOrchestrator {
    state: OrchestratorState,
    max_chain: usize,
    chain_depth: usize,
    legal_moves: Vec<Move>,
    definitions: Option<Definitions>,
    picker: Option<VariantPicker>,
    outbox: VecDeque<ApiRequest>,
    in_flight: Option<ApiRequest>,
    messages: MessageLog,
    notices: NoticeBoard,
}

impl DecisionOrchestrator {
    pub fn new(config: &FrontendConfig) -> Self {
        Self {
            state: OrchestratorState::Idle,
            max_chain: config.decisions.max_chain,
            chain_depth: 0,
            legal_moves: Vec::new(),
            definitions: None,
            picker: None,
            outbox: VecDeque::new(),
            in_flight: None,
            messages: MessageLog::new(config.messages.capacity),
            notices: NoticeBoard::new(config.messages.notice_ttl),
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn state(&self) -> &OrchestratorState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, OrchestratorState::Idle)
    }

    pub fn pending(&self) -> Option<&PendingDecision> {
        match &self.state {
            OrchestratorState::PendingDecision(pending) => Some(pending),
            _ => None,
        }
    }

    pub fn picker(&self) -> Option<&VariantPicker> {
        self.picker.as_ref()
    }

    pub fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    pub fn definitions(&self) -> Option<&Definitions> {
        self.definitions.as_ref()
    }

    /// Consecutive pending decisions in the current action.
    pub fn chain_depth(&self) -> usize {
        self.chain_depth
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut NoticeBoard {
        &mut self.notices
    }

    pub fn has_request_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The top-up offer, while the board is idle and one applies.
    pub fn topup_offer(&self, store: &SnapshotStore) -> Option<TopupOffer> {
        if !self.is_idle() || self.picker.is_some() {
            return None;
        }
        TopupOffer::for_side_to_move(store.current())
    }

    /// Highlights this orchestrator contributes to the next frame.
    pub fn overlays(&self, snapshot: &Snapshot) -> DrawOverlays {
        let mut decision = self
            .pending()
            .map(PendingDecision::highlight_squares)
            .unwrap_or_default();
        if let Some(picker) = &self.picker {
            decision.push(picker.to);
        }
        DrawOverlays {
            decision,
            check: snapshot.check_square(),
        }
    }

    // ------------------------------------------------------------------
    // Request queue
    // ------------------------------------------------------------------

    /// Queues the initial loads: definitions, state, legal moves.
    pub fn bootstrap(&mut self) {
        self.outbox.push_back(ApiRequest::Definitions);
        self.outbox.push_back(ApiRequest::State);
        self.outbox.push_back(ApiRequest::LegalMoves);
    }

    /// Reloads state and legal moves from the engine.
    pub fn refresh(&mut self) -> Result<(), SubmitError> {
        self.ensure_idle()?;
        self.outbox.push_back(ApiRequest::State);
        self.outbox.push_back(ApiRequest::LegalMoves);
        Ok(())
    }

    /// Next request to send, if nothing is outstanding.
    pub fn next_request(&mut self) -> Option<ApiRequest> {
        if self.in_flight.is_some() {
            return None;
        }
        let request = self.outbox.pop_front()?;
        tracing::debug!(%request, "sending engine request");
        self.in_flight = Some(request.clone());
        Some(request)
    }

    // ------------------------------------------------------------------
    // Player actions
    // ------------------------------------------------------------------

    /// Routes a board tap: a decision option while one is pending, otherwise
    /// selection and move entry.
    pub fn tap(
        &mut self,
        square: Square,
        store: &mut SnapshotStore,
        renderer: &mut Renderer,
    ) -> Result<(), SubmitError> {
        if let OrchestratorState::PendingDecision(pending) = &self.state {
            if let Some(option) = pending.option_at(square) {
                let choice = option.id.clone();
                return self.decide(&choice);
            }
            if pending.options_at(square).next().is_some() {
                self.notices
                    .post("Several options target that square; pick one by number", MessageLevel::Info);
            }
            return Ok(());
        }
        self.ensure_idle()?;

        if let Some(from) = renderer.selection() {
            if renderer.destinations().contains(&square) {
                return self.choose_destination(from, square, store, renderer);
            }
        }
        let select = renderer.has_moves_from(square) && renderer.selection() != Some(square);
        renderer.set_selection_square(select.then_some(square));
        Ok(())
    }

    /// Moves from `from` to `to`, opening the variant picker when the legal
    /// moves sharing that pair lead to different outcomes.
    pub fn choose_destination(
        &mut self,
        from: Square,
        to: Square,
        store: &mut SnapshotStore,
        renderer: &mut Renderer,
    ) -> Result<(), SubmitError> {
        self.ensure_idle()?;
        let mut candidates = variants_between(&self.legal_moves, from, to);
        if candidates.is_empty() {
            return Err(SubmitError::IllegalMove(format!("{from}{to}")));
        }
        if !is_ambiguous(&candidates) {
            // Equal outcomes keep engine order through the stable sort.
            return self.submit_move(candidates.remove(0), store, renderer);
        }
        tracing::debug!(%from, %to, variants = candidates.len(), "opening variant picker");
        self.picker = VariantPicker::open(&self.legal_moves, from, to);
        Ok(())
    }

    pub fn submit_move(
        &mut self,
        mv: Move,
        store: &mut SnapshotStore,
        renderer: &mut Renderer,
    ) -> Result<(), SubmitError> {
        self.ensure_idle()?;
        if !self.legal_moves.contains(&mv) {
            return Err(SubmitError::IllegalMove(mv.uci()));
        }
        renderer.set_selection_square(None);
        store.checkpoint();
        self.begin(Action::Move, ApiRequest::Apply(mv));
        Ok(())
    }

    pub fn picker_mut(&mut self) -> Option<&mut VariantPicker> {
        self.picker.as_mut()
    }

    /// Submits the highlighted picker entry.
    pub fn confirm_variant(
        &mut self,
        store: &mut SnapshotStore,
        renderer: &mut Renderer,
    ) -> Result<(), SubmitError> {
        let picker = self.picker.take().ok_or(SubmitError::NoPicker)?;
        self.submit_move(picker.selected().clone(), store, renderer)
    }

    /// Submits picker entry `index`.
    pub fn choose_variant(
        &mut self,
        index: usize,
        store: &mut SnapshotStore,
        renderer: &mut Renderer,
    ) -> Result<(), SubmitError> {
        let picker = self.picker.as_ref().ok_or(SubmitError::NoPicker)?;
        let Some(mv) = picker.get(index).cloned() else {
            return Err(SubmitError::UnknownOption(index.to_string()));
        };
        self.picker = None;
        self.submit_move(mv, store, renderer)
    }

    /// Closes the picker without contacting the engine.
    pub fn cancel_variant(&mut self) {
        self.picker = None;
    }

    pub fn decide(&mut self, choice: &str) -> Result<(), SubmitError> {
        let OrchestratorState::PendingDecision(pending) = &self.state else {
            return Err(SubmitError::NoPendingDecision);
        };
        if pending.option(choice).is_none() {
            return Err(SubmitError::UnknownOption(choice.to_string()));
        }
        let request = ApiRequest::Decide {
            pending_id: pending.id.clone(),
            choice: choice.to_string(),
        };
        self.begin(Action::Decide, request);
        Ok(())
    }

    /// Abandons the pending decision; the engine rolls the whole action back.
    pub fn cancel_decision(&mut self) -> Result<(), SubmitError> {
        if self.pending().is_none() {
            return Err(SubmitError::NoPendingDecision);
        }
        self.begin(Action::Cancel, ApiRequest::Cancel);
        Ok(())
    }

    pub fn undo(&mut self, renderer: &mut Renderer) -> Result<(), SubmitError> {
        self.ensure_idle()?;
        renderer.set_selection_square(None);
        self.begin(Action::Undo, ApiRequest::Undo);
        Ok(())
    }

    pub fn reset(&mut self, renderer: &mut Renderer) -> Result<(), SubmitError> {
        self.ensure_idle()?;
        renderer.set_selection_square(None);
        self.begin(Action::Reset, ApiRequest::Reset);
        Ok(())
    }

    pub fn new_game(
        &mut self,
        white: LoadoutConfig,
        black: LoadoutConfig,
        seed: Option<u64>,
        renderer: &mut Renderer,
    ) -> Result<(), SubmitError> {
        self.ensure_idle()?;
        renderer.set_selection_square(None);
        self.begin(Action::NewGame, ApiRequest::NewGame { white, black, seed });
        Ok(())
    }

    pub fn submit_topup(
        &mut self,
        kind: TopupKind,
        target: Option<PieceId>,
        store: &SnapshotStore,
    ) -> Result<(), SubmitError> {
        self.ensure_idle()?;
        let offer = TopupOffer::for_side_to_move(store.current()).ok_or(SubmitError::TopupUnavailable)?;
        if !offer.allows(kind, target) {
            return Err(SubmitError::TopupUnavailable);
        }
        self.begin(Action::Topup, ApiRequest::Topup { kind, target });
        Ok(())
    }

    /// Shows a refused action to the player.
    pub fn report(&mut self, err: &SubmitError) {
        tracing::warn!(%err, "action rejected");
        self.notices.post(err.to_string(), MessageLevel::Warning);
    }

    fn ensure_idle(&self) -> Result<(), SubmitError> {
        if self.picker.is_some() {
            return Err(SubmitError::Busy("choose a move variant first"));
        }
        match &self.state {
            OrchestratorState::Idle => Ok(()),
            other => Err(SubmitError::Busy(other.label())),
        }
    }

    fn begin(&mut self, action: Action, request: ApiRequest) {
        tracing::info!(action = action.label(), %request, "submitting action");
        self.state = OrchestratorState::ActionInFlight(action);
        self.outbox.push_back(request);
    }

    // ------------------------------------------------------------------
    // Replies
    // ------------------------------------------------------------------

    /// Advances notices, and returns to idle once the renderer has settled.
    pub fn tick(&mut self, dt: Duration, renderer: &Renderer) {
        self.notices.tick(dt);
        if matches!(self.state, OrchestratorState::AnimationPlaying) && !renderer.is_animating() {
            tracing::debug!("animations drained");
            self.state = OrchestratorState::Idle;
        }
    }

    /// Applies the reply to the outstanding request.
    pub fn complete(
        &mut self,
        reply: Result<ApiReply, ApiError>,
        store: &mut SnapshotStore,
        renderer: &mut Renderer,
    ) {
        let Some(request) = self.in_flight.take() else {
            tracing::warn!("engine reply arrived with no request outstanding");
            return;
        };
        match reply {
            Ok(reply) => self.settle(request, reply, store, renderer),
            Err(err) => self.fail(request, err, store, renderer),
        }
    }

    fn settle(
        &mut self,
        request: ApiRequest,
        reply: ApiReply,
        store: &mut SnapshotStore,
        renderer: &mut Renderer,
    ) {
        match (request, reply) {
            (ApiRequest::Definitions, ApiReply::Definitions(defs)) => {
                tracing::debug!(
                    elements = defs.elements.len(),
                    items = defs.items.len(),
                    abilities = defs.abilities.len(),
                    "definitions loaded"
                );
                self.definitions = Some(defs);
            }
            (ApiRequest::LegalMoves, ApiReply::LegalMoves(moves)) => {
                renderer.set_legal_moves(&moves);
                self.legal_moves = moves;
            }
            (ApiRequest::State, ApiReply::Snapshot(snapshot)) => {
                store.reset(*snapshot);
                renderer.sync_snapshot(store.current());
            }
            (ApiRequest::Apply(_) | ApiRequest::Decide { .. }, ApiReply::Outcome(outcome)) => match outcome {
                Outcome::Result(result) => self.on_result(*result, store, renderer),
                Outcome::Pending { pending, state } => self.on_pending(pending, *state, store, renderer),
            },
            (ApiRequest::Undo | ApiRequest::Topup { .. }, ApiReply::Result(result)) => {
                self.on_result(*result, store, renderer)
            }
            (ApiRequest::Cancel, ApiReply::Snapshot(snapshot)) => {
                self.on_cancelled(*snapshot, store, renderer)
            }
            (ApiRequest::Reset | ApiRequest::NewGame { .. }, ApiReply::Snapshot(snapshot)) => {
                self.on_new_position(*snapshot, store, renderer)
            }
            (request, _) => {
                let err = ApiError::Decode(format!("unexpected reply to {request}"));
                self.fail(request, err, store, renderer);
            }
        }
    }

    fn on_pending(
        &mut self,
        pending: PendingDecision,
        state: Snapshot,
        store: &mut SnapshotStore,
        renderer: &mut Renderer,
    ) {
        self.chain_depth += 1;
        if self.chain_depth > self.max_chain {
            tracing::warn!(depth = self.chain_depth, max = self.max_chain, "decision chain too long; cancelling");
            self.notices
                .post("Too many chained decisions; action rolled back", MessageLevel::Warning);
            self.begin(Action::Cancel, ApiRequest::Cancel);
            return;
        }

        let diff = SnapshotDiff::between(store.current(), &state);
        store.replace(state);
        renderer.set_selection_square(None);
        renderer.apply_result(&diff);

        tracing::info!(
            id = %pending.id,
            kind = ?pending.kind,
            options = pending.options.len(),
            depth = self.chain_depth,
            "decision pending"
        );
        self.messages.push(MessageEntry::new(
            format!("{}: {}", pending.kind.title(), pending.prompt),
            Some(store.current().ply),
            MessageLevel::Info,
        ));
        self.state = OrchestratorState::PendingDecision(pending);
    }

    fn on_result(&mut self, result: ActionResult, store: &mut SnapshotStore, renderer: &mut Renderer) {
        store.discard_checkpoint();
        self.chain_depth = 0;
        store.record_result(&result);
        renderer.apply_result(&result.diff);
        self.clear_legal_moves(renderer);
        self.log_result(&result);

        tracing::info!(
            ply = result.after.ply,
            added = result.diff.added.len(),
            removed = result.diff.removed.len(),
            moved = result.diff.moved.len(),
            "action settled"
        );
        self.state = OrchestratorState::AnimationPlaying;
        self.outbox.push_back(ApiRequest::LegalMoves);
    }

    fn on_cancelled(&mut self, server: Snapshot, store: &mut SnapshotStore, renderer: &mut Renderer) {
        self.chain_depth = 0;
        match store.restore_checkpoint() {
            Some(checkpoint) if *checkpoint != server => {
                tracing::warn!(
                    local_ply = checkpoint.ply,
                    server_ply = server.ply,
                    "engine rollback differs from local checkpoint; keeping engine state"
                );
                store.replace(server);
            }
            Some(_) => {}
            None => {
                store.replace(server);
            }
        }
        renderer.sync_snapshot(store.current());
        self.clear_legal_moves(renderer);
        self.messages.push(MessageEntry::new(
            "Action cancelled",
            Some(store.current().ply),
            MessageLevel::Info,
        ));
        tracing::info!(ply = store.current().ply, "action cancelled");
        self.state = OrchestratorState::Idle;
        self.outbox.push_back(ApiRequest::LegalMoves);
    }

    fn on_new_position(&mut self, snapshot: Snapshot, store: &mut SnapshotStore, renderer: &mut Renderer) {
        self.chain_depth = 0;
        store.reset(snapshot);
        renderer.sync_snapshot(store.current());
        self.clear_legal_moves(renderer);
        self.messages.clear();
        self.messages.push_text("New game");
        tracing::info!(pieces = store.current().pieces.len(), "new position loaded");
        self.state = OrchestratorState::Idle;
        self.outbox.push_back(ApiRequest::LegalMoves);
    }

    fn fail(
        &mut self,
        request: ApiRequest,
        err: ApiError,
        store: &mut SnapshotStore,
        renderer: &mut Renderer,
    ) {
        tracing::warn!(%request, error = %err, "engine request failed");
        let message = err.user_message();
        self.notices.post(message.clone(), MessageLevel::Error);
        self.messages
            .push(MessageEntry::new(message, Some(store.current().ply), MessageLevel::Error));

        match request {
            // The engine may still be holding the decision open.
            ApiRequest::Decide { .. } if store.has_checkpoint() => {
                self.begin(Action::Cancel, ApiRequest::Cancel);
            }
            ApiRequest::Decide { .. } | ApiRequest::Cancel => {
                if store.restore_checkpoint().is_some() {
                    renderer.sync_snapshot(store.current());
                }
                self.chain_depth = 0;
                self.state = OrchestratorState::Idle;
            }
            ApiRequest::Apply(_)
            | ApiRequest::Undo
            | ApiRequest::Reset
            | ApiRequest::NewGame { .. }
            | ApiRequest::Topup { .. } => {
                store.discard_checkpoint();
                self.state = OrchestratorState::Idle;
            }
            ApiRequest::Definitions | ApiRequest::State | ApiRequest::LegalMoves => {}
        }
    }

    fn clear_legal_moves(&mut self, renderer: &mut Renderer) {
        self.legal_moves.clear();
        renderer.set_legal_moves(&[]);
        renderer.set_selection_square(None);
    }

    fn log_result(&mut self, result: &ActionResult) {
        let ply = Some(result.after.ply);
        if let Some(undone) = &result.meta.undone {
            let label = undone.san.as_deref().unwrap_or(&undone.uci);
            self.messages
                .push(MessageEntry::new(format!("Undo {label}"), ply, MessageLevel::Info));
            return;
        }
        if let Some(notation) = result.meta.notation() {
            self.messages
                .push(MessageEntry::new(notation.display().to_string(), ply, MessageLevel::Info));
        }
        for effect in &result.meta.effects {
            self.messages
                .push(MessageEntry::new(effect.describe(), ply, MessageLevel::Info));
        }
        if result.after.checkmate {
            self.notices.post("Checkmate", MessageLevel::Info);
        } else if result.after.check {
            self.notices.post("Check", MessageLevel::Info);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnimationConfig;
    use crate::sprite::SpriteQuality;
    use game_core::{DecisionKind, DecisionOption, PieceKind};

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    struct Rig {
        orch: DecisionOrchestrator,
        store: SnapshotStore,
        renderer: Renderer,
    }

    impl Rig {
        fn new() -> Self {
            let store = SnapshotStore::new(Snapshot::standard());
            let mut renderer = Renderer::new(AnimationConfig::default(), SpriteQuality::Low);
            renderer.resize(320, 180);
            renderer.sync_snapshot(store.current());
            Self {
                orch: DecisionOrchestrator::new(&FrontendConfig::default()),
                store,
                renderer,
            }
        }

        fn reply(&mut self, reply: Result<ApiReply, ApiError>) -> ApiRequest {
            let request = self.orch.next_request().expect("a request is queued");
            self.orch.complete(reply, &mut self.store, &mut self.renderer);
            request
        }

        fn with_legal(mut self, moves: Vec<Move>) -> Self {
            self.orch.outbox.push_back(ApiRequest::LegalMoves);
            self.reply(Ok(ApiReply::LegalMoves(moves)));
            self
        }
    }

    fn pending(id: &str) -> PendingDecision {
        PendingDecision {
            id: id.to_string(),
            kind: DecisionKind::DoubleKillTarget,
            prompt: "Pick a second victim".to_string(),
            context: Default::default(),
            options: vec![
                DecisionOption {
                    id: "20".to_string(),
                    label: "Pawn @ d7".to_string(),
                    kind: None,
                    target_id: Some(PieceId(20)),
                    to_square: None,
                    sq: Some(sq("d7")),
                    mv: None,
                },
                DecisionOption {
                    id: "skip".to_string(),
                    label: "Skip".to_string(),
                    kind: None,
                    target_id: None,
                    to_square: None,
                    sq: None,
                    mv: None,
                },
            ],
        }
    }

    #[test]
    fn second_submission_while_busy_queues_nothing() {
        let e2e4 = Move::new(sq("e2"), sq("e4"));
        let mut rig = Rig::new().with_legal(vec![e2e4.clone()]);
        rig.orch
            .submit_move(e2e4.clone(), &mut rig.store, &mut rig.renderer)
            .unwrap();
        let err = rig
            .orch
            .submit_move(e2e4, &mut rig.store, &mut rig.renderer)
            .unwrap_err();
        assert!(matches!(err, SubmitError::Busy(_)));
        assert!(rig.orch.next_request().is_some());
        assert!(rig.orch.next_request().is_none());
        assert!(rig.orch.outbox.is_empty());
    }

    #[test]
    fn moves_not_reported_legal_are_refused() {
        let mut rig = Rig::new().with_legal(vec![]);
        let err = rig
            .orch
            .submit_move(Move::new(sq("e2"), sq("e5")), &mut rig.store, &mut rig.renderer)
            .unwrap_err();
        assert_eq!(err, SubmitError::IllegalMove("e2e5".to_string()));
        assert!(rig.orch.next_request().is_none());
    }

    #[test]
    fn result_animates_then_returns_to_idle() {
        let e2e4 = Move::new(sq("e2"), sq("e4"));
        let mut rig = Rig::new().with_legal(vec![e2e4.clone()]);
        rig.orch.tap(sq("e2"), &mut rig.store, &mut rig.renderer).unwrap();
        assert_eq!(rig.renderer.selection(), Some(sq("e2")));
        rig.orch.tap(sq("e4"), &mut rig.store, &mut rig.renderer).unwrap();

        let before = (**rig.store.current()).clone();
        let mut after = before.clone();
        after.pieces.iter_mut().find(|p| p.square == sq("e2")).unwrap().square = sq("e4");
        after.side_to_move = before.side_to_move.opponent();
        after.ply = 1;
        let result = ActionResult::from_snapshots(before, after);

        let sent = rig.reply(Ok(ApiReply::Outcome(Outcome::Result(Box::new(result)))));
        assert_eq!(sent, ApiRequest::Apply(e2e4));
        assert_eq!(rig.orch.state(), &OrchestratorState::AnimationPlaying);
        assert!(!rig.store.has_checkpoint());

        rig.renderer.step(Duration::from_millis(500));
        rig.orch.tick(Duration::from_millis(500), &rig.renderer);
        assert!(rig.orch.is_idle());
        assert_eq!(rig.orch.next_request(), Some(ApiRequest::LegalMoves));
    }

    #[test]
    fn cancel_restores_the_checkpoint() {
        let capture = Move::new(sq("e2"), sq("e4"));
        let mut rig = Rig::new().with_legal(vec![capture.clone()]);
        let original = (**rig.store.current()).clone();
        rig.orch
            .submit_move(capture, &mut rig.store, &mut rig.renderer)
            .unwrap();

        let mut mid = original.clone();
        mid.pieces.retain(|p| p.uid != PieceId(20));
        rig.reply(Ok(ApiReply::Outcome(Outcome::Pending {
            pending: pending("p1"),
            state: Box::new(mid),
        })));
        assert!(rig.orch.pending().is_some());
        assert_eq!(rig.orch.overlays(rig.store.current()).decision, vec![sq("d7")]);

        rig.orch.cancel_decision().unwrap();
        let sent = rig.reply(Ok(ApiReply::Snapshot(Box::new(original.clone()))));
        assert_eq!(sent, ApiRequest::Cancel);
        assert_eq!(**rig.store.current(), original);
        assert!(rig.orch.is_idle());
        assert_eq!(rig.renderer.active_tweens(), 0);
        assert!(rig.renderer.piece(PieceId(20)).is_some());
    }

    #[test]
    fn decide_validates_option_ids() {
        let mv = Move::new(sq("e2"), sq("e4"));
        let mut rig = Rig::new().with_legal(vec![mv.clone()]);
        assert_eq!(rig.orch.decide("20"), Err(SubmitError::NoPendingDecision));
        rig.orch.submit_move(mv, &mut rig.store, &mut rig.renderer).unwrap();
        rig.reply(Ok(ApiReply::Outcome(Outcome::Pending {
            pending: pending("p1"),
            state: Box::new(Snapshot::standard()),
        })));

        assert_eq!(
            rig.orch.decide("nope"),
            Err(SubmitError::UnknownOption("nope".to_string()))
        );
        rig.orch.tap(sq("d7"), &mut rig.store, &mut rig.renderer).unwrap();
        assert_eq!(
            rig.orch.next_request(),
            Some(ApiRequest::Decide {
                pending_id: "p1".to_string(),
                choice: "20".to_string()
            })
        );
    }

    #[test]
    fn tap_on_a_shared_option_square_waits_for_a_number() {
        let mv = Move::new(sq("e2"), sq("e4"));
        let mut rig = Rig::new().with_legal(vec![mv.clone()]);
        rig.orch.submit_move(mv, &mut rig.store, &mut rig.renderer).unwrap();

        let mut replay = pending("r1");
        for option in &mut replay.options {
            option.sq = Some(sq("d7"));
        }
        rig.reply(Ok(ApiReply::Outcome(Outcome::Pending {
            pending: replay,
            state: Box::new(Snapshot::standard()),
        })));

        rig.orch.tap(sq("d7"), &mut rig.store, &mut rig.renderer).unwrap();
        assert!(rig.orch.next_request().is_none());
        assert!(rig.orch.pending().is_some());
        assert_eq!(
            rig.orch.notices().current().map(|n| n.level),
            Some(MessageLevel::Info)
        );

        rig.orch.decide("skip").unwrap();
        assert_eq!(
            rig.orch.next_request(),
            Some(ApiRequest::Decide {
                pending_id: "r1".to_string(),
                choice: "skip".to_string()
            })
        );
    }

    #[test]
    fn runaway_decision_chain_is_cancelled() {
        let mv = Move::new(sq("e2"), sq("e4"));
        let mut config = FrontendConfig::default();
        config.decisions.max_chain = 2;
        let mut rig = Rig::new();
        rig.orch = DecisionOrchestrator::new(&config);
        let mut rig = rig.with_legal(vec![mv.clone()]);

        rig.orch.submit_move(mv, &mut rig.store, &mut rig.renderer).unwrap();
        for n in 0..3 {
            rig.reply(Ok(ApiReply::Outcome(Outcome::Pending {
                pending: pending(&format!("p{n}")),
                state: Box::new(Snapshot::standard()),
            })));
            if rig.orch.pending().is_some() {
                rig.orch.decide("skip").unwrap();
            }
        }
        assert_eq!(rig.orch.state(), &OrchestratorState::ActionInFlight(Action::Cancel));
        assert_eq!(rig.orch.next_request(), Some(ApiRequest::Cancel));
        assert!(rig.orch.notices().current().is_some());
    }

    #[test]
    fn engine_error_posts_notice_and_returns_to_idle() {
        let mv = Move::new(sq("e2"), sq("e4"));
        let mut rig = Rig::new().with_legal(vec![mv.clone()]);
        rig.orch.submit_move(mv, &mut rig.store, &mut rig.renderer).unwrap();
        rig.reply(Err(ApiError::Server("Illegal move".to_string())));

        assert!(rig.orch.is_idle());
        assert!(!rig.store.has_checkpoint());
        assert_eq!(rig.orch.notices().current().map(|n| n.text.as_str()), Some("Illegal move"));
    }

    #[test]
    fn failed_decision_rolls_back_through_cancel() {
        let mv = Move::new(sq("e2"), sq("e4"));
        let mut rig = Rig::new().with_legal(vec![mv.clone()]);
        rig.orch.submit_move(mv, &mut rig.store, &mut rig.renderer).unwrap();
        rig.reply(Ok(ApiReply::Outcome(Outcome::Pending {
            pending: pending("p1"),
            state: Box::new(Snapshot::standard()),
        })));
        rig.orch.decide("20").unwrap();
        rig.reply(Err(ApiError::Network("reset".to_string())));

        assert_eq!(rig.orch.state(), &OrchestratorState::ActionInFlight(Action::Cancel));
        assert_eq!(rig.orch.next_request(), Some(ApiRequest::Cancel));
    }

    #[test]
    fn ambiguous_destination_opens_picker_without_a_call() {
        let (from, to) = (sq("e7"), sq("e8"));
        let moves: Vec<Move> = [PieceKind::Knight, PieceKind::Queen]
            .into_iter()
            .map(|kind| Move::promotion(from, to, kind))
            .collect();
        let mut rig = Rig::new().with_legal(moves.clone());

        rig.orch
            .choose_destination(from, to, &mut rig.store, &mut rig.renderer)
            .unwrap();
        assert!(rig.orch.picker().is_some());
        assert!(rig.orch.next_request().is_none());

        rig.orch.cancel_variant();
        assert!(rig.orch.picker().is_none());
        assert!(rig.orch.next_request().is_none());

        rig.orch
            .choose_destination(from, to, &mut rig.store, &mut rig.renderer)
            .unwrap();
        rig.orch
            .confirm_variant(&mut rig.store, &mut rig.renderer)
            .unwrap();
        assert_eq!(rig.orch.next_request(), Some(ApiRequest::Apply(moves[1].clone())));
    }

    #[test]
    fn identical_outcomes_submit_without_a_picker() {
        let (from, to) = (sq("e2"), sq("e4"));
        let plain = Move::new(from, to);
        let tagged = Move {
            flags: vec!["double_push".to_string()],
            ..Move::new(from, to)
        };
        let mut rig = Rig::new().with_legal(vec![tagged.clone(), plain]);

        rig.orch
            .choose_destination(from, to, &mut rig.store, &mut rig.renderer)
            .unwrap();
        assert!(rig.orch.picker().is_none());
        assert_eq!(rig.orch.next_request(), Some(ApiRequest::Apply(tagged)));
    }

    #[test]
    fn mismatched_rollback_keeps_engine_state() {
        let mv = Move::new(sq("e2"), sq("e4"));
        let mut rig = Rig::new().with_legal(vec![mv.clone()]);
        rig.orch.submit_move(mv, &mut rig.store, &mut rig.renderer).unwrap();
        rig.reply(Ok(ApiReply::Outcome(Outcome::Pending {
            pending: pending("p1"),
            state: Box::new(Snapshot::standard()),
        })));
        rig.orch.cancel_decision().unwrap();

        let mut server = Snapshot::standard();
        server.ply = 7;
        rig.reply(Ok(ApiReply::Snapshot(Box::new(server))));
        assert_eq!(rig.store.current().ply, 7);
    }
}
