//! End-to-end action flows against the scripted engine.
use std::time::Duration;

use client_api::{ApiError, ApiReply, ApiRequest, GameApi, Outcome, ScriptedGameApi, dispatch};
use client_frontend_core::{
    AnimationConfig, DecisionOrchestrator, FrontendConfig, OrchestratorState, Renderer,
    SnapshotStore, SpriteQuality, SubmitError,
};
use game_core::{
    ActionResult, DecisionKind, DecisionOption, Definitions, ItemId, LoadoutConfig, Move,
    Notation, PendingDecision, PieceId, ResourceState, SideMap, Snapshot, Square, TopupKind,
};

fn sq(name: &str) -> Square {
    name.parse().unwrap()
}

struct Client {
    api: ScriptedGameApi,
    orch: DecisionOrchestrator,
    store: SnapshotStore,
    renderer: Renderer,
}

impl Client {
    fn new() -> Self {
        let mut renderer = Renderer::new(AnimationConfig::default(), SpriteQuality::Low);
        renderer.resize(320, 180);
        Self {
            api: ScriptedGameApi::new(),
            orch: DecisionOrchestrator::new(&FrontendConfig::default()),
            store: SnapshotStore::new(Snapshot::empty()),
            renderer,
        }
    }

    /// Sends queued requests until the queue is empty, as the frontend loop does.
    async fn pump(&mut self) {
        while let Some(request) = self.orch.next_request() {
            let api: &dyn GameApi = &self.api;
            let reply = dispatch(api, &request).await;
            self.orch.complete(reply, &mut self.store, &mut self.renderer);
        }
    }

    fn settle_animations(&mut self) {
        self.renderer.step(Duration::from_secs(1));
        self.orch.tick(Duration::from_secs(1), &self.renderer);
    }

    async fn boot(&mut self, snapshot: Snapshot, legal: Vec<Move>) {
        self.api
            .push(Ok(ApiReply::Definitions(Definitions::builtin())))
            .push_snapshot(snapshot)
            .push(Ok(ApiReply::LegalMoves(legal)));
        self.orch.bootstrap();
        self.pump().await;
    }
}

fn advance(before: &Snapshot, from: Square, to: Square, san: &str) -> ActionResult {
    let mut after = before.clone();
    after.pieces.retain(|p| p.square != to);
    if let Some(piece) = after.pieces.iter_mut().find(|p| p.square == from) {
        piece.square = to;
        piece.has_moved = true;
    }
    after.side_to_move = before.side_to_move.opponent();
    after.ply = before.ply + 1;
    let mut result = ActionResult::from_snapshots(before.clone(), after);
    result.meta.applied_notation = Some(Notation {
        uci: format!("{from}{to}"),
        san: Some(san.to_string()),
    });
    result
}

#[tokio::test]
async fn bootstrap_loads_state_definitions_and_moves() {
    let mut client = Client::new();
    let e2e4 = Move::new(sq("e2"), sq("e4"));
    client.boot(Snapshot::standard(), vec![e2e4.clone()]).await;

    assert_eq!(client.renderer.pieces().len(), 32);
    assert_eq!(client.renderer.active_tweens(), 0);
    assert!(client.orch.definitions().is_some());
    assert_eq!(client.orch.legal_moves(), &[e2e4]);
    assert_eq!(
        client.api.calls(),
        vec![ApiRequest::Definitions, ApiRequest::State, ApiRequest::LegalMoves]
    );
}

#[tokio::test]
async fn move_animates_records_history_and_refreshes_moves() {
    let mut client = Client::new();
    let e2e4 = Move::new(sq("e2"), sq("e4"));
    client.boot(Snapshot::standard(), vec![e2e4.clone()]).await;

    let result = advance(client.store.current(), sq("e2"), sq("e4"), "e4");
    client
        .api
        .push_outcome(Outcome::Result(Box::new(result)))
        .push(Ok(ApiReply::LegalMoves(vec![])));

    client
        .orch
        .tap(sq("e2"), &mut client.store, &mut client.renderer)
        .unwrap();
    client
        .orch
        .tap(sq("e4"), &mut client.store, &mut client.renderer)
        .unwrap();
    client.pump().await;

    assert_eq!(client.orch.state(), &OrchestratorState::AnimationPlaying);
    let rejected = client.orch.undo(&mut client.renderer).unwrap_err();
    assert!(matches!(rejected, SubmitError::Busy(_)));

    client.settle_animations();
    assert!(client.orch.is_idle());
    let pawn = client.renderer.piece(PieceId(10)).unwrap();
    assert_eq!(pawn.square, sq("e4"));
    assert_eq!(pawn.scale, 1.0);
    assert_eq!(client.store.history().len(), 1);
    assert_eq!(client.store.history()[0].notation, "e4");
    assert_eq!(client.api.call_count(), 5);
}

#[tokio::test]
async fn decision_chain_then_result() {
    let mut client = Client::new();
    let capture = Move::new(sq("d5"), sq("e6"));
    let mut start = Snapshot::standard();
    if let Some(p) = start.pieces.iter_mut().find(|p| p.uid == PieceId(14)) {
        p.square = sq("d5");
    }
    if let Some(p) = start.pieces.iter_mut().find(|p| p.uid == PieceId(26)) {
        p.square = sq("e6");
    }
    client.boot(start.clone(), vec![capture.clone()]).await;

    let pending = PendingDecision {
        id: "dk-1".to_string(),
        kind: DecisionKind::DoubleKillTarget,
        prompt: "Choose Double Kill target".to_string(),
        context: Default::default(),
        options: vec![
            DecisionOption {
                id: "28".to_string(),
                label: "Pawn @ f7".to_string(),
                kind: Some("Pawn".to_string()),
                target_id: Some(PieceId(28)),
                to_square: None,
                sq: Some(sq("f7")),
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
    };
    let mid = advance(&start, sq("d5"), sq("e6"), "dxe6").after;
    let mut done = advance(&start, sq("d5"), sq("e6"), "dxe6");
    done.after.pieces.retain(|p| p.uid != PieceId(28));
    done.diff = game_core::SnapshotDiff::between(&mid, &done.after);

    client
        .api
        .push_outcome(Outcome::Pending {
            pending,
            state: Box::new(mid),
        })
        .push_outcome(Outcome::Result(Box::new(done)))
        .push(Ok(ApiReply::LegalMoves(vec![])));

    client
        .orch
        .submit_move(capture, &mut client.store, &mut client.renderer)
        .unwrap();
    client.pump().await;
    assert!(client.orch.pending().is_some());
    assert!(client.renderer.piece(PieceId(26)).is_some_and(|p| p.leaving) || client.renderer.piece(PieceId(26)).is_none());

    client
        .orch
        .tap(sq("f7"), &mut client.store, &mut client.renderer)
        .unwrap();
    client.pump().await;
    client.settle_animations();

    assert!(client.orch.is_idle());
    assert!(client.renderer.piece(PieceId(28)).is_none());
    assert!(client.renderer.piece(PieceId(26)).is_none());
    assert_eq!(client.orch.chain_depth(), 0);
    assert!(!client.store.has_checkpoint());
}

#[tokio::test]
async fn cancel_rolls_back_to_the_pre_submission_snapshot() {
    let mut client = Client::new();
    let e2e4 = Move::new(sq("e2"), sq("e4"));
    client.boot(Snapshot::standard(), vec![e2e4.clone()]).await;
    let original = (**client.store.current()).clone();

    let pending = PendingDecision {
        id: "bp".to_string(),
        kind: DecisionKind::BlockPathDir,
        prompt: "Block which direction?".to_string(),
        context: Default::default(),
        options: vec![],
    };
    client
        .api
        .push_outcome(Outcome::Pending {
            pending,
            state: Box::new(advance(&original, sq("e2"), sq("e4"), "e4").after),
        })
        .push_snapshot(original.clone())
        .push(Ok(ApiReply::LegalMoves(vec![e2e4.clone()])));

    client
        .orch
        .submit_move(e2e4, &mut client.store, &mut client.renderer)
        .unwrap();
    client.pump().await;
    client.orch.cancel_decision().unwrap();
    client.pump().await;

    assert!(client.orch.is_idle());
    assert_eq!(**client.store.current(), original);
    assert_eq!(client.renderer.piece(PieceId(10)).unwrap().square, sq("e2"));
    assert_eq!(client.renderer.active_tweens(), 0);
}

#[tokio::test]
async fn engine_rejection_becomes_a_notice() {
    let mut client = Client::new();
    let e2e4 = Move::new(sq("e2"), sq("e4"));
    client.boot(Snapshot::standard(), vec![e2e4.clone()]).await;
    client
        .api
        .push_error(ApiError::Server("Not your turn".to_string()));

    client
        .orch
        .submit_move(e2e4, &mut client.store, &mut client.renderer)
        .unwrap();
    client.pump().await;

    assert!(client.orch.is_idle());
    let notice = client.orch.notices().current().unwrap();
    assert_eq!(notice.text, "Not your turn");
    assert_eq!(client.store.current().ply, 0);
}

#[tokio::test]
async fn topup_respects_the_offer() {
    let mut client = Client::new();
    let mut snapshot = Snapshot::standard();
    snapshot.arcane = Some(SideMap {
        white: LoadoutConfig {
            items: vec![ItemId::SolarNecklace],
            ..LoadoutConfig::default()
        },
        black: LoadoutConfig::default(),
    });
    let mut resources = ResourceState {
        solar_uses: SideMap { white: 1, black: 0 },
        solar_max: 1,
        necro_max: SideMap { white: 1, black: 0 },
        necro_pool: SideMap { white: 1, black: 0 },
        ..ResourceState::default()
    };
    resources.redo_max.insert(PieceId(2), 1);
    snapshot.arcane_state = Some(resources);
    client.boot(snapshot.clone(), vec![]).await;

    assert_eq!(
        client
            .orch
            .submit_topup(TopupKind::Necro, None, &client.store),
        Err(SubmitError::TopupUnavailable)
    );

    let mut after = snapshot.clone();
    if let Some(state) = after.arcane_state.as_mut() {
        state.redo_charges.insert(PieceId(2), 1);
        state.solar_uses.white = 0;
    }
    client
        .api
        .push_result(ActionResult::from_snapshots(snapshot, after))
        .push(Ok(ApiReply::LegalMoves(vec![])));
    client
        .orch
        .submit_topup(TopupKind::Redo, Some(PieceId(2)), &client.store)
        .unwrap();
    client.pump().await;
    client.settle_animations();

    assert!(client.orch.topup_offer(&client.store).is_none());
    assert_eq!(
        client.api.calls().last(),
        Some(&ApiRequest::LegalMoves)
    );
    assert!(client.api.calls().contains(&ApiRequest::Topup {
        kind: TopupKind::Redo,
        target: Some(PieceId(2)),
    }));
}
