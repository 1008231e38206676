//! Event loop orchestrating engine replies, user input, and rendering.
use std::sync::Arc;

use anyhow::Result;
use client_api::{ApiError, ApiReply, GameApi, dispatch};
use client_frontend_core::{DecisionOrchestrator, FrontendConfig, Renderer, SnapshotStore};
use game_core::Snapshot;
use tokio::{
    sync::oneshot,
    time::{self, Duration, Instant},
};

use crate::{
    config::CliConfig,
    input::InputHandler,
    presentation::{pixels::PixelSurface, terminal::Tui},
    state::AppState,
};

type ReplyRx = oneshot::Receiver<Result<ApiReply, ApiError>>;

/// Owns every piece of client state and drives it from one task, so nothing
/// here needs locking. Engine calls run on spawned tasks and report back
/// through a oneshot channel.
pub struct EventLoop {
    pub(crate) api: Arc<dyn GameApi>,
    pub(crate) store: SnapshotStore,
    pub(crate) renderer: Renderer,
    pub(crate) surface: PixelSurface,
    pub(crate) orchestrator: DecisionOrchestrator,
    pub(crate) input: InputHandler,
    pub(crate) app_state: AppState,
    pub(crate) cli_config: CliConfig,
    pub(crate) message_limit: usize,
    last_frame: Instant,
}

impl EventLoop {
    pub fn new(api: Arc<dyn GameApi>, frontend_config: &FrontendConfig, cli_config: CliConfig) -> Self {
        let mut app_state = AppState::new(frontend_config.loadout.clone());
        app_state.seed = cli_config.seed;

        Self {
            api,
            store: SnapshotStore::new(Snapshot::empty()),
            renderer: Renderer::new(frontend_config.animation.clone(), frontend_config.sprites),
            surface: PixelSurface::new(0, 0),
            orchestrator: DecisionOrchestrator::new(frontend_config),
            input: InputHandler::new(),
            app_state,
            message_limit: frontend_config.messages.capacity,
            cli_config,
            last_frame: Instant::now(),
        }
    }

    pub async fn run(mut self, terminal: &mut Tui) -> Result<()> {
        self.orchestrator.bootstrap();
        self.render(terminal)?;

        let mut frames = time::interval(self.cli_config.ui.frame_interval);
        frames.set_missed_tick_behavior(time::MissedTickBehavior::Skip);
        let mut reply_rx: Option<ReplyRx> = None;

        loop {
            if reply_rx.is_none() {
                reply_rx = self.dispatch_next();
            }

            tokio::select! {
                reply = recv_reply(&mut reply_rx), if reply_rx.is_some() => {
                    reply_rx = None;
                    self.orchestrator.complete(reply, &mut self.store, &mut self.renderer);
                    self.render(terminal)?;
                }
                _ = frames.tick() => {
                    if self.handle_frame_tick(terminal)? {
                        break;
                    }
                }
            }
        }

        tracing::info!("event loop finished");
        Ok(())
    }

    /// Sends the orchestrator's next request, if it has one and nothing is
    /// outstanding.
    fn dispatch_next(&mut self) -> Option<ReplyRx> {
        let request = self.orchestrator.next_request()?;
        let (tx, rx) = oneshot::channel();
        let api = Arc::clone(&self.api);
        tokio::spawn(async move {
            let reply = dispatch(api.as_ref(), &request).await;
            if tx.send(reply).is_err() {
                tracing::debug!(%request, "reply dropped after shutdown");
            }
        });
        Some(rx)
    }

    /// One frame: input, animation clock, notices, draw.
    fn handle_frame_tick(&mut self, terminal: &mut Tui) -> Result<bool> {
        let now = Instant::now();
        let dt: Duration = now.duration_since(self.last_frame);
        self.last_frame = now;

        if self.handle_terminal_events()? {
            return Ok(true);
        }

        self.renderer.step(dt);
        self.orchestrator.tick(dt, &self.renderer);
        self.close_stale_popups();
        self.render(terminal)?;
        Ok(false)
    }
}

async fn recv_reply(rx: &mut Option<ReplyRx>) -> Result<ApiReply, ApiError> {
    match rx {
        Some(rx) => rx
            .await
            .unwrap_or_else(|_| Err(ApiError::Network("engine task ended without replying".to_string()))),
        None => std::future::pending().await,
    }
}
