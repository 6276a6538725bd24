use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::sources::{MotionSource, StepSource};
use crate::store::SleepStore;

use super::loop_worker::refresh_loop;

/// Owns the daily refresh task: one running loop at a time, cancelled and
/// joined on stop.
pub struct RefreshController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl RefreshController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn start(
        &mut self,
        store: SleepStore,
        motion: Arc<dyn MotionSource>,
        steps: Arc<dyn StepSource>,
    ) -> Result<()> {
        if self.handle.is_some() {
            bail!("refresh loop already active");
        }

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        let handle = tokio::spawn(refresh_loop(store, motion, steps, token_clone));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("refresh loop task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}
