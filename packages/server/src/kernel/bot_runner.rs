//! Bot runner - long-polls Telegram and dispatches updates.
//!
//! ```text
//! BotRunner
//!     │
//!     ├─► poll(offset)            (getUpdates long poll)
//!     ├─► BotEvent::from_update   (drop what the bot ignores)
//!     └─► tokio::spawn(handle_event) per update
//! ```
//!
//! Each update is an independent task; ordering between updates is not
//! preserved and nothing is shared in memory between them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::bot::{handle_event, BotEvent};
use crate::kernel::{BaseUpdateSource, ServerDeps};

/// Configuration for the bot runner.
#[derive(Debug, Clone)]
pub struct BotRunnerConfig {
    /// Long-poll timeout passed to getUpdates
    pub poll_timeout_secs: u64,
    /// Pause after a failed poll
    pub error_backoff: Duration,
}

impl Default for BotRunnerConfig {
    fn default() -> Self {
        Self {
            poll_timeout_secs: 30,
            error_backoff: Duration::from_secs(3),
        }
    }
}

pub struct BotRunner {
    source: Arc<dyn BaseUpdateSource>,
    deps: Arc<ServerDeps>,
    config: BotRunnerConfig,
    shutdown: Arc<AtomicBool>,
}

impl BotRunner {
    pub fn new(source: Arc<dyn BaseUpdateSource>, deps: Arc<ServerDeps>) -> Self {
        Self::with_config(source, deps, BotRunnerConfig::default())
    }

    pub fn with_config(
        source: Arc<dyn BaseUpdateSource>,
        deps: Arc<ServerDeps>,
        config: BotRunnerConfig,
    ) -> Self {
        Self {
            source,
            deps,
            config,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Call `store(true, Ordering::SeqCst)` on the returned flag to stop the
    /// runner after its current poll.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Poll until shutdown is requested.
    pub async fn run(self) -> Result<()> {
        info!(
            poll_timeout_secs = self.config.poll_timeout_secs,
            "bot runner starting"
        );

        let mut offset = None;
        while !self.is_shutdown_requested() {
            match self.poll_once(offset).await {
                Ok((next_offset, _handles)) => offset = next_offset,
                Err(e) => {
                    error!(error = %e, "failed to poll telegram updates");
                    tokio::time::sleep(self.config.error_backoff).await;
                }
            }
        }

        info!("bot runner stopped");
        Ok(())
    }

    /// One getUpdates round. Returns the offset for the next round and the
    /// spawned handler tasks.
    pub async fn poll_once(
        &self,
        offset: Option<i64>,
    ) -> Result<(Option<i64>, Vec<JoinHandle<()>>)> {
        let updates = self
            .source
            .poll(offset, self.config.poll_timeout_secs)
            .await?;

        let mut next_offset = offset;
        let mut handles = Vec::with_capacity(updates.len());

        for update in updates {
            next_offset = next_offset.max(Some(update.update_id + 1));

            let Some(event) = BotEvent::from_update(&update) else {
                debug!(update_id = update.update_id, "ignoring update");
                continue;
            };

            let deps = self.deps.clone();
            let update_id = update.update_id;
            handles.push(tokio::spawn(async move {
                let chat_id = event.chat_id();
                if let Err(e) = handle_event(event, &deps).await {
                    warn!(update_id, chat_id, error = %e, "failed to handle bot update");
                }
            }));
        }

        Ok((next_offset, handles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::messages;
    use crate::config::VerificationPolicy;
    use crate::kernel::test_dependencies::{MockChatMessenger, SentMessage};
    use crate::kernel::Sha256CodeHasher;
    use async_trait::async_trait;
    use sqlx::PgPool;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use telegram::models::Update;

    struct ScriptedSource {
        batches: Mutex<VecDeque<Result<Vec<Update>>>>,
        offsets: Mutex<Vec<Option<i64>>>,
    }

    impl ScriptedSource {
        fn new(batches: Vec<Result<Vec<Update>>>) -> Self {
            Self {
                batches: Mutex::new(batches.into()),
                offsets: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl BaseUpdateSource for ScriptedSource {
        async fn poll(&self, offset: Option<i64>, _timeout_secs: u64) -> Result<Vec<Update>> {
            self.offsets.lock().unwrap().push(offset);
            self.batches
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn start_update(update_id: i64, chat_id: i64) -> Update {
        serde_json::from_value(serde_json::json!({
            "update_id": update_id,
            "message": {
                "message_id": update_id,
                "chat": {"id": chat_id},
                "from": {"id": chat_id, "is_bot": false},
                "text": "/start"
            }
        }))
        .unwrap()
    }

    fn deps(messenger: &MockChatMessenger) -> Arc<ServerDeps> {
        // Handlers exercised here never reach the database
        let pool = PgPool::connect_lazy("postgres://localhost/unused").unwrap();
        Arc::new(ServerDeps::new(
            pool,
            Arc::new(messenger.clone()),
            Arc::new(Sha256CodeHasher::new()),
            VerificationPolicy::default(),
            None,
        ))
    }

    #[tokio::test]
    async fn test_poll_once_dispatches_and_advances_offset() {
        let messenger = MockChatMessenger::new();
        let source = Arc::new(ScriptedSource::new(vec![Ok(vec![
            start_update(40, 1),
            start_update(41, 2),
        ])]));
        let runner = BotRunner::new(source.clone(), deps(&messenger));

        let (offset, handles) = runner.poll_once(None).await.unwrap();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(offset, Some(42));
        assert_eq!(
            messenger.last_to(1),
            Some(SentMessage::Text {
                chat_id: 1,
                text: messages::START_USAGE.to_string()
            })
        );
        assert!(messenger.last_to(2).is_some());
    }

    #[tokio::test]
    async fn test_empty_poll_keeps_offset() {
        let messenger = MockChatMessenger::new();
        let source = Arc::new(ScriptedSource::new(vec![]));
        let runner = BotRunner::new(source.clone(), deps(&messenger));

        let (offset, handles) = runner.poll_once(Some(7)).await.unwrap();
        assert_eq!(offset, Some(7));
        assert!(handles.is_empty());
        assert_eq!(source.offsets.lock().unwrap().as_slice(), &[Some(7)]);
    }

    #[tokio::test]
    async fn test_poll_error_is_returned() {
        let messenger = MockChatMessenger::new();
        let source = Arc::new(ScriptedSource::new(vec![Err(anyhow::anyhow!("timeout"))]));
        let runner = BotRunner::new(source, deps(&messenger));
        assert!(runner.poll_once(None).await.is_err());
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let messenger = MockChatMessenger::new();
        let source = Arc::new(ScriptedSource::new(vec![]));
        let runner = BotRunner::new(source, deps(&messenger));
        runner.shutdown_handle().store(true, Ordering::SeqCst);
        runner.run().await.unwrap();
    }
}
