//! TimerModule - tick source for demos and tests
//!
//! Claims every path under its prefix and emits a tick datum per
//! interval to the dispatch handler installed by the router. Data is
//! produced on background tasks, one per listened path, consistent
//! with how transport modules deliver inbound traffic.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{json, Value};
use tokio::sync::Notify;
use tokio::time::interval;
use tracing::{debug, trace};

use contracts::{ContractError, Datum, DispatchHandler, Module, PathConfig, SinkEntry};

const DEFAULT_INTERVAL_MS: u64 = 1000;

/// Source module emitting ticks on `/timer/...` paths.
///
/// Per-path config:
/// - `interval_ms` - tick period (default: global `default_interval_ms`)
/// - `max_ticks` - stop after this many ticks (default: unbounded)
///
/// Global config:
/// - `default_interval_ms` - fallback tick period
pub struct TimerModule {
    name: String,
    prefix: String,
    default_interval_ms: AtomicU64,
    stopped: Arc<AtomicBool>,
    stop_notify: Arc<Notify>,
}

impl TimerModule {
    /// Create a timer module named "timer" claiming `/timer/`
    pub fn new() -> Self {
        Self::with_prefix("timer", "/timer/")
    }

    /// Create a timer module with a custom name and path prefix
    pub fn with_prefix(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            default_interval_ms: AtomicU64::new(DEFAULT_INTERVAL_MS),
            stopped: Arc::new(AtomicBool::new(false)),
            stop_notify: Arc::new(Notify::new()),
        }
    }

    /// Stop all tick tasks and complete the run loop
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.stop_notify.notify_waiters();
    }
}

impl Default for TimerModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for TimerModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn owns_path(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }

    fn set_global_config(&self, config: &Value) {
        if let Some(ms) = config.get("default_interval_ms").and_then(Value::as_u64) {
            debug!(module = %self.name, default_interval_ms = ms, "global config applied");
            self.default_interval_ms.store(ms, Ordering::SeqCst);
        }
    }

    async fn listen(
        &self,
        path: &str,
        config: &PathConfig,
        on_data: DispatchHandler,
    ) -> Result<(), ContractError> {
        let interval_ms = config
            .param("interval_ms")
            .and_then(Value::as_u64)
            .unwrap_or_else(|| self.default_interval_ms.load(Ordering::SeqCst));
        if interval_ms == 0 {
            return Err(ContractError::listen(
                &self.name,
                path,
                "interval_ms must be > 0",
            ));
        }
        let max_ticks = config.param("max_ticks").and_then(Value::as_u64);

        let path = path.to_string();
        let stopped = Arc::clone(&self.stopped);
        debug!(module = %self.name, path = %path, interval_ms, "tick task starting");

        tokio::spawn(async move {
            let mut ticker = interval(Duration::from_millis(interval_ms));
            let mut tick: u64 = 0;

            loop {
                ticker.tick().await;
                if stopped.load(Ordering::SeqCst) {
                    break;
                }
                if max_ticks.is_some_and(|max| tick >= max) {
                    break;
                }

                let payload = json!({ "tick": tick, "interval_ms": interval_ms });
                let datum = Datum::new(path.clone(), Bytes::from(payload.to_string()))
                    .with_attribute("content_type", "application/json");

                trace!(path = %path, tick, "tick emitted");
                let replies = on_data(datum).await;
                trace!(path = %path, tick, replies = replies.len(), "tick settled");

                tick += 1;
            }

            debug!(path = %path, ticks = tick, "tick task stopped");
        });

        Ok(())
    }

    fn sink_handler(&self, _config: &SinkEntry) -> Result<contracts::SinkHandler, ContractError> {
        // The timer only produces data.
        Err(ContractError::sink_setup(
            &self.name,
            "timer module cannot act as a sink",
        ))
    }

    async fn run(&self) -> Result<(), ContractError> {
        // Ticking happens on the per-path tasks spawned by listen; the
        // run loop only keeps the module alive until stop().
        loop {
            let notified = self.stop_notify.notified();
            if self.stopped.load(Ordering::SeqCst) {
                return Ok(());
            }
            notified.await;
        }
    }
}
