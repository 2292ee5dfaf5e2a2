//! EchoModule - sink that logs deliveries and acks them
//!
//! Sink-only counterpart to the timer: claims no paths, but any path
//! can list it in `send_to`. Each delivered datum is logged via
//! tracing and answered with a small JSON ack.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use serde_json::{json, Value};
use tracing::info;

use contracts::{
    ContractError, Datum, DispatchHandler, Module, PathConfig, SinkEntry, SinkHandler,
};

/// Sink-only module echoing every delivery.
///
/// Sink entry config:
/// - `tag` - free-form string included in the ack (default: none)
///
/// Global config:
/// - `log_payload` - also log the payload as lossy UTF-8 (default: false)
pub struct EchoModule {
    name: String,
    log_payload: AtomicBool,
    delivered: Arc<AtomicU64>,
}

impl EchoModule {
    /// Create an echo module named "echo"
    pub fn new() -> Self {
        Self::named("echo")
    }

    /// Create an echo module with a custom name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            log_payload: AtomicBool::new(false),
            delivered: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Total data delivered to this module across all sinks
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }
}

impl Default for EchoModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for EchoModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn owns_path(&self, _path: &str) -> bool {
        false
    }

    fn set_global_config(&self, config: &Value) {
        if let Some(flag) = config.get("log_payload").and_then(Value::as_bool) {
            self.log_payload.store(flag, Ordering::SeqCst);
        }
    }

    async fn listen(
        &self,
        path: &str,
        _config: &PathConfig,
        _on_data: DispatchHandler,
    ) -> Result<(), ContractError> {
        // Unreachable through the router, which only calls listen on
        // the module that claimed the path.
        Err(ContractError::listen(
            &self.name,
            path,
            "echo module does not own paths",
        ))
    }

    fn sink_handler(&self, config: &SinkEntry) -> Result<SinkHandler, ContractError> {
        let tag = config
            .param("tag")
            .and_then(Value::as_str)
            .map(str::to_string);
        let name = self.name.clone();
        let delivered = Arc::clone(&self.delivered);
        let log_payload = self.log_payload.load(Ordering::SeqCst);

        Ok(Arc::new(move |datum: Datum| {
            let tag = tag.clone();
            let name = name.clone();
            let delivered = Arc::clone(&delivered);
            async move {
                let count = delivered.fetch_add(1, Ordering::Relaxed) + 1;

                if log_payload {
                    info!(
                        module = %name,
                        path = %datum.path,
                        bytes = datum.payload.len(),
                        payload = %String::from_utf8_lossy(&datum.payload),
                        "datum echoed"
                    );
                } else {
                    info!(
                        module = %name,
                        path = %datum.path,
                        bytes = datum.payload.len(),
                        "datum echoed"
                    );
                }

                let mut ack = json!({
                    "module": name,
                    "path": datum.path,
                    "bytes": datum.payload.len(),
                    "delivered": count,
                });
                if let Some(tag) = tag {
                    ack["tag"] = json!(tag);
                }
                Ok(ack)
            }
            .boxed()
        }))
    }

    async fn run(&self) -> Result<(), ContractError> {
        // Purely reactive; nothing to drive.
        Ok(())
    }
}
