//! Module trait - the capability interface the router requires from
//! every pluggable I/O module.
//!
//! Defines a unified interface so the router can bind paths to source
//! modules and build per-sink delivery handlers without knowing
//! anything about the transports behind them.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;

use crate::{ContractError, Datum, PathConfig, SinkEntry};

/// Reply produced by one sink for one delivered datum.
///
/// The shape is module-defined; the router only collects replies.
pub type SinkReply = Value;

/// Per-sink delivery function, built once per `send_to` entry.
pub type SinkHandler =
    Arc<dyn Fn(Datum) -> BoxFuture<'static, Result<SinkReply, ContractError>> + Send + Sync>;

/// Per-path fan-out function installed by the router.
///
/// The owning module invokes it once per inbound datum. It never fails:
/// individual sink failures are logged and dropped from the returned
/// replies, which are ordered by `send_to` position.
pub type DispatchHandler = Arc<dyn Fn(Datum) -> BoxFuture<'static, Vec<SinkReply>> + Send + Sync>;

/// Capability interface for pluggable I/O modules.
///
/// A module owns a transport or protocol, claims a set of paths, and
/// can act as a source (feeding data into the [`DispatchHandler`] given
/// to [`Module::listen`]), as a sink (via [`Module::sink_handler`]), or
/// both. Modules are created and owned outside the router; the router
/// only references them by name.
#[async_trait]
pub trait Module: Send + Sync {
    /// Unique module name
    fn name(&self) -> &str;

    /// Pure membership test: does this module own `path`?
    ///
    /// Claim logic (prefix match, pattern, ...) is the module's own
    /// responsibility and opaque to the router.
    fn owns_path(&self, path: &str) -> bool;

    /// Apply module-wide settings. Side effects are module-defined.
    fn set_global_config(&self, config: &Value);

    /// Begin listening for data on `path`, invoking `on_data` once per
    /// inbound datum.
    ///
    /// # Errors
    /// Returns an error when the listen setup fails (bad per-path
    /// settings, transport failure, ...).
    async fn listen(
        &self,
        path: &str,
        config: &PathConfig,
        on_data: DispatchHandler,
    ) -> Result<(), ContractError>;

    /// Build a per-sink delivery handler from one `send_to` entry.
    ///
    /// # Errors
    /// Returns an error when the entry's settings are unusable; the
    /// router drops such entries at handler construction time.
    fn sink_handler(&self, config: &SinkEntry) -> Result<SinkHandler, ContractError>;

    /// Run the module's own processing loop.
    ///
    /// Failures here are fatal to the router's run call and are not
    /// isolated from the other modules.
    async fn run(&self) -> Result<(), ContractError>;
}
