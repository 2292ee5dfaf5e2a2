//! # Router
//!
//! The data-path router core.
//!
//! Responsibilities:
//! - Bind each configured path to the one module that claims it
//! - Build per-path dispatch handlers that fan each datum out to the
//!   configured sinks (settle-all, failure isolated per sink)
//! - Start all module run loops
//!
//! The router performs no I/O itself; transports and protocols live in
//! the modules behind the `contracts::Module` trait.

pub mod dispatch;
pub mod error;
pub mod metrics;
pub mod router;

pub use contracts::{
    ContractError, Datum, DispatchHandler, Module, PathConfig, RouterConfig, SinkEntry,
    SinkHandler, SinkReply,
};
pub use dispatch::build_dispatch_handler;
pub use error::RouterError;
pub use metrics::{DispatchMetrics, DispatchSnapshot};
pub use router::{PathEntry, Router, RouterOptions};
