//! # Contracts
//!
//! Frozen interface contracts between the router core and the pluggable
//! I/O modules: the [`Module`] capability trait, the datum and
//! configuration shapes, and the unified error type.
//! All business crates depend only on this crate, reverse dependencies
//! are prohibited.
//!
//! ## Data Model
//! - A **path** is a named logical channel produced by exactly one module
//! - A **datum** is one unit of data on a path, with an opaque payload
//! - A **sink** is a module configured to receive fan-out data for a path

mod config;
mod datum;
mod error;
mod module;

pub use config::{PathConfig, RouterConfig, SinkEntry};
pub use datum::Datum;
pub use error::ContractError;
pub use module::{DispatchHandler, Module, SinkHandler, SinkReply};
