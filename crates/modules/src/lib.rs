//! # Modules
//!
//! Built-in reference modules, usable without any external
//! infrastructure:
//!
//! - [`TimerModule`] - source module claiming `/timer/...` paths,
//!   emitting ticks at a configurable interval
//! - [`EchoModule`] - sink-only module logging every delivered datum
//!   and replying with a small JSON ack
//!
//! Real deployments plug in their own transports behind
//! `contracts::Module`; these two exist so the binary runs end-to-end
//! out of the box and integration tests have something concrete to
//! route between.

mod echo;
mod timer;

pub use echo::EchoModule;
pub use timer::TimerModule;
