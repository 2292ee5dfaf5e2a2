//! Command implementations.

mod info;
mod run;
mod validate;

pub use info::run_info;
pub use run::run_router;
pub use validate::run_validate;

/// Module names the `run` command registers out of the box
const BUILTIN_MODULES: &[&str] = &["timer", "echo"];

fn is_module_key(key: &str) -> bool {
    BUILTIN_MODULES.contains(&key)
}
