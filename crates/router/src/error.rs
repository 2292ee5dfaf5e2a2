//! Router error types

use contracts::ContractError;
use thiserror::Error;

/// Router-specific errors
#[derive(Debug, Error)]
pub enum RouterError {
    /// A module failed its listen setup during path registration
    #[error("module '{module}' failed to listen on path '{path}'")]
    Listen {
        module: String,
        path: String,
        #[source]
        source: ContractError,
    },

    /// A module run loop failed
    #[error("module '{module}' run loop failed")]
    ModuleRun {
        module: String,
        #[source]
        source: ContractError,
    },

    /// Contract-level error
    #[error("contract error: {0}")]
    Contract(#[from] ContractError),
}

impl RouterError {
    /// Create a listen error
    pub fn listen(module: impl Into<String>, path: impl Into<String>, source: ContractError) -> Self {
        Self::Listen {
            module: module.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a module run error
    pub fn module_run(module: impl Into<String>, source: ContractError) -> Self {
        Self::ModuleRun {
            module: module.into(),
            source,
        }
    }
}
