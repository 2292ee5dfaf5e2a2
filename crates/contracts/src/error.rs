//! Layered error definitions
//!
//! Categorized by source: config / resolution / delivery / module

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Resolution Errors =====
    /// A sink entry references a module name that is not registered
    #[error("module not found: {module}")]
    ModuleNotFound { module: String },

    /// A module could not build a sink handler from a sink entry
    #[error("module '{module}' cannot build sink handler: {message}")]
    SinkSetup { module: String, message: String },

    // ===== Delivery Errors =====
    /// A sink handler failed while delivering a datum
    #[error("sink '{module}' delivery failed on path '{path}': {message}")]
    Delivery {
        module: String,
        path: String,
        message: String,
    },

    /// A sink handler exceeded its delivery deadline
    #[error("sink '{module}' timed out on path '{path}' after {waited_ms}ms")]
    DeliveryTimeout {
        module: String,
        path: String,
        waited_ms: u64,
    },

    // ===== Module Errors =====
    /// A module failed to begin listening on a path
    #[error("module '{module}' failed to listen on path '{path}': {message}")]
    Listen {
        module: String,
        path: String,
        message: String,
    },

    /// A module's run loop failed
    #[error("module '{module}' run loop failed: {message}")]
    ModuleRun { module: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create module-not-found error
    pub fn module_not_found(module: impl Into<String>) -> Self {
        Self::ModuleNotFound {
            module: module.into(),
        }
    }

    /// Create sink setup error
    pub fn sink_setup(module: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkSetup {
            module: module.into(),
            message: message.into(),
        }
    }

    /// Create delivery error
    pub fn delivery(
        module: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Delivery {
            module: module.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create listen error
    pub fn listen(
        module: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Listen {
            module: module.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create module run error
    pub fn module_run(module: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ModuleRun {
            module: module.into(),
            message: message.into(),
        }
    }
}
