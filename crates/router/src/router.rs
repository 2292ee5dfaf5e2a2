//! Router facade - module registry, path registry, and path binding
//!
//! Owns the only shared mutable state in the system: the module
//! registry and the path registry. Registration entry points take
//! `&mut self`, which serializes mutation; `run` and the installed
//! dispatch handlers only need shared access.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future;
use tracing::{debug, error, info, instrument, warn};

use contracts::{DispatchHandler, Module, PathConfig, RouterConfig};

use crate::dispatch::build_dispatch_handler;
use crate::error::RouterError;
use crate::metrics::{DispatchMetrics, DispatchSnapshot};

/// Router tuning knobs
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Default per-sink delivery deadline. Individual sink entries
    /// override it via `timeout_ms`; a value of 0 there disables the
    /// deadline for that sink.
    pub sink_timeout: Option<Duration>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            sink_timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// One registered path: its owning module and its installed dispatch
/// handler.
pub struct PathEntry {
    module_index: usize,
    on_data: DispatchHandler,
    metrics: Arc<DispatchMetrics>,
}

impl PathEntry {
    /// Index of the owning module, in module registration order
    pub fn module_index(&self) -> usize {
        self.module_index
    }

    /// The installed dispatch handler
    pub fn on_data(&self) -> DispatchHandler {
        Arc::clone(&self.on_data)
    }

    /// Snapshot of this path's dispatch metrics
    pub fn metrics(&self) -> DispatchSnapshot {
        self.metrics.snapshot()
    }
}

/// The data-path router.
///
/// Binds each path to the one module that claims it and fans received
/// data out to the path's configured sink modules. The router never
/// constructs modules and performs no I/O of its own.
pub struct Router {
    /// Registered modules, in registration order
    modules: Vec<Arc<dyn Module>>,
    /// Module name -> index into `modules`
    modules_by_name: HashMap<String, usize>,
    /// Path name -> owner + dispatch handler
    paths: HashMap<String, PathEntry>,
    options: RouterOptions,
}

impl Router {
    /// Create a router with default options
    pub fn new() -> Self {
        Self::with_options(RouterOptions::default())
    }

    /// Create a router with the given options
    pub fn with_options(options: RouterOptions) -> Self {
        Self {
            modules: Vec::new(),
            modules_by_name: HashMap::new(),
            paths: HashMap::new(),
            options,
        }
    }

    /// Add or replace a module by name.
    ///
    /// A module with a new name is appended; an existing name is
    /// replaced in place at its existing index, leaving every other
    /// module's index untouched.
    ///
    /// Replacement does not rebind paths registered earlier: their
    /// entries keep the previously resolved owner index and their
    /// dispatch handlers keep the sink handlers built by the old
    /// instance. Re-register a path to bind it against the new
    /// instance.
    pub fn set_module(&mut self, module: Arc<dyn Module>) {
        let name = module.name().to_string();
        match self.modules_by_name.get(&name) {
            Some(&index) => {
                debug!(module = %name, index, "replacing module in place");
                self.modules[index] = module;
            }
            None => {
                debug!(module = %name, index = self.modules.len(), "registering module");
                self.modules_by_name.insert(name, self.modules.len());
                self.modules.push(module);
            }
        }
    }

    /// Apply a bulk configuration.
    ///
    /// Keys naming a registered module carry that module's global
    /// configuration; every remaining key is treated as a path name.
    /// Module names take priority, so a key is never interpreted as
    /// both. Per-path failures are logged and skipped, never
    /// propagated; use [`Router::set_path`] directly to observe them.
    #[instrument(name = "router_set_config", skip_all, fields(keys = config.len()))]
    pub async fn set_config(&mut self, config: &RouterConfig) {
        // Phase 1: module-level (global) configuration.
        for module in &self.modules {
            if let Some(value) = config.get(module.name()) {
                debug!(module = module.name(), "applying global module config");
                module.set_global_config(value);
            }
        }

        // Phase 2: everything that is not a module name is a path.
        for (path, value) in config {
            if self.modules_by_name.contains_key(path.as_str()) {
                continue;
            }

            let path_config = match PathConfig::from_value(value) {
                Ok(c) => c,
                Err(e) => {
                    error!(path = %path, error = %e, "invalid path config, skipping");
                    continue;
                }
            };

            match self.set_path(path, &path_config).await {
                Ok(true) => {}
                Ok(false) => warn!(path = %path, "no module claims path, skipping"),
                Err(e) => error!(path = %path, error = %e, "path registration failed"),
            }
        }
    }

    /// Register a single path.
    ///
    /// Modules are scanned in registration order and the first one
    /// claiming the path wins. On a claim the dispatch handler is
    /// built from `config.send_to`, the owner is instructed to begin
    /// listening with the handler as callback, and the path entry is
    /// stored (overwriting any prior entry for the same path).
    ///
    /// Returns `Ok(false)` without mutating anything when no module
    /// claims the path.
    ///
    /// # Errors
    /// Returns an error only when the owning module's listen setup
    /// fails; the registry is left unchanged in that case. Handler
    /// construction itself never fails (bad sink entries degrade by
    /// omission).
    #[instrument(name = "router_set_path", skip(self, config))]
    pub async fn set_path(&mut self, path: &str, config: &PathConfig) -> Result<bool, RouterError> {
        for (module_index, module) in self.modules.iter().enumerate() {
            if !module.owns_path(path) {
                continue;
            }

            let metrics = Arc::new(DispatchMetrics::new());
            let on_data = build_dispatch_handler(
                path,
                config,
                &self.modules,
                &self.modules_by_name,
                self.options.sink_timeout,
                Arc::clone(&metrics),
            );

            module
                .listen(path, config, Arc::clone(&on_data))
                .await
                .map_err(|e| RouterError::listen(module.name(), path, e))?;

            self.paths.insert(
                path.to_string(),
                PathEntry {
                    module_index,
                    on_data,
                    metrics,
                },
            );
            debug!(module = module.name(), module_index, "path bound");

            return Ok(true);
        }

        Ok(false)
    }

    /// Build a dispatch handler for `path` without registering
    /// anything. The handler's metrics are not tracked by the router.
    pub fn create_dispatch_handler(&self, path: &str, config: &PathConfig) -> DispatchHandler {
        build_dispatch_handler(
            path,
            config,
            &self.modules,
            &self.modules_by_name,
            self.options.sink_timeout,
            Arc::new(DispatchMetrics::new()),
        )
    }

    /// Run every registered module's own run loop concurrently.
    ///
    /// Resolves when all run loops have completed. A single module
    /// failure propagates to the caller and is not isolated from the
    /// others, unlike per-delivery fan-out.
    #[instrument(name = "router_run", skip(self))]
    pub async fn run(&self) -> Result<(), RouterError> {
        info!(
            modules = self.modules.len(),
            paths = self.paths.len(),
            "starting module run loops"
        );

        let loops = self.modules.iter().map(|module| {
            let module = Arc::clone(module);
            async move {
                module
                    .run()
                    .await
                    .map_err(|e| RouterError::module_run(module.name(), e))
            }
        });

        future::try_join_all(loops).await?;
        Ok(())
    }

    /// Look up a module by name
    pub fn module(&self, name: &str) -> Option<&Arc<dyn Module>> {
        self.modules_by_name.get(name).map(|&i| &self.modules[i])
    }

    /// Index of a module, in registration order
    pub fn module_index(&self, name: &str) -> Option<usize> {
        self.modules_by_name.get(name).copied()
    }

    /// All registered modules, in registration order
    pub fn modules(&self) -> &[Arc<dyn Module>] {
        &self.modules
    }

    /// Look up a registered path
    pub fn path(&self, path: &str) -> Option<&PathEntry> {
        self.paths.get(path)
    }

    /// Name of the module owning `path`
    pub fn path_owner(&self, path: &str) -> Option<&str> {
        self.paths
            .get(path)
            .map(|entry| self.modules[entry.module_index].name())
    }

    /// Sorted list of registered path names
    pub fn paths(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.paths.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Dispatch metrics snapshots for every registered path, sorted by
    /// path name
    pub fn metrics(&self) -> Vec<(String, DispatchSnapshot)> {
        let mut out: Vec<(String, DispatchSnapshot)> = self
            .paths
            .iter()
            .map(|(path, entry)| (path.clone(), entry.metrics.snapshot()))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
