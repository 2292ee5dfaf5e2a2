//! Dispatch handler factory - per-path settle-all fan-out
//!
//! Resolution happens once, at construction time: unresolvable or
//! malformed `send_to` entries are dropped here, never at delivery
//! time. Delivery runs every retained sink concurrently and aggregates
//! replies in `send_to` order.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::time::timeout;
use tracing::{error, warn};

use contracts::{ContractError, Datum, DispatchHandler, Module, PathConfig, SinkHandler};

use crate::metrics::DispatchMetrics;

/// One resolved `send_to` entry, retained by the dispatch handler.
struct ResolvedSink {
    /// Original position in `send_to`
    index: usize,
    /// Sink module name
    module: String,
    /// Per-delivery deadline, `None` = unbounded
    deadline: Option<Duration>,
    /// Delivery function built by the sink module
    handler: SinkHandler,
}

/// Build the dispatch handler for one path.
///
/// Construction never fails: entries that lack a `module` field,
/// reference an unregistered module, or are rejected by the sink
/// module are reported and skipped. An empty or absent `send_to` list
/// yields a no-op handler that always resolves to an empty reply list.
///
/// The returned handler fans each datum out to every retained sink
/// concurrently. One sink failing, hanging past its deadline, or
/// panicking never cancels or blocks its siblings; failed deliveries
/// are logged and omitted from the aggregated replies, which keep
/// `send_to` order regardless of completion order.
pub fn build_dispatch_handler(
    path: &str,
    config: &PathConfig,
    modules: &[Arc<dyn Module>],
    modules_by_name: &HashMap<String, usize>,
    default_deadline: Option<Duration>,
    metrics: Arc<DispatchMetrics>,
) -> DispatchHandler {
    if config.send_to.is_empty() {
        warn!(path, "path has no 'send_to' entries, fan-out disabled");
        return Arc::new(|_datum: Datum| async { Vec::new() }.boxed());
    }

    let mut sinks: Vec<ResolvedSink> = Vec::with_capacity(config.send_to.len());
    for (index, entry) in config.send_to.iter().enumerate() {
        let Some(name) = entry.module.as_deref() else {
            error!(path, index, "send_to entry is missing 'module', skipping");
            continue;
        };

        let Some(&module_index) = modules_by_name.get(name) else {
            error!(
                path,
                index,
                module = name,
                "send_to references unknown module, skipping"
            );
            continue;
        };

        match modules[module_index].sink_handler(entry) {
            Ok(handler) => sinks.push(ResolvedSink {
                index,
                module: name.to_string(),
                deadline: resolve_deadline(entry.timeout_ms, default_deadline),
                handler,
            }),
            Err(e) => {
                error!(
                    path,
                    index,
                    module = name,
                    error = %e,
                    "sink handler construction failed, skipping"
                );
            }
        }
    }

    let path: Arc<str> = Arc::from(path);
    let sinks: Arc<[ResolvedSink]> = sinks.into();

    Arc::new(move |datum: Datum| {
        let path = Arc::clone(&path);
        let sinks = Arc::clone(&sinks);
        let metrics = Arc::clone(&metrics);

        async move {
            metrics.inc_dispatched();

            // Start every delivery as its own task before awaiting any
            // of them; a slow or failing sink must not hold up its
            // siblings.
            let mut pending = Vec::with_capacity(sinks.len());
            for sink in sinks.iter() {
                let fut = (sink.handler)(datum.clone());
                let module = sink.module.clone();
                let task_path = Arc::clone(&path);
                let deadline = sink.deadline;

                let join = tokio::spawn(async move {
                    match deadline {
                        Some(limit) => match timeout(limit, fut).await {
                            Ok(result) => result,
                            Err(_) => Err(ContractError::DeliveryTimeout {
                                module,
                                path: task_path.to_string(),
                                waited_ms: limit.as_millis() as u64,
                            }),
                        },
                        None => fut.await,
                    }
                });

                pending.push((sink.index, sink.module.clone(), join));
            }

            // Settle-all: await every task and reassemble replies by
            // original send_to position, dropping failures.
            let mut replies = Vec::with_capacity(pending.len());
            for (index, module, join) in pending {
                match join.await {
                    Ok(Ok(reply)) => {
                        metrics.inc_delivered();
                        replies.push(reply);
                    }
                    Ok(Err(e)) => {
                        metrics.inc_failed();
                        if matches!(e, ContractError::DeliveryTimeout { .. }) {
                            metrics.inc_timed_out();
                        }
                        warn!(
                            path = %path,
                            module = %module,
                            index,
                            error = %e,
                            "sink delivery failed"
                        );
                    }
                    Err(e) => {
                        metrics.inc_failed();
                        warn!(
                            path = %path,
                            module = %module,
                            index,
                            error = %e,
                            "sink delivery task panicked"
                        );
                    }
                }
            }

            replies
        }
        .boxed()
    })
}

/// Resolve the effective deadline for one sink entry.
///
/// `timeout_ms = 0` disables the deadline for that sink entirely.
fn resolve_deadline(timeout_ms: Option<u64>, default: Option<Duration>) -> Option<Duration> {
    match timeout_ms {
        Some(0) => None,
        Some(ms) => Some(Duration::from_millis(ms)),
        None => default,
    }
}
