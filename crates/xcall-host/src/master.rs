//! Native master: owns the boundary and the reverse call result channel

use std::sync::Arc;

use crossbeam::channel::{unbounded, Receiver, Sender};
use xcall_runtime::{Boundary, BoundaryConfig};
use xcall_sdk::{
    BoundaryResult, CallContext, Export, MarshaledValue, Plugin, PluginInfo, Side, ToBoundary,
};

use crate::callbacks::{native_exports, CallLog};

/// Plugin id of the master
pub const MASTER_ID: u64 = 1;

/// Plugin name of the master
pub const MASTER_NAME: &str = "cross_call_master";

/// The native plugin contributing every `*Callback` and `DeliverResult`.
pub struct MasterPlugin {
    log: CallLog,
    results: Sender<String>,
}

impl MasterPlugin {
    /// Create a master plugin recording into `log` and delivering into
    /// `results`
    pub fn new(log: CallLog, results: Sender<String>) -> Self {
        Self { log, results }
    }
}

impl Plugin for MasterPlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo::new(MASTER_ID, MASTER_NAME, env!("CARGO_PKG_VERSION"))
            .with_description("Native callbacks and reverse call result sink")
    }

    fn exports(&self) -> Vec<Export> {
        native_exports(&self.log, self.results.clone())
    }

    fn on_start(&self, ctx: &dyn CallContext) -> BoundaryResult<()> {
        tracing::debug!(side = %ctx.side(), "master started");
        Ok(())
    }
}

/// A started boundary with the master on the native side and a worker on
/// the managed side.
///
/// Dropping the master runs every plugin's `on_end`.
pub struct CrossCallMaster {
    boundary: Boundary,
    results: Receiver<String>,
    log: CallLog,
}

impl CrossCallMaster {
    /// Load the master and `worker`, then start both.
    pub fn new(config: BoundaryConfig, worker: Arc<dyn Plugin>) -> BoundaryResult<Self> {
        let (tx, rx) = unbounded();
        let log = CallLog::new();

        let mut builder = Boundary::builder(config);
        builder.plugin(Side::Native, Arc::new(MasterPlugin::new(log.clone(), tx)))?;
        builder.plugin(Side::Managed, worker)?;
        let boundary = builder.build();
        boundary.start()?;

        Ok(Self {
            boundary,
            results: rx,
            log,
        })
    }

    /// The underlying boundary
    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    /// Lines recorded by the `Param<N>Callback` entry points
    pub fn call_log(&self) -> &CallLog {
        &self.log
    }

    /// Forward call into the worker.
    pub fn call(&self, name: &str, args: &mut [MarshaledValue]) -> BoundaryResult<MarshaledValue> {
        self.boundary.call_managed(name, args)
    }

    /// Run the worker's reverse test `test`.
    ///
    /// Returns the delivered result, or `None` when the test delivers
    /// nothing (void results, `Param<N>`, unknown names).
    pub fn reverse_call(&self, test: &str) -> BoundaryResult<Option<String>> {
        // Stale results from an earlier faulted call are not ours
        while self.results.try_recv().is_ok() {}

        let mut args = [test.to_boundary()?];
        self.boundary.call_managed("ReverseCall", &mut args)?;
        Ok(self.results.try_recv().ok())
    }
}

impl Drop for CrossCallMaster {
    fn drop(&mut self) {
        self.boundary.shutdown();
    }
}
