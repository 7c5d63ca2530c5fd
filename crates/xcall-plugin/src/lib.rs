//! Managed-side cross-call worker
//!
//! Exposes the forward catalogue (`NoParamReturn*`, `Param1..10`,
//! `ParamRef1..10`, `ParamRefArrays`, `ParamAllPrimitives`) and the
//! `ReverseCall` bridge, which runs a named test against the native
//! `*Callback` entry points and hands the rendered result back through
//! `DeliverResult`.
//!
//! ```ignore
//! let mut builder = Boundary::builder(config);
//! builder.plugin(Side::Managed, Arc::new(WorkerPlugin))?;
//! ```

pub mod exports;
pub mod format;
pub mod reverse;

use xcall_sdk::{BoundaryResult, CallContext, Export, Plugin, PluginInfo};

pub use exports::all_exports;
pub use reverse::{ReverseCallRegistry, ReverseTest, REVERSE_TESTS};

/// Plugin id of the worker
pub const WORKER_ID: u64 = 2;

/// Plugin name of the worker
pub const WORKER_NAME: &str = "cross_call_worker";

/// The worker plugin.
#[derive(Debug, Default, Clone, Copy)]
pub struct WorkerPlugin;

impl Plugin for WorkerPlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo::new(WORKER_ID, WORKER_NAME, env!("CARGO_PKG_VERSION"))
            .with_description("Forward entry points and reverse call bridge")
    }

    fn exports(&self) -> Vec<Export> {
        all_exports()
    }

    fn on_start(&self, ctx: &dyn CallContext) -> BoundaryResult<()> {
        let master = ctx.find_plugin("cross_call_master");
        tracing::debug!(
            master = master.as_ref().map(|info| info.name.as_str()),
            reverse_tests = REVERSE_TESTS.len(),
            "worker started"
        );
        Ok(())
    }

    fn on_end(&self, _ctx: &dyn CallContext) {
        tracing::debug!("worker stopped");
    }
}
