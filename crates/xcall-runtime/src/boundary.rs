//! Boundary dispatcher
//!
//! The [`Boundary`] owns the export tables of both sides and is the only way
//! to cross from one to the other. Every call goes through the same steps:
//!
//! 1. resolve the entry point by name or function reference
//! 2. check arity, argument tags and payload sizes
//! 3. copy every argument into a private callee frame
//! 4. invoke under a depth limit and a panic guard
//! 5. check the return value and by-reference slots against the signature
//! 6. replace the caller's by-reference slots with the callee's final values
//!
//! Any fault aborts the call before step 6, so the caller's slots are left
//! exactly as they were and the boundary stays usable.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use xcall_sdk::{
    BoundaryError, BoundaryResult, CallContext, CallSignature, Export, ExportTable, FunctionRef,
    MarshaledValue, Plugin, PluginInfo, Side,
};

use crate::config::BoundaryConfig;
use crate::registry::PluginRegistry;

// ============================================================================
// Boundary
// ============================================================================

/// Dispatcher joining the native and managed export tables.
pub struct Boundary {
    config: BoundaryConfig,
    native: ExportTable,
    managed: ExportTable,
    plugins: PluginRegistry,
    loaded: Vec<(Side, Arc<dyn Plugin>)>,
    depth: AtomicUsize,
}

impl Boundary {
    /// Start building a boundary with `config`
    pub fn builder(config: BoundaryConfig) -> BoundaryBuilder {
        BoundaryBuilder::new(config)
    }

    /// Active limits
    pub fn config(&self) -> &BoundaryConfig {
        &self.config
    }

    /// Export table of `side`
    pub fn exports(&self, side: Side) -> &ExportTable {
        match side {
            Side::Native => &self.native,
            Side::Managed => &self.managed,
        }
    }

    /// Signature of an entry point
    pub fn signature(&self, side: Side, name: &str) -> Option<&CallSignature> {
        self.exports(side).get(name).map(Export::signature)
    }

    /// Loaded plugin identities
    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    /// Context for code running on `side` outside of any call
    pub fn context(&self, side: Side) -> BoundaryContext<'_> {
        BoundaryContext {
            boundary: self,
            side,
        }
    }

    /// Nesting depth of calls currently in flight
    pub fn current_depth(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }

    /// Forward call: native code invoking a managed entry point.
    pub fn call_managed(
        &self,
        name: &str,
        args: &mut [MarshaledValue],
    ) -> BoundaryResult<MarshaledValue> {
        self.call(Side::Managed, name, args)
    }

    /// Managed code invoking a native entry point.
    pub fn call_native(
        &self,
        name: &str,
        args: &mut [MarshaledValue],
    ) -> BoundaryResult<MarshaledValue> {
        self.call(Side::Native, name, args)
    }

    /// Call the entry point `name` exported by `target`.
    pub fn call(
        &self,
        target: Side,
        name: &str,
        args: &mut [MarshaledValue],
    ) -> BoundaryResult<MarshaledValue> {
        let export = self
            .exports(target)
            .get(name)
            .ok_or_else(|| BoundaryError::UnknownEntryPoint(name.to_string()))?;
        self.dispatch(target, export, args)
    }

    /// Call the export named by a function reference.
    pub fn call_ref(
        &self,
        func: FunctionRef,
        args: &mut [MarshaledValue],
    ) -> BoundaryResult<MarshaledValue> {
        let target = func.side();
        let export = self
            .exports(target)
            .resolve(func)
            .ok_or(BoundaryError::InvalidFunctionRef(func.to_bits()))?;
        self.dispatch(target, export, args)
    }

    /// Run every plugin's start hook, in load order.
    pub fn start(&self) -> BoundaryResult<()> {
        for (side, plugin) in &self.loaded {
            tracing::debug!(plugin = %plugin.info().name, side = %side, "starting plugin");
            plugin.on_start(&self.context(*side))?;
        }
        Ok(())
    }

    /// Run every plugin's end hook, in reverse load order.
    pub fn shutdown(&self) {
        for (side, plugin) in self.loaded.iter().rev() {
            tracing::debug!(plugin = %plugin.info().name, side = %side, "stopping plugin");
            plugin.on_end(&self.context(*side));
        }
    }

    fn dispatch(
        &self,
        target: Side,
        export: &Export,
        args: &mut [MarshaledValue],
    ) -> BoundaryResult<MarshaledValue> {
        let span = tracing::debug_span!("boundary_call", entry = export.name(), side = %target);
        let _enter = span.enter();

        let result = self.dispatch_checked(target, export, args);
        match &result {
            Ok(ret) if self.config.trace_calls => {
                tracing::trace!(args = ?args, ret = ?ret, "call completed");
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "call faulted"),
        }
        result
    }

    fn dispatch_checked(
        &self,
        target: Side,
        export: &Export,
        args: &mut [MarshaledValue],
    ) -> BoundaryResult<MarshaledValue> {
        let signature = export.signature();
        let name = signature.name();

        self.check_args(signature, args)?;
        let mut frame = copy_frame(args)?;

        let ret = {
            let _depth = self.enter()?;
            let ctx = self.context(target);
            let outcome =
                panic::catch_unwind(AssertUnwindSafe(|| export.invoke(&ctx, &mut frame)));
            match outcome {
                Ok(result) => result?,
                Err(payload) => {
                    return Err(BoundaryError::Panic {
                        name: name.to_string(),
                        message: panic_message(payload.as_ref()),
                    })
                }
            }
        };

        match signature.ret() {
            None if ret.is_void() => {}
            Some(tag) if ret.has_tag(tag) => self.check_size(&ret)?,
            expected => {
                return Err(BoundaryError::mismatch(
                    format!("{} return value", name),
                    expected.map_or_else(|| "void".to_string(), ToString::to_string),
                    ret.type_name(),
                ))
            }
        }

        for spec in signature.references() {
            let value = &frame[spec.position];
            if !value.has_tag(&spec.tag) {
                return Err(BoundaryError::mismatch(
                    format!("{} parameter {} on return", name, spec.position),
                    &spec.tag,
                    value.type_name(),
                ));
            }
            self.check_size(value)?;
        }

        // Commit: whole-value replacement of every by-reference slot.
        for spec in signature.references() {
            args[spec.position] = std::mem::take(&mut frame[spec.position]);
        }

        Ok(ret)
    }

    fn check_args(&self, signature: &CallSignature, args: &[MarshaledValue]) -> BoundaryResult<()> {
        if args.len() != signature.arity() {
            return Err(BoundaryError::ArityMismatch {
                name: signature.name().to_string(),
                expected: signature.arity(),
                got: args.len(),
            });
        }
        for spec in signature.params() {
            let arg = &args[spec.position];
            if !arg.has_tag(&spec.tag) {
                return Err(BoundaryError::mismatch(
                    format!("{} parameter {}", signature.name(), spec.position),
                    &spec.tag,
                    arg.type_name(),
                ));
            }
            self.check_size(arg)?;
        }
        Ok(())
    }

    fn check_size(&self, value: &MarshaledValue) -> BoundaryResult<()> {
        let len = value.payload_len();
        if len > self.config.max_marshal_bytes {
            return Err(BoundaryError::allocation(
                len,
                format!(
                    "payload exceeds max_marshal_bytes ({})",
                    self.config.max_marshal_bytes
                ),
            ));
        }
        Ok(())
    }

    fn enter(&self) -> BoundaryResult<DepthGuard<'_>> {
        let depth = self.depth.fetch_add(1, Ordering::SeqCst);
        let guard = DepthGuard { depth: &self.depth };
        if depth >= self.config.max_call_depth {
            return Err(BoundaryError::CallDepthExceeded(self.config.max_call_depth));
        }
        Ok(guard)
    }
}

struct DepthGuard<'a> {
    depth: &'a AtomicUsize,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.fetch_sub(1, Ordering::SeqCst);
    }
}

fn copy_frame(args: &[MarshaledValue]) -> BoundaryResult<Vec<MarshaledValue>> {
    let mut frame = Vec::new();
    frame
        .try_reserve_exact(args.len())
        .map_err(|e| {
            BoundaryError::allocation(args.len() * std::mem::size_of::<MarshaledValue>(), e)
        })?;
    frame.extend(args.iter().cloned());
    Ok(frame)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

// ============================================================================
// Call Context
// ============================================================================

/// [`CallContext`] for code running on one side of a [`Boundary`].
pub struct BoundaryContext<'a> {
    boundary: &'a Boundary,
    side: Side,
}

impl CallContext for BoundaryContext<'_> {
    fn side(&self) -> Side {
        self.side
    }

    fn call(&self, name: &str, args: &mut [MarshaledValue]) -> BoundaryResult<MarshaledValue> {
        self.boundary.call(self.side.opposite(), name, args)
    }

    fn call_ref(
        &self,
        func: FunctionRef,
        args: &mut [MarshaledValue],
    ) -> BoundaryResult<MarshaledValue> {
        self.boundary.call_ref(func, args)
    }

    fn function_ref(&self, name: &str) -> Option<FunctionRef> {
        self.boundary.exports(self.side).function_ref(name)
    }

    fn find_plugin(&self, name: &str) -> Option<PluginInfo> {
        self.boundary.plugins.find_by_name(name).cloned()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Collects exports and plugins for both sides, then freezes them into a
/// [`Boundary`].
pub struct BoundaryBuilder {
    config: BoundaryConfig,
    native: ExportTable,
    managed: ExportTable,
    plugins: PluginRegistry,
    loaded: Vec<(Side, Arc<dyn Plugin>)>,
}

impl BoundaryBuilder {
    /// Empty builder with `config`
    pub fn new(config: BoundaryConfig) -> Self {
        Self {
            config,
            native: ExportTable::new(Side::Native),
            managed: ExportTable::new(Side::Managed),
            plugins: PluginRegistry::new(),
            loaded: Vec::new(),
        }
    }

    fn table(&mut self, side: Side) -> &mut ExportTable {
        match side {
            Side::Native => &mut self.native,
            Side::Managed => &mut self.managed,
        }
    }

    /// Register one export on `side`
    pub fn export(&mut self, side: Side, export: Export) -> BoundaryResult<FunctionRef> {
        self.table(side).register(export)
    }

    /// Register several exports on `side`
    pub fn exports(
        &mut self,
        side: Side,
        exports: impl IntoIterator<Item = Export>,
    ) -> BoundaryResult<()> {
        self.table(side).extend(exports)
    }

    /// Load a plugin on `side`: record its identity and register its exports.
    pub fn plugin(&mut self, side: Side, plugin: Arc<dyn Plugin>) -> BoundaryResult<()> {
        let info = plugin.info();
        tracing::debug!(plugin = %info.name, version = %info.version, side = %side, "loading plugin");
        self.plugins.register(side, info)?;
        self.exports(side, plugin.exports())?;
        self.loaded.push((side, plugin));
        Ok(())
    }

    /// Freeze the tables
    pub fn build(self) -> Boundary {
        Boundary {
            config: self.config,
            native: self.native,
            managed: self.managed,
            plugins: self.plugins,
            loaded: self.loaded,
            depth: AtomicUsize::new(0),
        }
    }
}

impl Default for BoundaryBuilder {
    fn default() -> Self {
        Self::new(BoundaryConfig::default())
    }
}
