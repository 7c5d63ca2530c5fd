//! Entry points and export tables

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::context::{CallContext, Side};
use crate::error::{BoundaryError, BoundaryResult};
use crate::payload::FunctionRef;
use crate::types::CallSignature;
use crate::value::MarshaledValue;

/// Callable behind an entry point.
///
/// Receives the call context and the callee's private argument frame; on
/// return, by-reference slots of the frame hold the final values.
pub type EntryFn = Arc<
    dyn Fn(&dyn CallContext, &mut [MarshaledValue]) -> BoundaryResult<MarshaledValue>
        + Send
        + Sync,
>;

/// An entry point: signature plus callable.
#[derive(Clone)]
pub struct Export {
    signature: CallSignature,
    func: EntryFn,
}

impl Export {
    /// Pair a signature with its callable
    pub fn new<F>(signature: CallSignature, func: F) -> Self
    where
        F: Fn(&dyn CallContext, &mut [MarshaledValue]) -> BoundaryResult<MarshaledValue>
            + Send
            + Sync
            + 'static,
    {
        Self {
            signature,
            func: Arc::new(func),
        }
    }

    /// Declared signature
    pub fn signature(&self) -> &CallSignature {
        &self.signature
    }

    /// Stable name
    pub fn name(&self) -> &str {
        self.signature.name()
    }

    /// Run the callable directly, without boundary checks.
    pub fn invoke(
        &self,
        ctx: &dyn CallContext,
        args: &mut [MarshaledValue],
    ) -> BoundaryResult<MarshaledValue> {
        (self.func)(ctx, args)
    }
}

impl fmt::Debug for Export {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Export")
            .field("signature", &self.signature.to_string())
            .finish()
    }
}

/// Entry points of one side, addressable by name or [`FunctionRef`].
///
/// Populated at startup and read-only afterwards.
#[derive(Debug)]
pub struct ExportTable {
    side: Side,
    exports: Vec<Export>,
    by_name: FxHashMap<String, usize>,
}

impl ExportTable {
    /// Empty table for `side`
    pub fn new(side: Side) -> Self {
        Self {
            side,
            exports: Vec::new(),
            by_name: FxHashMap::default(),
        }
    }

    /// Side this table belongs to
    pub fn side(&self) -> Side {
        self.side
    }

    /// Register an export; names must be unique.
    pub fn register(&mut self, export: Export) -> BoundaryResult<FunctionRef> {
        if self.by_name.contains_key(export.name()) {
            return Err(BoundaryError::DuplicateEntryPoint(export.name().to_string()));
        }
        let index = u32::try_from(self.exports.len())
            .ok()
            .filter(|i| *i < u32::MAX)
            .ok_or_else(|| BoundaryError::Malformed("export table is full".to_string()))?;
        self.by_name.insert(export.name().to_string(), index as usize);
        self.exports.push(export);
        Ok(FunctionRef::new(self.side, index))
    }

    /// Register several exports
    pub fn extend(&mut self, exports: impl IntoIterator<Item = Export>) -> BoundaryResult<()> {
        for export in exports {
            self.register(export)?;
        }
        Ok(())
    }

    /// Export by stable name
    pub fn get(&self, name: &str) -> Option<&Export> {
        self.by_name.get(name).map(|&i| &self.exports[i])
    }

    /// Export named by a function reference
    pub fn resolve(&self, func: FunctionRef) -> Option<&Export> {
        if func.side() != self.side {
            return None;
        }
        func.index().and_then(|i| self.exports.get(i))
    }

    /// Reference to the export named `name`
    pub fn function_ref(&self, name: &str) -> Option<FunctionRef> {
        self.by_name
            .get(name)
            .map(|&i| FunctionRef::new(self.side, i as u32))
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.exports.iter().map(Export::name)
    }

    /// Signatures in registration order
    pub fn signatures(&self) -> impl Iterator<Item = &CallSignature> {
        self.exports.iter().map(Export::signature)
    }

    /// Number of exports
    pub fn len(&self) -> usize {
        self.exports.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.exports.is_empty()
    }
}
