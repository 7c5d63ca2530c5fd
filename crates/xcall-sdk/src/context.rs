//! Call context handed to every entry point

use std::fmt;

use crate::convert::FromBoundary;
use crate::error::{BoundaryError, BoundaryResult};
use crate::payload::FunctionRef;
use crate::plugin::PluginInfo;
use crate::value::MarshaledValue;

/// One of the two execution environments joined by the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The host side
    Native,
    /// The plugin runtime side
    Managed,
}

impl Side {
    /// The other side
    pub fn opposite(self) -> Side {
        match self {
            Side::Native => Side::Managed,
            Side::Managed => Side::Native,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Native => f.write_str("native"),
            Side::Managed => f.write_str("managed"),
        }
    }
}

/// Boundary operations available to code running on one side.
///
/// Implemented by the runtime; entry points receive it as their first
/// argument when they ask for it.
pub trait CallContext {
    // ========================================================================
    // Identity
    // ========================================================================

    /// Side the current code runs on
    fn side(&self) -> Side;

    // ========================================================================
    // Calls
    // ========================================================================

    /// Call an entry point on the opposite side by stable name.
    ///
    /// By-reference slots in `args` are replaced with the callee's final
    /// values when the call succeeds and left untouched when it faults.
    fn call(&self, name: &str, args: &mut [MarshaledValue]) -> BoundaryResult<MarshaledValue>;

    /// Call the export named by a function reference, on whichever side
    /// owns it.
    fn call_ref(
        &self,
        func: FunctionRef,
        args: &mut [MarshaledValue],
    ) -> BoundaryResult<MarshaledValue>;

    /// Reference to an export on the current side, for handing across.
    fn function_ref(&self, name: &str) -> Option<FunctionRef>;

    // ========================================================================
    // Plugins
    // ========================================================================

    /// Identity of a loaded plugin
    fn find_plugin(&self, name: &str) -> Option<PluginInfo>;
}

impl dyn CallContext + '_ {
    /// Call by name and decode the return value as `R`.
    pub fn invoke<R: FromBoundary>(
        &self,
        name: &str,
        args: &mut [MarshaledValue],
    ) -> BoundaryResult<R> {
        let ret = self.call(name, args)?;
        R::from_boundary(&ret).map_err(|e| e.at(format!("{} return value", name)))
    }

    /// Call by name an entry point without a return value.
    pub fn invoke_void(&self, name: &str, args: &mut [MarshaledValue]) -> BoundaryResult<()> {
        match self.call(name, args)? {
            MarshaledValue::Void => Ok(()),
            other => Err(BoundaryError::mismatch(
                format!("{} return value", name),
                "void",
                other.type_name(),
            )),
        }
    }

    /// Call through a function reference and decode the return value as `R`.
    pub fn invoke_ref<R: FromBoundary>(
        &self,
        func: FunctionRef,
        args: &mut [MarshaledValue],
    ) -> BoundaryResult<R> {
        let ret = self.call_ref(func, args)?;
        R::from_boundary(&ret)
            .map_err(|e| e.at(format!("function {:#x} return value", func.to_bits())))
    }
}
