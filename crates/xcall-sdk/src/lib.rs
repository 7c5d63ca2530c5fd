//! xcall SDK - value model and marshaling for in-process boundary calls
//!
//! This crate provides the types both sides of an xcall boundary agree on:
//! the closed catalogue of [`TypeTag`]s, the [`MarshaledValue`] that carries
//! one tagged value across, the conversion traits that make up the marshaling
//! table, and the export table an entry point is registered in.
//!
//! # Example
//!
//! ```ignore
//! use xcall_sdk::{export, ExportTable, Side, Vector4};
//!
//! #[export("ParamRef4")]
//! fn param_ref4(a: &mut i32, b: &mut f32, c: &mut f64, d: &mut Vector4) {
//!     *a = 100;
//!     *b = -5.55;
//!     *c = 1.618;
//!     *d = Vector4::new(1.0, 2.0, 3.0, 4.0);
//! }
//!
//! let mut table = ExportTable::new(Side::Managed);
//! table.register(param_ref4_export())?;
//! ```

#![warn(missing_docs)]

pub mod buffer;
pub mod context;
pub mod convert;
pub mod error;
pub mod export;
pub mod payload;
pub mod plugin;
pub mod types;
pub mod value;

pub use buffer::{BufferReader, BufferWriter};
pub use context::{CallContext, Side};
pub use convert::{ArrayElement, FromBoundary, Tagged, ToBoundary};
pub use error::{BoundaryError, BoundaryResult};
pub use export::{EntryFn, Export, ExportTable};
pub use payload::{
    approx_eq_f32, Char16, Char8, FunctionRef, Matrix4x4, Pointer, Vector2, Vector3, Vector4,
};
pub use plugin::{Plugin, PluginInfo};
pub use types::{CallSignature, Direction, ParameterSpec, TypeTag};
pub use value::{MarshaledArray, MarshaledString, MarshaledValue};

/// Declares a boundary entry point. See [`xcall_macros::export`].
pub use xcall_macros::export;
