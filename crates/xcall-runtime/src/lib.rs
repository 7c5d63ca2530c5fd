//! xcall runtime
//!
//! Joins the native and managed sides of a process through a [`Boundary`]:
//! export tables for both sides, call validation, by-value copies,
//! by-reference write-back and fault isolation. Also hosts the plugin
//! identity registry, `xcall.toml` configuration and logging bootstrap.
//!
//! # Example
//!
//! ```ignore
//! use xcall_runtime::{Boundary, BoundaryConfig};
//! use xcall_sdk::{Side, ToBoundary};
//!
//! let mut builder = Boundary::builder(BoundaryConfig::default());
//! builder.plugin(Side::Managed, Arc::new(worker))?;
//! let boundary = builder.build();
//!
//! let mut args = [0i32.to_boundary()?];
//! boundary.call_managed("ParamRef1", &mut args)?;
//! ```

#![warn(missing_docs)]

pub mod boundary;
pub mod config;
pub mod error;
pub mod logging;
pub mod registry;

pub use boundary::{Boundary, BoundaryBuilder, BoundaryContext};
pub use config::{BoundaryConfig, LogFormat, LoggingConfig, RuntimeConfig};
pub use error::RuntimeError;
pub use logging::init_logging;
pub use registry::PluginRegistry;
