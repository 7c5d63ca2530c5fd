//! Native side of the cross-call conformance setup
//!
//! [`CrossCallMaster`] loads the native master plugin (every `*Callback`
//! entry point plus `DeliverResult`) next to a managed worker, and
//! [`harness::run`] checks both directions against the golden values.

pub mod callbacks;
pub mod expected;
pub mod harness;
pub mod master;

pub use callbacks::CallLog;
pub use harness::{run, Case, CaseResult, Direction, HarnessError, Report, RunOptions};
pub use master::{CrossCallMaster, MasterPlugin, MASTER_ID, MASTER_NAME};
