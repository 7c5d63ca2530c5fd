//! Master and worker wired together through a real boundary

use std::sync::Arc;

use xcall_host::{run, CrossCallMaster, Direction, HarnessError, RunOptions, MASTER_NAME};
use xcall_plugin::{WorkerPlugin, WORKER_NAME};
use xcall_runtime::BoundaryConfig;
use xcall_sdk::{BoundaryError, CallContext, MarshaledValue, Side, ToBoundary};

fn master() -> CrossCallMaster {
    CrossCallMaster::new(BoundaryConfig::default(), Arc::new(WorkerPlugin)).unwrap()
}

#[test]
fn test_full_harness_passes() {
    let master = master();
    let report = run(&master, &RunOptions::default()).unwrap();
    let failures: Vec<String> = report.failures().map(|e| e.to_string()).collect();
    assert!(failures.is_empty(), "{:#?}", failures);
    assert_eq!(report.total(), 58 + 59);
}

#[test]
fn test_direction_and_filter() {
    let master = master();
    let report = run(
        &master,
        &RunOptions {
            direction: Some(Direction::Reverse),
            filter: Some("ParamRef".to_string()),
            bail: false,
        },
    )
    .unwrap();
    assert_eq!(report.total(), 11);
    assert!(report
        .results
        .iter()
        .all(|r| r.direction == Direction::Reverse));
    assert!(!report.has_failures());
}

#[test]
fn test_reverse_deliveries() {
    let master = master();
    assert_eq!(
        master.reverse_call("NoParamReturnBool").unwrap().as_deref(),
        Some("true")
    );
    assert_eq!(
        master.reverse_call("NoParamReturnFunction").unwrap().as_deref(),
        Some("2147483647")
    );
    assert_eq!(
        master.reverse_call("ParamAllPrimitives").unwrap().as_deref(),
        Some("279236978128427")
    );
    assert_eq!(
        master.reverse_call("NoParamReturnDouble").unwrap(),
        Some(f64::MAX.to_string())
    );
    assert_eq!(master.reverse_call("NoParamReturnVoid").unwrap(), None);
}

#[test]
fn test_unknown_reverse_name_is_harmless() {
    let master = master();
    assert_eq!(master.reverse_call("unknown-name").unwrap(), None);
    assert_eq!(
        master.reverse_call("ParamRef1").unwrap().as_deref(),
        Some("42")
    );
}

#[test]
fn test_param_callbacks_log() {
    let master = master();
    assert_eq!(master.reverse_call("Param3").unwrap(), None);
    assert_eq!(
        master.call_log().last().as_deref(),
        Some("Param3: a = 777, b = 8.8, c = 9.8765")
    );
    assert_eq!(master.reverse_call("Param10").unwrap(), None);
    assert_eq!(master.call_log().len(), 2);
    assert!(master.call_log().lines()[1].ends_with("l = 0xabeba"));
}

#[test]
fn test_fault_reported_as_fault() {
    let master = master();
    let mut args = [MarshaledValue::Float32(1.0)];
    let err = master.call("ParamRef1", &mut args).unwrap_err();
    assert!(err.is_type_mismatch());

    let harness_err = HarnessError::Fault {
        test: "ParamRef1".to_string(),
        source: err,
    };
    assert!(harness_err.to_string().starts_with("ParamRef1: Type mismatch"));
    assert!(std::error::Error::source(&harness_err).is_some());

    // Still usable
    let mut args = [MarshaledValue::Int32(0)];
    master.call("ParamRef1", &mut args).unwrap();
    assert_eq!(args[0], MarshaledValue::Int32(42));
}

#[test]
fn test_reverse_call_arity() {
    let master = master();
    let err = master.call("ReverseCall", &mut []).unwrap_err();
    assert!(matches!(err, BoundaryError::ArityMismatch { .. }));

    let mut args = [7i32.to_boundary().unwrap()];
    assert!(master.call("ReverseCall", &mut args).is_err());
}

#[test]
fn test_plugin_identities() {
    let master = master();
    let ctx = master.boundary().context(Side::Managed);
    let worker = ctx.find_plugin(WORKER_NAME).unwrap();
    let host = ctx.find_plugin(MASTER_NAME).unwrap();
    assert_ne!(worker.id, host.id);
    assert_eq!(master.boundary().plugins().side_of(WORKER_NAME), Some(Side::Managed));
    assert!(ctx.find_plugin("missing").is_none());
}
