//! Dispatch contract tests for the boundary

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use xcall_runtime::{Boundary, BoundaryConfig};
use xcall_sdk::{
    export, BoundaryError, BoundaryResult, CallContext, CallSignature, Export, FromBoundary,
    FunctionRef, MarshaledValue, Plugin, PluginInfo, Side, ToBoundary, TypeTag,
};

#[export("Scribble")]
fn scribble(text: String, mut values: Vec<i64>) -> u64 {
    values.push(99);
    (values.len() + text.len()) as u64
}

#[export("Resize")]
fn resize(values: &mut Vec<i64>, text: &mut String) {
    *values = vec![7; values.len() * 2 + 1];
    *text = "replaced".to_string();
}

#[export("ParamRef1")]
fn param_ref1(a: &mut i32) {
    *a = 42;
}

#[export("Explode")]
fn explode(_a: &mut i32) {
    panic!("callee blew up");
}

#[export("Answer")]
fn answer() -> i32 {
    2147483647
}

#[export("OwnRef")]
fn own_ref(ctx: &dyn CallContext) -> Option<FunctionRef> {
    ctx.function_ref("Answer")
}

#[export("CallThrough")]
fn call_through(ctx: &dyn CallContext, func: Option<FunctionRef>) -> BoundaryResult<i32> {
    match func {
        Some(func) => ctx.invoke_ref(func, &mut []),
        None => Ok(-1),
    }
}

#[export("PingManaged")]
fn ping_managed(ctx: &dyn CallContext) -> BoundaryResult<()> {
    ctx.invoke_void("PongNative", &mut [])
}

#[export("PongNative")]
fn pong_native(ctx: &dyn CallContext) -> BoundaryResult<()> {
    ctx.invoke_void("PingManaged", &mut [])
}

fn lying_return() -> Export {
    Export::new(
        CallSignature::new("LyingReturn").returns(TypeTag::Int32),
        |_ctx, _args| Ok(MarshaledValue::Int64(1)),
    )
}

fn lying_reference() -> Export {
    Export::new(
        CallSignature::new("LyingReference")
            .param_ref(TypeTag::Int32)
            .param_ref(TypeTag::Int32),
        |_ctx, args| {
            args[0] = MarshaledValue::Int32(5);
            args[1] = MarshaledValue::Float64(5.0);
            Ok(MarshaledValue::Void)
        },
    )
}

fn boundary_with(config: BoundaryConfig) -> Boundary {
    let mut builder = Boundary::builder(config);
    builder
        .exports(
            Side::Managed,
            [
                scribble_export(),
                resize_export(),
                param_ref1_export(),
                explode_export(),
                own_ref_export(),
                call_through_export(),
                ping_managed_export(),
                lying_return(),
                lying_reference(),
            ],
        )
        .unwrap();
    builder
        .exports(Side::Native, [answer_export(), pong_native_export()])
        .unwrap();
    builder.build()
}

fn boundary() -> Boundary {
    boundary_with(BoundaryConfig::default())
}

#[test]
fn test_by_value_arguments_are_private_copies() {
    let boundary = boundary();
    let mut args = [
        "abc".to_boundary().unwrap(),
        vec![1i64, 2, 3].to_boundary().unwrap(),
    ];
    let before = args.clone();

    let ret = boundary.call_managed("Scribble", &mut args).unwrap();
    assert_eq!(ret, MarshaledValue::UInt64(7));
    assert_eq!(args, before);
}

#[test]
fn test_reference_slots_replaced_whole() {
    let boundary = boundary();
    let mut args = [
        vec![1i64, 2].to_boundary().unwrap(),
        "short".to_boundary().unwrap(),
    ];
    boundary.call_managed("Resize", &mut args).unwrap();
    assert_eq!(Vec::<i64>::from_boundary(&args[0]).unwrap(), vec![7; 5]);
    assert_eq!(String::from_boundary(&args[1]).unwrap(), "replaced");

    let mut empty = [
        Vec::<i64>::new().to_boundary().unwrap(),
        String::new().to_boundary().unwrap(),
    ];
    boundary.call_managed("Resize", &mut empty).unwrap();
    assert_eq!(Vec::<i64>::from_boundary(&empty[0]).unwrap(), vec![7]);
}

#[test]
fn test_param_ref_ignores_input() {
    let boundary = boundary();
    for input in [0, -1, i32::MAX] {
        let mut args = [MarshaledValue::Int32(input)];
        boundary.call_managed("ParamRef1", &mut args).unwrap();
        assert_eq!(args[0], MarshaledValue::Int32(42));
    }
}

#[test]
fn test_type_mismatch_leaves_slots_untouched() {
    let boundary = boundary();
    let mut args = [MarshaledValue::Float32(1.5)];
    let err = boundary.call_managed("ParamRef1", &mut args).unwrap_err();
    assert_eq!(
        err,
        BoundaryError::mismatch("ParamRef1 parameter 0", "int32", "float32")
    );
    assert_eq!(args[0], MarshaledValue::Float32(1.5));

    let mut good = [MarshaledValue::Int32(0)];
    boundary.call_managed("ParamRef1", &mut good).unwrap();
    assert_eq!(good[0], MarshaledValue::Int32(42));
}

#[test]
fn test_array_element_mismatch() {
    let boundary = boundary();
    let mut args = [
        vec![1u64].to_boundary().unwrap(),
        "x".to_boundary().unwrap(),
    ];
    let err = boundary.call_managed("Resize", &mut args).unwrap_err();
    assert!(err.is_type_mismatch());
}

#[test]
fn test_arity_and_unknown_entry() {
    let boundary = boundary();
    assert!(matches!(
        boundary.call_managed("ParamRef1", &mut []),
        Err(BoundaryError::ArityMismatch { expected: 1, got: 0, .. })
    ));
    assert_eq!(
        boundary.call_managed("NoSuchEntry", &mut []),
        Err(BoundaryError::UnknownEntryPoint("NoSuchEntry".to_string()))
    );
    // Native-only names are not visible as managed entry points
    assert!(boundary.call_managed("Answer", &mut []).is_err());
}

#[test]
fn test_return_tag_checked() {
    let boundary = boundary();
    let err = boundary.call_managed("LyingReturn", &mut []).unwrap_err();
    assert_eq!(
        err,
        BoundaryError::mismatch("LyingReturn return value", "int32", "int64")
    );
}

#[test]
fn test_bad_reference_write_commits_nothing() {
    let boundary = boundary();
    let mut args = [MarshaledValue::Int32(1), MarshaledValue::Int32(2)];
    let err = boundary.call_managed("LyingReference", &mut args).unwrap_err();
    assert!(err.is_type_mismatch());
    assert_eq!(args, [MarshaledValue::Int32(1), MarshaledValue::Int32(2)]);
}

#[test]
fn test_panic_is_captured() {
    let boundary = boundary();
    let mut args = [MarshaledValue::Int32(3)];
    let err = boundary.call_managed("Explode", &mut args).unwrap_err();
    assert_eq!(
        err,
        BoundaryError::Panic {
            name: "Explode".to_string(),
            message: "callee blew up".to_string(),
        }
    );
    assert_eq!(args[0], MarshaledValue::Int32(3));
    assert_eq!(boundary.current_depth(), 0);

    let mut good = [MarshaledValue::Int32(0)];
    assert!(boundary.call_managed("ParamRef1", &mut good).is_ok());
}

#[test]
fn test_call_depth_limit() {
    let boundary = boundary_with(BoundaryConfig {
        max_call_depth: 4,
        ..BoundaryConfig::default()
    });
    let err = boundary.call_managed("PingManaged", &mut []).unwrap_err();
    assert_eq!(err, BoundaryError::CallDepthExceeded(4));
    assert_eq!(boundary.current_depth(), 0);
}

#[test]
fn test_payload_size_limit() {
    let boundary = boundary_with(BoundaryConfig {
        max_marshal_bytes: 16,
        ..BoundaryConfig::default()
    });
    let mut args = [
        "this string is longer than sixteen bytes".to_boundary().unwrap(),
        Vec::<i64>::new().to_boundary().unwrap(),
    ];
    let err = boundary.call_managed("Scribble", &mut args).unwrap_err();
    assert!(matches!(err, BoundaryError::Allocation { requested: 40, .. }));

    // The callee may not hand back more than the limit either
    let mut args = [
        vec![0i64; 1].to_boundary().unwrap(),
        String::new().to_boundary().unwrap(),
    ];
    let err = boundary.call_managed("Resize", &mut args).unwrap_err();
    assert!(matches!(err, BoundaryError::Allocation { requested: 24, .. }));
    assert_eq!(Vec::<i64>::from_boundary(&args[0]).unwrap(), vec![0]);
}

#[test]
fn test_function_references() {
    let boundary = boundary();
    let func: Option<FunctionRef> =
        FromBoundary::from_boundary(&boundary.call_managed("OwnRef", &mut []).unwrap()).unwrap();
    // OwnRef runs on the managed side, where Answer is not exported
    assert_eq!(func, None);

    let answer = boundary.exports(Side::Native).function_ref("Answer");
    assert!(answer.is_some());
    let mut args = [answer.to_boundary().unwrap()];
    let ret = boundary.call_managed("CallThrough", &mut args).unwrap();
    assert_eq!(ret, MarshaledValue::Int32(2147483647));

    let mut absent = [MarshaledValue::FunctionRef(0)];
    let ret = boundary.call_managed("CallThrough", &mut absent).unwrap();
    assert_eq!(ret, MarshaledValue::Int32(-1));

    let mut stale = [MarshaledValue::FunctionRef(0xdead_0000_0000)];
    let err = boundary.call_managed("CallThrough", &mut stale).unwrap_err();
    assert_eq!(err, BoundaryError::InvalidFunctionRef(0xdead_0000_0000));
}

#[test]
fn test_idempotent_calls() {
    let boundary = boundary();
    let run = || {
        let mut args = [
            vec![1i64, 2, 3].to_boundary().unwrap(),
            "x".to_boundary().unwrap(),
        ];
        boundary.call_managed("Resize", &mut args).unwrap();
        args
    };
    assert_eq!(run(), run());
}

struct CountingPlugin {
    started: Arc<AtomicUsize>,
    ended: Arc<AtomicUsize>,
}

impl Plugin for CountingPlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo::new(42, "counting", "0.1.0").with_description("counts lifecycle hooks")
    }

    fn exports(&self) -> Vec<Export> {
        vec![answer_export()]
    }

    fn on_start(&self, ctx: &dyn CallContext) -> BoundaryResult<()> {
        assert_eq!(ctx.side(), Side::Native);
        assert!(ctx.find_plugin("counting").is_some());
        self.started.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn on_end(&self, _ctx: &dyn CallContext) {
        self.ended.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_plugin_lifecycle_and_identity() {
    let started = Arc::new(AtomicUsize::new(0));
    let ended = Arc::new(AtomicUsize::new(0));
    let mut builder = Boundary::builder(BoundaryConfig::default());
    builder
        .plugin(
            Side::Native,
            Arc::new(CountingPlugin {
                started: started.clone(),
                ended: ended.clone(),
            }),
        )
        .unwrap();
    let boundary = builder.build();

    boundary.start().unwrap();
    boundary.shutdown();
    assert_eq!(started.load(Ordering::SeqCst), 1);
    assert_eq!(ended.load(Ordering::SeqCst), 1);

    let info = boundary
        .context(Side::Managed)
        .find_plugin("counting")
        .unwrap();
    assert_eq!(info.id, 42);
    assert_eq!(boundary.plugins().side_of("counting"), Some(Side::Native));
    assert_eq!(
        boundary.call_native("Answer", &mut []).unwrap(),
        MarshaledValue::Int32(2147483647)
    );
}
