//! Tests for adapters generated by #[export]

use xcall_sdk::{
    export, BoundaryError, BoundaryResult, CallContext, Direction, FunctionRef, MarshaledValue,
    PluginInfo, Side, ToBoundary, TypeTag, Vector4,
};

/// Context that answers every call with the number of arguments it got.
struct EchoContext;

impl CallContext for EchoContext {
    fn side(&self) -> Side {
        Side::Managed
    }

    fn call(&self, _name: &str, args: &mut [MarshaledValue]) -> BoundaryResult<MarshaledValue> {
        Ok(MarshaledValue::Int32(args.len() as i32))
    }

    fn call_ref(
        &self,
        _func: FunctionRef,
        _args: &mut [MarshaledValue],
    ) -> BoundaryResult<MarshaledValue> {
        Err(BoundaryError::InvalidFunctionRef(0))
    }

    fn function_ref(&self, _name: &str) -> Option<FunctionRef> {
        None
    }

    fn find_plugin(&self, name: &str) -> Option<PluginInfo> {
        (name == "echo").then(|| PluginInfo::new(1, "echo", "1.0.0"))
    }
}

#[export("NoParamReturnString")]
fn no_param_return_string() -> String {
    "Hello World".to_string()
}

#[export]
fn add(a: i32, b: i32) -> i64 {
    a as i64 + b as i64
}

#[export("ParamRef4")]
fn param_ref4(a: &mut i32, b: &mut f32, c: &mut f64, d: &mut Vector4) {
    *a = 100;
    *b = -5.55;
    *c = 1.618;
    *d = Vector4::new(1.0, 2.0, 3.0, 4.0);
}

#[export("Concat")]
fn concat(prefix: &str, parts: &[String], out: &mut String) {
    *out = format!("{}{}", prefix, parts.join(","));
}

#[export("AskOtherSide")]
fn ask_other_side(ctx: &dyn CallContext, n: u8) -> BoundaryResult<i32> {
    let mut args = vec![MarshaledValue::Void; n as usize];
    ctx.invoke::<i32>("Anything", &mut args)
}

#[export("Fails")]
fn fails(flag: bool) -> Result<(), String> {
    if flag {
        Err("asked to fail".to_string())
    } else {
        Ok(())
    }
}

#[test]
fn test_signature_from_types() {
    let export = param_ref4_export();
    let sig = export.signature();
    assert_eq!(sig.name(), "ParamRef4");
    assert_eq!(sig.arity(), 4);
    assert!(sig.params().iter().all(|p| p.direction == Direction::ByReference));
    assert_eq!(sig.params()[3].tag, TypeTag::Vector4);
    assert!(sig.ret().is_none());

    let add = add_export();
    assert_eq!(add.name(), "add");
    assert_eq!(add.signature().to_string(), "add(int32, int32) -> int64");
}

#[test]
fn test_borrowed_params_are_by_value() {
    let export = concat_export();
    let sig = export.signature();
    assert_eq!(sig.params()[0].tag, TypeTag::String);
    assert_eq!(sig.params()[0].direction, Direction::ByValue);
    assert_eq!(sig.params()[1].tag, TypeTag::array_of(TypeTag::String));
    assert_eq!(sig.params()[2].direction, Direction::ByReference);
}

#[test]
fn test_return_value() {
    let ret = no_param_return_string_export()
        .invoke(&EchoContext, &mut [])
        .unwrap();
    assert_eq!(ret, "Hello World".to_boundary().unwrap());
}

#[test]
fn test_reference_write_back() {
    let mut args = [
        MarshaledValue::Int32(0),
        MarshaledValue::Float32(0.0),
        MarshaledValue::Float64(0.0),
        Vector4::default().to_boundary().unwrap(),
    ];
    let ret = param_ref4_export().invoke(&EchoContext, &mut args).unwrap();
    assert_eq!(ret, MarshaledValue::Void);
    assert_eq!(args[0], MarshaledValue::Int32(100));
    assert_eq!(args[1], MarshaledValue::Float32(-5.55));
    assert_eq!(args[2], MarshaledValue::Float64(1.618));
    assert_eq!(args[3], MarshaledValue::Vector4([1.0, 2.0, 3.0, 4.0]));
}

#[test]
fn test_borrowed_string_and_slice() {
    let mut args = [
        "x=".to_boundary().unwrap(),
        vec!["a".to_string(), "b".to_string()].to_boundary().unwrap(),
        "".to_boundary().unwrap(),
    ];
    concat_export().invoke(&EchoContext, &mut args).unwrap();
    assert_eq!(args[2], "x=a,b".to_boundary().unwrap());
}

#[test]
fn test_arity_mismatch() {
    let err = add_export()
        .invoke(&EchoContext, &mut [MarshaledValue::Int32(1)])
        .unwrap_err();
    assert_eq!(
        err,
        BoundaryError::ArityMismatch {
            name: "add".to_string(),
            expected: 2,
            got: 1,
        }
    );
}

#[test]
fn test_type_mismatch_names_position() {
    let err = add_export()
        .invoke(
            &EchoContext,
            &mut [MarshaledValue::Int32(1), MarshaledValue::Int64(2)],
        )
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Type mismatch at add parameter 1: expected int32, got int64"
    );
}

#[test]
fn test_context_parameter() {
    let export = ask_other_side_export();
    assert_eq!(export.signature().arity(), 1);
    let ret = export
        .invoke(&EchoContext, &mut [MarshaledValue::UInt8(3)])
        .unwrap();
    assert_eq!(ret, MarshaledValue::Int32(3));
}

#[test]
fn test_callee_error_propagates() {
    let export = fails_export();
    assert!(export.signature().ret().is_none());
    assert_eq!(
        export.invoke(&EchoContext, &mut [MarshaledValue::Bool(true)]),
        Err(BoundaryError::Callee("asked to fail".to_string()))
    );
    assert_eq!(
        export.invoke(&EchoContext, &mut [MarshaledValue::Bool(false)]),
        Ok(MarshaledValue::Void)
    );
}

#[test]
fn test_find_plugin_through_context() {
    let ctx: &dyn CallContext = &EchoContext;
    assert_eq!(ctx.find_plugin("echo").map(|p| p.version), Some("1.0.0".to_string()));
    assert!(ctx.find_plugin("missing").is_none());
}
