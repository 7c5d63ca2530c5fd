//! Worker catalogue driven through a real boundary

use std::sync::Arc;

use crossbeam::channel::{unbounded, Receiver};
use xcall_plugin::{WorkerPlugin, REVERSE_TESTS, WORKER_NAME};
use xcall_runtime::{Boundary, BoundaryConfig};
use xcall_sdk::{
    export, CallContext, CallSignature, Char16, Char8, Export, FromBoundary, FunctionRef, MarshaledValue,
    Matrix4x4, Pointer, Side, ToBoundary, TypeTag, Vector4,
};

#[export("NoParamReturnBoolCallback")]
fn bool_callback() -> bool {
    true
}

#[export("ParamRef2Callback")]
fn param_ref2_callback(a: &mut i32, b: &mut f32) {
    *a = 10;
    *b = 3.14;
}

fn deliver_result(tx: crossbeam::channel::Sender<String>) -> Export {
    Export::new(
        CallSignature::new("DeliverResult").param(TypeTag::String),
        move |_ctx, args| {
            let text = String::from_boundary(&args[0])?;
            tx.send(text).map_err(|e| e.to_string())?;
            Ok(MarshaledValue::Void)
        },
    )
}

fn boundary() -> (Boundary, Receiver<String>) {
    let (tx, rx) = unbounded();
    let mut builder = Boundary::builder(BoundaryConfig::default());
    builder
        .plugin(Side::Managed, Arc::new(WorkerPlugin))
        .unwrap();
    builder
        .exports(
            Side::Native,
            [bool_callback_export(), param_ref2_callback_export(), deliver_result(tx)],
        )
        .unwrap();
    (builder.build(), rx)
}

fn call<R: FromBoundary>(boundary: &Boundary, name: &str) -> R {
    R::from_boundary(&boundary.call_managed(name, &mut []).unwrap()).unwrap()
}

#[test]
fn test_scalar_sentinels() {
    let (boundary, _rx) = boundary();
    assert!(call::<bool>(&boundary, "NoParamReturnBool"));
    assert_eq!(call::<Char8>(&boundary, "NoParamReturnChar8"), Char8(127));
    assert_eq!(call::<Char16>(&boundary, "NoParamReturnChar16"), Char16(65535));
    assert_eq!(call::<i8>(&boundary, "NoParamReturnInt8"), i8::MAX);
    assert_eq!(call::<i64>(&boundary, "NoParamReturnInt64"), i64::MAX);
    assert_eq!(call::<u32>(&boundary, "NoParamReturnUInt32"), u32::MAX);
    assert_eq!(call::<Pointer>(&boundary, "NoParamReturnPointer"), Pointer(1));
    assert_eq!(call::<f32>(&boundary, "NoParamReturnFloat"), f32::MAX);
    assert_eq!(call::<f64>(&boundary, "NoParamReturnDouble"), f64::MAX);
    assert_eq!(call::<Option<FunctionRef>>(&boundary, "NoParamReturnFunction"), None);
    assert_eq!(call::<String>(&boundary, "NoParamReturnString"), "Hello World");
    assert_eq!(
        boundary.call_managed("NoParamReturnVoid", &mut []).unwrap(),
        MarshaledValue::Void
    );
}

#[test]
fn test_array_golden_sequences() {
    let (boundary, _rx) = boundary();
    assert_eq!(call::<Vec<bool>>(&boundary, "NoParamReturnArrayBool"), vec![true, false]);
    assert_eq!(
        call::<Vec<Char8>>(&boundary, "NoParamReturnArrayChar8"),
        b"abcd".iter().copied().map(Char8).collect::<Vec<_>>()
    );
    assert_eq!(call::<Vec<i8>>(&boundary, "NoParamReturnArrayInt8"), vec![-3, -2, -1, 0, 1]);
    assert_eq!(
        call::<Vec<u64>>(&boundary, "NoParamReturnArrayUInt64"),
        (0..=11).collect::<Vec<u64>>()
    );
    assert_eq!(
        call::<Vec<Pointer>>(&boundary, "NoParamReturnArrayPointer"),
        vec![Pointer(0), Pointer(1), Pointer(2), Pointer(3)]
    );
    assert_eq!(
        call::<Vec<f64>>(&boundary, "NoParamReturnArrayDouble"),
        vec![-12.345, 0.0, 12.345]
    );

    let strings = call::<Vec<String>>(&boundary, "NoParamReturnArrayString");
    assert_eq!(strings.len(), 3);
    assert!(strings[2].len() >= 60);
    assert_eq!(
        strings[2],
        "3rd element string (Should be big enough to avoid small string optimization)"
    );

    let m = call::<Matrix4x4>(&boundary, "NoParamReturnMatrix4x4");
    assert_eq!(m.row(1), Vector4::new(5.0, 6.0, 7.0, 8.0));
    assert_eq!(m.get(3, 3), 16.0);
}

#[test]
fn test_param_ref4() {
    let (boundary, _rx) = boundary();
    let mut args = [
        0i32.to_boundary().unwrap(),
        0f32.to_boundary().unwrap(),
        0f64.to_boundary().unwrap(),
        Vector4::default().to_boundary().unwrap(),
    ];
    boundary.call_managed("ParamRef4", &mut args).unwrap();
    assert_eq!(i32::from_boundary(&args[0]).unwrap(), 100);
    assert!((f32::from_boundary(&args[1]).unwrap() - -5.55).abs() < 1e-5);
    assert!((f64::from_boundary(&args[2]).unwrap() - 1.618).abs() < 1e-12);
    assert_eq!(
        Vector4::from_boundary(&args[3]).unwrap(),
        Vector4::new(1.0, 2.0, 3.0, 4.0)
    );
}

#[test]
fn test_param_ref10_pointer_and_chars() {
    let (boundary, _rx) = boundary();
    let mut args = vec![
        0i32.to_boundary().unwrap(),
        0f32.to_boundary().unwrap(),
        0f64.to_boundary().unwrap(),
        Vector4::default().to_boundary().unwrap(),
        Vec::<i64>::new().to_boundary().unwrap(),
        Char16(0).to_boundary().unwrap(),
        String::new().to_boundary().unwrap(),
        Char16(0).to_boundary().unwrap(),
        0i16.to_boundary().unwrap(),
        Pointer::NULL.to_boundary().unwrap(),
    ];
    boundary.call_managed("ParamRef10", &mut args).unwrap();
    assert_eq!(
        Vec::<i64>::from_boundary(&args[4]).unwrap(),
        vec![-6, -5, -4, -3, -2, -1, 0, 1, 5, 9, 4, -7]
    );
    assert_eq!(Char16::from_boundary(&args[5]).unwrap(), Char16(u16::from(b'V')));
    assert_eq!(String::from_boundary(&args[6]).unwrap(), "Another string");
    assert_eq!(i16::from_boundary(&args[8]).unwrap(), -444);
    assert_eq!(Pointer::from_boundary(&args[9]).unwrap(), Pointer(0x1234_5678));
}

#[test]
fn test_param_ref_arrays_replace_regardless_of_input() {
    let (boundary, _rx) = boundary();
    let mut args = vec![
        vec![false; 9].to_boundary().unwrap(),
        Vec::<Char8>::new().to_boundary().unwrap(),
        Vec::<Char16>::new().to_boundary().unwrap(),
        vec![100i8; 40].to_boundary().unwrap(),
        Vec::<i16>::new().to_boundary().unwrap(),
        Vec::<i32>::new().to_boundary().unwrap(),
        Vec::<i64>::new().to_boundary().unwrap(),
        Vec::<u8>::new().to_boundary().unwrap(),
        Vec::<u16>::new().to_boundary().unwrap(),
        Vec::<u32>::new().to_boundary().unwrap(),
        Vec::<u64>::new().to_boundary().unwrap(),
        Vec::<Pointer>::new().to_boundary().unwrap(),
        Vec::<f32>::new().to_boundary().unwrap(),
        Vec::<f64>::new().to_boundary().unwrap(),
        vec!["x".to_string(); 20].to_boundary().unwrap(),
    ];
    boundary.call_managed("ParamRefArrays", &mut args).unwrap();

    assert_eq!(Vec::<bool>::from_boundary(&args[0]).unwrap(), vec![true]);
    assert_eq!(
        Vec::<Char16>::from_boundary(&args[2]).unwrap(),
        "def".encode_utf16().map(Char16).collect::<Vec<_>>()
    );
    assert_eq!(
        Vec::<i8>::from_boundary(&args[3]).unwrap(),
        vec![-3, -2, -1, 0, 1, 2, 3]
    );
    assert_eq!(
        Vec::<Pointer>::from_boundary(&args[11]).unwrap(),
        vec![Pointer(0), Pointer(1), Pointer(2)]
    );
    assert_eq!(
        Vec::<String>::from_boundary(&args[14]).unwrap(),
        vec!["1", "12", "123", "1234", "12345", "123456"]
    );
}

#[test]
fn test_param_all_primitives_reference_set() {
    let (boundary, _rx) = boundary();
    let mut args = [
        true.to_boundary().unwrap(),
        Char8(b'%').to_boundary().unwrap(),
        Char16(0x2622).to_boundary().unwrap(),
        (-1i8).to_boundary().unwrap(),
        (-1000i16).to_boundary().unwrap(),
        (-1_000_000i32).to_boundary().unwrap(),
        (-1_000_000_000_000i64).to_boundary().unwrap(),
        200u8.to_boundary().unwrap(),
        50000u16.to_boundary().unwrap(),
        3_000_000_000u32.to_boundary().unwrap(),
        9_999_999_999u64.to_boundary().unwrap(),
        Pointer(0xfedc_baab_cdef).to_boundary().unwrap(),
        0.001f32.to_boundary().unwrap(),
        987654.456789f64.to_boundary().unwrap(),
    ];
    let ret = boundary.call_managed("ParamAllPrimitives", &mut args).unwrap();
    assert_eq!(ret, MarshaledValue::Int64(279236978128427));
}

#[test]
fn test_param_by_value_untouched() {
    let (boundary, _rx) = boundary();
    let mut args = [
        7i32.to_boundary().unwrap(),
        1.5f32.to_boundary().unwrap(),
        2.5f64.to_boundary().unwrap(),
        Vector4::new(1.0, 2.0, 3.0, 4.0).to_boundary().unwrap(),
        vec![1i64, 2].to_boundary().unwrap(),
    ];
    let before = args.clone();
    boundary.call_managed("Param5", &mut args).unwrap();
    assert_eq!(args, before);
}

#[test]
fn test_reverse_call_delivers() {
    let (boundary, rx) = boundary();
    let mut args = ["NoParamReturnBool".to_boundary().unwrap()];
    boundary.call_managed("ReverseCall", &mut args).unwrap();
    assert_eq!(rx.try_recv().unwrap(), "true");

    let mut args = ["ParamRef2".to_boundary().unwrap()];
    boundary.call_managed("ReverseCall", &mut args).unwrap();
    assert_eq!(rx.try_recv().unwrap(), "10|3.1");
}

#[test]
fn test_reverse_call_unknown_name() {
    let (boundary, rx) = boundary();
    let mut args = ["unknown-name".to_boundary().unwrap()];
    boundary.call_managed("ReverseCall", &mut args).unwrap();
    assert!(rx.try_recv().is_err());

    // The bridge stays usable
    let mut args = ["NoParamReturnBool".to_boundary().unwrap()];
    boundary.call_managed("ReverseCall", &mut args).unwrap();
    assert_eq!(rx.try_recv().unwrap(), "true");
}

#[test]
fn test_reverse_call_missing_callback_faults() {
    let (boundary, rx) = boundary();
    let mut args = ["NoParamReturnInt32".to_boundary().unwrap()];
    assert!(boundary.call_managed("ReverseCall", &mut args).is_err());
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_worker_identity() {
    let (boundary, _rx) = boundary();
    let info = boundary.context(Side::Native).find_plugin(WORKER_NAME).unwrap();
    assert_eq!(info.name, "cross_call_worker");
    assert_eq!(boundary.exports(Side::Managed).len(), 59);
    assert_eq!(REVERSE_TESTS.len(), 58);
}
