//! Native `*Callback` entry points called back by the worker
//!
//! The by-value `Param<N>Callback` entries format what they received and
//! record the line in the [`CallLog`]; `DeliverResult` pushes reverse call
//! results into the result channel.

use std::sync::Arc;

use crossbeam::channel::Sender;
use parking_lot::Mutex;
use xcall_sdk::{
    export, CallContext, CallSignature, Char16, Char8, Export, FromBoundary, FunctionRef,
    MarshaledValue, Matrix4x4, Pointer, TypeTag, Vector2, Vector3, Vector4,
};

/// Lines recorded by the `Param<N>Callback` entry points.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line
    pub fn record(&self, line: String) {
        tracing::info!(%line, "callback");
        self.0.lock().push(line);
    }

    /// Snapshot of every recorded line
    pub fn lines(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    /// Most recent line
    pub fn last(&self) -> Option<String> {
        self.0.lock().last().cloned()
    }

    /// Number of recorded lines
    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    /// Check if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }

    /// Drop every recorded line
    pub fn clear(&self) {
        self.0.lock().clear();
    }
}

// ============================================================================
// No-parameter returns
// ============================================================================

#[export("NoParamReturnVoidCallback")]
fn no_param_return_void_callback() {}

#[export("NoParamReturnBoolCallback")]
fn no_param_return_bool_callback() -> bool {
    true
}

#[export("NoParamReturnChar8Callback")]
fn no_param_return_char8_callback() -> Char8 {
    Char8(i8::MAX as u8)
}

#[export("NoParamReturnChar16Callback")]
fn no_param_return_char16_callback() -> Char16 {
    Char16(u16::MAX)
}

#[export("NoParamReturnInt8Callback")]
fn no_param_return_int8_callback() -> i8 {
    i8::MAX
}

#[export("NoParamReturnInt16Callback")]
fn no_param_return_int16_callback() -> i16 {
    i16::MAX
}

#[export("NoParamReturnInt32Callback")]
fn no_param_return_int32_callback() -> i32 {
    i32::MAX
}

#[export("NoParamReturnInt64Callback")]
fn no_param_return_int64_callback() -> i64 {
    i64::MAX
}

#[export("NoParamReturnUInt8Callback")]
fn no_param_return_uint8_callback() -> u8 {
    u8::MAX
}

#[export("NoParamReturnUInt16Callback")]
fn no_param_return_uint16_callback() -> u16 {
    u16::MAX
}

#[export("NoParamReturnUInt32Callback")]
fn no_param_return_uint32_callback() -> u32 {
    u32::MAX
}

#[export("NoParamReturnUInt64Callback")]
fn no_param_return_uint64_callback() -> u64 {
    u64::MAX
}

#[export("NoParamReturnPointerCallback")]
fn no_param_return_pointer_callback() -> Pointer {
    Pointer(1)
}

#[export("NoParamReturnFloatCallback")]
fn no_param_return_float_callback() -> f32 {
    f32::MAX
}

#[export("NoParamReturnDoubleCallback")]
fn no_param_return_double_callback() -> f64 {
    f64::MAX
}

#[export("NoParamReturnFunctionCallback")]
fn no_param_return_function_callback(ctx: &dyn CallContext) -> Option<FunctionRef> {
    ctx.function_ref("NoParamReturnInt32Callback")
}

#[export("NoParamReturnStringCallback")]
fn no_param_return_string_callback() -> String {
    "Hello World".to_string()
}

#[export("NoParamReturnArrayBoolCallback")]
fn no_param_return_array_bool_callback() -> Vec<bool> {
    vec![true, false]
}

#[export("NoParamReturnArrayChar8Callback")]
fn no_param_return_array_char8_callback() -> Vec<Char8> {
    b"abc".iter().copied().map(Char8).collect()
}

#[export("NoParamReturnArrayChar16Callback")]
fn no_param_return_array_char16_callback() -> Vec<Char16> {
    "abcd".encode_utf16().map(Char16).collect()
}

#[export("NoParamReturnArrayInt8Callback")]
fn no_param_return_array_int8_callback() -> Vec<i8> {
    (-3..=1).collect()
}

#[export("NoParamReturnArrayInt16Callback")]
fn no_param_return_array_int16_callback() -> Vec<i16> {
    (-4..=1).collect()
}

#[export("NoParamReturnArrayInt32Callback")]
fn no_param_return_array_int32_callback() -> Vec<i32> {
    (-5..=1).collect()
}

#[export("NoParamReturnArrayInt64Callback")]
fn no_param_return_array_int64_callback() -> Vec<i64> {
    (-6..=1).collect()
}

#[export("NoParamReturnArrayUInt8Callback")]
fn no_param_return_array_uint8_callback() -> Vec<u8> {
    (0..=8).collect()
}

#[export("NoParamReturnArrayUInt16Callback")]
fn no_param_return_array_uint16_callback() -> Vec<u16> {
    (0..=9).collect()
}

#[export("NoParamReturnArrayUInt32Callback")]
fn no_param_return_array_uint32_callback() -> Vec<u32> {
    (0..=10).collect()
}

#[export("NoParamReturnArrayUInt64Callback")]
fn no_param_return_array_uint64_callback() -> Vec<u64> {
    (0..=11).collect()
}

#[export("NoParamReturnArrayPointerCallback")]
fn no_param_return_array_pointer_callback() -> Vec<Pointer> {
    (0..=3).map(Pointer).collect()
}

#[export("NoParamReturnArrayFloatCallback")]
fn no_param_return_array_float_callback() -> Vec<f32> {
    vec![-12.34, 0.0, 12.34]
}

#[export("NoParamReturnArrayDoubleCallback")]
fn no_param_return_array_double_callback() -> Vec<f64> {
    vec![-12.345, 0.0, 12.345]
}

#[export("NoParamReturnArrayStringCallback")]
fn no_param_return_array_string_callback() -> Vec<String> {
    vec![
        "1st string".to_string(),
        "2nd string".to_string(),
        "3rd element string (Should be big enough to avoid small string optimization)"
            .to_string(),
    ]
}

#[export("NoParamReturnVector2Callback")]
fn no_param_return_vector2_callback() -> Vector2 {
    Vector2::new(1.0, 2.0)
}

#[export("NoParamReturnVector3Callback")]
fn no_param_return_vector3_callback() -> Vector3 {
    Vector3::new(1.0, 2.0, 3.0)
}

#[export("NoParamReturnVector4Callback")]
fn no_param_return_vector4_callback() -> Vector4 {
    Vector4::new(1.0, 2.0, 3.0, 4.0)
}

#[export("NoParamReturnMatrix4x4Callback")]
fn no_param_return_matrix4x4_callback() -> Matrix4x4 {
    Matrix4x4::from_row_major(std::array::from_fn(|i| (i + 1) as f32))
}

// ============================================================================
// By-value parameters
// ============================================================================
//
// These render their arguments; `logged` turns the rendered line into a
// log entry and makes the entry point itself return nothing.

fn vec4(d: &Vector4) -> String {
    format!("[{},{},{},{}]", d.x, d.y, d.z, d.w)
}

fn list(e: &[i64]) -> String {
    let parts: Vec<String> = e.iter().map(|v| v.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

#[export("Param1Callback")]
fn param1_callback(a: i32) -> String {
    format!("Param1: a = {}", a)
}

#[export("Param2Callback")]
fn param2_callback(a: i32, b: f32) -> String {
    format!("Param2: a = {}, b = {}", a, b)
}

#[export("Param3Callback")]
fn param3_callback(a: i32, b: f32, c: f64) -> String {
    format!("Param3: a = {}, b = {}, c = {}", a, b, c)
}

#[export("Param4Callback")]
fn param4_callback(a: i32, b: f32, c: f64, d: Vector4) -> String {
    format!("Param4: a = {}, b = {}, c = {}, d = {}", a, b, c, vec4(&d))
}

#[export("Param5Callback")]
fn param5_callback(a: i32, b: f32, c: f64, d: Vector4, e: &[i64]) -> String {
    format!(
        "Param5: a = {}, b = {}, c = {}, d = {}, e = {}",
        a,
        b,
        c,
        vec4(&d),
        list(e)
    )
}

#[export("Param6Callback")]
fn param6_callback(a: i32, b: f32, c: f64, d: Vector4, e: &[i64], f: Char16) -> String {
    format!(
        "Param6: a = {}, b = {}, c = {}, d = {}, e = {}, f = {}",
        a,
        b,
        c,
        vec4(&d),
        list(e),
        f
    )
}

#[export("Param7Callback")]
fn param7_callback(
    a: i32,
    b: f32,
    c: f64,
    d: Vector4,
    e: &[i64],
    f: Char16,
    g: &str,
) -> String {
    format!(
        "Param7: a = {}, b = {}, c = {}, d = {}, e = {}, f = {}, g = {}",
        a,
        b,
        c,
        vec4(&d),
        list(e),
        f,
        g
    )
}

#[export("Param8Callback")]
#[allow(clippy::too_many_arguments)]
fn param8_callback(
    a: i32,
    b: f32,
    c: f64,
    d: Vector4,
    e: &[i64],
    f: Char16,
    g: &str,
    h: Char16,
) -> String {
    format!(
        "Param8: a = {}, b = {}, c = {}, d = {}, e = {}, f = {}, g = {}, h = {}",
        a,
        b,
        c,
        vec4(&d),
        list(e),
        f,
        g,
        h
    )
}

#[export("Param9Callback")]
#[allow(clippy::too_many_arguments)]
fn param9_callback(
    a: i32,
    b: f32,
    c: f64,
    d: Vector4,
    e: &[i64],
    f: Char16,
    g: &str,
    h: Char16,
    k: i16,
) -> String {
    format!(
        "Param9: a = {}, b = {}, c = {}, d = {}, e = {}, f = {}, g = {}, h = {}, k = {}",
        a,
        b,
        c,
        vec4(&d),
        list(e),
        f,
        g,
        h,
        k
    )
}

#[export("Param10Callback")]
#[allow(clippy::too_many_arguments)]
fn param10_callback(
    a: i32,
    b: f32,
    c: f64,
    d: Vector4,
    e: &[i64],
    f: Char16,
    g: &str,
    h: Char16,
    k: i16,
    l: Pointer,
) -> String {
    format!(
        "Param10: a = {}, b = {}, c = {}, d = {}, e = {}, f = {}, g = {}, h = {}, k = {}, l = {}",
        a,
        b,
        c,
        vec4(&d),
        list(e),
        f,
        g,
        h,
        k,
        l
    )
}

/// Wraps an entry point returning its rendered arguments into one that
/// records the line and returns nothing.
fn logged(inner: Export, log: CallLog) -> Export {
    let mut signature = CallSignature::new(inner.name());
    for param in inner.signature().params() {
        signature = if param.is_reference() {
            signature.param_ref(param.tag.clone())
        } else {
            signature.param(param.tag.clone())
        };
    }

    Export::new(signature, move |ctx, args| {
        let line = String::from_boundary(&inner.invoke(ctx, args)?)?;
        log.record(line);
        Ok(MarshaledValue::Void)
    })
}

// ============================================================================
// By-reference parameters
// ============================================================================

fn ch(c: u8) -> Char16 {
    Char16(u16::from(c))
}

#[export("ParamRef1Callback")]
fn param_ref1_callback(a: &mut i32) {
    *a = 42;
}

#[export("ParamRef2Callback")]
fn param_ref2_callback(a: &mut i32, b: &mut f32) {
    *a = 10;
    *b = 3.14;
}

#[export("ParamRef3Callback")]
fn param_ref3_callback(a: &mut i32, b: &mut f32, c: &mut f64) {
    *a = -20;
    *b = 2.718;
    *c = 3.14159;
}

#[export("ParamRef4Callback")]
fn param_ref4_callback(a: &mut i32, b: &mut f32, c: &mut f64, d: &mut Vector4) {
    *a = 100;
    *b = -5.55;
    *c = 1.618;
    *d = Vector4::new(1.0, 2.0, 3.0, 4.0);
}

#[export("ParamRef5Callback")]
fn param_ref5_callback(
    a: &mut i32,
    b: &mut f32,
    c: &mut f64,
    d: &mut Vector4,
    e: &mut Vec<i64>,
) {
    *a = 500;
    *b = -10.5;
    *c = 2.71828;
    *d = Vector4::new(-1.0, -2.0, -3.0, -4.0);
    *e = vec![-6, -5, -4, -3, -2, -1, 0, 1];
}

#[export("ParamRef6Callback")]
fn param_ref6_callback(
    a: &mut i32,
    b: &mut f32,
    c: &mut f64,
    d: &mut Vector4,
    e: &mut Vec<i64>,
    f: &mut Char16,
) {
    *a = 750;
    *b = 20.0;
    *c = 1.23456;
    *d = Vector4::new(10.0, 20.0, 30.0, 40.0);
    *e = vec![-6, -5, -4];
    *f = ch(b'Z');
}

#[export("ParamRef7Callback")]
#[allow(clippy::too_many_arguments)]
fn param_ref7_callback(
    a: &mut i32,
    b: &mut f32,
    c: &mut f64,
    d: &mut Vector4,
    e: &mut Vec<i64>,
    f: &mut Char16,
    g: &mut String,
) {
    *a = -1000;
    *b = 3.0;
    *c = -1.0;
    *d = Vector4::new(100.0, 200.0, 300.0, 400.0);
    *e = vec![-6, -5, -4, -3];
    *f = ch(b'X');
    *g = "Hello, World!".to_string();
}

#[export("ParamRef8Callback")]
#[allow(clippy::too_many_arguments)]
fn param_ref8_callback(
    a: &mut i32,
    b: &mut f32,
    c: &mut f64,
    d: &mut Vector4,
    e: &mut Vec<i64>,
    f: &mut Char16,
    g: &mut String,
    h: &mut Char16,
) {
    *a = 999;
    *b = -7.5;
    *c = 0.123456;
    *d = Vector4::new(-100.0, -200.0, -300.0, -400.0);
    *e = vec![-6, -5, -4, -3, -2, -1];
    *f = ch(b'Y');
    *g = "Goodbye, World!".to_string();
    *h = ch(b'A');
}

#[export("ParamRef9Callback")]
#[allow(clippy::too_many_arguments)]
fn param_ref9_callback(
    a: &mut i32,
    b: &mut f32,
    c: &mut f64,
    d: &mut Vector4,
    e: &mut Vec<i64>,
    f: &mut Char16,
    g: &mut String,
    h: &mut Char16,
    k: &mut i16,
) {
    *a = -1234;
    *b = 123.45;
    *c = -678.9;
    *d = Vector4::new(987.65, 432.1, 123.456, 789.123);
    *e = vec![-6, -5, -4, -3, -2, -1, 0, 1, 5, 9];
    *f = ch(b'A');
    *g = "Testing, 1 2 3".to_string();
    *h = ch(b'B');
    *k = 42;
}

#[export("ParamRef10Callback")]
#[allow(clippy::too_many_arguments)]
fn param_ref10_callback(
    a: &mut i32,
    b: &mut f32,
    c: &mut f64,
    d: &mut Vector4,
    e: &mut Vec<i64>,
    f: &mut Char16,
    g: &mut String,
    h: &mut Char16,
    k: &mut i16,
    l: &mut Pointer,
) {
    *a = 987;
    *b = -0.123;
    *c = 456.789;
    *d = Vector4::new(-123.456, 0.987, 654.321, -789.123);
    *e = vec![-6, -5, -4, -3, -2, -1, 0, 1, 5, 9, 4, -7];
    *f = ch(b'B');
    *g = "Another string".to_string();
    *h = ch(b'C');
    *k = i16::MIN;
    *l = Pointer::NULL;
}

#[export("ParamRefArraysCallback")]
#[allow(clippy::too_many_arguments)]
fn param_ref_arrays_callback(
    a: &mut Vec<bool>,
    b: &mut Vec<Char8>,
    c: &mut Vec<Char16>,
    d: &mut Vec<i8>,
    e: &mut Vec<i16>,
    f: &mut Vec<i32>,
    g: &mut Vec<i64>,
    h: &mut Vec<u8>,
    k: &mut Vec<u16>,
    l: &mut Vec<u32>,
    m: &mut Vec<u64>,
    n: &mut Vec<Pointer>,
    o: &mut Vec<f32>,
    p: &mut Vec<f64>,
    r: &mut Vec<String>,
) {
    *a = vec![true];
    *b = b"abc".iter().copied().map(Char8).collect();
    *c = "abc".encode_utf16().map(Char16).collect();
    *d = (-3..=3).collect();
    *e = (-4..=4).collect();
    *f = (-5..=5).collect();
    *g = (-6..=6).collect();
    *h = (0..=7).collect();
    *k = (0..=8).collect();
    *l = (0..=9).collect();
    *m = (0..=10).collect();
    *n = vec![Pointer(0), Pointer(1)];
    *o = vec![-12.34, 0.0, 12.34];
    *p = vec![-12.345, 0.0, 12.345];
    *r = vec!["Hello".to_string(), "World".to_string(), "OpenAI".to_string()];
}

#[export("ParamAllPrimitivesCallback")]
#[allow(clippy::too_many_arguments)]
fn param_all_primitives_callback(
    a: bool,
    b: Char8,
    c: Char16,
    d: i8,
    e: i16,
    f: i32,
    g: i64,
    h: u8,
    k: u16,
    l: u32,
    m: u64,
    n: Pointer,
    o: f32,
    p: f64,
) -> i64 {
    let mut sum = a as i64;
    for v in [
        b.code() as i64,
        c.code() as i64,
        d as i64,
        e as i64,
        f as i64,
        g,
        h as i64,
        k as i64,
        l as i64,
        m as i64,
        n.addr() as i64,
        o as i64,
        p as i64,
    ] {
        sum = sum.wrapping_add(v);
    }
    sum
}

// ============================================================================
// Result delivery
// ============================================================================

/// `DeliverResult(result: String)`: hands a reverse call result to the
/// host through `results`.
pub fn deliver_result(results: Sender<String>) -> Export {
    Export::new(
        CallSignature::new("DeliverResult").param(TypeTag::String),
        move |_ctx, args| {
            let result = String::from_boundary(&args[0])?;
            tracing::debug!(%result, "result delivered");
            results
                .send(result)
                .map_err(|_| "result channel closed".to_string())?;
            Ok(MarshaledValue::Void)
        },
    )
}

/// Every native entry point, recording into `log` and delivering into
/// `results`.
pub fn native_exports(log: &CallLog, results: Sender<String>) -> Vec<Export> {
    let mut exports = vec![
        no_param_return_void_callback_export(),
        no_param_return_bool_callback_export(),
        no_param_return_char8_callback_export(),
        no_param_return_char16_callback_export(),
        no_param_return_int8_callback_export(),
        no_param_return_int16_callback_export(),
        no_param_return_int32_callback_export(),
        no_param_return_int64_callback_export(),
        no_param_return_uint8_callback_export(),
        no_param_return_uint16_callback_export(),
        no_param_return_uint32_callback_export(),
        no_param_return_uint64_callback_export(),
        no_param_return_pointer_callback_export(),
        no_param_return_float_callback_export(),
        no_param_return_double_callback_export(),
        no_param_return_function_callback_export(),
        no_param_return_string_callback_export(),
        no_param_return_array_bool_callback_export(),
        no_param_return_array_char8_callback_export(),
        no_param_return_array_char16_callback_export(),
        no_param_return_array_int8_callback_export(),
        no_param_return_array_int16_callback_export(),
        no_param_return_array_int32_callback_export(),
        no_param_return_array_int64_callback_export(),
        no_param_return_array_uint8_callback_export(),
        no_param_return_array_uint16_callback_export(),
        no_param_return_array_uint32_callback_export(),
        no_param_return_array_uint64_callback_export(),
        no_param_return_array_pointer_callback_export(),
        no_param_return_array_float_callback_export(),
        no_param_return_array_double_callback_export(),
        no_param_return_array_string_callback_export(),
        no_param_return_vector2_callback_export(),
        no_param_return_vector3_callback_export(),
        no_param_return_vector4_callback_export(),
        no_param_return_matrix4x4_callback_export(),
    ];

    let params = [
        param1_callback_export(),
        param2_callback_export(),
        param3_callback_export(),
        param4_callback_export(),
        param5_callback_export(),
        param6_callback_export(),
        param7_callback_export(),
        param8_callback_export(),
        param9_callback_export(),
        param10_callback_export(),
    ];
    exports.extend(params.into_iter().map(|inner| logged(inner, log.clone())));

    exports.extend([
        param_ref1_callback_export(),
        param_ref2_callback_export(),
        param_ref3_callback_export(),
        param_ref4_callback_export(),
        param_ref5_callback_export(),
        param_ref6_callback_export(),
        param_ref7_callback_export(),
        param_ref8_callback_export(),
        param_ref9_callback_export(),
        param_ref10_callback_export(),
        param_ref_arrays_callback_export(),
        param_all_primitives_callback_export(),
        deliver_result(results),
    ]);
    exports
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_lines() {
        assert_eq!(param1_callback(999), "Param1: a = 999");
        assert_eq!(
            param6_callback(
                444,
                5.5,
                6.5987,
                Vector4::new(110.1, 210.2, 310.3, 410.4),
                &[90000, -100, 20000],
                ch(b'A'),
            ),
            "Param6: a = 444, b = 5.5, c = 6.5987, d = [110.1,210.2,310.3,410.4], \
             e = [90000, -100, 20000], f = A"
        );
        assert_eq!(list(&[]), "[]");
    }

    #[test]
    fn test_logged_signature_drops_return() {
        let log = CallLog::new();
        let export = logged(param2_callback_export(), log.clone());
        assert_eq!(export.name(), "Param2Callback");
        assert_eq!(export.signature().arity(), 2);
        assert!(export.signature().ret().is_none());
        assert!(log.is_empty());
    }

    #[test]
    fn test_native_catalogue() {
        let (tx, _rx) = crossbeam::channel::unbounded();
        let exports = native_exports(&CallLog::new(), tx);
        assert_eq!(exports.len(), 59);
        assert!(exports.iter().any(|e| e.name() == "DeliverResult"));
        assert!(exports
            .iter()
            .all(|e| e.name() == "DeliverResult" || e.name().ends_with("Callback")));
    }

    #[test]
    fn test_all_primitives_callback_sum() {
        let sum = param_all_primitives_callback(
            true,
            Char8(b'%'),
            Char16(0x2622),
            -1,
            -1000,
            -1_000_000,
            -1_000_000_000_000,
            200,
            50000,
            3_000_000_000,
            9_999_999_999,
            Pointer(0xfedc_baab_cdef),
            0.001,
            987654.456789,
        );
        assert_eq!(sum, 279236978128427);
    }
}
