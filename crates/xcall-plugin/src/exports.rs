//! Forward entry points of the worker plugin
//!
//! Each function answers with fixed values so the host can check every
//! value kind crossing the boundary in both directions.

use tracing::info;
use xcall_sdk::{
    export, BoundaryResult, CallContext, Char16, Char8, Export, FunctionRef, Matrix4x4, Pointer,
    ToBoundary, Vector2, Vector3, Vector4,
};

use crate::reverse::REVERSE_TESTS;

const LONG_STRING: &str =
    "3rd element string (Should be big enough to avoid small string optimization)";

// ============================================================================
// No-parameter returns
// ============================================================================

#[export("NoParamReturnVoid")]
pub fn no_param_return_void() {
    info!("NoParamReturnVoid");
}

#[export("NoParamReturnBool")]
pub fn no_param_return_bool() -> bool {
    true
}

#[export("NoParamReturnChar8")]
pub fn no_param_return_char8() -> Char8 {
    Char8(i8::MAX as u8)
}

#[export("NoParamReturnChar16")]
pub fn no_param_return_char16() -> Char16 {
    Char16(u16::MAX)
}

#[export("NoParamReturnInt8")]
pub fn no_param_return_int8() -> i8 {
    i8::MAX
}

#[export("NoParamReturnInt16")]
pub fn no_param_return_int16() -> i16 {
    i16::MAX
}

#[export("NoParamReturnInt32")]
pub fn no_param_return_int32() -> i32 {
    i32::MAX
}

#[export("NoParamReturnInt64")]
pub fn no_param_return_int64() -> i64 {
    i64::MAX
}

#[export("NoParamReturnUInt8")]
pub fn no_param_return_uint8() -> u8 {
    u8::MAX
}

#[export("NoParamReturnUInt16")]
pub fn no_param_return_uint16() -> u16 {
    u16::MAX
}

#[export("NoParamReturnUInt32")]
pub fn no_param_return_uint32() -> u32 {
    u32::MAX
}

#[export("NoParamReturnUInt64")]
pub fn no_param_return_uint64() -> u64 {
    u64::MAX
}

#[export("NoParamReturnPointer")]
pub fn no_param_return_pointer() -> Pointer {
    Pointer(1)
}

#[export("NoParamReturnFloat")]
pub fn no_param_return_float() -> f32 {
    f32::MAX
}

#[export("NoParamReturnDouble")]
pub fn no_param_return_double() -> f64 {
    f64::MAX
}

#[export("NoParamReturnFunction")]
pub fn no_param_return_function() -> Option<FunctionRef> {
    None
}

#[export("NoParamReturnString")]
pub fn no_param_return_string() -> String {
    "Hello World".to_string()
}

#[export("NoParamReturnArrayBool")]
pub fn no_param_return_array_bool() -> Vec<bool> {
    vec![true, false]
}

#[export("NoParamReturnArrayChar8")]
pub fn no_param_return_array_char8() -> Vec<Char8> {
    b"abcd".iter().copied().map(Char8).collect()
}

#[export("NoParamReturnArrayChar16")]
pub fn no_param_return_array_char16() -> Vec<Char16> {
    "abcd".encode_utf16().map(Char16).collect()
}

#[export("NoParamReturnArrayInt8")]
pub fn no_param_return_array_int8() -> Vec<i8> {
    (-3..=1).collect()
}

#[export("NoParamReturnArrayInt16")]
pub fn no_param_return_array_int16() -> Vec<i16> {
    (-4..=1).collect()
}

#[export("NoParamReturnArrayInt32")]
pub fn no_param_return_array_int32() -> Vec<i32> {
    (-5..=1).collect()
}

#[export("NoParamReturnArrayInt64")]
pub fn no_param_return_array_int64() -> Vec<i64> {
    (-6..=1).collect()
}

#[export("NoParamReturnArrayUInt8")]
pub fn no_param_return_array_uint8() -> Vec<u8> {
    (0..=8).collect()
}

#[export("NoParamReturnArrayUInt16")]
pub fn no_param_return_array_uint16() -> Vec<u16> {
    (0..=9).collect()
}

#[export("NoParamReturnArrayUInt32")]
pub fn no_param_return_array_uint32() -> Vec<u32> {
    (0..=10).collect()
}

#[export("NoParamReturnArrayUInt64")]
pub fn no_param_return_array_uint64() -> Vec<u64> {
    (0..=11).collect()
}

#[export("NoParamReturnArrayPointer")]
pub fn no_param_return_array_pointer() -> Vec<Pointer> {
    (0..=3).map(Pointer).collect()
}

#[export("NoParamReturnArrayFloat")]
pub fn no_param_return_array_float() -> Vec<f32> {
    vec![-12.34, 0.0, 12.34]
}

#[export("NoParamReturnArrayDouble")]
pub fn no_param_return_array_double() -> Vec<f64> {
    vec![-12.345, 0.0, 12.345]
}

#[export("NoParamReturnArrayString")]
pub fn no_param_return_array_string() -> Vec<String> {
    vec![
        "1st string".to_string(),
        "2nd string".to_string(),
        LONG_STRING.to_string(),
    ]
}

#[export("NoParamReturnVector2")]
pub fn no_param_return_vector2() -> Vector2 {
    Vector2::new(1.0, 2.0)
}

#[export("NoParamReturnVector3")]
pub fn no_param_return_vector3() -> Vector3 {
    Vector3::new(1.0, 2.0, 3.0)
}

#[export("NoParamReturnVector4")]
pub fn no_param_return_vector4() -> Vector4 {
    Vector4::new(1.0, 2.0, 3.0, 4.0)
}

#[export("NoParamReturnMatrix4x4")]
pub fn no_param_return_matrix4x4() -> Matrix4x4 {
    Matrix4x4::from_row_major(std::array::from_fn(|i| (i + 1) as f32))
}

// ============================================================================
// By-value parameters
// ============================================================================

#[export("Param1")]
pub fn param1(a: i32) {
    info!(a, "Param1");
}

#[export("Param2")]
pub fn param2(a: i32, b: f32) {
    info!(a, b, "Param2");
}

#[export("Param3")]
pub fn param3(a: i32, b: f32, c: f64) {
    info!(a, b, c, "Param3");
}

#[export("Param4")]
pub fn param4(a: i32, b: f32, c: f64, d: Vector4) {
    info!(a, b, c, d = ?d, "Param4");
}

#[export("Param5")]
pub fn param5(a: i32, b: f32, c: f64, d: Vector4, e: &[i64]) {
    info!(a, b, c, d = ?d, e = ?e, "Param5");
}

#[export("Param6")]
pub fn param6(a: i32, b: f32, c: f64, d: Vector4, e: &[i64], f: Char16) {
    info!(a, b, c, d = ?d, e = ?e, f = %f, "Param6");
}

#[export("Param7")]
pub fn param7(a: i32, b: f32, c: f64, d: Vector4, e: &[i64], f: Char16, g: &str) {
    info!(a, b, c, d = ?d, e = ?e, f = %f, g, "Param7");
}

#[export("Param8")]
#[allow(clippy::too_many_arguments)]
pub fn param8(a: i32, b: f32, c: f64, d: Vector4, e: &[i64], f: Char16, g: &str, h: Char16) {
    info!(a, b, c, d = ?d, e = ?e, f = %f, g, h = %h, "Param8");
}

#[export("Param9")]
#[allow(clippy::too_many_arguments)]
pub fn param9(
    a: i32,
    b: f32,
    c: f64,
    d: Vector4,
    e: &[i64],
    f: Char16,
    g: &str,
    h: Char16,
    k: i16,
) {
    info!(a, b, c, d = ?d, e = ?e, f = %f, g, h = %h, k, "Param9");
}

#[export("Param10")]
#[allow(clippy::too_many_arguments)]
pub fn param10(
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
) {
    info!(a, b, c, d = ?d, e = ?e, f = %f, g, h = %h, k, l = %l, "Param10");
}

// ============================================================================
// By-reference parameters
// ============================================================================

#[export("ParamRef1")]
pub fn param_ref1(a: &mut i32) {
    *a = 42;
}

#[export("ParamRef2")]
pub fn param_ref2(a: &mut i32, b: &mut f32) {
    *a = 10;
    *b = 3.14;
}

#[export("ParamRef3")]
pub fn param_ref3(a: &mut i32, b: &mut f32, c: &mut f64) {
    *a = -20;
    *b = 2.718;
    *c = 3.14159;
}

#[export("ParamRef4")]
pub fn param_ref4(a: &mut i32, b: &mut f32, c: &mut f64, d: &mut Vector4) {
    *a = 100;
    *b = -5.55;
    *c = 1.618;
    *d = Vector4::new(1.0, 2.0, 3.0, 4.0);
}

#[export("ParamRef5")]
pub fn param_ref5(a: &mut i32, b: &mut f32, c: &mut f64, d: &mut Vector4, e: &mut Vec<i64>) {
    *a = 500;
    *b = -10.5;
    *c = 2.71828;
    *d = Vector4::new(-1.0, -2.0, -3.0, -4.0);
    *e = vec![-6, -5, -4, -3, -2, -1, 0, 1];
}

#[export("ParamRef6")]
pub fn param_ref6(
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
    *f = Char16(b'Z' as u16);
}

#[export("ParamRef7")]
#[allow(clippy::too_many_arguments)]
pub fn param_ref7(
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
    *f = Char16(b'Y' as u16);
    *g = "Hello, World!".to_string();
}

#[export("ParamRef8")]
#[allow(clippy::too_many_arguments)]
pub fn param_ref8(
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
    *f = Char16(b'X' as u16);
    *g = "Goodbye, World!".to_string();
    *h = Char16(b'A' as u16);
}

#[export("ParamRef9")]
#[allow(clippy::too_many_arguments)]
pub fn param_ref9(
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
    *f = Char16(b'W' as u16);
    *g = "Testing, 1 2 3".to_string();
    *h = Char16(b'B' as u16);
    *k = 42;
}

#[export("ParamRef10")]
#[allow(clippy::too_many_arguments)]
pub fn param_ref10(
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
    *f = Char16(b'V' as u16);
    *g = "Another string".to_string();
    *h = Char16(b'C' as u16);
    *k = -444;
    *l = Pointer(0x1234_5678);
}

#[export("ParamRefArrays")]
#[allow(clippy::too_many_arguments)]
pub fn param_ref_arrays(
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
    *c = "def".encode_utf16().map(Char16).collect();
    *d = (-3..=3).collect();
    *e = (-4..=4).collect();
    *f = (-5..=5).collect();
    *g = (-6..=6).collect();
    *h = (0..=7).collect();
    *k = (0..=8).collect();
    *l = (0..=9).collect();
    *m = (0..=10).collect();
    *n = (0..=2).map(Pointer).collect();
    *o = vec![-12.34, 0.0, 12.34];
    *p = vec![-12.345, 0.0, 12.345];
    *r = ["1", "12", "123", "1234", "12345", "123456"]
        .iter()
        .map(|s| s.to_string())
        .collect();
}

// ============================================================================
// Mixed primitives
// ============================================================================

#[export("ParamAllPrimitives")]
#[allow(clippy::too_many_arguments)]
pub fn param_all_primitives(
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
    [
        a as i64,
        b.0 as i64,
        c.0 as i64,
        d as i64,
        e as i64,
        f as i64,
        g,
        h as i64,
        k as i64,
        l as i64,
        m as i64,
        n.0 as i64,
        o as i64,
        p as i64,
    ]
    .into_iter()
    .fold(0i64, i64::wrapping_add)
}

// ============================================================================
// Reverse bridge
// ============================================================================

/// Runs the reverse test registered under `test` and delivers its result
/// to the native side. Unknown names are logged and ignored.
#[export("ReverseCall")]
pub fn reverse_call(ctx: &dyn CallContext, test: &str) -> BoundaryResult<()> {
    let Some(method) = REVERSE_TESTS.get(test) else {
        tracing::warn!(test, "Method not found");
        return Ok(());
    };

    let result = method(ctx)?;
    if !result.is_empty() {
        ctx.invoke_void("DeliverResult", &mut [result.to_boundary()?])?;
    }
    Ok(())
}

/// Every entry point of the worker, in catalogue order.
pub fn all_exports() -> Vec<Export> {
    vec![
        no_param_return_void_export(),
        no_param_return_bool_export(),
        no_param_return_char8_export(),
        no_param_return_char16_export(),
        no_param_return_int8_export(),
        no_param_return_int16_export(),
        no_param_return_int32_export(),
        no_param_return_int64_export(),
        no_param_return_uint8_export(),
        no_param_return_uint16_export(),
        no_param_return_uint32_export(),
        no_param_return_uint64_export(),
        no_param_return_pointer_export(),
        no_param_return_float_export(),
        no_param_return_double_export(),
        no_param_return_function_export(),
        no_param_return_string_export(),
        no_param_return_array_bool_export(),
        no_param_return_array_char8_export(),
        no_param_return_array_char16_export(),
        no_param_return_array_int8_export(),
        no_param_return_array_int16_export(),
        no_param_return_array_int32_export(),
        no_param_return_array_int64_export(),
        no_param_return_array_uint8_export(),
        no_param_return_array_uint16_export(),
        no_param_return_array_uint32_export(),
        no_param_return_array_uint64_export(),
        no_param_return_array_pointer_export(),
        no_param_return_array_float_export(),
        no_param_return_array_double_export(),
        no_param_return_array_string_export(),
        no_param_return_vector2_export(),
        no_param_return_vector3_export(),
        no_param_return_vector4_export(),
        no_param_return_matrix4x4_export(),
        param1_export(),
        param2_export(),
        param3_export(),
        param4_export(),
        param5_export(),
        param6_export(),
        param7_export(),
        param8_export(),
        param9_export(),
        param10_export(),
        param_ref1_export(),
        param_ref2_export(),
        param_ref3_export(),
        param_ref4_export(),
        param_ref5_export(),
        param_ref6_export(),
        param_ref7_export(),
        param_ref8_export(),
        param_ref9_export(),
        param_ref10_export(),
        param_ref_arrays_export(),
        param_all_primitives_export(),
        reverse_call_export(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_names_unique() {
        let exports = all_exports();
        let mut names: Vec<&str> = exports.iter().map(Export::name).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
        assert_eq!(total, 59);
    }

    #[test]
    fn test_all_primitives_sum() {
        let sum = param_all_primitives(
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

    #[test]
    fn test_all_primitives_wraps() {
        let sum = param_all_primitives(
            false,
            Char8(0),
            Char16(0),
            0,
            0,
            0,
            i64::MAX,
            0,
            0,
            0,
            1,
            Pointer(0),
            0.0,
            0.0,
        );
        assert_eq!(sum, i64::MIN);
    }

    #[test]
    fn test_param_ref_arrays_signature() {
        let export = param_ref_arrays_export();
        assert_eq!(export.signature().arity(), 15);
        assert_eq!(export.signature().references().count(), 15);
    }
}
