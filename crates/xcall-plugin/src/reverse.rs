//! Reverse call registry
//!
//! Maps a test name to a callable that calls the matching `<Name>Callback`
//! entry point on the native side and renders what came back as text.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use xcall_sdk::{
    BoundaryResult, CallContext, Char16, Char8, FromBoundary, FunctionRef, Matrix4x4,
    MarshaledValue, Pointer, ToBoundary, Vector2, Vector3, Vector4,
};

use crate::format::{braced, fields, fixed, hex, matrix, quoted, trimmed, vector};

/// A reverse test: runs against the native side, returns the text to
/// deliver. An empty string means nothing is delivered.
pub type ReverseTest = fn(&dyn CallContext) -> BoundaryResult<String>;

/// Name to reverse test lookup, fixed after construction.
pub struct ReverseCallRegistry {
    tests: FxHashMap<&'static str, ReverseTest>,
    order: Vec<&'static str>,
}

impl ReverseCallRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            tests: FxHashMap::default(),
            order: Vec::new(),
        }
    }

    /// Registry holding every standard reverse test
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for &(name, test) in STANDARD_TESTS {
            registry.register(name, test);
        }
        registry
    }

    /// Register a test. Returns false if the name was already taken.
    pub fn register(&mut self, name: &'static str, test: ReverseTest) -> bool {
        if self.tests.contains_key(name) {
            return false;
        }
        self.tests.insert(name, test);
        self.order.push(name);
        true
    }

    /// Look up a test by name
    pub fn get(&self, name: &str) -> Option<ReverseTest> {
        self.tests.get(name).copied()
    }

    /// Check if a test is registered
    pub fn contains(&self, name: &str) -> bool {
        self.tests.contains_key(name)
    }

    /// Test names in registration order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    /// Number of registered tests
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for ReverseCallRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide registry consulted by `ReverseCall`.
pub static REVERSE_TESTS: Lazy<ReverseCallRegistry> = Lazy::new(ReverseCallRegistry::standard);

// ============================================================================
// No-parameter returns
// ============================================================================

macro_rules! returned {
    ($name:ident, $callback:literal, $ty:ty, |$v:ident| $render:expr) => {
        fn $name(ctx: &dyn CallContext) -> BoundaryResult<String> {
            let $v: $ty = ctx.invoke($callback, &mut [])?;
            Ok($render)
        }
    };
}

fn no_param_return_void(ctx: &dyn CallContext) -> BoundaryResult<String> {
    ctx.invoke_void("NoParamReturnVoidCallback", &mut [])?;
    Ok(String::new())
}

returned!(no_param_return_bool, "NoParamReturnBoolCallback", bool, |v| v.to_string());
returned!(no_param_return_char8, "NoParamReturnChar8Callback", Char8, |v| v.code().to_string());
returned!(no_param_return_char16, "NoParamReturnChar16Callback", Char16, |v| v.code().to_string());
returned!(no_param_return_int8, "NoParamReturnInt8Callback", i8, |v| v.to_string());
returned!(no_param_return_int16, "NoParamReturnInt16Callback", i16, |v| v.to_string());
returned!(no_param_return_int32, "NoParamReturnInt32Callback", i32, |v| v.to_string());
returned!(no_param_return_int64, "NoParamReturnInt64Callback", i64, |v| v.to_string());
returned!(no_param_return_uint8, "NoParamReturnUInt8Callback", u8, |v| v.to_string());
returned!(no_param_return_uint16, "NoParamReturnUInt16Callback", u16, |v| v.to_string());
returned!(no_param_return_uint32, "NoParamReturnUInt32Callback", u32, |v| v.to_string());
returned!(no_param_return_uint64, "NoParamReturnUInt64Callback", u64, |v| v.to_string());
returned!(no_param_return_pointer, "NoParamReturnPointerCallback", Pointer, |v| hex(v));
returned!(no_param_return_float, "NoParamReturnFloatCallback", f32, |v| fixed(v, 3));
returned!(no_param_return_double, "NoParamReturnDoubleCallback", f64, |v| v.to_string());
returned!(no_param_return_string, "NoParamReturnStringCallback", String, |v| v);

fn no_param_return_function(ctx: &dyn CallContext) -> BoundaryResult<String> {
    let func: Option<FunctionRef> = ctx.invoke("NoParamReturnFunctionCallback", &mut [])?;
    match func {
        Some(func) => Ok(ctx.invoke_ref::<i32>(func, &mut [])?.to_string()),
        None => Ok("null".to_string()),
    }
}

returned!(no_param_return_array_bool, "NoParamReturnArrayBoolCallback", Vec<bool>, |v| braced(v));
returned!(no_param_return_array_char8, "NoParamReturnArrayChar8Callback", Vec<Char8>, |v| {
    braced(v.iter().map(|c| c.code()))
});
returned!(no_param_return_array_char16, "NoParamReturnArrayChar16Callback", Vec<Char16>, |v| {
    braced(v.iter().map(|c| c.code()))
});
returned!(no_param_return_array_int8, "NoParamReturnArrayInt8Callback", Vec<i8>, |v| braced(v));
returned!(no_param_return_array_int16, "NoParamReturnArrayInt16Callback", Vec<i16>, |v| braced(v));
returned!(no_param_return_array_int32, "NoParamReturnArrayInt32Callback", Vec<i32>, |v| braced(v));
returned!(no_param_return_array_int64, "NoParamReturnArrayInt64Callback", Vec<i64>, |v| braced(v));
returned!(no_param_return_array_uint8, "NoParamReturnArrayUInt8Callback", Vec<u8>, |v| braced(v));
returned!(no_param_return_array_uint16, "NoParamReturnArrayUInt16Callback", Vec<u16>, |v| braced(v));
returned!(no_param_return_array_uint32, "NoParamReturnArrayUInt32Callback", Vec<u32>, |v| braced(v));
returned!(no_param_return_array_uint64, "NoParamReturnArrayUInt64Callback", Vec<u64>, |v| braced(v));
returned!(no_param_return_array_pointer, "NoParamReturnArrayPointerCallback", Vec<Pointer>, |v| {
    braced(v.into_iter().map(hex))
});
returned!(no_param_return_array_float, "NoParamReturnArrayFloatCallback", Vec<f32>, |v| {
    braced(v.into_iter().map(trimmed))
});
returned!(no_param_return_array_double, "NoParamReturnArrayDoubleCallback", Vec<f64>, |v| braced(v));
returned!(no_param_return_array_string, "NoParamReturnArrayStringCallback", Vec<String>, |v| {
    braced(v.iter().map(|s| quoted(s)))
});
returned!(no_param_return_vector2, "NoParamReturnVector2Callback", Vector2, |v| vector(&v.to_array()));
returned!(no_param_return_vector3, "NoParamReturnVector3Callback", Vector3, |v| vector(&v.to_array()));
returned!(no_param_return_vector4, "NoParamReturnVector4Callback", Vector4, |v| vector(&v.to_array()));
returned!(no_param_return_matrix4x4, "NoParamReturnMatrix4x4Callback", Matrix4x4, |v| matrix(&v));

// ============================================================================
// Parameter progressions
// ============================================================================

/// One set of `Param<N>` arguments; `Param<N>` sends the first N.
struct ParamSet {
    a: i32,
    b: f32,
    c: f64,
    d: Vector4,
    e: &'static [i64],
    f: u8,
    g: &'static str,
    h: u8,
    k: i16,
    l: usize,
}

impl ParamSet {
    const EMPTY: ParamSet = ParamSet {
        a: 0,
        b: 0.0,
        c: 0.0,
        d: Vector4::new(0.0, 0.0, 0.0, 0.0),
        e: &[],
        f: 0,
        g: "",
        h: 0,
        k: 0,
        l: 0,
    };

    fn args(&self, n: usize) -> BoundaryResult<Vec<MarshaledValue>> {
        let all = [
            self.a.to_boundary()?,
            self.b.to_boundary()?,
            self.c.to_boundary()?,
            self.d.to_boundary()?,
            self.e.to_boundary()?,
            Char16(u16::from(self.f)).to_boundary()?,
            self.g.to_boundary()?,
            Char16(u16::from(self.h)).to_boundary()?,
            self.k.to_boundary()?,
            Pointer(self.l).to_boundary()?,
        ];
        Ok(all.into_iter().take(n).collect())
    }
}

const PARAM_SETS: [ParamSet; 10] = [
    ParamSet { a: 999, ..ParamSet::EMPTY },
    ParamSet { a: 888, b: 9.9, ..ParamSet::EMPTY },
    ParamSet { a: 777, b: 8.8, c: 9.8765, ..ParamSet::EMPTY },
    ParamSet {
        a: 666,
        b: 7.7,
        c: 8.7659,
        d: Vector4::new(100.1, 200.2, 300.3, 400.4),
        ..ParamSet::EMPTY
    },
    ParamSet {
        a: 555,
        b: 6.6,
        c: 7.6598,
        d: Vector4::new(-105.1, -205.2, -305.3, -405.4),
        e: &[],
        ..ParamSet::EMPTY
    },
    ParamSet {
        a: 444,
        b: 5.5,
        c: 6.5987,
        d: Vector4::new(110.1, 210.2, 310.3, 410.4),
        e: &[90000, -100, 20000],
        f: b'A',
        ..ParamSet::EMPTY
    },
    ParamSet {
        a: 333,
        b: 4.4,
        c: 5.9876,
        d: Vector4::new(-115.1, -215.2, -315.3, -415.4),
        e: &[800000, 30000, -4000000],
        f: b'B',
        g: "red gold",
        ..ParamSet::EMPTY
    },
    ParamSet {
        a: 222,
        b: 3.3,
        c: 1.2345,
        d: Vector4::new(120.1, 220.2, 320.3, 420.4),
        e: &[7000000, 5000000, -600000000],
        f: b'C',
        g: "blue ice",
        h: b'Z',
        ..ParamSet::EMPTY
    },
    ParamSet {
        a: 111,
        b: 2.2,
        c: 5.1234,
        d: Vector4::new(-125.1, -225.2, -325.3, -425.4),
        e: &[60000000, -700000000, 80000000000],
        f: b'D',
        g: "pink metal",
        h: b'Y',
        k: -100,
        ..ParamSet::EMPTY
    },
    ParamSet {
        a: 1234,
        b: 1.1,
        c: 4.5123,
        d: Vector4::new(130.1, 230.2, 330.3, 430.4),
        e: &[500000000, 90000000000, 1000000000000],
        f: b'E',
        g: "green wood",
        h: b'X',
        k: -200,
        l: 0xabeba,
    },
];

fn param<const N: usize>(ctx: &dyn CallContext) -> BoundaryResult<String> {
    let mut args = PARAM_SETS[N - 1].args(N)?;
    ctx.invoke_void(&format!("Param{}Callback", N), &mut args)?;
    Ok(String::new())
}

/// Initial by-reference slots; the callee replaces every one.
fn ref_slots(n: usize) -> BoundaryResult<Vec<MarshaledValue>> {
    let all = [
        0i32.to_boundary()?,
        0f32.to_boundary()?,
        0f64.to_boundary()?,
        Vector4::default().to_boundary()?,
        Vec::<i64>::new().to_boundary()?,
        Char16(0).to_boundary()?,
        String::new().to_boundary()?,
        Char16(0).to_boundary()?,
        0i16.to_boundary()?,
        Pointer::NULL.to_boundary()?,
    ];
    Ok(all.into_iter().take(n).collect())
}

fn ref_field(position: usize, value: &MarshaledValue) -> BoundaryResult<String> {
    Ok(match position {
        0 => i32::from_boundary(value)?.to_string(),
        1 => fixed(f32::from_boundary(value)?, 1),
        2 => f64::from_boundary(value)?.to_string(),
        3 => vector(&Vector4::from_boundary(value)?.to_array()),
        4 => braced(Vec::<i64>::from_boundary(value)?),
        5 | 7 => Char16::from_boundary(value)?.code().to_string(),
        6 => String::from_boundary(value)?,
        8 => i16::from_boundary(value)?.to_string(),
        _ => hex(Pointer::from_boundary(value)?),
    })
}

fn param_ref<const N: usize>(ctx: &dyn CallContext) -> BoundaryResult<String> {
    let callback = format!("ParamRef{}Callback", N);
    let mut args = ref_slots(N)?;
    ctx.invoke_void(&callback, &mut args)?;

    let parts = args
        .iter()
        .enumerate()
        .map(|(i, value)| {
            ref_field(i, value).map_err(|e| e.at(format!("{} parameter {}", callback, i)))
        })
        .collect::<BoundaryResult<Vec<_>>>()?;
    Ok(fields(&parts))
}

fn param_ref_arrays(ctx: &dyn CallContext) -> BoundaryResult<String> {
    let mut args = [
        Vec::<bool>::new().to_boundary()?,
        Vec::<Char8>::new().to_boundary()?,
        Vec::<Char16>::new().to_boundary()?,
        Vec::<i8>::new().to_boundary()?,
        Vec::<i16>::new().to_boundary()?,
        Vec::<i32>::new().to_boundary()?,
        Vec::<i64>::new().to_boundary()?,
        Vec::<u8>::new().to_boundary()?,
        Vec::<u16>::new().to_boundary()?,
        Vec::<u32>::new().to_boundary()?,
        Vec::<u64>::new().to_boundary()?,
        Vec::<Pointer>::new().to_boundary()?,
        Vec::<f32>::new().to_boundary()?,
        Vec::<f64>::new().to_boundary()?,
        Vec::<String>::new().to_boundary()?,
    ];
    ctx.invoke_void("ParamRefArraysCallback", &mut args)?;

    let parts = vec![
        braced(Vec::<bool>::from_boundary(&args[0])?),
        braced(Vec::<Char8>::from_boundary(&args[1])?.iter().map(|c| c.code())),
        braced(Vec::<Char16>::from_boundary(&args[2])?.iter().map(|c| c.code())),
        braced(Vec::<i8>::from_boundary(&args[3])?),
        braced(Vec::<i16>::from_boundary(&args[4])?),
        braced(Vec::<i32>::from_boundary(&args[5])?),
        braced(Vec::<i64>::from_boundary(&args[6])?),
        braced(Vec::<u8>::from_boundary(&args[7])?),
        braced(Vec::<u16>::from_boundary(&args[8])?),
        braced(Vec::<u32>::from_boundary(&args[9])?),
        braced(Vec::<u64>::from_boundary(&args[10])?),
        braced(Vec::<Pointer>::from_boundary(&args[11])?.into_iter().map(hex)),
        braced(Vec::<f32>::from_boundary(&args[12])?.iter().map(|v| fixed(v, 2))),
        braced(Vec::<f64>::from_boundary(&args[13])?),
        braced(Vec::<String>::from_boundary(&args[14])?.iter().map(|s| quoted(s))),
    ];
    Ok(fields(&parts))
}

fn param_all_primitives(ctx: &dyn CallContext) -> BoundaryResult<String> {
    let mut args = [
        true.to_boundary()?,
        Char8(b'%').to_boundary()?,
        Char16(0x2622).to_boundary()?,
        (-1i8).to_boundary()?,
        (-1000i16).to_boundary()?,
        (-1_000_000i32).to_boundary()?,
        (-1_000_000_000_000i64).to_boundary()?,
        200u8.to_boundary()?,
        50000u16.to_boundary()?,
        3_000_000_000u32.to_boundary()?,
        9_999_999_999u64.to_boundary()?,
        Pointer(0xfedc_baab_cdef).to_boundary()?,
        0.001f32.to_boundary()?,
        987654.456789f64.to_boundary()?,
    ];
    let sum: i64 = ctx.invoke("ParamAllPrimitivesCallback", &mut args)?;
    Ok(sum.to_string())
}

// ============================================================================
// Registration table
// ============================================================================

const STANDARD_TESTS: &[(&str, ReverseTest)] = &[
    ("NoParamReturnVoid", no_param_return_void),
    ("NoParamReturnBool", no_param_return_bool),
    ("NoParamReturnChar8", no_param_return_char8),
    ("NoParamReturnChar16", no_param_return_char16),
    ("NoParamReturnInt8", no_param_return_int8),
    ("NoParamReturnInt16", no_param_return_int16),
    ("NoParamReturnInt32", no_param_return_int32),
    ("NoParamReturnInt64", no_param_return_int64),
    ("NoParamReturnUInt8", no_param_return_uint8),
    ("NoParamReturnUInt16", no_param_return_uint16),
    ("NoParamReturnUInt32", no_param_return_uint32),
    ("NoParamReturnUInt64", no_param_return_uint64),
    ("NoParamReturnPointer", no_param_return_pointer),
    ("NoParamReturnFloat", no_param_return_float),
    ("NoParamReturnDouble", no_param_return_double),
    ("NoParamReturnFunction", no_param_return_function),
    ("NoParamReturnString", no_param_return_string),
    ("NoParamReturnArrayBool", no_param_return_array_bool),
    ("NoParamReturnArrayChar8", no_param_return_array_char8),
    ("NoParamReturnArrayChar16", no_param_return_array_char16),
    ("NoParamReturnArrayInt8", no_param_return_array_int8),
    ("NoParamReturnArrayInt16", no_param_return_array_int16),
    ("NoParamReturnArrayInt32", no_param_return_array_int32),
    ("NoParamReturnArrayInt64", no_param_return_array_int64),
    ("NoParamReturnArrayUInt8", no_param_return_array_uint8),
    ("NoParamReturnArrayUInt16", no_param_return_array_uint16),
    ("NoParamReturnArrayUInt32", no_param_return_array_uint32),
    ("NoParamReturnArrayUInt64", no_param_return_array_uint64),
    ("NoParamReturnArrayPointer", no_param_return_array_pointer),
    ("NoParamReturnArrayFloat", no_param_return_array_float),
    ("NoParamReturnArrayDouble", no_param_return_array_double),
    ("NoParamReturnArrayString", no_param_return_array_string),
    ("NoParamReturnVector2", no_param_return_vector2),
    ("NoParamReturnVector3", no_param_return_vector3),
    ("NoParamReturnVector4", no_param_return_vector4),
    ("NoParamReturnMatrix4x4", no_param_return_matrix4x4),
    ("Param1", param::<1>),
    ("Param2", param::<2>),
    ("Param3", param::<3>),
    ("Param4", param::<4>),
    ("Param5", param::<5>),
    ("Param6", param::<6>),
    ("Param7", param::<7>),
    ("Param8", param::<8>),
    ("Param9", param::<9>),
    ("Param10", param::<10>),
    ("ParamRef1", param_ref::<1>),
    ("ParamRef2", param_ref::<2>),
    ("ParamRef3", param_ref::<3>),
    ("ParamRef4", param_ref::<4>),
    ("ParamRef5", param_ref::<5>),
    ("ParamRef6", param_ref::<6>),
    ("ParamRef7", param_ref::<7>),
    ("ParamRef8", param_ref::<8>),
    ("ParamRef9", param_ref::<9>),
    ("ParamRef10", param_ref::<10>),
    ("ParamRefArrays", param_ref_arrays),
    ("ParamAllPrimitives", param_all_primitives),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry() {
        let registry = ReverseCallRegistry::standard();
        assert_eq!(registry.len(), 58);
        assert!(registry.contains("NoParamReturnArrayPointer"));
        assert!(registry.contains("ParamAllPrimitives"));
        assert!(registry.get("unknown-name").is_none());
        assert_eq!(registry.names().next(), Some("NoParamReturnVoid"));
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = ReverseCallRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.register("NoParamReturnBool", no_param_return_bool));
        assert!(!registry.register("NoParamReturnBool", no_param_return_int8));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_param_sets_progression() {
        let args = PARAM_SETS[9].args(10).unwrap();
        assert_eq!(args.len(), 10);
        assert_eq!(args[0], MarshaledValue::Int32(1234));
        assert_eq!(args[9], MarshaledValue::Pointer(0xabeba));

        let args = PARAM_SETS[4].args(5).unwrap();
        assert_eq!(args.len(), 5);
        assert_eq!(Vec::<i64>::from_boundary(&args[4]).unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn test_ref_fields() {
        assert_eq!(ref_field(1, &MarshaledValue::Float32(3.14)).unwrap(), "3.1");
        assert_eq!(ref_field(2, &MarshaledValue::Float64(-1.0)).unwrap(), "-1");
        assert_eq!(ref_field(5, &MarshaledValue::Char16(u16::from(b'Z'))).unwrap(), "90");
        assert_eq!(ref_field(9, &MarshaledValue::Pointer(0)).unwrap(), "0x0");
        assert!(ref_field(0, &MarshaledValue::Int64(1)).is_err());
    }
}
