//! Golden values the harness checks against

use xcall_sdk::{
    BoundaryResult, Char16, Char8, FunctionRef, MarshaledValue, Matrix4x4, Pointer, ToBoundary,
    Vector2, Vector3, Vector4,
};

use crate::harness::Case;

const LONG_STRING: &str =
    "3rd element string (Should be big enough to avoid small string optimization)";

/// One `a..l` argument progression; a call of arity N uses the first N.
struct Progression {
    a: i32,
    b: f32,
    c: f64,
    d: [f32; 4],
    e: &'static [i64],
    f: u8,
    g: &'static str,
    h: u8,
    k: i16,
    l: usize,
}

impl Progression {
    const EMPTY: Progression = Progression {
        a: 0,
        b: 0.0,
        c: 0.0,
        d: [0.0; 4],
        e: &[],
        f: 0,
        g: "",
        h: 0,
        k: 0,
        l: 0,
    };

    fn values(&self, n: usize) -> BoundaryResult<Vec<MarshaledValue>> {
        let all = [
            self.a.to_boundary()?,
            self.b.to_boundary()?,
            self.c.to_boundary()?,
            Vector4::from_array(self.d).to_boundary()?,
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

/// Arguments sent to `Param<N>`
const PARAM_INPUTS: [Progression; 10] = [
    Progression { a: 999, ..Progression::EMPTY },
    Progression { a: 888, b: 9.9, ..Progression::EMPTY },
    Progression { a: 777, b: 8.8, c: 9.8765, ..Progression::EMPTY },
    Progression {
        a: 666,
        b: 7.7,
        c: 8.7659,
        d: [100.1, 200.2, 300.3, 400.4],
        ..Progression::EMPTY
    },
    Progression {
        a: 555,
        b: 6.6,
        c: 7.6598,
        d: [-105.1, -205.2, -305.3, -405.4],
        ..Progression::EMPTY
    },
    Progression {
        a: 444,
        b: 5.5,
        c: 6.5987,
        d: [110.1, 210.2, 310.3, 410.4],
        e: &[90000, -100, 20000],
        f: b'A',
        ..Progression::EMPTY
    },
    Progression {
        a: 333,
        b: 4.4,
        c: 5.9876,
        d: [-115.1, -215.2, -315.3, -415.4],
        e: &[800000, 30000, -4000000],
        f: b'B',
        g: "red gold",
        ..Progression::EMPTY
    },
    Progression {
        a: 222,
        b: 3.3,
        c: 1.2345,
        d: [120.1, 220.2, 320.3, 420.4],
        e: &[7000000, 5000000, -600000000],
        f: b'C',
        g: "blue ice",
        h: b'Z',
        ..Progression::EMPTY
    },
    Progression {
        a: 111,
        b: 2.2,
        c: 5.1234,
        d: [-125.1, -225.2, -325.3, -425.4],
        e: &[60000000, -700000000, 80000000000],
        f: b'D',
        g: "pink metal",
        h: b'Y',
        k: -100,
        ..Progression::EMPTY
    },
    Progression {
        a: 1234,
        b: 1.1,
        c: 4.5123,
        d: [130.1, 230.2, 330.3, 430.4],
        e: &[500000000, 90000000000, 1000000000000],
        f: b'E',
        g: "green wood",
        h: b'X',
        k: -200,
        l: 0xabeba,
    },
];

/// What the worker's `ParamRef<N>` leaves in its slots
const REF_OUTPUTS: [Progression; 10] = [
    Progression { a: 42, ..Progression::EMPTY },
    Progression { a: 10, b: 3.14, ..Progression::EMPTY },
    Progression { a: -20, b: 2.718, c: 3.14159, ..Progression::EMPTY },
    Progression {
        a: 100,
        b: -5.55,
        c: 1.618,
        d: [1.0, 2.0, 3.0, 4.0],
        ..Progression::EMPTY
    },
    Progression {
        a: 500,
        b: -10.5,
        c: 2.71828,
        d: [-1.0, -2.0, -3.0, -4.0],
        e: &[-6, -5, -4, -3, -2, -1, 0, 1],
        ..Progression::EMPTY
    },
    Progression {
        a: 750,
        b: 20.0,
        c: 1.23456,
        d: [10.0, 20.0, 30.0, 40.0],
        e: &[-6, -5, -4],
        f: b'Z',
        ..Progression::EMPTY
    },
    Progression {
        a: -1000,
        b: 3.0,
        c: -1.0,
        d: [100.0, 200.0, 300.0, 400.0],
        e: &[-6, -5, -4, -3],
        f: b'Y',
        g: "Hello, World!",
        ..Progression::EMPTY
    },
    Progression {
        a: 999,
        b: -7.5,
        c: 0.123456,
        d: [-100.0, -200.0, -300.0, -400.0],
        e: &[-6, -5, -4, -3, -2, -1],
        f: b'X',
        g: "Goodbye, World!",
        h: b'A',
        ..Progression::EMPTY
    },
    Progression {
        a: -1234,
        b: 123.45,
        c: -678.9,
        d: [987.65, 432.1, 123.456, 789.123],
        e: &[-6, -5, -4, -3, -2, -1, 0, 1, 5, 9],
        f: b'W',
        g: "Testing, 1 2 3",
        h: b'B',
        k: 42,
        ..Progression::EMPTY
    },
    Progression {
        a: 987,
        b: -0.123,
        c: 456.789,
        d: [-123.456, 0.987, 654.321, -789.123],
        e: &[-6, -5, -4, -3, -2, -1, 0, 1, 5, 9, 4, -7],
        f: b'V',
        g: "Another string",
        h: b'C',
        k: -444,
        l: 0x1234_5678,
    },
];

const PARAM_LINES: [&str; 10] = [
    "Param1: a = 999",
    "Param2: a = 888, b = 9.9",
    "Param3: a = 777, b = 8.8, c = 9.8765",
    "Param4: a = 666, b = 7.7, c = 8.7659, d = [100.1,200.2,300.3,400.4]",
    "Param5: a = 555, b = 6.6, c = 7.6598, d = [-105.1,-205.2,-305.3,-405.4], e = []",
    "Param6: a = 444, b = 5.5, c = 6.5987, d = [110.1,210.2,310.3,410.4], \
     e = [90000, -100, 20000], f = A",
    "Param7: a = 333, b = 4.4, c = 5.9876, d = [-115.1,-215.2,-315.3,-415.4], \
     e = [800000, 30000, -4000000], f = B, g = red gold",
    "Param8: a = 222, b = 3.3, c = 1.2345, d = [120.1,220.2,320.3,420.4], \
     e = [7000000, 5000000, -600000000], f = C, g = blue ice, h = Z",
    "Param9: a = 111, b = 2.2, c = 5.1234, d = [-125.1,-225.2,-325.3,-425.4], \
     e = [60000000, -700000000, 80000000000], f = D, g = pink metal, h = Y, k = -100",
    "Param10: a = 1234, b = 1.1, c = 4.5123, d = [130.1,230.2,330.3,430.4], \
     e = [500000000, 90000000000, 1000000000000], f = E, g = green wood, h = X, k = -200, \
     l = 0xabeba",
];

const PARAM_REF_RESULTS: [&str; 10] = [
    "42",
    "10|3.1",
    "-20|2.7|3.14159",
    "100|-5.6|1.618|{1.0, 2.0, 3.0, 4.0}",
    "500|-10.5|2.71828|{-1.0, -2.0, -3.0, -4.0}|{-6, -5, -4, -3, -2, -1, 0, 1}",
    "750|20.0|1.23456|{10.0, 20.0, 30.0, 40.0}|{-6, -5, -4}|90",
    "-1000|3.0|-1|{100.0, 200.0, 300.0, 400.0}|{-6, -5, -4, -3}|88|Hello, World!",
    "999|-7.5|0.123456|{-100.0, -200.0, -300.0, -400.0}|{-6, -5, -4, -3, -2, -1}|89|\
     Goodbye, World!|65",
    "-1234|123.4|-678.9|{987.7, 432.1, 123.5, 789.1}|{-6, -5, -4, -3, -2, -1, 0, 1, 5, 9}|65|\
     Testing, 1 2 3|66|42",
    "987|-0.1|456.789|{-123.5, 1.0, 654.3, -789.1}|\
     {-6, -5, -4, -3, -2, -1, 0, 1, 5, 9, 4, -7}|66|Another string|67|-32768|0x0",
];

fn all_primitives_args() -> BoundaryResult<Vec<MarshaledValue>> {
    Ok(vec![
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
    ])
}

/// Wrapping sum of the reference parameter set
pub const ALL_PRIMITIVES_SUM: i64 = 279236978128427;

fn returns(entry: &'static str, value: MarshaledValue) -> Case {
    Case::forward(entry, Vec::new(), value, Vec::new())
}

/// Forward cases: calls into the worker and the values they must produce.
pub fn forward_cases() -> BoundaryResult<Vec<Case>> {
    let matrix = Matrix4x4::from_row_major(std::array::from_fn(|i| (i + 1) as f32));
    let mut cases = vec![
        returns("NoParamReturnVoid", MarshaledValue::Void),
        returns("NoParamReturnBool", true.to_boundary()?),
        returns("NoParamReturnChar8", Char8(127).to_boundary()?),
        returns("NoParamReturnChar16", Char16(u16::MAX).to_boundary()?),
        returns("NoParamReturnInt8", i8::MAX.to_boundary()?),
        returns("NoParamReturnInt16", i16::MAX.to_boundary()?),
        returns("NoParamReturnInt32", i32::MAX.to_boundary()?),
        returns("NoParamReturnInt64", i64::MAX.to_boundary()?),
        returns("NoParamReturnUInt8", u8::MAX.to_boundary()?),
        returns("NoParamReturnUInt16", u16::MAX.to_boundary()?),
        returns("NoParamReturnUInt32", u32::MAX.to_boundary()?),
        returns("NoParamReturnUInt64", u64::MAX.to_boundary()?),
        returns("NoParamReturnPointer", Pointer(1).to_boundary()?),
        returns("NoParamReturnFloat", f32::MAX.to_boundary()?),
        returns("NoParamReturnDouble", f64::MAX.to_boundary()?),
        returns("NoParamReturnFunction", None::<FunctionRef>.to_boundary()?),
        returns("NoParamReturnString", "Hello World".to_boundary()?),
        returns("NoParamReturnArrayBool", vec![true, false].to_boundary()?),
        returns(
            "NoParamReturnArrayChar8",
            b"abcd".iter().copied().map(Char8).collect::<Vec<_>>().to_boundary()?,
        ),
        returns(
            "NoParamReturnArrayChar16",
            "abcd".encode_utf16().map(Char16).collect::<Vec<_>>().to_boundary()?,
        ),
        returns("NoParamReturnArrayInt8", (-3..=1).collect::<Vec<i8>>().to_boundary()?),
        returns("NoParamReturnArrayInt16", (-4..=1).collect::<Vec<i16>>().to_boundary()?),
        returns("NoParamReturnArrayInt32", (-5..=1).collect::<Vec<i32>>().to_boundary()?),
        returns("NoParamReturnArrayInt64", (-6..=1).collect::<Vec<i64>>().to_boundary()?),
        returns("NoParamReturnArrayUInt8", (0..=8).collect::<Vec<u8>>().to_boundary()?),
        returns("NoParamReturnArrayUInt16", (0..=9).collect::<Vec<u16>>().to_boundary()?),
        returns("NoParamReturnArrayUInt32", (0..=10).collect::<Vec<u32>>().to_boundary()?),
        returns("NoParamReturnArrayUInt64", (0..=11).collect::<Vec<u64>>().to_boundary()?),
        returns(
            "NoParamReturnArrayPointer",
            (0..=3).map(Pointer).collect::<Vec<_>>().to_boundary()?,
        ),
        returns(
            "NoParamReturnArrayFloat",
            vec![-12.34f32, 0.0, 12.34].to_boundary()?,
        ),
        returns(
            "NoParamReturnArrayDouble",
            vec![-12.345f64, 0.0, 12.345].to_boundary()?,
        ),
        returns(
            "NoParamReturnArrayString",
            vec![
                "1st string".to_string(),
                "2nd string".to_string(),
                LONG_STRING.to_string(),
            ]
            .to_boundary()?,
        ),
        returns("NoParamReturnVector2", Vector2::new(1.0, 2.0).to_boundary()?),
        returns("NoParamReturnVector3", Vector3::new(1.0, 2.0, 3.0).to_boundary()?),
        returns(
            "NoParamReturnVector4",
            Vector4::new(1.0, 2.0, 3.0, 4.0).to_boundary()?,
        ),
        returns("NoParamReturnMatrix4x4", matrix.to_boundary()?),
    ];

    for n in 1..=10 {
        let args = PARAM_INPUTS[n - 1].values(n)?;
        cases.push(Case::forward(
            PARAM_NAMES[n - 1],
            args.clone(),
            MarshaledValue::Void,
            args,
        ));
    }

    for n in 1..=10 {
        // Inputs are deliberately unrelated to the outputs
        cases.push(Case::forward(
            PARAM_REF_NAMES[n - 1],
            PARAM_INPUTS[9].values(n)?,
            MarshaledValue::Void,
            REF_OUTPUTS[n - 1].values(n)?,
        ));
    }

    cases.push(Case::forward(
        "ParamRefArrays",
        vec![
            vec![false; 4].to_boundary()?,
            b"xyz".iter().copied().map(Char8).collect::<Vec<_>>().to_boundary()?,
            Vec::<Char16>::new().to_boundary()?,
            vec![9i8; 32].to_boundary()?,
            Vec::<i16>::new().to_boundary()?,
            vec![1i32].to_boundary()?,
            Vec::<i64>::new().to_boundary()?,
            Vec::<u8>::new().to_boundary()?,
            Vec::<u16>::new().to_boundary()?,
            Vec::<u32>::new().to_boundary()?,
            vec![u64::MAX; 3].to_boundary()?,
            Vec::<Pointer>::new().to_boundary()?,
            Vec::<f32>::new().to_boundary()?,
            vec![1.5f64].to_boundary()?,
            vec![LONG_STRING.to_string()].to_boundary()?,
        ],
        MarshaledValue::Void,
        vec![
            vec![true].to_boundary()?,
            b"abc".iter().copied().map(Char8).collect::<Vec<_>>().to_boundary()?,
            "def".encode_utf16().map(Char16).collect::<Vec<_>>().to_boundary()?,
            (-3..=3).collect::<Vec<i8>>().to_boundary()?,
            (-4..=4).collect::<Vec<i16>>().to_boundary()?,
            (-5..=5).collect::<Vec<i32>>().to_boundary()?,
            (-6..=6).collect::<Vec<i64>>().to_boundary()?,
            (0..=7).collect::<Vec<u8>>().to_boundary()?,
            (0..=8).collect::<Vec<u16>>().to_boundary()?,
            (0..=9).collect::<Vec<u32>>().to_boundary()?,
            (0..=10).collect::<Vec<u64>>().to_boundary()?,
            (0..=2).map(Pointer).collect::<Vec<_>>().to_boundary()?,
            vec![-12.34f32, 0.0, 12.34].to_boundary()?,
            vec![-12.345f64, 0.0, 12.345].to_boundary()?,
            ["1", "12", "123", "1234", "12345", "123456"]
                .map(String::from)
                .to_vec()
                .to_boundary()?,
        ],
    ));

    let args = all_primitives_args()?;
    cases.push(Case::forward(
        "ParamAllPrimitives",
        args.clone(),
        MarshaledValue::Int64(ALL_PRIMITIVES_SUM),
        args,
    ));

    Ok(cases)
}

const PARAM_NAMES: [&str; 10] = [
    "Param1", "Param2", "Param3", "Param4", "Param5", "Param6", "Param7", "Param8", "Param9",
    "Param10",
];

const PARAM_REF_NAMES: [&str; 10] = [
    "ParamRef1",
    "ParamRef2",
    "ParamRef3",
    "ParamRef4",
    "ParamRef5",
    "ParamRef6",
    "ParamRef7",
    "ParamRef8",
    "ParamRef9",
    "ParamRef10",
];

fn delivers(test: &'static str, result: impl Into<String>) -> Case {
    Case::reverse(test, Some(result.into()), None)
}

/// Reverse cases: worker tests and the text each must deliver.
pub fn reverse_cases() -> Vec<Case> {
    let mut cases = vec![
        Case::reverse("NoParamReturnVoid", None, None),
        delivers("NoParamReturnBool", "true"),
        delivers("NoParamReturnChar8", "127"),
        delivers("NoParamReturnChar16", "65535"),
        delivers("NoParamReturnInt8", i8::MAX.to_string()),
        delivers("NoParamReturnInt16", i16::MAX.to_string()),
        delivers("NoParamReturnInt32", i32::MAX.to_string()),
        delivers("NoParamReturnInt64", i64::MAX.to_string()),
        delivers("NoParamReturnUInt8", u8::MAX.to_string()),
        delivers("NoParamReturnUInt16", u16::MAX.to_string()),
        delivers("NoParamReturnUInt32", u32::MAX.to_string()),
        delivers("NoParamReturnUInt64", u64::MAX.to_string()),
        delivers("NoParamReturnPointer", "0x1"),
        delivers(
            "NoParamReturnFloat",
            "340282346638528859811704183484516925440.000",
        ),
        delivers("NoParamReturnDouble", f64::MAX.to_string()),
        delivers("NoParamReturnFunction", "2147483647"),
        delivers("NoParamReturnString", "Hello World"),
        delivers("NoParamReturnArrayBool", "{true, false}"),
        delivers("NoParamReturnArrayChar8", "{97, 98, 99}"),
        delivers("NoParamReturnArrayChar16", "{97, 98, 99, 100}"),
        delivers("NoParamReturnArrayInt8", "{-3, -2, -1, 0, 1}"),
        delivers("NoParamReturnArrayInt16", "{-4, -3, -2, -1, 0, 1}"),
        delivers("NoParamReturnArrayInt32", "{-5, -4, -3, -2, -1, 0, 1}"),
        delivers("NoParamReturnArrayInt64", "{-6, -5, -4, -3, -2, -1, 0, 1}"),
        delivers("NoParamReturnArrayUInt8", "{0, 1, 2, 3, 4, 5, 6, 7, 8}"),
        delivers("NoParamReturnArrayUInt16", "{0, 1, 2, 3, 4, 5, 6, 7, 8, 9}"),
        delivers("NoParamReturnArrayUInt32", "{0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10}"),
        delivers(
            "NoParamReturnArrayUInt64",
            "{0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11}",
        ),
        delivers("NoParamReturnArrayPointer", "{0x0, 0x1, 0x2, 0x3}"),
        delivers("NoParamReturnArrayFloat", "{-12.34, 0, 12.34}"),
        delivers("NoParamReturnArrayDouble", "{-12.345, 0, 12.345}"),
        delivers(
            "NoParamReturnArrayString",
            format!("{{'1st string', '2nd string', '{}'}}", LONG_STRING),
        ),
        delivers("NoParamReturnVector2", "{1.0, 2.0}"),
        delivers("NoParamReturnVector3", "{1.0, 2.0, 3.0}"),
        delivers("NoParamReturnVector4", "{1.0, 2.0, 3.0, 4.0}"),
        delivers(
            "NoParamReturnMatrix4x4",
            "{{1.0, 2.0, 3.0, 4.0}, {5.0, 6.0, 7.0, 8.0}, \
             {9.0, 10.0, 11.0, 12.0}, {13.0, 14.0, 15.0, 16.0}}",
        ),
    ];

    for (name, line) in PARAM_NAMES.into_iter().zip(PARAM_LINES) {
        cases.push(Case::reverse(name, None, Some(line.to_string())));
    }
    for (name, result) in PARAM_REF_NAMES.into_iter().zip(PARAM_REF_RESULTS) {
        cases.push(delivers(name, result));
    }

    cases.push(delivers(
        "ParamRefArrays",
        "{true}|{97, 98, 99}|{97, 98, 99}|{-3, -2, -1, 0, 1, 2, 3}|\
         {-4, -3, -2, -1, 0, 1, 2, 3, 4}|{-5, -4, -3, -2, -1, 0, 1, 2, 3, 4, 5}|\
         {-6, -5, -4, -3, -2, -1, 0, 1, 2, 3, 4, 5, 6}|{0, 1, 2, 3, 4, 5, 6, 7}|\
         {0, 1, 2, 3, 4, 5, 6, 7, 8}|{0, 1, 2, 3, 4, 5, 6, 7, 8, 9}|\
         {0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10}|{0x0, 0x1}|{-12.34, 0.00, 12.34}|\
         {-12.345, 0, 12.345}|{'Hello', 'World', 'OpenAI'}",
    ));
    cases.push(delivers(
        "ParamAllPrimitives",
        ALL_PRIMITIVES_SUM.to_string(),
    ));

    // Unknown names deliver nothing and do not fault
    cases.push(Case::reverse("unknown-name", None, None));
    cases
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_counts() {
        assert_eq!(forward_cases().unwrap().len(), 58);
        assert_eq!(reverse_cases().len(), 59);
    }

    #[test]
    fn test_progressions_take_prefix() {
        let values = REF_OUTPUTS[3].values(4).unwrap();
        assert_eq!(values.len(), 4);
        assert_eq!(values[0], MarshaledValue::Int32(100));
        assert_eq!(values[3], MarshaledValue::Vector4([1.0, 2.0, 3.0, 4.0]));
    }
}
