//! Payload types with a fixed boundary layout
//!
//! Character and pointer newtypes keep their tags distinct from the plain
//! integers they wrap. Vectors and the matrix only fix the flattened layout;
//! algebra on them lives elsewhere.

use std::fmt;
use std::num::NonZeroU64;

use crate::context::Side;

/// 8-bit character code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Char8(pub u8);

impl Char8 {
    /// Code as an integer
    pub fn code(self) -> u8 {
        self.0
    }
}

impl From<u8> for Char8 {
    fn from(code: u8) -> Self {
        Char8(code)
    }
}

/// 16-bit character code (one UTF-16 unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Char16(pub u16);

impl Char16 {
    /// Code as an integer
    pub fn code(self) -> u16 {
        self.0
    }

    /// Character for `c`, or `None` outside the basic multilingual plane
    pub fn from_char(c: char) -> Option<Self> {
        u16::try_from(c as u32).ok().map(Char16)
    }
}

impl fmt::Display for Char16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = char::from_u32(self.0 as u32).unwrap_or(char::REPLACEMENT_CHARACTER);
        write!(f, "{}", c)
    }
}

/// Opaque pointer-sized value. Never dereferenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pointer(pub usize);

impl Pointer {
    /// The null pointer
    pub const NULL: Pointer = Pointer(0);

    /// Address bits
    pub fn addr(self) -> usize {
        self.0
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Handle naming an export on one side of the boundary.
///
/// The raw form is `side << 32 | (index + 1)`, so zero never names an
/// export and is free to mean "no callable".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionRef(NonZeroU64);

const SIDE_BIT: u64 = 1 << 32;

impl FunctionRef {
    /// Reference to export `index` of `side`. `index` must be below
    /// `u32::MAX`.
    pub fn new(side: Side, index: u32) -> Self {
        debug_assert!(index < u32::MAX);
        let side_bits = match side {
            Side::Native => 0,
            Side::Managed => SIDE_BIT,
        };
        let raw = side_bits | (index as u64 + 1);
        FunctionRef(NonZeroU64::new(raw).unwrap_or(NonZeroU64::MIN))
    }

    /// Decode a raw handle; zero is the absent reference
    pub fn from_bits(bits: u64) -> Option<Self> {
        NonZeroU64::new(bits).map(FunctionRef)
    }

    /// Raw handle
    pub fn to_bits(self) -> u64 {
        self.0.get()
    }

    /// Side owning the export
    pub fn side(self) -> Side {
        if self.0.get() & SIDE_BIT != 0 {
            Side::Managed
        } else {
            Side::Native
        }
    }

    /// Index into the owning side's export table, `None` for garbage bits
    pub fn index(self) -> Option<usize> {
        let low = self.0.get() & (SIDE_BIT - 1);
        if self.0.get() >> 33 != 0 || low == 0 {
            return None;
        }
        Some((low - 1) as usize)
    }
}

/// Compare two `f32` within `epsilon`.
pub fn approx_eq_f32(a: f32, b: f32, epsilon: f32) -> bool {
    a == b || (a - b).abs() <= epsilon
}

macro_rules! vector_type {
    ($(#[$doc:meta])* $name:ident, $n:literal, $($field:ident),+) => {
        $(#[$doc])*
        #[repr(C)]
        #[derive(Debug, Clone, Copy, PartialEq, Default)]
        pub struct $name {
            $(
                #[allow(missing_docs)]
                pub $field: f32,
            )+
        }

        impl $name {
            /// Build from components
            pub const fn new($($field: f32),+) -> Self {
                Self { $($field),+ }
            }

            /// Components in layout order
            pub fn to_array(self) -> [f32; $n] {
                [$(self.$field),+]
            }

            /// Build from components in layout order
            pub fn from_array(values: [f32; $n]) -> Self {
                let [$($field),+] = values;
                Self { $($field),+ }
            }

            /// Component-wise comparison within `epsilon`
            pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
                $(approx_eq_f32(self.$field, other.$field, epsilon))&&+
            }
        }
    };
}

vector_type!(
    /// Two-component vector, laid out as `x, y`
    Vector2, 2, x, y
);
vector_type!(
    /// Three-component vector, laid out as `x, y, z`
    Vector3, 3, x, y, z
);
vector_type!(
    /// Four-component vector, laid out as `x, y, z, w`
    Vector4, 4, x, y, z, w
);

/// 4x4 matrix of `f32`, stored row-major: element `(r, c)` lives at
/// `r * 4 + c`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4x4 {
    m: [f32; 16],
}

impl Default for Matrix4x4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4x4 {
    /// Identity matrix
    pub const IDENTITY: Matrix4x4 = Matrix4x4 {
        m: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// Build from sixteen values in row-major order
    pub const fn from_row_major(m: [f32; 16]) -> Self {
        Self { m }
    }

    /// Build from four rows
    pub fn from_rows(rows: [Vector4; 4]) -> Self {
        let mut m = [0.0; 16];
        for (r, row) in rows.iter().enumerate() {
            m[r * 4..r * 4 + 4].copy_from_slice(&row.to_array());
        }
        Self { m }
    }

    /// Sixteen values in row-major order
    pub fn to_row_major(self) -> [f32; 16] {
        self.m
    }

    /// Element at row `r`, column `c`
    pub fn get(&self, r: usize, c: usize) -> f32 {
        self.m[r * 4 + c]
    }

    /// Row `r`
    pub fn row(&self, r: usize) -> Vector4 {
        Vector4::new(
            self.m[r * 4],
            self.m[r * 4 + 1],
            self.m[r * 4 + 2],
            self.m[r * 4 + 3],
        )
    }

    /// Column `c`
    pub fn column(&self, c: usize) -> Vector4 {
        Vector4::new(self.m[c], self.m[4 + c], self.m[8 + c], self.m[12 + c])
    }

    /// Element-wise comparison within `epsilon`
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| approx_eq_f32(*a, *b, epsilon))
    }
}
