//! Value marshaling table
//!
//! Every Rust type that can cross the boundary implements [`Tagged`] (its
//! fixed tag), [`ToBoundary`] (encode) and [`FromBoundary`] (decode), with
//! `decode(encode(v)) == v`. Decoding a value whose tag differs from the
//! expected one is a type-mismatch fault; nothing is ever coerced.
//!
//! | Tag | Rust type |
//! |-----|-----------|
//! | `Bool` | `bool` |
//! | `Char8` / `Char16` | [`Char8`] / [`Char16`] |
//! | `Int8`..`UInt64` | `i8`..`u64` |
//! | `Pointer` | [`Pointer`] |
//! | `Float32` / `Float64` | `f32` / `f64` |
//! | `String` | `String` (and `str` for encoding) |
//! | `FunctionRef` | `Option<FunctionRef>` |
//! | `Vector2/3/4`, `Matrix4x4` | [`Vector2`], [`Vector3`], [`Vector4`], [`Matrix4x4`] |
//! | `ArrayOf(T)` | `Vec<T>` (and `[T]` for encoding) |

use crate::buffer::{BufferReader, BufferWriter};
use crate::error::{BoundaryError, BoundaryResult};
use crate::payload::{Char16, Char8, FunctionRef, Matrix4x4, Pointer, Vector2, Vector3, Vector4};
use crate::types::TypeTag;
use crate::value::{MarshaledArray, MarshaledString, MarshaledValue};

/// Rust types with a fixed boundary tag
pub trait Tagged {
    /// The tag values of this type carry
    fn type_tag() -> TypeTag;
}

/// Decode a Rust value from a marshaled value
pub trait FromBoundary: Tagged + Sized {
    /// Decode, failing on a tag mismatch or malformed payload
    fn from_boundary(value: &MarshaledValue) -> BoundaryResult<Self>;
}

/// Encode a Rust value into a marshaled value
pub trait ToBoundary: Tagged {
    /// Encode into an independent copy
    fn to_boundary(&self) -> BoundaryResult<MarshaledValue>;
}

/// Types that can be elements of an array buffer
pub trait ArrayElement: Tagged + Sized {
    /// Bytes this element occupies in an array buffer
    fn encoded_len(&self) -> usize;

    /// Append this element's little-endian representation
    fn write(&self, writer: &mut BufferWriter) -> BoundaryResult<()>;

    /// Read one element
    fn read(reader: &mut BufferReader<'_>) -> BoundaryResult<Self>;
}

fn mismatch(expected: TypeTag, got: &MarshaledValue) -> BoundaryError {
    BoundaryError::mismatch("value", expected, got.type_name())
}

// ============================================================================
// Scalars
// ============================================================================

macro_rules! scalar {
    ($ty:ty, $variant:ident, $size:literal, $emit:ident, $read:ident) => {
        impl Tagged for $ty {
            fn type_tag() -> TypeTag {
                TypeTag::$variant
            }
        }

        impl FromBoundary for $ty {
            fn from_boundary(value: &MarshaledValue) -> BoundaryResult<Self> {
                match value {
                    MarshaledValue::$variant(v) => Ok(*v),
                    other => Err(mismatch(TypeTag::$variant, other)),
                }
            }
        }

        impl ToBoundary for $ty {
            fn to_boundary(&self) -> BoundaryResult<MarshaledValue> {
                Ok(MarshaledValue::$variant(*self))
            }
        }

        impl ArrayElement for $ty {
            fn encoded_len(&self) -> usize {
                $size
            }

            fn write(&self, writer: &mut BufferWriter) -> BoundaryResult<()> {
                writer.$emit(*self);
                Ok(())
            }

            fn read(reader: &mut BufferReader<'_>) -> BoundaryResult<Self> {
                reader.$read()
            }
        }
    };
}

scalar!(bool, Bool, 1, emit_bool, read_bool);
scalar!(i8, Int8, 1, emit_i8, read_i8);
scalar!(i16, Int16, 2, emit_i16, read_i16);
scalar!(i32, Int32, 4, emit_i32, read_i32);
scalar!(i64, Int64, 8, emit_i64, read_i64);
scalar!(u8, UInt8, 1, emit_u8, read_u8);
scalar!(u16, UInt16, 2, emit_u16, read_u16);
scalar!(u32, UInt32, 4, emit_u32, read_u32);
scalar!(u64, UInt64, 8, emit_u64, read_u64);
scalar!(f32, Float32, 4, emit_f32, read_f32);
scalar!(f64, Float64, 8, emit_f64, read_f64);

/// Newtypes whose marshaled form is their inner integer under another tag
macro_rules! wrapped {
    ($ty:ident, $variant:ident, $size:literal, $emit:ident, $read:ident) => {
        impl Tagged for $ty {
            fn type_tag() -> TypeTag {
                TypeTag::$variant
            }
        }

        impl FromBoundary for $ty {
            fn from_boundary(value: &MarshaledValue) -> BoundaryResult<Self> {
                match value {
                    MarshaledValue::$variant(v) => Ok($ty(*v)),
                    other => Err(mismatch(TypeTag::$variant, other)),
                }
            }
        }

        impl ToBoundary for $ty {
            fn to_boundary(&self) -> BoundaryResult<MarshaledValue> {
                Ok(MarshaledValue::$variant(self.0))
            }
        }

        impl ArrayElement for $ty {
            fn encoded_len(&self) -> usize {
                $size
            }

            fn write(&self, writer: &mut BufferWriter) -> BoundaryResult<()> {
                writer.$emit(self.0);
                Ok(())
            }

            fn read(reader: &mut BufferReader<'_>) -> BoundaryResult<Self> {
                reader.$read().map($ty)
            }
        }
    };
}

wrapped!(Char8, Char8, 1, emit_u8, read_u8);
wrapped!(Char16, Char16, 2, emit_u16, read_u16);

fn pointer_from_bits(bits: u64) -> BoundaryResult<Pointer> {
    usize::try_from(bits)
        .map(Pointer)
        .map_err(|_| BoundaryError::Malformed(format!("pointer {:#x} does not fit usize", bits)))
}

impl Tagged for Pointer {
    fn type_tag() -> TypeTag {
        TypeTag::Pointer
    }
}

impl FromBoundary for Pointer {
    fn from_boundary(value: &MarshaledValue) -> BoundaryResult<Self> {
        match value {
            MarshaledValue::Pointer(bits) => pointer_from_bits(*bits),
            other => Err(mismatch(TypeTag::Pointer, other)),
        }
    }
}

impl ToBoundary for Pointer {
    fn to_boundary(&self) -> BoundaryResult<MarshaledValue> {
        Ok(MarshaledValue::Pointer(self.0 as u64))
    }
}

impl ArrayElement for Pointer {
    fn encoded_len(&self) -> usize {
        8
    }

    fn write(&self, writer: &mut BufferWriter) -> BoundaryResult<()> {
        writer.emit_u64(self.0 as u64);
        Ok(())
    }

    fn read(reader: &mut BufferReader<'_>) -> BoundaryResult<Self> {
        pointer_from_bits(reader.read_u64()?)
    }
}

// An absent callable is an ordinary value, so function references are
// always handled as `Option<FunctionRef>`.
impl Tagged for Option<FunctionRef> {
    fn type_tag() -> TypeTag {
        TypeTag::FunctionRef
    }
}

impl FromBoundary for Option<FunctionRef> {
    fn from_boundary(value: &MarshaledValue) -> BoundaryResult<Self> {
        match value {
            MarshaledValue::FunctionRef(bits) => Ok(FunctionRef::from_bits(*bits)),
            other => Err(mismatch(TypeTag::FunctionRef, other)),
        }
    }
}

impl ToBoundary for Option<FunctionRef> {
    fn to_boundary(&self) -> BoundaryResult<MarshaledValue> {
        Ok(MarshaledValue::FunctionRef(
            self.map(FunctionRef::to_bits).unwrap_or(0),
        ))
    }
}

impl ArrayElement for Option<FunctionRef> {
    fn encoded_len(&self) -> usize {
        8
    }

    fn write(&self, writer: &mut BufferWriter) -> BoundaryResult<()> {
        writer.emit_u64(self.map(FunctionRef::to_bits).unwrap_or(0));
        Ok(())
    }

    fn read(reader: &mut BufferReader<'_>) -> BoundaryResult<Self> {
        reader.read_u64().map(FunctionRef::from_bits)
    }
}

// ============================================================================
// Strings
// ============================================================================

impl Tagged for str {
    fn type_tag() -> TypeTag {
        TypeTag::String
    }
}

impl ToBoundary for str {
    fn to_boundary(&self) -> BoundaryResult<MarshaledValue> {
        MarshaledString::new(self).map(MarshaledValue::String)
    }
}

impl Tagged for String {
    fn type_tag() -> TypeTag {
        TypeTag::String
    }
}

impl FromBoundary for String {
    fn from_boundary(value: &MarshaledValue) -> BoundaryResult<Self> {
        match value {
            MarshaledValue::String(s) => {
                let text = s.as_str()?;
                let mut owned = String::new();
                owned
                    .try_reserve_exact(text.len())
                    .map_err(|e| BoundaryError::allocation(text.len(), e))?;
                owned.push_str(text);
                Ok(owned)
            }
            other => Err(mismatch(TypeTag::String, other)),
        }
    }
}

impl ToBoundary for String {
    fn to_boundary(&self) -> BoundaryResult<MarshaledValue> {
        self.as_str().to_boundary()
    }
}

impl ArrayElement for String {
    fn encoded_len(&self) -> usize {
        4 + self.len()
    }

    fn write(&self, writer: &mut BufferWriter) -> BoundaryResult<()> {
        writer.emit_string(self)
    }

    fn read(reader: &mut BufferReader<'_>) -> BoundaryResult<Self> {
        reader.read_string()
    }
}

// ============================================================================
// Vectors and matrix
// ============================================================================

macro_rules! float_struct {
    ($ty:ident, $variant:ident, $n:literal, |$v:ident| $to:expr, |$a:ident| $from:expr) => {
        impl Tagged for $ty {
            fn type_tag() -> TypeTag {
                TypeTag::$variant
            }
        }

        impl FromBoundary for $ty {
            fn from_boundary(value: &MarshaledValue) -> BoundaryResult<Self> {
                match value {
                    MarshaledValue::$variant($a) => Ok($from),
                    other => Err(mismatch(TypeTag::$variant, other)),
                }
            }
        }

        impl ToBoundary for $ty {
            fn to_boundary(&self) -> BoundaryResult<MarshaledValue> {
                let $v = self;
                Ok(MarshaledValue::$variant($to))
            }
        }

        impl ArrayElement for $ty {
            fn encoded_len(&self) -> usize {
                4 * $n
            }

            fn write(&self, writer: &mut BufferWriter) -> BoundaryResult<()> {
                let $v = self;
                for component in $to {
                    writer.emit_f32(component);
                }
                Ok(())
            }

            fn read(reader: &mut BufferReader<'_>) -> BoundaryResult<Self> {
                let mut components = [0f32; $n];
                for component in components.iter_mut() {
                    *component = reader.read_f32()?;
                }
                let $a = &components;
                Ok($from)
            }
        }
    };
}

float_struct!(Vector2, Vector2, 2, |v| v.to_array(), |a| Vector2::from_array(*a));
float_struct!(Vector3, Vector3, 3, |v| v.to_array(), |a| Vector3::from_array(*a));
float_struct!(Vector4, Vector4, 4, |v| v.to_array(), |a| Vector4::from_array(*a));
float_struct!(
    Matrix4x4,
    Matrix4x4,
    16,
    |v| v.to_row_major(),
    |a| Matrix4x4::from_row_major(*a)
);

// ============================================================================
// Arrays
// ============================================================================

impl<T: ArrayElement> Tagged for [T] {
    fn type_tag() -> TypeTag {
        TypeTag::array_of(T::type_tag())
    }
}

impl<T: ArrayElement> ToBoundary for [T] {
    fn to_boundary(&self) -> BoundaryResult<MarshaledValue> {
        let len = u32::try_from(self.len()).map_err(|_| {
            BoundaryError::allocation(self.len(), "array exceeds the u32 length prefix")
        })?;
        let size = self.iter().map(ArrayElement::encoded_len).sum();
        let mut writer = BufferWriter::with_capacity(size)?;
        for item in self {
            item.write(&mut writer)?;
        }
        let array = MarshaledArray::new(T::type_tag(), len, writer.into_bytes().into_boxed_slice())?;
        Ok(MarshaledValue::Array(array))
    }
}

impl<T: ArrayElement> Tagged for Vec<T> {
    fn type_tag() -> TypeTag {
        TypeTag::array_of(T::type_tag())
    }
}

impl<T: ArrayElement> FromBoundary for Vec<T> {
    fn from_boundary(value: &MarshaledValue) -> BoundaryResult<Self> {
        let element = T::type_tag();
        let array = match value {
            MarshaledValue::Array(array) if *array.element() == element => array,
            other => return Err(mismatch(TypeTag::array_of(element), other)),
        };

        let mut items = Vec::new();
        items
            .try_reserve_exact(array.len())
            .map_err(|e| BoundaryError::allocation(array.as_bytes().len(), e))?;
        let mut reader = BufferReader::new(array.as_bytes());
        for _ in 0..array.len() {
            items.push(T::read(&mut reader)?);
        }
        if reader.has_more() {
            return Err(BoundaryError::Malformed(format!(
                "{} trailing bytes after {}[] of {} elements",
                reader.remaining(),
                element,
                array.len()
            )));
        }
        Ok(items)
    }
}

impl<T: ArrayElement> ToBoundary for Vec<T> {
    fn to_boundary(&self) -> BoundaryResult<MarshaledValue> {
        self.as_slice().to_boundary()
    }
}
