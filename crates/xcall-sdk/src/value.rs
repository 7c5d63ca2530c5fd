//! Marshaled values
//!
//! A [`MarshaledValue`] carries exactly one tagged value across the boundary.
//! Strings and arrays own their buffers outright: cloning a value copies the
//! buffer, so no storage is ever shared between the two sides.

use std::fmt;

use crate::buffer::BufferReader;
use crate::error::{BoundaryError, BoundaryResult};
use crate::types::TypeTag;

// ============================================================================
// Marshaled String
// ============================================================================

/// Length-prefixed UTF-8 text buffer.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct MarshaledString {
    len: u32,
    bytes: Box<[u8]>,
}

impl MarshaledString {
    /// Copy `text` into a buffer sized exactly to it.
    pub fn new(text: &str) -> BoundaryResult<Self> {
        Self::from_bytes(text.as_bytes())
    }

    /// Copy raw bytes. Their encoding is only checked on decode.
    pub fn from_bytes(bytes: &[u8]) -> BoundaryResult<Self> {
        let len = u32::try_from(bytes.len()).map_err(|_| {
            BoundaryError::allocation(bytes.len(), "string exceeds the u32 length prefix")
        })?;
        let mut owned = Vec::new();
        owned
            .try_reserve_exact(bytes.len())
            .map_err(|e| BoundaryError::allocation(bytes.len(), e))?;
        owned.extend_from_slice(bytes);
        Ok(Self {
            len,
            bytes: owned.into_boxed_slice(),
        })
    }

    /// Length prefix, in bytes
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Whether the string is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Raw UTF-8 bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Borrow as text, failing on invalid UTF-8
    pub fn as_str(&self) -> BoundaryResult<&str> {
        std::str::from_utf8(&self.bytes).map_err(|e| BoundaryError::InvalidUtf8(e.valid_up_to()))
    }
}

impl fmt::Debug for MarshaledString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(&self.bytes))
    }
}

// ============================================================================
// Marshaled Array
// ============================================================================

/// Homogeneous array buffer: `len` elements of `element`, little-endian.
///
/// Fixed-width elements are packed back to back; string elements are each
/// a u32 length prefix followed by their bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct MarshaledArray {
    element: TypeTag,
    len: u32,
    data: Box<[u8]>,
}

impl MarshaledArray {
    /// Wrap an encoded buffer, checking it is consistent with `len`.
    pub fn new(element: TypeTag, len: u32, data: Box<[u8]>) -> BoundaryResult<Self> {
        match element.fixed_size() {
            Some(size) => {
                let expected = size * len as usize;
                if data.len() != expected {
                    return Err(BoundaryError::Malformed(format!(
                        "{}[] of {} elements needs {} bytes, buffer has {}",
                        element,
                        len,
                        expected,
                        data.len()
                    )));
                }
            }
            None if element == TypeTag::String => {
                let mut reader = BufferReader::new(&data);
                for _ in 0..len {
                    let n = reader.read_u32()? as usize;
                    reader.read_bytes(n)?;
                }
                if reader.has_more() {
                    return Err(BoundaryError::Malformed(format!(
                        "{} trailing bytes after string[] of {} elements",
                        reader.remaining(),
                        len
                    )));
                }
            }
            None => {
                return Err(BoundaryError::Malformed(format!(
                    "{}[] is not a marshalable array",
                    element
                )))
            }
        }
        Ok(Self { element, len, data })
    }

    /// Empty array of `element`
    pub fn empty(element: TypeTag) -> Self {
        Self {
            element,
            len: 0,
            data: Box::default(),
        }
    }

    /// Element tag
    pub fn element(&self) -> &TypeTag {
        &self.element
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Whether the array has no elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Encoded element bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Debug for MarshaledArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] ({} bytes)",
            self.element,
            self.len,
            self.data.len()
        )
    }
}

// ============================================================================
// Marshaled Value
// ============================================================================

/// One value in flight across the boundary, or `Void` for "no value".
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MarshaledValue {
    /// No value (return of a void entry point, vacated slot)
    #[default]
    Void,
    /// `bool`
    Bool(bool),
    /// 8-bit character code
    Char8(u8),
    /// 16-bit character code
    Char16(u16),
    /// `i8`
    Int8(i8),
    /// `i16`
    Int16(i16),
    /// `i32`
    Int32(i32),
    /// `i64`
    Int64(i64),
    /// `u8`
    UInt8(u8),
    /// `u16`
    UInt16(u16),
    /// `u32`
    UInt32(u32),
    /// `u64`
    UInt64(u64),
    /// Pointer bits, widened to 64
    Pointer(u64),
    /// `f32`
    Float32(f32),
    /// `f64`
    Float64(f64),
    /// Text buffer
    String(MarshaledString),
    /// Raw function reference handle; 0 is "no callable"
    FunctionRef(u64),
    /// `x, y`
    Vector2([f32; 2]),
    /// `x, y, z`
    Vector3([f32; 3]),
    /// `x, y, z, w`
    Vector4([f32; 4]),
    /// Sixteen values, row-major
    Matrix4x4([f32; 16]),
    /// Array buffer
    Array(MarshaledArray),
}

impl MarshaledValue {
    /// Tag of the carried value, `None` for `Void`
    pub fn type_tag(&self) -> Option<TypeTag> {
        let tag = match self {
            MarshaledValue::Void => return None,
            MarshaledValue::Bool(_) => TypeTag::Bool,
            MarshaledValue::Char8(_) => TypeTag::Char8,
            MarshaledValue::Char16(_) => TypeTag::Char16,
            MarshaledValue::Int8(_) => TypeTag::Int8,
            MarshaledValue::Int16(_) => TypeTag::Int16,
            MarshaledValue::Int32(_) => TypeTag::Int32,
            MarshaledValue::Int64(_) => TypeTag::Int64,
            MarshaledValue::UInt8(_) => TypeTag::UInt8,
            MarshaledValue::UInt16(_) => TypeTag::UInt16,
            MarshaledValue::UInt32(_) => TypeTag::UInt32,
            MarshaledValue::UInt64(_) => TypeTag::UInt64,
            MarshaledValue::Pointer(_) => TypeTag::Pointer,
            MarshaledValue::Float32(_) => TypeTag::Float32,
            MarshaledValue::Float64(_) => TypeTag::Float64,
            MarshaledValue::String(_) => TypeTag::String,
            MarshaledValue::FunctionRef(_) => TypeTag::FunctionRef,
            MarshaledValue::Vector2(_) => TypeTag::Vector2,
            MarshaledValue::Vector3(_) => TypeTag::Vector3,
            MarshaledValue::Vector4(_) => TypeTag::Vector4,
            MarshaledValue::Matrix4x4(_) => TypeTag::Matrix4x4,
            MarshaledValue::Array(array) => TypeTag::array_of(array.element().clone()),
        };
        Some(tag)
    }

    /// Whether the value carries the tag `tag`
    pub fn has_tag(&self, tag: &TypeTag) -> bool {
        match (self, tag) {
            (MarshaledValue::Array(array), TypeTag::ArrayOf(element)) => {
                array.element() == element.as_ref()
            }
            (MarshaledValue::Array(_), _) | (_, TypeTag::ArrayOf(_)) => false,
            _ => self.type_tag().as_ref() == Some(tag),
        }
    }

    /// Tag name for diagnostics, `void` for `Void`
    pub fn type_name(&self) -> String {
        self.type_tag()
            .map(|tag| tag.to_string())
            .unwrap_or_else(|| "void".to_string())
    }

    /// Whether this is `Void`
    pub fn is_void(&self) -> bool {
        matches!(self, MarshaledValue::Void)
    }

    /// Bytes of payload a copy of this value allocates
    pub fn payload_len(&self) -> usize {
        match self {
            MarshaledValue::String(s) => s.len(),
            MarshaledValue::Array(a) => a.as_bytes().len(),
            other => other
                .type_tag()
                .and_then(|tag| tag.fixed_size())
                .unwrap_or(0),
        }
    }

    /// Equality with floats compared by bit pattern, so NaN payloads and
    /// signed zeros must match exactly.
    pub fn bit_eq(&self, other: &Self) -> bool {
        fn bits<const N: usize>(a: &[f32; N], b: &[f32; N]) -> bool {
            a.iter().zip(b.iter()).all(|(x, y)| x.to_bits() == y.to_bits())
        }

        match (self, other) {
            (MarshaledValue::Float32(a), MarshaledValue::Float32(b)) => a.to_bits() == b.to_bits(),
            (MarshaledValue::Float64(a), MarshaledValue::Float64(b)) => a.to_bits() == b.to_bits(),
            (MarshaledValue::Vector2(a), MarshaledValue::Vector2(b)) => bits(a, b),
            (MarshaledValue::Vector3(a), MarshaledValue::Vector3(b)) => bits(a, b),
            (MarshaledValue::Vector4(a), MarshaledValue::Vector4(b)) => bits(a, b),
            (MarshaledValue::Matrix4x4(a), MarshaledValue::Matrix4x4(b)) => bits(a, b),
            _ => self == other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tags() {
        assert_eq!(MarshaledValue::Void.type_tag(), None);
        assert_eq!(MarshaledValue::Char16(1).type_tag(), Some(TypeTag::Char16));
        assert_eq!(MarshaledValue::Pointer(1).type_name(), "pointer");
        let array = MarshaledValue::Array(MarshaledArray::empty(TypeTag::Int64));
        assert_eq!(
            array.type_tag(),
            Some(TypeTag::array_of(TypeTag::Int64))
        );
        assert!(array.has_tag(&TypeTag::array_of(TypeTag::Int64)));
        assert!(!array.has_tag(&TypeTag::array_of(TypeTag::UInt64)));
        assert!(!MarshaledValue::Int64(0).has_tag(&TypeTag::array_of(TypeTag::Int64)));
    }

    #[test]
    fn test_array_size_check() {
        let err = MarshaledArray::new(TypeTag::Int32, 2, vec![0u8; 7].into_boxed_slice());
        assert!(matches!(err, Err(BoundaryError::Malformed(_))));
        assert!(MarshaledArray::new(TypeTag::Int32, 2, vec![0u8; 8].into_boxed_slice()).is_ok());
    }

    #[test]
    fn test_string_array_check() {
        let data = vec![1, 0, 0, 0, b'a', 0, 0, 0, 0];
        assert!(MarshaledArray::new(TypeTag::String, 2, data.clone().into_boxed_slice()).is_ok());
        assert!(MarshaledArray::new(TypeTag::String, 3, data.clone().into_boxed_slice()).is_err());
        assert!(MarshaledArray::new(TypeTag::String, 1, data.into_boxed_slice()).is_err());
    }

    #[test]
    fn test_nested_arrays_rejected() {
        let err = MarshaledArray::new(TypeTag::array_of(TypeTag::Int8), 0, Box::default());
        assert!(matches!(err, Err(BoundaryError::Malformed(_))));
    }

    #[test]
    fn test_empty_array_is_distinct() {
        let empty = MarshaledValue::Array(MarshaledArray::empty(TypeTag::Bool));
        assert_ne!(empty, MarshaledValue::Void);
        assert_eq!(empty.payload_len(), 0);
        assert_eq!(empty.type_name(), "bool[]");
    }

    #[test]
    fn test_bit_eq() {
        let nan = MarshaledValue::Float32(f32::NAN);
        assert_ne!(nan, nan.clone());
        assert!(nan.bit_eq(&nan.clone()));
        assert!(!MarshaledValue::Float64(0.0).bit_eq(&MarshaledValue::Float64(-0.0)));
    }

    #[test]
    fn test_string_copy() {
        let s = MarshaledString::new("Hello World").unwrap();
        assert_eq!(s.len(), 11);
        assert_eq!(s.as_str().unwrap(), "Hello World");
        let bad = MarshaledString::from_bytes(&[0x66, 0xff]).unwrap();
        assert_eq!(bad.as_str(), Err(BoundaryError::InvalidUtf8(1)));
    }
}
