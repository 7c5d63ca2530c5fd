//! Type tag catalogue and call signatures

use std::fmt;

// ============================================================================
// Type Tags
// ============================================================================

/// Closed catalogue of the value kinds that can cross the boundary.
///
/// Every parameter and return value of an entry point is described by exactly
/// one tag, fixed when the signature is declared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// `bool`
    Bool,
    /// 8-bit character code
    Char8,
    /// 16-bit character code
    Char16,
    /// `i8`
    Int8,
    /// `i16`
    Int16,
    /// `i32`
    Int32,
    /// `i64`
    Int64,
    /// `u8`
    UInt8,
    /// `u16`
    UInt16,
    /// `u32`
    UInt32,
    /// `u64`
    UInt64,
    /// Opaque pointer-sized integer
    Pointer,
    /// `f32`
    Float32,
    /// `f64`
    Float64,
    /// UTF-8 text
    String,
    /// Reference to an exported callable
    FunctionRef,
    /// Two `f32` components
    Vector2,
    /// Three `f32` components
    Vector3,
    /// Four `f32` components
    Vector4,
    /// Sixteen `f32` components, row-major
    Matrix4x4,
    /// Homogeneous array of the inner tag
    ArrayOf(Box<TypeTag>),
}

impl TypeTag {
    /// Every non-array tag, in catalogue order.
    pub const SCALARS: [TypeTag; 20] = [
        TypeTag::Bool,
        TypeTag::Char8,
        TypeTag::Char16,
        TypeTag::Int8,
        TypeTag::Int16,
        TypeTag::Int32,
        TypeTag::Int64,
        TypeTag::UInt8,
        TypeTag::UInt16,
        TypeTag::UInt32,
        TypeTag::UInt64,
        TypeTag::Pointer,
        TypeTag::Float32,
        TypeTag::Float64,
        TypeTag::String,
        TypeTag::FunctionRef,
        TypeTag::Vector2,
        TypeTag::Vector3,
        TypeTag::Vector4,
        TypeTag::Matrix4x4,
    ];

    /// `ArrayOf(element)`
    pub fn array_of(element: TypeTag) -> Self {
        TypeTag::ArrayOf(Box::new(element))
    }

    /// Element tag of an array tag.
    pub fn element(&self) -> Option<&TypeTag> {
        match self {
            TypeTag::ArrayOf(inner) => Some(inner),
            _ => None,
        }
    }

    /// Whether this is an array tag
    pub fn is_array(&self) -> bool {
        matches!(self, TypeTag::ArrayOf(_))
    }

    /// Size in bytes of one value of this tag inside an array buffer, or
    /// `None` for variable-width kinds.
    pub fn fixed_size(&self) -> Option<usize> {
        let size = match self {
            TypeTag::Bool | TypeTag::Char8 | TypeTag::Int8 | TypeTag::UInt8 => 1,
            TypeTag::Char16 | TypeTag::Int16 | TypeTag::UInt16 => 2,
            TypeTag::Int32 | TypeTag::UInt32 | TypeTag::Float32 => 4,
            TypeTag::Int64
            | TypeTag::UInt64
            | TypeTag::Pointer
            | TypeTag::Float64
            | TypeTag::FunctionRef
            | TypeTag::Vector2 => 8,
            TypeTag::Vector3 => 12,
            TypeTag::Vector4 => 16,
            TypeTag::Matrix4x4 => 64,
            TypeTag::String | TypeTag::ArrayOf(_) => return None,
        };
        Some(size)
    }

    /// Short lowercase name used in signatures and error messages.
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeTag::Bool => "bool",
            TypeTag::Char8 => "char8",
            TypeTag::Char16 => "char16",
            TypeTag::Int8 => "int8",
            TypeTag::Int16 => "int16",
            TypeTag::Int32 => "int32",
            TypeTag::Int64 => "int64",
            TypeTag::UInt8 => "uint8",
            TypeTag::UInt16 => "uint16",
            TypeTag::UInt32 => "uint32",
            TypeTag::UInt64 => "uint64",
            TypeTag::Pointer => "pointer",
            TypeTag::Float32 => "float32",
            TypeTag::Float64 => "float64",
            TypeTag::String => "string",
            TypeTag::FunctionRef => "function",
            TypeTag::Vector2 => "vec2",
            TypeTag::Vector3 => "vec3",
            TypeTag::Vector4 => "vec4",
            TypeTag::Matrix4x4 => "mat4x4",
            TypeTag::ArrayOf(inner) => return write!(f, "{}[]", inner),
        };
        f.write_str(name)
    }
}

// ============================================================================
// Signatures
// ============================================================================

/// Passing convention of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Callee receives a private copy; nothing flows back.
    ByValue,
    /// Callee reads the initial value and its final value replaces the
    /// caller's slot.
    ByReference,
}

/// One parameter of a call signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterSpec {
    /// Zero-based position in the argument list
    pub position: usize,
    /// Declared tag
    pub tag: TypeTag,
    /// Passing convention
    pub direction: Direction,
}

impl ParameterSpec {
    /// By-value parameter
    pub fn by_value(position: usize, tag: TypeTag) -> Self {
        Self {
            position,
            tag,
            direction: Direction::ByValue,
        }
    }

    /// By-reference parameter
    pub fn by_reference(position: usize, tag: TypeTag) -> Self {
        Self {
            position,
            tag,
            direction: Direction::ByReference,
        }
    }

    /// Whether the callee's final value flows back to the caller
    pub fn is_reference(&self) -> bool {
        self.direction == Direction::ByReference
    }
}

/// Stable name, ordered parameters and optional return tag of an entry point.
///
/// Signatures are built once when exports are declared and never change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallSignature {
    name: String,
    params: Vec<ParameterSpec>,
    ret: Option<TypeTag>,
}

impl CallSignature {
    /// Signature with no parameters and no return value
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            ret: None,
        }
    }

    /// Append a by-value parameter
    pub fn param(mut self, tag: TypeTag) -> Self {
        let position = self.params.len();
        self.params.push(ParameterSpec::by_value(position, tag));
        self
    }

    /// Append a by-reference parameter
    pub fn param_ref(mut self, tag: TypeTag) -> Self {
        let position = self.params.len();
        self.params.push(ParameterSpec::by_reference(position, tag));
        self
    }

    /// Set the return tag
    pub fn returns(mut self, tag: TypeTag) -> Self {
        self.ret = Some(tag);
        self
    }

    /// Stable name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameters in order
    pub fn params(&self) -> &[ParameterSpec] {
        &self.params
    }

    /// Return tag, `None` for entry points without a return value
    pub fn ret(&self) -> Option<&TypeTag> {
        self.ret.as_ref()
    }

    /// Number of parameters
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// By-reference parameters in order
    pub fn references(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.params.iter().filter(|p| p.is_reference())
    }
}

impl fmt::Display for CallSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if param.is_reference() {
                f.write_str("ref ")?;
            }
            write!(f, "{}", param.tag)?;
        }
        f.write_str(")")?;
        if let Some(ret) = &self.ret {
            write!(f, " -> {}", ret)?;
        }
        Ok(())
    }
}
