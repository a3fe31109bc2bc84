use std::fmt;

use serde::{Deserialize, Serialize};

/// Size in bytes of the in-record slot for a variable-length field.
///
/// The slot holds a `u64` element count followed by a `u64` offset into the
/// record's trailing heap.
pub const VARLEN_SLOT_SIZE: usize = 16;

/// Primitive scalar kinds that may appear in a record layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    /// Unsigned 16-bit integer
    U16,
    /// Unsigned 32-bit integer
    U32,
    /// Unsigned 64-bit integer
    U64,
    /// Signed 32-bit integer
    I32,
    /// IEEE 754 single precision float
    F32,
}

impl PrimitiveKind {
    /// Size of one value in bytes
    #[inline]
    pub fn size(&self) -> usize {
        match self {
            PrimitiveKind::U16 => 2,
            PrimitiveKind::U32 | PrimitiveKind::I32 | PrimitiveKind::F32 => 4,
            PrimitiveKind::U64 => 8,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveKind::U16 => "u16",
            PrimitiveKind::U32 => "u32",
            PrimitiveKind::U64 => "u64",
            PrimitiveKind::I32 => "i32",
            PrimitiveKind::F32 => "f32",
        };
        f.write_str(name)
    }
}

/// Structural description of an on-disk element type.
///
/// Two descriptors are compatible only if they are structurally equal: same
/// field names in the same order, same offsets, same kinds and lengths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum TypeDescriptor {
    /// A single scalar
    Primitive {
        /// Scalar kind
        kind: PrimitiveKind,
    },
    /// Fixed-length array of scalars
    Array {
        /// Element kind
        element: PrimitiveKind,
        /// Number of elements, fixed by the format version
        len: usize,
    },
    /// Variable-length sequence of scalars stored in the record heap
    VarLen {
        /// Element kind
        element: PrimitiveKind,
    },
    /// Variable-length UTF-8 string stored in the record heap
    VarString,
    /// Composite of named fields
    Compound(CompoundType),
}

impl TypeDescriptor {
    /// Shorthand for a scalar descriptor
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeDescriptor::Primitive { kind }
    }

    /// Shorthand for a fixed-length array descriptor
    pub fn array(element: PrimitiveKind, len: usize) -> Self {
        TypeDescriptor::Array { element, len }
    }

    /// Shorthand for a variable-length sequence descriptor
    pub fn var_len(element: PrimitiveKind) -> Self {
        TypeDescriptor::VarLen { element }
    }

    /// Size of the fixed part of one element in bytes
    pub fn size(&self) -> usize {
        match self {
            TypeDescriptor::Primitive { kind } => kind.size(),
            TypeDescriptor::Array { element, len } => element.size() * len,
            TypeDescriptor::VarLen { .. } | TypeDescriptor::VarString => VARLEN_SLOT_SIZE,
            TypeDescriptor::Compound(compound) => compound.size,
        }
    }

    /// Whether any part of the element lives in the variable-length heap
    pub fn is_variable(&self) -> bool {
        match self {
            TypeDescriptor::VarLen { .. } | TypeDescriptor::VarString => true,
            TypeDescriptor::Compound(compound) => {
                compound.fields.iter().any(|f| f.ty.is_variable())
            }
            _ => false,
        }
    }

    /// The compound layout, if this is a compound descriptor
    pub fn as_compound(&self) -> Option<&CompoundType> {
        match self {
            TypeDescriptor::Compound(compound) => Some(compound),
            _ => None,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive { kind } => write!(f, "{}", kind),
            TypeDescriptor::Array { element, len } => write!(f, "[{}; {}]", element, len),
            TypeDescriptor::VarLen { element } => write!(f, "vlen<{}>", element),
            TypeDescriptor::VarString => f.write_str("vlen<str>"),
            TypeDescriptor::Compound(compound) => {
                f.write_str("{")?;
                for (i, field) in compound.fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}@{}: {}", field.name, field.offset, field.ty)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// One named member of a compound layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name (part of the on-disk contract)
    pub name: String,
    /// Byte offset of the field within the fixed part of the record
    pub offset: usize,
    /// Field type
    pub ty: TypeDescriptor,
}

/// Ordered list of fields with packed offsets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundType {
    /// Total size of the fixed part in bytes
    pub size: usize,
    /// Fields in declaration order
    pub fields: Vec<Field>,
}

impl CompoundType {
    /// Start building a compound layout
    pub fn builder() -> CompoundBuilder {
        CompoundBuilder::default()
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Builder that assigns packed offsets in insertion order
#[derive(Debug, Default)]
pub struct CompoundBuilder {
    fields: Vec<Field>,
    offset: usize,
}

impl CompoundBuilder {
    /// Append a field of any type
    pub fn field(mut self, name: &str, ty: TypeDescriptor) -> Self {
        let size = ty.size();
        self.fields.push(Field {
            name: name.to_string(),
            offset: self.offset,
            ty,
        });
        self.offset += size;
        self
    }

    /// Append a scalar field
    pub fn primitive(self, name: &str, kind: PrimitiveKind) -> Self {
        self.field(name, TypeDescriptor::primitive(kind))
    }

    /// Append a fixed-length array field
    pub fn array(self, name: &str, element: PrimitiveKind, len: usize) -> Self {
        self.field(name, TypeDescriptor::array(element, len))
    }

    /// Finish the layout
    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::Compound(CompoundType {
            size: self.offset,
            fields: self.fields,
        })
    }
}
