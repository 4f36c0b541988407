//! The static field-type descriptor table.
//!
//! Every field type a message schema can declare maps to one [`TypeInfo`]
//! entry describing how a decoded value is stored in memory, which wire type
//! it is encoded with, and which wire types a decoder may accept for it.
//!
//! ```rust
//! use wirecore::{FieldType, ValueType, WireType};
//!
//! let info = FieldType::Message.info();
//! assert_eq!(info.value_type, Some(ValueType::Message));
//! assert!(info.accepts(WireType::Delimited));
//! assert!(info.accepts(WireType::StartGroup));
//! assert!(!info.accepts(WireType::Varint));
//! ```

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a value is framed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    Delimited = 2,
    StartGroup = 3,
    EndGroup = 4,
    Fixed32 = 5,
}

impl WireType {
    pub const ALL: [Self; 6] = [
        Self::Varint,
        Self::Fixed64,
        Self::Delimited,
        Self::StartGroup,
        Self::EndGroup,
        Self::Fixed32,
    ];

    /// The wire type for the low three bits of a field tag.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::Varint,
            1 => Self::Fixed64,
            2 => Self::Delimited,
            3 => Self::StartGroup,
            4 => Self::EndGroup,
            5 => Self::Fixed32,
            _ => return None,
        })
    }

    /// This wire type's bit in [`TypeInfo::allowed_wire_types`].
    #[must_use]
    pub const fn bit(self) -> u8 {
        1 << self as u8
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Varint => "varint",
            Self::Fixed64 => "fixed64",
            Self::Delimited => "delimited",
            Self::StartGroup => "start_group",
            Self::EndGroup => "end_group",
            Self::Fixed32 => "fixed32",
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A field type as declared in a schema. Discriminants match the
/// descriptor encoding; there is no type 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum FieldType {
    Double = 1,
    Float = 2,
    Int64 = 3,
    Uint64 = 4,
    Int32 = 5,
    Fixed64 = 6,
    Fixed32 = 7,
    Bool = 8,
    String = 9,
    Group = 10,
    Message = 11,
    Bytes = 12,
    Uint32 = 13,
    Enum = 14,
    Sfixed32 = 15,
    Sfixed64 = 16,
    Sint32 = 17,
    Sint64 = 18,
}

impl FieldType {
    pub const ALL: [Self; 18] = [
        Self::Double,
        Self::Float,
        Self::Int64,
        Self::Uint64,
        Self::Int32,
        Self::Fixed64,
        Self::Fixed32,
        Self::Bool,
        Self::String,
        Self::Group,
        Self::Message,
        Self::Bytes,
        Self::Uint32,
        Self::Enum,
        Self::Sfixed32,
        Self::Sfixed64,
        Self::Sint32,
        Self::Sint64,
    ];

    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        if code == 0 || code as usize > Self::ALL.len() {
            return None;
        }
        Some(Self::ALL[code as usize - 1])
    }

    /// This type's descriptor entry.
    #[must_use]
    pub fn info(self) -> &'static TypeInfo {
        &TYPE_INFO[self as usize]
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Double => "double",
            Self::Float => "float",
            Self::Int64 => "int64",
            Self::Uint64 => "uint64",
            Self::Int32 => "int32",
            Self::Fixed64 => "fixed64",
            Self::Fixed32 => "fixed32",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Group => "group",
            Self::Message => "message",
            Self::Bytes => "bytes",
            Self::Uint32 => "uint32",
            Self::Enum => "enum",
            Self::Sfixed32 => "sfixed32",
            Self::Sfixed64 => "sfixed64",
            Self::Sint32 => "sint32",
            Self::Sint64 => "sint64",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// In-memory representation category of a decoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Double,
    Float,
    Int64,
    Uint64,
    Int32,
    Uint32,
    Bool,
    /// Length-delimited bytes, held by reference.
    String,
    /// A nested record, held by reference.
    Message,
}

/// One row of the descriptor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeInfo {
    /// Alignment of the in-memory value.
    pub align: usize,
    /// Size of the in-memory value.
    pub size: usize,
    /// Wire type used when encoding.
    pub native_wire_type: WireType,
    /// Bitmask of [`WireType::bit`]s a decoder may accept.
    pub allowed_wire_types: u8,
    /// `None` only for the sentinel entry.
    pub value_type: Option<ValueType>,
    /// Name of the in-memory type, for diagnostics.
    pub type_name: &'static str,
}

impl TypeInfo {
    const INVALID: Self = Self {
        align: 0,
        size: 0,
        native_wire_type: WireType::Varint,
        allowed_wire_types: 0,
        value_type: None,
        type_name: "",
    };

    /// Whether a field of this type may be decoded from `wire_type`.
    #[must_use]
    pub const fn accepts(&self, wire_type: WireType) -> bool {
        self.allowed_wire_types & wire_type.bit() != 0
    }

    /// False only for the sentinel at index 0.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.value_type.is_some()
    }
}

/// Builds an entry accepting the native wire type, plus `Delimited` for
/// packed and length-prefixed payloads unless `delimited` is false, plus any
/// `extra` wire types.
macro_rules! type_info {
    ($wire:ident, $ty:ty, $value:ident, delimited: $delimited:expr $(, extra: $extra:ident)?) => {
        TypeInfo {
            align: align_of::<$ty>(),
            size: size_of::<$ty>(),
            native_wire_type: WireType::$wire,
            allowed_wire_types: WireType::$wire.bit()
                | (if $delimited { WireType::Delimited.bit() } else { 0 })
                $(| WireType::$extra.bit())?,
            value_type: Some(ValueType::$value),
            type_name: stringify!($ty),
        }
    };
}

/// Descriptor entries indexed by [`FieldType`] discriminant. Index 0 is an
/// invalid sentinel.
pub static TYPE_INFO: [TypeInfo; 19] = [
    TypeInfo::INVALID,
    type_info!(Fixed64, f64, Double, delimited: true),
    type_info!(Fixed32, f32, Float, delimited: true),
    type_info!(Varint, i64, Int64, delimited: true),
    type_info!(Varint, u64, Uint64, delimited: true),
    type_info!(Varint, i32, Int32, delimited: true),
    type_info!(Fixed64, u64, Uint64, delimited: true),
    type_info!(Fixed32, u32, Uint32, delimited: true),
    type_info!(Varint, bool, Bool, delimited: true),
    type_info!(Delimited, usize, String, delimited: true),
    type_info!(StartGroup, usize, Message, delimited: false),
    type_info!(Delimited, usize, Message, delimited: true, extra: StartGroup),
    type_info!(Delimited, usize, String, delimited: true),
    type_info!(Varint, u32, Uint32, delimited: true),
    type_info!(Varint, u32, Int32, delimited: true),
    type_info!(Fixed32, i32, Int32, delimited: true),
    type_info!(Fixed64, i64, Int64, delimited: true),
    type_info!(Varint, i32, Int32, delimited: true),
    type_info!(Varint, i64, Int64, delimited: true),
];

/// The entry for a raw field-type code, or `None` for codes past the end of
/// the table. Code 0 yields the sentinel.
#[must_use]
pub fn type_info(code: u8) -> Option<&'static TypeInfo> {
    TYPE_INFO.get(usize::from(code))
}

/// Renders the whole table, one entry per line.
#[must_use]
pub fn describe_table() -> impl fmt::Display {
    TableDump
}

struct TableDump;

impl fmt::Display for TableDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (code, info) in (0u8..).zip(TYPE_INFO.iter()) {
            if code > 0 {
                f.write_str("\n")?;
            }
            let (Some(field_type), Some(value_type)) = (FieldType::from_u8(code), info.value_type)
            else {
                write!(f, "{code} (invalid)")?;
                continue;
            };
            write!(
                f,
                "{code} {field_type}: {} size={} align={} native={} accepts=",
                info.type_name, info.size, info.align, info.native_wire_type
            )?;
            let mut sep = "";
            for wire_type in WireType::ALL {
                if info.accepts(wire_type) {
                    write!(f, "{sep}{wire_type}")?;
                    sep = "|";
                }
            }
            write!(f, " value={value_type:?}")?;
        }
        Ok(())
    }
}
