//! # TDF Value Model
//!
//! The self-describing, labeled, recursively-typed binary value format
//! carried inside packet content.
//!
//! Every value is written as one big-endian 32-bit header word
//! (`tag << 8 | type`) followed by a type-specific payload. The value set is
//! a closed sum type, so the decode dispatch below is exhaustive and checked
//! at compile time.
//!
//! ## Wire Layout
//! ```text
//! [Tag(3)] [Type(1)] [Payload(N)]
//! ```
//!
//! Nesting (Struct, List-of-Struct, Union) forms a strict ownership tree;
//! children are owned vectors, never shared.

use crate::core::buffer::PacketBuffer;
use crate::core::tag::{label_to_tag, tag_to_label};
use crate::error::{ProtocolError, Result};

/// Recursion ceiling for decoding. The format is a strict tree, but a
/// hostile peer can nest headers arbitrarily deep in very few bytes; the
/// decoder must refuse before the call stack does.
pub const MAX_DECODE_DEPTH: usize = 64;

/// One-byte type discriminant carried in the low byte of the header word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TdfType {
    Int = 0x00,
    String = 0x01,
    Blob = 0x02,
    Struct = 0x03,
    List = 0x04,
    PairList = 0x05,
    Union = 0x06,
    VarIntList = 0x07,
    Pair = 0x08,
    Triple = 0x09,
    Float = 0x0A,
    /// Sentinel used only as a Union discriminant.
    Empty = 0x7F,
}

impl TdfType {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(TdfType::Int),
            0x01 => Some(TdfType::String),
            0x02 => Some(TdfType::Blob),
            0x03 => Some(TdfType::Struct),
            0x04 => Some(TdfType::List),
            0x05 => Some(TdfType::PairList),
            0x06 => Some(TdfType::Union),
            0x07 => Some(TdfType::VarIntList),
            0x08 => Some(TdfType::Pair),
            0x09 => Some(TdfType::Triple),
            0x0A => Some(TdfType::Float),
            0x7F => Some(TdfType::Empty),
            _ => None,
        }
    }

    pub fn byte(self) -> u8 {
        self as u8
    }
}

/// Element kind for List and PairList payloads. Elements of these kinds are
/// written back-to-back with no per-element header; only the list declares
/// its type once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ListKind {
    Int = 0x00,
    String = 0x01,
    Struct = 0x03,
    Triple = 0x09,
    Float = 0x0A,
}

impl ListKind {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(ListKind::Int),
            0x01 => Some(ListKind::String),
            0x03 => Some(ListKind::Struct),
            0x09 => Some(ListKind::Triple),
            0x0A => Some(ListKind::Float),
            _ => None,
        }
    }

    pub fn byte(self) -> u8 {
        self as u8
    }
}

/// Two var-ints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pair {
    pub a: i64,
    pub b: i64,
}

/// Three var-ints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Triple {
    pub a: i64,
    pub b: i64,
    pub c: i64,
}

impl Triple {
    fn read(buf: &mut PacketBuffer) -> Self {
        Triple {
            a: buf.read_var_int(),
            b: buf.read_var_int(),
            c: buf.read_var_int(),
        }
    }

    fn write(&self, buf: &mut PacketBuffer) {
        buf.write_var_int(self.a);
        buf.write_var_int(self.b);
        buf.write_var_int(self.c);
    }
}

/// Struct body: an ordered field sequence plus the optional leading `0x02`
/// start marker, which signals a format revision and must survive a
/// decode/re-encode round trip unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TdfStruct {
    pub start_marker: bool,
    pub fields: Vec<Tdf>,
}

impl TdfStruct {
    pub fn new(fields: Vec<Tdf>) -> Self {
        Self {
            start_marker: false,
            fields,
        }
    }

    fn read_body(buf: &mut PacketBuffer, depth: usize) -> Result<Self> {
        let mut start_marker = false;
        if buf.peek_u8() == Some(0x02) {
            buf.skip(1)?;
            start_marker = true;
        }
        let mut fields = Vec::new();
        loop {
            match buf.peek_u8() {
                // Well-formed structs always carry their zero terminator;
                // running out of bytes first means alignment is lost.
                None => {
                    return Err(ProtocolError::Truncated {
                        needed: 1,
                        available: 0,
                    })
                }
                Some(0) => {
                    buf.skip(1)?;
                    break;
                }
                Some(_) => fields.push(Tdf::read_at_depth(buf, depth + 1)?),
            }
        }
        Ok(Self {
            start_marker,
            fields,
        })
    }

    fn write_body(&self, buf: &mut PacketBuffer) {
        if self.start_marker {
            buf.write_u8(0x02);
        }
        for field in &self.fields {
            field.write(buf);
        }
        buf.write_u8(0);
    }
}

/// Headerless element of a List or PairList payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ListItem {
    Int(i64),
    String(String),
    Struct(TdfStruct),
    Triple(Triple),
    Float(f64),
}

impl ListItem {
    fn read(kind: ListKind, buf: &mut PacketBuffer, depth: usize) -> Result<Self> {
        Ok(match kind {
            ListKind::Int => ListItem::Int(buf.read_var_int()),
            ListKind::String => ListItem::String(buf.read_string()?),
            ListKind::Struct => ListItem::Struct(TdfStruct::read_body(buf, depth)?),
            ListKind::Triple => ListItem::Triple(Triple::read(buf)),
            ListKind::Float => ListItem::Float(buf.read_f64()?),
        })
    }

    fn write(&self, buf: &mut PacketBuffer) {
        match self {
            ListItem::Int(v) => buf.write_var_int(*v),
            ListItem::String(v) => buf.write_string(v),
            ListItem::Struct(v) => v.write_body(buf),
            ListItem::Triple(v) => v.write(buf),
            ListItem::Float(v) => buf.write_f64(*v),
        }
    }
}

/// The closed set of TDF payload variants.
#[derive(Debug, Clone, PartialEq)]
pub enum TdfValue {
    Int(i64),
    String(String),
    Blob(Vec<u8>),
    Struct(TdfStruct),
    /// Homogeneous element sequence. Callers must keep `items` matching
    /// `kind`; the encoder writes each element according to its own variant.
    List {
        kind: ListKind,
        items: Vec<ListItem>,
    },
    /// Interleaved pairs. Equal backing lengths are guaranteed structurally
    /// by the tuple representation.
    PairList {
        kind_a: ListKind,
        kind_b: ListKind,
        pairs: Vec<(ListItem, ListItem)>,
    },
    /// Discriminated optional value. `kind` is what the wire declared; the
    /// nested value is self-describing, so a disagreeing declaration is
    /// accepted as-is on decode.
    Union {
        kind: TdfType,
        value: Option<Box<Tdf>>,
    },
    VarIntList(Vec<i64>),
    Pair(Pair),
    Triple(Triple),
    Float(f64),
}

impl TdfValue {
    pub fn tdf_type(&self) -> TdfType {
        match self {
            TdfValue::Int(_) => TdfType::Int,
            TdfValue::String(_) => TdfType::String,
            TdfValue::Blob(_) => TdfType::Blob,
            TdfValue::Struct(_) => TdfType::Struct,
            TdfValue::List { .. } => TdfType::List,
            TdfValue::PairList { .. } => TdfType::PairList,
            TdfValue::Union { .. } => TdfType::Union,
            TdfValue::VarIntList(_) => TdfType::VarIntList,
            TdfValue::Pair(_) => TdfType::Pair,
            TdfValue::Triple(_) => TdfType::Triple,
            TdfValue::Float(_) => TdfType::Float,
        }
    }

    fn write_payload(&self, buf: &mut PacketBuffer) {
        match self {
            TdfValue::Int(v) => buf.write_var_int(*v),
            TdfValue::String(v) => buf.write_string(v),
            TdfValue::Blob(v) => buf.write_blob(v),
            TdfValue::Struct(v) => v.write_body(buf),
            TdfValue::List { kind, items } => {
                buf.write_u8(kind.byte());
                buf.write_var_int(items.len() as i64);
                for item in items {
                    item.write(buf);
                }
            }
            TdfValue::PairList {
                kind_a,
                kind_b,
                pairs,
            } => {
                buf.write_u8(kind_a.byte());
                buf.write_u8(kind_b.byte());
                buf.write_var_int(pairs.len() as i64);
                for (a, b) in pairs {
                    a.write(buf);
                    b.write(buf);
                }
            }
            TdfValue::Union { kind, value } => match value {
                Some(inner) => {
                    buf.write_u8(kind.byte());
                    inner.write(buf);
                }
                None => buf.write_u8(TdfType::Empty.byte()),
            },
            TdfValue::VarIntList(values) => {
                buf.write_var_int(values.len() as i64);
                for v in values {
                    buf.write_var_int(*v);
                }
            }
            TdfValue::Pair(p) => {
                buf.write_var_int(p.a);
                buf.write_var_int(p.b);
            }
            TdfValue::Triple(t) => t.write(buf),
            TdfValue::Float(v) => buf.write_f64(*v),
        }
    }

    fn read_payload(tdf_type: TdfType, buf: &mut PacketBuffer, depth: usize) -> Result<Self> {
        Ok(match tdf_type {
            TdfType::Int => TdfValue::Int(buf.read_var_int()),
            TdfType::String => TdfValue::String(buf.read_string()?),
            TdfType::Blob => TdfValue::Blob(buf.read_blob()?),
            TdfType::Struct => TdfValue::Struct(TdfStruct::read_body(buf, depth)?),
            TdfType::List => {
                let kind_byte = buf.read_u8()?;
                let kind = ListKind::from_byte(kind_byte)
                    .ok_or(ProtocolError::UnknownListType(kind_byte))?;
                let count = read_count(buf)?;
                let mut items = Vec::with_capacity(count.min(buf.remaining()));
                for _ in 0..count {
                    items.push(ListItem::read(kind, buf, depth)?);
                }
                TdfValue::List { kind, items }
            }
            TdfType::PairList => {
                let a_byte = buf.read_u8()?;
                let kind_a =
                    ListKind::from_byte(a_byte).ok_or(ProtocolError::UnknownListType(a_byte))?;
                let b_byte = buf.read_u8()?;
                let kind_b =
                    ListKind::from_byte(b_byte).ok_or(ProtocolError::UnknownListType(b_byte))?;
                let count = read_count(buf)?;
                let mut pairs = Vec::with_capacity(count.min(buf.remaining()));
                for _ in 0..count {
                    let a = ListItem::read(kind_a, buf, depth)?;
                    let b = ListItem::read(kind_b, buf, depth)?;
                    pairs.push((a, b));
                }
                TdfValue::PairList {
                    kind_a,
                    kind_b,
                    pairs,
                }
            }
            TdfType::Union => {
                let disc = buf.read_u8()?;
                if disc == TdfType::Empty.byte() {
                    TdfValue::Union {
                        kind: TdfType::Empty,
                        value: None,
                    }
                } else {
                    let kind =
                        TdfType::from_byte(disc).ok_or(ProtocolError::UnknownTdfType(disc))?;
                    let inner = Tdf::read_at_depth(buf, depth + 1)?;
                    TdfValue::Union {
                        kind,
                        value: Some(Box::new(inner)),
                    }
                }
            }
            TdfType::VarIntList => {
                let count = read_count(buf)?;
                let mut values = Vec::with_capacity(count.min(buf.remaining()));
                for _ in 0..count {
                    values.push(buf.read_var_int());
                }
                TdfValue::VarIntList(values)
            }
            TdfType::Pair => TdfValue::Pair(Pair {
                a: buf.read_var_int(),
                b: buf.read_var_int(),
            }),
            TdfType::Triple => TdfValue::Triple(Triple::read(buf)),
            TdfType::Float => TdfValue::Float(buf.read_f64()?),
            // Empty is only meaningful as a Union discriminant.
            TdfType::Empty => return Err(ProtocolError::UnknownTdfType(TdfType::Empty.byte())),
        })
    }
}

/// A labeled TDF value: one field of a packet content sequence or of an
/// enclosing struct.
#[derive(Debug, Clone, PartialEq)]
pub struct Tdf {
    pub label: String,
    pub value: TdfValue,
}

impl Tdf {
    pub fn new(label: impl Into<String>, value: TdfValue) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    /// Packed 24-bit wire identity of this value's label.
    pub fn tag(&self) -> u32 {
        label_to_tag(&self.label)
    }

    pub fn int(label: impl Into<String>, value: i64) -> Self {
        Self::new(label, TdfValue::Int(value))
    }

    pub fn string(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, TdfValue::String(value.into()))
    }

    pub fn blob(label: impl Into<String>, data: Vec<u8>) -> Self {
        Self::new(label, TdfValue::Blob(data))
    }

    pub fn struct_(label: impl Into<String>, fields: Vec<Tdf>) -> Self {
        Self::new(label, TdfValue::Struct(TdfStruct::new(fields)))
    }

    /// Struct carrying the leading `0x02` start marker.
    pub fn struct2(label: impl Into<String>, fields: Vec<Tdf>) -> Self {
        Self::new(
            label,
            TdfValue::Struct(TdfStruct {
                start_marker: true,
                fields,
            }),
        )
    }

    pub fn list(label: impl Into<String>, kind: ListKind, items: Vec<ListItem>) -> Self {
        Self::new(label, TdfValue::List { kind, items })
    }

    pub fn pair_list(
        label: impl Into<String>,
        kind_a: ListKind,
        kind_b: ListKind,
        pairs: Vec<(ListItem, ListItem)>,
    ) -> Self {
        Self::new(
            label,
            TdfValue::PairList {
                kind_a,
                kind_b,
                pairs,
            },
        )
    }

    pub fn union(label: impl Into<String>, kind: TdfType, value: Tdf) -> Self {
        Self::new(
            label,
            TdfValue::Union {
                kind,
                value: Some(Box::new(value)),
            },
        )
    }

    pub fn union_empty(label: impl Into<String>) -> Self {
        Self::new(
            label,
            TdfValue::Union {
                kind: TdfType::Empty,
                value: None,
            },
        )
    }

    pub fn var_int_list(label: impl Into<String>, values: Vec<i64>) -> Self {
        Self::new(label, TdfValue::VarIntList(values))
    }

    pub fn pair(label: impl Into<String>, a: i64, b: i64) -> Self {
        Self::new(label, TdfValue::Pair(Pair { a, b }))
    }

    pub fn triple(label: impl Into<String>, a: i64, b: i64, c: i64) -> Self {
        Self::new(label, TdfValue::Triple(Triple { a, b, c }))
    }

    pub fn float(label: impl Into<String>, value: f64) -> Self {
        Self::new(label, TdfValue::Float(value))
    }

    /// Serialize header word and payload into `buf`.
    pub fn write(&self, buf: &mut PacketBuffer) {
        let head = (self.tag() << 8) | u32::from(self.value.tdf_type().byte());
        buf.write_u32(head);
        self.value.write_payload(buf);
    }

    /// Serialize this value alone into a fresh byte vector.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = PacketBuffer::new();
        self.write(&mut buf);
        buf.into_vec()
    }

    /// Decode one value at the cursor. On [`ProtocolError::UnknownTdfType`]
    /// the cursor position is unreliable and the caller must abandon the
    /// remainder of the enclosing content.
    pub fn read(buf: &mut PacketBuffer) -> Result<Self> {
        Self::read_at_depth(buf, 0)
    }

    fn read_at_depth(buf: &mut PacketBuffer, depth: usize) -> Result<Self> {
        if depth > MAX_DECODE_DEPTH {
            return Err(ProtocolError::NestingTooDeep(MAX_DECODE_DEPTH));
        }
        let head = buf.read_u32()?;
        let type_byte = (head & 0xFF) as u8;
        let tdf_type =
            TdfType::from_byte(type_byte).ok_or(ProtocolError::UnknownTdfType(type_byte))?;
        let label = tag_to_label(head >> 8);
        let value = TdfValue::read_payload(tdf_type, buf, depth)?;
        Ok(Self { label, value })
    }
}

fn read_count(buf: &mut PacketBuffer) -> Result<usize> {
    usize::try_from(buf.read_var_int()).map_err(|_| ProtocolError::VarIntOverflow)
}

/// Serialize an ordered field sequence into content bytes.
pub fn encode_all(values: &[Tdf]) -> Vec<u8> {
    let mut buf = PacketBuffer::new();
    for value in values {
        value.write(&mut buf);
    }
    buf.into_vec()
}

/// Walk content bytes into the ordered value sequence they carry.
pub fn decode_all(content: &[u8]) -> Result<Vec<Tdf>> {
    let mut buf = PacketBuffer::from(content);
    let mut out = Vec::new();
    while buf.remaining() > 0 {
        out.push(Tdf::read(&mut buf)?);
    }
    Ok(out)
}
