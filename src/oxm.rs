//! OXM match-field TLVs and header-only OXM ids.
//!
//! An OXM TLV packs `class`(16) + `field`(7) + `has_mask`(1) + `length`(8)
//! into a 4-byte header, followed by `length` value bytes and, when the mask
//! bit is set, `length` mask bytes. `length` always counts the value alone.
//!
//! Value decoding is typed: the `(class, field)` pair selects a concrete
//! value shape, and a pair without a registered shape is rejected with
//! [`CodecError::UnknownFieldType`].

use byteorder::{BigEndian, ByteOrder};

use crate::error::{check_len, CodecError};

// OXM classes.
pub const OXM_CLASS_NXM_0: u16 = 0x0000;
pub const OXM_CLASS_NXM_1: u16 = 0x0001;
pub const OXM_CLASS_OPENFLOW_BASIC: u16 = 0x8000;
pub const OXM_CLASS_EXPERIMENTER: u16 = 0xffff;

// Fields with concrete value decoders.
pub const NXM_OF_IN_PORT: u8 = 0;
pub const NXM_NX_MPLS_TTL: u8 = 30;

/// Encoded size of the class/field/length header.
pub const OXM_HEADER_LEN: usize = 4;

/// A typed OXM field value. Each variant fixes its own wire size, which the
/// TLV `length` byte must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    /// Legacy NXM in-port number, class `NXM_0` field `NXM_OF_IN_PORT`.
    InPort(u16),
    /// MPLS TTL, class `NXM_1` field `NXM_NX_MPLS_TTL`.
    MplsTtl(u8),
}

impl FieldValue {
    /// Byte length of the encoded value.
    pub fn wire_len(&self) -> u8 {
        match *self {
            FieldValue::InPort(_) => 2,
            FieldValue::MplsTtl(_) => 1,
        }
    }

    fn encode_into(&self, out: &mut [u8]) {
        match *self {
            FieldValue::InPort(port) => BigEndian::write_u16(&mut out[0..2], port),
            FieldValue::MplsTtl(ttl) => out[0] = ttl,
        }
    }

    /// Decode the value shape registered for `(class, field)` from the start
    /// of `data`.
    fn decode(class: u16, field: u8, data: &[u8]) -> Result<FieldValue, CodecError> {
        match (class, field) {
            (OXM_CLASS_NXM_0, NXM_OF_IN_PORT) => {
                check_len(data, 2)?;
                Ok(FieldValue::InPort(BigEndian::read_u16(&data[0..2])))
            }
            (OXM_CLASS_NXM_1, NXM_NX_MPLS_TTL) => {
                check_len(data, 1)?;
                Ok(FieldValue::MplsTtl(data[0]))
            }
            _ => Err(CodecError::UnknownFieldType { class, field }),
        }
    }
}

/// A complete OXM match-field TLV: identity plus a typed value and an
/// optional mask of equal size.
///
/// The wire `has_mask` bit and `length` byte are derived from `mask` and
/// `value` rather than stored, so a constructed field cannot disagree with
/// its own layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchField {
    pub class: u16,
    pub field: u8,
    pub value: FieldValue,
    pub mask: Option<FieldValue>,
}

impl MatchField {
    /// In-port match field (legacy NXM encoding, 2-byte value).
    pub fn in_port(port: u16) -> MatchField {
        MatchField {
            class: OXM_CLASS_NXM_0,
            field: NXM_OF_IN_PORT,
            value: FieldValue::InPort(port),
            mask: None,
        }
    }

    /// MPLS TTL match field (1-byte value).
    pub fn mpls_ttl(ttl: u8) -> MatchField {
        MatchField {
            class: OXM_CLASS_NXM_1,
            field: NXM_NX_MPLS_TTL,
            value: FieldValue::MplsTtl(ttl),
            mask: None,
        }
    }

    pub fn has_mask(&self) -> bool {
        self.mask.is_some()
    }

    /// Total encoded size: header + value [+ mask].
    pub fn wire_len(&self) -> u16 {
        let value_len = self.value.wire_len() as u16;
        let payload = if self.has_mask() {
            value_len * 2
        } else {
            value_len
        };
        OXM_HEADER_LEN as u16 + payload
    }

    /// Header-only identity of this field, as used by copy-field and the
    /// vendor stack actions.
    pub fn oxm_id(&self) -> OxmId {
        OxmId {
            class: self.class,
            field: self.field,
            has_mask: self.has_mask(),
            length: self.value.wire_len(),
            experimenter: None,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.wire_len() as usize];
        self.encode_into(&mut out);
        out
    }

    pub(crate) fn encode_into(&self, out: &mut [u8]) {
        let value_len = self.value.wire_len();
        BigEndian::write_u16(&mut out[0..2], self.class);
        out[2] = self.field << 1 | self.has_mask() as u8;
        out[3] = value_len;
        let mut n = OXM_HEADER_LEN;
        self.value.encode_into(&mut out[n..]);
        n += value_len as usize;
        if let Some(ref mask) = self.mask {
            mask.encode_into(&mut out[n..]);
        }
    }

    /// Decode one TLV from the start of `data`. The header-declared `length`
    /// must match the registered value shape exactly.
    pub fn decode(data: &[u8]) -> Result<MatchField, CodecError> {
        check_len(data, OXM_HEADER_LEN)?;
        let class = BigEndian::read_u16(&data[0..2]);
        let field = data[2] >> 1;
        let has_mask = data[2] & 1 == 1;
        let length = data[3] as usize;
        let payload = if has_mask { length * 2 } else { length };
        check_len(data, OXM_HEADER_LEN + payload)?;

        let value_end = OXM_HEADER_LEN + length;
        let value = FieldValue::decode(class, field, &data[OXM_HEADER_LEN..value_end])?;
        if value.wire_len() as usize != length {
            // Declared length disagrees with the concrete shape for this
            // (class, field); re-encoding could not reproduce the input.
            return Err(CodecError::UnknownFieldType { class, field });
        }
        let mask = if has_mask {
            Some(FieldValue::decode(
                class,
                field,
                &data[value_end..value_end + length],
            )?)
        } else {
            None
        };
        Ok(MatchField {
            class,
            field,
            value,
            mask,
        })
    }
}

/// Field identity without a value: the 4-byte OXM header alone, or 8 bytes
/// when the class is [`OXM_CLASS_EXPERIMENTER`] and a 4-byte experimenter
/// number follows. Travels on the wire where only *which* field matters
/// (copy-field source/destination, vendor stack push/pop).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OxmId {
    pub class: u16,
    pub field: u8,
    pub has_mask: bool,
    /// Value length the identified field would carry.
    pub length: u8,
    /// Present exactly when `class == OXM_CLASS_EXPERIMENTER`.
    pub experimenter: Option<u32>,
}

impl OxmId {
    pub fn new(class: u16, field: u8, has_mask: bool, length: u8) -> OxmId {
        OxmId {
            class,
            field,
            has_mask,
            length,
            experimenter: None,
        }
    }

    /// Encoded size: 4, or 8 with an experimenter number.
    pub fn wire_len(&self) -> u16 {
        if self.experimenter.is_some() {
            8
        } else {
            4
        }
    }

    /// Write the 4-byte class/field/length header only.
    pub(crate) fn encode_header_into(&self, out: &mut [u8]) {
        BigEndian::write_u16(&mut out[0..2], self.class);
        out[2] = self.field << 1 | self.has_mask as u8;
        out[3] = self.length;
    }

    pub(crate) fn encode_into(&self, out: &mut [u8]) {
        self.encode_header_into(out);
        if let Some(exp) = self.experimenter {
            BigEndian::write_u32(&mut out[4..8], exp);
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.wire_len() as usize];
        self.encode_into(&mut out);
        out
    }

    /// Decode the fixed 4-byte header form, ignoring any experimenter
    /// extension. Used by the vendor stack actions, whose layout reserves
    /// exactly 4 bytes for the field id.
    pub(crate) fn decode_header(data: &[u8]) -> Result<OxmId, CodecError> {
        check_len(data, OXM_HEADER_LEN)?;
        Ok(OxmId {
            class: BigEndian::read_u16(&data[0..2]),
            field: data[2] >> 1,
            has_mask: data[2] & 1 == 1,
            length: data[3],
            experimenter: None,
        })
    }

    /// Decode an id from the start of `data`, consuming 8 bytes for the
    /// experimenter class and 4 otherwise.
    pub fn decode(data: &[u8]) -> Result<OxmId, CodecError> {
        let mut id = OxmId::decode_header(data)?;
        if id.class == OXM_CLASS_EXPERIMENTER {
            check_len(data, 8)?;
            id.experimenter = Some(BigEndian::read_u32(&data[4..8]));
        }
        Ok(id)
    }
}
