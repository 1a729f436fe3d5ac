//! Nicira (NX) experimenter actions.
//!
//! Experimenter actions share a 10-byte prefix: the standard action header
//! with type `0xffff`, a 4-byte vendor id, and a 2-byte subtype. The vendor
//! id selects the vendor namespace; within the Nicira namespace the subtype
//! selects the action shape. Encap/Decap deliberately support encode only:
//! decoding them fails with [`CodecError::NotImplemented`] rather than
//! producing a half-parsed value.

use byteorder::{BigEndian, ByteOrder};

use crate::action::ACTION_TYPE_EXPERIMENTER;
use crate::error::{check_len, CodecError};
use crate::header::ActionHeader;
use crate::oxm::OxmId;

/// The Nicira experimenter (vendor) id.
pub const NX_VENDOR_ID: u32 = 0x0000_2320;

/// Prefix length: action header (4) + vendor (4) + subtype (2).
pub const NX_HEADER_LEN: usize = 10;

// NXAST subtype codes.
pub const NXAST_STACK_PUSH: u16 = 27;
pub const NXAST_STACK_POP: u16 = 28;
pub const NXAST_RAW_ENCAP: u16 = 46;
pub const NXAST_RAW_DECAP: u16 = 47;

// Packet types for Encap/Decap, (namespace << 16) | ethertype.
pub const ENCAP_PKT_TYPE_ETHERNET: u32 = 0;
pub const ENCAP_PKT_TYPE_MPLS: u32 = 1 << 16 | 0x8847;
pub const ENCAP_PKT_TYPE_MPLS_MC: u32 = 1 << 16 | 0x8848;
pub const ENCAP_PKT_TYPE_NSH: u32 = 1 << 16 | 0x894f;

const NX_ENCAP_LEN: u16 = 16;
const NX_STACK_LEN: u16 = 24;

/// A vendor action, keyed first by vendor id. Only the Nicira namespace is
/// recognized; any other vendor fails the outer dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VendorAction {
    Nicira(NxAction),
}

impl VendorAction {
    pub fn vendor_id(&self) -> u32 {
        match *self {
            VendorAction::Nicira(_) => NX_VENDOR_ID,
        }
    }

    pub fn encoded_len(&self) -> u16 {
        match *self {
            VendorAction::Nicira(ref a) => a.encoded_len(),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        match *self {
            VendorAction::Nicira(ref a) => a.encode(),
        }
    }
}

/// A Nicira action shape, keyed by subtype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NxAction {
    /// Push an encapsulation header (`NXAST_RAW_ENCAP`). Encode-only.
    Encap { header_size: u16, packet_type: u32 },
    /// Strip the outermost encapsulation header (`NXAST_RAW_DECAP`).
    /// Encode-only.
    Decap { header_size: u16, packet_type: u32 },
    /// Push a field onto the OVS value stack (`NXAST_STACK_PUSH`).
    StackPush {
        /// Bit offset into the field.
        ofs_nbits: u16,
        field: OxmId,
        /// Number of bits to extract from the field.
        n_bits: u16,
    },
    /// Pop the top of the OVS value stack into a field (`NXAST_STACK_POP`).
    StackPop {
        ofs_nbits: u16,
        field: OxmId,
        n_bits: u16,
    },
}

impl NxAction {
    pub fn encap(packet_type: u32) -> NxAction {
        NxAction::Encap {
            header_size: 0,
            packet_type,
        }
    }

    pub fn decap(packet_type: u32) -> NxAction {
        NxAction::Decap {
            header_size: 0,
            packet_type,
        }
    }

    pub fn stack_push(field: OxmId, n_bits: u16) -> NxAction {
        NxAction::StackPush {
            ofs_nbits: 0,
            field,
            n_bits,
        }
    }

    pub fn stack_pop(field: OxmId, n_bits: u16) -> NxAction {
        NxAction::StackPop {
            ofs_nbits: 0,
            field,
            n_bits,
        }
    }

    pub fn subtype(&self) -> u16 {
        match *self {
            NxAction::Encap { .. } => NXAST_RAW_ENCAP,
            NxAction::Decap { .. } => NXAST_RAW_DECAP,
            NxAction::StackPush { .. } => NXAST_STACK_PUSH,
            NxAction::StackPop { .. } => NXAST_STACK_POP,
        }
    }

    pub fn encoded_len(&self) -> u16 {
        match *self {
            NxAction::Encap { .. } | NxAction::Decap { .. } => NX_ENCAP_LEN,
            NxAction::StackPush { .. } | NxAction::StackPop { .. } => NX_STACK_LEN,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let len = self.encoded_len();
        let mut out = vec![0u8; len as usize];
        ActionHeader::new(ACTION_TYPE_EXPERIMENTER, len).encode_into(&mut out);
        BigEndian::write_u32(&mut out[4..8], NX_VENDOR_ID);
        BigEndian::write_u16(&mut out[8..10], self.subtype());
        match *self {
            NxAction::Encap {
                header_size,
                packet_type,
            }
            | NxAction::Decap {
                header_size,
                packet_type,
            } => {
                BigEndian::write_u16(&mut out[10..12], header_size);
                BigEndian::write_u32(&mut out[12..16], packet_type);
            }
            NxAction::StackPush {
                ofs_nbits,
                ref field,
                n_bits,
            }
            | NxAction::StackPop {
                ofs_nbits,
                ref field,
                n_bits,
            } => {
                BigEndian::write_u16(&mut out[10..12], ofs_nbits);
                field.encode_header_into(&mut out[12..16]);
                BigEndian::write_u16(&mut out[16..18], n_bits);
                // out[18..24] stays zero
            }
        }
        out
    }

    /// Decode a Nicira action. `data` starts at the action header; the
    /// caller has already matched the vendor id.
    pub(crate) fn decode(data: &[u8]) -> Result<NxAction, CodecError> {
        check_len(data, NX_HEADER_LEN)?;
        let header = ActionHeader::decode(data)?;
        let vendor = BigEndian::read_u32(&data[4..8]);
        let subtype = BigEndian::read_u16(&data[8..10]);
        match subtype {
            NXAST_STACK_PUSH | NXAST_STACK_POP => {
                check_len(data, header.length as usize)?;
                check_len(data, NX_HEADER_LEN + 8)?;
                let ofs_nbits = BigEndian::read_u16(&data[10..12]);
                let field = OxmId::decode_header(&data[12..16])?;
                let n_bits = BigEndian::read_u16(&data[16..18]);
                if subtype == NXAST_STACK_PUSH {
                    Ok(NxAction::StackPush {
                        ofs_nbits,
                        field,
                        n_bits,
                    })
                } else {
                    Ok(NxAction::StackPop {
                        ofs_nbits,
                        field,
                        n_bits,
                    })
                }
            }
            NXAST_RAW_ENCAP => Err(CodecError::NotImplemented("NxAction::Encap")),
            NXAST_RAW_DECAP => Err(CodecError::NotImplemented("NxAction::Decap")),
            _ => Err(CodecError::UnknownVendorAction { vendor, subtype }),
        }
    }
}
