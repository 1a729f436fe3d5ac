//! OpenFlow 1.5 actions: one enum variant per standard `ofp_action_type`
//! plus the experimenter branch, with byte-exact encode/decode.
//!
//! Decoding dispatches on the leading 16-bit type code; each variant then
//! re-reads the full header and parses its body positionally, validating
//! available length before any indexing. Encoding writes the header first,
//! then the body in wire order, zero-filling padding up to the declared
//! length. A decoded action re-encodes to the identical bytes.

use byteorder::{BigEndian, ByteOrder};

use crate::error::{check_len, CodecError};
use crate::header::{round_up8, ActionHeader, HEADER_LEN};
use crate::nx::{self, NxAction, VendorAction};
use crate::oxm::{MatchField, OxmId};

// ofp_action_type
pub const ACTION_TYPE_OUTPUT: u16 = 0;
pub const ACTION_TYPE_COPY_TTL_OUT: u16 = 11;
pub const ACTION_TYPE_COPY_TTL_IN: u16 = 12;
pub const ACTION_TYPE_SET_MPLS_TTL: u16 = 15;
pub const ACTION_TYPE_DEC_MPLS_TTL: u16 = 16;
pub const ACTION_TYPE_PUSH_VLAN: u16 = 17;
pub const ACTION_TYPE_POP_VLAN: u16 = 18;
pub const ACTION_TYPE_PUSH_MPLS: u16 = 19;
pub const ACTION_TYPE_POP_MPLS: u16 = 20;
pub const ACTION_TYPE_SET_QUEUE: u16 = 21;
pub const ACTION_TYPE_GROUP: u16 = 22;
pub const ACTION_TYPE_SET_NW_TTL: u16 = 23;
pub const ACTION_TYPE_DEC_NW_TTL: u16 = 24;
pub const ACTION_TYPE_SET_FIELD: u16 = 25;
pub const ACTION_TYPE_PUSH_PBB: u16 = 26;
pub const ACTION_TYPE_POP_PBB: u16 = 27;
pub const ACTION_TYPE_COPY_FIELD: u16 = 28;
pub const ACTION_TYPE_METER: u16 = 29;
pub const ACTION_TYPE_EXPERIMENTER: u16 = 0xffff;

// ofp_controller_max_len
/// Largest `max_len` that requests a specific byte count.
pub const OFPCML_MAX: u16 = 0xffe5;
/// No buffering: send the whole packet to the controller.
pub const OFPCML_NO_BUFFER: u16 = 0xffff;

/// An OpenFlow action. Variants that the wire format represents as a bare
/// header carry no fields here; their padding, if any, is implicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Send the packet out `port`, buffering at most `max_len` bytes when
    /// the port is the controller.
    Output { port: u32, max_len: u16 },
    CopyTtlOut,
    CopyTtlIn,
    SetMplsTtl { ttl: u8 },
    DecMplsTtl,
    PushVlan { ether_type: u16 },
    PopVlan,
    PushMpls { ether_type: u16 },
    PopMpls { ether_type: u16 },
    SetQueue { queue_id: u32 },
    Group { group_id: u32 },
    SetNwTtl { ttl: u8 },
    DecNwTtl,
    SetField(MatchField),
    PushPbb,
    PopPbb,
    CopyField {
        n_bits: u16,
        src_offset: u16,
        dst_offset: u16,
        src: OxmId,
        dst: OxmId,
    },
    Meter { meter_id: u32 },
    /// Vendor extension, dispatched again on vendor id and subtype.
    Experimenter(VendorAction),
}

impl Action {
    /// Output action with the protocol default `max_len`: no buffering,
    /// deliver the whole packet.
    pub fn output(port: u32) -> Action {
        Action::Output {
            port,
            max_len: OFPCML_NO_BUFFER,
        }
    }

    pub fn push_vlan(ether_type: u16) -> Action {
        Action::PushVlan { ether_type }
    }

    pub fn pop_vlan() -> Action {
        Action::PopVlan
    }

    pub fn pop_mpls(ether_type: u16) -> Action {
        Action::PopMpls { ether_type }
    }

    pub fn set_queue(queue_id: u32) -> Action {
        Action::SetQueue { queue_id }
    }

    pub fn group(group_id: u32) -> Action {
        Action::Group { group_id }
    }

    pub fn dec_nw_ttl() -> Action {
        Action::DecNwTtl
    }

    pub fn meter(meter_id: u32) -> Action {
        Action::Meter { meter_id }
    }

    pub fn push_mpls(ether_type: u16) -> Action {
        Action::PushMpls { ether_type }
    }

    pub fn set_field(field: MatchField) -> Action {
        Action::SetField(field)
    }

    pub fn copy_field(n_bits: u16, src_offset: u16, dst_offset: u16, src: OxmId, dst: OxmId) -> Action {
        Action::CopyField {
            n_bits,
            src_offset,
            dst_offset,
            src,
            dst,
        }
    }

    pub fn nicira(action: NxAction) -> Action {
        Action::Experimenter(VendorAction::Nicira(action))
    }

    /// The wire type code this variant dispatches on.
    pub fn type_code(&self) -> u16 {
        match *self {
            Action::Output { .. } => ACTION_TYPE_OUTPUT,
            Action::CopyTtlOut => ACTION_TYPE_COPY_TTL_OUT,
            Action::CopyTtlIn => ACTION_TYPE_COPY_TTL_IN,
            Action::SetMplsTtl { .. } => ACTION_TYPE_SET_MPLS_TTL,
            Action::DecMplsTtl => ACTION_TYPE_DEC_MPLS_TTL,
            Action::PushVlan { .. } => ACTION_TYPE_PUSH_VLAN,
            Action::PopVlan => ACTION_TYPE_POP_VLAN,
            Action::PushMpls { .. } => ACTION_TYPE_PUSH_MPLS,
            Action::PopMpls { .. } => ACTION_TYPE_POP_MPLS,
            Action::SetQueue { .. } => ACTION_TYPE_SET_QUEUE,
            Action::Group { .. } => ACTION_TYPE_GROUP,
            Action::SetNwTtl { .. } => ACTION_TYPE_SET_NW_TTL,
            Action::DecNwTtl => ACTION_TYPE_DEC_NW_TTL,
            Action::SetField(_) => ACTION_TYPE_SET_FIELD,
            Action::PushPbb => ACTION_TYPE_PUSH_PBB,
            Action::PopPbb => ACTION_TYPE_POP_PBB,
            Action::CopyField { .. } => ACTION_TYPE_COPY_FIELD,
            Action::Meter { .. } => ACTION_TYPE_METER,
            Action::Experimenter(_) => ACTION_TYPE_EXPERIMENTER,
        }
    }

    /// Total encoded size in bytes, the value written into the header's
    /// `length` field.
    ///
    /// Bare-header variants (CopyTtlOut, CopyTtlIn, DecMplsTtl, PushPbb,
    /// PopPbb) always encode as 4 bytes. A peer may frame the same actions
    /// as 8 bytes (header plus 4 pad); those decode fine but re-encode to
    /// the 4-byte form, so byte-identical re-encoding holds only for the
    /// lengths this codec itself produces.
    pub fn encoded_len(&self) -> u16 {
        match *self {
            Action::Output { .. } => 16,
            // Bare-header variants: no body, no padding.
            Action::CopyTtlOut
            | Action::CopyTtlIn
            | Action::DecMplsTtl
            | Action::PushPbb
            | Action::PopPbb => HEADER_LEN,
            Action::SetMplsTtl { .. }
            | Action::PushVlan { .. }
            | Action::PopVlan
            | Action::PushMpls { .. }
            | Action::PopMpls { .. }
            | Action::SetQueue { .. }
            | Action::Group { .. }
            | Action::SetNwTtl { .. }
            | Action::DecNwTtl
            | Action::Meter { .. } => HEADER_LEN + 4,
            Action::SetField(ref field) => round_up8(HEADER_LEN + field.wire_len()),
            Action::CopyField {
                ref src, ref dst, ..
            } => round_up8(HEADER_LEN + 8 + src.wire_len() + dst.wire_len()),
            Action::Experimenter(ref vendor) => vendor.encoded_len(),
        }
    }

    /// Encode to the exact `encoded_len()` bytes, padding zero-filled.
    pub fn encode(&self) -> Vec<u8> {
        if let Action::Experimenter(ref vendor) = *self {
            return vendor.encode();
        }
        let len = self.encoded_len();
        let mut out = vec![0u8; len as usize];
        ActionHeader::new(self.type_code(), len).encode_into(&mut out);
        match *self {
            Action::Output { port, max_len } => {
                BigEndian::write_u32(&mut out[4..8], port);
                BigEndian::write_u16(&mut out[8..10], max_len);
                // 6 bytes of padding
            }
            Action::SetMplsTtl { ttl } | Action::SetNwTtl { ttl } => {
                out[4] = ttl;
            }
            Action::PushVlan { ether_type }
            | Action::PushMpls { ether_type }
            | Action::PopMpls { ether_type } => {
                BigEndian::write_u16(&mut out[4..6], ether_type);
            }
            Action::SetQueue { queue_id } => {
                BigEndian::write_u32(&mut out[4..8], queue_id);
            }
            Action::Group { group_id } => {
                BigEndian::write_u32(&mut out[4..8], group_id);
            }
            Action::Meter { meter_id } => {
                BigEndian::write_u32(&mut out[4..8], meter_id);
            }
            Action::SetField(ref field) => {
                field.encode_into(&mut out[4..]);
                // remainder up to the rounded length stays zero
            }
            Action::CopyField {
                n_bits,
                src_offset,
                dst_offset,
                ref src,
                ref dst,
            } => {
                BigEndian::write_u16(&mut out[4..6], n_bits);
                BigEndian::write_u16(&mut out[6..8], src_offset);
                BigEndian::write_u16(&mut out[8..10], dst_offset);
                // out[10..12] reserved
                let mut n = 12;
                src.encode_into(&mut out[n..]);
                n += src.wire_len() as usize;
                dst.encode_into(&mut out[n..]);
            }
            // Padding-only or bare-header bodies.
            Action::CopyTtlOut
            | Action::CopyTtlIn
            | Action::DecMplsTtl
            | Action::PushPbb
            | Action::PopPbb
            | Action::PopVlan
            | Action::DecNwTtl => {}
            Action::Experimenter(_) => unreachable!(),
        }
        out
    }

    /// Decode one action from the start of `data`.
    ///
    /// The leading type code selects the variant codec; for the experimenter
    /// sentinel the vendor id is inspected before delegating. Failures carry
    /// the offending type, vendor or field so callers can log them.
    pub fn decode(data: &[u8]) -> Result<Action, CodecError> {
        let header = ActionHeader::decode(data)?;
        match header.action_type {
            ACTION_TYPE_OUTPUT => {
                check_len(data, 16)?;
                Ok(Action::Output {
                    port: BigEndian::read_u32(&data[4..8]),
                    max_len: BigEndian::read_u16(&data[8..10]),
                })
            }
            ACTION_TYPE_COPY_TTL_OUT => Ok(Action::CopyTtlOut),
            ACTION_TYPE_COPY_TTL_IN => Ok(Action::CopyTtlIn),
            ACTION_TYPE_SET_MPLS_TTL => {
                check_len(data, 8)?;
                Ok(Action::SetMplsTtl { ttl: data[4] })
            }
            ACTION_TYPE_DEC_MPLS_TTL => Ok(Action::DecMplsTtl),
            ACTION_TYPE_PUSH_VLAN => {
                Ok(Action::PushVlan {
                    ether_type: decode_ether_type(data)?,
                })
            }
            ACTION_TYPE_POP_VLAN => {
                check_len(data, 8)?;
                Ok(Action::PopVlan)
            }
            ACTION_TYPE_PUSH_MPLS => {
                Ok(Action::PushMpls {
                    ether_type: decode_ether_type(data)?,
                })
            }
            ACTION_TYPE_POP_MPLS => {
                Ok(Action::PopMpls {
                    ether_type: decode_ether_type(data)?,
                })
            }
            ACTION_TYPE_SET_QUEUE => {
                check_len(data, 8)?;
                Ok(Action::SetQueue {
                    queue_id: BigEndian::read_u32(&data[4..8]),
                })
            }
            ACTION_TYPE_GROUP => {
                check_len(data, 8)?;
                Ok(Action::Group {
                    group_id: BigEndian::read_u32(&data[4..8]),
                })
            }
            ACTION_TYPE_SET_NW_TTL => {
                check_len(data, 8)?;
                Ok(Action::SetNwTtl { ttl: data[4] })
            }
            ACTION_TYPE_DEC_NW_TTL => {
                check_len(data, 8)?;
                Ok(Action::DecNwTtl)
            }
            ACTION_TYPE_SET_FIELD => {
                // The action's own length, not the embedded TLV's, says
                // where the next sibling starts.
                let len = header.length as usize;
                check_len(data, len)?;
                if len < 8 {
                    return Err(CodecError::TruncatedInput {
                        needed: 8,
                        available: len,
                    });
                }
                let field = MatchField::decode(&data[4..len])?;
                Ok(Action::SetField(field))
            }
            ACTION_TYPE_PUSH_PBB => Ok(Action::PushPbb),
            ACTION_TYPE_POP_PBB => Ok(Action::PopPbb),
            ACTION_TYPE_COPY_FIELD => decode_copy_field(data, header),
            ACTION_TYPE_METER => {
                check_len(data, 8)?;
                Ok(Action::Meter {
                    meter_id: BigEndian::read_u32(&data[4..8]),
                })
            }
            ACTION_TYPE_EXPERIMENTER => {
                check_len(data, nx::NX_HEADER_LEN)?;
                let vendor = BigEndian::read_u32(&data[4..8]);
                if vendor != nx::NX_VENDOR_ID {
                    let subtype = BigEndian::read_u16(&data[8..10]);
                    return Err(CodecError::UnknownVendorAction { vendor, subtype });
                }
                Ok(Action::Experimenter(VendorAction::Nicira(NxAction::decode(
                    data,
                )?)))
            }
            t => Err(CodecError::UnknownActionType(t)),
        }
    }
}

fn decode_ether_type(data: &[u8]) -> Result<u16, CodecError> {
    check_len(data, 8)?;
    Ok(BigEndian::read_u16(&data[4..6]))
}

fn decode_copy_field(data: &[u8], header: ActionHeader) -> Result<Action, CodecError> {
    check_len(data, header.length as usize)?;
    check_len(data, 12)?;
    let n_bits = BigEndian::read_u16(&data[4..6]);
    let src_offset = BigEndian::read_u16(&data[6..8]);
    let dst_offset = BigEndian::read_u16(&data[8..10]);
    // data[10..12] reserved
    let src = OxmId::decode(&data[12..])?;
    let dst = OxmId::decode(&data[12 + src.wire_len() as usize..])?;
    Ok(Action::CopyField {
        n_bits,
        src_offset,
        dst_offset,
        src,
        dst,
    })
}

/// Decode a list of sibling actions, advancing by each action's declared
/// header length. Any failure fails the whole list.
pub fn decode_sequence(data: &[u8]) -> Result<Vec<Action>, CodecError> {
    let mut actions = Vec::new();
    let mut offset = 0usize;
    while offset < data.len() {
        let rest = &data[offset..];
        let header = ActionHeader::decode(rest)?;
        let len = header.length as usize;
        if len < HEADER_LEN as usize || len > rest.len() {
            return Err(CodecError::TruncatedInput {
                needed: len.max(HEADER_LEN as usize),
                available: rest.len(),
            });
        }
        actions.push(Action::decode(&rest[..len])?);
        offset += len;
    }
    Ok(actions)
}

/// Encode a list of actions back to back.
pub fn encode_sequence(actions: &[Action]) -> Vec<u8> {
    let total: usize = actions.iter().map(|a| a.encoded_len() as usize).sum();
    let mut out = Vec::with_capacity(total);
    for action in actions {
        out.extend_from_slice(&action.encode());
    }
    out
}
