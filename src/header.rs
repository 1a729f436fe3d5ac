//! Common 4-byte `{type, length}` prefix shared by every action.
//!
//! `length` is the total encoded size of the enclosing action in bytes,
//! header included, and a multiple of 8 for every variant that carries a
//! body. Every variant codec reuses this module; none re-implements it.

use byteorder::{BigEndian, ByteOrder};

use crate::error::{check_len, CodecError};

/// Encoded size of the header itself.
pub const HEADER_LEN: u16 = 4;

/// The `{Type, Length}` prefix of an OpenFlow action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionHeader {
    pub action_type: u16,
    pub length: u16,
}

impl ActionHeader {
    pub fn new(action_type: u16, length: u16) -> ActionHeader {
        ActionHeader {
            action_type,
            length,
        }
    }

    /// Write the header into the first 4 bytes of `out`.
    pub fn encode_into(&self, out: &mut [u8]) {
        BigEndian::write_u16(&mut out[0..2], self.action_type);
        BigEndian::write_u16(&mut out[2..4], self.length);
    }

    /// Read a header from the start of `data`.
    pub fn decode(data: &[u8]) -> Result<ActionHeader, CodecError> {
        check_len(data, HEADER_LEN as usize)?;
        Ok(ActionHeader {
            action_type: BigEndian::read_u16(&data[0..2]),
            length: BigEndian::read_u16(&data[2..4]),
        })
    }
}

/// Round `n` up to the next multiple of 8, the alignment unit for action
/// bodies with variable-length content.
pub(crate) fn round_up8(n: u16) -> u16 {
    (n + 7) / 8 * 8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trip() {
        let h = ActionHeader::new(25, 16);
        let mut buf = [0u8; 4];
        h.encode_into(&mut buf);
        assert_eq!(buf, [0x00, 0x19, 0x00, 0x10]);
        assert_eq!(ActionHeader::decode(&buf).unwrap(), h);
    }

    #[test]
    fn header_truncated() {
        assert_eq!(
            ActionHeader::decode(&[0x00, 0x19, 0x00]),
            Err(CodecError::TruncatedInput {
                needed: 4,
                available: 3
            })
        );
    }

    #[test]
    fn round_up8_boundaries() {
        assert_eq!(round_up8(8), 8);
        assert_eq!(round_up8(9), 16);
        assert_eq!(round_up8(12), 16);
        assert_eq!(round_up8(16), 16);
    }
}
