//! Decode error kinds. Errors are returned as values; the codec never panics
//! on malformed input and never reads past the supplied buffer.

/// Failure while decoding (or, for [`CodecError::NotImplemented`], encoding
/// direction mismatch of) an action or OXM structure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Buffer shorter than the structure's declared or required length.
    #[error("truncated input: need {needed} bytes, have {available}")]
    TruncatedInput { needed: usize, available: usize },
    /// Leading type code outside the standard set and not the experimenter
    /// sentinel.
    #[error("unknown action type {0:#06x}")]
    UnknownActionType(u16),
    /// Experimenter action with an unrecognized vendor id or subtype.
    #[error("unknown vendor action: vendor {vendor:#010x}, subtype {subtype}")]
    UnknownVendorAction { vendor: u32, subtype: u16 },
    /// OXM (class, field) combination with no concrete value decoder.
    #[error("unknown OXM field: class {class:#06x}, field {field}")]
    UnknownFieldType { class: u16, field: u8 },
    /// Decode direction deliberately unsupported for this structure.
    #[error("decode not implemented for {0}")]
    NotImplemented(&'static str),
}

/// Fail with [`CodecError::TruncatedInput`] unless `data` holds at least
/// `needed` bytes. Every variant decoder calls this before indexing.
pub(crate) fn check_len(data: &[u8], needed: usize) -> Result<(), CodecError> {
    if data.len() < needed {
        return Err(CodecError::TruncatedInput {
            needed,
            available: data.len(),
        });
    }
    Ok(())
}
