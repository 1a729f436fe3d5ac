//! Integration tests: dispatch, round trips for every variant, boundary
//! handling, and the vendor (Nicira) sub-dispatch.

use ofactions::action::{decode_sequence, encode_sequence};
use ofactions::nx::{NxAction, ENCAP_PKT_TYPE_NSH, NX_VENDOR_ID};
use ofactions::oxm::{
    MatchField, OxmId, NXM_NX_MPLS_TTL, NXM_OF_IN_PORT, OXM_CLASS_NXM_0, OXM_CLASS_NXM_1,
};
use ofactions::{Action, CodecError, OFPCML_NO_BUFFER};

/// Output{Port: 5, MaxLen: no-buffer}: 16 bytes, 6 of them padding.
const OUTPUT_PORT5: [u8; 16] = [
    0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x05, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00,
];

/// SetQueue{QueueId: 3}: fixed 8 bytes.
const SET_QUEUE_3: [u8; 8] = [0x00, 0x15, 0x00, 0x08, 0x00, 0x00, 0x00, 0x03];

fn sample_actions() -> Vec<Action> {
    vec![
        Action::output(5),
        Action::CopyTtlOut,
        Action::CopyTtlIn,
        Action::SetMplsTtl { ttl: 33 },
        Action::DecMplsTtl,
        Action::push_vlan(0x8100),
        Action::pop_vlan(),
        Action::push_mpls(0x8847),
        Action::pop_mpls(0x0800),
        Action::set_queue(3),
        Action::group(7),
        Action::SetNwTtl { ttl: 64 },
        Action::dec_nw_ttl(),
        Action::set_field(MatchField::in_port(2)),
        Action::set_field(MatchField::mpls_ttl(12)),
        Action::PushPbb,
        Action::PopPbb,
        Action::copy_field(
            16,
            0,
            0,
            OxmId::new(OXM_CLASS_NXM_0, NXM_OF_IN_PORT, false, 2),
            OxmId::new(OXM_CLASS_NXM_1, NXM_NX_MPLS_TTL, false, 1),
        ),
        Action::meter(9),
        Action::nicira(NxAction::stack_push(
            OxmId::new(OXM_CLASS_NXM_0, NXM_OF_IN_PORT, false, 2),
            16,
        )),
    ]
}

#[test]
fn every_variant_round_trips() {
    for action in sample_actions() {
        let encoded = action.encode();
        assert_eq!(encoded.len(), action.encoded_len() as usize, "{action:?}");
        let decoded = Action::decode(&encoded).expect("decode");
        assert_eq!(decoded, action);
        assert_eq!(decoded.encode(), encoded, "re-encode must be bit-identical");
    }
}

#[test]
fn dispatch_selects_matching_variant() {
    for action in sample_actions() {
        let encoded = action.encode();
        let first_code = u16::from_be_bytes([encoded[0], encoded[1]]);
        assert_eq!(first_code, action.type_code());
        assert_eq!(
            std::mem::discriminant(&Action::decode(&encoded).expect("decode")),
            std::mem::discriminant(&action)
        );
    }
}

#[test]
fn output_concrete_bytes() {
    let action = Action::Output {
        port: 5,
        max_len: OFPCML_NO_BUFFER,
    };
    assert_eq!(action.encode(), OUTPUT_PORT5);
    assert_eq!(Action::decode(&OUTPUT_PORT5).expect("decode"), action);
}

#[test]
fn set_queue_concrete_bytes() {
    assert_eq!(Action::SetQueue { queue_id: 3 }.encode(), SET_QUEUE_3);
    assert_eq!(
        Action::decode(&SET_QUEUE_3).expect("decode"),
        Action::SetQueue { queue_id: 3 }
    );
}

#[test]
fn aligned_variants_encode_to_multiples_of_8() {
    for action in sample_actions() {
        let len = action.encoded_len();
        if len > 4 {
            assert_eq!(len % 8, 0, "{action:?} has unaligned length {len}");
        }
    }
}

#[test]
fn unknown_standard_type_fails() {
    let buf = [0x00, 0xfe, 0x00, 0x08, 0, 0, 0, 0];
    assert_eq!(
        Action::decode(&buf),
        Err(CodecError::UnknownActionType(0x00fe))
    );
}

#[test]
fn truncation_never_panics() {
    for action in sample_actions() {
        let encoded = action.encode();
        for cut in 0..encoded.len() {
            // Shorter-than-declared buffers must fail cleanly or, for
            // bare-header prefixes, decode a shorter valid action.
            let _ = Action::decode(&encoded[..cut]);
        }
        assert!(matches!(
            Action::decode(&encoded[..3.min(encoded.len())]),
            Err(CodecError::TruncatedInput { .. })
        ));
    }
}

#[test]
fn nicira_stack_push_via_dispatcher() {
    let buf = [
        0xff, 0xff, 0x00, 0x18, // experimenter, length 24
        0x00, 0x00, 0x23, 0x20, // NX vendor id
        0x00, 0x1b, // NXAST_STACK_PUSH
        0x00, 0x06, // ofs_nbits
        0x00, 0x00, 0x00, 0x02, // OxmId: NXM_0 / in_port / len 2
        0x00, 0x10, // n_bits
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];
    let action = Action::decode(&buf).expect("decode");
    match action {
        Action::Experimenter(ref vendor) => assert_eq!(vendor.vendor_id(), NX_VENDOR_ID),
        ref other => panic!("expected experimenter action, got {other:?}"),
    }
    let expected = Action::nicira(NxAction::StackPush {
        ofs_nbits: 6,
        field: OxmId::new(OXM_CLASS_NXM_0, NXM_OF_IN_PORT, false, 2),
        n_bits: 16,
    });
    assert_eq!(action, expected);
    assert_eq!(action.encode(), buf);
}

#[test]
fn nicira_encap_encodes_but_does_not_decode() {
    let action = Action::nicira(NxAction::encap(ENCAP_PKT_TYPE_NSH));
    let encoded = action.encode();
    assert_eq!(encoded.len(), 16);
    assert_eq!(
        Action::decode(&encoded),
        Err(CodecError::NotImplemented("NxAction::Encap"))
    );
}

#[test]
fn unknown_vendor_reported_distinctly() {
    let buf = [
        0xff, 0xff, 0x00, 0x10, 0x12, 0x34, 0x56, 0x78, 0x00, 0x1b, 0, 0, 0, 0, 0, 0,
    ];
    match Action::decode(&buf) {
        Err(CodecError::UnknownVendorAction { vendor, subtype }) => {
            assert_eq!(vendor, 0x12345678);
            assert_eq!(subtype, 0x001b);
        }
        other => panic!("expected UnknownVendorAction, got {other:?}"),
    }
}

#[test]
fn sequence_round_trip_mixed() {
    let actions = sample_actions();
    let wire = encode_sequence(&actions);
    let decoded = decode_sequence(&wire).expect("decode sequence");
    assert_eq!(decoded, actions);
    assert_eq!(encode_sequence(&decoded), wire);
}

#[test]
fn sequence_fails_whole_list_on_one_bad_action() {
    let mut wire = encode_sequence(&[Action::output(1), Action::DecNwTtl]);
    // Corrupt the second action's type code.
    let second = Action::output(1).encoded_len() as usize;
    wire[second] = 0x00;
    wire[second + 1] = 0xfe;
    assert_eq!(
        decode_sequence(&wire),
        Err(CodecError::UnknownActionType(0x00fe))
    );
}

#[test]
fn sequence_rejects_undersized_declared_length() {
    // Length field of 2 can never cover its own header.
    let wire = [0x00, 0x18, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00];
    assert!(matches!(
        decode_sequence(&wire),
        Err(CodecError::TruncatedInput { .. })
    ));
}

#[test]
fn copy_field_with_experimenter_ids_rounds_up() {
    let src = OxmId {
        class: 0xffff,
        field: 1,
        has_mask: false,
        length: 4,
        experimenter: Some(0x0000_4f4e),
    };
    let dst = OxmId::new(OXM_CLASS_NXM_0, NXM_OF_IN_PORT, false, 2);
    let action = Action::copy_field(16, 0, 0, src, dst);
    // header(4) + fixed(8) + 8 + 4 = 24, already aligned
    assert_eq!(action.encoded_len(), 24);
    let encoded = action.encode();
    assert_eq!(Action::decode(&encoded).expect("decode"), action);
    assert_eq!(Action::decode(&encoded).expect("decode").encode(), encoded);
}
