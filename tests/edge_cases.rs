#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Comprehensive edge-case tests for production-grade reliability
//! Tests boundary conditions, malformed-input handling, and resource limits

use blaze_protocol::core::packet::{EXT_HEADER_SIZE, HEADER_SIZE, QTYPE_EXT_LENGTH};
use blaze_protocol::core::tdf;
use blaze_protocol::{
    ListItem, ListKind, Packet, PacketBuffer, PacketHeader, PacketReassembler, ProtocolError, Tdf,
    TdfType,
};

// ============================================================================
// PACKET FRAMING EDGE CASES
// ============================================================================

#[test]
fn test_packet_empty_content() {
    let packet = Packet::new(0x0009, 0x0002, 0, 0, 5, vec![]);
    let bytes = packet.encode();
    assert_eq!(bytes.len(), HEADER_SIZE);
    let mut buf = PacketBuffer::from(bytes);
    let decoded = Packet::decode(&mut buf).expect("Should decode empty content");
    assert_eq!(decoded, packet);
}

#[test]
fn test_packet_content_at_u16_boundary() {
    // 0xFFFF bytes still fits the plain 12-byte header.
    let packet = Packet::new(1, 2, 0, 0, 1, vec![0xAB; 0xFFFF]);
    let bytes = packet.encode();
    assert_eq!(bytes.len(), HEADER_SIZE + 0xFFFF);
    assert_eq!(bytes[8] & 0x10, 0, "extension flag must be clear");
}

#[test]
fn test_packet_content_above_u16_boundary() {
    // One byte more forces the 14-byte extended header.
    let content_length = 0x1_0000 + 3;
    let packet = Packet::new(1, 2, 0, 0, 1, vec![0xCD; content_length]);
    let bytes = packet.encode();
    assert_eq!(bytes.len(), EXT_HEADER_SIZE + content_length);
    assert_eq!(bytes[8] & 0x10, 0x10, "extension flag must be set");

    let header = PacketHeader::peek(&bytes).unwrap();
    assert_eq!(header.content_length(), content_length);
    assert_eq!(
        usize::from(header.length) | (usize::from(header.ext_length) << 16),
        content_length
    );

    let mut reassembler = PacketReassembler::new();
    let decoded = reassembler.push(&bytes).unwrap();
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].content.len(), content_length);
}

#[test]
fn test_ext_flag_uses_bitwise_test_not_any_nonzero_qtype() {
    // A nonzero qtype without the 0x10 high-byte bit must NOT grow the
    // header. (A multiplicative flag test would wrongly fire here.)
    let packet = Packet::new(1, 2, 0, 0x0200, 1, vec![1, 2, 3]);
    let bytes = packet.encode();
    assert_eq!(bytes.len(), HEADER_SIZE + 3);
    let mut buf = PacketBuffer::from(bytes);
    assert_eq!(Packet::decode(&mut buf).unwrap(), packet);
}

#[test]
fn test_caller_set_ext_flag_keeps_field_present() {
    // The flag and the field must stay coherent even when the caller set
    // the bit on a small packet.
    let packet = Packet::new(1, 2, 0, QTYPE_EXT_LENGTH, 1, vec![9, 9]);
    let bytes = packet.encode();
    assert_eq!(bytes.len(), EXT_HEADER_SIZE + 2);
    let mut buf = PacketBuffer::from(bytes);
    assert_eq!(Packet::decode(&mut buf).unwrap(), packet);
}

#[test]
fn test_truncated_header_is_incomplete_not_error() {
    for cut in 0..HEADER_SIZE {
        let mut buf = PacketBuffer::from(vec![0u8; cut]);
        match Packet::decode(&mut buf) {
            Err(ProtocolError::Incomplete { .. }) => {}
            other => panic!("cut={cut}: unexpected result {other:?}"),
        }
    }
}

#[test]
fn test_incomplete_is_never_surfaced_by_reassembler() {
    let packet = Packet::new(1, 2, 0, 0, 1, vec![7; 32]);
    let bytes = packet.encode();
    let mut reassembler = PacketReassembler::new();
    for cut in 1..bytes.len() {
        assert!(reassembler.push(&bytes[cut - 1..cut]).unwrap().is_empty() || cut == bytes.len());
    }
    let got = reassembler.push(&bytes[bytes.len() - 1..]).unwrap();
    assert_eq!(got, vec![packet]);
}

#[test]
fn test_oversized_content_rejected_before_allocation() {
    let mut reassembler = PacketReassembler::with_max_content_length(1024);
    // Hand-crafted header claiming a 16 MB body with no bytes behind it.
    let mut bytes = vec![0xFF, 0xFF]; // length
    bytes.extend_from_slice(&[0, 1, 0, 0x28, 0, 0]); // component, command, error
    bytes.extend_from_slice(&[0x10, 0x00]); // qtype with ext flag
    bytes.extend_from_slice(&[0, 1]); // id
    bytes.extend_from_slice(&[0x00, 0xFF]); // ext length
    match reassembler.push(&bytes) {
        Err(ProtocolError::OversizedPacket(_)) => {}
        other => panic!("unexpected result {other:?}"),
    }
}

// ============================================================================
// TDF DECODE EDGE CASES
// ============================================================================

#[test]
fn test_unknown_tdf_type_aborts_content() {
    let mut bytes = Tdf::int("GOOD", 1).encode();
    bytes.extend_from_slice(&[0xC2, 0x9B, 0xA7, 0x42]); // valid tag, bogus type
    match tdf::decode_all(&bytes) {
        Err(ProtocolError::UnknownTdfType(0x42)) => {}
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn test_unknown_list_subtype_rejected() {
    let mut buf = PacketBuffer::new();
    buf.write_u32((blaze_protocol::label_to_tag("LIST") << 8) | 0x04);
    buf.write_u8(0x2A); // not a list element kind
    buf.write_var_int(1);
    match tdf::decode_all(&buf.into_vec()) {
        Err(ProtocolError::UnknownListType(0x2A)) => {}
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn test_truncated_string_payload() {
    let mut bytes = Tdf::string("NAME", "abcdefgh").encode();
    bytes.truncate(bytes.len() - 4);
    match tdf::decode_all(&bytes) {
        Err(ProtocolError::Truncated { .. }) => {}
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn test_string_length_excluding_terminator_still_reads_exactly_length() {
    // Writer counts the NUL inside the length, but a reader must survive a
    // peer that did not: exactly `length` bytes are consumed either way.
    let mut buf = PacketBuffer::new();
    buf.write_var_int(5); // length of "hello", no terminator counted
    buf.write_bytes(b"hello");
    buf.write_u8(0xEE); // sentinel that must not be consumed
    assert_eq!(buf.read_string().unwrap(), "hello");
    assert_eq!(buf.read_u8().unwrap(), 0xEE);
}

#[test]
fn test_union_empty_has_no_nested_value() {
    let bytes = Tdf::union_empty("ADDR").encode();
    // header word + single 0x7F discriminant
    assert_eq!(bytes.len(), 5);
    assert_eq!(bytes[4], 0x7F);
    let decoded = tdf::decode_all(&bytes).unwrap();
    assert_eq!(decoded[0], Tdf::union_empty("ADDR"));
}

#[test]
fn test_union_invalid_discriminant_rejected() {
    let mut bytes = Tdf::union_empty("ADDR").encode();
    bytes[4] = 0x55;
    match tdf::decode_all(&bytes) {
        Err(ProtocolError::UnknownTdfType(0x55)) => {}
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn test_zero_count_collections() {
    let values = vec![
        Tdf::list("IDS ", ListKind::Int, vec![]),
        Tdf::pair_list("ATTR", ListKind::String, ListKind::Int, vec![]),
        Tdf::var_int_list("SEQ ", vec![]),
    ];
    let bytes = tdf::encode_all(&values);
    assert_eq!(tdf::decode_all(&bytes).unwrap(), values);
}

#[test]
fn test_float_list_elements() {
    let value = Tdf::list(
        "RATE",
        ListKind::Float,
        vec![ListItem::Float(0.25), ListItem::Float(-1.5)],
    );
    let bytes = value.encode();
    assert_eq!(tdf::decode_all(&bytes).unwrap(), vec![value]);
}

#[test]
fn test_content_decode_through_packet() {
    let fields = vec![
        Tdf::string("MAIL", "player@example.com"),
        Tdf::union(
            "NETW",
            TdfType::Struct,
            Tdf::struct_("VALU", vec![Tdf::pair("PORT", 3659, 3659)]),
        ),
    ];
    let packet = Packet::with_values(0x0001, 0x0028, 0, 0, 1, &fields);
    assert_eq!(packet.decode_content().unwrap(), fields);
}

// ============================================================================
// VAR-INT EDGE CASES
// ============================================================================

#[test]
fn test_var_int_lenient_decode_never_fails() {
    // Any byte soup must yield a value, not an error, from the lenient path.
    let soups: [&[u8]; 4] = [
        &[0x80],
        &[0xFF; 16],
        &[0x80, 0x80, 0x80],
        &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F],
    ];
    for soup in soups {
        let mut buf = PacketBuffer::from(soup);
        let _ = buf.read_var_int();
    }
}

#[test]
fn test_var_int_strict_decode_flags_overflow() {
    let mut bytes = vec![0xFF; 9];
    bytes.push(0x02);
    let mut buf = PacketBuffer::from(bytes);
    match buf.read_var_int_strict() {
        Err(ProtocolError::VarIntOverflow) => {}
        other => panic!("unexpected result {other:?}"),
    }
}

// ============================================================================
// REASSEMBLER RESOURCE BEHAVIOR
// ============================================================================

#[test]
fn test_reassembler_many_small_packets_with_ragged_chunking() {
    let packets: Vec<Packet> = (0..100)
        .map(|i| Packet::new(1, 2, 0, 0, i, vec![i as u8; (i % 7) as usize]))
        .collect();
    let stream: Vec<u8> = packets.iter().flat_map(Packet::encode).collect();

    let mut reassembler = PacketReassembler::new();
    let mut got = Vec::new();
    // Deterministically ragged chunk sizes.
    let mut offset = 0;
    let mut step = 1;
    while offset < stream.len() {
        let end = (offset + step).min(stream.len());
        got.extend(reassembler.push(&stream[offset..end]).unwrap());
        offset = end;
        step = step % 13 + 1;
    }
    assert_eq!(got, packets);
    assert_eq!(reassembler.buffered(), 0);
}
