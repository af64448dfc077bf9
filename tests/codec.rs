//! Wire-level behavior of the packet codec through the public API.

use tftpeer::{
    parse_udp_packet, parse_udp_packet_with, AckPacket, DataPacket, Error, ErrorPacket,
    ParseOptions, ReadRequestPacket, Serializable, TftpError, TftpPacket, WriteRequestPacket,
};

fn assert_illegal(buf: &[u8]) {
    match parse_udp_packet(buf) {
        Err(err) => assert!(
            err.is_illegal_operation(),
            "expected illegal operation for {:?}, got {:?}",
            buf,
            err
        ),
        Ok(packet) => panic!("expected {:?} to be rejected, got {}", buf, packet),
    }
}

// =============================================================================
// Concrete scenarios
// =============================================================================

#[test]
fn encode_read_request() {
    let p = ReadRequestPacket::new("./testfile", "octet");
    let mut expected = vec![0x00, 0x01];
    expected.extend_from_slice(b"./testfile\0octet\0");

    assert_eq!(p.serialize().unwrap(), expected);
}

#[test]
fn encode_data() {
    let p = DataPacket::new(50, vec![84, 101, 115, 116]);
    assert_eq!(
        p.serialize().unwrap(),
        vec![0x00, 0x03, 0x00, 0x32, 0x54, 0x65, 0x73, 0x74]
    );
}

#[test]
fn decode_ack() {
    let p = parse_udp_packet(&[0x00, 0x04, 0x00, 0x32]).unwrap();
    assert_eq!(p, TftpPacket::Ack(AckPacket::new(50)));
}

#[test]
fn decode_error() {
    let p = parse_udp_packet(&[0x00, 0x05, 0x00, 0x01, b'T', b'e', b's', b't', 0x00]).unwrap();
    assert_eq!(p, TftpPacket::Err(ErrorPacket::new(1, "Test")));
}

// =============================================================================
// Round trips at the boundaries
// =============================================================================

#[test]
fn round_trip_every_variant() {
    let mut packets = vec![
        TftpPacket::Rrq(ReadRequestPacket::new("./testfile", "octet")),
        TftpPacket::Wrq(WriteRequestPacket::new("upload.bin", "netascii")),
    ];
    for blk in [0u16, 1, u16::MAX] {
        packets.push(TftpPacket::Data(DataPacket::new(blk, vec![])));
        packets.push(TftpPacket::Data(DataPacket::new(blk, vec![0xAB; 512])));
        packets.push(TftpPacket::Ack(AckPacket::new(blk)));
    }
    for code in 0u16..=7 {
        packets.push(TftpPacket::Err(ErrorPacket::new(code, "something went wrong")));
    }

    for packet in packets {
        let bytes = packet.serialize().unwrap();
        assert_eq!(parse_udp_packet(&bytes).unwrap(), packet);
    }
}

#[test]
fn encoding_is_deterministic() {
    let packet = TftpPacket::Err(ErrorPacket::new(4, "again"));
    assert_eq!(packet.serialize().unwrap(), packet.serialize().unwrap());
}

// =============================================================================
// Rejections
// =============================================================================

#[test]
fn rejects_short_buffers() {
    assert_illegal(&[]);
    assert_illegal(&[0x00]);
}

#[test]
fn rejects_unknown_opcode() {
    assert_illegal(&[0x00, 0x06, 0x00, 0x01]);
    assert_illegal(&[0x00, 0x00]);
}

#[test]
fn rejects_malformed_requests() {
    // missing filename terminator
    assert_illegal(&[0x00, 0x01, b'a', b'b', b'c', b'd']);
    // missing mode terminator
    assert_illegal(&[0x00, 0x02, b'a', 0x00, b'o', b'c']);
    // blank filename
    assert_illegal(&[0x00, 0x01, 0x00, b'o', 0x00, 0x00]);
    // blank mode
    assert_illegal(&[0x00, 0x01, b'a', 0x00, 0x00, 0x00]);
    // too short to hold both fields
    assert_illegal(&[0x00, 0x01, b'a', 0x00, 0x00]);
}

#[test]
fn rejects_bad_lengths() {
    assert_illegal(&[0x00, 0x04, 0x00]);
    assert_illegal(&[0x00, 0x04, 0x00, 0x01, 0x00]);
    assert_illegal(&[0x00, 0x03, 0x00]);
    assert_illegal(&[0x00, 0x05, 0x00, 0x01]);
}

#[test]
fn rejects_unterminated_error_message() {
    assert_illegal(&[0x00, 0x05, 0x00, 0x01, b'T', b'e']);
}

#[test]
fn rejects_error_code_above_seven() {
    assert_illegal(&[0x00, 0x05, 0x00, 0x08, 0x00]);
}

#[test]
fn accepts_empty_data_payload() {
    let p = parse_udp_packet(&[0x00, 0x03, 0x00, 0x01]).unwrap();
    match p {
        TftpPacket::Data(data) => {
            assert_eq!(data.blk(), 1);
            assert!(data.payload().is_empty());
        }
        other => panic!("unexpected packet {}", other),
    }
}

#[test]
fn request_trailing_bytes_policy() {
    let buf = [0x00, 0x01, b'f', 0x00, b'o', 0x00, b'x'];

    let p = parse_udp_packet(&buf).unwrap();
    assert_eq!(p, TftpPacket::Rrq(ReadRequestPacket::new("f", "o")));

    let err = parse_udp_packet_with(&buf, &ParseOptions::strict()).unwrap_err();
    assert!(err.is_illegal_operation());
}

#[test]
fn encode_rejects_error_code_above_seven() {
    let err = ErrorPacket::new(8, "nope").serialize().unwrap_err();
    assert!(matches!(err, Error::InvalidErrorCode(8)));
}

// =============================================================================
// Error mapping
// =============================================================================

#[test]
fn mapping_covers_every_kind() {
    let kinds = vec![
        TftpError::FileNotFound {
            file: "missing.txt".into(),
        },
        TftpError::AccessViolation,
        TftpError::DiskFull,
        TftpError::illegal_operation("Unknown Opcode - 9"),
        TftpError::UnknownTransferId {
            transfer_id: "4242".into(),
        },
        TftpError::FileExists {
            file: "there.txt".into(),
        },
        TftpError::NoSuchUser {
            user: "nobody".into(),
        },
    ];

    for (expected_code, kind) in (1u16..).zip(kinds) {
        let message = kind.to_string();
        let p = ErrorPacket::from_error(&Error::from(kind));
        assert_eq!(p.code(), expected_code);
        assert_eq!(p.message(), message);
    }
}

#[test]
fn mapping_falls_back_to_code_zero() {
    let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
    let p = ErrorPacket::from_error(&Error::other(io));
    assert_eq!(p, ErrorPacket::new(0, "disk on fire"));
}

#[test]
fn decode_failure_becomes_reply() {
    let err = parse_udp_packet(&[0x00, 0x09]).unwrap_err();
    let reply = ErrorPacket::from(err).serialize().unwrap();

    let mut expected = vec![0x00, 0x05, 0x00, 0x04];
    expected.extend_from_slice(b"Error Illegal Operation - Unknown Opcode - 9\0");
    assert_eq!(reply, expected);
}

#[test]
fn mapped_reply_always_encodes() {
    let p = ErrorPacket::from_error(&Error::other("bad\0thing"));
    assert_eq!(p.serialize().unwrap(), vec![0x00, 0x05, 0x00, 0x00, b'b', b'a', b'd', 0x00]);
}

#[test]
fn non_utf8_fields_still_decode() {
    let p = parse_udp_packet(&[0x00, 0x05, 0x00, 0x01, 0xE9, 0x00]).unwrap();
    assert_eq!(p, TftpPacket::Err(ErrorPacket::new(1, "\u{FFFD}")));

    match parse_udp_packet(&[0x00, 0x02, 0xE9, 0x00, b'o', 0x00]).unwrap() {
        TftpPacket::Wrq(wrq) => assert_eq!(wrq, WriteRequestPacket::new("\u{FFFD}", "o")),
        other => panic!("unexpected packet {}", other),
    }
}
