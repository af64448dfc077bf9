//! # tftpeer
//!
//! Packet codec for TFTP (RFC 1350).
//!
//! Turns packet values into the exact bytes that go on the wire and parses
//! received datagrams back into a [`TftpPacket`], rejecting malformed input
//! with an Illegal Operation [`TftpError`]. Any error a host program raises
//! can be turned into the ERROR packet for the peer with
//! [`ErrorPacket::from_error`].
//!
//! ```
//! use tftpeer::{parse_udp_packet, AckPacket, Serializable, TftpPacket};
//!
//! let bytes = AckPacket::new(50).serialize().unwrap();
//! assert_eq!(bytes, vec![0x00, 0x04, 0x00, 0x32]);
//!
//! match parse_udp_packet(&bytes).unwrap() {
//!     TftpPacket::Ack(ack) => assert_eq!(ack.blk(), 50),
//!     other => panic!("unexpected packet {}", other),
//! }
//! ```
//!
//! Transport, timeouts and block sequencing are left to the caller.

pub mod tftp;

pub use tftp::error::{Error, Result, TftpError};
pub use tftp::shared::ack_packet::AckPacket;
pub use tftp::shared::data_packet::DataPacket;
pub use tftp::shared::err_packet::{ErrorCode, ErrorPacket, MAX_ERROR_CODE};
pub use tftp::shared::request_packet::{ReadRequestPacket, Request, WriteRequestPacket};
pub use tftp::shared::{
    parse_udp_packet, parse_udp_packet_with, Deserializable, Opcode, ParseOptions, Serializable,
    TftpPacket, TrailingBytes, STRIDE_SIZE,
};
