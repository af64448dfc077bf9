use std::borrow::Cow;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::io::Write;

use byteorder::{ByteOrder, NetworkEndian, WriteBytesExt};
use tracing::{debug, trace};

use crate::tftp::error::{Error, Result, TftpError};
use crate::tftp::shared::ack_packet::AckPacket;
use crate::tftp::shared::data_packet::DataPacket;
use crate::tftp::shared::err_packet::ErrorPacket;
use crate::tftp::shared::request_packet::*;

pub mod ack_packet;
pub mod data_packet;
pub mod err_packet;
pub mod request_packet;

/// Length of the OpCode field in bytes.
pub const OP_LEN: usize = 2;
/// Length of a block number field in bytes.
pub const BLK_NUM_LEN: usize = 2;
/// Stride size for reading / writing files.
pub const STRIDE_SIZE: usize = 512;
/// Op code for Read Request
pub const OP_RRQ: u16 = 0x001;
/// Op code for Write Request
pub const OP_WRQ: u16 = 0x002;
/// Op code for Data packet
pub const OP_DATA: u16 = 0x003;
/// Op code for ACK packet
pub const OP_ACK: u16 = 0x004;
/// Op code for Error packet
pub const OP_ERR: u16 = 0x005;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Opcode {
    Rrq,
    Wrq,
    Data,
    Ack,
    Err,
}

impl From<Opcode> for u16 {
    fn from(op: Opcode) -> u16 {
        match op {
            Opcode::Rrq => OP_RRQ,
            Opcode::Wrq => OP_WRQ,
            Opcode::Data => OP_DATA,
            Opcode::Ack => OP_ACK,
            Opcode::Err => OP_ERR,
        }
    }
}

impl TryFrom<u16> for Opcode {
    type Error = TftpError;

    fn try_from(op: u16) -> std::result::Result<Self, Self::Error> {
        match op {
            OP_RRQ => Ok(Opcode::Rrq),
            OP_WRQ => Ok(Opcode::Wrq),
            OP_DATA => Ok(Opcode::Data),
            OP_ACK => Ok(Opcode::Ack),
            OP_ERR => Ok(Opcode::Err),
            val => Err(TftpError::illegal_operation(format!(
                "Unknown Opcode - {}",
                val
            ))),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TftpPacket {
    Rrq(ReadRequestPacket),
    Wrq(WriteRequestPacket),
    Data(DataPacket),
    Ack(AckPacket),
    Err(ErrorPacket),
}

impl TftpPacket {
    pub fn opcode(&self) -> Opcode {
        match self {
            TftpPacket::Rrq(_) => Opcode::Rrq,
            TftpPacket::Wrq(_) => Opcode::Wrq,
            TftpPacket::Data(_) => Opcode::Data,
            TftpPacket::Ack(_) => Opcode::Ack,
            TftpPacket::Err(_) => Opcode::Err,
        }
    }
}

impl Display for TftpPacket {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TftpPacket::Rrq(p) => write!(f, "RRQ [{}] [{}]", p.filename(), p.mode()),
            TftpPacket::Wrq(p) => write!(f, "WRQ [{}] [{}]", p.filename(), p.mode()),
            TftpPacket::Data(p) => {
                write!(f, "DATA [{}] ({} bytes)", p.blk(), p.payload().len())
            }
            TftpPacket::Ack(p) => write!(f, "ACK [{}]", p.blk()),
            TftpPacket::Err(p) => write!(f, "ERR [{}]: {}", p.code(), p.message()),
        }
    }
}

/// Produces the exact wire bytes of a packet.
pub trait Serializable {
    fn serialize(&self) -> Result<Vec<u8>>;
}

/// Parses one packet kind out of a received buffer.
pub trait Deserializable: Sized {
    fn deserialize(buf: &[u8]) -> std::result::Result<Self, TftpError>;
}

impl Serializable for TftpPacket {
    fn serialize(&self) -> Result<Vec<u8>> {
        let bytes = match self {
            TftpPacket::Rrq(p) => p.serialize(),
            TftpPacket::Wrq(p) => p.serialize(),
            TftpPacket::Data(p) => p.serialize(),
            TftpPacket::Ack(p) => p.serialize(),
            TftpPacket::Err(p) => p.serialize(),
        }?;

        trace!(packet = %self, len = bytes.len(), "encoded packet");
        Ok(bytes)
    }
}

impl TryFrom<&[u8]> for TftpPacket {
    type Error = TftpError;

    fn try_from(buf: &[u8]) -> std::result::Result<Self, Self::Error> {
        parse_udp_packet(buf)
    }
}

/// What to do with bytes that follow the mode terminator of a request.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum TrailingBytes {
    /// Drop them; peers that append option fields still parse.
    #[default]
    Ignore,
    /// Treat them as a framing violation.
    Reject,
}

/// Knobs for the decoder. The default is the permissive behavior.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct ParseOptions {
    pub trailing_request_bytes: TrailingBytes,
}

impl ParseOptions {
    pub fn strict() -> Self {
        ParseOptions {
            trailing_request_bytes: TrailingBytes::Reject,
        }
    }

    pub fn with_trailing_request_bytes(mut self, policy: TrailingBytes) -> Self {
        self.trailing_request_bytes = policy;
        self
    }
}

/// Parses a received datagram with the default [`ParseOptions`].
pub fn parse_udp_packet(buf: &[u8]) -> std::result::Result<TftpPacket, TftpError> {
    parse_udp_packet_with(buf, &ParseOptions::default())
}

pub fn parse_udp_packet_with(
    buf: &[u8],
    opts: &ParseOptions,
) -> std::result::Result<TftpPacket, TftpError> {
    let result = dispatch(buf, opts);

    match &result {
        Ok(packet) => trace!(%packet, len = buf.len(), "decoded packet"),
        Err(err) => debug!(len = buf.len(), error = %err, "rejected packet"),
    }

    result
}

fn dispatch(buf: &[u8], opts: &ParseOptions) -> std::result::Result<TftpPacket, TftpError> {
    let op = read_op(buf)?;

    let packet = match Opcode::try_from(op)? {
        Opcode::Rrq => TftpPacket::Rrq(ReadRequestPacket::deserialize_with(buf, opts)?),
        Opcode::Wrq => TftpPacket::Wrq(WriteRequestPacket::deserialize_with(buf, opts)?),
        Opcode::Data => TftpPacket::Data(DataPacket::deserialize(buf)?),
        Opcode::Ack => TftpPacket::Ack(AckPacket::deserialize(buf)?),
        Opcode::Err => TftpPacket::Err(ErrorPacket::deserialize(buf)?),
    };

    Ok(packet)
}

/// Reads the leading opcode, failing on buffers too short to hold one.
pub(crate) fn read_op(buf: &[u8]) -> std::result::Result<u16, TftpError> {
    if buf.len() < OP_LEN {
        return Err(TftpError::illegal_operation("No data in packet"));
    }

    Ok(NetworkEndian::read_u16(&buf[..OP_LEN]))
}

/// Reads the leading opcode and checks it against the packet kind being parsed.
pub(crate) fn expect_op(buf: &[u8], expected: u16) -> std::result::Result<(), TftpError> {
    let op = read_op(buf)?;
    if op != expected {
        return Err(TftpError::illegal_operation(format!(
            "Bad OP code! [{}]",
            op
        )));
    }

    Ok(())
}

/// Splits a NUL-terminated string off the front of `buf`.
///
/// Returns the string without its terminator and whatever follows it.
/// Bytes that are not UTF-8 come back as U+FFFD.
pub(crate) fn read_cstr<'a>(
    buf: &'a [u8],
    field: &str,
) -> std::result::Result<(Cow<'a, str>, &'a [u8]), TftpError> {
    let end = buf
        .iter()
        .position(|&byte| byte == 0)
        .ok_or_else(|| TftpError::illegal_operation(format!("Non 0x0 terminated {}", field)))?;

    Ok((String::from_utf8_lossy(&buf[..end]), &buf[end + 1..]))
}

/// Writes `s` followed by its terminator.
pub(crate) fn write_cstr(buf: &mut Vec<u8>, s: &str, field: &'static str) -> Result<()> {
    if s.as_bytes().contains(&0) {
        return Err(Error::InvalidField {
            field,
            reason: "contains a NUL byte",
        });
    }

    let written = buf.write(s.as_bytes())?;
    if written != s.len() {
        return Err(Error::ShortWrite { field });
    }
    buf.write_u8(0)?;

    Ok(())
}
