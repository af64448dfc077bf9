//! RRQ / WRQ packets.
//!
//! ```text
//!  2 bytes     string    1 byte     string   1 byte
//!  ------------------------------------------------
//! | Opcode |  Filename  |   0  |    Mode    |   0  |
//!  ------------------------------------------------
//! ```

use byteorder::{NetworkEndian, WriteBytesExt};

use crate::tftp::error::{Error, Result, TftpError};
use crate::tftp::shared::{
    expect_op, read_cstr, write_cstr, Deserializable, ParseOptions, Serializable, TrailingBytes,
    OP_LEN, OP_RRQ, OP_WRQ,
};

/// 2 byte opcode + 1 byte filename + terminator + 1 byte mode + terminator.
const MIN_REQUEST_LEN: usize = 6;

pub trait Request: Serializable + Deserializable {
    fn op(&self) -> u16;
    fn filename(&self) -> &str;
    fn mode(&self) -> &str;
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ReadRequestPacket {
    req: RequestPacket,
}

impl ReadRequestPacket {
    pub fn new(filename: &str, mode: &str) -> ReadRequestPacket {
        ReadRequestPacket {
            req: RequestPacket::new(OP_RRQ, filename, mode),
        }
    }

    pub fn deserialize_with(
        buf: &[u8],
        opts: &ParseOptions,
    ) -> std::result::Result<Self, TftpError> {
        Ok(ReadRequestPacket {
            req: RequestPacket::parse(buf, OP_RRQ, opts)?,
        })
    }
}

impl Request for ReadRequestPacket {
    fn op(&self) -> u16 {
        self.req.op
    }

    fn filename(&self) -> &str {
        &self.req.filename
    }

    fn mode(&self) -> &str {
        &self.req.mode
    }
}

impl Serializable for ReadRequestPacket {
    fn serialize(&self) -> Result<Vec<u8>> {
        self.req.serialize()
    }
}

impl Deserializable for ReadRequestPacket {
    fn deserialize(buf: &[u8]) -> std::result::Result<Self, TftpError> {
        ReadRequestPacket::deserialize_with(buf, &ParseOptions::default())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct WriteRequestPacket {
    req: RequestPacket,
}

impl WriteRequestPacket {
    pub fn new(filename: &str, mode: &str) -> WriteRequestPacket {
        WriteRequestPacket {
            req: RequestPacket::new(OP_WRQ, filename, mode),
        }
    }

    pub fn deserialize_with(
        buf: &[u8],
        opts: &ParseOptions,
    ) -> std::result::Result<Self, TftpError> {
        Ok(WriteRequestPacket {
            req: RequestPacket::parse(buf, OP_WRQ, opts)?,
        })
    }
}

impl Request for WriteRequestPacket {
    fn op(&self) -> u16 {
        self.req.op
    }

    fn filename(&self) -> &str {
        &self.req.filename
    }

    fn mode(&self) -> &str {
        &self.req.mode
    }
}

impl Serializable for WriteRequestPacket {
    fn serialize(&self) -> Result<Vec<u8>> {
        self.req.serialize()
    }
}

impl Deserializable for WriteRequestPacket {
    fn deserialize(buf: &[u8]) -> std::result::Result<Self, TftpError> {
        WriteRequestPacket::deserialize_with(buf, &ParseOptions::default())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
struct RequestPacket {
    op: u16,
    filename: String,
    mode: String,
}

impl RequestPacket {
    fn new(op: u16, filename: &str, mode: &str) -> Self {
        RequestPacket {
            op,
            filename: String::from(filename),
            mode: String::from(mode),
        }
    }

    fn parse(buf: &[u8], op: u16, opts: &ParseOptions) -> std::result::Result<Self, TftpError> {
        expect_op(buf, op)?;

        if buf.len() < MIN_REQUEST_LEN {
            return Err(TftpError::illegal_operation("Request not long enough"));
        }

        let (filename, rest) = read_cstr(&buf[OP_LEN..], "Filename")?;
        if filename.is_empty() {
            return Err(TftpError::illegal_operation("Blank Filename"));
        }

        let (mode, rest) = read_cstr(rest, "Mode")?;
        if mode.is_empty() {
            return Err(TftpError::illegal_operation("Blank Mode"));
        }

        if opts.trailing_request_bytes == TrailingBytes::Reject && !rest.is_empty() {
            return Err(TftpError::illegal_operation(format!(
                "{} trailing bytes after Mode",
                rest.len()
            )));
        }

        Ok(RequestPacket::new(op, &filename, &mode))
    }
}

impl Serializable for RequestPacket {
    fn serialize(&self) -> Result<Vec<u8>> {
        if self.filename.is_empty() {
            return Err(Error::InvalidField {
                field: "filename",
                reason: "must not be empty",
            });
        }
        if self.mode.is_empty() {
            return Err(Error::InvalidField {
                field: "mode",
                reason: "must not be empty",
            });
        }

        let length = OP_LEN + self.filename.len() + 1 + self.mode.len() + 1;
        let mut buf = Vec::with_capacity(length);

        buf.write_u16::<NetworkEndian>(self.op)?;
        write_cstr(&mut buf, &self.filename, "filename")?;
        write_cstr(&mut buf, &self.mode, "mode")?;
        Ok(buf)
    }
}
