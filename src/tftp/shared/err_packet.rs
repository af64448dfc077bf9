//! ERROR packet can be the acknowledgment of any other type of packet.
//! The error code is an integer indicating the nature of the error; the
//! message is intended for human consumption and, like all other strings,
//! is terminated with a zero byte.
//!
//! ```text
//!  2 bytes     2 bytes      string    1 byte
//!  -----------------------------------------
//! | Opcode |  ErrorCode |   ErrMsg   |   0  |
//!  -----------------------------------------
//! ```

use std::fmt;

use byteorder::{ByteOrder, NetworkEndian, WriteBytesExt};

use crate::tftp::error::{Error, Result, TftpError};
use crate::tftp::shared::{
    expect_op, read_cstr, write_cstr, Deserializable, Serializable, OP_ERR, OP_LEN,
};

/// opcode + error code + at least the terminator
const ERR_MIN_LEN: usize = 5;
const ERR_CODE_OFFSET: usize = OP_LEN;
const ERR_MSG_OFFSET: usize = 4;

/// Highest error code defined by RFC 1350.
pub const MAX_ERROR_CODE: u16 = 7;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    NotDefined = 0,
    FileNotFound = 1,
    AccessViolation = 2,
    DiskFull = 3,
    IllegalOperation = 4,
    UnknownTransferId = 5,
    FileExists = 6,
    NoSuchUser = 7,
}

impl ErrorCode {
    /// The stock description RFC 1350 gives for the code.
    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::NotDefined => "Not defined, see error message (if any).",
            ErrorCode::FileNotFound => "File not found.",
            ErrorCode::AccessViolation => "Access violation.",
            ErrorCode::DiskFull => "Disk full or allocation exceeded.",
            ErrorCode::IllegalOperation => "Illegal TFTP operation.",
            ErrorCode::UnknownTransferId => "Unknown transfer ID.",
            ErrorCode::FileExists => "File already exists.",
            ErrorCode::NoSuchUser => "No such user.",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code as u16
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = u16;

    fn try_from(code: u16) -> std::result::Result<Self, u16> {
        let code = match code {
            0 => ErrorCode::NotDefined,
            1 => ErrorCode::FileNotFound,
            2 => ErrorCode::AccessViolation,
            3 => ErrorCode::DiskFull,
            4 => ErrorCode::IllegalOperation,
            5 => ErrorCode::UnknownTransferId,
            6 => ErrorCode::FileExists,
            7 => ErrorCode::NoSuchUser,
            other => return Err(other),
        };
        Ok(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u16::from(*self))
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ErrorPacket {
    code: u16,
    err: String,
}

impl ErrorPacket {
    /// Builds a packet with a raw code; codes above 7 fail at serialization.
    pub fn new(code: u16, msg: &str) -> Self {
        ErrorPacket {
            code,
            err: msg.to_string(),
        }
    }

    pub fn from_code(code: ErrorCode) -> Self {
        ErrorPacket::new(code.into(), code.description())
    }

    /// Converts any error into the packet to send back to the peer.
    ///
    /// Classified kinds keep their own code; everything else goes out as
    /// code 0 with the error's message. Never fails, and the result always
    /// serializes: a message is cut at its first NUL.
    pub fn from_error(err: &Error) -> Self {
        match err {
            Error::Tftp(kind) => ErrorPacket::from(kind),
            other => {
                let msg = other.to_string();
                ErrorPacket::new(ErrorCode::NotDefined.into(), wire_message(&msg))
            }
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    /// The code as a known [`ErrorCode`], if it is one.
    pub fn error_code(&self) -> Option<ErrorCode> {
        ErrorCode::try_from(self.code).ok()
    }

    pub fn message(&self) -> &str {
        &self.err
    }
}

/// The part of `msg` that fits in a NUL-terminated field.
fn wire_message(msg: &str) -> &str {
    msg.split('\0').next().unwrap_or_default()
}

impl From<&TftpError> for ErrorPacket {
    fn from(kind: &TftpError) -> Self {
        ErrorPacket::new(kind.code().into(), wire_message(&kind.to_string()))
    }
}

impl From<TftpError> for ErrorPacket {
    fn from(kind: TftpError) -> Self {
        ErrorPacket::from(&kind)
    }
}

impl From<&Error> for ErrorPacket {
    fn from(err: &Error) -> Self {
        ErrorPacket::from_error(err)
    }
}

impl From<Error> for ErrorPacket {
    fn from(err: Error) -> Self {
        ErrorPacket::from_error(&err)
    }
}

impl Serializable for ErrorPacket {
    fn serialize(&self) -> Result<Vec<u8>> {
        if self.code > MAX_ERROR_CODE {
            return Err(Error::InvalidErrorCode(self.code));
        }

        let mut buf = Vec::with_capacity(ERR_MIN_LEN + self.err.len());
        buf.write_u16::<NetworkEndian>(OP_ERR)?;
        buf.write_u16::<NetworkEndian>(self.code)?;
        write_cstr(&mut buf, &self.err, "error message")?;
        Ok(buf)
    }
}

impl Deserializable for ErrorPacket {
    fn deserialize(buf: &[u8]) -> std::result::Result<Self, TftpError> {
        expect_op(buf, OP_ERR)?;

        if buf.len() < ERR_MIN_LEN {
            return Err(TftpError::illegal_operation(
                "Invalid Error packet length - must be at least 5 bytes",
            ));
        }

        let code = NetworkEndian::read_u16(&buf[ERR_CODE_OFFSET..ERR_MSG_OFFSET]);
        if code > MAX_ERROR_CODE {
            return Err(TftpError::illegal_operation(format!(
                "Invalid error code {} - must be between 0 and 7",
                code
            )));
        }

        let (msg, _) = read_cstr(&buf[ERR_MSG_OFFSET..], "Error message")?;
        Ok(ErrorPacket::new(code, &msg))
    }
}
