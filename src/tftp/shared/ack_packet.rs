//! ACK packet, opcode 4.
//!
//! The block number in an ACK echoes the block number of the DATA packet
//! being acknowledged. A WRQ is acknowledged with block number zero.

use byteorder::{ByteOrder, NetworkEndian, WriteBytesExt};

use crate::tftp::error::{Result, TftpError};
use crate::tftp::shared::{expect_op, Deserializable, Serializable, OP_ACK, OP_LEN};

const ACK_LEN: usize = 4;
const BLK_NUM_OFFSET: usize = OP_LEN;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct AckPacket {
    blk: u16,
}

impl AckPacket {
    pub fn new(blk: u16) -> Self {
        AckPacket { blk }
    }

    pub fn blk(&self) -> u16 {
        self.blk
    }
}

impl Serializable for AckPacket {
    fn serialize(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(ACK_LEN);
        buf.write_u16::<NetworkEndian>(OP_ACK)?;
        buf.write_u16::<NetworkEndian>(self.blk)?;

        Ok(buf)
    }
}

impl Deserializable for AckPacket {
    fn deserialize(buf: &[u8]) -> std::result::Result<Self, TftpError> {
        expect_op(buf, OP_ACK)?;

        if buf.len() != ACK_LEN {
            return Err(TftpError::illegal_operation(
                "Invalid ACK packet length - must be 4 bytes",
            ));
        }

        let blk = NetworkEndian::read_u16(&buf[BLK_NUM_OFFSET..]);
        Ok(AckPacket::new(blk))
    }
}
