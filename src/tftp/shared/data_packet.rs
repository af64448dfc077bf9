use std::io::Write;

use byteorder::{ByteOrder, NetworkEndian, WriteBytesExt};

use crate::tftp::error::{Error, Result, TftpError};
use crate::tftp::shared::{
    expect_op, Deserializable, Serializable, BLK_NUM_LEN, OP_DATA, OP_LEN, STRIDE_SIZE,
};

const DATA_OFFSET: usize = OP_LEN + BLK_NUM_LEN;

/// A block of file contents. The payload length is not checked here; a
/// transfer normally carries up to [`STRIDE_SIZE`] bytes per block.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DataPacket {
    blk: u16,
    data: Vec<u8>,
}

impl DataPacket {
    pub fn new(blk: u16, data: Vec<u8>) -> Self {
        DataPacket { blk, data }
    }

    pub fn blk(&self) -> u16 {
        self.blk
    }

    pub fn payload(&self) -> &[u8] {
        &self.data
    }

    pub fn data(self) -> Vec<u8> {
        self.data
    }

    /// A block shorter than a full stride ends the transfer.
    pub fn is_final(&self) -> bool {
        self.data.len() < STRIDE_SIZE
    }
}

impl Serializable for DataPacket {
    fn serialize(&self) -> Result<Vec<u8>> {
        let mut buf: Vec<u8> = Vec::with_capacity(DATA_OFFSET + self.data.len());
        buf.write_u16::<NetworkEndian>(OP_DATA)?;
        buf.write_u16::<NetworkEndian>(self.blk)?;

        let written = buf.write(&self.data)?;
        if written != self.data.len() {
            return Err(Error::ShortWrite { field: "data" });
        }

        Ok(buf)
    }
}

impl Deserializable for DataPacket {
    fn deserialize(buf: &[u8]) -> std::result::Result<Self, TftpError> {
        expect_op(buf, OP_DATA)?;

        if buf.len() < DATA_OFFSET {
            return Err(TftpError::illegal_operation("Data packet too short"));
        }

        let blk = NetworkEndian::read_u16(&buf[OP_LEN..DATA_OFFSET]);
        Ok(DataPacket::new(blk, buf[DATA_OFFSET..].to_vec()))
    }
}
