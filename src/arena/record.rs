//! Typed accessor protocol
//!
//! Fixed-layout records stored in arena slots. Fields are little-endian with
//! fixed widths, so a record's encoded size is known up front and always
//! equals the size reserved for it. Records never hold variable-length data
//! or native references; links to other records are logical pointers.

use bytes::BufMut;

use crate::error::{AgrepError, Result};

use super::{Arena, LogicalPointer};

/// A fixed-size value that can live in an arena slot
pub trait Record: Sized {
    /// Encoded size in bytes
    const SIZE: usize;

    /// Append exactly `SIZE` bytes to `buf`
    fn encode<B: BufMut>(&self, buf: &mut B);

    /// Decode from exactly `SIZE` bytes
    fn decode(buf: &mut &[u8]) -> Result<Self>;
}

impl Arena {
    /// Allocate a slot for `record` and store it
    pub fn create<R: Record>(&mut self, record: &R) -> Result<LogicalPointer> {
        let ptr = self.alloc(R::SIZE)?;
        self.write(ptr, record)?;
        Ok(ptr)
    }

    /// Decode the record stored at `ptr`
    pub fn read<R: Record>(&self, ptr: LogicalPointer) -> Result<R> {
        let mut bytes = self.get(ptr)?;
        if bytes.len() != R::SIZE {
            return Err(AgrepError::RecordSize {
                expected: bytes.len(),
                actual: R::SIZE,
            });
        }
        R::decode(&mut bytes)
    }

    /// Re-encode `record` into the slot at `ptr`
    pub fn write<R: Record>(&mut self, ptr: LogicalPointer, record: &R) -> Result<()> {
        let mut buf = Vec::with_capacity(R::SIZE);
        record.encode(&mut buf);
        debug_assert_eq!(buf.len(), R::SIZE);
        self.set(ptr, &buf)
    }
}
