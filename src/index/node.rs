//! Index records
//!
//! Fixed-layout records stored in the arena. Null links are encoded as `0`.

use bytes::{Buf, BufMut};

use crate::arena::{LogicalPointer, Record};
use crate::error::{AgrepError, Result};

use super::BUCKET_COUNT;

/// Root of the index: bucket heads followed by the hash seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashRoot {
    /// Head of each bucket's collision chain; always `BUCKET_COUNT` long
    pub buckets: Vec<Option<LogicalPointer>>,
    pub seed: u32,
}

impl HashRoot {
    pub fn new(seed: u32) -> Self {
        Self {
            buckets: vec![None; BUCKET_COUNT],
            seed,
        }
    }
}

impl Record for HashRoot {
    const SIZE: usize = BUCKET_COUNT * 4 + 4;

    fn encode<B: BufMut>(&self, buf: &mut B) {
        for head in &self.buckets {
            buf.put_u32_le(LogicalPointer::to_raw(*head));
        }
        buf.put_u32_le(self.seed);
    }

    fn decode(buf: &mut &[u8]) -> Result<Self> {
        let buckets = (0..BUCKET_COUNT)
            .map(|_| LogicalPointer::from_raw(buf.get_u32_le()))
            .collect();
        let seed = buf.get_u32_le();
        Ok(Self { buckets, seed })
    }
}

/// One observed hash in a bucket's collision chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketEntry {
    pub hash: u32,
    /// Head of the value chain; an entry always has at least one value
    pub values: LogicalPointer,
    /// Next entry in the same bucket
    pub next: Option<LogicalPointer>,
}

impl Record for BucketEntry {
    const SIZE: usize = 12;

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u32_le(self.hash);
        buf.put_u32_le(self.values.raw());
        buf.put_u32_le(LogicalPointer::to_raw(self.next));
    }

    fn decode(buf: &mut &[u8]) -> Result<Self> {
        let hash = buf.get_u32_le();
        let values = LogicalPointer::from_raw(buf.get_u32_le()).ok_or_else(|| {
            AgrepError::Format(format!("bucket entry for hash {:#010x} has no values", hash))
        })?;
        let next = LogicalPointer::from_raw(buf.get_u32_le());
        Ok(Self { hash, values, next })
    }
}

/// One value in a hash's value chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueEntry {
    pub value: u32,
    pub next: Option<LogicalPointer>,
}

impl Record for ValueEntry {
    const SIZE: usize = 8;

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u32_le(self.value);
        buf.put_u32_le(LogicalPointer::to_raw(self.next));
    }

    fn decode(buf: &mut &[u8]) -> Result<Self> {
        let value = buf.get_u32_le();
        let next = LogicalPointer::from_raw(buf.get_u32_le());
        Ok(Self { value, next })
    }
}
