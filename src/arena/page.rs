//! Arena pages
//!
//! A fixed-size block with a slot directory growing up from the header and
//! a record heap growing down from the end of the data region.

use bytes::{Buf, BufMut};

use crate::error::{AgrepError, Result};

use super::{LogicalPointer, DATA_SIZE, HEADER_SIZE, PAGE_SIZE, SLOT_SIZE};

/// One page of arena memory
pub struct Page {
    /// Dense page id, equal to the page's position in the arena
    id: u16,
    /// End of the slot directory (grows toward `lower`)
    upper: u16,
    /// Start of the record heap (shrinks toward `upper`)
    lower: u16,
    /// Data region, always `DATA_SIZE` bytes
    data: Box<[u8]>,
}

impl Page {
    /// Create an empty page
    pub fn new(id: u16) -> Self {
        Self {
            id,
            upper: HEADER_SIZE as u16,
            lower: DATA_SIZE as u16,
            data: vec![0u8; DATA_SIZE].into_boxed_slice(),
        }
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn upper(&self) -> u16 {
        self.upper
    }

    pub fn lower(&self) -> u16 {
        self.lower
    }

    /// Number of records allocated on this page
    pub fn slot_count(&self) -> usize {
        (self.upper as usize - HEADER_SIZE) / SLOT_SIZE
    }

    /// Largest payload the next allocation on this page can take
    ///
    /// `lower - upper - SLOT_SIZE`, clamped at zero.
    pub fn free_space(&self) -> usize {
        (self.lower as usize - self.upper as usize).saturating_sub(SLOT_SIZE)
    }

    /// Reserve `size` bytes and a slot entry describing them
    ///
    /// Returns `None` when the page cannot hold the record; the page is left
    /// untouched in that case.
    pub fn allocate(&mut self, size: usize) -> Option<LogicalPointer> {
        // Not `free_space()`: its clamp would admit a zero-byte record with no
        // room left for the slot entry
        if self.upper as usize + SLOT_SIZE + size > self.lower as usize {
            return None;
        }

        let slot_offset = self.upper;
        let data_offset = self.lower - size as u16;

        let mut slot = &mut self.data[slot_offset as usize..slot_offset as usize + SLOT_SIZE];
        slot.put_u16_le(data_offset);
        slot.put_u16_le(size as u16);

        self.upper += SLOT_SIZE as u16;
        self.lower = data_offset;

        Some(LogicalPointer::new(self.id, slot_offset))
    }

    /// Bytes of the record named by `ptr`
    pub fn read(&self, ptr: LogicalPointer) -> Result<&[u8]> {
        let (offset, len) = self.slot(ptr)?;
        Ok(&self.data[offset..offset + len])
    }

    /// Overwrite the record named by `ptr`
    ///
    /// The payload must be exactly as long as the reserved record; anything
    /// else is rejected instead of truncated.
    pub fn write(&mut self, ptr: LogicalPointer, bytes: &[u8]) -> Result<()> {
        let (offset, len) = self.slot(ptr)?;
        if bytes.len() != len {
            return Err(AgrepError::RecordSize {
                expected: len,
                actual: bytes.len(),
            });
        }

        self.data[offset..offset + len].copy_from_slice(bytes);
        Ok(())
    }

    /// Resolve a slot entry to (data offset, length)
    fn slot(&self, ptr: LogicalPointer) -> Result<(usize, usize)> {
        let slot_offset = ptr.slot_offset() as usize;
        let on_boundary = slot_offset >= HEADER_SIZE && (slot_offset - HEADER_SIZE) % SLOT_SIZE == 0;

        if ptr.page_id() != self.id || !on_boundary || slot_offset + SLOT_SIZE > self.upper as usize {
            return Err(AgrepError::InvalidAddress(ptr.raw()));
        }

        let mut entry = &self.data[slot_offset..slot_offset + SLOT_SIZE];
        let offset = entry.get_u16_le() as usize;
        let len = entry.get_u16_le() as usize;
        Ok((offset, len))
    }

    // =========================================================================
    // Block Encoding
    // =========================================================================

    /// Encode as one `PAGE_SIZE` block: header followed by the data region
    pub fn to_block(&self) -> Vec<u8> {
        let mut block = Vec::with_capacity(PAGE_SIZE);
        block.put_u16_le(self.id);
        block.put_u16_le(self.upper);
        block.put_u16_le(self.lower);
        block.put_u16_le(0);
        block.put_slice(&self.data);
        block
    }

    /// Decode a `PAGE_SIZE` block, validating header and slot directory
    pub fn from_block(block: &[u8]) -> Result<Self> {
        if block.len() != PAGE_SIZE {
            return Err(AgrepError::Format(format!(
                "page block is {} bytes, expected {}",
                block.len(),
                PAGE_SIZE
            )));
        }

        let mut header = &block[..HEADER_SIZE];
        let id = header.get_u16_le();
        let upper = header.get_u16_le();
        let lower = header.get_u16_le();

        let (upper_usize, lower_usize) = (upper as usize, lower as usize);
        if upper_usize < HEADER_SIZE
            || upper_usize > lower_usize
            || lower_usize > DATA_SIZE
            || (upper_usize - HEADER_SIZE) % SLOT_SIZE != 0
        {
            return Err(AgrepError::Format(format!(
                "page {} has corrupt bounds: upper={}, lower={}",
                id, upper, lower
            )));
        }

        let page = Self {
            id,
            upper,
            lower,
            data: block[HEADER_SIZE..].to_vec().into_boxed_slice(),
        };

        // Every record must sit inside the heap area
        for slot_offset in (HEADER_SIZE..upper_usize).step_by(SLOT_SIZE) {
            let mut entry = &page.data[slot_offset..slot_offset + SLOT_SIZE];
            let offset = entry.get_u16_le() as usize;
            let len = entry.get_u16_le() as usize;

            if offset < lower_usize || offset + len > DATA_SIZE {
                return Err(AgrepError::Format(format!(
                    "page {} slot at {} points outside the heap ({}+{})",
                    id, slot_offset, offset, len
                )));
            }
        }

        Ok(page)
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("id", &self.id)
            .field("upper", &self.upper)
            .field("lower", &self.lower)
            .field("slots", &self.slot_count())
            .finish()
    }
}
