//! Logical pointers
//!
//! A 32-bit address naming a record by (page id, slot offset) rather than
//! by native memory address.

use std::fmt;

/// Address of a record inside the arena
///
/// Layout: high 16 bits = page id, low 16 bits = byte offset of the slot
/// entry inside the page's data region. The raw value `0` is reserved as
/// null and is represented as `Option::<LogicalPointer>::None` instead.
///
/// A `LogicalPointer` does not own memory. It can only be dereferenced
/// through the [`Arena`](super::Arena) that produced it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogicalPointer(u32);

impl LogicalPointer {
    pub(crate) fn new(page_id: u16, slot_offset: u16) -> Self {
        Self((page_id as u32) << 16 | slot_offset as u32)
    }

    /// Rebuild a pointer from its stored form; `0` decodes to `None`
    pub(crate) fn from_raw(raw: u32) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }

    /// Encode an optional pointer, writing `0` for `None`
    pub(crate) fn to_raw(ptr: Option<Self>) -> u32 {
        ptr.map_or(0, |p| p.0)
    }

    /// The 32-bit encoded address
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Id of the page holding the record
    pub fn page_id(self) -> u16 {
        (self.0 >> 16) as u16
    }

    /// Offset of the slot entry inside the page's data region
    pub fn slot_offset(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }
}

impl fmt::Debug for LogicalPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LogicalPointer({}:{})", self.page_id(), self.slot_offset())
    }
}

impl fmt::Display for LogicalPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}
