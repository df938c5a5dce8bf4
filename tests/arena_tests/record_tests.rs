//! Tests for the typed accessor protocol
//!
//! These tests verify:
//! - Records are stored in their little-endian wire layout
//! - create/read/write round trips through the arena
//! - Size contract violations between record types

use agrep::arena::{Arena, Record};
use agrep::index::{BucketEntry, HashRoot, ValueEntry, BUCKET_COUNT};
use agrep::{AgrepError, Result};
use bytes::{Buf, BufMut};

// =============================================================================
// Test Record
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Point {
    x: u32,
    y: u16,
}

impl Record for Point {
    const SIZE: usize = 6;

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u32_le(self.x);
        buf.put_u16_le(self.y);
    }

    fn decode(buf: &mut &[u8]) -> Result<Self> {
        Ok(Self {
            x: buf.get_u32_le(),
            y: buf.get_u16_le(),
        })
    }
}

// =============================================================================
// Round-Trip Tests
// =============================================================================

#[test]
fn test_create_then_read() {
    let mut arena = Arena::new();
    let point = Point { x: 0xDEAD_BEEF, y: 7 };

    let ptr = arena.create(&point).unwrap();

    assert_eq!(arena.read::<Point>(ptr).unwrap(), point);
}

#[test]
fn test_wire_layout_is_little_endian() {
    let mut arena = Arena::new();

    let ptr = arena.create(&Point { x: 0x0403_0201, y: 0x0605 }).unwrap();

    assert_eq!(arena.get(ptr).unwrap(), &[1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_write_replaces_record() {
    let mut arena = Arena::new();
    let ptr = arena.create(&Point { x: 1, y: 1 }).unwrap();

    arena.write(ptr, &Point { x: 2, y: 3 }).unwrap();

    assert_eq!(arena.read::<Point>(ptr).unwrap(), Point { x: 2, y: 3 });
}

#[test]
fn test_read_as_wrong_record_type_fails() {
    let mut arena = Arena::new();
    let ptr = arena.create(&ValueEntry { value: 1, next: None }).unwrap();

    assert!(matches!(
        arena.read::<BucketEntry>(ptr),
        Err(AgrepError::RecordSize { .. })
    ));
}

#[test]
fn test_write_wrong_record_type_fails() {
    let mut arena = Arena::new();
    let ptr = arena.create(&Point { x: 1, y: 1 }).unwrap();

    let result = arena.write(ptr, &ValueEntry { value: 9, next: None });

    assert!(matches!(
        result,
        Err(AgrepError::RecordSize { expected: 6, actual: 8 })
    ));
    assert_eq!(arena.read::<Point>(ptr).unwrap(), Point { x: 1, y: 1 });
}

// =============================================================================
// Index Record Layout Tests
// =============================================================================

#[test]
fn test_index_record_sizes() {
    assert_eq!(HashRoot::SIZE, BUCKET_COUNT * 4 + 4);
    assert_eq!(BucketEntry::SIZE, 12);
    assert_eq!(ValueEntry::SIZE, 8);
}

#[test]
fn test_value_entry_null_next_encodes_as_zero() {
    let mut arena = Arena::new();

    let ptr = arena.create(&ValueEntry { value: 5, next: None }).unwrap();

    assert_eq!(arena.get(ptr).unwrap(), &[5, 0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn test_bucket_entry_links_round_trip() {
    let mut arena = Arena::new();
    let values = arena.create(&ValueEntry { value: 42, next: None }).unwrap();
    let tail = arena
        .create(&BucketEntry { hash: 2, values, next: None })
        .unwrap();
    let entry = BucketEntry {
        hash: 0x1234_5678,
        values,
        next: Some(tail),
    };

    let ptr = arena.create(&entry).unwrap();

    assert_eq!(arena.read::<BucketEntry>(ptr).unwrap(), entry);
    let bytes = arena.get(ptr).unwrap();
    assert_eq!(&bytes[0..4], &0x1234_5678u32.to_le_bytes());
    assert_eq!(&bytes[4..8], &values.raw().to_le_bytes());
    assert_eq!(&bytes[8..12], &tail.raw().to_le_bytes());
}

#[test]
fn test_bucket_entry_without_values_is_corrupt() {
    let mut arena = Arena::new();
    let ptr = arena.alloc(BucketEntry::SIZE).unwrap();

    // A zeroed slot decodes to a bucket entry with a null value chain
    assert!(matches!(
        arena.read::<BucketEntry>(ptr),
        Err(AgrepError::Format(_))
    ));
}

#[test]
fn test_hash_root_round_trip() {
    let mut arena = Arena::new();
    let mut root = HashRoot::new(0x1234);
    let ptr = arena.create(&root).unwrap();
    let target = arena.create(&ValueEntry { value: 1, next: None }).unwrap();

    root.buckets[17] = Some(target);
    arena.write(ptr, &root).unwrap();

    let stored = arena.read::<HashRoot>(ptr).unwrap();
    assert_eq!(stored.seed, 0x1234);
    assert_eq!(stored.buckets.len(), BUCKET_COUNT);
    assert_eq!(stored.buckets[17], Some(target));
    assert_eq!(stored.buckets.iter().filter(|b| b.is_some()).count(), 1);
}
