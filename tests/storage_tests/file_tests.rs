//! Tests for index files
//!
//! These tests verify:
//! - Superblock and raw layouts on disk
//! - Format auto-detection on load
//! - Corruption detection (size, checksum, version, page count)

use std::fs;
use std::path::PathBuf;

use agrep::arena::{Arena, MAX_PAYLOAD, PAGE_SIZE};
use agrep::index::{HashIndex, ROOT_POINTER};
use agrep::storage::{IndexFile, Superblock};
use agrep::{AgrepError, FileFormat};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_file() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("words.idx");
    (temp_dir, path)
}

/// Index spread over several pages, root flushed
fn build_index(entries: u32) -> (Arena, HashIndex) {
    let mut arena = Arena::new();
    let mut index = HashIndex::create(&mut arena, 0x1234).unwrap();
    for i in 0..entries {
        index
            .insert(&mut arena, format!("entry{}", i).as_bytes(), i)
            .unwrap();
    }
    index.flush_root(&mut arena).unwrap();
    (arena, index)
}

// =============================================================================
// Superblock Format Tests
// =============================================================================

#[test]
fn test_superblock_file_layout() {
    let (_temp, path) = setup_temp_file();
    let (arena, index) = build_index(2_000);

    IndexFile::write(&path, &arena, index.root_pointer(), FileFormat::Superblock).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), (arena.page_count() + 1) * PAGE_SIZE);
    assert_eq!(&bytes[0..4], b"AGIX");
    assert_eq!(&bytes[4..6], &1u16.to_le_bytes());
    // Page 0 follows the superblock
    assert_eq!(&bytes[PAGE_SIZE..PAGE_SIZE + 2], &0u16.to_le_bytes());
}

#[test]
fn test_superblock_round_trip() {
    let (_temp, path) = setup_temp_file();
    let (arena, index) = build_index(2_000);
    IndexFile::write(&path, &arena, index.root_pointer(), FileFormat::Superblock).unwrap();

    let loaded = IndexFile::read(&path).unwrap();

    assert_eq!(loaded.format, FileFormat::Superblock);
    assert_eq!(loaded.root, index.root_pointer());
    assert_eq!(loaded.arena.page_count(), arena.page_count());

    let reopened = HashIndex::open(&loaded.arena, loaded.root).unwrap();
    for i in (0..2_000u32).step_by(13) {
        let key = format!("entry{}", i);
        assert_eq!(
            reopened.lookup_first(&loaded.arena, key.as_bytes()).unwrap(),
            Some(i)
        );
    }
}

#[test]
fn test_superblock_keeps_non_default_root() {
    let (_temp, path) = setup_temp_file();
    let mut arena = Arena::new();
    arena.alloc(MAX_PAYLOAD).unwrap();
    let mut index = HashIndex::create(&mut arena, 7).unwrap();
    index.insert(&mut arena, b"abc", 3).unwrap();
    index.flush_root(&mut arena).unwrap();

    IndexFile::write(&path, &arena, index.root_pointer(), FileFormat::Superblock).unwrap();
    let loaded = IndexFile::read(&path).unwrap();

    assert_eq!(loaded.root, index.root_pointer());
    let reopened = HashIndex::open(&loaded.arena, loaded.root).unwrap();
    assert_eq!(reopened.seed(), 7);
    assert_eq!(reopened.lookup_first(&loaded.arena, b"abc").unwrap(), Some(3));
}

#[test]
fn test_superblock_block_encoding() {
    let sb = Superblock::new(3, ROOT_POINTER, 0xAABB_CCDD);

    let block = sb.to_block().unwrap();

    assert_eq!(block.len(), PAGE_SIZE);
    assert!(Superblock::is_superblock(&block));
    assert!(block[26..].iter().all(|&b| b == 0));
    assert_eq!(Superblock::from_block(&block).unwrap(), sb);
}

// =============================================================================
// Raw Format Tests
// =============================================================================

#[test]
fn test_raw_file_is_pages_only() {
    let (_temp, path) = setup_temp_file();
    let (arena, index) = build_index(2_000);

    IndexFile::write(&path, &arena, index.root_pointer(), FileFormat::Raw).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), arena.page_count() * PAGE_SIZE);
    assert_eq!(&bytes[0..2], &0u16.to_le_bytes());
}

#[test]
fn test_raw_round_trip_recovers_well_known_root() {
    let (_temp, path) = setup_temp_file();
    let (arena, index) = build_index(500);
    IndexFile::write(&path, &arena, index.root_pointer(), FileFormat::Raw).unwrap();

    let loaded = IndexFile::read(&path).unwrap();

    assert_eq!(loaded.format, FileFormat::Raw);
    assert_eq!(loaded.root.raw(), ROOT_POINTER);
    let reopened = HashIndex::open(&loaded.arena, loaded.root).unwrap();
    assert_eq!(reopened.lookup_first(&loaded.arena, b"entry42").unwrap(), Some(42));
}

#[test]
fn test_raw_rejects_root_elsewhere() {
    let (_temp, path) = setup_temp_file();
    let mut arena = Arena::new();
    arena.alloc(16).unwrap();
    let index = HashIndex::create(&mut arena, 0x1234).unwrap();

    let result = IndexFile::write(&path, &arena, index.root_pointer(), FileFormat::Raw);

    assert!(matches!(result, Err(AgrepError::Format(_))));
}

#[test]
fn test_raw_file_readable_by_plain_arena_load() {
    let (_temp, path) = setup_temp_file();
    let (arena, index) = build_index(100);
    IndexFile::write(&path, &arena, index.root_pointer(), FileFormat::Raw).unwrap();

    let plain = Arena::load(&path).unwrap();

    assert_eq!(plain.page_count(), arena.page_count());
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_read_rejects_half_page_file() {
    let (_temp, path) = setup_temp_file();
    fs::write(&path, vec![0u8; PAGE_SIZE * 3 / 2]).unwrap();

    assert!(matches!(IndexFile::read(&path), Err(AgrepError::Format(_))));
}

#[test]
fn test_read_detects_flipped_page_byte() {
    let (_temp, path) = setup_temp_file();
    let (arena, index) = build_index(100);
    IndexFile::write(&path, &arena, index.root_pointer(), FileFormat::Superblock).unwrap();

    let mut bytes = fs::read(&path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    fs::write(&path, bytes).unwrap();

    let result = IndexFile::read(&path);

    assert!(matches!(result, Err(AgrepError::Format(msg)) if msg.contains("checksum")));
}

#[test]
fn test_read_rejects_unknown_version() {
    let (_temp, path) = setup_temp_file();
    let (arena, index) = build_index(10);
    IndexFile::write(&path, &arena, index.root_pointer(), FileFormat::Superblock).unwrap();

    let mut bytes = fs::read(&path).unwrap();
    bytes[4..6].copy_from_slice(&99u16.to_le_bytes());
    fs::write(&path, bytes).unwrap();

    assert!(matches!(IndexFile::read(&path), Err(AgrepError::Format(_))));
}

#[test]
fn test_read_rejects_extra_blocks() {
    let (_temp, path) = setup_temp_file();
    let (arena, index) = build_index(10);
    IndexFile::write(&path, &arena, index.root_pointer(), FileFormat::Superblock).unwrap();

    let mut bytes = fs::read(&path).unwrap();
    bytes.extend_from_slice(&vec![0u8; PAGE_SIZE]);
    fs::write(&path, bytes).unwrap();

    assert!(matches!(IndexFile::read(&path), Err(AgrepError::Format(_))));
}

#[test]
fn test_read_missing_file() {
    let (_temp, path) = setup_temp_file();

    assert!(matches!(IndexFile::read(&path), Err(AgrepError::Io(_))));
}
