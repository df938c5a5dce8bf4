//! Hash index over the arena
//!
//! Bucket table with a collision chain per bucket and a value chain per
//! observed hash. The root record is cached here and written back to the
//! arena by [`HashIndex::flush_root`].

use tracing::debug;

use crate::arena::{Arena, LogicalPointer};
use crate::error::{AgrepError, Result};

use super::{murmur3_32, BucketEntry, HashRoot, ValueEntry, BUCKET_COUNT};

/// Handle to an index stored in an [`Arena`]
///
/// The index does not own the arena; every operation borrows it, mutably
/// for inserts and root flushes.
#[derive(Debug)]
pub struct HashIndex {
    /// Where the root record lives in the arena
    root_ptr: LogicalPointer,

    /// In-memory copy of the root; the arena copy is refreshed on flush
    root: HashRoot,
}

impl HashIndex {
    /// Allocate an empty root in `arena`
    ///
    /// On an empty arena this is the first allocation, which places the root
    /// at [`ROOT_POINTER`](super::ROOT_POINTER).
    pub fn create(arena: &mut Arena, seed: u32) -> Result<Self> {
        let root = HashRoot::new(seed);
        let root_ptr = arena.create(&root)?;

        debug!(root = %root_ptr, seed, "Created index root");
        Ok(Self { root_ptr, root })
    }

    /// Reattach to a root already stored in `arena`
    pub fn open(arena: &Arena, root_ptr: LogicalPointer) -> Result<Self> {
        let root = arena.read::<HashRoot>(root_ptr)?;
        Ok(Self { root_ptr, root })
    }

    /// Add `value` under `key`
    ///
    /// The first key seen with a given hash creates its bucket entry; later
    /// values for that hash are appended to the tail of its value chain.
    pub fn insert(&mut self, arena: &mut Arena, key: &[u8], value: u32) -> Result<()> {
        let hash = self.hash(key);
        let bucket = bucket_of(hash);

        let Some(mut current) = self.root.buckets[bucket] else {
            self.root.buckets[bucket] = Some(Self::new_entry(arena, hash, value)?);
            return Ok(());
        };

        let mut walk = ChainWalk::new(arena, "bucket");
        loop {
            walk.step()?;
            let mut entry: BucketEntry = arena.read(current)?;

            // TODO: compare stored keys once entries carry them; equal hashes merge today
            if entry.hash == hash {
                return Self::append_value(arena, entry.values, value);
            }

            match entry.next {
                Some(next) => current = next,
                None => {
                    entry.next = Some(Self::new_entry(arena, hash, value)?);
                    return arena.write(current, &entry);
                }
            }
        }
    }

    /// First value inserted under `key`'s hash
    pub fn lookup_first(&self, arena: &Arena, key: &[u8]) -> Result<Option<u32>> {
        match self.find(arena, self.hash(key))? {
            Some(entry) => Ok(Some(arena.read::<ValueEntry>(entry.values)?.value)),
            None => Ok(None),
        }
    }

    /// Every value inserted under `key`'s hash, in insertion order
    pub fn lookup_all(&self, arena: &Arena, key: &[u8]) -> Result<Vec<u32>> {
        let mut values = Vec::new();
        let Some(entry) = self.find(arena, self.hash(key))? else {
            return Ok(values);
        };

        let mut walk = ChainWalk::new(arena, "value");
        let mut next = Some(entry.values);
        while let Some(ptr) = next {
            walk.step()?;
            let node: ValueEntry = arena.read(ptr)?;
            values.push(node.value);
            next = node.next;
        }
        Ok(values)
    }

    /// Write the cached root back into the arena
    pub fn flush_root(&self, arena: &mut Arena) -> Result<()> {
        arena.write(self.root_ptr, &self.root)
    }

    /// Hash of `key` under this index's seed
    pub fn hash(&self, key: &[u8]) -> u32 {
        murmur3_32(key, self.root.seed)
    }

    pub fn seed(&self) -> u32 {
        self.root.seed
    }

    pub fn root_pointer(&self) -> LogicalPointer {
        self.root_ptr
    }

    /// Number of buckets holding at least one entry
    pub fn occupied_buckets(&self) -> usize {
        self.root.buckets.iter().filter(|head| head.is_some()).count()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn find(&self, arena: &Arena, hash: u32) -> Result<Option<BucketEntry>> {
        let mut walk = ChainWalk::new(arena, "bucket");
        let mut next = self.root.buckets[bucket_of(hash)];
        while let Some(ptr) = next {
            walk.step()?;
            let entry: BucketEntry = arena.read(ptr)?;
            if entry.hash == hash {
                return Ok(Some(entry));
            }
            next = entry.next;
        }
        Ok(None)
    }

    /// Value entry first, then the bucket entry pointing at it
    fn new_entry(arena: &mut Arena, hash: u32, value: u32) -> Result<LogicalPointer> {
        let values = arena.create(&ValueEntry { value, next: None })?;
        let entry = arena.create(&BucketEntry {
            hash,
            values,
            next: None,
        })?;

        debug!(hash, bucket = bucket_of(hash), entry = %entry, "New bucket entry");
        Ok(entry)
    }

    fn append_value(arena: &mut Arena, head: LogicalPointer, value: u32) -> Result<()> {
        let mut walk = ChainWalk::new(arena, "value");
        walk.step()?;
        let mut tail_ptr = head;
        let mut tail: ValueEntry = arena.read(head)?;
        while let Some(next) = tail.next {
            walk.step()?;
            tail_ptr = next;
            tail = arena.read(next)?;
        }

        tail.next = Some(arena.create(&ValueEntry { value, next: None })?);
        arena.write(tail_ptr, &tail)
    }
}

fn bucket_of(hash: u32) -> usize {
    hash as usize % BUCKET_COUNT
}

/// Step budget for following `next` links read back from disk
///
/// A well-formed chain never visits more nodes than the arena holds records,
/// so running past that count means the links loop.
struct ChainWalk {
    remaining: usize,
    kind: &'static str,
}

impl ChainWalk {
    fn new(arena: &Arena, kind: &'static str) -> Self {
        Self {
            remaining: arena.record_count(),
            kind,
        }
    }

    fn step(&mut self) -> Result<()> {
        self.remaining = self.remaining.checked_sub(1).ok_or_else(|| {
            AgrepError::Format(format!("cycle in {} chain", self.kind))
        })?;
        Ok(())
    }
}
