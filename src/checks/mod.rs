//! The five checker passes and the cross-pass shared state they need: the driver owns
//! [`BlockRefs`] and the reachability vector, passing references into the passes that need them.
//! No pass retains a handle after returning.

pub mod bad_block_check;
pub mod data_bitmap_check;
pub mod duplicate_block_check;
pub mod inode_bitmap_check;
pub mod superblock_check;

use crate::layout;
use crate::report::Diagnostic;

/// Whether a pass is allowed to mutate the image buffer.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Repair {
    On,
    Off,
}

impl Repair {
    pub fn is_on(self) -> bool {
        self == Repair::On
    }
}

/// The duplicate-block pass's shared discovery state: for every absolute block number, whether
/// it has been claimed yet and, if so, by which inode first.
pub struct BlockRefs {
    seen: [bool; layout::TOTAL_BLOCKS],
    first_owner: [usize; layout::TOTAL_BLOCKS],
}

impl BlockRefs {
    pub fn new() -> Self {
        Self {
            seen: [false; layout::TOTAL_BLOCKS],
            first_owner: [0; layout::TOTAL_BLOCKS],
        }
    }

    /// Claims `block` for `inode`. Returns `Some(first_owner)` if the block was already claimed
    /// by a different (necessarily lower-index, since passes visit inodes in ascending order)
    /// inode; returns `None` and records `inode` as the first owner otherwise.
    pub fn claim(&mut self, block: u32, inode: usize) -> Option<usize> {
        let b = block as usize;
        if self.seen[b] {
            Some(self.first_owner[b])
        } else {
            self.seen[b] = true;
            self.first_owner[b] = inode;
            None
        }
    }
}

impl Default for BlockRefs {
    fn default() -> Self {
        Self::new()
    }
}

/// The data-bitmap pass's reachability vector: for every data-slot index (`j` in `[0,
/// DATA_BLOCKS)`, corresponding to absolute block `FIRST_DATA_BLOCK + j`), whether it is
/// referenced by a live inode's root pointer slot.
pub struct ReachableData {
    referenced: [bool; layout::DATA_BLOCKS],
}

impl ReachableData {
    pub fn new() -> Self {
        Self {
            referenced: [false; layout::DATA_BLOCKS],
        }
    }

    pub fn mark(&mut self, slot: usize) {
        self.referenced[slot] = true;
    }

    pub fn is_referenced(&self, slot: usize) -> bool {
        self.referenced[slot]
    }
}

impl Default for ReachableData {
    fn default() -> Self {
        Self::new()
    }
}

/// A diagnostic about a single bitmap bit disagreeing with its derivable source of truth
/// (liveness for the inode bitmap, direct-root reachability for the data bitmap).
pub struct BitmapMismatch {
    pub kind: &'static str,
    pub index: usize,
    pub found: bool,
    pub expected: bool,
}

impl Diagnostic for BitmapMismatch {
    fn error_line(&self) -> String {
        format!(
            "{} bitmap bit {} is {} (expected {})",
            self.kind,
            self.index,
            state(self.found),
            state(self.expected)
        )
    }

    fn fix_line(&self) -> String {
        format!(
            "{} bitmap bit {}: {} -> {}",
            self.kind,
            self.index,
            state(self.found),
            state(self.expected)
        )
    }
}

fn state(set: bool) -> &'static str {
    if set {
        "set"
    } else {
        "clear"
    }
}
