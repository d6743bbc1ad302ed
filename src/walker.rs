//! The block-pointer walker: a single event-producing traversal over an inode's direct and three
//! levels of indirect block pointers.
//!
//! Factoring the whole direct/L1/L2/L3 traversal into one generator that the duplicate-block and
//! bad-block passes merely subscribe to, instead of each re-implementing the indirection nesting
//! on its own, keeps the two passes from drifting out of sync with each other.

use crate::image::Image;
use crate::inode::Inode;
use crate::layout;

/// The role a reference plays, tagging which pointer/entry produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Direct,
    L1Root,
    L1Leaf,
    L2Root,
    L2Mid,
    L2Leaf,
    L3Root,
    L3Upper,
    L3Mid,
    L3Leaf,
}

impl Role {
    /// Whether this role names a root/intermediate pointer (one that can be descended into),
    /// as opposed to a terminal data-block leaf.
    pub fn is_descendable(self) -> bool {
        matches!(
            self,
            Role::L1Root | Role::L2Root | Role::L2Mid | Role::L3Root | Role::L3Upper | Role::L3Mid
        )
    }
}

/// One of the four pointer fields stored directly in an inode record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Direct,
    Single,
    Double,
    Triple,
}

/// Where a reference's block number is physically stored, for passes that need to repair it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    /// One of the inode's own four pointer fields.
    InodeSlot(Slot),
    /// Entry `index` of the indirect block numbered `block`.
    IndirectEntry { block: u32, index: usize },
}

/// One reference yielded by the walker.
#[derive(Clone, Copy, Debug)]
pub struct Reference {
    pub role: Role,
    pub block: u32,
    pub location: Location,
}

/// Walks every reference of `inode`, calling `on_ref` for each in the fixed order: direct, then
/// the single-indirect subtree, then double-indirect, then triple-indirect.
///
/// `on_ref` returns whether the walker should descend into the reference's subtree; the return
/// value is ignored for non-descendable roles (`Direct` and the `*Leaf` roles). Regardless of
/// what `on_ref` returns, the walker never dereferences a block number outside `[FIRST_DATA_BLOCK,
/// TOTAL_BLOCKS)` — such a pointer is still yielded as a reference, just not followed.
pub fn walk(image: &Image, inode: &Inode, mut on_ref: impl FnMut(Reference) -> bool) {
    if inode.direct_block != 0 {
        on_ref(Reference {
            role: Role::Direct,
            block: inode.direct_block,
            location: Location::InodeSlot(Slot::Direct),
        });
    }
    walk_single(image, inode.single_indirect, &mut on_ref);
    walk_double(image, inode.double_indirect, &mut on_ref);
    walk_triple(image, inode.triple_indirect, &mut on_ref);
}

fn walk_single(image: &Image, root: u32, on_ref: &mut impl FnMut(Reference) -> bool) {
    if root == 0 {
        return;
    }
    let descend = on_ref(Reference {
        role: Role::L1Root,
        block: root,
        location: Location::InodeSlot(Slot::Single),
    });
    if descend && layout::is_data_block(root) {
        for (index, leaf) in entries(image, root) {
            if leaf == 0 {
                continue;
            }
            on_ref(Reference {
                role: Role::L1Leaf,
                block: leaf,
                location: Location::IndirectEntry {
                    block: root,
                    index,
                },
            });
        }
    }
}

fn walk_double(image: &Image, root: u32, on_ref: &mut impl FnMut(Reference) -> bool) {
    if root == 0 {
        return;
    }
    let descend_root = on_ref(Reference {
        role: Role::L2Root,
        block: root,
        location: Location::InodeSlot(Slot::Double),
    });
    if !(descend_root && layout::is_data_block(root)) {
        return;
    }
    for (mid_index, mid) in entries(image, root) {
        if mid == 0 {
            continue;
        }
        let descend_mid = on_ref(Reference {
            role: Role::L2Mid,
            block: mid,
            location: Location::IndirectEntry {
                block: root,
                index: mid_index,
            },
        });
        if !(descend_mid && layout::is_data_block(mid)) {
            continue;
        }
        for (leaf_index, leaf) in entries(image, mid) {
            if leaf == 0 {
                continue;
            }
            on_ref(Reference {
                role: Role::L2Leaf,
                block: leaf,
                location: Location::IndirectEntry {
                    block: mid,
                    index: leaf_index,
                },
            });
        }
    }
}

fn walk_triple(image: &Image, root: u32, on_ref: &mut impl FnMut(Reference) -> bool) {
    if root == 0 {
        return;
    }
    let descend_root = on_ref(Reference {
        role: Role::L3Root,
        block: root,
        location: Location::InodeSlot(Slot::Triple),
    });
    if !(descend_root && layout::is_data_block(root)) {
        return;
    }
    for (upper_index, upper) in entries(image, root) {
        if upper == 0 {
            continue;
        }
        let descend_upper = on_ref(Reference {
            role: Role::L3Upper,
            block: upper,
            location: Location::IndirectEntry {
                block: root,
                index: upper_index,
            },
        });
        if !(descend_upper && layout::is_data_block(upper)) {
            continue;
        }
        for (mid_index, mid) in entries(image, upper) {
            if mid == 0 {
                continue;
            }
            let descend_mid = on_ref(Reference {
                role: Role::L3Mid,
                block: mid,
                location: Location::IndirectEntry {
                    block: upper,
                    index: mid_index,
                },
            });
            if !(descend_mid && layout::is_data_block(mid)) {
                continue;
            }
            for (leaf_index, leaf) in entries(image, mid) {
                if leaf == 0 {
                    continue;
                }
                on_ref(Reference {
                    role: Role::L3Leaf,
                    block: leaf,
                    location: Location::IndirectEntry {
                        block: mid,
                        index: leaf_index,
                    },
                });
            }
        }
    }
}

/// Iterates the 1024 little-endian `u32` entries of indirect block `block`.
fn entries(image: &Image, block: u32) -> impl Iterator<Item = (usize, u32)> + '_ {
    let base = layout::block_offset(block);
    (0..layout::ENTRIES_PER_INDIRECT_BLOCK).map(move |i| (i, image.read_u32(base + i * layout::INDIRECT_ENTRY_SIZE)))
}

/// Zeroes out the storage location of a reference: the inode slot it came from, or the indirect
/// block entry.
pub fn clear_location(image: &mut Image, inode: &mut Inode, location: Location) {
    match location {
        Location::InodeSlot(Slot::Direct) => inode.direct_block = 0,
        Location::InodeSlot(Slot::Single) => inode.single_indirect = 0,
        Location::InodeSlot(Slot::Double) => inode.double_indirect = 0,
        Location::InodeSlot(Slot::Triple) => inode.triple_indirect = 0,
        Location::IndirectEntry { block, index } => {
            let offset = layout::block_offset(block) + index * layout::INDIRECT_ENTRY_SIZE;
            image.write_u32(offset, 0);
        }
    }
}
