//! DuplicateBlockCheck: no two live inodes may own the same block. Inodes are visited in
//! ascending index order, so the first claimant of a block is by construction the lowest-index
//! owner; every later claimant is a duplicate (unique-ownership, first-inode-wins tie-break).
//!
//! Must run after [`super::data_bitmap_check`] so the bitmap's reachability computation sees the
//! image before any duplicate references are cleared.

use super::{BlockRefs, Repair};
use crate::image::Image;
use crate::inode::InodeTable;
use crate::layout;
use crate::report::{Diagnostic, Findings, PassResult};
use crate::walker::{self, Location};

struct DuplicateBlock {
    block: u32,
    owner: usize,
    duplicate: usize,
}

impl Diagnostic for DuplicateBlock {
    fn error_line(&self) -> String {
        format!(
            "block {} is owned by inode {} and inode {}",
            self.block, self.owner, self.duplicate
        )
    }

    fn fix_line(&self) -> String {
        format!(
            "block {}: cleared duplicate reference from inode {} (kept inode {})",
            self.block, self.duplicate, self.owner
        )
    }
}

pub fn run(image: &mut Image, repair: Repair, refs: &mut BlockRefs) -> PassResult {
    let mut findings = Findings::new();
    let mut valid = true;

    for i in 0..layout::INODE_COUNT {
        let inode = InodeTable::read(image, i);
        if !inode.is_live() {
            continue;
        }

        let mut duplicates: Vec<Location> = Vec::new();
        walker::walk(image, &inode, |r| {
            if !layout::is_data_block(r.block) {
                // Out-of-range and metadata-region references are BadBlockCheck's concern,
                // not ours.
                return false;
            }
            match refs.claim(r.block, i) {
                Some(owner) => {
                    valid = false;
                    findings.record(
                        &DuplicateBlock {
                            block: r.block,
                            owner,
                            duplicate: i,
                        },
                        repair.is_on(),
                    );
                    duplicates.push(r.location);
                    false
                }
                None => true,
            }
        });

        if repair.is_on() && !duplicates.is_empty() {
            let mut inode = inode;
            for location in duplicates {
                walker::clear_location(image, &mut inode, location);
            }
            InodeTable::write(image, i, &inode);
        }
    }

    PassResult {
        name: "DuplicateBlockCheck",
        valid,
        findings,
    }
}
