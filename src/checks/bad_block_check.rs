//! BadBlockCheck: no reference anywhere in a live inode's tree may name a block number outside
//! `[0, TOTAL_BLOCKS)` — the bounded-pointer rule.
//!
//! Runs independently of [`super::BlockRefs`]; a block can be simultaneously a duplicate *and*
//! out of range, and each pass reports it on its own terms.

use super::Repair;
use crate::image::Image;
use crate::inode::InodeTable;
use crate::layout;
use crate::report::{Diagnostic, Findings, PassResult};
use crate::walker::{self, Location};

struct OutOfRangeBlock {
    inode: usize,
    block: u32,
}

impl Diagnostic for OutOfRangeBlock {
    fn error_line(&self) -> String {
        format!(
            "inode {} references block {}, outside [0, {})",
            self.inode,
            self.block,
            layout::TOTAL_BLOCKS
        )
    }

    fn fix_line(&self) -> String {
        format!(
            "inode {}: cleared out-of-range reference to block {}",
            self.inode, self.block
        )
    }
}

pub fn run(image: &mut Image, repair: Repair) -> PassResult {
    let mut findings = Findings::new();
    let mut valid = true;

    for i in 0..layout::INODE_COUNT {
        let inode = InodeTable::read(image, i);
        if !inode.is_live() {
            continue;
        }

        let mut bad: Vec<Location> = Vec::new();
        walker::walk(image, &inode, |r| {
            if !layout::is_in_bounds(r.block) {
                valid = false;
                findings.record(
                    &OutOfRangeBlock {
                        inode: i,
                        block: r.block,
                    },
                    repair.is_on(),
                );
                bad.push(r.location);
            }
            // Always try to continue; the walker itself refuses to dereference an
            // out-of-range root regardless of what we return here.
            true
        });

        if repair.is_on() && !bad.is_empty() {
            let mut inode = inode;
            for location in bad {
                walker::clear_location(image, &mut inode, location);
            }
            InodeTable::write(image, i, &inode);
        }
    }

    PassResult {
        name: "BadBlockCheck",
        valid,
        findings,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::inode::Inode;
    use crate::layout::IMAGE_SIZE;

    fn blank_image() -> Image {
        Image::from_bytes(vec![0u8; IMAGE_SIZE])
    }

    #[test]
    fn in_range_references_are_valid() {
        let mut image = blank_image();
        let mut inode = Inode::default();
        inode.links_count = 1;
        inode.direct_block = 63;
        InodeTable::write(&mut image, 0, &inode);
        let result = run(&mut image, Repair::Off);
        assert!(result.valid);
    }

    #[test]
    fn direct_block_at_exactly_total_blocks_is_bad() {
        let mut image = blank_image();
        let mut inode = Inode::default();
        inode.links_count = 1;
        inode.direct_block = layout::TOTAL_BLOCKS as u32;
        InodeTable::write(&mut image, 0, &inode);
        let result = run(&mut image, Repair::On);
        assert!(!result.valid);
        let fixed = InodeTable::read(&image, 0);
        assert_eq!(fixed.direct_block, 0);
    }

    #[test]
    fn out_of_range_indirect_root_is_reported_but_not_descended() {
        let mut image = blank_image();
        let mut inode = Inode::default();
        inode.links_count = 1;
        inode.single_indirect = 9999;
        InodeTable::write(&mut image, 0, &inode);
        let result = run(&mut image, Repair::On);
        assert!(!result.valid);
        let fixed = InodeTable::read(&image, 0);
        assert_eq!(fixed.single_indirect, 0);
    }

    #[test]
    fn dead_inode_is_ignored() {
        let mut image = blank_image();
        let mut inode = Inode::default();
        inode.links_count = 0;
        inode.direct_block = 500;
        InodeTable::write(&mut image, 0, &inode);
        let result = run(&mut image, Repair::Off);
        assert!(result.valid);
    }

    #[test]
    fn check_only_mode_never_mutates() {
        let mut image = blank_image();
        let mut inode = Inode::default();
        inode.links_count = 1;
        inode.direct_block = 200;
        InodeTable::write(&mut image, 0, &inode);
        let before = image.bytes().to_vec();
        run(&mut image, Repair::Off);
        assert_eq!(image.bytes(), before.as_slice());
    }
}
