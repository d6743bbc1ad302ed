//! InodeBitmapCheck: the inode bitmap must agree with each inode's liveness predicate, which is
//! the derivable source of truth.

use super::{BitmapMismatch, Repair};
use crate::bitmap::BitmapView;
use crate::image::Image;
use crate::inode::InodeTable;
use crate::layout;
use crate::report::{Findings, PassResult};

pub fn run(image: &mut Image, repair: Repair) -> PassResult {
    let bitmap = BitmapView::inode_bitmap();
    let mut findings = Findings::new();
    let mut valid = true;

    for i in 0..layout::INODE_COUNT {
        let inode = InodeTable::read(image, i);
        let live = inode.is_live();
        let set = bitmap.test(image, i);
        if live != set {
            valid = false;
            let mismatch = BitmapMismatch {
                kind: "inode",
                index: i,
                found: set,
                expected: live,
            };
            findings.record(&mismatch, repair.is_on());
            if repair.is_on() {
                bitmap.set_to(image, i, live);
            }
        }
    }

    PassResult {
        name: "InodeBitmapCheck",
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
    fn all_dead_and_clear_is_valid() {
        let mut image = blank_image();
        let result = run(&mut image, Repair::Off);
        assert!(result.valid);
    }

    #[test]
    fn phantom_liveness_is_detected_and_fixed() {
        let mut image = blank_image();
        BitmapView::inode_bitmap().set(&mut image, 5);
        let result = run(&mut image, Repair::On);
        assert!(!result.valid);
        assert!(!BitmapView::inode_bitmap().test(&image, 5));
    }

    #[test]
    fn bitmap_lag_is_detected_and_fixed() {
        let mut image = blank_image();
        let mut inode = Inode::default();
        inode.links_count = 1;
        InodeTable::write(&mut image, 0, &inode);
        // Bitmap not updated to reflect the now-live inode.
        let result = run(&mut image, Repair::On);
        assert!(!result.valid);
        assert!(BitmapView::inode_bitmap().test(&image, 0));
    }

    #[test]
    fn links_zero_but_dtime_zero_is_not_live() {
        let mut image = blank_image();
        let mut inode = Inode::default();
        inode.links_count = 0;
        inode.dtime = 0;
        InodeTable::write(&mut image, 3, &inode);
        BitmapView::inode_bitmap().set(&mut image, 3);
        let result = run(&mut image, Repair::On);
        assert!(!result.valid);
        assert!(!BitmapView::inode_bitmap().test(&image, 3));
    }

    #[test]
    fn dtime_nonzero_is_not_live_regardless_of_links() {
        let mut image = blank_image();
        let mut inode = Inode::default();
        inode.links_count = 3;
        inode.dtime = 999;
        InodeTable::write(&mut image, 7, &inode);
        BitmapView::inode_bitmap().set(&mut image, 7);
        let result = run(&mut image, Repair::On);
        assert!(!result.valid);
        assert!(!BitmapView::inode_bitmap().test(&image, 7));
    }

    #[test]
    fn check_only_mode_never_mutates() {
        let mut image = blank_image();
        BitmapView::inode_bitmap().set(&mut image, 5);
        let before = image.bytes().to_vec();
        run(&mut image, Repair::Off);
        assert_eq!(image.bytes(), before.as_slice());
    }
}
