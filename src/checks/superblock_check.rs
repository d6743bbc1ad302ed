//! SuperblockCheck: every superblock field must equal its expected constant.

use super::Repair;
use crate::image::Image;
use crate::report::{Findings, PassResult};
use crate::superblock::{self, Superblock};

pub fn run(image: &mut Image, repair: Repair) -> PassResult {
    let mut sb = Superblock::read(image);
    let mismatches = superblock::mismatches(&sb);
    let valid = mismatches.is_empty();

    let mut findings = Findings::new();
    for mismatch in &mismatches {
        findings.record(mismatch, repair.is_on());
    }

    if repair.is_on() && !valid {
        superblock::repair(&mut sb);
        sb.write(image);
    }

    PassResult {
        name: "SuperblockCheck",
        valid,
        findings,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::layout::IMAGE_SIZE;

    fn image_with(sb: Superblock) -> Image {
        let mut image = Image::from_bytes(vec![0u8; IMAGE_SIZE]);
        sb.write(&mut image);
        image
    }

    #[test]
    fn pristine_superblock_is_valid() {
        let mut image = image_with(Superblock::EXPECTED);
        let result = run(&mut image, Repair::Off);
        assert!(result.valid);
        assert!(result.findings.is_empty());
    }

    #[test]
    fn check_only_mode_never_mutates() {
        let mut sb = Superblock::EXPECTED;
        sb.magic = 0;
        let mut image = image_with(sb);
        let before = image.bytes().to_vec();
        run(&mut image, Repair::Off);
        assert_eq!(image.bytes(), before.as_slice());
    }

    #[test]
    fn fix_mode_restores_expected_values() {
        let mut sb = Superblock::EXPECTED;
        sb.magic = 0xBEEF;
        sb.total_blocks = 1;
        let mut image = image_with(sb);
        let result = run(&mut image, Repair::On);
        assert!(!result.valid, "pass must report the corruption it found");
        assert!(!result.findings.is_empty());

        let fixed = Superblock::read(&image);
        assert!(superblock::mismatches(&fixed).is_empty());
    }

    #[test]
    fn second_run_after_fix_is_clean() {
        let mut sb = Superblock::EXPECTED;
        sb.inode_count = 5;
        let mut image = image_with(sb);
        run(&mut image, Repair::On);
        let result = run(&mut image, Repair::On);
        assert!(result.valid);
    }
}
