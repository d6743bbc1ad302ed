//! The checker's top-level state machine: load, run every pass once, and — when
//! running with `--fix` and at least one pass found something — run every pass a second time in
//! check-only mode so the report reflects the image as it actually sits on disk afterward.

use crate::checks::{self, BlockRefs, Repair, ReachableData};
use crate::image::Image;
use crate::report::{self, PassResult};
use std::fs::File;
use std::path::Path;

/// What to do with an image, and whether repairs are applied.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Check,
    Fix,
}

/// A fatal, non-structural failure: the image could not be loaded or flushed at all.
pub struct Fatal(pub String);

/// Runs every check pass once, in the fixed order the shared cross-pass state requires:
/// SuperblockCheck and InodeBitmapCheck first (neither reads the others' state), then
/// DataBitmapCheck (its reachability computation must see the image before any block reference is
/// cleared), then DuplicateBlockCheck and finally BadBlockCheck.
fn run_all(image: &mut Image, repair: Repair) -> Vec<PassResult> {
    let mut results = Vec::new();
    results.push(checks::superblock_check::run(image, repair));
    results.push(checks::inode_bitmap_check::run(image, repair));

    let mut reachable = ReachableData::new();
    results.push(checks::data_bitmap_check::run(image, repair, &mut reachable));

    let mut refs = BlockRefs::new();
    results.push(checks::duplicate_block_check::run(image, repair, &mut refs));

    results.push(checks::bad_block_check::run(image, repair));
    results
}

/// Loads `path`, runs the passes according to `mode`, prints the report, and — in [`Mode::Fix`] —
/// flushes the repaired image back to disk. Returns whether the image was (or, after a fix, now
/// is) fully consistent; fatal I/O failures are reported as `Err`.
pub fn run(path: &Path, mode: Mode) -> Result<bool, Fatal> {
    let (mut image, mut file) = Image::load(path).map_err(|e| Fatal(e.to_string()))?;

    let repair = match mode {
        Mode::Check => Repair::Off,
        Mode::Fix => Repair::On,
    };
    let results = run_all(&mut image, repair);
    let found_errors = results.iter().any(|r| !r.valid);
    for result in &results {
        report::print_section(result);
    }

    if mode == Mode::Fix {
        report::print_summary(&results, false);
        let final_valid = if found_errors {
            let post = run_all(&mut image, Repair::Off);
            for result in &post {
                report::print_section(result);
            }
            report::print_summary(&post, true)
        } else {
            true
        };
        flush(&image, &mut file, path)?;
        return Ok(final_valid);
    }

    Ok(report::print_summary(&results, false))
}

fn flush(image: &Image, file: &mut File, path: &Path) -> Result<(), Fatal> {
    image
        .flush(file)
        .map_err(|e| Fatal(format!("failed to write {}: {e}", path.display())))
}
