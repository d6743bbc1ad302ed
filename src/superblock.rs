//! The on-disk superblock record and the well-formedness check.

use crate::image::Image;
use crate::layout;
use crate::report::Diagnostic;
use std::mem::size_of;

/// The on-disk superblock, exactly one block (4096 bytes) wide.
///
/// The nine named fields sum to 34 bytes; the reserved padding is sized to 4062 bytes so the
/// record occupies a full block exactly (see DESIGN.md for how the reserved count was derived).
#[repr(C, packed)]
#[derive(Clone, Copy)]
pub struct Superblock {
    pub magic: u16,
    pub block_size: u32,
    pub total_blocks: u32,
    pub inode_bitmap_block: u32,
    pub data_bitmap_block: u32,
    pub inode_table_start: u32,
    pub first_data_block: u32,
    pub inode_size: u32,
    pub inode_count: u32,
    _reserved: [u8; 4062],
}

const _: () = assert!(size_of::<Superblock>() == layout::BLOCK_SIZE);

impl Superblock {
    /// The well-formed superblock, as it should read on a pristine image.
    pub const EXPECTED: Superblock = Superblock {
        magic: layout::MAGIC,
        block_size: layout::BLOCK_SIZE as u32,
        total_blocks: layout::TOTAL_BLOCKS as u32,
        inode_bitmap_block: layout::INODE_BITMAP_BLOCK,
        data_bitmap_block: layout::DATA_BITMAP_BLOCK,
        inode_table_start: layout::INODE_TABLE_START,
        first_data_block: layout::FIRST_DATA_BLOCK,
        inode_size: layout::INODE_SIZE as u32,
        inode_count: layout::INODE_COUNT as u32,
        _reserved: [0; 4062],
    };

    /// Reads the superblock out of the image buffer.
    pub fn read(image: &Image) -> Self {
        image.read_struct(layout::block_offset(layout::SUPERBLOCK_BLOCK))
    }

    /// Writes the superblock back into the image buffer.
    pub fn write(&self, image: &mut Image) {
        image.write_struct(layout::block_offset(layout::SUPERBLOCK_BLOCK), self);
    }
}

/// One mismatching superblock field: its name, the value found on disk, and the expected value.
pub struct FieldMismatch {
    pub field: &'static str,
    pub found: u32,
    pub expected: u32,
}

impl Diagnostic for FieldMismatch {
    fn error_line(&self) -> String {
        format!(
            "superblock field `{}` is {} (expected {})",
            self.field, self.found, self.expected
        )
    }

    fn fix_line(&self) -> String {
        format!(
            "superblock field `{}`: {} -> {}",
            self.field, self.found, self.expected
        )
    }
}

/// Compares every field of `sb` against [`Superblock::EXPECTED`], returning one [`FieldMismatch`]
/// per disagreement. Reserved bytes are never checked.
pub fn mismatches(sb: &Superblock) -> Vec<FieldMismatch> {
    macro_rules! field {
        ($out:ident, $name:ident) => {
            let found = sb.$name as u32;
            let expected = Superblock::EXPECTED.$name as u32;
            if found != expected {
                $out.push(FieldMismatch {
                    field: stringify!($name),
                    found,
                    expected,
                });
            }
        };
    }

    let mut out = Vec::new();
    field!(out, magic);
    field!(out, block_size);
    field!(out, total_blocks);
    field!(out, inode_bitmap_block);
    field!(out, data_bitmap_block);
    field!(out, inode_table_start);
    field!(out, first_data_block);
    field!(out, inode_size);
    field!(out, inode_count);
    out
}

/// Overwrites every mismatching field of `sb` with its expected value.
pub fn repair(sb: &mut Superblock) {
    sb.magic = Superblock::EXPECTED.magic;
    sb.block_size = Superblock::EXPECTED.block_size;
    sb.total_blocks = Superblock::EXPECTED.total_blocks;
    sb.inode_bitmap_block = Superblock::EXPECTED.inode_bitmap_block;
    sb.data_bitmap_block = Superblock::EXPECTED.data_bitmap_block;
    sb.inode_table_start = Superblock::EXPECTED.inode_table_start;
    sb.first_data_block = Superblock::EXPECTED.first_data_block;
    sb.inode_size = Superblock::EXPECTED.inode_size;
    sb.inode_count = Superblock::EXPECTED.inode_count;
}
