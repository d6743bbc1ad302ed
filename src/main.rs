//! `vsfsck`: an offline consistency checker and repair tool for a fixed-layout VSFS image.

mod bitmap;
mod checks;
mod driver;
mod image;
mod inode;
mod layout;
mod report;
mod superblock;
mod walker;

use driver::Mode;
use std::path::PathBuf;
use std::process::exit;
use utils::error;

struct Args {
    image: PathBuf,
    fix: bool,
}

fn parse_args(bin: &str, mut args: std::env::ArgsOs) -> Args {
    let mut image = None;
    let mut fix = false;

    for arg in &mut args {
        match arg.to_str() {
            Some("--fix") => fix = true,
            Some("-h") | Some("--help") => print_usage(bin),
            _ if image.is_none() => image = Some(PathBuf::from(arg)),
            _ => error(bin, "too many arguments"),
        }
    }

    let Some(image) = image else {
        print_usage(bin);
    };
    Args { image, fix }
}

fn print_usage(bin: &str) -> ! {
    eprintln!("usage: {bin} [--fix] <image>");
    exit(1);
}

fn main() {
    let (bin, args) = utils::args();
    let args = parse_args(&bin, args);

    let mode = if args.fix { Mode::Fix } else { Mode::Check };
    match driver::run(&args.image, mode) {
        // The image loaded and every pass ran: exit 0 regardless of what they found or fixed.
        // Only argument errors, open/read/flush failures and size mismatches are exit 1.
        Ok(_valid) => exit(0),
        Err(fatal) => error(&bin, fatal.0),
    }
}
