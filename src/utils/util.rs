//! Small numeric and formatting utilities.

use std::fmt;
use std::mem::size_of;

/// Performs the log2 operation on the given integer.
///
/// If the result is undefined (`n == 0`), the function returns `None`.
pub fn log2(n: u64) -> Option<u64> {
    let num_bits = (size_of::<u64>() * 8) as u64;

    let n = num_bits - n.leading_zeros() as u64;
    if n > 0 {
        Some(n - 1)
    } else {
        None
    }
}

/// Structure representing a number of bytes, for human-readable display.
pub struct ByteSize(pub u64);

impl fmt::Display for ByteSize {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut order = log2(self.0).unwrap_or(0) / log2(1024).unwrap();

        let suffix = match order {
            0 => "bytes",
            1 => "KiB",
            2 => "MiB",
            3 => "GiB",
            4 => "TiB",

            _ => {
                order = 0;
                "bytes"
            }
        };

        let unit = 1024usize.pow(order as u32);
        let nbr = self.0 / unit as u64;

        write!(fmt, "{} {}", nbr, suffix)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bytesize() {
        assert_eq!(format!("{}", ByteSize(0)).as_str(), "0 bytes");
        assert_eq!(format!("{}", ByteSize(1023)).as_str(), "1023 bytes");
        assert_eq!(format!("{}", ByteSize(1024)).as_str(), "1 KiB");
        assert_eq!(format!("{}", ByteSize(256 * 1024)).as_str(), "256 KiB");
    }
}
