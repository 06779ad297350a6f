//! Fixed bounds shared across the substrate.
//!
//! All text that crosses into a host-owned buffer is bounded here, and
//! every truncation goes through [`truncate_utf8`] so a cut never lands
//! inside a multi-byte character.

/// Maximum length in bytes of one formatted diagnostic message, excluding
/// its severity prefix.
pub const MAX_MESSAGE_LEN: usize = 1024;

/// Maximum length in bytes of a composed profiler label.
pub const MAX_LABEL_LEN: usize = 256;

/// Maximum length in bytes of each caller-supplied label component
/// (the probe name and the enclosing region name).
pub const MAX_LABEL_PART_LEN: usize = 64;

/// Fixed prefix of every profiler label.
pub const LABEL_PREFIX: &str = "skein_profiler: ";

/// Separator between the probe name and the region name in a label.
pub const LABEL_SEPARATOR: char = '|';

/// Largest alignment a host allocate callback is assumed to honour.
///
/// Host callbacks only receive a byte count, so they can promise no more
/// than C's `max_align_t`.
pub const HOST_ALIGN: usize = 16;

/// Longest prefix of `s` that fits in `max` bytes and ends on a character
/// boundary.
pub fn truncate_utf8(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
