//! Fixed-capacity profiler labels.
//!
//! A label is `LABEL_PREFIX + name + '|' + region`, each component cut to
//! [`MAX_LABEL_PART_LEN`] bytes and the whole to [`MAX_LABEL_LEN`] bytes.
//! Composition never allocates and never fails; overflow is dropped.

use std::fmt;

use skein_core::limits::{
    truncate_utf8, LABEL_PREFIX, LABEL_SEPARATOR, MAX_LABEL_LEN, MAX_LABEL_PART_LEN,
};

/// A profiler label stored inline.
#[derive(Clone, Copy)]
pub struct Label {
    buf: [u8; MAX_LABEL_LEN],
    len: usize,
}

impl Label {
    /// Compose the label for probe `name` in region `region`.
    pub fn compose(name: &str, region: &str) -> Self {
        let mut label = Self::empty();
        label.push(LABEL_PREFIX);
        label.push(truncate_utf8(name, MAX_LABEL_PART_LEN));
        let mut sep = [0u8; 4];
        label.push(LABEL_SEPARATOR.encode_utf8(&mut sep));
        label.push(truncate_utf8(region, MAX_LABEL_PART_LEN));
        label
    }

    /// An empty label.
    pub const fn empty() -> Self {
        Self {
            buf: [0; MAX_LABEL_LEN],
            len: 0,
        }
    }

    /// The label text.
    pub fn as_str(&self) -> &str {
        // Only whole UTF-8 sequences are ever copied in.
        std::str::from_utf8(&self.buf[..self.len]).unwrap_or_default()
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the label is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn push(&mut self, s: &str) {
        let part = truncate_utf8(s, MAX_LABEL_LEN - self.len);
        self.buf[self.len..self.len + part.len()].copy_from_slice(part.as_bytes());
        self.len += part.len();
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Label {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn compose_joins_components() {
        let l = Label::compose("blur", "compute_curvature");
        assert_eq!(l.as_str(), "skein_profiler: blur|compute_curvature");
        assert_eq!(l.to_string(), l.as_str());
    }

    #[test]
    fn components_are_cut_to_part_limit() {
        let long = "n".repeat(200);
        let l = Label::compose(&long, &long);
        let expected = format!(
            "{LABEL_PREFIX}{}|{}",
            "n".repeat(MAX_LABEL_PART_LEN),
            "n".repeat(MAX_LABEL_PART_LEN)
        );
        assert_eq!(l.as_str(), expected);
    }

    #[test]
    fn multibyte_components_cut_on_boundaries() {
        // 3-byte characters: 64 is not a multiple of 3.
        let name = "€".repeat(40);
        let l = Label::compose(&name, "r");
        let name_part = &l.as_str()[LABEL_PREFIX.len()..l.len() - 2];
        assert_eq!(name_part.len(), 63);
        assert!(name_part.chars().all(|c| c == '€'));
    }

    #[test]
    fn empty_label() {
        let l = Label::empty();
        assert!(l.is_empty());
        assert_eq!(l.as_str(), "");
    }

    proptest! {
        #[test]
        fn composed_label_is_bounded(name in ".{0,100}", region in ".{0,100}") {
            let l = Label::compose(&name, &region);
            prop_assert!(l.len() <= MAX_LABEL_LEN);
            prop_assert!(l.as_str().starts_with(LABEL_PREFIX));
            prop_assert!(l.as_str().contains(LABEL_SEPARATOR));
        }
    }
}
