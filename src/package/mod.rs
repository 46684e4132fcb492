//! OPC package container
//!
//! `.docx` and `.pptx` files are ZIP archives of XML parts and media
//! ("Open Packaging Conventions"). This module reads an archive into an
//! ordered part list and writes one back deterministically: every part is
//! deflated, timestamps are fixed, and `[Content_Types].xml` always comes
//! first, so identical inputs produce identical output bytes.
//!
//! The reader walks the central directory rather than streaming local
//! headers, which keeps entries written with data descriptors readable,
//! and verifies each part's CRC-32.

mod read;
mod write;

use thiserror::Error;

pub(crate) const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Errors raised by the container layer
#[derive(Debug, Error)]
pub enum PackageError {
    /// The bytes are not a ZIP archive (or are truncated)
    #[error("not a zip archive: {0}")]
    Format(String),

    /// A ZIP feature this crate does not need for OOXML (encryption,
    /// exotic compression methods, 64-bit records)
    #[error("unsupported zip feature: {0}")]
    Unsupported(String),

    /// An entry failed its CRC-32 or size check
    #[error("corrupt archive entry: {0}")]
    Corrupt(String),

    /// A required part is absent from the package
    #[error("missing package part: {0}")]
    MissingPart(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PackageError>;

/// An OOXML package: named parts in archive order
#[derive(Debug, Clone, Default)]
pub struct Package {
    parts: Vec<(String, Vec<u8>)>,
}

impl Package {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an archive from bytes, verifying entry checksums.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self {
            parts: read::parse_archive(data)?,
        })
    }

    /// Part bytes by name, e.g. `word/document.xml`
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, data)| data.as_slice())
    }

    /// Like [`part`](Self::part) but a missing part is an error
    pub fn expect_part(&self, name: &str) -> Result<&[u8]> {
        self.part(name)
            .ok_or_else(|| PackageError::MissingPart(name.to_string()))
    }

    /// Insert or replace a part, keeping first-insertion order
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        if let Some(slot) = self.parts.iter_mut().find(|(n, _)| n == name) {
            slot.1 = data;
        } else {
            self.parts.push((name.to_string(), data));
        }
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Serialize the package to archive bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        // Readers expect the content-type map up front.
        let mut ordered: Vec<&(String, Vec<u8>)> = Vec::with_capacity(self.parts.len());
        if let Some(ct) = self.parts.iter().find(|(n, _)| n == CONTENT_TYPES_PART) {
            ordered.push(ct);
        }
        for part in &self.parts {
            if part.0 != CONTENT_TYPES_PART {
                ordered.push(part);
            }
        }
        write::write_archive(&ordered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Package {
        let mut pkg = Package::new();
        pkg.set_part("word/document.xml", b"<w:document/>".to_vec());
        pkg.set_part(CONTENT_TYPES_PART, b"<Types/>".to_vec());
        pkg.set_part("word/media/image1.png", vec![0u8, 159, 146, 150, 0, 255]);
        pkg
    }

    #[test]
    fn roundtrip_preserves_all_parts() {
        let pkg = sample();
        let bytes = pkg.to_bytes().expect("write");
        let back = Package::from_bytes(&bytes).expect("read");
        assert_eq!(back.len(), 3);
        assert_eq!(back.part("word/document.xml"), Some(&b"<w:document/>"[..]));
        assert_eq!(
            back.part("word/media/image1.png"),
            Some(&[0u8, 159, 146, 150, 0, 255][..])
        );
    }

    #[test]
    fn content_types_is_first_entry() {
        let bytes = sample().to_bytes().expect("write");
        let back = Package::from_bytes(&bytes).expect("read");
        assert_eq!(back.part_names().next(), Some(CONTENT_TYPES_PART));
    }

    #[test]
    fn deterministic_output() {
        let a = sample().to_bytes().expect("write");
        let b = sample().to_bytes().expect("write");
        assert_eq!(a, b);
    }

    #[test]
    fn set_part_replaces_in_place() {
        let mut pkg = sample();
        pkg.set_part("word/document.xml", b"<w:document>x</w:document>".to_vec());
        assert_eq!(pkg.len(), 3);
        assert_eq!(
            pkg.part("word/document.xml"),
            Some(&b"<w:document>x</w:document>"[..])
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(Package::from_bytes(b"PK is not enough").is_err());
    }

    #[test]
    fn corrupted_payload_is_detected() {
        let bytes = sample().to_bytes().expect("write");
        // First local entry payload starts after its fixed header + name.
        let offset = 30 + CONTENT_TYPES_PART.len() + 2;
        let mut bad = bytes.clone();
        bad[offset] ^= 0xFF;
        assert!(Package::from_bytes(&bad).is_err());
    }

    #[test]
    fn missing_part_is_an_error() {
        let pkg = sample();
        assert!(matches!(
            pkg.expect_part("word/styles.xml"),
            Err(PackageError::MissingPart(_))
        ));
    }
}
