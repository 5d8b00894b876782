//! Class-file format compatibility.
//!
//! Newer compilers bump the major version even when nothing the declaration
//! decoder reads has changed. Such files are rewritten in place to the newest
//! version the decoder accepts before they are decoded.

use tracing::trace;

use super::reader::MAGIC;

/// Offset of the big-endian major version in a class file.
const MAJOR_VERSION_OFFSET: usize = 6;

/// Rewrites unsupported-but-parseable major versions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatShim {
    newest_supported: u16,
}

impl FormatShim {
    pub const fn new(newest_supported: u16) -> Self {
        Self { newest_supported }
    }

    pub const fn newest_supported(&self) -> u16 {
        self.newest_supported
    }

    /// Major version of a class file, if the bytes start like one.
    pub fn major_version(bytes: &[u8]) -> Option<u16> {
        let magic = bytes.get(..4)?;
        if u32::from_be_bytes([magic[0], magic[1], magic[2], magic[3]]) != MAGIC {
            return None;
        }
        let major = bytes.get(MAJOR_VERSION_OFFSET..MAJOR_VERSION_OFFSET + 2)?;
        Some(u16::from_be_bytes([major[0], major[1]]))
    }

    /// Downgrade the major version if it is newer than supported.
    ///
    /// Returns `true` when the bytes were rewritten. Anything that does not look
    /// like a class file is left untouched for the decoder to reject.
    pub fn normalize(&self, bytes: &mut [u8]) -> bool {
        let Some(major) = Self::major_version(bytes) else {
            return false;
        };
        if major <= self.newest_supported {
            return false;
        }
        trace!(from = major, to = self.newest_supported, "downgrading class file major version");
        bytes[MAJOR_VERSION_OFFSET..MAJOR_VERSION_OFFSET + 2]
            .copy_from_slice(&self.newest_supported.to_be_bytes());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_prefix(major: u16) -> Vec<u8> {
        let mut bytes = MAGIC.to_be_bytes().to_vec();
        bytes.extend_from_slice(&0u16.to_be_bytes());
        bytes.extend_from_slice(&major.to_be_bytes());
        bytes.extend_from_slice(&[0, 1]);
        bytes
    }

    #[test]
    fn test_newer_version_is_downgraded() {
        let shim = FormatShim::new(52);
        let mut bytes = class_prefix(53);
        assert!(shim.normalize(&mut bytes));
        assert_eq!(FormatShim::major_version(&bytes), Some(52));
        // Everything past the version is untouched
        assert_eq!(&bytes[8..], &[0, 1]);
    }

    #[test]
    fn test_supported_version_untouched() {
        let shim = FormatShim::new(65);
        let mut bytes = class_prefix(61);
        assert!(!shim.normalize(&mut bytes));
        assert_eq!(FormatShim::major_version(&bytes), Some(61));
    }

    #[test]
    fn test_non_class_bytes_untouched() {
        let shim = FormatShim::new(52);
        let mut bytes = vec![0x50, 0x4B, 0x03, 0x04, 0, 0, 0, 99];
        assert!(!shim.normalize(&mut bytes));
        assert_eq!(bytes[7], 99);

        let mut short = MAGIC.to_be_bytes().to_vec();
        assert!(!shim.normalize(&mut short));
    }
}
