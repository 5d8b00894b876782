//! Modifier flags carried by type and member symbols.
//!
//! Bit positions follow the JVM access flags. `DEPRECATED` lives above the 16-bit
//! access range and is set from the `Deprecated` attribute.

use bitflags::bitflags;

bitflags! {
    /// Modifier flags of a symbol.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Flags: u32 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const SYNCHRONIZED = 0x0020;
        const VOLATILE = 0x0040;
        const BRIDGE = 0x0040;
        const TRANSIENT = 0x0080;
        const VARARGS = 0x0080;
        const NATIVE = 0x0100;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const STRICTFP = 0x0800;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
        const MANDATED = 0x8000;
        const DEPRECATED = 0x0002_0000;

        const ACCESS_FLAGS = Self::PUBLIC.bits() | Self::PRIVATE.bits() | Self::PROTECTED.bits();
    }
}

/// Bit the JVM sets on every modern class file; it has no source-level meaning.
pub const ACC_SUPER: u32 = 0x0020;

impl Flags {
    /// Flags that survive the trip from a class file onto a symbol.
    pub const ACCEPTED: Flags = Flags::ACCESS_FLAGS
        .union(Flags::INTERFACE)
        .union(Flags::ANNOTATION)
        .union(Flags::ENUM)
        .union(Flags::STATIC)
        .union(Flags::FINAL)
        .union(Flags::SYNCHRONIZED)
        .union(Flags::VOLATILE)
        .union(Flags::TRANSIENT)
        .union(Flags::VARARGS)
        .union(Flags::NATIVE)
        .union(Flags::ABSTRACT)
        .union(Flags::STRICTFP)
        .union(Flags::DEPRECATED);

    /// Mask raw class-file flags down to the accepted subset.
    #[inline]
    pub const fn filter_bytecode(raw: u32) -> Flags {
        Flags::from_bits_retain(raw & Flags::ACCEPTED.bits())
    }

    /// Whether raw flags mark a compiler-generated artifact.
    #[inline]
    pub const fn is_synthetic(raw: u32) -> bool {
        raw & Flags::SYNTHETIC.bits() != 0
    }

    /// Whether raw flags mark an annotation type.
    #[inline]
    pub const fn is_annotation(raw: u32) -> bool {
        raw & Flags::ANNOTATION.bits() != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_keeps_accepted_bits() {
        let raw = (Flags::PUBLIC | Flags::STATIC | Flags::FINAL | Flags::ABSTRACT).bits();
        assert_eq!(
            Flags::filter_bytecode(raw),
            Flags::PUBLIC | Flags::STATIC | Flags::FINAL | Flags::ABSTRACT
        );
    }

    #[test]
    fn test_filter_drops_format_internal_bits() {
        let raw = Flags::PUBLIC.bits() | Flags::SYNTHETIC.bits() | Flags::MANDATED.bits() | 0x0001_0000;
        let filtered = Flags::filter_bytecode(raw);
        assert_eq!(filtered, Flags::PUBLIC);
        assert!(!filtered.contains(Flags::SYNTHETIC));
    }

    #[test]
    fn test_is_synthetic() {
        assert!(Flags::is_synthetic(0x1000 | 0x0001));
        assert!(!Flags::is_synthetic(0x0001));
    }

    #[test]
    fn test_is_annotation() {
        assert!(Flags::is_annotation((Flags::ANNOTATION | Flags::INTERFACE).bits()));
        assert!(!Flags::is_annotation(Flags::INTERFACE.bits()));
    }
}
