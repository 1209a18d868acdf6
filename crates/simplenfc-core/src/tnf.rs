//! Type name format (TNF) definitions
//!
//! The 3-bit TNF field tells a reader how to interpret the record type:
//! - Empty: no type, no payload
//! - WellKnown: NFC Forum RTD ("T", "U", "Sp", ...)
//! - MimeMedia: RFC 2046 media type
//! - AbsoluteUri: RFC 3986 URI as type
//! - External: NFC Forum external type ("domain:type")
//! - Unknown: opaque payload, no type
//! - Unchanged: continuation chunk of a chunked record
//! - Reserved: never valid

/// Record type name format
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Tnf {
    #[default]
    Empty = 0x00,
    WellKnown = 0x01,
    MimeMedia = 0x02,
    AbsoluteUri = 0x03,
    External = 0x04,
    Unknown = 0x05,
    /// Only legal on middle and terminal chunks
    Unchanged = 0x06,
    Reserved = 0x07,
}

impl Tnf {
    /// Parse from the low 3 bits of a record header
    pub fn from_bits(b: u8) -> Tnf {
        match b & 0x07 {
            0x00 => Tnf::Empty,
            0x01 => Tnf::WellKnown,
            0x02 => Tnf::MimeMedia,
            0x03 => Tnf::AbsoluteUri,
            0x04 => Tnf::External,
            0x05 => Tnf::Unknown,
            0x06 => Tnf::Unchanged,
            _ => Tnf::Reserved,
        }
    }

    #[inline]
    pub fn to_bits(self) -> u8 {
        self as u8
    }

    /// Can a decoded, standalone record carry this TNF?
    pub fn is_standalone(self) -> bool {
        !matches!(self, Tnf::Unchanged | Tnf::Reserved)
    }

    /// Does this TNF allow a type field?
    pub fn allows_type(self) -> bool {
        match self {
            Tnf::WellKnown | Tnf::MimeMedia | Tnf::AbsoluteUri | Tnf::External => true,
            Tnf::Empty | Tnf::Unknown | Tnf::Unchanged | Tnf::Reserved => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_roundtrip() {
        for b in 0u8..8 {
            assert_eq!(Tnf::from_bits(b).to_bits(), b);
        }
    }

    #[test]
    fn test_high_bits_ignored() {
        assert_eq!(Tnf::from_bits(0xD1), Tnf::WellKnown);
        assert_eq!(Tnf::from_bits(0x16), Tnf::Unchanged);
    }

    #[test]
    fn test_standalone() {
        assert!(Tnf::External.is_standalone());
        assert!(!Tnf::Unchanged.is_standalone());
        assert!(!Tnf::Reserved.is_standalone());
        assert!(!Tnf::Unknown.allows_type());
    }
}
