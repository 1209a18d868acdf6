//! Record header flags for the NDEF wire format

use simplenfc_core::Tnf;

/// Record header byte: five flag bits plus the 3-bit TNF
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecordFlags(pub u8);

impl RecordFlags {
    pub const NONE: RecordFlags = RecordFlags(0);

    // Flag bits
    pub const MESSAGE_BEGIN: u8 = 0b1000_0000;
    pub const MESSAGE_END: u8 = 0b0100_0000;
    pub const CHUNK: u8 = 0b0010_0000;
    pub const SHORT_RECORD: u8 = 0b0001_0000;
    pub const ID_LENGTH: u8 = 0b0000_1000;
    pub const TNF_MASK: u8 = 0b0000_0111;

    #[inline]
    pub fn new(bits: u8) -> Self {
        RecordFlags(bits)
    }

    #[inline]
    pub fn is_message_begin(self) -> bool {
        self.0 & Self::MESSAGE_BEGIN != 0
    }

    #[inline]
    pub fn is_message_end(self) -> bool {
        self.0 & Self::MESSAGE_END != 0
    }

    #[inline]
    pub fn is_chunk(self) -> bool {
        self.0 & Self::CHUNK != 0
    }

    #[inline]
    pub fn is_short_record(self) -> bool {
        self.0 & Self::SHORT_RECORD != 0
    }

    #[inline]
    pub fn has_id_length(self) -> bool {
        self.0 & Self::ID_LENGTH != 0
    }

    #[inline]
    pub fn tnf(self) -> Tnf {
        Tnf::from_bits(self.0 & Self::TNF_MASK)
    }

    #[inline]
    pub fn set_message_begin(&mut self, value: bool) {
        self.set(Self::MESSAGE_BEGIN, value);
    }

    #[inline]
    pub fn set_message_end(&mut self, value: bool) {
        self.set(Self::MESSAGE_END, value);
    }

    #[inline]
    pub fn set_chunk(&mut self, value: bool) {
        self.set(Self::CHUNK, value);
    }

    #[inline]
    pub fn set_short_record(&mut self, value: bool) {
        self.set(Self::SHORT_RECORD, value);
    }

    #[inline]
    pub fn set_id_length(&mut self, value: bool) {
        self.set(Self::ID_LENGTH, value);
    }

    #[inline]
    pub fn set_tnf(&mut self, tnf: Tnf) {
        self.0 = (self.0 & !Self::TNF_MASK) | tnf.to_bits();
    }

    #[inline]
    fn set(&mut self, bit: u8, value: bool) {
        if value {
            self.0 |= bit;
        } else {
            self.0 &= !bit;
        }
    }
}

impl From<u8> for RecordFlags {
    fn from(bits: u8) -> Self {
        RecordFlags(bits)
    }
}

impl From<RecordFlags> for u8 {
    fn from(flags: RecordFlags) -> Self {
        flags.0
    }
}
