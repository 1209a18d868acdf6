//! NDEF records
//!
//! A record is immutable once built. `Record::new` rejects every
//! combination the wire format cannot carry, so a constructed record
//! always encodes.

use bytes::Bytes;

use crate::{RecordError, Tnf};

/// Largest payload accepted on decode or construction (10 MiB)
pub const MAX_PAYLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Largest type or id field (1-byte length prefix)
pub const MAX_FIELD_LEN: usize = u8::MAX as usize;

/// Short-record form is used below this payload length
pub const SHORT_RECORD_LIMIT: usize = 256;

/// Well-known RTD for text records
pub const RTD_TEXT: &[u8] = b"T";

/// Well-known RTD for URI records
pub const RTD_URI: &[u8] = b"U";

/// Well-known RTD for smart posters
pub const RTD_SMART_POSTER: &[u8] = b"Sp";

/// URI identifier codes (NFC Forum URI RTD), indexed by code
const URI_PREFIXES: [&str; 36] = [
    "",
    "http://www.",
    "https://www.",
    "http://",
    "https://",
    "tel:",
    "mailto:",
    "ftp://anonymous:anonymous@",
    "ftp://ftp.",
    "ftps://",
    "sftp://",
    "smb://",
    "nfs://",
    "ftp://",
    "dav://",
    "news:",
    "telnet://",
    "imap:",
    "rtsp://",
    "urn:",
    "pop:",
    "sip:",
    "sips:",
    "tftp:",
    "btspp://",
    "btl2cap://",
    "btgoep://",
    "tcpobex://",
    "irdaobex://",
    "file://",
    "urn:epc:id:",
    "urn:epc:tag:",
    "urn:epc:pat:",
    "urn:epc:raw:",
    "urn:epc:",
    "urn:nfc:",
];

/// Text record status byte: UTF-16 flag
const TEXT_UTF16: u8 = 0x80;

/// Text record status byte: language code length mask
const TEXT_LANG_MASK: u8 = 0x3F;

/// A single NDEF record
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Record {
    tnf: Tnf,
    record_type: Bytes,
    id: Bytes,
    payload: Bytes,
}

impl Record {
    /// Build a record, validating it against the wire format
    pub fn new(
        tnf: Tnf,
        record_type: impl Into<Bytes>,
        id: impl Into<Bytes>,
        payload: impl Into<Bytes>,
    ) -> Result<Self, RecordError> {
        let record_type = record_type.into();
        let id = id.into();
        let payload = payload.into();

        if !tnf.is_standalone() {
            return Err(RecordError::IllegalTnf(tnf));
        }

        if tnf == Tnf::Empty && !(record_type.is_empty() && id.is_empty() && payload.is_empty()) {
            return Err(RecordError::NonEmptyEmptyRecord);
        }

        if !tnf.allows_type() && !record_type.is_empty() {
            return Err(RecordError::UnexpectedType(tnf));
        }

        check_len("type", record_type.len(), MAX_FIELD_LEN)?;
        check_len("id", id.len(), MAX_FIELD_LEN)?;
        check_len("payload", payload.len(), MAX_PAYLOAD_SIZE)?;

        Ok(Record {
            tnf,
            record_type,
            id,
            payload,
        })
    }

    /// The empty record
    pub fn empty() -> Self {
        Record {
            tnf: Tnf::Empty,
            record_type: Bytes::new(),
            id: Bytes::new(),
            payload: Bytes::new(),
        }
    }

    /// Well-known text record with a UTF-8 body
    pub fn text(lang: &str, text: &str) -> Result<Self, RecordError> {
        let lang = lang.as_bytes();
        check_len("language code", lang.len(), TEXT_LANG_MASK as usize)?;

        let mut payload = Vec::with_capacity(1 + lang.len() + text.len());
        payload.push(lang.len() as u8);
        payload.extend_from_slice(lang);
        payload.extend_from_slice(text.as_bytes());

        Record::new(Tnf::WellKnown, RTD_TEXT, Bytes::new(), payload)
    }

    /// Well-known URI record, abbreviating the longest known prefix
    pub fn uri(uri: &str) -> Result<Self, RecordError> {
        let (code, prefix) = URI_PREFIXES
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, p)| uri.starts_with(*p))
            .max_by_key(|(_, p)| p.len())
            .map(|(i, p)| (i as u8, p.len()))
            .unwrap_or((0, 0));

        let rest = &uri.as_bytes()[prefix..];
        let mut payload = Vec::with_capacity(1 + rest.len());
        payload.push(code);
        payload.extend_from_slice(rest);

        Record::new(Tnf::WellKnown, RTD_URI, Bytes::new(), payload)
    }

    /// MIME media record; the type is stored lower-cased
    pub fn mime(mime_type: &str, data: impl Into<Bytes>) -> Result<Self, RecordError> {
        let mime_type = mime_type.trim().to_ascii_lowercase();
        if mime_type.is_empty() {
            return Err(RecordError::MissingType(Tnf::MimeMedia));
        }
        Record::new(Tnf::MimeMedia, mime_type.into_bytes(), Bytes::new(), data)
    }

    /// External type record ("domain:type"); the type is stored lower-cased
    pub fn external(domain_type: &str, data: impl Into<Bytes>) -> Result<Self, RecordError> {
        let domain_type = domain_type.trim().to_ascii_lowercase();
        if domain_type.is_empty() {
            return Err(RecordError::MissingType(Tnf::External));
        }
        Record::new(Tnf::External, domain_type.into_bytes(), Bytes::new(), data)
    }

    #[inline]
    pub fn tnf(&self) -> Tnf {
        self.tnf
    }

    #[inline]
    pub fn record_type(&self) -> &[u8] {
        &self.record_type
    }

    #[inline]
    pub fn id(&self) -> &[u8] {
        &self.id
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Cheap clone of the payload buffer
    pub fn payload_bytes(&self) -> Bytes {
        self.payload.clone()
    }

    /// Does this record use the short-record (1-byte payload length) form?
    #[inline]
    pub fn is_short(&self) -> bool {
        self.payload.len() < SHORT_RECORD_LIMIT
    }

    /// Exact encoded size of this record, unchunked
    pub fn encoded_len(&self) -> usize {
        let payload_len_field = if self.is_short() { 1 } else { 4 };
        let id_len_field = if self.id.is_empty() { 0 } else { 1 };
        2 + payload_len_field
            + id_len_field
            + self.record_type.len()
            + self.id.len()
            + self.payload.len()
    }

    /// Is this a well-known record of the given RTD?
    pub fn is_well_known(&self, rtd: &[u8]) -> bool {
        self.tnf == Tnf::WellKnown && self.record_type.as_ref() == rtd
    }

    /// Read a text record as (language code, text)
    pub fn as_text(&self) -> Option<(String, String)> {
        if !self.is_well_known(RTD_TEXT) {
            return None;
        }

        let (&status, rest) = self.payload.split_first()?;
        let lang_len = (status & TEXT_LANG_MASK) as usize;
        if rest.len() < lang_len {
            return None;
        }

        let lang = std::str::from_utf8(&rest[..lang_len]).ok()?.to_owned();
        let body = &rest[lang_len..];

        let text = if status & TEXT_UTF16 != 0 {
            decode_utf16(body)?
        } else {
            std::str::from_utf8(body).ok()?.to_owned()
        };

        Some((lang, text))
    }

    /// Read a URI record, expanding its prefix code
    pub fn as_uri(&self) -> Option<String> {
        match self.tnf {
            Tnf::AbsoluteUri => String::from_utf8(self.record_type.to_vec()).ok(),
            Tnf::WellKnown if self.record_type.as_ref() == RTD_URI => {
                let (&code, rest) = self.payload.split_first()?;
                let prefix = URI_PREFIXES.get(code as usize).copied().unwrap_or("");
                let rest = std::str::from_utf8(rest).ok()?;
                Some(format!("{prefix}{rest}"))
            }
            _ => None,
        }
    }
}

fn check_len(field: &'static str, len: usize, max: usize) -> Result<(), RecordError> {
    if len > max {
        return Err(RecordError::FieldTooLong { field, len, max });
    }
    Ok(())
}

/// UTF-16 text body; big-endian unless a byte order mark says otherwise
fn decode_utf16(body: &[u8]) -> Option<String> {
    if body.len() % 2 != 0 {
        return None;
    }

    let (little_endian, body) = match body {
        [0xFF, 0xFE, rest @ ..] => (true, rest),
        [0xFE, 0xFF, rest @ ..] => (false, rest),
        _ => (false, body),
    };

    let units = body.chunks_exact(2).map(|c| {
        if little_endian {
            u16::from_le_bytes([c[0], c[1]])
        } else {
            u16::from_be_bytes([c[0], c[1]])
        }
    });

    char::decode_utf16(units).collect::<Result<String, _>>().ok()
}
