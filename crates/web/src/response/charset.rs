use std::fmt::{Display, Formatter};
use std::str::FromStr;

use bytes::Bytes;

use crate::response::ResponseError;

/// The character sets a response body can be encoded with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Charset {
    #[default]
    Utf8,
    Ascii,
    Latin1,
}

impl Charset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Charset::Utf8 => "utf-8",
            Charset::Ascii => "us-ascii",
            Charset::Latin1 => "iso-8859-1",
        }
    }

    /// Encodes `text`, failing on the first character the charset cannot represent.
    pub fn encode(&self, text: &str) -> Result<Bytes, ResponseError> {
        match self {
            Charset::Utf8 => Ok(Bytes::copy_from_slice(text.as_bytes())),
            Charset::Ascii => encode_single_byte(text, *self, 0x7f),
            Charset::Latin1 => encode_single_byte(text, *self, 0xff),
        }
    }
}

fn encode_single_byte(text: &str, charset: Charset, max: u8) -> Result<Bytes, ResponseError> {
    let mut encoded = Vec::with_capacity(text.len());
    for (position, c) in text.chars().enumerate() {
        match u8::try_from(c) {
            Ok(byte) if byte <= max => encoded.push(byte),
            _ => return Err(ResponseError::unencodable(c, position, charset)),
        }
    }
    Ok(Bytes::from(encoded))
}

impl FromStr for Charset {
    type Err = ResponseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "utf-8" | "utf8" | "u8" => Ok(Charset::Utf8),
            "us-ascii" | "ascii" | "646" => Ok(Charset::Ascii),
            "iso-8859-1" | "iso8859-1" | "latin-1" | "latin1" | "l1" => Ok(Charset::Latin1),
            _ => Err(ResponseError::unknown_charset(s)),
        }
    }
}

impl Display for Charset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
