use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];
const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// Text encodings understood by [`ByteStream`](crate::ByteStream) and the converters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    /// UTF-16 with a byte order mark. Encodes little endian; decoding honors the BOM.
    Utf16,
    Utf16Le,
    Utf16Be,
    Latin1,
    Ascii,
}

impl Encoding {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf16 => "utf-16",
            Self::Utf16Le => "utf-16-le",
            Self::Utf16Be => "utf-16-be",
            Self::Latin1 => "latin-1",
            Self::Ascii => "ascii",
        }
    }

    /// # Errors
    ///
    /// Returns [`CoreError::Encode`] for the first character the encoding cannot represent.
    pub fn encode(self, text: &str) -> Result<Vec<u8>, CoreError> {
        match self {
            Self::Utf8 => Ok(text.as_bytes().to_vec()),
            Self::Utf16 => {
                let mut out = Vec::with_capacity(2 + text.len() * 2);
                out.extend_from_slice(&UTF16_LE_BOM);
                out.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
                Ok(out)
            }
            Self::Utf16Le => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
            Self::Utf16Be => Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect()),
            Self::Latin1 => text
                .chars()
                .map(|ch| {
                    u8::try_from(u32::from(ch)).map_err(|_| CoreError::Encode {
                        encoding: self.name(),
                        ch,
                    })
                })
                .collect(),
            Self::Ascii => text
                .chars()
                .map(|ch| {
                    u8::try_from(u32::from(ch))
                        .ok()
                        .filter(u8::is_ascii)
                        .ok_or(CoreError::Encode {
                            encoding: self.name(),
                            ch,
                        })
                })
                .collect(),
        }
    }

    /// # Errors
    ///
    /// Returns [`CoreError::Decode`] if `bytes` are not valid in this encoding.
    pub fn decode(self, bytes: &[u8]) -> Result<String, CoreError> {
        match self {
            Self::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|e| CoreError::Decode {
                encoding: self.name(),
                reason: e.to_string(),
            }),
            Self::Utf16 => {
                if let Some(rest) = bytes.strip_prefix(&UTF16_BE_BOM) {
                    decode_utf16(rest, true, self.name())
                } else {
                    let rest = bytes.strip_prefix(&UTF16_LE_BOM).unwrap_or(bytes);
                    decode_utf16(rest, false, self.name())
                }
            }
            Self::Utf16Le => decode_utf16(bytes, false, self.name()),
            Self::Utf16Be => decode_utf16(bytes, true, self.name()),
            Self::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            Self::Ascii => {
                if let Some(pos) = bytes.iter().position(|b| !b.is_ascii()) {
                    return Err(CoreError::Decode {
                        encoding: self.name(),
                        reason: format!("byte 0x{:02x} at position {pos} is not ascii", bytes[pos]),
                    });
                }
                Ok(bytes.iter().map(|&b| char::from(b)).collect())
            }
        }
    }
}

fn decode_utf16(bytes: &[u8], big_endian: bool, encoding: &'static str) -> Result<String, CoreError> {
    if bytes.len() % 2 != 0 {
        return Err(CoreError::Decode {
            encoding,
            reason: format!("truncated data: odd length {}", bytes.len()),
        });
    }
    let units = bytes.chunks_exact(2).map(|pair| {
        let pair = [pair[0], pair[1]];
        if big_endian {
            u16::from_be_bytes(pair)
        } else {
            u16::from_le_bytes(pair)
        }
    });
    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|e| CoreError::Decode {
            encoding,
            reason: e.to_string(),
        })
}

impl FromStr for Encoding {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_ascii_lowercase().replace('_', "-");
        match label.as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "utf-16" | "utf16" => Ok(Self::Utf16),
            "utf-16-le" | "utf-16le" | "utf16le" => Ok(Self::Utf16Le),
            "utf-16-be" | "utf-16be" | "utf16be" => Ok(Self::Utf16Be),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Ok(Self::Latin1),
            "ascii" | "us-ascii" => Ok(Self::Ascii),
            _ => Err(CoreError::UnknownEncoding(s.to_owned())),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
