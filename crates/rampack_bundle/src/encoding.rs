//! Text encodings for code sections of the artifact.

/// Encoding applied to startup and module code before writing.
///
/// Whatever the encoding, code sections are terminated with a single null
/// byte; the loader treats null as the end-of-string marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BundleEncoding {
    /// UTF-8 (default).
    #[default]
    Utf8,
    /// UTF-16, little-endian code units.
    Utf16Le,
    /// 7-bit ASCII; non-ASCII characters are replaced with `?`.
    Ascii,
}

impl BundleEncoding {
    /// Encodes a code string into bytes.
    pub fn encode(self, code: &str) -> Vec<u8> {
        match self {
            BundleEncoding::Utf8 => code.as_bytes().to_vec(),
            BundleEncoding::Utf16Le => code
                .encode_utf16()
                .flat_map(|unit| unit.to_le_bytes())
                .collect(),
            BundleEncoding::Ascii => code
                .chars()
                .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                .collect(),
        }
    }
}
