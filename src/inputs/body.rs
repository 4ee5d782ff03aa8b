use serde::Serialize;

use super::AssemblyError;

/// A required keyword and its leftmost byte offset in the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordMatch {
    pub keyword: String,
    pub byte_index: usize,
}

/// Email body decoded one byte per character (U+0000..=U+00FF).
///
/// Offsets reported by [`DecodedBody::find`] are character offsets in this
/// decoded form, which equal byte offsets into the original body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBody {
    text: String,
}

impl DecodedBody {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            text: bytes.iter().map(|&b| char::from(b)).collect(),
        }
    }

    /// Decode the generator's body array, one decimal byte value per element.
    pub fn from_elements(elements: &[String]) -> Result<Self, AssemblyError> {
        let bytes = elements
            .iter()
            .enumerate()
            .map(|(position, value)| {
                value
                    .trim()
                    .parse::<u8>()
                    .map_err(|_| AssemblyError::MalformedBody {
                        position,
                        value: value.clone(),
                    })
            })
            .collect::<Result<Vec<u8>, _>>()?;
        Ok(Self::from_bytes(&bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of bytes in the body.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.text.contains(keyword)
    }

    /// Leftmost byte offset of `keyword`.
    pub fn find(&self, keyword: &str) -> Option<usize> {
        // `str::find` yields a UTF-8 offset; bytes >= 0x80 occupy two UTF-8
        // bytes in the decoded text, so count characters instead.
        self.text
            .find(keyword)
            .map(|utf8_offset| self.text[..utf8_offset].chars().count())
    }
}

/// Check every keyword is present, then collect leftmost offsets in input order.
///
/// Fails on the first missing keyword; no partial result is returned.
pub fn locate_keywords<S: AsRef<str>>(
    body: &DecodedBody,
    keywords: &[S],
) -> Result<Vec<KeywordMatch>, AssemblyError> {
    for keyword in keywords {
        let keyword = keyword.as_ref();
        if !body.contains(keyword) {
            return Err(AssemblyError::MissingKeyword(keyword.to_string()));
        }
    }

    keywords
        .iter()
        .map(|keyword| {
            let keyword = keyword.as_ref();
            let byte_index = body
                .find(keyword)
                .ok_or_else(|| AssemblyError::KeywordOffsetLost(keyword.to_string()))?;
            Ok(KeywordMatch {
                keyword: keyword.to_string(),
                byte_index,
            })
        })
        .collect()
}
