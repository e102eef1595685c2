use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Recognition language, restricted to the tags the form offers.
///
/// BCP-47 codes: 'my' = Burmese, 'id-ID' = Indonesian, 'en-US' = English (US).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "my")]
    Burmese,
    #[serde(rename = "id-ID")]
    Indonesian,
    #[serde(rename = "en-US")]
    EnglishUs,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Burmese, Language::Indonesian, Language::EnglishUs];

    /// The BCP-47 tag sent to the recognition service.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Language::Burmese => "my",
            Language::Indonesian => "id-ID",
            Language::EnglishUs => "en-US",
        }
    }

    /// Human-readable name for the language selector.
    pub fn label(&self) -> &'static str {
        match self {
            Language::Burmese => "Burmese",
            Language::Indonesian => "Indonesian",
            Language::EnglishUs => "English (US)",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Burmese
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl FromStr for Language {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .iter()
            .copied()
            .find(|lang| lang.as_tag() == s)
            .ok_or(())
    }
}
