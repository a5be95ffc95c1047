use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages the assistant answers in.
///
/// English is the fallback for anything the detector cannot place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[serde(rename = "lt")]
    Lithuanian,
    #[serde(rename = "ru")]
    Russian,
    #[default]
    #[serde(rename = "en")]
    English,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::Lithuanian, Locale::Russian, Locale::English];

    /// Short language tag used in logs and stored records.
    pub fn code(&self) -> &'static str {
        match self {
            Locale::Lithuanian => "lt",
            Locale::Russian => "ru",
            Locale::English => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Locale::Lithuanian => "Lithuanian",
            Locale::Russian => "Russian",
            Locale::English => "English",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_english() {
        assert_eq!(Locale::default(), Locale::English);
    }

    #[test]
    fn test_codes_match_serialized_form() {
        for locale in Locale::ALL {
            let json = serde_json::to_string(&locale).unwrap();
            assert_eq!(json, format!("\"{}\"", locale.code()));
        }
    }
}
