use std::fmt;
use std::str::FromStr;

/// Language selection for one transcription run.
///
/// Chooses both the acoustic model variant (English has a dedicated model,
/// everything else shares the multilingual one) and the engine's `-l` flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum LanguageCode {
    #[default]
    Auto,
    English,
    Vietnamese,
    Japanese,
}

impl LanguageCode {
    pub const ALL: &'static [LanguageCode] = &[
        LanguageCode::Auto,
        LanguageCode::English,
        LanguageCode::Vietnamese,
        LanguageCode::Japanese,
    ];

    /// Engine-facing code, as passed to `-l`.
    pub fn code(self) -> &'static str {
        match self {
            LanguageCode::Auto => "auto",
            LanguageCode::English => "en",
            LanguageCode::Vietnamese => "vi",
            LanguageCode::Japanese => "ja",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            LanguageCode::Auto => "Auto-detect",
            LanguageCode::English => "English",
            LanguageCode::Vietnamese => "Vietnamese",
            LanguageCode::Japanese => "Japanese",
        }
    }

    /// English gets the dedicated English-only model; `vi`/`ja`/`auto` all
    /// need the multilingual one.
    pub fn uses_english_model(self) -> bool {
        self == LanguageCode::English
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for LanguageCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(LanguageCode::Auto),
            "en" => Ok(LanguageCode::English),
            "vi" => Ok(LanguageCode::Vietnamese),
            "ja" => Ok(LanguageCode::Japanese),
            other => Err(format!(
                "unsupported language '{other}' (expected one of: {})",
                LanguageCode::ALL
                    .iter()
                    .map(|l| l.code())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}
