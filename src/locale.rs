//! Locale names in the form the TS format uses (`de`, `de_DE`).

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

/// Error for malformed locale names.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid locale name '{0}'")]
pub struct LocaleError(pub String);

/// A parsed locale name: language code plus optional territory.
///
/// The grammar is the one the GUI toolkit accepts for catalog names:
/// a 2-3 letter lowercase language code, optionally followed by `_` and
/// a 2 letter uppercase territory code (`de`, `de_DE`, `en_US`).
/// Hyphen-separated input is normalized to the underscore form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    /// ISO 639 language code, lowercase.
    language: String,
    /// ISO 3166 territory code, uppercase.
    territory: Option<String>,
}

impl Locale {
    /// Language code (`de` for `de_DE`).
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Territory code (`DE` for `de_DE`).
    #[must_use]
    pub fn territory(&self) -> Option<&str> {
        self.territory.as_deref()
    }

    /// The next locale in the fallback chain: `de_DE` → `de`.
    ///
    /// Returns `None` for a bare language code, which has no parent.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.territory.as_ref().map(|_| Self { language: self.language.clone(), territory: None })
    }

    /// Returns true if the two locales share a language, ignoring the
    /// territory. `de_DE` matches `de` and `de_AT`.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.language == other.language
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.territory {
            Some(territory) => write!(f, "{}_{}", self.language, territory),
            None => write!(f, "{}", self.language),
        }
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(['_', '-']);

        let language = parts.next().unwrap_or_default();
        let territory = parts.next();

        // 3 つ以上の区切りはスクリプト付きロケールなどで、ここでは扱わない
        if parts.next().is_some() {
            return Err(LocaleError(s.to_string()));
        }

        if !is_language_code(language) {
            return Err(LocaleError(s.to_string()));
        }

        if let Some(territory) = territory
            && !is_territory_code(territory)
        {
            return Err(LocaleError(s.to_string()));
        }

        Ok(Self {
            language: language.to_lowercase(),
            territory: territory.map(str::to_uppercase),
        })
    }
}

/// 2-3 ASCII letters, case-insensitive.
fn is_language_code(part: &str) -> bool {
    (2..=3).contains(&part.len()) && part.chars().all(|c| c.is_ascii_alphabetic())
}

/// 2 ASCII letters or a 3 digit region number, case-insensitive.
fn is_territory_code(part: &str) -> bool {
    (part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()))
        || (part.len() == 3 && part.chars().all(|c| c.is_ascii_digit()))
}

/// Detects the locale from a catalog file stem.
///
/// Catalog files are conventionally named `<app>_<locale>.ts`; the locale
/// is the longest parseable suffix of the `_`-separated stem:
///
/// - `fourinaline_de.ts` → `de`
/// - `fourinaline_de_DE.ts` → `de_DE`
/// - `de_DE.ts` → `de_DE`
/// - `notes.ts` → `None`
#[must_use]
pub fn detect_from_stem(stem: &str) -> Option<Locale> {
    let parts: Vec<&str> = stem.split('_').collect();

    for take in (1..=2).rev() {
        if parts.len() < take {
            continue;
        }
        let candidate = parts.get(parts.len() - take..)?.join("_");
        if let Ok(locale) = Locale::from_str(&candidate) {
            return Some(locale);
        }
    }

    None
}

/// Detects the locale from a catalog file path, using its stem.
#[must_use]
pub fn detect_from_path(path: &Path) -> Option<Locale> {
    let stem = path.file_stem()?.to_str()?;
    detect_from_stem(stem)
}
