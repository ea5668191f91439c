//! 診断メッセージ生成モジュール
//!
//! カタログが完成した翻訳セットとして出荷できるかを検査します。
//! 未翻訳・空訳のほか、ソースに埋め込まれたニーモニック（`&` マーカー）
//! やプレースマーカー（`%1`, `%n`）が翻訳で失われていないかを見ます。

use std::collections::BTreeSet;
use std::fmt;

use crate::catalog::{
    Catalog,
    Message,
    TranslationState,
};
use crate::config::CatalogSettings;
use crate::locale::Locale;
use crate::types::SourceLocation;

/// How severe a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational finding.
    Hint,
    /// Should be fixed before release.
    Warning,
    /// Must be fixed.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hint => write!(f, "hint"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single finding about one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity of the finding.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// Context the entry belongs to.
    pub context: String,
    /// First extraction location of the entry, when recorded.
    pub location: Option<SourceLocation>,
}

/// カタログ全体を検査する
///
/// カタログのロケールが `optionalLocales` に含まれる場合、未翻訳・空訳は
/// 警告ではなくヒントに格下げされます。
#[must_use]
pub fn check_catalog(catalog: &Catalog, settings: &CatalogSettings) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let incomplete_severity = if is_optional_locale(catalog, settings) {
        Severity::Hint
    } else {
        Severity::Warning
    };

    for context in catalog.contexts() {
        for message in context.messages() {
            check_message(
                &mut diagnostics,
                context.name(),
                message,
                settings,
                incomplete_severity,
            );
        }
    }

    diagnostics
}

/// Required locales no discovered catalog covers.
///
/// A required locale counts as covered when a discovered catalog shares
/// its language (`de` covers `de_DE`).
#[must_use]
pub fn missing_locales(discovered: &[Locale], settings: &CatalogSettings) -> Vec<Locale> {
    settings
        .parsed_required_locales()
        .into_iter()
        .filter(|required| !discovered.iter().any(|found| found.matches(required)))
        .collect()
}

/// カタログのロケールが optionalLocales に含まれるか
fn is_optional_locale(catalog: &Catalog, settings: &CatalogSettings) -> bool {
    let Some(locale) = catalog.language().and_then(|name| name.parse::<Locale>().ok()) else {
        return false;
    };

    settings.parsed_optional_locales().iter().any(|optional| optional.matches(&locale))
}

/// 1 メッセージ分の検査
fn check_message(
    diagnostics: &mut Vec<Diagnostic>,
    context: &str,
    message: &Message,
    settings: &CatalogSettings,
    incomplete_severity: Severity,
) {
    let push = |diagnostics: &mut Vec<Diagnostic>, severity: Severity, text: String| {
        diagnostics.push(Diagnostic {
            severity,
            message: text,
            context: context.to_string(),
            location: message.locations.first().cloned(),
        });
    };

    if settings.diagnostics.unfinished {
        match message.state {
            TranslationState::Unfinished => {
                push(
                    diagnostics,
                    incomplete_severity,
                    format!("unfinished translation for '{}'", message.source),
                );
            }
            TranslationState::Finished if message.translation.is_empty() => {
                push(
                    diagnostics,
                    incomplete_severity,
                    format!("empty translation for '{}'", message.source),
                );
            }
            TranslationState::Vanished => {
                push(
                    diagnostics,
                    Severity::Hint,
                    format!("message '{}' has vanished from the sources", message.source),
                );
            }
            TranslationState::Obsolete => {
                push(
                    diagnostics,
                    Severity::Hint,
                    format!("message '{}' is obsolete", message.source),
                );
            }
            TranslationState::Finished => {}
        }
    }

    // 表示されない翻訳のテキスト検査は意味がない
    if !message.is_translated() {
        return;
    }

    if settings.diagnostics.accelerators {
        match (mnemonic(&message.source), mnemonic(&message.translation)) {
            (Some(marker), None) => push(
                diagnostics,
                Severity::Warning,
                format!(
                    "accelerator '&{marker}' of '{}' is missing in the translation",
                    message.source
                ),
            ),
            (None, Some(_)) => push(
                diagnostics,
                Severity::Warning,
                format!("translation of '{}' has a superfluous accelerator", message.source),
            ),
            _ => {}
        }
    }

    if settings.diagnostics.place_markers {
        let source_markers = place_markers(&message.source);
        let translation_markers = place_markers(&message.translation);

        for marker in source_markers.difference(&translation_markers) {
            push(
                diagnostics,
                Severity::Warning,
                format!("place marker '{marker}' of '{}' is missing in the translation", message.source),
            );
        }
        for marker in translation_markers.difference(&source_markers) {
            push(
                diagnostics,
                Severity::Warning,
                format!("translation of '{}' has a surplus place marker '{marker}'", message.source),
            );
        }
    }
}

/// ニーモニックのアクセラレータ文字を探す
///
/// `&&` はリテラルの `&` でありアクセラレータではない。
fn mnemonic(text: &str) -> Option<char> {
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '&' {
            continue;
        }
        match chars.next() {
            // && はエスケープされた & そのもの
            Some('&') => {}
            Some(marker) if !marker.is_whitespace() => return Some(marker),
            _ => {}
        }
    }

    None
}

/// `%1`〜`%99` と `%n`（`%Ln` 含む）のプレースマーカーを集める
fn place_markers(text: &str) -> BTreeSet<String> {
    let mut markers = BTreeSet::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            continue;
        }

        let mut marker = String::from('%');
        if chars.peek() == Some(&'L') {
            marker.push('L');
            chars.next();
        }

        if chars.peek() == Some(&'n') {
            marker.push('n');
            chars.next();
            markers.insert(marker);
            continue;
        }

        let mut has_digits = false;
        while let Some(&digit) = chars.peek() {
            if digit.is_ascii_digit() {
                marker.push(digit);
                chars.next();
                has_digits = true;
            } else {
                break;
            }
        }

        if has_digits {
            markers.insert(marker);
        }
    }

    markers
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::catalog::Message;
    use crate::test_utils::create_catalog;

    #[googletest::test]
    fn test_complete_catalog_has_no_findings() {
        let catalog = create_catalog(
            "de_DE",
            &[
                ("GUI::MainMenuBar", "&Game", "&Spiel"),
                ("GUI::Actions::Game", "Start a new game.", "Starte ein neues Spiel."),
            ],
        );

        let diagnostics = check_catalog(&catalog, &CatalogSettings::default());

        expect_that!(diagnostics, is_empty());
    }

    #[googletest::test]
    fn test_empty_translation_is_reported() {
        let catalog = create_catalog("de_DE", &[("GUI::MainMenuBar", "&Game", "")]);

        let diagnostics = check_catalog(&catalog, &CatalogSettings::default());

        assert_that!(
            diagnostics,
            elements_are![all![
                field!(Diagnostic.severity, eq(&Severity::Warning)),
                field!(Diagnostic.message, contains_substring("empty translation")),
                field!(Diagnostic.context, eq("GUI::MainMenuBar")),
            ]]
        );
    }

    #[googletest::test]
    fn test_unfinished_translation_is_reported() {
        let mut catalog = Catalog::with_language("de_DE");
        let message = Message {
            state: TranslationState::Unfinished,
            ..Message::new("&End game", String::new())
        };
        catalog.insert("GUI::Actions::Game", message).unwrap();

        let diagnostics = check_catalog(&catalog, &CatalogSettings::default());

        assert_that!(
            diagnostics,
            elements_are![all![
                field!(Diagnostic.severity, eq(&Severity::Warning)),
                field!(Diagnostic.message, contains_substring("unfinished")),
            ]]
        );
    }

    #[googletest::test]
    fn test_optional_locale_downgrades_to_hint() {
        let catalog = create_catalog("fr_FR", &[("GUI::MainMenuBar", "&Game", "")]);
        let settings = CatalogSettings {
            optional_locales: Some(vec!["fr".to_string()]),
            ..CatalogSettings::default()
        };

        let diagnostics = check_catalog(&catalog, &settings);

        assert_that!(
            diagnostics,
            elements_are![field!(Diagnostic.severity, eq(&Severity::Hint))]
        );
    }

    #[googletest::test]
    fn test_vanished_message_is_a_hint() {
        let mut catalog = Catalog::with_language("de_DE");
        let message = Message {
            state: TranslationState::Vanished,
            ..Message::new("&Save game as ...", "Spiel speichern &unter ...")
        };
        catalog.insert("GUI::Actions::Game", message).unwrap();

        let diagnostics = check_catalog(&catalog, &CatalogSettings::default());

        assert_that!(
            diagnostics,
            elements_are![all![
                field!(Diagnostic.severity, eq(&Severity::Hint)),
                field!(Diagnostic.message, contains_substring("vanished")),
            ]]
        );
    }

    #[googletest::test]
    fn test_missing_accelerator_is_reported() {
        let catalog = create_catalog("de_DE", &[("GUI::MainMenuBar", "&Game", "Spiel")]);

        let diagnostics = check_catalog(&catalog, &CatalogSettings::default());

        assert_that!(
            diagnostics,
            elements_are![field!(Diagnostic.message, contains_substring("accelerator '&G'"))]
        );
    }

    #[googletest::test]
    fn test_superfluous_accelerator_is_reported() {
        let catalog = create_catalog("de_DE", &[("GUI::MainMenuBar", "Game", "&Spiel")]);

        let diagnostics = check_catalog(&catalog, &CatalogSettings::default());

        assert_that!(
            diagnostics,
            elements_are![field!(Diagnostic.message, contains_substring("superfluous accelerator"))]
        );
    }

    #[googletest::test]
    fn test_literal_ampersand_is_not_an_accelerator() {
        let catalog =
            create_catalog("de_DE", &[("GUI::Dialogs", "Load && save", "Laden && speichern")]);

        let diagnostics = check_catalog(&catalog, &CatalogSettings::default());

        expect_that!(diagnostics, is_empty());
    }

    #[googletest::test]
    fn test_missing_place_marker_is_reported() {
        let catalog = create_catalog(
            "de_DE",
            &[("GUI::Board", "Column %1 is full.", "Die Spalte ist voll.")],
        );

        let diagnostics = check_catalog(&catalog, &CatalogSettings::default());

        assert_that!(
            diagnostics,
            elements_are![field!(Diagnostic.message, contains_substring("place marker '%1'"))]
        );
    }

    #[googletest::test]
    fn test_surplus_place_marker_is_reported() {
        let catalog =
            create_catalog("de_DE", &[("GUI::Board", "The column is full.", "Spalte %1 ist voll.")]);

        let diagnostics = check_catalog(&catalog, &CatalogSettings::default());

        assert_that!(
            diagnostics,
            elements_are![field!(Diagnostic.message, contains_substring("surplus place marker"))]
        );
    }

    #[googletest::test]
    fn test_disabled_checks_stay_silent() {
        let catalog = create_catalog("de_DE", &[("GUI::MainMenuBar", "&Game", "Spiel")]);
        let mut settings = CatalogSettings::default();
        settings.diagnostics.accelerators = false;

        let diagnostics = check_catalog(&catalog, &settings);

        expect_that!(diagnostics, is_empty());
    }

    #[rstest]
    #[case::simple("&Game", Some('G'))]
    #[case::not_first("E&xit", Some('x'))]
    #[case::none("Exit game.", None)]
    #[case::literal_only("Load && save", None)]
    #[case::literal_then_marker("Load && &save", Some('s'))]
    #[case::trailing("Trailing &", None)]
    fn test_mnemonic(#[case] text: &str, #[case] expected: Option<char>) {
        assert_eq!(mnemonic(text), expected);
    }

    #[rstest]
    #[case::none("Save the current game.", &[])]
    #[case::numbered("Column %1 of %2", &["%1", "%2"])]
    #[case::numerus("%n move(s)", &["%n"])]
    #[case::localized_numerus("%Ln move(s)", &["%Ln"])]
    #[case::multi_digit("%10 items", &["%10"])]
    #[case::percent_only("100% done", &[])]
    fn test_place_markers(#[case] text: &str, #[case] expected: &[&str]) {
        let markers: Vec<String> = place_markers(text).into_iter().collect();
        let expected: Vec<String> = expected.iter().map(ToString::to_string).collect();
        assert_eq!(markers, expected);
    }

    #[googletest::test]
    fn test_missing_locales() {
        let settings = CatalogSettings {
            required_locales: Some(vec!["de_DE".to_string(), "fr".to_string()]),
            ..CatalogSettings::default()
        };
        let discovered = vec!["de".parse::<Locale>().unwrap()];

        let missing: Vec<String> =
            missing_locales(&discovered, &settings).iter().map(ToString::to_string).collect();

        // de は de_DE を満たし、fr が欠けている
        assert_that!(missing, elements_are![eq("fr")]);
    }

    #[googletest::test]
    fn test_missing_locales_without_requirements() {
        let missing = missing_locales(&[], &CatalogSettings::default());

        expect_that!(missing, is_empty());
    }
}
