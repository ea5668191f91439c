//! 実行時のテキスト解決
//!
//! GUI が表示時に呼ぶ検索ファサードです。インストール済みカタログを新しい
//! ものから順に検索し、どこにも無ければソース文字列をそのまま返します
//! （フォールバックはカタログではなく、この層のポリシーです）。

use std::path::PathBuf;

use crate::catalog::Catalog;
use crate::indexer::DiscoveredCatalog;
use crate::locale::Locale;

/// The special source string whose translation names the catalog's
/// language in its own tongue (`"Deutsch"` for German).
///
/// Language menus are generated from it, one entry per discovered
/// catalog.
pub const LANGUAGE_NAME_KEY: &str = "LANGUAGE_NAME";

/// Runtime lookup facade over the installed catalogs.
///
/// Catalogs are installed once at startup or on language switch and are
/// immutable afterwards; lookups are read-only.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    /// Installed catalogs, oldest first. Lookup walks them in reverse so
    /// the most recently installed catalog wins.
    catalogs: Vec<Catalog>,
}

impl Translator {
    /// Creates a translator without any catalogs installed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a catalog on top of the current stack.
    pub fn install(&mut self, catalog: Catalog) {
        tracing::debug!(language = ?catalog.language(), "Installing catalog");
        self.catalogs.push(catalog);
    }

    /// Removes all installed catalogs, e.g. before switching language.
    pub fn clear(&mut self) {
        self.catalogs.clear();
    }

    /// Returns true if no catalog is installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }

    /// Resolves a UI string, falling back to the source text.
    ///
    /// This is the display-time contract: the caller always gets
    /// something to show, translated when a catalog has a finished entry,
    /// the source text verbatim otherwise.
    #[must_use]
    pub fn translate<'a>(&'a self, context: &str, source: &'a str) -> &'a str {
        self.try_translate(context, source).unwrap_or(source)
    }

    /// Resolves a UI string without the fallback.
    #[must_use]
    pub fn try_translate(&self, context: &str, source: &str) -> Option<&str> {
        self.catalogs.iter().rev().find_map(|catalog| catalog.lookup(context, source))
    }

    /// Resolves a UI string with a disambiguation comment, falling back
    /// to the source text.
    #[must_use]
    pub fn translate_with_comment<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        comment: Option<&str>,
    ) -> &'a str {
        self.catalogs
            .iter()
            .rev()
            .find_map(|catalog| catalog.lookup_with_comment(context, source, comment))
            .unwrap_or(source)
    }
}

/// 言語メニューの 1 項目。探索結果から生成される。
#[derive(Debug, Clone)]
pub struct LanguageEntry {
    /// Locale of the catalog, when it could be determined.
    pub locale: Option<Locale>,
    /// Display name from the `LANGUAGE_NAME` entry, when present.
    pub name: Option<String>,
    /// Path of the catalog file to install on selection.
    pub path: PathBuf,
}

/// Builds the language menu entries from discovered catalogs.
///
/// `language_name_context` narrows the [`LANGUAGE_NAME_KEY`] lookup to
/// the application context; with `None` every context is searched.
#[must_use]
pub fn language_entries(
    discovered: &[DiscoveredCatalog],
    language_name_context: Option<&str>,
) -> Vec<LanguageEntry> {
    discovered
        .iter()
        .map(|entry| LanguageEntry {
            locale: entry.locale.clone(),
            name: language_name(&entry.catalog, language_name_context).map(ToString::to_string),
            path: entry.path.clone(),
        })
        .collect()
}

/// Finds the display name of a catalog's language.
#[must_use]
pub fn language_name<'a>(catalog: &'a Catalog, context: Option<&str>) -> Option<&'a str> {
    match context {
        Some(context) => catalog.lookup(context, LANGUAGE_NAME_KEY),
        None => catalog
            .contexts()
            .iter()
            .find_map(|c| c.message(LANGUAGE_NAME_KEY).and_then(|m| m.translated_text())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::catalog::Message;

    /// ドイツ語カタログの最小版
    fn german_catalog() -> Catalog {
        let mut catalog = Catalog::with_language("de_DE");
        catalog.insert("ConnectFour", Message::new(LANGUAGE_NAME_KEY, "Deutsch")).unwrap();
        catalog.insert("GUI::MainMenuBar", Message::new("&Game", "&Spiel")).unwrap();
        catalog.insert("GUI::MainMenuBar", Message::new("&Languages", "&Sprachen")).unwrap();
        catalog
    }

    #[googletest::test]
    fn test_translate_uses_installed_catalog() {
        let mut translator = Translator::new();
        translator.install(german_catalog());

        expect_that!(translator.translate("GUI::MainMenuBar", "&Game"), eq("&Spiel"));
    }

    #[rstest]
    #[case::unknown_context("GUI::StatusBar", "Ready")]
    #[case::unknown_source("GUI::MainMenuBar", "&Replay")]
    fn test_translate_falls_back_to_source(#[case] context: &str, #[case] source: &str) {
        let mut translator = Translator::new();
        translator.install(german_catalog());

        assert_that!(translator.translate(context, source), eq(source));
        assert_that!(translator.try_translate(context, source), none());
    }

    #[googletest::test]
    fn test_translate_without_catalogs_falls_back() {
        let translator = Translator::new();

        expect_that!(translator.is_empty(), eq(true));
        expect_that!(translator.translate("GUI::MainMenuBar", "&Game"), eq("&Game"));
    }

    #[googletest::test]
    fn test_latest_installed_catalog_wins() {
        let mut translator = Translator::new();
        translator.install(german_catalog());

        let mut override_catalog = Catalog::with_language("de_DE");
        override_catalog
            .insert("GUI::MainMenuBar", Message::new("&Game", "&Partie"))
            .unwrap();
        translator.install(override_catalog);

        // 上書きされたエントリは新しいカタログから
        expect_that!(translator.translate("GUI::MainMenuBar", "&Game"), eq("&Partie"));
        // それ以外は下のカタログにフォールバック
        expect_that!(translator.translate("GUI::MainMenuBar", "&Languages"), eq("&Sprachen"));
    }

    #[googletest::test]
    fn test_clear_uninstalls_everything() {
        let mut translator = Translator::new();
        translator.install(german_catalog());
        translator.clear();

        expect_that!(translator.is_empty(), eq(true));
        expect_that!(translator.translate("GUI::MainMenuBar", "&Game"), eq("&Game"));
    }

    #[googletest::test]
    fn test_language_name_with_context() {
        let catalog = german_catalog();

        expect_that!(language_name(&catalog, Some("ConnectFour")), some(eq("Deutsch")));
        expect_that!(language_name(&catalog, Some("GUI::MainMenuBar")), none());
        expect_that!(language_name(&catalog, None), some(eq("Deutsch")));
    }

    #[googletest::test]
    fn test_language_entries_from_discovery() {
        let discovered = vec![crate::indexer::DiscoveredCatalog {
            path: PathBuf::from("resources/i18n/fourinaline_de.ts"),
            locale: Some("de_DE".parse().unwrap()),
            catalog: german_catalog(),
        }];

        let entries = language_entries(&discovered, None);

        assert_that!(entries, len(eq(1)));
        let entry = entries.first().unwrap();
        expect_that!(entry.name.as_deref(), some(eq("Deutsch")));
        expect_that!(entry.locale.as_ref().map(ToString::to_string), some(eq("de_DE")));
    }
}
