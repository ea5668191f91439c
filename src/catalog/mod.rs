//! 翻訳カタログのデータモデル
//!
//! コンテキスト（UI モジュール単位のグルーピング）ごとにメッセージを保持し、
//! `(context, source, comment)` での検索を提供します。カタログは読み込み後
//! 変更されない前提で、挿入はロード時のみ行われます。

pub mod message;

use std::collections::HashMap;

pub use message::{
    Message,
    TranslationState,
};

/// Errors raised while building a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A `(context, source, comment)` triple occurred twice.
    DuplicateMessage {
        /// Context the duplicate appeared in.
        context: String,
        /// Source text of the duplicate message.
        source: String,
    },
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateMessage { context, source } => {
                write!(f, "duplicate message '{source}' in context '{context}'")
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// メッセージの一意キー。`source` と曖昧性解消コメントの組。
type MessageKey = (String, Option<String>);

/// A named grouping of messages, one per originating GUI module.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Context name (e.g. `GUI::MainMenuBar`).
    name: String,
    /// Messages in catalog order.
    messages: Vec<Message>,
    /// `(source, comment)` → messages index.
    index: HashMap<MessageKey, usize>,
}

impl Context {
    /// Creates an empty context.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), messages: Vec::new(), index: HashMap::new() }
    }

    /// Context name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Messages in the order they were loaded.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Appends a message, enforcing the uniqueness invariant.
    ///
    /// # Errors
    /// [`CatalogError::DuplicateMessage`] when the `(source, comment)`
    /// pair already exists in this context.
    pub fn push(&mut self, message: Message) -> Result<(), CatalogError> {
        let key = (message.source.clone(), message.comment.clone());
        if self.index.contains_key(&key) {
            return Err(CatalogError::DuplicateMessage {
                context: self.name.clone(),
                source: message.source.clone(),
            });
        }

        self.index.insert(key, self.messages.len());
        self.messages.push(message);
        Ok(())
    }

    /// Finds the message for `source` without a disambiguation comment.
    #[must_use]
    pub fn message(&self, source: &str) -> Option<&Message> {
        self.message_with_comment(source, None)
    }

    /// Finds the message for `(source, comment)`.
    #[must_use]
    pub fn message_with_comment(&self, source: &str, comment: Option<&str>) -> Option<&Message> {
        let key = (source.to_string(), comment.map(ToString::to_string));
        self.index.get(&key).and_then(|&i| self.messages.get(i))
    }
}

/// A complete translation catalog for one target language.
///
/// Owned read-only by the localization subsystem for the whole process
/// lifetime; individual entries have no identity outside the catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// TS format version (`2.1` for the files this crate targets).
    version: Option<String>,
    /// Target locale name, e.g. `de_DE`.
    language: Option<String>,
    /// Source locale name, rarely present.
    source_language: Option<String>,
    /// Contexts in catalog order.
    contexts: Vec<Context>,
    /// Context name → contexts index.
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Creates an empty catalog without format metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty catalog for the given target language.
    #[must_use]
    pub fn with_language(language: impl Into<String>) -> Self {
        Self { version: Some("2.1".to_string()), language: Some(language.into()), ..Self::default() }
    }

    /// TS format version.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Sets the TS format version.
    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = Some(version.into());
    }

    /// Target language of the catalog.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Sets the target language.
    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = Some(language.into());
    }

    /// Source language of the catalog, when recorded.
    #[must_use]
    pub fn source_language(&self) -> Option<&str> {
        self.source_language.as_deref()
    }

    /// Sets the source language.
    pub fn set_source_language(&mut self, language: impl Into<String>) {
        self.source_language = Some(language.into());
    }

    /// Contexts in the order they were loaded.
    #[must_use]
    pub fn contexts(&self) -> &[Context] {
        &self.contexts
    }

    /// Finds a context by name.
    #[must_use]
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.index.get(name).and_then(|&i| self.contexts.get(i))
    }

    /// Total number of messages across all contexts.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.contexts.iter().map(|c| c.messages().len()).sum()
    }

    /// Returns true if the catalog holds no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.message_count() == 0
    }

    /// Inserts a message into the named context, creating it on first use.
    ///
    /// # Errors
    /// [`CatalogError::DuplicateMessage`] when the `(context, source,
    /// comment)` triple already exists.
    pub fn insert(
        &mut self,
        context_name: &str,
        message: Message,
    ) -> Result<(), CatalogError> {
        let index = match self.index.get(context_name) {
            Some(&i) => i,
            None => {
                self.index.insert(context_name.to_string(), self.contexts.len());
                self.contexts.push(Context::new(context_name));
                self.contexts.len() - 1
            }
        };

        match self.contexts.get_mut(index) {
            Some(context) => context.push(message),
            // index は常に contexts を指すため到達しない
            None => Ok(()),
        }
    }

    /// Looks up the translation for `(context, source)`.
    ///
    /// Returns `None` when no entry matches or the entry has no
    /// displayable translation; it is the caller's policy to then show
    /// the source text verbatim.
    #[must_use]
    pub fn lookup(&self, context: &str, source: &str) -> Option<&str> {
        self.lookup_with_comment(context, source, None)
    }

    /// Looks up the translation for `(context, source, comment)`.
    #[must_use]
    pub fn lookup_with_comment(
        &self,
        context: &str,
        source: &str,
        comment: Option<&str>,
    ) -> Option<&str> {
        self.context(context)?.message_with_comment(source, comment)?.translated_text()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    /// メニューバー相当の小さなカタログを作る
    fn menu_catalog() -> Catalog {
        let mut catalog = Catalog::with_language("de_DE");
        catalog.insert("GUI::MainMenuBar", Message::new("&Game", "&Spiel")).unwrap();
        catalog.insert("GUI::MainMenuBar", Message::new("&Settings", "&Einstellungen")).unwrap();
        catalog.insert("GUI::Actions::Game", Message::new("&New game", "&Neues Spiel")).unwrap();
        catalog
    }

    #[googletest::test]
    fn test_lookup_finds_translation() {
        let catalog = menu_catalog();

        expect_that!(catalog.lookup("GUI::MainMenuBar", "&Game"), some(eq("&Spiel")));
        expect_that!(catalog.lookup("GUI::Actions::Game", "&New game"), some(eq("&Neues Spiel")));
    }

    #[rstest]
    #[case::unknown_context("GUI::Unknown", "&Game")]
    #[case::unknown_source("GUI::MainMenuBar", "&Replay")]
    #[case::source_from_other_context("GUI::MainMenuBar", "&New game")]
    fn test_lookup_misses(#[case] context: &str, #[case] source: &str) {
        let catalog = menu_catalog();

        assert_that!(catalog.lookup(context, source), none());
    }

    #[googletest::test]
    fn test_lookup_skips_unfinished() {
        let mut catalog = Catalog::new();
        let message = Message {
            state: TranslationState::Unfinished,
            ..Message::new("&End game", "Spiel &beenden")
        };
        catalog.insert("GUI::Actions::Game", message).unwrap();

        expect_that!(catalog.lookup("GUI::Actions::Game", "&End game"), none());
    }

    #[googletest::test]
    fn test_duplicate_message_is_rejected() {
        let mut catalog = menu_catalog();

        let result = catalog.insert("GUI::MainMenuBar", Message::new("&Game", "&Partie"));

        assert_that!(
            result,
            err(eq(&CatalogError::DuplicateMessage {
                context: "GUI::MainMenuBar".to_string(),
                source: "&Game".to_string(),
            }))
        );
    }

    #[googletest::test]
    fn test_same_source_with_comment_is_distinct() {
        let mut catalog = Catalog::new();
        catalog.insert("GUI::Dialogs", Message::new("Open", "Öffnen")).unwrap();

        let mut commented = Message::new("Open", "Geöffnet");
        commented.comment = Some("state of the dialog".to_string());
        catalog.insert("GUI::Dialogs", commented).unwrap();

        expect_that!(catalog.lookup("GUI::Dialogs", "Open"), some(eq("Öffnen")));
        expect_that!(
            catalog.lookup_with_comment("GUI::Dialogs", "Open", Some("state of the dialog")),
            some(eq("Geöffnet"))
        );
    }

    #[googletest::test]
    fn test_insertion_order_is_preserved() {
        let catalog = menu_catalog();

        let names: Vec<String> =
            catalog.contexts().iter().map(|c| c.name().to_owned()).collect();
        expect_that!(names, elements_are![eq("GUI::MainMenuBar"), eq("GUI::Actions::Game")]);

        let sources: Vec<_> = catalog
            .context("GUI::MainMenuBar")
            .expect("context exists")
            .messages()
            .iter()
            .map(|m| m.source.clone())
            .collect();
        expect_that!(sources, elements_are![eq("&Game"), eq("&Settings")]);
    }

    #[googletest::test]
    fn test_message_count() {
        let catalog = menu_catalog();

        expect_that!(catalog.message_count(), eq(3));
        expect_that!(catalog.is_empty(), eq(false));
        expect_that!(Catalog::new().is_empty(), eq(true));
    }
}
