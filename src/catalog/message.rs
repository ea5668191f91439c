//! 翻訳メッセージの定義

use crate::types::SourceLocation;

/// Translation state of a message, as recorded by the extraction tool.
///
/// Only [`TranslationState::Finished`] translations are served by lookup;
/// the other states behave as "not found" so callers fall back to the
/// source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TranslationState {
    /// Reviewed translation, the default when no `type` attribute is set.
    #[default]
    Finished,
    /// Extracted but not yet translated (`type="unfinished"`).
    Unfinished,
    /// The source string no longer exists in the code (`type="vanished"`).
    Vanished,
    /// Kept for reference only (`type="obsolete"`).
    Obsolete,
}

impl PartialEq<&Self> for TranslationState {
    fn eq(&self, other: &&Self) -> bool {
        *self == **other
    }
}

impl TranslationState {
    /// `type` 属性値から状態を得る。`None` は完了済みとして扱う。
    #[must_use]
    pub fn from_attribute(value: Option<&str>) -> Option<Self> {
        match value {
            None => Some(Self::Finished),
            Some("unfinished") => Some(Self::Unfinished),
            Some("vanished") => Some(Self::Vanished),
            Some("obsolete") => Some(Self::Obsolete),
            Some(_) => None,
        }
    }

    /// シリアライズ時の `type` 属性値。完了済みは属性なし。
    #[must_use]
    pub const fn as_attribute(self) -> Option<&'static str> {
        match self {
            Self::Finished => None,
            Self::Unfinished => Some("unfinished"),
            Self::Vanished => Some("vanished"),
            Self::Obsolete => Some("obsolete"),
        }
    }
}

/// A single translatable UI string with its translation.
///
/// Corresponds to one `<message>` element: the original source text, the
/// translated text, the extraction locations and an optional
/// disambiguation comment. Messages are immutable once loaded into a
/// catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Original-language text, including mnemonic markers (`&Game`).
    pub source: String,
    /// Localized text. May be empty for unfinished messages.
    pub translation: String,
    /// Translation state from the `type` attribute.
    pub state: TranslationState,
    /// Disambiguation comment distinguishing identical source strings.
    pub comment: Option<String>,
    /// Extraction locations, in catalog order.
    pub locations: Vec<SourceLocation>,
}

impl Message {
    /// Creates a finished message without locations or comment.
    #[must_use]
    pub fn new(source: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            translation: translation.into(),
            state: TranslationState::default(),
            comment: None,
            locations: Vec::new(),
        }
    }

    /// Returns the translated text if this message can be displayed.
    ///
    /// Unfinished, vanished and obsolete messages answer `None`, as does a
    /// finished message whose translation is empty; the caller then falls
    /// back to [`Message::source`].
    #[must_use]
    pub fn translated_text(&self) -> Option<&str> {
        if self.state == TranslationState::Finished && !self.translation.is_empty() {
            Some(&self.translation)
        } else {
            None
        }
    }

    /// Returns true if the message has a displayable translation.
    #[must_use]
    pub fn is_translated(&self) -> bool {
        self.translated_text().is_some()
    }
}
