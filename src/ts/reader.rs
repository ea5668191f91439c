//! TS XML 読み込み
//!
//! イベントベースで `<TS>` ドキュメントを走査してカタログを構築します。
//! 未知の要素はフォーマットの将来の拡張とみなし、デバッグログを出して
//! 読み飛ばします。重複メッセージは不変条件違反としてエラーになります。

use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{
    BytesStart,
    Event,
};
use thiserror::Error;

use crate::catalog::{
    Catalog,
    CatalogError,
    Message,
    TranslationState,
};
use crate::types::SourceLocation;

/// Errors raised while reading a TS document.
#[derive(Error, Debug)]
pub enum ReadError {
    /// Error when failing to read the catalog file
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    /// Error reported by the XML parser
    #[error("malformed XML: {0}")]
    Xml(String),
    /// The document has no `<TS>` root element
    #[error("not a TS document: missing <TS> root element")]
    MissingRoot,
    /// A known element appeared in the wrong place
    #[error("unexpected element <{element}> in <{parent}>")]
    UnexpectedElement {
        /// The misplaced element.
        element: String,
        /// The element it appeared in.
        parent: String,
    },
    /// A `<context>` carries messages before its `<name>`
    #[error("<context> is missing its <name>")]
    MissingContextName,
    /// A `<message>` has no `<source>`
    #[error("<message> without <source> in context '{context}'")]
    MissingSource {
        /// Context the message appeared in.
        context: String,
    },
    /// A `<location>` line attribute is not a number
    #[error("invalid line number '{value}' in <location>")]
    InvalidLineNumber {
        /// The offending attribute value.
        value: String,
    },
    /// A `<translation>` carries an unknown `type` attribute
    #[error("unknown translation state '{value}'")]
    UnknownState {
        /// The offending attribute value.
        value: String,
    },
    /// The uniqueness invariant was violated
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Parses a TS document from a string.
///
/// # Errors
/// [`ReadError`] on malformed XML, structural problems or duplicate
/// `(context, source, comment)` entries.
pub fn parse_str(xml: &str) -> Result<Catalog, ReadError> {
    let mut reader = Reader::from_str(xml);
    let mut state = ParserState::default();

    loop {
        let event = reader.read_event().map_err(|e| ReadError::Xml(e.to_string()))?;

        if state.skip_depth > 0 {
            match event {
                Event::Start(_) => state.skip_depth += 1,
                Event::End(_) => state.skip_depth -= 1,
                Event::Eof => break,
                _ => {}
            }
            continue;
        }

        match event {
            Event::Decl(_) | Event::DocType(_) | Event::Comment(_) | Event::PI(_) => {}
            Event::Text(t) => {
                let chunk = t.unescape().map_err(|e| ReadError::Xml(e.to_string()))?;
                if state.field.is_some() {
                    state.text.push_str(&chunk);
                }
                // 要素間の整形用空白はテキスト対象外のときは無視する
            }
            Event::CData(c) => {
                if state.field.is_some() {
                    let bytes = c.into_inner();
                    state.text.push_str(&String::from_utf8_lossy(&bytes));
                }
            }
            Event::Start(e) => state.handle_start(&e)?,
            Event::Empty(e) => state.handle_empty(&e)?,
            Event::End(e) => state.handle_end(e.name().as_ref())?,
            Event::Eof => break,
            _ => {}
        }
    }

    state.catalog.ok_or(ReadError::MissingRoot)
}

/// Reads and parses a TS document from a file.
///
/// # Errors
/// [`ReadError::Io`] on read failure, otherwise as [`parse_str`].
pub fn parse_file(path: &Path) -> Result<Catalog, ReadError> {
    let content = std::fs::read_to_string(path)?;
    parse_str(&content)
}

/// どのテキスト要素を読み取り中か
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextField {
    /// `<name>` 内
    Name,
    /// `<source>` 内
    Source,
    /// `<translation>` 内
    Translation,
    /// `<comment>` 内
    Comment,
}

/// 構築途中の `<message>`
#[derive(Debug, Default)]
struct MessageDraft {
    /// `<source>` の内容。必須。
    source: Option<String>,
    /// `<translation>` の内容
    translation: String,
    /// `type` 属性から得た状態
    state: TranslationState,
    /// `<comment>` の内容
    comment: Option<String>,
    /// `<location>` の列
    locations: Vec<SourceLocation>,
}

impl MessageDraft {
    /// ドラフトを確定してメッセージにする
    fn build(self, context: &str) -> Result<Message, ReadError> {
        let source = self
            .source
            .ok_or_else(|| ReadError::MissingSource { context: context.to_string() })?;

        Ok(Message {
            source,
            translation: self.translation,
            state: self.state,
            comment: self.comment,
            locations: self.locations,
        })
    }
}

/// イベントループの可変状態
#[derive(Debug, Default)]
struct ParserState {
    /// `<TS>` を見た後に構築されるカタログ
    catalog: Option<Catalog>,
    /// `<context>` の内側にいるか
    in_context: bool,
    /// 現在のコンテキスト名（`<name>` 読了後）
    context_name: Option<String>,
    /// 構築途中のメッセージ
    draft: Option<MessageDraft>,
    /// 読み取り中のテキスト要素
    field: Option<TextField>,
    /// テキスト要素の蓄積バッファ
    text: String,
    /// 未知の要素を読み飛ばしている深さ
    skip_depth: usize,
}

impl ParserState {
    /// 開始タグの処理
    fn handle_start(&mut self, e: &BytesStart<'_>) -> Result<(), ReadError> {
        match e.name().as_ref() {
            b"TS" if self.catalog.is_none() => {
                self.catalog = Some(read_ts_attributes(e)?);
            }
            b"context" if self.catalog.is_some() && !self.in_context => {
                self.in_context = true;
            }
            b"name" if self.in_context && self.draft.is_none() => {
                self.begin_text(TextField::Name);
            }
            b"message" if self.in_context && self.draft.is_none() => {
                self.draft = Some(MessageDraft::default());
            }
            b"location" if self.draft.is_some() => {
                let location = read_location(e)?;
                if let Some(draft) = &mut self.draft {
                    draft.locations.push(location);
                }
            }
            b"source" if self.draft.is_some() => self.begin_text(TextField::Source),
            b"translation" if self.draft.is_some() => {
                self.set_translation_state(e)?;
                self.begin_text(TextField::Translation);
            }
            b"comment" if self.draft.is_some() => self.begin_text(TextField::Comment),
            known @ (b"TS" | b"context" | b"name" | b"message" | b"location" | b"source"
            | b"translation" | b"comment") => {
                return Err(ReadError::UnexpectedElement {
                    element: String::from_utf8_lossy(known).into_owned(),
                    parent: self.parent_name().to_string(),
                });
            }
            unknown => {
                tracing::debug!(
                    element = %String::from_utf8_lossy(unknown),
                    "skipping unknown element"
                );
                self.skip_depth = 1;
            }
        }

        Ok(())
    }

    /// 空要素タグの処理
    fn handle_empty(&mut self, e: &BytesStart<'_>) -> Result<(), ReadError> {
        match e.name().as_ref() {
            b"location" if self.draft.is_some() => {
                let location = read_location(e)?;
                if let Some(draft) = &mut self.draft {
                    draft.locations.push(location);
                }
            }
            // <translation type="unfinished"/> の形
            b"translation" if self.draft.is_some() => self.set_translation_state(e)?,
            unknown => {
                tracing::debug!(
                    element = %String::from_utf8_lossy(unknown),
                    "skipping unknown empty element"
                );
            }
        }

        Ok(())
    }

    /// 終了タグの処理
    fn handle_end(&mut self, name: &[u8]) -> Result<(), ReadError> {
        match name {
            b"name" => {
                self.context_name = Some(std::mem::take(&mut self.text));
                self.field = None;
            }
            b"source" => {
                if let Some(draft) = &mut self.draft {
                    draft.source = Some(std::mem::take(&mut self.text));
                }
                self.field = None;
            }
            b"translation" => {
                if let Some(draft) = &mut self.draft {
                    draft.translation = std::mem::take(&mut self.text);
                }
                self.field = None;
            }
            b"comment" => {
                if let Some(draft) = &mut self.draft {
                    draft.comment = Some(std::mem::take(&mut self.text));
                }
                self.field = None;
            }
            b"message" => {
                if let Some(draft) = self.draft.take() {
                    let context =
                        self.context_name.clone().ok_or(ReadError::MissingContextName)?;
                    let message = draft.build(&context)?;
                    if let Some(catalog) = &mut self.catalog {
                        catalog.insert(&context, message)?;
                    }
                }
            }
            b"context" => {
                self.in_context = false;
                self.context_name = None;
            }
            _ => {}
        }

        Ok(())
    }

    /// テキスト要素の読み取りを開始する
    fn begin_text(&mut self, field: TextField) {
        self.field = Some(field);
        self.text.clear();
    }

    /// `type` 属性をドラフトへ反映する
    fn set_translation_state(&mut self, e: &BytesStart<'_>) -> Result<(), ReadError> {
        let value = attribute_value(e, b"type")?;
        let state = TranslationState::from_attribute(value.as_deref()).ok_or_else(|| {
            ReadError::UnknownState { value: value.clone().unwrap_or_default() }
        })?;

        if let Some(draft) = &mut self.draft {
            draft.state = state;
        }

        Ok(())
    }

    /// エラーメッセージ用の現在位置
    fn parent_name(&self) -> &'static str {
        if self.draft.is_some() {
            "message"
        } else if self.in_context {
            "context"
        } else if self.catalog.is_some() {
            "TS"
        } else {
            "document"
        }
    }
}

/// `<TS>` の属性からカタログの雛形を作る
fn read_ts_attributes(e: &BytesStart<'_>) -> Result<Catalog, ReadError> {
    let mut catalog = Catalog::new();

    if let Some(version) = attribute_value(e, b"version")? {
        catalog.set_version(version);
    }
    if let Some(language) = attribute_value(e, b"language")? {
        catalog.set_language(language);
    }
    if let Some(source_language) = attribute_value(e, b"sourcelanguage")? {
        catalog.set_source_language(source_language);
    }

    Ok(catalog)
}

/// `<location>` の属性を読み取る
fn read_location(e: &BytesStart<'_>) -> Result<SourceLocation, ReadError> {
    let filename = attribute_value(e, b"filename")?.unwrap_or_default();

    let line = match attribute_value(e, b"line")? {
        Some(value) => value
            .parse::<u32>()
            .map_err(|_| ReadError::InvalidLineNumber { value })?,
        None => 0,
    };

    Ok(SourceLocation { filename, line })
}

/// 属性値を取り出す（エンティティはデコード済み）
fn attribute_value(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, ReadError> {
    for attribute in e.attributes() {
        let attribute = attribute.map_err(|err| ReadError::Xml(err.to_string()))?;
        if attribute.key.as_ref() == name {
            let value =
                attribute.unescape_value().map_err(|err| ReadError::Xml(err.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }

    Ok(None)
}
