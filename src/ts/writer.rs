//! TS XML 書き出し
//!
//! `lrelease` 系ツールが出力する形とバイト単位で互換なシリアライズを行い
//! ます。整形済みカタログの読み込みと書き出しはラウンドトリップで一致し
//! ます。

use std::borrow::Cow;
use std::fmt::Write as _;
use std::path::Path;

use thiserror::Error;

use crate::catalog::{
    Catalog,
    Context,
    Message,
};

/// Errors raised while writing a TS document.
#[derive(Error, Debug)]
pub enum WriteError {
    /// Error when failing to write the catalog file
    #[error("failed to write catalog file: {0}")]
    Io(#[from] std::io::Error),
}

/// Serializes a catalog to TS XML.
///
/// The output matches the shape the extraction tooling writes: XML
/// declaration, `<!DOCTYPE TS>`, 4-space indent steps, `filename` before
/// `line`, and minimal text escaping (`&`, `<`, `>`), so a parsed file is
/// reproduced byte for byte.
#[must_use]
pub fn to_xml(catalog: &Catalog) -> String {
    let mut out = String::new();

    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n<TS");
    push_attribute(&mut out, "version", catalog.version());
    push_attribute(&mut out, "language", catalog.language());
    push_attribute(&mut out, "sourcelanguage", catalog.source_language());
    out.push_str(">\n");

    for context in catalog.contexts() {
        write_context(&mut out, context);
    }

    out.push_str("</TS>\n");
    out
}

/// Serializes a catalog and writes it to a file.
///
/// # Errors
/// [`WriteError::Io`] when the file cannot be written.
pub fn write_file(catalog: &Catalog, path: &Path) -> Result<(), WriteError> {
    std::fs::write(path, to_xml(catalog))?;
    Ok(())
}

/// `<context>` 一つを書き出す
fn write_context(out: &mut String, context: &Context) {
    out.push_str("<context>\n");
    let _ = writeln!(out, "    <name>{}</name>", escape_text(context.name()));

    for message in context.messages() {
        write_message(out, message);
    }

    out.push_str("</context>\n");
}

/// `<message>` 一つを書き出す
fn write_message(out: &mut String, message: &Message) {
    out.push_str("    <message>\n");

    for location in &message.locations {
        let _ = writeln!(
            out,
            "        <location filename=\"{}\" line=\"{}\"/>",
            escape_attribute(&location.filename),
            location.line
        );
    }

    let _ = writeln!(out, "        <source>{}</source>", escape_text(&message.source));

    if let Some(comment) = &message.comment {
        let _ = writeln!(out, "        <comment>{}</comment>", escape_text(comment));
    }

    out.push_str("        <translation");
    if let Some(state) = message.state.as_attribute() {
        let _ = write!(out, " type=\"{state}\"");
    }
    let _ = writeln!(out, ">{}</translation>", escape_text(&message.translation));

    out.push_str("    </message>\n");
}

/// 値があれば ` key="value"` を付け足す
fn push_attribute(out: &mut String, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        let _ = write!(out, " {key}=\"{}\"", escape_attribute(value));
    }
}

/// テキストノード用エスケープ。
///
/// 抽出ツールの出力に合わせて `&`, `<`, `>` だけを置き換え、引用符は
/// そのまま残す。
fn escape_text(text: &str) -> Cow<'_, str> {
    escape_with(text, false)
}

/// 属性値用エスケープ。テキストに加えて `"` を置き換える。
fn escape_attribute(text: &str) -> Cow<'_, str> {
    escape_with(text, true)
}

/// 共通のエスケープ処理
fn escape_with(text: &str, quotes: bool) -> Cow<'_, str> {
    let needs_escape =
        |c: char| matches!(c, '&' | '<' | '>') || (quotes && c == '"');

    if !text.chars().any(needs_escape) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' if quotes => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }

    Cow::Owned(escaped)
}
