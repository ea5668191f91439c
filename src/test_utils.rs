//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use crate::catalog::{
    Catalog,
    Message,
};

/// テスト用の Catalog を作成する
///
/// # Arguments
/// * `language` - 対象ロケール（例: "de_DE"）
/// * `entries` - `(context, source, translation)` の並び
///
/// # Returns
/// 作成された Catalog
pub(crate) fn create_catalog(language: &str, entries: &[(&str, &str, &str)]) -> Catalog {
    let mut catalog = Catalog::with_language(language);
    for (context, source, translation) in entries {
        catalog.insert(context, Message::new(*source, *translation)).unwrap();
    }
    catalog
}
