//! 設定ファイル・探索・検証を通したエンドツーエンドのテスト

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(missing_docs)]

use std::fs;
use std::path::Path;

use googletest::prelude::*;
use tempfile::TempDir;
use ts_catalog::config::ConfigManager;
use ts_catalog::diagnostics;
use ts_catalog::indexer;
use ts_catalog::translator;

const GERMAN_CATALOG: &str = include_str!("fixtures/connectfour_de.ts");

/// プロジェクトらしいディレクトリ構成を組み立てる
fn create_project(config: &str) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let i18n_dir = temp_dir.path().join("resources").join("i18n");
    fs::create_dir_all(&i18n_dir).unwrap();
    fs::write(i18n_dir.join("connectfour_de.ts"), GERMAN_CATALOG).unwrap();
    fs::write(temp_dir.path().join(".ts-catalog.json"), config).unwrap();
    temp_dir
}

/// ルートの設定を読み込む
fn load_settings(root: &Path) -> ConfigManager {
    let mut manager = ConfigManager::new();
    manager.load_settings(Some(root.to_path_buf())).unwrap();
    manager
}

#[googletest::test]
#[tokio::test]
async fn discovers_the_shipped_catalog() {
    let project = create_project(r#"{"catalogFiles": {"includePatterns": ["resources/i18n/*.ts"]}}"#);
    let manager = load_settings(project.path());

    let discovered =
        indexer::index_directory(project.path(), manager.get_settings()).await.unwrap();

    assert_that!(discovered, len(eq(1)));
    let entry = discovered.first().unwrap();
    expect_that!(entry.locale.as_ref().map(ToString::to_string), some(eq("de_DE")));
    expect_that!(entry.catalog.lookup("GUI::MainMenuBar", "&Game"), some(eq("&Spiel")));
}

#[googletest::test]
#[tokio::test]
async fn the_shipped_catalog_is_clean() {
    let project = create_project("{}");
    let manager = load_settings(project.path());

    let discovered =
        indexer::index_directory(project.path(), manager.get_settings()).await.unwrap();
    let entry = discovered.first().expect("catalog discovered");

    let findings = diagnostics::check_catalog(&entry.catalog, manager.get_settings());

    expect_that!(findings, is_empty());
}

#[googletest::test]
#[tokio::test]
async fn reports_missing_required_locales() {
    let project = create_project(r#"{"requiredLocales": ["de_DE", "fr_FR"]}"#);
    let manager = load_settings(project.path());

    let discovered =
        indexer::index_directory(project.path(), manager.get_settings()).await.unwrap();
    let locales: Vec<_> = discovered.iter().filter_map(|d| d.locale.clone()).collect();

    let missing: Vec<String> = diagnostics::missing_locales(&locales, manager.get_settings())
        .iter()
        .map(ToString::to_string)
        .collect();

    assert_that!(missing, elements_are![eq("fr_FR")]);
}

#[googletest::test]
#[tokio::test]
async fn builds_the_language_menu_from_discovery() {
    let project = create_project(r#"{"languageNameContext": "ConnectFour"}"#);
    let manager = load_settings(project.path());

    let discovered =
        indexer::index_directory(project.path(), manager.get_settings()).await.unwrap();
    let entries = translator::language_entries(
        &discovered,
        manager.get_settings().language_name_context.as_deref(),
    );

    assert_that!(entries, len(eq(1)));
    let entry = entries.first().unwrap();
    // 言語メニューには各言語が自身の言葉で表示される
    expect_that!(entry.name.as_deref(), some(eq("Deutsch")));
    expect_that!(entry.locale.as_ref().map(ToString::to_string), some(eq("de_DE")));
}
