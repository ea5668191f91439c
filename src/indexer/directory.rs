//! ディレクトリツリーからのカタログ探索

use std::path::{
    Path,
    PathBuf,
};

use futures::StreamExt as _;
use ignore::WalkBuilder;

use crate::config::{
    CatalogMatcher,
    CatalogSettings,
};
use crate::indexer::types::{
    DiscoveredCatalog,
    IndexerError,
};
use crate::locale::Locale;
use crate::ts;

/// ルート以下のカタログを探索して読み込む
///
/// 設定されたパターンに一致するファイルを並列にパースします。読めない
/// ファイルや不正なカタログは警告を出してスキップし、残りの探索は続行
/// します。結果はパス順で返します。
///
/// # Errors
/// [`IndexerError`] 設定されたパターンが不正な場合
pub async fn index_directory(
    root: &Path,
    settings: &CatalogSettings,
) -> Result<Vec<DiscoveredCatalog>, IndexerError> {
    tracing::debug!(root = %root.display(), "Indexing catalogs");

    let matcher = CatalogMatcher::new(root.to_path_buf(), settings)?;
    let files = find_catalog_files(root, &matcher);
    tracing::debug!(count = files.len(), "Found catalog candidates");

    let parallelism = settings.indexing.num_threads.unwrap_or_else(default_num_threads);

    // 並列処理でファイルをパース
    let mut discovered: Vec<DiscoveredCatalog> = futures::stream::iter(files)
        .map(load_catalog)
        .buffer_unordered(parallelism.max(1))
        .filter_map(futures::future::ready)
        .collect()
        .await;

    // buffer_unordered で崩れた順序をパス順に戻す
    discovered.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(discovered)
}

/// 単一ファイルを読み込む。失敗は警告を出して `None`。
async fn load_catalog(path: PathBuf) -> Option<DiscoveredCatalog> {
    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Failed to read catalog file {:?}: {}", path, e);
            return None;
        }
    };

    let catalog = match ts::parse_str(&content) {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::warn!("Failed to parse catalog file {:?}: {}", path, e);
            return None;
        }
    };

    let locale = catalog
        .language()
        .and_then(|name| name.parse::<Locale>().ok())
        .or_else(|| crate::locale::detect_from_path(&path));

    Some(DiscoveredCatalog { path, locale, catalog })
}

/// カタログ候補のファイルを検索する
fn find_catalog_files(root: &Path, matcher: &CatalogMatcher) -> Vec<PathBuf> {
    let mut found_files = Vec::new();

    // ignore クレートでファイルを走査
    for result in WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .follow_links(false)
        .build()
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(?err, "Failed to read directory entry");
                continue;
            }
        };

        // ファイルのみを対象
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        if matcher.is_catalog_file(entry.path()) {
            found_files.push(entry.path().to_path_buf());
        }
    }

    found_files
}

/// 並列度のデフォルト値。CPU コア数の 80%（最低 1）。
fn default_num_threads() -> usize {
    (num_cpus::get() * 4).div_ceil(5).max(1)
}
