//! カタログ探索（ディレクトリ走査と並列読み込み）

mod directory;
mod types;

pub use directory::index_directory;
pub use types::{
    DiscoveredCatalog,
    IndexerError,
};
