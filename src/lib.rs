//! 速度取締情報スクレイパー・同期ライブラリ
//!
//! - radaresdeportugal.pt の速度取締パネルをヘッドレスブラウザで取得
//! - 場所の注記を除去し、登録日時をエポック秒に変換
//! - 保存済みの最新日時より新しいレコードだけをSQLiteに追記
//!
//! # 使用例
//!
//! ```rust,ignore
//! use radares_sync::{SyncConfig, SyncRequest, SyncService};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service = SyncService::new(SyncConfig::new("./radaresPT.db"));
//!
//!     let report = service.call(SyncRequest::new()).await.unwrap();
//!     println!("Appended: {}", report.appended);
//! }
//! ```
//!
//! # 独自のフェッチャー・ストアを使う例
//!
//! ```rust,ignore
//! use radares_sync::{Normalizer, SqliteStore, SyncFilter, SyncPipeline, TimestampZone};
//!
//! let pipeline = SyncPipeline::new(
//!     "https://temporeal.radaresdeportugal.pt/",
//!     Normalizer::new(TimestampZone::Local),
//!     SyncFilter::default(),
//! );
//! let mut store = SqliteStore::open_in_memory()?;
//! let report = pipeline.run(&mut my_fetcher, &mut store).await?;
//! ```

pub mod config;
pub mod error;
pub mod normalize;
pub mod radares;
pub mod service;
pub mod store;
pub mod sync;
pub mod traits;

// 主要な型をリエクスポート
pub use config::{SyncConfig, TimestampZone};
pub use error::{ConfigError, FetchError, FormatError, StoreError, SyncError};
pub use normalize::{parse_timestamp, sanitize_location, Normalizer};
pub use radares::{CanonicalRecord, RadaresFetcher, RawRecord, StoredRecord};
pub use service::{SyncPipeline, SyncReport, SyncRequest, SyncService};
pub use store::SqliteStore;
pub use sync::{select_new, ScanPolicy, SyncFilter};
pub use traits::{Fetcher, RecordStore};
