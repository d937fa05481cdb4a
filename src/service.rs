use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tower::Service;
use tracing::info;

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::normalize::Normalizer;
use crate::radares::RadaresFetcher;
use crate::store::SqliteStore;
use crate::sync::SyncFilter;
use crate::traits::{Fetcher, RecordStore};

/// 同期1回分の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// 実行前の保存済み最大登録日時
    pub previous_max: Option<i64>,
    /// 取得した生レコード数
    pub fetched: usize,
    /// 場所が空で除外した件数
    pub discarded: usize,
    /// 新規と判定した件数
    pub selected: usize,
    /// ストアに追加した件数
    pub appended: usize,
    /// 追加したレコードのうち最新の登録日時
    pub newest_created_at: Option<i64>,
}

/// 取得 → 正規化 → 選別 → 追記
#[derive(Debug, Clone)]
pub struct SyncPipeline {
    url: String,
    normalizer: Normalizer,
    filter: SyncFilter,
}

impl SyncPipeline {
    pub fn new(url: impl Into<String>, normalizer: Normalizer, filter: SyncFilter) -> Self {
        Self {
            url: url.into(),
            normalizer,
            filter,
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(
            config.url.clone(),
            Normalizer::new(config.timezone),
            SyncFilter::new(config.scan_policy),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn run<F, S>(&self, fetcher: &mut F, store: &mut S) -> Result<SyncReport, SyncError>
    where
        F: Fetcher,
        S: RecordStore + Send,
    {
        let previous_max = store.read_max_created_at()?;
        info!("Starting sync run: url={}, previous_max={:?}", self.url, previous_max);

        let raws = fetcher.execute(&self.url).await?;
        let canonical = self.normalizer.normalize_all(&raws)?;
        let normalized = canonical.len();

        let selected = self.filter.select_new(canonical, previous_max);
        let newest_created_at = selected.iter().map(|r| r.created_at).max();

        let appended = if selected.is_empty() {
            0
        } else {
            store.append_all(&selected)?
        };

        let report = SyncReport {
            previous_max,
            fetched: raws.len(),
            discarded: raws.len() - normalized,
            selected: selected.len(),
            appended,
            newest_created_at,
        };

        info!(
            "Sync run complete: fetched={}, discarded={}, appended={}",
            report.fetched, report.discarded, report.appended
        );
        Ok(report)
    }
}

/// 同期リクエスト
#[derive(Debug, Clone, Default)]
pub struct SyncRequest {
    /// 取得先URLの上書き
    pub url: Option<String>,
}

impl SyncRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// tower::Serviceを実装した同期サービス（SQLite + ヘッドレスChrome）
#[derive(Debug, Clone)]
pub struct SyncService {
    config: SyncConfig,
}

impl SyncService {
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }
}

impl Service<SyncRequest> for SyncService {
    type Response = SyncReport;
    type Error = SyncError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: SyncRequest) -> Self::Future {
        let mut config = self.config.clone();
        if let Some(url) = req.url {
            config.url = url;
        }
        info!("同期リクエスト受信: url={}, db={:?}", config.url, config.db_path);

        Box::pin(async move {
            let mut store = SqliteStore::open(&config.db_path)?;
            let pipeline = SyncPipeline::from_config(&config);
            let mut fetcher = RadaresFetcher::new(config);

            pipeline.run(&mut fetcher, &mut store).await
        })
    }
}
