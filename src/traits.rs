use async_trait::async_trait;

use crate::error::{FetchError, StoreError};
use crate::radares::{CanonicalRecord, RawRecord};

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// ブラウザ初期化
    async fn initialize(&mut self) -> Result<(), FetchError>;

    /// ページから生レコードをページ順に取得
    async fn fetch(&mut self, url: &str) -> Result<Vec<RawRecord>, FetchError>;

    /// リソース解放
    async fn close(&mut self) -> Result<(), FetchError>;

    /// 一括実行（initialize → fetch → close）
    ///
    /// fetch が失敗しても close は実行し、fetch のエラーを優先して返す。
    async fn execute(&mut self, url: &str) -> Result<Vec<RawRecord>, FetchError> {
        self.initialize().await?;
        let fetched = self.fetch(url).await;
        let closed = self.close().await;
        let records = fetched?;
        closed?;
        Ok(records)
    }
}

/// 速度取締レコードの永続化先
pub trait RecordStore {
    /// 保存済みレコードの最大登録日時（空なら `None`）
    fn read_max_created_at(&self) -> Result<Option<i64>, StoreError>;

    /// 全件を一括で追加する。失敗時は1件も保存されない
    fn append_all(&mut self, records: &[CanonicalRecord]) -> Result<usize, StoreError>;
}
