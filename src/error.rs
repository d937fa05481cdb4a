use thiserror::Error;

/// 取得段階のエラー
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("ブラウザ初期化エラー: {0}")]
    BrowserInit(String),

    #[error("ナビゲーションエラー: {0}")]
    Navigation(String),

    #[error("タイムアウト: {0}")]
    Timeout(String),

    #[error("JavaScript実行エラー: {0}")]
    JavaScript(String),

    #[error("セレクタが不正です: {0}")]
    Selector(String),
}

/// 日時文字列の解析エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("日時の書式が不正です (DD/MM/YYYY HH:MM:SS): {0:?}")]
    Layout(String),

    #[error("存在しない日時です: {0:?}")]
    InvalidDate(String),

    #[error("タイムゾーン上に存在しない時刻です: {0:?}")]
    NonexistentLocalTime(String),
}

/// 永続化ストアのエラー
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLiteエラー: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("ファイル操作エラー: {0}")]
    FileIO(#[from] std::io::Error),

    #[error("保存できないレコードです: {0}")]
    InvalidRecord(String),
}

/// 同期実行のエラー（どの段階で失敗したかを保持する）
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("取得段階で失敗しました: {0}")]
    Fetch(#[from] FetchError),

    #[error("正規化段階で失敗しました: {0}")]
    Format(#[from] FormatError),

    #[error("保存段階で失敗しました: {0}")]
    Store(#[from] StoreError),
}

impl SyncError {
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch",
            Self::Format(_) => "normalize",
            Self::Store(_) => "store",
        }
    }
}

/// 環境変数からの設定読み込みエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("設定値が不正です: {key}={value:?} ({reason})")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}
