//! 速度取締レコードの型定義

use serde::{Deserialize, Serialize};

/// ページから取得したままの未加工レコード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// 地区
    pub district: String,
    /// 登録日時 (DD/MM/YYYY HH:MM:SS)
    pub created_datetime: String,
    /// 場所（注記を含む場合がある）
    pub location: String,
}

impl RawRecord {
    pub fn new(
        district: impl Into<String>,
        created_datetime: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            district: district.into(),
            created_datetime: created_datetime.into(),
            location: location.into(),
        }
    }

    /// 場所が空のレコードは不完全として扱う
    pub fn has_location(&self) -> bool {
        !self.location.trim().is_empty()
    }
}

/// 正規化済みレコード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub district: String,
    /// Unixエポック秒
    pub created_at: i64,
    /// 注記を除去した場所
    pub location: String,
}

impl CanonicalRecord {
    pub fn new(district: impl Into<String>, created_at: i64, location: impl Into<String>) -> Self {
        Self {
            district: district.into(),
            created_at,
            location: location.into(),
        }
    }

    pub fn has_location(&self) -> bool {
        !self.location.trim().is_empty()
    }
}

/// ストアに保存済みのレコード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// 挿入行ID
    pub id: i64,
    #[serde(flatten)]
    pub record: CanonicalRecord,
}
