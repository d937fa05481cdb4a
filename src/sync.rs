//! 新規レコードの選別
//!
//! ページは新しい順に並んでいる前提で、保存済みの最大登録日時より
//! 厳密に新しいレコードだけを選ぶ。

use tracing::debug;

use crate::radares::CanonicalRecord;

/// 保存済み最大日時以下のレコードに出会ったときの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanPolicy {
    /// 最初の既存レコードで走査を打ち切る（新しい順が保証される場合）
    #[default]
    ShortCircuit,
    /// 打ち切らずに全件を判定する
    FullScan,
}

impl ScanPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "short-circuit" | "short_circuit" => Some(Self::ShortCircuit),
            "full-scan" | "full_scan" => Some(Self::FullScan),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncFilter {
    policy: ScanPolicy,
}

impl SyncFilter {
    pub fn new(policy: ScanPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ScanPolicy {
        self.policy
    }

    /// 保存すべきレコードを入力順のまま返す
    ///
    /// 場所が空のレコードは日時に関係なく除外する。`previous_max` が `None`
    /// （テーブルが空）の場合は残り全件が新規。
    pub fn select_new(
        &self,
        records: Vec<CanonicalRecord>,
        previous_max: Option<i64>,
    ) -> Vec<CanonicalRecord> {
        let complete = records.into_iter().filter(CanonicalRecord::has_location);

        let Some(max) = previous_max else {
            return complete.collect();
        };

        let selected: Vec<_> = match self.policy {
            ScanPolicy::ShortCircuit => complete.take_while(|r| r.created_at > max).collect(),
            ScanPolicy::FullScan => complete.filter(|r| r.created_at > max).collect(),
        };

        debug!(
            "Selected {} new records (previous_max={}, policy={:?})",
            selected.len(),
            max,
            self.policy
        );
        selected
    }
}

/// 既定の打ち切り方式で新規レコードを選ぶ
pub fn select_new(records: Vec<CanonicalRecord>, previous_max: Option<i64>) -> Vec<CanonicalRecord> {
    SyncFilter::default().select_new(records, previous_max)
}
