//! radaresdeportugal.pt スクレイパーモジュール
//!
//! 速度取締パネルをヘッドレスブラウザで取得し、地区・登録日時・場所の
//! 生データとして返す

mod fetcher;
mod panels;
mod types;

pub use fetcher::RadaresFetcher;
pub use panels::{
    extract_panels, DATETIME_SELECTOR, DISTRICT_SELECTOR, LOCATION_SELECTOR, PANEL_SELECTOR,
};
pub use types::{CanonicalRecord, RawRecord, StoredRecord};
