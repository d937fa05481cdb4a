//! 取得した生レコードの正規化
//!
//! - 場所文字列から注記・編集注意書きを除去
//! - 登録日時 (DD/MM/YYYY HH:MM:SS) をUnixエポック秒に変換

use chrono::{NaiveDateTime, TimeZone, Timelike};
use tracing::debug;

use crate::config::TimestampZone;
use crate::error::FormatError;
use crate::radares::{CanonicalRecord, RawRecord};

/// 注記の開始・終了
pub const NOTES_OPEN: char = '[';
pub const NOTES_CLOSE: char = ']';
/// 「おおよその位置」注記
pub const APPROXIMATE_LOCATION_MARKER: &str = "LOCALIZAÇÃO APROXIMADA";
/// 管理者による編集の注意書き
pub const ADMIN_EDIT_MARKER: &str = "Editado pela Administração por um dos motivos:";

/// 登録日時の書式
pub const CREATED_DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// 場所文字列から注記以降を切り落とす
///
/// `[` と `]` の両方があれば最初の `[` で、続いて各マーカーの最初の出現位置で
/// 切り詰める。前後の空白は除去しない。
pub fn sanitize_location(location: &str) -> &str {
    let mut clean = location;

    if let (Some(start), Some(_)) = (clean.find(NOTES_OPEN), clean.find(NOTES_CLOSE)) {
        clean = &clean[..start];
    }

    for marker in [APPROXIMATE_LOCATION_MARKER, ADMIN_EDIT_MARKER] {
        if let Some(start) = clean.find(marker) {
            clean = &clean[..start];
        }
    }

    clean
}

/// `DD/MM/YYYY HH:MM:SS` の桁・区切り位置が一致するか
fn matches_layout(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 19
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'/',
            10 => *b == b' ',
            13 | 16 => *b == b':',
            _ => b.is_ascii_digit(),
        })
}

fn resolve<Tz: TimeZone>(tz: &Tz, naive: &NaiveDateTime) -> Option<i64> {
    tz.from_local_datetime(naive)
        .earliest()
        .map(|dt| dt.timestamp())
}

/// システムのローカルタイムゾーンで登録日時を解釈する
pub fn parse_timestamp(text: &str) -> Result<i64, FormatError> {
    Normalizer::default().parse_timestamp(text)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    zone: TimestampZone,
}

impl Normalizer {
    pub fn new(zone: TimestampZone) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> TimestampZone {
        self.zone
    }

    /// 登録日時をエポック秒に変換する（前後の空白は呼び出し側で除去すること）
    pub fn parse_timestamp(&self, text: &str) -> Result<i64, FormatError> {
        if !matches_layout(text) {
            return Err(FormatError::Layout(text.to_string()));
        }

        let naive = NaiveDateTime::parse_from_str(text, CREATED_DATETIME_FORMAT)
            .map_err(|_| FormatError::InvalidDate(text.to_string()))?;

        // chrono は秒 60 をうるう秒として受け付ける
        if naive.nanosecond() >= 1_000_000_000 {
            return Err(FormatError::InvalidDate(text.to_string()));
        }

        let timestamp = match self.zone {
            TimestampZone::Local => resolve(&chrono::Local, &naive),
            TimestampZone::Fixed(offset) => resolve(&offset, &naive),
        };

        timestamp.ok_or_else(|| FormatError::NonexistentLocalTime(text.to_string()))
    }

    pub fn normalize(&self, raw: &RawRecord) -> Result<CanonicalRecord, FormatError> {
        let created_at = self.parse_timestamp(raw.created_datetime.trim())?;

        Ok(CanonicalRecord {
            district: raw.district.trim().to_string(),
            created_at,
            location: sanitize_location(&raw.location).trim().to_string(),
        })
    }

    /// ページ順を保ったまま正規化する
    ///
    /// 場所が空のレコードは日時を解析する前に除外する。
    pub fn normalize_all(&self, raws: &[RawRecord]) -> Result<Vec<CanonicalRecord>, FormatError> {
        let mut records = Vec::with_capacity(raws.len());

        for raw in raws {
            if !raw.has_location() {
                debug!(
                    "Skipping record without location: district={:?} created={:?}",
                    raw.district, raw.created_datetime
                );
                continue;
            }
            records.push(self.normalize(raw)?);
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Local, NaiveDate};

    fn utc() -> Normalizer {
        Normalizer::new(TimestampZone::utc())
    }

    #[test]
    fn test_sanitize_brackets() {
        assert_eq!(sanitize_location("Lisboa [nota]"), "Lisboa ");
        assert_eq!(sanitize_location("[nota] Lisboa"), "");
    }

    #[test]
    fn test_sanitize_single_bracket_is_kept() {
        assert_eq!(sanitize_location("Lisboa [nota"), "Lisboa [nota");
        assert_eq!(sanitize_location("Lisboa nota]"), "Lisboa nota]");
    }

    #[test]
    fn test_sanitize_markers() {
        assert_eq!(sanitize_location("A-1 LOCALIZAÇÃO APROXIMADA km 3"), "A-1 ");
        assert_eq!(
            sanitize_location(
                "EN125 Faro Editado pela Administração por um dos motivos: duplicado"
            ),
            "EN125 Faro "
        );
    }

    #[test]
    fn test_sanitize_rules_apply_in_sequence() {
        assert_eq!(
            sanitize_location("IC19 LOCALIZAÇÃO APROXIMADA [Sintra] Editado pela Administração por um dos motivos: x"),
            "IC19 "
        );
        assert_eq!(
            sanitize_location("Av. Boavista [obras] LOCALIZAÇÃO APROXIMADA"),
            "Av. Boavista "
        );
    }

    #[test]
    fn test_sanitize_is_case_sensitive() {
        let text = "Rua Augusta localização aproximada";
        assert_eq!(sanitize_location(text), text);
    }

    #[test]
    fn test_sanitize_without_markers() {
        assert_eq!(sanitize_location("Porto"), "Porto");
        assert_eq!(sanitize_location(""), "");
        assert_eq!(sanitize_location("  Braga  "), "  Braga  ");
    }

    #[test]
    fn test_parse_timestamp_utc() {
        assert_eq!(utc().parse_timestamp("15/03/2024 08:30:00"), Ok(1_710_491_400));
        assert_eq!(utc().parse_timestamp("01/01/1970 00:00:00"), Ok(0));
    }

    #[test]
    fn test_parse_timestamp_fixed_offset() {
        let lisbon_summer = Normalizer::new(TimestampZone::Fixed(
            FixedOffset::east_opt(3600).unwrap(),
        ));
        assert_eq!(
            lisbon_summer.parse_timestamp("15/03/2024 08:30:00"),
            Ok(1_710_491_400 - 3600)
        );
    }

    #[test]
    fn test_parse_timestamp_local_zone() {
        let naive = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        let expected = Local
            .from_local_datetime(&naive)
            .earliest()
            .unwrap()
            .timestamp();

        assert_eq!(parse_timestamp("15/03/2024 08:30:00"), Ok(expected));
    }

    #[test]
    fn test_parse_timestamp_invalid_calendar_date() {
        assert_eq!(
            utc().parse_timestamp("31/02/2024 10:00:00"),
            Err(FormatError::InvalidDate("31/02/2024 10:00:00".into()))
        );
        assert!(matches!(
            utc().parse_timestamp("15/03/2024 24:00:00"),
            Err(FormatError::InvalidDate(_))
        ));
        assert!(matches!(
            utc().parse_timestamp("15/03/2024 23:59:60"),
            Err(FormatError::InvalidDate(_))
        ));
        assert!(utc().parse_timestamp("29/02/2024 12:00:00").is_ok());
        assert!(utc().parse_timestamp("29/02/2023 12:00:00").is_err());
    }

    #[test]
    fn test_parse_timestamp_rejects_other_layouts() {
        for text in [
            "",
            "2024-03-15 08:30:00",
            "15/3/2024 08:30:00",
            "15/03/2024 08:30",
            "15/03/2024T08:30:00",
            " 15/03/2024 08:30:00",
            "15/03/2024 08:30:00 ",
        ] {
            assert!(
                matches!(utc().parse_timestamp(text), Err(FormatError::Layout(_))),
                "accepted {:?}",
                text
            );
        }
    }

    #[test]
    fn test_normalize_trims_and_sanitizes() {
        let raw = RawRecord::new(
            "  Lisboa\n",
            " 15/03/2024 08:30:00 ",
            "Av. da Liberdade [junto ao n.º 10]",
        );

        let record = utc().normalize(&raw).unwrap();
        assert_eq!(
            record,
            CanonicalRecord::new("Lisboa", 1_710_491_400, "Av. da Liberdade")
        );
    }

    #[test]
    fn test_normalize_all_skips_blank_locations_before_parsing() {
        let raws = vec![
            RawRecord::new("Lisboa", "15/03/2024 08:30:00", "Marquês de Pombal"),
            RawRecord::new("Porto", "lixo", "   "),
            RawRecord::new("Faro", "15/03/2024 08:00:00", "EN125"),
        ];

        let records = utc().normalize_all(&raws).unwrap();
        let districts: Vec<_> = records.iter().map(|r| r.district.as_str()).collect();
        assert_eq!(districts, ["Lisboa", "Faro"]);
    }

    #[test]
    fn test_normalize_all_fails_on_garbled_datetime() {
        let raws = vec![
            RawRecord::new("Lisboa", "15/03/2024 08:30:00", "Marquês de Pombal"),
            RawRecord::new("Porto", "ontem", "Ponte da Arrábida"),
        ];

        assert_eq!(
            utc().normalize_all(&raws),
            Err(FormatError::Layout("ontem".into()))
        );
    }
}
