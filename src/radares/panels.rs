//! レンダリング済みHTMLからの速度取締パネル抽出

use scraper::{ElementRef, Html, Selector};

use crate::error::FetchError;

use super::types::RawRecord;

/// 速度取締1件分のパネル
pub const PANEL_SELECTOR: &str = ".panel.panel-default";
pub const DISTRICT_SELECTOR: &str = ".panel-body > h4";
pub const DATETIME_SELECTOR: &str = ".panel-heading > p:not(.pull-right)";
pub const LOCATION_SELECTOR: &str = ".panel-body > p.lead";

fn selector(css: &str) -> Result<Selector, FetchError> {
    Selector::parse(css).map_err(|e| FetchError::Selector(format!("{}: {:?}", css, e)))
}

/// パネル内で最初に一致した要素のテキスト（存在しなければ空文字）
fn first_text(panel: &ElementRef<'_>, selector: &Selector) -> String {
    panel
        .select(selector)
        .next()
        .map(|element| element.text().collect::<String>())
        .unwrap_or_default()
}

/// ページ上の全パネルをページ順に抽出する
///
/// 場所が空のパネルもそのまま返す（除外は正規化側で行う）。
pub fn extract_panels(html: &str) -> Result<Vec<RawRecord>, FetchError> {
    let panel_selector = selector(PANEL_SELECTOR)?;
    let district_selector = selector(DISTRICT_SELECTOR)?;
    let datetime_selector = selector(DATETIME_SELECTOR)?;
    let location_selector = selector(LOCATION_SELECTOR)?;

    let document = Html::parse_document(html);

    let records = document
        .select(&panel_selector)
        .map(|panel| RawRecord {
            district: first_text(&panel, &district_selector),
            created_datetime: first_text(&panel, &datetime_selector),
            location: first_text(&panel, &location_selector),
        })
        .collect();

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div class="panel panel-default">
            <div class="panel-heading">
              <p class="pull-right">há 5 minutos</p>
              <p>15/03/2024 08:30:00</p>
            </div>
            <div class="panel-body">
              <h4>Lisboa</h4>
              <p class="lead">Av. da Liberdade [junto ao n.º 10]</p>
            </div>
          </div>
          <div class="panel panel-default">
            <div class="panel-heading">
              <p class="pull-right">há 1 hora</p>
              <p>15/03/2024 07:45:10</p>
            </div>
            <div class="panel-body">
              <h4>Porto</h4>
            </div>
          </div>
          <div class="panel panel-info">
            <div class="panel-body"><h4>Publicidade</h4></div>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_extract_panels_in_page_order() {
        let records = extract_panels(PAGE).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].district, "Lisboa");
        assert_eq!(records[0].created_datetime, "15/03/2024 08:30:00");
        assert_eq!(records[0].location, "Av. da Liberdade [junto ao n.º 10]");
        assert_eq!(records[1].district, "Porto");
        assert_eq!(records[1].created_datetime, "15/03/2024 07:45:10");
    }

    #[test]
    fn test_panel_without_location_is_kept_with_empty_field() {
        let records = extract_panels(PAGE).unwrap();
        assert_eq!(records[1].location, "");
        assert!(!records[1].has_location());
    }

    #[test]
    fn test_page_without_panels() {
        let records = extract_panels("<html><body><p>sem dados</p></body></html>").unwrap();
        assert!(records.is_empty());
    }
}
