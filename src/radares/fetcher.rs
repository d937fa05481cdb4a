//! radaresdeportugal.pt フェッチャー実装
//!
//! ヘッドレスChromeでページを開き、パネルの描画を待ってから
//! レンダリング済みHTMLを解析する

use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use chrono::Local;
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::error::FetchError;
use crate::traits::Fetcher;

use super::panels::{extract_panels, PANEL_SELECTOR};
use super::types::RawRecord;

/// パネル出現確認のインターバル（ミリ秒）
const PANEL_POLL_INTERVAL_MS: u64 = 500;

pub struct RadaresFetcher {
    config: SyncConfig,
    browser: Option<Browser>,
    page: Option<Page>,
}

impl RadaresFetcher {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config,
            browser: None,
            page: None,
        }
    }

    fn get_page(&self) -> Result<&Page, FetchError> {
        self.page
            .as_ref()
            .ok_or_else(|| FetchError::BrowserInit("ブラウザが初期化されていません".into()))
    }

    /// 速度取締パネルが1件以上描画されるまで待機
    async fn wait_for_panels(&self, page: &Page) -> Result<usize, FetchError> {
        info!("Waiting for speed control panels...");
        let start = Instant::now();
        let script = format!("document.querySelectorAll('{}').length", PANEL_SELECTOR);

        while start.elapsed() < self.config.timeout {
            match page.evaluate(script.as_str()).await {
                Ok(result) => {
                    let count = result.into_value::<usize>().unwrap_or(0);
                    if count > 0 {
                        info!("{} panels rendered after {:?}", count, start.elapsed());
                        return Ok(count);
                    }
                }
                Err(e) => debug!("Panel check error: {}", e),
            }

            sleep(Duration::from_millis(PANEL_POLL_INTERVAL_MS)).await;
        }

        if self.config.debug {
            self.log_screenshot(page).await;
        }

        Err(FetchError::Timeout(format!(
            "{}秒以内にパネル ({}) が表示されませんでした",
            self.config.timeout.as_secs(),
            PANEL_SELECTOR
        )))
    }

    /// デバッグスクリーンショット
    async fn log_screenshot(&self, page: &Page) {
        match page
            .screenshot(ScreenshotParams::builder().full_page(true).build())
            .await
        {
            Ok(screenshot) => {
                use base64::Engine;
                let encoded = base64::engine::general_purpose::STANDARD.encode(&screenshot);
                debug!("Page screenshot: data:image/png;base64,{}", encoded);
            }
            Err(e) => debug!("Failed to take screenshot: {}", e),
        }
    }

    /// 生データをファイルに保存（失敗しても取得は継続）
    fn save_snapshot(&self, dir: &Path, records: &[RawRecord]) {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let filename = dir.join(format!("radares_{}.json", timestamp));

        if let Err(e) = std::fs::create_dir_all(dir) {
            warn!("Failed to create snapshot directory {:?}: {}", dir, e);
            return;
        }

        match serde_json::to_string_pretty(records) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&filename, json) {
                    warn!("Failed to save snapshot: {}", e);
                } else {
                    info!("Saved raw snapshot to {:?}", filename);
                }
            }
            Err(e) => warn!("Failed to serialize snapshot: {}", e),
        }
    }
}

#[async_trait]
impl Fetcher for RadaresFetcher {
    async fn initialize(&mut self) -> Result<(), FetchError> {
        info!("Initializing browser...");

        let mut builder = BrowserConfig::builder()
            .window_size(1280, 800)
            .request_timeout(self.config.timeout);

        if let Some(path) = &self.config.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        if !self.config.headless {
            builder = builder.with_head();
        }

        builder = builder
            .no_sandbox()
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu");

        if self.config.debug {
            builder = builder.arg("--enable-logging=stderr").arg("--v=1");
        }

        let browser_config = builder
            .build()
            .map_err(|e| FetchError::BrowserInit(format!("ブラウザ設定エラー: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| FetchError::BrowserInit(e.to_string()))?;

        // ブラウザイベントハンドラをバックグラウンドで実行
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!("Browser event: {:?}", event);
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| FetchError::BrowserInit(e.to_string()))?;

        self.browser = Some(browser);
        self.page = Some(page);

        info!("Browser initialized");
        Ok(())
    }

    async fn fetch(&mut self, url: &str) -> Result<Vec<RawRecord>, FetchError> {
        let page = self.get_page()?;
        info!("Fetching speed controls from {}", url);

        page.goto(url)
            .await
            .map_err(|e| FetchError::Navigation(e.to_string()))?;

        self.wait_for_panels(page).await?;

        let html = page
            .content()
            .await
            .map_err(|e| FetchError::JavaScript(e.to_string()))?;
        debug!("Rendered page size: {} bytes", html.len());

        let records = extract_panels(&html)?;
        info!("Extracted {} raw records", records.len());

        if let Some(dir) = &self.config.snapshot_dir {
            self.save_snapshot(dir, &records);
        }

        Ok(records)
    }

    async fn close(&mut self) -> Result<(), FetchError> {
        info!("Closing browser...");

        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                debug!("Failed to close page: {}", e);
            }
        }
        self.browser = None;

        info!("Browser closed");
        Ok(())
    }
}
