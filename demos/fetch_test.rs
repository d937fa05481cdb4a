//! フェッチャー単体テスト（ストアには書き込まない）
//!
//! 実行方法:
//! ```
//! RADARES_HEADLESS=false cargo run --example fetch_test
//! ```

use radares_sync::{Fetcher, Normalizer, RadaresFetcher, SyncConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ログ設定
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = SyncConfig::from_env()?;
    let url = config.url.clone();
    let normalizer = Normalizer::new(config.timezone);

    println!("=== Radares Fetcher Test ===");
    println!("URL: {}", url);
    println!("Headless: {}", config.headless);
    println!();

    let mut fetcher = RadaresFetcher::new(config);
    let raws = fetcher.execute(&url).await?;
    let records = normalizer.normalize_all(&raws)?;

    println!("Raw records: {}", raws.len());
    println!("With location: {}", records.len());
    println!();

    // 最初の5件を表示
    for (i, record) in records.iter().take(5).enumerate() {
        println!(
            "{}. [{}] {} - {}",
            i + 1,
            record.created_at,
            record.district,
            record.location
        );
    }

    if records.len() > 5 {
        println!("... and {} more", records.len() - 5);
    }

    println!();
    println!("{}", serde_json::to_string_pretty(&records)?);

    Ok(())
}
