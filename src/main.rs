//! 同期ジョブ本体（引数なし、設定は環境変数から）

use std::process::ExitCode;

use radares_sync::{SyncConfig, SyncRequest, SyncService};
use tower::Service;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // ログ設定
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match SyncConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut service = SyncService::new(config);

    match service.call(SyncRequest::new()).await {
        Ok(report) => {
            info!(
                "Done: previous_max={:?}, fetched={}, appended={}, newest={:?}",
                report.previous_max, report.fetched, report.appended, report.newest_created_at
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(stage = e.stage(), "Sync run failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
