//! # Uplink Gateway
//!
//! ブラウザがクラウドストレージへ直接アップロードし、加工済みファイルを
//! ポーリングで受け取るための署名付きURLを発行するGateway。
//!
//! ## API エンドポイント
//! - `GET /generate-upload-url?filename=...` — 署名付きアップロードURL発行
//! - `GET /check-download-url?filename=...` — 準備状況確認 + 署名付きダウンロードURL発行
//!
//! Gateway自身は状態を持たない。ファイルの有無はすべてストレージ側が保持する。

mod config;
mod endpoints;
mod error;
mod router;
mod storage;

use std::sync::Arc;

use config::{CorsPolicy, GatewayConfig, GatewayState};
use storage::ObjectStorage;

/// 設定に応じたストレージ実装を開く。
#[cfg(feature = "vendor-aws")]
fn open_storage(config: &GatewayConfig) -> anyhow::Result<Box<dyn ObjectStorage>> {
    Ok(Box::new(storage::S3Storage::from_config(&config.storage)?))
}

#[cfg(not(feature = "vendor-aws"))]
fn open_storage(_config: &GatewayConfig) -> anyhow::Result<Box<dyn ObjectStorage>> {
    anyhow::bail!("ストレージバックエンドが有効化されていません（feature \"vendor-aws\"）")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = GatewayConfig::from_env()?;

    match &config.cors {
        CorsPolicy::Restricted(origin) => {
            tracing::info!(frontend_url = %origin, "CORS: 指定オリジンのみ許可します");
        }
        CorsPolicy::Permissive => {
            tracing::warn!("FRONTEND_URLが未設定です。CORSを全オリジン許可で起動します（開発環境用）");
        }
    }

    tracing::info!(
        upload_bucket = %config.storage.upload_bucket,
        download_bucket = %config.storage.download_bucket,
        upload_expiry_secs = config.upload_expiry_secs,
        download_expiry_secs = config.download_expiry_secs,
        storage_timeout = ?config.storage_timeout,
        "ストレージ設定"
    );

    let storage = open_storage(&config)?;
    let state = Arc::new(GatewayState::new(&config, storage));
    let app = router::build_router(state, &config.cors)?;

    tracing::info!("Gatewayを {} で起動します", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
