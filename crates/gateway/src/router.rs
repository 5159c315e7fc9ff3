//! # ルーター構築
//!
//! エンドポイントの登録とCORS・リクエストトレースのミドルウェア適用。

use std::sync::Arc;

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::{CorsPolicy, GatewayState};
use crate::endpoints::{handle_check_download_url, handle_generate_upload_url};

/// アップロードURL発行のパス
pub const GENERATE_UPLOAD_URL_PATH: &str = "/generate-upload-url";
/// 準備状況確認のパス
pub const CHECK_DOWNLOAD_URL_PATH: &str = "/check-download-url";

/// CORSポリシーからレイヤーを構築する。
pub fn cors_layer(policy: &CorsPolicy) -> anyhow::Result<CorsLayer> {
    match policy {
        CorsPolicy::Restricted(origin) => {
            let origin = HeaderValue::from_str(origin)
                .with_context(|| format!("FRONTEND_URLがヘッダー値として不正です: {origin}"))?;
            Ok(CorsLayer::new()
                .allow_origin(AllowOrigin::list([origin]))
                .allow_methods([Method::GET, Method::OPTIONS])
                .allow_headers(Any))
        }
        CorsPolicy::Permissive => Ok(CorsLayer::permissive()),
    }
}

/// リクエストトレースのレイヤー。スパンとイベントはINFOで出力する。
pub fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO))
}

/// Gatewayのルーターを構築する。
pub fn build_router(state: Arc<GatewayState>, cors: &CorsPolicy) -> anyhow::Result<Router> {
    let router = Router::new()
        .route(GENERATE_UPLOAD_URL_PATH, get(handle_generate_upload_url))
        .route(CHECK_DOWNLOAD_URL_PATH, get(handle_check_download_url))
        .layer(cors_layer(cors)?)
        .layer(trace_layer())
        .with_state(state);

    Ok(router)
}
