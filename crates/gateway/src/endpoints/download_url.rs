//! # GET /check-download-url
//!
//! ダウンロードバケットをポーリングし、加工済みファイルの準備状況を返す。
//! 状態遷移（processing → ready）は外部の加工処理が起こすもので、
//! Gatewayは観測するだけ。

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use uplink_types::{DownloadStatusResponse, FilenameQuery};

use super::require_filename;
use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::storage::{bounded, ObjectPresence};

/// GET /check-download-url — 準備状況確認。
///
/// 1. ダウンロードバケットにHEADで存在確認
/// 2. 存在すれば署名付きダウンロードURLを発行して `ready`
/// 3. 存在しなければ `processing`（エラーではない）
pub async fn handle_check_download_url(
    State(state): State<Arc<GatewayState>>,
    query: Result<Query<FilenameQuery>, QueryRejection>,
) -> Result<Json<DownloadStatusResponse>, GatewayError> {
    let filename = require_filename(query)?;

    let presence = bounded(
        "probe_download",
        state.storage_timeout,
        state.storage.probe_download(&filename),
    )
    .await
    .map_err(GatewayError::DownloadCheck)?;

    if presence == ObjectPresence::Absent {
        tracing::info!(filename = %filename, "ファイルはまだ準備できていません");
        return Ok(Json(DownloadStatusResponse::Processing));
    }

    tracing::info!(filename = %filename, "ファイルを検出しました。ダウンロードURLを生成します");

    let download_url = bounded(
        "presign_download",
        state.storage_timeout,
        state
            .storage
            .presign_download(&filename, state.download_expiry_secs),
    )
    .await
    .map_err(GatewayError::DownloadCheck)?;

    Ok(Json(DownloadStatusResponse::Ready { download_url }))
}
