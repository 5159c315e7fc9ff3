//! # GET /generate-upload-url
//!
//! アップロードバケットへの署名付きURL発行。

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use uplink_types::{FilenameQuery, UploadUrlResponse};

use super::require_filename;
use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::storage::bounded;

/// GET /generate-upload-url — 署名付きアップロードURL発行。
///
/// `filename` をそのままオブジェクトキーとして、アップロードバケットへの
/// PUT用URLを設定済みの有効期限で発行する。
pub async fn handle_generate_upload_url(
    State(state): State<Arc<GatewayState>>,
    query: Result<Query<FilenameQuery>, QueryRejection>,
) -> Result<Json<UploadUrlResponse>, GatewayError> {
    let filename = require_filename(query)?;

    tracing::info!(filename = %filename, "アップロードURLを生成します");

    let upload_url = bounded(
        "presign_upload",
        state.storage_timeout,
        state
            .storage
            .presign_upload(&filename, state.upload_expiry_secs),
    )
    .await
    .map_err(GatewayError::UploadUrl)?;

    Ok(Json(UploadUrlResponse { upload_url }))
}
