//! # Gateway エラー型
//!
//! クライアントに返す本文は固定の汎用メッセージのみ。
//! ストレージ側の失敗原因はログにだけ出力する。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uplink_types::ErrorResponse;

use crate::storage::StorageError;

/// `filename` 欠落・空文字時のメッセージ
pub const MISSING_FILENAME: &str = "filename query parameter is required";
/// /generate-upload-url の500レスポンス本文
pub const UPLOAD_URL_FAILED: &str = "Couldn't generate upload URL";
/// /check-download-url の500レスポンス本文
pub const DOWNLOAD_CHECK_FAILED: &str = "Error checking file status";

/// Gatewayエラー型。
///
/// 「まだ存在しない」はエラーではない（`ObjectPresence::Absent` として200で返す）。
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// 不正なリクエスト
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),
    /// アップロードURL生成中のストレージ失敗
    #[error("アップロードURL生成に失敗: {0}")]
    UploadUrl(#[source] StorageError),
    /// ダウンロード状態確認中のストレージ失敗（存在確認・URL生成）
    #[error("ダウンロード状態の確認に失敗: {0}")]
    DownloadCheck(#[source] StorageError),
}

impl GatewayError {
    /// HTTPステータスコード。
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::UploadUrl(_) | GatewayError::DownloadCheck(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// クライアントに返すメッセージ。
    pub fn public_message(&self) -> String {
        match self {
            GatewayError::BadRequest(msg) => msg.clone(),
            GatewayError::UploadUrl(_) => UPLOAD_URL_FAILED.to_string(),
            GatewayError::DownloadCheck(_) => DOWNLOAD_CHECK_FAILED.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "ストレージ操作に失敗しました");
        } else {
            tracing::debug!(error = %self, "リクエストを拒否しました");
        }
        let body = ErrorResponse {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}
