//! # Gatewayエンドポイント
//!
//! - `GET /generate-upload-url` — アップロード用署名付きURL発行
//! - `GET /check-download-url` — 加工済みファイルの準備状況確認

pub mod download_url;
pub mod upload_url;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use download_url::handle_check_download_url;
pub use upload_url::handle_generate_upload_url;

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use uplink_types::FilenameQuery;

use crate::error::{GatewayError, MISSING_FILENAME};

/// クエリから `filename` を取り出す。欠落・空文字・パース失敗はBadRequest。
///
/// 値はトリムせず、そのままオブジェクトキーとして使う。
pub(crate) fn require_filename(
    query: Result<Query<FilenameQuery>, QueryRejection>,
) -> Result<String, GatewayError> {
    let Query(query) = query.map_err(|e| {
        tracing::debug!(error = %e, "クエリ文字列のパースに失敗");
        GatewayError::BadRequest(MISSING_FILENAME.to_string())
    })?;

    match query.filename {
        Some(filename) if !filename.is_empty() => Ok(filename),
        _ => Err(GatewayError::BadRequest(MISSING_FILENAME.to_string())),
    }
}
