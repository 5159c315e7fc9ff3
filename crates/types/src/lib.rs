//! # Uplink 共有型定義
//!
//! Gatewayのクエリパラメータとレスポンスボディを、サーバーとクライアントの
//! 双方から使えるRust構造体として提供する。
//!
//! ## ワイヤ形式
//! - すべてのボディはJSON
//! - 失敗時は常に `{"error": "..."}`

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// クエリパラメータ
// ---------------------------------------------------------------------------

/// `GET /generate-upload-url` と `GET /check-download-url` 共通のクエリ。
///
/// `filename` は省略可能として受け取り、欠落・空文字の判定はハンドラ側で行う。
/// 400レスポンスも [`ErrorResponse`] 形式で返す。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilenameQuery {
    /// オブジェクトキーとしてそのまま使うファイル名
    pub filename: Option<String>,
}

// ---------------------------------------------------------------------------
// /generate-upload-url
// ---------------------------------------------------------------------------

/// /generate-upload-url レスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadUrlResponse {
    /// 署名付きアップロードURL（PUT）
    pub upload_url: String,
}

// ---------------------------------------------------------------------------
// /check-download-url
// ---------------------------------------------------------------------------

/// /check-download-url レスポンス。
///
/// `status` フィールドでタグ付けされる。
/// - `{"status":"ready","download_url":"..."}`
/// - `{"status":"processing"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DownloadStatusResponse {
    /// 加工済みオブジェクトがダウンロードバケットに存在する
    Ready {
        /// 署名付きダウンロードURL（GET）
        download_url: String,
    },
    /// まだ存在しない。クライアントは再度ポーリングする。
    Processing,
}

// ---------------------------------------------------------------------------
// エラー
// ---------------------------------------------------------------------------

/// 400 / 500 レスポンスのボディ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// クライアント向けメッセージ。内部の失敗原因は含めない。
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_status_wire_shape() {
        let ready = DownloadStatusResponse::Ready {
            download_url: "https://bucket.example/report.pdf?sig=x".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&ready).unwrap(),
            serde_json::json!({
                "status": "ready",
                "download_url": "https://bucket.example/report.pdf?sig=x"
            })
        );

        assert_eq!(
            serde_json::to_value(DownloadStatusResponse::Processing).unwrap(),
            serde_json::json!({"status": "processing"})
        );
    }

    #[test]
    fn test_filename_query_optional() {
        let q: FilenameQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(q.filename.is_none());
    }
}
