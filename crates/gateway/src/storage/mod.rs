//! # オブジェクトストレージ
//!
//! ハンドラが依存するオブジェクトストレージの抽象インターフェース。
//! S3互換ストレージ実装は `s3` サブモジュールを参照。

#[cfg(feature = "vendor-aws")]
pub mod s3;

#[cfg(feature = "vendor-aws")]
pub use self::s3::S3Storage;

use std::future::Future;
use std::time::Duration;

/// ストレージ操作のエラー型。
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// 署名付きURLの生成に失敗
    #[error("署名付きURL生成失敗: {0}")]
    Presign(String),
    /// 存在確認（HEAD）が「存在しない」以外の理由で失敗
    #[error("存在確認失敗: {0}")]
    Probe(String),
    /// 制限時間内に応答がなかった
    #[error("{operation} が {limit:?} 以内に完了しませんでした")]
    Timeout {
        /// 操作名
        operation: &'static str,
        /// 適用した制限時間
        limit: Duration,
    },
}

/// ダウンロードバケット上のオブジェクトの有無。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectPresence {
    /// 存在する
    Present,
    /// 存在しない（加工処理がまだ終わっていない）
    Absent,
}

impl ObjectPresence {
    /// HEADレスポンスのステータスコードを分類する。
    ///
    /// 2xx は存在、404 は未存在、それ以外はエラー。
    pub fn from_head_status(status: u16) -> Result<Self, StorageError> {
        match status {
            200..=299 => Ok(ObjectPresence::Present),
            404 => Ok(ObjectPresence::Absent),
            other => Err(StorageError::Probe(format!("HEADがHTTP {other}を返しました"))),
        }
    }
}

/// オブジェクトストレージの抽象インターフェース。
///
/// アップロード先とダウンロード元のバケットは実装側が保持する。
/// ハンドラはキーと有効期限だけを渡す。
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    /// アップロードバケットへの署名付きURL（PUT）を生成する。
    async fn presign_upload(&self, key: &str, expiry_secs: u32) -> Result<String, StorageError>;

    /// ダウンロードバケットからの署名付きURL（GET）を生成する。
    async fn presign_download(&self, key: &str, expiry_secs: u32)
        -> Result<String, StorageError>;

    /// ダウンロードバケットにキーが存在するか確認する。
    ///
    /// 「存在しない」は `Ok(ObjectPresence::Absent)` で返し、エラーにしない。
    async fn probe_download(&self, key: &str) -> Result<ObjectPresence, StorageError>;
}

/// ストレージ呼び出しを制限時間付きで実行する。
///
/// 呼び出し元のFutureがドロップされると、実行中のストレージ呼び出しも中断される。
pub async fn bounded<T, F>(
    operation: &'static str,
    limit: Duration,
    fut: F,
) -> Result<T, StorageError>
where
    F: Future<Output = Result<T, StorageError>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .unwrap_or(Err(StorageError::Timeout { operation, limit }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_status_classification() {
        assert_eq!(
            ObjectPresence::from_head_status(200).unwrap(),
            ObjectPresence::Present
        );
        assert_eq!(
            ObjectPresence::from_head_status(204).unwrap(),
            ObjectPresence::Present
        );
        assert_eq!(
            ObjectPresence::from_head_status(404).unwrap(),
            ObjectPresence::Absent
        );
        assert!(matches!(
            ObjectPresence::from_head_status(403),
            Err(StorageError::Probe(_))
        ));
        assert!(matches!(
            ObjectPresence::from_head_status(500),
            Err(StorageError::Probe(_))
        ));
    }

    #[tokio::test]
    async fn test_bounded_times_out() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        };
        let result: Result<(), StorageError> =
            bounded("probe", Duration::from_millis(20), slow).await;

        match result {
            Err(StorageError::Timeout { operation, limit }) => {
                assert_eq!(operation, "probe");
                assert_eq!(limit, Duration::from_millis(20));
            }
            other => panic!("タイムアウトになるべき: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bounded_passes_result_through() {
        let result = bounded("presign", Duration::from_secs(1), async {
            Ok::<_, StorageError>("https://example.com/x".to_string())
        })
        .await;
        assert_eq!(result.unwrap(), "https://example.com/x");
    }
}
