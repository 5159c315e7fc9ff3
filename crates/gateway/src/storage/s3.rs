//! # S3互換ストレージ実装
//!
//! AWS S3, MinIO, Cloudflare R2 等のS3互換APIを使用する
//! オブジェクトストレージ実装。

use s3::error::S3Error;

use super::{ObjectPresence, ObjectStorage, StorageError};
use crate::config::StorageConfig;

/// 同一バケットへの内部向け・クライアント向けの2つの接続。
struct BucketPair {
    /// 内部通信用（存在確認）
    internal: s3::Bucket,
    /// クライアント向け（署名付きURL生成用）。
    /// 内部ホスト名とブラウザから到達できるホスト名が異なる場合に使用。
    /// Noneの場合はinternalを使用する。
    public: Option<s3::Bucket>,
}

impl BucketPair {
    /// 署名付きURLの生成に使うバケット。
    fn presigner(&self) -> &s3::Bucket {
        self.public.as_ref().unwrap_or(&self.internal)
    }
}

/// S3互換ストレージによるObjectStorage実装。
pub struct S3Storage {
    /// アップロード先バケット
    upload: BucketPair,
    /// 加工済みファイルのダウンロード元バケット
    download: BucketPair,
}

impl S3Storage {
    /// 設定からアップロード・ダウンロードの両バケットを初期化する。
    pub fn from_config(config: &StorageConfig) -> anyhow::Result<Self> {
        let credentials = match (&config.access_key, &config.secret_key) {
            (Some(access_key), Some(secret_key)) => s3::creds::Credentials::new(
                Some(access_key.as_str()),
                Some(secret_key.as_str()),
                None,
                None,
                None,
            )?,
            _ => {
                tracing::info!("アクセスキーが未設定のため既定の認証情報チェーンを使用します");
                s3::creds::Credentials::default()?
            }
        };

        if let Some(public_ep) = &config.public_endpoint {
            tracing::info!(
                s3_public_endpoint = %public_ep,
                "クライアント向けS3エンドポイントを設定"
            );
        }

        let pair = |bucket_name: &str| -> anyhow::Result<BucketPair> {
            let internal = Self::init_bucket(
                bucket_name,
                config.endpoint.as_deref(),
                &config.region,
                &credentials,
            )?;
            let public = config
                .public_endpoint
                .as_deref()
                .map(|ep| Self::init_bucket(bucket_name, Some(ep), &config.region, &credentials))
                .transpose()?;
            Ok(BucketPair { internal, public })
        };

        Ok(Self {
            upload: pair(&config.upload_bucket)?,
            download: pair(&config.download_bucket)?,
        })
    }

    /// S3互換バケットを初期化する。
    /// カスタムエンドポイント指定時はpath-styleでアクセスする（MinIO等）。
    fn init_bucket(
        bucket_name: &str,
        endpoint: Option<&str>,
        region: &str,
        credentials: &s3::creds::Credentials,
    ) -> anyhow::Result<s3::Bucket> {
        let bucket = match endpoint {
            Some(endpoint) => {
                let region = s3::Region::Custom {
                    region: region.to_string(),
                    endpoint: endpoint.to_string(),
                };
                s3::Bucket::new(bucket_name, region, credentials.clone())?.with_path_style()
            }
            None => {
                let region: s3::Region = region.parse()?;
                s3::Bucket::new(bucket_name, region, credentials.clone())?
            }
        };

        Ok(*bucket)
    }
}

/// HEAD失敗をObjectPresenceに分類する。
///
/// 非2xxをエラーとして返すビルドのS3クライアントでは、404が
/// `HttpFailWithBody(404, _)` として届く。
pub fn classify_head_error(err: S3Error) -> Result<ObjectPresence, StorageError> {
    match err {
        S3Error::HttpFailWithBody(404, _) => Ok(ObjectPresence::Absent),
        other => Err(StorageError::Probe(other.to_string())),
    }
}

#[async_trait::async_trait]
impl ObjectStorage for S3Storage {
    async fn presign_upload(&self, key: &str, expiry_secs: u32) -> Result<String, StorageError> {
        self.upload
            .presigner()
            .presign_put(key, expiry_secs, None, None)
            .await
            .map_err(|e| StorageError::Presign(format!("アップロードURL: {e}")))
    }

    async fn presign_download(
        &self,
        key: &str,
        expiry_secs: u32,
    ) -> Result<String, StorageError> {
        self.download
            .presigner()
            .presign_get(key, expiry_secs, None)
            .await
            .map_err(|e| StorageError::Presign(format!("ダウンロードURL: {e}")))
    }

    async fn probe_download(&self, key: &str) -> Result<ObjectPresence, StorageError> {
        match self.download.internal.head_object(key).await {
            Ok((_, status)) => ObjectPresence::from_head_status(status),
            Err(e) => classify_head_error(e),
        }
    }
}
