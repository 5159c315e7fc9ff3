//! # Gateway設定・共有状態
//!
//! 環境変数からの設定読み込みとGatewayの共有状態の定義。
//! 設定は起動時に一度だけ読み込み、以後は不変の構造体として渡す。

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

use crate::storage::ObjectStorage;

/// 署名付きURLの有効期限の上限（7日、SigV4の制約）
pub const MAX_PRESIGN_EXPIRY_SECS: u32 = 604_800;

/// アップロードURLの既定有効期限（秒）
pub const DEFAULT_UPLOAD_EXPIRY_SECS: u32 = 100;
/// ダウンロードURLの既定有効期限（秒）
pub const DEFAULT_DOWNLOAD_EXPIRY_SECS: u32 = 60;
/// ストレージ呼び出し1回あたりの既定制限時間（秒）
pub const DEFAULT_STORAGE_TIMEOUT_SECS: u64 = 10;
/// 既定の待ち受けアドレス
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
/// 既定のリージョン
pub const DEFAULT_REGION: &str = "us-east-1";

/// クロスオリジン許可ポリシー。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    /// 指定オリジンのみ許可
    Restricted(String),
    /// 全オリジン許可（ローカル開発用の緩和モード）
    Permissive,
}

/// S3互換ストレージの接続設定。
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// 署名付きPUT URLの対象バケット
    pub upload_bucket: String,
    /// 存在確認と署名付きGET URLの対象バケット
    pub download_bucket: String,
    /// リージョン名
    pub region: String,
    /// S3互換エンドポイント（MinIO, R2等）。Noneの場合はAWS。
    pub endpoint: Option<String>,
    /// 署名付きURLに埋め込むクライアント向けエンドポイント
    pub public_endpoint: Option<String>,
    /// アクセスキー。secret_keyと揃っていない場合は既定の認証情報チェーンを使う。
    pub access_key: Option<String>,
    /// シークレットキー
    pub secret_key: Option<String>,
}

/// 起動時に構築される不変のGateway設定。
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// ストレージ接続設定
    pub storage: StorageConfig,
    /// CORSポリシー
    pub cors: CorsPolicy,
    /// アップロードURLの有効期限（秒）
    pub upload_expiry_secs: u32,
    /// ダウンロードURLの有効期限（秒）
    pub download_expiry_secs: u32,
    /// ストレージ呼び出し1回あたりの制限時間
    pub storage_timeout: Duration,
    /// 待ち受けアドレス
    pub bind_addr: SocketAddr,
}

impl GatewayConfig {
    /// 環境変数から構築する。
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の参照関数から構築する。空文字の値は未設定として扱う。
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |key: &str| get(key).with_context(|| format!("{key}が設定されていません"));

        let storage = StorageConfig {
            upload_bucket: require("UPLOAD_BUCKET_NAME")?,
            download_bucket: require("DOWNLOAD_BUCKET_NAME")?,
            region: get("AWS_DEFAULT_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            endpoint: get("S3_ENDPOINT"),
            public_endpoint: get("S3_PUBLIC_ENDPOINT"),
            access_key: get("AWS_ACCESS_KEY_ID"),
            secret_key: get("AWS_SECRET_ACCESS_KEY"),
        };

        let cors = match get("FRONTEND_URL") {
            Some(origin) => CorsPolicy::Restricted(origin),
            None => CorsPolicy::Permissive,
        };

        let upload_expiry_secs = parse_expiry(
            "UPLOAD_URL_EXPIRY_SECS",
            get("UPLOAD_URL_EXPIRY_SECS"),
            DEFAULT_UPLOAD_EXPIRY_SECS,
        )?;
        let download_expiry_secs = parse_expiry(
            "DOWNLOAD_URL_EXPIRY_SECS",
            get("DOWNLOAD_URL_EXPIRY_SECS"),
            DEFAULT_DOWNLOAD_EXPIRY_SECS,
        )?;

        let timeout_secs = match get("STORAGE_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("STORAGE_TIMEOUT_SECSが整数ではありません: {raw}"))?,
            None => DEFAULT_STORAGE_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            anyhow::bail!("STORAGE_TIMEOUT_SECSは1以上である必要があります");
        }

        let bind_raw = get("GATEWAY_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .with_context(|| format!("GATEWAY_BIND_ADDRが不正です: {bind_raw}"))?;

        Ok(Self {
            storage,
            cors,
            upload_expiry_secs,
            download_expiry_secs,
            storage_timeout: Duration::from_secs(timeout_secs),
            bind_addr,
        })
    }
}

/// 有効期限を `1..=MAX_PRESIGN_EXPIRY_SECS` の範囲で読み取る。
fn parse_expiry(key: &str, raw: Option<String>, default: u32) -> anyhow::Result<u32> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let secs = raw
        .parse::<u32>()
        .with_context(|| format!("{key}が整数ではありません: {raw}"))?;
    if secs == 0 || secs > MAX_PRESIGN_EXPIRY_SECS {
        anyhow::bail!("{key}は1〜{MAX_PRESIGN_EXPIRY_SECS}秒である必要があります: {secs}");
    }
    Ok(secs)
}

/// Gatewayの共有状態。
pub struct GatewayState {
    /// オブジェクトストレージ（S3互換等、トレイトで抽象化）
    pub storage: Box<dyn ObjectStorage>,
    /// アップロードURLの有効期限（秒）
    pub upload_expiry_secs: u32,
    /// ダウンロードURLの有効期限（秒）
    pub download_expiry_secs: u32,
    /// ストレージ呼び出し1回あたりの制限時間
    pub storage_timeout: Duration,
}

impl GatewayState {
    /// 設定とストレージ実装から共有状態を構築する。
    pub fn new(config: &GatewayConfig, storage: Box<dyn ObjectStorage>) -> Self {
        Self {
            storage,
            upload_expiry_secs: config.upload_expiry_secs,
            download_expiry_secs: config.download_expiry_secs,
            storage_timeout: config.storage_timeout,
        }
    }
}
