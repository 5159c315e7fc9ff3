//! # エンドポイントテスト用共通ヘルパー
//!
//! upload_url, download_url, routerのテストで共有するモックストレージ。

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::GatewayState;
use crate::storage::{ObjectPresence, ObjectStorage, StorageError};

/// モックストレージの振る舞い。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockMode {
    /// 正常応答
    Healthy,
    /// 存在確認が「存在しない」以外の理由で失敗する
    ProbeFault,
    /// 署名付きURL生成が失敗する
    PresignFault,
    /// すべての呼び出しが指定時間だけ遅延する
    Slow(Duration),
}

/// テスト用のモックObjectStorage。
/// S3への接続なしで署名付きURLのダミーを返す。
///
/// cloneは同じオブジェクト集合を共有するため、テスト側から途中で
/// 「加工済みファイルが出現した」状態を作れる。
#[derive(Clone)]
pub struct MockStorage {
    mode: MockMode,
    objects: Arc<Mutex<HashSet<String>>>,
    presigned: Arc<Mutex<Vec<(&'static str, String, u32)>>>,
}

impl MockStorage {
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            objects: Arc::new(Mutex::new(HashSet::new())),
            presigned: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// ダウンロードバケットにキーを出現させる。
    pub fn mark_present(&self, key: &str) {
        self.objects.lock().unwrap().insert(key.to_string());
    }

    /// これまでに生成した署名付きURLの (種別, キー, 有効期限) 一覧。
    pub fn presigned(&self) -> Vec<(&'static str, String, u32)> {
        self.presigned.lock().unwrap().clone()
    }

    async fn before_call(&self) {
        if let MockMode::Slow(delay) = self.mode {
            tokio::time::sleep(delay).await;
        }
    }

    fn presign(
        &self,
        kind: &'static str,
        key: &str,
        expiry_secs: u32,
    ) -> Result<String, StorageError> {
        if self.mode == MockMode::PresignFault {
            return Err(StorageError::Presign("mock: SignatureDoesNotMatch".to_string()));
        }
        self.presigned
            .lock()
            .unwrap()
            .push((kind, key.to_string(), expiry_secs));
        Ok(format!(
            "https://mock-storage/{kind}/{key}?X-Amz-Expires={expiry_secs}&sig=test"
        ))
    }
}

#[async_trait::async_trait]
impl ObjectStorage for MockStorage {
    async fn presign_upload(&self, key: &str, expiry_secs: u32) -> Result<String, StorageError> {
        self.before_call().await;
        self.presign("upload", key, expiry_secs)
    }

    async fn presign_download(
        &self,
        key: &str,
        expiry_secs: u32,
    ) -> Result<String, StorageError> {
        self.before_call().await;
        self.presign("download", key, expiry_secs)
    }

    async fn probe_download(&self, key: &str) -> Result<ObjectPresence, StorageError> {
        self.before_call().await;
        if self.mode == MockMode::ProbeFault {
            return Err(StorageError::Probe("mock: HEADがHTTP 403を返しました".to_string()));
        }
        if self.objects.lock().unwrap().contains(key) {
            Ok(ObjectPresence::Present)
        } else {
            Ok(ObjectPresence::Absent)
        }
    }
}

/// テスト用GatewayStateを構築するヘルパー
pub fn test_state(storage: MockStorage) -> Arc<GatewayState> {
    Arc::new(GatewayState {
        storage: Box::new(storage),
        upload_expiry_secs: 100,
        download_expiry_secs: 60,
        storage_timeout: Duration::from_millis(200),
    })
}
