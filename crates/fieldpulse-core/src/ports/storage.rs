//! 로컬 폴백 저장소 포트.
//!
//! 구현: `fieldpulse-storage` crate (rusqlite)

use async_trait::async_trait;

use crate::error::CoreError;

/// 전송 실패 페이로드 보관용 키-값 저장소
#[async_trait]
pub trait FallbackStore: Send + Sync {
    /// 키에 페이로드 저장 (기존 값 덮어쓰기)
    async fn put(&self, key: &str, payload: &str) -> Result<(), CoreError>;

    /// 키의 페이로드 조회
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// 키 삭제, 삭제 여부 반환
    async fn remove(&self, key: &str) -> Result<bool, CoreError>;
}
