//! SQLite 폴백 저장소.
//!
//! `FallbackStore` 포트 구현. 키 하나에 페이로드 하나를 덮어쓴다.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use fieldpulse_core::error::CoreError;
use fieldpulse_core::ports::storage::FallbackStore;
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::migration;

/// SQLite 폴백 저장소: `FallbackStore` 포트 구현
pub struct SqliteFallbackStore {
    conn: Mutex<Connection>,
    /// 페이로드 최대 크기 (bytes), 초과 시 저장 거부
    max_payload_bytes: usize,
}

impl SqliteFallbackStore {
    /// 파일 기반 SQLite 저장소 생성
    pub fn open(path: &Path, max_payload_bytes: usize) -> Result<Self, CoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| CoreError::Storage(format!("SQLite 열기 실패: {e}")))?;

        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            ",
        )
        .map_err(|e| CoreError::Storage(format!("PRAGMA 설정 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| CoreError::Storage(format!("마이그레이션 실패: {e}")))?;

        info!("폴백 저장소 초기화: {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
            max_payload_bytes,
        })
    }

    /// 인메모리 SQLite 저장소 생성 (테스트용)
    pub fn open_in_memory(max_payload_bytes: usize) -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CoreError::Storage(format!("인메모리 SQLite 생성 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| CoreError::Storage(format!("마이그레이션 실패: {e}")))?;

        Ok(Self {
            conn: Mutex::new(conn),
            max_payload_bytes,
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, CoreError> {
        self.conn
            .lock()
            .map_err(|e| CoreError::Internal(format!("잠금 획득 실패: {e}")))
    }
}

#[async_trait]
impl FallbackStore for SqliteFallbackStore {
    async fn put(&self, key: &str, payload: &str) -> Result<(), CoreError> {
        if payload.len() > self.max_payload_bytes {
            return Err(CoreError::Storage(format!(
                "저장 용량 초과: {} > {} bytes",
                payload.len(),
                self.max_payload_bytes
            )));
        }

        let stored_at = Utc::now().to_rfc3339();
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO fallback_payloads (key, payload, stored_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![key, payload, stored_at],
        )
        .map_err(|e| CoreError::Storage(format!("폴백 페이로드 저장 실패: {e}")))?;

        debug!("폴백 페이로드 저장: key={key}, {} bytes", payload.len());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT payload FROM fallback_payloads WHERE key = ?1",
            rusqlite::params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| CoreError::Storage(format!("폴백 페이로드 조회 실패: {e}")))
    }

    async fn remove(&self, key: &str) -> Result<bool, CoreError> {
        let conn = self.lock()?;
        let removed = conn
            .execute(
                "DELETE FROM fallback_payloads WHERE key = ?1",
                rusqlite::params![key],
            )
            .map_err(|e| CoreError::Storage(format!("폴백 페이로드 삭제 실패: {e}")))?;

        debug!("폴백 페이로드 삭제: key={key}, {removed}건");
        Ok(removed > 0)
    }
}
