//! # fieldpulse-storage
//!
//! 로컬 폴백 저장소 어댑터.
//! 원격 전송에 실패한 텔레메트리 페이로드를 SQLite 키/값 테이블에 보관한다.
//!
//! ## 모듈
//! - `sqlite`: 폴백 저장소 (FallbackStore 구현)
//! - `migration`: 스키마 마이그레이션

pub mod migration;
pub mod sqlite;

pub use sqlite::SqliteFallbackStore;
