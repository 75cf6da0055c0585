//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! 수집기는 이 trait들에만 의존하며, 어댑터 crate가 구현하고
//! `fieldpulse-app`에서 `Arc<dyn T>`로 와이어링한다.
//!
//! I/O가 있는 포트는 `async_trait` 매크로로 object safety를 보장한다.

pub mod clock;
pub mod host;
pub mod observer;
pub mod storage;
pub mod transport;
