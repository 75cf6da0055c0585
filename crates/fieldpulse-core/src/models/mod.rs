//! FieldPulse 도메인 모델.
//!
//! 수집기와 어댑터가 공유하는 데이터 구조체를 정의한다.
//! 전송/재생 대상 모델은 `serde` Serialize/Deserialize를 구현한다.

pub mod context;
pub mod observation;
pub mod telemetry;
