//! 세션 ID 생성.

/// 세션 ID 생성: `session_<epoch ms>_<무작위 9자>`
pub fn generate_session_id(now_ms: i64) -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!("session_{now_ms}_{}", &random[..9])
}
