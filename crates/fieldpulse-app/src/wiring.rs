//! 어댑터 생성 및 DI 와이어링.

use std::path::PathBuf;
use std::sync::Arc;

use fieldpulse_collector::DeliveryChain;
use fieldpulse_core::config::AppConfig;
use fieldpulse_core::config_manager::ConfigManager;
use fieldpulse_core::error::CoreError;
use fieldpulse_core::ports::storage::FallbackStore;
use fieldpulse_core::ports::transport::PayloadTransport;
use fieldpulse_network::beacon::BeaconClient;
use fieldpulse_network::http_client::HttpIngestClient;
use tracing::info;

/// 폴백 DB 파일 이름
const DB_FILE_NAME: &str = "fieldpulse.db";

/// 폴백 DB 경로 결정 (설정 → 플랫폼 기본 경로 → 현재 디렉토리)
///
/// - macOS: `~/Library/Application Support/com.fieldpulse.collector/fieldpulse.db`
/// - Windows: `%APPDATA%\fieldpulse\collector\data\fieldpulse.db`
/// - Linux: `~/.local/share/collector/fieldpulse.db`
pub fn resolve_db_path(config: &AppConfig) -> PathBuf {
    config
        .storage
        .data_dir
        .clone()
        .or_else(|| ConfigManager::data_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DB_FILE_NAME)
}

/// 전송 체인 구성
///
/// 오프라인이면 원격 단계 없이 저장소만 사용한다.
pub fn build_delivery(
    config: &AppConfig,
    offline: bool,
    store: Arc<dyn FallbackStore>,
) -> Result<DeliveryChain, CoreError> {
    let chain = DeliveryChain::new(store, config.storage.fallback_key.clone());
    if offline {
        info!("오프라인 모드: 텔레메트리를 로컬 저장소에만 보관");
        return Ok(chain);
    }

    let url = config.server.ingest_url();
    let timeout = config.server.request_timeout();
    let mut chain = chain.with_post(Arc::new(HttpIngestClient::new(&url, timeout)?));
    if config.telemetry.beacon_enabled {
        chain = chain.with_beacon(Arc::new(BeaconClient::new(&url, timeout)?));
    }

    info!("수집 엔드포인트: {url}");
    Ok(chain)
}

/// 보관 중인 폴백 페이로드 재전송
///
/// 전송에 성공하면 키를 삭제하고 `true`, 보관된 페이로드가 없으면 `false`.
pub async fn flush_pending(
    store: &dyn FallbackStore,
    transport: &dyn PayloadTransport,
    key: &str,
) -> Result<bool, CoreError> {
    let Some(payload) = store.get(key).await? else {
        info!("보관 중인 폴백 페이로드 없음");
        return Ok(false);
    };

    let size = payload.len();
    transport.post_json(payload).await?;
    store.remove(key).await?;
    info!("폴백 페이로드 재전송 완료: {size} bytes");
    Ok(true)
}
