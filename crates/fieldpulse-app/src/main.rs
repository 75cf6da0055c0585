//! # fieldpulse-app
//!
//! FieldPulse 텔레메트리 수집기 바이너리 진입점.
//! 설정 로드, 어댑터 DI, 라이프사이클 관리.

mod host;
mod lifecycle;
mod replay;
mod wiring;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use fieldpulse_collector::TelemetryCollector;
use fieldpulse_core::config::AppConfig;
use fieldpulse_core::config_manager::ConfigManager;
use fieldpulse_core::ports::clock::SystemClock;
use fieldpulse_network::http_client::HttpIngestClient;
use fieldpulse_storage::SqliteFallbackStore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::host::ProcessHost;
use crate::lifecycle::LifecycleManager;
use crate::replay::{JsonLinesSource, ReplayInput};

/// FieldPulse 클라이언트 텔레메트리 수집기
///
/// 관측 엔트리를 받아 성능 지표를 집계하고 수집 서버로 배치 전송한다.
#[derive(Parser, Debug)]
#[command(name = "fieldpulse")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 수집 서버 URL (기본: 설정 파일 값)
    #[arg(long, short = 's')]
    server: Option<String>,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 관측 JSON Lines 입력 (파일 경로, `-`는 표준 입력)
    #[arg(long, short = 'i')]
    input: Option<String>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 폴백 DB 저장 경로
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// 오프라인 모드 (네트워크 전송 없이 로컬 저장소에만 보관)
    #[arg(long, short = 'o')]
    offline: bool,

    /// 보관 중인 폴백 페이로드를 재전송하고 종료
    #[arg(long)]
    flush_pending: bool,
}

/// 설정 로드 (지정 경로 → 플랫폼 기본 경로 → 현재 디렉토리)
fn load_config(path: Option<PathBuf>) -> Result<ConfigManager> {
    if let Some(path) = path {
        return ConfigManager::open(path).context("설정 파일 로드 실패");
    }

    match ConfigManager::open_default() {
        Ok(manager) => Ok(manager),
        Err(e) => {
            warn!("설정 관리자 초기화 실패, 현재 디렉토리 사용: {e}");
            ConfigManager::open(PathBuf::from("./fieldpulse-config.json"))
                .context("설정 파일 로드 실패")
        }
    }
}

/// CLI 인자로 설정 오버라이드
fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(server) = &args.server {
        config.server.base_url = server.clone();
    }
    if let Some(data_dir) = &args.data_dir {
        config.storage.data_dir = Some(data_dir.clone());
    }
}

/// 로그 레벨을 적용할 크레이트 타겟
const LOG_TARGETS: [&str; 6] = [
    "fieldpulse",
    "fieldpulse_app",
    "fieldpulse_core",
    "fieldpulse_collector",
    "fieldpulse_network",
    "fieldpulse_storage",
];

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={}", args.log_level))
        .collect::<Vec<_>>()
        .join(",");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    info!("FieldPulse 수집기 시작");

    let config_manager = load_config(args.config.clone())?;
    info!("설정 파일: {}", config_manager.path().display());
    let mut config = config_manager.current();
    apply_overrides(&mut config, &args);

    let db_path = wiring::resolve_db_path(&config);
    let store = Arc::new(
        SqliteFallbackStore::open(&db_path, config.storage.max_payload_bytes)
            .context("폴백 저장소 열기 실패")?,
    );

    if args.flush_pending {
        let transport =
            HttpIngestClient::new(&config.server.ingest_url(), config.server.request_timeout())?;
        let sent =
            wiring::flush_pending(store.as_ref(), &transport, &config.storage.fallback_key).await?;
        println!(
            "{}",
            if sent {
                "보관된 페이로드 재전송 완료"
            } else {
                "보관된 페이로드 없음"
            }
        );
        return Ok(());
    }

    if !config.telemetry.enabled {
        info!("텔레메트리 비활성화됨 (telemetry.enabled = false), 종료");
        return Ok(());
    }

    let delivery = wiring::build_delivery(&config, args.offline, store)?;
    let lifecycle = LifecycleManager::new();
    let host = Arc::new(ProcessHost::new(config.host.clone(), lifecycle.subscribe()));

    let mut collector = TelemetryCollector::new(host, delivery, Arc::new(SystemClock));
    let replay = args
        .input
        .as_deref()
        .map(|arg| Arc::new(JsonLinesSource::new(ReplayInput::from_arg(arg))));
    if let Some(source) = &replay {
        collector = collector.with_source(source.clone());
    }
    let collector = Arc::new(collector);

    collector.initialize();
    lifecycle.mark_loaded();
    info!("세션: {}", collector.session_id());

    match &replay {
        Some(source) => {
            let mut finished = source.finished();
            tokio::select! {
                result = lifecycle.wait_for_signal() => result.context("시그널 핸들러 등록 실패")?,
                _ = finished.wait_for(|done| *done) => info!("관측 입력 소진"),
            }
        }
        None => lifecycle
            .wait_for_signal()
            .await
            .context("시그널 핸들러 등록 실패")?,
    }

    lifecycle.begin_unload();
    let outcome = collector.cleanup().await;
    info!("최종 전송 결과: {outcome:?}");

    let summary = collector.performance_summary();
    println!("{}", serde_json::to_string_pretty(&summary)?);

    info!("FieldPulse 수집기 종료");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let args = Args::try_parse_from(["fieldpulse"]).unwrap();

        assert_eq!(args.log_level, "info");
        assert!(!args.offline);
        assert!(!args.flush_pending);
        assert!(args.input.is_none());
    }

    #[test]
    fn cli_overrides_config() {
        let args = Args::try_parse_from([
            "fieldpulse",
            "--server",
            "https://ingest.greenhouse.example",
            "--data-dir",
            "/tmp/fieldpulse",
            "--input",
            "-",
            "--offline",
        ])
        .unwrap();
        let mut config = AppConfig::default_config();

        apply_overrides(&mut config, &args);

        assert_eq!(config.server.base_url, "https://ingest.greenhouse.example");
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/tmp/fieldpulse")));
        assert_eq!(args.input.as_deref(), Some("-"));
        assert!(args.offline);
    }

    #[test]
    fn load_config_creates_file_at_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let manager = load_config(Some(path.clone())).unwrap();

        assert!(path.exists());
        assert_eq!(manager.current().server.base_url, "http://localhost:3000");
    }
}
