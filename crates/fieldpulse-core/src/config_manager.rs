//! 수집기 설정 파일.
//!
//! `AppConfig`를 JSON 파일 하나로 보관한다. 파일이 없으면 기본값으로 시드하고,
//! 저장은 임시 파일에 쓴 뒤 rename 해서 중간에 끊겨도 기존 파일이 깨지지 않는다.

use crate::config::AppConfig;
use crate::error::CoreError;
use directories::ProjectDirs;
use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

const CONFIG_FILE_NAME: &str = "config.json";

/// 수집기 설정 핸들
///
/// 복제해도 같은 설정을 공유한다.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    current: Arc<RwLock<AppConfig>>,
    path: PathBuf,
}

impl ConfigManager {
    /// 플랫폼 설정 디렉토리의 `config.json` 열기
    pub fn open_default() -> Result<Self, CoreError> {
        Self::open(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// 설정 파일 열기, 없으면 기본 설정으로 생성
    pub fn open(path: PathBuf) -> Result<Self, CoreError> {
        let config = if path.is_file() {
            read_config(&path)?
        } else {
            let seeded = AppConfig::default_config();
            write_config(&path, &seeded)?;
            info!("기본 설정 생성: {}", path.display());
            seeded
        };

        Ok(Self {
            current: Arc::new(RwLock::new(config)),
            path,
        })
    }

    /// 현재 설정 복제본
    pub fn current(&self) -> AppConfig {
        self.current.read().clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 설정 일부 변경 후 저장
    ///
    /// 파일 저장에 실패하면 메모리 설정도 바뀌지 않는다.
    pub fn update_with<F>(&self, edit: F) -> Result<AppConfig, CoreError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut next = self.current();
        edit(&mut next);
        write_config(&self.path, &next)?;
        *self.current.write() = next.clone();
        debug!("설정 저장: {}", self.path.display());
        Ok(next)
    }

    /// 디스크에서 다시 읽기 (외부 편집 반영)
    pub fn reload(&self) -> Result<AppConfig, CoreError> {
        let config = read_config(&self.path)?;
        *self.current.write() = config.clone();
        info!("설정 다시 읽음: {}", self.path.display());
        Ok(config)
    }

    /// 플랫폼별 설정 디렉토리
    ///
    /// - macOS: `~/Library/Application Support/com.fieldpulse.collector/`
    /// - Windows: `%APPDATA%\fieldpulse\collector\config\`
    /// - Linux: `~/.config/collector/`
    pub fn config_dir() -> Result<PathBuf, CoreError> {
        project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// 플랫폼별 데이터 디렉토리 (폴백 DB)
    pub fn data_dir() -> Result<PathBuf, CoreError> {
        project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
    }
}

fn project_dirs() -> Result<ProjectDirs, CoreError> {
    ProjectDirs::from("com", "fieldpulse", "collector")
        .ok_or_else(|| CoreError::Config("홈 디렉토리를 찾을 수 없습니다".to_string()))
}

fn read_config(path: &Path) -> Result<AppConfig, CoreError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| CoreError::Config(format!("{} 읽기 실패: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| CoreError::Config(format!("{} 형식 오류: {e}", path.display())))
}

fn write_config(path: &Path, config: &AppConfig) -> Result<(), CoreError> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .map_err(|e| CoreError::Config(format!("{} 생성 실패: {e}", dir.display())))?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| CoreError::Config(format!("설정 직렬화 실패: {e}")))?;
    let staging = path.with_extension("json.tmp");
    fs::write(&staging, json)
        .and_then(|()| fs::rename(&staging, path))
        .map_err(|e| CoreError::Config(format!("{} 저장 실패: {e}", path.display())))
}
