//! 설정 저장소
//!
//! 패널 경로/숨김 파일/커서 위치 등 종료 시점 상태를 TOML로 보관합니다.

use crate::utils::error::{CfmError, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// 설정 파일 경로 환경 변수
pub const SETTINGS_ENV_VAR: &str = "CFM_SETTINGS_FILE";

/// 활성 패널
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivePanel {
    #[default]
    Left,
    Right,
}

impl ActivePanel {
    /// 패널 전환
    pub fn toggle(&mut self) {
        *self = self.other();
    }

    /// 반대쪽 패널
    pub fn other(self) -> Self {
        match self {
            ActivePanel::Left => ActivePanel::Right,
            ActivePanel::Right => ActivePanel::Left,
        }
    }
}

/// 패널별 저장 상태
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub path: PathBuf,
    pub show_hidden: bool,
    pub selected_index: usize,
    pub scroll_offset: usize,
}

impl PanelConfig {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            show_hidden: false,
            selected_index: 0,
            scroll_offset: 0,
        }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self::new(home_directory())
    }
}

/// 애플리케이션 저장 상태
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub version: u32,
    pub active_panel: ActivePanel,
    pub language: String,
    pub theme: String,
    pub window_size: (u16, u16),
    pub left_panel: PanelConfig,
    pub right_panel: PanelConfig,
}

impl AppConfig {
    pub const VERSION: u32 = 1;

    /// 존재하지 않는 패널 경로를 기본값으로 교체
    pub fn sanitize(&mut self) {
        if !self.left_panel.path.is_dir() {
            warn!(
                "Left panel path {} no longer exists, using home directory",
                self.left_panel.path.display()
            );
            self.left_panel.path = home_directory();
            self.left_panel.selected_index = 0;
            self.left_panel.scroll_offset = 0;
        }
        if !self.right_panel.path.is_dir() {
            warn!(
                "Right panel path {} no longer exists, using current directory",
                self.right_panel.path.display()
            );
            self.right_panel.path = current_directory();
            self.right_panel.selected_index = 0;
            self.right_panel.scroll_offset = 0;
        }
        if self.language.trim().is_empty() {
            self.language = "en".to_string();
        }
        if self.theme.trim().is_empty() {
            self.theme = "monokai".to_string();
        }
    }

    pub fn panel(&self, side: ActivePanel) -> &PanelConfig {
        match side {
            ActivePanel::Left => &self.left_panel,
            ActivePanel::Right => &self.right_panel,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: Self::VERSION,
            active_panel: ActivePanel::Left,
            language: "en".to_string(),
            theme: "monokai".to_string(),
            window_size: (120, 40),
            left_panel: PanelConfig::new(home_directory()),
            right_panel: PanelConfig::new(current_directory()),
        }
    }
}

/// 설정 파일 읽기/쓰기
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    path_override: Option<PathBuf>,
}

impl ConfigStore {
    /// 기본 경로 규칙을 따르는 저장소
    pub fn new() -> Self {
        Self::default()
    }

    /// 지정한 파일을 사용하는 저장소 (테스트용 등)
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path_override: Some(path.into()),
        }
    }

    /// 설정 파일 경로
    ///
    /// 우선순위: 명시 경로 → CFM_SETTINGS_FILE → ~/.cfm/settings.toml
    pub fn path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.path_override {
            return Some(path.clone());
        }
        if let Ok(custom) = env::var(SETTINGS_ENV_VAR) {
            let trimmed = custom.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        dirs::home_dir().map(|home| home.join(".cfm").join("settings.toml"))
    }

    /// 설정 읽기 (없거나 손상된 파일이면 기본값)
    pub fn load(&self) -> AppConfig {
        let Some(path) = self.path() else {
            return AppConfig::default();
        };
        let mut config = match fs::read_to_string(&path) {
            Ok(data) => match decode(&data) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Ignoring settings file {}: {}", path.display(), e);
                    AppConfig::default()
                }
            },
            Err(_) => AppConfig::default(),
        };
        config.sanitize();
        config
    }

    /// 설정 저장 (상위 디렉토리 자동 생성)
    pub fn save(&self, config: &AppConfig) -> Result<()> {
        let Some(path) = self.path() else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = toml::to_string_pretty(config).map_err(|e| CfmError::Config(e.to_string()))?;
        fs::write(&path, data)?;
        Ok(())
    }
}

fn decode(data: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(data).map_err(|e| CfmError::Config(e.to_string()))?;
    if config.version != AppConfig::VERSION {
        return Err(CfmError::Config(format!(
            "unsupported settings version {}",
            config.version
        )));
    }
    Ok(config)
}

fn home_directory() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"))
}

fn current_directory() -> PathBuf {
    env::current_dir().unwrap_or_else(|_| home_directory())
}
