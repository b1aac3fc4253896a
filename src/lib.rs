//! 듀얼 패널 파일 관리자 코어
//!
//! 패널 탐색/다중 선택 상태, 충돌 해결을 거치는 배치 파일 작업,
//! 백그라운드 디렉토리 크기 계산, 설정 저장을 제공합니다.
//! 화면 그리기와 이벤트 루프는 이 크레이트를 사용하는 쪽이 담당합니다.

pub mod app;
pub mod config;
pub mod core;
pub mod models;
pub mod system;
pub mod utils;

pub use app::{App, Prompt};
pub use config::{ActivePanel, AppConfig, ConfigStore};
pub use utils::error::{CfmError, Result};
