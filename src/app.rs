use crate::config::{ActivePanel, AppConfig, ConfigStore};
use crate::core::conflict::ConflictResolver;
use crate::core::engine::{BatchEngine, CancelToken, ProgressObserver};
use crate::models::operation::BatchReport;
use crate::models::PanelState;
use crate::system::{DirSizeCalculator, DirSizeEvent, FileSystem};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;

mod navigation;
mod operations;

/// 사용자 입력이 더 필요한 작업
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// 새 디렉토리 이름 입력 대기 (`App::create_directory`로 완료)
    DirectoryName,
}

/// 패널 하나와 그 패널의 작업 상태
///
/// 배치 엔진과 크기 계산기는 패널마다 따로 가지므로
/// 한 패널의 취소가 다른 패널 작업에 영향을 주지 않습니다.
#[derive(Debug)]
struct PanelSlot {
    state: PanelState,
    engine: BatchEngine,
    sizes: DirSizeCalculator,
}

impl PanelSlot {
    fn new(state: PanelState, resolver: Arc<dyn ConflictResolver>) -> Self {
        Self {
            state,
            engine: BatchEngine::new(resolver),
            sizes: DirSizeCalculator::new(),
        }
    }
}

/// 앱 상태
///
/// 두 패널과 활성 패널, 배치 작업 조율, 설정 저장을 담당합니다.
/// 화면 그리기와 이벤트 루프는 이 구조체를 사용하는 쪽의 몫입니다.
#[derive(Debug)]
pub struct App {
    /// 종료 플래그
    pub should_quit: bool,
    left: PanelSlot,
    right: PanelSlot,
    active: ActivePanel,
    filesystem: FileSystem,
    config_store: ConfigStore,
    /// 패널 외 설정 (언어, 테마, 창 크기)은 그대로 보존
    config: AppConfig,
    /// 마지막 배치 결과
    last_report: Option<BatchReport>,
    /// 사용자에게 보여줄 마지막 에러
    last_error: Option<String>,
    /// 기본 앱으로 열 파일 (실행은 호출자 몫)
    pending_open: Option<PathBuf>,
    prompt: Option<Prompt>,
    /// 오른쪽 버튼 드래그 시작 인덱스
    drag_anchor: Option<usize>,
}

impl App {
    /// 저장된 설정으로 앱 생성
    pub fn new(resolver: Arc<dyn ConflictResolver>, config_store: ConfigStore) -> Self {
        let config = config_store.load();
        Self::from_config(config, resolver, config_store)
    }

    fn from_config(
        config: AppConfig,
        resolver: Arc<dyn ConflictResolver>,
        config_store: ConfigStore,
    ) -> Self {
        let filesystem = FileSystem::new();
        let left = PanelState::from_config(&config.left_panel, &filesystem);
        let right = PanelState::from_config(&config.right_panel, &filesystem);

        let mut app = Self {
            should_quit: false,
            left: PanelSlot::new(left, Arc::clone(&resolver)),
            right: PanelSlot::new(right, resolver),
            active: config.active_panel,
            filesystem,
            config_store,
            config,
            last_report: None,
            last_error: None,
            pending_open: None,
            prompt: None,
            drag_anchor: None,
        };
        app.sync_active_flags();
        app
    }

    /// 두 패널의 배치 엔진에 진행 상태 관찰자 등록
    pub fn set_progress_observer(&mut self, observer: Option<ProgressObserver>) {
        self.left.engine.set_observer(observer.clone());
        self.right.engine.set_observer(observer);
    }

    // === 조회 ===

    pub fn active_panel(&self) -> ActivePanel {
        self.active
    }

    pub fn panel(&self, side: ActivePanel) -> &PanelState {
        &self.slot(side).state
    }

    pub fn active_panel_state(&self) -> &PanelState {
        self.panel(self.active)
    }

    pub fn inactive_panel_state(&self) -> &PanelState {
        self.panel(self.active.other())
    }

    pub fn last_report(&self) -> Option<&BatchReport> {
        self.last_report.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn prompt(&self) -> Option<Prompt> {
        self.prompt
    }

    /// 열기 요청된 파일 꺼내기
    pub fn take_pending_open(&mut self) -> Option<PathBuf> {
        self.pending_open.take()
    }

    /// 활성 패널 배치 작업 취소 토큰 (작업 중 다른 태스크에서 사용)
    pub fn cancel_token(&self) -> CancelToken {
        self.slot(self.active).engine.cancel_token()
    }

    // === 패널 접근 ===

    fn slot(&self, side: ActivePanel) -> &PanelSlot {
        match side {
            ActivePanel::Left => &self.left,
            ActivePanel::Right => &self.right,
        }
    }

    fn slot_mut(&mut self, side: ActivePanel) -> &mut PanelSlot {
        match side {
            ActivePanel::Left => &mut self.left,
            ActivePanel::Right => &mut self.right,
        }
    }

    pub(crate) fn active_panel_state_mut(&mut self) -> &mut PanelState {
        &mut self.slot_mut(self.active).state
    }

    fn sync_active_flags(&mut self) {
        let active = self.active;
        self.left.state.set_active(active == ActivePanel::Left);
        self.right.state.set_active(active == ActivePanel::Right);
    }

    /// 패널 전환
    pub fn toggle_panel(&mut self) {
        self.set_active_panel(self.active.other());
    }

    pub fn set_active_panel(&mut self, side: ActivePanel) {
        self.active = side;
        self.drag_anchor = None;
        self.sync_active_flags();
    }

    /// 터미널 크기 변경 반영
    pub fn resize(&mut self, width: u16, height: u16) {
        self.config.window_size = (width, height);
        let panel_height = usize::from(height);
        self.left.state.set_viewport_height(panel_height);
        self.right.state.set_viewport_height(panel_height);
    }

    // === 백그라운드 작업 ===

    /// 디렉토리 크기 계산 결과 반영 (메인 루프에서 호출)
    pub fn poll_background(&mut self) {
        for side in [ActivePanel::Left, ActivePanel::Right] {
            let slot = self.slot_mut(side);
            for event in slot.sizes.poll() {
                match event {
                    DirSizeEvent::Computed { path, size } => slot.state.apply_dir_size(path, size),
                    DirSizeEvent::Finished { cancelled } => {
                        info!("Directory size calculation finished (cancelled: {})", cancelled);
                    }
                }
            }
        }
    }

    // === 종료 ===

    /// 현재 상태를 설정으로 변환
    pub fn snapshot_config(&self) -> AppConfig {
        let mut config = self.config.clone();
        config.left_panel = self.left.state.to_config();
        config.right_panel = self.right.state.to_config();
        config.active_panel = self.active;
        config
    }

    /// 종료 (설정 저장)
    pub fn quit(&mut self) {
        self.left.sizes.cancel();
        self.right.sizes.cancel();
        if let Err(e) = self.config_store.save(&self.snapshot_config()) {
            warn!("Failed to save settings: {}", e);
        }
        self.should_quit = true;
    }
}

#[cfg(test)]
impl App {
    /// 테스트용 앱 (설정 파일 격리)
    pub(crate) fn new_for_test(
        left: PathBuf,
        right: PathBuf,
        resolver: Arc<dyn ConflictResolver>,
        settings: PathBuf,
    ) -> Self {
        let mut config = AppConfig::default();
        config.left_panel.path = left;
        config.right_panel.path = right;
        Self::from_config(config, resolver, ConfigStore::with_path(settings))
    }
}

#[cfg(test)]
mod tests;
