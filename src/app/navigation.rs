use super::{App, Prompt};
use crate::config::ActivePanel;
use crate::core::actions::{find_action, Action};
use crate::core::mouse::{self, ListArea, PointerInput, SCROLL_STEP};
use crate::models::panel_state::EnterOutcome;
use crossterm::event::{KeyEvent, MouseEvent};

impl App {
    /// 키 입력 처리
    ///
    /// 반환값: 바인딩된 액션이 있었는지 여부
    pub async fn handle_key(&mut self, key: KeyEvent) -> bool {
        match find_action(key.modifiers, key.code) {
            Some(action) => {
                self.execute_action(action).await;
                true
            }
            None => false,
        }
    }

    /// 액션 실행
    pub async fn execute_action(&mut self, action: Action) {
        self.last_error = None;
        match action {
            Action::Quit => self.quit(),
            Action::TogglePanel => self.toggle_panel(),
            Action::MoveUp => self.active_panel_state_mut().move_cursor(-1),
            Action::MoveDown => self.active_panel_state_mut().move_cursor(1),
            Action::PageUp => self.active_panel_state_mut().page_up(),
            Action::PageDown => self.active_panel_state_mut().page_down(),
            Action::GoToTop => self.active_panel_state_mut().go_to_top(),
            Action::GoToBottom => self.active_panel_state_mut().go_to_bottom(),
            Action::JumpTo(index) => self.active_panel_state_mut().move_cursor_to(index),
            Action::EnterSelected => self.enter_selected(),
            Action::GoToParent => self.go_to_parent(),
            Action::ToggleSelection => self.toggle_selection_at_cursor(),
            Action::MarkRange => self.active_panel_state_mut().mark_range_to_cursor(),
            Action::SelectAll => self.active_panel_state_mut().select_all(),
            Action::DeselectAll => self.active_panel_state_mut().clear_selection(),
            Action::ToggleHidden => self.toggle_hidden(),
            Action::Refresh => self.refresh_panels(),
            Action::Cancel => self.cancel(),
            Action::CalculateSizes => {
                self.calculate_sizes();
            }
            Action::MakeDirectory => self.prompt = Some(Prompt::DirectoryName),
            Action::Copy => self.copy_selection().await,
            Action::Move => self.move_selection().await,
            Action::Delete => self.delete_selection().await,
        }
    }

    /// 메뉴 등에서 action_id로 실행
    pub async fn execute_action_id(&mut self, action_id: &str) -> bool {
        match Action::from_id(action_id) {
            Some(action) => {
                self.execute_action(action).await;
                true
            }
            None => false,
        }
    }

    /// Enter: 디렉토리 진입 / 상위 이동 / 파일 열기 요청
    pub fn enter_selected(&mut self) {
        let filesystem = self.filesystem;
        let side = self.active;
        let outcome = self.slot_mut(side).state.enter_selected(&filesystem);
        match outcome {
            EnterOutcome::Navigated => self.slot_mut(side).sizes.abort(),
            EnterOutcome::Open(path) => self.pending_open = Some(path),
            EnterOutcome::Nothing => {}
        }
    }

    /// 상위 디렉토리로 이동
    pub fn go_to_parent(&mut self) {
        let filesystem = self.filesystem;
        let side = self.active;
        if self.slot_mut(side).state.go_parent(&filesystem) {
            self.slot_mut(side).sizes.abort();
        }
    }

    /// 숨김 파일 표시 전환 (활성 패널)
    pub fn toggle_hidden(&mut self) {
        let filesystem = self.filesystem;
        self.active_panel_state_mut().toggle_hidden(&filesystem);
    }

    /// 두 패널 새로고침
    pub fn refresh_panels(&mut self) {
        let filesystem = self.filesystem;
        self.left.state.reload(&filesystem);
        self.right.state.reload(&filesystem);
    }

    /// Esc: 진행 중인 크기 계산 중단, 없으면 선택 해제
    pub fn cancel(&mut self) {
        self.prompt = None;
        let side = self.active;
        if self.slot(side).sizes.is_running() {
            self.slot_mut(side).sizes.abort();
        } else {
            self.active_panel_state_mut().clear_selection();
        }
    }

    fn toggle_selection_at_cursor(&mut self) {
        let panel = self.active_panel_state_mut();
        let cursor = panel.cursor_index();
        panel.toggle_selection(cursor);
        panel.move_cursor(1);
    }

    /// 마우스 입력 처리
    ///
    /// `area`는 이벤트가 일어난 패널의 목록 영역입니다.
    pub fn handle_mouse(&mut self, side: ActivePanel, event: &MouseEvent, area: ListArea) {
        let scroll_offset = self.panel(side).scroll_offset();
        if let Some(input) = mouse::translate(event, area, scroll_offset) {
            self.apply_pointer(side, input);
        }
    }

    /// 포인터 입력을 선택 전이로 변환
    pub fn apply_pointer(&mut self, side: ActivePanel, input: PointerInput) {
        if side != self.active {
            self.set_active_panel(side);
        }
        let panel = match side {
            ActivePanel::Left => &mut self.left.state,
            ActivePanel::Right => &mut self.right.state,
        };

        match input {
            PointerInput::Click { index } => {
                panel.move_cursor_to(index);
                panel.clear_selection();
            }
            PointerInput::ToggleClick { index } => {
                panel.toggle_selection(index);
                panel.move_cursor_to(index);
            }
            PointerInput::RangeClick { index } => {
                let anchor = panel.selection().anchor().unwrap_or(panel.cursor_index());
                panel.range_select(anchor, index);
                panel.move_cursor_to(index);
            }
            PointerInput::DragStart { index } => {
                panel.toggle_selection(index);
                panel.move_cursor_to(index);
                self.drag_anchor = Some(index);
            }
            PointerInput::DragTo { index } => {
                let anchor = *self.drag_anchor.get_or_insert(index);
                panel.replace_selection_with_range(anchor, index);
                panel.move_cursor_to(index);
            }
            PointerInput::ScrollUp => panel.move_cursor(-SCROLL_STEP),
            PointerInput::ScrollDown => panel.move_cursor(SCROLL_STEP),
        }
    }
}
