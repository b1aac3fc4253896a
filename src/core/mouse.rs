//! 마우스 입력 변환
//!
//! crossterm 마우스 이벤트를 패널 항목 기준의 포인터 입력으로 바꿉니다.
//! 선택 상태 변경은 `App`이 토글/범위/전체 선택 전이로 수행합니다.

use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// 휠 한 칸당 커서 이동 줄 수
pub const SCROLL_STEP: isize = 3;

/// 패널 항목 기준 포인터 입력
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerInput {
    /// 일반 클릭: 커서 이동 + 선택 해제
    Click { index: usize },
    /// Ctrl+클릭: 선택 토글
    ToggleClick { index: usize },
    /// Shift+클릭: 기준점부터 범위 선택
    RangeClick { index: usize },
    /// 오른쪽 버튼 누름: 토글 후 드래그 시작
    DragStart { index: usize },
    /// 오른쪽 버튼 드래그: 드래그 범위로 선택 교체
    DragTo { index: usize },
    ScrollUp,
    ScrollDown,
}

/// 패널 목록 영역의 화면 위치
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListArea {
    /// 첫 항목이 그려지는 화면 줄
    pub top: u16,
    /// 목록 줄 수
    pub height: u16,
}

impl ListArea {
    /// 화면 줄 → 항목 인덱스 (목록 밖이면 None)
    pub fn index_at(&self, row: u16, scroll_offset: usize) -> Option<usize> {
        if row < self.top || row >= self.top.saturating_add(self.height) {
            return None;
        }
        Some(scroll_offset + usize::from(row - self.top))
    }
}

/// 마우스 이벤트 변환
pub fn translate(event: &MouseEvent, area: ListArea, scroll_offset: usize) -> Option<PointerInput> {
    match event.kind {
        MouseEventKind::ScrollUp => return Some(PointerInput::ScrollUp),
        MouseEventKind::ScrollDown => return Some(PointerInput::ScrollDown),
        _ => {}
    }

    let index = area.index_at(event.row, scroll_offset)?;
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if event.modifiers.contains(KeyModifiers::SHIFT) {
                Some(PointerInput::RangeClick { index })
            } else if event.modifiers.contains(KeyModifiers::CONTROL) {
                Some(PointerInput::ToggleClick { index })
            } else {
                Some(PointerInput::Click { index })
            }
        }
        MouseEventKind::Down(MouseButton::Right) => Some(PointerInput::DragStart { index }),
        MouseEventKind::Drag(MouseButton::Right) => Some(PointerInput::DragTo { index }),
        _ => None,
    }
}
