//! 액션 시스템
//!
//! 키 바인딩과 액션 메타데이터를 한곳에 모읍니다.
//! 입력 처리기는 키를 `Action`으로 바꾸기만 하고, 실제 동작은 `App`이 수행합니다.

use crossterm::event::{KeyCode, KeyModifiers};
use std::sync::LazyLock;

/// 모든 가능한 액션의 열거
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Navigation
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    EnterSelected,
    GoToParent,
    TogglePanel,
    /// Ctrl+숫자 빠른 이동 (0부터 시작하는 항목 인덱스)
    JumpTo(usize),
    // File Operations
    Copy,
    Move,
    MakeDirectory,
    Delete,
    CalculateSizes,
    // Selection
    ToggleSelection,
    MarkRange,
    SelectAll,
    DeselectAll,
    // System
    ToggleHidden,
    Refresh,
    Cancel,
    Quit,
}

/// 액션 카테고리
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCategory {
    Navigation,
    FileOperation,
    Selection,
    System,
}

/// 액션 정의 (메타데이터)
pub struct ActionDef {
    pub action: Action,
    pub id: &'static str,
    pub label: &'static str,
    pub category: ActionCategory,
    pub shortcut_display: Option<&'static str>,
}

/// 키 바인딩 정의
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: Option<KeyModifiers>, // None = any modifier
    pub action: Action,
}

/// 모든 액션 메타데이터 (JumpTo 제외)
pub static ACTION_DEFS: &[ActionDef] = &[
    // Navigation
    ActionDef {
        action: Action::MoveUp,
        id: "move_up",
        label: "Move up",
        category: ActionCategory::Navigation,
        shortcut_display: Some("Up"),
    },
    ActionDef {
        action: Action::MoveDown,
        id: "move_down",
        label: "Move down",
        category: ActionCategory::Navigation,
        shortcut_display: Some("Down"),
    },
    ActionDef {
        action: Action::PageUp,
        id: "page_up",
        label: "Page up",
        category: ActionCategory::Navigation,
        shortcut_display: Some("PgUp"),
    },
    ActionDef {
        action: Action::PageDown,
        id: "page_down",
        label: "Page down",
        category: ActionCategory::Navigation,
        shortcut_display: Some("PgDn"),
    },
    ActionDef {
        action: Action::GoToTop,
        id: "go_top",
        label: "Top",
        category: ActionCategory::Navigation,
        shortcut_display: Some("Home"),
    },
    ActionDef {
        action: Action::GoToBottom,
        id: "go_bottom",
        label: "Bottom",
        category: ActionCategory::Navigation,
        shortcut_display: Some("End"),
    },
    ActionDef {
        action: Action::EnterSelected,
        id: "enter",
        label: "Open",
        category: ActionCategory::Navigation,
        shortcut_display: Some("Enter"),
    },
    ActionDef {
        action: Action::GoToParent,
        id: "go_parent",
        label: "Parent dir",
        category: ActionCategory::Navigation,
        shortcut_display: Some("Backspace"),
    },
    ActionDef {
        action: Action::TogglePanel,
        id: "switch_panel",
        label: "Switch panel",
        category: ActionCategory::Navigation,
        shortcut_display: Some("Tab"),
    },
    // File Operations
    ActionDef {
        action: Action::CalculateSizes,
        id: "calculate_sizes",
        label: "Sizes",
        category: ActionCategory::FileOperation,
        shortcut_display: Some("F3"),
    },
    ActionDef {
        action: Action::Copy,
        id: "copy",
        label: "Copy",
        category: ActionCategory::FileOperation,
        shortcut_display: Some("F5"),
    },
    ActionDef {
        action: Action::Move,
        id: "move",
        label: "Move",
        category: ActionCategory::FileOperation,
        shortcut_display: Some("F6"),
    },
    ActionDef {
        action: Action::MakeDirectory,
        id: "mkdir",
        label: "MkDir",
        category: ActionCategory::FileOperation,
        shortcut_display: Some("F7"),
    },
    ActionDef {
        action: Action::Delete,
        id: "delete",
        label: "Delete",
        category: ActionCategory::FileOperation,
        shortcut_display: Some("F8"),
    },
    // Selection
    ActionDef {
        action: Action::ToggleSelection,
        id: "toggle_selection",
        label: "Select",
        category: ActionCategory::Selection,
        shortcut_display: Some("Space"),
    },
    ActionDef {
        action: Action::MarkRange,
        id: "mark_range",
        label: "Mark range",
        category: ActionCategory::Selection,
        shortcut_display: Some("m"),
    },
    ActionDef {
        action: Action::SelectAll,
        id: "select_all",
        label: "Select all",
        category: ActionCategory::Selection,
        shortcut_display: Some("^A"),
    },
    ActionDef {
        action: Action::DeselectAll,
        id: "deselect_all",
        label: "Deselect all",
        category: ActionCategory::Selection,
        shortcut_display: None,
    },
    // System
    ActionDef {
        action: Action::ToggleHidden,
        id: "toggle_hidden",
        label: "Hidden",
        category: ActionCategory::System,
        shortcut_display: Some("F9"),
    },
    ActionDef {
        action: Action::Refresh,
        id: "refresh",
        label: "Refresh",
        category: ActionCategory::System,
        shortcut_display: Some("F10"),
    },
    ActionDef {
        action: Action::Cancel,
        id: "cancel",
        label: "Cancel",
        category: ActionCategory::System,
        shortcut_display: Some("Esc"),
    },
    ActionDef {
        action: Action::Quit,
        id: "quit",
        label: "Quit",
        category: ActionCategory::System,
        shortcut_display: Some("^Q"),
    },
];

fn build_key_bindings() -> Vec<KeyBinding> {
    let bind = |code: KeyCode, modifiers: Option<KeyModifiers>, action: Action| KeyBinding {
        code,
        modifiers,
        action,
    };
    let none = Some(KeyModifiers::NONE);
    let ctrl = Some(KeyModifiers::CONTROL);

    let mut bindings = vec![
        // 이동
        bind(KeyCode::Up, None, Action::MoveUp),
        bind(KeyCode::Down, None, Action::MoveDown),
        bind(KeyCode::PageUp, None, Action::PageUp),
        bind(KeyCode::PageDown, None, Action::PageDown),
        bind(KeyCode::Home, None, Action::GoToTop),
        bind(KeyCode::End, None, Action::GoToBottom),
        bind(KeyCode::Enter, None, Action::EnterSelected),
        bind(KeyCode::Backspace, None, Action::GoToParent),
        bind(KeyCode::Tab, None, Action::TogglePanel),
        // 파일 작업
        bind(KeyCode::F(3), None, Action::CalculateSizes),
        bind(KeyCode::F(5), None, Action::Copy),
        bind(KeyCode::F(6), None, Action::Move),
        bind(KeyCode::F(7), None, Action::MakeDirectory),
        bind(KeyCode::F(8), None, Action::Delete),
        bind(KeyCode::Delete, None, Action::Delete),
        // 선택
        bind(KeyCode::Char(' '), none, Action::ToggleSelection),
        bind(KeyCode::Insert, None, Action::ToggleSelection),
        bind(KeyCode::Char('m'), none, Action::MarkRange),
        bind(KeyCode::Char('a'), ctrl, Action::SelectAll),
        // 시스템
        bind(KeyCode::F(9), None, Action::ToggleHidden),
        bind(KeyCode::F(10), None, Action::Refresh),
        bind(KeyCode::Char('r'), ctrl, Action::Refresh),
        bind(KeyCode::Esc, None, Action::Cancel),
        bind(KeyCode::Char('q'), ctrl, Action::Quit),
    ];

    // Ctrl+1..9 → 1..9번째 항목
    for digit in 1..=9u8 {
        bindings.push(bind(
            KeyCode::Char(char::from(b'0' + digit)),
            ctrl,
            Action::JumpTo(usize::from(digit - 1)),
        ));
    }

    bindings
}

static KEY_BINDINGS: LazyLock<Vec<KeyBinding>> = LazyLock::new(build_key_bindings);

/// 키 바인딩 목록 조회 (1회 초기화 후 재사용)
pub fn key_bindings() -> &'static [KeyBinding] {
    KEY_BINDINGS.as_slice()
}

/// 키 입력으로 액션 조회
pub fn find_action(modifiers: KeyModifiers, code: KeyCode) -> Option<Action> {
    key_bindings()
        .iter()
        .find(|binding| {
            binding.code == code
                && match binding.modifiers {
                    None => true, // any modifier
                    Some(required) => modifiers == required,
                }
        })
        .map(|binding| binding.action)
}

impl Action {
    /// action_id 문자열로 Action 조회
    pub fn from_id(id: &str) -> Option<Action> {
        ACTION_DEFS.iter().find(|d| d.id == id).map(|d| d.action)
    }

    /// 메타데이터 조회
    pub fn def(self) -> Option<&'static ActionDef> {
        ACTION_DEFS.iter().find(|d| d.action == self)
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::JumpTo(_) => "Jump",
            _ => self.def().map_or("", |d| d.label),
        }
    }
}
