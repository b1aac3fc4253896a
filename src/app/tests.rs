use super::*;
use crate::core::actions::Action;
use crate::core::conflict::FixedResolver;
use crate::core::mouse::{ListArea, PointerInput};
use crate::models::operation::{ConflictDecision, OperationResult};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;

struct Fixture {
    _temp: TempDir,
    left: PathBuf,
    right: PathBuf,
    settings: PathBuf,
}

fn fixture() -> Fixture {
    let temp = TempDir::new().unwrap();
    let left = temp.path().join("left");
    let right = temp.path().join("right");
    fs::create_dir_all(&left).unwrap();
    fs::create_dir_all(&right).unwrap();
    let settings = temp.path().join("config").join("settings.toml");
    Fixture {
        _temp: temp,
        left,
        right,
        settings,
    }
}

fn make_test_app(fx: &Fixture, decision: ConflictDecision) -> App {
    App::new_for_test(
        fx.left.clone(),
        fx.right.clone(),
        Arc::new(FixedResolver(decision)),
        fx.settings.clone(),
    )
}

fn names(panel: &PanelState) -> Vec<String> {
    panel.entries().iter().map(|e| e.name.clone()).collect()
}

fn index_of(panel: &PanelState, name: &str) -> usize {
    panel
        .entries()
        .iter()
        .position(|e| e.name == name)
        .unwrap_or_else(|| panic!("{} not listed", name))
}

fn write(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}

#[tokio::test]
async fn test_initial_state() {
    let fx = fixture();
    write(&fx.left.join("a.txt"), "a");
    let app = make_test_app(&fx, ConflictDecision::Skip);

    assert_eq!(app.active_panel(), ActivePanel::Left);
    assert!(app.panel(ActivePanel::Left).is_active());
    assert!(!app.panel(ActivePanel::Right).is_active());
    assert_eq!(app.active_panel_state().current_path(), fx.left.as_path());
    assert_eq!(app.inactive_panel_state().current_path(), fx.right.as_path());
    assert_eq!(names(app.active_panel_state()), vec!["..", "a.txt"]);
}

#[tokio::test]
async fn test_tab_toggles_active_panel() {
    let fx = fixture();
    let mut app = make_test_app(&fx, ConflictDecision::Skip);

    assert!(app.handle_key(key(KeyCode::Tab, KeyModifiers::NONE)).await);
    assert_eq!(app.active_panel(), ActivePanel::Right);
    assert!(app.panel(ActivePanel::Right).is_active());
    assert!(!app.panel(ActivePanel::Left).is_active());

    app.execute_action(Action::TogglePanel).await;
    assert_eq!(app.active_panel(), ActivePanel::Left);
}

#[tokio::test]
async fn test_unbound_key_is_ignored() {
    let fx = fixture();
    let mut app = make_test_app(&fx, ConflictDecision::Skip);
    assert!(!app.handle_key(key(KeyCode::Char('z'), KeyModifiers::NONE)).await);
}

#[tokio::test]
async fn test_copy_selection_to_inactive_panel() {
    let fx = fixture();
    write(&fx.left.join("a.txt"), "aaa");
    write(&fx.left.join("b.txt"), "bb");
    fs::create_dir(fx.left.join("docs")).unwrap();
    write(&fx.left.join("docs").join("inner.txt"), "inner");
    let mut app = make_test_app(&fx, ConflictDecision::Skip);

    app.execute_action(Action::SelectAll).await;
    assert_eq!(app.active_panel_state().selected_indices().len(), 3);

    assert!(app.handle_key(key(KeyCode::F(5), KeyModifiers::NONE)).await);

    assert_eq!(fs::read_to_string(fx.right.join("a.txt")).unwrap(), "aaa");
    assert_eq!(fs::read_to_string(fx.right.join("b.txt")).unwrap(), "bb");
    assert_eq!(
        fs::read_to_string(fx.right.join("docs").join("inner.txt")).unwrap(),
        "inner"
    );
    assert!(fx.left.join("a.txt").exists());

    let report = app.last_report().unwrap();
    assert_eq!(report.summary().succeeded, 3);
    assert!(app.last_error().is_none());

    // 전부 성공하면 선택 해제, 반대 패널은 다시 읽음
    assert!(app.active_panel_state().selection().is_empty());
    assert_eq!(
        names(app.inactive_panel_state()),
        vec!["..", "docs", "a.txt", "b.txt"]
    );
}

#[tokio::test]
async fn test_copy_without_selection_uses_cursor_entry() {
    let fx = fixture();
    write(&fx.left.join("a.txt"), "a");
    write(&fx.left.join("b.txt"), "b");
    let mut app = make_test_app(&fx, ConflictDecision::Skip);

    let index = index_of(app.active_panel_state(), "b.txt");
    app.execute_action(Action::JumpTo(index)).await;
    app.copy_selection().await;

    assert!(fx.right.join("b.txt").exists());
    assert!(!fx.right.join("a.txt").exists());
}

#[tokio::test]
async fn test_copy_on_parent_entry_does_nothing() {
    let fx = fixture();
    write(&fx.left.join("a.txt"), "a");
    let mut app = make_test_app(&fx, ConflictDecision::Skip);

    assert_eq!(app.active_panel_state().cursor_index(), 0);
    app.copy_selection().await;

    assert!(app.last_report().is_none());
    assert!(app.last_error().is_some());
    assert_eq!(fs::read_dir(&fx.right).unwrap().count(), 0);
}

#[tokio::test]
async fn test_copy_conflict_skip_clears_selection() {
    let fx = fixture();
    write(&fx.left.join("a.txt"), "new");
    write(&fx.right.join("a.txt"), "old");
    let mut app = make_test_app(&fx, ConflictDecision::Skip);

    app.execute_action(Action::SelectAll).await;
    app.execute_action(Action::Copy).await;

    assert_eq!(fs::read_to_string(fx.right.join("a.txt")).unwrap(), "old");
    let report = app.last_report().unwrap();
    assert_eq!(report.results(), vec![Some(OperationResult::Skipped)]);
    // 실패 없이 건너뛰기만 했으므로 선택 해제
    assert!(app.active_panel_state().selection().is_empty());
}

#[tokio::test]
async fn test_copy_conflict_cancel_keeps_selection() {
    let fx = fixture();
    write(&fx.left.join("a.txt"), "new");
    write(&fx.left.join("b.txt"), "new");
    write(&fx.right.join("a.txt"), "old");
    let mut app = make_test_app(&fx, ConflictDecision::Cancel);

    app.execute_action(Action::SelectAll).await;
    app.execute_action(Action::Copy).await;

    let report = app.last_report().unwrap();
    assert!(report.summary().was_cancelled());
    assert!(!fx.right.join("b.txt").exists());
    assert_eq!(app.active_panel_state().selected_indices().len(), 2);
}

#[tokio::test]
async fn test_copy_conflict_rename() {
    let fx = fixture();
    write(&fx.left.join("a.txt"), "new");
    write(&fx.right.join("a.txt"), "old");
    let mut app = make_test_app(&fx, ConflictDecision::Rename);

    app.execute_action(Action::SelectAll).await;
    app.execute_action(Action::Copy).await;

    assert_eq!(fs::read_to_string(fx.right.join("a.txt")).unwrap(), "old");
    assert_eq!(fs::read_to_string(fx.right.join("a (1).txt")).unwrap(), "new");
}

#[tokio::test]
async fn test_move_selection_updates_both_panels() {
    let fx = fixture();
    write(&fx.left.join("a.txt"), "a");
    write(&fx.left.join("keep.txt"), "k");
    let mut app = make_test_app(&fx, ConflictDecision::Skip);

    let index = index_of(app.active_panel_state(), "a.txt");
    app.active_panel_state_mut().toggle_selection(index);
    assert!(app.handle_key(key(KeyCode::F(6), KeyModifiers::NONE)).await);

    assert!(!fx.left.join("a.txt").exists());
    assert_eq!(fs::read_to_string(fx.right.join("a.txt")).unwrap(), "a");
    assert_eq!(names(app.active_panel_state()), vec!["..", "keep.txt"]);
    assert_eq!(names(app.inactive_panel_state()), vec!["..", "a.txt"]);
    assert!(app.active_panel_state().selection().is_empty());
}

#[tokio::test]
async fn test_move_to_missing_destination_reports_error() {
    let fx = fixture();
    write(&fx.left.join("a.txt"), "a");
    let mut app = make_test_app(&fx, ConflictDecision::Skip);

    let index = index_of(app.active_panel_state(), "a.txt");
    app.execute_action(Action::JumpTo(index)).await;
    fs::remove_dir_all(&fx.right).unwrap();
    app.move_selection().await;

    assert!(app.last_error().is_some());
    assert!(app.last_report().is_none());
    assert!(fx.left.join("a.txt").exists());
}

#[tokio::test]
async fn test_delete_selection() {
    let fx = fixture();
    write(&fx.left.join("a.txt"), "a");
    fs::create_dir(fx.left.join("dir")).unwrap();
    write(&fx.left.join("dir").join("x"), "x");
    write(&fx.left.join("keep.txt"), "k");
    let mut app = make_test_app(&fx, ConflictDecision::Skip);

    let a = index_of(app.active_panel_state(), "a.txt");
    let dir = index_of(app.active_panel_state(), "dir");
    app.active_panel_state_mut().toggle_selection(a);
    app.active_panel_state_mut().toggle_selection(dir);
    assert!(app.handle_key(key(KeyCode::Delete, KeyModifiers::NONE)).await);

    assert!(!fx.left.join("a.txt").exists());
    assert!(!fx.left.join("dir").exists());
    assert_eq!(names(app.active_panel_state()), vec!["..", "keep.txt"]);
    assert_eq!(app.last_report().unwrap().summary().succeeded, 2);
    assert!(app.active_panel_state().selection().is_empty());
}

#[tokio::test]
async fn test_make_directory_prompt_and_focus() {
    let fx = fixture();
    write(&fx.left.join("a.txt"), "a");
    let mut app = make_test_app(&fx, ConflictDecision::Skip);

    app.handle_key(key(KeyCode::F(7), KeyModifiers::NONE)).await;
    assert_eq!(app.prompt(), Some(Prompt::DirectoryName));

    app.create_directory("reports").await;
    assert_eq!(app.prompt(), None);
    assert!(fx.left.join("reports").is_dir());
    assert!(app.last_error().is_none());
    assert_eq!(
        app.active_panel_state().cursor_entry().map(|e| e.name.as_str()),
        Some("reports")
    );
}

#[tokio::test]
async fn test_make_directory_invalid_name() {
    let fx = fixture();
    let mut app = make_test_app(&fx, ConflictDecision::Skip);

    app.create_directory("bad/name").await;
    assert!(app.last_error().is_some());
    assert_eq!(fs::read_dir(&fx.left).unwrap().count(), 0);
}

#[tokio::test]
async fn test_make_directory_existing_name() {
    let fx = fixture();
    fs::create_dir(fx.left.join("dup")).unwrap();
    let mut app = make_test_app(&fx, ConflictDecision::Skip);

    app.create_directory("dup").await;
    assert!(app.last_error().unwrap().contains("already exists"));
}

#[tokio::test]
async fn test_escape_cancels_prompt_and_clears_selection() {
    let fx = fixture();
    write(&fx.left.join("a.txt"), "a");
    let mut app = make_test_app(&fx, ConflictDecision::Skip);

    app.execute_action(Action::SelectAll).await;
    app.execute_action(Action::MakeDirectory).await;
    app.handle_key(key(KeyCode::Esc, KeyModifiers::NONE)).await;

    assert_eq!(app.prompt(), None);
    assert!(app.active_panel_state().selection().is_empty());
}

#[tokio::test]
async fn test_space_toggles_and_advances() {
    let fx = fixture();
    write(&fx.left.join("a.txt"), "a");
    write(&fx.left.join("b.txt"), "b");
    let mut app = make_test_app(&fx, ConflictDecision::Skip);

    app.execute_action(Action::MoveDown).await;
    app.handle_key(key(KeyCode::Char(' '), KeyModifiers::NONE)).await;

    assert_eq!(app.active_panel_state().selected_indices(), vec![1]);
    assert_eq!(app.active_panel_state().cursor_index(), 2);
}

#[tokio::test]
async fn test_enter_and_backspace_navigation() {
    let fx = fixture();
    fs::create_dir(fx.left.join("sub")).unwrap();
    write(&fx.left.join("file.txt"), "f");
    let mut app = make_test_app(&fx, ConflictDecision::Skip);

    let sub = index_of(app.active_panel_state(), "sub");
    app.execute_action(Action::JumpTo(sub)).await;
    app.handle_key(key(KeyCode::Enter, KeyModifiers::NONE)).await;
    assert_eq!(
        app.active_panel_state().current_path(),
        fx.left.join("sub").as_path()
    );

    app.handle_key(key(KeyCode::Backspace, KeyModifiers::NONE)).await;
    assert_eq!(app.active_panel_state().current_path(), fx.left.as_path());
    assert_eq!(
        app.active_panel_state().cursor_entry().map(|e| e.name.as_str()),
        Some("sub")
    );
}

#[tokio::test]
async fn test_enter_on_file_requests_open() {
    let fx = fixture();
    write(&fx.left.join("file.txt"), "f");
    let mut app = make_test_app(&fx, ConflictDecision::Skip);

    let file = index_of(app.active_panel_state(), "file.txt");
    app.execute_action(Action::JumpTo(file)).await;
    app.execute_action(Action::EnterSelected).await;

    assert_eq!(app.take_pending_open(), Some(fx.left.join("file.txt")));
    assert_eq!(app.take_pending_open(), None);
    assert_eq!(app.active_panel_state().current_path(), fx.left.as_path());
}

#[tokio::test]
async fn test_toggle_hidden_via_action_id() {
    let fx = fixture();
    write(&fx.left.join(".hidden"), "h");
    write(&fx.left.join("shown"), "s");
    let mut app = make_test_app(&fx, ConflictDecision::Skip);

    assert_eq!(names(app.active_panel_state()), vec!["..", "shown"]);
    assert!(app.execute_action_id("toggle_hidden").await);
    assert_eq!(names(app.active_panel_state()), vec!["..", ".hidden", "shown"]);
    assert!(!app.execute_action_id("no_such_action").await);
}

#[tokio::test]
async fn test_refresh_picks_up_external_changes() {
    let fx = fixture();
    let mut app = make_test_app(&fx, ConflictDecision::Skip);

    write(&fx.left.join("late.txt"), "l");
    write(&fx.right.join("other.txt"), "o");
    app.handle_key(key(KeyCode::Char('r'), KeyModifiers::CONTROL)).await;

    assert_eq!(names(app.panel(ActivePanel::Left)), vec!["..", "late.txt"]);
    assert_eq!(names(app.panel(ActivePanel::Right)), vec!["..", "other.txt"]);
}

#[tokio::test]
async fn test_mouse_click_modifiers() {
    let fx = fixture();
    for name in ["a", "b", "c", "d"] {
        write(&fx.left.join(name), name);
    }
    let mut app = make_test_app(&fx, ConflictDecision::Skip);

    // 인덱스: 0 "..", 1 a, 2 b, 3 c, 4 d
    app.apply_pointer(ActivePanel::Left, PointerInput::ToggleClick { index: 1 });
    app.apply_pointer(ActivePanel::Left, PointerInput::ToggleClick { index: 3 });
    assert_eq!(app.active_panel_state().selected_indices(), vec![1, 3]);

    app.apply_pointer(ActivePanel::Left, PointerInput::RangeClick { index: 4 });
    assert_eq!(app.active_panel_state().selected_indices(), vec![1, 3, 4]);
    assert_eq!(app.active_panel_state().cursor_index(), 4);

    app.apply_pointer(ActivePanel::Left, PointerInput::Click { index: 2 });
    assert!(app.active_panel_state().selection().is_empty());
    assert_eq!(app.active_panel_state().cursor_index(), 2);
}

#[tokio::test]
async fn test_mouse_right_drag_replaces_selection() {
    let fx = fixture();
    for name in ["a", "b", "c", "d"] {
        write(&fx.left.join(name), name);
    }
    let mut app = make_test_app(&fx, ConflictDecision::Skip);

    app.apply_pointer(ActivePanel::Left, PointerInput::DragStart { index: 2 });
    app.apply_pointer(ActivePanel::Left, PointerInput::DragTo { index: 4 });
    assert_eq!(app.active_panel_state().selected_indices(), vec![2, 3, 4]);

    app.apply_pointer(ActivePanel::Left, PointerInput::DragTo { index: 3 });
    assert_eq!(app.active_panel_state().selected_indices(), vec![2, 3]);
}

#[tokio::test]
async fn test_mouse_event_activates_clicked_panel() {
    let fx = fixture();
    write(&fx.right.join("r.txt"), "r");
    let mut app = make_test_app(&fx, ConflictDecision::Skip);

    let area = ListArea { top: 1, height: 20 };
    let event = MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: 60,
        row: 2,
        modifiers: KeyModifiers::NONE,
    };
    app.handle_mouse(ActivePanel::Right, &event, area);

    assert_eq!(app.active_panel(), ActivePanel::Right);
    assert!(app.panel(ActivePanel::Right).is_active());
    assert_eq!(app.active_panel_state().cursor_index(), 1);
}

#[tokio::test]
async fn test_directory_sizes_reach_panel() {
    let fx = fixture();
    fs::create_dir(fx.left.join("data")).unwrap();
    write(&fx.left.join("data").join("a.bin"), "12345");
    write(&fx.left.join("data").join("b.bin"), "123");
    let mut app = make_test_app(&fx, ConflictDecision::Skip);

    assert!(app.calculate_sizes());
    let data = fx.left.join("data");
    let deadline = Instant::now() + Duration::from_secs(5);
    while app.active_panel_state().dir_size(&data).is_none() && Instant::now() < deadline {
        app.poll_background();
        std::thread::sleep(Duration::from_millis(5));
    }

    assert_eq!(app.active_panel_state().dir_size(&data), Some(8));
}

#[tokio::test]
async fn test_quit_saves_and_restores_panels() {
    let fx = fixture();
    fs::create_dir(fx.right.join("nested")).unwrap();
    write(&fx.left.join("a.txt"), "a");
    write(&fx.left.join("b.txt"), "b");
    let mut app = make_test_app(&fx, ConflictDecision::Skip);

    app.execute_action(Action::MoveDown).await;
    app.execute_action(Action::MoveDown).await;
    app.execute_action(Action::TogglePanel).await;
    app.execute_action(Action::MoveDown).await;
    app.execute_action(Action::EnterSelected).await;
    app.handle_key(key(KeyCode::Char('q'), KeyModifiers::CONTROL)).await;

    assert!(app.should_quit);
    assert!(fx.settings.exists());

    let restored = App::new(
        Arc::new(FixedResolver(ConflictDecision::Skip)),
        ConfigStore::with_path(fx.settings.clone()),
    );
    assert_eq!(restored.active_panel(), ActivePanel::Right);
    assert_eq!(
        restored.panel(ActivePanel::Right).current_path(),
        fx.right.join("nested").as_path()
    );
    assert_eq!(
        restored.panel(ActivePanel::Left).current_path(),
        fx.left.as_path()
    );
    assert_eq!(restored.panel(ActivePanel::Left).cursor_index(), 2);
}

#[tokio::test]
async fn test_resize_changes_page_size() {
    let fx = fixture();
    for i in 0..30 {
        write(&fx.left.join(format!("f{:02}", i)), "x");
    }
    let mut app = make_test_app(&fx, ConflictDecision::Skip);

    app.resize(100, 13);
    app.execute_action(Action::PageDown).await;
    assert_eq!(app.active_panel_state().cursor_index(), 10);
    assert_eq!(app.snapshot_config().window_size, (100, 13));
}

#[tokio::test]
async fn test_navigation_discards_pending_sizes() {
    let fx = fixture();
    let data = fx.left.join("data");
    let inner = data.join("inner");
    fs::create_dir_all(&inner).unwrap();
    write(&data.join("top.bin"), "1234");
    write(&inner.join("deep.bin"), "12");
    let mut app = make_test_app(&fx, ConflictDecision::Skip);

    assert!(app.calculate_sizes());
    let index = index_of(app.active_panel_state(), "data");
    app.execute_action(Action::JumpTo(index)).await;
    app.execute_action(Action::EnterSelected).await;
    assert_eq!(app.active_panel_state().current_path(), data.as_path());

    // 이전 디렉토리 계산은 폐기되어 바로 다시 시작 가능
    assert!(app.calculate_sizes());
    let deadline = Instant::now() + Duration::from_secs(5);
    while app.active_panel_state().dir_size(&inner).is_none() && Instant::now() < deadline {
        app.poll_background();
        std::thread::sleep(Duration::from_millis(5));
    }

    assert_eq!(app.active_panel_state().dir_size(&inner), Some(2));
    assert_eq!(app.active_panel_state().dir_size(&data), None);
}
