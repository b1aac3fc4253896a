use crate::config::PanelConfig;
use crate::models::file_entry::FileEntry;
use crate::models::selection::Selection;
use crate::system::filesystem::FileSystem;
use crate::utils::error::Result;
use log::{debug, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// 패널 높이에서 목록 외에 쓰이는 줄 수 (헤더, 구분선, 테두리)
pub const RESERVED_ROWS: usize = 3;

/// 초기 뷰포트 높이 (UI가 실제 크기를 알려주기 전까지 사용)
pub const DEFAULT_VIEWPORT_HEIGHT: usize = 40;

/// Enter 처리 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnterOutcome {
    /// 디렉토리(또는 상위 디렉토리)로 이동함
    Navigated,
    /// 파일 선택됨 (기본 앱으로 열기는 호출자 몫)
    Open(PathBuf),
    /// 빈 목록 등 아무 일도 없음
    Nothing,
}

/// 패널 상태
///
/// 현재 디렉토리, 커서, 스크롤, 다중 선택을 소유합니다.
/// 목록이 비어 있지 않으면 커서는 항상 `[0, len)` 범위에 있고,
/// 선택 인덱스는 재로딩마다 목록 범위로 다시 맞춰집니다.
#[derive(Debug, Clone)]
pub struct PanelState {
    current_path: PathBuf,
    show_hidden: bool,
    cursor_index: usize,
    scroll_offset: usize,
    /// 상위 디렉토리가 있으면 0번은 ".." 항목
    entries: Vec<FileEntry>,
    selection: Selection,
    is_active: bool,
    viewport_height: usize,
    /// 백그라운드 계산된 디렉토리 크기 (표시용 캐시)
    dir_sizes: HashMap<PathBuf, u64>,
}

impl PanelState {
    /// 새 패널 생성 후 경로 로딩 (실패 시 대체 경로 사용)
    pub fn new(path: PathBuf, show_hidden: bool, filesystem: &FileSystem) -> Self {
        let mut panel = Self {
            current_path: path.clone(),
            show_hidden,
            cursor_index: 0,
            scroll_offset: 0,
            entries: Vec::new(),
            selection: Selection::new(),
            is_active: false,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            dir_sizes: HashMap::new(),
        };
        panel.navigate(path, filesystem);
        panel
    }

    /// 저장된 설정으로 패널 복원
    pub fn from_config(config: &PanelConfig, filesystem: &FileSystem) -> Self {
        let mut panel = Self::new(config.path.clone(), config.show_hidden, filesystem);
        if panel.current_path == config.path {
            panel.scroll_offset = config.scroll_offset;
            panel.move_cursor_to(config.selected_index);
        }
        panel
    }

    /// 종료 시 저장할 설정
    pub fn to_config(&self) -> PanelConfig {
        PanelConfig {
            path: self.current_path.clone(),
            show_hidden: self.show_hidden,
            selected_index: self.cursor_index,
            scroll_offset: self.scroll_offset,
        }
    }

    // === 조회 ===

    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    pub fn cursor_index(&self) -> usize {
        self.cursor_index
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// 선택된 인덱스 (오름차순)
    pub fn selected_indices(&self) -> Vec<usize> {
        self.selection.indices().collect()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// 커서 위치 항목
    pub fn cursor_entry(&self) -> Option<&FileEntry> {
        self.entries.get(self.cursor_index)
    }

    /// 화면에 보이는 목록 줄 수 (최소 1)
    pub fn visible_rows(&self) -> usize {
        self.viewport_height.saturating_sub(RESERVED_ROWS).max(1)
    }

    /// 작업 대상 항목
    ///
    /// 선택이 있으면 선택 항목들(인덱스 순), 없으면 커서 항목 하나.
    /// ".." 항목은 포함되지 않습니다.
    pub fn effective_selection(&self) -> Vec<FileEntry> {
        if !self.selection.is_empty() {
            return self
                .selection
                .indices()
                .filter_map(|i| self.entries.get(i))
                .filter(|entry| !entry.is_parent())
                .cloned()
                .collect();
        }
        match self.cursor_entry() {
            Some(entry) if !entry.is_parent() => vec![entry.clone()],
            _ => Vec::new(),
        }
    }

    /// 크기 계산 대상 디렉토리 (".." 제외)
    pub fn directory_entries(&self) -> Vec<FileEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.is_directory && !entry.is_parent())
            .cloned()
            .collect()
    }

    /// 계산된 디렉토리 크기
    pub fn dir_size(&self, path: &Path) -> Option<u64> {
        self.dir_sizes.get(path).copied()
    }

    // === 디렉토리 이동 ===

    /// 경로 이동
    ///
    /// 커서/스크롤/선택을 초기화합니다. 경로를 읽을 수 없으면
    /// 상위 디렉토리, 그 다음 홈 디렉토리로 대체합니다.
    /// 반환값: 요청한 경로를 그대로 열었는지 여부
    pub fn navigate(&mut self, path: PathBuf, filesystem: &FileSystem) -> bool {
        let mut candidates = vec![path.clone()];
        if let Some(parent) = path.parent() {
            candidates.push(parent.to_path_buf());
        }
        candidates.push(filesystem.home_directory());

        for (attempt, candidate) in candidates.into_iter().enumerate() {
            match self.load_entries(&candidate, filesystem) {
                Ok(entries) => {
                    if attempt > 0 {
                        warn!(
                            "Cannot open {}, falling back to {}",
                            path.display(),
                            candidate.display()
                        );
                    }
                    self.apply_navigation(candidate, entries);
                    return attempt == 0;
                }
                Err(e) => warn!("{}", e),
            }
        }

        // 홈 디렉토리도 읽을 수 없음: 빈 목록
        self.apply_navigation(filesystem.home_directory(), Vec::new());
        false
    }

    /// 현재 디렉토리 다시 읽기
    ///
    /// 커서와 선택은 유지하되 새 목록 범위로 다시 맞춥니다.
    /// 디렉토리가 사라졌으면 대체 경로로 이동합니다.
    pub fn reload(&mut self, filesystem: &FileSystem) {
        match self.load_entries(&self.current_path, filesystem) {
            Ok(entries) => {
                self.entries = entries;
                self.selection = self.selection.clamp(&self.entries);
                self.clamp_cursor();
            }
            Err(e) => {
                warn!("Reload failed: {}", e);
                let path = self.current_path.clone();
                self.navigate(path, filesystem);
            }
        }
    }

    /// 커서 항목 진입
    pub fn enter_selected(&mut self, filesystem: &FileSystem) -> EnterOutcome {
        let Some(entry) = self.cursor_entry().cloned() else {
            return EnterOutcome::Nothing;
        };
        if entry.is_parent() {
            self.go_parent(filesystem);
            EnterOutcome::Navigated
        } else if entry.is_directory {
            self.navigate(entry.path, filesystem);
            EnterOutcome::Navigated
        } else {
            EnterOutcome::Open(entry.path)
        }
    }

    /// 상위 디렉토리로 이동하고 방금 나온 디렉토리에 커서 위치
    pub fn go_parent(&mut self, filesystem: &FileSystem) -> bool {
        let Some(parent) = self.current_path.parent().map(Path::to_path_buf) else {
            return false;
        };
        let left_name = self
            .current_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string());

        self.navigate(parent, filesystem);
        if let Some(name) = left_name {
            self.focus_entry_by_name(&name);
        }
        true
    }

    /// 숨김 파일 표시 전환
    ///
    /// 인덱스가 달라지므로 선택은 해제하고 커서는 같은 이름에 유지합니다.
    pub fn toggle_hidden(&mut self, filesystem: &FileSystem) {
        let focused = self.cursor_entry().map(|entry| entry.name.clone());
        self.show_hidden = !self.show_hidden;
        self.selection = Selection::cleared();
        self.reload(filesystem);
        if let Some(name) = focused {
            self.focus_entry_by_name(&name);
        }
    }

    /// 이름으로 커서 이동
    pub fn focus_entry_by_name(&mut self, name: &str) -> bool {
        match self.entries.iter().position(|entry| entry.name == name) {
            Some(index) => {
                self.move_cursor_to(index);
                true
            }
            None => false,
        }
    }

    // === 커서 ===

    /// 커서 상대 이동 (범위 밖이면 양 끝으로 고정)
    pub fn move_cursor(&mut self, delta: isize) {
        if self.entries.is_empty() {
            self.cursor_index = 0;
            self.scroll_offset = 0;
            return;
        }
        let last = (self.entries.len() - 1) as isize;
        let target = (self.cursor_index as isize).saturating_add(delta).clamp(0, last);
        self.cursor_index = target as usize;
        self.adjust_scroll_offset();
    }

    /// 커서 절대 이동
    pub fn move_cursor_to(&mut self, index: usize) {
        self.cursor_index = index;
        self.clamp_cursor();
    }

    pub fn page_up(&mut self) {
        self.move_cursor(-(self.visible_rows() as isize));
    }

    pub fn page_down(&mut self) {
        self.move_cursor(self.visible_rows() as isize);
    }

    pub fn go_to_top(&mut self) {
        self.move_cursor_to(0);
    }

    pub fn go_to_bottom(&mut self) {
        self.move_cursor_to(self.entries.len().saturating_sub(1));
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height;
        self.adjust_scroll_offset();
    }

    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    // === 선택 ===

    pub fn toggle_selection(&mut self, index: usize) {
        self.selection = self.selection.toggle(index, &self.entries);
    }

    pub fn range_select(&mut self, anchor: usize, index: usize) {
        self.selection = self.selection.range_select(anchor, index, &self.entries);
    }

    /// 마지막 기준점(없으면 커서)부터 커서까지 범위 선택
    pub fn mark_range_to_cursor(&mut self) {
        let anchor = self.selection.anchor().unwrap_or(self.cursor_index);
        self.range_select(anchor, self.cursor_index);
    }

    /// 선택을 주어진 범위로 교체 (마우스 드래그)
    pub fn replace_selection_with_range(&mut self, anchor: usize, index: usize) {
        self.selection = Selection::cleared().range_select(anchor, index, &self.entries);
    }

    pub fn select_all(&mut self) {
        self.selection = self.selection.select_all(&self.entries);
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::cleared();
    }

    // === 디렉토리 크기 캐시 ===

    /// 계산된 디렉토리 크기 반영 (현재 디렉토리의 직계 자식만)
    pub fn apply_dir_size(&mut self, path: PathBuf, size: u64) {
        if path.parent() != Some(self.current_path.as_path()) {
            debug!("Ignoring size for {} outside current directory", path.display());
            return;
        }
        self.dir_sizes.insert(path, size);
    }

    // === 내부 ===

    fn load_entries(&self, path: &Path, filesystem: &FileSystem) -> Result<Vec<FileEntry>> {
        let listed = filesystem.list_directory(path, self.show_hidden)?;
        let mut entries = Vec::with_capacity(listed.len() + 1);
        entries.extend(FileEntry::parent_of(path));
        entries.extend(listed);
        Ok(entries)
    }

    fn apply_navigation(&mut self, path: PathBuf, entries: Vec<FileEntry>) {
        self.current_path = path;
        self.entries = entries;
        self.cursor_index = 0;
        self.scroll_offset = 0;
        self.selection = Selection::cleared();
        self.dir_sizes.clear();
    }

    fn clamp_cursor(&mut self) {
        self.cursor_index = self.cursor_index.min(self.entries.len().saturating_sub(1));
        self.adjust_scroll_offset();
    }

    /// 커서가 보이는 영역 안에 있도록 스크롤 조정
    fn adjust_scroll_offset(&mut self) {
        let visible_rows = self.visible_rows();
        if self.cursor_index < self.scroll_offset {
            self.scroll_offset = self.cursor_index;
        } else if self.cursor_index >= self.scroll_offset + visible_rows {
            self.scroll_offset = (self.cursor_index + 1).saturating_sub(visible_rows);
        }
    }
}
