use super::App;
use crate::models::operation::{BatchReport, OperationKind, OperationResult};
use crate::utils::error::Result;
use log::{info, warn};

impl App {
    /// 활성 패널 선택 항목을 반대 패널 디렉토리로 복사
    pub async fn copy_selection(&mut self) {
        self.transfer_selection(OperationKind::Copy).await;
    }

    /// 활성 패널 선택 항목을 반대 패널 디렉토리로 이동
    pub async fn move_selection(&mut self) {
        self.transfer_selection(OperationKind::Move).await;
    }

    async fn transfer_selection(&mut self, kind: OperationKind) {
        let items = self.active_panel_state().effective_selection();
        if items.is_empty() {
            self.last_error = Some("No files selected".to_string());
            return;
        }
        let destination = self.inactive_panel_state().current_path().to_path_buf();

        let engine = &self.slot(self.active).engine;
        let result: Result<BatchReport> = match kind {
            OperationKind::Move => engine.move_entries(&items, &destination).await,
            _ => engine.copy_entries(&items, &destination).await,
        };

        match result {
            Ok(report) => self.finish_batch(report),
            Err(e) => {
                warn!("{} could not start: {}", kind.name(), e);
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// 활성 패널 선택 항목 삭제
    pub async fn delete_selection(&mut self) {
        let items = self.active_panel_state().effective_selection();
        if items.is_empty() {
            self.last_error = Some("No files selected".to_string());
            return;
        }
        let report = self.slot(self.active).engine.delete_entries(&items).await;
        self.finish_batch(report);
    }

    /// 활성 패널 디렉토리에 새 디렉토리 생성
    ///
    /// 성공하면 새 디렉토리에 커서를 둡니다.
    pub async fn create_directory(&mut self, name: &str) {
        self.prompt = None;
        let parent = self.active_panel_state().current_path().to_path_buf();
        let result = self
            .slot(self.active)
            .engine
            .create_directory(&parent, name)
            .await;

        match result {
            Ok(item) => {
                if item.result == Some(OperationResult::Success) {
                    self.refresh_panels();
                    self.active_panel_state_mut().focus_entry_by_name(name);
                } else {
                    self.last_error = Some(format!(
                        "{}: {}",
                        item.display_name(),
                        item.error_message.as_deref().unwrap_or("failed")
                    ));
                }
            }
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }

    /// 활성 패널 디렉토리 크기 계산 시작 (이미 실행 중이면 무시)
    pub fn calculate_sizes(&mut self) -> bool {
        let side = self.active;
        let directories = self
            .panel(side)
            .directory_entries()
            .into_iter()
            .map(|entry| entry.path)
            .collect();
        self.slot_mut(side).sizes.start(directories)
    }

    /// 배치 종료 처리
    ///
    /// 두 패널을 한 번씩 다시 읽고, 모두 성공했으면 원본 패널 선택을 해제합니다.
    fn finish_batch(&mut self, report: BatchReport) {
        let summary = report.summary();
        info!("{}", report.message());

        if summary.failed == 0 && !summary.was_cancelled() {
            self.active_panel_state_mut().clear_selection();
        }
        if let Some(first_error) = report.errors().into_iter().next() {
            self.last_error = Some(first_error);
        }

        self.refresh_panels();
        self.last_report = Some(report);
    }
}
