//! 파일 작업 모델
//!
//! 배치 복사/이동/삭제/디렉토리 생성에 필요한 데이터 구조 정의

use crate::utils::formatter::{percent, pluralize};
use std::path::PathBuf;

/// 작업 유형
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// 복사
    Copy,
    /// 이동
    Move,
    /// 삭제
    Delete,
    /// 디렉토리 생성
    CreateDir,
}

impl OperationKind {
    /// 작업 유형 이름 반환
    pub fn name(&self) -> &'static str {
        match self {
            OperationKind::Copy => "Copy",
            OperationKind::Move => "Move",
            OperationKind::Delete => "Delete",
            OperationKind::CreateDir => "Create directory",
        }
    }
}

/// 항목별 최종 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationResult {
    Success,
    Skipped,
    Error,
    /// 충돌 응답으로 취소된 항목
    Cancelled,
}

/// 충돌 해결 방법
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictDecision {
    /// 덮어쓰기 (디렉토리는 병합)
    Overwrite,
    /// 건너뛰기
    Skip,
    /// " (N)" 붙인 새 이름으로 진행
    Rename,
    /// 남은 항목 모두 중단
    Cancel,
}

/// 작업 항목 (입력 엔트리당 1개, 결과는 한 번만 확정)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationItem {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub kind: OperationKind,
    /// None = 아직 처리 전
    pub result: Option<OperationResult>,
    pub error_message: Option<String>,
}

impl OperationItem {
    pub fn new(source: PathBuf, destination: PathBuf, kind: OperationKind) -> Self {
        Self {
            source,
            destination,
            kind,
            result: None,
            error_message: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.result.is_none()
    }

    pub(crate) fn finish(&mut self, result: OperationResult) {
        debug_assert!(self.result.is_none(), "operation item finalized twice");
        self.result = Some(result);
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.finish(OperationResult::Error);
        self.error_message = Some(message.into());
    }

    pub fn display_name(&self) -> String {
        let path = if self.kind == OperationKind::CreateDir {
            &self.destination
        } else {
            &self.source
        };
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string())
    }
}

/// 작업 진행 상태 스냅샷 (항목 시작 시마다 발행)
#[derive(Debug, Clone, PartialEq)]
pub struct OperationProgress {
    /// 1부터 시작하는 현재 항목 번호
    pub current_item: usize,
    pub total_items: usize,
    /// 완료된 파일 항목의 누적 바이트
    pub current_bytes: u64,
    pub total_bytes: u64,
    pub current_file: String,
    pub kind: OperationKind,
}

impl OperationProgress {
    pub fn new(kind: OperationKind, total_items: usize, total_bytes: u64) -> Self {
        Self {
            current_item: 0,
            total_items,
            current_bytes: 0,
            total_bytes,
            current_file: String::new(),
            kind,
        }
    }

    /// 항목 수 기준 진행률 (0-100)
    pub fn progress_percent(&self) -> f64 {
        percent(self.current_item as u64, self.total_items as u64)
    }

    /// 바이트 기준 진행률 (0-100)
    pub fn bytes_percent(&self) -> f64 {
        percent(self.current_bytes, self.total_bytes)
    }
}

/// 배치 결과 요약
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub cancelled: usize,
}

impl BatchSummary {
    /// 처리되지 않은 입력 항목 수
    pub fn not_processed(&self) -> usize {
        self.total
            .saturating_sub(self.succeeded + self.skipped + self.failed + self.cancelled)
    }

    pub fn was_cancelled(&self) -> bool {
        self.cancelled > 0 || self.not_processed() > 0
    }
}

/// 배치 실행 결과 (입력 순서 유지)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub kind: OperationKind,
    /// 입력 항목 수
    pub total_items: usize,
    /// 처리된 항목 (취소 이후 항목은 포함되지 않음)
    pub items: Vec<OperationItem>,
}

impl BatchReport {
    pub fn new(kind: OperationKind, total_items: usize) -> Self {
        Self {
            kind,
            total_items,
            items: Vec::with_capacity(total_items),
        }
    }

    pub fn results(&self) -> Vec<Option<OperationResult>> {
        self.items.iter().map(|item| item.result).collect()
    }

    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            total: self.total_items,
            ..BatchSummary::default()
        };
        for item in &self.items {
            match item.result {
                Some(OperationResult::Success) => summary.succeeded += 1,
                Some(OperationResult::Skipped) => summary.skipped += 1,
                Some(OperationResult::Error) => summary.failed += 1,
                Some(OperationResult::Cancelled) => summary.cancelled += 1,
                None => {}
            }
        }
        summary
    }

    /// "이름: 메시지" 형식의 에러 목록
    pub fn errors(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|item| item.result == Some(OperationResult::Error))
            .map(|item| {
                format!(
                    "{}: {}",
                    item.display_name(),
                    item.error_message.as_deref().unwrap_or("unknown error")
                )
            })
            .collect()
    }

    /// 사용자 표시용 한 줄 요약
    pub fn message(&self) -> String {
        let summary = self.summary();
        let mut message = format!(
            "{}: {} of {} succeeded",
            self.kind.name(),
            summary.succeeded,
            pluralize(summary.total, "item", "items")
        );
        if summary.skipped > 0 {
            message.push_str(&format!(", {} skipped", summary.skipped));
        }
        if summary.failed > 0 {
            message.push_str(&format!(", {} failed", summary.failed));
        }
        if summary.was_cancelled() {
            message.push_str(" (cancelled)");
        }
        message
    }
}
