//! 배치 파일 작업 엔진
//!
//! 복사/이동/삭제를 입력 순서대로 한 항목씩 처리합니다.
//! 각 항목의 파일 시스템 작업은 blocking 스레드에서 실행되므로
//! 항목 경계마다 호출자에게 제어가 돌아가고 취소 플래그를 확인할 수 있습니다.
//! 한 항목의 실패는 해당 항목에만 기록되고 배치는 계속 진행됩니다.

use crate::core::conflict::ConflictResolver;
use crate::core::naming::{unique_destination, validate_directory_name};
use crate::models::file_entry::FileEntry;
use crate::models::operation::{
    BatchReport, ConflictDecision, OperationItem, OperationKind, OperationProgress,
    OperationResult,
};
use crate::system::filesystem::FileSystem;
use crate::utils::error::{CfmError, Result};
use log::{error, info};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 진행 상태 관찰자 (항목 시작마다 호출)
pub type ProgressObserver = Arc<dyn Fn(&OperationProgress) + Send + Sync>;

/// 협조적 취소 플래그
///
/// 엔진마다 하나씩 가지며, 배치 호출 시작 시 초기화됩니다.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// 복사/이동 구분
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transfer {
    Copy,
    Move,
}

impl Transfer {
    fn kind(self) -> OperationKind {
        match self {
            Transfer::Copy => OperationKind::Copy,
            Transfer::Move => OperationKind::Move,
        }
    }
}

/// 배치 작업 엔진
pub struct BatchEngine {
    filesystem: FileSystem,
    resolver: Arc<dyn ConflictResolver>,
    observer: Option<ProgressObserver>,
    cancel: CancelToken,
}

impl fmt::Debug for BatchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchEngine")
            .field("observer", &self.observer.is_some())
            .field("cancel", &self.cancel)
            .finish()
    }
}

impl BatchEngine {
    pub fn new(resolver: Arc<dyn ConflictResolver>) -> Self {
        Self {
            filesystem: FileSystem::new(),
            resolver,
            observer: None,
            cancel: CancelToken::new(),
        }
    }

    /// 진행 상태 관찰자 등록
    pub fn with_observer(mut self, observer: ProgressObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn set_observer(&mut self, observer: Option<ProgressObserver>) {
        self.observer = observer;
    }

    /// 다른 태스크/스레드에서 취소할 때 사용할 토큰
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// 진행 중인 배치 취소 (현재 항목은 끝까지 실행됨)
    pub fn cancel(&self) {
        info!("Batch operation cancellation requested");
        self.cancel.cancel();
    }

    /// 항목들을 대상 디렉토리로 복사
    pub async fn copy_entries(
        &self,
        items: &[FileEntry],
        destination_dir: &Path,
    ) -> Result<BatchReport> {
        self.run_transfer(items, destination_dir, Transfer::Copy)
            .await
    }

    /// 항목들을 대상 디렉토리로 이동
    pub async fn move_entries(
        &self,
        items: &[FileEntry],
        destination_dir: &Path,
    ) -> Result<BatchReport> {
        self.run_transfer(items, destination_dir, Transfer::Move)
            .await
    }

    /// 항목들 삭제 (디렉토리는 재귀 삭제)
    pub async fn delete_entries(&self, items: &[FileEntry]) -> BatchReport {
        self.cancel.reset();
        let items = operable(items);
        let kind = OperationKind::Delete;
        let mut report = BatchReport::new(kind, items.len());
        let mut progress = OperationProgress::new(kind, items.len(), total_file_bytes(&items));

        for (index, item) in items.iter().enumerate() {
            if self.cancel.is_cancelled() {
                info!("Delete cancelled after {} of {} items", index, items.len());
                break;
            }
            self.emit_progress(&mut progress, index, item);

            let mut op = OperationItem::new(item.path.clone(), item.path.clone(), kind);
            let filesystem = self.filesystem;
            let path = item.path.clone();
            let outcome = run_blocking(move || filesystem.remove_entry(&path)).await;
            self.record(&mut op, outcome, item, &mut progress);
            report.items.push(op);
        }

        report
    }

    /// 새 디렉토리 생성 (없는 상위 디렉토리 포함)
    ///
    /// 이름이 유효하지 않으면 파일 시스템에 접근하기 전에 `InvalidName` 에러를 반환합니다.
    pub async fn create_directory(&self, parent: &Path, name: &str) -> Result<OperationItem> {
        validate_directory_name(name)?;

        let target = parent.join(name);
        let mut op = OperationItem::new(target.clone(), target.clone(), OperationKind::CreateDir);

        if self.filesystem.exists(&target) {
            op.fail("already exists");
            error!("Create directory {}: already exists", target.display());
            return Ok(op);
        }

        let filesystem = self.filesystem;
        let path = target.clone();
        match run_blocking(move || filesystem.create_directory_all(&path)).await {
            Ok(()) => {
                info!("Create directory: {}", target.display());
                op.finish(OperationResult::Success);
            }
            Err(e) => {
                error!("Create directory {} failed: {}", target.display(), e);
                op.fail(e.to_string());
            }
        }
        Ok(op)
    }

    /// 작업 대상 총 크기
    ///
    /// 파일은 자기 크기, 디렉토리는 하위 파일 크기 합.
    /// 접근할 수 없는 하위 항목은 건너뜁니다.
    pub fn calculate_operation_size(&self, items: &[FileEntry]) -> u64 {
        items
            .iter()
            .filter(|item| !item.is_parent())
            .map(|item| {
                if item.is_directory {
                    self.filesystem.directory_size(&item.path)
                } else {
                    item.file_size()
                }
            })
            .sum()
    }

    async fn run_transfer(
        &self,
        items: &[FileEntry],
        destination_dir: &Path,
        transfer: Transfer,
    ) -> Result<BatchReport> {
        self.cancel.reset();
        ensure_directory(destination_dir)?;

        let items = operable(items);
        let kind = transfer.kind();
        let mut report = BatchReport::new(kind, items.len());
        let mut progress = OperationProgress::new(kind, items.len(), total_file_bytes(&items));

        for (index, item) in items.iter().enumerate() {
            if self.cancel.is_cancelled() {
                info!(
                    "{} cancelled after {} of {} items",
                    kind.name(),
                    index,
                    items.len()
                );
                break;
            }
            self.emit_progress(&mut progress, index, item);

            let mut destination = destination_dir.join(&item.name);
            let mut op = OperationItem::new(item.path.clone(), destination.clone(), kind);
            let mut overwrite = false;

            if self.filesystem.exists(&destination) {
                match self
                    .resolver
                    .resolve(&item.path, &destination, kind)
                    .await
                {
                    ConflictDecision::Overwrite => overwrite = true,
                    ConflictDecision::Skip => {
                        info!("{} skipped: {}", kind.name(), item.path.display());
                        op.finish(OperationResult::Skipped);
                        report.items.push(op);
                        continue;
                    }
                    ConflictDecision::Rename => {
                        destination = unique_destination(&destination);
                        op.destination = destination.clone();
                    }
                    ConflictDecision::Cancel => {
                        info!("{} cancelled at {}", kind.name(), item.path.display());
                        op.finish(OperationResult::Cancelled);
                        op.error_message = Some(CfmError::Cancelled.to_string());
                        report.items.push(op);
                        break;
                    }
                }
            }

            if item.is_directory
                && !item.is_symlink
                && self.filesystem.is_within(&item.path, &destination)
            {
                let message = format!(
                    "Cannot {} a directory into itself",
                    kind.name().to_lowercase()
                );
                error!("{}: {}", item.path.display(), message);
                op.fail(message);
                report.items.push(op);
                continue;
            }

            let filesystem = self.filesystem;
            let source = item.path.clone();
            let target = destination.clone();
            let outcome = run_blocking(move || {
                transfer_one(filesystem, transfer, &source, &target, overwrite)
            })
            .await;
            self.record(&mut op, outcome, item, &mut progress);
            report.items.push(op);
        }

        Ok(report)
    }

    fn emit_progress(&self, progress: &mut OperationProgress, index: usize, item: &FileEntry) {
        progress.current_item = index + 1;
        progress.current_file = item.name.clone();
        if let Some(observer) = &self.observer {
            observer(progress);
        }
    }

    /// 항목 결과 확정 및 로그
    fn record(
        &self,
        op: &mut OperationItem,
        outcome: Result<u64>,
        item: &FileEntry,
        progress: &mut OperationProgress,
    ) {
        match outcome {
            Ok(_) => {
                info!(
                    "{}: {} -> {}",
                    op.kind.name(),
                    op.source.display(),
                    op.destination.display()
                );
                op.finish(OperationResult::Success);
                if !item.is_directory {
                    progress.current_bytes += item.file_size();
                }
            }
            Err(e) => {
                error!("{} {} failed: {}", op.kind.name(), op.source.display(), e);
                op.fail(e.to_string());
            }
        }
    }
}

/// ".." 항목 제외
fn operable(items: &[FileEntry]) -> Vec<&FileEntry> {
    items.iter().filter(|item| !item.is_parent()).collect()
}

/// 바이트 진행률 기준 (디렉토리 제외)
fn total_file_bytes(items: &[&FileEntry]) -> u64 {
    items
        .iter()
        .filter(|item| !item.is_directory)
        .map(|item| item.file_size())
        .sum()
}

/// 배치 시작 전 대상 디렉토리 확인
fn ensure_directory(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path).map_err(|e| CfmError::access(path, &e))?;
    if metadata.is_dir() {
        Ok(())
    } else {
        Err(CfmError::Access {
            path: path.to_path_buf(),
            reason: "Not a directory".to_string(),
        })
    }
}

/// blocking 작업을 별도 스레드에서 실행
async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| CfmError::Operation {
            path: PathBuf::new(),
            reason: format!("Worker task failed: {}", e),
        })?
}

/// 한 항목 복사/이동 (blocking)
fn transfer_one(
    filesystem: FileSystem,
    transfer: Transfer,
    source: &Path,
    destination: &Path,
    overwrite: bool,
) -> Result<u64> {
    if overwrite {
        prepare_overwrite(filesystem, source, destination)?;
    }
    match transfer {
        Transfer::Copy => filesystem.copy_entry(source, destination),
        Transfer::Move => filesystem.move_entry(source, destination),
    }
}

/// 덮어쓰기 전 대상 정리
///
/// 디렉토리끼리는 병합, 일반 파일끼리는 내용 교체.
/// 종류가 다르거나 대상이 링크면 대상을 먼저 삭제합니다.
fn prepare_overwrite(filesystem: FileSystem, source: &Path, destination: &Path) -> Result<()> {
    if same_file(source, destination) {
        return Err(CfmError::operation(
            source,
            "Source and destination are the same",
        ));
    }

    let (Ok(source_meta), Ok(dest_meta)) =
        (fs::symlink_metadata(source), fs::symlink_metadata(destination))
    else {
        return Ok(());
    };

    let both_dirs = source_meta.is_dir() && dest_meta.is_dir();
    let both_files = source_meta.is_file() && dest_meta.is_file();
    if !both_dirs && !both_files {
        filesystem.remove_entry(destination)?;
    }
    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
