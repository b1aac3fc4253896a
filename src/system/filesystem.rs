use crate::models::file_entry::{is_hidden_name, FileEntry};
use crate::utils::error::{CfmError, Result};
use log::{debug, warn};
use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// 파일 시스템 모듈
///
/// 디렉토리 목록과 복사/이동/삭제/생성 기본 연산을 제공합니다.
/// 모든 연산은 실패할 수 있으며, 호출자가 결과를 항목 단위로 기록합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystem;

impl FileSystem {
    /// 새 파일 시스템 인스턴스 생성
    pub fn new() -> Self {
        Self
    }

    /// 디렉토리 읽기
    ///
    /// 직계 자식들을 디렉토리 우선, 이름(대소문자 무시) 오름차순으로 반환합니다.
    /// 읽을 수 없는 개별 엔트리와 순환 심볼릭 링크는 경고 로그 후 건너뜁니다.
    pub fn list_directory(&self, path: &Path, show_hidden: bool) -> Result<Vec<FileEntry>> {
        let metadata = fs::metadata(path).map_err(|e| CfmError::access(path, &e))?;
        if !metadata.is_dir() {
            return Err(CfmError::Access {
                path: path.to_path_buf(),
                reason: "Not a directory".to_string(),
            });
        }

        let read_dir = fs::read_dir(path).map_err(|e| CfmError::access(path, &e))?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", path.display(), e);
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().to_string();
            if !show_hidden && is_hidden_name(&name) {
                continue;
            }

            // 링크를 따라간 메타데이터 (순환/깨진 링크는 여기서 실패)
            let entry_path = entry.path();
            match FileEntry::from_path(&entry_path) {
                Ok(file_entry) => entries.push(file_entry),
                Err(e) => warn!("Skipping {}: {}", entry_path.display(), e),
            }
        }

        sort_entries(&mut entries);
        Ok(entries)
    }

    /// 경로 존재 확인 (깨진 링크도 존재로 간주)
    #[allow(clippy::unused_self)]
    pub fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    /// 디렉토리 여부 확인
    #[allow(clippy::unused_self)]
    pub fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    /// 파일 복사 (수정 시간 보존)
    ///
    /// 반환값: 복사된 바이트 수
    #[allow(clippy::unused_self)]
    pub fn copy_file(&self, src: &Path, dest: &Path) -> Result<u64> {
        let bytes = fs::copy(src, dest).map_err(|e| copy_error(src, dest, &e))?;
        preserve_modified_time(src, dest);
        Ok(bytes)
    }

    /// 디렉토리 재귀 복사
    ///
    /// 대상이 이미 있으면 병합합니다. 원본에 없는 기존 자식은 그대로 남습니다.
    /// 반환값: 복사된 총 바이트 수
    pub fn copy_directory(&self, src: &Path, dest: &Path) -> Result<u64> {
        fs::create_dir_all(dest).map_err(|e| copy_error(src, dest, &e))?;

        let mut total_bytes = 0u64;
        for entry in fs::read_dir(src).map_err(|e| copy_error(src, dest, &e))? {
            let entry = entry.map_err(|e| copy_error(src, dest, &e))?;
            let entry_path = entry.path();
            let dest_path = dest.join(entry.file_name());
            total_bytes += self.copy_entry(&entry_path, &dest_path)?;
        }

        preserve_modified_time(src, dest);
        Ok(total_bytes)
    }

    /// 파일/디렉토리/링크 구분하여 복사
    ///
    /// 심볼릭 링크는 따라가지 않고 링크 자체를 복제하므로 순환 링크에 안전합니다.
    pub fn copy_entry(&self, src: &Path, dest: &Path) -> Result<u64> {
        let metadata = fs::symlink_metadata(src).map_err(|e| copy_error(src, dest, &e))?;

        if metadata.file_type().is_symlink() {
            self.copy_symlink(src, dest)
        } else if metadata.is_dir() {
            self.copy_directory(src, dest)
        } else {
            // 기존 대상이 디렉토리면 fs::copy가 실패하므로 호출 전에 정리되어 있어야 함
            self.copy_file(src, dest)
        }
    }

    #[cfg(unix)]
    #[allow(clippy::unused_self)]
    fn copy_symlink(&self, src: &Path, dest: &Path) -> Result<u64> {
        let target = fs::read_link(src).map_err(|e| copy_error(src, dest, &e))?;
        if fs::symlink_metadata(dest).is_ok() {
            fs::remove_file(dest).map_err(|e| copy_error(src, dest, &e))?;
        }
        std::os::unix::fs::symlink(&target, dest).map_err(|e| copy_error(src, dest, &e))?;
        Ok(0)
    }

    #[cfg(not(unix))]
    fn copy_symlink(&self, src: &Path, dest: &Path) -> Result<u64> {
        if src.is_dir() {
            self.copy_directory(src, dest)
        } else {
            self.copy_file(src, dest)
        }
    }

    /// 파일/디렉토리 이동
    ///
    /// 먼저 rename을 시도하고 (같은 파일시스템), 실패하면 복사 후 원본을 삭제합니다.
    /// rename이 권한 문제로 실패하면 복사하지 않고 바로 에러를 반환합니다.
    /// 반환값: 이동된 바이트 수
    pub fn move_entry(&self, src: &Path, dest: &Path) -> Result<u64> {
        match fs::rename(src, dest) {
            Ok(()) => return Ok(self.total_size(dest)),
            // 원본 상위 디렉토리에 쓸 수 없으면 복사 후 원본도 지울 수 없음
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                return Err(move_error(src, dest, &e));
            }
            Err(e) => debug!(
                "rename {} -> {} failed ({}), falling back to copy",
                src.display(),
                dest.display(),
                e
            ),
        }
        self.move_by_copy(src, dest)
    }

    /// 복사 후 원본 삭제로 이동
    ///
    /// 원본을 지울 수 있는지 먼저 확인합니다. 대상이 없을 때는 임시 이름으로
    /// 복사한 뒤 rename 하여 일부만 복사된 상태가 대상 경로에 보이지 않게 합니다.
    /// 원본 삭제를 시작한 뒤에는 대상 복사본을 절대 지우지 않습니다.
    fn move_by_copy(&self, src: &Path, dest: &Path) -> Result<u64> {
        ensure_removable(src)?;
        let bytes = self.total_size(src);

        if self.exists(dest) {
            // 병합 이동: 기존 대상에 복사 후 원본 삭제
            self.copy_entry(src, dest)?;
            self.remove_moved_source(src, dest)?;
            return Ok(bytes);
        }

        let staging = staging_path(dest);
        if self.exists(&staging) {
            debug!("Removing stale staging copy {}", staging.display());
            self.remove_entry(&staging)?;
        }
        if let Err(e) = self.copy_entry(src, &staging) {
            let _ = self.remove_entry(&staging);
            return Err(e);
        }
        if let Err(e) = fs::rename(&staging, dest) {
            let _ = self.remove_entry(&staging);
            return Err(move_error(src, dest, &e));
        }
        self.remove_moved_source(src, dest)?;
        Ok(bytes)
    }

    /// 복사가 끝난 원본 삭제 (실패해도 대상 복사본은 유지)
    fn remove_moved_source(&self, src: &Path, dest: &Path) -> Result<()> {
        self.remove_entry(src).map(|_| ()).map_err(|e| {
            warn!(
                "Moved {} to {} but source removal failed: {}",
                src.display(),
                dest.display(),
                e
            );
            CfmError::operation(
                src,
                format!(
                    "Copied to {}, but the source could only be partly removed: {}",
                    dest.display(),
                    e
                ),
            )
        })
    }

    /// 파일 삭제 또는 디렉토리 재귀 삭제 (링크는 링크 자체만 삭제)
    ///
    /// 반환값: 삭제된 파일 바이트 수
    pub fn remove_entry(&self, path: &Path) -> Result<u64> {
        let metadata = fs::symlink_metadata(path).map_err(|e| delete_error(path, &e))?;

        if metadata.is_dir() {
            let bytes = self.directory_size(path);
            fs::remove_dir_all(path).map_err(|e| delete_error(path, &e))?;
            Ok(bytes)
        } else {
            fs::remove_file(path).map_err(|e| delete_error(path, &e))?;
            Ok(if metadata.is_file() { metadata.len() } else { 0 })
        }
    }

    /// 디렉토리 생성 (없는 상위 디렉토리 포함)
    #[allow(clippy::unused_self)]
    pub fn create_directory_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| {
            CfmError::operation(path, format!("Cannot create {}: {}", path.display(), e))
        })
    }

    /// 경로의 총 파일 크기 (파일은 자기 크기, 디렉토리는 재귀 합)
    pub fn total_size(&self, path: &Path) -> u64 {
        match fs::symlink_metadata(path) {
            Ok(metadata) if metadata.is_dir() => self.directory_size(path),
            Ok(metadata) if metadata.is_file() => metadata.len(),
            _ => 0,
        }
    }

    /// 디렉토리 하위 모든 파일 크기 합 (재귀)
    ///
    /// 접근 오류가 나는 엔트리는 조용히 건너뛰며, 부분 합도 허용됩니다.
    /// 심볼릭 링크는 따라가지 않습니다.
    pub fn directory_size(&self, path: &Path) -> u64 {
        let Ok(read_dir) = fs::read_dir(path) else {
            return 0;
        };

        let mut total = 0u64;
        for entry in read_dir.flatten() {
            let Ok(metadata) = fs::symlink_metadata(entry.path()) else {
                continue;
            };
            if metadata.is_dir() {
                total += self.directory_size(&entry.path());
            } else if metadata.is_file() {
                total += metadata.len();
            }
        }
        total
    }

    /// dest가 source 디렉토리 자신이거나 그 하위 경로인지 검사
    #[allow(clippy::unused_self)]
    pub fn is_within(&self, source: &Path, dest: &Path) -> bool {
        if !source.is_dir() {
            return false;
        }
        let Ok(canonical_source) = source.canonicalize() else {
            return false;
        };
        // 대상이 아직 없을 수 있으므로 상위 디렉토리 기준으로 비교
        let (existing, rest) = match dest.canonicalize() {
            Ok(path) => (path, None),
            Err(_) => match (dest.parent(), dest.file_name()) {
                (Some(parent), Some(name)) => match parent.canonicalize() {
                    Ok(path) => (path, Some(name.to_os_string())),
                    Err(_) => return false,
                },
                _ => return false,
            },
        };
        let canonical_dest = match rest {
            Some(name) => existing.join(name),
            None => existing,
        };
        canonical_dest.starts_with(&canonical_source)
    }

    /// 홈 디렉토리 (알 수 없으면 루트)
    #[allow(clippy::unused_self)]
    pub fn home_directory(&self) -> PathBuf {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"))
    }
}

/// 디렉토리 우선, 이름(대소문자 무시) 오름차순 정렬
pub fn sort_entries(entries: &mut [FileEntry]) {
    entries.sort_by(|a, b| match (a.is_directory, b.is_directory) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
    });
}

fn staging_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    dest.with_file_name(format!(".{}.cfm-partial", name))
}

/// 원본 상위 디렉토리에 쓸 수 있는지 확인 (삭제 가능 여부)
fn ensure_removable(src: &Path) -> Result<()> {
    let parent = match src.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let name = src
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let check = parent.join(format!(".{}.cfm-check", name));

    let writable = match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&check)
    {
        Ok(_) => fs::remove_file(&check).is_ok(),
        // 이전 실행의 잔여 파일: 지울 수 있으면 쓰기 가능
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => fs::remove_file(&check).is_ok(),
        Err(_) => false,
    };

    if writable {
        Ok(())
    } else {
        Err(CfmError::operation(
            src,
            format!(
                "Cannot move {}: source directory {} is not writable",
                src.display(),
                parent.display()
            ),
        ))
    }
}

fn preserve_modified_time(src: &Path, dest: &Path) {
    let Ok(modified) = fs::metadata(src).and_then(|m| m.modified()) else {
        return;
    };
    let result = fs::File::options()
        .write(true)
        .open(dest)
        .or_else(|_| fs::File::open(dest))
        .and_then(|file| file.set_modified(modified));
    if let Err(e) = result {
        debug!("Cannot preserve mtime on {}: {}", dest.display(), e);
    }
}

fn copy_error(src: &Path, dest: &Path, err: &io::Error) -> CfmError {
    CfmError::operation(
        src,
        format!(
            "Cannot copy {} to {}: {}",
            src.display(),
            dest.display(),
            err
        ),
    )
}

fn move_error(src: &Path, dest: &Path, err: &io::Error) -> CfmError {
    CfmError::operation(
        src,
        format!(
            "Cannot move {} to {}: {}",
            src.display(),
            dest.display(),
            err
        ),
    )
}

fn delete_error(path: &Path, err: &io::Error) -> CfmError {
    CfmError::operation(path, format!("Cannot delete {}: {}", path.display(), err))
}
