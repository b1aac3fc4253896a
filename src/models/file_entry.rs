use crate::utils::formatter::{format_date, format_file_size};
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// 상위 디렉토리 항목 이름
pub const PARENT_ENTRY_NAME: &str = "..";

/// 파일 엔트리
///
/// 디렉토리를 읽을 때마다 새로 만들어지는 불변 스냅샷입니다.
/// 필드를 직접 수정하지 않고, 변경이 필요하면 디렉토리를 다시 읽습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// 파일/디렉토리 이름
    pub name: String,
    /// 전체 경로
    pub path: PathBuf,
    /// 디렉토리 여부 (디렉토리를 가리키는 심볼릭 링크 포함)
    pub is_directory: bool,
    /// 심볼릭 링크 여부
    pub is_symlink: bool,
    /// 바이트 단위 크기 (디렉토리는 None)
    pub size: Option<u64>,
    /// 수정 시간
    pub modified: SystemTime,
    /// 숨김 파일 여부
    pub is_hidden: bool,
    /// 확장자 (점 제외, 디렉토리는 빈 문자열)
    pub extension: String,
    /// 권한 비트 (mode & 0o777)
    pub permissions: u32,
}

impl FileEntry {
    /// 메타데이터로부터 엔트리 생성
    ///
    /// `metadata`는 링크를 따라간 메타데이터, `is_symlink`는 링크 자체 여부입니다.
    pub fn from_metadata(path: PathBuf, metadata: &Metadata, is_symlink: bool) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        let is_directory = metadata.is_dir();
        let extension = if is_directory {
            String::new()
        } else {
            extension_of(&name)
        };

        Self {
            is_hidden: is_hidden_name(&name),
            size: if is_directory {
                None
            } else {
                Some(metadata.len())
            },
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            permissions: permission_bits(metadata),
            name,
            path,
            is_directory,
            is_symlink,
            extension,
        }
    }

    /// 경로를 stat 하여 엔트리 생성 (링크는 대상 기준)
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let link_metadata = std::fs::symlink_metadata(path)?;
        let is_symlink = link_metadata.file_type().is_symlink();
        let metadata = if is_symlink {
            std::fs::metadata(path)?
        } else {
            link_metadata
        };
        Ok(Self::from_metadata(path.to_path_buf(), &metadata, is_symlink))
    }

    /// 현재 디렉토리의 ".." 항목 생성 (루트면 None)
    pub fn parent_of(current: &Path) -> Option<Self> {
        let parent = current.parent()?;
        Some(Self {
            name: PARENT_ENTRY_NAME.to_string(),
            path: parent.to_path_buf(),
            is_directory: true,
            is_symlink: false,
            size: None,
            modified: SystemTime::UNIX_EPOCH,
            is_hidden: false,
            extension: String::new(),
            permissions: 0,
        })
    }

    /// ".." 항목 여부
    pub fn is_parent(&self) -> bool {
        self.name == PARENT_ENTRY_NAME
    }

    /// 일반 파일 크기 (디렉토리는 0)
    pub fn file_size(&self) -> u64 {
        if self.is_directory {
            0
        } else {
            self.size.unwrap_or(0)
        }
    }

    /// 표시용 크기 (디렉토리는 빈 문자열)
    pub fn format_size(&self) -> String {
        match self.size {
            Some(size) if !self.is_directory => format_file_size(size),
            _ => String::new(),
        }
    }

    /// 표시용 수정 시간
    pub fn format_date(&self) -> String {
        format_date(self.modified)
    }

    pub fn can_read(&self) -> bool {
        self.permissions & 0o400 != 0
    }

    pub fn can_write(&self) -> bool {
        self.permissions & 0o200 != 0
    }

    pub fn can_execute(&self) -> bool {
        self.permissions & 0o100 != 0
    }
}

/// 숨김 이름 규칙: '.'으로 시작 ("..", "." 제외)
pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.') && name != "." && name != PARENT_ENTRY_NAME
}

fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn permission_bits(metadata: &Metadata) -> u32 {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o777
    }
    #[cfg(not(unix))]
    {
        if metadata.permissions().readonly() {
            0o444
        } else {
            0o666
        }
    }
}
