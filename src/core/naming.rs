//! 이름 규칙
//!
//! 새 디렉토리 이름 검증과 충돌 시 " (N)" 이름 생성

use crate::utils::error::{CfmError, Result};
use std::path::{Path, PathBuf};

/// 이름에 쓸 수 없는 문자
const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// 플랫폼 예약 장치 이름 (대소문자 무시)
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// 디렉토리 이름 검증
///
/// # Examples
/// ```
/// use cfm::core::naming::validate_directory_name;
///
/// assert!(validate_directory_name("photos").is_ok());
/// assert!(validate_directory_name("..").is_err());
/// assert!(validate_directory_name("con").is_err());
/// ```
pub fn validate_directory_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Err(CfmError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.trim().is_empty() {
        return invalid("name is empty");
    }
    if name == "." || name == ".." {
        return invalid("name is reserved for directory navigation");
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return invalid(&format!("character '{}' is not allowed", c));
    }
    if name.chars().any(char::is_control) {
        return invalid("control characters are not allowed");
    }
    if RESERVED_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
    {
        return invalid("reserved device name");
    }
    Ok(())
}

/// 충돌하지 않는 대상 경로 생성
///
/// 확장자 앞에 " (N)"을 붙이며 N은 1부터 증가합니다.
/// 후보마다 실제 파일 시스템에서 존재 여부를 다시 확인합니다.
pub fn unique_destination(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let extension = path.extension().map(|s| s.to_string_lossy().to_string());

    let mut counter = 1u32;
    loop {
        let name = match &extension {
            Some(ext) => format!("{} ({}).{}", stem, counter, ext),
            None => format!("{} ({})", stem, counter),
        };
        let candidate = parent.join(name);
        if std::fs::symlink_metadata(&candidate).is_err() {
            return candidate;
        }
        counter += 1;
    }
}
