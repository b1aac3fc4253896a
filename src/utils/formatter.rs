// Formatters - 파일 크기, 날짜, 권한, 진행률 포맷팅

use chrono::{DateTime, Local};
use std::time::SystemTime;

/// 파일 크기를 읽기 쉬운 형식으로 포맷팅
///
/// 정수로 떨어지면 소수점 없이, 아니면 소수 첫째 자리까지 표시합니다.
///
/// # Examples
/// ```
/// use cfm::utils::formatter::format_file_size;
///
/// assert_eq!(format_file_size(0), "0 B");
/// assert_eq!(format_file_size(512), "512 B");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// assert_eq!(format_file_size(2048), "2 KB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut size = bytes as f64;
    for unit in UNITS {
        if size < 1024.0 {
            return if size.fract() == 0.0 {
                format!("{} {}", size as u64, unit)
            } else {
                format!("{:.1} {}", size, unit)
            };
        }
        size /= 1024.0;
    }
    format!("{:.1} PB", size)
}

/// 시스템 시간을 "YYYY-MM-DD HH:MM" 형식으로 포맷팅 (16자 고정)
pub fn format_date(time: SystemTime) -> String {
    let datetime: DateTime<Local> = time.into();
    datetime.format("%Y-%m-%d %H:%M").to_string()
}

/// 개수에 따라 단수/복수형 반환
///
/// # Examples
/// ```
/// use cfm::utils::formatter::pluralize;
///
/// assert_eq!(pluralize(1, "file", "files"), "1 file");
/// assert_eq!(pluralize(3, "file", "files"), "3 files");
/// ```
pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// 권한 비트(하위 9비트)를 rwxr-xr-x 형식으로 변환
pub fn format_permissions(mode: u32) -> String {
    let triplet = |read: u32, write: u32, exec: u32| {
        let r = if mode & read != 0 { 'r' } else { '-' };
        let w = if mode & write != 0 { 'w' } else { '-' };
        let x = if mode & exec != 0 { 'x' } else { '-' };
        format!("{}{}{}", r, w, x)
    };
    format!(
        "{}{}{}",
        triplet(0o400, 0o200, 0o100),
        triplet(0o040, 0o020, 0o010),
        triplet(0o004, 0o002, 0o001)
    )
}

/// 진행률 계산 (분모가 0이면 100%)
pub fn percent(current: u64, total: u64) -> f64 {
    if total == 0 {
        100.0
    } else {
        (current as f64 / total as f64) * 100.0
    }
}
