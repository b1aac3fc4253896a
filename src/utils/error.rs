use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CfmError {
    /// 경로를 읽거나 진입할 수 없음 (상위/홈 디렉토리로 대체 가능)
    #[error("Cannot access {path}: {reason}")]
    Access { path: PathBuf, reason: String },

    /// 디렉토리 이름 검증 실패 (파일 시스템 접근 전)
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// 개별 항목 작업 실패 (배치는 계속 진행)
    #[error("{reason}")]
    Operation { path: PathBuf, reason: String },

    /// 사용자 취소
    #[error("Operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CfmError {
    pub(crate) fn access(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        CfmError::Access {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn operation(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        CfmError::Operation {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CfmError>;
