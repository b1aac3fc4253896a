//! 충돌 해결 인터페이스
//!
//! 복사/이동 대상이 이미 있을 때 엔진이 호출합니다.
//! UI 구현은 사용자 응답까지 대기하고, 테스트 구현은 정해진 응답을 돌려줍니다.

use crate::models::operation::{ConflictDecision, OperationKind};
use async_trait::async_trait;
use log::warn;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::sync::{mpsc, oneshot};

#[async_trait]
pub trait ConflictResolver: Send + Sync {
    /// 충돌 항목 하나에 대한 결정 (배치 실행마다 항목당 최대 1회 호출)
    async fn resolve(
        &self,
        source: &Path,
        destination: &Path,
        kind: OperationKind,
    ) -> ConflictDecision;
}

/// 항상 같은 결정을 내리는 비대화형 구현
#[derive(Debug, Clone, Copy)]
pub struct FixedResolver(pub ConflictDecision);

#[async_trait]
impl ConflictResolver for FixedResolver {
    async fn resolve(
        &self,
        _source: &Path,
        _destination: &Path,
        _kind: OperationKind,
    ) -> ConflictDecision {
        self.0
    }
}

/// 충돌 정보 (호출 기록용)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictCall {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub kind: OperationKind,
}

/// 미리 정한 결정을 순서대로 돌려주는 구현
///
/// 준비된 결정이 떨어지면 `fallback`을 사용합니다.
#[derive(Debug)]
pub struct ScriptedResolver {
    decisions: Mutex<VecDeque<ConflictDecision>>,
    fallback: ConflictDecision,
    calls: Mutex<Vec<ConflictCall>>,
}

impl ScriptedResolver {
    pub fn new(decisions: impl IntoIterator<Item = ConflictDecision>) -> Self {
        Self {
            decisions: Mutex::new(decisions.into_iter().collect()),
            fallback: ConflictDecision::Skip,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_fallback(mut self, fallback: ConflictDecision) -> Self {
        self.fallback = fallback;
        self
    }

    /// 지금까지 받은 충돌 목록
    pub fn calls(&self) -> Vec<ConflictCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ConflictResolver for ScriptedResolver {
    async fn resolve(
        &self,
        source: &Path,
        destination: &Path,
        kind: OperationKind,
    ) -> ConflictDecision {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(ConflictCall {
                source: source.to_path_buf(),
                destination: destination.to_path_buf(),
                kind,
            });
        }
        self.decisions
            .lock()
            .ok()
            .and_then(|mut decisions| decisions.pop_front())
            .unwrap_or(self.fallback)
    }
}

/// UI로 전달되는 충돌 질의
#[derive(Debug)]
pub struct ConflictRequest {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub kind: OperationKind,
    pub reply: oneshot::Sender<ConflictDecision>,
}

impl ConflictRequest {
    /// 결정 응답 (엔진이 이미 포기했으면 무시됨)
    pub fn respond(self, decision: ConflictDecision) {
        let _ = self.reply.send(decision);
    }
}

/// 채널을 통해 UI에 질의하고 응답을 기다리는 구현
///
/// UI가 질의를 받지 못하거나 응답 없이 버리면 `Cancel`로 처리합니다.
#[derive(Debug, Clone)]
pub struct ChannelResolver {
    request_tx: mpsc::Sender<ConflictRequest>,
}

impl ChannelResolver {
    /// 해결기와 UI 측 수신기를 함께 생성
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<ConflictRequest>) {
        let (request_tx, request_rx) = mpsc::channel(buffer.max(1));
        (Self { request_tx }, request_rx)
    }
}

#[async_trait]
impl ConflictResolver for ChannelResolver {
    async fn resolve(
        &self,
        source: &Path,
        destination: &Path,
        kind: OperationKind,
    ) -> ConflictDecision {
        let (reply, reply_rx) = oneshot::channel();
        let request = ConflictRequest {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            kind,
            reply,
        };
        if self.request_tx.send(request).await.is_err() {
            warn!("Conflict prompt unavailable, cancelling batch");
            return ConflictDecision::Cancel;
        }
        reply_rx.await.unwrap_or(ConflictDecision::Cancel)
    }
}
