//! 디렉토리 크기 백그라운드 계산
//!
//! 패널의 디렉토리 항목마다 하위 파일 크기 합을 구해 하나씩 전달합니다.
//! 작업 스레드는 채널로 결과를 보내고, 소유자가 메인 루프에서 `poll`로 수거합니다.

use crate::system::filesystem::FileSystem;
use log::{debug, warn};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::JoinHandle;

/// 계산 진행 이벤트
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirSizeEvent {
    /// 디렉토리 하나 계산 완료 (부분 결과)
    Computed { path: PathBuf, size: u64 },
    /// 작업 종료
    Finished { cancelled: bool },
}

#[derive(Debug)]
struct DirSizeWorker {
    event_rx: Receiver<DirSizeEvent>,
    join_handle: Option<JoinHandle<()>>,
    cancel_flag: Arc<AtomicBool>,
}

/// 디렉토리 크기 계산기 (패널당 하나)
#[derive(Debug, Default)]
pub struct DirSizeCalculator {
    worker: Option<DirSizeWorker>,
}

impl DirSizeCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 계산 시작
    ///
    /// 이미 실행 중이면 아무것도 하지 않고 false를 반환합니다.
    pub fn start(&mut self, directories: Vec<PathBuf>) -> bool {
        if self.worker.is_some() {
            debug!("Directory size calculation already running");
            return false;
        }

        let (event_tx, event_rx) = mpsc::channel::<DirSizeEvent>();
        let cancel_flag = Arc::new(AtomicBool::new(false));
        let cancel_for_worker = Arc::clone(&cancel_flag);
        let handle = std::thread::spawn(move || {
            calculate_sizes(&directories, &event_tx, &cancel_for_worker);
        });

        self.worker = Some(DirSizeWorker {
            event_rx,
            join_handle: Some(handle),
            cancel_flag,
        });
        true
    }

    /// 실행 중인 계산 취소 요청 (현재 디렉토리 계산이 끝나면 멈춤)
    pub fn cancel(&self) {
        if let Some(worker) = &self.worker {
            worker.cancel_flag.store(true, Ordering::Relaxed);
        }
    }

    /// 계산 중단 후 남은 결과 폐기 (디렉토리 이동 시)
    ///
    /// 아직 수거하지 않은 이벤트는 버려지고, 바로 다시 `start` 할 수 있습니다.
    /// 작업 스레드는 다음 디렉토리 경계나 송신 실패 시점에 스스로 끝납니다.
    pub fn abort(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.cancel_flag.store(true, Ordering::Relaxed);
            debug!("Directory size calculation aborted");
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// 도착한 이벤트 수거 (메인 루프에서 호출)
    ///
    /// 작업이 끝났으면 스레드를 정리하고 다시 시작할 수 있는 상태가 됩니다.
    pub fn poll(&mut self) -> Vec<DirSizeEvent> {
        let Some(worker) = &mut self.worker else {
            return Vec::new();
        };

        let mut events = Vec::new();
        let mut finished = false;
        loop {
            match worker.event_rx.try_recv() {
                Ok(event) => {
                    if matches!(event, DirSizeEvent::Finished { .. }) {
                        finished = true;
                    }
                    events.push(event);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    finished = true;
                    break;
                }
            }
        }

        if finished {
            if let Some(handle) = worker.join_handle.take() {
                if handle.join().is_err() {
                    warn!("Directory size worker panicked");
                }
            }
            self.worker = None;
        }
        events
    }
}

impl Drop for DirSizeCalculator {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// 작업 스레드 본체
///
/// 디렉토리 사이마다 취소 플래그를 확인합니다.
fn calculate_sizes(directories: &[PathBuf], event_tx: &Sender<DirSizeEvent>, cancel: &AtomicBool) {
    let filesystem = FileSystem::new();
    for directory in directories {
        if cancel.load(Ordering::Relaxed) {
            let _ = event_tx.send(DirSizeEvent::Finished { cancelled: true });
            return;
        }
        let size = filesystem.directory_size(directory);
        let event = DirSizeEvent::Computed {
            path: directory.clone(),
            size,
        };
        if event_tx.send(event).is_err() {
            // 수신 측이 사라짐
            return;
        }
    }
    let _ = event_tx.send(DirSizeEvent::Finished { cancelled: false });
}
