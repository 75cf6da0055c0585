//! JSON Lines 관측 소스.
//!
//! 표준 입력 또는 파일에서 한 줄에 하나씩 `Observation` JSON을 읽어 수집기로 넘긴다.
//! 파싱할 수 없는 줄은 경고를 남기고 건너뛴다.

use std::path::PathBuf;
use std::sync::Arc;

use fieldpulse_core::error::CoreError;
use fieldpulse_core::models::observation::Observation;
use fieldpulse_core::ports::observer::{ObservationSink, ObservationSource};
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// 관측 입력 위치
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayInput {
    Stdin,
    File(PathBuf),
}

impl ReplayInput {
    /// CLI 인자 해석 (`-`는 표준 입력)
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(arg))
        }
    }
}

/// JSON Lines 관측 소스
pub struct JsonLinesSource {
    input: ReplayInput,
    reader: Mutex<Option<JoinHandle<()>>>,
    finished_tx: Arc<watch::Sender<bool>>,
}

impl JsonLinesSource {
    pub fn new(input: ReplayInput) -> Self {
        let (finished_tx, _) = watch::channel(false);
        Self {
            input,
            reader: Mutex::new(None),
            finished_tx: Arc::new(finished_tx),
        }
    }

    /// 입력 종료 수신기 (EOF 또는 읽기 실패 시 true)
    pub fn finished(&self) -> watch::Receiver<bool> {
        self.finished_tx.subscribe()
    }
}

impl ObservationSource for JsonLinesSource {
    fn name(&self) -> &str {
        "json-lines"
    }

    fn observe(&self, sink: ObservationSink) -> Result<(), CoreError> {
        let runtime = Handle::try_current()
            .map_err(|e| CoreError::Unsupported(format!("관측 입력 런타임 없음: {e}")))?;

        let input = self.input.clone();
        let finished_tx = Arc::clone(&self.finished_tx);
        let task = runtime.spawn(async move {
            match open_input(&input).await {
                Ok(reader) => {
                    let forwarded = forward_lines(reader, &sink).await;
                    info!("관측 입력 종료: {forwarded}개 전달");
                }
                Err(e) => warn!("관측 입력 열기 실패: {e}"),
            }
            finished_tx.send_replace(true);
        });

        if let Some(previous) = self.reader.lock().replace(task) {
            previous.abort();
        }
        Ok(())
    }

    fn disconnect(&self) {
        if let Some(task) = self.reader.lock().take() {
            task.abort();
            debug!("관측 입력 구독 해제");
        }
    }
}

async fn open_input(
    input: &ReplayInput,
) -> Result<Box<dyn AsyncRead + Unpin + Send>, CoreError> {
    match input {
        ReplayInput::Stdin => Ok(Box::new(tokio::io::stdin())),
        ReplayInput::File(path) => {
            let file = tokio::fs::File::open(path).await?;
            Ok(Box::new(file))
        }
    }
}

/// 줄 단위로 읽어 전달, 전달한 엔트리 수 반환
async fn forward_lines<R>(reader: R, sink: &ObservationSink) -> usize
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut line_no = 0usize;
    let mut forwarded = 0usize;

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("관측 입력 읽기 실패: {e}");
                break;
            }
        };
        line_no += 1;

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str::<Observation>(trimmed) {
            Ok(observation) => {
                if sink.send(observation).is_err() {
                    debug!("수집기 채널 닫힘, 입력 중단");
                    break;
                }
                forwarded += 1;
            }
            Err(e) => warn!("잘못된 관측 엔트리 건너뜀 (line {line_no}): {e}"),
        }
    }

    forwarded
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldpulse_core::models::observation::LayoutShiftEntry;
    use std::io::Write;
    use tokio::sync::mpsc;

    const LINES: &str = r#"{"entryType":"paint","name":"first-contentful-paint","startTime":812.5}

not json
{"entryType":"layout-shift","value":0.05,"hadRecentInput":false}
{"entryType":"teleport"}
"#;

    #[test]
    fn input_from_arg() {
        assert_eq!(ReplayInput::from_arg("-"), ReplayInput::Stdin);
        assert_eq!(
            ReplayInput::from_arg("obs.jsonl"),
            ReplayInput::File(PathBuf::from("obs.jsonl"))
        );
    }

    #[tokio::test]
    async fn malformed_lines_are_skipped() {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let forwarded = forward_lines(LINES.as_bytes(), &tx).await;

        assert_eq!(forwarded, 2);
        assert_eq!(rx.recv().await.unwrap().entry_type(), "paint");
        assert_eq!(
            rx.recv().await.unwrap(),
            Observation::LayoutShift(LayoutShiftEntry {
                value: 0.05,
                had_recent_input: false,
            })
        );
    }

    #[tokio::test]
    async fn file_source_forwards_and_finishes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(LINES.as_bytes()).unwrap();

        let source = JsonLinesSource::new(ReplayInput::File(file.path().to_path_buf()));
        let mut finished = source.finished();
        let (tx, mut rx) = mpsc::unbounded_channel();

        source.observe(tx).unwrap();
        finished.wait_for(|done| *done).await.unwrap();

        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_some());
        // 리더 태스크가 sink를 놓으면 채널이 닫힌다
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn missing_file_finishes_without_entries() {
        let source = JsonLinesSource::new(ReplayInput::File(PathBuf::from(
            "/nonexistent/fieldpulse/observations.jsonl",
        )));
        let mut finished = source.finished();
        let (tx, mut rx) = mpsc::unbounded_channel();

        source.observe(tx).unwrap();
        finished.wait_for(|done| *done).await.unwrap();

        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn observe_outside_runtime_is_unsupported() {
        let source = JsonLinesSource::new(ReplayInput::Stdin);
        let (tx, _rx) = mpsc::unbounded_channel();

        assert!(matches!(source.observe(tx), Err(CoreError::Unsupported(_))));
    }
}
