//! Persistent input reader.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Item handed from the reader task to the processing stage.
///
/// End of input is signalled by the queue closing.
#[derive(Debug)]
pub enum InputEvent {
    Line(String),
    Failed(io::Error),
}

/// Spawn the single reader task for `reader`.
///
/// Lines are forwarded with trailing `\r\n` / `\n` removed. Invalid UTF-8 is
/// replaced rather than treated as a read failure.
pub fn spawn_reader<R>(reader: R, capacity: usize) -> (mpsc::Receiver<InputEvent>, JoinHandle<()>)
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(capacity);
    let handle = tokio::spawn(read_lines(reader, tx));
    (rx, handle)
}

async fn read_lines<R>(mut reader: R, tx: mpsc::Sender<InputEvent>)
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => {
                tracing::debug!("Input reached end of stream");
                break;
            }
            Ok(_) => {
                let line = String::from_utf8_lossy(trim_newline(&buf)).into_owned();
                if tx.send(InputEvent::Line(line)).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                let _ = tx.send(InputEvent::Failed(e)).await;
                break;
            }
        }
    }
}

fn trim_newline(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn test_reads_lines_then_closes() {
        let data: &[u8] = b"http://a/\r\n1 http://b/\n\nlast-without-newline";
        let (mut rx, handle) = spawn_reader(BufReader::new(data), 4);

        let mut lines = Vec::new();
        while let Some(event) = rx.recv().await {
            match event {
                InputEvent::Line(line) => lines.push(line),
                InputEvent::Failed(e) => panic!("unexpected failure: {}", e),
            }
        }
        handle.await.unwrap();

        assert_eq!(lines, vec!["http://a/", "1 http://b/", "", "last-without-newline"]);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() {
        let data: &[u8] = b"http://a/\xff\n";
        let (mut rx, _handle) = spawn_reader(BufReader::new(data), 1);
        match rx.recv().await {
            Some(InputEvent::Line(line)) => assert_eq!(line, "http://a/\u{fffd}"),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
