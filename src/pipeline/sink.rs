//! Response sink: many producers, one ordered writer.

use std::io;

use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::protocol::format_outcome;
use crate::rewrite::Outcome;

/// The writer task has stopped; no further lines can be delivered.
#[derive(Debug, Error)]
#[error("response writer has stopped")]
pub struct SinkClosed;

struct Delivery {
    line: String,
    written: Option<oneshot::Sender<()>>,
}

/// Cloneable producer handle onto the delivery queue.
#[derive(Clone)]
pub struct ResponseSink {
    tx: mpsc::Sender<Delivery>,
}

impl ResponseSink {
    /// Spawn the writer task over `writer` with a queue of `capacity` outcomes.
    ///
    /// The task ends when every handle is dropped or a write fails.
    pub fn spawn<W>(writer: W, capacity: usize) -> (Self, JoinHandle<io::Result<()>>)
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(capacity);
        let handle = tokio::spawn(async move {
            let result = write_lines(writer, rx).await;
            if let Err(ref e) = result {
                tracing::error!(error = %e, "Writing response failed");
            }
            result
        });
        (Self { tx }, handle)
    }

    /// Enqueue an outcome, waiting for queue space if the writer is behind.
    pub async fn deliver(&self, outcome: Outcome) -> Result<(), SinkClosed> {
        let delivery = Delivery {
            line: format_outcome(&outcome),
            written: None,
        };
        self.tx.send(delivery).await.map_err(|_| SinkClosed)
    }

    /// Enqueue an outcome and wait until its line has been written and flushed.
    pub async fn deliver_and_wait(&self, outcome: Outcome) -> Result<(), SinkClosed> {
        let (ack_tx, ack_rx) = oneshot::channel();
        let delivery = Delivery {
            line: format_outcome(&outcome),
            written: Some(ack_tx),
        };
        self.tx.send(delivery).await.map_err(|_| SinkClosed)?;
        ack_rx.await.map_err(|_| SinkClosed)
    }
}

async fn write_lines<W>(mut writer: W, mut rx: mpsc::Receiver<Delivery>) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(delivery) = rx.recv().await {
        writer.write_all(delivery.line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;

        if let Some(written) = delivery.written {
            let _ = written.send(());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::RewriteResult;
    use tokio::io::{AsyncBufReadExt, BufReader};

    #[tokio::test]
    async fn test_lines_written_in_delivery_order() {
        let (client, server) = tokio::io::duplex(1024);
        let (sink, _handle) = ResponseSink::spawn(client, 8);

        sink.deliver(Outcome::new(Some("2".into()), RewriteResult::NoMatch)).await.unwrap();
        sink.deliver_and_wait(Outcome::new(None, RewriteResult::Rewritten("http://b/".into())))
            .await
            .unwrap();

        let mut lines = BufReader::new(server).lines();
        assert_eq!(lines.next_line().await.unwrap().unwrap(), "2 ERR");
        assert_eq!(
            lines.next_line().await.unwrap().unwrap(),
            "OK rewrite-url=\"http://b/\""
        );
    }

    #[tokio::test]
    async fn test_closed_after_writer_failure() {
        let (client, server) = tokio::io::duplex(64);
        drop(server);
        let (sink, handle) = ResponseSink::spawn(client, 1);

        let result = sink.deliver_and_wait(Outcome::new(None, RewriteResult::NoMatch)).await;
        assert!(result.is_err());
        assert!(handle.await.unwrap().is_err());
        assert!(sink.deliver(Outcome::new(None, RewriteResult::NoMatch)).await.is_err());
    }
}
