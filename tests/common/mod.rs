//! Shared harness for driving the full rewriter over in-memory pipes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines};
use tokio::task::JoinHandle;

use url_rewriter::lifecycle::{reload_channel, ReloadTrigger};
use url_rewriter::pipeline::{spawn_reader, ResponseSink};
use url_rewriter::{RuleCompiler, Supervisor, SupervisorError};

/// A running rewriter with its stdin/stdout ends exposed.
pub struct Harness {
    pub stdin: DuplexStream,
    pub stdout: Lines<BufReader<DuplexStream>>,
    pub trigger: ReloadTrigger,
    pub task: JoinHandle<Result<(), SupervisorError>>,
}

impl Harness {
    /// Start the full pipeline over `sources`.
    pub fn start(sources: Vec<PathBuf>) -> Result<Self, SupervisorError> {
        let (stdin, input_read) = tokio::io::duplex(64 * 1024);
        let (output_write, stdout) = tokio::io::duplex(64 * 1024);

        let (trigger, reloads) = reload_channel();
        let (sink, _writer) = ResponseSink::spawn(output_write, 1024);
        let supervisor = Supervisor::start(RuleCompiler::new(sources), sink, reloads)?;
        let (input, _reader) = spawn_reader(BufReader::new(input_read), 100);
        let task = tokio::spawn(supervisor.run(input));

        Ok(Self {
            stdin,
            stdout: BufReader::new(stdout).lines(),
            trigger,
            task,
        })
    }

    pub async fn send(&mut self, line: &str) {
        self.stdin.write_all(line.as_bytes()).await.unwrap();
        self.stdin.write_all(b"\n").await.unwrap();
        self.stdin.flush().await.unwrap();
    }

    /// Next response line, failing the test if none arrives promptly.
    pub async fn recv(&mut self) -> String {
        tokio::time::timeout(Duration::from_secs(5), self.stdout.next_line())
            .await
            .expect("timed out waiting for response")
            .unwrap()
            .expect("output closed")
    }

    /// Send one line and return its response.
    pub async fn ask(&mut self, line: &str) -> String {
        self.send(line).await;
        self.recv().await
    }

    /// Close stdin and wait for the supervisor to finish.
    pub async fn finish(self) -> Result<(), SupervisorError> {
        let Harness { mut stdin, task, .. } = self;
        stdin.shutdown().await.unwrap();
        drop(stdin);
        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("supervisor did not stop")
            .unwrap()
    }
}

/// Write a rule file into `dir` and return its path.
pub fn write_rules(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

pub fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}
