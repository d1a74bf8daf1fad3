//! Request routing: one processing stage bound to one rule set.
//!
//! # Responsibilities
//! - Consume lines from the shared input queue until reload, end or failure
//! - Run plain requests inline so their answers keep input order
//! - Hand identified requests to independent workers
//!
//! # Design Decisions
//! - A pending reload is preferred over the next input line
//! - A line that has been taken is always fully dispatched before the stage
//!   looks at the reload channel again
//! - Workers own an `Arc` of the stage's rule set and may outlive the stage

use std::io;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::lifecycle::signals::ReloadRequest;
use crate::pipeline::input::InputEvent;
use crate::pipeline::sink::{ResponseSink, SinkClosed};
use crate::protocol::{ProcessingMode, Request};
use crate::rewrite::{evaluate, Outcome};
use crate::rules::RuleSet;

/// Why a processing stage stopped.
#[derive(Debug)]
pub enum StageExit {
    /// A reload was requested; the input queue is left for the next stage.
    Reload(ReloadRequest),
    /// The input stream ended.
    EndOfInput,
    /// Reading the input stream failed.
    InputFailed(io::Error),
}

/// Routes requests against a single, fixed rule set.
pub struct RequestRouter {
    rules: Arc<RuleSet>,
    sink: ResponseSink,
}

impl RequestRouter {
    pub fn new(rules: Arc<RuleSet>, sink: ResponseSink) -> Self {
        Self { rules, sink }
    }

    pub fn rules(&self) -> &Arc<RuleSet> {
        &self.rules
    }

    /// Serve lines from `input` until a reload arrives or input stops.
    pub async fn run(
        &self,
        input: &mut mpsc::Receiver<InputEvent>,
        reloads: &mut mpsc::Receiver<ReloadRequest>,
    ) -> Result<StageExit, SinkClosed> {
        tracing::info!(rules = self.rules.len(), "Processing stage started");
        let mut reloads_open = true;

        let exit = loop {
            tokio::select! {
                biased;

                request = reloads.recv(), if reloads_open => match request {
                    Some(request) => break StageExit::Reload(request),
                    None => {
                        tracing::debug!("Reload channel closed, serving without reloads");
                        reloads_open = false;
                    }
                },

                event = input.recv() => match event {
                    Some(InputEvent::Line(line)) => self.route(&line).await?,
                    Some(InputEvent::Failed(e)) => break StageExit::InputFailed(e),
                    None => break StageExit::EndOfInput,
                },
            }
        };

        tracing::info!("Processing stage stopped");
        Ok(exit)
    }

    /// Parse and dispatch one input line.
    ///
    /// Plain requests return only after their answer was written.
    pub async fn route(&self, line: &str) -> Result<(), SinkClosed> {
        let request = Request::parse(line);
        let mode = request.mode();
        let (id, url) = request.into_parts();

        match mode {
            ProcessingMode::Ordered => {
                let result = evaluate(&url, &self.rules);
                self.sink.deliver_and_wait(Outcome::new(id, result)).await
            }
            ProcessingMode::Concurrent => {
                let rules = Arc::clone(&self.rules);
                let sink = self.sink.clone();
                tokio::spawn(async move {
                    let result = evaluate(&url, &rules);
                    if let Err(e) = sink.deliver(Outcome::new(id, result)).await {
                        tracing::warn!(error = %e, url = %url, "Dropping response");
                    }
                });
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::compiler::compile_str;
    use tokio::io::{AsyncBufReadExt, BufReader};

    fn router_with(text: &str) -> (RequestRouter, tokio::io::DuplexStream) {
        let (client, server) = tokio::io::duplex(4096);
        let (sink, _handle) = ResponseSink::spawn(client, 16);
        let rules = Arc::new(compile_str("test", text).unwrap());
        (RequestRouter::new(rules, sink), server)
    }

    #[tokio::test]
    async fn test_plain_route_written_before_return() {
        let (router, server) = router_with(r"rewrite ^http://a\.com/(.*)$ http://b.com/$1");
        let mut lines = BufReader::new(server).lines();

        router.route("http://a.com/x").await.unwrap();
        router.route("http://z.com/").await.unwrap();

        assert_eq!(lines.next_line().await.unwrap().unwrap(), "OK rewrite-url=\"http://b.com/x\"");
        assert_eq!(lines.next_line().await.unwrap().unwrap(), "ERR");
    }

    #[tokio::test]
    async fn test_identified_route_echoes_id() {
        let (router, server) = router_with("redirect ^http://old/(.*)$ 301;http://new/$1");
        let mut lines = BufReader::new(server).lines();

        router.route("1 http://old/p").await.unwrap();

        assert_eq!(
            lines.next_line().await.unwrap().unwrap(),
            "1 OK status=301 url=\"http://new/p\""
        );
    }

    #[tokio::test]
    async fn test_run_stops_on_reload_and_end() {
        let (router, server) = router_with("rewrite . http://x/");
        assert_eq!(router.rules().len(), 1);
        let mut lines = BufReader::new(server).lines();
        let (input_tx, mut input) = mpsc::channel(4);
        let (reload_tx, mut reloads) = mpsc::channel(1);

        input_tx.send(InputEvent::Line("http://a/".into())).await.unwrap();
        let stage = tokio::spawn(async move {
            let first = router.run(&mut input, &mut reloads).await.unwrap();
            let second = router.run(&mut input, &mut reloads).await.unwrap();
            (first, second)
        });

        assert_eq!(lines.next_line().await.unwrap().unwrap(), "OK rewrite-url=\"http://x/\"");
        reload_tx.send(ReloadRequest::Hangup).await.unwrap();
        drop(reload_tx);
        drop(input_tx);

        let (first, second) = stage.await.unwrap();
        assert!(matches!(first, StageExit::Reload(ReloadRequest::Hangup)));
        assert!(matches!(second, StageExit::EndOfInput));
    }
}
