//! Reload supervision.
//!
//! # States
//! ```text
//! start:    compile rules → Running
//! Running:  stage serves input ──reload──▶ Reloading
//! Reloading: compile rules → new stage on the same input queue → Running
//! ```
//!
//! # Design Decisions
//! - The supervisor holds the only rule set reference given to new stages
//! - The old stage has returned before the new rule set is compiled
//! - In-flight workers keep the rule set they captured and finish normally
//! - No fallback: a failed compile at any point is fatal

use std::io;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::lifecycle::signals::ReloadRequest;
use crate::pipeline::input::InputEvent;
use crate::pipeline::router::{RequestRouter, StageExit};
use crate::pipeline::sink::{ResponseSink, SinkClosed};
use crate::rules::{CompileError, RuleCompiler, RuleSet};

/// Fatal conditions that end the process.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("reading stdin error: {0}")]
    Input(#[source] io::Error),

    #[error(transparent)]
    OutputClosed(#[from] SinkClosed),
}

/// Owns the active rule set and the processing stage lifecycle.
pub struct Supervisor {
    compiler: RuleCompiler,
    rules: Arc<RuleSet>,
    sink: ResponseSink,
    reloads: mpsc::Receiver<ReloadRequest>,
    generation: u64,
}

impl Supervisor {
    /// Compile the initial rule set.
    pub fn start(
        compiler: RuleCompiler,
        sink: ResponseSink,
        reloads: mpsc::Receiver<ReloadRequest>,
    ) -> Result<Self, SupervisorError> {
        let rules = Arc::new(compiler.compile()?);
        Ok(Self {
            compiler,
            rules,
            sink,
            reloads,
            generation: 0,
        })
    }

    /// The rule set new stages are bound to.
    pub fn rules(&self) -> Arc<RuleSet> {
        Arc::clone(&self.rules)
    }

    /// Serve `input` until it ends (`Ok`) or a fatal error occurs.
    pub async fn run(mut self, mut input: mpsc::Receiver<InputEvent>) -> Result<(), SupervisorError> {
        loop {
            tracing::debug!(generation = self.generation, "Binding stage to rule set");
            let stage = RequestRouter::new(self.rules(), self.sink.clone());

            match stage.run(&mut input, &mut self.reloads).await? {
                StageExit::Reload(request) => {
                    drop(stage);
                    self.reload(&request)?;
                }
                StageExit::EndOfInput => {
                    tracing::info!("Input closed, exiting");
                    return Ok(());
                }
                StageExit::InputFailed(e) => return Err(SupervisorError::Input(e)),
            }
        }
    }

    fn reload(&mut self, request: &ReloadRequest) -> Result<(), SupervisorError> {
        tracing::info!(trigger = %request, "Reloading rules");
        let fresh = self.compiler.compile()?;
        self.rules = Arc::new(fresh);
        self.generation += 1;
        tracing::info!(generation = self.generation, rules = self.rules.len(), "Rules reloaded");
        Ok(())
    }
}
