//! Reload signal handling.
//!
//! # Responsibilities
//! - Define the abstract reload event consumed by the supervisor
//! - Translate SIGHUP into that event
//! - Coalesce triggers that arrive while a reload is already pending

use std::fmt;
use std::io;
use std::path::PathBuf;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

/// A request to rebuild the active rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadRequest {
    /// The process received SIGHUP.
    Hangup,
    /// A watched rule source was created, modified or removed.
    SourceChanged(PathBuf),
}

impl fmt::Display for ReloadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReloadRequest::Hangup => write!(f, "SIGHUP"),
            ReloadRequest::SourceChanged(path) => write!(f, "change in {}", path.display()),
        }
    }
}

/// Sending side of the reload channel, shared by every trigger source.
#[derive(Debug, Clone)]
pub struct ReloadTrigger {
    tx: mpsc::Sender<ReloadRequest>,
}

/// Create the reload channel. At most one request is ever pending.
pub fn reload_channel() -> (ReloadTrigger, mpsc::Receiver<ReloadRequest>) {
    let (tx, rx) = mpsc::channel(1);
    (ReloadTrigger { tx }, rx)
}

impl ReloadTrigger {
    /// Request a reload without blocking.
    ///
    /// Returns false if a reload was already pending or nobody is listening.
    pub fn request(&self, request: ReloadRequest) -> bool {
        match self.tx.try_send(request) {
            Ok(()) => true,
            Err(TrySendError::Full(request)) => {
                tracing::debug!(trigger = %request, "Reload already pending");
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }
}

/// Spawn a task that turns every SIGHUP into a reload request.
#[cfg(unix)]
pub fn spawn_hangup_listener(trigger: ReloadTrigger) -> io::Result<JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangups = signal(SignalKind::hangup())?;
    Ok(tokio::spawn(async move {
        while hangups.recv().await.is_some() {
            tracing::info!("got SIGHUP to reload configure");
            trigger.request(ReloadRequest::Hangup);
        }
    }))
}

#[cfg(not(unix))]
pub fn spawn_hangup_listener(_trigger: ReloadTrigger) -> io::Result<JoinHandle<()>> {
    tracing::warn!("SIGHUP reload not supported on this platform");
    Ok(tokio::spawn(async {}))
}
