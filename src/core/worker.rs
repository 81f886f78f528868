//! Runs a pipeline on a background task so the presentation side stays responsive.
//!
//! Progress and the terminal outcome travel back over an unbounded channel. There is
//! no cancellation: once spawned, a run finishes or fails on its own.

use crate::core::etl::EtlEngine;
use crate::core::Pipeline;
use crate::domain::model::RunOutcome;
use crate::domain::ports::StatusSink;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    Status(String),
    Finished(RunOutcome),
}

/// Sink used inside the worker task; forwards everything to the channel.
struct ChannelSink {
    tx: UnboundedSender<RunEvent>,
}

impl StatusSink for ChannelSink {
    fn emit_status(&self, line: &str) {
        // Receiver gone means nobody is watching; the run still completes.
        let _ = self.tx.send(RunEvent::Status(line.to_string()));
    }

    fn emit_terminal(&self, outcome: &RunOutcome) {
        let _ = self.tx.send(RunEvent::Finished(outcome.clone()));
    }
}

pub struct RunHandle {
    events: UnboundedReceiver<RunEvent>,
}

impl RunHandle {
    pub async fn next_event(&mut self) -> Option<RunEvent> {
        self.events.recv().await
    }

    /// Replays every event into `sink` and returns the terminal outcome.
    pub async fn forward(mut self, sink: &dyn StatusSink) -> RunOutcome {
        while let Some(event) = self.events.recv().await {
            match event {
                RunEvent::Status(line) => sink.emit_status(&line),
                RunEvent::Finished(outcome) => {
                    sink.emit_terminal(&outcome);
                    return outcome;
                }
            }
        }

        let outcome = RunOutcome::Failed {
            message: "Processing stopped without reporting a result".to_string(),
            exit_code: 1,
        };
        sink.emit_terminal(&outcome);
        outcome
    }
}

/// Spawns `engine` as a single tokio task. A panic inside the run is caught
/// here and reported as a failed outcome.
pub fn spawn_run<P>(engine: EtlEngine<P>) -> RunHandle
where
    P: Pipeline + 'static,
{
    let (tx, events) = mpsc::unbounded_channel();
    let sink = ChannelSink { tx: tx.clone() };

    let task = tokio::spawn(async move {
        engine.execute(&sink).await;
    });

    tokio::spawn(async move {
        if let Err(e) = task.await {
            tracing::error!("❌ Processing task aborted: {}", e);
            let _ = tx.send(RunEvent::Finished(RunOutcome::Failed {
                message: format!("An unexpected error occurred: {}", e),
                exit_code: 1,
            }));
        }
    });

    RunHandle { events }
}
