//! The responder seam and an in-process channel responder.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::error::{Error, Result};
use crate::fetch::{FetchTask, FetchTaskResult};

/// Executes a task somewhere else and returns its result.
///
/// Implementations must resolve within `timeout` or fail. A result whose
/// `error` is set is also a failure, reported by the transport.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn submit(&self, task: FetchTask, timeout: Duration) -> Result<FetchTaskResult>;
}

/// A task waiting for the worker on the other end of a [`ChannelResponder`].
#[derive(Debug)]
pub struct PendingTask {
    task: FetchTask,
    reply: oneshot::Sender<FetchTaskResult>,
}

impl PendingTask {
    pub fn task(&self) -> &FetchTask {
        &self.task
    }

    /// Sends the result back. Returns false if the caller already gave up,
    /// in which case the result is discarded.
    pub fn respond(self, result: FetchTaskResult) -> bool {
        self.reply.send(result).is_ok()
    }
}

/// Responder that hands tasks to a worker over a tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelResponder {
    sender: mpsc::Sender<PendingTask>,
}

impl ChannelResponder {
    /// Creates the responder and the receiving end the worker reads from.
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<PendingTask>) {
        let (sender, receiver) = mpsc::channel(buffer);
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl Responder for ChannelResponder {
    async fn submit(&self, task: FetchTask, timeout: Duration) -> Result<FetchTaskResult> {
        let (reply, answer) = oneshot::channel();

        let exchange = async {
            self.sender
                .send(PendingTask { task, reply })
                .await
                .map_err(|_| Error::Transport("Responder channel is closed".to_string()))?;
            answer.await.map_err(|_| {
                Error::Transport("Responder dropped the task without answering".to_string())
            })
        };

        tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| Error::Timeout(timeout))?
    }
}
