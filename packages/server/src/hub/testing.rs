//! In-process connection used by the hub and pump tests.

use std::{
    io,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use super::Outbound;
use crate::{
    domain::{Connection, ConnectionError, Message, Submission},
    infrastructure::connection::CloseSignal,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Writes {
    Deliver,
    Stall,
    Fail,
}

/// Channel-backed connection. Tests push inbound results and observe what
/// the write pump sends.
pub(crate) struct TestConnection {
    inbound_tx: mpsc::UnboundedSender<Result<Submission, ConnectionError>>,
    inbound_rx: Mutex<mpsc::UnboundedReceiver<Result<Submission, ConnectionError>>>,
    written_tx: mpsc::UnboundedSender<Message>,
    written_rx: Mutex<mpsc::UnboundedReceiver<Message>>,
    writes: Writes,
    closed: CloseSignal,
    close_calls: AtomicUsize,
    write_calls: AtomicUsize,
}

impl TestConnection {
    pub(crate) fn new() -> Self {
        Self::build(Writes::Deliver)
    }

    /// A peer that never finishes a write.
    pub(crate) fn stalled() -> Self {
        Self::build(Writes::Stall)
    }

    /// A peer whose every write fails with a transport error.
    pub(crate) fn failing_writes() -> Self {
        Self::build(Writes::Fail)
    }

    fn build(writes: Writes) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (written_tx, written_rx) = mpsc::unbounded_channel();
        Self {
            inbound_tx,
            inbound_rx: Mutex::new(inbound_rx),
            written_tx,
            written_rx: Mutex::new(written_rx),
            writes,
            closed: CloseSignal::new(),
            close_calls: AtomicUsize::new(0),
            write_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn push(&self, submission: Submission) {
        let _ = self.inbound_tx.send(Ok(submission));
    }

    pub(crate) fn fail_read(&self, error: ConnectionError) {
        let _ = self.inbound_tx.send(Err(error));
    }

    pub(crate) async fn next_written(&self, wait: Duration) -> Option<Message> {
        let mut written = self.written_rx.lock().await;
        tokio::time::timeout(wait, written.recv()).await.ok().flatten()
    }

    pub(crate) fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.is_closed()
    }

    pub(crate) async fn wait_closed(&self, wait: Duration) {
        tokio::time::timeout(wait, self.closed.closed())
            .await
            .expect("connection was not closed in time");
    }
}

#[async_trait]
impl Connection for TestConnection {
    async fn read_message(&self) -> Result<Submission, ConnectionError> {
        let mut inbound = self.inbound_rx.lock().await;
        tokio::select! {
            _ = self.closed.closed() => Err(ConnectionError::Closed),
            next = inbound.recv() => next.unwrap_or(Err(ConnectionError::Closed)),
        }
    }

    async fn write_message(&self, message: &Message) -> Result<(), ConnectionError> {
        if self.closed.is_closed() {
            return Err(ConnectionError::Closed);
        }
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        match self.writes {
            Writes::Deliver => self
                .written_tx
                .send(message.clone())
                .map_err(|_| ConnectionError::Closed),
            Writes::Stall => {
                self.closed.closed().await;
                Err(ConnectionError::Closed)
            }
            Writes::Fail => Err(ConnectionError::transport(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "broken pipe",
            ))),
        }
    }

    async fn close(&self) -> Result<(), ConnectionError> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        self.closed.trigger();
        Ok(())
    }
}

pub(crate) async fn recv_within(outbound: &mut Outbound, wait: Duration) -> Option<Message> {
    tokio::time::timeout(wait, outbound.recv()).await.ok().flatten()
}
