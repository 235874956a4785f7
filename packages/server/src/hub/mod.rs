//! The hub: registry of live clients and the broadcast engine.
//!
//! A single event loop owns every mutation of the registry. Callers talk to
//! it through three intake channels (register, unregister, submit) via the
//! cloneable [`Hub`] handle.
//!
//! Fan-out never waits on a client. Each client has a bounded outbound queue;
//! if a queue is full when a message arrives, the client is treated as
//! unresponsive and evicted in the same pass, so one slow consumer cannot
//! stall delivery to the rest.

mod client;
mod pump;
mod registry;

#[cfg(test)]
pub(crate) mod testing;

use std::{future::Future, sync::Arc};

use hubcast_shared::time::MonotonicClock;
use tokio::{
    sync::{Mutex, mpsc, oneshot},
    task::JoinHandle,
};
use tracing::{Dispatch, Instrument, instrument::WithSubscriber};

use crate::domain::{ClientId, Message, Submission};

pub use client::{Client, Outbound};
pub use pump::{Session, serve};

use registry::Registry;

/// Default capacity of each intake channel.
pub const DEFAULT_INTAKE_CAPACITY: usize = 64;

/// Default number of undelivered messages a client may have queued before it
/// is evicted: one outstanding message per client.
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 1;

/// Hub sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubConfig {
    /// Capacity of each of the register, unregister and submit channels.
    pub intake_capacity: usize,
    /// Capacity of every client's outbound queue.
    pub outbound_capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            intake_capacity: DEFAULT_INTAKE_CAPACITY,
            outbound_capacity: DEFAULT_OUTBOUND_CAPACITY,
        }
    }
}

struct Registration {
    client: Client,
    ack: oneshot::Sender<()>,
}

struct Intake {
    register: mpsc::Receiver<Registration>,
    unregister: mpsc::Receiver<ClientId>,
    submit: mpsc::Receiver<Submission>,
}

/// Handle to the hub's event loop.
///
/// Cheap to clone. The loop runs until every handle has been dropped.
#[derive(Clone)]
pub struct Hub {
    register_tx: mpsc::Sender<Registration>,
    unregister_tx: mpsc::Sender<ClientId>,
    submit_tx: mpsc::Sender<Submission>,
    registry: Arc<Mutex<Registry>>,
    config: HubConfig,
    dispatch: Dispatch,
}

impl Hub {
    /// Start the event loop, logging through the caller's current dispatcher.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(config: HubConfig) -> Self {
        let dispatch = tracing::dispatcher::get_default(Dispatch::clone);
        Self::spawn_with_dispatch(config, dispatch)
    }

    /// Start the event loop, logging through `dispatch`.
    ///
    /// Every task the hub starts (the event loop, client pumps, connection
    /// teardown) emits its events through this dispatch.
    ///
    /// # Panics
    ///
    /// Panics if either capacity in `config` is zero.
    pub fn spawn_with_dispatch(config: HubConfig, dispatch: Dispatch) -> Self {
        let (register_tx, register) = mpsc::channel(config.intake_capacity);
        let (unregister_tx, unregister) = mpsc::channel(config.intake_capacity);
        let (submit_tx, submit) = mpsc::channel(config.intake_capacity);
        let registry = Arc::new(Mutex::new(Registry::default()));

        let hub = Self {
            register_tx,
            unregister_tx,
            submit_tx,
            registry: Arc::clone(&registry),
            config,
            dispatch,
        };

        let intake = Intake {
            register,
            unregister,
            submit,
        };
        let span =
            tracing::dispatcher::with_default(&hub.dispatch, || tracing::info_span!("hub"));
        hub.spawn_task(run(intake, registry).instrument(span));

        hub
    }

    pub fn config(&self) -> HubConfig {
        self.config
    }

    /// Add `client` to the registry.
    ///
    /// Returns once the event loop has inserted it, so any message submitted
    /// afterwards is delivered to it.
    pub async fn register(&self, client: Client) {
        let id = client.id();
        let (ack, done) = oneshot::channel();
        if self
            .register_tx
            .send(Registration { client, ack })
            .await
            .is_err()
        {
            tracing::warn!(client_id = %id, "hub stopped; registration dropped");
            return;
        }
        if done.await.is_err() {
            tracing::warn!(client_id = %id, "hub stopped before registration completed");
        }
    }

    /// Ask the event loop to remove `id`.
    ///
    /// Removing an id that is not registered is a no-op.
    pub async fn unregister(&self, id: ClientId) {
        if self.unregister_tx.send(id).await.is_err() {
            tracing::warn!(client_id = %id, "hub stopped; unregister dropped");
        }
    }

    /// Queue `submission` for stamping and fan-out.
    pub async fn submit(&self, submission: Submission) {
        if self.submit_tx.send(submission).await.is_err() {
            tracing::warn!("hub stopped; submission dropped");
        }
    }

    /// Number of registered clients.
    pub async fn client_count(&self) -> usize {
        self.registry.lock().await.len()
    }

    /// Whether `id` is currently registered.
    pub async fn contains(&self, id: &ClientId) -> bool {
        self.registry.lock().await.contains(id)
    }

    /// Spawn `future` on the runtime under the hub's dispatch.
    pub(crate) fn spawn_task<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        tokio::spawn(future.with_subscriber(self.dispatch.clone()))
    }
}

impl std::fmt::Debug for Hub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hub").field("config", &self.config).finish()
    }
}

/// The event loop. Processes one intake event to completion before taking
/// the next; ends when every intake channel is closed.
async fn run(mut intake: Intake, registry: Arc<Mutex<Registry>>) {
    let mut clock = MonotonicClock::new();

    loop {
        tokio::select! {
            Some(Registration { client, ack }) = intake.register.recv() => {
                registry.lock().await.insert(client);
                let _ = ack.send(());
            }
            Some(id) = intake.unregister.recv() => {
                registry.lock().await.remove(&id);
            }
            Some(submission) = intake.submit.recv() => {
                let message = Message::stamp(submission, clock.now());
                broadcast(&registry, &message).await;
            }
            else => break,
        }
    }

    tracing::debug!("hub event loop stopped");
}

async fn broadcast(registry: &Mutex<Registry>, message: &Message) {
    tracing::info!(
        sender = %message.sender(),
        content = %message.content(),
        timestamp = %message.timestamp().to_rfc3339(),
        "message broadcast"
    );

    let mut registry = registry.lock().await;
    let evicted = registry.fan_out(message);
    if !evicted.is_empty() {
        tracing::debug!(
            evicted = evicted.len(),
            clients = registry.len(),
            "fan-out evicted clients"
        );
    }
}
