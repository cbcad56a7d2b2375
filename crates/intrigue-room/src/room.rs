//! Room actor: an isolated Tokio task that owns one room's game state.
//!
//! Every change to a room goes through its mailbox, so changes to the
//! same room are applied one at a time in arrival order while different
//! rooms run independently. Reads skip the mailbox and come from a
//! `watch` channel that always holds the last committed state.

use std::sync::Arc;

use intrigue_game::{GameError, GameState};
use intrigue_protocol::RoomId;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{mpsc, oneshot, watch};

use crate::{RoomConfig, RoomError};

/// A synchronous change to a room. Runs on a working copy of the state
/// and the room RNG; returning an error throws both copies away.
pub type Transition =
    Box<dyn FnOnce(&mut GameState, &mut StdRng) -> Result<(), GameError> + Send>;

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand {
    /// Apply a transition and report the committed state.
    Mutate {
        transition: Transition,
        reply: oneshot::Sender<Result<Arc<GameState>, GameError>>,
    },

    /// Shut down the room.
    Shutdown,
}

/// Handle to a running room actor.
///
/// Cheap to clone. The `RoomManager` holds one per room and hands out
/// clones so callers never hold the manager lock while they wait.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
    snapshots: watch::Receiver<Arc<GameState>>,
}

impl RoomHandle {
    /// Returns the room's unique ID.
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Applies `transition` to the room and returns the committed state.
    ///
    /// On error the room is left exactly as it was. A closed mailbox or
    /// a dropped reply surfaces as [`RoomError::Unavailable`].
    pub async fn mutate<F>(&self, transition: F) -> Result<Arc<GameState>, RoomError>
    where
        F: FnOnce(&mut GameState, &mut StdRng) -> Result<(), GameError> + Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Mutate {
                transition: Box::new(transition),
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.unavailable())?;
        let committed = reply_rx.await.map_err(|_| self.unavailable())?;
        Ok(committed?)
    }

    /// The last committed state. Does not wait on the mailbox.
    pub fn snapshot(&self) -> Arc<GameState> {
        self.snapshots.borrow().clone()
    }

    /// A receiver that is notified after every commit.
    pub fn subscribe(&self) -> watch::Receiver<Arc<GameState>> {
        self.snapshots.clone()
    }

    /// Tells the room to shut down. Commands already queued are dropped.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| self.unavailable())
    }

    fn unavailable(&self) -> RoomError {
        tracing::warn!(room_id = %self.room_id, "room mailbox unavailable");
        RoomError::Unavailable(self.room_id)
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    room_id: RoomId,
    state: Arc<GameState>,
    rng: StdRng,
    snapshots: watch::Sender<Arc<GameState>>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop, processing commands until shutdown.
    async fn run(mut self) {
        tracing::info!(room_id = %self.room_id, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Mutate { transition, reply } => {
                    let result = self.apply(transition);
                    let _ = reply.send(result);
                }
                RoomCommand::Shutdown => {
                    tracing::info!(room_id = %self.room_id, "room shutting down");
                    break;
                }
            }
        }

        tracing::info!(room_id = %self.room_id, "room actor stopped");
    }

    /// Runs one transition against working copies and commits on success.
    ///
    /// The snapshot is published before the caller is answered, so a
    /// read issued after `mutate` returns always sees this commit.
    fn apply(&mut self, transition: Transition) -> Result<Arc<GameState>, GameError> {
        let mut working = GameState::clone(&self.state);
        let mut rng = self.rng.clone();

        if let Err(err) = transition(&mut working, &mut rng) {
            tracing::debug!(room_id = %self.room_id, error = %err, "transition rejected");
            return Err(err);
        }

        self.state = Arc::new(working);
        self.rng = rng;
        self.snapshots.send_replace(Arc::clone(&self.state));
        tracing::trace!(
            room_id = %self.room_id,
            phase = %self.state.phase(),
            events = self.state.event_log.len(),
            "transition committed"
        );
        Ok(Arc::clone(&self.state))
    }
}

/// Spawns a new room actor task and returns a handle to communicate with it.
///
/// `config.channel_size` controls backpressure: if the mailbox fills
/// up, senders wait.
pub(crate) fn spawn_room(room_id: RoomId, config: &RoomConfig) -> RoomHandle {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(room_id.0)),
        None => StdRng::from_os_rng(),
    };
    let state = match &config.deck {
        Some(deck) => GameState::with_deck(config.rules.clone(), deck.clone()),
        None => GameState::new(config.rules.clone(), &mut rng),
    };
    let state = Arc::new(state);

    let (tx, rx) = mpsc::channel(config.channel_size.max(1));
    let (snapshot_tx, snapshot_rx) = watch::channel(Arc::clone(&state));

    let actor = RoomActor {
        room_id,
        state,
        rng,
        snapshots: snapshot_tx,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
        snapshots: snapshot_rx,
    }
}
