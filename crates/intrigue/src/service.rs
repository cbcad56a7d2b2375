//! `IntrigueService` builder and operation surface.
//!
//! This is the entry point for hosting Intrigue rooms. It ties the
//! layers together: protocol (bytes ↔ requests) → room actors → engine,
//! and renders every result through the per-player view.

use std::sync::Arc;

use intrigue_game::{Deck, GameError, GameState, PublicRoomView, RuleConfig, project};
use intrigue_protocol::{
    Action, Codec, ErrorKind, Influence, JsonCodec, PlayerId, Reply, Request, Response, RoomId,
};
use intrigue_room::{RoomConfig, RoomHandle, RoomManager};
use rand::rngs::StdRng;
use tokio::sync::RwLock;

use crate::IntrigueError;

/// Shared service state.
///
/// Wrapped in `Arc` so clones of the service share one set of rooms.
/// The `RwLock` guards only the id → handle map and is never held
/// while waiting on a room.
struct ServiceState<C: Codec> {
    rooms: RwLock<RoomManager>,
    codec: C,
}

/// Builder for configuring an [`IntrigueService`].
///
/// # Example
///
/// ```rust,no_run
/// use intrigue::prelude::*;
///
/// # async fn demo() {
/// let service = IntrigueService::builder()
///     .channel_size(32)
///     .seed(7)
///     .build();
/// let room = service.create_room().await;
/// # }
/// ```
pub struct IntrigueServiceBuilder {
    room_config: RoomConfig,
}

impl IntrigueServiceBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            room_config: RoomConfig::default(),
        }
    }

    /// Replaces the whole room configuration.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Sets the rules every new room is played under.
    pub fn rules(mut self, rules: RuleConfig) -> Self {
        self.room_config.rules = rules;
        self
    }

    /// Sets the mailbox capacity of each room actor.
    pub fn channel_size(mut self, size: usize) -> Self {
        self.room_config.channel_size = size;
        self
    }

    /// Seeds room RNGs for reproducible shuffles and first players.
    pub fn seed(mut self, seed: u64) -> Self {
        self.room_config.seed = Some(seed);
        self
    }

    /// Deals every new room from `deck` as given, for scripted games.
    pub fn deck(mut self, deck: Deck) -> Self {
        self.room_config.deck = Some(deck);
        self
    }

    /// Builds the service with `JsonCodec` for [`IntrigueService::handle_request`].
    pub fn build(self) -> IntrigueService<JsonCodec> {
        self.build_with_codec(JsonCodec)
    }

    /// Builds the service with a custom codec.
    pub fn build_with_codec<C: Codec>(self, codec: C) -> IntrigueService<C> {
        let state = Arc::new(ServiceState {
            rooms: RwLock::new(RoomManager::with_config(self.room_config)),
            codec,
        });
        IntrigueService { state }
    }
}

impl Default for IntrigueServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Hosts any number of independent rooms.
///
/// Cheap to clone; clones share the same rooms. Every mutating call
/// returns the committed room as seen by the calling player.
pub struct IntrigueService<C: Codec = JsonCodec> {
    state: Arc<ServiceState<C>>,
}

impl<C: Codec> Clone for IntrigueService<C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl IntrigueService<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> IntrigueServiceBuilder {
        IntrigueServiceBuilder::new()
    }
}

impl<C: Codec> IntrigueService<C> {
    // -----------------------------------------------------------------------
    // Rooms
    // -----------------------------------------------------------------------

    /// Creates an empty room with a freshly shuffled deck.
    pub async fn create_room(&self) -> RoomId {
        self.state.rooms.write().await.create_room()
    }

    /// Shuts a room down. Later calls for it fail with `NotFound`.
    pub async fn destroy_room(&self, room_id: RoomId) -> Result<(), IntrigueError> {
        let handle = self.state.rooms.write().await.remove_room(room_id)?;
        let _ = handle.shutdown().await;
        tracing::info!(%room_id, "room destroyed");
        Ok(())
    }

    /// Ids of all live rooms.
    pub async fn room_ids(&self) -> Vec<RoomId> {
        self.state.rooms.read().await.room_ids()
    }

    // -----------------------------------------------------------------------
    // Lobby
    // -----------------------------------------------------------------------

    /// Seats a player, or confirms a rejoin under the same name.
    pub async fn add_player(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
        name: &str,
    ) -> Result<PublicRoomView, IntrigueError> {
        let id = player_id.clone();
        let name = name.to_string();
        let (view, committed) = self
            .apply(room_id, &player_id, move |state, _| state.add_player(id, &name))
            .await?;
        tracing::info!(
            %room_id,
            %player_id,
            players = committed.players.len(),
            "player joined"
        );
        Ok(view)
    }

    /// Starts the game. Starting a started game changes nothing.
    pub async fn start_game(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
    ) -> Result<PublicRoomView, IntrigueError> {
        let by = player_id.clone();
        self.apply_view(room_id, &player_id, move |state, rng| {
            let fresh = !state.is_started;
            state.start(&by, rng)?;
            // Runs inside the room actor, so only the start that wins is logged.
            if fresh {
                tracing::info!(
                    %room_id,
                    players = state.players.len(),
                    turn_player = ?state.turn_player,
                    "game started"
                );
            }
            Ok(())
        })
        .await
    }

    /// Deals a fresh game to the same seats once the last one is over.
    pub async fn reset_game(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
    ) -> Result<PublicRoomView, IntrigueError> {
        let by = player_id.clone();
        let (view, _) = self
            .apply(room_id, &player_id, move |state, rng| state.reset(&by, rng))
            .await?;
        tracing::info!(%room_id, %player_id, "game reset");
        Ok(view)
    }

    // -----------------------------------------------------------------------
    // Turn protocol
    // -----------------------------------------------------------------------

    /// The turn player announces an action.
    pub async fn propose_action(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
        action: Action,
        target: Option<String>,
    ) -> Result<PublicRoomView, IntrigueError> {
        let id = player_id.clone();
        self.apply_view(room_id, &player_id, move |state, _| {
            state.propose_action(&id, action, target.as_deref())
        })
        .await
    }

    /// Pass, challenge, or block a pending action.
    pub async fn respond_to_action(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
        response: Response,
        claimed: Option<Influence>,
    ) -> Result<PublicRoomView, IntrigueError> {
        let id = player_id.clone();
        self.apply_view(room_id, &player_id, move |state, _| {
            state.respond_to_action(&id, response, claimed)
        })
        .await
    }

    /// The challenged actor reveals a card.
    pub async fn resolve_action_challenge(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
        revealed: Influence,
    ) -> Result<PublicRoomView, IntrigueError> {
        let id = player_id.clone();
        self.apply_view(room_id, &player_id, move |state, rng| {
            state.resolve_action_challenge(&id, revealed, rng)
        })
        .await
    }

    /// Pass on or challenge a pending block.
    pub async fn respond_to_block(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
        response: Response,
    ) -> Result<PublicRoomView, IntrigueError> {
        let id = player_id.clone();
        self.apply_view(room_id, &player_id, move |state, _| {
            state.respond_to_block(&id, response)
        })
        .await
    }

    /// The challenged blocker reveals a card.
    pub async fn resolve_block_challenge(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
        revealed: Influence,
    ) -> Result<PublicRoomView, IntrigueError> {
        let id = player_id.clone();
        self.apply_view(room_id, &player_id, move |state, _| {
            state.resolve_block_challenge(&id, revealed)
        })
        .await
    }

    /// Pays the caller's oldest influence-loss obligation.
    pub async fn resolve_influence_loss(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
        chosen: Influence,
    ) -> Result<PublicRoomView, IntrigueError> {
        let id = player_id.clone();
        self.apply_view(room_id, &player_id, move |state, rng| {
            state.resolve_loss(&id, chosen, rng)
        })
        .await
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// The room as `player_id` may see it.
    ///
    /// Reads the last committed state without queueing behind pending
    /// changes. Unseated callers get a spectator view with no hands.
    pub async fn get_view(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
    ) -> Result<PublicRoomView, IntrigueError> {
        let room = self.room(room_id).await?;
        Ok(project(&room.snapshot(), room_id, &player_id))
    }

    // -----------------------------------------------------------------------
    // Request dispatch
    // -----------------------------------------------------------------------

    /// Decodes a request, runs it, and encodes the reply.
    ///
    /// Bad input and refused moves come back as `Reply::Error`; the only
    /// `Err` is a reply that could not be encoded.
    pub async fn handle_request(&self, bytes: &[u8]) -> Result<Vec<u8>, IntrigueError> {
        let reply = match self.state.codec.decode::<Request>(bytes) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                tracing::debug!(error = %e, "failed to decode request");
                Reply::error(ErrorKind::Validation, e.to_string())
            }
        };
        Ok(self.state.codec.encode(&reply)?)
    }

    /// Runs an already decoded request.
    pub async fn handle(&self, request: Request) -> Reply<PublicRoomView> {
        let room_id = request.room_id();
        let result = match request {
            Request::CreateRoom => {
                let room_id = self.create_room().await;
                return Reply::RoomCreated { room_id };
            }
            Request::DestroyRoom { room_id } => match self.destroy_room(room_id).await {
                Ok(()) => return Reply::Destroyed { room_id },
                Err(e) => Err(e),
            },
            Request::AddPlayer {
                room_id,
                player_id,
                player_name,
            } => self.add_player(room_id, player_id, &player_name).await,
            Request::StartGame { room_id, player_id } => {
                self.start_game(room_id, player_id).await
            }
            Request::ProposeAction {
                room_id,
                player_id,
                action,
                target_player,
            } => {
                self.propose_action(room_id, player_id, action, target_player)
                    .await
            }
            Request::RespondToAction {
                room_id,
                player_id,
                response,
                claimed_influence,
            } => {
                self.respond_to_action(room_id, player_id, response, claimed_influence)
                    .await
            }
            Request::ResolveActionChallenge {
                room_id,
                player_id,
                influence,
            } => {
                self.resolve_action_challenge(room_id, player_id, influence)
                    .await
            }
            Request::RespondToBlock {
                room_id,
                player_id,
                response,
            } => self.respond_to_block(room_id, player_id, response).await,
            Request::ResolveBlockChallenge {
                room_id,
                player_id,
                influence,
            } => {
                self.resolve_block_challenge(room_id, player_id, influence)
                    .await
            }
            Request::ResolveInfluenceLoss {
                room_id,
                player_id,
                influence,
            } => {
                self.resolve_influence_loss(room_id, player_id, influence)
                    .await
            }
            Request::ResetGame { room_id, player_id } => {
                self.reset_game(room_id, player_id).await
            }
            Request::GetView { room_id, player_id } => self.get_view(room_id, player_id).await,
        };

        match result {
            Ok(view) => Reply::View { view },
            Err(e) => {
                tracing::debug!(?room_id, error = %e, code = e.code(), "request rejected");
                Reply::error(e.kind(), e.to_string())
            }
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Clones the room's handle, releasing the map lock before returning.
    async fn room(&self, room_id: RoomId) -> Result<RoomHandle, IntrigueError> {
        let rooms = self.state.rooms.read().await;
        Ok(rooms.handle(room_id)?)
    }

    async fn apply<F>(
        &self,
        room_id: RoomId,
        viewer: &PlayerId,
        transition: F,
    ) -> Result<(PublicRoomView, Arc<GameState>), IntrigueError>
    where
        F: FnOnce(&mut GameState, &mut StdRng) -> Result<(), GameError> + Send + 'static,
    {
        let room = self.room(room_id).await?;
        let committed = room.mutate(transition).await?;
        Ok((project(&committed, room_id, viewer), committed))
    }

    async fn apply_view<F>(
        &self,
        room_id: RoomId,
        viewer: &PlayerId,
        transition: F,
    ) -> Result<PublicRoomView, IntrigueError>
    where
        F: FnOnce(&mut GameState, &mut StdRng) -> Result<(), GameError> + Send + 'static,
    {
        let (view, _) = self.apply(room_id, viewer, transition).await?;
        Ok(view)
    }
}
