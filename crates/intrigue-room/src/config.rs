//! Room configuration.

use intrigue_game::{Deck, RuleConfig};
use serde::{Deserialize, Serialize};

/// Default command channel size for room actors.
pub const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Settings applied to every room a manager creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Capacity of each room's mailbox. When it fills up, callers wait.
    pub channel_size: usize,

    /// Rules the room's game is played under.
    pub rules: RuleConfig,

    /// Base seed for the room RNG. Each room mixes in its own id, so
    /// rooms stay distinct but reproducible. `None` seeds from the OS.
    pub seed: Option<u64>,

    /// Deals every new room from this exact deck instead of a shuffled
    /// one. Resets still reshuffle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck: Option<Deck>,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            channel_size: DEFAULT_CHANNEL_SIZE,
            rules: RuleConfig::default(),
            seed: None,
            deck: None,
        }
    }
}
