//! Rule parameters for a room.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ReturnPolicy
// ---------------------------------------------------------------------------

/// Where a card goes when it is put back into the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReturnPolicy {
    /// Insert the card, then shuffle the whole deck.
    #[default]
    Reshuffle,
    /// Insert the card at the top of the deck without shuffling. The next
    /// draw returns it, which players can exploit to track cards.
    Front,
}

// ---------------------------------------------------------------------------
// RuleConfig
// ---------------------------------------------------------------------------

/// Tunable rules, fixed for the lifetime of a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Seats at the table.
    pub max_players: usize,

    /// Players required before the game can start.
    pub min_players_to_start: usize,

    /// Coins dealt to each player on joining (and on reset).
    pub starting_coins: u32,

    /// Influences dealt to each player.
    pub hand_size: usize,

    /// Copies of each influence in a fresh deck.
    pub copies_per_influence: usize,

    /// Maximum player name length, counted in characters after trimming.
    pub max_name_len: usize,

    /// At or above this many coins a player may only propose a Coup.
    pub forced_coup_threshold: u32,

    /// Most coins a single Steal can take. `None` takes everything the
    /// target holds.
    pub steal_limit: Option<u32>,

    /// What happens to cards returned to the deck.
    pub return_policy: ReturnPolicy,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            max_players: 6,
            min_players_to_start: 2,
            starting_coins: 2,
            hand_size: 2,
            copies_per_influence: 3,
            max_name_len: 10,
            forced_coup_threshold: 10,
            steal_limit: None,
            return_policy: ReturnPolicy::Reshuffle,
        }
    }
}
