//! Seated players and name rules.

use intrigue_protocol::{Influence, PlayerId};
use serde::{Deserialize, Serialize};

use crate::{GameError, RuleConfig};

/// Seat colours, assigned in join order.
pub const PALETTE: [&str; 6] = [
    "#73C373", // green
    "#7AB8D3", // blue
    "#DD6C75", // red
    "#8C6CE6", // purple
    "#EA9158", // orange
    "#E6C350", // gold
];

/// A player seated in a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub coins: u32,
    /// Face-down cards. Usually 0–2; briefly up to 4 during an Exchange.
    pub influences: Vec<Influence>,
    pub color: String,
}

impl Player {
    /// A player with no influences is out of the game for good.
    pub fn is_eliminated(&self) -> bool {
        self.influences.is_empty()
    }

    /// Returns `true` if the player holds at least one `influence`.
    pub fn holds(&self, influence: Influence) -> bool {
        self.influences.contains(&influence)
    }

    /// Removes one copy of `influence` from the hand.
    pub(crate) fn take(&mut self, influence: Influence) -> Option<Influence> {
        let index = self.influences.iter().position(|i| *i == influence)?;
        Some(self.influences.remove(index))
    }

    /// Case-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Trims a requested name and checks it against the room's rules.
///
/// Returns the trimmed name. Uniqueness is checked by the room, which
/// knows the other seats.
pub fn validate_name(raw: &str, rules: &RuleConfig) -> Result<String, GameError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(GameError::InvalidName("name cannot be empty".into()));
    }
    if name.chars().count() > rules.max_name_len {
        return Err(GameError::InvalidName(format!(
            "name must be at most {} characters",
            rules.max_name_len
        )));
    }
    if name.parse::<Influence>().is_ok() {
        return Err(GameError::ReservedName(name.to_string()));
    }
    Ok(name.to_string())
}

/// The colour for the player sitting at `seat`.
pub fn seat_color(seat: usize) -> String {
    PALETTE[seat % PALETTE.len()].to_string()
}
