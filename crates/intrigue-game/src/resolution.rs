//! The action / challenge / block protocol.
//!
//! Every public method here is a complete transition: it either fails
//! without side effects worth keeping (the room actor discards the
//! working copy on error) or leaves the state in one of the reachable
//! phases. Any path that finishes a resolution ends in
//! [`GameState::advance_turn`].

use std::collections::BTreeSet;

use intrigue_protocol::{Action, Influence, PlayerId, Response};
use rand::Rng;

use crate::{GameError, GameState, PendingAction, PendingBlock, PendingChallenge, Phase};

/// Cards drawn by an Exchange.
const EXCHANGE_DRAW: usize = 2;

impl GameState {
    // -----------------------------------------------------------------------
    // Propose
    // -----------------------------------------------------------------------

    /// The turn player announces an action.
    ///
    /// Income and Coup resolve on the spot. Anything that can be
    /// challenged or blocked waits for every other surviving player.
    pub fn propose_action(
        &mut self,
        player_id: &PlayerId,
        action: Action,
        target: Option<&str>,
    ) -> Result<(), GameError> {
        if !self.is_started {
            return Err(GameError::NotStarted);
        }
        let seat = self.active_seat(player_id)?;
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        let name = self.players[seat].name.clone();
        if self.turn_player.as_deref() != Some(name.as_str()) {
            return Err(GameError::NotYourTurn(
                self.turn_player.clone().unwrap_or_default(),
            ));
        }
        if self.phase() != Phase::Idle {
            return Err(GameError::ActionInProgress);
        }
        if self.has_pending_loss() {
            return Err(GameError::InfluenceLossPending);
        }

        let coins = self.players[seat].coins;
        if coins >= self.rules.forced_coup_threshold && action != Action::Coup {
            return Err(GameError::MustCoup(coins));
        }
        let required = action.coins_required();
        if coins < required {
            return Err(GameError::InsufficientCoins {
                action,
                required,
                available: coins,
            });
        }
        let target = self.check_target(seat, action, target)?;
        let described = describe(&name, action, target.as_deref());

        // The assassin's fee is spent whether or not the attempt lands.
        if action == Action::Assassinate {
            self.players[seat].coins -= required;
        }

        if action.is_immediate() {
            self.log(described);
            self.apply_effect(&name, action, target.as_deref())?;
            self.advance_turn();
            return Ok(());
        }

        let pending_players: BTreeSet<String> = self
            .survivors()
            .filter(|p| p.name != name)
            .map(|p| p.name.clone())
            .collect();

        self.log(format!("{name} is trying to use {}", tail(action, target.as_deref())));
        if pending_players.is_empty() {
            self.apply_effect(&name, action, target.as_deref())?;
            self.advance_turn();
            return Ok(());
        }

        self.pending_action = Some(PendingAction {
            action,
            target_player: target,
            pending_players,
        });
        Ok(())
    }

    /// Checks the target against the action and returns its canonical name.
    fn check_target(
        &self,
        actor_seat: usize,
        action: Action,
        target: Option<&str>,
    ) -> Result<Option<String>, GameError> {
        let target = match (action.requires_target(), target) {
            (true, None) => return Err(GameError::TargetRequired(action)),
            (false, Some(_)) => return Err(GameError::TargetNotAllowed(action)),
            (false, None) => return Ok(None),
            (true, Some(target)) => target,
        };

        let player = self
            .players
            .iter()
            .find(|p| p.is_named(target.trim()))
            .ok_or_else(|| GameError::UnknownTarget(target.to_string()))?;
        if player.id == self.players[actor_seat].id {
            return Err(GameError::SelfTarget);
        }
        if player.is_eliminated() {
            return Err(GameError::TargetEliminated(player.name.clone()));
        }
        Ok(Some(player.name.clone()))
    }

    // -----------------------------------------------------------------------
    // Respond to an action
    // -----------------------------------------------------------------------

    /// A player who still owes a response passes, challenges, or blocks.
    ///
    /// The first challenge or block to arrive ends the response window
    /// for everyone.
    pub fn respond_to_action(
        &mut self,
        player_id: &PlayerId,
        response: Response,
        claimed: Option<Influence>,
    ) -> Result<(), GameError> {
        if !self.is_started {
            return Err(GameError::NotStarted);
        }
        let seat = self.active_seat(player_id)?;
        let name = self.players[seat].name.clone();
        let pending = self
            .pending_action
            .as_ref()
            .ok_or(GameError::NoPendingAction)?;
        if self.phase() != Phase::ActionProposed || !pending.pending_players.contains(&name) {
            return Err(GameError::NotAwaitingResponse(name));
        }
        let action = pending.action;
        let target = pending.target_player.clone();
        let actor = self.turn_player.clone().unwrap_or_default();

        match response {
            Response::Pass => {
                let remaining = match self.pending_action.as_mut() {
                    Some(pending) => {
                        pending.pending_players.remove(&name);
                        pending.pending_players.len()
                    }
                    None => return Err(GameError::NoPendingAction),
                };
                if remaining == 0 {
                    self.log(describe(&actor, action, target.as_deref()));
                    self.apply_effect(&actor, action, target.as_deref())?;
                    self.advance_turn();
                }
            }
            Response::Challenge => {
                if !action.challengeable() {
                    return Err(GameError::ResponseNotAllowed { action, response });
                }
                self.close_responses();
                self.pending_action_challenge = Some(PendingChallenge {
                    source_player: name.clone(),
                });
                self.log(format!("{name} is challenging {actor}"));
            }
            Response::Block => {
                if !action.blockable() {
                    return Err(GameError::ResponseNotAllowed { action, response });
                }
                let claimed = claimed.ok_or(GameError::ClaimRequired)?;
                if !claimed.can_block(action) {
                    return Err(GameError::ClaimCannotBlock {
                        influence: claimed,
                        action,
                    });
                }
                self.close_responses();
                self.pending_block = Some(PendingBlock {
                    source_player: name.clone(),
                    claimed_influence: claimed,
                });
                self.log(format!("{name} is blocking {actor} as {claimed}"));
            }
        }
        Ok(())
    }

    fn close_responses(&mut self) {
        if let Some(pending) = self.pending_action.as_mut() {
            pending.pending_players.clear();
        }
    }

    // -----------------------------------------------------------------------
    // Answer a challenge to the action
    // -----------------------------------------------------------------------

    /// The challenged actor reveals a card.
    ///
    /// A card backing the action beats the challenge: the challenger
    /// owes a card, the actor swaps the revealed card for a fresh one,
    /// and the action goes through. Anything else and the actor owes a
    /// card and the action is void.
    pub fn resolve_action_challenge<R: Rng + ?Sized>(
        &mut self,
        player_id: &PlayerId,
        revealed: Influence,
        rng: &mut R,
    ) -> Result<(), GameError> {
        if !self.is_started {
            return Err(GameError::NotStarted);
        }
        let seat = self.active_seat(player_id)?;
        let name = self.players[seat].name.clone();
        let challenger = self
            .pending_action_challenge
            .as_ref()
            .map(|c| c.source_player.clone())
            .ok_or(GameError::NoPendingActionChallenge)?;
        let (action, target) = self
            .pending_action
            .as_ref()
            .map(|p| (p.action, p.target_player.clone()))
            .ok_or(GameError::NoPendingAction)?;
        let actor = self.turn_player.clone().unwrap_or_default();
        if name != actor {
            return Err(GameError::WrongPlayer(actor));
        }
        if !self.players[seat].holds(revealed) {
            return Err(GameError::InfluenceNotHeld(revealed));
        }

        if revealed.legal_action() == Some(action) {
            self.log(format!("{challenger} failed to challenge {actor}"));
            self.oblige_loss(&challenger, false);
            self.swap_revealed(seat, revealed, rng)?;
            self.log(describe(&actor, action, target.as_deref()));
            self.apply_effect(&actor, action, target.as_deref())?;
        } else {
            self.log(format!("{challenger} successfully challenged {actor}"));
            self.oblige_loss(&actor, false);
        }
        self.advance_turn();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Respond to a block
    // -----------------------------------------------------------------------

    /// Anyone but the blocker passes on or challenges the block.
    ///
    /// A single pass lets the block stand.
    pub fn respond_to_block(
        &mut self,
        player_id: &PlayerId,
        response: Response,
    ) -> Result<(), GameError> {
        if !self.is_started {
            return Err(GameError::NotStarted);
        }
        let seat = self.active_seat(player_id)?;
        let name = self.players[seat].name.clone();
        let blocker = self
            .pending_block
            .as_ref()
            .map(|b| b.source_player.clone())
            .ok_or(GameError::NoPendingBlock)?;
        if self.phase() != Phase::BlockProposed || name == blocker {
            return Err(GameError::NotAwaitingResponse(name));
        }
        let actor = self.turn_player.clone().unwrap_or_default();

        match response {
            Response::Block => return Err(GameError::CannotBlockBlock),
            Response::Challenge => {
                self.pending_block_challenge = Some(PendingChallenge {
                    source_player: name.clone(),
                });
                self.log(format!("{name} is challenging {blocker}"));
            }
            Response::Pass => {
                self.log(format!("{blocker} successfully blocked {actor}"));
                self.advance_turn();
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Answer a challenge to the block
    // -----------------------------------------------------------------------

    /// The challenged blocker reveals a card.
    ///
    /// A card that blocks the action upholds the block and costs the
    /// challenger a card, and the blocker keeps the revealed card.
    /// Otherwise the blocker owes a card and the original action goes
    /// through.
    pub fn resolve_block_challenge(
        &mut self,
        player_id: &PlayerId,
        revealed: Influence,
    ) -> Result<(), GameError> {
        if !self.is_started {
            return Err(GameError::NotStarted);
        }
        let seat = self.active_seat(player_id)?;
        let name = self.players[seat].name.clone();
        let challenger = self
            .pending_block_challenge
            .as_ref()
            .map(|c| c.source_player.clone())
            .ok_or(GameError::NoPendingBlockChallenge)?;
        let blocker = self
            .pending_block
            .as_ref()
            .map(|b| b.source_player.clone())
            .ok_or(GameError::NoPendingBlock)?;
        let (action, target) = self
            .pending_action
            .as_ref()
            .map(|p| (p.action, p.target_player.clone()))
            .ok_or(GameError::NoPendingAction)?;
        if name != blocker {
            return Err(GameError::WrongPlayer(blocker));
        }
        if !self.players[seat].holds(revealed) {
            return Err(GameError::InfluenceNotHeld(revealed));
        }
        let actor = self.turn_player.clone().unwrap_or_default();

        if revealed.can_block(action) {
            self.log(format!("{challenger} failed to challenge {blocker}"));
            self.oblige_loss(&challenger, false);
            self.log(format!("{blocker} successfully blocked {actor}"));
        } else {
            self.log(format!("{blocker} failed to block {actor}"));
            self.oblige_loss(&blocker, false);
            self.log(describe(&actor, action, target.as_deref()));
            self.apply_effect(&actor, action, target.as_deref())?;
        }
        self.advance_turn();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Effects
    // -----------------------------------------------------------------------

    /// Replaces a successfully revealed card with a fresh one.
    ///
    /// The replacement is drawn before the revealed card goes back, so
    /// the player never gets the same card straight back. An empty deck
    /// takes the revealed card first and hands it straight back.
    fn swap_revealed<R: Rng + ?Sized>(
        &mut self,
        seat: usize,
        revealed: Influence,
        rng: &mut R,
    ) -> Result<(), GameError> {
        let card = self.players[seat]
            .take(revealed)
            .ok_or(GameError::InfluenceNotHeld(revealed))?;
        let policy = self.rules.return_policy;
        let replacement = if self.deck.is_empty() {
            self.deck.put_back(card, policy, rng);
            self.deck.draw()?
        } else {
            let replacement = self.deck.draw()?;
            self.deck.put_back(card, policy, rng);
            replacement
        };
        self.players[seat].influences.push(replacement);
        let name = self.players[seat].name.clone();
        self.log(format!("{name} revealed {revealed} and drew a new card"));
        Ok(())
    }

    /// Applies an action that was neither challenged away nor blocked.
    fn apply_effect(
        &mut self,
        actor: &str,
        action: Action,
        target: Option<&str>,
    ) -> Result<(), GameError> {
        let actor_seat = self
            .seat_named(actor)
            .ok_or_else(|| GameError::UnknownTarget(actor.to_string()))?;
        let target_seat = match target {
            Some(t) => Some(
                self.seat_named(t)
                    .ok_or_else(|| GameError::UnknownTarget(t.to_string()))?,
            ),
            None => None,
        };

        match (action, target_seat) {
            (Action::Income, _) => self.players[actor_seat].coins += 1,
            (Action::ForeignAid, _) => self.players[actor_seat].coins += 2,
            (Action::Tax, _) => self.players[actor_seat].coins += 3,
            (Action::Steal, Some(victim)) => {
                let available = self.players[victim].coins;
                let taken = self
                    .rules
                    .steal_limit
                    .map_or(available, |limit| limit.min(available));
                self.players[victim].coins -= taken;
                self.players[actor_seat].coins += taken;
            }
            (Action::Assassinate, Some(victim)) => {
                let victim = self.players[victim].name.clone();
                self.oblige_loss(&victim, false);
            }
            (Action::Coup, Some(victim)) => {
                let cost = Action::Coup.coins_required();
                let coins = &mut self.players[actor_seat].coins;
                *coins = coins.saturating_sub(cost);
                let victim = self.players[victim].name.clone();
                self.oblige_loss(&victim, false);
            }
            (Action::Exchange, _) => {
                let drawn = EXCHANGE_DRAW.min(self.deck.len());
                for _ in 0..drawn {
                    let card = self.deck.draw()?;
                    self.players[actor_seat].influences.push(card);
                }
                for _ in 0..drawn {
                    self.oblige_loss(actor, true);
                }
            }
            (Action::Steal | Action::Assassinate | Action::Coup, None) => {
                return Err(GameError::TargetRequired(action));
            }
        }
        Ok(())
    }
}

fn tail(action: Action, target: Option<&str>) -> String {
    match target {
        Some(target) => format!("{action} on {target}"),
        None => format!("{action}"),
    }
}

fn describe(actor: &str, action: Action, target: Option<&str>) -> String {
    format!("{actor} used {}", tail(action, target))
}

#[cfg(test)]
mod tests {
    use intrigue_protocol::{Action, Influence, PlayerId, Response};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::{Deck, GameError, GameState, Phase, ReturnPolicy, RuleConfig};

    fn pid(id: &str) -> PlayerId {
        PlayerId::new(id)
    }

    /// Ann: Duke, Captain. Bea: Assassin, Contessa. Cal: Ambassador, Duke.
    /// Deck afterwards: Captain, Contessa, Assassin, Ambassador.
    fn table() -> (GameState, StdRng) {
        let rules = RuleConfig {
            return_policy: ReturnPolicy::Front,
            ..RuleConfig::default()
        };
        let deck = Deck::from_cards(vec![
            Influence::Duke,
            Influence::Captain,
            Influence::Assassin,
            Influence::Contessa,
            Influence::Ambassador,
            Influence::Duke,
            Influence::Captain,
            Influence::Contessa,
            Influence::Assassin,
            Influence::Ambassador,
        ]);
        let mut state = GameState::with_deck(rules, deck);
        state.add_player(pid("a"), "Ann").unwrap();
        state.add_player(pid("b"), "Bea").unwrap();
        state.add_player(pid("c"), "Cal").unwrap();
        state.is_started = true;
        state.turn_player = Some("Ann".into());
        (state, StdRng::seed_from_u64(5))
    }

    fn coins(state: &GameState, name: &str) -> u32 {
        state.player_named(name).unwrap().coins
    }

    // -----------------------------------------------------------------------
    // Propose
    // -----------------------------------------------------------------------

    #[test]
    fn test_income_resolves_immediately() {
        let (mut state, _) = table();
        state.propose_action(&pid("a"), Action::Income, None).unwrap();

        assert_eq!(coins(&state, "Ann"), 3);
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.turn_player.as_deref(), Some("Bea"));
        assert_eq!(state.event_log.last().unwrap(), "Ann used Income");
    }

    #[test]
    fn test_propose_out_of_turn_rejected() {
        let (mut state, _) = table();
        assert_eq!(
            state.propose_action(&pid("b"), Action::Income, None),
            Err(GameError::NotYourTurn("Ann".into()))
        );
    }

    #[test]
    fn test_propose_before_start_rejected() {
        let (mut state, _) = table();
        state.is_started = false;
        assert_eq!(
            state.propose_action(&pid("a"), Action::Income, None),
            Err(GameError::NotStarted)
        );
    }

    #[test]
    fn test_propose_while_action_pending_rejected() {
        let (mut state, _) = table();
        state.propose_action(&pid("a"), Action::Tax, None).unwrap();
        assert_eq!(
            state.propose_action(&pid("a"), Action::Income, None),
            Err(GameError::ActionInProgress)
        );
    }

    #[test]
    fn test_ten_coins_forces_coup() {
        let (mut state, _) = table();
        state.players[0].coins = 10;
        assert_eq!(
            state.propose_action(&pid("a"), Action::ForeignAid, None),
            Err(GameError::MustCoup(10))
        );
        state.propose_action(&pid("a"), Action::Coup, Some("Bea")).unwrap();
        assert_eq!(coins(&state, "Ann"), 3);
        assert_eq!(state.pending_influence_loss["Bea"].len(), 1);
    }

    #[test]
    fn test_coup_needs_seven_coins() {
        let (mut state, _) = table();
        state.players[0].coins = 6;
        assert_eq!(
            state.propose_action(&pid("a"), Action::Coup, Some("Bea")),
            Err(GameError::InsufficientCoins {
                action: Action::Coup,
                required: 7,
                available: 6,
            })
        );
    }

    #[test]
    fn test_target_validation() {
        let (mut state, _) = table();
        assert_eq!(
            state.propose_action(&pid("a"), Action::Steal, None),
            Err(GameError::TargetRequired(Action::Steal))
        );
        assert_eq!(
            state.propose_action(&pid("a"), Action::Tax, Some("Bea")),
            Err(GameError::TargetNotAllowed(Action::Tax))
        );
        assert_eq!(
            state.propose_action(&pid("a"), Action::Steal, Some("Ann")),
            Err(GameError::SelfTarget)
        );
        assert_eq!(
            state.propose_action(&pid("a"), Action::Steal, Some("Zed")),
            Err(GameError::UnknownTarget("Zed".into()))
        );
        state.players[1].influences.clear();
        assert_eq!(
            state.propose_action(&pid("a"), Action::Steal, Some("Bea")),
            Err(GameError::TargetEliminated("Bea".into()))
        );
    }

    #[test]
    fn test_target_is_matched_case_insensitively() {
        let (mut state, _) = table();
        state.propose_action(&pid("a"), Action::Steal, Some("bea")).unwrap();
        assert_eq!(
            state.pending_action.as_ref().unwrap().target_player.as_deref(),
            Some("Bea")
        );
    }

    #[test]
    fn test_proposal_waits_on_every_survivor() {
        let (mut state, _) = table();
        state.players[2].influences.clear();
        state.propose_action(&pid("a"), Action::Tax, None).unwrap();

        let pending = state.pending_action.as_ref().unwrap();
        assert_eq!(pending.pending_players.len(), 1);
        assert!(pending.pending_players.contains("Bea"));
        assert_eq!(state.event_log.last().unwrap(), "Ann is trying to use Tax");
    }

    #[test]
    fn test_proposal_blocked_by_outstanding_loss() {
        let (mut state, _) = table();
        state.oblige_loss("Cal", false);
        assert_eq!(
            state.propose_action(&pid("a"), Action::Income, None),
            Err(GameError::InfluenceLossPending)
        );
    }

    // -----------------------------------------------------------------------
    // Responses
    // -----------------------------------------------------------------------

    #[test]
    fn test_all_pass_applies_tax() {
        let (mut state, _) = table();
        state.propose_action(&pid("a"), Action::Tax, None).unwrap();
        state.respond_to_action(&pid("b"), Response::Pass, None).unwrap();
        assert_eq!(coins(&state, "Ann"), 2);

        state.respond_to_action(&pid("c"), Response::Pass, None).unwrap();
        assert_eq!(coins(&state, "Ann"), 5);
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.turn_player.as_deref(), Some("Bea"));
    }

    #[test]
    fn test_pass_order_does_not_change_outcome() {
        let (mut one, _) = table();
        let (mut two, _) = table();
        for state in [&mut one, &mut two] {
            state.propose_action(&pid("a"), Action::ForeignAid, None).unwrap();
        }
        one.respond_to_action(&pid("b"), Response::Pass, None).unwrap();
        one.respond_to_action(&pid("c"), Response::Pass, None).unwrap();
        two.respond_to_action(&pid("c"), Response::Pass, None).unwrap();
        two.respond_to_action(&pid("b"), Response::Pass, None).unwrap();
        assert_eq!(one, two);
    }

    #[test]
    fn test_actor_cannot_respond_to_own_action() {
        let (mut state, _) = table();
        state.propose_action(&pid("a"), Action::Tax, None).unwrap();
        assert_eq!(
            state.respond_to_action(&pid("a"), Response::Pass, None),
            Err(GameError::NotAwaitingResponse("Ann".into()))
        );
    }

    #[test]
    fn test_double_response_rejected() {
        let (mut state, _) = table();
        state.propose_action(&pid("a"), Action::Tax, None).unwrap();
        state.respond_to_action(&pid("b"), Response::Pass, None).unwrap();
        assert_eq!(
            state.respond_to_action(&pid("b"), Response::Pass, None),
            Err(GameError::NotAwaitingResponse("Bea".into()))
        );
    }

    #[test]
    fn test_response_without_pending_action() {
        let (mut state, _) = table();
        assert_eq!(
            state.respond_to_action(&pid("b"), Response::Pass, None),
            Err(GameError::NoPendingAction)
        );
    }

    #[test]
    fn test_foreign_aid_cannot_be_challenged() {
        let (mut state, _) = table();
        state.propose_action(&pid("a"), Action::ForeignAid, None).unwrap();
        assert_eq!(
            state.respond_to_action(&pid("b"), Response::Challenge, None),
            Err(GameError::ResponseNotAllowed {
                action: Action::ForeignAid,
                response: Response::Challenge,
            })
        );
    }

    #[test]
    fn test_tax_cannot_be_blocked() {
        let (mut state, _) = table();
        state.propose_action(&pid("a"), Action::Tax, None).unwrap();
        assert_eq!(
            state.respond_to_action(&pid("b"), Response::Block, Some(Influence::Duke)),
            Err(GameError::ResponseNotAllowed {
                action: Action::Tax,
                response: Response::Block,
            })
        );
    }

    #[test]
    fn test_block_claim_must_fit_the_action() {
        let (mut state, _) = table();
        state.propose_action(&pid("a"), Action::ForeignAid, None).unwrap();
        assert_eq!(
            state.respond_to_action(&pid("b"), Response::Block, None),
            Err(GameError::ClaimRequired)
        );
        assert_eq!(
            state.respond_to_action(&pid("b"), Response::Block, Some(Influence::Contessa)),
            Err(GameError::ClaimCannotBlock {
                influence: Influence::Contessa,
                action: Action::ForeignAid,
            })
        );
    }

    #[test]
    fn test_challenge_closes_response_window() {
        let (mut state, _) = table();
        state.propose_action(&pid("a"), Action::Tax, None).unwrap();
        state.respond_to_action(&pid("b"), Response::Challenge, None).unwrap();

        assert_eq!(state.phase(), Phase::ActionChallenged);
        assert!(state.pending_action.as_ref().unwrap().pending_players.is_empty());
        assert_eq!(
            state.respond_to_action(&pid("c"), Response::Pass, None),
            Err(GameError::NotAwaitingResponse("Cal".into()))
        );
    }

    // -----------------------------------------------------------------------
    // Action challenges
    // -----------------------------------------------------------------------

    #[test]
    fn test_failed_challenge_on_tax() {
        let (mut state, mut rng) = table();
        state.propose_action(&pid("a"), Action::Tax, None).unwrap();
        state.respond_to_action(&pid("b"), Response::Challenge, None).unwrap();
        state
            .resolve_action_challenge(&pid("a"), Influence::Duke, &mut rng)
            .unwrap();

        assert_eq!(coins(&state, "Ann"), 5);
        assert_eq!(state.pending_influence_loss["Bea"].len(), 1);
        // The Duke went back to the front after the Captain was drawn.
        assert_eq!(
            state.players[0].influences,
            vec![Influence::Captain, Influence::Captain]
        );
        assert_eq!(state.deck.cards()[0], Influence::Duke);
        assert_eq!(state.deck.len(), 4);
        assert_eq!(state.turn_player.as_deref(), Some("Bea"));
        assert!(state.event_log.contains(&"Bea failed to challenge Ann".to_string()));
    }

    #[test]
    fn test_pass_then_challenge_on_tax() {
        let (mut state, mut rng) = table();
        state.propose_action(&pid("a"), Action::Tax, None).unwrap();
        state.respond_to_action(&pid("b"), Response::Pass, None).unwrap();
        assert_eq!(state.phase(), Phase::ActionProposed);

        state.respond_to_action(&pid("c"), Response::Challenge, None).unwrap();
        assert_eq!(state.phase(), Phase::ActionChallenged);
        state
            .resolve_action_challenge(&pid("a"), Influence::Duke, &mut rng)
            .unwrap();

        assert_eq!(coins(&state, "Ann"), 5);
        assert_eq!(state.pending_influence_loss["Cal"].len(), 1);
        assert!(!state.pending_influence_loss.contains_key("Bea"));
        assert_eq!(state.players[0].influences.len(), 2);
        assert_eq!(state.turn_player.as_deref(), Some("Bea"));
    }

    #[test]
    fn test_honest_reveal_with_empty_deck() {
        let deck = Deck::from_cards(vec![
            Influence::Duke,
            Influence::Captain,
            Influence::Assassin,
            Influence::Contessa,
        ]);
        let mut state = GameState::with_deck(RuleConfig::default(), deck);
        state.add_player(pid("a"), "Ann").unwrap();
        state.add_player(pid("b"), "Bea").unwrap();
        state.is_started = true;
        state.turn_player = Some("Ann".into());
        let mut rng = StdRng::seed_from_u64(3);
        assert!(state.deck.is_empty());

        state.propose_action(&pid("a"), Action::Tax, None).unwrap();
        state.respond_to_action(&pid("b"), Response::Challenge, None).unwrap();
        state
            .resolve_action_challenge(&pid("a"), Influence::Duke, &mut rng)
            .unwrap();

        // The only card available is the one just revealed.
        assert_eq!(
            state.players[0].influences,
            vec![Influence::Captain, Influence::Duke]
        );
        assert!(state.deck.is_empty());
        assert_eq!(coins(&state, "Ann"), 5);
        assert_eq!(state.pending_influence_loss["Bea"].len(), 1);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_successful_challenge_voids_action() {
        let (mut state, mut rng) = table();
        state.propose_action(&pid("a"), Action::Tax, None).unwrap();
        state.respond_to_action(&pid("c"), Response::Challenge, None).unwrap();
        state
            .resolve_action_challenge(&pid("a"), Influence::Captain, &mut rng)
            .unwrap();

        assert_eq!(coins(&state, "Ann"), 2);
        assert_eq!(state.pending_influence_loss["Ann"].len(), 1);
        assert_eq!(state.players[0].influences.len(), 2);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_only_actor_answers_action_challenge() {
        let (mut state, mut rng) = table();
        state.propose_action(&pid("a"), Action::Tax, None).unwrap();
        state.respond_to_action(&pid("b"), Response::Challenge, None).unwrap();
        assert_eq!(
            state.resolve_action_challenge(&pid("c"), Influence::Duke, &mut rng),
            Err(GameError::WrongPlayer("Ann".into()))
        );
        assert_eq!(
            state.resolve_action_challenge(&pid("a"), Influence::Contessa, &mut rng),
            Err(GameError::InfluenceNotHeld(Influence::Contessa))
        );
    }

    #[test]
    fn test_assassination_fee_kept_after_lost_challenge() {
        let (mut state, mut rng) = table();
        state.turn_player = Some("Bea".into());
        state.players[1].coins = 3;
        state.propose_action(&pid("b"), Action::Assassinate, Some("Cal")).unwrap();
        assert_eq!(coins(&state, "Bea"), 0);

        state.respond_to_action(&pid("c"), Response::Challenge, None).unwrap();
        state
            .resolve_action_challenge(&pid("b"), Influence::Contessa, &mut rng)
            .unwrap();

        assert_eq!(coins(&state, "Bea"), 0);
        assert!(!state.pending_influence_loss.contains_key("Cal"));
        assert_eq!(state.pending_influence_loss["Bea"].len(), 1);
    }

    #[test]
    fn test_failed_challenge_by_assassination_target_costs_two() {
        let (mut state, mut rng) = table();
        state.turn_player = Some("Bea".into());
        state.players[1].coins = 3;
        state.propose_action(&pid("b"), Action::Assassinate, Some("Cal")).unwrap();
        state.respond_to_action(&pid("c"), Response::Challenge, None).unwrap();
        state
            .resolve_action_challenge(&pid("b"), Influence::Assassin, &mut rng)
            .unwrap();

        assert_eq!(state.pending_influence_loss["Cal"].len(), 2);
    }

    // -----------------------------------------------------------------------
    // Blocks
    // -----------------------------------------------------------------------

    #[test]
    fn test_block_stands_on_pass() {
        let (mut state, _) = table();
        state.turn_player = Some("Bea".into());
        state.players[1].coins = 3;
        state.propose_action(&pid("b"), Action::Assassinate, Some("Cal")).unwrap();
        state
            .respond_to_action(&pid("c"), Response::Block, Some(Influence::Contessa))
            .unwrap();
        assert_eq!(state.phase(), Phase::BlockProposed);

        state.respond_to_block(&pid("b"), Response::Pass).unwrap();

        assert_eq!(coins(&state, "Bea"), 0);
        assert!(state.pending_influence_loss.is_empty());
        assert_eq!(state.turn_player.as_deref(), Some("Cal"));
        assert_eq!(state.event_log.last().unwrap(), "Cal successfully blocked Bea");
    }

    #[test]
    fn test_blocker_cannot_respond_to_own_block() {
        let (mut state, _) = table();
        state.propose_action(&pid("a"), Action::ForeignAid, None).unwrap();
        state
            .respond_to_action(&pid("c"), Response::Block, Some(Influence::Duke))
            .unwrap();
        assert_eq!(
            state.respond_to_block(&pid("c"), Response::Pass),
            Err(GameError::NotAwaitingResponse("Cal".into()))
        );
        assert_eq!(
            state.respond_to_block(&pid("b"), Response::Block),
            Err(GameError::CannotBlockBlock)
        );
    }

    #[test]
    fn test_block_challenge_upheld() {
        let (mut state, _) = table();
        state.propose_action(&pid("a"), Action::ForeignAid, None).unwrap();
        state
            .respond_to_action(&pid("c"), Response::Block, Some(Influence::Duke))
            .unwrap();
        state.respond_to_block(&pid("a"), Response::Challenge).unwrap();
        assert_eq!(state.phase(), Phase::BlockChallenged);

        state
            .resolve_block_challenge(&pid("c"), Influence::Duke)
            .unwrap();

        assert_eq!(coins(&state, "Ann"), 2);
        assert_eq!(state.pending_influence_loss["Ann"].len(), 1);
        assert_eq!(
            state.players[2].influences,
            vec![Influence::Ambassador, Influence::Duke]
        );
        assert_eq!(state.deck.len(), 4);
        assert_eq!(state.turn_player.as_deref(), Some("Bea"));
    }

    #[test]
    fn test_block_challenge_exposes_bluff() {
        let (mut state, _) = table();
        state.propose_action(&pid("a"), Action::Steal, Some("Bea")).unwrap();
        state
            .respond_to_action(&pid("b"), Response::Block, Some(Influence::Captain))
            .unwrap();
        state.respond_to_block(&pid("c"), Response::Challenge).unwrap();
        assert_eq!(
            state.resolve_block_challenge(&pid("a"), Influence::Duke),
            Err(GameError::WrongPlayer("Bea".into()))
        );

        state
            .resolve_block_challenge(&pid("b"), Influence::Assassin)
            .unwrap();

        assert_eq!(state.pending_influence_loss["Bea"].len(), 1);
        assert_eq!(coins(&state, "Ann"), 4);
        assert_eq!(coins(&state, "Bea"), 0);
    }

    // -----------------------------------------------------------------------
    // Effects
    // -----------------------------------------------------------------------

    #[test]
    fn test_steal_respects_limit() {
        let (mut state, _) = table();
        state.rules.steal_limit = Some(2);
        state.players[1].coins = 5;
        state.propose_action(&pid("a"), Action::Steal, Some("Bea")).unwrap();
        state.respond_to_action(&pid("b"), Response::Pass, None).unwrap();
        state.respond_to_action(&pid("c"), Response::Pass, None).unwrap();

        assert_eq!(coins(&state, "Ann"), 4);
        assert_eq!(coins(&state, "Bea"), 3);
    }

    #[test]
    fn test_exchange_draws_two_and_owes_two_put_backs() {
        let (mut state, mut rng) = table();
        let deck_before = state.deck.len();
        state.propose_action(&pid("a"), Action::Exchange, None).unwrap();
        state.respond_to_action(&pid("b"), Response::Pass, None).unwrap();
        state.respond_to_action(&pid("c"), Response::Pass, None).unwrap();

        assert_eq!(state.players[0].influences.len(), 4);
        assert_eq!(state.deck.len(), deck_before - 2);
        assert_eq!(state.pending_influence_loss["Ann"].len(), 2);

        state.resolve_loss(&pid("a"), Influence::Duke, &mut rng).unwrap();
        state.resolve_loss(&pid("a"), Influence::Captain, &mut rng).unwrap();
        assert_eq!(state.players[0].influences.len(), 2);
        assert_eq!(state.deck.len(), deck_before);
        assert!(!state.has_pending_loss());
    }
}
