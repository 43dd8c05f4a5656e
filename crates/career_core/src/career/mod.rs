//! # Career Service
//!
//! 액션 단위 오케스트레이션: load → simulate → persist.
//!
//! Every action runs under the acting player's lock; actions that touch
//! team records also take those teams' locks (ascending id order) after
//! the player's. The random generator is always the innermost lock and is
//! never held while waiting for an entity.

mod clock;
pub mod views;

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

use crate::config::GameConfig;
use crate::engine::difficulty::sorted_table;
use crate::engine::match_sim::{injury_gate, InjuryGate};
use crate::engine::progression::{apply_form_decay, enforce_potential_cap, maybe_age_up, refresh_overall};
use crate::engine::transfers::{self, after_match_offer_check, complete_transfer, lookup_offer, remove_offer, sweep_expired};
use crate::engine::valuation::update_market_value;
use crate::engine::{
    training, ApplicationOutcome, MatchContext, MatchOutcome, MatchSimulator, OfferLookup, RestReport,
    TrainingReport, TransferReport,
};
use crate::error::{CareerError, Result};
use crate::factory::{generate_all_teams, new_player, sign_with_starting_team, starting_team};
use crate::models::{Contract, Offer, Player, Position, Team};
use crate::random::GameRng;
use crate::save::locks::acquire;
use crate::save::{EntityLocks, PlayerStore, StoreError, TeamStore};

pub use clock::{Clock, FixedClock, SystemClock};
pub use views::{
    ActionResult, LeagueStandings, LeagueTeams, MatchDay, MatchSummary, PlayerCard, StandingRow, TableZone,
};

/// Confirmation phrase for [`CareerService::reset_career`]
pub const RESET_CONFIRMATION: &str = "RESET";
/// Confirmation phrase for [`CareerService::delete_career`]
pub const DELETE_CONFIRMATION: &str = "DELETE PERMANENTLY";

pub struct CareerService<S> {
    store: S,
    config: GameConfig,
    rng: Mutex<GameRng>,
    clock: Arc<dyn Clock>,
    locks: EntityLocks,
    team_init: Mutex<()>,
}

impl<S: PlayerStore + TeamStore> CareerService<S> {
    pub fn new(store: S, config: GameConfig, rng: GameRng) -> Self {
        Self {
            store,
            config,
            rng: Mutex::new(rng),
            clock: Arc::new(SystemClock),
            locks: EntityLocks::new(),
            team_init: Mutex::new(()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut GameRng) -> T) -> T {
        let mut rng = acquire(&self.rng);
        f(&mut rng)
    }

    // ========== Shared steps ==========

    /// All teams, generating the league pyramid on first use.
    pub fn teams(&self) -> Result<Vec<Team>> {
        let _init = acquire(&self.team_init);
        let teams = self.store.list_all_teams()?;
        if !teams.is_empty() {
            return Ok(teams);
        }

        let teams = self.with_rng(|rng| generate_all_teams(&self.config.leagues, rng));
        self.store.save_teams(&teams)?;
        Ok(teams)
    }

    fn load_existing(&self, user_id: &str) -> Result<Player> {
        self.store.load_player(user_id)?.ok_or_else(|| CareerError::player_not_found(user_id))
    }

    /// Load for an action. Caller holds the player's lock.
    ///
    /// Records without a club (pre-club saves) get a starting club here.
    fn load_for_action(&self, user_id: &str) -> Result<Player> {
        let mut player = self.load_existing(user_id)?;
        if player.current_team.is_none() {
            log::warn!("{} has no club on record, assigning a starting club", user_id);
            self.sign_starting_club(&mut player)?;
            self.store.save_player(&player)?;
        }
        Ok(player)
    }

    fn load_team(&self, team_id: &str) -> Result<Team> {
        self.store.load_team(team_id)?.ok_or_else(|| CareerError::team_not_found(team_id))
    }

    /// Random bottom-half club of the lowest league, with a first contract.
    fn sign_starting_club(&self, player: &mut Player) -> Result<Contract> {
        let teams = self.teams()?;
        let team_id = self
            .with_rng(|rng| starting_team(&teams, &self.config.leagues, rng).map(|team| team.id.clone()))
            .ok_or_else(|| CareerError::PreconditionFailed("No club has room for new players".into()))?;

        let handle = self.locks.team(&team_id);
        let _team_guard = acquire(&handle);
        let mut team = self.load_team(&team_id)?;
        let now = self.clock.now();
        let contract = self.with_rng(|rng| sign_with_starting_team(player, &mut team, now, &self.config, rng));
        self.store.save_team(&team)?;
        Ok(contract)
    }

    /// Drop the player from their club's squad. A club that no longer
    /// exists is skipped.
    fn leave_squad(&self, player: &Player) -> Result<()> {
        let Some(team_id) = player.current_team.as_deref() else {
            return Ok(());
        };
        let handle = self.locks.team(team_id);
        let _team_guard = acquire(&handle);
        match self.store.remove_player_from_squad(team_id, &player.user_id) {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound { .. }) => {
                log::warn!("{}: club {} no longer exists", player.user_id, team_id);
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    // ========== Actions ==========

    pub fn create_player(&self, user_id: &str, name: &str, position: Position) -> Result<Player> {
        let name = name.trim();
        if user_id.trim().is_empty() {
            return Err(CareerError::InvalidInput("user id must not be empty".into()));
        }
        if name.is_empty() {
            return Err(CareerError::InvalidInput("player name must not be empty".into()));
        }

        let handle = self.locks.player(user_id);
        let _guard = acquire(&handle);

        if self.store.load_player(user_id)?.is_some() {
            return Err(CareerError::PreconditionFailed(format!(
                "{} already has a player. Use reset or delete first.",
                user_id
            )));
        }

        let mut player = self.with_rng(|rng| new_player(user_id, name, position, &self.config, rng))?;
        self.sign_starting_club(&mut player)?;
        self.store.save_player(&player)?;

        log::info!(
            "Created {} ({} {}, overall {}, potential {})",
            user_id,
            player.position,
            player.name,
            player.overall,
            player.potential
        );
        Ok(player)
    }

    pub fn train(&self, user_id: &str) -> Result<ActionResult<TrainingReport>> {
        let handle = self.locks.player(user_id);
        let _guard = acquire(&handle);
        let mut player = self.load_for_action(user_id)?;
        let tuning = &self.config.tuning;

        let threshold = tuning.stamina.train_threshold;
        if player.stamina < threshold {
            return Err(CareerError::PreconditionFailed(format!(
                "Stamina too low ({}/{}). Training needs at least {}. Rest to recover.",
                player.stamina, tuning.stamina.max, threshold
            )));
        }

        let profile = self.config.profile(player.position)?;
        let report = self.with_rng(|rng| training::train(&mut player, &profile.weights, tuning, rng));
        update_market_value(&mut player, &tuning.value);

        self.store.save_player(&player)?;
        Ok(ActionResult { player, report })
    }

    pub fn rest(&self, user_id: &str) -> Result<ActionResult<RestReport>> {
        let handle = self.locks.player(user_id);
        let _guard = acquire(&handle);
        let mut player = self.load_for_action(user_id)?;

        let report = self.with_rng(|rng| training::rest(&mut player, &self.config.tuning, rng));

        self.store.save_player(&player)?;
        Ok(ActionResult { player, report })
    }

    /// Play one match. Injured players sit it out (the injury counter still
    /// counts down and is persisted); fit players need match stamina.
    pub fn play_match(&self, user_id: &str) -> Result<ActionResult<MatchDay>> {
        let handle = self.locks.player(user_id);
        let _guard = acquire(&handle);
        let mut player = self.load_for_action(user_id)?;
        let tuning = &self.config.tuning;

        // Checked before anything mutates
        if !matches!(injury_gate(&player), InjuryGate::Sidelined { .. })
            && player.stamina < tuning.stamina.match_threshold
        {
            return Err(CareerError::PreconditionFailed(format!(
                "Stamina too low ({}/{}). A match needs at least {}. Rest to recover.",
                player.stamina,
                tuning.stamina.max,
                tuning.stamina.match_threshold
            )));
        }

        let team_handle = player.current_team.as_deref().map(|id| self.locks.team(id));
        let _team_guard = team_handle.as_ref().map(|handle| acquire(handle));

        let mut team = match player.current_team.as_deref() {
            Some(team_id) => self.store.load_team(team_id)?,
            None => None,
        };
        let league = team.as_ref().and_then(|team| self.config.leagues.get(&team.league));
        let ctx = match (team.as_ref(), league) {
            (Some(team), Some(league)) => {
                let league_teams = self.store.list_teams_by_league(&league.id)?;
                MatchContext::for_team(&player, team, league, &league_teams, tuning)
            }
            _ => MatchContext::free_agent(),
        };

        let simulator = MatchSimulator::new(&self.config);
        let outcome = self.with_rng(|rng| simulator.play(&mut player, team.as_mut(), &ctx, rng))?;

        let report = match outcome {
            MatchOutcome::Sidelined { matches_remaining } => {
                self.store.save_player(&player)?;
                return Ok(ActionResult { player, report: MatchDay::Sidelined { matches_remaining } });
            }
            MatchOutcome::Played(report) => *report,
        };

        if let Some(team) = team.as_ref() {
            self.store.save_team(team)?;
        }

        // ===== Post-match progression =====
        let weights = self.config.profile(player.position)?.weights;
        let age_up = maybe_age_up(&mut player, &weights, &tuning.aging);
        enforce_potential_cap(&mut player);
        refresh_overall(&mut player, &weights);
        let form_decay = ctx.tier.map_or(0, |tier| apply_form_decay(&mut player, tier, &tuning.form));
        update_market_value(&mut player, &tuning.value);

        let all_teams = self.store.list_all_teams()?;
        let now = self.clock.now();
        let new_offers = self.with_rng(|rng| {
            after_match_offer_check(
                &mut player,
                report.rating,
                &all_teams,
                &self.config.leagues,
                now,
                &tuning.offer,
                rng,
            )
        });

        self.store.save_player(&player)?;

        let summary = MatchSummary { report, age_up, form_decay, new_offers };
        Ok(ActionResult { player, report: MatchDay::Played(Box::new(summary)) })
    }

    pub fn apply_to_team(&self, user_id: &str, team_id: &str) -> Result<ActionResult<ApplicationOutcome>> {
        let handle = self.locks.player(user_id);
        let _guard = acquire(&handle);
        let mut player = self.load_for_action(user_id)?;

        self.teams()?;
        let team = self.load_team(team_id)?;
        if player.is_on_team(team_id) {
            return Err(CareerError::PreconditionFailed(format!("You already play for {}", team.name)));
        }
        let league = self.config.league(&team.league)?;

        let now = self.clock.now();
        let outcome = self.with_rng(|rng| {
            transfers::apply_to_team(&mut player, &team, league, now, &self.config.tuning.offer, rng)
        });

        if let ApplicationOutcome::Offered(offer) = &outcome {
            log::info!("{} applied to {} and received {}", user_id, team_id, offer.id);
            self.store.save_player(&player)?;
        }
        Ok(ActionResult { player, report: outcome })
    }

    /// Accept a pending offer and move to its club.
    ///
    /// An expired offer is dropped from the player's list (and persisted)
    /// before `Expired` is returned.
    pub fn accept_offer(&self, user_id: &str, offer_id: &str) -> Result<ActionResult<TransferReport>> {
        let handle = self.locks.player(user_id);
        let _guard = acquire(&handle);
        let mut player = self.load_for_action(user_id)?;
        let now = self.clock.now();

        let offer = match lookup_offer(&player, offer_id, now) {
            OfferLookup::Valid(offer) => offer,
            OfferLookup::Missing => return Err(CareerError::offer_not_found(offer_id)),
            OfferLookup::Expired(offer) => {
                remove_offer(&mut player, &offer.id);
                self.store.save_player(&player)?;
                return Err(CareerError::Expired { offer_id: offer.id });
            }
        };

        let mut team_ids = vec![offer.team_id.as_str()];
        if let Some(old) = player.current_team.as_deref() {
            team_ids.push(old);
        }
        let team_handles = self.locks.teams(team_ids);
        let _team_guards: Vec<_> = team_handles.iter().map(|handle| acquire(handle)).collect();

        let mut new_team = self.load_team(&offer.team_id)?;
        let new_tier = self.config.league(&new_team.league)?.tier;
        let mut old_team = match player.current_team.as_deref() {
            Some(old_id) if old_id != new_team.id => self.store.load_team(old_id)?,
            _ => None,
        };

        let report = complete_transfer(
            &mut player,
            &offer,
            old_team.as_mut(),
            &mut new_team,
            new_tier,
            now,
            &self.config.tuning.offer,
        );

        let mut changed = vec![new_team];
        changed.extend(old_team);
        self.store.save_teams(&changed)?;
        self.store.save_player(&player)?;

        Ok(ActionResult { player, report })
    }

    /// Pending offers after dropping expired ones.
    pub fn view_offers(&self, user_id: &str) -> Result<Vec<Offer>> {
        let handle = self.locks.player(user_id);
        let _guard = acquire(&handle);
        let mut player = self.load_for_action(user_id)?;

        let expired = sweep_expired(&mut player, self.clock.now());
        if !expired.is_empty() {
            self.store.save_player(&player)?;
        }
        Ok(player.pending_offers)
    }

    pub fn view_player(&self, user_id: &str) -> Result<PlayerCard> {
        let handle = self.locks.player(user_id);
        let _guard = acquire(&handle);
        let player = self.load_for_action(user_id)?;

        let team = match player.current_team.as_deref() {
            Some(team_id) => self.store.load_team(team_id)?,
            None => None,
        };
        let league = team.as_ref().and_then(|team| self.config.leagues.get(&team.league)).cloned();
        Ok(PlayerCard { player, team, league })
    }

    /// Teams per league (all leagues, or just `league_id`), highest rating first.
    pub fn view_teams(&self, league_id: Option<&str>) -> Result<Vec<LeagueTeams>> {
        let leagues: Vec<_> = match league_id {
            Some(id) => {
                let league = self
                    .config
                    .leagues
                    .get(id)
                    .ok_or_else(|| CareerError::NotFound { entity: "League", id: id.to_string() })?;
                vec![league.clone()]
            }
            None => self.config.leagues.iter().cloned().collect(),
        };

        let all_teams = self.teams()?;
        Ok(leagues
            .into_iter()
            .map(|league| {
                let mut teams: Vec<Team> =
                    all_teams.iter().filter(|team| team.league == league.id).cloned().collect();
                teams.sort_by(|a, b| b.rating.cmp(&a.rating).then_with(|| a.id.cmp(&b.id)));
                LeagueTeams { league, teams }
            })
            .collect())
    }

    /// Table of the player's current league.
    pub fn view_league_standings(&self, user_id: &str) -> Result<LeagueStandings> {
        let handle = self.locks.player(user_id);
        let _guard = acquire(&handle);
        let player = self.load_for_action(user_id)?;

        let team_id = player
            .current_team
            .clone()
            .ok_or_else(|| CareerError::PreconditionFailed("You are not on a team".into()))?;
        let team = self.load_team(&team_id)?;
        let league = self.config.league(&team.league)?.clone();

        let league_teams = self.store.list_teams_by_league(&league.id)?;
        let table = sorted_table(&league_teams);
        let team_count = table.len();
        let rows = table
            .into_iter()
            .enumerate()
            .map(|(idx, team)| StandingRow {
                position: idx + 1,
                team: team.clone(),
                zone: views::table_zone(idx + 1, team_count, &league),
            })
            .collect();

        Ok(LeagueStandings {
            league,
            team_id,
            season: player.season.clone(),
            season_length: self.config.tuning.season.length,
            rows,
        })
    }

    /// Start over with the same name and position.
    pub fn reset_career(&self, user_id: &str, confirmation: &str) -> Result<Player> {
        if confirmation != RESET_CONFIRMATION {
            return Err(CareerError::PreconditionFailed(format!("Type \"{}\" to confirm", RESET_CONFIRMATION)));
        }

        let handle = self.locks.player(user_id);
        let _guard = acquire(&handle);
        let old = self.load_existing(user_id)?;
        self.leave_squad(&old)?;

        let mut player = self.with_rng(|rng| new_player(user_id, &old.name, old.position, &self.config, rng))?;
        self.sign_starting_club(&mut player)?;
        self.store.save_player(&player)?;

        log::info!("{} reset their career ({} matches discarded)", user_id, old.matches_played);
        Ok(player)
    }

    /// Remove the career for good. Returns the deleted record.
    pub fn delete_career(&self, user_id: &str, confirmation: &str) -> Result<Player> {
        if confirmation != DELETE_CONFIRMATION {
            return Err(CareerError::PreconditionFailed(format!("Type \"{}\" to confirm", DELETE_CONFIRMATION)));
        }

        let handle = self.locks.player(user_id);
        let _guard = acquire(&handle);
        let player = self.load_existing(user_id)?;
        self.leave_squad(&player)?;
        self.store.delete_player(user_id)?;

        log::info!("{} deleted their career", user_id);
        Ok(player)
    }
}
