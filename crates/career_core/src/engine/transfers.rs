//! # Transfer Offers
//!
//! Team interest, offer creation, after-match offer generation, expiry and
//! the accept protocol. All functions work on snapshots; the career service
//! persists the results.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

use crate::config::tuning::OfferConfig;
use crate::config::{League, LeagueTable};
use crate::engine::valuation::round_money;
use crate::models::{Contract, Offer, Player, Team};
use crate::random::RandomSource;

/// Whether `team` (playing in a league of `tier`) would sign `player`.
pub fn team_wants_player(team: &Team, tier: u8, player: &Player, cfg: &OfferConfig) -> bool {
    if team.budget < player.market_value * cfg.budget_ratio {
        return false;
    }
    if (team.rating as i32 - player.overall as i32).abs() > cfg.max_rating_gap {
        return false;
    }
    if tier >= 3 && player.overall < cfg.tier3_min_overall {
        return false;
    }
    if tier >= 2 && player.overall < cfg.tier2_min_overall {
        return false;
    }
    true
}

/// `offer_{unix_millis}_{1000..=9999}`, re-rolled while `taken`.
pub fn new_offer_id(
    now: DateTime<Utc>,
    taken: impl Fn(&str) -> bool,
    rng: &mut impl RandomSource,
) -> String {
    loop {
        let id = format!("offer_{}_{}", now.timestamp_millis(), rng.roll_int(1000, 9999));
        if !taken(&id) {
            return id;
        }
    }
}

fn build_offer(
    id: String,
    player: &Player,
    team: &Team,
    league: &League,
    now: DateTime<Utc>,
    cfg: &OfferConfig,
    rng: &mut impl RandomSource,
) -> Offer {
    let lo = (cfg.salary_multiplier.min * 100.0).round() as i32;
    let hi = (cfg.salary_multiplier.max * 100.0).round() as i32;
    let multiplier = rng.roll_int(lo, hi) as f64 / 100.0;
    let salary = round_money((player.market_value * cfg.salary_market_share * multiplier).max(cfg.min_salary));
    let contract_length = cfg.contract_years.sample(rng).clamp(1, u8::MAX as i32) as u8;

    Offer {
        id,
        team_id: team.id.clone(),
        team_name: team.name.clone(),
        league: league.name.clone(),
        salary,
        contract_length,
        signing_bonus: round_money(salary * cfg.signing_bonus_multiplier),
        created_at: now,
        expires_at: now + Duration::days(cfg.expiry_days),
    }
}

/// A fresh offer from `team`. The id is unique among the player's pending
/// offers.
pub fn make_offer(
    player: &Player,
    team: &Team,
    league: &League,
    now: DateTime<Utc>,
    cfg: &OfferConfig,
    rng: &mut impl RandomSource,
) -> Offer {
    let id = new_offer_id(now, |id| player.find_offer(id).is_some(), rng);
    build_offer(id, player, team, league, now, cfg, rng)
}

/// Up to `max` offers from interested teams other than the current one,
/// in random order.
pub fn generate_candidate_offers(
    player: &Player,
    teams: &[Team],
    leagues: &LeagueTable,
    max: usize,
    now: DateTime<Utc>,
    cfg: &OfferConfig,
    rng: &mut impl RandomSource,
) -> Vec<Offer> {
    let mut interested: Vec<(&Team, &League)> = teams
        .iter()
        .filter(|team| !player.is_on_team(&team.id))
        .filter_map(|team| leagues.get(&team.league).map(|league| (team, league)))
        .filter(|(team, league)| team_wants_player(team, league.tier, player, cfg))
        .collect();
    rng.shuffle_slice(&mut interested);

    let mut taken: HashSet<String> = player.pending_offers.iter().map(|o| o.id.clone()).collect();
    let mut offers = Vec::new();
    for (team, league) in interested.into_iter().take(max) {
        let id = new_offer_id(now, |id| taken.contains(id), rng);
        taken.insert(id.clone());
        offers.push(build_offer(id, player, team, league, now, cfg, rng));
    }
    offers
}

/// Drop offers whose expiry is strictly before `now`. Returns them.
pub fn sweep_expired(player: &mut Player, now: DateTime<Utc>) -> Vec<Offer> {
    let (expired, live): (Vec<Offer>, Vec<Offer>) =
        std::mem::take(&mut player.pending_offers).into_iter().partition(|offer| offer.is_expired(now));
    player.pending_offers = live;
    if !expired.is_empty() {
        log::debug!("{}: {} offer(s) expired", player.user_id, expired.len());
    }
    expired
}

/// Insert `offer`, replacing any pending offer from the same team.
pub fn upsert_offer(player: &mut Player, offer: Offer) {
    player.pending_offers.retain(|existing| existing.team_id != offer.team_id);
    player.pending_offers.push(offer);
}

/// Good performances attract scouts. Returns the offers added.
pub fn after_match_offer_check(
    player: &mut Player,
    rating: f64,
    teams: &[Team],
    leagues: &LeagueTable,
    now: DateTime<Utc>,
    cfg: &OfferConfig,
    rng: &mut impl RandomSource,
) -> Vec<Offer> {
    if rating < cfg.after_match_rating_threshold || !rng.chance(cfg.generation_chance) {
        return Vec::new();
    }

    sweep_expired(player, now);

    let candidates =
        generate_candidate_offers(player, teams, leagues, cfg.max_after_match_offers, now, cfg, rng);
    let mut added = Vec::new();
    for offer in candidates {
        if player.has_offer_from(&offer.team_id) {
            continue;
        }
        player.pending_offers.push(offer.clone());
        added.push(offer);
    }
    if !added.is_empty() {
        log::info!("{} received {} new offer(s)", player.user_id, added.len());
    }
    added
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApplicationOutcome {
    Offered(Offer),
    /// Team is not interested in the player's profile
    NotInterested,
    /// Interested, but turned the application down this time
    Declined,
}

/// The player applies to `team`. A successful application replaces any
/// pending offer from the same team.
pub fn apply_to_team(
    player: &mut Player,
    team: &Team,
    league: &League,
    now: DateTime<Utc>,
    cfg: &OfferConfig,
    rng: &mut impl RandomSource,
) -> ApplicationOutcome {
    if !team_wants_player(team, league.tier, player, cfg) {
        return ApplicationOutcome::NotInterested;
    }
    if !rng.chance(cfg.application_accept_chance) {
        return ApplicationOutcome::Declined;
    }

    let offer = make_offer(player, team, league, now, cfg, rng);
    upsert_offer(player, offer.clone());
    ApplicationOutcome::Offered(offer)
}

/// State of a pending offer at `now`.
#[derive(Debug, Clone, PartialEq)]
pub enum OfferLookup {
    Valid(Offer),
    Expired(Offer),
    Missing,
}

pub fn lookup_offer(player: &Player, offer_id: &str, now: DateTime<Utc>) -> OfferLookup {
    match player.find_offer(offer_id) {
        Some(offer) if offer.is_expired(now) => OfferLookup::Expired(offer.clone()),
        Some(offer) => OfferLookup::Valid(offer.clone()),
        None => OfferLookup::Missing,
    }
}

pub fn remove_offer(player: &mut Player, offer_id: &str) -> Option<Offer> {
    let idx = player.pending_offers.iter().position(|offer| offer.id == offer_id)?;
    Some(player.pending_offers.remove(idx))
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransferReport {
    pub from_team: Option<String>,
    pub to_team: String,
    pub contract: Contract,
    /// Other pending offers dropped by accepting
    pub declined_offers: usize,
    pub market_value: f64,
}

/// Move the player to `new_team` under `offer`.
///
/// `old_team` is the player's current team snapshot, if any. The offer must
/// already be validated with [`lookup_offer`].
pub fn complete_transfer(
    player: &mut Player,
    offer: &Offer,
    old_team: Option<&mut Team>,
    new_team: &mut Team,
    new_tier: u8,
    now: DateTime<Utc>,
    cfg: &OfferConfig,
) -> TransferReport {
    if let Some(old) = old_team {
        old.squad.remove(&player.user_id);
    }
    new_team.squad.insert(player.user_id.clone());

    let release_clause = round_money(player.market_value * cfg.release_clause_multiplier);
    let contract = Contract::new(&new_team.id, offer.salary, offer.contract_length, release_clause, now);

    let from_team = player.current_team.replace(new_team.id.clone());
    player.contract = Some(contract.clone());
    let declined_offers = player.pending_offers.len().saturating_sub(1);
    player.pending_offers.clear();

    if new_tier > 1 {
        player.market_value = round_money(player.market_value * cfg.transfer_value_bump);
    }

    log::info!(
        "{} joined {} from {} ({} years, {:.2}M)",
        player.user_id,
        new_team.id,
        from_team.as_deref().unwrap_or("free agency"),
        contract.length_years,
        contract.salary
    );

    TransferReport {
        from_team,
        to_team: new_team.id.clone(),
        contract,
        declined_offers,
        market_value: player.market_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::models::player::fixtures::striker;
    use crate::models::Standings;
    use crate::random::seeded;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap()
    }

    fn team(id: &str, league: &str, rating: u8, budget: f64) -> Team {
        Team {
            id: id.into(),
            name: format!("{} FC", id),
            league: league.into(),
            rating,
            facilities: 2,
            budget,
            squad: BTreeSet::new(),
            standings: Standings::default(),
        }
    }

    fn leagues() -> LeagueTable {
        GameConfig::builtin().leagues.clone()
    }

    fn offer_from(team_id: &str, id: &str, expires_at: DateTime<Utc>) -> Offer {
        Offer {
            id: id.into(),
            team_id: team_id.into(),
            team_name: team_id.into(),
            league: "League 3".into(),
            salary: 1.0,
            contract_length: 2,
            signing_bonus: 0.5,
            created_at: expires_at - Duration::days(7),
            expires_at,
        }
    }

    #[test]
    fn test_interest_rules() {
        let cfg = OfferConfig::default();
        let mut player = striker();
        player.market_value = 10.0;

        assert!(team_wants_player(&team("A", "LEAGUE_3", 65, 20.0), 1, &player, &cfg));
        // budget below 15% of value
        assert!(!team_wants_player(&team("A", "LEAGUE_3", 65, 1.4), 1, &player, &cfg));
        // rating gap over 20
        assert!(!team_wants_player(&team("A", "LEAGUE_3", 81, 20.0), 1, &player, &cfg));
        // tier 2 needs 60, tier 3 needs 70
        assert!(team_wants_player(&team("A", "LEAGUE_2", 65, 20.0), 2, &player, &cfg));
        assert!(!team_wants_player(&team("A", "LEAGUE_1", 65, 20.0), 3, &player, &cfg));
        player.overall = 59;
        assert!(!team_wants_player(&team("A", "LEAGUE_2", 65, 20.0), 2, &player, &cfg));
    }

    #[test]
    fn test_make_offer_terms() {
        let cfg = OfferConfig::default();
        let mut player = striker();
        player.market_value = 10.0;
        let league = leagues().get("LEAGUE_2").cloned().unwrap();
        let offer = make_offer(&player, &team("LEAGUE_2_4", "LEAGUE_2", 62, 40.0), &league, now(), &cfg, &mut seeded(1));

        assert!(offer.id.starts_with(&format!("offer_{}_", now().timestamp_millis())));
        assert!(offer.salary >= 0.8 - 1e-9 && offer.salary <= 1.5 + 1e-9);
        assert!((offer.signing_bonus - round_money(offer.salary * 0.5)).abs() < 1e-9);
        assert!((1..=4).contains(&offer.contract_length));
        assert_eq!(offer.expires_at - offer.created_at, Duration::days(7));
        assert_eq!(offer.league, "League 2");
    }

    #[test]
    fn test_salary_floor() {
        let cfg = OfferConfig::default();
        let mut player = striker();
        player.market_value = 0.5;
        let league = leagues().get("LEAGUE_3").cloned().unwrap();
        let offer = make_offer(&player, &team("LEAGUE_3_1", "LEAGUE_3", 60, 40.0), &league, now(), &cfg, &mut seeded(2));
        assert_eq!(offer.salary, 0.1);
    }

    #[test]
    fn test_offer_ids_unique_under_collisions() {
        let mut rng = seeded(3);
        let mut taken: HashSet<String> = HashSet::new();
        for _ in 0..200 {
            let id = new_offer_id(now(), |id| taken.contains(id), &mut rng);
            assert!(taken.insert(id));
        }
    }

    #[test]
    fn test_candidates_exclude_current_team() {
        let cfg = OfferConfig::default();
        let mut player = striker();
        player.current_team = Some("LEAGUE_3_1".into());
        let teams = vec![
            team("LEAGUE_3_1", "LEAGUE_3", 60, 40.0),
            team("LEAGUE_3_2", "LEAGUE_3", 62, 40.0),
            team("LEAGUE_3_3", "LEAGUE_3", 64, 40.0),
            team("LEAGUE_1_1", "LEAGUE_1", 75, 40.0),
        ];

        let offers = generate_candidate_offers(&player, &teams, &leagues(), 5, now(), &cfg, &mut seeded(4));
        let mut ids: Vec<&str> = offers.iter().map(|o| o.team_id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["LEAGUE_3_2", "LEAGUE_3_3"]);

        let capped = generate_candidate_offers(&player, &teams, &leagues(), 1, now(), &cfg, &mut seeded(4));
        assert_eq!(capped.len(), 1);
    }

    #[test]
    fn test_sweep_removes_only_past_offers() {
        let mut player = striker();
        player.pending_offers = vec![
            offer_from("A", "o1", now() - Duration::seconds(1)),
            offer_from("B", "o2", now()),
            offer_from("C", "o3", now() + Duration::days(2)),
        ];

        let expired = sweep_expired(&mut player, now());
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].id, "o1");
        let left: Vec<&str> = player.pending_offers.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(left, vec!["o2", "o3"]);
    }

    #[test]
    fn test_apply_twice_replaces_offer() {
        let cfg = OfferConfig { application_accept_chance: 100.0, ..OfferConfig::default() };
        let mut player = striker();
        let target = team("LEAGUE_3_5", "LEAGUE_3", 60, 40.0);
        let league = leagues().get("LEAGUE_3").cloned().unwrap();
        let mut rng = seeded(5);

        let first = apply_to_team(&mut player, &target, &league, now(), &cfg, &mut rng);
        let second = apply_to_team(&mut player, &target, &league, now(), &cfg, &mut rng);

        assert!(matches!(first, ApplicationOutcome::Offered(_)));
        let ApplicationOutcome::Offered(second) = second else {
            panic!("expected an offer");
        };
        assert_eq!(player.pending_offers.len(), 1);
        assert_eq!(player.pending_offers[0].id, second.id);
    }

    #[test]
    fn test_apply_outcomes() {
        let league = leagues().get("LEAGUE_1").cloned().unwrap();
        let player = striker();
        let mut rng = seeded(6);

        let mut p = player.clone();
        let cfg = OfferConfig::default();
        let outcome = apply_to_team(&mut p, &team("LEAGUE_1_2", "LEAGUE_1", 70, 80.0), &league, now(), &cfg, &mut rng);
        assert_eq!(outcome, ApplicationOutcome::NotInterested);

        let mut p = player.clone();
        let cfg = OfferConfig { application_accept_chance: 0.0, ..OfferConfig::default() };
        let league3 = leagues().get("LEAGUE_3").cloned().unwrap();
        let outcome = apply_to_team(&mut p, &team("LEAGUE_3_2", "LEAGUE_3", 60, 80.0), &league3, now(), &cfg, &mut rng);
        assert_eq!(outcome, ApplicationOutcome::Declined);
        assert!(p.pending_offers.is_empty());
    }

    #[test]
    fn test_after_match_check_merges_without_duplicates() {
        let cfg = OfferConfig { generation_chance: 100.0, ..OfferConfig::default() };
        let mut player = striker();
        player.pending_offers = vec![
            offer_from("LEAGUE_3_2", "old", now() + Duration::days(3)),
            offer_from("LEAGUE_3_9", "stale", now() - Duration::days(1)),
        ];
        let teams = vec![team("LEAGUE_3_2", "LEAGUE_3", 60, 40.0), team("LEAGUE_3_3", "LEAGUE_3", 61, 40.0)];

        let added = after_match_offer_check(&mut player, 7.5, &teams, &leagues(), now(), &cfg, &mut seeded(7));

        assert!(player.find_offer("stale").is_none());
        assert!(player.find_offer("old").is_some());
        assert!(added.iter().all(|o| o.team_id == "LEAGUE_3_3"));
        let teams_with_offers: HashSet<&str> = player.pending_offers.iter().map(|o| o.team_id.as_str()).collect();
        assert_eq!(teams_with_offers.len(), player.pending_offers.len());
    }

    #[test]
    fn test_after_match_check_needs_good_rating() {
        let cfg = OfferConfig { generation_chance: 100.0, ..OfferConfig::default() };
        let mut player = striker();
        let teams = vec![team("LEAGUE_3_3", "LEAGUE_3", 61, 40.0)];
        let added = after_match_offer_check(&mut player, 6.9, &teams, &leagues(), now(), &cfg, &mut seeded(8));
        assert!(added.is_empty());
    }

    #[test]
    fn test_lookup_states() {
        let mut player = striker();
        player.pending_offers = vec![
            offer_from("A", "live", now() + Duration::days(1)),
            offer_from("B", "dead", now() - Duration::days(1)),
        ];
        assert!(matches!(lookup_offer(&player, "live", now()), OfferLookup::Valid(_)));
        assert!(matches!(lookup_offer(&player, "dead", now()), OfferLookup::Expired(_)));
        assert_eq!(lookup_offer(&player, "nope", now()), OfferLookup::Missing);
    }

    #[test]
    fn test_complete_transfer_moves_and_clears() {
        let cfg = OfferConfig::default();
        let mut player = striker();
        player.market_value = 10.0;
        player.current_team = Some("LEAGUE_3_1".into());
        let mut old = team("LEAGUE_3_1", "LEAGUE_3", 60, 40.0);
        old.squad.insert(player.user_id.clone());
        let mut new = team("LEAGUE_2_4", "LEAGUE_2", 64, 40.0);
        let offer = offer_from("LEAGUE_2_4", "o1", now() + Duration::days(5));
        player.pending_offers = vec![
            offer.clone(),
            offer_from("LEAGUE_3_2", "o2", now() + Duration::days(5)),
            offer_from("LEAGUE_3_3", "o3", now() + Duration::days(5)),
        ];

        let report = complete_transfer(&mut player, &offer, Some(&mut old), &mut new, 2, now(), &cfg);

        assert!(player.pending_offers.is_empty());
        assert_eq!(report.declined_offers, 2);
        assert!(!old.squad.contains(&player.user_id));
        assert!(new.squad.contains(&player.user_id));
        assert_eq!(player.current_team.as_deref(), Some("LEAGUE_2_4"));
        let contract = player.contract.as_ref().unwrap();
        assert_eq!(contract.release_clause, 20.0);
        assert_eq!(contract.length_years, 2);
        assert_eq!(contract.starts_at, now());
        assert_eq!(player.market_value, 10.5);
        assert_eq!(report.from_team.as_deref(), Some("LEAGUE_3_1"));
    }

    #[test]
    fn test_transfer_within_lowest_tier_keeps_value() {
        let cfg = OfferConfig::default();
        let mut player = striker();
        player.market_value = 10.0;
        let mut new = team("LEAGUE_3_4", "LEAGUE_3", 60, 40.0);
        let offer = offer_from("LEAGUE_3_4", "o1", now() + Duration::days(5));
        player.pending_offers = vec![offer.clone()];

        let report = complete_transfer(&mut player, &offer, None, &mut new, 1, now(), &cfg);
        assert_eq!(player.market_value, 10.0);
        assert!(report.from_team.is_none());
    }

    proptest! {
        #[test]
        fn prop_sweep_partitions_by_expiry(offsets in proptest::collection::vec(-100i64..100, 0..12)) {
            let mut player = striker();
            player.pending_offers = offsets
                .iter()
                .enumerate()
                .map(|(i, off)| offer_from(&format!("T{}", i), &format!("o{}", i), now() + Duration::hours(*off)))
                .collect();
            let total = player.pending_offers.len();

            let expired = sweep_expired(&mut player, now());

            prop_assert_eq!(expired.len() + player.pending_offers.len(), total);
            prop_assert!(expired.iter().all(|o| o.expires_at < now()));
            prop_assert!(player.pending_offers.iter().all(|o| o.expires_at >= now()));
        }
    }
}
