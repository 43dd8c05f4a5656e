//! Plain-text rendering of service results.

use chrono::{DateTime, Utc};
use std::fmt::Write;

use career_core::career::{
    ActionResult, LeagueStandings, LeagueTeams, MatchDay, PlayerCard, TableZone,
};
use career_core::engine::standings::MatchResult;
use career_core::engine::{ApplicationOutcome, RestReport, TrainingReport, TransferReport};
use career_core::Offer;

fn money(amount: f64) -> String {
    format!("€{:.2}M", amount)
}

fn signed(value: i32) -> String {
    if value >= 0 {
        format!("+{}", value)
    } else {
        value.to_string()
    }
}

pub fn player_card(card: &PlayerCard) -> String {
    let p = &card.player;
    let mut out = String::new();
    let _ = writeln!(out, "⚽ {} ({}), age {}", p.name, p.position, p.age);
    let _ = writeln!(out, "   Overall {} | Potential {}", p.overall, p.potential);
    for (kind, value) in p.stats.iter() {
        let _ = writeln!(out, "   {:<10} {}", kind.to_string(), value);
    }
    let _ = writeln!(out, "   Form {} | Stamina {}/100 | Value {}", signed(p.form), p.stamina, money(p.market_value));

    match (&card.team, &card.league) {
        (Some(team), Some(league)) => {
            let _ = writeln!(out, "🏢 {} ({}, {})", team.name, team.id, league.name);
        }
        (Some(team), None) => {
            let _ = writeln!(out, "🏢 {} ({})", team.name, team.id);
        }
        _ => {
            let _ = writeln!(out, "🏢 Free agent");
        }
    }
    if let Some(contract) = &p.contract {
        let _ = writeln!(
            out,
            "   Contract: {}/year until {} (release clause {})",
            money(contract.salary),
            contract.expires_at.format("%Y-%m-%d"),
            money(contract.release_clause)
        );
    }
    if let Some(injury) = p.injury.as_ref().filter(|_| p.is_injured()) {
        let _ = writeln!(
            out,
            "🤕 {} injury, out for {} more match(es)",
            injury.severity, injury.matches_remaining
        );
    }
    let _ = write!(
        out,
        "📊 {} matches, {} goals, {} assists | Season {} ({} played) | {} offer(s) pending",
        p.matches_played,
        p.goals,
        p.assists,
        p.season.number,
        p.season.matches_played,
        p.pending_offers.len()
    );
    out
}

pub fn training(result: &ActionResult<TrainingReport>) -> String {
    let report = &result.report;
    let mut out = String::from("🏋️ Training complete\n");
    if report.improvements.is_empty() {
        let _ = writeln!(out, "   No stat improved this time");
    }
    for (kind, gain) in &report.improvements {
        let _ = writeln!(out, "   {} +{}", kind, gain);
    }
    let _ = writeln!(out, "   Stamina -{} | Form {}", report.stamina_cost, signed(report.form_change));
    if let Some(knock) = &report.knock {
        let _ = writeln!(out, "🤕 Picked up a knock: {} -{}", knock.stat, knock.stat_decrease);
    }
    let _ = write!(out, "   Overall {} | Value {}", result.player.overall, money(result.player.market_value));
    out
}

pub fn rest(result: &ActionResult<RestReport>) -> String {
    format!(
        "😴 Rested: stamina +{} (now {}/100), form {} (now {})",
        result.report.stamina_recovered,
        result.player.stamina,
        signed(result.report.form_change),
        signed(result.player.form)
    )
}

pub fn match_day(result: &ActionResult<MatchDay>) -> String {
    let summary = match &result.report {
        MatchDay::Sidelined { matches_remaining } => {
            return format!("🤕 Still injured. Out for {} more match(es).", matches_remaining);
        }
        MatchDay::Played(summary) => summary,
    };
    let report = &summary.report;
    let mut out = String::new();

    if report.recovered {
        let _ = writeln!(out, "💪 Back from injury!");
    }
    let _ = writeln!(
        out,
        "⚽ Match rating {:.1} | {} goal(s), {} assist(s) | opponent {}{}",
        report.rating,
        report.goals,
        report.assists,
        report.opponent_rating,
        if report.high_pressure { " | 🔥 high pressure" } else { "" }
    );
    if let Some(team) = &report.team_result {
        let label = match team.result {
            MatchResult::Win => "Win",
            MatchResult::Draw => "Draw",
            MatchResult::Loss => "Loss",
        };
        let _ = writeln!(out, "   Team: {} {}-{}", label, team.goals_for, team.goals_against);
    }
    for (kind, gain) in &report.stat_gains {
        let _ = writeln!(out, "   {} +{}", kind, gain);
    }
    let _ = writeln!(
        out,
        "   Form {} | Stamina -{}",
        signed(report.form_change - summary.form_decay),
        report.stamina_lost
    );
    if report.big_game {
        let _ = writeln!(out, "🌟 Big-game performance!");
    }
    if let Some(injury) = &report.injury {
        let _ = writeln!(
            out,
            "🤕 {} injury: {} -{}, out for {} match(es)",
            injury.severity, injury.stat, injury.stat_decrease, injury.matches_remaining
        );
    }
    if let Some(age_up) = &summary.age_up {
        let _ = writeln!(out, "🎂 You've turned {}!", age_up.new_age);
    }
    for offer in &summary.new_offers {
        let _ = writeln!(out, "📨 New offer from {} ({})", offer.team_name, offer.league);
    }
    let _ = write!(out, "   Overall {} | Value {}", result.player.overall, money(result.player.market_value));
    out
}

pub fn application(outcome: &ApplicationOutcome) -> String {
    match outcome {
        ApplicationOutcome::Offered(offer) => format!(
            "✅ {} made you an offer!\n   Salary {}/year | {} years | bonus {}\n   Accept with: career accept {}",
            offer.team_name,
            money(offer.salary),
            offer.contract_length,
            money(offer.signing_bonus),
            offer.id
        ),
        ApplicationOutcome::NotInterested => "❌ The team is not interested in your profile right now.".to_string(),
        ApplicationOutcome::Declined => "❌ The team turned down your application. Try again later.".to_string(),
    }
}

pub fn transfer(result: &ActionResult<TransferReport>) -> String {
    let report = &result.report;
    format!(
        "✍️ Transfer complete: {} → {}\n   {}/year for {} years (release clause {})\n   {} other offer(s) declined | Value {}",
        report.from_team.as_deref().unwrap_or("free agency"),
        report.to_team,
        money(report.contract.salary),
        report.contract.length_years,
        money(report.contract.release_clause),
        report.declined_offers,
        money(report.market_value)
    )
}

pub fn offers(offers: &[Offer], now: DateTime<Utc>) -> String {
    if offers.is_empty() {
        return "📭 No pending offers.".to_string();
    }
    let mut out = String::from("📨 Pending offers\n");
    for offer in offers {
        let _ = writeln!(
            out,
            "   {} | {} ({}) | {}/year, {} years, bonus {} | {} day(s) left",
            offer.id,
            offer.team_name,
            offer.league,
            money(offer.salary),
            offer.contract_length,
            money(offer.signing_bonus),
            offer.days_remaining(now)
        );
    }
    out.trim_end().to_string()
}

pub fn teams(leagues: &[LeagueTeams]) -> String {
    let mut out = String::new();
    for entry in leagues {
        let _ = writeln!(out, "🏢 {} ({} teams)", entry.league.name, entry.teams.len());
        for (idx, team) in entry.teams.iter().enumerate() {
            let _ = writeln!(
                out,
                "   {:>2}. {:<24} {:<18} rating {} | {} | budget {}",
                idx + 1,
                team.name,
                team.id,
                team.rating,
                "⭐".repeat(team.facilities as usize),
                money(team.budget)
            );
        }
    }
    out.trim_end().to_string()
}

pub fn standings(table: &LeagueStandings) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "📊 {} - Season {}, match {}/{}",
        table.league.name, table.season.number, table.season.matches_played, table.season_length
    );
    for row in &table.rows {
        let marker = match row.zone {
            TableZone::Promotion => "🔼",
            TableZone::Relegation => "🔽",
            TableZone::Safe => "  ",
        };
        let you = if row.team.id == table.team_id { " ◀" } else { "" };
        let s = &row.team.standings;
        let _ = writeln!(
            out,
            "{} {:>2}. {:<24} {:>3}pts ({}W-{}D-{}L) GD {}{}",
            marker,
            row.position,
            row.team.name,
            s.points,
            s.wins,
            s.draws,
            s.losses,
            signed(row.team.goal_difference() as i32),
            you
        );
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_and_sign() {
        assert_eq!(money(1.5), "€1.50M");
        assert_eq!(signed(3), "+3");
        assert_eq!(signed(0), "+0");
        assert_eq!(signed(-2), "-2");
    }

    #[test]
    fn test_application_messages() {
        assert!(application(&ApplicationOutcome::Declined).contains("turned down"));
        assert!(application(&ApplicationOutcome::NotInterested).contains("not interested"));
    }

    #[test]
    fn test_empty_offers() {
        assert_eq!(offers(&[], Utc::now()), "📭 No pending offers.");
    }

    #[test]
    fn test_player_card_shows_only_live_injuries() {
        let config = career_core::GameConfig::builtin();
        let mut rng = career_core::random::seeded(3);
        let mut player =
            career_core::factory::new_player("u", "Card", career_core::Position::LB, config, &mut rng).unwrap();
        player.injury = Some(career_core::Injury {
            severity: career_core::InjurySeverity::Moderate,
            matches_remaining: 0,
            stat: career_core::StatKind::Pace,
            stat_decrease: 3,
        });
        let mut card = PlayerCard { player, team: None, league: None };

        let text = player_card(&card);
        assert!(text.contains("Free agent"));
        assert!(!text.contains("🤕"));

        if let Some(injury) = card.player.injury.as_mut() {
            injury.matches_remaining = 2;
        }
        assert!(player_card(&card).contains("out for 2 more match(es)"));
    }
}
