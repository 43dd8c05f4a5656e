//! Career CLI
//!
//! 터미널에서 커리어 액션 실행. One invocation = one action for one user.

mod format;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use career_core::{random, CareerError, CareerService, GameConfig, JsonFileStore, Position};

#[derive(Parser)]
#[command(name = "career")]
#[command(about = "Football career simulator", long_about = None)]
struct Cli {
    /// Directory holding players.json and teams.json
    #[arg(long, default_value = "career_data")]
    data_dir: PathBuf,

    /// Directory with YAML overrides (leagues, positions, stat_ranges, tuning)
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Acting user id
    #[arg(long, short, default_value = "local")]
    user: String,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create your player
    Create {
        name: String,
        /// ST, CAM, CM, CDM, CB, LB, RB or GK
        position: Position,
    },
    /// Train to improve stats
    Train,
    /// Recover stamina and form
    Rest,
    /// Play the next match
    Play,
    /// Apply to a team (e.g. LEAGUE_3_1)
    Apply { team_id: String },
    /// Accept a pending transfer offer
    Accept { offer_id: String },
    /// List pending transfer offers
    Offers,
    /// Show your player
    Player,
    /// Browse teams, optionally one league
    Teams {
        #[arg(long)]
        league: Option<String>,
    },
    /// Show your league table
    League,
    /// Start over with the same name and position
    Reset {
        /// Must be "RESET"
        #[arg(long)]
        confirm: String,
    },
    /// Permanently delete your career
    Delete {
        /// Must be "DELETE PERMANENTLY"
        #[arg(long)]
        confirm: String,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    log::debug!("data dir {:?}, user {}", cli.data_dir, cli.user);

    let config = match &cli.config_dir {
        Some(dir) => GameConfig::load_dir(dir)
            .with_context(|| format!("loading config overrides from {}", dir.display()))?,
        None => GameConfig::builtin().clone(),
    };
    let rng = match cli.seed {
        Some(seed) => random::seeded(seed),
        None => random::from_entropy(),
    };
    let store = JsonFileStore::open(&cli.data_dir)
        .with_context(|| format!("opening data directory {}", cli.data_dir.display()))?;
    let service = CareerService::new(store, config, rng);

    match run(&service, &cli.user, cli.command) {
        Ok(()) => Ok(()),
        Err(err) if err.is_user_facing() => {
            eprintln!("❌ {}", err);
            std::process::exit(1);
        }
        Err(err) => Err(anyhow::Error::new(err).context("career action failed")),
    }
}

fn run(service: &CareerService<JsonFileStore>, user: &str, command: Commands) -> Result<(), CareerError> {
    match command {
        Commands::Create { name, position } => {
            let player = service.create_player(user, &name, position)?;
            println!("✅ Player created!\n");
            println!("{}", format::player_card(&service.view_player(&player.user_id)?));
        }
        Commands::Train => {
            let result = service.train(user)?;
            println!("{}", format::training(&result));
        }
        Commands::Rest => {
            let result = service.rest(user)?;
            println!("{}", format::rest(&result));
        }
        Commands::Play => {
            let result = service.play_match(user)?;
            println!("{}", format::match_day(&result));
        }
        Commands::Apply { team_id } => {
            let result = service.apply_to_team(user, &team_id)?;
            println!("{}", format::application(&result.report));
        }
        Commands::Accept { offer_id } => {
            let result = service.accept_offer(user, &offer_id)?;
            println!("{}", format::transfer(&result));
        }
        Commands::Offers => {
            let offers = service.view_offers(user)?;
            println!("{}", format::offers(&offers, service.now()));
        }
        Commands::Player => {
            println!("{}", format::player_card(&service.view_player(user)?));
        }
        Commands::Teams { league } => {
            let leagues = service.view_teams(league.as_deref())?;
            println!("{}", format::teams(&leagues));
        }
        Commands::League => {
            println!("{}", format::standings(&service.view_league_standings(user)?));
        }
        Commands::Reset { confirm } => {
            let player = service.reset_career(user, &confirm)?;
            println!("🔄 Career reset. All progress and offers are gone.\n");
            println!("{}", format::player_card(&service.view_player(&player.user_id)?));
        }
        Commands::Delete { confirm } => {
            let player = service.delete_career(user, &confirm)?;
            println!(
                "🗑️ {}'s career was deleted ({} matches, {} goals, {} assists).",
                player.name, player.matches_played, player.goals, player.assists
            );
        }
    }
    Ok(())
}
