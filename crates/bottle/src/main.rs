use anyhow::Context;
use bottle::config::{self, Config};
use bottle::session::Session;
use bottle::sound::Silent;
use bottle::{app, view};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use spinring::SelectionEngine;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bottle", version, about = "Spin the bottle", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file to use instead of the per-user one
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Print where each player sits around the bottle
    Layout {
        /// Number of players (2-12)
        #[arg(short = 'n', long)]
        players: Option<usize>,
    },
    /// Play a whole round at once and print who was picked, in order
    Round {
        #[arg(short = 'n', long)]
        players: Option<usize>,

        /// Seed for a reproducible order
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Play interactively, reading commands from stdin (default)
    Play {
        #[arg(short = 'n', long)]
        players: Option<usize>,
    },
    /// Write the default config file and print its path
    InitConfig,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config_path = config::resolve_path(cli.config);
    let mut config = config::load_or_default(config_path.as_deref());

    match cli.command.unwrap_or(Commands::Play { players: None }) {
        Commands::Layout { players } => print_layout(players.unwrap_or(config.players)),
        Commands::Round { players, seed } => {
            config.players = players.unwrap_or(config.players);
            play_round(&config, seed)
        }
        Commands::Play { players } => {
            config.players = players.unwrap_or(config.players);
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(app::run(config, config_path))
        }
        Commands::InitConfig => {
            let path = config_path.context("No config directory available")?;
            let path = config::write_default_config(&path)?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn print_layout(players: usize) -> anyhow::Result<()> {
    let engine = SelectionEngine::new(spinring::compute_layout(players)?);
    print!("{}", view::draw_table(&engine));
    Ok(())
}

fn play_round(config: &Config, seed: Option<u64>) -> anyhow::Result<()> {
    let mut session = Session::new(config, Silent)?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let mut turn = 1;
    while !session.engine().state().is_exhausted() {
        let plan = session.spin_with(&mut rng)?;
        session.finish_spin(plan.target.id)?;
        println!(
            "{:>2}. {:<4} at {:>5.1}°, bottle turns {:.0}°",
            turn,
            plan.target.id.to_string(),
            plan.target.angle,
            plan.rotation
        );
        turn += 1;
    }

    println!("\n{}", view::draw(&session));
    Ok(())
}
