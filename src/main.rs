use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mindtrack::config::{RegistryConfig, VERSION};
use mindtrack::models::*;
use mindtrack::registry::{query, Registry, Snapshot};

#[derive(Parser)]
#[command(name = "mtrack")]
#[command(version = VERSION)]
#[command(about = "Inspect meditation session registries")]
struct Cli {
    /// Registry config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a sample registry and print its stats
    Demo {
        /// Write the sample registry snapshot to this file
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print aggregate stats of a snapshot
    Stats {
        #[arg(long)]
        snapshot: PathBuf,
    },
    /// List sessions of a snapshot, applying each given filter in turn
    Sessions {
        #[arg(long)]
        snapshot: PathBuf,
        /// Case-insensitive name search
        #[arg(long)]
        search: Option<String>,
        /// GuidedMeditation, BreathingExercise, YogaSession or MindfulnessExercise
        #[arg(long = "type")]
        session_type: Option<String>,
        #[arg(long)]
        active: Option<bool>,
        #[arg(long)]
        difficulty: Option<String>,
        /// Minimum duration in minutes (inclusive)
        #[arg(long)]
        min: Option<f64>,
        /// Maximum duration in minutes (inclusive)
        #[arg(long)]
        max: Option<f64>,
    },
    /// List people of a snapshot
    People {
        #[arg(long)]
        snapshot: PathBuf,
    },
}

/// Logs go to stderr so stdout carries only JSON.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "mindtrack=info,mtrack=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = match &cli.config {
        Some(path) => RegistryConfig::load_from(path)?,
        None => RegistryConfig::load(),
    };

    match cli.command {
        Commands::Demo { out } => {
            let mut registry = Registry::with_config(config);
            seed_demo(&mut registry)?;
            tracing::info!("Seeded demo registry");

            if let Some(path) = out {
                write_snapshot(&path, &registry.snapshot())?;
                tracing::info!("Snapshot written to {}", path.display());
            }
            print_json(&registry.stats())?;
        }
        Commands::Stats { snapshot } => {
            let registry = open_snapshot(&snapshot, config)?;
            print_json(&registry.stats())?;
        }
        Commands::Sessions {
            snapshot,
            search,
            session_type,
            active,
            difficulty,
            min,
            max,
        } => {
            let registry = open_snapshot(&snapshot, config)?;
            let mut sessions = registry.all_sessions();
            if let Some(q) = search {
                sessions = query::by_name(&sessions, &q);
            }
            if let Some(t) = session_type {
                sessions = query::by_type(&sessions, t.parse()?);
            }
            if let Some(active) = active {
                sessions = query::by_status(&sessions, active);
            }
            if let Some(d) = difficulty {
                sessions = query::by_difficulty(&sessions, &d);
            }
            if min.is_some() || max.is_some() {
                sessions = query::by_duration(
                    &sessions,
                    min.unwrap_or(0.0),
                    max.unwrap_or(f64::INFINITY),
                );
            }
            let infos: Vec<SessionInfo> = sessions.into_iter().map(Session::info).collect();
            print_json(&infos)?;
        }
        Commands::People { snapshot } => {
            let registry = open_snapshot(&snapshot, config)?;
            let infos: Vec<PersonInfo> =
                registry.all_users().into_iter().map(Person::info).collect();
            print_json(&infos)?;
        }
    }

    Ok(())
}

fn open_snapshot(path: &Path, config: RegistryConfig) -> Result<Registry> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&content).context("Failed to parse snapshot")?;
    let mut registry = Registry::with_config(config);
    registry.load(&snapshot)?;
    Ok(registry)
}

fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let content = serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
    Ok(())
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn seed_demo(registry: &mut Registry) -> Result<()> {
    let mut guided = GuidedMeditation::new("Sleep", "Soft female voice", true)?;
    guided.set_background_music(false);
    let calm = Session::new(
        registry.ids(),
        CreateSessionInput::new("Evening wind-down", "Online").duration(20.0),
        guided,
    )?;
    let calm_id = registry.add_session(calm)?.id().clone();

    let mut breathing = BreathingExercise::new("4-7-8", 6)?;
    breathing.set_timing(4, 7, 8)?;
    let breath = Session::new(
        registry.ids(),
        CreateSessionInput::new("Calming breath", "Room 2")
            .duration(8.0)
            .difficulty("Intermedio"),
        breathing,
    )?;
    registry.add_session(breath)?;

    let mut yoga = YogaSession::new("Vinyasa", "Hips")?;
    for pose in ["Tadasana", "Adho Mukha Svanasana", "Balasana"] {
        yoga.add_pose(pose)?;
    }
    yoga.add_equipment("Mat")?;
    let flow = Session::new(
        registry.ids(),
        CreateSessionInput::new("Sunrise flow", "Studio A")
            .duration(45.0)
            .difficulty("Avanzado"),
        yoga,
    )?;
    let flow_id = registry.add_session(flow)?.id().clone();

    let mut mindful = MindfulnessExercise::new("Mindful walking", "Park")?;
    mindful.add_sense("Sight")?;
    mindful.add_sense("Hearing")?;
    let walk = Session::new(
        registry.ids(),
        CreateSessionInput::new("Walking in the park", "City park").duration(30.0),
        mindful,
    )?;
    let walk_id = registry.add_session(walk)?.id().clone();
    registry.set_session_active(&walk_id, false)?;

    let ana = Person::practitioner(
        registry.ids(),
        CreatePersonInput::new("Ana Ruiz", "ana@example.com").age(34),
        MembershipType::Premium,
    )?;
    let ana_id = registry.add_user(ana)?.id().clone();

    let leo = Person::instructor(
        registry.ids(),
        CreatePersonInput::new("Leo Park", "leo@example.com").phone("555-0101"),
        "Vinyasa yoga",
        8,
    )?;
    let leo_id = registry.add_user(leo)?.id().clone();
    if let Some(instructor) = registry
        .find_user_mut(&leo_id)
        .and_then(Person::as_instructor_mut)
    {
        instructor.add_certification("RYT-500")?;
        instructor.update_rating(4.8)?;
    }

    registry.assign_instructor(&leo_id, &flow_id)?;
    registry.record_completed_session(&ana_id, &calm_id)?;
    registry.record_completed_session(&ana_id, &flow_id)?;
    Ok(())
}
