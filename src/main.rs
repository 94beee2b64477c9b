use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use combinex::{
    ingest_into, CombineEngine, EngineConfig, PercentileProfile, Position, QueryPlayer,
    SimilarResponse, StatField, StatLine, StorageManager,
};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Percentile ranks and similar players for NFL combine results
#[derive(Parser, Debug)]
#[command(name = "combinex")]
#[command(about = "Combine percentile ranks and similar-player search", long_about = None)]
struct Args {
    /// Path to the data directory
    #[arg(short, long, default_value = "./data", global = true)]
    data_dir: PathBuf,

    /// Log level (RUST_LOG takes precedence when set)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Percentile of one measurement
    Rank {
        /// Stat key, e.g. fortyYard
        field: StatField,
        value: String,
        /// Rank against this position only
        #[arg(short, long)]
        position: Option<Position>,
    },
    /// Historical players most similar to a profile
    Similar(SimilarArgs),
    /// Percentiles of every stat of a historical player
    Profile {
        name: String,
    },
    /// Convert a raw combine export into the data directory's dataset
    Ingest {
        raw: PathBuf,
    },
    /// Build every percentile reference and write a snapshot
    Precompute {
        /// Compress the snapshot
        #[arg(long)]
        gzip: bool,
    },
}

#[derive(ClapArgs, Debug)]
struct SimilarArgs {
    /// Start from a historical player's profile
    #[arg(long)]
    from: Option<String>,
    #[arg(short, long)]
    position: Option<Position>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    height: Option<String>,
    #[arg(long)]
    weight: Option<String>,
    #[arg(long)]
    forty_yard: Option<String>,
    #[arg(long)]
    vertical_jump: Option<String>,
    #[arg(long)]
    bench_reps: Option<String>,
    #[arg(long)]
    broad_jump: Option<String>,
    #[arg(long)]
    three_cone: Option<String>,
    #[arg(long)]
    shuttle_run: Option<String>,
    /// Maximum number of results
    #[arg(short, long, default_value_t = combinex_similarity::DEFAULT_LIMIT)]
    limit: usize,
}

impl SimilarArgs {
    fn overrides(&self) -> StatLine<Option<&String>> {
        StatLine::new([
            self.height.as_ref(),
            self.weight.as_ref(),
            self.forty_yard.as_ref(),
            self.vertical_jump.as_ref(),
            self.bench_reps.as_ref(),
            self.broad_jump.as_ref(),
            self.three_cone.as_ref(),
            self.shuttle_run.as_ref(),
        ])
    }

    fn query(&self, engine: &CombineEngine) -> anyhow::Result<QueryPlayer> {
        let mut query = match &self.from {
            Some(name) => QueryPlayer::from_record(engine.find_player(name)?),
            None => engine.default_player(),
        };
        if let Some(position) = self.position {
            query = query.with_position(position);
        }
        if let Some(name) = &self.name {
            query.name = name.clone();
        }
        for (field, text) in self.overrides().iter() {
            if let Some(text) = text {
                let value = field
                    .parse_value(text)
                    .with_context(|| format!("--{} {}", field, text))?;
                query = query.with_stat(field, value);
            }
        }
        Ok(query)
    }
}

fn open_engine(args: &Args, config: EngineConfig) -> anyhow::Result<CombineEngine> {
    CombineEngine::open(&args.data_dir, config)
        .with_context(|| format!("opening data directory {:?}", args.data_dir))
}

fn print_similar(response: &SimilarResponse) {
    let query = &response.query;
    println!("{} ({})", query.name, query.position);
    for (rank, player) in response.result.iter().enumerate() {
        let draft = match (player.record.draft.year, player.record.draft.pick) {
            (Some(year), Some(pick)) => format!("{} #{}", year, pick),
            (Some(year), None) => year.to_string(),
            _ => String::new(),
        };
        println!(
            "{:>3}. {:<28} {:.4}  {}",
            rank + 1,
            player.record.name,
            player.score,
            draft
        );
    }
    let stats = &response.stats;
    println!(
        "{} candidates, {} skipped, best {:.4}",
        stats.candidates_count, stats.skipped_count, stats.best_score
    );
}

fn print_profile(profile: &PercentileProfile) {
    println!("{} ({})", profile.player, profile.position);
    for (field, stat) in profile.stats.iter() {
        let meta = field.meta();
        let raw = match stat.raw {
            Some(v) => format!("{:.*} {}", meta.precision as usize, v, meta.unit),
            None => "-".to_string(),
        };
        println!(
            "  {:<14} {:>12}  all {:>5.1}  {} {:>5.1}",
            meta.label, raw, stat.percentile, profile.position, stat.position_percentile
        );
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!("combinex v{}", env!("CARGO_PKG_VERSION"));

    match &args.command {
        Command::Rank {
            field,
            value,
            position,
        } => {
            let engine = open_engine(&args, EngineConfig::default())?;
            let value = field.parse_value(value)?;
            let rank = engine.percent_rank(*field, Some(value), *position)?;
            if args.json {
                let body = serde_json::json!({
                    "field": field,
                    "value": value,
                    "position": position,
                    "percentile": rank,
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                println!("{:.1}", rank);
            }
        }
        Command::Similar(similar) => {
            let config = EngineConfig {
                similar_limit: similar.limit,
                ..EngineConfig::default()
            };
            let engine = open_engine(&args, config)?;
            let query = similar.query(&engine)?;
            let response = engine.similar_response(&query)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_similar(&response);
            }
        }
        Command::Profile { name } => {
            let engine = open_engine(&args, EngineConfig::default())?;
            let profile = engine.percentile_profile(engine.find_player(name)?)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&profile)?);
            } else {
                print_profile(&profile);
            }
        }
        Command::Ingest { raw } => {
            let report = ingest_into(raw, &args.data_dir)?;
            info!(
                records = report.records.len(),
                skipped = report.skipped,
                "dataset written to {:?}",
                args.data_dir
            );
        }
        Command::Precompute { gzip } => {
            let storage = StorageManager::open(&args.data_dir)?;
            let config = EngineConfig {
                precompute: true,
                ..EngineConfig::default()
            };
            let engine = CombineEngine::new(storage.population(), config);
            let path = storage.save_snapshot(engine.percentiles(), *gzip)?;
            info!(keys = engine.percentiles().cached_keys(), "snapshot written to {:?}", path);
        }
    }

    Ok(())
}
