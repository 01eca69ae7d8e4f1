use clap::{Parser, Subcommand};
use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;
use std::process;

use track_loader::Result;
use track_loader::repo::TrackRepository;
use track_loader::track::Track;
use track_loader::version;

#[derive(Parser)]
#[command(name = "track-loader")]
#[command(about = "Resolve and validate benchmark track definitions", long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the fallback lookup candidates for a version, most specific first.
    Versions { version: String },

    /// List the tracks available for a version.
    List {
        #[arg(long)]
        distribution_version: String,

        #[arg(long, env = "TRACKS_ROOT")]
        tracks_root: String,
    },

    /// Load and validate a track, then print a summary.
    Load {
        #[arg(long)]
        track: String,

        #[arg(long)]
        distribution_version: String,

        #[arg(long, env = "TRACKS_ROOT")]
        tracks_root: String,

        #[arg(long, env = "MAPPINGS_ROOT")]
        mappings_root: String,

        #[arg(long, env = "DATA_ROOT")]
        data_root: String,

        /// Challenge to show; defaults to the track's default challenge.
        #[arg(long)]
        challenge: Option<String>,

        /// Print the whole track model as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    Builder::new()
        .filter_level(cli.log_level())
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = run(cli.cmd) {
        eprintln!("{}", error_line(&e));
        process::exit(1);
    }
}

/// One-line rendering of `e` with its whole context chain.
fn error_line(e: &anyhow::Error) -> String {
    format!("Error: {e:#}")
}

fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Versions { version } => {
            for candidate in version::versions(&version)? {
                println!("{candidate}");
            }
        }
        Commands::List {
            distribution_version,
            tracks_root,
        } => {
            let repo = TrackRepository::new(tracks_root);
            for name in repo.list_tracks(&distribution_version)? {
                println!("{name}");
            }
        }
        Commands::Load {
            track,
            distribution_version,
            tracks_root,
            mappings_root,
            data_root,
            challenge,
            json,
        } => {
            let repo = TrackRepository::new(tracks_root);
            let loaded = repo.load(&track, &distribution_version, &mappings_root, &data_root)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&loaded)?);
            } else {
                print_summary(&loaded, challenge.as_deref())?;
            }
        }
    }

    Ok(())
}

fn print_summary(track: &Track, challenge: Option<&str>) -> Result<()> {
    println!("Track: {}", track.name);
    println!("  {}", track.short_description);
    if let Some(url) = &track.source_root_url {
        println!("  Data: {url}");
    }

    for index in &track.indices {
        println!("Index: {}", index.name);
        for t in &index.types {
            println!(
                "  Type {}: {} docs, archive {}, mapping {}",
                t.name, t.number_of_documents, t.document_archive, t.mapping_file
            );
        }
    }

    let Some(selected) = track.find_challenge_or_default(challenge) else {
        match challenge {
            Some(name) => anyhow::bail!("track '{}' has no challenge '{}'", track.name, name),
            None => {
                println!("No challenges.");
                return Ok(());
            }
        }
    };

    println!("Challenge: {}", selected.name);
    if let Some(description) = &selected.description {
        println!("  {description}");
    }
    for (i, op) in selected.schedule.iter().enumerate() {
        println!(
            "  {}. {} ({}, {} clients)",
            i + 1,
            op.name,
            op.operation_type,
            op.clients()
        );
    }

    Ok(())
}
