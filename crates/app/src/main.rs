use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use clap::{Parser, Subcommand};
use soundboard_core::{
    AppConfig, RodioBackend, SessionEvent, SoundId, SoundLibrary, Soundboard,
};
use tracing_subscriber::EnvFilter;

fn main() -> soundboard_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { sounds_dir } => run_list(&sounds_dir),
        Commands::Play {
            sound,
            sounds_dir,
            volume,
            mute,
        } => run_play(sound, &sounds_dir, volume, mute),
    }
}

fn run_list(sounds_dir: &Path) -> soundboard_core::Result<()> {
    let library = SoundLibrary::with_default_clips(sounds_dir);
    for (id, path) in library.iter() {
        println!("{id}\t{}", path.display());
    }
    Ok(())
}

fn run_play(
    sound: SoundId,
    sounds_dir: &Path,
    volume: f32,
    mute: bool,
) -> soundboard_core::Result<()> {
    tracing::info!(%sound, "playing clip");

    let config = AppConfig::default();
    let library = SoundLibrary::with_default_clips(sounds_dir);
    let mut board = Soundboard::new(&config, library, Box::new(RodioBackend::new()));

    board.set_volume(volume);
    if mute {
        board.toggle_mute();
    }
    board.activate(sound)?;

    // Drive the tick/frame loop at roughly display rate until the clip ends.
    while board.has_session() {
        for event in board.tick() {
            match event {
                SessionEvent::MetadataReady { duration } => {
                    tracing::info!(seconds = duration.as_secs_f64(), "metadata ready");
                }
                SessionEvent::PositionTick { .. } => {
                    let ui = board.ui();
                    tracing::debug!(
                        elapsed = %ui.elapsed,
                        total = %ui.total,
                        fill = ui.fill_percent,
                        "position"
                    );
                }
                SessionEvent::Ended { .. } => {
                    tracing::info!("finished");
                }
            }
        }
        board.frame_tick();
        thread::sleep(Duration::from_millis(16));
    }

    println!("{} / {}", board.ui().elapsed, board.ui().total);
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

fn parse_sound(value: &str) -> Result<SoundId, String> {
    value.parse::<SoundId>().map_err(|err| err.to_string())
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Soundboard with a live waveform display", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the clip table.
    List {
        /// Directory holding the clip files.
        #[arg(short, long, default_value = "sounds")]
        sounds_dir: PathBuf,
    },
    /// Play one clip to completion.
    Play {
        /// Sound to trigger (dog, clap, pop, laugh, bell, horn).
        #[arg(value_parser = parse_sound)]
        sound: SoundId,
        /// Directory holding the clip files.
        #[arg(short, long, default_value = "sounds")]
        sounds_dir: PathBuf,
        /// Playback volume in [0, 1].
        #[arg(short, long, default_value_t = 1.0)]
        volume: f32,
        /// Start muted.
        #[arg(short, long)]
        mute: bool,
    },
}
