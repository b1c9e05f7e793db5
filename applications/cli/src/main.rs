/// Cadence - search and play streamed audio from the terminal
use anyhow::Context;
use cadence::config::AppConfig;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Search and play streamed audio from the terminal", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CADENCE_CONFIG")]
    config: Option<PathBuf>,

    /// Playlist file to load at startup
    #[arg(short, long)]
    playlist: Option<PathBuf>,

    /// Only play songs shorter than five minutes
    #[arg(long)]
    short_songs: bool,

    /// Repeat the current track instead of continuing with the playlist
    #[arg(long)]
    no_autoplay: bool,

    /// Shuffle the playlist
    #[arg(long)]
    shuffle: bool,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they do not interleave with command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence=info,cadence_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if cli.short_songs {
        config.playback.short_song_filter = true;
    }
    if cli.no_autoplay {
        config.playback.autoplay = false;
    }
    if cli.shuffle {
        config.playback.shuffle = true;
    }
    config.validate()?;

    run(config, cli.playlist)
}

#[cfg(unix)]
fn run(config: AppConfig, playlist: Option<PathBuf>) -> anyhow::Result<()> {
    use cadence::{app, device::MpvDevice, resolver::YtDlpResolver};
    use cadence_playback::PlaybackController;

    let resolver = YtDlpResolver::new(config.resolver.yt_dlp_path.clone());
    let device = MpvDevice::spawn(&config.device).context("Failed to start mpv")?;
    let mut controller = PlaybackController::new(config.playback.clone(), resolver, device);

    if let Some(path) = playlist {
        let tracks = cadence_storage::playlists::load_playlist(&path)
            .with_context(|| format!("Failed to load playlist {}", path.display()))?;
        controller.load_playlist(tracks);
    }

    tracing::info!("Cadence ready");
    println!("Type `help` for commands.");

    let input = app::spawn_stdin_reader();
    let mut stdout = std::io::stdout();
    app::run_loop(&mut controller, input, config.poll_interval(), &mut stdout)?;

    Ok(())
}

#[cfg(not(unix))]
fn run(_config: AppConfig, _playlist: Option<PathBuf>) -> anyhow::Result<()> {
    anyhow::bail!("The mpv playback device needs a unix platform")
}
