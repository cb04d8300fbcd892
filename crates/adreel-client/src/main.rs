//! `adreel`: upload videos, watch analysis, pick scenes and order ad cuts.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use adreel_client::{
    check_local_file, default_history_path, watch_status, HistoryStore, RelayClient, StatusView,
    DEFAULT_SERVER,
};
use adreel_models::{
    auto_select, format_bytes, AspectRatio, CaptionStyle, EditRequest, HistoryEntry, SceneId, SceneSelection,
    SizeCheck, VideoId, VideoStatus,
};

#[derive(Parser)]
#[command(name = "adreel")]
#[command(about = "Turn long videos into short ad cuts with AI scene analysis")]
struct Cli {
    /// Relay server address
    #[arg(long, env = "ADREEL_SERVER", default_value = DEFAULT_SERVER, global = true)]
    server: String,

    /// Upload history file
    #[arg(long, global = true)]
    history_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a video file or URL for analysis
    Upload(UploadArgs),
    /// Show the current status of a video once
    Status { video_id: String },
    /// Poll a video's status until analysis finishes
    Watch(WatchArgs),
    /// Show the analyzed scene timeline and the automatic selection
    Scenes { video_id: String },
    /// List ad templates
    Templates,
    /// Order ad cuts from a completed video
    Edit(EditArgs),
    /// Show or clear the local upload history
    History {
        /// Remove every entry
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Args)]
struct UploadArgs {
    /// Local video file
    #[arg(conflicts_with = "url", required_unless_present = "url")]
    file: Option<PathBuf>,

    /// Video URL instead of a file
    #[arg(long)]
    url: Option<String>,

    /// Keep polling until analysis finishes
    #[arg(short, long)]
    watch: bool,

    /// Seconds between status checks
    #[arg(long, default_value_t = 2.0)]
    interval: f64,
}

#[derive(Args)]
struct WatchArgs {
    video_id: String,

    /// Seconds between status checks
    #[arg(long, default_value_t = 2.0)]
    interval: f64,
}

#[derive(Args)]
struct EditArgs {
    video_id: String,

    /// Template id (see `adreel templates`)
    #[arg(short, long)]
    template: Option<String>,

    /// Scene ids to use; defaults to the automatic selection
    #[arg(short, long, value_delimiter = ',')]
    scenes: Vec<SceneId>,

    /// Aspect ratios like 9:16, when not using a template
    #[arg(long = "ratio", value_delimiter = ',')]
    ratios: Vec<AspectRatio>,

    /// Target durations in seconds, when not using a template
    #[arg(long = "duration", value_delimiter = ',')]
    durations: Vec<u32>,

    /// Caption style, when not using a template
    #[arg(long, default_value = "minimal")]
    caption: CaptionStyle,
}

fn status_label(status: VideoStatus) -> console::StyledObject<&'static str> {
    match status {
        VideoStatus::Completed => style(status.as_str()).green().bold(),
        VideoStatus::Error => style(status.as_str()).red().bold(),
        _ => style(status.as_str()).yellow(),
    }
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(100);
    let style = ProgressStyle::with_template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos:>3}% {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn interval_from_secs(secs: f64) -> Result<Duration> {
    if !(secs.is_finite() && secs > 0.0) {
        bail!("--interval must be a positive number of seconds");
    }
    Ok(Duration::from_secs_f64(secs))
}

fn print_status(status: &StatusView) {
    println!(
        "{} {} {:>3}% {}",
        style(&status.id).bold(),
        status_label(status.status),
        status.progress,
        status.message
    );
    if let Some(error) = &status.error {
        println!("  {} {}", style("error:").red(), error);
    }
}

async fn watch(client: &RelayClient, history: &HistoryStore, video_id: &VideoId, interval: Duration) -> Result<()> {
    let pb = progress_bar();
    pb.set_message("Waiting for analysis...");

    let cancel = async {
        // Without a signal handler there is nothing to cancel on
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    let result = watch_status(client, video_id, interval, cancel, |status| {
        pb.set_position(status.progress as u64);
        pb.set_message(format!("{} {}", status.status, status.message));
        if let Err(e) = history.update_status(&status.id, status.status) {
            tracing::warn!("Could not update history: {}", e);
        }
    })
    .await;

    match result {
        Ok(last) => {
            pb.finish_and_clear();
            print_status(&last);
            if last.status == VideoStatus::Error {
                bail!("Analysis failed");
            }
            Ok(())
        }
        Err(e) => {
            pb.abandon_with_message(format!("{}", style("stopped").dim()));
            Err(e.into())
        }
    }
}

async fn upload(client: &RelayClient, history: &HistoryStore, args: UploadArgs) -> Result<()> {
    let interval = interval_from_secs(args.interval)?;

    let spinner = ProgressBar::new_spinner();
    spinner.enable_steady_tick(Duration::from_millis(80));

    let (video_id, entry_source) = match (&args.file, &args.url) {
        (Some(path), _) => {
            let size = std::fs::metadata(path)
                .with_context(|| format!("Cannot read {}", path.display()))?
                .len();
            if check_local_file(path, size)? == SizeCheck::Warning {
                println!(
                    "{} {} is large ({}); upload and analysis may take a while",
                    style("warning:").yellow().bold(),
                    path.display(),
                    format_bytes(size)
                );
            }
            spinner.set_message(format!("Uploading {} ({})...", path.display(), format_bytes(size)));
            let id = client.upload_file(path).await?;
            let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
            (id, (name, None))
        }
        (None, Some(url)) => {
            spinner.set_message(format!("Submitting {}...", url));
            (client.upload_url(url).await?, (None, Some(url.clone())))
        }
        (None, None) => bail!("Give a file path or --url"),
    };
    spinner.finish_and_clear();

    let mut entry = HistoryEntry::new(video_id.clone(), VideoStatus::Processing);
    entry.filename = entry_source.0;
    entry.url = entry_source.1;
    history.record(entry)?;

    println!("{} Submitted as {}", style("✓").green().bold(), style(&video_id).bold());

    if args.watch {
        watch(client, history, &video_id, interval).await?;
    }
    Ok(())
}

async fn scenes(client: &RelayClient, video_id: &VideoId) -> Result<()> {
    let details = client.details(video_id).await?;
    if details.scenes.is_empty() {
        println!("No scenes were found in the analysis.");
        return Ok(());
    }

    let selection = SceneSelection::auto(&details.scenes);
    for scene in &details.scenes {
        let marker = if selection.contains(scene.id) {
            style("●").green()
        } else {
            style("○").dim()
        };
        println!(
            "{} #{:<3} {:>6.1}s - {:>6.1}s  {:<8} {}",
            marker,
            scene.id,
            scene.start,
            scene.end,
            scene.sentiment,
            scene.transcript.as_deref().unwrap_or("")
        );
        if !scene.tags.is_empty() {
            println!("        {}", style(scene.tags.join(", ")).dim());
        }
    }
    println!(
        "\nAuto-selected {} scene(s), {:.1}s total: {:?}",
        selection.len(),
        selection.total_duration(&details.scenes),
        selection.ids()
    );
    Ok(())
}

async fn templates(client: &RelayClient) -> Result<()> {
    for template in client.templates().await? {
        let ratios: Vec<String> = template.aspect_ratios.iter().map(|r| r.to_string()).collect();
        let durations: Vec<String> = template.durations.iter().map(|d| format!("{}s", d)).collect();
        println!(
            "{:<16} {}  {}",
            style(&template.id).cyan().bold(),
            template.name,
            style(&template.description).dim()
        );
        println!(
            "{:<16} {} x {}, {} captions, {} file(s)",
            "",
            ratios.join(" "),
            durations.join(" "),
            template.caption_style,
            template.output_count()
        );
    }
    Ok(())
}

async fn edit(client: &RelayClient, args: EditArgs) -> Result<()> {
    let video_id = VideoId::from(args.video_id);

    let scene_ids = if args.scenes.is_empty() {
        let details = client.details(&video_id).await?;
        let picked = auto_select(&details.scenes);
        if picked.is_empty() {
            bail!("The video has no scenes to cut from");
        }
        println!("Using automatic selection: {:?}", picked);
        picked
    } else {
        args.scenes
    };

    let request = match &args.template {
        Some(id) => {
            let templates = client.templates().await?;
            let template = templates
                .iter()
                .find(|t| t.id.eq_ignore_ascii_case(id))
                .with_context(|| format!("Unknown template: {}", id))?;
            EditRequest::from_template(video_id, scene_ids, template)
        }
        None => EditRequest {
            video_id,
            scene_ids,
            aspect_ratios: args.ratios,
            durations: args.durations,
            caption_style: args.caption,
            template_id: None,
        },
    };
    if let Err(e) = request.validate() {
        bail!(e);
    }

    let response = client.create_edit(&request).await?;
    println!(
        "{} Edit job {} {}",
        style("✓").green().bold(),
        style(&response.job_id).bold(),
        response.status
    );
    for file in &response.files {
        println!(
            "  {:<40} {:>5} {:>5.1}s  scenes {:?}",
            file.path, file.aspect_ratio, file.actual_duration, file.scene_ids
        );
    }
    Ok(())
}

fn show_history(history: &HistoryStore, clear: bool) -> Result<()> {
    if clear {
        history.clear()?;
        println!("History cleared ({})", history.path().display());
        return Ok(());
    }

    let entries = history.load()?;
    if entries.is_empty() {
        println!("No uploads yet.");
        return Ok(());
    }
    for entry in entries.entries() {
        println!(
            "{}  {:<10} {}  {}",
            style(&entry.video_id).bold(),
            status_label(entry.status),
            style(entry.created_at.format("%Y-%m-%d %H:%M")).dim(),
            entry.label()
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let client = RelayClient::new(&cli.server)?;
    let history = HistoryStore::new(cli.history_file.unwrap_or_else(default_history_path));

    match cli.command {
        Command::Upload(args) => upload(&client, &history, args).await,
        Command::Status { video_id } => {
            let status = client.status(&VideoId::from(video_id)).await?;
            history.update_status(&status.id, status.status)?;
            print_status(&status);
            Ok(())
        }
        Command::Watch(args) => {
            let interval = interval_from_secs(args.interval)?;
            watch(&client, &history, &VideoId::from(args.video_id), interval).await
        }
        Command::Scenes { video_id } => scenes(&client, &VideoId::from(video_id)).await,
        Command::Templates => templates(&client).await,
        Command::Edit(args) => edit(&client, args).await,
        Command::History { clear } => show_history(&history, clear),
    }
}
