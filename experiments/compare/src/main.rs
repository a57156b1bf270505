use {
    ab_glyph::FontArc,
    anyhow::{Context, Result, anyhow},
    base::*,
    clap::Parser,
    dispatch::*,
    std::{path::PathBuf, sync::Arc, time::Duration},
    video::{StillImageConfig, TestPatternConfig, VideoIn, VideoInConfig},
};

/// Stream frames to a hand detector over HTTP polling and a WebSocket at the
/// same time and compare the two.
#[derive(Parser, Debug)]
#[command(name = "compare")]
struct Args {
    /// Replay this image instead of the synthetic test pattern
    #[arg(long)]
    image: Option<PathBuf>,

    /// Test pattern width
    #[arg(long, default_value_t = 640)]
    width: usize,

    /// Test pattern height
    #[arg(long, default_value_t = 480)]
    height: usize,

    /// Source frame rate
    #[arg(long, default_value_t = 30.0)]
    frame_rate: f32,

    #[arg(long, default_value = DEFAULT_POLL_URL)]
    poll_url: String,

    #[arg(long, default_value = DEFAULT_STREAM_URL)]
    stream_url: String,

    /// Sampling period in milliseconds
    #[arg(long, default_value_t = 150)]
    interval_ms: u64,

    /// JPEG quality (1-100)
    #[arg(long, default_value_t = 80)]
    quality: u8,

    /// Caption prefix and color of the polling overlay
    #[arg(long, default_value = "HTTP")]
    poll_label: String,

    #[arg(long, default_value = "#00FF00")]
    poll_color: Color,

    /// Caption prefix and color of the streaming overlay
    #[arg(long, default_value = "WS")]
    stream_label: String,

    #[arg(long, default_value = "#00BFFF")]
    stream_color: Color,

    /// Which channels to run: polling, streaming or both
    #[arg(long, default_value = "both")]
    channels: String,

    /// Stop after this many seconds (0 runs until Ctrl-C)
    #[arg(short, long, default_value_t = 0)]
    duration: u64,

    /// TTF/OTF font for overlay captions
    #[arg(long)]
    font: Option<PathBuf>,

    /// Write the final overlays as PNG files into this directory
    #[arg(long)]
    overlay_dir: Option<PathBuf>,

    /// Log into daily files in this directory instead of stdout
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    log_level: Level,
}

fn parse_channels(channels: &str) -> Result<Vec<ChannelKind>> {
    match channels {
        "polling" | "http" => Ok(vec![ChannelKind::Polling]),
        "streaming" | "ws" => Ok(vec![ChannelKind::Streaming]),
        "both" => Ok(vec![ChannelKind::Polling, ChannelKind::Streaming]),
        other => Err(anyhow!("unknown channel selection: {other}")),
    }
}

fn report(session: &Session, config: &DispatchConfig) {
    for kind in [ChannelKind::Polling, ChannelKind::Streaming] {
        let (label, counter) = match kind {
            ChannelKind::Polling => (config.poll_label(), "Requests"),
            ChannelKind::Streaming => (config.stream_label(), "Messages"),
        };
        let m = session.metrics(kind);
        log_info!(
            "{:<5} {:?}: fps {} | latency {}ms | {} {} | errors {}",
            label,
            session.state(kind),
            m.fps,
            m.latency_ms,
            counter,
            m.count,
            m.errors
        );
    }
}

fn save_overlay(canvas: &OverlayCanvas, dir: &std::path::Path, name: &str) -> Result<()> {
    let path = dir.join(format!("{name}.png"));
    canvas
        .snapshot()
        .save(&path)
        .with_context(|| format!("writing {}", path.display()))?;
    log_info!("overlay written to {}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    match &args.log_dir {
        Some(dir) => init_file_logger(dir)?,
        None => init_stdout_logger(),
    }
    base::log::set_max_level(args.log_level);

    let channels = parse_channels(&args.channels)?;
    let config = DispatchConfig::default()
        .with_poll_url(args.poll_url.clone())
        .with_stream_url(args.stream_url.clone())
        .with_interval(Duration::from_millis(args.interval_ms.max(1)))
        .with_jpeg_quality(args.quality)
        .with_poll_label(args.poll_label.clone())
        .with_poll_color(args.poll_color)
        .with_stream_label(args.stream_label.clone())
        .with_stream_color(args.stream_color);

    let video_config = match &args.image {
        Some(path) => VideoInConfig::StillImage(StillImageConfig {
            path: path.clone(),
            frame_rate: args.frame_rate,
        }),
        None => VideoInConfig::TestPattern(TestPatternConfig {
            size: Vec2::new(args.width, args.height),
            frame_rate: args.frame_rate,
        }),
    };
    let video = VideoIn::open(video_config)
        .await
        .map_err(|e| anyhow!("opening video source: {e}"))?;
    log_info!("video source open");

    let font = match &args.font {
        Some(path) => {
            let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            let font = FontArc::try_from_vec(data)
                .map_err(|e| anyhow!("loading {}: {e}", path.display()))?;
            Some(font)
        }
        None => None,
    };
    let canvas = || match &font {
        Some(font) => OverlayCanvas::default().with_font(font.clone()),
        None => OverlayCanvas::default(),
    };
    let poll_canvas = canvas();
    let stream_canvas = canvas();

    let session = Session::remote(
        &config,
        Arc::new(video),
        poll_canvas.clone(),
        stream_canvas.clone(),
    );
    session.wait_ready().await?;

    for kind in &channels {
        session.connect(*kind).await?;
    }

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.tick().await;
    let deadline = (args.duration > 0)
        .then(|| tokio::time::Instant::now() + Duration::from_secs(args.duration));
    let stop = async {
        match deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(stop);

    loop {
        tokio::select! {
            _ = ticker.tick() => report(&session, &config),
            _ = &mut stop => break,
            result = tokio::signal::ctrl_c() => {
                result?;
                log_info!("interrupted");
                break;
            }
        }
    }

    report(&session, &config);
    if let Some(dir) = &args.overlay_dir {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        save_overlay(&poll_canvas, dir, "polling")?;
        save_overlay(&stream_canvas, dir, "streaming")?;
    }
    session.shutdown().await?;
    Ok(())
}
