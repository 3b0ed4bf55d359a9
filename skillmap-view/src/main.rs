use clap::Parser;
use serde::Serialize;
use skillmap_core::{
    Dispatcher, FeatureWeights, InputEvent, Session, Transform, UserRecord, ViewportMode,
    ViewportSize, VisualConfig,
};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "skillmap-view")]
#[command(about = "Project user profiles to 2D and print the screen layout as JSON")]
#[command(version)]
struct Args {
    /// JSON array of validated user records
    #[arg(short, long)]
    users: PathBuf,

    /// JSON file with visualization overrides
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Viewport width in pixels
    #[arg(long, default_value = "800")]
    width: f64,

    /// Viewport height in pixels
    #[arg(long, default_value = "600")]
    height: f64,

    #[arg(long, default_value = "1.0")]
    skills_weight: f64,

    #[arg(long, default_value = "1.0")]
    scores_weight: f64,

    #[arg(long, default_value = "1.0")]
    companies_weight: f64,

    /// JSON array of input events to replay before printing
    #[arg(long)]
    events: Option<PathBuf>,

    /// Focus the view on this user id
    #[arg(long)]
    focus: Option<String>,

    /// Milliseconds after the focus starts at which to sample (default: end of animation)
    #[arg(long)]
    at_ms: Option<f64>,

    /// Log level (debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Error)]
enum ViewError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("unknown user id '{0}'")]
    UnknownUser(String),
}

#[derive(Serialize)]
struct Node<'a> {
    id: &'a str,
    name: &'a str,
    x: f64,
    y: f64,
    screen_x: f64,
    screen_y: f64,
}

#[derive(Serialize)]
struct Layout<'a> {
    width: f64,
    height: f64,
    scale: f64,
    offset: [f64; 2],
    animating: bool,
    explained_variance: Option<[f64; 2]>,
    hovered: Option<usize>,
    nodes: Vec<Node<'a>>,
    edges: Vec<(usize, usize)>,
}

fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ViewError> {
    let text = fs::read_to_string(path).map_err(|source| ViewError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ViewError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn load_config(path: Option<&Path>) -> Result<VisualConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(VisualConfig::default());
    };
    let text = fs::read_to_string(path).map_err(|source| ViewError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(VisualConfig::from_json_str(&text)?)
}

fn layout<'a>(session: &'a Session, transform: Transform, hovered: Option<usize>) -> Layout<'a> {
    let viewport = session.viewport();
    let nodes = session
        .users()
        .iter()
        .zip(session.points())
        .map(|(user, point)| {
            let screen = viewport.map_point(*point);
            Node {
                id: &user.id,
                name: &user.name,
                x: point.x,
                y: point.y,
                screen_x: screen.x,
                screen_y: screen.y,
            }
        })
        .collect();

    Layout {
        width: viewport.size().width,
        height: viewport.size().height,
        scale: transform.scale,
        offset: [transform.offset.x, transform.offset.y],
        animating: viewport.mode() == ViewportMode::Animating,
        explained_variance: session.explained_variance_ratio(),
        hovered,
        nodes,
        edges: session.edges(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args.log_level);

    info!("skillmap-view {}", env!("CARGO_PKG_VERSION"));

    let config = load_config(args.config.as_deref())?;
    let users: Vec<UserRecord> = read_json(&args.users)?;
    info!("Loaded {} users from {}", users.len(), args.users.display());

    let weights = FeatureWeights::new(args.skills_weight, args.scores_weight, args.companies_weight);
    let size = ViewportSize::new(args.width, args.height);
    let mut session = Session::with_weights(config, size, weights)?;

    if let Err(e) = session.load_users(users) {
        if !e.is_insufficient_data() {
            return Err(e.into());
        }
        warn!("Nothing to render: {}", e);
    }

    let mut dispatcher = Dispatcher::new();
    let mut clock = 0.0;
    if let Some(path) = &args.events {
        let events: Vec<InputEvent> = read_json(path)?;
        info!("Replaying {} input events", events.len());
        for event in events {
            if let InputEvent::Frame { now } | InputEvent::Click { now, .. } = event {
                clock = now;
            }
            dispatcher.handle(&mut session, event);
        }
    }

    if let Some(id) = &args.focus {
        let index = session
            .index_of(id)
            .ok_or_else(|| ViewError::UnknownUser(id.clone()))?;
        if !session.focus_user(index, clock) {
            warn!("User '{}' has no projected point, skipping focus", id);
        }
        let elapsed = args
            .at_ms
            .unwrap_or(session.viewport().config().focus_duration_ms);
        clock += elapsed.max(0.0);
    }

    let transform = dispatcher.frame(&mut session, clock);
    let out = layout(&session, transform, dispatcher.hovered());
    println!("{}", serde_json::to_string_pretty(&out)?);

    session.teardown();
    Ok(())
}
