use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use hifitime::Epoch;
use tracing::{error, Level};

use iss_tracker::{
    config::TrackerConfig,
    env_state::TrackerEnv,
    epoch_index::parse_range_bound,
    feed::{feed_source_from_config, load_dataset},
    place::{NoGeocoder, NominatimResolver, PlaceResolver},
    response::ResponseValue,
    time::epoch_from_calendar,
    tracker::IssTracker,
    tracker_errors::TrackerError,
};

/// Query the International Space Station trajectory published by NASA.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Opts {
    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, default_value = "warn")]
    loglevel: Level,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<Utf8PathBuf>,

    /// Read the feed from this file instead of downloading it
    #[arg(long)]
    feed_path: Option<Utf8PathBuf>,

    /// Download the feed from this URL
    #[arg(long)]
    feed_url: Option<String>,

    /// Do not resolve the region under the station
    #[arg(long)]
    no_geocoder: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the state vectors, optionally restricted to positions [offset, limit)
    Epochs {
        #[arg(long, allow_hyphen_values = true)]
        offset: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        limit: Option<String>,
    },
    /// State vector at an epoch, e.g. 2024-069T02:26:00.000Z
    Epoch { epoch: String },
    /// Speed at an epoch
    Speed { epoch: String },
    /// Latitude, longitude, altitude and region at an epoch
    Location { epoch: String },
    /// Everything about the state vector closest to now
    Now {
        /// Use this ISO 8601 instant instead of the current time, e.g. 2024-03-09T02:27:00Z
        #[arg(long)]
        at: Option<String>,
    },
    /// Comment lines of the feed
    Comment,
    /// Header block of the feed
    Header,
    /// Metadata block of the feed
    Metadata,
    /// First and last epochs of the feed
    Span,
    /// Mean speed over the whole feed
    AverageSpeed,
}

fn load_config(opts: &Opts) -> Result<TrackerConfig, TrackerError> {
    let mut config = match &opts.config {
        Some(path) => TrackerConfig::load(path)?,
        None => TrackerConfig::default(),
    };
    if let Some(url) = &opts.feed_url {
        config.feed_url = url.clone();
        config.feed_path = None;
    }
    if let Some(path) = &opts.feed_path {
        config.feed_path = Some(path.clone());
    }
    if opts.no_geocoder {
        config.geocoder_url = None;
    }
    Ok(config)
}

fn place_resolver(config: &TrackerConfig, env: &TrackerEnv) -> Box<dyn PlaceResolver> {
    match &config.geocoder_url {
        Some(url) => Box::new(NominatimResolver::new(env.clone(), url.clone())),
        None => Box::new(NoGeocoder),
    }
}

fn current_epoch() -> Result<Epoch, TrackerError> {
    Epoch::now().map_err(|e| TrackerError::InvalidEpoch(format!("system clock: {e}")))
}

fn run(opts: &Opts) -> Result<ResponseValue, TrackerError> {
    let config = load_config(opts)?;
    let env = TrackerEnv::new(&config)?;

    let dataset = load_dataset(feed_source_from_config(&config, &env).as_ref())?;
    let tracker = IssTracker::new(dataset);
    let resolver = place_resolver(&config, &env);

    match &opts.command {
        Command::Epochs { offset, limit } => {
            let offset = parse_range_bound("offset", offset.as_deref())?;
            let limit = parse_range_bound("limit", limit.as_deref())?;
            Ok(tracker.epochs_range(offset, limit))
        }
        Command::Epoch { epoch } => tracker.state_vector(epoch),
        Command::Speed { epoch } => tracker.speed(epoch),
        Command::Location { epoch } => tracker.location(epoch, resolver.as_ref()),
        Command::Now { at } => {
            let now = match at {
                Some(text) => epoch_from_calendar(text)?,
                None => current_epoch()?,
            };
            tracker.now(&now, resolver.as_ref())
        }
        Command::Comment => Ok(tracker.comments()),
        Command::Header => Ok(tracker.header()),
        Command::Metadata => Ok(tracker.metadata()),
        Command::Span => tracker.span(),
        Command::AverageSpeed => tracker.average_speed(),
    }
}

fn main() -> ExitCode {
    let opts = Opts::parse();

    tracing_subscriber::fmt()
        .with_max_level(opts.loglevel)
        .with_writer(std::io::stderr)
        .init();

    let response = match run(&opts) {
        Ok(response) => response,
        Err(err) => {
            error!("{err}");
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&response) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("unable to serialize the response: {err}");
            ExitCode::FAILURE
        }
    }
}
