//! tmdbtr - TMDB translations CLI.

/// Application configuration (TOML).
mod config;
/// Table and JSON output.
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, resolve_config_path};
use crate::render::{OutputFormat, render, resolve_languages};
use tmdbtr_api::tmdb::{
    Identifiable, LocalTmdbApi, Movie, TmdbClient, TranslationsCollection, TvEpisode, TvSeason,
    TvSeries, decode,
};

/// Environment variable holding the TMDB API read access token.
const TOKEN_ENV: &str = "TMDB_API_TOKEN";

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Fetch translations from TMDB.
    Translations(TranslationsCommand),
    /// Decode a translations JSON file without contacting TMDB.
    Decode(DecodeArgs),
    /// Show or edit the configuration.
    Config(ConfigCommand),
}

/// Arguments for the `translations` subcommand.
#[derive(clap::Args)]
struct TranslationsCommand {
    /// Translations subcommand to run.
    #[command(subcommand)]
    command: TranslationsSubcommands,
}

/// Available translations subcommands.
#[derive(Subcommand)]
enum TranslationsSubcommands {
    /// Translations of a movie.
    Movie(MovieArgs),
    /// Translations of a TV series.
    Tv(TvArgs),
    /// Translations of a TV season.
    Season(SeasonArgs),
    /// Translations of a TV episode.
    Episode(EpisodeArgs),
}

/// Output options shared by every translations command.
#[derive(clap::Args)]
struct OutputArgs {
    /// ISO 639-1 language filter (e.g. "en,ja"). Falls back to config languages if omitted.
    #[arg(long, value_delimiter = ',')]
    language: Vec<String>,
    /// Print the re-encoded JSON instead of a table.
    #[arg(long)]
    json: bool,
}

impl OutputArgs {
    /// Returns the selected output format.
    const fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        }
    }
}

/// Arguments for the `translations movie` subcommand.
#[derive(clap::Args)]
struct MovieArgs {
    /// TMDB movie ID (e.g. 24428).
    #[arg(long, required = true)]
    id: u64,
    #[command(flatten)]
    output: OutputArgs,
}

/// Arguments for the `translations tv` subcommand.
#[derive(clap::Args)]
struct TvArgs {
    /// TMDB series ID (e.g. 1399).
    #[arg(long, required = true)]
    id: u64,
    #[command(flatten)]
    output: OutputArgs,
}

/// Arguments for the `translations season` subcommand.
#[derive(clap::Args)]
struct SeasonArgs {
    /// TMDB series ID.
    #[arg(long, required = true)]
    id: u64,
    /// Season number (0 = specials).
    #[arg(long, required = true)]
    season: u32,
    #[command(flatten)]
    output: OutputArgs,
}

/// Arguments for the `translations episode` subcommand.
#[derive(clap::Args)]
struct EpisodeArgs {
    /// TMDB series ID.
    #[arg(long, required = true)]
    id: u64,
    /// Season number.
    #[arg(long, required = true)]
    season: u32,
    /// Episode number.
    #[arg(long, required = true)]
    episode: u32,
    #[command(flatten)]
    output: OutputArgs,
}

/// Media kind of a translations document.
#[derive(Clone, Copy, ValueEnum)]
enum MediaKind {
    /// `movie/{id}/translations`.
    Movie,
    /// `tv/{id}/translations`.
    Tv,
    /// `tv/{id}/season/{n}/translations`.
    Season,
    /// `tv/{id}/season/{n}/episode/{e}/translations`.
    Episode,
}

/// Arguments for the `decode` subcommand.
#[derive(clap::Args)]
struct DecodeArgs {
    /// Media kind the document belongs to.
    #[arg(long, value_enum, default_value = "movie")]
    kind: MediaKind,
    /// Path to the JSON document.
    #[arg(long, required = true)]
    file: PathBuf,
    #[command(flatten)]
    output: OutputArgs,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show the current configuration.
    Show,
    /// Set the default language filter (e.g. "en,ja"; empty clears it).
    Languages(ConfigLanguagesArgs),
}

/// Arguments for the `config languages` subcommand.
#[derive(clap::Args)]
struct ConfigLanguagesArgs {
    /// ISO 639-1 codes.
    #[arg(value_delimiter = ',')]
    codes: Vec<String>,
}

/// Loads the config from `--dir` or the default location.
fn load_config(dir: Option<&PathBuf>) -> Result<(PathBuf, AppConfig)> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;
    Ok((config_path, config))
}

/// Picks the API token from `TMDB_API_TOKEN`, then the config file.
///
/// # Errors
///
/// Returns an error if neither source provides a non-empty token.
fn resolve_api_token(env_token: Option<String>, config: &AppConfig) -> Result<String> {
    if let Some(token) = env_token.filter(|t| !t.is_empty()) {
        return Ok(token);
    }
    match config.tmdb.api_token.as_deref() {
        Some(token) if !token.is_empty() => Ok(String::from(token)),
        _ => bail!("{TOKEN_ENV} environment variable (or tmdb.api_token in config) is required"),
    }
}

/// Builds a `TmdbClient` from the resolved API token.
///
/// # Errors
///
/// Returns an error if no token is available or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &AppConfig) -> Result<TmdbClient> {
    let api_token = resolve_api_token(std::env::var(TOKEN_ENV).ok(), config)?;

    TmdbClient::builder()
        .api_token(api_token)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context("failed to build TMDB client")
}

/// Renders a collection with the language filter resolved against config.
fn output<Item: Identifiable>(
    collection: &TranslationsCollection<Item>,
    args: &OutputArgs,
    config: &AppConfig,
) -> Result<()> {
    let languages = resolve_languages(&args.language, &config.translations.languages);
    render(collection, languages, args.format())
}

/// Runs the `translations` subcommands.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_translations(cmd: &TranslationsSubcommands, dir: Option<&PathBuf>) -> Result<()> {
    let (_, config) = load_config(dir)?;
    let client = build_tmdb_client(&config)?;

    match cmd {
        TranslationsSubcommands::Movie(args) => {
            let collection = client
                .movie_translations(args.id)
                .await
                .context("TMDB movie translations request failed")?;
            output(&collection, &args.output, &config)
        }
        TranslationsSubcommands::Tv(args) => {
            let collection = client
                .tv_series_translations(args.id)
                .await
                .context("TMDB tv translations request failed")?;
            output(&collection, &args.output, &config)
        }
        TranslationsSubcommands::Season(args) => {
            let collection = client
                .tv_season_translations(args.id, args.season)
                .await
                .context("TMDB tv season translations request failed")?;
            output(&collection, &args.output, &config)
        }
        TranslationsSubcommands::Episode(args) => {
            let collection = client
                .tv_episode_translations(args.id, args.season, args.episode)
                .await
                .context("TMDB tv episode translations request failed")?;
            output(&collection, &args.output, &config)
        }
    }
}

/// Decodes `bytes` as a collection of `Item` and renders it.
fn decode_and_output<Item: Identifiable>(
    bytes: &[u8],
    args: &DecodeArgs,
    config: &AppConfig,
) -> Result<()> {
    let collection: TranslationsCollection<Item> = decode(bytes)
        .with_context(|| format!("failed to decode {}", args.file.display()))?;
    output(&collection, &args.output, config)
}

/// Runs the `decode` subcommand.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not decode.
#[instrument(skip_all)]
fn run_decode(args: &DecodeArgs, dir: Option<&PathBuf>) -> Result<()> {
    let (_, config) = load_config(dir)?;
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    match args.kind {
        MediaKind::Movie => decode_and_output::<Movie>(&bytes, args, &config),
        MediaKind::Tv => decode_and_output::<TvSeries>(&bytes, args, &config),
        MediaKind::Season => decode_and_output::<TvSeason>(&bytes, args, &config),
        MediaKind::Episode => decode_and_output::<TvEpisode>(&bytes, args, &config),
    }
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded.
#[instrument(skip_all)]
fn run_config_show(dir: Option<&PathBuf>) -> Result<()> {
    let (config_path, config) = load_config(dir)?;

    tracing::info!("Config: {}", config_path.display());
    tracing::info!(
        "API token: {}",
        if config.tmdb.api_token.is_some() {
            "set"
        } else {
            "not set"
        }
    );
    if config.translations.languages.is_empty() {
        tracing::info!("Languages: (all)");
    } else {
        tracing::info!("Languages: {}", config.translations.languages.join(","));
    }

    Ok(())
}

/// Runs the `config languages` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or saved.
#[instrument(skip_all)]
fn run_config_languages(args: &ConfigLanguagesArgs, dir: Option<&PathBuf>) -> Result<()> {
    let (config_path, mut config) = load_config(dir)?;

    config.translations.languages = args
        .codes
        .iter()
        .map(|c| c.trim().to_ascii_lowercase())
        .filter(|c| !c.is_empty())
        .collect();
    config.save(&config_path).context("failed to save config")?;
    tracing::info!(
        "Saved {} language(s) to {}",
        config.translations.languages.len(),
        config_path.display()
    );

    Ok(())
}

/// Installs the global tracing subscriber.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    #[cfg(not(feature = "otel"))]
    {
        fmt().with_env_filter(env_filter).with_target(false).init();
    }

    #[cfg(feature = "otel")]
    {
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let dir = cli.dir.as_ref();
    match cli.command {
        Commands::Translations(cmd) => run_translations(&cmd.command, dir).await,
        Commands::Decode(args) => run_decode(&args, dir),
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Show => run_config_show(dir),
            ConfigSubcommands::Languages(args) => run_config_languages(&args, dir),
        },
    }
}
