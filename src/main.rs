use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use url::Url;

mod api;
mod config;
mod media;
mod render;
mod utils;

use config::{Config, LogFormat};
use media::{MediaResolver, SaveOutcome};
use render::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Video page URL (TikTok, Instagram, YouTube, ...)
    url: String,

    /// Path to the config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format for the resolved links
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Save the Nth listed link (1-based) after resolving
    #[arg(short, long)]
    save: Option<usize>,

    /// Directory to save into
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,
}

fn load_config(args: &Args) -> Result<Config> {
    let config = match config::find_config_path(args.config.as_deref()) {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    Ok(config.with_env_overrides())
}

fn init_logging(format: LogFormat) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

fn validate_input_url(input: &str) -> Result<Url> {
    let url = Url::parse(input.trim()).context("Please enter a valid URL")?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(anyhow::anyhow!(
            "Please enter a valid URL (unsupported scheme: {})",
            scheme
        )),
    }
}

async fn resolve(resolver: &MediaResolver, video_url: &Url) -> Result<media::NormalizedResponse> {
    resolver
        .resolve(video_url.as_str())
        .await
        .map_err(|e| {
            error!("Failed to resolve {}: {}", video_url, e);
            e
        })
        .with_context(|| format!("Download failed for {}. Please try again.", video_url))
}

/// Reports a save result. The fallback URL goes to stdout for text output,
/// but to stderr for JSON so stdout stays a single JSON document.
fn report_save(
    outcome: &SaveOutcome,
    format: OutputFormat,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> std::io::Result<()> {
    match (outcome, format) {
        (SaveOutcome::Saved(path), _) => writeln!(stderr, "Saved to {}", path.display()),
        (SaveOutcome::Fallback(url), OutputFormat::Text) => writeln!(stdout, "{url}"),
        (SaveOutcome::Fallback(url), OutputFormat::Json) => {
            writeln!(stderr, "Open the link directly instead: {url}")
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    init_logging(config.logging.format);
    info!("Starting aiodl...");

    let video_url = validate_input_url(&args.url)?;

    let client = api::AllInOneClient::new(&config.api)?;
    let resolver = MediaResolver::new(Box::new(client));

    let response = resolve(&resolver, &video_url).await?;

    println!("{}", render::render(&response, args.output)?);

    if let Some(index) = args.save {
        let link = index
            .checked_sub(1)
            .and_then(|i| response.links.get(i))
            .with_context(|| {
                format!(
                    "No link #{} to save ({} available)",
                    index,
                    response.links.len()
                )
            })?;

        let http = media::download_client(config.api.timeout_secs, &config.api.user_agent)?;
        let outcome = media::save_link(&http, link, &args.dir).await;
        report_save(
            &outcome,
            args.output,
            &mut std::io::stdout(),
            &mut std::io::stderr(),
        )
        .context("Failed to report save result")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_input_url() {
        assert!(validate_input_url("https://www.tiktok.com/@a/video/1").is_ok());
        assert!(validate_input_url("  http://x.test/v  ").is_ok());
        assert!(validate_input_url("").is_err());
        assert!(validate_input_url("not a url").is_err());
        assert!(validate_input_url("ftp://x.test/v.mp4").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "aiodl",
            "https://x.test/v",
            "--output",
            "json",
            "--save",
            "2",
        ])
        .unwrap();
        assert_eq!(args.url, "https://x.test/v");
        assert_eq!(args.output, OutputFormat::Json);
        assert_eq!(args.save, Some(2));
        assert_eq!(args.dir, PathBuf::from("."));
        assert!(args.config.is_none());
    }

    struct FailingApi;

    #[async_trait::async_trait]
    impl api::DownloadApi for FailingApi {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn fetch(&self, _video_url: &str) -> Result<serde_json::Value, api::ApiError> {
            Err(api::ApiError::NoData)
        }
    }

    #[tokio::test]
    async fn test_resolve_error_is_propagated() {
        let resolver = MediaResolver::new(Box::new(FailingApi));
        let url = Url::parse("https://x.test/v/1").unwrap();

        let err = resolve(&resolver, &url).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Download failed for https://x.test/v/1. Please try again."
        );
        assert!(matches!(
            err.downcast_ref::<api::ApiError>(),
            Some(api::ApiError::NoData)
        ));
    }

    #[test]
    fn test_report_save_fallback_keeps_json_stdout_clean() {
        let outcome = SaveOutcome::Fallback("https://cdn.test/v.mp4".to_string());

        let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());
        report_save(&outcome, OutputFormat::Json, &mut out, &mut err).unwrap();
        assert!(out.is_empty());
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "Open the link directly instead: https://cdn.test/v.mp4\n"
        );

        let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());
        report_save(&outcome, OutputFormat::Text, &mut out, &mut err).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "https://cdn.test/v.mp4\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_report_save_saved_goes_to_stderr() {
        let outcome = SaveOutcome::Saved(PathBuf::from("/tmp/clip.mp4"));

        let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());
        report_save(&outcome, OutputFormat::Json, &mut out, &mut err).unwrap();
        assert!(out.is_empty());
        assert_eq!(String::from_utf8(err).unwrap(), "Saved to /tmp/clip.mp4\n");
    }

    #[test]
    fn test_args_require_url() {
        assert!(Args::try_parse_from(["aiodl"]).is_err());
    }
}
