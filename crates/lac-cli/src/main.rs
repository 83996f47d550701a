//! LAC CLI - download resources, export the static inference model and run it

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lac_core::{
    Customization, HttpTransport, Lac, LacConfig, PaddleExporter, PaddlePredictor, Segment,
};

#[derive(Parser, Debug)]
#[command(name = "lac", version, about = "LAC resource tool")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download LAC resources and convert the raw LAC model to an inference model
    Download {
        /// Directory for LAC resource files [default: ./lac]
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Segment and tag texts with the exported inference model
    Predict {
        /// Directory for LAC resource files [default: ./lac]
        #[arg(long)]
        path: Option<PathBuf>,

        /// Customization dictionary, one `word[/POS] ...` item per line
        #[arg(long)]
        custom: Option<PathBuf>,

        /// Texts to analyze
        #[arg(required = true)]
        texts: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "lac=info,lac_core=info",
        1 => "lac=debug,lac_core=debug",
        _ => "lac=trace,lac_core=trace,reqwest=debug",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// `--path` takes precedence over every configuration layer
fn with_resource_dir(mut config: LacConfig, path: Option<PathBuf>) -> LacConfig {
    if let Some(path) = path {
        config.resource_dir = path;
    }
    config
}

/// One `word/POS` pair per segment, space separated
fn format_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| format!("{}/{}", s.word, s.pos))
        .collect::<Vec<_>>()
        .join(" ")
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = LacConfig::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Download { path } => {
            let config = with_resource_dir(config, path);

            let transport = HttpTransport::new(config.timeout())?;
            let exporter = PaddleExporter::from_config(&config);

            let summary = lac_core::download(&config, transport, &exporter)
                .with_context(|| format!("preparing {}", config.resource_dir.display()))?;

            info!(
                "Done: {} downloaded, {} reused, {} artifact file(s) under {}",
                summary.fetch.fetched.len(),
                summary.fetch.skipped.len(),
                summary.export.files.len(),
                summary.export.output_prefix.display()
            );
        }
        Commands::Predict { path, custom, texts } => {
            let config = with_resource_dir(config, path);

            let predictor = PaddlePredictor::from_config(&config)?;
            let mut lac = Lac::from_dir(&config.resource_dir, predictor).with_context(|| {
                format!("loading dictionaries from {}", config.resource_dir.display())
            })?;
            if let Some(custom) = custom {
                let customization = Customization::from_file(&custom)
                    .with_context(|| format!("loading customization {}", custom.display()))?;
                lac = lac.with_customization(customization);
            }

            for segments in lac.analyze(&texts[..])? {
                println!("{}", format_segments(&segments));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_path_is_optional() {
        let cli = Cli::try_parse_from(["lac", "download"]).unwrap();
        assert!(matches!(cli.command, Commands::Download { path: None }));

        let cli = Cli::try_parse_from(["lac", "download", "--path", "/tmp/lac_test", "-v"]).unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Download { path } => assert_eq!(path, Some(PathBuf::from("/tmp/lac_test"))),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_path_overrides_configured_dir() {
        let config = LacConfig {
            resource_dir: PathBuf::from("/from/config"),
            ..LacConfig::default()
        };

        let kept = with_resource_dir(config.clone(), None);
        assert_eq!(kept.resource_dir, PathBuf::from("/from/config"));

        let overridden = with_resource_dir(config, Some(PathBuf::from("/from/flag")));
        assert_eq!(overridden.resource_dir, PathBuf::from("/from/flag"));
        assert_eq!(overridden.base_url, lac_core::config::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_predict_arguments() {
        let cli =
            Cli::try_parse_from(["lac", "predict", "--custom", "dict.txt", "我爱北京", "天安门"])
                .unwrap();
        match cli.command {
            Commands::Predict { path, custom, texts } => {
                assert_eq!(path, None);
                assert_eq!(custom, Some(PathBuf::from("dict.txt")));
                assert_eq!(texts, vec!["我爱北京", "天安门"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        assert!(Cli::try_parse_from(["lac", "predict"]).is_err());
    }

    #[test]
    fn test_format_segments() {
        let segments = vec![Segment::new("我", "r", 0, 1), Segment::new("想法", "n", 2, 4)];
        assert_eq!(format_segments(&segments), "我/r 想法/n");
        assert_eq!(format_segments(&[]), "");
    }

    #[test]
    fn test_unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["lac", "train"]).is_err());
        assert!(Cli::try_parse_from(["lac"]).is_err());
    }
}
