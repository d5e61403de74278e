//! pagebrief CLI: summarize typed text or PDF files.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use pagebrief::animation::AnimationSet;
use pagebrief::config::AppConfig;
use pagebrief::document::Document;
use pagebrief::export::{AnalysisExport, SaveRequest, keyword_exports, save_requested};
use pagebrief::input::{self, InputError};
use pagebrief::keywords::{KeywordExtractor, RakeExtractor};
use pagebrief::message::{JsonSink, Notice, NoticeSink, StdoutSink};
use pagebrief::paths::AppPaths;
use pagebrief::pipeline::{Pipeline, RunOutcome, Session};
use pagebrief::summarize::SummaryLengthProfile;
use pagebrief::tui::BriefTui;

#[derive(Parser)]
#[command(
    name = "pagebrief",
    version,
    about = "Summarize text or PDFs: model summary, RAKE keywords and a word cloud"
)]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/pagebrief/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Skip fetching the decorative animations.
    #[arg(long, global = true)]
    offline: bool,

    /// Emit notices and results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where the text comes from. Without any flag, stdin is read.
#[derive(Args)]
#[group(multiple = false)]
struct InputArgs {
    /// PDF file to extract.
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Any file: PDFs are extracted, everything else is read as text.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Text to use verbatim.
    #[arg(long)]
    text: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize, rank keywords and render the word cloud.
    Summarize {
        #[command(flatten)]
        input: InputArgs,

        /// Summary length: short, medium or long.
        #[arg(long, default_value = "short")]
        length: SummaryLengthProfile,

        /// Directory for summary.txt (default: [output] dir).
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Also write the summary to summary.txt.
        #[arg(long)]
        download: bool,

        /// Save the word cloud as a PNG at this path.
        #[arg(long, value_name = "PATH")]
        cloud: Option<PathBuf>,
    },

    /// Rank keyword phrases only (no model call).
    Keywords {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Print the extracted text with its word and character counts.
    Extract {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Open the interactive terminal UI.
    Tui {
        /// Directory for downloads (default: [output] dir).
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Manage the config file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write the default config file (fails if it exists, unless --force).
    Init {
        #[arg(long)]
        force: bool,
    },
    /// Print the effective config as TOML.
    Show,
    /// Print the config file path.
    Path,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    let cli = Cli::parse();
    let paths = AppPaths::resolve()?;

    // The TUI owns the terminal, so its logs go to a file.
    if matches!(cli.command, Commands::Tui { .. }) {
        paths.ensure_dirs()?;
        let log = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(paths.log_file())
            .into_diagnostic()?;
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(log))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .init();
    }

    let config_path = cli.config.clone().unwrap_or_else(|| paths.config_file());
    let config = AppConfig::load_or_default(&config_path)?;
    let sink: Box<dyn NoticeSink> = if cli.json {
        Box::new(JsonSink)
    } else {
        Box::new(StdoutSink)
    };

    match cli.command {
        Commands::Summarize {
            input,
            length,
            out_dir,
            download,
            cloud,
        } => {
            let document = read_input(&input)?;
            if !cli.json {
                if let Some(stats) = document.stats() {
                    println!("Input {stats}");
                }
            }
            let request = SaveRequest {
                cloud,
                summary_dir: download.then(|| out_dir.unwrap_or_else(|| config.output.dir.clone())),
            };
            let pipeline = Pipeline::from_config(&config)?;

            let mut session = Session::new();
            session.ingest(document, sink.as_ref());
            session.summarize(&pipeline, length, sink.as_ref());

            let analysis = match session.into_outcome() {
                Some(RunOutcome::Completed(analysis)) => analysis,
                Some(RunOutcome::Failed(err)) => return Err(err.into()),
                // Blank input: the warning has been shown.
                None => std::process::exit(1),
            };

            if cli.json {
                let saved = save_requested(&analysis, &request, sink.as_ref());
                let export = AnalysisExport::from_analysis(&analysis, saved.cloud);
                println!("{}", serde_json::to_string_pretty(&export).into_diagnostic()?);
            } else {
                println!("\nSummary ({}):", analysis.summary.profile());
                println!("{}", analysis.summary.text());
                println!("{}", analysis.summary.stats());
                if !analysis.keywords.is_empty() {
                    println!("\nTop Keywords from the Text:");
                    for (i, phrase) in analysis.keywords.phrases().enumerate() {
                        println!("  {}. {phrase}", i + 1);
                    }
                }
                let saved = save_requested(&analysis, &request, sink.as_ref());
                if let Some(path) = saved.cloud {
                    println!("\nWord cloud: {}", path.display());
                }
            }
        }

        Commands::Keywords { input } => {
            let document = read_input(&input)?;
            let keywords = RakeExtractor::new().extract(document.text());
            if cli.json {
                let export = keyword_exports(keywords.iter());
                println!("{}", serde_json::to_string_pretty(&export).into_diagnostic()?);
            } else if keywords.is_empty() {
                sink.emit(&Notice::info(pagebrief::pipeline::NO_KEYWORDS));
            } else {
                for (i, k) in keywords.iter().enumerate() {
                    println!("  {}. {} ({:.2})", i + 1, k.phrase, k.score);
                }
            }
        }

        Commands::Extract { input } => {
            let document = read_input(&input)?;
            if cli.json {
                let value = serde_json::json!({
                    "source": document.source().to_string(),
                    "text": document.text(),
                    "stats": document.stats(),
                });
                println!("{}", serde_json::to_string_pretty(&value).into_diagnostic()?);
            } else {
                println!("{}", document.text());
                if let Some(stats) = document.stats() {
                    println!("\nInput {stats}");
                }
            }
        }

        Commands::Tui { out_dir } => {
            let pipeline = Pipeline::from_config(&config)?;
            let animations = if cli.offline {
                AnimationSet::none()
            } else {
                AnimationSet::fetch(&config.animations)
            };
            let out_dir = out_dir.unwrap_or_else(|| config.output.dir.clone());
            tracing::info!(backend = pipeline.summarizer_name(), "starting TUI");
            BriefTui::new(pipeline, animations, out_dir).run()?;
        }

        Commands::Config { action } => match action {
            ConfigAction::Init { force } => {
                if config_path.exists() && !force {
                    miette::bail!(
                        "config already exists at {} (use --force to overwrite)",
                        config_path.display()
                    );
                }
                AppConfig::default().save(&config_path)?;
                println!("Wrote {}", config_path.display());
            }
            ConfigAction::Show => print!("{}", config.to_toml()?),
            ConfigAction::Path => println!("{}", config_path.display()),
        },
    }

    Ok(())
}

fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}

/// Resolve the input flags into a document.
fn read_input(args: &InputArgs) -> Result<Document> {
    if let Some(path) = &args.pdf {
        let data = read_file(path)?;
        return Ok(input::from_pdf_bytes(&data, &display_name(path))?);
    }
    if let Some(path) = &args.file {
        return Ok(input::load_file(path)?);
    }
    if let Some(text) = &args.text {
        return Ok(input::typed(text.clone()));
    }
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .map_err(|e| InputError::Io {
            path: "<stdin>".into(),
            source: e,
        })?;
    Ok(input::typed(text))
}

fn read_file(path: &Path) -> std::result::Result<Vec<u8>, InputError> {
    std::fs::read(path).map_err(|e| InputError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
