// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use repo_tutor::utils::logging::{format_error, format_info, format_step, format_success};
use repo_tutor::{
    BundleExporter, ChapterCatalog, Config, OpenAiChatClient, PipelineContext,
    PipelineOrchestrator, TutorialRequest, fetcher_for,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "repo_tutor")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Generate a beginner-friendly tutorial series from a code repository", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Also write every debug event, prompts and responses included, to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone)]
struct SourceArgs {
    /// GitHub URL, `owner/repo`, or a local directory
    #[arg(short, long)]
    repo: Option<String>,

    /// GitHub token for private repositories or higher rate limits
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[arg(long)]
    project_name: Option<String>,

    #[arg(long)]
    language: Option<String>,

    #[arg(long, value_name = "NUM")]
    max_abstractions: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, extract abstractions, and write one chapter per abstraction
    Generate {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Package the chapters into an archive afterwards
        #[arg(long)]
        bundle: bool,
    },

    /// Fetch and extract only, printing the abstractions as JSON
    Extract {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(short, long)]
        pretty: bool,
    },

    /// List generated chapters with their titles
    Chapters {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Package generated chapters into a tar archive
    Bundle {
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long, value_name = "FILE")]
        archive: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if !cli.color {
        colored::control::set_override(false);
    }

    if let Err(e) =
        repo_tutor::utils::logging::init_logger(cli.color, cli.verbose, cli.log_file.as_deref())
    {
        eprintln!("{}", format_error(&format!("Failed to initialize logging: {e}")));
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("{}", format_error(&format!("{e:#}")));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    info!("Repo Tutor");
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::default_config()
    };

    match cli.command {
        Commands::Generate {
            source,
            output,
            bundle,
        } => cmd_generate(&config, source, output, bundle).await,
        Commands::Extract { source, pretty } => cmd_extract(&config, source, pretty).await,
        Commands::Chapters { output } => cmd_chapters(&config, output),
        Commands::Bundle { output, archive } => cmd_bundle(&config, output, archive),
    }
}

fn build_request(config: &Config, source: SourceArgs) -> TutorialRequest {
    let repository = source
        .repo
        .unwrap_or_else(|| config.repository.source.clone());
    let mut request = TutorialRequest::from_config(config, repository);

    if source.token.is_some() {
        request.credential = source.token;
    }
    if let Some(name) = source.project_name {
        request.project_name = name;
    }
    if let Some(language) = source.language {
        request.language = language;
    }
    if let Some(max) = source.max_abstractions {
        request.max_abstractions = max;
    }
    request
}

fn build_orchestrator(config: &Config, request: &TutorialRequest) -> Result<PipelineOrchestrator> {
    let model =
        OpenAiChatClient::from_config(&config.llm).context("Failed to create language model client")?;
    let fetcher = fetcher_for(&request.repository, &config.repository);
    let ctx = PipelineContext::new(fetcher, Box::new(model));
    info!("Run id: {}", ctx.run_id);
    Ok(PipelineOrchestrator::new(ctx))
}

async fn cmd_generate(
    config: &Config,
    source: SourceArgs,
    output: Option<PathBuf>,
    bundle: bool,
) -> Result<()> {
    let mut request = build_request(config, source);
    if let Some(output) = output {
        request.output_dir = output;
    }
    request.show_progress = true;

    println!("{}", format_step(1, 3, &format!("Fetching {}", request.repository)));
    let orchestrator = build_orchestrator(config, &request)?;
    let report = orchestrator
        .run(&request)
        .await
        .context("Tutorial generation failed")?;

    println!(
        "{}",
        format_step(2, 3, &format!("Identified {} abstractions", report.abstractions.len()))
    );
    for (i, abstraction) in report.abstractions.iter().enumerate() {
        println!("   {}. {}", i + 1, abstraction.name);
    }

    println!(
        "{}",
        format_step(3, 3, &format!("Wrote {} chapters", report.stats.chapters_written))
    );
    for path in &report.chapter_paths {
        println!("   {}", path.display());
    }

    if bundle {
        let archive = request.output_dir.join(&config.tutorial.archive_name);
        let count = BundleExporter::new(&request.output_dir)
            .export(&archive)
            .context("Failed to write bundle")?;
        println!(
            "{}",
            format_info(&format!("Bundled {} chapters into {}", count, archive.display()))
        );
    }

    println!(
        "{}",
        format_success(&format!(
            "Tutorial complete in {:.2}s ({:.1} chapters/min), finished {}",
            report.stats.duration_secs,
            report.stats.chapters_per_minute(),
            report.finished_at.to_rfc3339()
        ))
    );

    Ok(())
}

async fn cmd_extract(config: &Config, source: SourceArgs, pretty: bool) -> Result<()> {
    let request = build_request(config, source);
    let orchestrator = build_orchestrator(config, &request)?;

    let (files, abstractions) = orchestrator
        .extract(&request)
        .await
        .context("Abstraction extraction failed")?;
    info!(
        "Extracted {} abstractions from {} files",
        abstractions.len(),
        files.len()
    );

    let json = if pretty {
        serde_json::to_string_pretty(&abstractions)?
    } else {
        serde_json::to_string(&abstractions)?
    };
    println!("{json}");

    Ok(())
}

fn cmd_chapters(config: &Config, output: Option<PathBuf>) -> Result<()> {
    let output_dir = output.unwrap_or_else(|| config.tutorial.output_dir.clone());
    let entries = ChapterCatalog::new(&output_dir)
        .entries()
        .context("Failed to list chapters")?;

    if entries.is_empty() {
        println!(
            "{}",
            format_info(&format!("No chapters found in {}", output_dir.display()))
        );
        return Ok(());
    }

    println!("\nChapters in {}\n", output_dir.display());
    for entry in &entries {
        println!("  {:<32} {}", entry.file_name, entry.title);
    }
    println!();

    Ok(())
}

fn cmd_bundle(config: &Config, output: Option<PathBuf>, archive: Option<PathBuf>) -> Result<()> {
    let output_dir = output.unwrap_or_else(|| config.tutorial.output_dir.clone());
    let archive = archive.unwrap_or_else(|| output_dir.join(&config.tutorial.archive_name));

    let count = BundleExporter::new(&output_dir)
        .export(&archive)
        .context("Failed to write bundle")?;

    println!(
        "{}",
        format_success(&format!("Bundled {} chapters into {}", count, archive.display()))
    );
    Ok(())
}
