use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser};
use clap_complete::{generate, Shell};
use grammarfix::cli::output::{self, OutputFormat, PreviewRenderer, ReportRenderer};
use grammarfix::cli::interactive;
use grammarfix::service::{GrammarService, LanguageToolClient, ReplayService};
use grammarfix::sinks::{CommandClipboard, CommandSpeech};
use grammarfix::{Config, Session, SessionOptions, Statistics};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "grammarfix")]
#[command(version, about = "Check text for grammar issues and compose the corrected version", long_about = None)]
struct Cli {
    /// File to check (reads stdin when omitted)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Pick a replacement for each issue interactively
    #[arg(short, long)]
    interactive: bool,

    /// Language tag sent to the grammar service (e.g., en-US, en-GB)
    #[arg(short, long)]
    language: Option<String>,

    /// Grammar service endpoint
    #[arg(long, env = "GRAMMARFIX_ENDPOINT")]
    endpoint: Option<String>,

    /// Answer the check from a saved JSON response instead of the service
    #[arg(long, value_name = "JSON")]
    replay: Option<PathBuf>,

    /// Configuration file (skips global and local config discovery)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the corrected text to a file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Copy the corrected text with the configured clipboard command
    #[arg(long)]
    copy: bool,

    /// Read the corrected text aloud with the configured speech command
    #[arg(long)]
    speak: bool,

    /// Only print document statistics, without checking
    #[arg(long)]
    stats_only: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "grammarfix", &mut io::stdout());
        return Ok(());
    }

    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref(), cli.language.clone(), cli.endpoint.clone())?;
    let colored = !cli.no_color;
    let text = read_input(&cli)?;

    if cli.stats_only {
        let stats = Statistics::compute_with_wpm(&text, config.words_per_minute);
        match cli.format {
            OutputFormat::Text => output::print_stats(&stats, colored),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        }
        return Ok(());
    }

    let service: Box<dyn GrammarService> = match &cli.replay {
        Some(path) => Box::new(ReplayService::new(path)),
        None => Box::new(LanguageToolClient::new(config.endpoint.clone(), config.timeout())?),
    };

    let mut session = Session::new(service, SessionOptions::from(&config));
    session = if cli.interactive {
        session.with_renderer(Box::new(PreviewRenderer::new(colored)))
    } else {
        session.with_renderer(Box::new(ReportRenderer::new(colored, cli.format)))
    };
    if !config.clipboard_command.is_empty() {
        session = session.with_clipboard(Box::new(CommandClipboard::new(
            config.clipboard_command.clone(),
        )));
    }
    if !config.speech_command.is_empty() {
        session = session.with_speech(Box::new(CommandSpeech::new(config.speech_command.clone())));
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message("Checking grammar...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let checked = session.begin_check(&text).and_then(|ticket| {
        let result = session.run_check(&ticket);
        // Clear before finish_check renders the report
        spinner.finish_and_clear();
        session.finish_check(ticket, result)
    });
    spinner.finish_and_clear();
    if let Err(e) = checked {
        let hint = if e.is_recoverable() {
            "Error checking grammar. Please try again."
        } else {
            "Unexpected error while loading grammar issues"
        };
        return Err(anyhow::Error::new(e).context(hint));
    }

    if cli.interactive {
        interactive::review(&mut session, config.max_candidates, colored)?;
        if let Some(view) = session.view() {
            eprintln!();
            output::print_report(&view, colored, &cli.format);
        }
    }

    if let Some(path) = &cli.output {
        let corrected = session.corrected_text().unwrap_or(&text);
        fs::write(path, corrected)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        eprintln!("Corrected text written to {}", path.display());
    }

    if cli.copy {
        session.copy().context("Failed to copy corrected text")?;
        eprintln!("✓ Copied corrected text");
    }

    if cli.speak {
        session.speak().context("Failed to start speech")?;
        session.finish_speaking()?;
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };

    // RUST_LOG, when set, wins over -v
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn read_input(cli: &Cli) -> Result<String> {
    match &cli.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}
