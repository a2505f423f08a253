use clap::{command, Parser};
use std::{path::PathBuf, sync::Arc, time::Duration};
use talos::{
    config, ChatContext, ChatRunner, ChatStrategy, CommandLangConfig, CommandLangError,
    ConfigError, ContextFreeRunner, ContextFreeStrategy, ContextSnapshot, CustomCommand,
    InMemoryRegistry,
};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Render CommandLang documents", long_about = None)]
struct Cli {
    /// CommandLang file to render
    source: Option<PathBuf>,

    /// Render this text instead of a file
    #[arg(short, long, conflicts_with = "source")]
    text: Option<String>,

    /// JSON message snapshot; renders with the chat strategy instead of context-free
    #[arg(short = 'x', long)]
    context: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, default_value = "talos.json")]
    config: PathBuf,

    /// Custom command available to exec blocks, as NAME=TEXT
    #[arg(long = "command", value_parser = parse_command)]
    commands: Vec<(String, String)>,

    /// How long to wait for messages sent by commands, in milliseconds
    #[arg(long, default_value_t = 200)]
    wait_ms: u64,

    /// Enable debug mode
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("Failed to read source: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{}: {}", .0.kind(), .0)]
    CommandLang(#[from] CommandLangError),
}

fn parse_command(arg: &str) -> Result<(String, String), String> {
    arg.split_once('=')
        .filter(|(name, _)| !name.trim().is_empty())
        .map(|(name, text)| (name.trim().to_string(), text.to_string()))
        .ok_or_else(|| format!("expected NAME=TEXT, got {:?}", arg))
}

fn load_source(cli: &Cli) -> Result<String, CliError> {
    match (&cli.text, &cli.source) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => Ok(std::fs::read_to_string(path)?),
        (None, None) => Err(CliError::Usage(
            "either a source file or --text is required".to_string(),
        )),
    }
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    let config: CommandLangConfig = if cli.config.exists() {
        config::from_file(&cli.config)?
    } else {
        CommandLangConfig::default()
    };
    info!("config loaded.");
    debug!("config: {:?}", config);

    let source = load_source(cli)?;

    let Some(context_path) = &cli.context else {
        let runner = ContextFreeRunner::with_config(ContextFreeStrategy, config);
        println!("{}", runner.run(&(), &source)?);
        return Ok(());
    };

    let snapshot: ContextSnapshot = config::from_file(context_path)?;
    let registry = Arc::new(InMemoryRegistry::new());
    let strategy = ChatStrategy::from_config(registry.clone(), &config);
    let runner = Arc::new(ChatRunner::with_config(strategy, config));
    for (name, text) in &cli.commands {
        registry.register(Arc::new(CustomCommand::new(
            name.clone(),
            text.clone(),
            &runner,
        )));
    }

    let (context, mut outbox) = snapshot.into_context();
    let context: Arc<dyn ChatContext> = Arc::new(context);
    println!("{}", runner.run(&context, &source)?);
    drop(context);

    let wait = Duration::from_millis(cli.wait_ms);
    while let Ok(Some(message)) = tokio::time::timeout(wait, outbox.recv()).await {
        println!("[sent] {}", message);
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
