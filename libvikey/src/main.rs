use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use libvikey::{
    commands, logging, paths, repl, ConfigurationStore, DefaultEngine, EngineGateway, EventController,
    Shortcut, TomlFileStore,
};

#[derive(Parser)]
#[command(name = "vikey", version, about = "Vietnamese input method engine host")]
struct Cli {
    /// Configuration file (defaults to $XDG_CONFIG_HOME/vikey/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect or change settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Manage text shortcuts
    Shortcut {
        #[command(subcommand)]
        action: ShortcutAction,
    },
    /// Type key descriptions (one per line, e.g. "shift+a", "ctrl+space")
    Run,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print every setting
    Show,
    /// Set one setting, e.g. `InputMethod vni` or `FreeTone true`
    Set { key: String, value: String },
    /// Restore defaults
    Reset,
}

#[derive(Subcommand)]
enum ShortcutAction {
    List,
    Add { trigger: String, replacement: String },
    Remove { trigger: String },
    /// Install the stock shortcuts
    Presets,
}

type Config = ConfigurationStore<TomlFileStore, DefaultEngine>;

fn open_config(path: Option<PathBuf>) -> Result<Config> {
    let path = match path {
        Some(path) => path,
        None => paths::config_file().context("no configuration directory available")?,
    };
    let store = TomlFileStore::open(&path)?;
    info!(path = %path.display(), "configuration opened");
    Ok(ConfigurationStore::new(store, EngineGateway::shared(DefaultEngine::new())))
}

fn run_config(config: &mut Config, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            print!("{}", config.snapshot().to_toml_string()?);
        }
        ConfigAction::Set { key, value } => {
            commands::set_value(config, &key, &value)?;
            println!("{} = {}", key, value);
        }
        ConfigAction::Reset => {
            config.reset()?;
            println!("settings reset to defaults");
        }
    }
    Ok(())
}

fn print_shortcuts(shortcuts: &[Shortcut]) {
    if shortcuts.is_empty() {
        println!("(no shortcuts)");
    }
    for s in shortcuts {
        println!("{:<10} -> {}", s.trigger, s.replacement);
    }
}

fn run_shortcut(config: &mut Config, action: ShortcutAction) -> Result<()> {
    match action {
        ShortcutAction::List => print_shortcuts(&config.shortcuts()),
        ShortcutAction::Add { trigger, replacement } => {
            config.add_shortcut(&trigger, &replacement)?;
            println!("added {} -> {}", trigger, replacement);
        }
        ShortcutAction::Remove { trigger } => {
            config.remove_shortcut(&trigger)?;
            println!("removed {}", trigger);
        }
        ShortcutAction::Presets => {
            let added = commands::add_presets(config)?;
            println!("{} preset(s) installed", added);
            print_shortcuts(&config.shortcuts());
        }
    }
    Ok(())
}

fn run_session(config: &Config) -> Result<()> {
    let mut controller = EventController::new(config);
    controller.subscribe(|enabled| {
        eprintln!("typing {}", if enabled { "enabled" } else { "disabled" });
    });

    eprintln!(
        "{} ({}), Ctrl+Space toggles. One key per line, Ctrl+D to quit.",
        config.input_method(),
        if controller.is_enabled() { "on" } else { "off" }
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let buffer = repl::run(&mut controller, stdin.lock(), stdout.lock())?;
    io::stdout().flush()?;
    println!("final text: '{}'", buffer.text());
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let mut config = open_config(cli.config)?;
    match cli.command {
        Command::Config { action } => run_config(&mut config, action),
        Command::Shortcut { action } => run_shortcut(&mut config, action),
        Command::Run => run_session(&config),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
