//! xt-gwmeta: command-line front end for the GWMETA target extension
//!
//! Drives the extension the way the xtables host does, which makes it
//! useful for checking rule text before it reaches `iptables-restore`.
//!
//! # Usage
//!
//! ```bash
//! # Parse directives and print the listing form
//! xt-gwmeta parse --gwmeta-gwmask 0x2 --gwmeta-gwmask 0x20
//!
//! # Print the save form instead
//! xt-gwmeta parse --mode save -- --dis-pp
//!
//! # Use the IPv6 registration entry
//! xt-gwmeta --family ipv6 encode --en-pp
//!
//! # Show the engine-facing record as hex, and decode it back
//! xt-gwmeta encode --gwmeta-gwmask 0x22
//! xt-gwmeta decode 0100000022000000
//!
//! # Run with environment overrides
//! XT_GWMETA_LOG_LEVEL=debug xt-gwmeta parse --en-pp
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, error, Level};
use tracing_subscriber::EnvFilter;

use xt_gwmeta::config::{create_default_config, load_config_with_env, Config};
use xt_gwmeta::error::{DescriptorError, GwmetaError, EXIT_OTHER_PROBLEM};
use xt_gwmeta::host::build_rule_with;
use xt_gwmeta::target::{
    init, render, save_with_target, Family, Registration, RenderMode, RuleDescriptor, TargetRegistration,
    OPTIONS, TARGET_NAME,
};

/// Parse, render and encode GWMETA target directives.
#[derive(Parser, Debug)]
#[command(name = "xt-gwmeta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long = "config", env = "XT_GWMETA_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Address family entry to use [default: from configuration]
    #[arg(short = 'f', long = "family", global = true)]
    family: Option<Family>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse directives, run the final check and render the rule
    Parse {
        /// Output form [default: from configuration]
        #[arg(short = 'm', long = "mode")]
        mode: Option<RenderMode>,

        /// Target directives, e.g. `--gwmeta-gwmask 0x2`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
        directives: Vec<String>,
    },

    /// Parse directives and print the engine-facing record as hex
    Encode {
        /// Target directives, e.g. `--dis-pp`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
        directives: Vec<String>,
    },

    /// Decode a hex dump of the engine-facing record
    Decode {
        /// Record bytes as hex, optionally prefixed with 0x
        hex: String,
    },

    /// Print the target's option help
    HelpTarget,

    /// Print the registration table
    Info,

    /// Write a default configuration file and exit
    GenerateConfig {
        /// Destination path
        path: PathBuf,
    },
}

/// Initialize logging
fn init_logging(config: &Config) {
    let level = match config.log.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.log.target)
        .with_writer(std::io::stderr);

    if config.log.format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Pick the registration entry for `family`
fn entry_for(registration: &Registration, family: Family) -> Result<&TargetRegistration> {
    registration
        .for_family(family)
        .with_context(|| format!("{TARGET_NAME} is not registered for {family}"))
}

fn build(entry: &TargetRegistration, directives: &[String]) -> Result<RuleDescriptor> {
    build_rule_with(entry.extension, directives)
        .with_context(|| format!("rejected rule: -j {TARGET_NAME} {}", directives.join(" ")))
}

fn run(command: Command, family: Family, config: &Config) -> Result<()> {
    let registration = init();

    match command {
        Command::Parse { mode, directives } => {
            let entry = entry_for(&registration, family)?;
            let desc = build(entry, &directives)?;
            let text = match mode.unwrap_or(config.render.mode) {
                RenderMode::Save if config.render.with_target => save_with_target(&desc),
                mode => render(&desc, mode),
            };
            println!("{text}");
        }
        Command::Encode { directives } => {
            let entry = entry_for(&registration, family)?;
            let desc = build(entry, &directives)?;
            println!("{}", hex::encode(desc.encode()));
        }
        Command::Decode { hex: dump } => {
            let trimmed = dump.trim();
            let digits = trimmed
                .strip_prefix("0x")
                .or_else(|| trimmed.strip_prefix("0X"))
                .unwrap_or(trimmed);
            let bytes = hex::decode(digits)
                .map_err(|e| GwmetaError::from(DescriptorError::InvalidHex(e.to_string())))?;
            let desc = RuleDescriptor::decode(&bytes).map_err(GwmetaError::from)?;
            let entry = entry_for(&registration, family)?;
            debug!("Decoded {} bytes into {:?}", bytes.len(), desc.mode());
            println!("print: {}", entry.extension.print(&desc));
            println!("save:  {}", entry.extension.save(&desc));
        }
        Command::HelpTarget => {
            let entry = entry_for(&registration, family)?;
            print!("{}", entry.help);
        }
        Command::Info => {
            for entry in registration.targets() {
                println!(
                    "{} family={} (nfproto {}) version={} size={} userspacesize={}",
                    entry.name,
                    entry.family,
                    entry.family.nfproto(),
                    entry.version,
                    entry.size,
                    entry.userspace_size
                );
            }
            for option in OPTIONS {
                let arg = if option.has_arg { " <value>" } else { "" };
                println!("  --{}{arg}", option.name);
            }
        }
        Command::GenerateConfig { path } => {
            create_default_config(&path).map_err(GwmetaError::from)?;
            println!("Generated default configuration at {}", path.display());
        }
    }

    Ok(())
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config_with_env(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("xt-gwmeta v{}: {e}", xt_gwmeta::VERSION);
            return exit_code(EXIT_OTHER_PROBLEM);
        }
    };

    init_logging(&config);
    debug!("xt-gwmeta v{}", xt_gwmeta::VERSION);

    let family = cli.family.unwrap_or(config.render.family);
    match run(cli.command, family, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("xt-gwmeta v{}: {err:#}", xt_gwmeta::VERSION);
            let code = err
                .downcast_ref::<GwmetaError>()
                .map_or(EXIT_OTHER_PROBLEM, GwmetaError::exit_code);
            exit_code(code)
        }
    }
}
