use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use crate::conditions::{self, Condition};
use crate::config;
use crate::receipt::Receipt;

use super::error::CliError;
use super::exit_codes;
use super::output::{
    self, CheckData, ClassifyData, EvalData, OutputMode, RuleData, VerifyData,
};

#[derive(Parser)]
#[command(name = "rcond")]
#[command(about = "Compile and evaluate rule conditions against expense receipts")]
#[command(version)]
pub struct Cli {
    /// Path to rule file (overrides RCOND_CONFIG env var and default location)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (auto-enabled when stdout is piped)
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Force text output even when stdout is piped
    #[arg(long, global = true, conflicts_with = "json")]
    pub no_json: bool,

    /// Suppress all output on success (errors still go to stderr)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Logging verbosity (RUST_LOG takes precedence)
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,
    /// Only error messages
    Error,
    /// Warning and error messages
    Warn,
    /// Info, warning, and error messages
    Info,
    /// Debug, info, warning, and error messages
    Debug,
    /// Trace, debug, info, warning, and error messages
    Trace,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a condition spec and print its normalized form
    Check {
        /// Spec as JSON/JSON5 text, or @path to read it from a file
        spec: String,
    },

    /// Evaluate a condition spec against a receipt (exit 0 on match, 2 otherwise)
    Eval {
        /// Spec as JSON/JSON5 text, or @path to read it from a file
        spec: String,

        /// Receipt JSON file ('-' reads stdin)
        #[arg(short, long)]
        receipt: String,
    },

    /// Apply the rules from the rule file to a receipt
    Classify {
        /// Receipt JSON file ('-' reads stdin)
        #[arg(short, long)]
        receipt: String,
    },

    /// List the keys a condition spec may use
    Keys,

    /// Rule file management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the rule file path
    Path,
    /// Print the loaded rules
    Show,
    /// Check the rule file and report every problem
    Verify,
    /// Write a rule file with example rules
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print example rules without writing them
    Default,
}

pub fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => "off",
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .init();
}

/// run a command, returning the process exit code
pub fn execute(cli: Cli, output_mode: OutputMode) -> Result<i32, CliError> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Check { spec } => {
            let condition = read_spec(&spec)?;

            if output_mode.is_json() {
                output::print_json(&CheckData {
                    valid: true,
                    condition: condition.to_string(),
                    spec: condition.to_spec(),
                });
            } else if !output_mode.is_quiet() {
                println!("✓ {}", condition);
                let json = serde_json::to_string_pretty(&condition.to_spec())
                    .context("Failed to serialize condition")?;
                println!("{}", json);
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Eval { spec, receipt } => {
            let condition = read_spec(&spec)?;
            let receipt = read_receipt(&receipt)?;
            let matched = condition.evaluate(&receipt);

            if output_mode.is_json() {
                output::print_json(&EvalData {
                    matched,
                    condition: condition.to_string(),
                });
            } else if !output_mode.is_quiet() {
                println!("{}", matched);
            }

            Ok(if matched {
                exit_codes::SUCCESS
            } else {
                exit_codes::NO_MATCH
            })
        }

        Commands::Classify { receipt } => {
            let config = config::load_with_override(config_path)
                .map_err(|e| CliError::config(format!("{:#}", e)))?;
            if config.rules.is_empty() {
                log::warn!("rule file has no rules, nothing can match");
            }

            let receipt = read_receipt(&receipt)?;
            let rules = config.rule_set();
            let matched = rules.classify(&receipt);

            if output_mode.is_json() {
                output::print_json(&ClassifyData {
                    matched: matched
                        .iter()
                        .map(|r| RuleData {
                            name: r.name.clone(),
                            category: r.category.clone(),
                        })
                        .collect(),
                    category: rules.category_for(&receipt).map(str::to_string),
                });
            } else if !output_mode.is_quiet() {
                for rule in &matched {
                    match &rule.category {
                        Some(category) => println!("{} -> {}", rule.name, category),
                        None => println!("{}", rule.name),
                    }
                }
            }

            Ok(if matched.is_empty() {
                exit_codes::NO_MATCH
            } else {
                exit_codes::SUCCESS
            })
        }

        Commands::Keys => {
            let keys: Vec<&str> = conditions::known_keys().collect();
            if output_mode.is_json() {
                output::print_json(&keys);
            } else if !output_mode.is_quiet() {
                for key in keys {
                    println!("{}", key);
                }
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                let path = config::get_config_path_with_override(config_path)?;
                if !output_mode.is_quiet() {
                    println!("{}", path.display());
                }
                Ok(exit_codes::SUCCESS)
            }
            ConfigCommands::Show => {
                let config = config::load_with_override(config_path)
                    .map_err(|e| CliError::config(format!("{:#}", e)))?;
                let json =
                    serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
                if !output_mode.is_quiet() {
                    println!("{}", json);
                }
                Ok(exit_codes::SUCCESS)
            }
            ConfigCommands::Verify => {
                let path = config::get_config_path_with_override(config_path)?;
                let errors =
                    config::verify(&path).map_err(|e| CliError::config(format!("{:#}", e)))?;
                let valid = errors.is_empty();

                if output_mode.is_json() {
                    output::print_json(&VerifyData {
                        path: path.display().to_string(),
                        valid,
                        errors: errors.clone(),
                    });
                } else if valid {
                    if !output_mode.is_quiet() {
                        println!("✓ Configuration is valid: {}", path.display());
                    }
                } else {
                    println!(
                        "✗ Configuration has {} error(s): {}",
                        errors.len(),
                        path.display()
                    );
                    println!();
                    for error in &errors {
                        println!("  - {}", error);
                    }
                }

                Ok(if valid {
                    exit_codes::SUCCESS
                } else {
                    exit_codes::CONFIG_ERROR
                })
            }
            ConfigCommands::Init { force } => {
                let path = config::get_config_path_with_override(config_path)?;
                if path.exists() && !force {
                    return Err(CliError::config(format!(
                        "{} already exists (use --force to overwrite)",
                        path.display()
                    )));
                }

                let config = config::default_with_examples()?;
                let path = config::save_with_override(&config, Some(path.as_path()))?;
                if !output_mode.is_quiet() {
                    println!("Wrote example rules to {}", path.display());
                }
                Ok(exit_codes::SUCCESS)
            }
            ConfigCommands::Default => {
                let config = config::default_with_examples()?;
                let json =
                    serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
                if !output_mode.is_quiet() {
                    println!("{}", json);
                }
                Ok(exit_codes::SUCCESS)
            }
        },

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "rcond", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }
    }
}

/// parse a spec argument: inline text or @path
fn read_spec(arg: &str) -> Result<Condition, CliError> {
    let text = match arg.strip_prefix('@') {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            CliError::new(
                exit_codes::INVALID_SPEC,
                format!("Failed to read spec file {}: {}", path, e),
            )
        })?,
        None => arg.to_string(),
    };

    Ok(text.parse::<Condition>()?)
}

/// load a receipt from a file, or stdin for '-'
fn read_receipt(arg: &str) -> Result<Receipt, CliError> {
    let content = if arg == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| CliError::invalid_receipt(format!("Failed to read stdin: {}", e)))?;
        buf
    } else {
        fs::read_to_string(arg).map_err(|e| {
            CliError::invalid_receipt(format!("Failed to read receipt {}: {}", arg, e))
        })?
    };

    json5::from_str(&content)
        .map_err(|e| CliError::invalid_receipt(format!("Invalid receipt {}: {}", arg, e)))
}
