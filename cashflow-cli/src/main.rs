use anyhow::{Context, Result};
use cashflow_core::TransactionDraft;
use cashflow_ingest::{MpesaParser, SmsEvent, SmsListener};
use cashflow_sync::{SubmitChoices, plan_submission};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::fs;
use std::io::{self, BufRead, BufReader, Read};
use std::path::PathBuf;

mod config;
mod logging;
mod state;

#[derive(Parser, Debug)]
#[command(name = "cashflow", version, about = "M-PESA SMS parsing for CashFlow")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse one M-PESA message into a transaction draft (JSON)
    Parse {
        /// Message text; read from stdin when omitted
        message: Option<String>,

        /// The message came from the savings provider: treat it as a withdrawal
        #[arg(long)]
        from_savings: bool,
    },

    /// Replay incoming SMS as `sender<TAB>body` lines; prints one draft per M-PESA message
    Listen {
        /// File of SMS lines (defaults to stdin)
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Parse a message and show the backend requests that would record it
    Plan {
        /// Message text; read from stdin when omitted
        message: Option<String>,

        /// Expense category chosen by the user
        #[arg(long)]
        category: Option<String>,

        /// Savings goal id for deposits and withdrawals
        #[arg(long)]
        goal: Option<String>,

        /// Current balance of the savings goal
        #[arg(long, default_value = "0")]
        goal_current: Decimal,

        #[arg(long)]
        from_savings: bool,
    },

    /// Manage ~/.cashflow/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loaded = config::load_config()?;
    logging::init_tracing(&loaded.config.logging.filter);
    if !loaded.defaulted.is_empty() {
        tracing::debug!(keys = ?loaded.defaulted, "config keys using defaults");
    }
    let cfg = &loaded.config;

    match cli.command {
        Command::Parse { message, from_savings } => {
            let parser = cfg.build_parser()?;
            let text = message_or_stdin(message)?;
            match parse_with(&parser, &text, from_savings) {
                Some(draft) => println!("{}", serde_json::to_string_pretty(&draft)?),
                None => println!("not recognized"),
            }
        }

        Command::Listen { input } => {
            let listener = SmsListener::new(cfg.build_parser()?);
            listen(&listener, input)?;
        }

        Command::Plan {
            message,
            category,
            goal,
            goal_current,
            from_savings,
        } => {
            let parser = cfg.build_parser()?;
            let text = message_or_stdin(message)?;
            let Some(draft) = parse_with(&parser, &text, from_savings) else {
                println!("not recognized");
                return Ok(());
            };

            let mut choices = SubmitChoices::default();
            if let Some(c) = category {
                choices = choices.with_category(c);
            }
            if let Some(g) = goal {
                choices = choices.with_goal(g, goal_current);
            }

            let plan = plan_submission(&draft, &choices)
                .with_context(|| format!("cannot submit {} draft", draft.transaction_type()))?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => match config::init_config()? {
                (path, true) => println!("Wrote {}", path.display()),
                (path, false) => println!("Config already exists: {}", path.display()),
            },
            ConfigCommand::Show => {
                println!("# {}", config::config_path()?.display());
                for key in &loaded.defaulted {
                    println!("# {key}: default");
                }
                print!("{}", toml::to_string_pretty(cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn parse_with(parser: &MpesaParser, text: &str, from_savings: bool) -> Option<TransactionDraft> {
    if from_savings {
        parser.parse_from_savings_provider(text)
    } else {
        parser.parse(text)
    }
}

fn message_or_stdin(message: Option<String>) -> Result<String> {
    match message {
        Some(m) => Ok(m),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("read message from stdin")?;
            let len = buf.trim_end_matches(['\r', '\n']).len();
            buf.truncate(len);
            Ok(buf)
        }
    }
}

fn listen(listener: &SmsListener, input: Option<PathBuf>) -> Result<()> {
    let reader: Box<dyn BufRead> = match &input {
        Some(path) => Box::new(BufReader::new(
            fs::File::open(path).with_context(|| format!("open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut seen = 0usize;
    let mut drafts = 0usize;
    for (i, line) in reader.lines().enumerate() {
        let line = line.context("read SMS line")?;
        if line.trim().is_empty() {
            continue;
        }
        seen += 1;
        let Some(event) = SmsEvent::from_line(&line) else {
            tracing::warn!(line = i + 1, "skipping line without sender<TAB>body");
            continue;
        };
        if let Some(draft) = listener.handle(&event) {
            drafts += 1;
            println!("{}", serde_json::to_string(&draft)?);
        }
    }

    tracing::info!(seen, drafts, "listener finished");
    Ok(())
}
