use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{debug, warn};

use airtwo::config::{self, Config, Preferences};
use airtwo::contact::{ContactForm, SendError};
use airtwo::i18n::{Language, Translator};
use airtwo::logging::{self, LogTarget, Verbosity};
use airtwo::output::{self, OutputMode};
use airtwo::pages;
use airtwo::submit::SimulatedBackend;
use airtwo::tui::{self, App};
use airtwo::wizard::{Variant, Wizard};
use airtwo::Result;

#[derive(Parser, Debug)]
#[command(name = "airtwo")]
#[command(about = "Request a private charter quote from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Interface language (overrides config and saved preference)
    #[arg(long, global = true, value_enum)]
    lang: Option<Language>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Write logs to this file (the wizard otherwise discards them)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Config file to use instead of the default locations
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive quote wizard (default)
    Quote {
        /// Which wizard flow to run
        #[arg(long, value_enum)]
        variant: Option<Variant>,
    },
    /// Send a message through the contact form
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        message: String,
    },
    /// Show the fleet comparison table
    Fleet,
    /// Show popular destinations and regions
    Destinations,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let command = cli.command.unwrap_or(Command::Quote { variant: None });

    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        Verbosity::from_occurrences(cli.verbose)
    };
    let target = match (&cli.log_file, &command) {
        (Some(path), _) => LogTarget::File(path.clone()),
        // The wizard owns the terminal
        (None, Command::Quote { .. }) => LogTarget::Discard,
        (None, _) => LogTarget::Stderr,
    };
    logging::init_logging(verbosity, target)?;

    let config = Config::load(cli.config.as_deref())?;
    let preferences = Preferences::load(config::default_preferences_path());
    let language = cli.lang.or(config.language).unwrap_or(preferences.language);
    debug!(language = language.code(), "resolved language");
    let translator = Translator::new(language);

    let delay = Duration::from_millis(config.submit_delay_ms);
    let backend = if config.simulate_failure {
        SimulatedBackend::failing(delay)
    } else {
        SimulatedBackend::new(delay)
    };
    debug!(
        delay_ms = backend.delay().as_millis() as u64,
        failing = config.simulate_failure,
        "simulated backend"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .build()?;

    match command {
        Command::Quote { variant } => {
            let variant = variant.unwrap_or(config.variant);
            if variant == Variant::Reservation {
                warn!("the reservation flow is deprecated, use --variant quote");
            }
            let wizard = Wizard::with_max_passengers(
                variant,
                config.return_date_policy,
                Local::now().date_naive(),
                config.max_passengers_for(variant),
            );
            let mut app = App::new(
                wizard,
                translator,
                preferences,
                Arc::new(backend),
                runtime.handle().clone(),
            );

            if let Some((text, mode)) = tui::run(&mut app)? {
                output::handle_output(&text, mode)?;
                if mode == OutputMode::Clipboard {
                    println!("{}", app.translator().t("notice.copied"));
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Contact {
            name,
            email,
            phone,
            message,
        } => {
            let mut form = ContactForm {
                name,
                email,
                phone,
                message,
            };
            if form.validate().is_ok() {
                eprintln!("{}", translator.t("contact.sending"));
            }

            match runtime.block_on(form.send(&backend)) {
                Ok(receipt) => {
                    println!("{}", translator.t("contact.success"));
                    print!("{}", output::receipt_summary(&receipt, &translator));
                    Ok(ExitCode::SUCCESS)
                }
                Err(SendError::Invalid(errors)) => {
                    for err in errors {
                        eprintln!(
                            "  {}: {}",
                            translator.t(err.field().label_key()),
                            translator.t(err.message_key())
                        );
                    }
                    Ok(ExitCode::FAILURE)
                }
                Err(SendError::Rejected(_)) => {
                    eprintln!("{}", translator.t("contact.failure"));
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Fleet => {
            println!("{}", translator.t("fleet.title"));
            println!("{}", pages::fleet_table(&translator));
            Ok(ExitCode::SUCCESS)
        }
        Command::Destinations => {
            println!("{}", translator.t("destinations.title"));
            println!("{}", pages::destinations_table(&translator));
            println!();
            println!("{}", translator.t("destinations.regions_title"));
            println!("{}", pages::regions_table(&translator));
            Ok(ExitCode::SUCCESS)
        }
    }
}
