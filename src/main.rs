use clap::{Parser, Subcommand};
use secrecy::SecretString;
use thiserror::Error;
use tracing::error;

use webtopay::application::WebToPayClient;
use webtopay::config::{Environment, GatewayConfig};
use webtopay::domain::callback::{CallbackQuery, ExpectedFields};
use webtopay::domain::catalog::PaymentMethodOptions;
use webtopay::domain::request::PaymentRequest;
use webtopay::WebToPayError;

/// WebToPay payment gateway tool
///
/// Reads WEBTOPAY__* environment variables (and `.env`) for the project id,
/// password and environment. Flags override them.
#[derive(Parser, Debug)]
#[command(name = "webtopay", version, about, long_about = None)]
struct Cli {
    /// Project id (overrides WEBTOPAY__PROJECT_ID)
    #[arg(long, global = true)]
    project_id: Option<u64>,

    /// Project password (overrides WEBTOPAY__PASSWORD)
    #[arg(long, global = true)]
    password: Option<String>,

    /// production or sandbox (overrides WEBTOPAY__ENVIRONMENT)
    #[arg(long, global = true)]
    environment: Option<Environment>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a signed payment redirect URL
    PaymentUrl {
        #[arg(long)]
        order_id: String,

        #[arg(long)]
        accept_url: String,

        #[arg(long)]
        cancel_url: String,

        #[arg(long)]
        callback_url: String,

        /// Amount in minor units
        #[arg(long)]
        amount: Option<u64>,

        #[arg(long)]
        currency: Option<String>,

        /// Preselected payment method key
        #[arg(long)]
        payment: Option<String>,

        #[arg(long)]
        country: Option<String>,

        #[arg(long)]
        lang: Option<String>,

        #[arg(long)]
        paytext: Option<String>,

        /// Mark as a test payment
        #[arg(long)]
        test: bool,

        /// Print `data` and `sign` as JSON instead of a URL
        #[arg(long)]
        json: bool,
    },

    /// Sign a repeat request for an existing order
    RepeatRequest {
        #[arg(long)]
        order_id: String,

        /// Amount in minor units
        #[arg(long)]
        amount: u64,

        #[arg(long)]
        currency: String,
    },

    /// Verify and decode a callback
    ValidateCallback {
        /// Raw callback query string (data=...&ss1=...)
        #[arg(long, conflicts_with = "data")]
        query: Option<String>,

        #[arg(long)]
        data: Option<String>,

        #[arg(long)]
        ss1: Option<String>,

        #[arg(long)]
        ss2: Option<String>,

        #[arg(long)]
        ss3: Option<String>,

        /// Expected field, as key=value (repeatable)
        #[arg(long = "expect", value_name = "KEY=VALUE")]
        expected: Vec<String>,
    },

    /// List payment methods available to the project
    PaymentMethods {
        /// Defaults to EUR
        #[arg(long)]
        currency: Option<String>,

        /// Only methods accepting this amount (minor units)
        #[arg(long)]
        amount: Option<u64>,

        /// Display language for titles
        #[arg(long)]
        lang: Option<String>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    WebToPay(#[from] WebToPayError),

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

fn init_tracing(level: &str, verbose: bool, json: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("webtopay=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(cli: &Cli) -> Result<GatewayConfig, WebToPayError> {
    let mut config = GatewayConfig::load()?;
    if let Some(project_id) = cli.project_id {
        config.project_id = project_id;
    }
    if let Some(password) = &cli.password {
        config.password = SecretString::new(password.clone());
    }
    if let Some(environment) = cli.environment {
        config.environment = environment;
    }
    Ok(config)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    init_tracing(&config.log_level, cli.verbose, cli.log_json);

    if let Err(e) = run(cli.command, config).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: GatewayConfig) -> Result<(), CliError> {
    let client = WebToPayClient::new(config).map_err(WebToPayError::from)?;

    match command {
        Commands::PaymentUrl {
            order_id,
            accept_url,
            cancel_url,
            callback_url,
            amount,
            currency,
            payment,
            country,
            lang,
            paytext,
            test,
            json,
        } => {
            let mut request = PaymentRequest::new(order_id, accept_url, cancel_url, callback_url);
            request.amount = amount;
            request.currency = currency;
            request.payment = payment;
            request.country = country;
            request.lang = lang;
            request.paytext = paytext;
            if test {
                request = request.with_test(true);
            }

            if json {
                let signed = client.build_request(&request).map_err(WebToPayError::from)?;
                println!("{}", serde_json::to_string_pretty(&signed)?);
            } else {
                let url = client.build_payment_url(&request).map_err(WebToPayError::from)?;
                println!("{}", url);
            }
        }
        Commands::RepeatRequest {
            order_id,
            amount,
            currency,
        } => {
            let signed = client.build_repeat_request(&order_id, amount, &currency);
            println!("{}", serde_json::to_string_pretty(&signed)?);
        }
        Commands::ValidateCallback {
            query,
            data,
            ss1,
            ss2,
            ss3,
            expected,
        } => {
            let query = match query {
                Some(raw) => CallbackQuery::from_query_str(&raw),
                None => CallbackQuery {
                    data: data.ok_or_else(|| {
                        CliError::InvalidArgument("either --query or --data is required".to_string())
                    })?,
                    ss1,
                    ss2,
                    ss3,
                },
            };
            let expected = parse_expected(&expected)?;

            let parsed = client
                .validate_callback_with_expected(&query, &expected)
                .await
                .map_err(WebToPayError::from)?;
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }
        Commands::PaymentMethods {
            currency,
            amount,
            lang,
        } => {
            let options = PaymentMethodOptions {
                amount,
                currency,
                language: lang,
            };
            let list = client
                .payment_methods(&options)
                .await
                .map_err(WebToPayError::from)?;

            let language = options.language();
            for country in &list.countries {
                println!(
                    "{} {}",
                    country.code,
                    country.title.get(language).unwrap_or_default()
                );
                for method in country.methods() {
                    println!(
                        "  {:<20} {}",
                        method.key,
                        method.title_in(language).unwrap_or_default()
                    );
                }
            }
        }
    }
    Ok(())
}

fn parse_expected(pairs: &[String]) -> Result<ExpectedFields, CliError> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .ok_or_else(|| CliError::InvalidArgument(format!("expected KEY=VALUE, got {}", pair)))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(|pairs| pairs.into_iter().collect())
}
