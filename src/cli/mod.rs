use std::env;
use std::io::Read;
use std::time::Duration;

use anyhow::Context;
use clap::{Arg, Command};
use tracing::{error, info};

use crate::{
    GeminiClient, ItineraryPlanner, OrchestratorOptions, RulesConfig, TripForm,
};

const DEFAULT_MODELS: &str = "gemini-2.5-flash,gemini-2.5-flash-lite";

/// CLI entry point for the nile-itinerary tool
pub async fn run() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let matches = Command::new("nile-itinerary")
        .version("0.1.0")
        .about("Generate a schema-validated Egypt travel itinerary from a trip form")
        .arg(
            Arg::new("form")
                .help("Path to the trip form JSON file, or '-' for stdin")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("models")
                .short('m')
                .long("models")
                .value_name("LIST")
                .help("Comma-separated model identifiers, tried in order")
                .default_value(DEFAULT_MODELS),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .help("Gemini API key (or set GEMINI_API_KEY env var)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .help("Generation API base URL (or set GEMINI_BASE_URL env var)"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .help("Per-backend request timeout in seconds")
                .default_value("60"),
        )
        .arg(
            Arg::new("rules")
                .short('r')
                .long("rules")
                .value_name("FILE")
                .help("Optional rules-config JSON overriding the built-in business tables"),
        )
        .get_matches();

    // Get API key from argument or environment
    let api_key = matches
        .get_one::<String>("api-key")
        .cloned()
        .or_else(|| env::var("GEMINI_API_KEY").ok())
        .context(
            "Gemini API key is required. Set GEMINI_API_KEY environment variable or use --api-key",
        )?;

    let form_path = matches.get_one::<String>("form").unwrap();
    let form_json = if form_path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read trip form from stdin")?;
        buf
    } else {
        std::fs::read_to_string(form_path)
            .with_context(|| format!("failed to read trip form `{form_path}`"))?
    };
    let form: TripForm =
        serde_json::from_str(&form_json).context("trip form is not valid JSON")?;

    let mut client = GeminiClient::new(api_key);
    if let Some(base_url) = matches
        .get_one::<String>("base-url")
        .cloned()
        .or_else(|| env::var("GEMINI_BASE_URL").ok())
    {
        client.set_base_url(base_url);
    }

    let models: Vec<&str> = matches
        .get_one::<String>("models")
        .unwrap()
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .collect();
    let registry = client.registry(&models);
    info!(backends = registry.len(), "backend registry ready");

    let timeout_seconds: u64 = matches
        .get_one::<String>("timeout")
        .unwrap()
        .parse()
        .context("--timeout must be a whole number of seconds")?;
    let mut planner = ItineraryPlanner::new(registry).with_orchestrator_options(
        OrchestratorOptions {
            call_timeout: Duration::from_secs(timeout_seconds),
            ..OrchestratorOptions::default()
        },
    );

    if let Some(rules_path) = matches.get_one::<String>("rules") {
        let rules_json = std::fs::read_to_string(rules_path)
            .with_context(|| format!("failed to read rules config `{rules_path}`"))?;
        let config: RulesConfig = serde_json::from_str(&rules_json)
            .with_context(|| format!("rules config `{rules_path}` is not a valid RulesConfig"))?;
        planner = planner.with_rules_config(config);
    }

    match planner.plan(&form).await {
        Ok(itinerary) => {
            println!("{}", serde_json::to_string_pretty(&itinerary)?);
            Ok(())
        }
        Err(err) => {
            error!(code = err.error_code(), "generation failed");
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
