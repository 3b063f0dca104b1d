//! askchart - natural-language questions over a SQL database.

use askchart::cli::Cli;
use askchart::config::Config;
use askchart::db::{self, MockDatabaseClient};
use askchart::error::{AskChartError, Result};
use askchart::llm::{self, LlmProvider, MockLlmClient};
use askchart::pipeline::Pipeline;
use askchart::response::{ErrorResponse, QueryResponse};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    askchart::logging::init_stderr_logging();

    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e);
        let envelope = ErrorResponse::from_error(&e);
        eprintln!(
            "{}",
            serde_json::to_string(&envelope).unwrap_or_else(|_| e.to_string())
        );
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let mut config = Config::load_from_file(&cli.config)?;
    config.apply_env_overrides();

    // CLI arguments take precedence over config file values.
    if let Some(db_path) = &cli.db {
        config.database.path = db_path.clone();
    }
    if let Some(provider) = &cli.llm {
        config.llm.provider = provider.clone();
    }
    if let Some(model) = &cli.model {
        config.llm.model = model.clone();
    }

    let pipeline = if cli.mock {
        Pipeline::new(
            Box::new(MockDatabaseClient::with_category_totals()),
            Box::new(MockLlmClient::new()),
        )
    } else {
        let provider: LlmProvider = config
            .llm
            .provider
            .parse()
            .map_err(AskChartError::config)?;
        info!(
            "Using {} provider (model: {}), database: {}",
            provider, config.llm.model, config.database.path
        );

        Pipeline::new(
            db::connect(&config.database),
            llm::create_client(provider, Some(&config.llm.model))?,
        )
    };

    let state = pipeline.run(&cli.query).await?;
    let response = QueryResponse::from_state(state);

    let output = if cli.pretty {
        serde_json::to_string_pretty(&response)
    } else {
        serde_json::to_string(&response)
    }
    .map_err(|e| AskChartError::internal(format!("Cannot serialize response: {e}")))?;

    println!("{output}");
    Ok(())
}
