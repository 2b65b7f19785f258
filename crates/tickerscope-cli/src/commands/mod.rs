mod fundamentals;
mod history;
mod metrics;
mod price;
mod resolve;
mod search;
mod status;

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tickerscope_core::{
    Envelope, EnvelopeError, EnvelopeMeta, FixtureProvider, MarketDataProvider,
    MarketDataService, ProviderConfig, ProviderId, YahooAdapter,
};
use tracing::debug;
use uuid::Uuid;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            latency_ms: 0,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let service = build_service(cli)?;
    let market = cli.market.into();
    let started = Instant::now();

    let command_result = match &cli.command {
        Command::Resolve(args) => resolve::run(args, &service, market).await?,
        Command::History(args) => history::run(args, &service, market).await?,
        Command::Fundamentals(args) => fundamentals::run(args, &service, market).await?,
        Command::Metrics(args) => metrics::run(args, &service, market).await?,
        Command::Price(args) => price::run(args, &service, market).await?,
        Command::Search(args) => search::run(args, market)?,
        Command::Status => status::run()?,
    };

    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let CommandResult {
        data,
        warnings,
        errors,
        latency_ms,
    } = command_result.with_latency(elapsed_ms);

    debug!(
        provider = %service.provider_id(),
        latency_ms,
        errors = errors.len(),
        "command finished"
    );

    let mut meta =
        EnvelopeMeta::new(Uuid::new_v4().to_string(), service.provider_id(), latency_ms)?;
    for warning in warnings {
        meta.push_warning(warning);
    }

    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}

fn build_service(cli: &Cli) -> Result<MarketDataService, CliError> {
    let provider: Arc<dyn MarketDataProvider> = match ProviderId::from(cli.source) {
        ProviderId::Yahoo => {
            let mut config = ProviderConfig::from_env();
            if let Some(timeout_ms) = cli.timeout_ms {
                config = config.with_timeout_ms(timeout_ms);
            }
            Arc::new(YahooAdapter::new(config)?)
        }
        ProviderId::Fixture => Arc::new(FixtureProvider::new()),
    };

    Ok(MarketDataService::new(provider))
}
