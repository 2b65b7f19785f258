use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::data_source::{HistoryRequest, MarketDataProvider, ProviderFuture, SourceError};
use crate::http_client::{HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};
use crate::{
    Bar, FundamentalsRecord, OhlcvTable, ProviderId, Symbol, UtcDateTime, WindowSpec,
};

const COOKIE_URL: &str = "https://fc.yahoo.com";
const REFERER: &str = "https://finance.yahoo.com/";
const SUMMARY_MODULES: &str = "price,summaryDetail,defaultKeyStatistics,financialData";
const CRUMB_TTL: Duration = Duration::from_secs(3_600);

// ============================================================================
// Yahoo Auth Manager - cookie/crumb handshake
// ============================================================================

#[derive(Debug, Clone)]
struct CachedCrumb {
    value: String,
    fetched_at: Instant,
}

/// Manages Yahoo Finance cookie/crumb authentication.
///
/// The quoteSummary endpoint requires:
/// 1. A session cookie from fc.yahoo.com (kept by the transport's cookie jar)
/// 2. A crumb token from `/v1/test/getcrumb`, passed as a query parameter
#[derive(Debug, Default)]
pub struct YahooAuthManager {
    crumb: Mutex<Option<CachedCrumb>>,
    cookie_override: Option<String>,
}

impl YahooAuthManager {
    pub fn new(cookie_override: Option<String>) -> Self {
        Self {
            crumb: Mutex::new(None),
            cookie_override,
        }
    }

    fn cached(&self) -> Option<String> {
        let guard = self.crumb.lock().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .filter(|cached| cached.fetched_at.elapsed() < CRUMB_TTL)
            .map(|cached| cached.value.clone())
    }

    /// Cookie sent explicitly on every Yahoo request, if one was configured.
    pub fn cookie(&self) -> Option<&str> {
        self.cookie_override.as_deref()
    }

    /// Current crumb, fetching a fresh one when none is cached.
    pub async fn crumb(
        &self,
        http_client: &dyn HttpClient,
        config: &ProviderConfig,
    ) -> Result<String, SourceError> {
        if let Some(crumb) = self.cached() {
            return Ok(crumb);
        }

        let crumb = self.fetch_crumb(http_client, config).await?;
        *self.crumb.lock().unwrap_or_else(PoisonError::into_inner) = Some(CachedCrumb {
            value: crumb.clone(),
            fetched_at: Instant::now(),
        });
        Ok(crumb)
    }

    /// Drop cached auth so the next call performs the handshake again.
    pub fn invalidate(&self) {
        *self.crumb.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    async fn fetch_crumb(
        &self,
        http_client: &dyn HttpClient,
        config: &ProviderConfig,
    ) -> Result<String, SourceError> {
        if self.cookie_override.is_none() {
            // fc.yahoo.com answers 404 but still sets the session cookie.
            let cookie_request = HttpRequest::get(COOKIE_URL, config.timeout_ms).referer(REFERER);
            http_client.execute(cookie_request).await.map_err(|e| {
                SourceError::unavailable(format!("failed to fetch yahoo cookie: {e}"))
            })?;
        }

        let crumb_url = format!("{}/v1/test/getcrumb", config.yahoo_base_url);
        let crumb_request = HttpRequest::get(crumb_url, config.timeout_ms)
            .referer(REFERER)
            .cookie(self.cookie());
        let response = http_client.execute(crumb_request).await.map_err(|e| {
            SourceError::unavailable(format!("failed to fetch yahoo crumb: {e}"))
        })?;

        let body = response.body.trim();
        if response.status == 429 || body.to_ascii_lowercase().contains("too many requests") {
            return Err(SourceError::rate_limited(
                "yahoo rate limited while fetching crumb",
            ));
        }
        if !response.is_success()
            || body.is_empty()
            || body.len() >= 100
            || body.contains(' ')
            || body.contains('<')
        {
            return Err(SourceError::unavailable(format!(
                "yahoo returned an unusable crumb (status {})",
                response.status
            )));
        }

        Ok(body.to_owned())
    }
}

// ============================================================================
// Yahoo Adapter
// ============================================================================

/// Yahoo Finance adapter for chart history and quoteSummary fundamentals.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    config: ProviderConfig,
    auth_manager: Arc<YahooAuthManager>,
}

impl YahooAdapter {
    /// Adapter over the production reqwest transport.
    pub fn new(config: ProviderConfig) -> Result<Self, SourceError> {
        let client =
            ReqwestHttpClient::new(&config).map_err(|e| SourceError::internal(e.to_string()))?;
        Ok(Self::with_http_client(Arc::new(client), config))
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: ProviderConfig) -> Self {
        let auth_manager = Arc::new(YahooAuthManager::new(config.cookie_override.clone()));
        Self {
            http_client,
            config,
            auth_manager,
        }
    }

    fn chart_url(&self, req: &HistoryRequest) -> String {
        let window = match req.window {
            WindowSpec::Preset { period, interval } => {
                format!("range={period}&interval={interval}")
            }
            WindowSpec::Range {
                start,
                end,
                interval,
            } => format!(
                "period1={}&period2={}&interval={interval}",
                UtcDateTime::start_of_day(start).unix_timestamp(),
                UtcDateTime::start_of_day(end).unix_timestamp(),
            ),
        };

        format!(
            "{}/v8/finance/chart/{}?{window}&includePrePost=false&events=div%2Csplits",
            self.config.yahoo_base_url,
            urlencoding::encode(req.symbol.as_str()),
        )
    }

    fn summary_url(&self, symbol: &Symbol, crumb: &str) -> String {
        format!(
            "{}/v10/finance/quoteSummary/{}?modules={}&crumb={}",
            self.config.yahoo_base_url,
            urlencoding::encode(symbol.as_str()),
            urlencoding::encode(SUMMARY_MODULES),
            urlencoding::encode(crumb),
        )
    }

    async fn send(&self, url: &str) -> Result<HttpResponse, SourceError> {
        let request = HttpRequest::get(url, self.config.timeout_ms)
            .referer(REFERER)
            .cookie(self.auth_manager.cookie());

        debug!(url, "yahoo request");
        self.http_client.execute(request).await.map_err(|error| {
            if error.is_transient() {
                SourceError::unavailable(format!("yahoo transport error: {error}"))
            } else {
                SourceError::internal(format!("yahoo transport error: {error}"))
            }
        })
    }

    async fn fetch_history(&self, req: &HistoryRequest) -> Result<OhlcvTable, SourceError> {
        let response = self.send(&self.chart_url(req)).await?;
        parse_chart_response(&req.symbol, req.window, &response)
    }

    async fn fetch_fundamentals(&self, symbol: &Symbol) -> Result<FundamentalsRecord, SourceError> {
        let crumb = self
            .auth_manager
            .crumb(self.http_client.as_ref(), &self.config)
            .await?;
        let mut response = self.send(&self.summary_url(symbol, &crumb)).await?;

        // Stale crumb: refresh auth and retry once.
        if response.status == 401 || response.status == 429 {
            warn!(symbol = %symbol, status = response.status, "yahoo rejected crumb, refreshing");
            self.auth_manager.invalidate();
            let crumb = self
                .auth_manager
                .crumb(self.http_client.as_ref(), &self.config)
                .await?;
            response = self.send(&self.summary_url(symbol, &crumb)).await?;
            if response.status == 429 {
                return Err(SourceError::rate_limited(
                    "yahoo returned status 429 after auth refresh",
                ));
            }
        }

        parse_summary_response(symbol, &response)
    }
}

impl MarketDataProvider for YahooAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn history<'a>(&'a self, req: &'a HistoryRequest) -> ProviderFuture<'a, OhlcvTable> {
        Box::pin(self.fetch_history(req))
    }

    fn fundamentals<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, FundamentalsRecord> {
        Box::pin(self.fetch_fundamentals(symbol))
    }
}

// ============================================================================
// Response parsing
// ============================================================================

fn parse_chart_response(
    symbol: &Symbol,
    window: WindowSpec,
    response: &HttpResponse,
) -> Result<OhlcvTable, SourceError> {
    // Error bodies are JSON too; parse leniently so a 404 still yields its description.
    let parsed = serde_json::from_str::<YahooChartResponse>(&response.body);

    if let Ok(chart) = &parsed {
        if let Some(error) = &chart.chart.error {
            return Err(api_error(symbol, response.status, error));
        }
    }

    if !response.is_success() {
        return Err(status_error(symbol, response.status));
    }

    let chart = parsed
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {e}")))?
        .chart;

    let interval = window.interval();
    let Some(result) = chart.result.and_then(|results| results.into_iter().next()) else {
        return Ok(OhlcvTable::empty(symbol.clone(), interval));
    };
    let (Some(timestamps), Some(quote)) = (
        result.timestamp,
        result
            .indicators
            .and_then(|indicators| indicators.quote.into_iter().next()),
    ) else {
        return Ok(OhlcvTable::empty(symbol.clone(), interval));
    };

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts_value) in timestamps.iter().enumerate() {
        let (Some(Some(open)), Some(Some(high)), Some(Some(low)), Some(Some(close))) = (
            quote.open.get(i),
            quote.high.get(i),
            quote.low.get(i),
            quote.close.get(i),
        ) else {
            continue;
        };

        let ts = UtcDateTime::from_unix_timestamp(ts_value)
            .map_err(|e| SourceError::internal(format!("invalid timestamp: {e}")))?;
        let volume = quote
            .volume
            .get(i)
            .copied()
            .flatten()
            .map(|v| v.max(0.0) as u64)
            .unwrap_or(0);

        match Bar::new(ts, *open, *high, *low, *close, volume) {
            Ok(bar) => bars.push(bar),
            Err(error) => debug!(symbol = %symbol, ts = ts_value, %error, "skipping invalid bar"),
        }
    }

    Ok(OhlcvTable::new(symbol.clone(), interval, bars))
}

fn parse_summary_response(
    symbol: &Symbol,
    response: &HttpResponse,
) -> Result<FundamentalsRecord, SourceError> {
    let parsed = serde_json::from_str::<YahooQuoteSummaryResponse>(&response.body);

    if let Ok(summary) = &parsed {
        if let Some(error) = &summary.quote_summary.error {
            return Err(api_error(symbol, response.status, error));
        }
    }

    if !response.is_success() {
        return Err(status_error(symbol, response.status));
    }

    let summary = parsed
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo fundamentals: {e}")))?
        .quote_summary;

    let Some(result) = summary.result.and_then(|results| results.into_iter().next()) else {
        return Ok(FundamentalsRecord::empty(symbol.clone()));
    };

    let price = result.price.unwrap_or_default();
    let detail = result.summary_detail.unwrap_or_default();
    let stats = result.default_key_statistics.unwrap_or_default();
    let financial = result.financial_data.unwrap_or_default();

    let record = FundamentalsRecord {
        symbol: Some(symbol.clone()),
        current_price: raw(&financial.current_price).or_else(|| raw(&price.regular_market_price)),
        market_cap: raw(&price.market_cap).or_else(|| raw(&detail.market_cap)),
        trailing_pe: raw(&detail.trailing_pe),
        volume: raw(&detail.volume)
            .or_else(|| raw(&price.regular_market_volume))
            .map(to_count),
        beta: raw(&detail.beta).or_else(|| raw(&stats.beta)),
        dividend_yield: raw(&detail.dividend_yield),
        average_volume: raw(&detail.average_volume).map(to_count),
    };

    Ok(record.sanitized())
}

fn api_error(symbol: &Symbol, status: u16, error: &YahooApiError) -> SourceError {
    let detail = error
        .description
        .clone()
        .unwrap_or_else(|| error.code.clone());
    if status == 404 || error.code.eq_ignore_ascii_case("not found") {
        SourceError::not_found(format!("yahoo has no data for {symbol}: {detail}"))
    } else if status == 400 || error.code.eq_ignore_ascii_case("bad request") {
        SourceError::invalid_request(format!("yahoo rejected request for {symbol}: {detail}"))
    } else {
        SourceError::unavailable(format!("yahoo API error for {symbol}: {detail}"))
    }
}

fn status_error(symbol: &Symbol, status: u16) -> SourceError {
    match status {
        404 => SourceError::not_found(format!("yahoo returned status 404 for {symbol}")),
        429 => SourceError::rate_limited(format!("yahoo returned status 429 for {symbol}")),
        400..=499 => {
            SourceError::invalid_request(format!("yahoo returned status {status} for {symbol}"))
        }
        _ => SourceError::unavailable(format!("yahoo returned status {status} for {symbol}")),
    }
}

fn raw(value: &Option<YahooRawValue>) -> Option<f64> {
    value.as_ref().and_then(|v| v.raw)
}

fn to_count(value: f64) -> u64 {
    value.max(0.0).round() as u64
}

// Yahoo Finance API response structures

#[derive(Debug, Clone, Deserialize)]
struct YahooApiError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: Option<YahooChartIndicators>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: YahooQuoteSummaryData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteSummaryData {
    #[serde(default)]
    result: Option<Vec<YahooQuoteSummaryResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooQuoteSummaryResult {
    #[serde(default)]
    price: Option<YahooPriceData>,
    #[serde(default)]
    summary_detail: Option<YahooSummaryDetailData>,
    #[serde(default)]
    default_key_statistics: Option<YahooDefaultKeyStatisticsData>,
    #[serde(default)]
    financial_data: Option<YahooFinancialData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooPriceData {
    #[serde(default)]
    regular_market_price: Option<YahooRawValue>,
    #[serde(default)]
    regular_market_volume: Option<YahooRawValue>,
    #[serde(default)]
    market_cap: Option<YahooRawValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooSummaryDetailData {
    #[serde(default, rename = "trailingPE")]
    trailing_pe: Option<YahooRawValue>,
    #[serde(default)]
    market_cap: Option<YahooRawValue>,
    #[serde(default)]
    volume: Option<YahooRawValue>,
    #[serde(default)]
    average_volume: Option<YahooRawValue>,
    #[serde(default)]
    beta: Option<YahooRawValue>,
    #[serde(default)]
    dividend_yield: Option<YahooRawValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooDefaultKeyStatisticsData {
    #[serde(default)]
    beta: Option<YahooRawValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooFinancialData {
    #[serde(default)]
    current_price: Option<YahooRawValue>,
}

/// Yahoo wraps numbers as `{"raw": 1.0, "fmt": "1.00"}`; unknown values are `{}`.
#[derive(Debug, Clone, Deserialize)]
struct YahooRawValue {
    #[serde(default)]
    raw: Option<f64>,
}
