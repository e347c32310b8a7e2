//! Yahoo Finance futures provider.
//!
//! Fetches daily bars from Yahoo's v8 chart API. Continuous front-month
//! series use `<T>=F`; dated contracts use `<T><code><yy>.<exchange>`.
//! Curves are assembled by probing the next N monthly contracts and keeping
//! the last adjusted close of each one that has traded.
//!
//! Requests are issued once: failures surface as `DataError` without retry.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::config::ProviderSettings;
use crate::dataset::{CurveDataset, CurvePoint, DailyBar, HistoricalDataset, TickerBars};
use crate::expiry::{continuous_symbol, Expiry};
use crate::provider::{DataError, FuturesProvider};
use crate::reference::ReferenceTable;

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance futures provider.
pub struct YahooFuturesProvider {
    client: reqwest::blocking::Client,
    reference: Arc<ReferenceTable>,
    base_url: String,
    curve_months: u32,
}

impl YahooFuturesProvider {
    pub fn new(reference: Arc<ReferenceTable>, settings: &ProviderSettings) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            reference,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            curve_months: settings.curve_months,
        })
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!(
            "{}/v8/finance/chart/{symbol}?range=max&interval=1d&includeAdjustedClose=true",
            self.base_url
        )
    }

    /// Yahoo symbol for a ticker, optionally pinned to a dated contract.
    fn symbol_for(&self, ticker: &str, expiry: Option<Expiry>) -> Result<String, DataError> {
        match expiry {
            None => Ok(continuous_symbol(ticker)),
            Some(expiry) => {
                let exchange = self
                    .reference
                    .exchange(ticker)
                    .ok_or_else(|| DataError::UnknownTicker(ticker.to_string()))?;
                Ok(expiry.contract_symbol(ticker, exchange))
            }
        }
    }

    /// Parse the chart API response into daily bars.
    ///
    /// "Not Found" and a result without timestamps (a listed contract that
    /// never traded) both yield no bars.
    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Vec<DailyBar>, DataError> {
        let result = match resp.chart.result {
            Some(result) => result,
            None => {
                return match resp.chart.error {
                    Some(err) if err.code == "Not Found" => Ok(Vec::new()),
                    Some(err) => Err(DataError::ResponseFormatChanged(format!(
                        "{symbol}: {}: {}",
                        err.code, err.description
                    ))),
                    None => Err(DataError::ResponseFormatChanged(format!(
                        "{symbol}: empty result with no error"
                    ))),
                }
            }
        };

        let Some(data) = result.into_iter().next() else {
            return Ok(Vec::new());
        };
        let Some(timestamps) = data.timestamp else {
            return Ok(Vec::new());
        };

        let quote = data.indicators.quote.into_iter().next().unwrap_or_default();
        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose);

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("{symbol}: invalid timestamp {ts}"))
                })?;

            let bar = DailyBar {
                date,
                open: quote.open.get(i).copied().flatten(),
                high: quote.high.get(i).copied().flatten(),
                low: quote.low.get(i).copied().flatten(),
                close: quote.close.get(i).copied().flatten(),
                adj_close: adj_closes.as_ref().and_then(|v| v.get(i).copied().flatten()),
                volume: quote.volume.get(i).copied().flatten(),
            };

            // Skip rows where nothing traded (holidays)
            if bar.open.is_none()
                && bar.high.is_none()
                && bar.low.is_none()
                && bar.close.is_none()
                && bar.adj_close.is_none()
            {
                continue;
            }
            bars.push(bar);
        }

        // Intraday timestamps can map two rows onto one date; keep the last.
        bars.dedup_by(|later, earlier| {
            if later.date == earlier.date {
                *earlier = *later;
                true
            } else {
                false
            }
        });

        Ok(bars)
    }

    /// Issue a single chart request.
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<DailyBar>, DataError> {
        let url = self.chart_url(symbol);
        log::debug!("GET {url}");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(DataError::AuthenticationRequired(format!(
                "HTTP {status} from Yahoo Finance"
            )));
        }
        if !status.is_success() {
            return Err(DataError::Other(format!("HTTP {status} for {symbol}")));
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;

        let bars = Self::parse_response(symbol, chart)?;
        log::debug!("{symbol}: {} bars", bars.len());
        Ok(bars)
    }
}

/// Monthly expiries probed for a curve, starting at `first`.
pub fn curve_expiries(first: Expiry, months: u32) -> impl Iterator<Item = Expiry> {
    (0..months).map(move |i| first.add_months(i))
}

fn last_adj_close(bars: &[DailyBar]) -> Option<f64> {
    bars.iter()
        .rev()
        .find_map(|b| b.adj_close.filter(|v| v.is_finite()))
}

impl FuturesProvider for YahooFuturesProvider {
    fn reference(&self) -> &ReferenceTable {
        &self.reference
    }

    fn historical(
        &self,
        tickers: &[String],
        expiry: Option<Expiry>,
    ) -> Result<HistoricalDataset, DataError> {
        let mut series = Vec::with_capacity(tickers.len());
        for ticker in tickers {
            let symbol = self.symbol_for(ticker, expiry)?;
            let bars = self.fetch_bars(&symbol)?;
            series.push(TickerBars {
                ticker: ticker.clone(),
                bars,
            });
        }
        Ok(HistoricalDataset::from_series(series))
    }

    fn curve(&self, ticker: &str) -> Result<CurveDataset, DataError> {
        let today: NaiveDate = chrono::Local::now().date_naive();
        let exchange = self
            .reference
            .exchange(ticker)
            .ok_or_else(|| DataError::UnknownTicker(ticker.to_string()))?;

        let mut points = Vec::new();
        for expiry in curve_expiries(Expiry::from_date(today), self.curve_months) {
            let symbol = expiry.contract_symbol(ticker, exchange);
            if let Some(price) = last_adj_close(&self.fetch_bars(&symbol)?) {
                points.push(CurvePoint {
                    label: expiry.label(),
                    price,
                });
            }
        }
        Ok(CurveDataset::new(ticker, points))
    }
}
