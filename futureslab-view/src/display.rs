//! The three display entry points: search, historical and curve.
//!
//! Each one validates its input, fetches from the provider, picks a
//! presentation, renders it and triggers export. Soft conditions (unknown
//! ticker, empty data, wrong surface count) are reported to the user and
//! summarized in the returned `Outcome`; only collaborator faults come back
//! as `Err`.

use std::path::PathBuf;

use chrono::{Days, NaiveDate};
use thiserror::Error;

use futureslab_core::{
    validate_tickers, ChartSettings, DataError, Expiry, FuturesProvider, SearchFilter, Table,
};

use crate::console::{Console, Level};
use crate::export::{ExportError, Exporter};
use crate::instrument::log_start_end;
use crate::presentation::{
    plan_curve, plan_historical, ChartPlan, Note, Presentation, TableView, CURVE_TITLE,
    HISTORICAL_TITLE,
};
use crate::surface::{ChartSurface, DrawSurface};
use crate::theme::Theme;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// How a display call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A table was printed (possibly in place of a chart).
    Table,
    /// A chart was drawn.
    Chart,
    /// Every requested ticker was unknown.
    NoValidTickers,
    /// The single requested ticker was unknown.
    InvalidTicker,
    /// The provider returned no data.
    NoData,
    /// Surfaces were supplied but not exactly one; nothing was drawn.
    SurfaceCountMismatch,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub filter: SearchFilter,
    /// Export selector, e.g. `"csv,json"`. Empty disables export.
    pub export: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalRequest {
    pub tickers: Vec<String>,
    pub expiry: Option<Expiry>,
    /// Rows before this date are left out of tables, exports and the x-axis.
    pub start_date: NaiveDate,
    pub raw: bool,
    pub export: String,
}

impl HistoricalRequest {
    /// Chart request starting three years back from today.
    pub fn new<I, S>(tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tickers: tickers.into_iter().map(Into::into).collect(),
            expiry: None,
            start_date: default_start_date(chrono::Local::now().date_naive(), 3 * 365),
            raw: false,
            export: String::new(),
        }
    }
}

/// `today` minus `lookback_days`.
pub fn default_start_date(today: NaiveDate, lookback_days: u64) -> NaiveDate {
    today.checked_sub_days(Days::new(lookback_days)).unwrap_or(NaiveDate::MIN)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurveRequest {
    pub ticker: String,
    pub raw: bool,
    pub export: String,
}

/// Drawing destination of a chart.
enum Target<'s> {
    /// Created here, shown through the console once drawn.
    Standalone(ChartSurface),
    /// Supplied by the caller, who is responsible for showing it.
    External(&'s mut dyn DrawSurface),
}

impl Target<'_> {
    fn surface(&mut self) -> &mut dyn DrawSurface {
        match self {
            Target::Standalone(chart) => chart,
            Target::External(surface) => &mut **surface,
        }
    }
}

/// Collaborators shared by the display operations.
pub struct DisplayContext<'a> {
    provider: &'a dyn FuturesProvider,
    console: &'a dyn Console,
    exporter: &'a dyn Exporter,
    export_dir: PathBuf,
    theme: Theme,
    chart: ChartSettings,
}

impl<'a> DisplayContext<'a> {
    pub fn new(
        provider: &'a dyn FuturesProvider,
        console: &'a dyn Console,
        exporter: &'a dyn Exporter,
    ) -> Self {
        Self {
            provider,
            console,
            exporter,
            export_dir: PathBuf::from("exports"),
            theme: Theme::default(),
            chart: ChartSettings::default(),
        }
    }

    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_chart_settings(mut self, chart: ChartSettings) -> Self {
        self.chart = chart;
        self
    }

    /// Print reference rows matching the filters and export them as `search`.
    pub fn display_search(&self, request: &SearchRequest) -> Result<Outcome, ViewError> {
        log_start_end("display_search", || self.search(request))
    }

    /// Show daily history for the requested tickers as a table or chart and
    /// export the date-filtered data as `historical`.
    ///
    /// `surfaces`: `None` draws on a new standalone chart; `Some` must hold
    /// exactly one surface, which is drawn on but not shown.
    pub fn display_historical(
        &self,
        request: &HistoricalRequest,
        surfaces: Option<&mut [&mut dyn DrawSurface]>,
    ) -> Result<Outcome, ViewError> {
        log_start_end("display_historical", || self.historical(request, surfaces))
    }

    /// Show the futures curve of one ticker. Exported as `curve` only when
    /// drawn as a chart.
    pub fn display_curve(
        &self,
        request: &CurveRequest,
        surfaces: Option<&mut [&mut dyn DrawSurface]>,
    ) -> Result<Outcome, ViewError> {
        log_start_end("display_curve", || self.curve(request, surfaces))
    }

    fn search(&self, request: &SearchRequest) -> Result<Outcome, ViewError> {
        let result = self.provider.search(&request.filter)?;
        if result.is_empty() {
            self.console.notice(Level::Warning, "No futures data found.");
            return Ok(Outcome::NoData);
        }

        let table = result.to_table();
        self.console.print_table(&table);
        self.export(&request.export, "search", &table)?;
        Ok(Outcome::Table)
    }

    fn historical(
        &self,
        request: &HistoricalRequest,
        surfaces: Option<&mut [&mut dyn DrawSurface]>,
    ) -> Result<Outcome, ViewError> {
        let reference = self.provider.reference();
        let validated = validate_tickers(reference, &request.tickers);
        for ticker in &validated.invalid {
            self.console
                .notice(Level::Error, &format!("{ticker} is not a valid ticker"));
        }
        if validated.is_empty() {
            self.console.notice(Level::Info, "No ticker was provided.");
            return Ok(Outcome::NoValidTickers);
        }

        let data = self.provider.historical(&validated.valid, request.expiry)?;
        if data.is_empty() {
            self.console.notice(
                Level::Warning,
                &format!(
                    "No data was found for the tickers: {}",
                    validated.valid.join(", ")
                ),
            );
            return Ok(Outcome::NoData);
        }
        log::debug!(
            "historical data for {:?}: {} rows",
            validated.valid,
            data.len()
        );

        let plan = plan_historical(
            &data,
            reference,
            request.expiry,
            request.start_date,
            request.raw,
        );
        let outcome = match plan {
            Presentation::ShowTable(view) => {
                self.print_view(&view);
                Outcome::Table
            }
            Presentation::ShowChart(chart) => self.render_chart(chart, surfaces)?,
        };
        if outcome == Outcome::SurfaceCountMismatch {
            return Ok(outcome);
        }

        let filtered = data.since(request.start_date).to_table(HISTORICAL_TITLE);
        self.export(&request.export, "historical", &filtered)?;
        Ok(outcome)
    }

    fn curve(
        &self,
        request: &CurveRequest,
        surfaces: Option<&mut [&mut dyn DrawSurface]>,
    ) -> Result<Outcome, ViewError> {
        let ticker = request.ticker.trim();
        let Some(description) = self.provider.reference().description(ticker) else {
            self.console
                .notice(Level::Error, &format!("'{ticker}' is not a valid ticker"));
            return Ok(Outcome::InvalidTicker);
        };

        let curve = self.provider.curve(ticker)?;
        log::debug!("curve for {}: {} contracts", curve.ticker(), curve.len());
        if curve.is_empty() {
            self.console
                .notice(Level::Error, "No future data found to generate curve.");
            return Ok(Outcome::NoData);
        }

        match plan_curve(&curve, description, request.raw) {
            Presentation::ShowTable(view) => {
                self.print_view(&view);
                Ok(Outcome::Table)
            }
            Presentation::ShowChart(chart) => {
                let outcome = self.render_chart(chart, surfaces)?;
                if outcome != Outcome::SurfaceCountMismatch {
                    self.export(&request.export, "curve", &curve.to_table(CURVE_TITLE))?;
                }
                Ok(outcome)
            }
        }
    }

    fn print_view(&self, view: &TableView) {
        if let Some(note) = &view.note {
            let level = match note {
                Note::NoData { .. } => Level::Warning,
                _ => Level::Info,
            };
            self.console.notice(level, &note.to_string());
        }
        if let Some(table) = &view.table {
            self.console.print_table(table);
        }
    }

    fn render_chart(
        &self,
        plan: ChartPlan,
        surfaces: Option<&mut [&mut dyn DrawSurface]>,
    ) -> Result<Outcome, ViewError> {
        let mut target = match surfaces {
            None => Target::Standalone(ChartSurface::standalone(self.theme, self.chart)),
            Some([only]) => Target::External(&mut **only),
            Some(other) => {
                log::debug!("expected exactly one drawing surface, got {}", other.len());
                return Ok(Outcome::SurfaceCountMismatch);
            }
        };

        for view in &plan.side_tables {
            self.print_view(view);
        }
        if plan.series.is_empty() {
            return Ok(Outcome::Table);
        }

        let surface = target.surface();
        for series in plan.series {
            surface.plot(series);
        }
        if let Some(title) = &plan.title {
            surface.set_title(title);
        }
        if !plan.legend.is_empty() {
            surface.set_legend(&plan.legend);
        }
        surface.set_x_axis(plan.x_axis);
        surface.style_primary_axis(&self.theme);

        if let Target::Standalone(chart) = &target {
            // The data is still exported when the terminal cannot show the chart.
            if let Err(e) = self.console.show_chart(chart) {
                log::warn!("failed to display chart: {e}");
                self.console
                    .notice(Level::Warning, &format!("The chart could not be displayed: {e}"));
            }
        }
        Ok(Outcome::Chart)
    }

    fn export(&self, selector: &str, name: &str, table: &Table) -> Result<(), ViewError> {
        let written = self.exporter.export(selector, &self.export_dir, name, table)?;
        if !written.is_empty() {
            log::debug!("{name}: wrote {} export file(s)", written.len());
        }
        Ok(())
    }
}
