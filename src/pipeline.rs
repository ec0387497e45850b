//! The per-route measurement pipeline.
//!
//! Per batch: discover routes, then for each route fetch its rendered
//! markup, extract and resolve script sources, bundle them into one
//! artifact, and measure the result. Route tasks run concurrently and are
//! joined before deltas are computed, so the history store is read strictly
//! before it is written.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tokio::task::JoinSet;

use crate::bundle::{self, Bundler, CliBundler};
use crate::config::BudgetConfig;
use crate::core::{BudgetError, Route};
use crate::history::HistoryStore;
use crate::{debug, extract, log, pages, resolve};

/// One route's measurement: bundled size plus trend delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetRecord {
    pub route: Route,
    /// Bundled artifact size in bytes (text encoding).
    pub size: u64,
    /// `size - previous`; zero on first observation.
    pub delta: i64,
}

/// Per-route result of a batch run.
#[derive(Debug)]
pub enum RouteOutcome {
    Measured(BudgetRecord),
    Failed { route: Route, error: BudgetError },
}

impl RouteOutcome {
    pub fn route(&self) -> &Route {
        match self {
            Self::Measured(record) => &record.route,
            Self::Failed { route, .. } => route,
        }
    }
}

/// Batch measurement pipeline for all discovered routes.
pub struct Pipeline {
    config: Arc<BudgetConfig>,
    client: reqwest::Client,
    bundler: Arc<dyn Bundler>,
}

impl Pipeline {
    /// Build a pipeline with the configured external bundler.
    pub fn new(config: Arc<BudgetConfig>) -> Result<Self, BudgetError> {
        let bundler = Arc::new(CliBundler::from_config(&config.bundle)?);
        Ok(Self::with_bundler(config, bundler))
    }

    /// Build a pipeline around a specific bundling capability.
    pub fn with_bundler(config: Arc<BudgetConfig>, bundler: Arc<dyn Bundler>) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            bundler,
        }
    }

    /// Run one full batch: every discovered route, measured concurrently.
    ///
    /// Route-scoped failures become [`RouteOutcome::Failed`] rows; only an
    /// unreadable pages root aborts the whole run.
    pub async fn run(
        self: Arc<Self>,
        history: &HistoryStore,
    ) -> Result<Vec<RouteOutcome>, BudgetError> {
        let routes = pages::discover_routes(&self.config.pages_dir())?;
        debug!("budget"; "measuring {} route(s)", routes.len());

        let mut tasks = JoinSet::new();
        for route in routes.clone() {
            let pipeline = Arc::clone(&self);
            tasks.spawn(async move {
                let result = pipeline.measure_route(&route).await;
                (route, result)
            });
        }

        let mut measured: FxHashMap<Route, Result<u64, BudgetError>> = FxHashMap::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((route, result)) => {
                    measured.insert(route, result);
                }
                Err(e) => log!("error"; "route task died: {e}"),
            }
        }

        // Reassemble in discovery order; every delta reads history before
        // the caller folds the new sizes in.
        let outcomes = routes
            .into_iter()
            .filter_map(|route| {
                let result = measured.remove(&route)?;
                Some(match result {
                    Ok(size) => RouteOutcome::Measured(BudgetRecord {
                        delta: history.delta(&route, size),
                        route,
                        size,
                    }),
                    Err(error) => RouteOutcome::Failed { route, error },
                })
            })
            .collect();
        Ok(outcomes)
    }

    /// Measure one route end to end.
    async fn measure_route(&self, route: &Route) -> Result<u64, BudgetError> {
        let markup = resolve::http_text(&self.client, &self.config.endpoint(route)).await?;
        self.measure_markup(route, &markup).await
    }

    /// Extract, resolve, bundle and size the scripts in rendered markup.
    async fn measure_markup(&self, route: &Route, html: &str) -> Result<u64, BudgetError> {
        let refs = extract::extract_scripts(html)?;
        let resolved =
            resolve::resolve_sources(refs, &self.config.public_dir(), &self.client).await;
        for err in &resolved.degraded {
            log!("budget"; "{route}: {err} (contributes 0 bytes)");
        }

        let paths = bundle::scratch_paths(&self.config.scratch_dir(), route);
        bundle::write_entry(&paths, &resolved.body)?;

        // The bundler call is blocking and CPU-bound; keep it off the async
        // workers so other routes' fetches continue while it runs.
        let bundler = Arc::clone(&self.bundler);
        tokio::task::spawn_blocking(move || {
            bundler.bundle(&paths.entry, &paths.outfile)?;
            let built =
                std::fs::read_to_string(&paths.outfile).map_err(|e| BudgetError::Bundle {
                    detail: format!("cannot read bundled output: {e}"),
                })?;
            Ok(built.len() as u64)
        })
        .await
        .map_err(|e| BudgetError::Bundle {
            detail: format!("bundler task died: {e}"),
        })?
    }
}

// ============================================================================
// Tests
// ============================================================================
