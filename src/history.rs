//! Process-lifetime route size history.
//!
//! Created empty at startup; entries are only added or overwritten, never
//! removed, for the lifetime of the process or watch session. All deltas
//! reset to zero on restart. The store is read for every delta before any
//! write: a batch folds its sizes in only after all route tasks have
//! joined, so no locking is needed.

use rustc_hash::FxHashMap;

use crate::core::Route;
use crate::pipeline::RouteOutcome;

/// Route -> last-measured bundled size, in bytes.
#[derive(Debug, Default)]
pub struct HistoryStore {
    sizes: FxHashMap<Route, u64>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last recorded size for a route, if any.
    pub fn previous(&self, route: &Route) -> Option<u64> {
        self.sizes.get(route).copied()
    }

    /// Signed size difference against the previous measurement.
    ///
    /// Zero on a route's first observation. Negative means the payload
    /// shrank.
    pub fn delta(&self, route: &Route, size: u64) -> i64 {
        match self.previous(route) {
            Some(previous) => size as i64 - previous as i64,
            None => 0,
        }
    }

    /// Fold a completed batch into the store.
    ///
    /// Sizes are overwritten unconditionally for measured routes; failed
    /// routes keep their previous entry so a fixed route reports its real
    /// trend on the next run.
    pub fn apply(&mut self, outcomes: &[RouteOutcome]) {
        for outcome in outcomes {
            if let RouteOutcome::Measured(record) = outcome {
                self.sizes.insert(record.route.clone(), record.size);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::BudgetRecord;
    use std::path::Path;

    fn route(rel: &str) -> Route {
        Route::from_page_file(Path::new(rel))
    }

    fn measured(route: Route, size: u64, delta: i64) -> RouteOutcome {
        RouteOutcome::Measured(BudgetRecord { route, size, delta })
    }

    #[test]
    fn test_first_observation_has_zero_delta() {
        let history = HistoryStore::new();
        assert_eq!(history.delta(&route("about.mjs"), 1234), 0);
        assert_eq!(history.previous(&route("about.mjs")), None);
    }

    #[test]
    fn test_delta_tracks_growth_and_shrink() {
        let mut history = HistoryStore::new();
        let about = route("about.mjs");
        history.apply(&[measured(about.clone(), 1000, 0)]);

        assert_eq!(history.delta(&about, 1200), 200);
        assert_eq!(history.delta(&about, 800), -200);
        assert_eq!(history.delta(&about, 1000), 0);
    }

    #[test]
    fn test_apply_overwrites() {
        let mut history = HistoryStore::new();
        let about = route("about.mjs");
        history.apply(&[measured(about.clone(), 1000, 0)]);
        history.apply(&[measured(about.clone(), 500, -500)]);

        assert_eq!(history.previous(&about), Some(500));
    }

    #[test]
    fn test_failed_routes_keep_previous_entry() {
        let mut history = HistoryStore::new();
        let about = route("about.mjs");
        history.apply(&[measured(about.clone(), 1000, 0)]);
        history.apply(&[RouteOutcome::Failed {
            route: about.clone(),
            error: crate::core::BudgetError::Parse {
                detail: "unterminated".to_string(),
            },
        }]);

        assert_eq!(history.previous(&about), Some(1000));
    }
}
