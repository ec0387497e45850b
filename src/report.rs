//! Budget table rendering.
//!
//! Columns: Route, Size, Delta. Sizes are formatted in binary (JEDEC)
//! units. With a configured threshold the size column is colored by
//! severity; without one all sizes render in a neutral style. Failed
//! routes show an error marker in place of a size.

use owo_colors::OwoColorize;

use crate::pipeline::RouteOutcome;
use crate::utils::filesize;

/// Severity of a measured size against the configured threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// At or above the threshold.
    Over,
    /// At or above 80% of the threshold.
    Near,
    /// Below 80% of the threshold.
    Under,
    /// No threshold configured.
    Neutral,
}

/// Classify a size against an optional byte threshold.
pub fn classify(size: u64, threshold: Option<u64>) -> Severity {
    let Some(threshold) = threshold else {
        return Severity::Neutral;
    };
    if size >= threshold {
        Severity::Over
    } else if size.saturating_mul(5) >= threshold.saturating_mul(4) {
        Severity::Near
    } else {
        Severity::Under
    }
}

/// Print the budget table with its heading.
pub fn print_report(outcomes: &[RouteOutcome], threshold: Option<u64>) {
    println!("\nPerformance Budget\n");
    println!("{}", render_table(outcomes, threshold));
}

// ============================================================================
// Rendering
// ============================================================================

struct Cell {
    /// Uncolored text, used for width computation.
    plain: String,
    /// Colored text, used for output.
    styled: String,
}

impl Cell {
    fn plain(text: String) -> Self {
        Self {
            styled: text.clone(),
            plain: text,
        }
    }

    fn styled(text: String, styled: String) -> Self {
        Self {
            plain: text,
            styled,
        }
    }
}

/// Render the table. Widths are computed from uncolored text so ANSI
/// escapes never skew the alignment.
fn render_table(outcomes: &[RouteOutcome], threshold: Option<u64>) -> String {
    let header = [
        Cell::styled("Route".to_string(), "Route".bold().to_string()),
        Cell::styled("Size".to_string(), "Size".bold().to_string()),
        Cell::styled("Delta".to_string(), "Delta".bold().to_string()),
    ];

    let mut rows = vec![header];
    for outcome in outcomes {
        rows.push(render_row(outcome, threshold));
    }

    let mut widths = [0usize; 3];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.plain.chars().count());
        }
    }

    let mut out = String::new();
    for row in &rows {
        for (i, (width, cell)) in widths.iter().zip(row).enumerate() {
            if i > 0 {
                out.push_str("  ");
            }
            out.push_str(&cell.styled);
            for _ in cell.plain.chars().count()..*width {
                out.push(' ');
            }
        }
        // Trailing pad on the last column is dropped
        while out.ends_with(' ') {
            out.pop();
        }
        out.push('\n');
    }
    out
}

fn render_row(outcome: &RouteOutcome, threshold: Option<u64>) -> [Cell; 3] {
    let route = outcome.route().to_string();
    let route_cell = Cell::styled(route.clone(), route.bold().to_string());

    match outcome {
        RouteOutcome::Measured(record) => {
            let size = filesize::jedec(record.size as i64);
            let size_cell = match classify(record.size, threshold) {
                Severity::Over => Cell::styled(size.clone(), size.red().to_string()),
                Severity::Near => Cell::styled(size.clone(), size.yellow().to_string()),
                Severity::Under => Cell::styled(size.clone(), size.cyan().to_string()),
                Severity::Neutral => Cell::plain(size),
            };

            let delta = filesize::jedec_signed(record.delta);
            let delta_cell = if record.delta < 0 {
                Cell::styled(delta.clone(), delta.red().to_string())
            } else if record.delta > 0 {
                Cell::styled(delta.clone(), delta.green().to_string())
            } else {
                Cell::styled(delta.clone(), delta.cyan().to_string())
            };

            [route_cell, size_cell, delta_cell]
        }
        RouteOutcome::Failed { error, .. } => {
            let marker = error.marker().to_string();
            [
                route_cell,
                Cell::styled(marker.clone(), marker.red().to_string()),
                Cell::plain("-".to_string()),
            ]
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
