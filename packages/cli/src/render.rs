//! Chart renderers for the terminal and for static JSON output.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::rc::Rc;

use accident_dash_dashboard::RenderError;
use accident_dash_dashboard::dispatch::Renderer;
use accident_dash_dashboard_models::{ChartAggregate, ChartKind, ChoroplethBucket, StateChoropleth};
use accident_dash_geography_models::states;
use console::{Term, style};

/// Width of the longest text bar, in characters.
const BAR_WIDTH: u64 = 40;

/// The text panels of every terminal chart, in registration order.
///
/// Each [`TerminalRenderer`] owns one panel and replaces it on every
/// render; the interactive loop prints the whole board afterwards.
#[derive(Clone, Default)]
pub struct TerminalBoard {
    panels: Rc<RefCell<Vec<(ChartKind, String)>>>,
}

impl TerminalBoard {
    /// A renderer that draws into this board.
    #[must_use]
    pub fn renderer(&self) -> Box<dyn Renderer> {
        Box::new(TerminalRenderer {
            board: self.clone(),
        })
    }

    /// Clears the screen and prints every panel.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn print(&self, term: &Term) -> std::io::Result<()> {
        term.clear_screen()?;
        for (kind, body) in self.panels.borrow().iter() {
            term.write_line(&style(kind.title()).bold().cyan().to_string())?;
            term.write_line(body)?;
            term.write_line("")?;
        }
        Ok(())
    }

    fn replace(&self, kind: ChartKind, body: String) {
        let mut panels = self.panels.borrow_mut();
        if let Some(panel) = panels.iter_mut().find(|(k, _)| *k == kind) {
            panel.1 = body;
        } else {
            panels.push((kind, body));
        }
    }
}

struct TerminalRenderer {
    board: TerminalBoard,
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, kind: ChartKind, aggregate: &ChartAggregate) -> Result<(), RenderError> {
        self.board.replace(kind, format_aggregate(kind, aggregate));
        Ok(())
    }
}

/// Writes each chart's aggregate to `<dir>/<kind>.json`, overwriting the
/// previous file.
pub struct JsonFileRenderer {
    dir: PathBuf,
}

impl JsonFileRenderer {
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl Renderer for JsonFileRenderer {
    fn render(&mut self, kind: ChartKind, aggregate: &ChartAggregate) -> Result<(), RenderError> {
        let path = self.dir.join(format!("{kind}.json"));
        let body = serde_json::json!({
            "kind": kind,
            "title": kind.title(),
            "aggregate": aggregate,
        });
        std::fs::write(&path, serde_json::to_vec_pretty(&body)?)?;
        log::debug!("Wrote {}", path.display());
        Ok(())
    }
}

/// Formats an aggregate as plain text.
#[must_use]
pub fn format_aggregate(kind: ChartKind, aggregate: &ChartAggregate) -> String {
    if aggregate.is_empty() {
        return style("No accidents match the current filter.")
            .dim()
            .to_string();
    }

    match aggregate {
        ChartAggregate::TopStates(counts) if kind == ChartKind::TopStatesPie => {
            let total: u64 = counts.iter().map(|c| c.count).sum();
            counts
                .iter()
                .map(|c| {
                    let name = states::abbr_to_name(&c.state).unwrap_or_default();
                    format!("{:<4} {name:<16} {:>6}", c.state, share(c.count, total))
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
        ChartAggregate::TopStates(counts) => {
            let max = counts.first().map_or(0, |c| c.count);
            bars(counts.iter().map(|c| (c.state.clone(), c.count)), max)
        }
        ChartAggregate::YearSeverity(grid) => table(
            &grid.years,
            grid.series.iter().map(|s| {
                (
                    format!("Severity {}", s.severity.value()),
                    s.points.iter().map(|p| p.count).collect(),
                )
            }),
        ),
        ChartAggregate::YearStates(groups) => {
            let mut out = String::new();
            for row in &groups.rows {
                let _ = writeln!(out, "{}", style(row.year).bold());
                let rows = bars(
                    row.counts.iter().map(|c| (c.state.clone(), c.count)),
                    groups.max_count,
                );
                let _ = writeln!(out, "{rows}");
            }
            out.trim_end().to_string()
        }
        ChartAggregate::FeatureSeverity(stacks) => {
            let width = stacks
                .stacks
                .iter()
                .map(|s| s.feature.label().len())
                .max()
                .unwrap_or(0);
            stacks
                .stacks
                .iter()
                .map(|s| {
                    let parts: Vec<String> = s
                        .counts
                        .iter()
                        .map(|c| format!("{}:{}", c.severity.value(), c.count))
                        .collect();
                    format!(
                        "{:<width$} {} {} ({})",
                        s.feature.label(),
                        bar(s.total, stacks.max_total),
                        s.total,
                        parts.join(" ")
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
        ChartAggregate::YearFeature(grid) => table(
            &grid.years,
            grid.series.iter().map(|s| {
                (
                    s.feature.label().to_string(),
                    s.points.iter().map(|p| p.count).collect(),
                )
            }),
        ),
        ChartAggregate::Severities(counts) => {
            let max = counts.iter().map(|c| c.count).max().unwrap_or(0);
            bars(
                counts
                    .iter()
                    .map(|c| (format!("Severity {}", c.severity.value()), c.count)),
                max,
            )
        }
        ChartAggregate::TopLabels(counts) => {
            let max = counts.first().map_or(0, |c| c.count);
            bars(counts.iter().map(|c| (c.label.clone(), c.count)), max)
        }
        ChartAggregate::Choropleth(map) => choropleth(map),
    }
}

fn bar(count: u64, max: u64) -> String {
    if max == 0 {
        return String::new();
    }
    let len = usize::try_from(count * BAR_WIDTH / max).unwrap_or(0);
    "█".repeat(len)
}

fn bars(rows: impl Iterator<Item = (String, u64)>, max: u64) -> String {
    let rows: Vec<(String, u64)> = rows.collect();
    let width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(label, count)| format!("{label:<width$} {} {count}", bar(*count, max)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn table(years: &[i32], rows: impl Iterator<Item = (String, Vec<u64>)>) -> String {
    let rows: Vec<(String, Vec<u64>)> = rows.collect();
    let width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);

    let mut out = format!("{:<width$}", "");
    for year in years {
        let _ = write!(out, " {year:>7}");
    }
    for (label, counts) in &rows {
        let _ = write!(out, "\n{label:<width$}");
        for count in counts {
            let _ = write!(out, " {count:>7}");
        }
    }
    out
}

/// `count / total` as a percentage with one decimal.
fn share(count: u64, total: u64) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }
    let per_mille = (count * 1000 + total / 2) / total;
    format!("{}.{}%", per_mille / 10, per_mille % 10)
}

fn bucket_label(bucket: &ChoroplethBucket) -> String {
    bucket
        .to
        .map_or_else(|| format!("{}+", bucket.from), |to| format!("{}-{}", bucket.from, to - 1))
}

fn choropleth(map: &StateChoropleth) -> String {
    let mut cells: Vec<_> = map.cells.iter().filter(|c| c.count > 0).collect();
    cells.sort_by(|a, b| b.count.cmp(&a.count));

    let mut out = String::new();
    for cell in &cells {
        let range = map.buckets.get(cell.bucket).map(bucket_label).unwrap_or_default();
        let _ = writeln!(
            out,
            "{:<16} {:>3} {:>8}  [{range}]",
            cell.boundary.name,
            cell.boundary.abbreviation.as_deref().unwrap_or("--"),
            cell.count
        );
    }
    let _ = write!(
        out,
        "{}",
        style(format!(
            "{} of {} states with no accidents",
            map.cells.len() - cells.len(),
            map.cells.len()
        ))
        .dim()
    );
    out
}
