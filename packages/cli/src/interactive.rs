//! Interactive filter controls.
//!
//! Renders every chart to the terminal, then loops on a `dialoguer` menu
//! that drives the [`Session`]: change the start period, the end period or
//! the severity, reset, or quit.

use std::cell::RefCell;
use std::rc::Rc;

use accident_dash_accident_models::{Severity, YearMonth};
use accident_dash_dashboard::dispatch::Dispatcher;
use accident_dash_dashboard::session::{Notifier, Session};
use accident_dash_dashboard::store::RecordStore;
use accident_dash_dashboard_models::{ChartKind, FilterError};
use console::{Term, style};
use dialoguer::Select;

use crate::render::TerminalBoard;

enum Action {
    Start,
    End,
    Severity,
    Reset,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Start,
        Self::End,
        Self::Severity,
        Self::Reset,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Start => "Change start period",
            Self::End => "Change end period",
            Self::Severity => "Change severity",
            Self::Reset => "Reset filters",
            Self::Quit => "Quit",
        }
    }
}

/// Keeps the last rejection so the status line can show it after the
/// screen is redrawn.
#[derive(Clone, Default)]
struct StatusNotifier {
    notice: Rc<RefCell<Option<String>>>,
}

impl Notifier for StatusNotifier {
    fn invalid_range(&mut self, error: &FilterError) {
        *self.notice.borrow_mut() = Some(error.to_string());
    }
}

/// Runs the interactive dashboard until the user quits.
///
/// # Errors
///
/// Returns an error if terminal I/O or user input fails.
pub fn run(store: RecordStore, mut dispatcher: Dispatcher) -> Result<(), Box<dyn std::error::Error>> {
    let term = Term::stdout();
    let board = TerminalBoard::default();
    for kind in ChartKind::all() {
        dispatcher.register(*kind, board.renderer());
    }

    let notifier = StatusNotifier::default();
    let mut session = Session::start(store, dispatcher, Box::new(notifier.clone()));

    loop {
        board.print(&term)?;
        print_status(&term, &session, notifier.notice.borrow().as_deref())?;

        let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
        let idx = Select::new()
            .with_prompt("Filter")
            .items(&labels)
            .default(0)
            .interact_on(&term)?;

        let accepted = match Action::ALL[idx] {
            Action::Start => {
                let current = session.pending().start;
                let period = pick_period(&term, &session, "Start period", current)?;
                session.set_start(period).is_ok()
            }
            Action::End => {
                let current = session.pending().end;
                let period = pick_period(&term, &session, "End period", current)?;
                session.set_end(period).is_ok()
            }
            Action::Severity => {
                let severity = pick_severity(&term, &session)?;
                session.set_severity(severity).is_ok()
            }
            Action::Reset => {
                session.reset();
                true
            }
            Action::Quit => break,
        };

        if accepted {
            notifier.notice.borrow_mut().take();
        }
    }

    Ok(())
}

fn print_status(term: &Term, session: &Session, notice: Option<&str>) -> std::io::Result<()> {
    let pending = session.pending();
    let marks = session.marks();

    let period = |value: Option<YearMonth>, marked: bool| {
        let text = value.map_or_else(|| "any".to_string(), |p| p.to_string());
        if marked {
            style(text).red().bold().to_string()
        } else {
            style(text).green().to_string()
        }
    };
    let severity = pending
        .severity
        .map_or_else(|| "any".to_string(), |s| s.value().to_string());

    term.write_line(&format!(
        "Period {} to {}, severity {}: {} of {} accidents",
        period(pending.start, marks.start),
        period(pending.end, marks.end),
        style(severity).green(),
        session.last_report().matched,
        session.store().len(),
    ))?;

    if let Some(notice) = notice {
        term.write_line(&style(notice).red().to_string())?;
    }
    Ok(())
}

fn pick_period(
    term: &Term,
    session: &Session,
    prompt: &str,
    current: Option<YearMonth>,
) -> Result<Option<YearMonth>, Box<dyn std::error::Error>> {
    let periods = session.available_periods();
    let labels: Vec<String> = std::iter::once("Any".to_string())
        .chain(periods.iter().map(|p| format!("{p} ({})", p.label())))
        .collect();
    let default = current
        .and_then(|c| periods.iter().position(|p| *p == c))
        .map_or(0, |i| i + 1);

    let idx = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(default)
        .max_length(15)
        .interact_on(term)?;

    Ok(idx.checked_sub(1).map(|i| periods[i]))
}

fn pick_severity(
    term: &Term,
    session: &Session,
) -> Result<Option<Severity>, Box<dyn std::error::Error>> {
    let options = session.available_severities();
    let labels: Vec<String> = options
        .iter()
        .map(|o| o.map_or_else(|| "Any".to_string(), |s| format!("{} ({s})", s.value())))
        .collect();
    let default = options
        .iter()
        .position(|o| *o == session.pending().severity)
        .unwrap_or(0);

    let idx = Select::new()
        .with_prompt("Severity")
        .items(&labels)
        .default(default)
        .interact_on(term)?;

    Ok(options[idx])
}
