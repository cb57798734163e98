use std::io::Read;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use toastr_shared::config::{self, SingleToastConfig, ToastrConfig};
use toastr_shared::models::{PaneSnapshot, Severity, ToastId, ToastState};
use toastr_shared::overlay::OverlayContainer;
use toastr_shared::service::ToastrService;

#[derive(Debug, Deserialize)]
pub struct Notify {
    pub message: String,
    pub title: Option<String>,
    pub options: Option<SingleToastConfig>,
}

#[derive(Debug, Deserialize)]
pub struct Target {
    pub id: ToastId,
}

/// One line of a script.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Success(Notify),
    Error(Notify),
    Info(Notify),
    Warning(Notify),
    Remove(Target),
    Clear {
        id: Option<ToastId>,
    },
    /// Next scheduler turn, optionally after letting `advance_ms` pass.
    Tick {
        #[serde(default)]
        advance_ms: u64,
    },
    Tap(Target),
    Hover(Target),
    Leave(Target),
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(
    tag = "result",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum Outcome {
    Created { toast_id: ToastId },
    Suppressed,
    Removed { removed: bool },
    Cleared,
    Ticked,
    Forwarded { found: bool },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedToast {
    pub toast_id: ToastId,
    pub message: String,
    pub state: ToastState,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub outcomes: Vec<Outcome>,
    pub currently_active: usize,
    pub toasts: Vec<TrackedToast>,
    pub panes: Vec<PaneSnapshot>,
}

#[derive(Serialize)]
pub struct RunResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub report: Option<Report>,
}

/// A service driven on a virtual clock.
pub struct Session {
    service: ToastrService<OverlayContainer>,
    container: OverlayContainer,
    now: Instant,
    outcomes: Vec<Outcome>,
}

impl Session {
    pub fn new(config: ToastrConfig) -> Self {
        let container = OverlayContainer::new();
        Self {
            service: ToastrService::new(config, container.clone()),
            container,
            now: Instant::now(),
            outcomes: Vec::new(),
        }
    }

    pub fn apply(&mut self, step: Step) {
        let outcome = match step {
            Step::Success(n) => self.notify(Severity::Success, n),
            Step::Error(n) => self.notify(Severity::Error, n),
            Step::Info(n) => self.notify(Severity::Info, n),
            Step::Warning(n) => self.notify(Severity::Warning, n),
            Step::Remove(Target { id }) => Outcome::Removed {
                removed: self.service.remove(id),
            },
            Step::Clear { id } => {
                self.service.clear(id);
                Outcome::Cleared
            }
            Step::Tick { advance_ms } => {
                self.now += Duration::from_millis(advance_ms);
                self.service.tick(self.now);
                Outcome::Ticked
            }
            Step::Tap(Target { id }) => self.forward(id, |p| p.tap()),
            Step::Hover(Target { id }) => self.forward(id, |p| p.stick_around()),
            Step::Leave(Target { id }) => self.forward(id, |p| p.delayed_hide_toast()),
        };
        log::debug!("[run] {:?}", outcome);
        self.outcomes.push(outcome);
    }

    fn notify(&mut self, severity: Severity, n: Notify) -> Outcome {
        match self.service.show(
            severity,
            &n.message,
            n.title.as_deref(),
            n.options.map(Into::into),
        ) {
            Some(toast) => Outcome::Created {
                toast_id: toast.toast_id(),
            },
            None => Outcome::Suppressed,
        }
    }

    fn forward(
        &self,
        id: ToastId,
        action: impl FnOnce(&toastr_shared::portal::ComponentRef),
    ) -> Outcome {
        match self.service.get(id) {
            Some(toast) => {
                action(toast.portal());
                Outcome::Forwarded { found: true }
            }
            None => Outcome::Forwarded { found: false },
        }
    }

    pub fn into_report(self) -> Report {
        Report {
            currently_active: self.service.currently_active(),
            toasts: self
                .service
                .toasts()
                .iter()
                .map(|t| TrackedToast {
                    toast_id: t.toast_id(),
                    message: t.message().to_string(),
                    state: t.portal().state(),
                })
                .collect(),
            panes: self.container.snapshot(self.now),
            outcomes: self.outcomes,
        }
    }
}

/// Parse a JSON-lines script. Blank lines and lines starting with `#` are skipped.
pub fn parse_script(input: &str) -> Result<Vec<Step>, String> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(n, line)| {
            serde_json::from_str(line)
                .map_err(|e| format!("Failed to parse step on line {}: {}", n + 1, e))
        })
        .collect()
}

pub fn run_script(input: &str, config: ToastrConfig) -> Result<Report, String> {
    let steps = parse_script(input)?;
    let mut session = Session::new(config);
    for step in steps {
        session.apply(step);
    }
    Ok(session.into_report())
}

fn read_input(file: Option<&std::path::Path>) -> Result<String, String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e)),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .map_err(|e| format!("Failed to read stdin: {}", e))?;
            Ok(input)
        }
    }
}

/// Serializes a RunResult as JSON and writes it to stdout
pub fn emit_result(result: RunResult) {
    println!(
        "{}",
        serde_json::to_string(&result).unwrap_or_else(|_| r#"{"success":false}"#.to_string())
    );
}

fn into_result(report: Result<Report, String>) -> RunResult {
    match report {
        Ok(report) => RunResult {
            success: true,
            error: None,
            report: Some(report),
        },
        Err(e) => RunResult {
            success: false,
            error: Some(e),
            report: None,
        },
    }
}

pub fn handle_run(file: Option<&std::path::Path>) {
    let report = read_input(file).and_then(|input| {
        let config = config::load_config().toastr;
        run_script(&input, config)
    });
    emit_result(into_result(report));
}

pub fn handle_show(severity: Severity, message: String, title: Option<String>) {
    let mut session = Session::new(config::load_config().toastr);
    let notify = Notify {
        message,
        title,
        options: None,
    };
    session.apply(match severity {
        Severity::Success => Step::Success(notify),
        Severity::Error => Step::Error(notify),
        Severity::Info => Step::Info(notify),
        Severity::Warning => Step::Warning(notify),
    });
    session.apply(Step::Tick { advance_ms: 0 });
    emit_result(into_result(Ok(session.into_report())));
}
