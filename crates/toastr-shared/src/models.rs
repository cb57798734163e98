use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ToastConfig;

/// Identifier handed out by a `ToastrService`, unique for the lifetime of that service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToastId(u64);

impl ToastId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Info => "info",
            Severity::Warning => "warning",
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Severity::Success),
            "error" => Ok(Severity::Error),
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            _ => Err(format!("Invalid severity: {}", s)),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Visual sub-state of a rendered toast.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToastState {
    /// Tracked but waiting for a free slot (or for its activation turn).
    #[default]
    Inactive,
    Active,
    /// Visually dismissed; the service drops it on its next tick.
    Removed,
}

/// Fields a component displays, bound once right after attachment.
#[derive(Debug, Clone)]
pub struct ToastPackage {
    pub toast_id: ToastId,
    pub message: String,
    pub title: Option<String>,
    /// Icon class resolved from the severity, e.g. `toast-success`.
    pub toast_type: String,
    pub options: ToastConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToastSnapshot {
    pub toast_id: Option<ToastId>,
    pub title: Option<String>,
    pub message: Option<String>,
    pub toast_type: Option<String>,
    pub toast_class: Option<String>,
    pub state: ToastState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaneSnapshot {
    pub position_class: String,
    pub toasts: Vec<ToastSnapshot>,
}
