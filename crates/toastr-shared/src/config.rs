use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use toml_edit::DocumentMut;

use crate::models::Severity;
use crate::portal::ComponentFactory;

/// Return XDG_CONFIG_HOME/toastr.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("toastr")
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".config").join("toastr")
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    pub editor: Option<String>,
    #[serde(default)]
    pub toastr: ToastrConfig,
}

/// Options for a single toast, fully resolved.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToastConfig {
    /// Display time in milliseconds once active; 0 keeps the toast until dismissed.
    #[serde(default = "default_time_out")]
    pub time_out: u64,
    /// Display time after the pointer leaves a hovered toast.
    #[serde(default = "default_extended_time_out")]
    pub extended_time_out: u64,
    #[serde(default)]
    pub close_button: bool,
    #[serde(default)]
    pub progress_bar: bool,
    #[serde(default)]
    pub enable_html: bool,
    #[serde(default = "default_true")]
    pub tap_to_dismiss: bool,
    #[serde(default = "default_toast_class")]
    pub toast_class: String,
    #[serde(default = "default_position_class")]
    pub position_class: String,
    #[serde(default = "default_title_class")]
    pub title_class: String,
    #[serde(default = "default_message_class")]
    pub message_class: String,
    #[serde(skip)]
    pub toast_component: ComponentFactory,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            time_out: default_time_out(),
            extended_time_out: default_extended_time_out(),
            close_button: false,
            progress_bar: false,
            enable_html: false,
            tap_to_dismiss: true,
            toast_class: default_toast_class(),
            position_class: default_position_class(),
            title_class: default_title_class(),
            message_class: default_message_class(),
            toast_component: ComponentFactory::default(),
        }
    }
}

/// Per-call overrides. Unset fields fall back to the built-in `ToastConfig` defaults,
/// not to the service's configured defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SingleToastConfig {
    pub time_out: Option<u64>,
    pub extended_time_out: Option<u64>,
    pub close_button: Option<bool>,
    pub progress_bar: Option<bool>,
    pub enable_html: Option<bool>,
    pub tap_to_dismiss: Option<bool>,
    pub toast_class: Option<String>,
    pub position_class: Option<String>,
    pub title_class: Option<String>,
    pub message_class: Option<String>,
    #[serde(skip)]
    pub toast_component: Option<ComponentFactory>,
}

impl From<SingleToastConfig> for ToastConfig {
    fn from(single: SingleToastConfig) -> Self {
        let defaults = ToastConfig::default();
        Self {
            time_out: single.time_out.unwrap_or(defaults.time_out),
            extended_time_out: single
                .extended_time_out
                .unwrap_or(defaults.extended_time_out),
            close_button: single.close_button.unwrap_or(defaults.close_button),
            progress_bar: single.progress_bar.unwrap_or(defaults.progress_bar),
            enable_html: single.enable_html.unwrap_or(defaults.enable_html),
            tap_to_dismiss: single.tap_to_dismiss.unwrap_or(defaults.tap_to_dismiss),
            toast_class: single.toast_class.unwrap_or(defaults.toast_class),
            position_class: single.position_class.unwrap_or(defaults.position_class),
            title_class: single.title_class.unwrap_or(defaults.title_class),
            message_class: single.message_class.unwrap_or(defaults.message_class),
            toast_component: single
                .toast_component
                .unwrap_or(defaults.toast_component),
        }
    }
}

/// What a caller may pass as the options of a single toast.
#[derive(Debug, Clone)]
pub enum ToastOptions {
    /// Used as-is.
    Resolved(ToastConfig),
    /// Resolved against the built-in defaults.
    Partial(SingleToastConfig),
}

impl From<ToastConfig> for ToastOptions {
    fn from(config: ToastConfig) -> Self {
        ToastOptions::Resolved(config)
    }
}

impl From<SingleToastConfig> for ToastOptions {
    fn from(config: SingleToastConfig) -> Self {
        ToastOptions::Partial(config)
    }
}

/// Type tags attached to toasts of each severity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct IconClasses {
    #[serde(default = "default_icon_error")]
    pub error: String,
    #[serde(default = "default_icon_info")]
    pub info: String,
    #[serde(default = "default_icon_success")]
    pub success: String,
    #[serde(default = "default_icon_warning")]
    pub warning: String,
}

impl IconClasses {
    pub fn class_for(&self, severity: Severity) -> &str {
        match severity {
            Severity::Error => &self.error,
            Severity::Info => &self.info,
            Severity::Success => &self.success,
            Severity::Warning => &self.warning,
        }
    }
}

impl Default for IconClasses {
    fn default() -> Self {
        Self {
            error: default_icon_error(),
            info: default_icon_info(),
            success: default_icon_success(),
            warning: default_icon_warning(),
        }
    }
}

/// Service-wide configuration: admission policy plus the default toast options.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToastrConfig {
    /// Maximum simultaneously active toasts; 0 means unlimited.
    #[serde(default)]
    pub max_opened: usize,
    /// Dismiss the most recent toast when a new one arrives at `max_opened`.
    #[serde(default)]
    pub auto_dismiss: bool,
    #[serde(default = "default_true")]
    pub newest_on_top: bool,
    #[serde(default)]
    pub prevent_duplicates: bool,
    #[serde(default)]
    pub icon_classes: IconClasses,
    #[serde(flatten)]
    pub toast: ToastConfig,
}

impl Default for ToastrConfig {
    fn default() -> Self {
        Self {
            max_opened: 0,
            auto_dismiss: false,
            newest_on_top: true,
            prevent_duplicates: false,
            icon_classes: IconClasses::default(),
            toast: ToastConfig::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_time_out() -> u64 {
    5000
}

fn default_extended_time_out() -> u64 {
    1000
}

fn default_toast_class() -> String {
    "toast".to_string()
}

fn default_position_class() -> String {
    "toast-top-right".to_string()
}

fn default_title_class() -> String {
    "toast-title".to_string()
}

fn default_message_class() -> String {
    "toast-message".to_string()
}

fn default_icon_error() -> String {
    "toast-error".to_string()
}

fn default_icon_info() -> String {
    "toast-info".to_string()
}

fn default_icon_success() -> String {
    "toast-success".to_string()
}

fn default_icon_warning() -> String {
    "toast-warning".to_string()
}

/// Return the path to config.toml.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load config.toml. Return defaults if the file is missing or fails to parse.
pub fn load_config() -> AppConfig {
    let path = config_path();
    match std::fs::read_to_string(&path) {
        Ok(content) => parse_config(&content).unwrap_or_else(|e| {
            log::warn!("Failed to parse config.toml: {}, using defaults", e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

pub fn parse_config(content: &str) -> Result<AppConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Keys under [toastr] that `save_toastr_value` accepts, with their kind.
const SETTABLE_KEYS: &[(&str, SettingKind)] = &[
    ("max_opened", SettingKind::Integer),
    ("auto_dismiss", SettingKind::Bool),
    ("newest_on_top", SettingKind::Bool),
    ("prevent_duplicates", SettingKind::Bool),
    ("time_out", SettingKind::Integer),
    ("extended_time_out", SettingKind::Integer),
    ("close_button", SettingKind::Bool),
    ("progress_bar", SettingKind::Bool),
    ("enable_html", SettingKind::Bool),
    ("tap_to_dismiss", SettingKind::Bool),
    ("toast_class", SettingKind::String),
    ("position_class", SettingKind::String),
    ("title_class", SettingKind::String),
    ("message_class", SettingKind::String),
];

#[derive(Debug, Clone, Copy)]
enum SettingKind {
    Bool,
    Integer,
    String,
}

/// Parse a raw command-line value for a [toastr] key.
pub fn parse_setting(key: &str, raw: &str) -> Result<toml_edit::Value, String> {
    let kind = SETTABLE_KEYS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, kind)| *kind)
        .ok_or_else(|| format!("Unknown setting: {}", key))?;

    match kind {
        SettingKind::Bool => raw
            .parse::<bool>()
            .map(toml_edit::Value::from)
            .map_err(|_| format!("Invalid value for {}: expected true or false", key)),
        SettingKind::Integer => raw
            .parse::<u32>()
            .map(|v| toml_edit::Value::from(i64::from(v)))
            .map_err(|_| format!("Invalid value for {}: expected a non-negative integer", key)),
        SettingKind::String => Ok(toml_edit::Value::from(raw)),
    }
}

/// Update a [toastr] value in config.toml, preserving existing comments and formatting.
///
/// A file that does not parse, or whose `toastr` entry is not a table, is left untouched.
pub fn save_toastr_value(key: &str, value: toml_edit::Value) -> io::Result<()> {
    let path = config_path();
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };
    let mut doc: DocumentMut = content.parse().map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Failed to parse config.toml: {}", e),
        )
    })?;
    match doc.get("toastr").map(|item| item.is_table_like()) {
        None => doc["toastr"] = toml_edit::table(),
        Some(true) => {}
        Some(false) => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "[toastr] in config.toml is not a table",
            ))
        }
    }
    doc["toastr"][key] = toml_edit::value(value);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, doc.to_string())
}

/// Default config.toml template.
fn default_config_template() -> &'static str {
    r#"# toastr configuration

# Editor to open when running `toastr config`
# Falls back to $EDITOR environment variable, then vim
# editor = "vim"

[toastr]
# Maximum toasts shown at once; 0 means unlimited (default: 0)
# max_opened = 0

# Dismiss the most recent toast when max_opened is reached (default: false)
# auto_dismiss = false

# Stack new toasts above older ones (default: true)
# newest_on_top = true

# Ignore a toast whose message is already tracked (default: false)
# prevent_duplicates = false

# Display time in milliseconds, 0 keeps toasts until dismissed (default: 5000)
# time_out = 5000

# Display time after the pointer leaves a toast (default: 1000)
# extended_time_out = 1000

# Show a countdown progress bar (default: false)
# progress_bar = false

# Dismiss on tap (default: true)
# tap_to_dismiss = true

# Where toasts are stacked (default: toast-top-right)
# position_class = "toast-top-right"

# Type tags per severity
[toastr.icon_classes]
# error = "toast-error"
# info = "toast-info"
# success = "toast-success"
# warning = "toast-warning"
"#
}

/// Create config.toml with the default template if it does not exist. Return its path.
pub fn ensure_config_file() -> io::Result<PathBuf> {
    let path = config_path();
    if !path.exists() {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, default_config_template())?;
    }
    Ok(path)
}

/// Resolve the editor to use.
/// Priority: config.toml `editor` -> $EDITOR env var -> vim.
pub fn resolve_editor() -> String {
    let config = load_config();
    if let Some(ref editor) = config.editor {
        if !editor.is_empty() {
            return editor.clone();
        }
    }
    if let Ok(editor) = std::env::var("EDITOR") {
        if !editor.is_empty() {
            return editor;
        }
    }
    "vim".to_string()
}
