//! Toast notification bookkeeping: admission control, queuing and dismissal
//! of transient popups stacked on an overlay.

pub mod config;
pub mod models;
pub mod overlay;
pub mod portal;
pub mod service;
pub mod toast;
