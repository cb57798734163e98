//! The default toast component.

use std::time::{Duration, Instant};

use crate::config::ToastConfig;
use crate::models::{ToastPackage, ToastState};
use crate::portal::ToastComponent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HideTimer {
    Off,
    /// Requested between ticks; starts counting on the next tick.
    Armed,
    At(Instant),
}

#[derive(Debug)]
pub struct Toast {
    package: Option<ToastPackage>,
    state: ToastState,
    /// Effective display time; hovering resets it to 0 and leaving to `extended_time_out`.
    time_out: u64,
    hide: HideTimer,
}

impl Default for Toast {
    fn default() -> Self {
        Self {
            package: None,
            state: ToastState::Inactive,
            time_out: 0,
            hide: HideTimer::Off,
        }
    }
}

impl Toast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed() -> Box<dyn ToastComponent> {
        Box::new(Self::new())
    }

    fn options(&self) -> Option<&ToastConfig> {
        self.package.as_ref().map(|p| &p.options)
    }
}

impl ToastComponent for Toast {
    fn bind(&mut self, package: ToastPackage) {
        self.time_out = package.options.time_out;
        self.package = Some(package);
    }

    fn package(&self) -> Option<&ToastPackage> {
        self.package.as_ref()
    }

    fn state(&self) -> ToastState {
        self.state
    }

    fn activate_toast(&mut self) {
        if self.state != ToastState::Inactive {
            return;
        }
        self.state = ToastState::Active;
        if self.time_out > 0 {
            self.hide = HideTimer::Armed;
        }
    }

    fn remove(&mut self) {
        if self.state == ToastState::Removed {
            return;
        }
        self.hide = HideTimer::Off;
        self.state = ToastState::Removed;
    }

    fn tick(&mut self, now: Instant) {
        match self.hide {
            HideTimer::Off => {}
            HideTimer::Armed => {
                self.hide = HideTimer::At(now + Duration::from_millis(self.time_out));
            }
            HideTimer::At(at) => {
                if now >= at {
                    self.remove();
                }
            }
        }
    }

    fn tap(&mut self) {
        if self.state == ToastState::Removed {
            return;
        }
        if self.options().is_some_and(|o| o.tap_to_dismiss) {
            self.remove();
        }
    }

    fn stick_around(&mut self) {
        if self.state == ToastState::Removed {
            return;
        }
        self.hide = HideTimer::Off;
        self.time_out = 0;
    }

    fn delayed_hide_toast(&mut self) {
        let extended = self.options().map_or(0, |o| o.extended_time_out);
        if extended == 0 || self.state == ToastState::Removed {
            return;
        }
        self.time_out = extended;
        self.hide = HideTimer::Armed;
    }

    fn progress(&self, now: Instant) -> Option<f32> {
        if !self.options().is_some_and(|o| o.progress_bar) {
            return None;
        }
        let width = match self.hide {
            HideTimer::Armed => 100.0,
            HideTimer::At(at) if self.time_out > 0 => {
                let remaining = at.saturating_duration_since(now).as_millis() as f32;
                remaining / self.time_out as f32 * 100.0
            }
            _ => 0.0,
        };
        Some(width.clamp(0.0, 100.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ToastId;

    fn bound(options: ToastConfig) -> Toast {
        let mut toast = Toast::new();
        toast.bind(ToastPackage {
            toast_id: ToastId::new(0),
            message: "saved".to_string(),
            title: None,
            toast_type: "toast-success".to_string(),
            options,
        });
        toast
    }

    #[test]
    fn hides_after_time_out() {
        let start = Instant::now();
        let mut toast = bound(ToastConfig::default());
        toast.activate_toast();
        toast.tick(start);
        assert_eq!(toast.state(), ToastState::Active);

        toast.tick(start + Duration::from_millis(4999));
        assert_eq!(toast.state(), ToastState::Active);

        toast.tick(start + Duration::from_millis(5000));
        assert_eq!(toast.state(), ToastState::Removed);
    }

    #[test]
    fn zero_time_out_is_sticky() {
        let start = Instant::now();
        let mut toast = bound(ToastConfig {
            time_out: 0,
            ..Default::default()
        });
        toast.activate_toast();
        toast.tick(start);
        toast.tick(start + Duration::from_secs(3600));
        assert_eq!(toast.state(), ToastState::Active);
    }

    #[test]
    fn activation_does_not_revive_removed_toast() {
        let mut toast = bound(ToastConfig::default());
        toast.remove();
        toast.activate_toast();
        assert_eq!(toast.state(), ToastState::Removed);
    }

    #[test]
    fn tap_respects_tap_to_dismiss() {
        let mut sticky = bound(ToastConfig {
            tap_to_dismiss: false,
            ..Default::default()
        });
        sticky.activate_toast();
        sticky.tap();
        assert_eq!(sticky.state(), ToastState::Active);

        let mut toast = bound(ToastConfig::default());
        toast.activate_toast();
        toast.tap();
        assert_eq!(toast.state(), ToastState::Removed);
    }

    #[test]
    fn hover_then_leave_uses_extended_time_out() {
        let start = Instant::now();
        let mut toast = bound(ToastConfig::default());
        toast.activate_toast();
        toast.tick(start);

        toast.stick_around();
        toast.tick(start + Duration::from_secs(60));
        assert_eq!(toast.state(), ToastState::Active);

        toast.delayed_hide_toast();
        let left = start + Duration::from_secs(61);
        toast.tick(left);
        toast.tick(left + Duration::from_millis(999));
        assert_eq!(toast.state(), ToastState::Active);
        toast.tick(left + Duration::from_millis(1000));
        assert_eq!(toast.state(), ToastState::Removed);
    }

    #[test]
    fn progress_counts_down() {
        let start = Instant::now();
        let mut toast = bound(ToastConfig {
            progress_bar: true,
            time_out: 1000,
            ..Default::default()
        });
        toast.activate_toast();
        assert_eq!(toast.progress(start), Some(100.0));
        toast.tick(start);

        let half = toast.progress(start + Duration::from_millis(500)).unwrap();
        assert!((half - 50.0).abs() < 0.5);
        assert_eq!(toast.progress(start + Duration::from_secs(5)), Some(0.0));
    }

    #[test]
    fn no_progress_without_progress_bar() {
        let mut toast = bound(ToastConfig::default());
        toast.activate_toast();
        assert!(toast.progress(Instant::now()).is_none());
    }
}
