//! Active-toast bookkeeping and admission control.
//!
//! Toasts are tracked in creation order. The active ones form a prefix of that
//! list (by current position), counted by `currently_active`; the rest are
//! queued and get activated as slots free up. Activation of a newly admitted
//! toast is deferred to the next `tick`, so callers cannot observe it as
//! active right after creating it.

use std::time::Instant;

use crate::config::{ToastConfig, ToastOptions, ToastrConfig};
use crate::models::{Severity, ToastId, ToastPackage, ToastState};
use crate::overlay::{Overlay, OverlayRef};
use crate::portal::{ComponentPortal, ComponentRef};

/// A toast tracked by the service.
#[derive(Debug)]
pub struct ActiveToast<R> {
    toast_id: ToastId,
    message: String,
    portal: ComponentRef,
    overlay_ref: R,
    /// Whether this toast holds one of the `currently_active` slots.
    counted: bool,
}

impl<R> ActiveToast<R> {
    pub fn toast_id(&self) -> ToastId {
        self.toast_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn portal(&self) -> &ComponentRef {
        &self.portal
    }

    pub fn overlay_ref(&self) -> &R {
        &self.overlay_ref
    }
}

pub struct ToastrService<O: Overlay> {
    config: ToastrConfig,
    overlay: O,
    index: u64,
    toasts: Vec<ActiveToast<O::Ref>>,
    currently_active: usize,
    /// Toasts admitted as active whose activation runs on the next tick.
    pending: Vec<ToastId>,
}

impl<O: Overlay> ToastrService<O> {
    pub fn new(config: ToastrConfig, overlay: O) -> Self {
        Self {
            config,
            overlay,
            index: 0,
            toasts: Vec::new(),
            currently_active: 0,
            pending: Vec::new(),
        }
    }

    pub fn config(&self) -> &ToastrConfig {
        &self.config
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    pub fn toasts(&self) -> &[ActiveToast<O::Ref>] {
        &self.toasts
    }

    pub fn currently_active(&self) -> usize {
        self.currently_active
    }

    pub fn get(&self, toast_id: ToastId) -> Option<&ActiveToast<O::Ref>> {
        self.find_toast(toast_id).map(|index| &self.toasts[index])
    }

    pub fn success(
        &mut self,
        message: &str,
        title: Option<&str>,
        options_override: Option<ToastOptions>,
    ) -> Option<&ActiveToast<O::Ref>> {
        self.show(Severity::Success, message, title, options_override)
    }

    pub fn error(
        &mut self,
        message: &str,
        title: Option<&str>,
        options_override: Option<ToastOptions>,
    ) -> Option<&ActiveToast<O::Ref>> {
        self.show(Severity::Error, message, title, options_override)
    }

    pub fn info(
        &mut self,
        message: &str,
        title: Option<&str>,
        options_override: Option<ToastOptions>,
    ) -> Option<&ActiveToast<O::Ref>> {
        self.show(Severity::Info, message, title, options_override)
    }

    pub fn warning(
        &mut self,
        message: &str,
        title: Option<&str>,
        options_override: Option<ToastOptions>,
    ) -> Option<&ActiveToast<O::Ref>> {
        self.show(Severity::Warning, message, title, options_override)
    }

    /// Create a toast of the given severity. `None` when it was suppressed as a duplicate.
    pub fn show(
        &mut self,
        severity: Severity,
        message: &str,
        title: Option<&str>,
        options_override: Option<ToastOptions>,
    ) -> Option<&ActiveToast<O::Ref>> {
        let toast_type = self.config.icon_classes.class_for(severity).to_string();
        let options = self.create_toast_config(options_override);
        self.build_notification(toast_type, message, title, options)
    }

    /// Resolve the options a toast is built with.
    pub fn create_toast_config(&self, options_override: Option<ToastOptions>) -> ToastConfig {
        match options_override {
            None => self.config.toast.clone(),
            Some(ToastOptions::Resolved(config)) => config,
            Some(ToastOptions::Partial(single)) => ToastConfig::from(single),
        }
    }

    /// Visually remove one toast, or every tracked toast when `toast_id` is `None`.
    ///
    /// Bookkeeping is left alone; the removed components are dropped from the
    /// service on the next `tick`.
    pub fn clear(&mut self, toast_id: Option<ToastId>) {
        for toast in &self.toasts {
            match toast_id {
                Some(id) => {
                    if toast.toast_id == id {
                        toast.portal.remove();
                        return;
                    }
                }
                None => toast.portal.remove(),
            }
        }
    }

    /// Stop tracking a toast and detach it. Frees its slot for the next queued toast.
    ///
    /// `currently_active` only drops when the removed toast held an active slot;
    /// removing a queued or still-pending toast leaves it unchanged.
    pub fn remove(&mut self, toast_id: ToastId) -> bool {
        let Some(index) = self.find_toast(toast_id) else {
            return false;
        };
        let mut active_toast = self.toasts.remove(index);
        active_toast.overlay_ref.detach();
        self.pending.retain(|id| *id != toast_id);
        log::debug!("[toastr] removed toast {}", toast_id);

        let was_counted = active_toast.counted;
        if was_counted {
            self.currently_active = self.currently_active.saturating_sub(1);
        }

        let max_opened = self.config.max_opened;
        if max_opened == 0 || self.toasts.is_empty() {
            return true;
        }
        if was_counted && self.currently_active <= max_opened {
            if let Some(next) = self.toasts.get_mut(self.currently_active) {
                if next.portal.state() == ToastState::Inactive {
                    self.currently_active += 1;
                    next.counted = true;
                    next.portal.activate_toast();
                    let next_id = next.toast_id;
                    self.pending.retain(|id| *id != next_id);
                    log::debug!("[toastr] activated queued toast {}", next_id);
                }
            }
        }
        self.promote_queued();
        true
    }

    /// Hand free slots to queued toasts in list order.
    ///
    /// Slots promised to pending activations count as taken.
    fn promote_queued(&mut self) {
        let max_opened = self.config.max_opened;
        if max_opened == 0 {
            return;
        }
        while self.currently_active + self.pending.len() < max_opened {
            let pending = &self.pending;
            let Some(next) = self.toasts.iter_mut().find(|t| {
                !t.counted
                    && !pending.contains(&t.toast_id)
                    && t.portal.state() == ToastState::Inactive
            }) else {
                break;
            };
            next.counted = true;
            next.portal.activate_toast();
            self.currently_active += 1;
            log::debug!("[toastr] activated queued toast {}", next.toast_id);
        }
    }

    /// Advance the service by one scheduler turn.
    ///
    /// Runs deferred activations, lets every component advance its timers, then
    /// drops toasts whose component has been removed.
    pub fn tick(&mut self, now: Instant) {
        for toast_id in std::mem::take(&mut self.pending) {
            let Some(index) = self.find_toast(toast_id) else {
                continue;
            };
            let toast = &mut self.toasts[index];
            if toast.counted || toast.portal.state() != ToastState::Inactive {
                continue;
            }
            toast.portal.activate_toast();
            toast.counted = true;
            self.currently_active += 1;
        }

        for toast in &self.toasts {
            toast.portal.tick(now);
        }

        let closed: Vec<ToastId> = self
            .toasts
            .iter()
            .filter(|t| t.portal.state() == ToastState::Removed)
            .map(|t| t.toast_id)
            .collect();
        for toast_id in closed {
            self.remove(toast_id);
        }
        self.promote_queued();
    }

    fn find_toast(&self, toast_id: ToastId) -> Option<usize> {
        self.toasts.iter().position(|t| t.toast_id == toast_id)
    }

    fn is_duplicate(&self, message: &str) -> bool {
        self.toasts.iter().any(|t| t.message == message)
    }

    fn build_notification(
        &mut self,
        toast_type: String,
        message: &str,
        title: Option<&str>,
        options: ToastConfig,
    ) -> Option<&ActiveToast<O::Ref>> {
        if self.config.prevent_duplicates && self.is_duplicate(message) {
            log::debug!("[toastr] suppressed duplicate: {}", message);
            return None;
        }

        let max_opened = self.config.max_opened;
        let mut keep_inactive = false;
        // Slots already promised to pending activations count as taken.
        if max_opened > 0 && self.currently_active + self.pending.len() >= max_opened {
            keep_inactive = true;
            if self.config.auto_dismiss {
                if let Some(last_id) = self.toasts.last().map(|t| t.toast_id) {
                    self.clear(Some(last_id));
                }
            }
        }

        let toast_id = ToastId::new(self.index);
        self.index += 1;

        let mut overlay_ref = self.overlay.create(&options.position_class);
        let portal = overlay_ref.attach(
            ComponentPortal::new(options.toast_component),
            self.config.newest_on_top,
        );
        portal.bind(ToastPackage {
            toast_id,
            message: message.to_string(),
            title: title.map(str::to_string),
            toast_type,
            options,
        });

        if keep_inactive {
            log::debug!("[toastr] queued toast {}", toast_id);
        } else {
            self.pending.push(toast_id);
        }

        self.toasts.push(ActiveToast {
            toast_id,
            message: message.to_string(),
            portal,
            overlay_ref,
            counted: false,
        });
        self.toasts.last()
    }
}
