//! Overlay layer that toasts are attached to.
//!
//! The service only sees the `Overlay` / `OverlayRef` traits. `OverlayContainer`
//! is the headless implementation: one pane per position class, each holding
//! its attached components in render order.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use crate::models::{PaneSnapshot, ToastSnapshot};
use crate::portal::{ComponentPortal, ComponentRef};

/// Creates overlay handles positioned by a position class token.
pub trait Overlay {
    type Ref: OverlayRef;

    fn create(&mut self, position_class: &str) -> Self::Ref;
}

pub trait OverlayRef {
    /// Attach a component built from `portal`. With `newest_on_top` it is placed
    /// above everything already in the pane.
    fn attach(&mut self, portal: ComponentPortal, newest_on_top: bool) -> ComponentRef;
    /// Tear the attached component down. Safe to call more than once.
    fn detach(&mut self);
}

#[derive(Debug)]
struct Entry {
    key: u64,
    component: ComponentRef,
}

#[derive(Debug)]
struct Pane {
    position_class: String,
    entries: Vec<Entry>,
}

#[derive(Debug, Default)]
struct ContainerState {
    panes: Vec<Pane>,
    next_key: u64,
}

impl ContainerState {
    fn pane_mut(&mut self, position_class: &str) -> &mut Pane {
        let index = match self
            .panes
            .iter()
            .position(|p| p.position_class == position_class)
        {
            Some(index) => index,
            None => {
                log::debug!("[overlay] creating pane {}", position_class);
                self.panes.push(Pane {
                    position_class: position_class.to_string(),
                    entries: Vec::new(),
                });
                self.panes.len() - 1
            }
        };
        &mut self.panes[index]
    }
}

/// Headless overlay. Clones share the same panes.
#[derive(Debug, Clone, Default)]
pub struct OverlayContainer {
    state: Rc<RefCell<ContainerState>>,
}

impl OverlayContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Components of a pane, top to bottom.
    pub fn components(&self, position_class: &str) -> Vec<ComponentRef> {
        self.state
            .borrow()
            .panes
            .iter()
            .find(|p| p.position_class == position_class)
            .map(|p| p.entries.iter().map(|e| e.component.clone()).collect())
            .unwrap_or_default()
    }

    pub fn attached_count(&self) -> usize {
        self.state
            .borrow()
            .panes
            .iter()
            .map(|p| p.entries.len())
            .sum()
    }

    pub fn snapshot(&self, now: Instant) -> Vec<PaneSnapshot> {
        self.state
            .borrow()
            .panes
            .iter()
            .map(|pane| PaneSnapshot {
                position_class: pane.position_class.clone(),
                toasts: pane
                    .entries
                    .iter()
                    .map(|e| snapshot_component(&e.component, now))
                    .collect(),
            })
            .collect()
    }
}

fn snapshot_component(component: &ComponentRef, now: Instant) -> ToastSnapshot {
    let package = component.package();
    ToastSnapshot {
        toast_id: package.as_ref().map(|p| p.toast_id),
        title: package.as_ref().and_then(|p| p.title.clone()),
        message: package.as_ref().map(|p| p.message.clone()),
        toast_type: package.as_ref().map(|p| p.toast_type.clone()),
        toast_class: package.as_ref().map(|p| p.options.toast_class.clone()),
        state: component.state(),
        progress: component.progress(now),
    }
}

impl Overlay for OverlayContainer {
    type Ref = PaneRef;

    fn create(&mut self, position_class: &str) -> PaneRef {
        self.state.borrow_mut().pane_mut(position_class);
        PaneRef {
            state: Rc::clone(&self.state),
            position_class: position_class.to_string(),
            key: None,
        }
    }
}

/// Handle to one slot in a pane of an `OverlayContainer`.
#[derive(Debug)]
pub struct PaneRef {
    state: Rc<RefCell<ContainerState>>,
    position_class: String,
    key: Option<u64>,
}

impl PaneRef {
    pub fn position_class(&self) -> &str {
        &self.position_class
    }

    pub fn is_attached(&self) -> bool {
        self.key.is_some()
    }
}

impl OverlayRef for PaneRef {
    fn attach(&mut self, portal: ComponentPortal, newest_on_top: bool) -> ComponentRef {
        self.detach();
        let component = portal.create();

        let mut state = self.state.borrow_mut();
        let key = state.next_key;
        state.next_key += 1;

        let entry = Entry {
            key,
            component: component.clone(),
        };
        let pane = state.pane_mut(&self.position_class);
        if newest_on_top {
            pane.entries.insert(0, entry);
        } else {
            pane.entries.push(entry);
        }
        self.key = Some(key);
        component
    }

    fn detach(&mut self) {
        let Some(key) = self.key.take() else {
            return;
        };
        let mut state = self.state.borrow_mut();
        let pane = state.pane_mut(&self.position_class);
        pane.entries.retain(|e| e.key != key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ToastState;

    #[test]
    fn newest_on_top_inserts_first() {
        let mut container = OverlayContainer::new();
        let mut first = container.create("toast-top-right");
        let a = first.attach(ComponentPortal::default(), true);
        let mut second = container.create("toast-top-right");
        let b = second.attach(ComponentPortal::default(), true);

        let stack = container.components("toast-top-right");
        assert_eq!(stack.len(), 2);
        assert!(stack[0].ptr_eq(&b));
        assert!(stack[1].ptr_eq(&a));
    }

    #[test]
    fn oldest_on_top_appends() {
        let mut container = OverlayContainer::new();
        let a = container
            .create("toast-bottom-left")
            .attach(ComponentPortal::default(), false);
        let b = container
            .create("toast-bottom-left")
            .attach(ComponentPortal::default(), false);

        let stack = container.components("toast-bottom-left");
        assert!(stack[0].ptr_eq(&a));
        assert!(stack[1].ptr_eq(&b));
    }

    #[test]
    fn detach_is_idempotent() {
        let mut container = OverlayContainer::new();
        let mut pane_ref = container.create("toast-top-right");
        pane_ref.attach(ComponentPortal::default(), true);
        assert!(pane_ref.is_attached());
        assert_eq!(container.attached_count(), 1);

        pane_ref.detach();
        pane_ref.detach();
        assert!(!pane_ref.is_attached());
        assert_eq!(container.attached_count(), 0);
    }

    #[test]
    fn panes_are_keyed_by_position_class() {
        let mut container = OverlayContainer::new();
        container
            .create("toast-top-right")
            .attach(ComponentPortal::default(), true);
        container
            .create("toast-bottom-center")
            .attach(ComponentPortal::default(), true);

        let snapshot = container.snapshot(Instant::now());
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].position_class, "toast-top-right");
        assert_eq!(snapshot[1].position_class, "toast-bottom-center");
        assert_eq!(snapshot[1].toasts[0].state, ToastState::Inactive);
        assert!(snapshot[1].toasts[0].toast_id.is_none());
    }
}
