//! Components and the handles that bind them to an overlay.
//!
//! A `ComponentPortal` knows how to build a component; attaching it to an
//! `OverlayRef` yields a `ComponentRef` shared between the overlay (which
//! renders it) and the service (which drives its state).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

use crate::models::{ToastPackage, ToastState};
use crate::toast::Toast;

/// A renderable toast unit.
///
/// Time only enters through `tick`; state changes requested between ticks
/// (activation, pointer leave) arm their timers on the next tick.
pub trait ToastComponent: fmt::Debug {
    fn bind(&mut self, package: ToastPackage);
    fn package(&self) -> Option<&ToastPackage>;
    fn state(&self) -> ToastState;
    fn activate_toast(&mut self);
    /// Visual removal. Does not touch service bookkeeping.
    fn remove(&mut self);

    fn tick(&mut self, _now: Instant) {}

    fn tap(&mut self) {}

    fn stick_around(&mut self) {}

    fn delayed_hide_toast(&mut self) {}

    /// Remaining display time in percent, when a progress bar is shown.
    fn progress(&self, _now: Instant) -> Option<f32> {
        None
    }
}

/// Constructor for the component a toast is rendered with.
#[derive(Clone, Copy)]
pub struct ComponentFactory(fn() -> Box<dyn ToastComponent>);

impl ComponentFactory {
    pub const fn new(create: fn() -> Box<dyn ToastComponent>) -> Self {
        Self(create)
    }

    pub fn create(&self) -> Box<dyn ToastComponent> {
        (self.0)()
    }
}

impl Default for ComponentFactory {
    fn default() -> Self {
        Self::new(Toast::boxed)
    }
}

impl fmt::Debug for ComponentFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ComponentFactory")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentPortal {
    factory: ComponentFactory,
}

impl ComponentPortal {
    pub fn new(factory: ComponentFactory) -> Self {
        Self { factory }
    }

    pub fn create(&self) -> ComponentRef {
        ComponentRef::new(self.factory.create())
    }
}

/// Shared handle to an attached component.
#[derive(Debug, Clone)]
pub struct ComponentRef(Rc<RefCell<Box<dyn ToastComponent>>>);

impl ComponentRef {
    pub fn new(component: Box<dyn ToastComponent>) -> Self {
        Self(Rc::new(RefCell::new(component)))
    }

    pub fn bind(&self, package: ToastPackage) {
        self.0.borrow_mut().bind(package);
    }

    pub fn package(&self) -> Option<ToastPackage> {
        self.0.borrow().package().cloned()
    }

    pub fn state(&self) -> ToastState {
        self.0.borrow().state()
    }

    pub fn activate_toast(&self) {
        self.0.borrow_mut().activate_toast();
    }

    pub fn remove(&self) {
        self.0.borrow_mut().remove();
    }

    pub fn tick(&self, now: Instant) {
        self.0.borrow_mut().tick(now);
    }

    pub fn tap(&self) {
        self.0.borrow_mut().tap();
    }

    pub fn stick_around(&self) {
        self.0.borrow_mut().stick_around();
    }

    pub fn delayed_hide_toast(&self) {
        self.0.borrow_mut().delayed_hide_toast();
    }

    pub fn progress(&self, now: Instant) -> Option<f32> {
        self.0.borrow().progress(now)
    }

    pub fn ptr_eq(&self, other: &ComponentRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
