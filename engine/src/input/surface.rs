//! Input Surface Module
//!
//! The container the manager listens on: a canvas element, a window, or any
//! focusable region. The manager attaches one listener per recognised event
//! type when a surface is set and releases every one of them when the
//! surface is replaced, cleared, or the manager is destroyed.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::event::RawEventType;

/// Bounding rectangle of a container, in the host's client coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rectangle anchored at the origin (window-sized containers).
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// A rectangle without area cannot produce device coordinates.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Width / height, or 1.0 for an empty rectangle.
    pub fn aspect_ratio(&self) -> f32 {
        if self.is_empty() {
            1.0
        } else {
            self.width / self.height
        }
    }
}

/// Opaque handle for one attached listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub u64);

/// A container that input listeners can be attached to.
pub trait InputSurface {
    /// Current bounds of the container.
    fn bounds(&self) -> SurfaceRect;

    /// Start listening for `event_type`.
    fn add_listener(&self, event_type: RawEventType) -> ListenerHandle;

    /// Stop listening. Unknown handles are ignored.
    fn remove_listener(&self, handle: ListenerHandle);
}

/// Listener-counting surface for hosts that pump events themselves.
///
/// The host keeps the bounds current and asks [`CanvasSurface::is_listening`]
/// before forwarding an event, the same way a DOM element only delivers
/// events it has listeners for.
#[derive(Debug, Default)]
pub struct CanvasSurface {
    bounds: Cell<SurfaceRect>,
    listeners: RefCell<Vec<(ListenerHandle, RawEventType)>>,
    next_handle: Cell<u64>,
}

impl CanvasSurface {
    pub fn new(bounds: SurfaceRect) -> Self {
        Self {
            bounds: Cell::new(bounds),
            listeners: RefCell::new(Vec::new()),
            next_handle: Cell::new(1),
        }
    }

    /// Create a shareable surface, ready for `set_container`.
    pub fn shared(bounds: SurfaceRect) -> Rc<Self> {
        Rc::new(Self::new(bounds))
    }

    /// Update the bounds, e.g. after a window resize.
    pub fn set_bounds(&self, bounds: SurfaceRect) {
        self.bounds.set(bounds);
    }

    /// Number of listeners currently attached.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Whether any listener is attached for `event_type`.
    pub fn is_listening(&self, event_type: RawEventType) -> bool {
        self.listeners.borrow().iter().any(|(_, t)| *t == event_type)
    }
}

impl InputSurface for CanvasSurface {
    fn bounds(&self) -> SurfaceRect {
        self.bounds.get()
    }

    fn add_listener(&self, event_type: RawEventType) -> ListenerHandle {
        let handle = ListenerHandle(self.next_handle.get().max(1));
        self.next_handle.set(handle.0 + 1);
        self.listeners.borrow_mut().push((handle, event_type));
        handle
    }

    fn remove_listener(&self, handle: ListenerHandle) {
        self.listeners.borrow_mut().retain(|(h, _)| *h != handle);
    }
}

/// Listeners attached to one surface; released when dropped.
pub(crate) struct AttachedSurface {
    surface: Rc<dyn InputSurface>,
    listeners: Vec<(ListenerHandle, RawEventType)>,
}

impl AttachedSurface {
    /// Attach the full listener set to `surface`.
    pub(crate) fn attach(surface: Rc<dyn InputSurface>) -> Self {
        let listeners = RawEventType::LISTENED
            .iter()
            .map(|&event_type| (surface.add_listener(event_type), event_type))
            .collect();
        Self { surface, listeners }
    }

    /// Whether this guard belongs to `other` (pointer identity).
    pub(crate) fn is_same(&self, other: &Rc<dyn InputSurface>) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.surface), Rc::as_ptr(other))
    }

    pub(crate) fn bounds(&self) -> SurfaceRect {
        self.surface.bounds()
    }

    pub(crate) fn listens_for(&self, event_type: RawEventType) -> bool {
        self.listeners.iter().any(|(_, t)| *t == event_type)
    }
}

impl Drop for AttachedSurface {
    fn drop(&mut self) {
        for (handle, _) in self.listeners.drain(..) {
            self.surface.remove_listener(handle);
        }
    }
}
