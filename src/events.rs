use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::debug;

/// Input the globe component reacts to, in terminal cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    PointerDown { column: u16, row: u16 },
    PointerMove { column: u16, row: u16 },
    PointerUp,
    TouchMove { column: u16 },
    Resize { width: u16, height: u16 },
}

/// Map a crossterm mouse event onto the component's pointer events.
/// Drags and plain moves both become `PointerMove`; the component decides
/// whether a drag is in progress.
pub fn translate_mouse(mouse: MouseEvent) -> Option<InputEvent> {
    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::PointerDown { column, row }),
        MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
            Some(InputEvent::PointerMove { column, row })
        }
        MouseEventKind::Up(MouseButton::Left) => Some(InputEvent::PointerUp),
        _ => None,
    }
}

type Listener = Box<dyn FnMut(u16, u16)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Window-resize listener registry.
///
/// Listeners stay registered for as long as their [`Subscription`] lives.
/// Listeners must not subscribe or emit from inside their own callback.
#[derive(Clone, Default)]
pub struct ResizeBus {
    registry: Rc<RefCell<Registry>>,
}

impl ResizeBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl FnMut(u16, u16) + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Box::new(listener)));
        debug!(id, "resize listener registered");
        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    pub fn emit(&self, width: u16, height: u16) {
        for (_, listener) in self.registry.borrow_mut().listeners.iter_mut() {
            listener(width, height);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

/// Keeps a resize listener registered; dropping it deregisters.
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().listeners.retain(|(id, _)| *id != self.id);
            debug!(id = self.id, "resize listener removed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use std::cell::Cell;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent { kind, column, row, modifiers: KeyModifiers::NONE }
    }

    #[test]
    fn test_translate_mouse() {
        assert_eq!(
            translate_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 3, 4)),
            Some(InputEvent::PointerDown { column: 3, row: 4 })
        );
        assert_eq!(
            translate_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 5, 4)),
            Some(InputEvent::PointerMove { column: 5, row: 4 })
        );
        assert_eq!(
            translate_mouse(mouse(MouseEventKind::Moved, 7, 1)),
            Some(InputEvent::PointerMove { column: 7, row: 1 })
        );
        assert_eq!(
            translate_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 0, 0)),
            Some(InputEvent::PointerUp)
        );
        assert_eq!(translate_mouse(mouse(MouseEventKind::ScrollUp, 0, 0)), None);
        assert_eq!(translate_mouse(mouse(MouseEventKind::Down(MouseButton::Right), 0, 0)), None);
    }

    #[test]
    fn test_subscription_lifetime() {
        let bus = ResizeBus::new();
        let width = Rc::new(Cell::new(0));
        let seen = width.clone();

        let sub = bus.subscribe(move |w, _| seen.set(w));
        bus.emit(120, 40);
        assert_eq!(width.get(), 120);
        assert_eq!(bus.listener_count(), 1);

        drop(sub);
        assert_eq!(bus.listener_count(), 0);
        bus.emit(80, 24);
        assert_eq!(width.get(), 120);
        // The closure (and its clone of `width`) went away with the subscription
        assert_eq!(Rc::strong_count(&width), 1);
    }

    #[test]
    fn test_only_own_listener_removed() {
        let bus = ResizeBus::new();
        let a = bus.subscribe(|_, _| {});
        let _b = bus.subscribe(|_, _| {});
        drop(a);
        assert_eq!(bus.listener_count(), 1);
    }

    #[test]
    fn test_subscription_outlives_bus() {
        let bus = ResizeBus::new();
        let sub = bus.subscribe(|_, _| {});
        drop(bus);
        drop(sub);
    }
}
