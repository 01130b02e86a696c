use crate::input::events::ViewportEvent;
use crate::prelude::HashMap;
use std::collections::VecDeque;

/// Event listener callback type
pub type EventCallback = Box<dyn Fn(&ViewportEvent) + Send + Sync>;

/// Queue of viewport notifications plus optional listeners keyed by event type
#[derive(Default)]
pub struct EventManager {
    listeners: HashMap<String, Vec<EventCallback>>,
    event_queue: VecDeque<ViewportEvent>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener, e.g. `on("zoomchanged", ..)`
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&ViewportEvent) + Send + Sync + 'static,
    {
        self.listeners
            .entry(event_type.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    /// Emit an event to the queue
    pub fn emit(&mut self, event: ViewportEvent) {
        self.event_queue.push_back(event);
    }

    /// Drains the queue in emission order, invoking listeners on the way
    pub fn process_events(&mut self) -> Vec<ViewportEvent> {
        let events: Vec<_> = self.event_queue.drain(..).collect();

        for event in &events {
            if let Some(callbacks) = self.listeners.get(event.event_type()) {
                for callback in callbacks {
                    callback(event);
                }
            }
        }

        events
    }
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventManager")
            .field("listeners", &self.listeners.keys().collect::<Vec<_>>())
            .field("event_queue", &self.event_queue)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Point;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_events_drain_in_order() {
        let mut manager = EventManager::new();
        manager.emit(ViewportEvent::ZoomChanged { from: 0, to: 1 });
        manager.emit(ViewportEvent::ScrollChanged {
            offset: Point::new(1.0, 2.0),
        });

        let events = manager.process_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ViewportEvent::ZoomChanged { .. }));
        assert!(manager.process_events().is_empty());
    }

    #[test]
    fn test_listeners_receive_matching_events() {
        let mut manager = EventManager::new();
        let zooms = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&zooms);
        manager.on("zoomchanged", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        manager.emit(ViewportEvent::ZoomChanged { from: 1, to: 2 });
        manager.emit(ViewportEvent::DragEnded);
        manager.emit(ViewportEvent::ZoomChanged { from: 2, to: 3 });
        manager.process_events();

        assert_eq!(zooms.load(Ordering::SeqCst), 2);
    }
}
