use std::collections::BTreeSet;

use clipview_core::ListenerId;
use clipview_logging::{clip_debug, clip_warn};

/// Resize listeners currently bound to the preview surface.
#[derive(Debug, Default)]
pub struct ResizeListeners {
    active: BTreeSet<ListenerId>,
    registered_total: u64,
}

impl ResizeListeners {
    pub fn register(&mut self, listener: ListenerId) {
        if !self.active.insert(listener) {
            clip_warn!("Resize listener {} registered twice", listener);
            return;
        }
        self.registered_total += 1;
        if self.active.len() > 1 {
            clip_warn!("Resize listeners stacked: {:?}", self.active);
        }
        clip_debug!("Resize listener {} registered", listener);
    }

    pub fn deregister(&mut self, listener: ListenerId) {
        if self.active.remove(&listener) {
            clip_debug!("Resize listener {} released", listener);
        }
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Resize events are only worth delivering while someone listens.
    pub fn is_listening(&self) -> bool {
        !self.active.is_empty()
    }

    pub fn registered_total(&self) -> u64 {
        self.registered_total
    }
}

#[cfg(test)]
mod tests {
    use super::ResizeListeners;

    #[test]
    fn replace_keeps_one_listener() {
        let mut listeners = ResizeListeners::default();
        listeners.register(1);
        listeners.deregister(1);
        listeners.register(2);
        listeners.deregister(2);
        listeners.register(3);
        assert_eq!(listeners.active_count(), 1);
        assert_eq!(listeners.registered_total(), 3);
        assert!(listeners.is_listening());
    }

    #[test]
    fn deregistering_unknown_listener_is_harmless() {
        let mut listeners = ResizeListeners::default();
        listeners.deregister(9);
        listeners.register(1);
        listeners.deregister(1);
        listeners.deregister(1);
        assert_eq!(listeners.active_count(), 0);
        assert!(!listeners.is_listening());
    }

    #[test]
    fn duplicate_registration_is_not_counted() {
        let mut listeners = ResizeListeners::default();
        listeners.register(4);
        listeners.register(4);
        assert_eq!(listeners.active_count(), 1);
        assert_eq!(listeners.registered_total(), 1);
    }
}
