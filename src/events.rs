use std::rc::Rc;

/// Events dispatched through an [`Emitter`] are grouped by a kind, the
/// equivalent of an event name.
pub trait Event {
    type Kind: Copy + Eq + std::fmt::Debug;

    fn kind(&self) -> Self::Kind;
}

/// Returned by [`Emitter::on`]; the only way to remove that listener again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<E> = Rc<dyn Fn(&E)>;

pub struct Emitter<E: Event> {
    listeners: Vec<(ListenerId, E::Kind, Listener<E>)>,
    next_id: u64,
}

impl<E: Event> Default for Emitter<E> {
    fn default() -> Self {
        Emitter::new()
    }
}

impl<E: Event> Emitter<E> {
    pub fn new() -> Emitter<E> {
        Emitter { listeners: Vec::new(), next_id: 0 }
    }

    pub fn on<F>(&mut self, kind: E::Kind, listener: F) -> ListenerId
    where
        F: Fn(&E) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, kind, Rc::new(listener)));
        id
    }

    /// Remove one listener. The kind must match the one it was registered
    /// under; returns false when nothing was removed.
    pub fn off(&mut self, kind: E::Kind, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, k, _)| !(*lid == id && *k == kind));
        before != self.listeners.len()
    }

    pub fn remove_all(&mut self) {
        self.listeners.clear();
    }

    pub fn listener_count(&self, kind: E::Kind) -> usize {
        self.listeners.iter().filter(|(_, k, _)| *k == kind).count()
    }

    pub fn total_listeners(&self) -> usize {
        self.listeners.len()
    }

    /// Call every listener registered for the event's kind, in
    /// registration order. Returns how many were called.
    pub fn emit(&self, event: &E) -> usize {
        let kind = event.kind();
        let targets: Vec<Listener<E>> = self
            .listeners
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, f)| f.clone())
            .collect();
        for f in &targets {
            f(event);
        }
        targets.len()
    }
}
