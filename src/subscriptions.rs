//! Host-side registrations (DOM listeners, the pending animation frame)
//! paired with the code that undoes them.

use log::debug;

type Undo = Box<dyn FnOnce()>;

#[derive(Default)]
pub struct Subscriptions {
    undo: Vec<(&'static str, Undo)>,
}

impl Subscriptions {
    pub fn new() -> Subscriptions {
        Subscriptions::default()
    }

    /// Remember how to undo one registration. The closure owns whatever the
    /// registration keeps alive, so running it also frees that.
    pub fn add<F>(&mut self, name: &'static str, undo: F)
    where
        F: FnOnce() + 'static,
    {
        self.undo.push((name, Box::new(undo)));
    }

    pub fn len(&self) -> usize {
        self.undo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }

    /// Undo everything, newest first. Returns how many were released; a
    /// second call releases nothing.
    pub fn release(&mut self) -> usize {
        let count = self.undo.len();
        while let Some((name, undo)) = self.undo.pop() {
            debug!("released {}", name);
            undo();
        }
        count
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.release();
    }
}
