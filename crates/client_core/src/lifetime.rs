use tokio::task::JoinHandle;

/// Binds a view's fetch task to the view's active lifetime.
///
/// Every load gets a new generation. Starting a load or invalidating the view
/// aborts the previous task, and a completion is accepted only if it carries
/// the current generation, so a response that was already queued when the
/// task was superseded is still dropped.
#[derive(Debug, Default)]
pub struct ViewLifetime {
    generation: u64,
    inflight: Option<JoinHandle<()>>,
}

impl ViewLifetime {
    pub fn begin(&mut self) -> u64 {
        self.invalidate();
        self.generation
    }

    pub fn attach(&mut self, handle: JoinHandle<()>) {
        self.inflight = Some(handle);
    }

    pub fn invalidate(&mut self) {
        if let Some(handle) = self.inflight.take() {
            handle.abort();
        }
        self.generation += 1;
    }

    pub fn is_loading(&self) -> bool {
        self.inflight.is_some()
    }

    /// Accepts a completion for `generation` if it is still current.
    pub fn settle(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.inflight = None;
        true
    }
}
