/// When the engine collects garbage on its own.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GcPolicy {
    /// Only when [`Engine::collect`](crate::Engine::collect) is called.
    Manual,
    /// Also at the evaluator's tail-call safepoint once this many objects
    /// are live. The threshold then adapts to twice the surviving count.
    ///
    /// Only the form being evaluated, its environment chain, default
    /// environments and values pinned with
    /// [`Engine::root`](crate::Engine::root) survive such a collection.
    Threshold(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub initial_capacity: usize,
    pub gc: GcPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            gc: GcPolicy::Manual,
        }
    }
}

impl Config {
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_gc(mut self, policy: GcPolicy) -> Self {
        self.gc = policy;
        self
    }

    pub(crate) fn collect_threshold(&self) -> Option<usize> {
        match self.gc {
            GcPolicy::Manual => None,
            GcPolicy::Threshold(n) => Some(n),
        }
    }
}
