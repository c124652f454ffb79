use crate::{
    env::{Env, Frame},
    heap::{Gc, Heap, HeapObject},
    value::{Closure, Function, Value},
};

/// Reports the heap references held by an object.
pub trait Trace {
    fn trace(&self, tracer: &mut Tracer);
}

/// Gray worklist of handles waiting to be marked.
///
/// Marking pops from this list rather than recursing, so long lists and
/// closure/environment cycles never grow the native stack.
#[derive(Default)]
pub struct Tracer {
    worklist: Vec<Gc>,
}

impl Tracer {
    pub fn mark(&mut self, gc: Gc) {
        self.worklist.push(gc);
    }

    pub fn mark_value(&mut self, value: Value) {
        if let Some(gc) = value.gc() {
            self.mark(gc);
        }
    }
}

impl Trace for Value {
    fn trace(&self, tracer: &mut Tracer) {
        tracer.mark_value(*self);
    }
}

impl Trace for Env {
    fn trace(&self, tracer: &mut Tracer) {
        tracer.mark(self.gc());
    }
}

impl Trace for Frame {
    fn trace(&self, tracer: &mut Tracer) {
        self.bindings().for_each(|(_, value)| value.trace(tracer));
        if let Some(parent) = self.parent() {
            parent.trace(tracer);
        }
    }
}

impl Trace for Closure {
    fn trace(&self, tracer: &mut Tracer) {
        self.body.trace(tracer);
        self.env.trace(tracer);
    }
}

impl Trace for HeapObject {
    fn trace(&self, tracer: &mut Tracer) {
        match self {
            HeapObject::Pair { head, tail } => {
                head.trace(tracer);
                tail.trace(tracer);
            },
            HeapObject::Function(Function::Closure(closure)) => closure.trace(tracer),
            HeapObject::Function(Function::Builtin(_)) => {},
            HeapObject::Frame(frame) => frame.trace(tracer),
            HeapObject::Free => {},
        }
    }
}

/// Summary of one collection cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Collection {
    pub marked: usize,
    pub swept: usize,
    pub live: usize,
}

/// Mark everything reachable from `root` and from the heap's mutator roots,
/// then sweep the rest.
#[tracing::instrument(level = "debug", skip_all)]
pub(crate) fn collect(heap: &mut Heap, root: Option<Env>) -> Collection {
    let mut tracer = Tracer::default();
    if let Some(env) = root {
        env.trace(&mut tracer);
    }
    for gc in heap.mutator_roots() {
        tracer.mark(gc);
    }

    // Mark
    let mut marked = 0;
    while let Some(gc) = tracer.worklist.pop() {
        if heap.mark(gc) {
            marked += 1;
            heap.get(gc).trace(&mut tracer);
        }
    }

    // Sweep
    let swept = heap.sweep();
    let live = heap.stats().live;
    tracing::debug!(marked, swept, live, "collection finished");

    Collection { marked, swept, live }
}
