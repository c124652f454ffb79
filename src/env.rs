use crate::{
    error::{Arity, Error, Result},
    heap::{Gc, Heap, HeapObject},
    value::{Symbol, Value},
};

/// One binding frame of an environment chain.
#[derive(Debug, Default)]
pub struct Frame {
    bindings: Vec<(Symbol, Value)>,
    parent: Option<Env>,
}

impl Frame {
    pub fn get(&self, symbol: Symbol) -> Option<Value> {
        self.bindings
            .iter()
            .rev()
            .find(|(name, _)| *name == symbol)
            .map(|(_, value)| *value)
    }

    pub fn bindings(&self) -> impl Iterator<Item=(Symbol, Value)> + '_ {
        self.bindings.iter().copied()
    }

    pub fn parent(&self) -> Option<Env> {
        self.parent
    }

    fn define(&mut self, symbol: Symbol, value: Value) {
        match self.bindings.iter_mut().find(|(name, _)| *name == symbol) {
            Some((_, slot)) => *slot = value,
            None => self.bindings.push((symbol, value)),
        }
    }
}

/// Handle to an environment frame living in the [`Heap`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Env(Gc);

impl Env {
    /// Allocate a frame with no parent.
    pub fn global(heap: &mut Heap) -> Self {
        Env(heap.allocate(HeapObject::Frame(Frame::default())))
    }

    /// Allocate an empty frame whose lookups fall through to `self`.
    pub fn child(self, heap: &mut Heap) -> Self {
        Env(heap.allocate(HeapObject::Frame(Frame {
            bindings: Vec::new(),
            parent: Some(self),
        })))
    }

    pub fn gc(self) -> Gc {
        self.0
    }

    pub fn parent(self, heap: &Heap) -> Option<Env> {
        heap.frame(self.0).parent
    }

    pub fn lookup(self, heap: &Heap, symbol: Symbol) -> Result<Value> {
        let mut env = Some(self);
        while let Some(Env(gc)) = env {
            let frame = heap.frame(gc);
            if let Some(value) = frame.get(symbol) {
                return Ok(value);
            }
            env = frame.parent;
        }
        Err(Error::unbound_symbol(symbol))
    }

    /// Bind `symbol` in this frame. Bindings in enclosing frames are shadowed, not touched.
    pub fn bind(self, heap: &mut Heap, symbol: Symbol, value: Value) {
        heap.frame_mut(self.0).define(symbol, value);
    }

    /// Allocate a child frame binding each parameter to the argument in the same position.
    pub fn extend(self, heap: &mut Heap, params: &[Symbol], args: &[Value]) -> Result<Env> {
        Arity::Exact(params.len()).check(args.len())?;
        let mut frame = Frame {
            bindings: Vec::with_capacity(params.len()),
            parent: Some(self),
        };
        for (param, arg) in params.iter().zip(args) {
            frame.define(*param, *arg);
        }
        Ok(Env(heap.allocate(HeapObject::Frame(frame))))
    }
}
