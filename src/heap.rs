use std::{fmt, rc::Rc};
use crate::{
    env::Frame,
    error::{Result, Thing, Error},
    value::{Function, Printer, Value},
};

/// Handle to a slot in the [`Heap`].
///
/// `generation` changes whenever the slot is swept, so a handle to a
/// reclaimed value can never observe whatever is allocated there next.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Gc {
    index: u32,
    generation: u32,
}

impl fmt::Debug for Gc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Gc({}/{})", self.index, self.generation)
    }
}

pub enum HeapObject {
    Pair { head: Value, tail: Value },
    Function(Function),
    Frame(Frame),
    /// Swept slot, available for reuse.
    Free,
}

/// A value kept alive across collections for as long as any clone of this
/// guard exists.
#[derive(Clone)]
pub struct Rooted {
    _guard: Rc<()>,
    value: Value,
}

impl Rooted {
    pub fn value(&self) -> Value {
        self.value
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Stats {
    pub capacity: usize,
    pub live: usize,
    pub free: usize,
    pub collections: usize,
}

pub struct Heap {
    objects: Vec<HeapObject>,
    generations: Vec<u32>,
    marks: Vec<bool>,
    free_list: Vec<u32>,
    live: usize,
    collections: usize,
    // Values held by in-progress evaluations.
    roots: Vec<Gc>,
    pinned: Vec<(Rc<()>, Gc)>,
    collect_at: Option<usize>,
    min_collect_at: usize,
}

impl Default for Heap {
    fn default() -> Self {
        Self::with_capacity(1024)
    }
}

impl Heap {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            objects: Vec::with_capacity(capacity),
            generations: Vec::with_capacity(capacity),
            marks: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            live: 0,
            collections: 0,
            roots: Vec::new(),
            pinned: Vec::new(),
            collect_at: None,
            min_collect_at: 0,
        }
    }

    pub(crate) fn set_collect_threshold(&mut self, threshold: Option<usize>) {
        self.min_collect_at = threshold.unwrap_or(0).max(1);
        self.collect_at = threshold.map(|_| self.min_collect_at);
    }

    /// True when the configured threshold asks for a collection at the next safepoint.
    pub(crate) fn should_collect(&self) -> bool {
        self.collect_at.map_or(false, |at| self.live >= at)
    }

    pub fn allocate(&mut self, object: HeapObject) -> Gc {
        self.live += 1;
        if let Some(index) = self.free_list.pop() {
            let i = index as usize;
            self.objects[i] = object;
            self.marks[i] = false;
            return Gc { index, generation: self.generations[i] };
        }

        if self.objects.len() == self.objects.capacity() {
            let grow_by = self.objects.capacity().max(1);
            self.objects.reserve_exact(grow_by);
            self.generations.reserve_exact(grow_by);
            self.marks.reserve_exact(grow_by);
            tracing::debug!(capacity = self.objects.capacity(), "expanded object pool");
        }

        let index = self.objects.len() as u32;
        self.objects.push(object);
        self.generations.push(0);
        self.marks.push(false);
        Gc { index, generation: 0 }
    }

    pub fn contains(&self, gc: Gc) -> bool {
        self.try_get(gc).is_some()
    }

    pub fn try_get(&self, gc: Gc) -> Option<&HeapObject> {
        let i = gc.index as usize;
        match self.objects.get(i) {
            Some(HeapObject::Free) | None => None,
            Some(object) if self.generations[i] == gc.generation => Some(object),
            Some(_) => None,
        }
    }

    pub fn get(&self, gc: Gc) -> &HeapObject {
        match self.try_get(gc) {
            Some(object) => object,
            None => panic!("stale handle: {:?}", gc),
        }
    }

    pub fn get_mut(&mut self, gc: Gc) -> &mut HeapObject {
        if !self.contains(gc) {
            panic!("stale handle: {:?}", gc);
        }
        &mut self.objects[gc.index as usize]
    }

    pub fn pair(&self, gc: Gc) -> (Value, Value) {
        match self.get(gc) {
            HeapObject::Pair { head, tail } => (*head, *tail),
            _ => panic!("pair access on non-pair {:?}", gc),
        }
    }

    pub fn function(&self, gc: Gc) -> &Function {
        match self.get(gc) {
            HeapObject::Function(function) => function,
            _ => panic!("function access on non-function {:?}", gc),
        }
    }

    pub fn frame(&self, gc: Gc) -> &Frame {
        match self.get(gc) {
            HeapObject::Frame(frame) => frame,
            _ => panic!("frame access on non-frame {:?}", gc),
        }
    }

    pub fn frame_mut(&mut self, gc: Gc) -> &mut Frame {
        match self.get_mut(gc) {
            HeapObject::Frame(frame) => frame,
            _ => panic!("frame access on non-frame {:?}", gc),
        }
    }

    /// Allocate a pair. `tail` must be a list.
    pub fn cons(&mut self, head: Value, tail: Value) -> Result<Value> {
        if !tail.is_list() {
            return Err(Error::type_mismatch(Thing::List, tail));
        }
        Ok(Value::Pair(self.allocate(HeapObject::Pair { head, tail })))
    }

    pub fn list(&mut self, items: impl IntoIterator<Item=Value>) -> Value {
        let items = items.into_iter().collect::<Vec<_>>();
        items
            .into_iter()
            .rev()
            .fold(Value::Nil, |tail, head| Value::Pair(self.allocate(HeapObject::Pair { head, tail })))
    }

    /// The elements of a list, or `None` if `value` is not a list.
    pub fn list_to_vec(&self, value: Value) -> Option<Vec<Value>> {
        let mut items = Vec::new();
        let mut cursor = value;
        loop {
            match cursor {
                Value::Nil => return Some(items),
                Value::Pair(cell) => {
                    let (head, tail) = self.pair(cell);
                    items.push(head);
                    cursor = tail;
                },
                _ => return None,
            }
        }
    }

    pub fn display(&self, value: Value) -> Printer<'_> {
        Printer { heap: self, value }
    }

    pub fn pin(&mut self, value: Value) -> Rooted {
        let rc = Rc::new(());
        if let Some(gc) = value.gc() {
            self.pinned.push((rc.clone(), gc));
        }
        Rooted { _guard: rc, value }
    }

    pub(crate) fn pin_gc(&mut self, gc: Gc) -> Rc<()> {
        let rc = Rc::new(());
        self.pinned.push((rc.clone(), gc));
        rc
    }

    pub(crate) fn root(&mut self, gc: impl Into<Option<Gc>>) {
        if let Some(gc) = gc.into() {
            self.roots.push(gc);
        }
    }

    pub(crate) fn root_depth(&self) -> usize {
        self.roots.len()
    }

    pub(crate) fn unroot_to(&mut self, depth: usize) {
        self.roots.truncate(depth);
    }

    /// Every handle the mutator currently holds: the evaluation stack plus
    /// pinned values whose guards are still alive.
    pub(crate) fn mutator_roots(&mut self) -> Vec<Gc> {
        self.pinned.retain(|(rc, _)| Rc::strong_count(rc) > 1);
        self.roots
            .iter()
            .copied()
            .chain(self.pinned.iter().map(|(_, gc)| *gc))
            .collect()
    }

    /// Set the mark flag on a live slot. Returns `true` if it was not marked before.
    pub(crate) fn mark(&mut self, gc: Gc) -> bool {
        if !self.contains(gc) {
            tracing::warn!(?gc, "ignoring stale handle while marking");
            return false;
        }
        let i = gc.index as usize;
        !std::mem::replace(&mut self.marks[i], true)
    }

    /// Reclaim every unmarked slot and clear the marks of the survivors.
    /// Returns the number of reclaimed slots.
    pub(crate) fn sweep(&mut self) -> usize {
        let mut swept = 0;
        for i in 0..self.objects.len() {
            if std::mem::replace(&mut self.marks[i], false) {
                continue;
            }
            if !matches!(self.objects[i], HeapObject::Free) {
                tracing::trace!(index = i, "sweeping slot");
                self.objects[i] = HeapObject::Free;
                self.generations[i] = self.generations[i].wrapping_add(1);
                self.free_list.push(i as u32);
                swept += 1;
            }
        }
        self.live -= swept;
        self.collections += 1;
        if self.collect_at.is_some() {
            self.collect_at = Some(self.min_collect_at.max(self.live.saturating_mul(2)));
        }
        swept
    }

    pub fn stats(&self) -> Stats {
        Stats {
            capacity: self.objects.capacity(),
            live: self.live,
            free: self.free_list.len(),
            collections: self.collections,
        }
    }
}
