//! A small Lisp runtime: a tail-call-eliminating evaluator over S-expressions
//! that live in a pooled heap reclaimed by a mark-sweep collector.
//!
//! Expressions are built in memory through the [`Engine`] constructors; there
//! is no reader.
//!
//! ```
//! use cinder::{Engine, Value};
//!
//! let mut engine = Engine::default();
//! let env = engine.default_environment();
//! let plus = Engine::symbol("+");
//! let expr = engine.list(vec![plus, 1.0.into(), 2.0.into(), 3.0.into()]);
//! assert_eq!(engine.eval(expr, env), Ok(Value::Number(6.0)));
//! ```

pub mod builtins;
pub mod config;
pub mod env;
pub mod error;
pub mod gc;
pub mod heap;
pub mod value;
pub mod walker;

use std::rc::Rc;

pub use self::{
    builtins::BuiltinFn,
    config::{Config, GcPolicy},
    env::Env,
    error::{Arity, Error, ErrorKind, Result, Thing},
    gc::Collection,
    heap::{Gc, Heap, Rooted, Stats},
    value::{sym, Builtin, Function, Printer, Symbol, Value},
};
use self::walker::AbstractMachine;

pub struct Engine {
    heap: Heap,
    // One guard per default environment, held until the engine is dropped.
    globals: Vec<Rc<()>>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        let mut heap = Heap::with_capacity(config.initial_capacity);
        heap.set_collect_threshold(config.collect_threshold());
        Self {
            heap,
            globals: Vec::new(),
        }
    }

    /// A fresh global frame holding every builtin.
    ///
    /// Default environments are permanent: the frame, and everything bound in
    /// it, stays alive for as long as the engine does. Use [`Env::child`] or
    /// [`Engine::extend`] for scratch scopes that collection may reclaim.
    pub fn default_environment(&mut self) -> Env {
        let env = Env::global(&mut self.heap);
        self.globals.push(self.heap.pin_gc(env.gc()));
        builtins::install(&mut self.heap, env);
        env
    }

    pub fn number(x: f64) -> Value {
        Value::Number(x)
    }

    pub fn symbol(name: &str) -> Value {
        Value::Symbol(sym(name))
    }

    pub fn cons(&mut self, head: Value, tail: Value) -> Result<Value> {
        self.heap.cons(head, tail)
    }

    pub fn list(&mut self, items: impl IntoIterator<Item=Value>) -> Value {
        self.heap.list(items)
    }

    /// Evaluate `expr` in `env`.
    ///
    /// With [`GcPolicy::Threshold`] a collection may run mid-evaluation. `expr`
    /// and `env` are kept alive throughout, but any other form the caller
    /// intends to use later must be pinned with [`Engine::root`] first.
    pub fn eval(&mut self, expr: Value, env: Env) -> Result<Value> {
        AbstractMachine::new(&mut self.heap).eval(expr, env)
    }

    /// Reclaim everything not reachable from `env`, a pinned value or a
    /// default environment.
    pub fn collect(&mut self, env: Env) -> Collection {
        gc::collect(&mut self.heap, Some(env))
    }

    pub fn bind(&mut self, env: Env, name: &str, value: Value) {
        env.bind(&mut self.heap, sym(name), value);
    }

    pub fn lookup(&self, env: Env, name: &str) -> Result<Value> {
        env.lookup(&self.heap, sym(name))
    }

    pub fn extend(&mut self, env: Env, params: &[Symbol], args: &[Value]) -> Result<Env> {
        env.extend(&mut self.heap, params, args)
    }

    /// Keep `value` alive across collections until the returned guard is dropped.
    pub fn root(&mut self, value: Value) -> Rooted {
        self.heap.pin(value)
    }

    pub fn define_builtin(&mut self, env: Env, name: &'static str, func: BuiltinFn) {
        builtins::define(&mut self.heap, env, Builtin { name, func });
    }

    pub fn display(&self, value: Value) -> Printer<'_> {
        self.heap.display(value)
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn stats(&self) -> Stats {
        self.heap.stats()
    }
}
