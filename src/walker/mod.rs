mod special;

use crate::{
    env::Env,
    error::{Error, Result, Thing},
    gc,
    heap::Heap,
    value::{Closure, Function, Symbol, Value},
};
use self::special::SpecialForm;

/// Outcome of reducing an expression by one step.
enum Step {
    Done(Value),
    /// Continue the loop with a new expression instead of recursing.
    Tail {
        expr: Value,
        env: Env,
        applying: Option<Symbol>,
    },
}

/// Tree-walking evaluator over heap-resident S-expressions.
pub struct AbstractMachine<'a> {
    heap: &'a mut Heap,
}

impl<'a> AbstractMachine<'a> {
    pub fn new(heap: &'a mut Heap) -> Self {
        Self { heap }
    }

    /// Evaluate `expr` in `env`.
    ///
    /// Everything this evaluation holds onto, `expr` included, is rooted on
    /// the heap's evaluation stack until it returns. Other forms the caller
    /// keeps must be pinned to survive a safepoint collection.
    pub fn eval(&mut self, expr: Value, env: Env) -> Result<Value> {
        let depth = self.heap.root_depth();
        self.heap.root(expr.gc());
        self.heap.root(env.gc());
        let base = self.heap.root_depth();
        let result = self.exec(expr, env, base);
        self.heap.unroot_to(depth);
        result
    }

    // Roots above `depth` belong to the current tail iteration.
    fn exec(&mut self, mut expr: Value, mut env: Env, depth: usize) -> Result<Value> {
        let mut applying = None;
        loop {
            match self.step(expr, env) {
                Ok(Step::Done(value)) => return Ok(value),
                Ok(Step::Tail { expr: next, env: next_env, applying: name }) => {
                    expr = next;
                    env = next_env;
                    if name.is_some() {
                        applying = name;
                        tracing::trace!(name = ?applying, "tail call");
                    }
                    self.reroot(depth, expr, env);
                    self.safepoint();
                },
                Err(err) => return Err(match applying {
                    Some(name) => err.while_applying(name),
                    None => err,
                }),
            }
        }
    }

    fn reroot(&mut self, depth: usize, expr: Value, env: Env) {
        self.heap.unroot_to(depth);
        self.heap.root(expr.gc());
        self.heap.root(env.gc());
    }

    // Everything live is on the evaluation stack at this point.
    fn safepoint(&mut self) {
        if self.heap.should_collect() {
            gc::collect(self.heap, None);
        }
    }

    fn step(&mut self, expr: Value, env: Env) -> Result<Step> {
        let (head, operands) = match expr {
            Value::Nil | Value::Number(_) | Value::Function(_) => return Ok(Step::Done(expr)),
            Value::Symbol(symbol) => return env.lookup(self.heap, symbol).map(Step::Done),
            Value::Pair(cell) => self.heap.pair(cell),
        };

        if let Some(form) = SpecialForm::from_head(head) {
            return self.special(form, operands, env);
        }

        let name = match head {
            Value::Symbol(symbol) => Some(symbol),
            _ => None,
        };
        let annotate = move |err: Error| match name {
            Some(name) => err.while_applying(name),
            None => err,
        };

        let func = self.eval(head, env)?;
        let gc = match func {
            Value::Function(gc) => gc,
            other => return Err(annotate(Error::not_callable(self.heap.display(other).to_string()))),
        };
        self.heap.root(gc);

        let mut args = Vec::new();
        let mut cursor = operands;
        while let Value::Pair(cell) = cursor {
            let (arg, rest) = self.heap.pair(cell);
            let value = self.eval(arg, env)?;
            self.heap.root(value.gc());
            args.push(value);
            cursor = rest;
        }

        match self.heap.function(gc).clone() {
            Function::Builtin(builtin) => {
                (builtin.func)(self.heap, &args).map(Step::Done).map_err(annotate)
            },
            Function::Closure(closure) => {
                let Closure { params, body, env: captured } = closure;
                let frame = captured
                    .extend(self.heap, &params, &args)
                    .map_err(annotate)?;
                Ok(Step::Tail { expr: body, env: frame, applying: name })
            },
        }
    }

    fn operands(&self, operands: Value) -> Result<Vec<Value>> {
        self.heap
            .list_to_vec(operands)
            .ok_or_else(|| Error::type_mismatch(Thing::List, operands))
    }
}
