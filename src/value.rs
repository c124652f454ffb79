use std::{fmt, rc::Rc};
use internment::Intern;
use crate::{
    builtins::BuiltinFn,
    env::Env,
    error::Thing,
    heap::{Gc, Heap},
};

pub type Symbol = Intern<String>;

/// Intern a symbol name.
pub fn sym(name: &str) -> Symbol {
    Intern::new(name.to_owned())
}

/// A runtime value.
///
/// Numbers and symbols are stored inline. Pairs and functions live in the
/// [`Heap`] and are referred to by handle, so copying a `Value` never copies
/// heap structure.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Value {
    /// The empty list.
    Nil,
    Number(f64),
    Symbol(Symbol),
    Pair(Gc),
    Function(Gc),
}

impl Value {
    pub fn thing(&self) -> Thing {
        match self {
            Value::Nil => Thing::Nil,
            Value::Number(_) => Thing::Number,
            Value::Symbol(_) => Thing::Symbol,
            Value::Pair(_) => Thing::Pair,
            Value::Function(_) => Thing::Function,
        }
    }

    /// The heap slot this value refers to, if any.
    pub fn gc(&self) -> Option<Gc> {
        match self {
            Value::Pair(gc) | Value::Function(gc) => Some(*gc),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::Nil | Value::Pair(_))
    }

    pub fn truth(&self) -> bool {
        !matches!(self, Value::Nil) && *self != Value::Number(0.0)
    }

    pub fn from_bool(b: bool) -> Self {
        Value::Number(if b { 1.0 } else { 0.0 })
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<Symbol> for Value {
    fn from(s: Symbol) -> Self {
        Value::Symbol(s)
    }
}

impl From<Value> for Thing {
    fn from(value: Value) -> Self {
        value.thing()
    }
}

#[derive(Copy, Clone)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

#[derive(Clone, Debug)]
pub struct Closure {
    pub params: Rc<[Symbol]>,
    pub body: Value,
    pub env: Env,
}

#[derive(Clone, Debug)]
pub enum Function {
    Builtin(Builtin),
    Closure(Closure),
}

/// Renders a value by following its heap references.
pub struct Printer<'a> {
    pub(crate) heap: &'a Heap,
    pub(crate) value: Value,
}

impl<'a> Printer<'a> {
    fn with(&self, value: Value) -> Self {
        Printer { heap: self.heap, value }
    }
}

impl<'a> fmt::Display for Printer<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.value {
            Value::Nil => write!(f, "()"),
            Value::Number(x) => write!(f, "{}", x),
            Value::Symbol(s) => write!(f, "{}", s),
            Value::Function(gc) => match self.heap.function(gc) {
                Function::Builtin(b) => write!(f, "#<builtin {}>", b.name),
                Function::Closure(_) => write!(f, "#<lambda>"),
            },
            Value::Pair(_) => {
                write!(f, "(")?;
                let mut cursor = self.value;
                let mut first = true;
                while let Value::Pair(cell) = cursor {
                    let (head, tail) = self.heap.pair(cell);
                    if !first {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", self.with(head))?;
                    first = false;
                    cursor = tail;
                }
                write!(f, ")")
            },
        }
    }
}
