use std::fmt;
use crate::value::Symbol;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The kind of thing a value turned out to be (or was expected to be).
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum Thing {
    Nil,
    Number,
    Symbol,
    Pair,
    List,
    Function,
}

impl fmt::Display for Thing {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Thing::Nil => write!(f, "nil"),
            Thing::Number => write!(f, "number"),
            Thing::Symbol => write!(f, "symbol"),
            Thing::Pair => write!(f, "pair"),
            Thing::List => write!(f, "list"),
            Thing::Function => write!(f, "function"),
        }
    }
}

/// How many operands a function or special form accepts.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
    Range(usize, usize),
}

impl Arity {
    pub fn check(self, got: usize) -> Result<()> {
        let ok = match self {
            Arity::Exact(n) => got == n,
            Arity::AtLeast(n) => got >= n,
            Arity::Range(min, max) => (min..=max).contains(&got),
        };
        if ok {
            Ok(())
        } else {
            Err(Error::arity_mismatch(self, got))
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
            Arity::Range(min, max) => write!(f, "{} to {}", min, max),
        }
    }
}

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum ErrorKind {
    #[error("unbound symbol `{0}`")]
    UnboundSymbol(Symbol),
    #[error("`{0}` is not callable")]
    NotCallable(String),
    #[error("expected {expected} arguments, got {got}")]
    ArityMismatch { expected: Arity, got: usize },
    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: Thing, found: Thing },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    while_applying: Vec<Symbol>,
}

impl Error {
    pub fn unbound_symbol(symbol: Symbol) -> Self {
        Self::from(ErrorKind::UnboundSymbol(symbol))
    }

    pub fn not_callable(rendered: impl Into<String>) -> Self {
        Self::from(ErrorKind::NotCallable(rendered.into()))
    }

    pub fn arity_mismatch(expected: Arity, got: usize) -> Self {
        Self::from(ErrorKind::ArityMismatch { expected, got })
    }

    pub fn type_mismatch(expected: Thing, found: impl Into<Thing>) -> Self {
        Self::from(ErrorKind::TypeMismatch { expected, found: found.into() })
    }

    /// Record that the error propagated out of an application of `name`.
    pub fn while_applying(mut self, name: Symbol) -> Self {
        self.while_applying.push(name);
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Applied function names, innermost first.
    pub fn trace(&self) -> &[Symbol] {
        &self.while_applying
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind,
            while_applying: Vec::new(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for name in &self.while_applying {
            write!(f, "\n  while applying `{}`", name)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}
