//! Primitive functions installed into every default environment.
//!
//! A builtin receives its arguments already evaluated and has no access to
//! the calling environment. Control flow that must not evaluate all of its
//! operands (such as `if`) is a special form in the walker instead.

use crate::{
    env::Env,
    error::{Arity, Error, Result, Thing},
    heap::{Heap, HeapObject},
    value::{sym, Builtin, Function, Value},
};

pub type BuiltinFn = fn(&mut Heap, &[Value]) -> Result<Value>;

pub const BUILTINS: &[Builtin] = &[
    Builtin { name: "+", func: add },
    Builtin { name: "-", func: sub },
    Builtin { name: "*", func: mul },
    Builtin { name: "/", func: div },
    Builtin { name: "eq?", func: num_eq },
    Builtin { name: "<", func: less },
    Builtin { name: ">", func: greater },
    Builtin { name: "list", func: list },
    Builtin { name: "cons", func: cons },
    Builtin { name: "car", func: car },
    Builtin { name: "cdr", func: cdr },
    Builtin { name: "null?", func: is_null },
];

/// Bind a single builtin in `env`.
pub fn define(heap: &mut Heap, env: Env, builtin: Builtin) {
    let func = heap.allocate(HeapObject::Function(Function::Builtin(builtin)));
    env.bind(heap, sym(builtin.name), Value::Function(func));
}

/// Bind every entry of [`BUILTINS`] in `env`.
pub fn install(heap: &mut Heap, env: Env) {
    for builtin in BUILTINS {
        define(heap, env, *builtin);
    }
}

fn number(value: &Value) -> Result<f64> {
    match value {
        Value::Number(x) => Ok(*x),
        other => Err(Error::type_mismatch(Thing::Number, *other)),
    }
}

fn fold(args: &[Value], seed: f64, f: fn(f64, f64) -> f64) -> Result<Value> {
    args.iter()
        .try_fold(seed, |acc, arg| Ok(f(acc, number(arg)?)))
        .map(Value::Number)
}

// The first argument seeds the fold.
fn fold_from_first(args: &[Value], f: fn(f64, f64) -> f64) -> Result<Value> {
    Arity::AtLeast(1).check(args.len())?;
    fold(&args[1..], number(&args[0])?, f)
}

fn compare(args: &[Value], f: fn(f64, f64) -> bool) -> Result<Value> {
    Arity::Exact(2).check(args.len())?;
    Ok(Value::from_bool(f(number(&args[0])?, number(&args[1])?)))
}

fn add(_: &mut Heap, args: &[Value]) -> Result<Value> {
    fold(args, 0.0, |a, b| a + b)
}

fn sub(_: &mut Heap, args: &[Value]) -> Result<Value> {
    fold_from_first(args, |a, b| a - b)
}

fn mul(_: &mut Heap, args: &[Value]) -> Result<Value> {
    fold(args, 1.0, |a, b| a * b)
}

fn div(_: &mut Heap, args: &[Value]) -> Result<Value> {
    fold_from_first(args, |a, b| a / b)
}

fn num_eq(_: &mut Heap, args: &[Value]) -> Result<Value> {
    compare(args, |a, b| a == b)
}

fn less(_: &mut Heap, args: &[Value]) -> Result<Value> {
    compare(args, |a, b| a < b)
}

fn greater(_: &mut Heap, args: &[Value]) -> Result<Value> {
    compare(args, |a, b| a > b)
}

fn list(heap: &mut Heap, args: &[Value]) -> Result<Value> {
    Ok(heap.list(args.iter().copied()))
}

fn cons(heap: &mut Heap, args: &[Value]) -> Result<Value> {
    Arity::Exact(2).check(args.len())?;
    heap.cons(args[0], args[1])
}

fn car(heap: &mut Heap, args: &[Value]) -> Result<Value> {
    Arity::Exact(1).check(args.len())?;
    match args[0] {
        Value::Pair(cell) => Ok(heap.pair(cell).0),
        other => Err(Error::type_mismatch(Thing::Pair, other)),
    }
}

fn cdr(heap: &mut Heap, args: &[Value]) -> Result<Value> {
    Arity::Exact(1).check(args.len())?;
    match args[0] {
        Value::Pair(cell) => Ok(heap.pair(cell).1),
        other => Err(Error::type_mismatch(Thing::Pair, other)),
    }
}

fn is_null(_: &mut Heap, args: &[Value]) -> Result<Value> {
    Arity::Exact(1).check(args.len())?;
    Ok(Value::from_bool(args[0] == Value::Nil))
}
