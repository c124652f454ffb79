use std::thread;
use cinder::{Config, Engine, Env, GcPolicy, Value};

fn n(x: f64) -> Value {
    Value::Number(x)
}

/// `(define count (lambda (k) (if (eq? k 0) 0 (count (- k 1)))))`
fn define_countdown(engine: &mut Engine, env: Env) {
    let [define, lambda, if_, eq, minus, count, k] =
        ["define", "lambda", "if", "eq?", "-", "count", "k"].map(Engine::symbol);

    let test = engine.list(vec![eq, k, n(0.0)]);
    let pred = engine.list(vec![minus, k, n(1.0)]);
    let recur = engine.list(vec![count, pred]);
    let body = engine.list(vec![if_, test, n(0.0), recur]);
    let params = engine.list(vec![k]);
    let func = engine.list(vec![lambda, params, body]);
    let def = engine.list(vec![define, count, func]);
    engine.eval(def, env).unwrap();
}

#[test]
fn tail_calls_run_in_bounded_stack() {
    const ITERATIONS: f64 = 1_000_000.0;

    let handle = thread::Builder::new()
        .stack_size(256 * 1024)
        .spawn(|| {
            let config = Config::default().with_gc(GcPolicy::Threshold(10_000));
            let mut engine = Engine::with_config(config);
            let env = engine.default_environment();
            define_countdown(&mut engine, env);

            let count = Engine::symbol("count");
            let call = engine.list(vec![count, n(ITERATIONS)]);
            let result = engine.eval(call, env);
            (result, engine.stats())
        })
        .unwrap();

    let (result, stats) = handle.join().expect("evaluation overflowed its stack");
    assert_eq!(result, Ok(n(0.0)));
    // One frame per iteration, so without collection the pool would hold a million of them.
    assert!(stats.collections > 0);
    assert!(stats.capacity < 100_000, "pool grew to {}", stats.capacity);
}

#[test]
fn manual_policy_never_collects_on_its_own() {
    let mut engine = Engine::default();
    let env = engine.default_environment();
    define_countdown(&mut engine, env);

    let count = Engine::symbol("count");
    let call = engine.list(vec![count, n(1_000.0)]);
    assert_eq!(engine.eval(call, env), Ok(n(0.0)));
    assert_eq!(engine.stats().collections, 0);

    let before = engine.stats().live;
    let collection = engine.collect(env);
    assert!(collection.swept >= 1_000);
    assert_eq!(engine.stats().live, before - collection.swept);
}

#[test]
fn reachable_pair_survives_and_rebound_pair_is_reclaimed() {
    let mut engine = Engine::default();
    let env = engine.default_environment();
    let list = engine.list(vec![n(1.0), n(2.0), n(3.0)]);
    engine.bind(env, "x", list);

    engine.collect(env);
    let handle = list.gc().unwrap();
    assert!(engine.heap().contains(handle));
    assert_eq!(engine.display(engine.lookup(env, "x").unwrap()).to_string(), "(1 2 3)");
    let live = engine.stats().live;

    engine.bind(env, "x", n(0.0));
    let collection = engine.collect(env);
    assert_eq!(collection.swept, 3);
    assert_eq!(engine.stats().live, live - 3);
    assert!(!engine.heap().contains(handle));
}

#[test]
fn mutually_recursive_closures_collect_without_looping() {
    let mut engine = Engine::default();
    let env = engine.default_environment();
    let [define, lambda, if_, eq, minus, even, odd, k] =
        ["define", "lambda", "if", "eq?", "-", "even?", "odd?", "k"].map(Engine::symbol);

    // (define even? (lambda (k) (if (eq? k 0) 1 (odd? (- k 1)))))
    // (define odd? (lambda (k) (if (eq? k 0) 0 (even? (- k 1)))))
    for (name, base, other) in [(even, 1.0, odd), (odd, 0.0, even)] {
        let test = engine.list(vec![eq, k, n(0.0)]);
        let pred = engine.list(vec![minus, k, n(1.0)]);
        let recur = engine.list(vec![other, pred]);
        let body = engine.list(vec![if_, test, n(base), recur]);
        let params = engine.list(vec![k]);
        let func = engine.list(vec![lambda, params, body]);
        let def = engine.list(vec![define, name, func]);
        engine.eval(def, env).unwrap();
    }

    engine.collect(env);
    let collection = engine.collect(env);
    assert_eq!(collection.swept, 0);

    let call = engine.list(vec![even, n(101.0)]);
    assert_eq!(engine.eval(call, env), Ok(n(0.0)));
}

#[test]
fn rooted_values_survive_until_dropped() {
    let mut engine = Engine::default();
    let env = engine.default_environment();
    let list = engine.list(vec![n(1.0)]);
    let handle = list.gc().unwrap();

    let rooted = engine.root(list);
    engine.collect(env);
    assert!(engine.heap().contains(handle));
    assert_eq!(rooted.value(), list);

    drop(rooted);
    engine.collect(env);
    assert!(!engine.heap().contains(handle));
}

#[test]
fn collecting_a_child_environment_keeps_its_parents() {
    let mut engine = Engine::default();
    let global = engine.default_environment();
    let list = engine.list(vec![n(4.0)]);
    engine.bind(global, "kept", list);

    let child = engine.extend(global, &[], &[]).unwrap();
    engine.collect(child);
    assert!(engine.heap().contains(list.gc().unwrap()));
    assert!(engine.heap().contains(child.gc()));
}

#[test]
fn threshold_collection_preserves_in_flight_arguments() {
    let config = Config::default().with_gc(GcPolicy::Threshold(1));
    let mut engine = Engine::with_config(config);
    let env = engine.default_environment();
    define_countdown(&mut engine, env);

    // (list (list 1 2) (count 50) (list 3))
    let [list, count] = ["list", "count"].map(Engine::symbol);
    let first = engine.list(vec![list, n(1.0), n(2.0)]);
    let countdown = engine.list(vec![count, n(50.0)]);
    let last = engine.list(vec![list, n(3.0)]);
    let expr = engine.list(vec![list, first, countdown, last]);

    let result = engine.eval(expr, env).unwrap();
    assert!(engine.stats().collections > 0);
    assert_eq!(engine.display(result).to_string(), "((1 2) 0 (3))");
}

#[test]
fn threshold_collection_keeps_the_evaluated_form() {
    let config = Config::default().with_gc(GcPolicy::Threshold(1));
    let mut engine = Engine::with_config(config);
    let env = engine.default_environment();

    // ((lambda (k) k) 3)
    let [lambda, k, id] = ["lambda", "k", "id"].map(Engine::symbol);
    let params = engine.list(vec![k]);
    let func = engine.list(vec![lambda, params, k]);
    let call = engine.list(vec![func, n(3.0)]);
    let pending = engine.list(vec![id]);
    let pinned = engine.root(pending);

    assert_eq!(engine.eval(call, env), Ok(n(3.0)));
    assert!(engine.stats().collections > 0);
    assert!(engine.heap().contains(call.gc().unwrap()));
    assert!(engine.heap().contains(pinned.value().gc().unwrap()));

    assert_eq!(engine.eval(call, env), Ok(n(3.0)));
    assert_eq!(engine.display(pinned.value()).to_string(), "(id)");
}
