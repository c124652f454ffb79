use proptest::prelude::*;
use cinder::{sym, Engine, Value};

const CASES: u32 = 64;

fn numbers() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1_000.0f64..1_000.0, 0..16)
}

fn apply(engine: &mut Engine, op: &str, args: &[f64]) -> cinder::Result<Value> {
    let env = engine.default_environment();
    let head = Engine::symbol(op);
    let expr = engine.list(std::iter::once(head).chain(args.iter().map(|x| Value::Number(*x))));
    engine.eval(expr, env)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(CASES))]

    #[test]
    fn sum_folds_left_to_right(xs in numbers()) {
        let mut engine = Engine::default();
        let expected = xs.iter().fold(0.0, |acc, x| acc + x);
        prop_assert_eq!(apply(&mut engine, "+", &xs), Ok(Value::Number(expected)));
    }

    #[test]
    fn product_folds_left_to_right(xs in numbers()) {
        let mut engine = Engine::default();
        let expected = xs.iter().fold(1.0, |acc, x| acc * x);
        prop_assert_eq!(apply(&mut engine, "*", &xs), Ok(Value::Number(expected)));
    }

    #[test]
    fn difference_is_seeded_by_first_argument(first in -1_000.0f64..1_000.0, rest in numbers()) {
        let mut engine = Engine::default();
        let expected = rest.iter().fold(first, |acc, x| acc - x);
        let args = std::iter::once(first).chain(rest).collect::<Vec<_>>();
        prop_assert_eq!(apply(&mut engine, "-", &args), Ok(Value::Number(expected)));
    }

    #[test]
    fn numbers_evaluate_to_themselves(x in any::<f64>().prop_filter("not NaN", |x| !x.is_nan())) {
        let mut engine = Engine::default();
        let env = engine.default_environment();
        prop_assert_eq!(engine.eval(Value::Number(x), env), Ok(Value::Number(x)));
    }

    /// A chain of frames each rebinding `x`: every frame sees its own binding,
    /// and a sibling of the outermost frame sees only the global one.
    #[test]
    fn innermost_binding_wins(values in prop::collection::vec(-1_000.0f64..1_000.0, 1..12)) {
        let mut engine = Engine::default();
        let global = engine.default_environment();
        engine.bind(global, "x", Value::Number(-1.0));

        let mut frames = Vec::new();
        let mut env = global;
        for value in &values {
            env = engine.extend(env, &[sym("x")], &[Value::Number(*value)]).unwrap();
            frames.push(env);
        }
        engine.collect(env);
        let sibling = engine.extend(global, &[sym("y")], &[Value::Nil]).unwrap();

        for (frame, value) in frames.iter().zip(&values) {
            prop_assert_eq!(engine.lookup(*frame, "x"), Ok(Value::Number(*value)));
        }
        prop_assert_eq!(engine.lookup(sibling, "x"), Ok(Value::Number(-1.0)));
    }
}
