use std::rc::Rc;
use crate::{
    env::Env,
    error::{Arity, Error, Result, Thing},
    heap::HeapObject,
    value::{Closure, Function, Value},
};
use super::{AbstractMachine, Step};

/// Forms that receive their operands unevaluated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpecialForm {
    Quote,
    Define,
    Lambda,
    If,
}

impl SpecialForm {
    pub fn from_head(head: Value) -> Option<Self> {
        match head {
            Value::Symbol(symbol) => match symbol.as_str() {
                "quote" => Some(SpecialForm::Quote),
                "define" => Some(SpecialForm::Define),
                "lambda" => Some(SpecialForm::Lambda),
                "if" => Some(SpecialForm::If),
                _ => None,
            },
            _ => None,
        }
    }

    fn arity(self) -> Arity {
        match self {
            SpecialForm::Quote => Arity::Exact(1),
            SpecialForm::Define => Arity::Exact(2),
            SpecialForm::Lambda => Arity::Exact(2),
            SpecialForm::If => Arity::Range(2, 3),
        }
    }
}

impl<'a> AbstractMachine<'a> {
    pub(super) fn special(&mut self, form: SpecialForm, operands: Value, env: Env) -> Result<Step> {
        let operands = self.operands(operands)?;
        form.arity().check(operands.len())?;

        match form {
            SpecialForm::Quote => Ok(Step::Done(operands[0])),
            SpecialForm::Define => {
                let name = match operands[0] {
                    Value::Symbol(name) => name,
                    other => return Err(Error::type_mismatch(Thing::Symbol, other)),
                };
                let value = self.eval(operands[1], env)?;
                env.bind(self.heap, name, value);
                Ok(Step::Done(value))
            },
            SpecialForm::Lambda => {
                let params = self
                    .operands(operands[0])?
                    .into_iter()
                    .map(|param| match param {
                        Value::Symbol(name) => Ok(name),
                        other => Err(Error::type_mismatch(Thing::Symbol, other)),
                    })
                    .collect::<Result<Rc<[_]>>>()?;
                let closure = Closure { params, body: operands[1], env };
                let func = self.heap.allocate(HeapObject::Function(Function::Closure(closure)));
                Ok(Step::Done(Value::Function(func)))
            },
            SpecialForm::If => {
                let branch = if self.eval(operands[0], env)?.truth() {
                    operands[1]
                } else {
                    operands.get(2).copied().unwrap_or(Value::Nil)
                };
                Ok(Step::Tail { expr: branch, env, applying: None })
            },
        }
    }
}
