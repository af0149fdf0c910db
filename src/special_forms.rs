use crate::environment::Environment;
use crate::evaluator::{evaluate, evaluate_operand, Error, Result};
use crate::types::{truthy, Arity, Closure, Expression, Symbol, TypeMismatch};
use std::collections::HashSet;
use std::rc::Rc;

/// The reserved names. When one of these heads a collection it is handled
/// here, even if the same name is bound in the environment.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SpecialForm {
    Quote,
    AtomTest,
    Eq,
    Car,
    Cdr,
    Cons,
    Cond,
    NullTest,
    If,
    Set,
    Define,
    Lambda,
}

impl SpecialForm {
    pub fn named(name: &str) -> Option<Self> {
        use SpecialForm::*;
        match name {
            "quote" | "q" => Some(Quote),
            "atom?" => Some(AtomTest),
            "eq?" => Some(Eq),
            "car" => Some(Car),
            "cdr" => Some(Cdr),
            "cons" => Some(Cons),
            "cond" => Some(Cond),
            "null?" => Some(NullTest),
            "if" => Some(If),
            "set!" => Some(Set),
            "define" => Some(Define),
            "lambda" => Some(Lambda),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        use SpecialForm::*;
        match self {
            Quote => "quote",
            AtomTest => "atom?",
            Eq => "eq?",
            Car => "car",
            Cdr => "cdr",
            Cons => "cons",
            Cond => "cond",
            NullTest => "null?",
            If => "if",
            Set => "set!",
            Define => "define",
            Lambda => "lambda",
        }
    }

    fn arity(self) -> Arity {
        use SpecialForm::*;
        match self {
            Quote | AtomTest | Car | Cdr | NullTest => Arity::exactly(1),
            Eq | Cons | Set | Define | Lambda => Arity::exactly(2),
            If => Arity::exactly(3),
            Cond => Arity::at_least(0),
        }
    }
}

/// `args` are the unevaluated operands following the form's name.
pub fn apply(form: SpecialForm, args: &[Expression], env: &Rc<Environment>) -> Result {
    form.arity().validate_for(args.len(), form.name())?;
    match form {
        SpecialForm::Quote => Ok(Some(args[0].clone())),
        SpecialForm::AtomTest => {
            let value = evaluate_operand(&args[0], env, "atom?")?;
            Ok(Some(Expression::from(value.is_atom())))
        }
        SpecialForm::Eq => apply_eq(args, env).map(Some),
        SpecialForm::Car => apply_car(args, env).map(Some),
        SpecialForm::Cdr => apply_cdr(args, env).map(Some),
        SpecialForm::Cons => apply_cons(args, env).map(Some),
        SpecialForm::Cond => apply_cond(args, env),
        SpecialForm::NullTest => {
            let value = evaluate_operand(&args[0], env, "null?")?;
            Ok(Some(Expression::from(value.is_empty_collection())))
        }
        SpecialForm::If => apply_if(args, env),
        SpecialForm::Set => apply_set(args, env),
        SpecialForm::Define => apply_define(args, env),
        SpecialForm::Lambda => apply_lambda(args, env).map(Some),
    }
}

// Collections are never eq?, even to themselves.
fn apply_eq(args: &[Expression], env: &Rc<Environment>) -> Result<Expression> {
    let lhs = evaluate_operand(&args[0], env, "eq?")?;
    let rhs = evaluate_operand(&args[1], env, "eq?")?;
    let same = match (lhs.as_atom(), rhs.as_atom()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    };
    Ok(Expression::from(same))
}

fn apply_car(args: &[Expression], env: &Rc<Environment>) -> Result<Expression> {
    let value = evaluate_operand(&args[0], env, "car")?;
    let list = value.as_collection()?;
    list.first()
        .cloned()
        .ok_or(Error::InvalidOperand(TypeMismatch::EmptyCollection))
}

fn apply_cdr(args: &[Expression], env: &Rc<Environment>) -> Result<Expression> {
    let value = evaluate_operand(&args[0], env, "cdr")?;
    let list = value.as_collection()?;
    let rest: Vec<Expression> = list.iter().skip(1).cloned().collect();
    Ok(Expression::from(rest))
}

fn apply_cons(args: &[Expression], env: &Rc<Environment>) -> Result<Expression> {
    let head = evaluate_operand(&args[0], env, "cons")?;
    let tail = evaluate_operand(&args[1], env, "cons")?;
    let tail = tail.as_collection()?;
    let mut elements = Vec::with_capacity(tail.len() + 1);
    elements.push(head);
    elements.extend(tail.iter().cloned());
    Ok(Expression::from(elements))
}

fn apply_cond(clauses: &[Expression], env: &Rc<Environment>) -> Result {
    for clause in clauses {
        let pair = clause
            .as_collection()
            .ok()
            .filter(|pair| pair.len() == 2)
            .ok_or_else(|| {
                Error::malformed("cond", clause, "expected (predicate expression), got")
            })?;
        log::trace!("cond: testing {}", pair[0]);
        let test = evaluate_operand(&pair[0], env, "cond predicate")?;
        if truthy(&test) {
            return evaluate(&pair[1], env);
        }
    }
    Ok(None)
}

pub fn apply_if(args: &[Expression], env: &Rc<Environment>) -> Result {
    let condition = evaluate_operand(&args[0], env, "if condition")?;
    if truthy(&condition) {
        evaluate(&args[1], env)
    } else {
        evaluate(&args[2], env)
    }
}

fn binding_target<'a>(form: &'static str, key: &'a Expression) -> Result<&'a Symbol> {
    key.as_symbol()
        .map_err(|_| Error::malformed(form, key, "cannot bind to"))
}

pub fn apply_define(args: &[Expression], env: &Rc<Environment>) -> Result {
    let key = binding_target("define", &args[0])?;
    let value = evaluate_operand(&args[1], env, "define")?;
    log::debug!("define {} as {}", key, value);
    env.define(key.clone(), value);
    Ok(None)
}

pub fn apply_set(args: &[Expression], env: &Rc<Environment>) -> Result {
    let key = binding_target("set!", &args[0])?;
    let value = evaluate_operand(&args[1], env, "set!")?;
    log::debug!("set! {} to {}", key, value);
    env.assign(key, value)?;
    Ok(None)
}

pub fn apply_lambda(args: &[Expression], env: &Rc<Environment>) -> Result<Expression> {
    // The first operand must be a collection of symbols; the second, the body,
    // is kept unevaluated.
    let (parameters, body) = (&args[0], &args[1]);
    let parameters = parameters.as_collection().map_err(|_| {
        Error::malformed("lambda", parameters, "parameters must be a collection, got")
    })?;
    let extract_symbol = |obj: &Expression| {
        obj.as_symbol()
            .map(Symbol::clone)
            .map_err(|_| Error::malformed("lambda", obj, "parameter is not a symbol:"))
    };
    let parameters = parameters
        .iter()
        .map(extract_symbol)
        .collect::<Result<Vec<Symbol>>>()?;
    let repeated = {
        let mut seen = HashSet::new();
        parameters.iter().find(|name| !seen.insert(*name)).cloned()
    };
    if let Some(repeated) = repeated {
        return Err(Error::MalformedForm {
            form: "lambda",
            reason: format!("parameter {} appears more than once", repeated),
            line: args[0].token().map(|token| token.line),
        });
    }
    let closure = Closure {
        parameters,
        body: body.clone(),
        parent: env.clone(),
    };
    Ok(Expression::Closure(Rc::new(closure)))
}
