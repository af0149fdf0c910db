use crate::environment::{Environment, UnboundVariable};
use crate::special_forms::{self, SpecialForm};
use crate::types::{AtomValue, BadArgCount, Closure, Expression, PrimitiveFn, TypeMismatch};
use itertools::Itertools;
use std::fmt;
use std::rc::Rc;

pub type Result<T = Option<Expression>> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    UnboundVariable(UnboundVariable),
    InvalidOperand(TypeMismatch),
    BadArgCount(BadArgCount),
    MalformedForm {
        form: &'static str,
        reason: String,
        line: Option<usize>,
    },
    /// A `define`, `set!` or exhausted `cond` was used where a value is needed.
    NoValue(&'static str),
    DivideByZero,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnboundVariable(e) => write!(f, "{}", e),
            Error::InvalidOperand(e) => write!(f, "invalid operand: {}", e),
            Error::BadArgCount(e) => write!(f, "{}", e),
            Error::MalformedForm { form, reason, line } => {
                write!(f, "malformed {}: {}", form, reason)?;
                if let Some(line) = line {
                    write!(f, " (line {})", line)?;
                }
                Ok(())
            }
            Error::NoValue(context) => write!(f, "{} needs a value, but got none", context),
            Error::DivideByZero => write!(f, "cannot divide by zero!"),
        }
    }
}

impl From<UnboundVariable> for Error {
    fn from(e: UnboundVariable) -> Self {
        Self::UnboundVariable(e)
    }
}

impl From<TypeMismatch> for Error {
    fn from(t: TypeMismatch) -> Self {
        Self::InvalidOperand(t)
    }
}

impl From<BadArgCount> for Error {
    fn from(e: BadArgCount) -> Self {
        Self::BadArgCount(e)
    }
}

impl Error {
    pub(crate) fn malformed(form: &'static str, culprit: &Expression, problem: &str) -> Self {
        Error::MalformedForm {
            form,
            reason: format!("{} {}", problem, culprit),
            line: culprit.token().map(|token| token.line),
        }
    }
}

/// Evaluates `ast` in `env`. `Ok(None)` means the expression produced no
/// value, which happens for `define`, `set!` and a `cond` where no clause
/// matched.
pub fn evaluate(ast: &Expression, env: &Rc<Environment>) -> Result {
    match ast {
        Expression::Atom(atom) => match &atom.value {
            AtomValue::Symbol(name) => Ok(Some(env.fetch(name)?)),
            AtomValue::Number(_) | AtomValue::Bool(_) => Ok(Some(ast.clone())),
        },
        Expression::Collection(list) => match list.split_first() {
            None => Ok(Some(ast.clone())),
            Some((head, operands)) => {
                let form = head
                    .as_symbol()
                    .ok()
                    .and_then(|name| SpecialForm::named(name));
                match form {
                    Some(form) => {
                        log::trace!("special form {}", ast);
                        special_forms::apply(form, operands, env)
                    }
                    None => {
                        log::trace!("apply {}", ast);
                        let callable = evaluate_operand(head, env, "procedure application")?;
                        let args = evaluate_sequence_elementwise(operands, env)?;
                        apply(&callable, &args)
                    }
                }
            }
        },
        Expression::Primitive(_) | Expression::Closure(_) => Ok(Some(ast.clone())),
    }
}

/// Evaluates an expression whose result is needed by the enclosing form.
pub(crate) fn evaluate_operand(
    ast: &Expression,
    env: &Rc<Environment>,
    context: &'static str,
) -> Result<Expression> {
    evaluate(ast, env)?.ok_or(Error::NoValue(context))
}

pub fn evaluate_sequence_elementwise(
    seq: &[Expression],
    env: &Rc<Environment>,
) -> Result<Vec<Expression>> {
    seq.iter()
        .map(|obj| evaluate_operand(obj, env, "procedure application"))
        .collect()
}

pub fn apply(callable: &Expression, args: &[Expression]) -> Result {
    match callable {
        Expression::Primitive(f) => call_primitive(f, args).map(Some),
        Expression::Closure(f) => call_closure(f, args),
        _ => Err(Error::InvalidOperand(TypeMismatch::NotCallable)),
    }
}

pub(crate) fn pretty_print_args(args: &[Expression]) -> String {
    match args.len() {
        0 => "no args".into(),
        1 => args[0].to_string(),
        _ => format!("\n\t{}", args.iter().join("\n\t")),
    }
}

pub fn call_primitive(func: &PrimitiveFn, args: &[Expression]) -> Result<Expression> {
    func.arity.validate_for(args.len(), func.name)?;
    log::trace!("Call {} with {}", func.name, pretty_print_args(args));
    let result = (func.fn_ptr)(args);
    match &result {
        Ok(val) => log::trace!("Call to {} resulted in {}", func.name, val),
        Err(e) => log::trace!("Call to {} failed: {}", func.name, e),
    }
    result
}

/// Binds the arguments in a fresh frame whose parent is the captured scope,
/// so no binding from one call is visible to another.
fn call_closure(func: &Closure, args: &[Expression]) -> Result {
    func.arity().validate_for(args.len(), "closure")?;
    log::debug!("Call {} with {}", func, pretty_print_args(args));
    let env = Environment::spawn_from(&func.parent);
    for (key, value) in func.parameters.iter().zip(args) {
        env.define(key.clone(), value.clone());
    }
    log::trace!("closure env: {}", env);
    evaluate(&func.body, &env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_str;

    fn eval_in(source: &str, env: &Rc<Environment>) -> Result {
        let mut last = None;
        for form in read_str(source).unwrap() {
            last = evaluate(&form, env)?;
        }
        Ok(last)
    }

    fn eval_str(source: &str) -> String {
        let env = Rc::new(Environment::default());
        eval_in(source, &env).unwrap().unwrap().to_string()
    }

    #[test]
    fn numbers_evaluate_to_themselves() {
        assert_eq!(eval_str("7"), "7");
    }

    #[test]
    fn empty_collection_evaluates_to_itself() {
        assert_eq!(eval_str("()"), "()");
    }

    #[test]
    fn unbound_symbol() {
        let env = Rc::new(Environment::default());
        let err = eval_in("nope", &env).unwrap_err();
        assert!(matches!(err, Error::UnboundVariable(_)));
        assert_eq!(err.to_string(), "unbound variable: nope");
    }

    #[test]
    fn booleans_are_bound_globally() {
        assert_eq!(eval_str("T"), "T");
        assert_eq!(eval_str("F"), "F");
    }

    #[test]
    fn primitive_application() {
        assert_eq!(eval_str("(+ 1 2 3)"), "6");
        assert_eq!(eval_str("(- 10 (* 2 3))"), "4");
    }

    #[test]
    fn applying_a_non_callable() {
        let env = Rc::new(Environment::default());
        let err = eval_in("(1 2)", &env).unwrap_err();
        assert!(matches!(err, Error::InvalidOperand(TypeMismatch::NotCallable)));
    }

    #[test]
    fn operands_are_evaluated_left_to_right() {
        let env = Rc::new(Environment::default());
        let err = eval_in("(list first second)", &env).unwrap_err();
        assert_eq!(err.to_string(), "unbound variable: first");
    }

    #[test]
    fn no_value_as_operand() {
        let env = Rc::new(Environment::default());
        let err = eval_in("(list (define x 1))", &env).unwrap_err();
        assert!(matches!(err, Error::NoValue(_)));
    }

    #[test]
    fn closures_and_primitives_are_values() {
        assert_eq!(eval_str("(lambda (a b) a)"), "#<closure (a b)>");
        assert_eq!(eval_str("list"), "#<primitive list>");
    }
}
