use crate::environment::Environment;
use crate::types::Expression;
use crate::{evaluator, reader};
use std::fmt;
use std::rc::Rc;

pub type Result<T = Vec<Expression>> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Parse(reader::ParseError),
    Eval(evaluator::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "parse error: {}", e),
            Error::Eval(e) => write!(f, "runtime error: {}", e),
        }
    }
}

pub fn read(line: &str) -> Result {
    reader::read_str(line).map_err(Error::Parse)
}

pub fn eval(obj: &Expression, env: &Rc<Environment>) -> Result<Option<Expression>> {
    evaluator::evaluate(obj, env).map_err(Error::Eval)
}

/// Reads every form in `line` and evaluates them in order against `env`,
/// handing each result that has a value to `on_value` as soon as it is
/// produced. Stops at the first error; forms before it keep their effects on
/// `env`.
pub fn rep_each<F>(line: &str, env: &Rc<Environment>, mut on_value: F) -> Result<()>
where
    F: FnMut(&Expression),
{
    for form in read(line)? {
        if let Some(value) = eval(&form, env)? {
            on_value(&value);
        }
    }
    Ok(())
}

/// Like `rep_each`, collecting the results.
pub fn rep(line: &str, env: &Rc<Environment>) -> Result {
    let mut results = Vec::new();
    rep_each(line, env, |value| results.push(value.clone()))?;
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rep_skips_absent_results() {
        let env = Rc::new(Environment::default());
        let results = rep("(define x 5) x (eq? 1 1) (eq? 2 2)", &env).unwrap();
        let shown: Vec<String> = results.iter().map(|r| r.to_string()).collect();
        assert_eq!(shown, vec!["5", "T", "T"]);
    }

    #[test]
    fn rep_each_reports_values_before_a_failure() {
        let env = Rc::new(Environment::default());
        let mut seen = Vec::new();
        let err = rep_each("1 (q a) (car 1) 2", &env, |v| seen.push(v.to_string()));
        assert!(matches!(err, Err(Error::Eval(_))));
        assert_eq!(seen, vec!["1", "a"]);
    }

    #[test]
    fn parse_errors_evaluate_nothing() {
        let env = Rc::new(Environment::default());
        let err = rep("(define x 1) (", &env).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert!(rep("x", &env).is_err());
    }

    #[test]
    fn earlier_forms_keep_effects_after_a_runtime_error() {
        let env = Rc::new(Environment::default());
        let err = rep("(define x 1) (car x) (define y 2)", &env).unwrap_err();
        assert!(matches!(err, Error::Eval(_)));
        assert_eq!(rep("x", &env).unwrap()[0].to_string(), "1");
        assert!(rep("y", &env).is_err());
    }
}
