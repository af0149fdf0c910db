use crate::types::{AtomValue, Expression};
use itertools::Itertools;
use std::fmt;

pub fn pr_str(object: &Expression) -> String {
    match object {
        Expression::Atom(atom) => match &atom.value {
            // -0 prints as 0
            AtomValue::Number(x) if *x == 0.0 => String::from("0"),
            AtomValue::Number(x) => x.to_string(),
            AtomValue::Symbol(name) => name.to_string(),
            AtomValue::Bool(true) => String::from("T"),
            AtomValue::Bool(false) => String::from("F"),
        },
        Expression::Collection(list) if list.is_empty() => String::from("()"),
        Expression::Collection(list) => format!("( {} )", list.iter().map(pr_str).join(" ")),
        Expression::Primitive(func) => format!("#<primitive {}>", func.name),
        Expression::Closure(closure) => closure.to_string(),
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&pr_str(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_str;

    fn round(source: &str) -> String {
        pr_str(&read_str(source).unwrap()[0])
    }

    #[test]
    fn atoms() {
        assert_eq!(round("foo"), "foo");
        assert_eq!(round("5"), "5");
        assert_eq!(round("2.50"), "2.5");
        assert_eq!(Expression::TRUE.to_string(), "T");
        assert_eq!(Expression::FALSE.to_string(), "F");
    }

    #[test]
    fn negative_zero_renders_as_zero() {
        assert_eq!(Expression::from(-0.0).to_string(), "0");
        assert_eq!(Expression::from(-0.5).to_string(), "-0.5");
    }

    #[test]
    fn collections() {
        assert_eq!(round("(a b c)"), "( a b c )");
        assert_eq!(round("(a (b) ())"), "( a ( b ) () )");
        assert_eq!(round("()"), "()");
    }
}
