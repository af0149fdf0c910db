use crate::environment::Environment;
use crate::evaluator;
use crate::tokens::Token;
use derive_more::{Deref, Display};
use itertools::Itertools;
use std::fmt;
use std::fmt::Formatter;
use std::ops::{RangeFrom, RangeInclusive};
use std::rc::Rc;

#[derive(Deref, Display, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct Symbol(pub String);

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol(String::from(name))
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ExpressionKind {
    Number,
    Symbol,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AtomValue {
    Number(f64),
    Symbol(Symbol),
    Bool(bool),
}

#[derive(Debug, Clone)]
pub struct Atom {
    pub value: AtomValue,
    pub token: Option<Rc<Token>>,
}

impl Atom {
    pub fn kind(&self) -> ExpressionKind {
        match self.value {
            AtomValue::Number(_) => ExpressionKind::Number,
            AtomValue::Symbol(_) | AtomValue::Bool(_) => ExpressionKind::Symbol,
        }
    }

    pub(crate) fn truthy(&self) -> bool {
        match &self.value {
            AtomValue::Number(x) => *x != 0.0,
            AtomValue::Bool(b) => *b,
            AtomValue::Symbol(name) => !name.is_empty(),
        }
    }
}

// The originating token is only for diagnostics and plays no part in equality.
impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

#[derive(Deref, Debug)]
pub struct Collection {
    #[deref]
    pub elements: Vec<Expression>,
    pub token: Option<Rc<Token>>,
}

#[derive(Debug, Clone)]
pub enum Arity {
    Between(RangeInclusive<usize>),
    AtLeast(RangeFrom<usize>),
}

#[derive(Debug)]
pub struct BadArgCount {
    name: String,
    expected: Arity,
    got: usize,
}

impl fmt::Display for BadArgCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "when evaluating {} expected {} arguments, but received {}",
            self.name, self.expected, self.got
        )
    }
}

impl Arity {
    pub(crate) const fn exactly(n: usize) -> Self {
        Self::Between(n..=n)
    }

    pub(crate) const fn at_least(n: usize) -> Self {
        Self::AtLeast(n..)
    }

    pub(crate) fn contains(&self, n: usize) -> bool {
        match self {
            Self::Between(range) => range.contains(&n),
            Self::AtLeast(range) => range.contains(&n),
        }
    }

    pub(crate) fn validate_for(&self, n: usize, name: &str) -> Result<(), BadArgCount> {
        match self.contains(n) {
            true => Ok(()),
            false => Err(BadArgCount {
                name: String::from(name),
                expected: self.clone(),
                got: n,
            }),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Between(r) => {
                if r.start() == r.end() {
                    write!(f, "exactly {}", r.start())
                } else {
                    write!(f, "from {} to {}", r.start(), r.end())
                }
            }
            Arity::AtLeast(r) => write!(f, "at least {}", r.start),
        }
    }
}

pub struct PrimitiveFn {
    pub name: &'static str,
    pub arity: Arity,
    pub fn_ptr: fn(&[Expression]) -> evaluator::Result<Expression>,
}

impl fmt::Debug for PrimitiveFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "primitive function #<{}>", self.name)
    }
}

pub struct Closure {
    pub parameters: Vec<Symbol>,
    pub body: Expression,
    pub parent: Rc<Environment>,
}

impl Closure {
    pub fn arity(&self) -> Arity {
        Arity::exactly(self.parameters.len())
    }
}

impl fmt::Display for Closure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#<closure ({})>", self.parameters.iter().join(" "))
    }
}

impl fmt::Debug for Closure {
    // Not derived because we want to skip the parent: the parent may well contain this Closure!
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Closure{{parameters: {:?}, body: {:?}}}",
            self.parameters, self.body
        )
    }
}

#[derive(Debug, Clone)]
pub enum Expression {
    Atom(Atom),
    Collection(Rc<Collection>),
    Primitive(&'static PrimitiveFn),
    Closure(Rc<Closure>),
}

impl Expression {
    pub const TRUE: Expression = Expression::Atom(Atom {
        value: AtomValue::Bool(true),
        token: None,
    });
    pub const FALSE: Expression = Expression::Atom(Atom {
        value: AtomValue::Bool(false),
        token: None,
    });
}

/// Collections are truthy when non-empty and procedures are always truthy.
pub(crate) fn truthy(obj: &Expression) -> bool {
    match obj {
        Expression::Atom(atom) => atom.truthy(),
        Expression::Collection(list) => !list.is_empty(),
        Expression::Primitive(_) | Expression::Closure(_) => true,
    }
}

#[derive(Debug)]
pub enum TypeMismatch {
    NotACollection,
    EmptyCollection,
    NotANumber,
    NotASymbol,
    NotCallable,
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TypeMismatch::NotACollection => "expected a collection",
            TypeMismatch::EmptyCollection => "collection is empty",
            TypeMismatch::NotANumber => "expected a number",
            TypeMismatch::NotASymbol => "expected a symbol",
            TypeMismatch::NotCallable => "value is not callable",
        })
    }
}

impl Expression {
    pub fn is_atom(&self) -> bool {
        matches!(self, Expression::Atom(_))
    }

    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Expression::Atom(atom) => Some(atom),
            _ => None,
        }
    }

    pub(crate) fn as_collection(&self) -> Result<&Collection, TypeMismatch> {
        match self {
            Expression::Collection(list) => Ok(list),
            _ => Err(TypeMismatch::NotACollection),
        }
    }

    pub(crate) fn as_number(&self) -> Result<f64, TypeMismatch> {
        match self {
            Expression::Atom(Atom {
                value: AtomValue::Number(x),
                ..
            }) => Ok(*x),
            _ => Err(TypeMismatch::NotANumber),
        }
    }

    pub(crate) fn as_symbol(&self) -> Result<&Symbol, TypeMismatch> {
        match self {
            Expression::Atom(Atom {
                value: AtomValue::Symbol(s),
                ..
            }) => Ok(s),
            _ => Err(TypeMismatch::NotASymbol),
        }
    }

    pub fn is_empty_collection(&self) -> bool {
        match self {
            Expression::Collection(list) => list.is_empty(),
            _ => false,
        }
    }

    pub(crate) fn token(&self) -> Option<&Token> {
        match self {
            Expression::Atom(atom) => atom.token.as_deref(),
            Expression::Collection(list) => list.token.as_deref(),
            _ => None,
        }
    }
}

impl Expression {
    pub(crate) fn atom(value: AtomValue, token: Option<Rc<Token>>) -> Self {
        Self::Atom(Atom { value, token })
    }
    pub(crate) fn wrap_collection(elements: Vec<Expression>, token: Option<Rc<Token>>) -> Self {
        Self::Collection(Rc::new(Collection { elements, token }))
    }
    pub fn new_symbol(name: &str) -> Self {
        Self::atom(AtomValue::Symbol(Symbol::from(name)), None)
    }
}

// Conversions from host values. Only these shapes turn into expressions.

impl From<bool> for Expression {
    fn from(b: bool) -> Self {
        if b {
            Expression::TRUE
        } else {
            Expression::FALSE
        }
    }
}

impl From<f64> for Expression {
    fn from(x: f64) -> Self {
        Expression::atom(AtomValue::Number(x), None)
    }
}

impl From<&str> for Expression {
    fn from(name: &str) -> Self {
        Expression::new_symbol(name)
    }
}

impl From<String> for Expression {
    fn from(name: String) -> Self {
        Expression::atom(AtomValue::Symbol(Symbol(name)), None)
    }
}

impl From<Vec<Expression>> for Expression {
    fn from(elements: Vec<Expression>) -> Self {
        Expression::wrap_collection(elements, None)
    }
}
