use crate::core;
use crate::types::{Expression, Symbol};
use itertools::Itertools;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

#[derive(Debug)]
pub struct UnboundVariable(pub Symbol);

impl fmt::Display for UnboundVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unbound variable: {}", self.0)
    }
}

/// One frame of bindings. Frames are shared: closures keep their defining
/// frame alive, and every holder sees `define` and `assign` mutations.
#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<Symbol, Expression>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// A root frame with no bindings at all.
    pub fn empty() -> Self {
        Self {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        }
    }

    pub(crate) fn spawn_from(parent: &Rc<Environment>) -> Rc<Self> {
        Rc::new(Self {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(parent.clone()),
        })
    }

    /// Binds `key` in this frame only, returning the binding it replaced.
    pub fn define<T>(&self, key: T, value: Expression) -> Option<Expression>
    where
        T: Into<Symbol>,
    {
        self.bindings.borrow_mut().insert(key.into(), value)
    }

    /// Overwrites the nearest existing binding of `key` along the chain.
    pub fn assign(&self, key: &Symbol, value: Expression) -> Result<(), UnboundVariable> {
        let mut frame = self;
        loop {
            if let Some(slot) = frame.bindings.borrow_mut().get_mut(key) {
                *slot = value;
                return Ok(());
            }
            frame = frame
                .parent
                .as_deref()
                .ok_or_else(|| UnboundVariable(key.clone()))?;
        }
    }

    pub fn get(&self, key: &Symbol) -> Option<Expression> {
        let mut frame = self;
        loop {
            if let Some(value) = frame.bindings.borrow().get(key) {
                return Some(value.clone());
            }
            frame = frame.parent.as_deref()?;
        }
    }

    pub fn fetch(&self, key: &Symbol) -> Result<Expression, UnboundVariable> {
        self.get(key).ok_or_else(|| UnboundVariable(key.clone()))
    }
}

impl Default for Environment {
    /// The global environment: the boolean constants `T` and `F` plus the
    /// primitive procedures.
    fn default() -> Self {
        let env = Self::empty();
        env.define("T", Expression::TRUE);
        env.define("F", Expression::FALSE);
        for (&name, &func) in core::CORE.iter() {
            env.define(name, Expression::Primitive(func));
        }
        env
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bindings = self.bindings.borrow();
        write!(f, "{{{}}}", bindings.keys().sorted().join(", "))?;
        if let Some(parent) = &self.parent {
            write!(f, " -> {}", parent)?;
        }
        Ok(())
    }
}
