use crate::evaluator;
use crate::types::{Arity, Expression, PrimitiveFn};
use std::collections::HashMap;

fn grab_numbers(args: &[Expression]) -> evaluator::Result<Vec<f64>> {
    let type_check: Result<Vec<_>, _> = args.iter().map(|o| o.as_number()).collect();
    type_check.map_err(evaluator::Error::InvalidOperand)
}

const SUM: PrimitiveFn = PrimitiveFn {
    name: "+",
    fn_ptr: sum_,
    arity: Arity::at_least(0),
};

fn sum_(args: &[Expression]) -> evaluator::Result<Expression> {
    let value = grab_numbers(args)?.iter().fold(0.0, |acc, x| acc + x);
    Ok(Expression::from(value))
}

const SUB: PrimitiveFn = PrimitiveFn {
    name: "-",
    fn_ptr: sub_,
    arity: Arity::Between(1..=2),
};

fn sub_(args: &[Expression]) -> evaluator::Result<Expression> {
    match grab_numbers(args)?.as_slice() {
        [x] => Ok(Expression::from(-x)),
        [x, y] => Ok(Expression::from(x - y)),
        _ => unreachable!(),
    }
}

const MUL: PrimitiveFn = PrimitiveFn {
    name: "*",
    fn_ptr: mul_,
    arity: Arity::at_least(0),
};

fn mul_(args: &[Expression]) -> evaluator::Result<Expression> {
    let value = grab_numbers(args)?.iter().fold(1.0, |acc, x| acc * x);
    Ok(Expression::from(value))
}

const DIV: PrimitiveFn = PrimitiveFn {
    name: "/",
    fn_ptr: div_,
    arity: Arity::exactly(2),
};

fn div_(args: &[Expression]) -> evaluator::Result<Expression> {
    match grab_numbers(args)?.as_slice() {
        [_, y] if *y == 0.0 => Err(evaluator::Error::DivideByZero),
        [x, y] => Ok(Expression::from(x / y)),
        _ => unreachable!(),
    }
}

fn comparison_(
    args: &[Expression],
    comp: fn(&f64, &f64) -> bool,
) -> evaluator::Result<Expression> {
    match grab_numbers(args)?.as_slice() {
        [x, y] => Ok(Expression::from(comp(x, y))),
        _ => unreachable!(),
    }
}

macro_rules! comparison_primitive {
    ($SYMBOL:tt, $NAME:ident) => {
        paste::item! {
            const $NAME: PrimitiveFn = PrimitiveFn {
                name: stringify!($SYMBOL),
                fn_ptr: |args: &[Expression]| comparison_(args, f64:: [<$NAME:lower>]),
                arity: Arity::exactly(2),
            };
        }
    };
}

comparison_primitive!(<, LT);
comparison_primitive!(<=, LE);
comparison_primitive!(>, GT);
comparison_primitive!(>=, GE);
comparison_primitive!(=, EQ);

const LIST: PrimitiveFn = PrimitiveFn {
    name: "list",
    fn_ptr: list_,
    arity: Arity::at_least(0),
};

fn list_(args: &[Expression]) -> evaluator::Result<Expression> {
    Ok(Expression::from(args.to_vec()))
}

lazy_static! {
    pub static ref CORE: HashMap<&'static str, &'static PrimitiveFn> = {
        let mut map = HashMap::new();
        for func in [
            // Arithmetic
            &SUM,
            &SUB,
            &MUL,
            &DIV,
            // Comparison
            &LT,
            &LE,
            &GT,
            &GE,
            &EQ,
            // Building collections
            &LIST,
        ]
        .iter()
        {
            map.insert(func.name, *func);
        }
        map
    };
}
