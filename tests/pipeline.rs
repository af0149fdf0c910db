use pecan::evaluator::Error;
use pecan::types::{AtomValue, Symbol};
use pecan::{evaluate, parse, scan, Environment, Expression};
use std::rc::Rc;

fn run(source: &str, env: &Rc<Environment>) -> Result<Option<Expression>, Error> {
    let mut last = None;
    for form in parse(scan(source)).expect("source should parse") {
        last = evaluate(&form, env)?;
    }
    Ok(last)
}

fn value(source: &str, env: &Rc<Environment>) -> Expression {
    run(source, env)
        .expect("evaluation should succeed")
        .expect("expression should produce a value")
}

fn global() -> Rc<Environment> {
    Rc::new(Environment::default())
}

fn symbol(expr: &Expression) -> &str {
    match expr.as_atom().map(|atom| &atom.value) {
        Some(AtomValue::Symbol(name)) => name.as_ref(),
        other => panic!("expected a symbol atom, got {:?}", other),
    }
}

fn elements(expr: &Expression) -> &[Expression] {
    match expr {
        Expression::Collection(list) => &list.elements,
        other => panic!("expected a collection, got {}", other),
    }
}

#[test]
fn quoted_collection_is_left_unevaluated() {
    let env = Rc::new(Environment::empty());
    let result = value("(quote (a b c))", &env);
    let names: Vec<&str> = elements(&result).iter().map(symbol).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn eq_on_symbols_and_collections() {
    let env = global();
    assert_eq!(value("(eq? (quote a) (quote a))", &env).to_string(), "T");
    assert_eq!(value("(eq? (quote a) (quote b))", &env).to_string(), "F");
    assert_eq!(value("(eq? (quote (a)) (quote (a)))", &env).to_string(), "F");
}

#[test]
fn car_cdr_cons() {
    let env = global();
    assert_eq!(symbol(&value("(car (quote (a b c)))", &env)), "a");
    assert_eq!(value("(cdr (quote (a b c)))", &env).to_string(), "( b c )");
    assert_eq!(
        value("(cons (quote a) (quote (b c)))", &env).to_string(),
        "( a b c )"
    );
}

#[test]
fn untaken_if_branch_is_never_evaluated() {
    let env = global();
    let result = value("(if (eq? 1 1) (quote yes) (define no-branch 1))", &env);
    assert_eq!(symbol(&result), "yes");
    assert!(env.get(&Symbol::from("no-branch")).is_none());
}

#[test]
fn null_test() {
    let env = global();
    assert_eq!(value("(null? (quote ()))", &env).to_string(), "T");
    assert_eq!(value("(null? (quote (a)))", &env).to_string(), "F");
}

#[test]
fn define_then_lookup_and_set_on_fresh_environment() {
    let env = global();
    assert!(run("(define x 5)", &env).unwrap().is_none());
    match value("x", &env) {
        Expression::Atom(atom) => assert_eq!(atom.value, AtomValue::Number(5.0)),
        other => panic!("unexpected {}", other),
    }
    let fresh = Rc::new(Environment::empty());
    let err = run("(set! y 1)", &fresh).unwrap_err();
    assert!(matches!(err, Error::UnboundVariable(_)));
}

#[test]
fn parameters_do_not_leak_between_calls() {
    let env = global();
    run("(define inc (lambda (n) (+ n 1)))", &env).unwrap();
    assert_eq!(value("(inc 1)", &env).to_string(), "2");
    assert_eq!(value("(inc 41)", &env).to_string(), "42");
    assert!(env.get(&Symbol::from("n")).is_none());
    assert!(matches!(
        run("n", &env).unwrap_err(),
        Error::UnboundVariable(_)
    ));
}

#[test]
fn closures_see_later_global_definitions() {
    let env = global();
    run("(define get-z (lambda () z))", &env).unwrap();
    assert!(run("(get-z)", &env).is_err());
    run("(define z 3)", &env).unwrap();
    assert_eq!(value("(get-z)", &env).to_string(), "3");
}

#[test]
fn multiline_source() {
    let env = global();
    let source = "(define sum-to\n  (lambda (n)\n    (if (eq? n 0) 0 (+ n (sum-to (- n 1))))))\n(sum-to 10)";
    assert_eq!(value(source, &env).to_string(), "55");
}

#[test]
fn malformed_input_reports_named_errors() {
    let env = global();
    for source in &[
        "(car 1)",
        "(cdr)",
        "(quote a b)",
        "(undefined-fn 1)",
        "(1 2 3)",
        "(lambda 1 2)",
        "(if (define a 1) 1 2)",
        "((lambda (a) a))",
        "(/ 1 0)",
    ] {
        let forms = parse(scan(source)).unwrap();
        let result = evaluate(&forms[0], &env);
        assert!(result.is_err(), "{} should fail", source);
        assert!(!result.unwrap_err().to_string().is_empty());
    }
}

#[test]
fn parse_errors_carry_lines() {
    let err = parse(scan("(a\n(b")).unwrap_err();
    assert_eq!(err.line(), 2);
    let err = parse(scan("\n\n)")).unwrap_err();
    assert_eq!(err.line(), 3);
}

#[test]
fn arithmetic_never_renders_negative_zero() {
    let env = global();
    assert_eq!(value("(+)", &env).to_string(), "0");
    assert_eq!(value("(- 0)", &env).to_string(), "0");
    assert_eq!(value("(+ 1 2.5)", &env).to_string(), "3.5");
}

#[test]
fn repeated_lambda_parameters_are_rejected() {
    let env = global();
    let err = run("((lambda (a a) a) 1 2)", &env).unwrap_err();
    assert!(matches!(err, Error::MalformedForm { .. }));
}
