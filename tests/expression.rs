mod common;

use common::{TestResult, init_logger, keys, live_store, meta, object_model};
use tether::{
    Context, DataSource, Dependency, Expression, ExpressionError, Literal, PathExpression,
    UnaryOperator, Value, path,
};

fn call(name: &str, args: Vec<Expression>) -> Expression {
    Expression::call(name, args)
}

fn lit(token: &str) -> Expression {
    Literal::from_token(token).expect("valid literal").into()
}

// --- resolve ---

fn resolve_cases(source: &dyn DataSource) -> TestResult {
    let meta = meta();
    let ctx = Context::new(&meta, source);
    let expr: Expression = keys("_page.colors.green.name").into();
    assert_eq!(expr.resolve(&ctx)?, path!["_page", "colors", "green", "name"]);

    // this and relative paths
    let this: Expression = PathExpression::this().into();
    let relative: Expression = PathExpression::this().key("green").into();
    assert_eq!(this.resolve(&ctx)?, path![]);
    assert_eq!(relative.resolve(&ctx)?, path!["green"]);

    let child = ctx.child(&keys("_page.colors").into())?;
    assert_eq!(this.resolve(&child)?, path!["_page", "colors"]);
    assert_eq!(relative.resolve(&child)?, path!["_page", "colors", "green"]);

    // Aliases
    let child = ctx.child(&keys("_page.colors.green").bind_as("#color").into())?;
    let alias: Expression = PathExpression::alias("#color").into();
    let member: Expression = PathExpression::alias("#color").key("name").into();
    assert_eq!(alias.resolve(&child)?, path!["_page", "colors", "green"]);
    assert_eq!(member.resolve(&child)?, path!["_page", "colors", "green", "name"]);

    // Square brackets
    let simple: Expression = keys("_page.colors").bracket(keys("_page.key")).into();
    let member: Expression = keys("_page.colors").bracket(keys("_page.key")).key("name").into();
    assert_eq!(simple.resolve(&ctx)?, path!["_page", "colors", "green"]);
    assert_eq!(member.resolve(&ctx)?, path!["_page", "colors", "green", "name"]);

    let siblings = [
        (
            keys("_page.colors").bracket(keys("_page.key")).key("rgb").bracket(keys("_page.channel")),
            path!["_page", "colors", "green", "rgb", 0],
        ),
        (
            keys("_page.colors").bracket(keys("_page.key")).bracket(keys("_page.variation")),
            path!["_page", "colors", "green", "light"],
        ),
        (
            keys("_page.colors")
                .bracket(keys("_page.key"))
                .bracket(keys("_page.variation"))
                .key("hex"),
            path!["_page", "colors", "green", "light", "hex"],
        ),
        (
            keys("_page.colors").bracket(keys("_page.key")).bracket(keys("_page.variationHex")),
            path!["_page", "colors", "green", "light", "hex"],
        ),
    ];
    for (expr, expected) in siblings {
        assert_eq!(expr.resolve(&ctx)?, expected, "resolving {}", expr);
    }

    let nested = keys("_page.colors").bracket(keys("_page.keys").bracket(keys("_page.index")));
    assert_eq!(nested.resolve(&ctx)?, path!["_page", "colors", "green"]);
    assert_eq!(nested.key("name").resolve(&ctx)?, path!["_page", "colors", "green", "name"]);

    let literal_index = keys("_page.nums").bracket(lit("0"));
    assert_eq!(literal_index.resolve(&ctx)?, path!["_page", "nums", 0]);
    let literal_keys = keys("_page").bracket(lit("\"colors\"")).bracket(lit("\"green\"")).key("hex");
    assert_eq!(literal_keys.resolve(&ctx)?, path!["_page", "colors", "green", "hex"]);
    Ok(())
}

#[test]
fn test_resolve_over_object_model() -> TestResult {
    init_logger();
    resolve_cases(&object_model())
}

#[test]
fn test_resolve_over_live_store() -> TestResult {
    init_logger();
    resolve_cases(&live_store())
}

#[test]
fn test_resolve_rejects_non_paths() {
    let meta = meta();
    let ctx = Context::detached(&meta);
    assert_eq!(
        lit("1").resolve(&ctx),
        Err(ExpressionError::NotAPath { kind: "literal" })
    );
    assert_eq!(
        call("greeting", vec![]).resolve(&ctx),
        Err(ExpressionError::NotAPath { kind: "function call" })
    );
}

// --- get, against both data sources ---

fn get_cases(source: &dyn DataSource) -> TestResult {
    let meta = meta();
    let ctx = Context::new(&meta, source);
    let get = |expr: Expression| expr.get(&ctx);

    // Literals
    assert_eq!(get(lit("0"))?, Value::Number(0.0));
    assert_eq!(get(lit("1.5"))?, Value::Number(1.5));
    assert_eq!(get(lit("1.1e3"))?, Value::Number(1100.0));
    assert_eq!(get(lit("0xff"))?, Value::Number(255.0));
    assert_eq!(get(lit("true"))?, Value::Bool(true));
    assert_eq!(get(lit("false"))?, Value::Bool(false));
    assert_eq!(get(lit("\"\""))?, Value::from(""));
    assert_eq!(get(lit("'Howdy'"))?, Value::from("Howdy"));
    assert_eq!(get(lit("null"))?, Value::Null);
    assert_eq!(get(lit("undefined"))?, Value::Undefined);
    let re = get(lit("/([0-9]+)/"))?;
    let pattern = re.as_pattern().expect("pattern literal");
    assert_eq!(pattern.source(), "([0-9]+)");
    assert!(pattern.is_match("abc 42"));

    // Unary operators
    let unary = |op: &str, operand: Expression| {
        Expression::unary(UnaryOperator::from_symbol(op).expect("known operator"), operand)
    };
    assert_eq!(get(unary("!", lit("null")))?, Value::Bool(true));
    assert_eq!(get(unary("-", lit("2.3")))?, Value::Number(-2.3));
    assert_eq!(get(unary("+", lit("\"4\"")))?, Value::Number(4.0));
    assert_eq!(get(unary("~", lit("0")))?, Value::Number(-1.0));
    assert_eq!(get(unary("typeof", lit("0")))?, Value::from("number"));
    assert_eq!(get(unary("~", unary("-", lit("1"))))?, Value::Number(0.0));
    assert_eq!(
        get(unary("typeof", unary("!", unary("!", lit("\"\"")))))?,
        Value::from("boolean")
    );

    // Paths
    assert_eq!(get(keys("_page.colors.green.name").into())?, Value::from("Green"));
    let colors = ctx.child(&keys("_page.colors").into())?;
    assert_eq!(
        PathExpression::this().key("green").key("name").get(&colors)?,
        Value::from("Green")
    );
    let green = ctx.child(&keys("_page.colors.green").bind_as("#color").into())?;
    assert_eq!(PathExpression::alias("#color").key("name").get(&green)?, Value::from("Green"));
    assert_eq!(
        get(keys("_page.colors").bracket(keys("_page.key")).key("name").into())?,
        Value::from("Green")
    );
    assert_eq!(
        get(keys("_page.colors")
            .bracket(keys("_page.key"))
            .bracket(keys("_page.variation"))
            .key("hex")
            .into())?,
        Value::from("#90ee90")
    );
    assert_eq!(get(keys("_page.nums.length").into())?, Value::Number(4.0));
    assert_eq!(get(keys("_page.missing.deeper").into())?, Value::Undefined);

    // Function calls
    let num = |i: usize| -> Expression { keys("_page.nums").index(i).into() };
    assert_eq!(get(call("plus", vec![num(0), num(1)]))?, Value::Number(13.0));
    assert_eq!(get(call("greeting", vec![]))?, Value::from("Hi."));

    let nums = ctx.child(&keys("_page.nums").into())?;
    let relative = call(
        "plus",
        vec![PathExpression::this().index(0).into(), PathExpression::this().index(1).into()],
    );
    assert_eq!(relative.get(&nums)?, Value::Number(13.0));

    let aliased = ctx.child(&keys("_page.nums").bind_as("#nums").into())?;
    let by_alias = call(
        "plus",
        vec![
            PathExpression::alias("#nums").index(1).into(),
            PathExpression::alias("#nums").index(2).into(),
        ],
    );
    assert_eq!(by_alias.get(&aliased)?, Value::Number(14.0));

    let bracket_args = call(
        "plus",
        vec![
            keys("_page.nums").bracket(keys("_page.first")).into(),
            keys("_page.nums").bracket(keys("_page.second")).into(),
        ],
    );
    assert_eq!(get(bracket_args)?, Value::Number(10.0));

    let call_in_bracket = keys("_page.keys").bracket(call("minus", vec![num(2), num(0)]));
    assert_eq!(get(call_in_bracket.into())?, Value::from("green"));

    assert_eq!(
        get(call("plus", vec![num(0), call("minus", vec![num(3), num(2)])]))?,
        Value::Number(6.0)
    );
    assert_eq!(
        get(call("plus", vec![call("minus", vec![num(3), num(2)]), num(1)]))?,
        Value::Number(15.0)
    );
    Ok(())
}

#[test]
fn test_get_over_object_model() -> TestResult {
    init_logger();
    get_cases(&object_model())
}

#[test]
fn test_get_over_live_store() -> TestResult {
    init_logger();
    get_cases(&live_store())
}

#[test]
fn test_get_over_live_store_snapshot() -> TestResult {
    get_cases(&live_store().snapshot())
}

#[test]
fn test_get_errors() {
    let (meta, model) = (meta(), object_model());
    let ctx = Context::new(&meta, &model);
    assert_eq!(
        call("nope", vec![]).get(&ctx),
        Err(ExpressionError::UnknownFunction("nope".to_string()))
    );
    let unbound: Expression = PathExpression::alias("#missing").key("name").into();
    assert_eq!(
        unbound.get(&ctx),
        Err(ExpressionError::UnboundAlias("#missing".to_string()))
    );
    // Argument errors surface before the function is looked up.
    assert_eq!(
        call("nope", vec![unbound]).get(&ctx),
        Err(ExpressionError::UnboundAlias("#missing".to_string()))
    );
}

// --- dependencies ---

fn rendered(deps: Vec<Dependency>) -> Vec<String> {
    deps.iter().map(ToString::to_string).collect()
}

fn path_dependency_cases(source: &dyn DataSource) -> TestResult {
    let meta = meta();
    let ctx = Context::new(&meta, source);

    let simple: Expression = keys("_page.colors.green.name").into();
    assert_eq!(
        simple.dependencies(&ctx)?,
        vec![Dependency::exact(path!["_page", "colors", "green", "name"])]
    );

    let cases: Vec<(Expression, Vec<&str>)> = vec![
        (
            keys("_page.colors").bracket(keys("_page.key")).key("name").into(),
            vec!["_page.colors.green.name", "_page.key"],
        ),
        (
            keys("_page.colors")
                .bracket(keys("_page.key"))
                .key("rgb")
                .bracket(keys("_page.channel"))
                .into(),
            vec!["_page.colors.green.rgb.0", "_page.channel", "_page.key"],
        ),
        (
            keys("_page.colors")
                .bracket(keys("_page.key"))
                .bracket(keys("_page.variation"))
                .key("hex")
                .into(),
            vec!["_page.colors.green.light.hex", "_page.variation", "_page.key"],
        ),
        (
            keys("_page.colors")
                .bracket(keys("_page.keys").bracket(keys("_page.index")))
                .key("name")
                .into(),
            vec!["_page.colors.green.name", "_page.keys.1", "_page.index"],
        ),
    ];
    for (expr, expected) in cases {
        assert_eq!(rendered(expr.dependencies(&ctx)?), expected, "dependencies of {}", expr);
    }
    Ok(())
}

fn function_dependency_cases(source: &dyn DataSource) -> TestResult {
    let meta = meta();
    let ctx = Context::new(&meta, source);
    let num = |i: usize| -> Expression { keys("_page.nums").index(i).into() };

    let cases: Vec<(Expression, Vec<&str>)> = vec![
        (
            call("plus", vec![num(0), num(1)]),
            vec!["_page.nums.0.*", "_page.nums.1.*"],
        ),
        (
            call("plus", vec![num(0), call("minus", vec![num(3), num(2)])]),
            vec!["_page.nums.0.*", "_page.nums.3.*", "_page.nums.2.*"],
        ),
        (
            call(
                "plus",
                vec![
                    keys("_page.nums").bracket(keys("_page.first")).into(),
                    keys("_page.nums").bracket(keys("_page.second")).into(),
                ],
            ),
            vec!["_page.nums.2.*", "_page.first", "_page.nums.3.*", "_page.second"],
        ),
        (
            keys("_page.keys")
                .bracket(call("minus", vec![num(2), num(0)]))
                .into(),
            vec!["_page.keys.1", "_page.nums.2.*", "_page.nums.0.*"],
        ),
    ];
    for (expr, expected) in cases {
        assert_eq!(rendered(expr.dependencies(&ctx)?), expected, "dependencies of {}", expr);
    }

    let deep = call("plus", vec![num(0), num(1)]).dependencies(&ctx)?;
    assert_eq!(
        deep[0].to_segments(),
        path!["_page", "nums", 0, "*"].into_segments()
    );
    Ok(())
}

#[test]
fn test_dependencies_over_object_model() -> TestResult {
    init_logger();
    let model = object_model();
    path_dependency_cases(&model)?;
    function_dependency_cases(&model)
}

#[test]
fn test_dependencies_over_live_store() -> TestResult {
    init_logger();
    let store = live_store();
    path_dependency_cases(&store)?;
    function_dependency_cases(&store)
}

#[test]
fn test_dependencies_over_live_store_snapshot() -> TestResult {
    let snapshot = live_store().snapshot();
    path_dependency_cases(&snapshot)?;
    function_dependency_cases(&snapshot)
}
