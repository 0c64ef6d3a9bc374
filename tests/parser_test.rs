use color_eyre::eyre::Result;
use proptest::prelude::*;

use microtone::parser::{
    expression::{parse_expression, BinaryOperator, Expression},
    formatter::{ProgramFormatter, SExpressionFormatter},
    parse_program,
    statement::StatementKind,
    ParserErrorKind,
};

fn check_expression(input: &str, expected: &str) -> Result<()> {
    let expression = parse_expression(input)?;
    assert_eq!(
        SExpressionFormatter.format_expression(&expression),
        expected,
        "Failed to parse `{input}`"
    );
    Ok(())
}

fn check_program(input: &str, expected: &str) -> Result<()> {
    let program = parse_program(input)?;
    assert_eq!(SExpressionFormatter.format(&program), expected);
    Ok(())
}

fn error_kind(input: &str) -> ParserErrorKind {
    match parse_program(input) {
        Ok(program) => panic!("Expected `{input}` to fail, parsed {program:?}"),
        Err(error) => error.kind,
    }
}

#[test]
fn test_literals() -> Result<()> {
    assert_eq!(parse_expression("42")?, Expression::IntLiteral(42));
    assert_eq!(
        parse_expression("\"a b\"")?,
        Expression::StringLiteral("a b".into())
    );
    assert_eq!(parse_expression("name")?, Expression::Identifier("name".into()));
    Ok(())
}

#[test]
fn test_precedence() -> Result<()> {
    check_expression("1 + 2 * 3", "(+ 1 (* 2 3))")?;
    check_expression("1 * 2 + 3", "(+ (* 1 2) 3)")?;
    check_expression("a < b + 1", "(< a (+ b 1))")?;
    check_expression("(1 + 2) * 3", "(* (+ 1 2) 3)")?;
    check_expression("x == y != z", "(!= (== x y) z)")?;
    Ok(())
}

#[test]
fn test_left_associativity() -> Result<()> {
    check_expression("10 - 4 - 3", "(- (- 10 4) 3)")?;
    check_expression("64 / 4 / 2", "(/ (/ 64 4) 2)")?;
    check_expression("1 - 2 + 3", "(+ (- 1 2) 3)")?;
    Ok(())
}

#[test]
fn test_calls_and_collections() -> Result<()> {
    check_expression("add(x, y)", "(call add x y)")?;
    check_expression("now()", "(call now)")?;
    check_expression("f(g(1), [2, 3])", "(call f (call g 1) (list 2 3))")?;
    check_expression("[]", "(list)")?;
    check_expression("[[1, 2], [3]]", "(list (list 1 2) (list 3))")?;
    check_expression(
        "{\"a\": 1, \"b\": [1, 2]}",
        "(dict (\"a\" 1) (\"b\" (list 1 2)))",
    )?;
    check_expression("{1: {2: 3}}", "(dict (1 (dict (2 3))))")?;
    check_expression("f(1) + g(2)", "(+ (call f 1) (call g 2))")?;
    Ok(())
}

#[test]
fn test_lambda() -> Result<()> {
    check_expression("lambda(x): x * 2", "(lambda (x) ((return (* x 2))))")?;
    check_expression("lambda(): 1", "(lambda () ((return 1)))")?;
    Ok(())
}

#[test]
fn test_unknown_operator_is_deferred() -> Result<()> {
    let Expression::BinaryOp { operator, .. } = parse_expression("a <> b")? else {
        panic!("Expected a binary operation");
    };
    assert_eq!(operator, BinaryOperator::Unsupported("<>".into()));
    Ok(())
}

#[test]
fn test_expression_errors() {
    let kind = |input: &str| parse_expression(input).unwrap_err().kind;
    assert_eq!(kind(""), ParserErrorKind::EmptyExpression);
    assert_eq!(kind("1 +"), ParserErrorKind::MissingOperand("+".into()));
    assert!(matches!(kind("[1, 2"), ParserErrorKind::UnbalancedDelimiters(_)));
    assert!(matches!(kind("(1]"), ParserErrorKind::UnbalancedDelimiters(_)));
    assert!(matches!(kind("1 2"), ParserErrorKind::InvalidExpression(_)));
    assert!(matches!(kind("{1, 2}"), ParserErrorKind::InvalidExpression(_)));
    assert!(matches!(
        kind("99999999999999999999"),
        ParserErrorKind::InvalidInteger(_)
    ));
}

#[test]
fn test_function_program() -> Result<()> {
    check_program(
        "define function add(a,b) rest\n return a + b rest\nend rest\nx = 5 rest\ny = 10 rest\nprint add(x,y) rest",
        concat!(
            "(define add (a b) ((return (+ a b))))\n",
            "(assign x 5)\n",
            "(assign y 10)\n",
            "(print (call add x y))",
        ),
    )
}

#[test]
fn test_nested_blocks() -> Result<()> {
    check_program(
        concat!(
            "for each i in 1 to 3 rest\n",
            "    if i == 2 rest\n",
            "        try rest\n",
            "            print i rest\n",
            "        except rest\n",
            "            break rest\n",
            "        end rest\n",
            "    else rest\n",
            "        continue rest\n",
            "    end rest\n",
            "end rest\n",
            "while x rest\n",
            "    return rest\n",
            "end rest",
        ),
        concat!(
            "(for i 1 3 ((if (== i 2) ((try ((print i)) ((break)))) ((continue)))))\n",
            "(while x ((return)))",
        ),
    )
}

#[test]
fn test_statement_lines_and_comments() -> Result<()> {
    let program = parse_program("start header\n\nx = 1 rest\n\nparallel for each i in 1 to 2 rest\nend rest\nf(x)")?;
    assert_eq!(program.len(), 4);
    let lines: Vec<u32> = program.iter().map(|statement| statement.line).collect();
    assert_eq!(lines, vec![1, 3, 5, 7]);
    assert_eq!(
        program.get_statement(0).map(|statement| &statement.kind),
        Some(&StatementKind::Comment("header".into()))
    );
    assert!(matches!(
        program.get_statement(2).map(|statement| &statement.kind),
        Some(StatementKind::ForRange { parallel: true, .. })
    ));
    assert!(matches!(
        program.get_statement(3).map(|statement| &statement.kind),
        Some(StatementKind::Expression(Expression::Call { .. }))
    ));
    Ok(())
}

#[test]
fn test_block_errors() {
    assert_eq!(
        error_kind("if 1 rest\n print 1 rest"),
        ParserErrorKind::UnterminatedBlock {
            construct: "if",
            opened: 1
        }
    );
    assert_eq!(
        error_kind("print 1 rest\nend rest"),
        ParserErrorKind::UnexpectedTerminator("end rest".into())
    );
    assert_eq!(
        error_kind("while 1 rest\nelse rest\nend rest"),
        ParserErrorKind::UnexpectedTerminator("else rest".into())
    );
    assert_eq!(
        error_kind("try rest\n print 1 rest\nend rest"),
        ParserErrorKind::UnexpectedTerminator("end rest".into())
    );
}

#[test]
fn test_malformed_headers() {
    let malformed = |input: &str| {
        matches!(
            error_kind(input),
            ParserErrorKind::MalformedStatement { .. }
        )
    };
    assert!(malformed("for each i in 1 rest\nend rest"));
    assert!(malformed("for each i in a to 3 rest\nend rest"));
    assert!(malformed("define function f(a b) rest\nend rest"));
    assert!(malformed("define function (a) rest\nend rest"));
    assert!(malformed("print 1"));
    assert!(malformed("try now rest\nexcept rest\nend rest"));
    assert!(malformed("break rest now"));
}

#[test]
fn test_lexical_error_keeps_statement_line() {
    let error = parse_program("x = 1 rest\ny = 2 $ rest").unwrap_err();
    assert_eq!(error.line, 2);
    assert!(matches!(error.kind, ParserErrorKind::LexicalError(_)));
}

// Property-based tests

proptest! {
    #[test]
    fn sums_fold_to_the_left(values in prop::collection::vec(0u32..1000, 2..12)) {
        let input = values.iter().map(u32::to_string).collect::<Vec<_>>().join(" - ");
        let mut expected = values[0].to_string();
        for value in &values[1..] {
            expected = format!("(- {expected} {value})");
        }
        let expression = parse_expression(&input).unwrap();
        prop_assert_eq!(SExpressionFormatter.format_expression(&expression), expected);
    }

    #[test]
    fn for_range_headers_parse(start in 0i64..1000, end in 0i64..1000) {
        let program = parse_program(&format!("for each n in {start} to {end} rest\nend rest")).unwrap();
        let is_match = matches!(
            program.get_statement(0).map(|statement| &statement.kind),
            Some(StatementKind::ForRange { start: s, end: e, .. }) if *s == start && *e == end
        );
        prop_assert!(is_match);
    }
}
