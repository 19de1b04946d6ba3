//! Integration tests for the lexer and parser working together

use monkey_core::ast::{ExprKind, InfixOp, Literal, StmtKind};
use monkey_core::lexer::{Lexer, Position, TokenKind};
use monkey_core::parser::{ParseErrorKind, ParserOptions};
use monkey_core::testutil::{parse_errors, parse_ok, parse_with_options, token_kinds};

const SAMPLE: &str = r#"
let add = fn(a, b = 2) { return a + b; };
function greet(name) { "hello " + name }
let xs = [1, 2.5, "three\n", true, null, `ls -l`];
let h = {"a": 1, "b": [1, 2],};
let r = name =~ /^a\/b/i;
x = y = 3;
counter += 1;
i++;
xs[0] = -xs[1] * 2 ** 3 % 4;
let t = a > b ? a : (c ? d : e);
if (a && !b) { puts(a) } else if (b) { puts(b) } else { puts("none") }
for (i < 10) { i++ }
foreach i, v in xs { puts(i, v) }
foreach k in h.keys() { puts(k) }
switch (x) { case 1, 2 { "small" } default { "big" } }
s.trim().len;
1..10;
{"k": [1, 2]}.keys();
/* block comment */ # hash comment
// line comment
"#;

#[test]
fn let_and_return_end_to_end() {
    let program = parse_ok("let x = 5; return x + 1;");
    assert_eq!(program.stmts.len(), 2);

    let StmtKind::Let { name, value } = &program.stmts[0].kind else {
        panic!("expected a let statement");
    };
    assert_eq!(name.name, "x");
    assert_eq!(value.kind, ExprKind::Literal(Literal::Int(5)));

    let StmtKind::Return(Some(value)) = &program.stmts[1].kind else {
        panic!("expected a return statement with a value");
    };
    let ExprKind::Infix { left, op, right } = &value.kind else {
        panic!("expected an infix expression");
    };
    assert!(matches!(&left.kind, ExprKind::Ident(ident) if ident.name == "x"));
    assert_eq!(*op, InfixOp::Add);
    assert_eq!(right.kind, ExprKind::Literal(Literal::Int(1)));
}

#[test]
fn sample_program_parses_cleanly() {
    let program = parse_ok(SAMPLE);
    assert_eq!(program.stmts.len(), 18);
}

#[test]
fn rendering_parses_back_to_the_same_tree() {
    let first = parse_ok(SAMPLE).to_string();
    let second = parse_ok(&first).to_string();
    assert_eq!(first, second);
}

#[test]
fn rendering_is_fully_parenthesized() {
    let program = parse_ok("a + b * c; a = b = c; a - b - c; a++ + b;");
    assert_eq!(
        program.to_string(),
        "(a + (b * c));\n(a = (b = c));\n((a - b) - c);\n((a++) + b);"
    );
}

#[test]
fn relexing_token_literals_gives_same_kind() {
    for token in Lexer::tokenize(SAMPLE) {
        // Whether `/` divides depends on the token before it
        if matches!(
            token.kind,
            TokenKind::Eof | TokenKind::Slash | TokenKind::SlashEquals
        ) {
            continue;
        }
        let kinds = token_kinds(&token.literal);
        assert_eq!(
            kinds,
            vec![token.kind, TokenKind::Eof],
            "re-lexing {:?}",
            token.literal
        );
    }
}

#[test]
fn nested_ternary_rejected_grouped_accepted() {
    let errors = parse_errors("a ? b ? c : d : e;");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ParseErrorKind::NestedTernary);

    parse_ok("a ? (b ? c : d) : e;");
}

#[test]
fn errors_accumulate_across_statements() {
    let errors = parse_errors("+ 1; let ;");
    assert!(errors.len() >= 2);
}

#[test]
fn let_without_identifier_does_not_crash() {
    let (program, errors) = monkey_core::parse("let = 5;");
    assert!(!errors.is_empty());
    assert!(program.stmts.is_empty());
}

#[test]
fn errors_report_line_and_column() {
    let errors = parse_errors("let a = 1;\nlet b = 2;\n  let = 3;\n");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].position, Position::new(3, 7));
    assert_eq!(
        errors[0].to_string(),
        "unexpected token: found =, expected identifier at line 3, column 7"
    );
}

#[test]
fn recovery_inside_function_bodies() {
    let (program, errors) = monkey_core::parse(
        "let f = fn() {\n  let = 1;\n  return 2;\n};\nlet g = 3;",
    );
    assert_eq!(errors.len(), 1, "got {errors:?}");
    assert_eq!(
        program.to_string(),
        "let f = fn() { return 2; };\nlet g = 3;"
    );
}

#[test]
fn illegal_tokens_become_errors() {
    let errors = parse_errors("let x = 5.;");
    assert_eq!(errors[0].kind, ParseErrorKind::IllegalToken("5.".into()));
}

#[test]
fn depth_limit_reports_error_instead_of_overflowing() {
    let source = format!("{}1{}", "(".repeat(500), ")".repeat(500));
    let errors = parse_errors(&source);
    assert!(errors
        .iter()
        .any(|e| e.kind == ParseErrorKind::MaxDepthExceeded(128)));

    let source = format!("{}1{}", "[".repeat(500), "]".repeat(500));
    let errors = parse_errors(&source);
    assert!(errors
        .iter()
        .any(|e| matches!(e.kind, ParseErrorKind::MaxDepthExceeded(_))));
}

#[test]
fn depth_limit_covers_nested_blocks() {
    let source = format!("{}{}", "{".repeat(4000), "}".repeat(4000));
    let errors = parse_errors(&source);
    assert!(errors
        .iter()
        .any(|e| e.kind == ParseErrorKind::MaxDepthExceeded(128)));

    let source = format!("{}{}", "if (a) { ".repeat(4000), "}".repeat(4000));
    let errors = parse_errors(&source);
    assert!(errors
        .iter()
        .any(|e| e.kind == ParseErrorKind::MaxDepthExceeded(128)));
}

#[test]
fn depth_limit_covers_else_if_chains() {
    let source = format!("if (a) {{ 1 }}{}", " else if (a) { 1 }".repeat(20_000));
    let errors = parse_errors(&source);
    assert!(errors
        .iter()
        .any(|e| e.kind == ParseErrorKind::MaxDepthExceeded(128)));

    let source = format!("if (a) {{ 1 }}{}", " else if (a) { 1 }".repeat(20));
    parse_ok(&source);
}

#[test]
fn leading_brace_statement_is_a_hash() {
    let program = parse_ok("{\"a\": 1};");
    let StmtKind::Expr(expr) = &program.stmts[0].kind else {
        panic!("expected an expression statement");
    };
    assert!(matches!(&expr.kind, ExprKind::Hash(pairs) if pairs.len() == 1));

    let rendered = parse_ok("({\"a\": 1}).keys()[0];").to_string();
    assert_eq!(rendered, "({\"a\": 1}.keys()[0]);");
    assert_eq!(parse_ok(&rendered).to_string(), rendered);
}

#[test]
fn depth_limit_is_configurable() {
    let source = format!("{}1{}", "(".repeat(100), ")".repeat(100));

    let (_, errors) = parse_with_options(&source, ParserOptions::default().with_max_depth(200));
    assert!(errors.is_empty(), "got {errors:?}");

    let (_, errors) = parse_with_options(&source, ParserOptions::default().with_max_depth(50));
    assert!(errors
        .iter()
        .any(|e| e.kind == ParseErrorKind::MaxDepthExceeded(50)));
}

#[test]
fn empty_and_comment_only_sources() {
    assert!(parse_ok("").is_empty());
    assert!(parse_ok("  // nothing here\n# or here\n/* or here */").is_empty());
}
