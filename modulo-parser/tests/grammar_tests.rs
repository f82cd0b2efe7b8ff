//! End-to-end tests for each grammar production

mod common;

use common::shape;
use modulo_parser::{parse_source, ErrorKind, NodeKind, ParseError};
use pretty_assertions::assert_eq;

fn error_kind(source: &str) -> ErrorKind {
    parse_source(source)
        .expect_err("source should be rejected")
        .kind()
}

// ===== Assignment and Value =====

#[test]
fn test_bare_word_value() {
    assert_eq!(
        shape("a = b"),
        "(Program (Assignment:a (Expression (Value (Word:b)))))"
    );
}

#[test]
fn test_angle_call_with_single_name() {
    assert_eq!(
        shape("x = y<z>"),
        "(Program (Assignment:x (Expression (Value (Word:y) (AngleCall (Name:z))))))"
    );
}

#[test]
fn test_angle_call_assignment_wins_over_name() {
    assert_eq!(
        shape("x = y<z = w>"),
        "(Program (Assignment:x (Expression (Value (Word:y) \
         (AngleCall (Assignment:z (Expression (Value (Word:w)))))))))"
    );
}

#[test]
fn test_angle_call_with_skipped_digit_has_no_expression() {
    // `1` is not a token, leaving `z =` with nothing to bind
    assert_eq!(error_kind("x = y<z=1>"), ErrorKind::NoMatch);
}

#[test]
fn test_angle_call_names_then_assignments() {
    assert_eq!(
        shape("x = y<a, b, c = d, e = f>"),
        "(Program (Assignment:x (Expression (Value (Word:y) (AngleCall (Name:a) (Name:b) \
         (Assignment:c (Expression (Value (Word:d)))) \
         (Assignment:e (Expression (Value (Word:f)))))))))"
    );
}

#[test]
fn test_angle_call_newline_separators() {
    assert_eq!(
        shape("x = y<\n    a\n    b = c\n>"),
        "(Program (Assignment:x (Expression (Value (Word:y) (AngleCall (Name:a) \
         (Assignment:b (Expression (Value (Word:c)))))))))"
    );
}

#[test]
fn test_empty_angle_call() {
    assert_eq!(
        shape("x = y<>"),
        "(Program (Assignment:x (Expression (Value (Word:y) (AngleCall)))))"
    );
}

#[test]
fn test_angle_call_trailing_separator_after_names() {
    assert_eq!(
        shape("x = y<a,>"),
        "(Program (Assignment:x (Expression (Value (Word:y) (AngleCall (Name:a))))))"
    );
}

#[test]
fn test_angle_call_rejects_trailing_separator_after_assignment() {
    assert_eq!(error_kind("x = y<a = b,>"), ErrorKind::NoMatch);
}

#[test]
fn test_angle_call_rejects_name_after_assignment() {
    assert_eq!(error_kind("x = y<a = b, c>"), ErrorKind::NoMatch);
}

#[test]
fn test_angle_call_separator_before_assignments_is_optional() {
    let expected = "(Program (Assignment:x (Expression (Value (Word:y) (AngleCall (Name:a) \
         (Assignment:b (Expression (Value (Word:c)))))))))";
    assert_eq!(shape("x = y<a b = c>"), expected);
    assert_eq!(shape("x = y<a\nb = c>"), expected);
    assert_eq!(shape("x = y<a, b = c>"), expected);
}

#[test]
fn test_angle_call_assignments_still_need_separators() {
    assert_eq!(error_kind("x = y<a = b c = d>"), ErrorKind::NoMatch);
}

#[test]
fn test_angle_call_requires_separator_between_names() {
    assert_eq!(error_kind("x = y<a b>"), ErrorKind::NoMatch);
}

#[test]
fn test_round_call() {
    assert_eq!(
        shape("x = f(a b c = d)"),
        "(Program (Assignment:x (Expression (Value (Word:f) (RoundCall (Name:a) (Name:b) \
         (Assignment:c (Expression (Value (Word:d)))))))))"
    );
}

#[test]
fn test_empty_round_call() {
    assert_eq!(
        shape("x = f()"),
        "(Program (Assignment:x (Expression (Value (Word:f) (RoundCall)))))"
    );
}

#[test]
fn test_round_call_items_are_not_comma_separated() {
    assert_eq!(error_kind("x = f(a, b)"), ErrorKind::NoMatch);
}

#[test]
fn test_round_call_rejects_name_after_assignment() {
    assert_eq!(error_kind("x = f(a = b c)"), ErrorKind::NoMatch);
}

#[test]
fn test_angle_then_round_call() {
    assert_eq!(
        shape("x = f<T>(a)"),
        "(Program (Assignment:x (Expression (Value (Word:f) (AngleCall (Name:T)) \
         (RoundCall (Name:a))))))"
    );
}

#[test]
fn test_call_may_follow_same_line_whitespace() {
    assert_eq!(
        shape("x = f (a)"),
        "(Program (Assignment:x (Expression (Value (Word:f) (RoundCall (Name:a))))))"
    );
}

#[test]
fn test_call_on_next_line_is_not_attached() {
    let err = parse_source("x = f\n(a)").unwrap_err();
    assert_eq!(err, ParseError::NoMatch { position: 6 });
}

#[test]
fn test_nested_calls_in_assignments() {
    assert_eq!(
        shape("buf = Ptr<inner = Box<Byte>>"),
        "(Program (Assignment:buf (Expression (Value (Word:Ptr) (AngleCall \
         (Assignment:inner (Expression (Value (Word:Box) (AngleCall (Name:Byte)))))))))))"
    );
}

// ===== Block =====

#[test]
fn test_block_single_expression() {
    assert_eq!(
        shape("x = { y }"),
        "(Program (Assignment:x (Expression (Block (Expression (Value (Word:y)))))))"
    );
}

#[test]
fn test_block_mixed_items() {
    assert_eq!(
        shape("x = { a = b, c }"),
        "(Program (Assignment:x (Expression (Block \
         (Assignment:a (Expression (Value (Word:b)))) \
         (Expression (Value (Word:c)))))))"
    );
}

#[test]
fn test_block_newline_separated() {
    assert_eq!(
        shape("x = {\n    a = b\n    f(a)\n    c\n}"),
        "(Program (Assignment:x (Expression (Block \
         (Assignment:a (Expression (Value (Word:b)))) \
         (Expression (Value (Word:f) (RoundCall (Name:a)))) \
         (Expression (Value (Word:c)))))))"
    );
}

#[test]
fn test_nested_blocks() {
    assert_eq!(
        shape("x = { { y } }"),
        "(Program (Assignment:x (Expression (Block (Expression (Block \
         (Expression (Value (Word:y)))))))))"
    );
}

#[test]
fn test_block_must_end_with_expression() {
    // Reported at the closing brace, where the block gave up
    assert_eq!(
        parse_source("x = { a = b }").unwrap_err(),
        ParseError::NoMatch { position: 12 }
    );
}

#[test]
fn test_empty_block_is_rejected() {
    assert_eq!(error_kind("x = {}"), ErrorKind::NoMatch);
}

#[test]
fn test_block_rejects_trailing_comma() {
    assert_eq!(error_kind("x = { a, }"), ErrorKind::NoMatch);
}

#[test]
fn test_block_requires_separators() {
    assert_eq!(error_kind("x = { a b }"), ErrorKind::NoMatch);
}

#[test]
fn test_semicolon_is_not_a_separator() {
    assert_eq!(error_kind("x = { a; b }"), ErrorKind::NoMatch);
}

// ===== Program =====

#[test]
fn test_multiple_assignments() {
    assert_eq!(
        shape("a = b\nc = d<e>\n\nf = { g }\n"),
        "(Program \
         (Assignment:a (Expression (Value (Word:b)))) \
         (Assignment:c (Expression (Value (Word:d) (AngleCall (Name:e))))) \
         (Assignment:f (Expression (Block (Expression (Value (Word:g)))))))"
    );
}

#[test]
fn test_assignments_on_one_line() {
    assert_eq!(
        shape("a = b c = d"),
        "(Program (Assignment:a (Expression (Value (Word:b)))) \
         (Assignment:c (Expression (Value (Word:d)))))"
    );
}

#[test]
fn test_surrounding_whitespace() {
    assert_eq!(
        shape("\n\n  a = b  \n"),
        "(Program (Assignment:a (Expression (Value (Word:b)))))"
    );
}

#[test]
fn test_full_program() {
    let source = "\
main = Fn<
    args = Args<foo = Int
    bar = Long, baz = Str>
    ret = Int
    body = { two = Two, four = Four, six = add(two four), six }
>

Str = struct<
    size = USize
    capacity = USize
    buf = Ptr<Byte>
>
Ptr = Fn<Type, body = { VoidPtr }>
";
    let tree = parse_source(source).unwrap();
    assert_eq!(tree.validate(), Ok(()));

    let top: Vec<&str> = tree
        .children(tree.root())
        .map(|id| tree.get(id).text(source).unwrap())
        .collect();
    assert_eq!(top, vec!["main", "Str", "Ptr"]);

    let mut assignments = 0;
    let mut blocks = 0;
    let mut names = Vec::new();
    tree.dfs(|_, node| match node.kind {
        NodeKind::Assignment => assignments += 1,
        NodeKind::Block => blocks += 1,
        NodeKind::Name => names.push(node.text(source).unwrap()),
        _ => {}
    });
    // main, args, foo, bar, baz, ret, body, two, four, six,
    // Str, size, capacity, buf, Ptr, body
    assert_eq!(assignments, 16);
    assert_eq!(blocks, 2);
    assert_eq!(names, vec!["two", "four", "Byte", "Type"]);
}

// ===== Rejected Input =====

#[test]
fn test_empty_source() {
    assert_eq!(
        parse_source("").unwrap_err(),
        ParseError::NoMatch { position: 0 }
    );
}

#[test]
fn test_whitespace_only_source() {
    assert_eq!(
        parse_source("  \n ").unwrap_err(),
        ParseError::NoMatch { position: 4 }
    );
}

#[test]
fn test_failure_reported_at_deepest_point() {
    // `z =` inside the call is left without an expression at `>`
    assert_eq!(
        parse_source("x = y<a, z = >").unwrap_err(),
        ParseError::NoMatch { position: 13 }
    );
    // The second assignment fails at its missing `}` after the first succeeds
    assert_eq!(
        parse_source("a = b\nc = { d = e }").unwrap_err(),
        ParseError::NoMatch { position: 18 }
    );
}

#[test]
fn test_missing_expression() {
    assert_eq!(error_kind("x ="), ErrorKind::NoMatch);
}

#[test]
fn test_trailing_tokens() {
    assert_eq!(
        parse_source("a = b }").unwrap_err(),
        ParseError::NoMatch { position: 6 }
    );
}

#[test]
fn test_keywords_are_not_words() {
    assert_eq!(error_kind("if = b"), ErrorKind::NoMatch);
    assert_eq!(error_kind("x = loop"), ErrorKind::NoMatch);
    assert_eq!(error_kind("x = f<break>"), ErrorKind::NoMatch);
}

#[test]
fn test_keyword_prefixed_words_are_words() {
    assert_eq!(
        shape("iffy = looper"),
        "(Program (Assignment:iffy (Expression (Value (Word:looper)))))"
    );
}

#[test]
fn test_unterminated_call() {
    assert_eq!(error_kind("x = y<z"), ErrorKind::NoMatch);
    assert_eq!(error_kind("x = { y"), ErrorKind::NoMatch);
}
