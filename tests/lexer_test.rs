use color_eyre::eyre::Result;
use proptest::prelude::*;

use microtone::lexer::{
    formatter::{BasicFormatter, TokenFormatter},
    tokenize, LexicalErrorKind, Lexer, LineBreaks, TokenKind, KEYWORDS,
};

fn kinds_and_texts(input: &str) -> Result<Vec<(TokenKind, String)>> {
    Ok(tokenize(input)?
        .into_iter()
        .map(|token| (token.kind, token.text.to_string()))
        .collect())
}

fn check(input: &str, expected: &str, test_name: &str) {
    let formatter = BasicFormatter;
    let mut buffer = String::new();
    for result in Lexer::new(input) {
        match result {
            Ok(token) => buffer.push_str(&formatter.format(&token)),
            Err(error) => buffer.push_str(&formatter.format_lexical_error(&error)),
        }
        buffer.push('\n');
    }

    assert_eq!(buffer, expected, "Failed the test {test_name}");
}

#[test]
fn smoke_test() -> Result<()> {
    assert!(tokenize("")?.is_empty());
    assert!(tokenize("   \n\t ")?.is_empty());
    Ok(())
}

#[test]
fn test_print_statement() -> Result<()> {
    assert_eq!(
        kinds_and_texts("print \"hi\" rest")?,
        vec![
            (TokenKind::Keyword, "print".to_string()),
            (TokenKind::String, "\"hi\"".to_string()),
            (TokenKind::Keyword, "rest".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn test_unrecognized_character() {
    let error = tokenize("x = 1 rest\n@").unwrap_err();
    assert_eq!(error.kind, LexicalErrorKind::Unrecognized('@'));
    assert_eq!(error.offending_char(), '@');
    assert_eq!(error.position(), 11);
    assert_eq!(error.line, 2);
}

#[test]
fn test_unterminated_string() {
    let error = tokenize("print \"open rest").unwrap_err();
    assert_eq!(error.kind, LexicalErrorKind::UnterminatedString);
    assert_eq!(error.position(), 6);
}

#[test]
fn test_keywords_take_priority() -> Result<()> {
    assert_eq!(
        kinds_and_texts("define function foo(a) rest")?,
        vec![
            (TokenKind::Keyword, "define function".to_string()),
            (TokenKind::Identifier, "foo".to_string()),
            (TokenKind::Delimiter, "(".to_string()),
            (TokenKind::Identifier, "a".to_string()),
            (TokenKind::Delimiter, ")".to_string()),
            (TokenKind::Keyword, "rest".to_string()),
        ]
    );
    assert_eq!(
        kinds_and_texts("break rest continue rest parallel for each")?,
        vec![
            (TokenKind::Keyword, "break rest".to_string()),
            (TokenKind::Keyword, "continue rest".to_string()),
            (TokenKind::Keyword, "parallel for each".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn test_keyword_prefixes_stay_identifiers() -> Result<()> {
    assert_eq!(
        kinds_and_texts("restart endless iffy printer")?,
        vec![
            (TokenKind::Identifier, "restart".to_string()),
            (TokenKind::Identifier, "endless".to_string()),
            (TokenKind::Identifier, "iffy".to_string()),
            (TokenKind::Identifier, "printer".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn test_operator_runs() -> Result<()> {
    assert_eq!(
        kinds_and_texts("a<=b != c<>d")?,
        vec![
            (TokenKind::Identifier, "a".to_string()),
            (TokenKind::Operator, "<=".to_string()),
            (TokenKind::Identifier, "b".to_string()),
            (TokenKind::Operator, "!=".to_string()),
            (TokenKind::Identifier, "c".to_string()),
            (TokenKind::Operator, "<>".to_string()),
            (TokenKind::Identifier, "d".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn test_comments_are_discarded() -> Result<()> {
    assert_eq!(
        kinds_and_texts("start a note @ with anything\nprint 1 rest start trailing")?,
        vec![
            (TokenKind::Keyword, "print".to_string()),
            (TokenKind::Number, "1".to_string()),
            (TokenKind::Keyword, "rest".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn test_basic_format() {
    check(
        "x = 42 rest\nprint \"hi\" rest\n#",
        concat!(
            "IDENTIFIER x null\n",
            "OPERATOR = null\n",
            "NUMBER 42 42\n",
            "KEYWORD rest null\n",
            "KEYWORD print null\n",
            "STRING \"hi\" hi\n",
            "KEYWORD rest null\n",
            "[line 3] Error: Unexpected character: #\n",
        ),
        "basic",
    );
}

#[test]
fn test_line_breaks() {
    let text = "first\nsecond\n\nfourth";
    let line_breaks = LineBreaks::new(text);
    assert_eq!(line_breaks.get_max_line(), 4);
    assert_eq!(line_breaks.get_line(0), 1);
    assert_eq!(line_breaks.get_line(7), 2);
    assert_eq!(line_breaks.get_line(13), 3);
    assert_eq!(line_breaks.get_line(16), 4);
    assert_eq!(&text[line_breaks.get_line_range(2)], "second");
    assert_eq!(&text[line_breaks.get_line_range(4)], "fourth");
}

// Property-based tests

fn symbol_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("(".to_string()),
        Just(")".to_string()),
        Just("[".to_string()),
        Just("]".to_string()),
        Just("{".to_string()),
        Just("}".to_string()),
        Just(",".to_string()),
        Just(":".to_string()),
        Just("+".to_string()),
        Just("-".to_string()),
        Just("*".to_string()),
        Just("/".to_string()),
        Just("=".to_string()),
        Just("==".to_string()),
        Just("!=".to_string()),
        Just("<".to_string()),
        Just("<=".to_string()),
        Just(">".to_string()),
        Just(">=".to_string()),
    ]
}

fn numeric_literal_strategy() -> impl Strategy<Value = String> {
    "[0-9]{1,18}".prop_map(|s| s)
}

fn string_literal_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 @#]*".prop_map(|s: String| format!("\"{}\"", s))
}

// The trailing underscore keeps generated names from spelling a keyword.
fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9]{0,8}_".prop_map(|s: String| s)
}

fn keyword_strategy() -> impl Strategy<Value = String> {
    proptest::sample::select(
        KEYWORDS
            .iter()
            .filter(|keyword| **keyword != "start")
            .map(|keyword| keyword.to_string())
            .collect::<Vec<_>>(),
    )
}

fn token_sequence_strategy() -> impl Strategy<Value = Vec<String>> {
    const MIN_TOKEN_COUNT: usize = 1;
    const MAX_TOKEN_COUNT: usize = 100;
    prop::collection::vec(
        prop_oneof![
            symbol_strategy(),
            numeric_literal_strategy(),
            string_literal_strategy(),
            identifier_strategy(),
            keyword_strategy(),
        ],
        MIN_TOKEN_COUNT..MAX_TOKEN_COUNT,
    )
}

proptest! {
    #[test]
    fn lexer_counts_every_token(input in token_sequence_strategy()) {
        let expected_num_tokens = input.len();
        let tokens = tokenize(&input.join(" "));
        prop_assert!(tokens.is_ok());
        prop_assert_eq!(tokens.unwrap().len(), expected_num_tokens);
    }

    #[test]
    fn lexer_round_trips_token_texts(input in token_sequence_strategy()) {
        let joined = input.join(" ");
        let tokens = tokenize(&joined).unwrap();
        let rejoined = tokens.iter().map(|token| token.text.as_str()).collect::<Vec<_>>().join(" ");
        prop_assert_eq!(rejoined, joined);
    }

    #[test]
    fn comments_never_produce_tokens(body in "[^\n]*") {
        let tokens = tokenize(&format!("start {body}\nprint 1 rest")).unwrap();
        prop_assert_eq!(tokens.len(), 3);
    }
}
