use functional::token::{INVALID, RESERVED, STRING};
use functional::{block_tokenize, scan, PatternTable, ScanOptions, Scanner, Token};
use pretty_assertions::assert_eq;

fn grammar() -> PatternTable {
    PatternTable::functional().unwrap()
}

fn kinds_of<'a>(tokens: &'a [Token], texts: &[&str]) -> Vec<&'a str> {
    texts
        .iter()
        .map(|text| {
            tokens
                .iter()
                .find(|t| t.text == *text)
                .map(|t| t.kind.as_str())
                .unwrap_or("<missing>")
        })
        .collect()
}

#[test]
fn test_loop_program_classification() {
    let tokens = scan("loop({ set(x, 1) print(get(x)) })", &grammar(), INVALID);

    assert_eq!(
        kinds_of(&tokens, &["loop", "set", "print", "get", "x", "1"]),
        vec![RESERVED, RESERVED, RESERVED, RESERVED, "BAREWORD", "NUMBER"]
    );
    assert!(tokens.iter().all(|t| t.kind != INVALID));
    assert!(tokens.iter().all(|t| !t.text.trim().is_empty()));
}

#[test]
fn test_loop_body_fragments() {
    let fragments = block_tokenize("{ set(x, 1) print(get(x)) }").unwrap();

    assert!(fragments.iter().all(|f| !f.is_empty()));
    assert_eq!(fragments.concat(), "{set(x,1)print(get(x)}");
    assert_eq!(fragments[fragments.len() - 3..].to_vec(), vec!["x", ")", "}"]);
    assert_eq!(fragments.first().map(String::as_str), Some("{"));
    assert_eq!(fragments.last().map(String::as_str), Some("}"));
}

#[test]
fn test_program_with_functions_and_comments() {
    let source = r#"
print("starting test")
nop()
function(add, a, b, a+b)
rem("a comment")
add(4, 7)
"#;
    let tokens = scan(source, &grammar(), INVALID);
    let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();

    assert_eq!(&texts[..4], &["print", "(", "\"starting test\"", ")"]);
    assert_eq!(
        kinds_of(&tokens, &["nop", "function", "add", "rem", "\"a comment\"", "+", "4"]),
        vec![RESERVED, RESERVED, "BAREWORD", RESERVED, STRING, "OPERATOR", "NUMBER"]
    );
}

#[test]
fn test_string_literal_with_reserved_text_stays_string() {
    let tokens = scan(r#"print("loop while set")"#, &grammar(), INVALID);
    assert_eq!(tokens[2], Token::new("\"loop while set\"", STRING));
}

#[test]
fn test_percent_is_reserved() {
    let tokens = scan("printf(\"a\", 5) % 2", &grammar(), INVALID);
    assert_eq!(kinds_of(&tokens, &["%"]), vec![RESERVED]);
}

#[test]
fn test_custom_table_and_default_kind() {
    let table = PatternTable::from_json(
        r#"[
            {"kind": "WHITESPACE", "pattern": "\\s+"},
            {"kind": "WORD", "pattern": "[a-z]+"}
        ]"#,
    )
    .unwrap();
    let tokens = scan("abc 12 def", &table, "D");

    assert_eq!(
        tokens,
        vec![Token::new("abc", "WORD"), Token::new("12", "D"), Token::new("def", "WORD")]
    );
}

#[test]
fn test_whitespace_kind_follows_options() {
    let mut table = PatternTable::new();
    table.push("BLANK", r"[ \t]+").unwrap();
    table.push("WORD", r"[a-z]+").unwrap();

    let options = ScanOptions {
        whitespace_kind: "BLANK".into(),
        ..ScanOptions::default()
    };
    let tokens = Scanner::new(&table, options).unwrap().scan("a b").unwrap();
    assert_eq!(tokens, vec![Token::new("a", "WORD"), Token::new("b", "WORD")]);
}
