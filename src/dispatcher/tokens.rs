//! Operation Text Tokenizer
//!
//! Splits operation text into whitespace-separated tokens. Double quotes
//! group a token; inside quotes, backslash escapes (`\"`, `\\`, `\n`,
//! `\t`) let a content argument carry any character. `quote` is the
//! inverse, producing a token that tokenizes back to the original string.

use crate::fs::FsError;

pub fn tokenize(line: &str) -> Result<Vec<String>, FsError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            '\\' if in_quotes => match chars.next() {
                Some('n') => current.push('\n'),
                Some('t') => current.push('\t'),
                Some('"') => current.push('"'),
                Some('\\') => current.push('\\'),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => {
                    return Err(unterminated(line));
                }
            },
            c if c.is_whitespace() && !in_quotes => {
                if quoted || !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                    quoted = false;
                }
            }
            c => current.push(c),
        }
    }
    if in_quotes {
        return Err(unterminated(line));
    }
    if quoted || !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Quote a single argument so `tokenize` recovers it exactly.
pub fn quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && !arg
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '\\');
    if plain {
        return arg.to_string();
    }
    let mut out = String::with_capacity(arg.len() + 2);
    out.push('"');
    for c in arg.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn unterminated(line: &str) -> FsError {
    FsError::InvalidArgument {
        path: line.to_string(),
        operation: "tokenize".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_tokens() {
        assert_eq!(
            tokenize("Move /a /b").unwrap(),
            vec!["Move", "/a", "/b"]
        );
        assert!(tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn test_quoted_token_keeps_spaces() {
        assert_eq!(
            tokenize("CreateOrReplaceFile /f \"hello world\"").unwrap(),
            vec!["CreateOrReplaceFile", "/f", "hello world"]
        );
    }

    #[test]
    fn test_empty_quoted_token() {
        assert_eq!(tokenize("Write /f \"\"").unwrap(), vec!["Write", "/f", ""]);
    }

    #[test]
    fn test_escapes_inside_quotes() {
        assert_eq!(
            tokenize(r#""a\nb\t\"c\"\\d""#).unwrap(),
            vec!["a\nb\t\"c\"\\d"]
        );
    }

    #[test]
    fn test_unterminated_quote_is_an_error() {
        assert!(matches!(
            tokenize("Read \"/unclosed").unwrap_err(),
            FsError::InvalidArgument { .. }
        ));
    }

    #[test]
    fn test_quote_round_trip() {
        for arg in ["plain", "two words", "", "say \"hi\"", "a\\b", "line\none", "tab\there"] {
            let quoted = quote(arg);
            assert_eq!(tokenize(&quoted).unwrap(), vec![arg.to_string()], "arg: {:?}", arg);
        }
    }
}
