use logos::Logos;
use std::fmt;

/// Token type for narration sentences.
///
/// All phrase recognition happens in the parser: "batting", "for", "the" are
/// plain `Token::Word`s, and names are runs of words that stop where a known
/// phrase begins.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Bare word. May contain inner hyphens and apostrophes (`Dogwalker's`).
    Word(String),
    /// Unsigned integer.
    Integer(i64),
    /// `-` between numbers (`2-1`, `3-run`).
    Dash,
    /// `,`
    Comma,
    /// `.`
    Period,
    /// `!`
    Bang,
    /// Line break between clauses.
    Newline,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(w) => write!(f, "{w}"),
            Token::Integer(n) => write!(f, "{n}"),
            Token::Dash => write!(f, "-"),
            Token::Comma => write!(f, ","),
            Token::Period => write!(f, "."),
            Token::Bang => write!(f, "!"),
            Token::Newline => write!(f, "newline"),
        }
    }
}

/// Internal logos token, borrowing from the source.
#[derive(Logos, Debug)]
#[logos(skip r"[ \t\r]+")]
enum RawToken {
    #[token("-")]
    Dash,

    #[token(",")]
    Comma,

    #[token(".")]
    Period,

    #[token("!")]
    Bang,

    #[token("\n")]
    Newline,

    #[regex(r"[0-9]+")]
    Integer,

    #[regex(r"[^\s.,!0-9\-][^\s.,!]*")]
    Word,
}

/// A lexer error with source location.
#[derive(Debug, Clone)]
pub struct LexError {
    /// Byte range of the erroneous input.
    pub span: std::ops::Range<usize>,
    /// Human-readable description.
    pub message: String,
}

/// Lex a sentence into `(Token, Span)` pairs.
pub fn lex(source: &str) -> (Vec<(Token, std::ops::Range<usize>)>, Vec<LexError>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(raw) => {
                let token = match raw {
                    RawToken::Dash => Token::Dash,
                    RawToken::Comma => Token::Comma,
                    RawToken::Period => Token::Period,
                    RawToken::Bang => Token::Bang,
                    RawToken::Newline => Token::Newline,
                    RawToken::Integer => match lexer.slice().parse::<i64>() {
                        Ok(n) => Token::Integer(n),
                        Err(_) => {
                            errors.push(LexError {
                                span: span.clone(),
                                message: format!("number out of range: {}", lexer.slice()),
                            });
                            continue;
                        }
                    },
                    RawToken::Word => Token::Word(lexer.slice().to_string()),
                };
                tokens.push((token, span));
            }
            Err(()) => {
                errors.push(LexError {
                    span: span.clone(),
                    message: format!("unexpected character: {:?}", &source[span.clone()]),
                });
            }
        }
    }

    (tokens, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        let (tokens, errors) = lex(source);
        assert!(errors.is_empty(), "lex errors: {errors:?}");
        tokens.into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn lex_count_sentence() {
        assert_eq!(
            tokens("Ball. 2-1"),
            vec![
                Token::Word("Ball".into()),
                Token::Period,
                Token::Integer(2),
                Token::Dash,
                Token::Integer(1),
            ]
        );
    }

    #[test]
    fn lex_keeps_possessive_in_word() {
        assert_eq!(
            tokens("Sixpack Dogwalker's Siphon activates!"),
            vec![
                Token::Word("Sixpack".into()),
                Token::Word("Dogwalker's".into()),
                Token::Word("Siphon".into()),
                Token::Word("activates".into()),
                Token::Bang,
            ]
        );
    }

    #[test]
    fn lex_run_count_splits_dash() {
        assert_eq!(
            tokens("3-run"),
            vec![Token::Integer(3), Token::Dash, Token::Word("run".into())]
        );
    }

    #[test]
    fn lex_newline_separates_clauses() {
        let toks = tokens("A scores!\nB scores!");
        assert_eq!(toks.iter().filter(|t| **t == Token::Newline).count(), 1);
    }

    #[test]
    fn lex_hyphenated_name_is_one_word() {
        assert_eq!(tokens("Jean-Luc"), vec![Token::Word("Jean-Luc".into())]);
    }
}
