//! Lexical analysis for ASDL schema text.
//!
//! Comments (`-- ...` and `# ...`) and whitespace are skipped by the lexer.
//! `map` is not a keyword: the parser recognizes it contextually so that it
//! stays usable as a field name.

use logos::Logos;
use std::fmt;

/// ASDL token.
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"--[^\n]*")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    /// Keyword `module`
    #[token("module")]
    Module,
    /// Keyword `attributes`
    #[token("attributes")]
    Attributes,
    /// Keyword `use`
    #[token("use")]
    Use,

    /// `=`
    #[token("=")]
    Equal,
    /// `|`
    #[token("|")]
    Pipe,
    /// `,`
    #[token(",")]
    Comma,
    /// `.`
    #[token(".")]
    Dot,
    /// `?`
    #[token("?")]
    Question,
    /// `*`
    #[token("*")]
    Star,
    /// `%`
    #[token("%")]
    Percent,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,

    /// Identifier (type, variant, field, or module name).
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Module => "module",
            Self::Attributes => "attributes",
            Self::Use => "use",
            Self::Equal => "=",
            Self::Pipe => "|",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::Question => "?",
            Self::Star => "*",
            Self::Percent => "%",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Ident(name) => name,
        };
        f.write_str(text)
    }
}

/// A token with the 1-based line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    /// The token.
    pub token: Token,
    /// 1-based line number.
    pub line: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        Token::lexer(source)
            .collect::<Result<Vec<_>, _>>()
            .expect("lexing failed")
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            lex("module demo attributes use modules"),
            vec![
                Token::Module,
                Token::Ident("demo".to_string()),
                Token::Attributes,
                Token::Use,
                Token::Ident("modules".to_string()),
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = lex("-- leading comment\ncolor = Red # trailing\n| Blue");
        assert_eq!(
            tokens,
            vec![
                Token::Ident("color".to_string()),
                Token::Equal,
                Token::Ident("Red".to_string()),
                Token::Pipe,
                Token::Ident("Blue".to_string()),
            ]
        );
    }

    #[test]
    fn test_map_is_an_identifier() {
        assert_eq!(
            lex("map[string, int]"),
            vec![
                Token::Ident("map".to_string()),
                Token::LBracket,
                Token::Ident("string".to_string()),
                Token::Comma,
                Token::Ident("int".to_string()),
                Token::RBracket,
            ]
        );
    }

    #[test]
    fn test_invalid_character() {
        let results: Vec<_> = Token::lexer("color = Red & Blue").collect();
        assert!(results.iter().any(Result::is_err));
    }

    #[test]
    fn test_display_punctuation() {
        let text: Vec<String> = lex("( ) { } [ ] , . ? * % | =")
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(text.join(" "), "( ) { } [ ] , . ? * % | =");
    }
}
