//! ASDL schema text parser.
//!
//! This module turns schema text into the unresolved [`Schema`]
//! representation. Name resolution happens later, in
//! [`crate::ir::SchemaIr::from_schema`], so definitions may reference
//! types declared further down the module.

use crate::error::ParseError;
use crate::lexer::{Spanned, Token};
use crate::types::{FieldDef, ProductDef, Schema, SumDef, TypeDef, TypeExpr, UseDecl, VariantDef};
use logos::Logos;

/// Parses an ASDL schema from a string.
///
/// # Arguments
/// * `source` - Schema text
///
/// # Returns
/// Parsed schema or parse error.
///
/// # Errors
/// Returns `ParseError` if the text contains invalid tokens or does not
/// follow the schema grammar.
pub fn parse_schema(source: &str) -> Result<Schema, ParseError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser { tokens, pos: 0 };
    let schema = parser.parse_schema()?;
    tracing::trace!(
        module = %schema.name,
        definitions = schema.definitions.len(),
        "parsed schema"
    );
    Ok(schema)
}

/// Lexes the whole input, attaching line numbers.
fn tokenize(source: &str) -> Result<Vec<Spanned>, ParseError> {
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut counted_to = 0;

    for (result, span) in Token::lexer(source).spanned() {
        line += source[counted_to..span.start].matches('\n').count();
        counted_to = span.start;
        match result {
            Ok(token) => tokens.push(Spanned { token, line }),
            Err(()) => {
                return Err(ParseError::InvalidToken {
                    text: source[span].to_string(),
                    line,
                });
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n).map(|t| &t.token)
    }

    fn advance(&mut self) -> Option<Spanned> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        let what = format!("'{}'", expected);
        match self.advance() {
            Some(t) if t.token == expected => Ok(()),
            Some(t) => Err(ParseError::unexpected(what, t.token.to_string(), t.line)),
            None => Err(ParseError::eof(what)),
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<String, ParseError> {
        match self.advance() {
            Some(Spanned {
                token: Token::Ident(name),
                ..
            }) => Ok(name),
            Some(t) => Err(ParseError::unexpected(what, t.token.to_string(), t.line)),
            None => Err(ParseError::eof(what)),
        }
    }

    fn parse_schema(&mut self) -> Result<Schema, ParseError> {
        let mut uses = Vec::new();
        while self.eat(&Token::Use) {
            uses.push(self.parse_use()?);
        }

        self.expect(Token::Module)?;
        let name = self.expect_ident("module name")?;
        let mut schema = Schema::new(name);
        for decl in uses {
            schema.add_use(decl);
        }

        self.expect(Token::LBrace)?;
        while !self.eat(&Token::RBrace) {
            if self.peek().is_none() {
                return Err(ParseError::eof("definition or '}'"));
            }
            let def = self.parse_definition()?;
            schema.add_definition(def);
        }

        if let Some(t) = self.advance() {
            return Err(ParseError::TrailingInput {
                found: t.token.to_string(),
                line: t.line,
            });
        }

        Ok(schema)
    }

    /// Parses `a.b { X, Y }` after the `use` keyword.
    fn parse_use(&mut self) -> Result<UseDecl, ParseError> {
        let mut module = vec![self.expect_ident("module path")?];
        while self.eat(&Token::Dot) {
            module.push(self.expect_ident("module path segment")?);
        }

        self.expect(Token::LBrace)?;
        let mut names = vec![self.expect_ident("imported type name")?];
        while self.eat(&Token::Comma) {
            names.push(self.expect_ident("imported type name")?);
        }
        self.expect(Token::RBrace)?;

        Ok(UseDecl::new(module, names))
    }

    fn parse_definition(&mut self) -> Result<TypeDef, ParseError> {
        let name = self.expect_ident("type name")?;
        self.expect(Token::Equal)?;

        if self.peek() == Some(&Token::LParen) {
            let mut product = ProductDef::new(name);
            product.fields = self.parse_fields()?;
            if self.eat(&Token::Attributes) {
                product.attributes = self.parse_fields()?;
            }
            return Ok(TypeDef::Product(product));
        }

        let mut sum = SumDef::new(name);
        sum.variants.push(self.parse_variant()?);
        while self.eat(&Token::Pipe) {
            sum.variants.push(self.parse_variant()?);
        }
        if self.eat(&Token::Attributes) {
            sum.attributes = self.parse_fields()?;
        }
        Ok(TypeDef::Sum(sum))
    }

    /// Parses `Name`, `Name(fields)`, `Name %Product`, or `%Product`.
    fn parse_variant(&mut self) -> Result<VariantDef, ParseError> {
        if self.eat(&Token::Percent) {
            let product = self.expect_ident("shared product name")?;
            return Ok(VariantDef::shared(product.clone(), product));
        }

        let name = self.expect_ident("variant name")?;
        if self.eat(&Token::Percent) {
            let product = self.expect_ident("shared product name")?;
            return Ok(VariantDef::shared(name, product));
        }

        let mut variant = VariantDef::new(name);
        if self.peek() == Some(&Token::LParen) {
            variant.fields = self.parse_fields()?;
        }
        Ok(variant)
    }

    fn parse_fields(&mut self) -> Result<Vec<FieldDef>, ParseError> {
        self.expect(Token::LParen)?;
        let mut fields = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(fields);
        }

        loop {
            let ty = self.parse_type()?;
            let name = self.expect_ident("field name")?;
            fields.push(FieldDef::new(name, ty));
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(Token::RParen)?;

        Ok(fields)
    }

    fn parse_type(&mut self) -> Result<TypeExpr, ParseError> {
        let is_map = matches!(self.peek(), Some(Token::Ident(name)) if name == "map")
            && self.peek_nth(1) == Some(&Token::LBracket);
        if is_map {
            self.pos += 2;
            let key = self.parse_type()?;
            self.expect(Token::Comma)?;
            let value = self.parse_type()?;
            self.expect(Token::RBracket)?;
            return Ok(TypeExpr::map(key, value));
        }

        let name = self.expect_ident("type name")?;
        let ty = if self.eat(&Token::Question) {
            TypeExpr::optional(name)
        } else if self.eat(&Token::Star) {
            TypeExpr::repeated(name)
        } else {
            TypeExpr::scalar(name)
        };
        Ok(ty)
    }
}
