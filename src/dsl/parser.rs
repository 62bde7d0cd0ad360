//! Parser for the circuit DSL.

use super::ast::*;
use super::lexer::{Lexer, Token, TokenKind};
use crate::error::{PulseError, Result};

/// Parser for circuit DSL.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    ///
    /// Fails if the very first token cannot be lexed.
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse the entire circuit description.
    pub fn parse(&mut self) -> Result<CircuitAst> {
        let mut ast = CircuitAst::new();

        while self.current.kind != TokenKind::Eof {
            // Skip empty lines
            if self.current.kind == TokenKind::Newline {
                self.advance()?;
                continue;
            }

            let module = self.parse_module()?;
            ast.modules.push(module);

            // Consume newline or EOF
            match self.current.kind {
                TokenKind::Newline => self.advance()?,
                TokenKind::Eof => {}
                _ => {
                    return Err(PulseError::malformed(
                        self.current.line,
                        format!("unexpected {:?} after destination list", self.current.text),
                    ));
                }
            }
        }

        Ok(ast)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            let tok = self.current.clone();
            self.advance()?;
            Ok(tok)
        } else {
            Err(PulseError::malformed(
                self.current.line,
                format!("expected {:?}, got {:?}", kind, self.current.kind),
            ))
        }
    }

    fn parse_module(&mut self) -> Result<ModuleDef> {
        let line = self.current.line;

        let kind = match self.current.kind {
            TokenKind::Percent | TokenKind::Ampersand => {
                let prefix = self.current.text.chars().next().unwrap_or('?');
                let kind = DeclaredKind::from_prefix(prefix).ok_or_else(|| {
                    PulseError::malformed(line, format!("unknown prefix '{}'", prefix))
                })?;
                self.advance()?;
                kind
            }
            _ => DeclaredKind::Broadcaster,
        };

        let name = self.expect(TokenKind::Identifier)?.text;
        if kind == DeclaredKind::Broadcaster && name != BROADCASTER {
            return Err(PulseError::malformed(
                line,
                format!("module '{}' has no '%' or '&' prefix", name),
            ));
        }

        self.expect(TokenKind::Arrow)?;

        let mut destinations = vec![self.expect(TokenKind::Identifier)?.text];
        while self.current.kind == TokenKind::Comma {
            self.advance()?;
            destinations.push(self.expect(TokenKind::Identifier)?.text);
        }

        Ok(ModuleDef {
            kind,
            name,
            destinations,
            line,
        })
    }
}
