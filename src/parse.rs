use tracing::debug;

use crate::{
    bytecode::{ByteCode, OpCode},
    error::{Error, Result},
    expr,
    lex::{Lex, Token},
    scope::Scope,
};

/// Operation stream produced for the statements parsed so far.
#[derive(Debug, Default)]
pub struct ParseProto {
    pub byte_codes: Vec<ByteCode>,
}

impl ParseProto {
    pub fn new() -> Self {
        Self::default()
    }

    /// `var NAME = expr;` with the leading `var` already consumed.
    ///
    /// Emits `[name][value][Assign]`.
    pub fn var_statement(&mut self, lex: &mut Lex, scope: &Scope) -> Result<()> {
        let Token::Name(var) = lex.next()? else {
            return Err(syntax(lex, "identifier after `var`"));
        };
        self.byte_codes.push(ByteCode::PushName(var));

        if lex.next()? != Token::Assign {
            return Err(syntax(lex, "`=` after the identifier"));
        }

        let value = expr::evaluate(lex, scope)?;
        self.byte_codes.push(ByteCode::PushValue(value.into()));
        self.byte_codes.push(ByteCode::Op(OpCode::Assign));
        debug!(line = lex.line(), "var statement");
        Ok(())
    }

    /// `$print(NAME)` with the leading keyword already consumed.
    ///
    /// Emits `[name][Print]`.
    pub fn print_statement(&mut self, lex: &mut Lex) -> Result<()> {
        if lex.next()? != Token::ParL {
            return Err(syntax(lex, "`(` after `$print`"));
        }

        let Token::Name(var) = lex.next()? else {
            return Err(syntax(lex, "identifier in `$print`"));
        };
        self.byte_codes.push(ByteCode::PushName(var));

        if lex.next()? != Token::ParR {
            return Err(syntax(lex, "`)` at the end of `$print`"));
        }

        self.byte_codes.push(ByteCode::Op(OpCode::Print));
        debug!(line = lex.line(), "print statement");
        Ok(())
    }
}

fn syntax(lex: &Lex, expected: &'static str) -> Error {
    Error::Syntax {
        expected,
        line: lex.line(),
    }
}
