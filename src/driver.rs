use std::{fmt, io::Write};

use tracing::trace;

use crate::{
    error::Error,
    lex::{Lex, Token},
    parse::ParseProto,
    scope::Scope,
    vm::ExeState,
};

/// A fatal error together with the source line it is reported against.
#[derive(Debug)]
pub struct Diagnostic {
    pub line: usize,
    pub error: Error,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ERROR] lines {}: {}.", self.line, self.error)
    }
}

/// Parses and runs `source` one statement at a time, printing to `out`.
pub fn run<W: Write>(source: &[u8], out: W) -> Result<(), Diagnostic> {
    let mut lex = Lex::new(source);
    let mut proto = ParseProto::new();
    let mut scope = Scope::new();
    let mut exe = ExeState::new(out);

    let diagnose = |lex: &Lex, error: Error| Diagnostic {
        line: error.line().unwrap_or(lex.line()),
        error,
    };

    loop {
        let token = lex.next().map_err(|e| diagnose(&lex, e))?;
        trace!(%token, line = lex.line(), "lexer");

        let parsed = match token {
            Token::Eos => break,
            Token::Var => proto.var_statement(&mut lex, &scope),
            Token::Print { .. } => proto.print_statement(&mut lex),
            Token::Unknown(c) => Err(Error::Lex {
                message: format!("unknown character `{c}`"),
                line: lex.line(),
            }),
            _ => Ok(()),
        };
        parsed.map_err(|e| diagnose(&lex, e))?;

        exe.execute(&mut proto, &mut scope)
            .map_err(|e| diagnose(&lex, e))?;
    }
    Ok(())
}
