//! Two-stack expression evaluation.
//!
//! Operands and pending operators live on separate stacks. An incoming
//! operator is pushed only when its precedence is strictly higher than the
//! operator on top; otherwise the whole operator stack is drained first and
//! the incoming operator is read again. Precedence is therefore honored only
//! within a run of strictly increasing operators: `2 - 3 * 4 * 5` evaluates
//! to `(2 - 3 * 4) * 5`.

use tracing::trace;

use crate::{
    error::{Error, Result},
    lex::{Lex, Token},
    scope::Scope,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    fn from_token(t: &Token) -> Option<Self> {
        match t {
            Token::Add => Some(Self::Add),
            Token::Sub => Some(Self::Sub),
            Token::Mul => Some(Self::Mul),
            Token::Div => Some(Self::Div),
            _ => None,
        }
    }

    fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
        }
    }

    fn apply(self, l: f64, r: f64) -> f64 {
        match self {
            Self::Add => l + r,
            Self::Sub => l - r,
            Self::Mul => l * r,
            Self::Div => l / r,
        }
    }
}

/// Evaluates tokens up to and including the next `;`.
pub fn evaluate(lex: &mut Lex, scope: &Scope) -> Result<f64> {
    let mut operands: Vec<f64> = Vec::new();
    let mut operators: Vec<BinOp> = Vec::new();

    loop {
        let t = lex.next()?;
        match t {
            Token::SemiColon => break,
            Token::Number(n) => operands.push(n),
            Token::Name(name) => {
                let value = scope.get(&name)?;
                let n = value.as_number().ok_or(Error::TypeMismatch {
                    expected: "number",
                    found: value.type_name(),
                })?;
                operands.push(n);
            }
            Token::Eos => {
                return Err(Error::Syntax {
                    expected: "`;` at the end of the expression",
                    line: lex.line(),
                })
            }
            Token::Unknown(c) => {
                return Err(Error::Lex {
                    message: format!("unknown character `{c}`"),
                    line: lex.line(),
                })
            }
            t => {
                let Some(op) = BinOp::from_token(&t) else {
                    return Err(Error::Syntax {
                        expected: "a number, a variable or an operator",
                        line: lex.line(),
                    });
                };
                match operators.last().copied() {
                    Some(top) if op.precedence() <= top.precedence() => {
                        drain(&mut operands, &mut operators, lex.line())?;
                        lex.back(t);
                    }
                    _ => operators.push(op),
                }
            }
        }
    }

    drain(&mut operands, &mut operators, lex.line())?;
    let result = match operands[..] {
        [n] => n,
        [] => {
            return Err(Error::Syntax {
                expected: "an operand",
                line: lex.line(),
            })
        }
        _ => {
            return Err(Error::Syntax {
                expected: "an operator between operands",
                line: lex.line(),
            })
        }
    };
    trace!(result, "expression evaluated");
    Ok(result)
}

fn drain(operands: &mut Vec<f64>, operators: &mut Vec<BinOp>, line: usize) -> Result<()> {
    while let Some(op) = operators.pop() {
        let (Some(r), Some(l)) = (operands.pop(), operands.pop()) else {
            return Err(Error::Syntax {
                expected: "an operand",
                line,
            });
        };
        operands.push(op.apply(l, r));
    }
    Ok(())
}
