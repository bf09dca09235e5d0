use std::io::Write;

use tracing::trace;

use crate::{
    bytecode::{ByteCode, OpCode},
    error::{Error, Result},
    parse::ParseProto,
    scope::Scope,
    value::Value,
};

type Handler<W> = fn(&mut ExeState<W>, &mut Scope) -> Result<()>;

#[derive(Debug)]
pub struct ExeState<W> {
    stack: Vec<Value>,
    out: W,
}

impl<W: Write> ExeState<W> {
    pub fn new(out: W) -> Self {
        Self {
            stack: Vec::new(),
            out,
        }
    }

    /// Runs and consumes every operation queued in `proto`.
    pub fn execute(&mut self, proto: &mut ParseProto, scope: &mut Scope) -> Result<()> {
        for code in proto.byte_codes.drain(..) {
            match code {
                ByteCode::PushName(name) => self.stack.push(name.into()),
                ByteCode::PushValue(v) => self.stack.push(v),
                ByteCode::Op(op) => {
                    trace!(?op, depth = self.stack.len(), "dispatch");
                    Self::handler(op)(self, scope)?;
                }
            }
        }
        Ok(())
    }

    fn handler(op: OpCode) -> Handler<W> {
        match op {
            OpCode::Assign => Self::op_assign,
            OpCode::Print => Self::op_print,
        }
    }

    fn op_assign(&mut self, scope: &mut Scope) -> Result<()> {
        let value = self.pop()?;
        let name = self.pop_name()?;
        scope.set(name, value);
        Ok(())
    }

    fn op_print(&mut self, scope: &mut Scope) -> Result<()> {
        let name = self.pop_name()?;
        let value = scope.get(&name)?;
        if value.as_number().is_none() {
            return Err(Error::TypeMismatch {
                expected: "number",
                found: value.type_name(),
            });
        }
        writeln!(self.out, "{value}")?;
        Ok(())
    }

    fn pop(&mut self) -> Result<Value> {
        self.stack.pop().ok_or(Error::StackUnderflow)
    }

    fn pop_name(&mut self) -> Result<String> {
        match self.pop()? {
            Value::String(name) => Ok(name),
            v => Err(Error::TypeMismatch {
                expected: "string",
                found: v.type_name(),
            }),
        }
    }
}
