use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    /// Pop a value, pop a name, bind the name to the value.
    Assign,
    /// Pop a name and print the number bound to it.
    Print,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ByteCode {
    PushName(String),
    PushValue(Value),
    Op(OpCode),
}
