use std::fmt;

use combine::{
    any, choice, eof, from_str, optional,
    parser::{
        byte::{digit, spaces},
        combinator::recognize,
        repeat::{skip_many, skip_many1},
    },
    satisfy, token, Parser, Stream,
};

use crate::error::{Error, Result};

pub trait ByteStream<'a>: Stream<Token = u8, Range = &'a [u8]> + 'a {}
impl<'a, T: Stream<Token = u8, Range = &'a [u8]> + 'a> ByteStream<'a> for T {}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // keywords
    Var,
    /// `print`, or `$print` when `sigil` is set.
    Print { sigil: bool },

    // operators
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    ParL,
    ParR,
    SemiColon,

    // constant values
    Number(f64),

    // name of variables
    Name(String),

    // anything the grammar has no use for
    Unknown(char),

    // end
    Eos,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Var => write!(f, "var"),
            Self::Print { sigil: true } => write!(f, "$print"),
            Self::Print { sigil: false } => write!(f, "print"),
            Self::Assign => write!(f, "="),
            Self::Add => write!(f, "+"),
            Self::Sub => write!(f, "-"),
            Self::Mul => write!(f, "*"),
            Self::Div => write!(f, "/"),
            Self::ParL => write!(f, "("),
            Self::ParR => write!(f, ")"),
            Self::SemiColon => write!(f, ";"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Name(name) => write!(f, "{name}"),
            Self::Unknown(c) => write!(f, "{c}"),
            Self::Eos => write!(f, "<eof>"),
        }
    }
}

/// Scanner over a whole source buffer with one token of pushback.
pub struct Lex<'a> {
    input: &'a [u8],
    ahead: Option<Token>,
    line: usize,
}

impl<'a> Lex<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            ahead: None,
            line: 1,
        }
    }

    /// Line of the most recently scanned token.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn next(&mut self) -> Result<Token> {
        match self.ahead.take() {
            Some(t) => Ok(t),
            None => self.do_next(),
        }
    }

    /// Return `t` to the scanner; the next call to `next` yields it again.
    pub fn back(&mut self, t: Token) {
        debug_assert!(self.ahead.is_none(), "only one token of pushback");
        self.ahead = Some(t);
    }

    fn do_next(&mut self) -> Result<Token> {
        let (t, rest) = js_token().parse(self.input).map_err(|_| {
            let blank = self.input.iter().take_while(|c| c.is_ascii_whitespace());
            Error::Lex {
                message: "malformed number literal".into(),
                line: self.line + count_newlines(blank),
            }
        })?;
        let consumed = &self.input[..self.input.len() - rest.len()];
        self.line += count_newlines(consumed);
        self.input = rest;
        Ok(t)
    }
}

fn count_newlines<'b>(bytes: impl IntoIterator<Item = &'b u8>) -> usize {
    bytes.into_iter().filter(|&&c| c == b'\n').count()
}

fn is_name_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c == b'$'
}

fn is_name_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'$'
}

fn is_utf8_continuation(c: u8) -> bool {
    c & 0xC0 == 0x80
}

fn keyword_or_name(v: Vec<u8>) -> Token {
    match &v[..] {
        b"var" => Token::Var,
        b"print" => Token::Print { sigil: false },
        b"$print" => Token::Print { sigil: true },
        _ => Token::Name(String::from_utf8_lossy(&v).to_string()),
    }
}

fn js_token<'a, Input>() -> impl Parser<Input, Output = Token> + 'a
where
    Input: ByteStream<'a>,
{
    let name = recognize((satisfy(is_name_start), skip_many(satisfy(is_name_char))))
        .map(keyword_or_name);
    let eos = eof().map(|_| Token::Eos);
    let unknown = recognize((any(), skip_many(satisfy(is_utf8_continuation))))
        .map(|v: Vec<u8>| {
            let c = String::from_utf8_lossy(&v).chars().next();
            Token::Unknown(c.unwrap_or(char::REPLACEMENT_CHARACTER))
        });
    spaces().with(choice((operators(), number(), name, eos, unknown)))
}

fn operators<'a, Input>() -> impl Parser<Input, Output = Token> + 'a
where
    Input: ByteStream<'a>,
{
    choice((
        token(b'=').map(|_| Token::Assign),
        token(b'+').map(|_| Token::Add),
        token(b'-').map(|_| Token::Sub),
        token(b'*').map(|_| Token::Mul),
        token(b'/').map(|_| Token::Div),
        token(b'(').map(|_| Token::ParL),
        token(b')').map(|_| Token::ParR),
        token(b';').map(|_| Token::SemiColon),
    ))
}

/// Digits with at most one `.`; a leading `.` may only be followed by digits.
fn number<Input>() -> impl Parser<Input, Output = Token>
where
    Input: Stream<Token = u8>,
{
    let fraction = (token(b'.'), skip_many(digit())).map(|_| ());
    let integral = (skip_many1(digit()), optional((token(b'.'), skip_many(digit())))).map(|_| ());
    from_str(recognize::<Vec<_>, _, _>(choice((fraction, integral)))).map(Token::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn tokens(src: &str) -> Vec<Token> {
        let mut lex = Lex::new(src.as_bytes());
        let mut out = Vec::new();
        loop {
            let t = lex.next().unwrap();
            if t == Token::Eos {
                return out;
            }
            out.push(t);
        }
    }

    #[test]
    fn parse_float() {
        let (tok, rest) = js_token().parse(&b"123.45"[..]).unwrap();
        assert_eq!(tok, Token::Number(123.45));
        assert!(rest.is_empty());
    }

    #[test]
    fn parse_leading_dot() {
        let (tok, rest) = js_token().parse(&b".5"[..]).unwrap();
        assert_eq!(tok, Token::Number(0.5));
        assert!(rest.is_empty());
    }

    #[test]
    fn second_dot_ends_number() {
        assert_eq!(tokens("1.2.3"), vec![Token::Number(1.2), Token::Number(0.3)]);
    }

    #[test]
    fn keywords_match_whole_names() {
        assert_eq!(
            tokens("var variable print $print $x _y1"),
            vec![
                Token::Var,
                Token::Name("variable".into()),
                Token::Print { sigil: false },
                Token::Print { sigil: true },
                Token::Name("$x".into()),
                Token::Name("_y1".into()),
            ]
        );
    }

    #[test]
    fn parse_sentence() {
        assert_eq!(
            tokens("var a = 1 + 2*x;\n$print(a);"),
            vec![
                Token::Var,
                Token::Name("a".into()),
                Token::Assign,
                Token::Number(1.0),
                Token::Add,
                Token::Number(2.0),
                Token::Mul,
                Token::Name("x".into()),
                Token::SemiColon,
                Token::Print { sigil: true },
                Token::ParL,
                Token::Name("a".into()),
                Token::ParR,
                Token::SemiColon,
            ]
        );
    }

    #[test]
    fn unknown_character() {
        assert_eq!(tokens("a # b")[1], Token::Unknown('#'));
    }

    #[test]
    fn unknown_multibyte_character() {
        assert_eq!(
            tokens("é€ x"),
            vec![
                Token::Unknown('é'),
                Token::Unknown('€'),
                Token::Name("x".into()),
            ]
        );
    }

    #[test]
    fn lone_dot_is_an_error() {
        let mut lex = Lex::new(b"\n\n . ;");
        assert!(matches!(lex.next(), Err(Error::Lex { line: 3, .. })));
    }

    #[test]
    fn counts_lines() {
        let mut lex = Lex::new(b"a\nb\n\n  c");
        lex.next().unwrap();
        assert_eq!(lex.line(), 1);
        lex.next().unwrap();
        assert_eq!(lex.line(), 2);
        lex.next().unwrap();
        assert_eq!(lex.line(), 4);
        assert_eq!(lex.next().unwrap(), Token::Eos);
    }

    #[test]
    fn pushback_returns_same_token() {
        let mut lex = Lex::new(b"+ 1");
        let t = lex.next().unwrap();
        lex.back(t);
        assert_eq!(lex.next().unwrap(), Token::Add);
        assert_eq!(lex.next().unwrap(), Token::Number(1.0));
        assert_eq!(lex.next().unwrap(), Token::Eos);
        assert_eq!(lex.next().unwrap(), Token::Eos);
    }

    #[test]
    fn literals_render_as_written() {
        for src in ["3.14", "x", "+", "print", "$print", ";"] {
            assert_eq!(tokens(src)[0].to_string(), src);
        }
    }

    proptest! {
        #[test]
        fn number_round_trip(n in 0.0f64..1e12) {
            let text = n.to_string();
            let toks = tokens(&text);
            prop_assert_eq!(toks.len(), 1);
            prop_assert_eq!(&toks[0], &Token::Number(n));
            prop_assert_eq!(toks[0].to_string(), text);
        }

        #[test]
        fn name_round_trip(name in "[a-z_][a-z0-9_$]{0,12}") {
            prop_assume!(name != "var" && name != "print");
            let toks = tokens(&name);
            prop_assert_eq!(toks[0].to_string(), name);
        }
    }
}
