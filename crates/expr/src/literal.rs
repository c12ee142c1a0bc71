//! Lowers literal tokens from the tokenizer into [`Literal`] nodes.
//!
//! Accepted forms: decimal numbers with optional fraction and exponent,
//! `0x`/`0o`/`0b` integers, single- or double-quoted strings with backslash
//! escapes, `/pattern/flags`, `true`, `false`, `null` and `undefined`.
use crate::ast::Literal;
use crate::error::ExpressionError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while, take_while1},
    character::complete::{char, digit0, digit1, one_of},
    combinator::{map, map_res, opt, recognize, value},
    error::{Error, ErrorKind},
    sequence::preceded,
};
use tether_types::{Pattern, Value};

impl Literal {
    /// Lowers a single literal token, e.g. `0xff`, `'Howdy'` or `/([0-9]+)/`.
    pub fn from_token(token: &str) -> Result<Self, ExpressionError> {
        let raw = match literal(token.trim()) {
            Ok(("", raw)) => raw,
            Ok(_) | Err(_) => return Err(ExpressionError::InvalidLiteral(token.to_string())),
        };
        let value = match raw {
            RawLiteral::Value(value) => value,
            RawLiteral::Pattern { source, flags } => {
                let pattern = Pattern::new(&source, &flags).map_err(|e| {
                    ExpressionError::InvalidPattern {
                        pattern: source.clone(),
                        message: e.to_string(),
                    }
                })?;
                Value::Pattern(pattern)
            }
        };
        Ok(Literal(value))
    }
}

enum RawLiteral {
    Value(Value),
    Pattern { source: String, flags: String },
}

fn literal(input: &str) -> IResult<&str, RawLiteral> {
    alt((
        map(keyword, RawLiteral::Value),
        map(number, |n| RawLiteral::Value(Value::Number(n))),
        map(string_literal, |s| RawLiteral::Value(Value::String(s))),
        pattern,
    ))
    .parse(input)
}

// --- Keywords ---

fn keyword(input: &str) -> IResult<&str, Value> {
    alt((
        value(Value::Bool(true), tag("true")),
        value(Value::Bool(false), tag("false")),
        value(Value::Null, tag("null")),
        value(Value::Undefined, tag("undefined")),
    ))
    .parse(input)
}

// --- Numbers ---

fn radix_integer<'a>(
    prefix: &'static str,
    radix: u32,
) -> impl Parser<&'a str, Output = f64, Error = Error<&'a str>> {
    map_res(
        preceded(
            tag_no_case(prefix),
            take_while1(move |c: char| c.is_digit(radix)),
        ),
        move |digits: &str| u64::from_str_radix(digits, radix).map(|n| n as f64),
    )
}

fn decimal(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize((
            alt((
                recognize((digit1, opt((char('.'), digit0)))),
                recognize((char('.'), digit1)),
            )),
            opt((one_of("eE"), opt(one_of("+-")), digit1)),
        )),
        |text: &str| text.parse::<f64>(),
    )
    .parse(input)
}

fn number(input: &str) -> IResult<&str, f64> {
    alt((
        radix_integer("0x", 16),
        radix_integer("0o", 8),
        radix_integer("0b", 2),
        decimal,
    ))
    .parse(input)
}

// --- Strings ---

fn string_literal(input: &str) -> IResult<&str, String> {
    let quote = match input.chars().next() {
        Some(q @ ('"' | '\'')) => q,
        _ => return Err(nom::Err::Error(Error::new(input, ErrorKind::Char))),
    };
    let mut out = String::new();
    let mut chars = input.char_indices().skip(1);
    while let Some((i, c)) = chars.next() {
        match c {
            c if c == quote => return Ok((&input[i + c.len_utf8()..], out)),
            '\\' => {
                let Some((j, escaped)) = chars.next() else {
                    break;
                };
                match escaped {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    'b' => out.push('\u{8}'),
                    'f' => out.push('\u{c}'),
                    'v' => out.push('\u{b}'),
                    '0' => out.push('\0'),
                    'x' | 'u' => {
                        let width = if escaped == 'x' { 2 } else { 4 };
                        let start = j + 1;
                        let code = input
                            .get(start..start + width)
                            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                            .and_then(char::from_u32)
                            .ok_or_else(|| {
                                nom::Err::Error(Error::new(&input[j..], ErrorKind::Escaped))
                            })?;
                        out.push(code);
                        for _ in 0..width {
                            chars.next();
                        }
                    }
                    other => out.push(other),
                }
            }
            other => out.push(other),
        }
    }
    Err(nom::Err::Error(Error::new(input, ErrorKind::Char)))
}

// --- Patterns ---

fn pattern(input: &str) -> IResult<&str, RawLiteral> {
    let (rest, source) = preceded(char('/'), pattern_body).parse(input)?;
    let (rest, _) = char('/').parse(rest)?;
    let (rest, flags) = take_while(|c: char| "gimsuy".contains(c)).parse(rest)?;
    Ok((
        rest,
        RawLiteral::Pattern {
            source: source.to_string(),
            flags: flags.to_string(),
        },
    ))
}

/// Everything up to the closing slash. Escapes are kept verbatim and a slash
/// inside a character class does not terminate the pattern.
fn pattern_body(input: &str) -> IResult<&str, &str> {
    let mut in_class = false;
    let mut escaped = false;
    for (i, c) in input.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '[' => in_class = true,
            ']' => in_class = false,
            '/' if !in_class => {
                if i == 0 {
                    break;
                }
                return Ok((&input[i..], &input[..i]));
            }
            '\n' => break,
            _ => {}
        }
    }
    Err(nom::Err::Error(Error::new(input, ErrorKind::TakeUntil)))
}
