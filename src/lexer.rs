//! PDF lexer (tokenizer).
//!
//! Low-level tokenization of PDF object syntax: numbers, literal and hex
//! strings, names, keywords, and delimiters. Whitespace (space, \t, \r, \n,
//! \0, \f) and comments (% to end of line) are skipped before every token.
//!
//! Everything works on bytes. Literal strings are returned raw (escape
//! sequences intact); the parser decodes them. Name `#xx` escapes are
//! decoded here, per the spec's lexical rules.

use nom::IResult;

/// Token types recognized by the PDF lexer.
#[derive(Debug, PartialEq, Clone)]
pub enum Token<'a> {
    /// Integer number (e.g., 42, -123)
    Integer(i64),
    /// Real (floating-point) number (e.g., 3.14, -2.5, .5)
    Real(f64),
    /// Literal string bytes (content of "(...)", escapes not decoded)
    LiteralString(&'a [u8]),
    /// Hexadecimal string bytes (content of "<...>", not yet decoded)
    HexString(&'a [u8]),
    /// Name (e.g., "Type" from "/Type"), # escapes decoded
    Name(String),
    /// Boolean true keyword
    True,
    /// Boolean false keyword
    False,
    /// Null keyword
    Null,
    /// Array start delimiter [
    ArrayStart,
    /// Array end delimiter ]
    ArrayEnd,
    /// Dictionary start delimiter <<
    DictStart,
    /// Dictionary end delimiter >>
    DictEnd,
    /// Indirect object start keyword "obj"
    ObjStart,
    /// Indirect object end keyword "endobj"
    ObjEnd,
    /// Stream start keyword "stream"
    StreamStart,
    /// Stream end keyword "endstream"
    StreamEnd,
    /// Reference keyword "R" (as in "10 0 R")
    R,
}

/// Check whether a byte is PDF whitespace.
pub fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n' | 0x00 | 0x0C)
}

/// Check whether a byte is a PDF delimiter.
pub fn is_delimiter(byte: u8) -> bool {
    matches!(byte, b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%')
}

/// Check whether a byte can appear inside a name or keyword (a "regular"
/// character in spec terms).
pub fn is_regular(byte: u8) -> bool {
    !is_whitespace(byte) && !is_delimiter(byte)
}

fn lex_error(input: &[u8]) -> nom::Err<nom::error::Error<&[u8]>> {
    nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Tag))
}

/// Skip whitespace and `%` comments.
pub fn skip_ws(input: &[u8]) -> &[u8] {
    let mut rest = input;
    loop {
        let before = rest;
        while !rest.is_empty() && is_whitespace(rest[0]) {
            rest = &rest[1..];
        }
        if !rest.is_empty() && rest[0] == b'%' {
            while !rest.is_empty() && rest[0] != b'\r' && rest[0] != b'\n' {
                rest = &rest[1..];
            }
        }
        if rest.len() == before.len() {
            return rest;
        }
    }
}

/// Read the next token from the input.
///
/// # Errors
///
/// Fails on empty input and on bytes that start no valid token (an
/// unterminated string, a stray delimiter half).
pub fn token(input: &[u8]) -> IResult<&[u8], Token<'_>> {
    let input = skip_ws(input);
    let first = *input.first().ok_or_else(|| lex_error(input))?;

    match first {
        b'[' => Ok((&input[1..], Token::ArrayStart)),
        b']' => Ok((&input[1..], Token::ArrayEnd)),
        b'<' => {
            if input.len() >= 2 && input[1] == b'<' {
                Ok((&input[2..], Token::DictStart))
            } else {
                hex_string(input)
            }
        },
        b'>' => {
            if input.len() >= 2 && input[1] == b'>' {
                Ok((&input[2..], Token::DictEnd))
            } else {
                Err(lex_error(input))
            }
        },
        b'(' => literal_string(input),
        b'/' => name(input),
        b'+' | b'-' | b'.' | b'0'..=b'9' => number(input),
        _ => keyword(input),
    }
}

/// Parse an integer or real number.
///
/// PDF allows leading signs and numbers beginning or ending with a decimal
/// point (`.5`, `4.`).
fn number(input: &[u8]) -> IResult<&[u8], Token<'_>> {
    let mut pos = 0;
    if matches!(input.first(), Some(b'+') | Some(b'-')) {
        pos += 1;
    }
    let int_start = pos;
    while pos < input.len() && input[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_len = pos - int_start;

    let mut is_real = false;
    if pos < input.len() && input[pos] == b'.' {
        is_real = true;
        pos += 1;
        while pos < input.len() && input[pos].is_ascii_digit() {
            pos += 1;
        }
    }

    if int_len == 0 && !is_real {
        return Err(lex_error(input));
    }

    let text = std::str::from_utf8(&input[..pos]).map_err(|_| lex_error(input))?;
    let rest = &input[pos..];

    if is_real {
        // Normalize ".5" / "4." forms that str::parse rejects.
        let mut normalized = String::with_capacity(text.len() + 2);
        for (i, ch) in text.char_indices() {
            if ch == '.' {
                if i == 0 || !text.as_bytes()[i - 1].is_ascii_digit() {
                    normalized.push('0');
                }
                normalized.push('.');
                if i + 1 == text.len() {
                    normalized.push('0');
                }
            } else {
                normalized.push(ch);
            }
        }
        let value: f64 = normalized.parse().map_err(|_| lex_error(input))?;
        Ok((rest, Token::Real(value)))
    } else {
        let value: i64 = text.parse().map_err(|_| lex_error(input))?;
        Ok((rest, Token::Integer(value)))
    }
}

/// Parse a literal string, tracking balanced nested parentheses.
///
/// Returns the raw bytes between the outer parentheses; escape decoding is
/// the parser's job.
fn literal_string(input: &[u8]) -> IResult<&[u8], Token<'_>> {
    debug_assert_eq!(input.first(), Some(&b'('));
    let body = &input[1..];
    let mut depth = 1usize;
    let mut pos = 0usize;

    while pos < body.len() {
        match body[pos] {
            b'\\' => {
                // Skip the escaped byte; octal escapes are handled when the
                // parser decodes, here one byte of lookahead is enough to
                // avoid counting an escaped parenthesis.
                pos += 2;
                continue;
            },
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    let content = &body[..pos];
                    return Ok((&body[pos + 1..], Token::LiteralString(content)));
                }
            },
            _ => {},
        }
        pos += 1;
    }

    // Unterminated string
    Err(lex_error(input))
}

/// Parse a hex string `<...>`.
fn hex_string(input: &[u8]) -> IResult<&[u8], Token<'_>> {
    debug_assert_eq!(input.first(), Some(&b'<'));
    let body = &input[1..];
    for (pos, &byte) in body.iter().enumerate() {
        match byte {
            b'>' => return Ok((&body[pos + 1..], Token::HexString(&body[..pos]))),
            b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F' => {},
            b if is_whitespace(b) => {},
            _ => return Err(lex_error(input)),
        }
    }
    Err(lex_error(input))
}

/// Parse a name, decoding `#xx` escapes.
fn name(input: &[u8]) -> IResult<&[u8], Token<'_>> {
    debug_assert_eq!(input.first(), Some(&b'/'));
    let body = &input[1..];
    let mut result = String::new();
    let mut pos = 0;

    while pos < body.len() && is_regular(body[pos]) {
        if body[pos] == b'#' && pos + 2 < body.len() {
            let hex = std::str::from_utf8(&body[pos + 1..pos + 3]).ok();
            if let Some(value) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                result.push(value as char);
                pos += 3;
                continue;
            }
        }
        result.push(body[pos] as char);
        pos += 1;
    }

    Ok((&body[pos..], Token::Name(result)))
}

/// Parse a bare keyword token.
fn keyword(input: &[u8]) -> IResult<&[u8], Token<'_>> {
    let mut end = 0;
    while end < input.len() && is_regular(input[end]) {
        end += 1;
    }
    if end == 0 {
        return Err(lex_error(input));
    }
    let word = &input[..end];
    let rest = &input[end..];
    match word {
        b"true" => Ok((rest, Token::True)),
        b"false" => Ok((rest, Token::False)),
        b"null" => Ok((rest, Token::Null)),
        b"obj" => Ok((rest, Token::ObjStart)),
        b"endobj" => Ok((rest, Token::ObjEnd)),
        b"stream" => Ok((rest, Token::StreamStart)),
        b"endstream" => Ok((rest, Token::StreamEnd)),
        b"R" => Ok((rest, Token::R)),
        _ => Err(lex_error(input)),
    }
}
