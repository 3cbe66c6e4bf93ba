//! Tokenizer for Thrift IDL documents
//!
//! Comments (`//`, `#`, `/* */`) are dropped. Identifiers may contain dots so
//! that `schema.ColumnSchema` arrives as one token.

use super::errors::{SchemaError, SchemaResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Int(i64),
    Double(f64),
    Literal(String),
    Symbol(char),
}

/// Token plus the 1-based line it starts on
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub line: usize,
}

const SYMBOLS: &[char] = &['{', '}', '(', ')', '<', '>', '[', ']', '=', ',', ';', ':', '*'];

/// Splits `source` into tokens. `schema` names the document for errors.
pub fn tokenize(schema: &str, source: &str) -> SchemaResult<Vec<Spanned>> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut line = 1;

    while pos < chars.len() {
        let c = chars[pos];

        if c == '\n' {
            line += 1;
            pos += 1;
            continue;
        }
        if c.is_whitespace() {
            pos += 1;
            continue;
        }

        // Line comments
        if c == '#' || (c == '/' && chars.get(pos + 1) == Some(&'/')) {
            while pos < chars.len() && chars[pos] != '\n' {
                pos += 1;
            }
            continue;
        }

        // Block comments
        if c == '/' && chars.get(pos + 1) == Some(&'*') {
            let start_line = line;
            pos += 2;
            loop {
                match chars.get(pos) {
                    None => {
                        return Err(SchemaError::malformed_at_line(
                            schema,
                            start_line,
                            "unterminated block comment",
                        ))
                    }
                    Some('*') if chars.get(pos + 1) == Some(&'/') => {
                        pos += 2;
                        break;
                    }
                    Some('\n') => {
                        line += 1;
                        pos += 1;
                    }
                    Some(_) => pos += 1,
                }
            }
            continue;
        }

        if c == '"' || c == '\'' {
            let start_line = line;
            let mut text = String::new();
            pos += 1;
            loop {
                match chars.get(pos) {
                    None => {
                        return Err(SchemaError::malformed_at_line(
                            schema,
                            start_line,
                            "unterminated string literal",
                        ))
                    }
                    Some(&q) if q == c => {
                        pos += 1;
                        break;
                    }
                    Some('\\') => {
                        match chars.get(pos + 1) {
                            Some('n') => text.push('\n'),
                            Some('t') => text.push('\t'),
                            Some('r') => text.push('\r'),
                            Some(&other) => text.push(other),
                            None => {
                                pos += 1;
                                continue;
                            }
                        }
                        pos += 2;
                    }
                    Some(&other) => {
                        if other == '\n' {
                            line += 1;
                        }
                        text.push(other);
                        pos += 1;
                    }
                }
            }
            tokens.push(Spanned { token: Token::Literal(text), line: start_line });
            continue;
        }

        let signed_number = (c == '-' || c == '+')
            && chars.get(pos + 1).map_or(false, |n| n.is_ascii_digit());
        if c.is_ascii_digit() || signed_number {
            let (token, next) = lex_number(schema, &chars, pos, line)?;
            tokens.push(Spanned { token, line });
            pos = next;
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let start = pos;
            while pos < chars.len()
                && (chars[pos].is_ascii_alphanumeric() || chars[pos] == '_' || chars[pos] == '.')
            {
                pos += 1;
            }
            let ident: String = chars[start..pos].iter().collect();
            tokens.push(Spanned { token: Token::Ident(ident), line });
            continue;
        }

        if SYMBOLS.contains(&c) {
            tokens.push(Spanned { token: Token::Symbol(c), line });
            pos += 1;
            continue;
        }

        return Err(SchemaError::malformed_at_line(
            schema,
            line,
            format!("unexpected character '{}'", c),
        ));
    }

    Ok(tokens)
}

fn lex_number(schema: &str, chars: &[char], start: usize, line: usize) -> SchemaResult<(Token, usize)> {
    let mut pos = start;
    let negative = chars[pos] == '-';
    if chars[pos] == '-' || chars[pos] == '+' {
        pos += 1;
    }

    // Hex integers
    if chars[pos] == '0' && matches!(chars.get(pos + 1), Some('x') | Some('X')) {
        let digits_start = pos + 2;
        let mut end = digits_start;
        while end < chars.len() && chars[end].is_ascii_hexdigit() {
            end += 1;
        }
        let digits: String = chars[digits_start..end].iter().collect();
        let value = i64::from_str_radix(&digits, 16).map_err(|e| {
            SchemaError::malformed_at_line(schema, line, format!("invalid hex constant: {}", e))
        })?;
        return Ok((Token::Int(if negative { -value } else { value }), end));
    }

    let mut is_double = false;
    while pos < chars.len() {
        let c = chars[pos];
        if c.is_ascii_digit() {
            pos += 1;
        } else if c == '.' && !is_double && chars.get(pos + 1).map_or(false, |n| n.is_ascii_digit()) {
            is_double = true;
            pos += 1;
        } else if (c == 'e' || c == 'E')
            && chars
                .get(pos + 1)
                .map_or(false, |n| n.is_ascii_digit() || *n == '-' || *n == '+')
        {
            is_double = true;
            pos += 2;
        } else {
            break;
        }
    }

    let text: String = chars[start..pos].iter().collect();
    let token = if is_double {
        Token::Double(text.parse().map_err(|e| {
            SchemaError::malformed_at_line(schema, line, format!("invalid double constant: {}", e))
        })?)
    } else {
        Token::Int(text.parse().map_err(|e| {
            SchemaError::malformed_at_line(schema, line, format!("invalid integer constant: {}", e))
        })?)
    };
    Ok((token, pos))
}
