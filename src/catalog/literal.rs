//! Parser for the Python-literal cells found in the corpus CSVs.
//!
//! Genre, keyword, cast and crew columns hold stringified lists of dicts such
//! as `[{'id': 28, 'name': 'Action'}]`. Only the subset of literal syntax that
//! shows up in those dumps is supported: lists, tuples, dicts, quoted strings,
//! numbers and `None`/`True`/`False`.

use std::collections::BTreeMap;

/// Deepest list/dict nesting accepted; the corpus dumps never go past 3
pub const MAX_DEPTH: usize = 64;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum LiteralError {
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected character '{found}' at offset {offset}")]
    Unexpected { found: char, offset: usize },

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("trailing characters at offset {0}")]
    Trailing(usize),

    #[error("expected a list of records")]
    NotAList,

    #[error("record without a string '{0}' field")]
    MissingField(&'static str),

    #[error("nesting deeper than {} levels", MAX_DEPTH)]
    TooDeep,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Literal>),
    Dict(BTreeMap<String, Literal>),
}

impl Literal {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Str(s) => Some(s),
            _ => None,
        }
    }

    /// String value stored under `key`, if this is a dict
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self {
            Literal::Dict(map) => map.get(key).and_then(Literal::as_str),
            _ => None,
        }
    }
}

pub fn parse(input: &str) -> Result<Literal, LiteralError> {
    let mut parser = Parser {
        chars: input.char_indices().collect(),
        pos: 0,
        depth: 0,
    };
    let value = parser.value()?;
    parser.skip_whitespace();
    if let Some(&(offset, _)) = parser.chars.get(parser.pos) {
        return Err(LiteralError::Trailing(offset));
    }
    Ok(value)
}

struct Parser {
    chars: Vec<(usize, char)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn next(&mut self) -> Result<char, LiteralError> {
        let c = self.peek().ok_or(LiteralError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(c)
    }

    fn unexpected(&self) -> LiteralError {
        match self.chars.get(self.pos) {
            Some(&(offset, found)) => LiteralError::Unexpected { found, offset },
            None => LiteralError::UnexpectedEnd,
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, wanted: char) -> Result<(), LiteralError> {
        self.skip_whitespace();
        if self.peek() == Some(wanted) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn value(&mut self) -> Result<Literal, LiteralError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(LiteralError::UnexpectedEnd),
            Some('[') => self.nested(|p| p.sequence('[', ']').map(Literal::List)),
            Some('(') => self.nested(|p| p.sequence('(', ')').map(Literal::List)),
            Some('{') => self.nested(Self::dict),
            Some('\'') | Some('"') => self.string().map(Literal::Str),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_alphabetic() => self.keyword(),
            Some(_) => Err(self.unexpected()),
        }
    }

    fn nested(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<Literal, LiteralError>,
    ) -> Result<Literal, LiteralError> {
        if self.depth >= MAX_DEPTH {
            return Err(LiteralError::TooDeep);
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn sequence(&mut self, open: char, close: char) -> Result<Vec<Literal>, LiteralError> {
        self.expect(open)?;
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok(items);
            }
            items.push(self.value()?);
            self.skip_whitespace();
            match self.next()? {
                ',' => continue,
                c if c == close => return Ok(items),
                _ => {
                    self.pos -= 1;
                    return Err(self.unexpected());
                }
            }
        }
    }

    fn dict(&mut self) -> Result<Literal, LiteralError> {
        self.expect('{')?;
        let mut map = BTreeMap::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some('}') {
                self.pos += 1;
                return Ok(Literal::Dict(map));
            }
            let key = match self.value()? {
                Literal::Str(s) => s,
                Literal::Int(i) => i.to_string(),
                _ => return Err(self.unexpected()),
            };
            self.expect(':')?;
            let value = self.value()?;
            map.insert(key, value);
            self.skip_whitespace();
            match self.next()? {
                ',' => continue,
                '}' => return Ok(Literal::Dict(map)),
                _ => {
                    self.pos -= 1;
                    return Err(self.unexpected());
                }
            }
        }
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let quote = self.next()?;
        let mut out = String::new();
        loop {
            match self.next()? {
                c if c == quote => return Ok(out),
                '\\' => match self.next()? {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    'x' => {
                        let hex: String = [self.next()?, self.next()?].iter().collect();
                        let code = u32::from_str_radix(&hex, 16)
                            .map_err(|_| LiteralError::InvalidNumber(hex.clone()))?;
                        out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                    }
                    other => out.push(other),
                },
                c => out.push(c),
            }
        }
    }

    fn number(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        while matches!(
            self.peek(),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E')
        ) {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().map(|&(_, c)| c).collect();
        if let Ok(i) = text.parse::<i64>() {
            return Ok(Literal::Int(i));
        }
        text.parse::<f64>()
            .map(Literal::Float)
            .map_err(|_| LiteralError::InvalidNumber(text))
    }

    fn keyword(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().map(|&(_, c)| c).collect();
        match word.as_str() {
            "None" => Ok(Literal::None),
            "True" => Ok(Literal::Bool(true)),
            "False" => Ok(Literal::Bool(false)),
            _ => {
                self.pos = start;
                Err(self.unexpected())
            }
        }
    }
}

/// Why a structured field fell back to its empty value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// Blank cell
    Absent,
    /// Cell present but not a usable list of records
    Malformed,
}

/// Outcome of extracting a structured field from a raw cell
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted<T> {
    Value(T),
    Empty(EmptyReason),
}

impl<T: Default> Extracted<T> {
    pub fn into_value(self) -> T {
        match self {
            Extracted::Value(value) => value,
            Extracted::Empty(_) => T::default(),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Extracted::Empty(EmptyReason::Malformed))
    }
}

fn records(raw: &str) -> Result<Option<Vec<Literal>>, LiteralError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    match parse(raw)? {
        Literal::List(items) => Ok(Some(items)),
        _ => Err(LiteralError::NotAList),
    }
}

fn extract<T>(raw: &str, f: impl FnOnce(Vec<Literal>) -> Result<T, LiteralError>) -> Extracted<T> {
    match records(raw).and_then(|items| items.map(f).transpose()) {
        Ok(Some(value)) => Extracted::Value(value),
        Ok(None) => Extracted::Empty(EmptyReason::Absent),
        Err(e) => {
            tracing::debug!(error = %e, "Malformed structured field");
            Extracted::Empty(EmptyReason::Malformed)
        }
    }
}

/// `name` of every record in order, keeping at most `limit` of them
pub fn extract_names(raw: &str, limit: Option<usize>) -> Extracted<Vec<String>> {
    extract(raw, |items| {
        let names = items
            .iter()
            .map(|item| {
                item.get_str("name")
                    .map(str::to_string)
                    .ok_or(LiteralError::MissingField("name"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(match limit {
            Some(n) => names.into_iter().take(n).collect(),
            None => names,
        })
    })
}

/// `name` of the first crew record whose `job` is exactly "Director"
pub fn extract_director(raw: &str) -> Extracted<String> {
    extract(raw, |items| {
        Ok(items
            .iter()
            .find(|member| member.get_str("job") == Some("Director"))
            .and_then(|member| member.get_str("name"))
            .unwrap_or_default()
            .to_string())
    })
}
