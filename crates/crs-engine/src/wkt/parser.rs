//! WKT tokenizer and node tree, shared by WKT1 and WKT2 dialects.

use crs_common::{CrsError, CrsResult};

/// Argument of a WKT node.
#[derive(Debug, Clone, PartialEq)]
pub enum WktValue {
    Node(WktNode),
    Text(String),
    Number(f64),
    /// Bare identifier such as `east` or `ellipsoidal`.
    Keyword(String),
}

/// `KEYWORD[arg, arg, ...]`
#[derive(Debug, Clone, PartialEq)]
pub struct WktNode {
    pub keyword: String,
    pub args: Vec<WktValue>,
}

impl WktNode {
    pub fn is(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.keyword.eq_ignore_ascii_case(k))
    }

    /// Child nodes in order.
    pub fn nodes(&self) -> impl Iterator<Item = &WktNode> {
        self.args.iter().filter_map(|arg| match arg {
            WktValue::Node(node) => Some(node),
            _ => None,
        })
    }

    /// First child node with one of the given keywords.
    pub fn child(&self, keywords: &[&str]) -> Option<&WktNode> {
        self.nodes().find(|node| node.is(keywords))
    }

    pub fn children<'a>(&'a self, keywords: &'a [&'a str]) -> impl Iterator<Item = &'a WktNode> {
        self.nodes().filter(move |node| node.is(keywords))
    }

    /// Text or bare keyword at position `index`.
    pub fn text(&self, index: usize) -> Option<&str> {
        match self.args.get(index)? {
            WktValue::Text(s) | WktValue::Keyword(s) => Some(s),
            _ => None,
        }
    }

    pub fn number(&self, index: usize) -> Option<f64> {
        match self.args.get(index)? {
            WktValue::Number(n) => Some(*n),
            WktValue::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Name of the object: its first quoted argument.
    pub fn name(&self) -> &str {
        self.text(0).unwrap_or("unknown")
    }
}

/// Parse a complete WKT string into its root node.
pub fn parse(text: &str) -> CrsResult<WktNode> {
    let mut parser = Parser {
        chars: text.chars().collect(),
        pos: 0,
    };
    parser.skip_whitespace();
    let root = parser.node()?;
    parser.skip_whitespace();
    if parser.pos < parser.chars.len() {
        return Err(parser.error("unexpected trailing characters"));
    }
    Ok(root)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn error(&self, message: &str) -> CrsError {
        CrsError::InvalidWkt(format!("{} at offset {}", message, self.pos))
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().map(char::is_whitespace).unwrap_or(false) {
            self.pos += 1;
        }
    }

    fn identifier(&mut self) -> CrsResult<String> {
        let start = self.pos;
        while self
            .peek()
            .map(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            .unwrap_or(false)
        {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("expected keyword"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn node(&mut self) -> CrsResult<WktNode> {
        let keyword = self.identifier()?;
        self.skip_whitespace();
        let close = match self.bump() {
            Some('[') => ']',
            Some('(') => ')',
            _ => return Err(self.error(&format!("expected '[' after {}", keyword))),
        };

        let mut args = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(close) {
            self.pos += 1;
            return Ok(WktNode { keyword, args });
        }
        loop {
            self.skip_whitespace();
            args.push(self.value()?);
            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some(c) if c == close => break,
                Some(_) => return Err(self.error("expected ',' or closing bracket")),
                None => return Err(self.error(&format!("unterminated {} node", keyword))),
            }
        }
        Ok(WktNode { keyword, args })
    }

    fn value(&mut self) -> CrsResult<WktValue> {
        match self.peek() {
            Some('"') => self.quoted().map(WktValue::Text),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => {
                self.number().map(WktValue::Number)
            }
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                let start = self.pos;
                let word = self.identifier()?;
                self.skip_whitespace();
                if matches!(self.peek(), Some('[') | Some('(')) {
                    self.pos = start;
                    self.node().map(WktValue::Node)
                } else {
                    Ok(WktValue::Keyword(word))
                }
            }
            _ => Err(self.error("unexpected character")),
        }
    }

    /// Quoted text; a doubled quote stands for a literal quote.
    fn quoted(&mut self) -> CrsResult<String> {
        self.pos += 1;
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('"') if self.peek() == Some('"') => {
                    self.pos += 1;
                    text.push('"');
                }
                Some('"') => return Ok(text),
                Some(c) => text.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn number(&mut self) -> CrsResult<f64> {
        let start = self.pos;
        while self
            .peek()
            .map(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
            .unwrap_or(false)
        {
            self.pos += 1;
        }
        let raw: String = self.chars[start..self.pos].iter().collect();
        raw.parse::<f64>()
            .map_err(|_| self.error(&format!("invalid number '{}'", raw)))
    }
}
