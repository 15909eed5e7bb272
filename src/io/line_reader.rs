use std::{io::BufRead, num::ParseIntError, str::FromStr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Line {} could not be read: {source}", lineno + 1)]
    Read {
        lineno: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {} should contain the {expected}, but the input ended", lineno + 1)]
    UnexpectedEof { lineno: usize, expected: &'static str },

    #[error("Line {} has invalid {what} `{token}`: {source}", lineno + 1)]
    InvalidInteger {
        lineno: usize,
        what: &'static str,
        token: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Line {} should contain {expected} token(s) for the {what}, but found {found}", lineno + 1)]
    TokenCount {
        lineno: usize,
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Line {} lists no cells for net {net}", lineno + 1)]
    EmptyNet { lineno: usize, net: usize },
}

/// A single line of input without its line terminator. `lineno` is 0-based.
#[derive(Clone, Copy, Debug)]
pub struct Line<'a> {
    pub lineno: usize,
    pub content: &'a str,
}

impl<'a> Line<'a> {
    /// Splits the line at whitespace and requires exactly `N` tokens.
    pub fn fields<const N: usize>(&self, what: &'static str) -> Result<[&'a str; N], ParseError> {
        let tokens: Vec<&'a str> = self.content.split_whitespace().collect();
        let found = tokens.len();

        tokens.try_into().map_err(|_| ParseError::TokenCount {
            lineno: self.lineno,
            what,
            expected: N,
            found,
        })
    }

    pub fn parse<T>(&self, token: &str, what: &'static str) -> Result<T, ParseError>
    where
        T: FromStr<Err = ParseIntError>,
    {
        token.parse().map_err(|source| ParseError::InvalidInteger {
            lineno: self.lineno,
            what,
            token: token.to_string(),
            source,
        })
    }

    pub fn parse_single<T>(&self, what: &'static str) -> Result<T, ParseError>
    where
        T: FromStr<Err = ParseIntError>,
    {
        let [token] = self.fields(what)?;
        self.parse(token, what)
    }

    pub fn parse_all<T>(&self, what: &'static str) -> Result<Vec<T>, ParseError>
    where
        T: FromStr<Err = ParseIntError>,
    {
        self.content
            .split_whitespace()
            .map(|token| self.parse(token, what))
            .collect()
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Anything but single spaces between tokens counts as extra whitespace.
    /// Empty lines do not.
    pub fn has_extra_whitespace(&self) -> bool {
        (!self.content.is_empty() && self.content.split(' ').any(str::is_empty))
            || self.content.contains(|c: char| c.is_whitespace() && c != ' ')
    }
}

/// Reads an input stream line by line, keeping track of line numbers and of
/// lines that carry extra whitespace.
pub struct LineReader<R> {
    reader: R,
    next_lineno: usize,
    buffer: String,
    extra_whitespace: Vec<usize>,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            next_lineno: 0,
            buffer: String::new(),
            extra_whitespace: Vec::new(),
        }
    }

    /// Returns the next line, or [`ParseError::UnexpectedEof`] naming what was `expected`.
    pub fn next_line(&mut self, expected: &'static str) -> Result<Line<'_>, ParseError> {
        let lineno = self.next_lineno;
        self.buffer.clear();

        let read = self
            .reader
            .read_line(&mut self.buffer)
            .map_err(|source| ParseError::Read { lineno, source })?;

        if read == 0 {
            return Err(ParseError::UnexpectedEof { lineno, expected });
        }
        self.next_lineno += 1;

        let content = self.buffer.strip_suffix('\n').unwrap_or(self.buffer.as_str());
        let content = content.strip_suffix('\r').unwrap_or(content);
        let line = Line { lineno, content };

        if line.has_extra_whitespace() {
            self.extra_whitespace.push(lineno);
        }

        Ok(line)
    }

    /// Consumes the remaining input and returns the line number of the first
    /// non-blank line, if any.
    pub fn first_non_blank_remaining(&mut self) -> Result<Option<usize>, ParseError> {
        let mut found = None;
        loop {
            match self.next_line("end of input") {
                Ok(line) => {
                    if found.is_none() && !line.is_blank() {
                        found = Some(line.lineno);
                    }
                }
                Err(ParseError::UnexpectedEof { .. }) => return Ok(found),
                Err(e) => return Err(e),
            }
        }
    }

    pub fn extra_whitespace(&self) -> &[usize] {
        &self.extra_whitespace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_lines_from_zero() {
        let mut lines = LineReader::new(&b"1\n2\r\n3"[..]);

        for expected in 0..3 {
            let line = lines.next_line("value").unwrap();
            assert_eq!(line.lineno, expected);
            assert_eq!(line.parse_single::<usize>("value").unwrap(), expected + 1);
        }

        assert!(matches!(
            lines.next_line("value"),
            Err(ParseError::UnexpectedEof {
                lineno: 3,
                expected: "value"
            })
        ));
        assert!(lines.extra_whitespace().is_empty());
    }

    #[test]
    fn invalid_utf8_names_line() {
        let mut lines = LineReader::new(&b"1\n2 \xff\xfe\n3\n"[..]);
        lines.next_line("value").unwrap();

        let err = lines.next_line("value").unwrap_err();
        assert!(matches!(err, ParseError::Read { lineno: 1, .. }), "{err:?}");
        assert!(err.to_string().starts_with("Line 2 could not be read"));
    }

    #[test]
    fn fields_requires_exact_count() {
        let line = Line {
            lineno: 4,
            content: "0 5 7",
        };

        assert_eq!(line.fields::<3>("triple").unwrap(), ["0", "5", "7"]);
        assert!(matches!(
            line.fields::<2>("pair"),
            Err(ParseError::TokenCount {
                lineno: 4,
                expected: 2,
                found: 3,
                ..
            })
        ));
    }

    #[test]
    fn invalid_integer_names_token() {
        let line = Line {
            lineno: 0,
            content: "1 x2",
        };

        let err = line.parse_all::<i64>("cell id").unwrap_err();
        assert!(matches!(&err, ParseError::InvalidInteger { token, .. } if token == "x2"));
        assert!(err.to_string().starts_with("Line 1 has invalid cell id `x2`"));
    }

    #[test]
    fn negative_ids_are_rejected_as_usize() {
        let line = Line {
            lineno: 0,
            content: "-1",
        };
        assert!(line.parse_single::<usize>("cell id").is_err());
        assert_eq!(line.parse_single::<i64>("group id").unwrap(), -1);
    }

    #[test]
    fn detects_extra_whitespace() {
        let mut lines = LineReader::new(&b"1 2\n1  2\n 1\n1\t2\n3 \n\n"[..]);
        while lines.next_line("line").is_ok() {}
        assert_eq!(lines.extra_whitespace(), &[1, 2, 3, 4]);
    }

    #[test]
    fn first_non_blank_remaining() {
        let mut lines = LineReader::new(&b"1\n\n  \n4\n5\n"[..]);
        lines.next_line("value").unwrap();
        assert_eq!(lines.first_non_blank_remaining().unwrap(), Some(3));

        let mut lines = LineReader::new(&b"1\n\n"[..]);
        lines.next_line("value").unwrap();
        assert_eq!(lines.first_non_blank_remaining().unwrap(), None);
    }
}
