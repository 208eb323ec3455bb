//! Whitespace and line oriented tokenizer shared by the ASCII readers.
//!
//! It mimics the usual `stream >> value` / `getline` pair: [`Lexer::parse`]
//! skips any separator (newlines included) before a token, while
//! [`Lexer::line`] returns whatever is left on the current line.

use crate::Error;
use crate::ErrorKind;
use std::io;
use std::str;

/// a token separator
fn is_separator(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == b'\r' || b == b'\n'
}

fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == b'\r'
}

fn with_lineno<E>(lineno: usize) -> impl Fn(E) -> Error
where
    E: Into<Error>,
{
    move |err: E| {
        let mut err = err.into();
        err.lineno = lineno;
        err
    }
}

#[derive(Debug)]
pub(crate) struct Lexer {
    input: String,
    pos: usize,
    lineno: usize,
}

impl Lexer {
    pub fn new(input: impl Into<String>) -> Lexer {
        Lexer {
            input: input.into(),
            pos: 0,
            lineno: 1,
        }
    }

    /// Reads the whole stream upfront; parsing then never touches the reader
    /// again.
    pub fn from_reader<R: io::Read>(mut r: R) -> Result<Lexer, Error> {
        let mut input = String::new();
        r.read_to_string(&mut input)?;
        Ok(Lexer::new(input))
    }

    pub fn lineno(&self) -> usize {
        self.lineno
    }

    pub fn error(&self, kind: ErrorKind) -> Error {
        Error::new(kind, self.lineno)
    }

    fn rest(&self) -> &[u8] {
        &self.input.as_bytes()[self.pos..]
    }

    /// Consume all separators found at the current position.
    fn skip_separators(&mut self) {
        let n = self
            .rest()
            .iter()
            .position(|&b| !is_separator(b))
            .unwrap_or(self.input.len() - self.pos);
        self.lineno += self.rest()[..n].iter().filter(|&&b| b == b'\n').count();
        self.pos += n;
    }

    /// Byte range of the next token, which is consumed.
    fn next_token(&mut self) -> Result<(usize, usize), Error> {
        self.skip_separators();
        let start = self.pos;
        let len = self
            .rest()
            .iter()
            .position(|&b| is_separator(b))
            .unwrap_or(self.input.len() - start);
        if len == 0 {
            // Asked for a token, got EOF.
            return Err(self.error(ErrorKind::UnexpectedEof));
        }
        self.pos += len;
        Ok((start, start + len))
    }

    pub fn token(&mut self) -> Result<&str, Error> {
        let (start, end) = self.next_token()?;
        Ok(&self.input[start..end])
    }

    pub fn parse<T>(&mut self) -> Result<T, Error>
    where
        T: str::FromStr,
        T::Err: Into<Error>,
    {
        let (start, end) = self.next_token()?;
        self.input[start..end]
            .parse::<T>()
            .map_err(with_lineno(self.lineno))
    }

    /// Byte range of the rest of the current line, without its line ending.
    /// The line ending is consumed.
    fn next_line(&mut self) -> Result<(usize, usize), Error> {
        let start = self.pos;
        if start == self.input.len() {
            return Err(self.error(ErrorKind::UnexpectedEof));
        }
        let (mut end, next) = match self.rest().iter().position(|&b| b == b'\n') {
            Some(n) => (start + n, start + n + 1),
            None => (self.input.len(), self.input.len()),
        };
        if next != end {
            self.lineno += 1;
        }
        self.pos = next;
        if end > start && self.input.as_bytes()[end - 1] == b'\r' {
            end -= 1;
        }
        Ok((start, end))
    }

    /// Like `getline`: returns what is left on the current line.
    pub fn line(&mut self) -> Result<&str, Error> {
        let (start, end) = self.next_line()?;
        Ok(&self.input[start..end])
    }

    /// Reads the rest of the current line and checks it is exactly `literal`
    /// (trailing blanks aside).
    pub fn expect_line(&mut self, literal: &str) -> Result<(), Error> {
        let lineno = self.lineno;
        let (start, end) = self.next_line()?;
        let found = self.input[start..end].trim_end();
        if found != literal {
            return Err(Error::new(
                ErrorKind::UnexpectedToken {
                    expected: literal.to_owned(),
                    found: found.to_owned(),
                },
                lineno,
            ));
        }
        Ok(())
    }

    /// Consumes lines until one containing `needle` has been read.
    pub fn skip_past_line_containing(&mut self, needle: &str) -> Result<(), Error> {
        loop {
            let (start, end) = self.next_line()?;
            if self.input[start..end].contains(needle) {
                return Ok(());
            }
        }
    }

    /// Consumes the rest of the current line if it is blank, then every
    /// following blank line. Stops at the start of the first line with
    /// content.
    pub fn skip_empty_lines(&mut self) {
        loop {
            let rest = self.rest();
            let line_len = rest.iter().position(|&b| b == b'\n');
            let blank = match line_len {
                Some(n) => rest[..n].iter().all(|&b| is_blank(b)),
                None => rest.iter().all(|&b| is_blank(b)),
            };
            if !blank {
                return;
            }
            match line_len {
                Some(n) => {
                    self.pos += n + 1;
                    self.lineno += 1;
                }
                None => {
                    self.pos = self.input.len();
                    return;
                }
            }
        }
    }

    /// Skips blank lines and lines starting with `comment_start`.
    pub fn skip_comment_lines(&mut self, comment_start: char) {
        loop {
            self.skip_empty_lines();
            if !self.input[self.pos..].starts_with(comment_start) {
                return;
            }
            let _ = self.next_line();
        }
    }

    /// Whether only separators remain.
    pub fn is_exhausted(&self) -> bool {
        self.rest().iter().all(|&b| is_separator(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_span_lines() {
        let mut lexer = Lexer::new("  4 2\n\n 0.5\tquad\n");
        assert_eq!(lexer.parse::<usize>().unwrap(), 4);
        assert_eq!(lexer.parse::<usize>().unwrap(), 2);
        assert_eq!(lexer.parse::<f64>().unwrap(), 0.5);
        assert_eq!(lexer.lineno(), 3);
        assert_eq!(lexer.token().unwrap(), "quad");
        assert!(lexer.is_exhausted());
        let err = lexer.token().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_bad_number_carries_line() {
        let mut lexer = Lexer::new("1\n2\nthree\n");
        lexer.parse::<i64>().unwrap();
        lexer.parse::<i64>().unwrap();
        let err = lexer.parse::<i64>().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::BadInteger(_)));
        assert_eq!(err.lineno(), 3);
    }

    #[test]
    fn test_line_after_token() {
        let mut lexer = Lexer::new("12 trailing junk\r\nnext\n");
        assert_eq!(lexer.parse::<usize>().unwrap(), 12);
        assert_eq!(lexer.line().unwrap(), " trailing junk");
        assert_eq!(lexer.line().unwrap(), "next");
        assert!(lexer.line().is_err());
    }

    #[test]
    fn test_skip_comments_and_blank_lines() {
        let mut lexer = Lexer::new("# a comment\n\n   \n# another\n3 1\n");
        lexer.skip_comment_lines('#');
        assert_eq!(lexer.lineno(), 5);
        assert_eq!(lexer.line().unwrap(), "3 1");
    }

    #[test]
    fn test_expect_line() {
        let mut lexer = Lexer::new("$NOD  \n$ELM\n");
        lexer.expect_line("$NOD").unwrap();
        let err = lexer.expect_line("$ENDNOD").unwrap_err();
        match err.kind() {
            ErrorKind::UnexpectedToken { expected, found } => {
                assert_eq!(expected, "$ENDNOD");
                assert_eq!(found, "$ELM");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(err.lineno(), 2);
    }

    #[test]
    fn test_skip_past_line_containing() {
        let mut lexer = Lexer::new("a\nb # END of stuff\nVertices\n");
        lexer.skip_past_line_containing("# END").unwrap();
        assert_eq!(lexer.line().unwrap(), "Vertices");
        assert!(lexer.skip_past_line_containing("End").is_err());
    }
}
