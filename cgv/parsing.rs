//! Parsing utilities

#[must_use]
#[derive(Debug, Clone, Copy)]
/// `const`-capable string parser
pub struct Parser<'s> {
    /// Remaining unparsed input
    pub input: &'s str,
}

macro_rules! try_option {
    ($e:expr) => {
        match $e {
            Some(v) => v,
            None => return None,
        }
    };
}
pub(crate) use try_option;

impl<'s> Parser<'s> {
    /// Create new parser marking the beginning of the input
    pub const fn new(input: &'s str) -> Parser<'s> {
        Parser { input }
    }

    /// Parse one ascii char if input is non-empty
    pub const fn parse_any_ascii_char(self) -> Option<(Parser<'s>, char)> {
        match self.input.as_bytes() {
            [b, rest @ ..] if b.is_ascii() => Some((
                Parser {
                    // const-hack
                    input: match core::str::from_utf8(rest) {
                        Ok(input) => input,
                        Err(_) => unreachable!(),
                    },
                },
                *b as char,
            )),
            _ => None,
        }
    }

    /// Parse one ascii char if input is non-empty and it matches the `expected`
    pub const fn parse_ascii_char(self, expected: char) -> Option<Parser<'s>> {
        match self.parse_any_ascii_char() {
            Some((p, c)) if c == expected => Some(p),
            _ => None,
        }
    }
}
