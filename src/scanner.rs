//! Single-pass scanner for `key=value` lines
//!
//! The scanner walks the input once, left to right, and yields one [`Token`]
//! per assignment. It knows nothing about which keys are acceptable; that is
//! decided by the parser's key policy after each token is produced.

use crate::error::ParseError;

/// Bitfield flags for character classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterFlags(u8);

impl CharacterFlags {
    /// Separator between tokens (space only)
    pub const WHITESPACE: Self = Self(1 << 0);
    /// ASCII letters, digits and underscore
    pub const KEY: Self = Self(1 << 1);
    /// The assignment operator `=`
    pub const ASSIGN: Self = Self(1 << 2);
    /// The double quote delimiting quoted values
    pub const QUOTE: Self = Self(1 << 3);

    /// Creates empty flags
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Checks if any of the given flags are set
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Returns the union of two flag sets
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns true if no flags are set
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for CharacterFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

/// Byte lookup table for O(1) character classification
#[derive(Debug, Clone)]
pub struct CharacterTable([CharacterFlags; 256]);

impl CharacterTable {
    /// Builds the table at compile time
    pub const fn new() -> Self {
        let mut table = [CharacterFlags::empty(); 256];
        let mut i = 0;

        while i < 256 {
            let ch = i as u8;
            let mut flags = CharacterFlags::empty();

            match ch {
                b' ' => flags = flags.union(CharacterFlags::WHITESPACE),
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' => {
                    flags = flags.union(CharacterFlags::KEY)
                }
                b'=' => flags = flags.union(CharacterFlags::ASSIGN),
                b'"' => flags = flags.union(CharacterFlags::QUOTE),
                _ => {}
            }

            table[i] = flags;
            i += 1;
        }

        Self(table)
    }

    /// Returns the flags for a byte
    #[inline(always)]
    pub const fn get_flags(&self, ch: u8) -> CharacterFlags {
        self.0[ch as usize]
    }

    /// Tests if a byte has any of the given flags
    #[inline(always)]
    pub const fn test_character(&self, ch: u8, flags: CharacterFlags) -> bool {
        self.0[ch as usize].intersects(flags)
    }

    #[inline(always)]
    pub const fn is_whitespace(&self, ch: u8) -> bool {
        self.test_character(ch, CharacterFlags::WHITESPACE)
    }

    #[inline(always)]
    pub const fn is_key_char(&self, ch: u8) -> bool {
        self.test_character(ch, CharacterFlags::KEY)
    }

    #[inline(always)]
    pub const fn is_assign(&self, ch: u8) -> bool {
        self.test_character(ch, CharacterFlags::ASSIGN)
    }

    #[inline(always)]
    pub const fn is_quote(&self, ch: u8) -> bool {
        self.test_character(ch, CharacterFlags::QUOTE)
    }
}

impl Default for CharacterTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Global character table instance
pub static CHARACTER_TABLE: CharacterTable = CharacterTable::new();

/// How a value was written in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    /// Wrapped in double quotes; may contain spaces
    Quoted,
    /// Bare run of non-space characters
    Unquoted,
}

/// One scanned assignment, borrowed from the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// The key exactly as written
    pub key: &'a str,
    /// The value without surrounding quotes
    pub value: &'a str,
    pub format: ValueFormat,
    /// Offset of the first key character
    pub start: usize,
    /// Offset one past the last consumed character (closing quote included)
    pub end: usize,
}

/// Cursor over a single input line
///
/// The cursor only moves forward. Every error position comes from it.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a str,
    position: usize,
    failed: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            failed: false,
        }
    }

    /// Current byte offset of the cursor
    #[inline(always)]
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn source(&self) -> &'a str {
        self.input
    }

    #[inline(always)]
    pub fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    #[inline(always)]
    fn peek_byte(&self) -> Option<u8> {
        self.input.as_bytes().get(self.position).copied()
    }

    /// Skips the run of spaces under the cursor
    pub fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_byte() {
            if !CHARACTER_TABLE.is_whitespace(ch) {
                break;
            }
            self.position += 1;
        }
    }

    /// Offset of the last character of the input, `0` when the input is empty
    pub fn last_char_offset(&self) -> usize {
        self.input
            .char_indices()
            .next_back()
            .map_or(0, |(offset, _)| offset)
    }

    /// Maps an offset that may sit one past the end back onto the last character
    pub fn clamp(&self, offset: usize) -> usize {
        if offset >= self.input.len() {
            self.last_char_offset()
        } else {
            offset
        }
    }

    fn scan_key(&mut self) -> Result<&'a str, ParseError> {
        let start = self.position;
        while let Some(ch) = self.peek_byte() {
            if !CHARACTER_TABLE.is_key_char(ch) {
                break;
            }
            self.position += 1;
        }

        if self.position == start {
            return Err(ParseError::MissingKey { position: start });
        }
        Ok(&self.input[start..self.position])
    }

    fn scan_assignment(&mut self) -> Result<(), ParseError> {
        match self.peek_byte() {
            Some(ch) if CHARACTER_TABLE.is_assign(ch) => {
                self.position += 1;
                Ok(())
            }
            Some(_) => Err(ParseError::MissingAssignmentOperator {
                position: self.position,
            }),
            None => Err(ParseError::IncompleteKeyValuePair {
                position: self.clamp(self.position),
            }),
        }
    }

    fn scan_value(&mut self, key: &str) -> Result<(&'a str, ValueFormat), ParseError> {
        let Some(first) = self.peek_byte() else {
            return Err(ParseError::MissingValue {
                key: key.to_string(),
                position: self.clamp(self.position),
            });
        };

        if CHARACTER_TABLE.is_quote(first) {
            self.position += 1;
            let start = self.position;
            let rest = &self.input.as_bytes()[start..];
            let Some(len) = rest.iter().position(|&ch| CHARACTER_TABLE.is_quote(ch)) else {
                self.position = self.input.len();
                return Err(ParseError::MissingEndQuote {
                    key: key.to_string(),
                    position: self.clamp(self.position),
                });
            };
            self.position = start + len + 1;
            return Ok((&self.input[start..start + len], ValueFormat::Quoted));
        }

        let start = self.position;
        while let Some(ch) = self.peek_byte() {
            if CHARACTER_TABLE.is_whitespace(ch) {
                break;
            }
            self.position += 1;
        }
        Ok((&self.input[start..self.position], ValueFormat::Unquoted))
    }

    /// Scans the next assignment, or returns `None` once only spaces remain
    pub fn next_token(&mut self) -> Result<Option<Token<'a>>, ParseError> {
        self.skip_whitespace();
        if self.is_at_end() {
            return Ok(None);
        }

        let start = self.position;
        let key = self.scan_key()?;
        self.skip_whitespace();
        self.scan_assignment()?;
        self.skip_whitespace();
        let (value, format) = self.scan_value(key)?;

        Ok(Some(Token {
            key,
            value,
            format,
            start,
            end: self.position,
        }))
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token<'a>, ParseError>;

    /// Yields tokens until the input is exhausted; stops after the first error
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_token() {
            Ok(token) => token.map(Ok),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl std::iter::FusedIterator for Scanner<'_> {}
