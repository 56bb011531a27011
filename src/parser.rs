//! Parsers that turn a `key=value` line into a [`Parsed`] map
//!
//! [`Parser`] accepts every well-formed key. [`StrictParser`] wraps a parser
//! bound to an allow-list and rejects anything else with
//! [`ParseError::InvalidKey`].

use crate::error::ParseError;
use crate::parsed::Parsed;
use crate::scanner::{Scanner, Token};
use crate::validation::{KeyPolicy, StrictKeys};
use tracing::{debug, trace};

/// Behavior when the same key is assigned twice in one line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateKeyBehavior {
    /// The last assignment wins
    #[default]
    Override,
    /// Fail with [`ParseError::DuplicateKey`]
    Error,
}

/// Configuration options for the parser
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserConfig {
    /// Behavior when duplicate keys are encountered
    pub duplicate_key_behavior: DuplicateKeyBehavior,
}

impl ParserConfig {
    /// Creates a new parser configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the duplicate key behavior
    pub fn with_duplicate_key_behavior(mut self, behavior: DuplicateKeyBehavior) -> Self {
        self.duplicate_key_behavior = behavior;
        self
    }
}

/// Parses `key=value` lines, storing keys accepted by its [`KeyPolicy`]
///
/// A parser holds only configuration. Every call to [`Parser::parse`] starts
/// from a fresh cursor and an empty result, so one instance can be shared
/// freely.
///
/// ```rust
/// use kv_parser::Parser;
///
/// let parsed = Parser::new().parse(r#"name=john greeting="hello there""#)?;
/// assert_eq!(parsed.get("name"), Some("john"));
/// assert_eq!(parsed.get("greeting"), Some("hello there"));
/// # Ok::<(), kv_parser::ParseError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parser {
    policy: KeyPolicy,
    config: ParserConfig,
}

impl Parser {
    /// Creates a permissive parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser bound to the given key policy
    pub fn with_policy(policy: KeyPolicy) -> Self {
        Self {
            policy,
            config: ParserConfig::default(),
        }
    }

    /// Sets the parser configuration
    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    pub fn policy(&self) -> &KeyPolicy {
        &self.policy
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses one line, failing on the first malformed or rejected pair
    pub fn parse(&self, input: &str) -> Result<Parsed, ParseError> {
        let mut scanner = Scanner::new(input);
        let mut parsed = Parsed::new();

        while let Some(token) = scanner.next_token()? {
            self.accept(&scanner, token, &mut parsed)?;
        }

        trace!(pairs = parsed.len(), "parsed line");
        Ok(parsed)
    }

    fn accept(
        &self,
        scanner: &Scanner<'_>,
        token: Token<'_>,
        parsed: &mut Parsed,
    ) -> Result<(), ParseError> {
        let position = scanner.clamp(token.end);

        let Some(key) = self.policy.validate(token.key) else {
            debug!(key = token.key, position, "rejected key");
            return Err(ParseError::InvalidKey {
                invalid_key: token.key.to_string(),
                position,
            });
        };

        if self.config.duplicate_key_behavior == DuplicateKeyBehavior::Error
            && parsed.contains_key(key)
        {
            debug!(key, position, "duplicate key");
            return Err(ParseError::DuplicateKey {
                key: key.to_string(),
                position,
            });
        }

        trace!(key, value = token.value, format = ?token.format, "accepted pair");
        parsed.insert(key, token.value);
        Ok(())
    }
}

/// A [`Parser`] that only accepts allow-listed keys
///
/// Matching is case-sensitive unless built with
/// [`StrictParser::with_case_sensitivity`]. Accepted keys keep the casing
/// they had in the input.
///
/// ```rust
/// use kv_parser::{ParseError, StrictParser};
///
/// let parser = StrictParser::with_case_sensitivity(["name"], false);
/// assert_eq!(parser.parse("NAME=jayanth")?.get("NAME"), Some("jayanth"));
///
/// let err = StrictParser::new(["name"]).parse("age=23").unwrap_err();
/// assert_eq!(err.invalid_key(), Some("age"));
/// assert_eq!(err.position(), 5);
/// # Ok::<(), ParseError>(())
/// ```
#[derive(Debug, Clone)]
pub struct StrictParser {
    parser: Parser,
}

impl StrictParser {
    /// Case-sensitive parser accepting only `allowed_keys`
    pub fn new<I, S>(allowed_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_case_sensitivity(allowed_keys, true)
    }

    pub fn with_case_sensitivity<I, S>(allowed_keys: I, case_sensitive: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_keys(StrictKeys::new(allowed_keys, case_sensitive))
    }

    pub fn from_keys(keys: StrictKeys) -> Self {
        Self {
            parser: Parser::with_policy(KeyPolicy::Strict(keys)),
        }
    }

    /// Sets the configuration of the wrapped parser
    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.parser = self.parser.with_config(config);
        self
    }

    pub fn parse(&self, input: &str) -> Result<Parsed, ParseError> {
        self.parser.parse(input)
    }

    /// The allow-list this parser was built with
    pub fn allowed_keys(&self) -> &[String] {
        match self.parser.policy() {
            KeyPolicy::Strict(keys) => keys.allowed(),
            KeyPolicy::Permissive => &[],
        }
    }

    pub fn is_case_sensitive(&self) -> bool {
        match self.parser.policy() {
            KeyPolicy::Strict(keys) => keys.is_case_sensitive(),
            KeyPolicy::Permissive => true,
        }
    }

    /// Borrows the wrapped parser
    pub fn as_parser(&self) -> &Parser {
        &self.parser
    }
}

impl Default for StrictParser {
    /// Empty allow-list: every key is rejected
    fn default() -> Self {
        Self::from_keys(StrictKeys::default())
    }
}

impl From<StrictParser> for Parser {
    fn from(strict: StrictParser) -> Self {
        strict.parser
    }
}
