//! # KV Parser
//!
//! A parser for single-line `key=value` assignments with byte-accurate error
//! positions, optional key allow-lists, and serde integration.
//!
//! ## Overview
//!
//! Input is a run of whitespace-separated assignments:
//!
//! ```text
//! name=john  age = 23 greeting="hello there"
//! ```
//!
//! - Keys are ASCII letters, digits and underscores (`first_name`, `0abc`, `_`)
//! - Spaces are allowed around keys, `=` and values
//! - Values are either a bare run of non-space characters or a double-quoted
//!   string that may contain spaces
//!
//! ## Basic Usage
//!
//! ```rust
//! use kv_parser::Parser;
//!
//! let parsed = Parser::new().parse(r#"key="va lue" other=value"#)?;
//! assert_eq!(parsed.len(), 2);
//! assert_eq!(&parsed["key"], "va lue");
//! # Ok::<(), kv_parser::ParseError>(())
//! ```
//!
//! ## Restricting Keys
//!
//! ```rust
//! use kv_parser::{ParseError, StrictParser};
//!
//! let parser = StrictParser::new(["name", "age"]);
//! match parser.parse("name=john color=blue age=23") {
//!     Err(ParseError::InvalidKey { invalid_key, position }) => {
//!         assert_eq!(invalid_key, "color");
//!         assert_eq!(position, 20);
//!     }
//!     other => panic!("unexpected result: {:?}", other),
//! }
//!
//! // Case-insensitive matching keeps the casing used in the input
//! let parser = StrictParser::with_case_sensitivity(["name"], false);
//! assert_eq!(parser.parse("NaMe=jayanth")?.get("NaMe"), Some("jayanth"));
//! # Ok::<(), ParseError>(())
//! ```
//!
//! ## Error Handling
//!
//! Parsing stops at the first problem. Every error carries the byte offset
//! of the character it refers to; running out of input reports the last
//! character rather than one past the end.
//!
//! ```rust
//! use kv_parser::{ParseError, Parser};
//!
//! let err = Parser::new().parse("key=\"value").unwrap_err();
//! assert_eq!(err, ParseError::MissingEndQuote { key: "key".into(), position: 9 });
//!
//! let rendered = err.with_source_context("key=\"value").format_error();
//! assert!(rendered.contains('^'));
//! ```
//!
//! ## Serde Integration
//!
//! ```rust
//! use serde::Deserialize;
//! use kv_parser::from_str;
//!
//! #[derive(Debug, Deserialize)]
//! struct ServerConfig {
//!     name: String,
//!     port: u16,
//!     debug: Option<bool>,
//! }
//!
//! let config: ServerConfig = from_str(r#"name="my server" port=8080"#)?;
//! assert_eq!(config.port, 8080);
//! assert_eq!(config.debug, None);
//! # Ok::<(), kv_parser::KvError>(())
//! ```

pub mod deserializer;
pub mod error;
pub mod parsed;
pub mod parser;
pub mod scanner;
pub mod validation;


// Re-export main types and functions
pub use deserializer::{ParsedDeserializer, from_parsed, from_str, from_str_with_parser};
pub use error::{ErrorContext, KvError, ParseError, SerdeError};
pub use parsed::Parsed;
pub use parser::{DuplicateKeyBehavior, Parser, ParserConfig, StrictParser};
pub use scanner::{Scanner, Token, ValueFormat};
pub use validation::{KeyPolicy, StrictKeys, eq_ignore_case};
