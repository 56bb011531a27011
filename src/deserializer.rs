//! Serde deserializer over parsed key/value pairs
//!
//! A [`Parsed`] result is exposed to serde as a map of string keys. Values
//! are strings in the input, so scalar fields are read by parsing the text:
//! `port=8080` fills a `u16`, `debug=true` fills a `bool`.

use crate::error::{KvError, SerdeError};
use crate::parsed::Parsed;
use crate::parser::Parser;
use serde::de::value::BorrowedStrDeserializer;
use serde::de::{self, Deserialize, DeserializeOwned, DeserializeSeed, Visitor};

/// Deserializer that walks the pairs of a [`Parsed`] result
pub struct ParsedDeserializer<'de> {
    entries: indexmap::map::Iter<'de, String, String>,
    current: Option<(&'de str, &'de str)>,
}

impl<'de> ParsedDeserializer<'de> {
    pub fn new(parsed: &'de Parsed) -> Self {
        Self {
            entries: parsed.iter(),
            current: None,
        }
    }
}

impl<'de> de::Deserializer<'de> for ParsedDeserializer<'de> {
    type Error = SerdeError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(self)
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

impl<'de> de::MapAccess<'de> for ParsedDeserializer<'de> {
    type Error = SerdeError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: DeserializeSeed<'de>,
    {
        match self.entries.next() {
            Some((key, value)) => {
                self.current = Some((key.as_str(), value.as_str()));
                seed.deserialize(BorrowedStrDeserializer::<SerdeError>::new(key.as_str()))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        match self.current.take() {
            Some((key, value)) => seed.deserialize(ValueDeserializer::new(key, value)),
            None => Err(SerdeError::Custom(
                "No value available for map entry".to_string(),
            )),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// Deserializer for a single string value, parsing scalars on demand
struct ValueDeserializer<'de> {
    key: &'de str,
    value: &'de str,
}

impl<'de> ValueDeserializer<'de> {
    fn new(key: &'de str, value: &'de str) -> Self {
        Self { key, value }
    }

    fn invalid(&self, expected: &str) -> SerdeError {
        SerdeError::InvalidValue {
            key: self.key.to_string(),
            value: self.value.to_string(),
            expected: expected.to_string(),
        }
    }
}

macro_rules! deserialize_parsed {
    ($($method:ident => $visit:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value, Self::Error>
            where
                V: Visitor<'de>,
            {
                let parsed = self
                    .value
                    .parse::<$ty>()
                    .map_err(|_| self.invalid(stringify!($ty)))?;
                visitor.$visit(parsed)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for ValueDeserializer<'de> {
    type Error = SerdeError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_borrowed_str(self.value)
    }

    deserialize_parsed! {
        deserialize_bool => visit_bool: bool,
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u128: u128,
        deserialize_f32 => visit_f32: f32,
        deserialize_f64 => visit_f64: f64,
        deserialize_char => visit_char: char,
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        // A key that made it into the map always carries a value
        visitor.visit_some(self)
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        if self.value.is_empty() {
            visitor.visit_unit()
        } else {
            Err(self.invalid("an empty value"))
        }
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_enum(BorrowedStrDeserializer::<SerdeError>::new(self.value))
    }

    serde::forward_to_deserialize_any! {
        str string bytes byte_buf unit_struct seq tuple tuple_struct map
        struct identifier ignored_any
    }
}

/// Parses `input` permissively and deserializes the pairs into `T`
pub fn from_str<T>(input: &str) -> Result<T, KvError>
where
    T: DeserializeOwned,
{
    from_str_with_parser(input, &Parser::new())
}

/// Parses `input` with the given parser and deserializes the pairs into `T`
///
/// Pass a [`crate::StrictParser`] (via [`crate::StrictParser::as_parser`]) to
/// reject keys outside an allow-list before deserialization.
pub fn from_str_with_parser<T>(input: &str, parser: &Parser) -> Result<T, KvError>
where
    T: DeserializeOwned,
{
    let parsed = parser.parse(input)?;
    Ok(from_parsed(&parsed)?)
}

/// Deserializes an existing result; borrowed fields may point into `parsed`
pub fn from_parsed<'de, T>(parsed: &'de Parsed) -> Result<T, SerdeError>
where
    T: Deserialize<'de>,
{
    T::deserialize(ParsedDeserializer::new(parsed))
}
