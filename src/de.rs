//! VDF deserialization.
//!
//! This module provides the [`Deserializer`] that decodes VDF (KeyValues)
//! text from any [`std::io::Read`] straight into Rust data structures.
//!
//! ## Overview
//!
//! - **Streaming**: input is consumed in fixed-size chunks; keys and values
//!   may span any number of chunks
//! - **No parse tree**: tokens are bound to the destination as soon as they
//!   complete, nested objects are decoded in place
//! - **Unknown keys**: skipped without being materialised
//!
//! ## Usage
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_vdf::Deserializer;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Meta {
//!     #[serde(rename = "Tag")]
//!     tag: String,
//! }
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Item {
//!     #[serde(rename = "Name")]
//!     name: String,
//!     #[serde(rename = "Count")]
//!     count: i32,
//!     #[serde(rename = "Meta")]
//!     meta: Meta,
//! }
//!
//! let input = r#"{"Name" "Widget" "Count" "42" "Meta" {"Tag" "x"}}"#;
//! let mut de = Deserializer::from_reader(input.as_bytes());
//! let item: Item = de.decode().unwrap();
//! de.end().unwrap();
//!
//! assert_eq!(item.name, "Widget");
//! assert_eq!(item.count, 42);
//! assert_eq!(item.meta.tag, "x");
//! ```
//!
//! ## Grammar
//!
//! ```text
//! object := '{' pair* '}'
//! pair   := key ws (value | object)
//! key    := '"' text '"'      (text must not be empty)
//! value  := '"' text '"'
//! ```
//!
//! Quoted text has no escape mechanism; a `"` always ends the token.

use crate::cursor::Cursor;
use crate::options::DecoderOptions;
use crate::{Error, Result};
use log::debug;
use serde::de::value::StringDeserializer;
use serde::de::{self, DeserializeOwned};
use std::io::Read;
use std::str::FromStr;

/// Grammar states of the decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    BeforeObject,
    EnterObject,
    BeforeKeyOrEnd,
    EnterKey,
    InKey,
    ExitKey,
    BeforeValue,
    EnterValue,
    InValue,
    ExitValue,
}

impl State {
    fn expecting(self) -> &'static str {
        match self {
            State::BeforeObject => "'{'",
            State::EnterObject | State::BeforeKeyOrEnd | State::ExitValue => "key or '}'",
            State::EnterKey | State::InKey => "closing quote of key",
            State::ExitKey | State::BeforeValue => "value or '{'",
            State::EnterValue | State::InValue => "closing quote of value",
        }
    }

    /// States in which a closing brace would be accepted.
    fn can_close(self) -> bool {
        matches!(
            self,
            State::EnterObject | State::BeforeKeyOrEnd | State::ExitValue
        )
    }
}

/// What the state machine hands back to the binding side.
#[derive(Clone, Debug, PartialEq)]
enum Event {
    Open,
    Key(String),
    Scalar(String),
    Close,
    Eof,
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// The VDF deserializer.
///
/// Wraps a byte source and decodes one top-level object per
/// [`Deserializer::decode`] call. Several concatenated objects can be read
/// from the same source by calling `decode` repeatedly.
///
/// After an error the deserializer is left mid-stream and should be dropped.
pub struct Deserializer<R> {
    cursor: Cursor<R>,
    options: DecoderOptions,
    machine: Machine,
    peeked: Option<Event>,
}

/// The grammar automaton together with the partial token and input position
/// it tracks.
struct Machine {
    state: State,
    prev_state: State,
    token: Vec<u8>,
    depth: usize,
    line: usize,
    col: usize,
}

impl<R: Read> Deserializer<R> {
    /// Creates a deserializer reading from `reader` with default options.
    pub fn from_reader(reader: R) -> Self {
        Self::with_options(reader, DecoderOptions::default())
    }

    /// Creates a deserializer reading from `reader`.
    pub fn with_options(reader: R, options: DecoderOptions) -> Self {
        Deserializer {
            cursor: Cursor::new(reader, options.chunk_size),
            options,
            machine: Machine::new(),
            peeked: None,
        }
    }

    /// Decodes the next top-level object from the source into a `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is malformed, a token cannot be converted
    /// to its destination type, or the source fails.
    pub fn decode<T>(&mut self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        T::deserialize(&mut *self)
    }

    /// Checks that nothing but whitespace remains in the source.
    ///
    /// # Errors
    ///
    /// Returns a syntax error if more input follows the last decoded object.
    pub fn end(&mut self) -> Result<()> {
        match self.next_event()? {
            Event::Eof => Ok(()),
            _ => Err(Error::syntax(
                self.machine.line,
                self.machine.col,
                "trailing input after top-level object",
                "",
            )),
        }
    }

    fn next_event(&mut self) -> Result<Event> {
        match self.peeked.take() {
            Some(event) => Ok(event),
            None => self.pump(),
        }
    }

    fn peek_event(&mut self) -> Result<&Event> {
        let event = match self.peeked.take() {
            Some(event) => event,
            None => self.pump()?,
        };
        let event: &Event = self.peeked.insert(event);
        Ok(event)
    }

    /// Runs the state machine until the next grammar event, pushing the unread
    /// rest of the current chunk back onto the cursor.
    fn pump(&mut self) -> Result<Event> {
        loop {
            let chunk = match self.cursor.read_chunk()? {
                Some(chunk) => chunk,
                None => return Ok(Event::Eof),
            };
            let machine = &mut self.machine;

            // Start of the token being collected within this chunk.
            let mut mark = 0;
            let mut stop = None;
            for (i, &b) in chunk.iter().enumerate() {
                let event = machine.step(b, chunk, i, mark)?;
                machine.track(b);

                if machine.state != machine.prev_state {
                    mark = i;
                    machine.prev_state = machine.state;
                }

                if let Some(event) = event {
                    stop = Some((chunk.len() - i - 1, event));
                    break;
                }
            }

            match stop {
                Some((unread, event)) => {
                    self.cursor.push_back(unread);
                    return Ok(event);
                }
                None if matches!(machine.state, State::InKey | State::InValue) => {
                    machine.token.extend_from_slice(&chunk[mark..]);
                }
                None => {}
            }
        }
    }

    fn mismatch(&self, expected: &str, found: &str) -> Error {
        Error::type_mismatch(self.machine.line, self.machine.col, expected, found)
    }

    fn eof_error(&self) -> Error {
        let m = &self.machine;
        Error::unexpected_eof(m.line, m.col, m.state.expecting())
    }

    fn out_of_place(&self, event: &Event) -> Error {
        let m = &self.machine;
        let msg = format!("unexpected {:?} while expecting {}", event, m.state.expecting());
        Error::syntax(m.line, m.col, &msg, "")
    }

    /// Handles end of input where a key or closing brace was expected.
    fn eof_in_object(&mut self) -> Result<()> {
        if self.options.lenient_eof && self.machine.state.can_close() {
            debug!("input ended with {} open object(s), closing", self.machine.depth);
            self.machine.close();
            Ok(())
        } else {
            Err(self.eof_error())
        }
    }

    fn expect_scalar(&mut self, expected: &str) -> Result<String> {
        match self.next_event()? {
            Event::Scalar(text) => Ok(text),
            Event::Open => Err(self.mismatch(expected, "object")),
            Event::Eof => Err(self.eof_error()),
            other => Err(self.out_of_place(&other)),
        }
    }

    fn parse_scalar<T: FromStr>(&mut self, expected: &str) -> Result<T> {
        let text = self.expect_scalar(expected)?;
        text.parse::<T>()
            .map_err(|_| self.mismatch(expected, &format!("{:?}", text)))
    }

    /// Consumes the next value without binding it anywhere.
    fn skip_value(&mut self) -> Result<()> {
        match self.next_event()? {
            Event::Scalar(_) => Ok(()),
            Event::Open => {
                debug!("discarding nested object at line {}", self.machine.line);
                self.skip_entries()
            }
            Event::Eof => Err(self.eof_error()),
            other => Err(self.out_of_place(&other)),
        }
    }

    /// Consumes the remaining pairs of an open object, including its closing brace.
    fn skip_entries(&mut self) -> Result<()> {
        loop {
            match self.next_event()? {
                Event::Key(_) => self.skip_value()?,
                Event::Close => return Ok(()),
                Event::Eof => return self.eof_in_object(),
                other => return Err(self.out_of_place(&other)),
            }
        }
    }
}

impl<'a> Deserializer<&'a [u8]> {
    /// Creates a deserializer over an in-memory buffer.
    pub fn from_slice(bytes: &'a [u8]) -> Self {
        Deserializer::from_reader(bytes)
    }
}

impl Machine {
    fn new() -> Self {
        Machine {
            state: State::BeforeObject,
            prev_state: State::BeforeObject,
            token: Vec::new(),
            depth: 0,
            line: 1,
            col: 1,
        }
    }

    /// Feeds byte `i` of `chunk` to the automaton. `mark` is where the token
    /// being collected starts within `chunk`.
    fn step(&mut self, b: u8, chunk: &[u8], i: usize, mark: usize) -> Result<Option<Event>> {
        let event = match self.state {
            State::BeforeObject => match b {
                b'{' => {
                    self.state = State::EnterObject;
                    self.depth += 1;
                    Some(Event::Open)
                }
                b if is_space(b) => None,
                _ => return Err(self.unexpected(b, "looking for beginning of object", chunk, i)),
            },
            State::EnterObject => match b {
                b'"' => {
                    self.state = State::EnterKey;
                    None
                }
                b'}' => Some(self.close()),
                b if is_space(b) => {
                    self.state = State::BeforeKeyOrEnd;
                    None
                }
                _ => return Err(self.unexpected(b, "after object start", chunk, i)),
            },
            State::BeforeKeyOrEnd => match b {
                b'}' => Some(self.close()),
                b'"' => {
                    self.state = State::EnterKey;
                    None
                }
                b if is_space(b) => None,
                _ => return Err(self.unexpected(b, "looking for beginning of key", chunk, i)),
            },
            State::EnterKey => match b {
                b'"' => return Err(Error::empty_key(self.line, self.col, &context(chunk, i))),
                _ => {
                    self.state = State::InKey;
                    None
                }
            },
            State::InKey => match b {
                b'"' => {
                    self.token.extend_from_slice(&chunk[mark..i]);
                    self.state = State::ExitKey;
                    Some(Event::Key(self.take_token(chunk, i)?))
                }
                _ => None,
            },
            State::ExitKey => match b {
                b if is_space(b) => {
                    self.state = State::BeforeValue;
                    None
                }
                _ => return Err(self.unexpected(b, "after key", chunk, i)),
            },
            State::BeforeValue => match b {
                b'{' => {
                    self.state = State::BeforeKeyOrEnd;
                    self.depth += 1;
                    Some(Event::Open)
                }
                b'"' => {
                    self.state = State::EnterValue;
                    None
                }
                b if is_space(b) => None,
                _ => return Err(self.unexpected(b, "looking for beginning of value", chunk, i)),
            },
            State::EnterValue => match b {
                b'"' => {
                    self.state = State::ExitValue;
                    Some(Event::Scalar(String::new()))
                }
                _ => {
                    self.state = State::InValue;
                    None
                }
            },
            State::InValue => match b {
                b'"' => {
                    self.token.extend_from_slice(&chunk[mark..i]);
                    self.state = State::ExitValue;
                    Some(Event::Scalar(self.take_token(chunk, i)?))
                }
                _ => None,
            },
            State::ExitValue => match b {
                b'}' => Some(self.close()),
                b if is_space(b) => {
                    self.state = State::BeforeKeyOrEnd;
                    None
                }
                _ => return Err(self.unexpected(b, "after value", chunk, i)),
            },
        };

        Ok(event)
    }

    fn close(&mut self) -> Event {
        self.depth = self.depth.saturating_sub(1);
        self.state = if self.depth == 0 {
            State::BeforeObject
        } else {
            State::BeforeKeyOrEnd
        };
        Event::Close
    }

    fn track(&mut self, b: u8) {
        if b == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
    }

    fn take_token(&mut self, chunk: &[u8], i: usize) -> Result<String> {
        String::from_utf8(std::mem::take(&mut self.token)).map_err(|_| {
            Error::syntax(
                self.line,
                self.col,
                "quoted token is not valid UTF-8",
                &context(chunk, i),
            )
        })
    }

    fn unexpected(&self, b: u8, looking_for: &str, chunk: &[u8], i: usize) -> Error {
        let msg = format!(
            "unexpected symbol '{}' {}",
            b.escape_ascii(),
            looking_for
        );
        Error::syntax(self.line, self.col, &msg, &context(chunk, i))
    }
}

/// Lossy text of the bytes surrounding `chunk[i]`.
fn context(chunk: &[u8], i: usize) -> String {
    const RADIUS: usize = 32;
    let start = i.saturating_sub(RADIUS);
    let end = chunk.len().min(i.saturating_add(RADIUS + 1));
    String::from_utf8_lossy(&chunk[start..end]).into_owned()
}

macro_rules! deserialize_parsed {
    ($($method:ident => $visit:ident($ty:ty),)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                visitor.$visit(self.parse_scalar::<$ty>(stringify!($ty))?)
            }
        )*
    };
}

impl<'de, R: Read> de::Deserializer<'de> for &mut Deserializer<R> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.next_event()? {
            Event::Scalar(text) => visitor.visit_string(text),
            Event::Open => visit_object(self, visitor),
            Event::Eof => Err(self.eof_error()),
            other => Err(self.out_of_place(&other)),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let text = self.expect_scalar("bool")?;
        match parse_bool(&text) {
            Some(b) => visitor.visit_bool(b),
            None => Err(self.mismatch("bool", &format!("{:?}", text))),
        }
    }

    deserialize_parsed! {
        deserialize_i8 => visit_i8(i8),
        deserialize_i16 => visit_i16(i16),
        deserialize_i32 => visit_i32(i32),
        deserialize_i64 => visit_i64(i64),
        deserialize_i128 => visit_i128(i128),
        deserialize_u8 => visit_u8(u8),
        deserialize_u16 => visit_u16(u16),
        deserialize_u32 => visit_u32(u32),
        deserialize_u64 => visit_u64(u64),
        deserialize_u128 => visit_u128(u128),
        deserialize_f32 => visit_f32(f32),
        deserialize_f64 => visit_f64(f64),
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let text = self.expect_scalar("char")?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(self.mismatch("single character", &format!("{:?}", text))),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(self.expect_scalar("string")?)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(self.expect_scalar("string")?)
    }

    fn deserialize_bytes<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type("byte arrays have no VDF representation"))
    }

    fn deserialize_byte_buf<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type("byte arrays have no VDF representation"))
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if matches!(self.peek_event()?, Event::Open | Event::Scalar(_)) {
            visitor.visit_some(self)
        } else {
            visitor.visit_none()
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let text = self.expect_scalar("empty value")?;
        if text.is_empty() {
            visitor.visit_unit()
        } else {
            Err(self.mismatch("empty value", &format!("{:?}", text)))
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type("sequences have no VDF representation"))
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.next_event()? {
            Event::Open => visit_object(self, visitor),
            Event::Scalar(text) => Err(self.mismatch("object", &format!("{:?}", text))),
            Event::Eof => Err(self.eof_error()),
            other => Err(self.out_of_place(&other)),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.next_event()? {
            Event::Scalar(text) => visitor.visit_enum(StringDeserializer::<Error>::new(text)),
            Event::Open => {
                let variant = match self.next_event()? {
                    Event::Key(key) => key,
                    Event::Close => return Err(self.mismatch("enum variant", "empty object")),
                    Event::Eof => return Err(self.eof_error()),
                    other => return Err(self.out_of_place(&other)),
                };

                let value = visitor.visit_enum(EnumAccess {
                    de: &mut *self,
                    variant,
                })?;

                match self.next_event()? {
                    Event::Close => Ok(value),
                    Event::Eof => self.eof_in_object().map(|()| value),
                    Event::Key(key) => Err(self.mismatch(
                        "single-key object for enum",
                        &format!("additional key {:?}", key),
                    )),
                    other => Err(self.out_of_place(&other)),
                }
            }
            Event::Eof => Err(self.eof_error()),
            other => Err(self.out_of_place(&other)),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.skip_value()?;
        visitor.visit_unit()
    }
}

/// Hands an object whose opening brace was just consumed to `visitor`, then
/// drains whatever pairs the visitor left unread.
fn visit_object<'de, R, V>(de: &mut Deserializer<R>, visitor: V) -> Result<V::Value>
where
    R: Read,
    V: de::Visitor<'de>,
{
    let mut access = ObjectAccess { de, done: false };
    let value = visitor.visit_map(&mut access)?;
    access.finish()?;
    Ok(value)
}

struct ObjectAccess<'a, R> {
    de: &'a mut Deserializer<R>,
    done: bool,
}

impl<R: Read> ObjectAccess<'_, R> {
    fn finish(self) -> Result<()> {
        if self.done {
            Ok(())
        } else {
            self.de.skip_entries()
        }
    }
}

impl<'de, R: Read> de::MapAccess<'de> for ObjectAccess<'_, R> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        if self.done {
            return Ok(None);
        }

        match self.de.next_event()? {
            Event::Key(key) => seed.deserialize(StringDeserializer::<Error>::new(key)).map(Some),
            Event::Close => {
                self.done = true;
                Ok(None)
            }
            Event::Eof => {
                self.de.eof_in_object()?;
                self.done = true;
                Ok(None)
            }
            other => Err(self.de.out_of_place(&other)),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        seed.deserialize(&mut *self.de)
    }
}

struct EnumAccess<'a, R> {
    de: &'a mut Deserializer<R>,
    variant: String,
}

impl<'de, 'a, R: Read> de::EnumAccess<'de> for EnumAccess<'a, R> {
    type Error = Error;
    type Variant = VariantAccess<'a, R>;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let EnumAccess { de, variant } = self;
        let value = seed.deserialize(StringDeserializer::<Error>::new(variant))?;
        Ok((value, VariantAccess { de }))
    }
}

struct VariantAccess<'a, R> {
    de: &'a mut Deserializer<R>,
}

impl<'de, R: Read> de::VariantAccess<'de> for VariantAccess<'_, R> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        de::Deserializer::deserialize_unit(self.de, de::IgnoredAny).map(|_| ())
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(self.de)
    }

    fn tuple_variant<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type("tuple variants have no VDF representation"))
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_map(self.de, visitor)
    }
}
