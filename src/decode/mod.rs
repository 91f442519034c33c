//! The tag-dispatch decode engine.

use std::cell::RefCell;
use std::io::Read;
use std::rc::Rc;

use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::constants::*;
use crate::reader::ValueReader;
use crate::resolve::{ContainerResolver, DefaultResolver};
use crate::value::{ClassDef, ListRef, MapRef, Value};
use crate::{Error, Result};

/// Decodes one Hessian 2 byte stream into [`Value`]s.
///
/// A `Deserializer` is bound to its byte source for its whole lifetime and
/// owns two append-only tables: the class-definition table (indexed by the
/// order definitions appear) and the object-reference table (composites, in
/// the order their decoding began). Composites are registered before their
/// children decode, so back-references into a still-filling value resolve to
/// the same shared handle and self-referential graphs decode correctly.
///
/// Not safe for concurrent use; both tables and the lookahead slot are plain
/// mutable state.
pub struct Deserializer<R: Read> {
    reader: ValueReader<R>,
    class_defs: Vec<Rc<ClassDef>>,
    refs: Vec<Value>,
    resolver: Box<dyn ContainerResolver>,
}

impl<R: Read> Deserializer<R> {
    pub fn new(inner: R) -> Self {
        Self::with_resolver(inner, Box::new(DefaultResolver::new()))
    }

    pub fn with_resolver(inner: R, resolver: Box<dyn ContainerResolver>) -> Self {
        Self {
            reader: ValueReader::new(inner),
            class_defs: Vec::new(),
            refs: Vec::new(),
            resolver,
        }
    }

    /// Bytes consumed from the source so far.
    pub fn position(&self) -> u64 {
        self.reader.position()
    }

    fn peek_tag(&mut self) -> Result<u8> {
        self.reader.peek()?.ok_or(Error::EndOfStream)
    }

    /// Decodes the next value in the stream.
    ///
    /// Class definitions and reserved tags are consumed as preludes: the
    /// engine registers/skips them and keeps going until an actual value is
    /// produced.
    pub fn read_value(&mut self) -> Result<Value> {
        loop {
            let tag = self.peek_tag()?;
            match tag {
                CLASS_DEF => {
                    self.read_class_definition()?;
                }
                RESERVED => {
                    self.reader.read_byte()?;
                }
                _ => return self.read_tagged_value(tag),
            }
        }
    }

    fn read_tagged_value(&mut self, tag: u8) -> Result<Value> {
        match tag {
            0x00..=COMPACT_STRING_MAX
            | MEDIUM_STRING_START..=MEDIUM_STRING_END
            | STRING_CHUNK
            | STRING_CHUNK_FINAL => self.read_string().map(Value::String),

            COMPACT_BINARY_START..=COMPACT_BINARY_END
            | MEDIUM_BINARY_START..=MEDIUM_BINARY_END
            | BINARY_CHUNK
            | BINARY_CHUNK_FINAL => self.read_bytes().map(Value::Bytes),

            INT_1_START..=INT_3_END | INT_32 => self.read_int().map(Value::Int),

            LONG_1_START..=0xFF | LONG_3_START..=LONG_3_END | LONG_32 | LONG_64 => {
                self.read_long().map(Value::Long)
            }

            DOUBLE_ZERO..=DOUBLE_F32 | DOUBLE_64 => self.read_double().map(Value::Double),

            DATE_MILLIS | DATE_MINUTES => self.read_date().map(Value::Date),

            TRUE | FALSE => self.read_bool().map(Value::Bool),

            NULL => {
                self.reader.read_byte()?;
                Ok(Value::Null)
            }

            REF => self.read_ref(),

            OBJECT | COMPACT_OBJECT_START..=COMPACT_OBJECT_END => self.read_object(),

            LIST_VARIABLE_TYPED..=LIST_FIXED
            | COMPACT_LIST_TYPED_START..=COMPACT_LIST_END => self.read_list(),

            MAP | MAP_TYPED => self.read_map(),

            // 0x45, 0x47, 0x50, and a terminator outside a variable-length
            // container have no successor decode.
            _ => Err(Error::UnsupportedTag(tag)),
        }
    }

    // ------------------------------------------------------------------
    // Strings

    /// Accepts compact, medium, and chunked string forms.
    pub fn read_string(&mut self) -> Result<String> {
        let tag = self.peek_tag()?;
        match tag {
            0x00..=COMPACT_STRING_MAX => {
                let length = self.reader.read_byte()?;
                self.read_string_with_length(length as usize)
            }
            MEDIUM_STRING_START..=MEDIUM_STRING_END => {
                let b0 = self.reader.read_byte()? as usize;
                let b1 = self.reader.read_byte()? as usize;
                self.read_string_with_length(((b0 - MEDIUM_STRING_START as usize) << 8) | b1)
            }
            STRING_CHUNK | STRING_CHUNK_FINAL => self.read_chunked_string(),
            other => Err(Error::unexpected_tag(other, "string")),
        }
    }

    fn read_string_with_length(&mut self, length: usize) -> Result<String> {
        let mut text = String::with_capacity(length);
        for _ in 0..length {
            text.push(self.reader.read_utf8_codepoint()?);
        }
        Ok(text)
    }

    fn read_chunked_string(&mut self) -> Result<String> {
        let mut text = String::new();
        loop {
            let tag = self.reader.read_byte()?;
            let is_final = match tag {
                STRING_CHUNK => false,
                STRING_CHUNK_FINAL => true,
                other => return Err(Error::unexpected_tag(other, "string chunk")),
            };
            let length = self.reader.read_short()? as usize;
            for _ in 0..length {
                text.push(self.reader.read_utf8_codepoint()?);
            }
            if is_final {
                return Ok(text);
            }
        }
    }

    // ------------------------------------------------------------------
    // Binary

    /// Accepts compact, medium, and chunked binary forms.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        let tag = self.peek_tag()?;
        match tag {
            COMPACT_BINARY_START..=COMPACT_BINARY_END => {
                let tag = self.reader.read_byte()?;
                self.read_bytes_with_length((tag - COMPACT_BINARY_START) as usize)
            }
            MEDIUM_BINARY_START..=MEDIUM_BINARY_END => {
                let b0 = self.reader.read_byte()? as usize;
                let b1 = self.reader.read_byte()? as usize;
                self.read_bytes_with_length(((b0 - MEDIUM_BINARY_START as usize) << 8) | b1)
            }
            BINARY_CHUNK | BINARY_CHUNK_FINAL => self.read_chunked_bytes(),
            other => Err(Error::unexpected_tag(other, "binary")),
        }
    }

    fn read_bytes_with_length(&mut self, length: usize) -> Result<Vec<u8>> {
        let mut data = vec![0u8; length];
        self.reader.read_exact(&mut data)?;
        Ok(data)
    }

    fn read_chunked_bytes(&mut self) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        loop {
            let tag = self.reader.read_byte()?;
            let is_final = match tag {
                BINARY_CHUNK => false,
                BINARY_CHUNK_FINAL => true,
                other => return Err(Error::unexpected_tag(other, "binary chunk")),
            };
            let length = self.reader.read_short()? as usize;
            let start = data.len();
            data.resize(start + length, 0);
            self.reader.read_exact(&mut data[start..])?;
            if is_final {
                return Ok(data);
            }
        }
    }

    // ------------------------------------------------------------------
    // Numbers

    pub fn read_int(&mut self) -> Result<i32> {
        let tag = self.peek_tag()?;
        match tag {
            INT_1_START..=INT_1_END => {
                let tag = self.reader.read_byte()?;
                Ok(tag as i32 - INT_1_BIAS)
            }
            INT_2_START..=INT_2_END => {
                let tag = self.reader.read_byte()?;
                let b1 = self.reader.read_byte()?;
                Ok(((tag as i32 - INT_2_BIAS) << 8) | b1 as i32)
            }
            INT_3_START..=INT_3_END => {
                let tag = self.reader.read_byte()?;
                let b1 = self.reader.read_byte()?;
                let b2 = self.reader.read_byte()?;
                Ok(((tag as i32 - INT_3_BIAS) << 16) | (b1 as i32) << 8 | b2 as i32)
            }
            INT_32 => {
                self.reader.read_byte()?;
                let mut buf = [0u8; 4];
                self.reader.read_exact(&mut buf)?;
                Ok(i32::from_be_bytes(buf))
            }
            other => Err(Error::unexpected_tag(other, "int")),
        }
    }

    pub fn read_long(&mut self) -> Result<i64> {
        let tag = self.peek_tag()?;
        match tag {
            LONG_1_START..=LONG_1_END => {
                let tag = self.reader.read_byte()?;
                Ok(tag as i64 - LONG_1_BIAS)
            }
            LONG_2_START..=0xFF => {
                let tag = self.reader.read_byte()?;
                let b1 = self.reader.read_byte()?;
                Ok(((tag as i64 - LONG_2_BIAS) << 8) | b1 as i64)
            }
            LONG_3_START..=LONG_3_END => {
                let tag = self.reader.read_byte()?;
                let b1 = self.reader.read_byte()?;
                let b2 = self.reader.read_byte()?;
                Ok(((tag as i64 - LONG_3_BIAS) << 16) | (b1 as i64) << 8 | b2 as i64)
            }
            LONG_32 => {
                self.reader.read_byte()?;
                let mut buf = [0u8; 4];
                self.reader.read_exact(&mut buf)?;
                Ok(i32::from_be_bytes(buf) as i64)
            }
            LONG_64 => {
                self.reader.read_byte()?;
                let mut buf = [0u8; 8];
                self.reader.read_exact(&mut buf)?;
                Ok(i64::from_be_bytes(buf))
            }
            other => Err(Error::unexpected_tag(other, "long")),
        }
    }

    pub fn read_double(&mut self) -> Result<f64> {
        let tag = self.peek_tag()?;
        match tag {
            DOUBLE_ZERO => {
                self.reader.read_byte()?;
                Ok(0.0)
            }
            DOUBLE_ONE => {
                self.reader.read_byte()?;
                Ok(1.0)
            }
            DOUBLE_I8 => {
                self.reader.read_byte()?;
                Ok(self.reader.read_byte()? as i8 as f64)
            }
            DOUBLE_I16 => {
                self.reader.read_byte()?;
                let mut buf = [0u8; 2];
                self.reader.read_exact(&mut buf)?;
                Ok(i16::from_be_bytes(buf) as f64)
            }
            DOUBLE_F32 => {
                self.reader.read_byte()?;
                let mut buf = [0u8; 4];
                self.reader.read_exact(&mut buf)?;
                Ok(f32::from_be_bytes(buf) as f64)
            }
            DOUBLE_64 => {
                self.reader.read_byte()?;
                let mut buf = [0u8; 8];
                self.reader.read_exact(&mut buf)?;
                Ok(f64::from_be_bytes(buf))
            }
            other => Err(Error::unexpected_tag(other, "double")),
        }
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        let tag = self.peek_tag()?;
        match tag {
            TRUE => {
                self.reader.read_byte()?;
                Ok(true)
            }
            FALSE => {
                self.reader.read_byte()?;
                Ok(false)
            }
            other => Err(Error::unexpected_tag(other, "boolean")),
        }
    }

    /// Milliseconds since the Unix epoch, for either date resolution.
    pub fn read_date(&mut self) -> Result<i64> {
        let tag = self.peek_tag()?;
        match tag {
            DATE_MILLIS => {
                self.reader.read_byte()?;
                let mut buf = [0u8; 8];
                self.reader.read_exact(&mut buf)?;
                Ok(i64::from_be_bytes(buf))
            }
            DATE_MINUTES => {
                self.reader.read_byte()?;
                let mut buf = [0u8; 4];
                self.reader.read_exact(&mut buf)?;
                Ok(i32::from_be_bytes(buf) as i64 * 60_000)
            }
            other => Err(Error::unexpected_tag(other, "date")),
        }
    }

    // ------------------------------------------------------------------
    // Class definitions and object instances

    /// Consumes a `C` record, registers it, and returns the new definition.
    /// `ref_id`s are assigned in strictly increasing order from 0.
    pub fn read_class_definition(&mut self) -> Result<Rc<ClassDef>> {
        let tag = self.peek_tag()?;
        if tag != CLASS_DEF {
            return Err(Error::unexpected_tag(tag, "class definition"));
        }
        self.reader.read_byte()?;

        let name = SmolStr::new(self.read_string()?);
        let ref_id = self.class_defs.len();
        let field_count = self.read_length("class field count")?;
        let mut fields = SmallVec::with_capacity(field_count);
        for _ in 0..field_count {
            fields.push(SmolStr::new(self.read_string()?));
        }

        let def = Rc::new(ClassDef {
            ref_id,
            name,
            fields,
        });
        self.class_defs.push(Rc::clone(&def));
        Ok(def)
    }

    fn read_object(&mut self) -> Result<Value> {
        let tag = self.reader.read_byte()?;
        let index = match tag {
            OBJECT => self.read_int()?,
            COMPACT_OBJECT_START..=COMPACT_OBJECT_END => (tag - COMPACT_OBJECT_START) as i32,
            other => return Err(Error::unexpected_tag(other, "object")),
        };

        let class = self.class_def(index)?;
        let field_count = class.fields.len();
        let (value, object) = Value::new_object(class);
        self.refs.push(value.clone());
        for _ in 0..field_count {
            let field = self.read_value()?;
            object.borrow_mut().fields.push(field);
        }
        Ok(value)
    }

    fn class_def(&self, index: i32) -> Result<Rc<ClassDef>> {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.class_defs.get(index))
            .cloned()
            .ok_or(Error::InvalidClassRef {
                index,
                len: self.class_defs.len(),
            })
    }

    // ------------------------------------------------------------------
    // Lists and maps

    fn read_list(&mut self) -> Result<Value> {
        let tag = self.reader.read_byte()?;
        match tag {
            LIST_VARIABLE_TYPED => {
                let type_name = self.read_type()?;
                self.read_variable_list(Some(type_name))
            }
            LIST_VARIABLE => self.read_variable_list(None),
            LIST_FIXED_TYPED => {
                let type_name = self.read_type()?;
                let length = self.read_length("list length")?;
                self.read_fixed_list(Some(type_name), length)
            }
            LIST_FIXED => {
                let length = self.read_length("list length")?;
                self.read_fixed_list(None, length)
            }
            COMPACT_LIST_TYPED_START..=COMPACT_LIST_TYPED_END => {
                let type_name = self.read_type()?;
                self.read_fixed_list(Some(type_name), (tag - COMPACT_LIST_TYPED_START) as usize)
            }
            COMPACT_LIST_START..=COMPACT_LIST_END => {
                self.read_fixed_list(None, (tag - COMPACT_LIST_START) as usize)
            }
            other => Err(Error::unexpected_tag(other, "list")),
        }
    }

    fn read_variable_list(&mut self, type_name: Option<SmolStr>) -> Result<Value> {
        let (value, list) = self.alloc_list(type_name);
        self.refs.push(value.clone());
        while self.peek_tag()? != TERMINATOR {
            let item = self.read_value()?;
            list.borrow_mut().items.push(item);
        }
        self.reader.read_byte()?;
        Ok(value)
    }

    fn read_fixed_list(&mut self, type_name: Option<SmolStr>, length: usize) -> Result<Value> {
        let (value, list) = self.alloc_list(type_name);
        self.refs.push(value.clone());
        for _ in 0..length {
            let item = self.read_value()?;
            list.borrow_mut().items.push(item);
        }
        Ok(value)
    }

    fn read_map(&mut self) -> Result<Value> {
        let tag = self.reader.read_byte()?;
        let type_name = match tag {
            MAP_TYPED => Some(self.read_type()?),
            MAP => None,
            other => return Err(Error::unexpected_tag(other, "map")),
        };

        let (value, map) = self.alloc_map(type_name);
        self.refs.push(value.clone());
        while self.peek_tag()? != TERMINATOR {
            let key = self.read_value()?;
            let entry = self.read_value()?;
            map.borrow_mut().entries.push((key, entry));
        }
        self.reader.read_byte()?;
        Ok(value)
    }

    fn read_type(&mut self) -> Result<SmolStr> {
        Ok(SmolStr::new(self.read_string()?))
    }

    fn alloc_list(&mut self, type_name: Option<SmolStr>) -> (Value, ListRef) {
        match type_name {
            None => Value::new_list(None),
            Some(name) => match self.resolver.resolve_list(&name) {
                Some(seed) => {
                    let list = Rc::new(RefCell::new(seed));
                    (Value::List(Rc::clone(&list)), list)
                }
                None => Value::new_list(Some(name)),
            },
        }
    }

    fn alloc_map(&mut self, type_name: Option<SmolStr>) -> (Value, MapRef) {
        match type_name {
            None => Value::new_map(None),
            Some(name) => match self.resolver.resolve_map(&name) {
                Some(seed) => {
                    let map = Rc::new(RefCell::new(seed));
                    (Value::Map(Rc::clone(&map)), map)
                }
                None => Value::new_map(Some(name)),
            },
        }
    }

    // ------------------------------------------------------------------
    // Back-references

    /// Resolves a `0x51` back-reference to the identical previously decoded
    /// composite.
    pub fn read_ref(&mut self) -> Result<Value> {
        let tag = self.peek_tag()?;
        if tag != REF {
            return Err(Error::unexpected_tag(tag, "ref"));
        }
        self.reader.read_byte()?;

        let index = self.read_int()?;
        usize::try_from(index)
            .ok()
            .and_then(|index| self.refs.get(index))
            .cloned()
            .ok_or(Error::InvalidReference {
                index,
                len: self.refs.len(),
            })
    }

    fn read_length(&mut self, what: &'static str) -> Result<usize> {
        let length = self.read_int()?;
        usize::try_from(length)
            .map_err(|_| Error::Malformed(format!("negative {what}: {length}")))
    }
}
