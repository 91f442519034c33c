pub mod constants;
pub mod decode;
pub mod error;
pub mod peek;
pub mod reader;
pub mod resolve;
pub mod value;

use std::io::Read;

use serde::de::DeserializeOwned;

pub use crate::decode::Deserializer;
pub use crate::error::Error;
pub use crate::peek::PeekReader;
pub use crate::reader::ValueReader;
pub use crate::resolve::{ContainerResolver, DefaultResolver};
pub use crate::value::{ClassDef, ListValue, MapValue, ObjectValue, Value};

pub type Result<T> = std::result::Result<T, Error>;

/// Decodes the next value from a byte slice.
pub fn decode_to_value(input: &[u8]) -> Result<Value> {
    Deserializer::new(input).read_value()
}

/// Decodes the next value and deserializes it into `T` through the JSON
/// bridge (see [`Value::to_json`] for the mapping).
pub fn from_slice<T: DeserializeOwned>(input: &[u8]) -> Result<T> {
    from_reader(input)
}

pub fn from_reader<T: DeserializeOwned, R: Read>(reader: R) -> Result<T> {
    let value = Deserializer::new(reader).read_value()?;
    serde_json::from_value(value.to_json()).map_err(|err| Error::Deserialize(err.to_string()))
}

/// Converts a decoded value into a `serde_json::Value`.
pub fn value_to_json(value: &Value) -> serde_json::Value {
    value.to_json()
}
