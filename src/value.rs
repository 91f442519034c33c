//! Decoded Hessian values and class definitions.

use std::cell::RefCell;
use std::rc::Rc;

use smallvec::SmallVec;
use smol_str::SmolStr;

/// A class schema registered by a `C` record: a name plus the declared field
/// order. Immutable once built; its `ref_id` equals its index in the decode
/// session's class table.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassDef {
    pub ref_id: usize,
    pub name: SmolStr,
    pub fields: SmallVec<[SmolStr; 8]>,
}

impl ClassDef {
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field == name)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListValue {
    pub type_name: Option<SmolStr>,
    pub items: Vec<Value>,
}

impl ListValue {
    pub fn with_type(type_name: Option<SmolStr>) -> Self {
        Self {
            type_name,
            items: Vec::new(),
        }
    }
}

/// Entries keep insertion order; Hessian map keys may be arbitrary values,
/// so this is a pair list rather than a hashed map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapValue {
    pub type_name: Option<SmolStr>,
    pub entries: Vec<(Value, Value)>,
}

impl MapValue {
    pub fn with_type(type_name: Option<SmolStr>) -> Self {
        Self {
            type_name,
            entries: Vec::new(),
        }
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(entry_key, _)| entry_key == key)
            .map(|(_, value)| value)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectValue {
    pub class: Rc<ClassDef>,
    pub fields: Vec<Value>,
}

impl ObjectValue {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.class
            .field_index(name)
            .and_then(|index| self.fields.get(index))
    }
}

/// Composite values are shared handles so the object-reference table can
/// hand back the identical value for a back-reference, and so a composite
/// can be referenced while it is still being filled.
pub type ListRef = Rc<RefCell<ListValue>>;
pub type MapRef = Rc<RefCell<MapValue>>;
pub type ObjectRef = Rc<RefCell<ObjectValue>>;

/// A single decoded value. Composites compare by content, not identity;
/// comparing a self-referential graph will not terminate.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    /// Milliseconds since the Unix epoch; minute-resolution dates are
    /// widened on decode.
    Date(i64),
    String(String),
    Bytes(Vec<u8>),
    List(ListRef),
    Map(MapRef),
    Object(ObjectRef),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i as i64),
            Value::Long(l) => Some(*l),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Long(l) => Some(*l as f64),
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListRef> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapRef> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub(crate) fn new_list(type_name: Option<SmolStr>) -> (Value, ListRef) {
        let list = Rc::new(RefCell::new(ListValue::with_type(type_name)));
        (Value::List(Rc::clone(&list)), list)
    }

    pub(crate) fn new_map(type_name: Option<SmolStr>) -> (Value, MapRef) {
        let map = Rc::new(RefCell::new(MapValue::with_type(type_name)));
        (Value::Map(Rc::clone(&map)), map)
    }

    pub(crate) fn new_object(class: Rc<ClassDef>) -> (Value, ObjectRef) {
        let object = Rc::new(RefCell::new(ObjectValue {
            class,
            fields: Vec::new(),
        }));
        (Value::Object(Rc::clone(&object)), object)
    }

    /// Converts into a `serde_json::Value` for the serde bridge.
    ///
    /// Bytes become an array of numbers, dates become epoch-millisecond
    /// numbers, objects become JSON objects keyed by field name, and
    /// non-string map keys are stringified. Cyclic graphs cannot be
    /// converted.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::{Map, Number};

        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Long(l) => serde_json::Value::Number((*l).into()),
            Value::Double(d) => Number::from_f64(*d)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Date(millis) => serde_json::Value::Number((*millis).into()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Bytes(data) => serde_json::Value::Array(
                data.iter().map(|byte| (*byte).into()).collect(),
            ),
            Value::List(list) => serde_json::Value::Array(
                list.borrow().items.iter().map(Value::to_json).collect(),
            ),
            Value::Map(map) => {
                let mut object = Map::new();
                for (key, value) in &map.borrow().entries {
                    object.insert(key.to_json_key(), value.to_json());
                }
                serde_json::Value::Object(object)
            }
            Value::Object(instance) => {
                let instance = instance.borrow();
                let mut object = Map::new();
                for (name, value) in instance.class.fields.iter().zip(&instance.fields) {
                    object.insert(name.to_string(), value.to_json());
                }
                serde_json::Value::Object(object)
            }
        }
    }

    fn to_json_key(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Long(l) => l.to_string(),
            Value::Double(d) => d.to_string(),
            Value::Date(millis) => millis.to_string(),
            other => other.to_json().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[rstest::rstest]
    fn test_accessors() {
        assert!(Value::Null.is_null());
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(-16).as_i64(), Some(-16));
        assert_eq!(Value::Long(1 << 40).as_i64(), Some(1 << 40));
        assert_eq!(Value::Double(12.25).as_f64(), Some(12.25));
        assert_eq!(Value::String("hi".into()).as_str(), Some("hi"));
        assert_eq!(Value::Int(3).as_str(), None);
    }

    #[rstest::rstest]
    fn test_object_field_lookup() {
        let class = Rc::new(ClassDef {
            ref_id: 0,
            name: "sample".into(),
            fields: ["foo", "bar"].into_iter().map(SmolStr::new).collect(),
        });
        let object = ObjectValue {
            class,
            fields: vec![Value::Int(1), Value::Int(2)],
        };

        assert_eq!(object.get("bar"), Some(&Value::Int(2)));
        assert_eq!(object.get("baz"), None);
    }

    #[rstest::rstest]
    fn test_to_json_shapes() {
        let (list_value, list) = Value::new_list(None);
        list.borrow_mut().items.push(Value::Int(1));
        list.borrow_mut().items.push(Value::String("two".into()));

        let (map_value, map) = Value::new_map(None);
        map.borrow_mut()
            .entries
            .push((Value::Int(5), Value::Bool(true)));

        assert_eq!(list_value.to_json(), json!([1, "two"]));
        assert_eq!(map_value.to_json(), json!({"5": true}));
        assert_eq!(Value::Bytes(vec![0, 255]).to_json(), json!([0, 255]));
        assert_eq!(Value::Date(1234).to_json(), json!(1234));
    }
}
