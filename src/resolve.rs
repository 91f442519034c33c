//! Mapping serialized type names to containers.

use std::collections::HashMap;

use smol_str::SmolStr;

use crate::value::{ListValue, MapValue};

/// Resolves a serialized list/map type name to a fresh, empty container.
///
/// Returning `None` marks the name as unrecognized; the decode engine then
/// falls back to a default untyped container (keeping the declared name on
/// the decoded value).
pub trait ContainerResolver {
    fn resolve_list(&self, type_name: &str) -> Option<ListValue>;
    fn resolve_map(&self, type_name: &str) -> Option<MapValue>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    List,
    Map,
}

/// Recognizes the CLR and Java collection names commonly seen on the wire.
pub struct DefaultResolver {
    known: HashMap<&'static str, Kind>,
}

impl DefaultResolver {
    pub fn new() -> Self {
        let mut known = HashMap::new();
        for name in [
            "System.Collections.List",
            "System.Collections.IList",
            "System.Collections.Generic.List`1",
            "System.Collections.Generic.IList`1",
            "System.Collections.ObjectModel.Collection`1",
            "java.util.List",
            "java.util.Vector",
            "java.util.ArrayList",
            "java.util.LinkedList",
        ] {
            known.insert(name, Kind::List);
        }
        for name in [
            "System.Collections.Hashtable",
            "System.Collections.IDictionary",
            "System.Collections.Generic.IDictionary`2",
            "System.Collections.Generic.Dictionary`2",
            "java.lang.Map",
            "java.util.HashMap",
            "java.util.EnumMap",
            "java.util.TreeMap",
            "java.util.concurrent.ConcurrentHashMap",
        ] {
            known.insert(name, Kind::Map);
        }
        Self { known }
    }
}

impl Default for DefaultResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerResolver for DefaultResolver {
    fn resolve_list(&self, type_name: &str) -> Option<ListValue> {
        match self.known.get(type_name) {
            Some(Kind::List) => Some(ListValue::with_type(Some(SmolStr::new(type_name)))),
            _ => None,
        }
    }

    fn resolve_map(&self, type_name: &str) -> Option<MapValue> {
        match self.known.get(type_name) {
            Some(Kind::Map) => Some(MapValue::with_type(Some(SmolStr::new(type_name)))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    #[case("java.util.ArrayList")]
    #[case("System.Collections.Generic.IList`1")]
    fn test_known_list_names_resolve(#[case] name: &str) {
        let resolver = DefaultResolver::new();
        let list = resolver.resolve_list(name).unwrap();
        assert_eq!(list.type_name.as_deref(), Some(name));
        assert!(list.items.is_empty());
    }

    #[rstest::rstest]
    fn test_unknown_names_are_unrecognized() {
        let resolver = DefaultResolver::new();
        assert!(resolver.resolve_list("com.example.Custom").is_none());
        assert!(resolver.resolve_map("com.example.Custom").is_none());
        // A map name is not a list name.
        assert!(resolver.resolve_list("java.util.HashMap").is_none());
    }
}
