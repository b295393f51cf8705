//! Name-based references
//!
//! A document never stores a handle. Reference fields carry the target's
//! name, and the name is looked up again in whatever host the document is
//! imported into. A name that matches nothing (target renamed or deleted)
//! resolves to an empty reference; it is never an error.

use crate::value::{Target, TargetKind};
use serde_json::Value;
use wiggle_core::TargetTable;

/// A reference as stored in a document: target kind plus name, or empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub kind: TargetKind,
    name: Option<String>,
}

impl Reference {
    /// Create a reference; an empty name means no target
    pub fn new(kind: TargetKind, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            kind,
            name: (!name.is_empty()).then_some(name),
        }
    }

    /// Empty reference of the given kind
    pub fn absent(kind: TargetKind) -> Self {
        Self { kind, name: None }
    }

    /// Target name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_absent(&self) -> bool {
        self.name.is_none()
    }

    /// Document encoding: the name, or `""` when empty
    pub fn to_json(&self) -> Value {
        Value::String(self.name.clone().unwrap_or_default())
    }

    /// Parse a document value; `None` if it is not a string or null
    pub fn from_json(kind: TargetKind, value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::absent(kind)),
            Value::String(name) => Some(Self::new(kind, name.as_str())),
            _ => None,
        }
    }
}

/// Converts between live targets and their stable names
///
/// Implementations must never fail: a dead handle encodes as empty and an
/// unknown name decodes as empty.
pub trait ReferenceResolver {
    /// Name of a live target, or an empty reference
    fn encode(&self, target: &Target) -> Reference;

    /// Live target currently carrying the reference's name, or an empty target
    fn decode(&self, reference: &Reference) -> Target;
}

/// [`ReferenceResolver`] backed by a host's name tables
pub struct HostResolver<'a, T: TargetTable + ?Sized> {
    table: &'a T,
}

impl<'a, T: TargetTable + ?Sized> HostResolver<'a, T> {
    pub fn new(table: &'a T) -> Self {
        Self { table }
    }
}

impl<T: TargetTable + ?Sized> ReferenceResolver for HostResolver<'_, T> {
    fn encode(&self, target: &Target) -> Reference {
        let name = match *target {
            Target::Object(Some(handle)) => self.table.object_name(handle),
            Target::Collection(Some(handle)) => self.table.collection_name(handle),
            Target::Object(None) | Target::Collection(None) => None,
        };
        match name {
            Some(name) => Reference::new(target.kind(), name),
            None => Reference::absent(target.kind()),
        }
    }

    fn decode(&self, reference: &Reference) -> Target {
        let Some(name) = reference.name() else {
            return Target::absent(reference.kind);
        };
        match reference.kind {
            TargetKind::Object => Target::Object(self.table.find_object(name)),
            TargetKind::Collection => Target::Collection(self.table.find_collection(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiggle_core::{Collection, Handle, SceneObject};

    /// Two fixed objects and one collection
    struct Table;

    impl TargetTable for Table {
        fn object_name(&self, handle: Handle<SceneObject>) -> Option<&str> {
            match handle.index() {
                0 => Some("Sphere"),
                1 => Some("Wind"),
                _ => None,
            }
        }

        fn find_object(&self, name: &str) -> Option<Handle<SceneObject>> {
            match name {
                "Sphere" => Some(Handle::new(0, 0)),
                "Wind" => Some(Handle::new(1, 0)),
                _ => None,
            }
        }

        fn collection_name(&self, handle: Handle<Collection>) -> Option<&str> {
            (handle.index() == 0).then_some("Colliders")
        }

        fn find_collection(&self, name: &str) -> Option<Handle<Collection>> {
            (name == "Colliders").then(|| Handle::new(0, 0))
        }
    }

    #[test]
    fn test_encode() {
        let resolver = HostResolver::new(&Table);

        let sphere = resolver.encode(&Target::Object(Some(Handle::new(0, 0))));
        assert_eq!(sphere.name(), Some("Sphere"));

        let dead = resolver.encode(&Target::Object(Some(Handle::new(7, 0))));
        assert!(dead.is_absent());
        assert_eq!(dead.kind, TargetKind::Object);

        let empty = resolver.encode(&Target::Collection(None));
        assert_eq!(empty, Reference::absent(TargetKind::Collection));
    }

    #[test]
    fn test_decode_missing_name_is_absent() {
        let resolver = HostResolver::new(&Table);

        let found = resolver.decode(&Reference::new(TargetKind::Collection, "Colliders"));
        assert_eq!(found, Target::Collection(Some(Handle::new(0, 0))));

        let missing = resolver.decode(&Reference::new(TargetKind::Object, "Deleted"));
        assert_eq!(missing, Target::Object(None));

        // Same name, wrong table
        let wrong_kind = resolver.decode(&Reference::new(TargetKind::Collection, "Sphere"));
        assert_eq!(wrong_kind, Target::Collection(None));
    }

    #[test]
    fn test_json_encoding() {
        assert_eq!(Reference::new(TargetKind::Object, "Sphere").to_json(), json!("Sphere"));
        assert_eq!(Reference::absent(TargetKind::Object).to_json(), json!(""));

        assert!(Reference::from_json(TargetKind::Object, &json!("")).unwrap().is_absent());
        assert!(Reference::from_json(TargetKind::Object, &json!(null)).unwrap().is_absent());
        assert_eq!(
            Reference::from_json(TargetKind::Object, &json!("Wind")).unwrap().name(),
            Some("Wind")
        );
        assert!(Reference::from_json(TargetKind::Object, &json!(3)).is_none());
    }
}
