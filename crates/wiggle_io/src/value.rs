//! Field kinds and live field values

use std::fmt;
use wiggle_core::{Collection, Handle, SceneObject};

/// Kind of host entity a reference field points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// A scene object (collider, wind source)
    Object,
    /// An object collection (collider group)
    Collection,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object => write!(f, "object"),
            Self::Collection => write!(f, "collection"),
        }
    }
}

/// A live, possibly empty, reference to a host entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Object(Option<Handle<SceneObject>>),
    Collection(Option<Handle<Collection>>),
}

impl Target {
    /// Empty reference of the given kind
    pub const fn absent(kind: TargetKind) -> Self {
        match kind {
            TargetKind::Object => Self::Object(None),
            TargetKind::Collection => Self::Collection(None),
        }
    }

    pub const fn kind(&self) -> TargetKind {
        match self {
            Self::Object(_) => TargetKind::Object,
            Self::Collection(_) => TargetKind::Collection,
        }
    }

    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Object(None) | Self::Collection(None))
    }
}

/// Value kind of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    /// Signed integer, stored as a JSON integer
    Int,
    /// Floating point, stored as a JSON number
    Float,
    /// One of a fixed set of option names, stored as a JSON string
    Choice(&'static [&'static str]),
    /// Named reference, stored as the target's name (`""` when empty)
    Reference(TargetKind),
}

impl FieldKind {
    /// Human-readable name of the expected document value
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Int => "integer",
            Self::Float => "number",
            Self::Choice(_) => "choice string",
            Self::Reference(TargetKind::Object) => "object name",
            Self::Reference(TargetKind::Collection) => "collection name",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Choice(options) => write!(f, "choice({})", options.join("|")),
            Self::Reference(kind) => write!(f, "reference({})", kind),
            other => f.write_str(other.describe()),
        }
    }
}

/// A field value as read from or written to a live settings record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Choice(&'static str),
    Target(Target),
}

impl FieldValue {
    /// Check that this value can be stored in a field of `kind`
    pub fn matches(&self, kind: FieldKind) -> bool {
        match (self, kind) {
            (Self::Bool(_), FieldKind::Bool)
            | (Self::Int(_), FieldKind::Int)
            | (Self::Float(_), FieldKind::Float) => true,
            (Self::Choice(c), FieldKind::Choice(options)) => options.contains(c),
            (Self::Target(t), FieldKind::Reference(k)) => t.kind() == k,
            _ => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Choice(c) => write!(f, "{}", c),
            Self::Target(t) if t.is_absent() => write!(f, "<none>"),
            Self::Target(t) => write!(f, "<{}>", t.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_matches_kind() {
        assert!(FieldValue::Bool(true).matches(FieldKind::Bool));
        assert!(!FieldValue::Int(1).matches(FieldKind::Float));
        assert!(FieldValue::Choice("Object").matches(FieldKind::Choice(&["Object", "Collection"])));
        assert!(!FieldValue::Choice("Sphere").matches(FieldKind::Choice(&["Object"])));
        assert!(FieldValue::Target(Target::absent(TargetKind::Collection))
            .matches(FieldKind::Reference(TargetKind::Collection)));
        assert!(!FieldValue::Target(Target::Object(None))
            .matches(FieldKind::Reference(TargetKind::Collection)));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(FieldKind::Choice(&["Object", "Collection"]).to_string(), "choice(Object|Collection)");
        assert_eq!(FieldKind::Reference(TargetKind::Object).to_string(), "reference(object)");
        assert_eq!(FieldKind::Float.to_string(), "number");
    }
}
