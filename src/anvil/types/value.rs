//! The decoded value tree.
//!
//! Every record payload decodes to a [`Value::Compound`] root. Compounds keep
//! their tags in stream order so sibling order survives a decode.

use std::fmt;

use indexmap::IndexMap;

use super::models::TagKind;

/// A named, insertion-ordered mapping of tags.
pub type Compound = IndexMap<String, Value>;

/// One decoded tag payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(List),
    Compound(Compound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

/// A homogeneous list: every element has the same [`TagKind`].
///
/// An empty list may carry `TagKind::End` as its element kind.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    element_kind: TagKind,
    elements: Vec<Value>,
}

impl List {
    /// Builds a list from elements that all share `element_kind`.
    ///
    /// Only the decoder constructs lists, and it guarantees homogeneity.
    pub(crate) fn new(element_kind: TagKind, elements: Vec<Value>) -> Self {
        debug_assert!(elements.iter().all(|e| e.kind() == element_kind));
        Self {
            element_kind,
            elements,
        }
    }

    pub fn element_kind(&self) -> TagKind {
        self.element_kind
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.elements.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.elements.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.elements
    }

    /// Iterates the elements of a compound list; yields nothing for other kinds.
    pub fn compounds(&self) -> impl Iterator<Item = &Compound> {
        self.elements.iter().filter_map(Value::as_compound)
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl Value {
    /// The tag kind this value was decoded from.
    pub fn kind(&self) -> TagKind {
        match self {
            Value::Byte(_) => TagKind::Byte,
            Value::Short(_) => TagKind::Short,
            Value::Int(_) => TagKind::Int,
            Value::Long(_) => TagKind::Long,
            Value::Float(_) => TagKind::Float,
            Value::Double(_) => TagKind::Double,
            Value::ByteArray(_) => TagKind::ByteArray,
            Value::String(_) => TagKind::String,
            Value::List(_) => TagKind::List,
            Value::Compound(_) => TagKind::Compound,
            Value::IntArray(_) => TagKind::IntArray,
            Value::LongArray(_) => TagKind::LongArray,
        }
    }

    pub fn as_byte(&self) -> Option<i8> {
        match self {
            Value::Byte(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_short(&self) -> Option<i16> {
        match self {
            Value::Short(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_byte_array(&self) -> Option<&[i8]> {
        match self {
            Value::ByteArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int_array(&self) -> Option<&[i32]> {
        match self {
            Value::IntArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_long_array(&self) -> Option<&[i64]> {
        match self {
            Value::LongArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Value::Compound(c) => Some(c),
            _ => None,
        }
    }

    /// Looks up a direct child by name when this value is a compound.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.as_compound()?.get(name)
    }

    /// Follows a chain of compound names, e.g. `["Level", "xPos"]`.
    pub fn path<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Option<&Value> {
        names.into_iter().try_fold(self, |value, name| value.get(name))
    }
}

// Stringified tag notation, compact form.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Byte(v) => write!(f, "{}b", v),
            Value::Short(v) => write!(f, "{}s", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}L", v),
            Value::Float(v) => write!(f, "{:?}f", v),
            Value::Double(v) => write!(f, "{:?}d", v),
            Value::ByteArray(v) => write_array(f, "B", v.iter().map(|b| format!("{}b", b))),
            Value::String(s) => write_quoted(f, s),
            Value::List(list) => {
                f.write_str("[")?;
                for (i, element) in list.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", element)?;
                }
                f.write_str("]")
            }
            Value::Compound(compound) => {
                f.write_str("{")?;
                for (i, (name, value)) in compound.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    if is_bare_name(name) {
                        f.write_str(name)?;
                    } else {
                        write_quoted(f, name)?;
                    }
                    write!(f, ":{}", value)?;
                }
                f.write_str("}")
            }
            Value::IntArray(v) => write_array(f, "I", v.iter().map(|i| i.to_string())),
            Value::LongArray(v) => write_array(f, "L", v.iter().map(|l| format!("{}L", l))),
        }
    }
}

fn write_array(
    f: &mut fmt::Formatter,
    prefix: &str,
    items: impl Iterator<Item = String>,
) -> fmt::Result {
    write!(f, "[{};", prefix)?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        f.write_str(&item)?;
    }
    f.write_str("]")
}

fn write_quoted(f: &mut fmt::Formatter, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            _ => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}

fn is_bare_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+'))
}
