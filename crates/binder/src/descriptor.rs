//! Static description of bindable structures
//!
//! A structure opts into binding by implementing [`EnvBind`]. Its `describe`
//! function registers every field, in declaration order, together with a typed
//! accessor; the semantic kind of the field follows from the accessor's type
//! and the annotations are attached with builder methods or a tag string:
//!
//! ```
//! use binder::{EnvBind, Fields};
//!
//! #[derive(Default)]
//! struct Email {
//!     host: String,
//!     port: u16,
//!     options: Vec<String>,
//! }
//!
//! impl EnvBind for Email {
//!     fn describe(fields: &mut Fields<Self>) {
//!         fields.scalar("Host", |e| &mut e.host);
//!         fields.scalar("Port", |e| &mut e.port).default("587");
//!         fields.list("Options", |e| &mut e.options).tags(r#"env:"OPTIONS" env_delim:";""#);
//!     }
//! }
//! ```

use crate::bind::Binder;
use std::collections::HashMap;
use std::time::Duration;
use types::{Complex128, Complex64, PrimitiveKind, Result, Value};

/// Default delimiter for list and map fields
pub const DEFAULT_DELIMITER: &str = ",";

/// Marker ending a wildcard key-spec
pub const WILDCARD: char = '*';

/// Keyword of the `env` annotation that skips a field
pub const IGNORE_KEYWORD: &str = "ignore";

pub const TAG_ENV: &str = "env";
pub const TAG_DEFAULT: &str = "env_def";
pub const TAG_DELIMITER: &str = "env_delim";
pub const TAG_PREFIX: &str = "env_prefix";
pub const TAG_KEYS: &str = "env_keys";

/// A structure that can be populated from an environment map
pub trait EnvBind: Default + 'static {
    /// Register the fields of the structure in declaration order
    fn describe(fields: &mut Fields<Self>);
}

/// Scalar types a field, list element or map value can hold
pub trait Primitive: Sized + 'static {
    const KIND: PrimitiveKind;

    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! impl_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Primitive for $ty {
                const KIND: PrimitiveKind = PrimitiveKind::$variant;

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_primitive! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    Complex64 => Complex64,
    Complex128 => Complex128,
    String => String,
    Duration => Duration,
}

/// Semantic type of a registered field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Scalar(PrimitiveKind),
    List(PrimitiveKind),
    Map(PrimitiveKind),
    /// Scalar that may stay unset
    Optional(PrimitiveKind),
    Nested,
    /// Substructure held behind an `Option`
    OptionalNested,
    /// A type with no binding rule, such as a channel or a callback
    Opaque(&'static str),
}

/// Field metadata the binder works from
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    /// Explicit variable name (`env`)
    pub env: Option<String>,
    /// Default literal (`env_def`)
    pub default: Option<String>,
    /// Prefix for this field and its children (`env_prefix`)
    pub prefix: Option<String>,
    /// List/map delimiter (`env_delim`)
    pub delimiter: Option<String>,
    /// Map key-spec (`env_keys`)
    pub keys: Option<String>,
    pub ignore: bool,
}

impl FieldDescriptor {
    fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            env: None,
            default: None,
            prefix: None,
            delimiter: None,
            keys: None,
            ignore: false,
        }
    }

    pub fn delimiter(&self) -> &str {
        self.delimiter.as_deref().unwrap_or(DEFAULT_DELIMITER)
    }
}

/// A value produced by the binder for one field
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    Scalar(Value),
    List(Vec<Value>),
    Map(HashMap<String, Value>),
    /// Optional field with neither a value nor a default
    Absent,
}

/// The bound value did not fit the registered accessor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Mismatch {
    pub expected: PrimitiveKind,
    /// Kind of the offending element, `None` when the shape itself differs
    pub found: Option<PrimitiveKind>,
}

impl Mismatch {
    fn shape<V: Primitive>() -> Self {
        Self {
            expected: V::KIND,
            found: None,
        }
    }
}

impl std::fmt::Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.found {
            Some(found) => write!(f, "bound {} value does not fit a {} field", found, self.expected),
            None => write!(f, "bound value does not have the shape of a {} field", self.expected),
        }
    }
}

fn extract<V: Primitive>(value: Value) -> std::result::Result<V, Mismatch> {
    let found = value.kind();
    V::from_value(value).ok_or(Mismatch {
        expected: V::KIND,
        found: Some(found),
    })
}

type Assign<T> = Box<dyn Fn(&mut T, Bound) -> std::result::Result<(), Mismatch>>;
type BindNested<T> = Box<dyn Fn(&mut T, &Binder<'_>, &str) -> Result<()>>;

pub(crate) enum Slot<T> {
    Leaf(Assign<T>),
    Nested(BindNested<T>),
    Opaque,
}

/// One registered field: its descriptor and how to store a bound value
pub struct Field<T> {
    descriptor: FieldDescriptor,
    slot: Slot<T>,
    /// Malformed annotation, reported when the field is bound
    problem: Option<String>,
}

impl<T> Field<T> {
    fn new(name: &str, kind: FieldKind, slot: Slot<T>) -> Self {
        Self {
            descriptor: FieldDescriptor::new(name, kind),
            slot,
            problem: None,
        }
    }

    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    pub(crate) fn slot(&self) -> &Slot<T> {
        &self.slot
    }

    pub(crate) fn problem(&self) -> Option<&str> {
        self.problem.as_deref()
    }

    /// Explicit variable name; the keyword `ignore` skips the field
    pub fn env(&mut self, name: &str) -> &mut Self {
        let mut explicit = None;
        for part in name.split(',').map(str::trim) {
            if part == IGNORE_KEYWORD {
                self.descriptor.ignore = true;
            } else if explicit.is_none() && !part.is_empty() {
                explicit = Some(part.to_string());
            }
        }
        self.descriptor.env = explicit;
        self
    }

    pub fn default(&mut self, literal: &str) -> &mut Self {
        self.descriptor.default = Some(literal.to_string());
        self
    }

    pub fn delimiter(&mut self, delimiter: &str) -> &mut Self {
        self.descriptor.delimiter = Some(delimiter.to_string());
        self
    }

    pub fn prefix(&mut self, prefix: &str) -> &mut Self {
        self.descriptor.prefix = Some(prefix.to_string());
        self
    }

    /// Explicit key list (`A,B,C`) or a literal prefix ending in `*`
    pub fn keys(&mut self, spec: &str) -> &mut Self {
        self.descriptor.keys = Some(spec.to_string());
        self
    }

    pub fn ignore(&mut self) -> &mut Self {
        self.descriptor.ignore = true;
        self
    }

    /// Apply annotations written as a tag string: `env:"OPTIONS" env_delim:";"`
    pub fn tags(&mut self, tags: &str) -> &mut Self {
        match parse_tags(tags) {
            Ok(pairs) => {
                for (tag, value) in pairs {
                    match tag.as_str() {
                        TAG_ENV => {
                            self.env(&value);
                        }
                        TAG_DEFAULT => {
                            self.default(&value);
                        }
                        TAG_DELIMITER => {
                            self.delimiter(&value);
                        }
                        TAG_PREFIX => {
                            self.prefix(&value);
                        }
                        TAG_KEYS => {
                            self.keys(&value);
                        }
                        other => self.problem = Some(format!("unknown tag {}", other)),
                    }
                }
            }
            Err(reason) => self.problem = Some(reason),
        }
        self
    }
}

/// Parse `name:"value"` pairs separated by whitespace
fn parse_tags(input: &str) -> std::result::Result<Vec<(String, String)>, String> {
    let mut pairs = Vec::new();
    let mut rest = input.trim_start();

    while !rest.is_empty() {
        let colon = rest
            .find(':')
            .ok_or_else(|| format!("malformed tag {:?}, expected name:\"value\"", rest))?;
        let name = &rest[..colon];
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(format!("malformed tag name {:?}", name));
        }
        let quoted = rest[colon + 1..]
            .strip_prefix('"')
            .ok_or_else(|| format!("value of tag {} must be quoted", name))?;

        let mut value = String::new();
        let mut chars = quoted.char_indices();
        let mut end = None;
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => {
                    if let Some((_, escaped)) = chars.next() {
                        value.push(escaped);
                    }
                }
                '"' => {
                    end = Some(i);
                    break;
                }
                c => value.push(c),
            }
        }
        let end = end.ok_or_else(|| format!("unterminated value for tag {}", name))?;
        pairs.push((name.to_string(), value));
        rest = quoted[end + 1..].trim_start();
    }
    Ok(pairs)
}

/// Registration table of a structure's fields
pub struct Fields<T> {
    fields: Vec<Field<T>>,
}

impl<T: 'static> Fields<T> {
    pub(crate) fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Build the table of `T`
    pub fn of() -> Self
    where
        T: EnvBind,
    {
        let mut fields = Self::new();
        T::describe(&mut fields);
        fields
    }

    fn push(&mut self, field: Field<T>) -> &mut Field<T> {
        self.fields.push(field);
        let last = self.fields.len() - 1;
        &mut self.fields[last]
    }

    /// A single scalar value
    pub fn scalar<V: Primitive>(&mut self, name: &str, access: fn(&mut T) -> &mut V) -> &mut Field<T> {
        let assign: Assign<T> = Box::new(move |target, bound| match bound {
            Bound::Scalar(value) => {
                *access(target) = extract(value)?;
                Ok(())
            }
            _ => Err(Mismatch::shape::<V>()),
        });
        self.push(Field::new(name, FieldKind::Scalar(V::KIND), Slot::Leaf(assign)))
    }

    /// A delimiter-separated list of scalars
    pub fn list<V: Primitive>(&mut self, name: &str, access: fn(&mut T) -> &mut Vec<V>) -> &mut Field<T> {
        let assign: Assign<T> = Box::new(move |target, bound| match bound {
            Bound::List(values) => {
                *access(target) = values
                    .into_iter()
                    .map(extract)
                    .collect::<std::result::Result<Vec<V>, _>>()?;
                Ok(())
            }
            _ => Err(Mismatch::shape::<V>()),
        });
        self.push(Field::new(name, FieldKind::List(V::KIND), Slot::Leaf(assign)))
    }

    /// A map of scalars selected by a key-spec
    pub fn map<V: Primitive>(
        &mut self,
        name: &str,
        access: fn(&mut T) -> &mut HashMap<String, V>,
    ) -> &mut Field<T> {
        let assign: Assign<T> = Box::new(move |target, bound| match bound {
            Bound::Map(values) => {
                *access(target) = values
                    .into_iter()
                    .map(|(key, value)| extract(value).map(|v| (key, v)))
                    .collect::<std::result::Result<HashMap<String, V>, _>>()?;
                Ok(())
            }
            _ => Err(Mismatch::shape::<V>()),
        });
        self.push(Field::new(name, FieldKind::Map(V::KIND), Slot::Leaf(assign)))
    }

    /// A scalar left as `None` when neither a value nor a default exists
    pub fn optional<V: Primitive>(
        &mut self,
        name: &str,
        access: fn(&mut T) -> &mut Option<V>,
    ) -> &mut Field<T> {
        let assign: Assign<T> = Box::new(move |target, bound| match bound {
            Bound::Scalar(value) => {
                *access(target) = Some(extract(value)?);
                Ok(())
            }
            Bound::Absent => {
                *access(target) = None;
                Ok(())
            }
            _ => Err(Mismatch::shape::<V>()),
        });
        self.push(Field::new(name, FieldKind::Optional(V::KIND), Slot::Leaf(assign)))
    }

    /// A nested structure bound with this field's prefix
    pub fn nested<U: EnvBind>(&mut self, name: &str, access: fn(&mut T) -> &mut U) -> &mut Field<T> {
        let bind: BindNested<T> = Box::new(move |target, binder, prefix| {
            *access(target) = binder.bind_with_prefix::<U>(prefix)?;
            Ok(())
        });
        self.push(Field::new(name, FieldKind::Nested, Slot::Nested(bind)))
    }

    /// A nested structure behind an `Option`, set only when binding succeeds
    pub fn optional_nested<U: EnvBind>(
        &mut self,
        name: &str,
        access: fn(&mut T) -> &mut Option<U>,
    ) -> &mut Field<T> {
        let bind: BindNested<T> = Box::new(move |target, binder, prefix| {
            *access(target) = Some(binder.bind_with_prefix::<U>(prefix)?);
            Ok(())
        });
        self.push(Field::new(name, FieldKind::OptionalNested, Slot::Nested(bind)))
    }

    /// A field whose type `V` cannot be bound; it must be ignored
    pub fn opaque<V: ?Sized>(&mut self, name: &str) -> &mut Field<T> {
        let kind = FieldKind::Opaque(std::any::type_name::<V>());
        self.push(Field::new(name, kind, Slot::Opaque))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field<T>> {
        self.fields.iter()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().map(Field::descriptor)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
