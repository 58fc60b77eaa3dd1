//! Populating described structures from an environment map

use crate::cast::{cast_list, cast_scalar};
use crate::descriptor::{Bound, EnvBind, Field, FieldDescriptor, FieldKind, Fields, Slot, WILDCARD};
use crate::naming::{join_prefix, resolve_key, SEPARATOR};
use std::collections::HashMap;
use tracing::{debug, trace};
use types::utils::sanitize_for_logging;
use types::{EnvError, EnvironmentAccess, EnvironmentMap, PrimitiveKind, Result, Value};

/// Binds structures against a resolved map, falling back to an external
/// environment for keys the map does not hold.
pub struct Binder<'a> {
    vars: &'a EnvironmentMap,
    external: &'a dyn EnvironmentAccess,
}

impl<'a> Binder<'a> {
    pub fn new(vars: &'a EnvironmentMap, external: &'a dyn EnvironmentAccess) -> Self {
        Self { vars, external }
    }

    /// Build a fully populated `T`, or fail on the first field error
    pub fn bind<T: EnvBind>(&self) -> Result<T> {
        self.bind_with_prefix("")
    }

    /// Like [`Binder::bind`], with every key qualified by `prefix`
    pub fn bind_with_prefix<T: EnvBind>(&self, prefix: &str) -> Result<T> {
        let fields = Fields::<T>::of();
        let mut target = T::default();
        for field in fields.iter() {
            self.bind_field(&mut target, field, prefix)?;
        }
        debug!(
            structure = std::any::type_name::<T>(),
            prefix,
            fields = fields.len(),
            "bound structure"
        );
        Ok(target)
    }

    /// Bind into an existing value, which is left untouched on failure
    pub fn bind_into<T: EnvBind>(&self, target: &mut T) -> Result<()> {
        *target = self.bind()?;
        Ok(())
    }

    fn bind_field<T>(&self, target: &mut T, field: &Field<T>, parent_prefix: &str) -> Result<()> {
        let descriptor = field.descriptor();
        let name = descriptor.name.as_str();

        if let Some(problem) = field.problem() {
            return Err(EnvError::invalid_usage(name, problem));
        }
        if descriptor.ignore {
            trace!(field = name, "ignoring field");
            return Ok(());
        }
        if descriptor.keys.is_some() && !matches!(descriptor.kind, FieldKind::Map(_)) {
            return Err(EnvError::invalid_usage(name, "env_keys is only valid on map fields"));
        }

        let prefix = join_prefix(parent_prefix, descriptor.prefix.as_deref().unwrap_or(""));

        match field.slot() {
            Slot::Opaque => {
                let type_name = match &descriptor.kind {
                    FieldKind::Opaque(type_name) => *type_name,
                    _ => "unknown",
                };
                Err(EnvError::UnsupportedType {
                    field: name.to_string(),
                    type_name: type_name.to_string(),
                })
            }
            Slot::Nested(bind) => {
                trace!(field = name, prefix = prefix.as_str(), "binding nested structure");
                bind(target, self, &prefix)
            }
            Slot::Leaf(assign) => {
                let bound = match descriptor.kind {
                    FieldKind::Map(kind) => Bound::Map(self.bind_map(descriptor, kind, &prefix)?),
                    _ => self.bind_leaf(descriptor, &prefix)?,
                };
                assign(target, bound).map_err(|mismatch| EnvError::invalid_usage(name, mismatch.to_string()))
            }
        }
    }

    fn bind_leaf(&self, descriptor: &FieldDescriptor, prefix: &str) -> Result<Bound> {
        let name = descriptor.name.as_str();
        let key = resolve_key(descriptor.env.as_deref(), name, prefix);

        let text = match self.lookup(&key) {
            Some(value) => value,
            None => match (&descriptor.default, &descriptor.kind) {
                (Some(default), _) => {
                    trace!(field = name, key = key.as_str(), "using default value");
                    default.clone()
                }
                (None, FieldKind::Optional(_)) => {
                    trace!(field = name, key = key.as_str(), "optional field left unset");
                    return Ok(Bound::Absent);
                }
                (None, _) => return Err(EnvError::key_not_found(name, &key)),
            },
        };

        trace!(
            field = name,
            key = key.as_str(),
            value = %sanitize_for_logging(&text),
            "casting field value"
        );
        let cast_error = |source| EnvError::type_cast(name, &key, source);
        match descriptor.kind {
            FieldKind::Scalar(kind) | FieldKind::Optional(kind) => {
                Ok(Bound::Scalar(cast_scalar(&text, kind).map_err(cast_error)?))
            }
            FieldKind::List(kind) => {
                let delimiter = descriptor.delimiter();
                if delimiter.is_empty() {
                    return Err(EnvError::invalid_usage(name, "list delimiter cannot be empty"));
                }
                Ok(Bound::List(cast_list(&text, kind, delimiter).map_err(cast_error)?))
            }
            _ => Err(EnvError::invalid_usage(name, "field is not a leaf")),
        }
    }

    fn bind_map(
        &self,
        descriptor: &FieldDescriptor,
        kind: PrimitiveKind,
        prefix: &str,
    ) -> Result<HashMap<String, Value>> {
        let name = descriptor.name.as_str();
        let spec = descriptor
            .keys
            .as_deref()
            .map(str::trim)
            .filter(|spec| !spec.is_empty())
            .ok_or_else(|| EnvError::invalid_usage(name, "map fields require env_keys"))?;

        let mut result = HashMap::new();

        if let Some(literal) = spec.strip_suffix(WILDCARD) {
            // keys are reported relative to the field's prefix
            let qualifier = if prefix.is_empty() {
                String::new()
            } else {
                format!("{}{}", prefix, SEPARATOR)
            };
            let pattern = format!("{}{}", qualifier, literal);
            for key in self.vars.keys().filter(|key| key.starts_with(&pattern)) {
                let value = self.map_value(descriptor, kind, key)?;
                result.insert(key[qualifier.len()..].to_string(), value);
            }
            trace!(
                field = name,
                pattern = pattern.as_str(),
                selected = result.len(),
                "matched wildcard keys"
            );
            return Ok(result);
        }

        let delimiter = descriptor.delimiter();
        if delimiter.is_empty() {
            return Err(EnvError::invalid_usage(name, "map key delimiter cannot be empty"));
        }
        for map_key in spec.split(delimiter).map(str::trim) {
            if map_key.is_empty() {
                return Err(EnvError::invalid_usage(name, "env_keys contains an empty key"));
            }
            let value = self.map_value(descriptor, kind, &join_prefix(prefix, map_key))?;
            result.insert(map_key.to_string(), value);
        }
        Ok(result)
    }

    /// One map entry: the set value, else the field default, cast to `kind`
    fn map_value(&self, descriptor: &FieldDescriptor, kind: PrimitiveKind, key: &str) -> Result<Value> {
        let name = descriptor.name.as_str();
        let text = self
            .lookup(key)
            .or_else(|| descriptor.default.clone())
            .ok_or_else(|| EnvError::key_not_found(name, key))?;
        cast_scalar(&text, kind).map_err(|source| EnvError::type_cast(name, key, source))
    }

    /// The map value, then the external value; empty values count as unset
    fn lookup(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .map(str::to_string)
            .or_else(|| self.external.get(key))
            .filter(|value| !value.is_empty())
    }
}
