//! JSON type signatures.
//!
//! Primitives are bare strings (`"bool"`, `"number"`, `"string"`,
//! `"dynamic"`); compound types are `[kind, payload]` arrays:
//! `["list", T]`, `["set", T]`, `["map", T]`, `["tuple", [T, ...]]` and
//! `["object", {name: T, ...}]`, with a third element listing the optional
//! attribute names when there are any: `["object", {...}, ["name", ...]]`.

use serde::de::Error as _;
use serde::ser::{SerializeSeq, SerializeTuple};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{ObjectType, Type};
use crate::error::TypeParseError;

/// Parses a JSON type signature.
pub fn parse_json_type(bytes: &[u8]) -> Result<Type, TypeParseError> {
    let raw: serde_json::Value = serde_json::from_slice(bytes)?;
    Type::from_json_value(&raw)
}

impl Type {
    /// Parses a type signature that has already been read as JSON.
    pub fn from_json_value(v: &serde_json::Value) -> Result<Type, TypeParseError> {
        match v {
            serde_json::Value::String(name) => parse_primitive(name),
            serde_json::Value::Array(items) => parse_compound(items),
            other => Err(TypeParseError::UnexpectedToken(other.to_string())),
        }
    }

    /// The signature as a JSON value.
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            Type::Bool => "bool".into(),
            Type::Number => "number".into(),
            Type::String => "string".into(),
            Type::DynamicPseudoType => "dynamic".into(),
            Type::List(element) => serde_json::json!(["list", element.to_json_value()]),
            Type::Set(element) => serde_json::json!(["set", element.to_json_value()]),
            Type::Map(element) => serde_json::json!(["map", element.to_json_value()]),
            Type::Tuple(elements) => {
                let elements: Vec<_> = elements.iter().map(Type::to_json_value).collect();
                serde_json::json!(["tuple", elements])
            }
            Type::Object(obj) => {
                let attrs: serde_json::Map<String, serde_json::Value> = obj
                    .attribute_types
                    .iter()
                    .map(|(name, ty)| (name.clone(), ty.to_json_value()))
                    .collect();
                if obj.optional_attributes.is_empty() {
                    serde_json::json!(["object", attrs])
                } else {
                    let optional: Vec<&String> = obj.optional_attributes.iter().collect();
                    serde_json::json!(["object", attrs, optional])
                }
            }
        }
    }

    /// The signature as compact JSON bytes.
    pub fn to_json_bytes(&self) -> Vec<u8> {
        self.to_json_value().to_string().into_bytes()
    }
}

fn parse_primitive(name: &str) -> Result<Type, TypeParseError> {
    match name {
        "bool" => Ok(Type::Bool),
        "number" => Ok(Type::Number),
        "string" => Ok(Type::String),
        "dynamic" => Ok(Type::DynamicPseudoType),
        other => Err(TypeParseError::UnknownPrimitive(other.to_string())),
    }
}

fn parse_compound(items: &[serde_json::Value]) -> Result<Type, TypeParseError> {
    let kind = items
        .first()
        .and_then(|k| k.as_str())
        .ok_or_else(|| TypeParseError::InvalidPayload {
            kind: "compound".to_string(),
            reason: "first element must be the type kind string".to_string(),
        })?;

    match kind {
        "list" | "set" | "map" => {
            if items.len() != 2 {
                return Err(TypeParseError::Arity {
                    kind: kind.to_string(),
                    expected: "2",
                    got: items.len(),
                });
            }
            let element = Box::new(Type::from_json_value(&items[1])?);
            Ok(match kind {
                "list" => Type::List(element),
                "set" => Type::Set(element),
                _ => Type::Map(element),
            })
        }
        "tuple" => {
            if items.len() != 2 {
                return Err(TypeParseError::Arity {
                    kind: kind.to_string(),
                    expected: "2",
                    got: items.len(),
                });
            }
            let elements = items[1]
                .as_array()
                .ok_or_else(|| TypeParseError::InvalidPayload {
                    kind: kind.to_string(),
                    reason: format!("expected an array of element types, got {}", items[1]),
                })?;
            let elements = elements
                .iter()
                .map(Type::from_json_value)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Type::Tuple(elements))
        }
        "object" => {
            if items.len() != 2 && items.len() != 3 {
                return Err(TypeParseError::Arity {
                    kind: kind.to_string(),
                    expected: "2 or 3",
                    got: items.len(),
                });
            }
            let attrs = items[1]
                .as_object()
                .ok_or_else(|| TypeParseError::InvalidPayload {
                    kind: kind.to_string(),
                    reason: format!("expected an object of attribute types, got {}", items[1]),
                })?;
            let mut attribute_types = Vec::with_capacity(attrs.len());
            for (name, ty) in attrs {
                attribute_types.push((name.clone(), Type::from_json_value(ty)?));
            }
            let obj = ObjectType::new(attribute_types);

            let Some(optional) = items.get(2) else {
                return Ok(Type::Object(obj));
            };
            let names = optional
                .as_array()
                .ok_or_else(|| TypeParseError::InvalidPayload {
                    kind: kind.to_string(),
                    reason: format!("expected an array of optional attribute names, got {}", optional),
                })?
                .iter()
                .map(|name| {
                    name.as_str()
                        .map(str::to_owned)
                        .ok_or_else(|| TypeParseError::InvalidPayload {
                            kind: kind.to_string(),
                            reason: format!("optional attribute name must be a string, got {}", name),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let obj = obj
                .with_optional(names)
                .map_err(|err| TypeParseError::InvalidPayload {
                    kind: kind.to_string(),
                    reason: err.to_string(),
                })?;
            Ok(Type::Object(obj))
        }
        other => Err(TypeParseError::UnknownKind(other.to_string())),
    }
}

impl Serialize for Type {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Type::Bool => serializer.serialize_str("bool"),
            Type::Number => serializer.serialize_str("number"),
            Type::String => serializer.serialize_str("string"),
            Type::DynamicPseudoType => serializer.serialize_str("dynamic"),
            Type::List(element) => serialize_pair(serializer, "list", element.as_ref()),
            Type::Set(element) => serialize_pair(serializer, "set", element.as_ref()),
            Type::Map(element) => serialize_pair(serializer, "map", element.as_ref()),
            Type::Tuple(elements) => serialize_pair(serializer, "tuple", elements),
            Type::Object(obj) if obj.optional_attributes.is_empty() => {
                serialize_pair(serializer, "object", &obj.attribute_types)
            }
            Type::Object(obj) => {
                let mut seq = serializer.serialize_seq(Some(3))?;
                seq.serialize_element("object")?;
                seq.serialize_element(&obj.attribute_types)?;
                seq.serialize_element(&obj.optional_attributes)?;
                seq.end()
            }
        }
    }
}

fn serialize_pair<S: Serializer, T: Serialize + ?Sized>(
    serializer: S,
    kind: &str,
    payload: &T,
) -> Result<S::Ok, S::Error> {
    let mut tuple = serializer.serialize_tuple(2)?;
    tuple.serialize_element(kind)?;
    tuple.serialize_element(payload)?;
    tuple.end()
}

impl<'de> Deserialize<'de> for Type {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Type::from_json_value(&raw).map_err(D::Error::custom)
    }
}
