use serde_json::Value as Json;

use crate::parser::Error;

/// Shape of an IAM field value, decided once when the document is read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Field {
  Scalar(String),
  List(Vec<String>),
  Mapping(Vec<(String, Field)>),
}

impl Field {
  /// Reads a JSON value into a [`Field`].
  ///
  /// `null` yields `None`. Numbers and booleans are kept as their JSON text.
  /// Lists may only hold scalars, mappings may nest.
  pub fn from_json(value: &Json, location: &str) -> Result<Option<Field>, Error> {
    match value {
      Json::Null => Ok(None),
      Json::Array(list) => {
        let list = list
          .iter()
          .enumerate()
          .map(|(idx, item)| scalar(item).ok_or_else(|| Error::InvalidType("a string", format!("{location}[{idx}]"), kind(item))))
          .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Field::List(list)))
      }
      Json::Object(map) => {
        let mut entries = Vec::with_capacity(map.len());

        for (key, value) in map {
          if let Some(field) = Field::from_json(value, &format!("{location}.{key}"))? {
            entries.push((key.clone(), field));
          }
        }

        Ok(Some(Field::Mapping(entries)))
      }
      other => Ok(scalar(other).map(Field::Scalar)),
    }
  }

  /// Whether the value counts as absent: empty string, list or mapping.
  pub fn is_empty(&self) -> bool {
    match self {
      Field::Scalar(one) => one.is_empty(),
      Field::List(list) => list.is_empty(),
      Field::Mapping(entries) => entries.is_empty(),
    }
  }

  /// Coerces a scalar or a list into a list, leaving lists untouched.
  pub fn into_list(self, location: &str) -> Result<Vec<String>, Error> {
    match self {
      Field::Scalar(one) => Ok(vec![one]),
      Field::List(list) => Ok(list),
      Field::Mapping(_) => Err(Error::InvalidType("a string or a list of strings", location.to_string(), "a mapping")),
    }
  }

  pub fn into_scalar(self, location: &str) -> Result<String, Error> {
    match self {
      Field::Scalar(one) => Ok(one),
      Field::List(_) => Err(Error::InvalidType("a string", location.to_string(), "a list")),
      Field::Mapping(_) => Err(Error::InvalidType("a string", location.to_string(), "a mapping")),
    }
  }

  pub fn into_mapping(self, location: &str) -> Result<Vec<(String, Field)>, Error> {
    match self {
      Field::Mapping(entries) => Ok(entries),
      Field::Scalar(_) => Err(Error::InvalidType("a mapping", location.to_string(), "a string")),
      Field::List(_) => Err(Error::InvalidType("a mapping", location.to_string(), "a list")),
    }
  }
}

/// Whether a top-level or statement-level value counts as absent.
///
/// Besides `null` and empty containers this includes `false` and `0`. Inside
/// condition and principal mappings those stay values, see [`Field::from_json`].
pub fn is_falsy(value: &Json) -> bool {
  match value {
    Json::Null => true,
    Json::Bool(b) => !b,
    Json::Number(n) => n.as_f64() == Some(0.0),
    Json::String(s) => s.is_empty(),
    Json::Array(list) => list.is_empty(),
    Json::Object(map) => map.is_empty(),
  }
}

fn scalar(value: &Json) -> Option<String> {
  match value {
    Json::String(s) => Some(s.clone()),
    Json::Bool(b) => Some(b.to_string()),
    Json::Number(n) => Some(n.to_string()),
    _ => None,
  }
}

pub(crate) fn kind(value: &Json) -> &'static str {
  match value {
    Json::Null => "null",
    Json::Bool(_) => "a boolean",
    Json::Number(_) => "a number",
    Json::String(_) => "a string",
    Json::Array(_) => "a list",
    Json::Object(_) => "a mapping",
  }
}
