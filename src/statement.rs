use serde::Serialize;
use serde_json::Value as Json;

use crate::{
  parser::Error,
  values::{Field, is_falsy, kind},
};

const KNOWN_KEYS: &[&str] = &["Sid", "Effect", "Action", "NotAction", "Resource", "NotResource", "Condition", "Principal", "NotPrincipal"];

/// One permission rule, in the field layout expected by the module.
///
/// Every field is optional and is left out of the output when the source
/// value was absent or empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Statement {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sid: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub effect: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub actions: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub not_actions: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub resources: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub not_resources: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub conditions: Option<Vec<Condition>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub principals: Option<Vec<Principal>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub not_principals: Option<Vec<Principal>>,
}

/// A single `(operator, variable)` pair from an IAM `Condition` block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Condition {
  pub test: String,
  pub variable: String,
  pub values: Vec<String>,
}

/// One principal type with its identifiers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Principal {
  #[serde(rename = "type")]
  pub kind: String,
  pub identifiers: Vec<String>,
}

impl Statement {
  pub fn from_json(value: &Json, location: &str) -> Result<Statement, Error> {
    let object = value.as_object().ok_or_else(|| Error::InvalidType("a statement object", location.to_string(), kind(value)))?;

    for key in object.keys().filter(|key| !KNOWN_KEYS.contains(&key.as_str())) {
      log::warn!("{location}: ignoring unknown key '{key}'");
    }

    let field = |key: &str| -> Result<Option<(Field, String)>, Error> {
      let location = format!("{location}.{key}");

      match object.get(key) {
        None => Ok(None),
        Some(value) if is_falsy(value) => Ok(None),
        Some(value) => Ok(Field::from_json(value, &location)?.filter(|field| !field.is_empty()).map(|field| (field, location))),
      }
    };

    let scalar = |key: &str| -> Result<Option<String>, Error> { field(key)?.map(|(field, location)| field.into_scalar(&location)).transpose() };
    let list = |key: &str| -> Result<Option<Vec<String>>, Error> { field(key)?.map(|(field, location)| field.into_list(&location)).transpose() };
    let condition_list = |key: &str| -> Result<Option<Vec<Condition>>, Error> { field(key)?.map(|(field, location)| conditions(field, &location)).transpose().map(Option::flatten) };
    let principal_list = |key: &str| -> Result<Option<Vec<Principal>>, Error> { field(key)?.map(|(field, location)| principals(field, &location)).transpose().map(Option::flatten) };

    let statement = Statement {
      sid: scalar("Sid")?,
      effect: scalar("Effect")?,
      actions: list("Action")?,
      not_actions: list("NotAction")?,
      resources: list("Resource")?,
      not_resources: list("NotResource")?,
      conditions: condition_list("Condition")?,
      principals: principal_list("Principal")?,
      not_principals: principal_list("NotPrincipal")?,
    };

    log::debug!("{location}: mapped statement {:?}", statement.sid.as_deref().unwrap_or("<no sid>"));

    Ok(statement)
  }
}

/// Flattens `operator -> variable -> value(s)` into one record per pair.
fn conditions(field: Field, location: &str) -> Result<Option<Vec<Condition>>, Error> {
  let mut out = vec![];

  for (test, variables) in field.into_mapping(location)? {
    let location = format!("{location}.{test}");

    for (variable, values) in variables.into_mapping(&location)? {
      let values = values.into_list(&format!("{location}.{variable}"))?;

      out.push(Condition {
        test: test.clone(),
        variable,
        values,
      });
    }
  }

  Ok(Some(out).filter(|out| !out.is_empty()))
}

/// Flattens `type -> identifier(s)` into one record per principal type.
///
/// The bare `"*"` principal becomes `{ type = "*", identifiers = ["*"] }`.
fn principals(field: Field, location: &str) -> Result<Option<Vec<Principal>>, Error> {
  let principals = match field {
    Field::Scalar(one) if one == "*" => vec![Principal {
      kind: one.clone(),
      identifiers: vec![one],
    }],
    Field::Scalar(_) => return Err(Error::InvalidType("a mapping or \"*\"", location.to_string(), "a string")),
    field => field
      .into_mapping(location)?
      .into_iter()
      .map(|(kind, identifiers)| {
        let identifiers = identifiers.into_list(&format!("{location}.{kind}"))?;

        Ok(Principal { kind, identifiers })
      })
      .collect::<Result<Vec<_>, Error>>()?,
  };

  Ok(Some(principals).filter(|principals| !principals.is_empty()))
}
