use std::{fs, io, path::Path, path::PathBuf};

use serde::Serialize;
use serde_json::Value as Json;

use crate::{
  statement::Statement,
  values::{Field, is_falsy, kind},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("File not found: {}", .0.display())]
  FileNotFound(PathBuf, #[source] io::Error),
  #[error("Invalid JSON format in: {}", .0.display())]
  InvalidJson(PathBuf, #[source] serde_json::Error),
  #[error("Input JSON should be a dictionary with 'Version' and 'Statement' keys.")]
  InvalidSchema,
  #[error("expected {0} for '{1}', found {2}")]
  InvalidType(&'static str, String, &'static str),

  #[error("json error: {0}")]
  JsonError(#[from] serde_json::Error),
  #[error("formatting error: {0}")]
  FmtError(#[from] std::fmt::Error),
}

impl Error {
  /// Whether the input was valid JSON but not shaped like an IAM policy.
  pub fn is_schema(&self) -> bool {
    matches!(self, Error::InvalidSchema | Error::InvalidType(..))
  }
}

/// An IAM policy restructured for the `iam_policy` module input.
///
/// Built once from the source document and rendered with
/// [`PolicyDocument::render()`](Self::render()).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PolicyDocument {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
  pub statements: Vec<Statement>,
}

impl PolicyDocument {
  /// Parses a policy from any [`io::Read`] source.
  pub fn from_reader<R>(reader: R) -> Result<PolicyDocument, Error>
  where
    R: io::Read,
  {
    let value: Json = serde_json::from_reader(reader)?;

    PolicyDocument::from_value(&value)
  }

  /// Validates the top-level shape of a parsed IAM document and maps it.
  ///
  /// Both `Version` and `Statement` keys must be present, even if their
  /// values are empty. An empty or missing `Version` value is omitted from the
  /// output so that the module falls back to its own default.
  pub fn from_value(value: &Json) -> Result<PolicyDocument, Error> {
    let document = value.as_object().ok_or(Error::InvalidSchema)?;

    let (Some(version), Some(statements)) = (document.get("Version"), document.get("Statement")) else {
      return Err(Error::InvalidSchema);
    };

    let version = match version {
      version if is_falsy(version) => None,
      version => Field::from_json(version, "Version")?.map(|version| version.into_scalar("Version")).transpose()?,
    };

    let statements = match statements {
      statements if is_falsy(statements) => vec![],
      Json::Object(_) => vec![Statement::from_json(statements, "Statement")?],
      Json::Array(list) => list
        .iter()
        .enumerate()
        .map(|(idx, statement)| Statement::from_json(statement, &format!("Statement[{idx}]")))
        .collect::<Result<Vec<_>, _>>()?,
      other => return Err(Error::InvalidType("a list of statements", "Statement".into(), kind(other))),
    };

    log::debug!("mapped {} statement(s), version {:?}", statements.len(), version);

    Ok(PolicyDocument { version, statements })
  }
}

/// Reads and maps the IAM policy stored at `path`.
///
/// A missing or unreadable file is reported as [`Error::FileNotFound`],
/// content that is not JSON as [`Error::InvalidJson`].
pub fn load<P>(path: P) -> Result<PolicyDocument, Error>
where
  P: AsRef<Path>,
{
  let path = path.as_ref();
  let content = fs::read(path).map_err(|err| Error::FileNotFound(path.to_path_buf(), err))?;
  let value: Json = serde_json::from_slice(&content).map_err(|err| Error::InvalidJson(path.to_path_buf(), err))?;

  log::debug!("read {} byte(s) from {}", content.len(), path.display());

  PolicyDocument::from_value(&value)
}
