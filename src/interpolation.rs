use std::fmt::Write;

use crate::parser::Error;

/// Writes `value` as a double-quoted HCL string.
///
/// Besides the usual backslash escapes, template sequences are doubled
/// (`${` to `$${`, `%{` to `%%{`) so IAM policy variables such as
/// `${aws:username}` reach the policy verbatim instead of being evaluated.
pub fn quote(value: &str, w: &mut String) -> Result<(), Error> {
  w.reserve(value.len() + 2);
  w.push('"');

  let mut chars = value.chars().peekable();

  while let Some(c) = chars.next() {
    match c {
      '"' => w.push_str("\\\""),
      '\\' => w.push_str("\\\\"),
      '\n' => w.push_str("\\n"),
      '\r' => w.push_str("\\r"),
      '\t' => w.push_str("\\t"),
      '$' | '%' if chars.peek() == Some(&'{') => {
        w.push(c);
        w.push(c);
      }
      c if c.is_control() => write!(w, "\\u{:04X}", c as u32)?,
      c => w.push(c),
    }
  }

  w.push('"');

  Ok(())
}
