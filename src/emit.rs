use itertools::{Itertools, Position};
use serde::Serialize;

use crate::{
  interpolation::quote,
  parser::{Error, PolicyDocument},
  statement::{Condition, Principal, Statement},
};

/// Name of the module input variable holding the policy list.
pub const VARIABLE: &str = "iam_policy";

const INDENT: &str = "  ";

macro_rules! emit {
    ($buf:expr, $depth:expr, $($item:expr),* $(,)?) => {
        $( $item.emit($buf, $depth)?; )*
    };
}

pub trait Emit {
  fn emit(&self, w: &mut String, depth: usize) -> Result<(), Error>;
}

/// Document tree handed to the emitter.
///
/// `Inline` records are written on a single line, `Block` records put each
/// field on its own line. Commas go between items only.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Node {
  Str(String),
  List(Vec<String>),
  Inline(Vec<(&'static str, Node)>),
  Block(Vec<(&'static str, Node)>),
  Records(Vec<Node>),
}

struct Indent;

impl Emit for Indent {
  fn emit(&self, w: &mut String, depth: usize) -> Result<(), Error> {
    for _ in 0..depth {
      w.push_str(INDENT);
    }

    Ok(())
  }
}

impl Emit for &str {
  fn emit(&self, w: &mut String, _: usize) -> Result<(), Error> {
    w.push_str(self);

    Ok(())
  }
}

impl Emit for char {
  fn emit(&self, w: &mut String, _: usize) -> Result<(), Error> {
    w.push(*self);

    Ok(())
  }
}

fn separator(position: Position) -> &'static str {
  match position {
    Position::First | Position::Middle => ",",
    Position::Last | Position::Only => "",
  }
}

impl Emit for Node {
  fn emit(&self, w: &mut String, depth: usize) -> Result<(), Error> {
    match self {
      Node::Str(value) => quote(value, w)?,

      Node::List(items) => {
        w.push('[');

        for (position, item) in items.iter().with_position() {
          quote(item, w)?;

          if matches!(position, Position::First | Position::Middle) {
            w.push_str(", ");
          }
        }

        w.push(']');
      }

      Node::Inline(fields) | Node::Block(fields) if fields.is_empty() => w.push_str("{}"),

      Node::Inline(fields) => {
        w.push_str("{ ");

        for (position, (key, value)) in fields.iter().with_position() {
          emit!(w, depth, *key, " = ", value);

          if matches!(position, Position::First | Position::Middle) {
            w.push_str(", ");
          }
        }

        w.push_str(" }");
      }

      Node::Block(fields) => {
        w.push_str("{\n");

        for (position, (key, value)) in fields.iter().with_position() {
          emit!(w, depth + 1, Indent, *key, " = ", value, separator(position), '\n');
        }

        emit!(w, depth, Indent, '}');
      }

      Node::Records(items) if items.is_empty() => w.push_str("[]"),

      Node::Records(items) => {
        w.push_str("[\n");

        for (position, item) in items.iter().with_position() {
          emit!(w, depth + 1, Indent, item, separator(position), '\n');
        }

        emit!(w, depth, Indent, ']');
      }
    }

    Ok(())
  }
}

/// Conversion of the mapped policy into a [`Node`] tree.
pub trait Repr {
  fn repr(&self) -> Node;
}

fn push_list(fields: &mut Vec<(&'static str, Node)>, key: &'static str, value: &Option<Vec<String>>) {
  if let Some(list) = value {
    fields.push((key, Node::List(list.clone())));
  }
}

fn push_records<T: Repr>(fields: &mut Vec<(&'static str, Node)>, key: &'static str, value: &Option<Vec<T>>) {
  if let Some(records) = value {
    fields.push((key, Node::Records(records.iter().map(Repr::repr).collect())));
  }
}

impl Repr for Condition {
  fn repr(&self) -> Node {
    Node::Inline(vec![
      ("test", Node::Str(self.test.clone())),
      ("variable", Node::Str(self.variable.clone())),
      ("values", Node::List(self.values.clone())),
    ])
  }
}

impl Repr for Principal {
  fn repr(&self) -> Node {
    Node::Inline(vec![("type", Node::Str(self.kind.clone())), ("identifiers", Node::List(self.identifiers.clone()))])
  }
}

impl Repr for Statement {
  fn repr(&self) -> Node {
    let mut fields = vec![];

    if let Some(sid) = &self.sid {
      fields.push(("sid", Node::Str(sid.clone())));
    }
    if let Some(effect) = &self.effect {
      fields.push(("effect", Node::Str(effect.clone())));
    }

    push_list(&mut fields, "actions", &self.actions);
    push_list(&mut fields, "not_actions", &self.not_actions);
    push_list(&mut fields, "resources", &self.resources);
    push_list(&mut fields, "not_resources", &self.not_resources);
    push_records(&mut fields, "conditions", &self.conditions);
    push_records(&mut fields, "principals", &self.principals);
    push_records(&mut fields, "not_principals", &self.not_principals);

    Node::Block(fields)
  }
}

impl Repr for PolicyDocument {
  fn repr(&self) -> Node {
    let mut fields = vec![];

    if let Some(version) = &self.version {
      fields.push(("version", Node::Str(version.clone())));
    }

    fields.push(("statements", Node::Records(self.statements.iter().map(Repr::repr).collect())));

    Node::Block(fields)
  }
}

#[derive(Serialize)]
struct Variable<'p> {
  iam_policy: [&'p PolicyDocument; 1],
}

impl PolicyDocument {
  /// Renders the policy as an `iam_policy = [...]` assignment.
  pub fn render(&self) -> Result<String, Error> {
    let mut buf = String::with_capacity(1024);

    emit!(&mut buf, 0, VARIABLE, " = ", Node::Records(vec![self.repr()]), '\n');

    Ok(buf)
  }

  pub fn to_json(&self) -> Result<String, Error> {
    let mut buf = serde_json::to_string_pretty(&Variable { iam_policy: [self] })?;

    buf.push('\n');

    Ok(buf)
  }
}

#[cfg(test)]
mod tests {
  use super::{Emit, Node};

  fn emitted(node: Node) -> String {
    let mut s = String::new();
    node.emit(&mut s, 0).unwrap();
    s
  }

  #[test]
  fn scalar_lists() {
    assert_eq!(emitted(Node::List(vec![])), "[]");
    assert_eq!(emitted(Node::List(vec!["a".into()])), r#"["a"]"#);
    assert_eq!(emitted(Node::List(vec!["a".into(), "b".into(), "c".into()])), r#"["a", "b", "c"]"#);
  }

  #[test]
  fn inline_records() {
    let node = Node::Inline(vec![("type", Node::Str("AWS".into())), ("identifiers", Node::List(vec!["*".into()]))]);

    assert_eq!(emitted(node), r#"{ type = "AWS", identifiers = ["*"] }"#);
    assert_eq!(emitted(Node::Inline(vec![])), "{}");
  }

  #[test]
  fn nested_blocks_have_no_trailing_commas() {
    let node = Node::Records(vec![
      Node::Block(vec![("a", Node::Str("1".into())), ("b", Node::Records(vec![]))]),
      Node::Block(vec![("c", Node::Records(vec![Node::Inline(vec![("d", Node::Str("2".into()))])]))]),
    ]);

    let expected = r#"[
  {
    a = "1",
    b = []
  },
  {
    c = [
      { d = "2" }
    ]
  }
]"#;

    assert_eq!(emitted(node), expected);
  }
}
