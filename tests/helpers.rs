#![allow(unused)]

use cloudposser::PolicyDocument;

pub fn convert(policy_json: serde_json::Value) -> PolicyDocument {
  PolicyDocument::from_value(&policy_json).unwrap()
}

pub fn render(policy_json: serde_json::Value) -> String {
  convert(policy_json).render().unwrap()
}
