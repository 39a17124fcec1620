#![doc = include_str!("../README.md")]

mod emit;
mod interpolation;
mod parser;
mod statement;
mod values;

pub use crate::{
  emit::VARIABLE,
  parser::{Error, PolicyDocument, load},
  statement::{Condition, Principal, Statement},
};
