//! Low-level input handling shared by the HTML tokenizer.

pub(crate) mod input;
