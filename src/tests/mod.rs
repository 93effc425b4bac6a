#![cfg(test)]

pub mod helpers;
mod scope_extraction;
