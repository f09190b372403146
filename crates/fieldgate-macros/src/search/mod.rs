//! Implementation of the `#[derive(Searchable)]` macro.
//!
//! This module walks a struct's `#[search(...)]` annotations once and
//! generates the registration calls a host would otherwise write by hand.

mod attrs;
mod derive;

pub use derive::searchable_derive_impl;
