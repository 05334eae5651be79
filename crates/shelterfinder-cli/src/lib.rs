//! Shelter finder CLI library.
//!
//! Terminal styling and output formatting for the `shelterfinder-cli`
//! binary, kept in a library so they can be unit tested.

pub mod output;
pub mod terminal;
