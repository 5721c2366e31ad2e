//! Personal note keeping library
//!
//! This library owns the canonical note collection and its mutations, the
//! filter/search/sort pipeline that derives the visible list, the tag index,
//! short-lived undo of deletions, and local persistence of all of it.

mod classifier;
mod cli;
mod config;
mod errors;
mod helper;
mod kv;
mod note;
mod persistence;
mod pipeline;
mod recovery;
mod session;
mod store;
mod tags;
mod types;

// Re-export key components
pub use classifier::*;
pub use cli::*;
pub use config::*;
pub use errors::*;
pub use helper::*;
pub use kv::*;
pub use note::*;
pub use persistence::*;
pub use pipeline::*;
pub use recovery::*;
pub use session::*;
pub use store::*;
pub use tags::*;
pub use types::*;
