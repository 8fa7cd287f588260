//! Filesystem and network helpers for the init stages
//!
//! - [`download`] - stream an archive to disk
//! - [`extract`] - unpack a zip and find its root folder
//! - [`tree`] - merge the extracted tree into the destination

pub mod download;
pub mod extract;
pub mod tree;

pub(crate) mod internal;
