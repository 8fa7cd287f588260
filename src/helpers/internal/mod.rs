//! Internal utility modules shared by the download, extract and copy helpers.

pub mod fs_utils;
pub mod progress;
