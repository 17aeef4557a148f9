//! The supporting library for `seqdiff`.
//!
//! The core of the library computes minimal edit scripts between two sequences of arbitrary
//! values ([`diff`]) and replays them to rebuild one sequence from the other ([`patch`]). Four
//! algorithms are available: a linear-space Myers search, a simplified Myers search that keeps a
//! history of every path, and two Wagner-Fischer variants.
//!
//! The remaining modules exist to support the `seqdiff` binary, which tokenizes text documents
//! and renders the diff between them.

pub mod cli;
pub mod config;
pub mod console_utils;
pub mod diff;
pub mod equality;
mod figment_utils;
pub mod input_processing;
pub mod neg_idx_vec;
pub mod operation;
pub mod patch;
pub mod render;

#[cfg(test)]
mod test_utils;

use anyhow::{Context, Result};
use log::debug;
use std::{fs, path::PathBuf};

pub use diff::{Algorithms, DiffError, DiffOptions};
pub use operation::{Operation, OperationFactory};
pub use patch::{PatchError, PatchOptions, apply_patch};

/// A text document read from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Where the document was read from
    pub path: PathBuf,
    /// The full text of the document
    pub text: String,
}

impl Document {
    /// The path of the document as it should be displayed
    pub fn filename(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Read a document from a path
///
/// This returns an anyhow [Result] because it is only used by the binary, which reports the
/// failure and exits.
pub fn generate_document(path: PathBuf) -> Result<Document> {
    debug!("Reading {} to string", path.display());
    let text = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Document { path, text })
}
