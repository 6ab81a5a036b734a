#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `walk` is the physical traversal behind both idshift passes. Each object
//! under the root is described by `lstat`, so a symbolic link shows up as the
//! link itself and is never followed. Names inside a directory are visited in
//! sorted order, and with [`WalkBuilder::same_file_system`] enabled an entry
//! on another device is skipped along with everything below it.
//!
//! # Design
//!
//! [`Walker`] keeps a stack of open directories. A directory is listed in
//! full when it is reached, its names are sorted, and the walk then descends
//! into them one at a time, which yields entries in depth-first pre-order.
//! The iterator is lazy and cannot be restarted. Dropping it ends the walk.
//!
//! # Errors
//!
//! A [`WalkError`] names the [`WalkStage`] that failed and the path involved.
//! The walker yields nothing after its first error.
//!
//! # Examples
//!
//! ```
//! use std::fs;
//! use walk::WalkBuilder;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! let root = temp.path().join("vol1");
//! fs::create_dir_all(root.join("etc"))?;
//! fs::write(root.join("etc/hostname"), b"box\n")?;
//! fs::write(root.join("README"), b"hi\n")?;
//!
//! let mut visited = Vec::new();
//! for entry in WalkBuilder::new(&root).build()? {
//!     let entry = entry?;
//!     visited.push((entry.depth(), entry.path().strip_prefix(&root)?.to_path_buf()));
//! }
//!
//! let names: Vec<_> = visited.iter().map(|(depth, path)| (*depth, path.to_str().unwrap())).collect();
//! assert_eq!(names, [(0, ""), (1, "README"), (1, "etc"), (2, "etc/hostname")]);
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod entry;
mod error;
mod walker;

pub use entry::WalkEntry;
pub use error::{WalkError, WalkStage};
pub use walker::{WalkBuilder, Walker};

#[cfg(test)]
mod tests;
