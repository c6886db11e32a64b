//! Reader for ARC game archive containers.
//!
//! An ARC container is a single large file holding a compressed
//! filesystem table followed by the payload data region. Two schema
//! generations exist; both are supported and selected automatically
//! from the container header. Paths are stored as CRC-32C hashes and
//! rendered back to strings through a [`HashLabels`] registry.
//!
//! ```no_run
//! use arc_fs::ArcFile;
//! use std::sync::Arc;
//!
//! # fn main() -> arc_fs::Result<()> {
//! let labels = Arc::new(arc_dict::HashLabels::new());
//! labels.ensure_init(std::io::read_to_string(std::fs::File::open("hashes.txt")?)?.lines());
//!
//! let arc = ArcFile::open("data.arc", labels)?;
//! for path in arc.list_files() {
//!     println!("{path}");
//! }
//! let model = arc.get_file("fighter/mario/model/body/c00/model.numdlb", 0)?;
//! # let _ = model;
//! # Ok(())
//! # }
//! ```

mod arc;
mod error;
mod index;
mod rebuild;
mod resolve;
mod schema;
mod section;
mod shared;
pub mod types;

pub use arc::{ArcFile, DirectoryListing, FileInformation, FileRecord};
pub use arc_dict::{Hash40, HashLabels, crc32c};
pub use error::{Error, Result};
pub use resolve::ResolvedFile;
pub use schema::{FileSystem, StreamTables, V1Tables, V2Tables};
