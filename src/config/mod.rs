//! Configuration loading with `$import` resolution.
//!
//! A configuration file may pull in other files through its import key:
//!
//! ```yaml
//! $import:
//!   - defaults.json
//!   - db/production.yaml
//! db:
//!   pool: 32
//! ```
//!
//! ## Merge Strategy
//! - Imports are merged in listed order; later imports override earlier ones
//! - The importing file's own keys override everything it imports
//! - Mappings merge key by key; scalars, nulls and sequences are replaced
//!
//! ## Environment Variables
//! - `SPIG_IMPORT_KEY` - Import directive key (default: `$import`)
//! - `SPIG_CONFIG` - Root file name (default: `config`)
//! - `SPIG_NO_THROW` - Report unreadable files instead of failing

mod loader;
mod merge;
mod options;
mod path;
mod resolver;
mod source;

pub use loader::{ConfigLoader, ResolvedConfig, load};
pub use merge::{deep_merge, deep_merge_all, deep_merge_into};
pub use options::{
    DEFAULT_FILENAME, DEFAULT_IMPORT_KEY, ENV_CONFIG, ENV_IMPORT_KEY, ENV_NO_THROW, LoaderOptions,
};
pub use path::{SEPARATOR, Visit, VisitKind, find_path, get_path, leaves, set_path, walk_object_tree};
pub use resolver::Resolver;
pub use source::{FileSource, LoadedSource, PROBED_EXTENSIONS, SourceFormat, SourceLoader};
