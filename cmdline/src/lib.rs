//! Command-line loading into a typed configuration store.
//!
//! Components register [`OptionDescriptor`]s. A [`Loader`] turns them into
//! GNU-style long and short option tables, scans `argv` with the [`getopt`]
//! scanner and writes every recognized value into a [`ConfigStore`]:
//!
//! ```
//! use cmdline::{Loader, MemoryStore, OptionDescriptor, OptionKind};
//!
//! let options = vec![
//!     OptionDescriptor::new("verbose", OptionKind::Integer).short('v'),
//!     OptionDescriptor::new("fullscreen", OptionKind::Bool).short('f'),
//!     OptionDescriptor::new("width", OptionKind::Integer),
//! ];
//! let mut argv: Vec<String> = ["player", "-vv", "movie.mkv", "--nofullscreen", "--width=640"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//! let mut store = MemoryStore::new();
//!
//! let outcome = Loader::builder("player")
//!     .build()
//!     .load(&options, &mut argv, &mut store)
//!     .unwrap();
//!
//! assert_eq!(store.get::<i64>("verbose").unwrap(), 2);
//! assert!(!store.get::<bool>("fullscreen").unwrap());
//! assert_eq!(store.get::<i64>("width").unwrap(), 640);
//! assert_eq!(outcome.operands, vec!["movie.mkv"]);
//! ```

pub mod coerce;
pub mod descriptor;
pub mod error;
pub mod index;
pub mod keys;
pub mod loader;
pub mod resolve;
pub mod store;
pub mod tables;

pub use descriptor::{descriptors, Component, OptionDescriptor, OptionKind};
pub use error::{CmdlineError, Result};
pub use getopt::Ordering;
pub use keys::{KeyTranslator, StandardKeys};
pub use loader::{has_platform_argument, status, Loader, LoaderBuilder, ParseOutcome, Recognized};
pub use store::{ConfigStore, FromStoredValue, MemoryStore, StoredValue};
