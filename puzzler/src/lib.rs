//! puzzler is a harness for checking fast puzzle solvers against reference solvers over a
//! self-describing binary record format.
//!
//! The crate is layered bottom-up:
//!
//! - [`io`]: blocking, exact-count byte channels ([`io::Stream`]).
//! - [`persist`]: the codec context. One [`Transcode`] routine per type both encodes and decodes,
//!   depending on the [`persist::Direction`] the [`PersistContext`] was opened with.
//! - [`record`]: tagged, versioned [`Input`] and [`Output`] envelopes around a puzzle's payload.
//! - [`registry`]: maps the puzzle name found in a record's tags to the code that decodes it, so
//!   a reader can load a record without knowing in advance which puzzle wrote it.
//!
//! # Wire format
//!
//! | Type | Encoding |
//! |---|---|
//! | `u32`, `i32` | 4 bytes, big-endian |
//! | `u64` | high `u32` then low `u32` |
//! | `f64` | IEEE-754 bits as `u64` |
//! | `String` | `u32` byte count, raw bytes |
//! | `(A, B, ..)` | each element in order |
//! | `Vec<bool>` | `u32` count, bits packed LSB-first into `ceil(count / 8)` bytes |
//! | `Vec<T>` | `u32` count, each element in order |
//!
//! Every record starts with a format tag ([`config::INPUT_FORMAT`] or
//! [`config::OUTPUT_FORMAT`]) and the puzzle name.
//!
//! # Quickstart
//!
//! ```
//! use {
//!     puzzler::{PersistContext, Registry, io::MemoryStream, record::ExecMode},
//!     rand::{SeedableRng, rngs::StdRng},
//! };
//!
//! let registry = Registry::with_builtin_puzzles()?;
//! let mut rng = StdRng::seed_from_u64(7);
//! let mut input = registry.create_input("median_bits", 10, &mut rng)?;
//!
//! let mut stream = MemoryStream::new();
//! input.persist(&mut PersistContext::sending(&mut stream))?;
//!
//! // The reader only sees bytes; the registry finds the puzzle from the tags.
//! let loaded = registry.load_input(&mut PersistContext::receiving(&mut stream))?;
//! assert_eq!(loaded.puzzle_name(), "median_bits");
//!
//! let reference = loaded.execute(ExecMode::Reference);
//! let candidate = loaded.execute(ExecMode::Candidate);
//! assert!(reference.equals(candidate.as_ref()));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod config;
pub mod error;
pub use error::{Error, PersistError, PersistResult, RegistryError, Result};
pub mod io;
pub mod log;
pub mod persist;
pub use persist::{PersistContext, Transcode};
pub mod puzzle;
pub use puzzle::Puzzle;
pub mod puzzles;
pub mod record;
pub use record::{Input, Output};
pub mod registry;
pub use registry::{Registry, RegistryBuilder};
#[cfg(test)]
mod proptest_config;
pub use puzzler_derive::Transcode;
// Include tuple impls.
include!(concat!(env!("OUT_DIR"), "/tuples.rs"));
