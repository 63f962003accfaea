//! Name-keyed table of puzzles used to decode records of unknown type.
//!
//! The registry has two phases. A [`RegistryBuilder`] collects handlers and rejects duplicate
//! names; [`RegistryBuilder::build`] then freezes it into a read-only [`Registry`] that can be
//! shared freely and used to load records.
//!
//! ```
//! use puzzler::{Registry, RegistryError, puzzles::{Life, MedianBits}};
//!
//! let mut builder = Registry::builder();
//! builder.register::<Life>()?.register::<MedianBits>()?;
//! assert!(matches!(
//!     builder.register::<Life>(),
//!     Err(RegistryError::DuplicateRegistration(_))
//! ));
//!
//! let registry = builder.build();
//! assert!(registry.lookup("life").is_some());
//! assert!(registry.lookup("chess").is_none());
//! assert_eq!(registry.names().collect::<Vec<_>>(), ["life", "median_bits"]);
//! # Ok::<(), RegistryError>(())
//! ```
use {
    crate::{
        error::{PersistResult, RegistryError, Result, duplicate_registration, unknown_type},
        persist::{Direction, PersistContext},
        puzzle::Puzzle,
        puzzles,
        record::{Input, InputRecord, Output, OutputRecord, read_tags},
    },
    core::{fmt, marker::PhantomData},
    rand::RngCore,
    std::collections::BTreeMap,
    tracing::debug,
};

/// Type-erased entry point to one puzzle's record types.
pub trait PuzzleHandler: Send + Sync {
    fn name(&self) -> &'static str;

    /// Decode the rest of an input record whose tags were already read.
    fn load_input_by_tags(
        &self,
        format: &str,
        name: &str,
        ctx: &mut PersistContext<'_>,
    ) -> PersistResult<Box<dyn InputRecord>>;

    /// Decode the rest of an output record whose tags were already read.
    fn load_output_by_tags(
        &self,
        format: &str,
        name: &str,
        ctx: &mut PersistContext<'_>,
    ) -> PersistResult<Box<dyn OutputRecord>>;

    fn create_input(&self, scale: u32, rng: &mut dyn RngCore) -> Box<dyn InputRecord>;
}

/// [`PuzzleHandler`] for a statically known [`Puzzle`].
pub struct PuzzleEntry<P>(PhantomData<fn() -> P>);

impl<P> PuzzleEntry<P> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<P> Default for PuzzleEntry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Puzzle> PuzzleHandler for PuzzleEntry<P> {
    fn name(&self) -> &'static str {
        P::NAME
    }

    fn load_input_by_tags(
        &self,
        format: &str,
        name: &str,
        ctx: &mut PersistContext<'_>,
    ) -> PersistResult<Box<dyn InputRecord>> {
        Ok(Box::new(Input::<P>::load_by_tags(format, name, ctx)?))
    }

    fn load_output_by_tags(
        &self,
        format: &str,
        name: &str,
        ctx: &mut PersistContext<'_>,
    ) -> PersistResult<Box<dyn OutputRecord>> {
        Ok(Box::new(Output::<P>::load_by_tags(format, name, ctx)?))
    }

    fn create_input(&self, scale: u32, rng: &mut dyn RngCore) -> Box<dyn InputRecord> {
        Box::new(Input::<P>::create(scale, rng))
    }
}

type Handlers = BTreeMap<&'static str, Box<dyn PuzzleHandler>>;

/// Registration phase of a [`Registry`].
#[derive(Default)]
pub struct RegistryBuilder {
    handlers: Handlers,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register puzzle `P` under [`Puzzle::NAME`].
    pub fn register<P: Puzzle>(&mut self) -> core::result::Result<&mut Self, RegistryError> {
        self.register_handler(Box::new(PuzzleEntry::<P>::new()))
    }

    /// Register `handler` under its own name, failing if the name is taken.
    pub fn register_handler(
        &mut self,
        handler: Box<dyn PuzzleHandler>,
    ) -> core::result::Result<&mut Self, RegistryError> {
        let name = handler.name();
        if self.handlers.contains_key(name) {
            return Err(duplicate_registration(name));
        }
        debug!(puzzle = name, "registered");
        self.handlers.insert(name, handler);
        Ok(self)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }

    /// Freeze the registrations.
    pub fn build(self) -> Registry {
        Registry {
            handlers: self.handlers,
        }
    }
}

/// Frozen name to handler table.
pub struct Registry {
    handlers: Handlers,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// A registry holding every puzzle in [`crate::puzzles`].
    pub fn with_builtin_puzzles() -> core::result::Result<Self, RegistryError> {
        let mut builder = Self::builder();
        puzzles::register_all(&mut builder)?;
        Ok(builder.build())
    }

    /// The handler registered under `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<&dyn PuzzleHandler> {
        self.handlers.get(name).map(Box::as_ref)
    }

    fn handler(&self, name: &str) -> core::result::Result<&dyn PuzzleHandler, RegistryError> {
        self.lookup(name).ok_or_else(|| unknown_type(name))
    }

    /// Decode an input record of whichever registered puzzle its tags name.
    pub fn load_input(&self, ctx: &mut PersistContext<'_>) -> Result<Box<dyn InputRecord>> {
        ctx.require_direction(Direction::Recv)?;
        let (format, name) = read_tags(ctx)?;
        debug!(%format, %name, "loading input");
        Ok(self.handler(&name)?.load_input_by_tags(&format, &name, ctx)?)
    }

    /// Decode an output record of whichever registered puzzle its tags name.
    pub fn load_output(&self, ctx: &mut PersistContext<'_>) -> Result<Box<dyn OutputRecord>> {
        ctx.require_direction(Direction::Recv)?;
        let (format, name) = read_tags(ctx)?;
        debug!(%format, %name, "loading output");
        Ok(self.handler(&name)?.load_output_by_tags(&format, &name, ctx)?)
    }

    /// Generate an input for the puzzle registered under `name`.
    pub fn create_input(
        &self,
        name: &str,
        scale: u32,
        rng: &mut dyn RngCore,
    ) -> core::result::Result<Box<dyn InputRecord>, RegistryError> {
        Ok(self.handler(name)?.create_input(scale, rng))
    }

    /// Registered names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
