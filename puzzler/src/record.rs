//! Tagged, versioned records.
//!
//! Every record on the wire is laid out as:
//!
//! 1. format tag ([`INPUT_FORMAT`] or [`OUTPUT_FORMAT`])
//! 2. puzzle name ([`Puzzle::NAME`])
//! 3. envelope fields (inputs carry the `u32` scale they were generated at)
//! 4. the puzzle's payload fields, in declaration order
//!
//! [`Input`] and [`Output`] are the statically typed envelopes. [`InputRecord`] and
//! [`OutputRecord`] erase the puzzle type so the [`Registry`](crate::Registry) can hand back
//! records whose puzzle is only known from the tags.
use {
    crate::{
        config::{INPUT_FORMAT, MAX_WORKING_SET, OUTPUT_FORMAT},
        error::{PersistResult, protocol_mismatch, validation},
        persist::{Direction, PersistContext, Transcode},
        puzzle::Puzzle,
    },
    core::{any::Any, fmt},
};

/// Puzzle-specific record fields.
pub trait Payload: Transcode + Default + Clone + PartialEq + fmt::Debug + Send + 'static {
    /// Reject decoded field combinations that are mutually inconsistent.
    fn validate(&self) -> PersistResult<()> {
        Ok(())
    }
}

/// Payload of an output record.
pub trait OutputPayload: Payload {
    /// Whether a candidate result is acceptable against this one.
    ///
    /// Discrete outputs compare exactly; floating-point outputs may use a tolerance.
    fn equals(&self, other: &Self) -> bool;
}

/// Reject a payload whose solvers would hold `count` items of `item_size` bytes, when that
/// exceeds [`MAX_WORKING_SET`].
pub(crate) fn check_working_set(
    puzzle: &str,
    what: &str,
    count: u64,
    item_size: usize,
) -> PersistResult<()> {
    let needed = count.saturating_mul(item_size as u64);
    if needed > MAX_WORKING_SET as u64 {
        return Err(validation(format!(
            "{puzzle}: {what} needs {needed} bytes, over the {MAX_WORKING_SET} byte limit"
        )));
    }
    Ok(())
}

/// Read the format tag and puzzle name that lead every record.
///
/// Tags that are not valid UTF-8 come back lossily decoded, so they fail the later tag check
/// as a mismatch rather than as a string error.
pub fn read_tags(ctx: &mut PersistContext<'_>) -> PersistResult<(String, String)> {
    ctx.require_direction(Direction::Recv)?;
    let format = String::from_utf8_lossy(&ctx.recv_byte_string()?).into_owned();
    let name = String::from_utf8_lossy(&ctx.recv_byte_string()?).into_owned();
    Ok((format, name))
}

fn check_tags(
    format: &str,
    expected_format: &str,
    name: &str,
    expected_name: &str,
) -> PersistResult<()> {
    if format != expected_format {
        return Err(protocol_mismatch(expected_format, format));
    }
    if name != expected_name {
        return Err(protocol_mismatch(expected_name, name));
    }
    Ok(())
}

fn transcode_tags(
    ctx: &mut PersistContext<'_>,
    expected_format: &str,
    expected_name: &str,
) -> PersistResult<()> {
    let mut format = expected_format.to_owned();
    let mut name = expected_name.to_owned();
    ctx.transcode_required(&mut format, expected_format)?
        .transcode_required(&mut name, expected_name)?;
    Ok(())
}

/// Input record of puzzle `P`.
pub struct Input<P: Puzzle> {
    /// Difficulty the input was generated at.
    pub scale: u32,
    pub payload: P::Input,
}

impl<P: Puzzle> Input<P> {
    pub fn new(scale: u32, payload: P::Input) -> Self {
        Self { scale, payload }
    }

    /// Generate a fresh input at `scale`.
    pub fn create(scale: u32, rng: &mut dyn rand::RngCore) -> Self {
        Self::new(scale, P::create_input(scale, rng))
    }

    /// Decode the rest of an input whose tags were already consumed.
    pub fn load_by_tags(
        format: &str,
        name: &str,
        ctx: &mut PersistContext<'_>,
    ) -> PersistResult<Self> {
        ctx.require_direction(Direction::Recv)?;
        check_tags(format, INPUT_FORMAT, name, P::NAME)?;
        let mut input = Self::default();
        input.transcode_fields(ctx)?;
        Ok(input)
    }

    /// Decode a whole input record of this puzzle.
    pub fn load(ctx: &mut PersistContext<'_>) -> PersistResult<Self> {
        let (format, name) = read_tags(ctx)?;
        Self::load_by_tags(&format, &name, ctx)
    }

    fn transcode_fields(&mut self, ctx: &mut PersistContext<'_>) -> PersistResult<()> {
        ctx.transcode(&mut self.scale)?.transcode(&mut self.payload)?;
        if !ctx.is_sending() {
            self.payload.validate()?;
        }
        Ok(())
    }

    pub fn reference_execute(&self) -> Output<P> {
        Output::new(P::reference_execute(&self.payload))
    }

    pub fn execute(&self) -> Output<P> {
        Output::new(P::execute(&self.payload))
    }
}

impl<P: Puzzle> Transcode for Input<P> {
    fn transcode(&mut self, ctx: &mut PersistContext<'_>) -> PersistResult<()> {
        transcode_tags(ctx, INPUT_FORMAT, P::NAME)?;
        self.transcode_fields(ctx)
    }
}

impl<P: Puzzle> Default for Input<P> {
    fn default() -> Self {
        Self::new(0, P::Input::default())
    }
}

impl<P: Puzzle> Clone for Input<P> {
    fn clone(&self) -> Self {
        Self::new(self.scale, self.payload.clone())
    }
}

impl<P: Puzzle> PartialEq for Input<P> {
    fn eq(&self, other: &Self) -> bool {
        self.scale == other.scale && self.payload == other.payload
    }
}

impl<P: Puzzle> fmt::Debug for Input<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Input")
            .field("puzzle", &P::NAME)
            .field("scale", &self.scale)
            .field("payload", &self.payload)
            .finish()
    }
}

/// Output record of puzzle `P`.
pub struct Output<P: Puzzle> {
    pub payload: P::Output,
}

impl<P: Puzzle> Output<P> {
    pub fn new(payload: P::Output) -> Self {
        Self { payload }
    }

    /// Decode the rest of an output whose tags were already consumed.
    pub fn load_by_tags(
        format: &str,
        name: &str,
        ctx: &mut PersistContext<'_>,
    ) -> PersistResult<Self> {
        ctx.require_direction(Direction::Recv)?;
        check_tags(format, OUTPUT_FORMAT, name, P::NAME)?;
        let mut output = Self::default();
        output.transcode_fields(ctx)?;
        Ok(output)
    }

    /// Decode a whole output record of this puzzle.
    pub fn load(ctx: &mut PersistContext<'_>) -> PersistResult<Self> {
        let (format, name) = read_tags(ctx)?;
        Self::load_by_tags(&format, &name, ctx)
    }

    fn transcode_fields(&mut self, ctx: &mut PersistContext<'_>) -> PersistResult<()> {
        ctx.transcode(&mut self.payload)?;
        if !ctx.is_sending() {
            self.payload.validate()?;
        }
        Ok(())
    }

    /// Puzzle-specific comparison of two outputs.
    pub fn equals(&self, other: &Self) -> bool {
        self.payload.equals(&other.payload)
    }
}

impl<P: Puzzle> Transcode for Output<P> {
    fn transcode(&mut self, ctx: &mut PersistContext<'_>) -> PersistResult<()> {
        transcode_tags(ctx, OUTPUT_FORMAT, P::NAME)?;
        self.transcode_fields(ctx)
    }
}

impl<P: Puzzle> Default for Output<P> {
    fn default() -> Self {
        Self::new(P::Output::default())
    }
}

impl<P: Puzzle> Clone for Output<P> {
    fn clone(&self) -> Self {
        Self::new(self.payload.clone())
    }
}

impl<P: Puzzle> PartialEq for Output<P> {
    fn eq(&self, other: &Self) -> bool {
        self.payload == other.payload
    }
}

impl<P: Puzzle> fmt::Debug for Output<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output")
            .field("puzzle", &P::NAME)
            .field("payload", &self.payload)
            .finish()
    }
}

/// Which solver [`InputRecord::execute`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecMode {
    Reference,
    Candidate,
}

/// Input record of a puzzle known only at runtime.
pub trait InputRecord: fmt::Debug + Send {
    fn puzzle_name(&self) -> &'static str;

    fn scale(&self) -> u32;

    /// Transcode the whole record, tags included.
    fn persist(&mut self, ctx: &mut PersistContext<'_>) -> PersistResult<()>;

    /// Run the selected solver and wrap its result as an output record of the same puzzle.
    fn execute(&self, mode: ExecMode) -> Box<dyn OutputRecord>;
}

/// Output record of a puzzle known only at runtime.
pub trait OutputRecord: fmt::Debug + Send {
    fn puzzle_name(&self) -> &'static str;

    /// Transcode the whole record, tags included.
    fn persist(&mut self, ctx: &mut PersistContext<'_>) -> PersistResult<()>;

    /// Compare with another output. Outputs of different puzzles are never equal.
    fn equals(&self, other: &dyn OutputRecord) -> bool;

    fn as_any(&self) -> &dyn Any;
}

impl<P: Puzzle> InputRecord for Input<P> {
    fn puzzle_name(&self) -> &'static str {
        P::NAME
    }

    fn scale(&self) -> u32 {
        self.scale
    }

    fn persist(&mut self, ctx: &mut PersistContext<'_>) -> PersistResult<()> {
        self.transcode(ctx)
    }

    fn execute(&self, mode: ExecMode) -> Box<dyn OutputRecord> {
        let _span = tracing::info_span!("execute", puzzle = P::NAME, ?mode).entered();
        let output = match mode {
            ExecMode::Reference => self.reference_execute(),
            ExecMode::Candidate => Input::<P>::execute(self),
        };
        tracing::debug!("finished");
        Box::new(output)
    }
}

impl<P: Puzzle> OutputRecord for Output<P> {
    fn puzzle_name(&self) -> &'static str {
        P::NAME
    }

    fn persist(&mut self, ctx: &mut PersistContext<'_>) -> PersistResult<()> {
        self.transcode(ctx)
    }

    fn equals(&self, other: &dyn OutputRecord) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| Output::equals(self, other))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
