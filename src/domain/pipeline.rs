//! Ordered accumulation of remote shell command fragments.
//!
//! Features contribute pure `String -> String` transforms; composing folds
//! them left-to-right over the initial command. Registration order equals
//! execution order, and the composed string chains fragments with `&&` so a
//! remote failure aborts everything after it.

/// A single pipeline contribution: receives the command string accumulated so
/// far and returns the new accumulation. A contribution that wants to opt out
/// returns its input unchanged.
pub type Contribution = Box<dyn Fn(String) -> String + Send>;

/// Ordered list of command contributions for one launch.
#[derive(Default)]
pub struct CommandPipeline {
    contributions: Vec<Contribution>,
}

impl CommandPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transform to the end of the pipeline.
    pub fn push<F>(&mut self, transform: F)
    where
        F: Fn(String) -> String + Send + 'static,
    {
        self.contributions.push(Box::new(transform));
    }

    /// Append a fragment chained with `&&` onto whatever came before.
    pub fn push_fragment(&mut self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        self.push(move |acc| format!("{acc} && {fragment}"));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.contributions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contributions.is_empty()
    }

    /// Fold every contribution, in registration order, over `initial`.
    #[must_use]
    pub fn compose(&self, initial: &str) -> String {
        self.contributions
            .iter()
            .fold(initial.to_string(), |acc, contribution| contribution(acc))
    }
}

impl std::fmt::Debug for CommandPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandPipeline")
            .field("contributions", &self.contributions.len())
            .finish()
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
