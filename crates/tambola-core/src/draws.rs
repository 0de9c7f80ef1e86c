//! Called-number history.

use tambola_proto::Number;
use tracing::trace;

/// Numbers called so far, in call order, each at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawHistory {
    drawn: Vec<Number>,
    current: Option<Number>,
}

impl DrawHistory {
    /// Empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a draw. The number becomes current even if it was seen before.
    ///
    /// Returns `true` if the number was not in the history yet.
    pub fn record(&mut self, number: Number) -> bool {
        self.current = Some(number);
        if self.drawn.contains(&number) {
            trace!(number, "number called again");
            return false;
        }
        self.drawn.push(number);
        true
    }

    /// Called numbers in first-seen order.
    pub fn drawn(&self) -> &[Number] {
        &self.drawn
    }

    /// Most recent draw. `None` before the first draw.
    pub fn current(&self) -> Option<Number> {
        self.current
    }
}
