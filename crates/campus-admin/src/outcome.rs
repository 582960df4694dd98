//! Result of a mutation that may find nothing to do.

/// Referencing an id that is already gone is not an error: the requested
/// end state already holds, so the operation reports a no-op instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    NoOp,
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        self == Outcome::Applied
    }
}
