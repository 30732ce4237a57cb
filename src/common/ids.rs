/// The index of a rule in the ordered rule sequence of a compiled engine.
///
/// Rule ids are stable for the lifetime of the engine. The lower id wins when two rules match
/// the same number of characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RuleId(usize);

impl RuleId {
    /// Create a new id.
    #[inline]
    pub const fn new(index: usize) -> Self {
        RuleId(index)
    }

    /// Get the id as usize.
    #[inline]
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
