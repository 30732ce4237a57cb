use super::ScanOptions;

/// The data of a rule generated as Rust code.
pub type RuleData<'a> = (
    // The pattern after macro expansion, not yet anchored.
    &'a str,
    // The canonical text of the rule's action.
    &'a str,
);

/// The data of a start condition generated as Rust code.
pub type ConditionData<'a> = (
    // The name of the start condition.
    &'a str,
    // True if the condition is inclusive.
    bool,
    // The indices of the rules active under this condition, in activation order.
    &'a [usize],
);

/// The complete data of a compiled engine as it is written by the emitter.
///
/// A `CompiledEngine` can be rebuilt from it with `CompiledEngine::try_from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineData<'a> {
    /// The rules in declaration order.
    pub rules: &'a [RuleData<'a>],
    /// The start conditions sorted by name.
    pub conditions: &'a [ConditionData<'a>],
    /// The scanning flags.
    pub options: ScanOptions,
}
