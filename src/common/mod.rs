/// Module that provides data types for the generated code
mod compiled_data;
pub use compiled_data::{ConditionData, EngineData, RuleData};

/// Module that provides a Location type
mod location;
pub use location::Location;

/// Module that provides a Match type
mod match_type;
pub use match_type::Match;

/// Module that provides the option types
mod options;
pub use options::{ModuleType, Options, ScanOptions};

/// Module that provides a Span type
mod span;
pub use span::Span;

/// Module that provides the token types
mod token;
pub use token::{Token, TokenTable};

/// Module that provides the rule id type
mod ids;
pub use ids::RuleId;
