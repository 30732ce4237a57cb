/// Module with the dispatch routine and the action instructions
mod dispatch;
pub use dispatch::{Action, ActionTable, Command, Dispatch};

/// Module with the compiled engine
mod engine;
pub use engine::{CompiledEngine, CompiledRule, StartCondition};

/// Module with the mutable state of a scanning session
mod scan_state;
pub use scan_state::{ScanState, INITIAL};

/// Module with the scanner and the lexer interface
mod scanner;
pub use scanner::{Lexer, Scanner};

/// Module with the context shared between scanner and parser
mod shared_context;
pub use shared_context::{ErrorHandler, SharedContext};

/// Module with the token iterator
mod tokens;
pub use tokens::Tokens;
