// ABOUTME: Version info and REPL banner text

pub const VERSION: &str = "1.0.0";
pub const WELCOME_MESSAGE: &str = "Monkey Language Interpreter v1.0";
pub const WELCOME_SUBTITLE: &str = "A tree-walking interpreter with closures and macros";
pub const PROMPT: &str = ">> ";
