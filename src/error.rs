// ABOUTME: Host-level error types for the driver - distinct from in-language `Value::Error`

use thiserror::Error;

/// Errors the driver (REPL/script runner) can hit outside the language's own
/// evaluation - reading a script file, initializing the line editor. A
/// runtime failure inside evaluated code is a `Value::Error`, not this.
#[derive(Error, Debug)]
pub enum MonkeyError {
    #[error("cannot read script file {path}: {source}")]
    ScriptRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to initialize REPL: {0}")]
    ReplInit(String),

    #[error("parse error:\n{0}")]
    Parse(String),
}
