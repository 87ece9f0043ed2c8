/*!
# Unified Error Type

A single error enum consolidating every failure class this crate can produce, in the
idiom of `graphina::core::error::GraphinaError`: one variant family per failure class,
a hand-written `Display` impl, `impl std::error::Error`, and `From` conversions for the
I/O and parsing errors the CLI layer needs to propagate.
*/

use std::fmt;
use std::path::PathBuf;

/// Unified error type for all `gendag` operations.
#[derive(Debug)]
pub enum GendagError {
    /// A configuration field (CLI flag or config-file key) was malformed or out of range.
    Config(String),

    /// A geometric precondition was violated (e.g. fewer points than seeds requested).
    Geometry(String),

    /// Model assembly could not find a behavior of the arity a node required.
    Assembly { node: String, arity: usize },

    /// An unparsable pruner name was supplied.
    UnknownPruner(String),

    /// Writing an output artifact failed.
    Io { path: PathBuf, source: std::io::Error },
}

impl GendagError {
    /// Creates a configuration error with the given message.
    pub fn config(message: impl Into<String>) -> Self {
        GendagError::Config(message.into())
    }

    /// Creates a geometry error with the given message.
    pub fn geometry(message: impl Into<String>) -> Self {
        GendagError::Geometry(message.into())
    }

    /// Creates an assembly error naming the starved node and its required arity.
    pub fn assembly(node: impl Into<String>, arity: usize) -> Self {
        GendagError::Assembly { node: node.into(), arity }
    }

    /// Creates an I/O error naming the path that could not be written.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GendagError::Io { path: path.into(), source }
    }
}

impl fmt::Display for GendagError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GendagError::Config(msg) => write!(f, "configuration error: {}", msg),
            GendagError::Geometry(msg) => write!(f, "geometric impossibility: {}", msg),
            GendagError::Assembly { node, arity } => {
                write!(f, "no behavior of arity {} found for node \"{}\"", arity, node)
            }
            GendagError::UnknownPruner(name) => write!(f, "unknown pruner: \"{}\"", name),
            GendagError::Io { path, source } => {
                write!(f, "I/O error writing {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for GendagError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GendagError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GendagError {
    fn from(e: std::io::Error) -> Self {
        GendagError::Io { path: PathBuf::new(), source: e }
    }
}
