//! Определения ошибок для построителя графов программ.

use crate::nodecodes::SyntaxKind;
use thiserror::Error;

/// Основной тип `Result` для библиотеки.
pub type GraphResult<T> = Result<T, GraphError>;

/// Перечисление всех возможных ошибок.
#[derive(Error, Debug)]
pub enum GraphError {
    /// `ascend` вызван на корне метода: обход и построитель рассинхронизированы.
    #[error("Cannot ascend past the root of method {0}")]
    AscendPastRoot(String),

    #[error("Method {signature} closed with {open} unclosed non-terminal(s)")]
    UnbalancedTraversal { signature: String, open: usize },

    #[error("Node of kind {kind} requires a method signature")]
    MissingSignature { kind: SyntaxKind },

    #[error("Type declaration has no name")]
    MissingClassName,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
