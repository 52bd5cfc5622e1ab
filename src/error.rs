use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChessError {
    #[error("illegal or unknown SAN move for this position: {0}")]
    InvalidMove(String),
    #[error("invalid square name: {0}")]
    InvalidSquare(String),
    #[error("invalid position: {0}")]
    InvalidPosition(String),
    #[error("no legal moves available; consult the game status first")]
    NoLegalMoves,
    #[error("game is already over: {0}")]
    GameOver(String),
    #[error("cannot start {requested}: {active} is in progress")]
    Busy { active: &'static str, requested: &'static str },
    #[error("unknown model id: {0}")]
    UnknownModel(String),
    #[error("model id must be non-empty ASCII letters, digits, '-' or '_': {0:?}")]
    InvalidModelId(String),
    #[error("a model with id {0} already exists")]
    DuplicateModel(String),
    #[error("model id is reserved for a built-in strategy: {0}")]
    ReservedModelId(String),
    #[error("corrupt model: {0}")]
    CorruptModel(String),
    #[error("weight vector has length {actual}, expected {expected}")]
    WeightLength { expected: usize, actual: usize },
    #[error("model store I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("model store encoding: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChessError>;
