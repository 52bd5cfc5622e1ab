pub mod features;
pub mod model;
pub mod selector;
pub mod strategy;

pub use features::{encode, encode_all, Features, FEATURE_LEN};
pub use model::PolicyModel;
pub use selector::{select_move, softmax, SelectParams, Selection};
pub use strategy::{resolve, MoveScorer, Strategy};
