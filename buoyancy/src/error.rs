use thiserror::Error;

use crate::basin::BasinId;
use crate::body::BodyId;

/// Rejected scene descriptions and edits addressed at things that do not
/// exist. Numeric edits are clamped instead and never land here.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    #[error("pool geometry must have positive width, height and depth")]
    InvalidPool,
    #[error("body name `{0}` is used more than once")]
    DuplicateBody(String),
    #[error("body `{name}` has an invalid shape: {reason}")]
    InvalidShape { name: String, reason: String },
    #[error("boat `{name}`: {reason}")]
    InvalidBoat { name: String, reason: String },
    #[error("no body with id {0:?}")]
    UnknownBody(BodyId),
    #[error("no basin with id {0:?}")]
    UnknownBasin(BasinId),
    #[error("body `{0}` is a boat hull; resize it with set_boat_volume")]
    NotAdjustable(String),
    #[error("scene has no boat")]
    NoBoat,
}
