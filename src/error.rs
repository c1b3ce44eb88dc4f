//! Error types for scene loading and trigger execution.

use thiserror::Error;

/// Errors surfaced while building or running a scene.
///
/// Only malformed content produces these. Repeated notifications, double
/// removals and timers outliving their target are absorbed silently.
#[derive(Debug, Error)]
pub enum SceneError {
    /// A trigger id referenced by a sequence, menu or the start list is not registered.
    #[error("unknown trigger id: {0}")]
    UnknownTrigger(String),

    /// No drawing command lives at the given (layer, id) slot.
    #[error("no drawing command '{id}' on layer {layer}")]
    UnknownCommand { layer: i32, id: String },

    /// No audio command is registered under the given data id.
    #[error("no audio command '{0}'")]
    UnknownAudio(String),

    /// The slot is occupied by a different kind of drawing command.
    #[error("drawing command '{id}' on layer {layer} is not a {expected}")]
    WrongCommandKind {
        layer: i32,
        id: String,
        expected: &'static str,
    },

    /// Two triggers were registered under the same trigger id.
    #[error("duplicate trigger id: {0}")]
    DuplicateTrigger(String),

    /// A texture or sound could not be loaded.
    #[error("failed to load asset {path}")]
    MissingAsset {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A text trigger names a font the stage does not define.
    #[error("unknown font: {0}")]
    UnknownFont(String),

    /// A music fade would never reach silence.
    #[error("fade step for audio '{id}' must be positive, got {step}")]
    InvalidFadeStep { id: String, step: f32 },

    /// Nested sequences exceeded the execution depth limit.
    #[error("trigger sequences nested deeper than {0} levels")]
    SequenceTooDeep(usize),
}
