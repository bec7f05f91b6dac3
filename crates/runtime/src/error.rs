//! Runtime error surface.
//!
//! Wraps the core's error families behind one type so session callers get
//! a single `Result` to match on.

use tileworld_core::{BattleActionError, BattleError, ContentError, OracleError, SceneError};

/// Errors surfaced by the session layer.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Content files failed to load or parse.
    #[error("content failed to load: {0}")]
    Load(#[from] anyhow::Error),

    /// Broken authored content hit at runtime.
    #[error(transparent)]
    Content(#[from] ContentError),

    /// A required collaborator was not wired in.
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// A battle action was rejected at validation.
    #[error(transparent)]
    BattleAction(#[from] BattleActionError),

    /// Turn resolution failed.
    #[error(transparent)]
    Battle(#[from] BattleError),

    /// Scene playback failed.
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// A battle operation was requested outside a battle.
    #[error("no active battle")]
    NoBattle,
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
