use crate::error::{ErrorSeverity, GameError};

/// Errors for a collaborator that an operation needed but was not provided.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("map library not available")]
    MapsNotAvailable,

    #[error("species oracle not available")]
    SpeciesNotAvailable,

    #[error("move oracle not available")]
    MovesNotAvailable,

    #[error("random source not available")]
    RandomNotAvailable,

    #[error("menu system not available")]
    MenusNotAvailable,

    #[error("graphics not available")]
    GraphicsNotAvailable,

    #[error("key-value store not available")]
    StoreNotAvailable,

    #[error("event sink not available")]
    EventsNotAvailable,
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        // Data collaborators are load-bearing; their absence cannot be
        // recovered from mid-operation.
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MapsNotAvailable => "ORACLE_MAPS_NOT_AVAILABLE",
            Self::SpeciesNotAvailable => "ORACLE_SPECIES_NOT_AVAILABLE",
            Self::MovesNotAvailable => "ORACLE_MOVES_NOT_AVAILABLE",
            Self::RandomNotAvailable => "ORACLE_RANDOM_NOT_AVAILABLE",
            Self::MenusNotAvailable => "ORACLE_MENUS_NOT_AVAILABLE",
            Self::GraphicsNotAvailable => "ORACLE_GRAPHICS_NOT_AVAILABLE",
            Self::StoreNotAvailable => "ORACLE_STORE_NOT_AVAILABLE",
            Self::EventsNotAvailable => "ORACLE_EVENTS_NOT_AVAILABLE",
        }
    }
}
