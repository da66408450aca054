use super::{DestinationStore, StoreError};
use crate::catalog::{Destination, DestinationId};
use tracing::debug;

/// One strategy in the id resolution chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStage {
    ExactId,
    IntegerId,
    Slug,
    FuzzyName,
}

impl LookupStage {
    /// Strategies in the order they are tried.
    pub const CHAIN: [LookupStage; 4] = [
        LookupStage::ExactId,
        LookupStage::IntegerId,
        LookupStage::Slug,
        LookupStage::FuzzyName,
    ];

    async fn attempt<S: DestinationStore>(
        self,
        store: &S,
        raw: &str,
    ) -> Result<Option<Destination>, StoreError> {
        match self {
            Self::ExactId => store.fetch_by_id(&DestinationId::Text(raw.to_string())).await,
            Self::IntegerId => match raw.parse::<i64>() {
                Ok(value) => store.fetch_by_id(&DestinationId::Int(value)).await,
                Err(_) => Ok(None),
            },
            Self::Slug => store.fetch_by_slug(raw).await,
            Self::FuzzyName => {
                let words = id_as_words(raw);
                if words.is_empty() {
                    return Ok(None);
                }
                store.find_by_name_fragment(&words).await
            }
        }
    }
}

/// `"arches--national_park"` becomes `"arches national park"`.
pub fn id_as_words(raw: &str) -> String {
    raw.replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub destination: Destination,
    pub stage: LookupStage,
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("destination id is required")]
    MissingId,
    #[error("no destination matches '{0}'")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Walk [`LookupStage::CHAIN`] and return the first hit. Store errors stop the walk.
pub async fn resolve_destination<S: DestinationStore>(
    store: &S,
    raw: &str,
) -> Result<Resolved, LookupError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(LookupError::MissingId);
    }

    for stage in LookupStage::CHAIN {
        if let Some(destination) = stage.attempt(store, raw).await? {
            debug!(id = raw, ?stage, "destination resolved");
            return Ok(Resolved { destination, stage });
        }
    }

    Err(LookupError::NotFound(raw.to_string()))
}
