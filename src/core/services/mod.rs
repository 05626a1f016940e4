pub mod package_service;
pub mod pricing_service;

pub use package_service::{ImportReport, MatchReport, PackageService};
pub use pricing_service::PricingService;

use crate::domain::NamedEntity;
use crate::errors::PricingError;
use crate::matcher::suggest_names;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] PricingError),
    #[error("{0}")]
    Invalid(String),
    #[error("{kind} `{name}` not found{hint}")]
    NotFound {
        kind: &'static str,
        name: String,
        hint: String,
    },
}

impl ServiceError {
    /// Lookup failure carrying "did you mean" hints drawn from `candidates`.
    pub(crate) fn not_found<T: NamedEntity>(kind: &'static str, name: &str, candidates: &[T]) -> Self {
        let suggestions = suggest_names(name, candidates, 3);
        let hint = if suggestions.is_empty() {
            String::new()
        } else {
            format!(" (did you mean: {})", suggestions.join(", "))
        };
        ServiceError::NotFound {
            kind,
            name: name.to_string(),
            hint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Procedure;
    use uuid::Uuid;

    #[test]
    fn not_found_lists_close_names() {
        let library = vec![
            Procedure::new(Uuid::from_u128(1), "슈링크", 0, 0),
            Procedure::new(Uuid::from_u128(2), "써마지", 0, 0),
        ];
        let err = ServiceError::not_found("procedure", "슈링코", &library);
        assert_eq!(
            err.to_string(),
            "procedure `슈링코` not found (did you mean: 슈링크)"
        );
    }

    #[test]
    fn not_found_without_candidates_has_no_hint() {
        let err = ServiceError::not_found::<Procedure>("procedure", "보톡스", &[]);
        assert_eq!(err.to_string(), "procedure `보톡스` not found");
    }
}
