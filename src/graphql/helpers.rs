// Error mapping shared across GraphQL query/mutation modules.

use async_graphql::{Error, ErrorExtensions};

use crate::services::{AuthError, CatalogError};

impl ErrorExtensions for CatalogError {
    fn extend(&self) -> Error {
        if let CatalogError::Storage(e) = self {
            tracing::error!(error = ?e, "Catalog storage failure");
        }

        let code = self.code();
        let error = Error::new(self.to_string()).extend_with(|_, e| e.set("code", code));

        match self {
            CatalogError::Validation(v) => error.extend_with(|_, e| {
                for (field, messages) in v.fields() {
                    e.set(field.as_str(), messages.clone());
                }
            }),
            _ => error,
        }
    }
}

impl ErrorExtensions for AuthError {
    fn extend(&self) -> Error {
        if let AuthError::Internal(e) = self {
            tracing::error!(error = ?e, "Auth failure");
        }

        let code = self.code();
        Error::new(self.to_string()).extend_with(|_, e| e.set("code", code))
    }
}

/// Messages reported in a mutation payload's `errors` list
pub(crate) fn error_messages(error: &CatalogError) -> Vec<String> {
    match error {
        CatalogError::Validation(v) => v.messages(),
        other => vec![other.to_string()],
    }
}
