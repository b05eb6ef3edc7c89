// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Estate Ledger contributors

//! Property listing endpoint.

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::ApiError, models::Property, state::AppState, storage::PropertyRepository};

#[derive(Debug, Serialize, ToSchema)]
pub struct PropertyListResponse {
    pub success: bool,
    pub data: Vec<Property>,
}

/// Rewrite a stored image reference to an absolute URL. References that
/// are already absolute pass through untouched.
pub fn absolute_image_url(base: &str, image: &str) -> String {
    if image.starts_with("http://") || image.starts_with("https://") {
        image.to_string()
    } else {
        format!("{}/uploads/{}", base.trim_end_matches('/'), image)
    }
}

/// List all properties.
#[utoipa::path(
    get,
    path = "/api/properties",
    tag = "Properties",
    responses(
        (status = 200, description = "All property rows", body = PropertyListResponse),
        (status = 500, description = "Store unavailable")
    )
)]
pub async fn list_properties(
    State(state): State<AppState>,
) -> Result<Json<PropertyListResponse>, ApiError> {
    let repo = PropertyRepository::new(&state.pool);
    let mut data = repo
        .list()
        .await
        .map_err(|e| ApiError::internal(e, state.config.development))?;

    for property in &mut data {
        if let Some(image) = &property.image {
            property.image = Some(absolute_image_url(&state.config.public_base_url, image));
        }
    }

    Ok(Json(PropertyListResponse {
        success: true,
        data,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_image_gets_prefixed() {
        assert_eq!(
            absolute_image_url("http://localhost:5000", "villa.jpg"),
            "http://localhost:5000/uploads/villa.jpg"
        );
        // A trailing slash on the base does not double up.
        assert_eq!(
            absolute_image_url("http://localhost:5000/", "villa.jpg"),
            "http://localhost:5000/uploads/villa.jpg"
        );
    }

    #[test]
    fn absolute_image_passes_through() {
        let url = "https://cdn.example.com/villa.jpg";
        assert_eq!(absolute_image_url("http://localhost:5000", url), url);
    }
}
