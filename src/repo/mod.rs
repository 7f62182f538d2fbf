use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::collections::BTreeMap;
use tracing::warn;

use crate::models::{ArchiveType, VersionDist};
use crate::storage::StorageError;
use crate::AppState;

mod validate;

use validate::validate_segment;

pub fn routes() -> axum::Router<AppState> {
    axum::Router::new()
        .route(
            "/repo/:repo/:namespace/:package",
            axum::routing::get(package_metadata),
        )
        .route(
            "/repo/:repo/dist/:namespace/:package/:version/:artifact",
            axum::routing::get(download_dist),
        )
}

/// GET /repo/:repo/:namespace/:package.json
/// Package metadata: a JSON map of version -> distribution info
async fn package_metadata(
    State(state): State<AppState>,
    Path((repo, namespace, package_file)): Path<(String, String, String)>,
) -> impl IntoResponse {
    // The router captures the whole segment; only `.json` requests exist here.
    let Some(package) = package_file.strip_suffix(".json") else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": "not_found",
                "message": "Unknown route"
            })),
        ));
    };

    if let Err(rejection) = check_segments(&[
        ("repo", repo.as_str()),
        ("namespace", namespace.as_str()),
        ("package", package),
    ]) {
        return Err(rejection);
    }

    match state.packages.list_versions(&repo, &namespace, package).await {
        Ok(dists) if dists.is_empty() => Err((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": "package_not_found",
                "message": format!("Package {}/{} has no versions in repo {}", namespace, package, repo)
            })),
        )),
        Ok(dists) => {
            let mut versions: BTreeMap<String, VersionDist> = BTreeMap::new();
            for dist in &dists {
                // list_versions orders oldest first, so the newest dist wins
                // when a version was published with more than one archive.
                versions.insert(
                    dist.version.clone(),
                    VersionDist::from_dist(dist, &state.config.public_base_url),
                );
            }
            Ok(Json(versions))
        }
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": "database_error",
                "message": e.to_string()
            })),
        )),
    }
}

/// GET /repo/:repo/dist/:namespace/:package/:version/:reference.:type
/// Serve one stored archive with its content type and immutable caching
async fn download_dist(
    State(state): State<AppState>,
    Path((repo, namespace, package, version, artifact)): Path<(
        String,
        String,
        String,
        String,
        String,
    )>,
) -> impl IntoResponse {
    let Some((reference, type_str)) = artifact.rsplit_once('.') else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": "not_found",
                "message": "Unknown route"
            })),
        ));
    };

    let dist_type = match type_str.parse::<ArchiveType>() {
        Ok(t) => t,
        Err(_) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "unsupported_dist_type",
                    "message": format!("Archive type {} is not served by this repository", type_str)
                })),
            ));
        }
    };

    if let Err(rejection) = check_segments(&[
        ("repo", repo.as_str()),
        ("namespace", namespace.as_str()),
        ("package", package.as_str()),
        ("version", version.as_str()),
        ("reference", reference),
    ]) {
        return Err(rejection);
    }

    // The index is authoritative: a dist it does not know is 404 without
    // touching the filesystem.
    match state
        .packages
        .find_dist(&repo, &namespace, &package, &version, reference, dist_type)
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({
                    "error": "dist_not_found",
                    "message": format!(
                        "No published distribution matches {}/{} {} ({}.{})",
                        namespace, package, version, reference, dist_type
                    )
                })),
            ));
        }
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "database_error",
                    "message": e.to_string()
                })),
            ));
        }
    }

    match state
        .store
        .read_dist(&repo, &namespace, &package, &version, reference, dist_type)
        .await
    {
        Ok(bytes) => Ok((
            [
                (header::CONTENT_TYPE, dist_type.content_type()),
                (header::CACHE_CONTROL, "public, max-age=31536000, immutable"),
            ],
            bytes,
        )),
        Err(StorageError::NotFound) => {
            warn!(
                "Dist {}/{}/{}/{}/{}.{} is indexed but missing from storage",
                repo, namespace, package, version, reference, dist_type
            );
            Err((
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({
                    "error": "dist_not_found",
                    "message": "No stored file matches this distribution"
                })),
            ))
        }
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": "storage_error",
                "message": e.to_string()
            })),
        )),
    }
}

fn check_segments(
    segments: &[(&'static str, &str)],
) -> Result<(), (StatusCode, Json<serde_json::Value>)> {
    for &(field, value) in segments {
        if let Err(e) = validate_segment(field, value) {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "invalid_identifier",
                    "message": e.to_string()
                })),
            ));
        }
    }
    Ok(())
}
