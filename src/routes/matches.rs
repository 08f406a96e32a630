use actix_web::{web, HttpResponse, Responder};
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

use crate::config::MatchingSettings;
use crate::core::{prepare_pool, Matcher};
use crate::models::{ErrorResponse, HealthResponse, RawProfile, RunMatchingRequest, RunMatchingResponse};
use crate::services::{build_sessions, PostgresClient};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// `None` when no database is configured; only previews are served then
    pub postgres: Option<Arc<PostgresClient>>,
    pub matcher: Matcher,
    pub matching: MatchingSettings,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/preview", web::post().to(preview_matches))
        .route("/matches/run", web::post().to(run_matching));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = match &state.postgres {
        Some(postgres) => postgres.health_check().await.unwrap_or(false),
        None => true,
    };

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Run the engine over a caller-supplied pool without persisting anything
///
/// POST /api/v1/matches/preview
///
/// Request body: JSON array of normalized candidates
/// ```json
/// [{ "id": "u1", "age": 20, "gender": "female", "genderPreference": "male", ... }]
/// ```
async fn preview_matches(state: web::Data<AppState>, body: web::Json<Value>) -> impl Responder {
    let matcher = state.matcher.clone();
    let input = body.into_inner();

    let outcome = match web::block(move || matcher.find_matches_value(&input)).await {
        Ok(outcome) => outcome,
        Err(e) => return blocking_failed(e),
    };

    match outcome {
        Ok(result) => {
            tracing::info!("Preview produced {} pairs", result.len());
            HttpResponse::Ok().json(result)
        }
        Err(e) => {
            tracing::info!("Rejected preview input: {}", e);
            HttpResponse::BadRequest().json(ErrorResponse {
                error: e.code().to_string(),
                message: e.to_string(),
                status_code: 400,
            })
        }
    }
}

/// Run the daily matching pass over stored profiles
///
/// POST /api/v1/matches/run
///
/// Request body (optional):
/// ```json
/// { "dryRun": false }
/// ```
async fn run_matching(state: web::Data<AppState>, body: web::Bytes) -> impl Responder {
    let dry_run = match parse_run_request(&body) {
        Ok(req) => req.dry_run,
        Err(e) => {
            tracing::info!("Rejected run request: {}", e);
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid JSON payload".to_string(),
                message: e.to_string(),
                status_code: 400,
            });
        }
    };

    let Some(postgres) = state.postgres.as_ref() else {
        return HttpResponse::ServiceUnavailable().json(ErrorResponse {
            error: "Database not configured".to_string(),
            message: "Matching runs need a database; use /matches/preview instead".to_string(),
            status_code: 503,
        });
    };

    tracing::info!("Matchmaking started (dry run: {})", dry_run);

    let profiles = match postgres.load_profiles().await {
        Ok(profiles) => profiles,
        Err(e) => {
            tracing::error!("Failed to fetch profiles: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Profiles fetch failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let profiles: Vec<RawProfile> = profiles
        .into_iter()
        .filter(|profile| match profile.validate() {
            Ok(()) => true,
            Err(errors) => {
                tracing::warn!("Skipping invalid profile {}: {}", profile.display_name(), errors);
                false
            }
        })
        .collect();

    let pool = prepare_pool(&profiles);
    tracing::debug!(
        "Eligible users: {}",
        pool.iter()
            .map(|c| c.nickname.as_deref().unwrap_or(&c.id))
            .collect::<Vec<_>>()
            .join(", ")
    );

    if pool.len() < state.matching.min_pool_size {
        tracing::info!("Only {} eligible users, nothing to match", pool.len());
        return HttpResponse::Ok().json(RunMatchingResponse {
            success: true,
            matched_pairs: 0,
            pairs: vec![],
            dry_run,
        });
    }

    let matcher = state.matcher.clone();
    let (pool, result) = match web::block(move || {
        let result = matcher.find_matches(&pool);
        (pool, result)
    })
    .await
    {
        Ok(outcome) => outcome,
        Err(e) => return blocking_failed(e),
    };

    if !dry_run && !result.is_empty() {
        let sessions = build_sessions(
            &result,
            &pool,
            chrono::Utc::now(),
            state.matching.session_duration(),
        );

        if let Err(e) = postgres.persist_matches(&sessions).await {
            tracing::error!("Failed to persist matches: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to persist matches".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    }

    tracing::info!("Matchmaking finished with {} pairs", result.len());

    HttpResponse::Ok().json(RunMatchingResponse {
        success: true,
        matched_pairs: result.len(),
        pairs: result.pairs,
        dry_run,
    })
}

fn blocking_failed(e: actix_web::error::BlockingError) -> HttpResponse {
    tracing::error!("Matching task failed: {}", e);
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: "Matching failed".to_string(),
        message: e.to_string(),
        status_code: 500,
    })
}

/// An absent or blank body means the defaults; anything else must parse
fn parse_run_request(body: &[u8]) -> Result<RunMatchingRequest, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RunMatchingRequest::default());
    }
    serde_json::from_slice(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::json;

    fn app_state() -> AppState {
        AppState {
            postgres: None,
            matcher: Matcher::with_default_weights(),
            matching: MatchingSettings::default(),
        }
    }

    fn candidate(id: &str, gender: &str, preference: &str) -> Value {
        json!({
            "id": id,
            "age": 20,
            "gender": gender,
            "genderPreference": preference,
            "year": "1st",
            "approved": true,
            "interests": ["A", "B", "C", "D", "E", "A", "B", "C", "D", "E"]
        })
    }

    #[actix_web::test]
    async fn test_health_without_database() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp: HealthResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.status, "healthy");
    }

    #[actix_web::test]
    async fn test_preview_pairs_candidates() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state()))
                .configure(configure),
        )
        .await;

        let body = json!([
            candidate("a", "male", "female"),
            candidate("b", "female", "male"),
            candidate("c", "male", "male")
        ]);
        let req = test::TestRequest::post()
            .uri("/matches/preview")
            .set_json(&body)
            .to_request();
        let resp: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp["pairs"], json!([{"id1": "a", "id2": "b"}]));
        assert_eq!(resp["userIds"], json!(["a", "b"]));
    }

    #[actix_web::test]
    async fn test_preview_rejects_non_array() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/matches/preview")
            .set_json(json!({"users": []}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "type_constraint");
    }

    #[actix_web::test]
    async fn test_run_requires_database() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/matches/run")
            .set_json(json!({"dryRun": true}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn test_run_rejects_malformed_body() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state()))
                .configure(configure),
        )
        .await;

        for payload in [r#"{"dryRun": "yes"}"#, r#"{"dryRun": true"#, "not json"] {
            let req = test::TestRequest::post()
                .uri("/matches/run")
                .insert_header(("content-type", "application/json"))
                .set_payload(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;

            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload {}", payload);
        }
    }

    #[actix_web::test]
    async fn test_run_accepts_empty_body() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post().uri("/matches/run").to_request();
        let resp = test::call_service(&app, req).await;

        // Defaults parse, so the request reaches the database check
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[::core::prelude::v1::test]
    fn test_parse_run_request() {
        assert!(!parse_run_request(b"").unwrap().dry_run);
        assert!(!parse_run_request(b"  \n").unwrap().dry_run);
        assert!(parse_run_request(br#"{"dryRun": true}"#).unwrap().dry_run);
        assert!(parse_run_request(br#"{"dry_run": true}"#).unwrap().dry_run);
        assert!(parse_run_request(br#"{"dryRun": 1}"#).is_err());
    }
}
