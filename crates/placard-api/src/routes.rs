//! Route table and handlers.

use std::collections::BTreeMap;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use placard_core::slot::json_key;
use placard_core::{LanguageCode, LinkState};
use placard_sync::DuplicateGroup;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::AppState;

/// Builds the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/status", get(status))
        .route("/api/groups", get(list_groups))
        .route(
            "/api/groups/{group}/names",
            get(read_names).post(write_name),
        )
        .route("/api/groups/{group}/localized", post(set_localized))
        .route("/api/translations/duplicates", get(duplicates))
        .with_state(state)
}

const SUCCESS: &str = "Success";

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
    link: LinkState,
    uptime_secs: u64,
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let link = state.service.link();
    Json(StatusResponse {
        status: SUCCESS,
        link: link.state(),
        uptime_secs: link.uptime().as_secs(),
    })
}

#[derive(Debug, Serialize)]
struct GroupInfo {
    name: String,
    field_prefix: String,
    base: String,
    slot_count: usize,
    words_per_slot: usize,
    max_chars: usize,
}

#[derive(Debug, Serialize)]
struct GroupsResponse {
    status: &'static str,
    groups: Vec<GroupInfo>,
}

async fn list_groups(State(state): State<AppState>) -> Json<GroupsResponse> {
    let groups = state
        .service
        .catalog()
        .groups()
        .iter()
        .map(|g| GroupInfo {
            name: g.name().to_string(),
            field_prefix: g.field_prefix().to_string(),
            base: g.base().to_string(),
            slot_count: g.slot_count(),
            words_per_slot: g.words_per_slot(),
            max_chars: g.max_chars(),
        })
        .collect();
    Json(GroupsResponse {
        status: SUCCESS,
        groups,
    })
}

#[derive(Debug, Deserialize)]
struct NamesQuery {
    lang: Option<String>,
}

/// Parses an optional language parameter; blank means "not given".
fn parse_lang(lang: Option<&str>) -> Result<Option<LanguageCode>> {
    match lang.map(str::trim) {
        None | Some("") => Ok(None),
        Some(code) => Ok(Some(LanguageCode::new(code)?)),
    }
}

#[derive(Debug, Serialize)]
struct NamesResponse {
    status: &'static str,
    group: String,
    language: LanguageCode,
    names: Vec<String>,
    values: BTreeMap<String, String>,
}

async fn read_names(
    State(state): State<AppState>,
    Path(group): Path<String>,
    query: std::result::Result<Query<NamesQuery>, QueryRejection>,
) -> Result<Json<NamesResponse>> {
    let Query(query) = query?;
    let lang = parse_lang(query.lang.as_deref())?;

    let named = state
        .service
        .read_named_values(&group, lang.as_ref())
        .await?;

    let mut names = Vec::with_capacity(named.len());
    let mut values = BTreeMap::new();
    for item in named {
        values.insert(json_key(&item.field), item.value.clone());
        names.push(item.value);
    }

    Ok(Json(NamesResponse {
        status: SUCCESS,
        language: state.service.resolve_language(lang.as_ref()),
        group,
        names,
        values,
    }))
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    status: &'static str,
    message: String,
}

#[derive(Debug, Deserialize)]
struct WriteNameRequest {
    name: String,
    value: String,
    #[serde(default)]
    secondary: Option<String>,
}

async fn write_name(
    State(state): State<AppState>,
    Path(group): Path<String>,
    body: std::result::Result<Json<WriteNameRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let Json(request) = body?;
    let slot = state.service.slot_for_field(&group, &request.name)?;
    state
        .service
        .write_slot_name(&group, slot, &request.value, request.secondary.as_deref())
        .await?;
    Ok(Json(MessageResponse {
        status: SUCCESS,
        message: format!("{} updated", request.name),
    }))
}

#[derive(Debug, Deserialize)]
struct LocalizedRequest {
    name: String,
    value: String,
    #[serde(default)]
    lang: Option<String>,
}

async fn set_localized(
    State(state): State<AppState>,
    Path(group): Path<String>,
    body: std::result::Result<Json<LocalizedRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let Json(request) = body?;
    let lang = parse_lang(request.lang.as_deref())?
        .unwrap_or_else(|| state.service.languages().secondary.clone());
    let slot = state.service.slot_for_field(&group, &request.name)?;
    state
        .service
        .set_localized_override(&group, slot, &lang, &request.value)
        .await?;
    Ok(Json(MessageResponse {
        status: SUCCESS,
        message: format!("{} saved for '{lang}'", request.name),
    }))
}

#[derive(Debug, Serialize)]
struct DuplicatesResponse {
    status: &'static str,
    duplicates: Vec<DuplicateGroup>,
}

async fn duplicates(State(state): State<AppState>) -> Result<Json<DuplicatesResponse>> {
    let duplicates = state.service.overlay().duplicates().await?;
    Ok(Json(DuplicatesResponse {
        status: SUCCESS,
        duplicates,
    }))
}
