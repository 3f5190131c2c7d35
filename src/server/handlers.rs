use std::fs::File;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::profiles::require_name;

use super::request::ApiRequest;
use super::response::ApiResponse;

const INDEX_HTML: &str = include_str!("../../web/index.html");

#[derive(Debug, Deserialize)]
struct NameBody {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize, Serialize)]
struct ProfileNote {
    #[serde(default)]
    profile: String,
    #[serde(default)]
    note: String,
}

#[derive(Debug, Deserialize)]
struct SaveRef {
    #[serde(default)]
    profile: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct CopySaveBody {
    #[serde(default)]
    profile: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    target: String,
}

#[derive(Debug, Deserialize)]
struct SelectPathBody {
    #[serde(default)]
    path: String,
}

pub fn index() -> ApiResponse {
    ApiResponse::bytes(200, "text/html; charset=utf-8", INDEX_HTML.as_bytes().to_vec())
}

pub fn state(ctx: &AppContext) -> AppResult<ApiResponse> {
    ApiResponse::ok(&ctx.state())
}

pub fn list_profiles(ctx: &AppContext) -> AppResult<ApiResponse> {
    ApiResponse::ok(&ctx.store.list_profiles())
}

pub fn create_profile(ctx: &AppContext, request: &ApiRequest) -> AppResult<ApiResponse> {
    let body: NameBody = request.json()?;
    let name = require_name(&body.name, "name")?;
    ctx.store.create_profile(&name)?;
    tracing::info!(profile = %name, "profile created");
    ApiResponse::json(201, &json!({ "status": "created" }))
}

pub fn delete_profile(ctx: &AppContext, request: &ApiRequest) -> AppResult<ApiResponse> {
    let segments = request
        .segments_after("/api/profiles/")
        .unwrap_or_default();
    let raw = segments.join("_");
    let name = require_name(&raw, "profile")
        .map_err(|_| AppError::InvalidInput("invalid profile".to_string()))?;
    ctx.delete_profile(&name)?;
    ApiResponse::ok(&json!({ "status": "deleted" }))
}

pub fn read_note(ctx: &AppContext, request: &ApiRequest) -> AppResult<ApiResponse> {
    let profile = require_name(request.query("profile"), "profile")?;
    let note = ctx.store.read_note(&profile);
    ApiResponse::ok(&ProfileNote { profile, note })
}

pub fn write_note(ctx: &AppContext, request: &ApiRequest) -> AppResult<ApiResponse> {
    let body: ProfileNote = request.json()?;
    let profile = require_name(&body.profile, "profile")?;
    ctx.store.write_note(&profile, &body.note)?;
    ApiResponse::ok(&json!({ "status": "saved" }))
}

pub fn copy_save(ctx: &AppContext, request: &ApiRequest) -> AppResult<ApiResponse> {
    let body: CopySaveBody = request.json()?;
    let missing = || AppError::InvalidInput("missing fields".to_string());
    let profile = require_name(&body.profile, "profile").map_err(|_| missing())?;
    let name = require_name(&body.name, "name").map_err(|_| missing())?;
    let target = require_name(&body.target, "target").map_err(|_| missing())?;

    let dest = ctx.store.copy_save(&profile, &name, &target)?;
    tracing::info!(save = %name, from = %profile, to = %target, "save copied");
    ApiResponse::ok(&json!({ "status": "copied", "dest": dest.display().to_string() }))
}

pub fn export_profile(ctx: &AppContext, request: &ApiRequest) -> AppResult<ApiResponse> {
    let profile = require_name(request.query("profile"), "profile")?;
    let archive = ctx.store.export_zip(&profile)?;
    Ok(ApiResponse::file("application/zip", archive).with_header(
        "Content-Disposition",
        format!("attachment; filename=\"{profile}.zip\""),
    ))
}

pub fn load_profile(ctx: &AppContext, request: &ApiRequest) -> AppResult<ApiResponse> {
    ctx.require_game_save_path()?;
    let body: NameBody = request.json()?;
    let name = require_name(&body.name, "profile")
        .map_err(|_| AppError::InvalidInput("invalid profile".to_string()))?;
    ctx.load_profile(&name)?;
    ApiResponse::ok(&json!({ "status": "loaded", "profile": name }))
}

pub fn import_profile(ctx: &AppContext, request: &ApiRequest) -> AppResult<ApiResponse> {
    ctx.require_game_save_path()?;
    let body: NameBody = request.json()?;
    let name = require_name(&body.name, "profile")
        .map_err(|_| AppError::InvalidInput("invalid profile".to_string()))?;
    ctx.import_profile(&name)?;
    ApiResponse::ok(&json!({ "status": "imported" }))
}

pub fn list_saves(ctx: &AppContext, request: &ApiRequest) -> AppResult<ApiResponse> {
    let profile = require_name(request.query("profile"), "profile")?;
    ApiResponse::ok(&ctx.store.list_saves(&profile, &ctx.quests))
}

pub fn delete_save(ctx: &AppContext, request: &ApiRequest) -> AppResult<ApiResponse> {
    let body: SaveRef = request.json()?;
    let invalid = || AppError::InvalidInput("invalid request".to_string());
    let profile = require_name(&body.profile, "profile").map_err(|_| invalid())?;
    let name = require_name(&body.name, "name").map_err(|_| invalid())?;

    ctx.store.delete_save(&profile, &name)?;
    tracing::info!(save = %name, profile = %profile, "save deleted");
    ApiResponse::ok(&json!({ "status": "deleted" }))
}

pub fn select_path(ctx: &AppContext, request: &ApiRequest) -> AppResult<ApiResponse> {
    let body: SelectPathBody = request.json()?;
    let path = body.path.trim();
    if path.is_empty() {
        return Err(AppError::InvalidInput("selection cancelled".to_string()));
    }

    ctx.set_game_save_path(PathBuf::from(path))?;
    tracing::info!(path, "game save path selected");
    ApiResponse::ok(&json!({ "path": path }))
}

/// Serves a file below the profiles root; `..` segments are refused.
pub fn serve_file(ctx: &AppContext, request: &ApiRequest) -> AppResult<ApiResponse> {
    let segments = request.segments_after("/files/").unwrap_or_default();
    let relative = segments.iter().collect::<PathBuf>();
    if relative.as_os_str().is_empty() || !is_plain_relative(&relative) {
        return Err(AppError::NotFound("404 page not found".to_string()));
    }

    let path = ctx.profiles_root().join(&relative);
    if !path.is_file() {
        return Err(AppError::NotFound("404 page not found".to_string()));
    }

    let content_type = mime_guess::from_path(&path).first_or_octet_stream();
    Ok(ApiResponse::file(content_type.essence_str(), File::open(&path)?))
}

fn is_plain_relative(path: &Path) -> bool {
    path.components()
        .all(|component| matches!(component, Component::Normal(_)))
}
