use tiny_http::Method;

use crate::context::AppContext;
use crate::error::AppResult;

use super::handlers;
use super::request::ApiRequest;
use super::response::ApiResponse;

pub fn route(ctx: &AppContext, request: &ApiRequest) -> ApiResponse {
    match dispatch(ctx, request) {
        Ok(response) => response,
        Err(err) => {
            let response = ApiResponse::from_error(&err);
            if response.status >= 500 {
                tracing::error!(method = %request.method, path = %request.path, "{err}");
            } else {
                tracing::debug!(method = %request.method, path = %request.path, status = response.status, "{err}");
            }
            response
        }
    }
}

fn dispatch(ctx: &AppContext, request: &ApiRequest) -> AppResult<ApiResponse> {
    let method = &request.method;
    let path = request.path.as_str();

    if path.starts_with("/files/") {
        return match method {
            Method::Get => handlers::serve_file(ctx, request),
            Method::Head => handlers::serve_file(ctx, request).map(ApiResponse::without_body),
            _ => Ok(ApiResponse::method_not_allowed()),
        };
    }

    if path.starts_with("/api/profiles/") {
        return match method {
            Method::Delete => handlers::delete_profile(ctx, request),
            _ => Ok(ApiResponse::not_found()),
        };
    }

    match (path, method) {
        ("/", Method::Get) => Ok(handlers::index()),
        ("/api/state", Method::Get) => handlers::state(ctx),
        ("/api/profiles", Method::Get) => handlers::list_profiles(ctx),
        ("/api/profiles", Method::Post) => handlers::create_profile(ctx, request),
        ("/api/profile_note", Method::Get) => handlers::read_note(ctx, request),
        ("/api/profile_note", Method::Post) => handlers::write_note(ctx, request),
        ("/api/copy_save", Method::Post) => handlers::copy_save(ctx, request),
        ("/api/export_profile", Method::Get) => handlers::export_profile(ctx, request),
        ("/api/load", Method::Post) => handlers::load_profile(ctx, request),
        ("/api/import", Method::Post) => handlers::import_profile(ctx, request),
        ("/api/saves", Method::Get) => handlers::list_saves(ctx, request),
        ("/api/delete_save", Method::Post | Method::Delete) => handlers::delete_save(ctx, request),
        ("/api/select_path", Method::Post) => handlers::select_path(ctx, request),
        (
            "/" | "/api/state" | "/api/profiles" | "/api/profile_note" | "/api/copy_save"
            | "/api/export_profile" | "/api/load" | "/api/import" | "/api/saves"
            | "/api/delete_save" | "/api/select_path",
            _,
        ) => Ok(ApiResponse::method_not_allowed()),
        _ => Ok(ApiResponse::not_found()),
    }
}
