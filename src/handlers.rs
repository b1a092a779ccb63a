use crate::{
    error::{AppError, AppResult, ErrorResponse},
    flash::Flash,
    models::{AppState, VideoRecord},
    multipart::parse_form,
    store, views,
};
use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{header::SET_COOKIE, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::info;

type HandlerResult = Result<Response, ErrorResponse>;

fn respond(state: &AppState, result: AppResult<Response>) -> HandlerResult {
    result.map_err(|e| e.with_debug(state.config.debug))
}

/// List every video
pub async fn index_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    let result = index(&state).await;
    respond(&state, result)
}

async fn index(state: &AppState) -> AppResult<Response> {
    let videos = state.records.load().await?;
    Ok(Html(views::index(&videos)).into_response())
}

pub async fn upload_form_handler() -> Html<String> {
    Html(views::upload_form())
}

/// Store an uploaded video (and optional preview) and append its record
pub async fn upload_handler(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
) -> HandlerResult {
    let result = upload(&state, request).await;
    respond(&state, result)
}

async fn upload(state: &AppState, request: Request<Body>) -> AppResult<Response> {
    let form = parse_form(request, state.config.max_file_size).await?;

    let Some(video_file) = form.file("video") else {
        info!("[POST /upload] No video supplied, showing form again");
        return Ok(Html(views::upload_form()).into_response());
    };
    let Some(filename) = state.media.save_video(video_file).await? else {
        info!("[POST /upload] Rejected video {:?}", video_file.file_name);
        return Ok(Html(views::upload_form()).into_response());
    };

    let preview = match form.file("preview") {
        Some(file) => {
            let saved = state.media.save_preview(file).await?;
            if saved.is_none() {
                info!("[POST /upload] Ignoring preview {:?}", file.file_name);
            }
            saved
        }
        None => None,
    };

    let mut videos = state.records.load().await?;
    videos.push(VideoRecord {
        title: form.text("title").map(str::to_string),
        filename: filename.clone(),
        preview,
    });
    state.records.save(&videos).await?;

    info!("[POST /upload] ✅ SUCCESS - {} ({} records)", filename, videos.len());
    Ok(Redirect::to("/").into_response())
}

/// Show a single video
pub async fn video_handler(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> HandlerResult {
    let result = show_video(&state, &filename).await;
    respond(&state, result)
}

async fn show_video(state: &AppState, filename: &str) -> AppResult<Response> {
    let videos = state.records.load().await?;
    let video = store::find(&videos, filename).ok_or(AppError::NotFound)?;
    Ok(Html(views::video(video)).into_response())
}

/// Management list, consuming any pending flash message
pub async fn admin_handler(State(state): State<Arc<AppState>>, headers: HeaderMap) -> HandlerResult {
    let result = admin(&state, &headers).await;
    respond(&state, result)
}

async fn admin(state: &AppState, headers: &HeaderMap) -> AppResult<Response> {
    let videos = state.records.load().await?;
    let flash = Flash::from_headers(headers);
    let mut response = Html(views::admin(&videos, flash)).into_response();
    if flash.is_some() {
        let (name, value) = Flash::clear_cookie();
        response.headers_mut().insert(name, value);
    }
    Ok(response)
}

pub async fn delete_handler(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> HandlerResult {
    let result = delete(&state, &filename).await;
    respond(&state, result)
}

async fn delete(state: &AppState, filename: &str) -> AppResult<Response> {
    let mut videos = state.records.load().await?;
    let Some(video) = store::find(&videos, filename).cloned() else {
        info!("[POST /admin/delete] {} not found, nothing to do", filename);
        return Ok(Redirect::to("/admin").into_response());
    };

    // Preview first, then the video; a failure leaves the record in place.
    if let Some(preview) = &video.preview {
        state.media.delete_preview(preview).await?;
    }
    state.media.delete_video(&video.filename).await?;

    videos.retain(|v| v.filename != filename);
    state.records.save(&videos).await?;

    info!("[POST /admin/delete] ✅ Deleted {}", filename);
    Ok(flash_redirect(Flash::Deleted))
}

pub async fn edit_form_handler(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> HandlerResult {
    let result = edit_form(&state, &filename).await;
    respond(&state, result)
}

async fn edit_form(state: &AppState, filename: &str) -> AppResult<Response> {
    let videos = state.records.load().await?;
    let video = store::find(&videos, filename).ok_or(AppError::NotFound)?;
    Ok(Html(views::edit_form(video)).into_response())
}

pub async fn edit_handler(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    request: Request<Body>,
) -> HandlerResult {
    let result = edit(&state, &filename, request).await;
    respond(&state, result)
}

async fn edit(state: &AppState, filename: &str, request: Request<Body>) -> AppResult<Response> {
    let mut videos = state.records.load().await?;
    let video = videos
        .iter_mut()
        .find(|v| v.filename == filename)
        .ok_or(AppError::NotFound)?;

    let form = parse_form(request, state.config.max_file_size).await?;
    video.title = form.text("title").map(str::to_string);

    if let Some(file) = form.file("preview") {
        match state.media.save_preview(file).await? {
            Some(new_preview) => {
                if let Some(old) = video.preview.take() {
                    // Same name means the new upload already replaced the old file.
                    if old != new_preview {
                        state.media.delete_preview(&old).await?;
                    }
                }
                video.preview = Some(new_preview);
            }
            None => info!("[POST /admin/edit] Ignoring preview {:?}", file.file_name),
        }
    }

    state.records.save(&videos).await?;

    info!("[POST /admin/edit] ✅ Updated {}", filename);
    Ok(flash_redirect(Flash::Updated))
}

fn flash_redirect(flash: Flash) -> Response {
    ([(SET_COOKIE, flash.set_cookie())], Redirect::to("/admin")).into_response()
}
