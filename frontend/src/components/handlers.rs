use gloo_file::{File as GlooFile, ObjectUrl};
use gloo_timers::callback::{Interval, Timeout};
use shared::{validate_photo, BatchPhase, BatchStatus, CatalogItem, FlowDenial, MilestoneTracker};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{DragEvent, HtmlElement, HtmlVideoElement, MediaStream};
use yew::prelude::*;

use super::super::{App, Msg};
use super::camera::{self, CameraPhase};
use super::carousel::TRANSITION_LOCK_MS;
use super::progress::{POLL_INTERVAL_MS, REDIRECT_DELAY_MS};
use super::toast::Severity;
use super::upload::{files_from_list, InputTab};
use crate::api::{self, ApiError};

const UPLOAD_PULSE_MS: u32 = 3000;

pub fn handle_catalog_loaded(
    app: &mut App,
    ctx: &Context<App>,
    outcome: Result<Vec<CatalogItem>, ApiError>,
) -> bool {
    match outcome {
        Ok(items) => {
            log::info!("catalog loaded: {} items", items.len());
            app.carousel.set_total(items.len());
            app.catalog = items;
        }
        Err(err) => {
            app.notify(ctx, Severity::Error, format!("Failed to load clothing catalog: {err}"));
        }
    }
    true
}

pub fn handle_switch_tab(app: &mut App, ctx: &Context<App>, tab: InputTab) -> bool {
    match tab {
        InputTab::Upload => release_camera(app),
        InputTab::Camera => {
            // the camera may still be live from a previous visit to the tab
            if app.stream.is_none() && app.camera != CameraPhase::RequestingPermission {
                app.camera = CameraPhase::RequestingPermission;
                let link = ctx.link().clone();
                spawn_local(async move {
                    match camera::acquire_stream().await {
                        Ok(stream) => link.send_message(Msg::CameraReady(stream)),
                        Err(message) => link.send_message(Msg::CameraFailed(message)),
                    }
                });
            }
        }
    }
    app.tab = tab;
    true
}

pub fn handle_camera_ready(app: &mut App, stream: MediaStream) -> bool {
    match camera::resolve_arrival(app.tab == InputTab::Camera, app.stream.is_some()) {
        camera::ArrivingStream::Discard => {
            camera::stop_stream(&stream);
            false
        }
        camera::ArrivingStream::Replace => {
            if let Some(superseded) = app.stream.replace(stream) {
                camera::stop_stream(&superseded);
            }
            app.camera = CameraPhase::Streaming;
            true
        }
        camera::ArrivingStream::Adopt => {
            app.stream = Some(stream);
            app.camera = CameraPhase::Streaming;
            true
        }
    }
}

pub fn handle_camera_failed(app: &mut App, ctx: &Context<App>, message: String) -> bool {
    app.notify(ctx, Severity::Error, format!("Could not access camera: {message}"));
    release_camera(app);
    app.tab = InputTab::Upload;
    true
}

pub fn handle_capture_photo(app: &mut App, ctx: &Context<App>) -> bool {
    let Some(video) = app.video_ref.cast::<HtmlVideoElement>() else {
        return false;
    };
    app.camera = CameraPhase::Captured;
    let link = ctx.link().clone();
    spawn_local(async move {
        match camera::capture_frame(video).await {
            Ok(file) => link.send_message(Msg::PhotoCaptured(file)),
            Err(message) => link.send_message(Msg::CaptureFailed(message)),
        }
    });
    true
}

pub fn handle_photo_captured(app: &mut App, ctx: &Context<App>, file: GlooFile) -> bool {
    release_camera(app);
    app.tab = InputTab::Upload;
    handle_photo_picked(app, ctx, vec![file]);
    true
}

pub fn handle_capture_failed(app: &mut App, ctx: &Context<App>, message: String) -> bool {
    app.notify(ctx, Severity::Error, format!("Photo capture failed: {message}"));
    app.camera = if app.stream.is_some() {
        CameraPhase::Streaming
    } else {
        CameraPhase::Idle
    };
    true
}

pub fn handle_drop(app: &mut App, ctx: &Context<App>, event: DragEvent) -> bool {
    event.prevent_default();
    app.is_dragging = false;
    if let Some(files) = event.data_transfer().and_then(|dt| dt.files()) {
        let files = files_from_list(&files);
        if !files.is_empty() {
            return handle_photo_picked(app, ctx, files);
        }
    }
    true
}

/// Entry point for every photo source: file input, drag-drop and camera.
/// Validation failures are reported inline and never reach the network.
pub fn handle_photo_picked(app: &mut App, ctx: &Context<App>, files: Vec<GlooFile>) -> bool {
    let Some(file) = files.into_iter().next() else {
        return false;
    };
    if let Err(rejection) = validate_photo(&file.raw_mime_type(), file.size()) {
        app.notify(ctx, Severity::Error, rejection.user_message());
        return true;
    }

    app.busy = Some("Uploading your photo...".to_string());
    let preview = ObjectUrl::from(file.clone());
    let link = ctx.link().clone();
    let retry_link = link.clone();
    spawn_local(async move {
        let on_retry = move |attempt| retry_link.send_message(Msg::RetryNotice(attempt));
        match api::upload_photo(file, on_retry).await {
            Ok(session_id) => link.send_message(Msg::UploadDone {
                session_id,
                preview,
            }),
            Err(err) => link.send_message(Msg::UploadFailed(err.to_string())),
        }
    });
    true
}

pub fn handle_upload_done(
    app: &mut App,
    ctx: &Context<App>,
    session_id: String,
    preview: ObjectUrl,
) -> bool {
    app.busy = None;
    log::info!("photo confirmed, session {session_id}");
    app.photo_url = Some(preview);
    app.flow.confirm_photo(session_id);
    app.notify(ctx, Severity::Success, "Photo uploaded successfully!");
    true
}

pub fn handle_upload_failed(app: &mut App, ctx: &Context<App>, message: String) -> bool {
    app.busy = None;
    app.notify(ctx, Severity::Error, format!("Failed to upload image: {message}"));
    true
}

pub fn handle_retry_notice(app: &mut App, ctx: &Context<App>, attempt: u32) -> bool {
    app.notify(
        ctx,
        Severity::Warning,
        format!("Request failed, retrying... ({attempt}/{})", api::MAX_ATTEMPTS),
    );
    true
}

pub fn handle_toggle_photo_zoom(app: &mut App) -> bool {
    app.photo_zoom = !app.photo_zoom;
    true
}

/// "Change image" and the post-batch "start over" both come through here.
pub fn handle_change_image(app: &mut App) -> bool {
    app.flow.reset();
    app.photo_url = None;
    app.photo_zoom = false;
    app.busy = None;
    app.poll = None;
    app.batch = BatchPhase::Idle;
    app.batch_status = None;
    app.batch_total = 0;
    app.milestones = MilestoneTracker::new();
    app.redirect_timer = None;
    release_camera(app);
    app.tab = InputTab::Upload;
    true
}

pub fn handle_start_over(app: &mut App, ctx: &Context<App>) -> bool {
    handle_change_image(app);
    app.notify(
        ctx,
        Severity::Info,
        "Starting fresh! Upload a new photo to begin.",
    );
    true
}

pub fn handle_select_item(app: &mut App, filename: String) -> bool {
    app.flow.select_item(filename);
    true
}

/// Single try-on, reached from the per-card button (`explicit` set) or the
/// shared action button (`explicit` empty).
pub fn handle_try_on(app: &mut App, ctx: &Context<App>, explicit: Option<String>) -> bool {
    let (session_id, item) = match app.flow.request_try_on(explicit) {
        Ok(target) => target,
        Err(denial) => return refuse(app, ctx, denial),
    };

    app.busy = Some("Creating your virtual try-on...".to_string());
    let link = ctx.link().clone();
    let retry_link = link.clone();
    spawn_local(async move {
        let on_retry = move |attempt| retry_link.send_message(Msg::RetryNotice(attempt));
        match api::try_on(session_id, item, on_retry).await {
            Ok(result_filename) => link.send_message(Msg::TryOnDone(result_filename)),
            Err(err) => link.send_message(Msg::TryOnFailed(err.to_string())),
        }
    });
    true
}

pub fn handle_try_on_done(app: &mut App, ctx: &Context<App>, result_filename: String) -> bool {
    app.busy = None;
    if !app.flow.has_session() {
        // the user restarted while the request was in flight
        return false;
    }
    app.flow.show_single_result(result_filename);
    app.notify(ctx, Severity::Success, "Try-on completed successfully!");
    true
}

pub fn handle_try_on_failed(app: &mut App, ctx: &Context<App>, message: String) -> bool {
    app.busy = None;
    app.notify(ctx, Severity::Error, format!("Try-on failed: {message}"));
    true
}

pub fn handle_download_result(
    app: &mut App,
    ctx: &Context<App>,
    href: String,
    filename: String,
) -> bool {
    super::utils::trigger_download(&href, &filename);
    app.notify(ctx, Severity::Success, "Download started!");
    true
}

pub fn handle_try_another(app: &mut App) -> bool {
    app.flow.back_to_gallery();
    true
}

pub fn handle_try_all(app: &mut App, ctx: &Context<App>) -> bool {
    let session_id = match app.flow.request_batch() {
        Ok(session_id) => session_id,
        Err(denial) => return refuse(app, ctx, denial),
    };

    // one poll timer per session: clear any leftover loop before starting
    app.poll = None;
    app.batch = BatchPhase::Idle;

    let link = ctx.link().clone();
    let retry_link = link.clone();
    spawn_local(async move {
        let on_retry = move |attempt| retry_link.send_message(Msg::RetryNotice(attempt));
        match api::try_all(session_id, on_retry).await {
            Ok(total_items) => link.send_message(Msg::BatchStarted(total_items)),
            Err(err) => link.send_message(Msg::BatchStartFailed(err.to_string())),
        }
    });
    true
}

pub fn handle_batch_started(app: &mut App, ctx: &Context<App>, total_items: u32) -> bool {
    let Some(session_id) = app.flow.session_id().map(str::to_string) else {
        return false;
    };

    app.flow.enter_batch();
    app.batch = BatchPhase::Polling;
    app.batch_total = total_items;
    app.batch_status = None;
    app.milestones = MilestoneTracker::new();

    let link = ctx.link().clone();
    app.poll = Some(Interval::new(POLL_INTERVAL_MS, move || {
        let link = link.clone();
        let session_id = session_id.clone();
        spawn_local(async move {
            let outcome = api::batch_status(&session_id).await;
            link.send_message(Msg::PollTick {
                session_id,
                outcome,
            });
        });
    }));

    app.notify(
        ctx,
        Severity::Info,
        format!("Starting batch processing for {total_items} items"),
    );
    true
}

pub fn handle_batch_start_failed(app: &mut App, ctx: &Context<App>, message: String) -> bool {
    app.notify(ctx, Severity::Error, format!("Failed to start try-all: {message}"));
    true
}

pub fn handle_poll_tick(
    app: &mut App,
    ctx: &Context<App>,
    session_id: String,
    outcome: Result<BatchStatus, ApiError>,
) -> bool {
    // drop ticks that resolved after cancel/failure or for a stale session
    if !app.batch.accepts_tick() || app.flow.session_id() != Some(session_id.as_str()) {
        return false;
    }

    match outcome {
        Ok(status) => {
            for milestone in app.milestones.advance(status.progress_percentage) {
                app.notify(ctx, Severity::Info, milestone.message());
            }
            let completed = status.is_completed();
            app.batch_status = Some(status);
            if completed {
                app.poll = None;
                app.batch = BatchPhase::Completed;
                app.notify(
                    ctx,
                    Severity::Success,
                    "All items processed! Redirecting to results...",
                );
                let link = ctx.link().clone();
                app.redirect_timer = Some(Timeout::new(REDIRECT_DELAY_MS, move || {
                    link.send_message(Msg::RedirectToResults);
                }));
            }
            true
        }
        Err(err) => {
            app.poll = None;
            app.batch = BatchPhase::Failed;
            app.flow.leave_batch();
            app.notify(ctx, Severity::Error, format!("Error tracking progress: {err}"));
            true
        }
    }
}

pub fn handle_cancel_batch(app: &mut App, ctx: &Context<App>) -> bool {
    if !app.batch.is_active() {
        return false;
    }
    app.poll = None;
    app.batch = BatchPhase::Cancelled;
    app.flow.leave_batch();
    app.notify(ctx, Severity::Info, "Processing cancelled");
    true
}

pub fn handle_redirect_to_results(app: &App) -> bool {
    if app.batch != BatchPhase::Completed {
        return false;
    }
    if let (Some(window), Some(session_id)) = (web_sys::window(), app.flow.session_id()) {
        let _ = window
            .location()
            .set_href(&format!("/try-all-results/{session_id}"));
    }
    false
}

pub fn handle_carousel_prev(app: &mut App, ctx: &Context<App>) -> bool {
    step_carousel(app, ctx, |app| app.carousel.prev())
}

pub fn handle_carousel_next(app: &mut App, ctx: &Context<App>) -> bool {
    step_carousel(app, ctx, |app| app.carousel.next())
}

pub fn handle_carousel_jump(app: &mut App, ctx: &Context<App>, index: usize) -> bool {
    step_carousel(app, ctx, move |app| app.carousel.jump(index))
}

fn step_carousel(app: &mut App, ctx: &Context<App>, step: impl FnOnce(&mut App) -> bool) -> bool {
    if app.transition_lock {
        return false;
    }
    let changed = step(app);
    if changed {
        lock_transitions(app, ctx);
    }
    changed
}

fn lock_transitions(app: &mut App, ctx: &Context<App>) {
    app.transition_lock = true;
    let link = ctx.link().clone();
    app.lock_timer = Some(Timeout::new(TRANSITION_LOCK_MS, move || {
        link.send_message(Msg::CarouselUnlock);
    }));
}

pub fn handle_carousel_unlock(app: &mut App) -> bool {
    app.transition_lock = false;
    app.lock_timer = None;
    false
}

pub fn handle_drag_start(app: &mut App, x: f64) -> bool {
    if app.transition_lock {
        return false;
    }
    app.drag_origin = Some(x);
    app.drag_delta = 0.0;
    true
}

pub fn handle_drag_move(app: &mut App, x: f64) -> bool {
    let Some(origin) = app.drag_origin else {
        return false;
    };
    app.drag_delta = x - origin;
    true
}

pub fn handle_drag_end(app: &mut App, ctx: &Context<App>) -> bool {
    if app.drag_origin.take().is_none() {
        return false;
    }
    let delta = std::mem::take(&mut app.drag_delta);
    if app.carousel.apply_release(delta) {
        lock_transitions(app, ctx);
    }
    true
}

/// Re-reads viewport and slide widths; cheap no-op when nothing changed.
pub fn handle_carousel_measure(app: &mut App) -> bool {
    let Some(viewport) = app.viewport_ref.cast::<HtmlElement>() else {
        return false;
    };
    let container_width = viewport.offset_width() as f64;
    let slide_width = viewport
        .query_selector(".carousel-slide")
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .map(|el| el.offset_width() as f64)
        .unwrap_or(0.0);

    let before = app.carousel.clone();
    app.carousel.measure(container_width, slide_width);
    app.carousel != before
}

pub fn handle_escape(app: &mut App, ctx: &Context<App>) -> bool {
    if app.photo_zoom {
        app.photo_zoom = false;
        return true;
    }
    if app.batch.is_active() {
        return handle_cancel_batch(app, ctx);
    }
    false
}

pub fn handle_pulse_ended(app: &mut App) -> bool {
    app.pulse_upload = false;
    app.pulse_timer = None;
    true
}

/// `beforeunload` and component teardown: no timer or camera stream may
/// outlive the page.
pub fn handle_release_resources(app: &mut App) -> bool {
    app.poll = None;
    app.redirect_timer = None;
    release_camera(app);
    false
}

fn release_camera(app: &mut App) {
    if let Some(stream) = app.stream.take() {
        camera::stop_stream(&stream);
    }
    app.camera = CameraPhase::Idle;
}

fn refuse(app: &mut App, ctx: &Context<App>, denial: FlowDenial) -> bool {
    match denial {
        FlowDenial::NoSession => {
            app.notify(ctx, Severity::Warning, "Please upload your photo first");
            app.pulse_upload = true;
            let link = ctx.link().clone();
            app.pulse_timer = Some(Timeout::new(UPLOAD_PULSE_MS, move || {
                link.send_message(Msg::PulseEnded);
            }));
        }
        FlowDenial::NoSelection => {
            app.notify(
                ctx,
                Severity::Warning,
                "Please select a clothing item to try on",
            );
        }
    }
    true
}
