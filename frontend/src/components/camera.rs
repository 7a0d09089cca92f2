use gloo_file::File as GlooFile;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};
use yew::prelude::*;

use super::super::{App, Msg};

/// Camera lifecycle on the capture tab.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CameraPhase {
    #[default]
    Idle,
    RequestingPermission,
    Streaming,
    Captured,
}

/// Encoder quality for captured frames.
const JPEG_QUALITY: f64 = 0.8;

/// What to do with a stream that just resolved from a pending
/// `getUserMedia` request. Leaving and re-entering the camera tab while the
/// permission prompt is up spawns a second acquisition, so two requests can
/// be in flight at once; at most one stream may end up live.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrivingStream {
    /// The camera tab was left while the request was pending.
    Discard,
    /// An earlier acquisition already resolved; it must be stopped before
    /// this one takes its place.
    Replace,
    Adopt,
}

pub fn resolve_arrival(on_camera_tab: bool, stream_already_live: bool) -> ArrivingStream {
    if !on_camera_tab {
        ArrivingStream::Discard
    } else if stream_already_live {
        ArrivingStream::Replace
    } else {
        ArrivingStream::Adopt
    }
}

fn constraints_for(facing: &str) -> MediaStreamConstraints {
    let video = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&video, &"facingMode".into(), &facing.into());
    let ideal = |value: f64| {
        let setting = js_sys::Object::new();
        let _ = js_sys::Reflect::set(&setting, &"ideal".into(), &value.into());
        setting
    };
    let _ = js_sys::Reflect::set(&video, &"width".into(), &ideal(1280.0));
    let _ = js_sys::Reflect::set(&video, &"height".into(), &ideal(720.0));

    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&video.into());
    constraints
}

fn describe(err: JsValue) -> String {
    err.dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .unwrap_or_else(|| format!("{err:?}"))
}

/// Requests the environment-facing camera, falling back to the user-facing
/// one when the first request is refused or unavailable.
pub async fn acquire_stream() -> Result<MediaStream, String> {
    let devices = web_sys::window()
        .ok_or_else(|| "no window".to_string())?
        .navigator()
        .media_devices()
        .map_err(describe)?;

    let mut last_error = String::new();
    for facing in ["environment", "user"] {
        let promise = match devices.get_user_media_with_constraints(&constraints_for(facing)) {
            Ok(promise) => promise,
            Err(err) => {
                last_error = describe(err);
                continue;
            }
        };
        match JsFuture::from(promise).await {
            Ok(value) => {
                return value
                    .dyn_into::<MediaStream>()
                    .map_err(|_| "unexpected getUserMedia result".to_string());
            }
            Err(err) => last_error = describe(err),
        }
    }
    Err(last_error)
}

/// Stops every track so the device light goes off immediately.
pub fn stop_stream(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        track.unchecked_into::<MediaStreamTrack>().stop();
    }
}

/// Draws the current video frame onto a canvas and encodes it as a JPEG
/// file named like an uploaded photo.
pub async fn capture_frame(video: HtmlVideoElement) -> Result<GlooFile, String> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| "no document".to_string())?;
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(describe)?
        .dyn_into()
        .map_err(|_| "canvas creation failed".to_string())?;
    canvas.set_width(video.video_width());
    canvas.set_height(video.video_height());

    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into().ok())
        .ok_or_else(|| "2d canvas context unavailable".to_string())?;
    context
        .draw_image_with_html_video_element(&video, 0.0, 0.0)
        .map_err(describe)?;

    let canvas_ref = canvas.clone();
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let _ = canvas_ref.to_blob_with_type_and_encoder_options(
            &resolve,
            "image/jpeg",
            &JsValue::from(JPEG_QUALITY),
        );
    });
    let blob: web_sys::Blob = JsFuture::from(promise)
        .await
        .map_err(describe)?
        .dyn_into()
        .map_err(|_| "capture produced no image".to_string())?;

    Ok(GlooFile::new_with_options(
        "camera_capture.jpg",
        gloo_file::Blob::from(blob),
        Some("image/jpeg"),
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrival_off_the_camera_tab_is_discarded() {
        assert_eq!(resolve_arrival(false, false), ArrivingStream::Discard);
        assert_eq!(resolve_arrival(false, true), ArrivingStream::Discard);
    }

    #[test]
    fn racing_acquisitions_never_leave_two_streams_live() {
        // tab left and re-entered during the permission prompt: the first
        // acquisition resolves and is adopted...
        assert_eq!(resolve_arrival(true, false), ArrivingStream::Adopt);
        // ...then the second resolves and must replace it, not pile on
        assert_eq!(resolve_arrival(true, true), ArrivingStream::Replace);
    }
}

pub fn render_camera_panel(app: &App, ctx: &Context<App>) -> Html {
    let link = ctx.link();
    html! {
        <div class="camera-section">
            {
                match app.camera {
                    CameraPhase::RequestingPermission => html! {
                        <p class="camera-hint">{"Waiting for camera permission..."}</p>
                    },
                    _ => html! {},
                }
            }
            <video
                ref={app.video_ref.clone()}
                class="camera-preview"
                autoplay=true
                playsinline=true
                muted=true
                aria-label="Camera preview for photo capture"
            />
            <div class="camera-controls">
                <button
                    class="btn btn-primary capture-btn"
                    disabled={app.camera != CameraPhase::Streaming}
                    onclick={link.callback(|_| Msg::CapturePhoto)}
                >
                    <i class="fa-solid fa-camera"></i>{" Capture Photo"}
                </button>
                <button
                    class="btn btn-secondary"
                    onclick={link.callback(|_| Msg::SwitchTab(super::upload::InputTab::Upload))}
                >
                    <i class="fa-solid fa-xmark"></i>{" Close Camera"}
                </button>
            </div>
        </div>
    }
}
