use gloo_events::EventListener;
use gloo_file::{File as GlooFile, ObjectUrl};
use gloo_timers::callback::{Interval, Timeout};
use shared::{BatchPhase, BatchStatus, CarouselState, CatalogItem, MilestoneTracker, SessionFlow, Stage};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{DragEvent, HtmlVideoElement, KeyboardEvent, MediaStream};
use yew::prelude::*;

mod api;
mod components;

use api::ApiError;
use components::camera::CameraPhase;
use components::results::{ResultsPage, ResultsProps};
use components::toast::{Severity, ToastStack};
use components::upload::InputTab;
use components::{gallery, handlers, progress, upload, utils};

pub enum Msg {
    CatalogLoaded(Result<Vec<CatalogItem>, ApiError>),
    // photo input
    SwitchTab(InputTab),
    SetDragging(bool),
    HandleDrop(DragEvent),
    PhotoPicked(Vec<GlooFile>),
    RetryNotice(u32),
    UploadDone { session_id: String, preview: ObjectUrl },
    UploadFailed(String),
    TogglePhotoZoom,
    ChangeImage,
    // camera
    CameraReady(MediaStream),
    CameraFailed(String),
    CapturePhoto,
    PhotoCaptured(GlooFile),
    CaptureFailed(String),
    // try-on
    SelectItem(String),
    TryOnSelected,
    TryOnItem(String),
    TryOnDone(String),
    TryOnFailed(String),
    DownloadResult { href: String, filename: String },
    TryAnother,
    StartOver,
    // batch
    TryAll,
    BatchStarted(u32),
    BatchStartFailed(String),
    PollTick { session_id: String, outcome: Result<BatchStatus, ApiError> },
    CancelBatch,
    RedirectToResults,
    // carousel
    CarouselPrev,
    CarouselNext,
    CarouselJump(usize),
    DragStart(f64),
    DragMove(f64),
    DragEnd,
    CarouselMeasure,
    CarouselUnlock,
    // housekeeping
    PulseEnded,
    EscapePressed,
    ReleaseResources,
    DismissToast(u64),
}

/// Root component of the main page. All state lives here; the component
/// modules render slices of it and the `handlers` module mutates it.
pub struct App {
    pub flow: SessionFlow,
    pub catalog: Vec<CatalogItem>,

    // photo input
    pub tab: InputTab,
    pub is_dragging: bool,
    pub busy: Option<String>,
    pub photo_url: Option<ObjectUrl>,
    pub photo_zoom: bool,
    pub pulse_upload: bool,
    pub pulse_timer: Option<Timeout>,

    // camera
    pub camera: CameraPhase,
    pub stream: Option<MediaStream>,
    pub video_ref: NodeRef,

    // carousel
    pub carousel: CarouselState,
    pub viewport_ref: NodeRef,
    pub drag_origin: Option<f64>,
    pub drag_delta: f64,
    pub transition_lock: bool,
    pub lock_timer: Option<Timeout>,
    gallery_measured: bool,

    // batch progress
    pub batch: BatchPhase,
    pub batch_status: Option<BatchStatus>,
    pub batch_total: u32,
    pub milestones: MilestoneTracker,
    pub poll: Option<Interval>,
    pub redirect_timer: Option<Timeout>,

    pub toasts: ToastStack,

    _resize_listener: EventListener,
    _keydown_listener: EventListener,
    _unload_listener: EventListener,
}

impl App {
    pub fn notify(&mut self, ctx: &Context<Self>, severity: Severity, message: impl Into<String>) {
        self.toasts
            .push(severity, message, ctx.link().callback(Msg::DismissToast));
    }
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        spawn_local(async move {
            link.send_message(Msg::CatalogLoaded(api::fetch_catalog().await));
        });

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let link = ctx.link().clone();
        let resize = EventListener::new(&window, "resize", move |_| {
            link.send_message(Msg::CarouselMeasure);
        });
        let link = ctx.link().clone();
        let keydown = EventListener::new(&document, "keydown", move |event| {
            if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                if event.key() == "Escape" {
                    link.send_message(Msg::EscapePressed);
                }
            }
        });
        let link = ctx.link().clone();
        let unload = EventListener::new(&window, "beforeunload", move |_| {
            link.send_message(Msg::ReleaseResources);
        });

        Self {
            flow: SessionFlow::new(),
            catalog: Vec::new(),
            tab: InputTab::default(),
            is_dragging: false,
            busy: None,
            photo_url: None,
            photo_zoom: false,
            pulse_upload: false,
            pulse_timer: None,
            camera: CameraPhase::default(),
            stream: None,
            video_ref: NodeRef::default(),
            carousel: CarouselState::new(0),
            viewport_ref: NodeRef::default(),
            drag_origin: None,
            drag_delta: 0.0,
            transition_lock: false,
            lock_timer: None,
            gallery_measured: false,
            batch: BatchPhase::default(),
            batch_status: None,
            batch_total: 0,
            milestones: MilestoneTracker::new(),
            poll: None,
            redirect_timer: None,
            toasts: ToastStack::default(),
            _resize_listener: resize,
            _keydown_listener: keydown,
            _unload_listener: unload,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::CatalogLoaded(outcome) => handlers::handle_catalog_loaded(self, ctx, outcome),
            Msg::SwitchTab(tab) => handlers::handle_switch_tab(self, ctx, tab),
            Msg::SetDragging(dragging) => {
                let changed = self.is_dragging != dragging;
                self.is_dragging = dragging;
                changed
            }
            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::PhotoPicked(files) => handlers::handle_photo_picked(self, ctx, files),
            Msg::RetryNotice(attempt) => handlers::handle_retry_notice(self, ctx, attempt),
            Msg::UploadDone {
                session_id,
                preview,
            } => handlers::handle_upload_done(self, ctx, session_id, preview),
            Msg::UploadFailed(message) => handlers::handle_upload_failed(self, ctx, message),
            Msg::TogglePhotoZoom => handlers::handle_toggle_photo_zoom(self),
            Msg::ChangeImage => handlers::handle_change_image(self),
            Msg::CameraReady(stream) => handlers::handle_camera_ready(self, stream),
            Msg::CameraFailed(message) => handlers::handle_camera_failed(self, ctx, message),
            Msg::CapturePhoto => handlers::handle_capture_photo(self, ctx),
            Msg::PhotoCaptured(file) => handlers::handle_photo_captured(self, ctx, file),
            Msg::CaptureFailed(message) => handlers::handle_capture_failed(self, ctx, message),
            Msg::SelectItem(filename) => handlers::handle_select_item(self, filename),
            Msg::TryOnSelected => handlers::handle_try_on(self, ctx, None),
            Msg::TryOnItem(filename) => handlers::handle_try_on(self, ctx, Some(filename)),
            Msg::TryOnDone(result_filename) => {
                handlers::handle_try_on_done(self, ctx, result_filename)
            }
            Msg::TryOnFailed(message) => handlers::handle_try_on_failed(self, ctx, message),
            Msg::DownloadResult { href, filename } => {
                handlers::handle_download_result(self, ctx, href, filename)
            }
            Msg::TryAnother => handlers::handle_try_another(self),
            Msg::StartOver => handlers::handle_start_over(self, ctx),
            Msg::TryAll => handlers::handle_try_all(self, ctx),
            Msg::BatchStarted(total_items) => handlers::handle_batch_started(self, ctx, total_items),
            Msg::BatchStartFailed(message) => {
                handlers::handle_batch_start_failed(self, ctx, message)
            }
            Msg::PollTick {
                session_id,
                outcome,
            } => handlers::handle_poll_tick(self, ctx, session_id, outcome),
            Msg::CancelBatch => handlers::handle_cancel_batch(self, ctx),
            Msg::RedirectToResults => handlers::handle_redirect_to_results(self),
            Msg::CarouselPrev => handlers::handle_carousel_prev(self, ctx),
            Msg::CarouselNext => handlers::handle_carousel_next(self, ctx),
            Msg::CarouselJump(index) => handlers::handle_carousel_jump(self, ctx, index),
            Msg::DragStart(x) => handlers::handle_drag_start(self, x),
            Msg::DragMove(x) => handlers::handle_drag_move(self, x),
            Msg::DragEnd => handlers::handle_drag_end(self, ctx),
            Msg::CarouselMeasure => handlers::handle_carousel_measure(self),
            Msg::CarouselUnlock => handlers::handle_carousel_unlock(self),
            Msg::PulseEnded => handlers::handle_pulse_ended(self),
            Msg::EscapePressed => handlers::handle_escape(self, ctx),
            Msg::ReleaseResources => handlers::handle_release_resources(self),
            Msg::DismissToast(id) => self.toasts.dismiss(id),
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, _first_render: bool) {
        // the <video> element only exists after the camera tab renders
        if self.tab == InputTab::Camera {
            if let (Some(video), Some(stream)) =
                (self.video_ref.cast::<HtmlVideoElement>(), &self.stream)
            {
                if video.src_object().is_none() {
                    video.set_src_object(Some(stream));
                }
            }
        }

        // measure the carousel once its viewport is in the DOM
        if *self.flow.stage() == Stage::Ready {
            if !self.gallery_measured {
                self.gallery_measured = true;
                ctx.link().send_message(Msg::CarouselMeasure);
            }
        } else {
            self.gallery_measured = false;
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        handlers::handle_release_resources(self);
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let body = match self.flow.stage() {
            Stage::ChoosePhoto => upload::render_photo_input(self, ctx),
            Stage::Ready => html! {
                <>
                    { upload::render_confirmed_photo(self, ctx) }
                    { gallery::render_gallery(self, ctx) }
                    { gallery::render_action_buttons(self, ctx) }
                </>
            },
            Stage::Batch => html! {
                <>
                    { upload::render_confirmed_photo(self, ctx) }
                    { progress::render_progress(self, ctx) }
                </>
            },
            Stage::SingleResult { result_filename } => {
                gallery::render_single_result(self, ctx, result_filename)
            }
        };

        html! {
            <div class="container">
                <header class="app-header">
                    <h1><i class="fa-solid fa-shirt"></i>{" Virtual Try-On"}</h1>
                    <p class="tagline">{"Upload a photo and see how the clothes look on you"}</p>
                </header>
                <main class="main-content">
                    { body }
                </main>
                { utils::render_loading_overlay(&self.busy) }
                { self.toasts.render(&link.callback(Msg::DismissToast)) }
            </div>
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());

    let path = web_sys::window()
        .map(|w| w.location().pathname().unwrap_or_default())
        .unwrap_or_default();

    match path
        .strip_prefix("/try-all-results/")
        .filter(|rest| !rest.is_empty())
    {
        Some(session_id) => {
            yew::Renderer::<ResultsPage>::with_props(ResultsProps {
                session_id: session_id.trim_end_matches('/').to_string(),
            })
            .render();
        }
        None => {
            yew::Renderer::<App>::new().render();
        }
    }
}
