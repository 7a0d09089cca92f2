use gloo_events::EventListener;
use gloo_timers::callback::Timeout;
use shared::{BatchFailure, BatchResult, BatchResults};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::KeyboardEvent;
use yew::prelude::*;

use super::toast::{Severity, ToastStack};
use super::utils::{download_name, result_url, trigger_download, user_photo_url};
use crate::api::{self, ApiError};

/// Delay between the anchor clicks of a "download all" run, so the
/// browser's download manager is not flooded.
pub const DOWNLOAD_STAGGER_MS: u32 = 300;
/// Fade-out length before the modal swaps to the neighbouring result.
const MODAL_SWAP_MS: u32 = 200;
/// Minimum horizontal swipe to count as modal navigation.
const SWIPE_THRESHOLD: f64 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavDirection {
    Prev,
    Next,
}

#[derive(Properties, PartialEq)]
pub struct ResultsProps {
    pub session_id: String,
}

struct ModalView {
    filename: String,
    item_name: String,
    /// Set while the animate-out step of a navigation is running.
    fading: bool,
}

pub enum ResultsMsg {
    Loaded(Result<BatchResults, ApiError>),
    OpenModal { filename: String, item_name: String },
    CloseModal,
    Navigate(NavDirection),
    SwapTo { filename: String, item_name: String },
    Key(KeyboardEvent),
    TouchStart(f64),
    TouchEnd(f64),
    ToggleOriginalZoom,
    DownloadOne { filename: String, item_name: String },
    DownloadAll,
    DownloadsFinished(usize),
    DismissToast(u64),
}

/// Gallery and modal viewer for one finished batch job, mounted on the
/// `/try-all-results/{session_id}` route.
pub struct ResultsPage {
    data: Option<BatchResults>,
    load_error: Option<String>,
    modal: Option<ModalView>,
    original_zoomed: bool,
    swap_timer: Option<Timeout>,
    touch_start_x: Option<f64>,
    toasts: ToastStack,
    _keydown: EventListener,
}

impl ResultsPage {
    fn notify(&mut self, ctx: &Context<Self>, severity: Severity, message: impl Into<String>) {
        self.toasts
            .push(severity, message, ctx.link().callback(ResultsMsg::DismissToast));
    }

    /// The ordered, non-error result set the modal cycles through.
    fn results(&self) -> &[BatchResult] {
        self.data.as_ref().map(|d| d.results.as_slice()).unwrap_or(&[])
    }

    fn neighbour(&self, direction: NavDirection) -> Option<(String, String)> {
        let results = self.results();
        if results.len() <= 1 {
            return None;
        }
        let shown = self.modal.as_ref()?;
        let current = results
            .iter()
            .position(|r| r.result_filename == shown.filename)?;
        let next = match direction {
            NavDirection::Next => (current + 1) % results.len(),
            NavDirection::Prev => (current + results.len() - 1) % results.len(),
        };
        let target = &results[next];
        Some((target.result_filename.clone(), target.clothing_item.name.clone()))
    }
}

impl Component for ResultsPage {
    type Message = ResultsMsg;
    type Properties = ResultsProps;

    fn create(ctx: &Context<Self>) -> Self {
        let session_id = ctx.props().session_id.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            let outcome = api::batch_results(&session_id).await;
            link.send_message(ResultsMsg::Loaded(outcome));
        });

        let link = ctx.link().clone();
        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("no document");
        let keydown = EventListener::new(&document, "keydown", move |event| {
            if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                link.send_message(ResultsMsg::Key(event.clone()));
            }
        });

        Self {
            data: None,
            load_error: None,
            modal: None,
            original_zoomed: false,
            swap_timer: None,
            touch_start_x: None,
            toasts: ToastStack::default(),
            _keydown: keydown,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            ResultsMsg::Loaded(Ok(data)) => {
                log::info!(
                    "results loaded for session {}: {} ok, {} failed",
                    data.session_id,
                    data.results.len(),
                    data.errors.len()
                );
                self.data = Some(data);
                true
            }
            ResultsMsg::Loaded(Err(err)) => {
                let message = err.to_string();
                self.notify(ctx, Severity::Error, format!("Failed to load results: {message}"));
                self.load_error = Some(message);
                true
            }
            ResultsMsg::OpenModal {
                filename,
                item_name,
            } => {
                self.modal = Some(ModalView {
                    filename,
                    item_name,
                    fading: false,
                });
                true
            }
            ResultsMsg::CloseModal => {
                self.swap_timer = None;
                self.modal.take().is_some()
            }
            ResultsMsg::Navigate(direction) => {
                let Some((filename, item_name)) = self.neighbour(direction) else {
                    return false;
                };
                if let Some(modal) = self.modal.as_mut() {
                    modal.fading = true;
                }
                let link = ctx.link().clone();
                self.swap_timer = Some(Timeout::new(MODAL_SWAP_MS, move || {
                    link.send_message(ResultsMsg::SwapTo {
                        filename,
                        item_name,
                    });
                }));
                true
            }
            ResultsMsg::SwapTo {
                filename,
                item_name,
            } => {
                self.swap_timer = None;
                self.modal = Some(ModalView {
                    filename,
                    item_name,
                    fading: false,
                });
                true
            }
            ResultsMsg::Key(event) => self.handle_key(ctx, event),
            ResultsMsg::TouchStart(x) => {
                if self.modal.is_some() {
                    self.touch_start_x = Some(x);
                }
                false
            }
            ResultsMsg::TouchEnd(x) => {
                let Some(start) = self.touch_start_x.take() else {
                    return false;
                };
                let delta = x - start;
                if delta.abs() > SWIPE_THRESHOLD {
                    let direction = if delta > 0.0 {
                        NavDirection::Prev
                    } else {
                        NavDirection::Next
                    };
                    ctx.link().send_message(ResultsMsg::Navigate(direction));
                }
                false
            }
            ResultsMsg::ToggleOriginalZoom => {
                self.original_zoomed = !self.original_zoomed;
                true
            }
            ResultsMsg::DownloadOne {
                filename,
                item_name,
            } => {
                trigger_download(&result_url(&filename), &download_name(&item_name));
                self.notify(ctx, Severity::Success, format!("Downloading Item {item_name}"));
                true
            }
            ResultsMsg::DownloadAll => self.handle_download_all(ctx),
            ResultsMsg::DownloadsFinished(count) => {
                self.notify(
                    ctx,
                    Severity::Success,
                    format!("All {count} results downloaded successfully!"),
                );
                true
            }
            ResultsMsg::DismissToast(id) => self.toasts.dismiss(id),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        html! {
            <div class="container results-page">
                <header class="app-header">
                    <h1><i class="fa-solid fa-shirt"></i>{" Your Try-On Results"}</h1>
                </header>
                <main class="main-content">
                    { self.render_body(ctx) }
                </main>
                { self.render_modal(ctx) }
                { self.toasts.render(&link.callback(ResultsMsg::DismissToast)) }
            </div>
        }
    }
}

impl ResultsPage {
    fn handle_key(&mut self, ctx: &Context<Self>, event: KeyboardEvent) -> bool {
        if self.modal.is_some() {
            match event.key().as_str() {
                "Escape" => {
                    ctx.link().send_message(ResultsMsg::CloseModal);
                }
                "ArrowLeft" => {
                    ctx.link().send_message(ResultsMsg::Navigate(NavDirection::Prev));
                }
                "ArrowRight" => {
                    ctx.link().send_message(ResultsMsg::Navigate(NavDirection::Next));
                }
                "d" | "D" => {
                    if let Some(modal) = &self.modal {
                        ctx.link().send_message(ResultsMsg::DownloadOne {
                            filename: modal.filename.clone(),
                            item_name: modal.item_name.clone(),
                        });
                    }
                }
                _ => {}
            }
        } else if matches!(event.key().as_str(), "d" | "D") && event.ctrl_key() {
            event.prevent_default();
            ctx.link().send_message(ResultsMsg::DownloadAll);
        }
        false
    }

    fn handle_download_all(&mut self, ctx: &Context<Self>) -> bool {
        let results = self.results().to_vec();
        if results.is_empty() {
            self.notify(ctx, Severity::Warning, "No results to download");
            return true;
        }

        self.notify(
            ctx,
            Severity::Info,
            format!("Downloading {} results...", results.len()),
        );
        let total = results.len();
        for (index, result) in results.into_iter().enumerate() {
            Timeout::new(DOWNLOAD_STAGGER_MS * index as u32, move || {
                trigger_download(
                    &result_url(&result.result_filename),
                    &download_name(&result.clothing_item.name),
                );
            })
            .forget();
        }
        let link = ctx.link().clone();
        Timeout::new(DOWNLOAD_STAGGER_MS * total as u32, move || {
            link.send_message(ResultsMsg::DownloadsFinished(total));
        })
        .forget();
        true
    }

    fn render_body(&self, ctx: &Context<Self>) -> Html {
        if let Some(message) = &self.load_error {
            return html! {
                <section class="results-error">
                    <p>{ message }</p>
                    <a class="btn btn-primary" href="/">{"Back to start"}</a>
                </section>
            };
        }
        let Some(data) = &self.data else {
            return html! {
                <div class="results-loading">
                    <i class="fa-solid fa-spinner fa-spin fa-2x"></i>
                    <p>{"Loading results..."}</p>
                </div>
            };
        };

        let link = ctx.link();
        html! {
            <>
                <section class="results-summary">
                    <h2>{ format!("{} of {} items processed successfully", data.completed_items, data.total_items) }</h2>
                    {
                        if data.failed_items > 0 {
                            html! { <p class="summary-failed">{ format!("{} items failed", data.failed_items) } </p> }
                        } else {
                            html! {}
                        }
                    }
                    <p class="summary-duration">{ format!("Finished in {:.1}s", data.duration) }</p>
                </section>

                <section class="original-section">
                    <h3>{"Your photo"}</h3>
                    <img
                        class={classes!("original-image", self.original_zoomed.then_some("zoomed"))}
                        src={user_photo_url(&ctx.props().session_id)}
                        alt="Your uploaded photo"
                        title="Click to zoom"
                        onclick={link.callback(|_| ResultsMsg::ToggleOriginalZoom)}
                    />
                </section>

                <section class="results-grid-section">
                    <div class="results-grid">
                        { for data.results.iter().map(|result| self.render_card(ctx, result)) }
                        { for data.errors.iter().map(render_error_card) }
                    </div>
                </section>

                <section class="results-actions">
                    <button class="btn btn-primary" onclick={link.callback(|_| ResultsMsg::DownloadAll)}>
                        <i class="fa-solid fa-download"></i>{" Download All"}
                    </button>
                    <a class="btn btn-secondary" href="/">
                        <i class="fa-solid fa-arrow-rotate-left"></i>{" Try Another Photo"}
                    </a>
                </section>
            </>
        }
    }

    fn render_card(&self, ctx: &Context<Self>, result: &BatchResult) -> Html {
        let link = ctx.link();
        let open = {
            let filename = result.result_filename.clone();
            let item_name = result.clothing_item.name.clone();
            link.callback(move |_| ResultsMsg::OpenModal {
                filename: filename.clone(),
                item_name: item_name.clone(),
            })
        };
        let download = {
            let filename = result.result_filename.clone();
            let item_name = result.clothing_item.name.clone();
            link.callback(move |e: MouseEvent| {
                e.stop_propagation();
                ResultsMsg::DownloadOne {
                    filename: filename.clone(),
                    item_name: item_name.clone(),
                }
            })
        };

        html! {
            <div class="result-card" key={result.result_filename.clone()} onclick={open.clone()}>
                <img
                    class="result-image"
                    src={result_url(&result.result_filename)}
                    alt={format!("Try-on result for item {}", result.clothing_item.name)}
                    loading="lazy"
                />
                <div class="result-info">
                    <h4>{ format!("Item {}", result.clothing_item.name) }</h4>
                    <div class="result-overlay">
                        <button class="btn btn-view" title="View full size" onclick={open}>
                            <i class="fa-solid fa-expand"></i>
                        </button>
                        <button class="btn btn-download" title="Download image (D)" onclick={download}>
                            <i class="fa-solid fa-download"></i>
                        </button>
                    </div>
                </div>
            </div>
        }
    }

    fn render_modal(&self, ctx: &Context<Self>) -> Html {
        let Some(modal) = &self.modal else {
            return html! {};
        };
        let link = ctx.link();
        let many = self.results().len() > 1;

        let on_touch_start = link.batch_callback(|e: TouchEvent| {
            e.changed_touches()
                .get(0)
                .map(|touch| ResultsMsg::TouchStart(touch.screen_x() as f64))
        });
        let on_touch_end = link.batch_callback(|e: TouchEvent| {
            e.changed_touches()
                .get(0)
                .map(|touch| ResultsMsg::TouchEnd(touch.screen_x() as f64))
        });

        html! {
            <div
                class="modal-overlay"
                onclick={link.callback(|_| ResultsMsg::CloseModal)}
                ontouchstart={on_touch_start}
                ontouchend={on_touch_end}
            >
                <div class="modal-body" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
                    <div class="modal-header">
                        <h3>{ format!("Try-On Result - Item {}", modal.item_name) }</h3>
                        <button
                            class="modal-close"
                            aria-label="Close"
                            onclick={link.callback(|_| ResultsMsg::CloseModal)}
                        >
                            {"×"}
                        </button>
                    </div>
                    <img
                        class={classes!("modal-image", if modal.fading { "fade-out" } else { "fade-in" })}
                        src={result_url(&modal.filename)}
                        alt={format!("Full size try-on result for item {}", modal.item_name)}
                    />
                    <div class="modal-actions">
                        {
                            if many {
                                html! {
                                    <button
                                        class="btn btn-secondary"
                                        onclick={link.callback(|_| ResultsMsg::Navigate(NavDirection::Prev))}
                                    >
                                        <i class="fa-solid fa-chevron-left"></i>{" Previous"}
                                    </button>
                                }
                            } else {
                                html! {}
                            }
                        }
                        <button
                            class="btn btn-primary"
                            onclick={{
                                let filename = modal.filename.clone();
                                let item_name = modal.item_name.clone();
                                link.callback(move |_| ResultsMsg::DownloadOne {
                                    filename: filename.clone(),
                                    item_name: item_name.clone(),
                                })
                            }}
                        >
                            <i class="fa-solid fa-download"></i>{" Download"}
                        </button>
                        {
                            if many {
                                html! {
                                    <button
                                        class="btn btn-secondary"
                                        onclick={link.callback(|_| ResultsMsg::Navigate(NavDirection::Next))}
                                    >
                                        {"Next "}<i class="fa-solid fa-chevron-right"></i>
                                    </button>
                                }
                            } else {
                                html! {}
                            }
                        }
                    </div>
                    {
                        if many {
                            html! {
                                <p class="modal-navigation">{"Use arrow keys or swipe to navigate"}</p>
                            }
                        } else {
                            html! {}
                        }
                    }
                </div>
            </div>
        }
    }
}

fn render_error_card(failure: &BatchFailure) -> Html {
    html! {
        <div class="result-card error-card" key={failure.clothing_item.filename.clone()}>
            <div class="error-card-body">
                <i class="fa-solid fa-circle-exclamation"></i>
                <h4>{ format!("Item {}", failure.clothing_item.name) }</h4>
                <p class="error-card-message">{ &failure.error }</p>
            </div>
        </div>
    }
}
