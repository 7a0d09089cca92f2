use gloo_file::File as GlooFile;
use web_sys::{DragEvent, FileList, HtmlInputElement};
use yew::prelude::*;

use super::super::{App, Msg};
use super::camera;
use super::utils::debounce;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum InputTab {
    #[default]
    Upload,
    Camera,
}

pub fn files_from_list(file_list: &FileList) -> Vec<GlooFile> {
    (0..file_list.length())
        .filter_map(|i| file_list.item(i))
        .map(GlooFile::from)
        .collect()
}

/// The pre-upload state: tab bar plus either the dropzone or the camera.
pub fn render_photo_input(app: &App, ctx: &Context<App>) -> Html {
    let link = ctx.link();
    html! {
        <div class="upload-component">
            <div class="tab-bar" role="tablist">
                <button
                    class={classes!("tab-btn", (app.tab == InputTab::Upload).then_some("active"))}
                    onclick={link.callback(|_| Msg::SwitchTab(InputTab::Upload))}
                >
                    <i class="fa-solid fa-upload"></i>{" Upload Photo"}
                </button>
                <button
                    class={classes!("tab-btn", (app.tab == InputTab::Camera).then_some("active"))}
                    onclick={link.callback(|_| Msg::SwitchTab(InputTab::Camera))}
                >
                    <i class="fa-solid fa-camera"></i>{" Take Photo"}
                </button>
            </div>
            {
                match app.tab {
                    InputTab::Upload => render_dropzone(app, ctx),
                    InputTab::Camera => camera::render_camera_panel(app, ctx),
                }
            }
        </div>
    }
}

fn render_dropzone(app: &App, ctx: &Context<App>) -> Html {
    let link = ctx.link();

    let handle_change = link.batch_callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let files = input.files().map(|list| files_from_list(&list));
        input.set_value("");
        files.filter(|files| !files.is_empty()).map(Msg::PhotoPicked)
    });
    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });
    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });
    let handle_drop = link.callback(Msg::HandleDrop);

    let trigger_file_input = Callback::from(|_| {
        if let Some(input) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("photo-input"))
        {
            if let Ok(html_input) = wasm_bindgen::JsCast::dyn_into::<web_sys::HtmlElement>(input) {
                html_input.click();
            }
        }
    });

    html! {
        <>
            <input
                type="file"
                id="photo-input"
                accept="image/*"
                style="display: none;"
                onchange={handle_change}
            />
            <div
                class={classes!(
                    "upload-area",
                    app.is_dragging.then_some("dragover"),
                    app.pulse_upload.then_some("pulse")
                )}
                role="button"
                aria-label="Click or drag to upload your photo"
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={debounce(300, {
                    let trigger_file_input = trigger_file_input.clone();
                    move || trigger_file_input.emit(())
                })}
            >
                <div class="upload-placeholder">
                    <i class="fa-solid fa-cloud-arrow-up"></i>
                    <p>{"Drag & drop your photo here, or click to browse"}</p>
                    <p class="file-types">{"JPG, PNG or WEBP, up to 16MB"}</p>
                </div>
            </div>
        </>
    }
}

/// The "photo confirmed" state: preview plus the change-image control.
/// Clicking the preview toggles a full-size overlay.
pub fn render_confirmed_photo(app: &App, ctx: &Context<App>) -> Html {
    let link = ctx.link();
    let preview = app
        .photo_url
        .as_ref()
        .map(|url| url.to_string())
        .or_else(|| app.flow.session_id().map(super::utils::user_photo_url));

    html! {
        <div class="user-image-preview">
            {
                match &preview {
                    Some(src) => html! {
                        <img
                            class="user-image enlargeable"
                            src={src.clone()}
                            alt="Your uploaded photo"
                            title="Click to enlarge"
                            onclick={link.callback(|_| Msg::TogglePhotoZoom)}
                        />
                    },
                    None => html! {},
                }
            }
            <button
                class="btn btn-secondary change-image-btn"
                onclick={link.callback(|_| Msg::ChangeImage)}
            >
                <i class="fa-solid fa-rotate"></i>{" Change Image"}
            </button>
            {
                match &preview {
                    Some(src) if app.photo_zoom => html! {
                        <div
                            class="image-preview-overlay"
                            onclick={link.callback(|_| Msg::TogglePhotoZoom)}
                        >
                            <img class="image-preview-full" src={src.clone()} alt="Your uploaded photo, enlarged" />
                        </div>
                    },
                    _ => html! {},
                }
            }
        </div>
    }
}
