use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::HtmlAnchorElement;
use yew::prelude::*;

pub fn result_url(filename: &str) -> String {
    format!("/result/{filename}")
}

pub fn user_photo_url(session_id: &str) -> String {
    format!("/upload/{session_id}_user.jpg")
}

pub fn clothing_url(filename: &str) -> String {
    format!("/clothes/{filename}")
}

pub fn download_name(item_name: &str) -> String {
    format!("virtual_tryon_item_{item_name}.jpg")
}

/// Triggers a browser download by clicking a synthesized anchor.
pub fn trigger_download(href: &str, filename: &str) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Ok(element) = document.create_element("a") else {
        return;
    };
    let Ok(anchor) = element.dyn_into::<HtmlAnchorElement>() else {
        return;
    };
    anchor.set_href(href);
    anchor.set_download(filename);
    if let Some(body) = document.body() {
        let _ = body.append_child(&anchor);
        anchor.click();
        let _ = body.remove_child(&anchor);
    }
}

// Debounce function to limit button events
pub fn debounce<F>(duration: u32, callback: F) -> Callback<MouseEvent>
where
    F: Fn() + Clone + 'static,
{
    let timeout = Rc::new(RefCell::new(None::<Timeout>));

    Callback::from(move |_| {
        let mut timeout_ref = timeout.borrow_mut();

        if let Some(old_timeout) = timeout_ref.take() {
            old_timeout.cancel();
        }

        let inner_callback = callback.clone();
        *timeout_ref = Some(Timeout::new(duration, move || {
            inner_callback();
        }));
    })
}

pub fn render_loading_overlay(message: &Option<String>) -> Html {
    match message {
        Some(text) => html! {
            <div class="loading-overlay">
                <div class="loading-box">
                    <i class="fa-solid fa-spinner fa-spin fa-2x"></i>
                    <p>{ text }</p>
                </div>
            </div>
        },
        None => html! {},
    }
}
