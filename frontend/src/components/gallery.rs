use shared::CatalogItem;
use yew::prelude::*;

use super::super::{App, Msg};
use super::carousel::render_carousel;
use super::utils::{clothing_url, result_url, user_photo_url};

/// Clothing gallery: a carousel of catalog slides, one selectable at a time.
pub fn render_gallery(app: &App, ctx: &Context<App>) -> Html {
    if app.catalog.is_empty() {
        return html! {
            <section class="clothing-gallery">
                <h2>{"Pick something to try on"}</h2>
                <p class="gallery-empty">{"No clothing items available right now."}</p>
            </section>
        };
    }

    let slides = app
        .catalog
        .iter()
        .map(|item| render_slide(app, ctx, item))
        .collect::<Vec<_>>();

    html! {
        <section class="clothing-gallery">
            <h2>{"Pick something to try on"}</h2>
            { render_carousel(app, ctx, slides) }
        </section>
    }
}

fn render_slide(app: &App, ctx: &Context<App>, item: &CatalogItem) -> Html {
    let link = ctx.link();
    let selected = app.flow.selected_item() == Some(item.filename.as_str());
    let filename = item.filename.clone();
    let try_on_filename = item.filename.clone();

    html! {
        <div
            class={classes!("carousel-slide", "clothing-item", selected.then_some("selected"))}
            key={item.filename.clone()}
            tabindex="0"
            aria-label={format!("Clothing item {}", item.name)}
            onclick={link.callback(move |_| Msg::SelectItem(filename.clone()))}
        >
            <img src={clothing_url(&item.filename)} alt={item.name.clone()} loading="lazy" />
            <div class="clothing-item-footer">
                <span class="clothing-item-name">{ &item.name }</span>
                <button
                    class="btn btn-try-on"
                    onclick={link.callback(move |e: MouseEvent| {
                        e.stop_propagation();
                        Msg::TryOnItem(try_on_filename.clone())
                    })}
                >
                    <i class="fa-solid fa-shirt"></i>{" Try On"}
                </button>
            </div>
        </div>
    }
}

pub fn render_action_buttons(app: &App, ctx: &Context<App>) -> Html {
    let link = ctx.link();
    html! {
        <div class="action-buttons">
            <button
                class="btn btn-primary"
                onclick={link.callback(|_| Msg::TryAll)}
            >
                <i class="fa-solid fa-wand-magic-sparkles"></i>{" Try All Clothes"}
            </button>
            {
                if app.flow.selected_item().is_some() {
                    html! {
                        <button
                            class="btn btn-accent"
                            onclick={link.callback(|_| Msg::TryOnSelected)}
                        >
                            <i class="fa-solid fa-shirt"></i>{" Try Selected Item"}
                        </button>
                    }
                } else {
                    html! {}
                }
            }
        </div>
    }
}

/// Side-by-side view of the uploaded photo and one produced result.
pub fn render_single_result(app: &App, ctx: &Context<App>, result_filename: &str) -> Html {
    let link = ctx.link();
    let session_id = app.flow.session_id().unwrap_or_default();
    let filename = result_filename.to_string();
    let download_target = result_url(result_filename);

    html! {
        <section class="result-section">
            <h2>{"Your virtual try-on"}</h2>
            <div class="result-comparison">
                <figure>
                    <img src={user_photo_url(session_id)} alt="Original photo" />
                    <figcaption>{"Original"}</figcaption>
                </figure>
                <figure>
                    <img src={result_url(result_filename)} alt="Try-on result" />
                    <figcaption>{"Try-on"}</figcaption>
                </figure>
            </div>
            <div class="result-actions">
                <button
                    class="btn btn-primary"
                    onclick={link.callback(move |_| Msg::DownloadResult {
                        href: download_target.clone(),
                        filename: filename.clone(),
                    })}
                >
                    <i class="fa-solid fa-download"></i>{" Download"}
                </button>
                <button class="btn btn-secondary" onclick={link.callback(|_| Msg::TryAnother)}>
                    <i class="fa-solid fa-arrow-rotate-left"></i>{" Try Another Item"}
                </button>
                <button class="btn btn-ghost" onclick={link.callback(|_| Msg::StartOver)}>
                    <i class="fa-solid fa-house"></i>{" Start Over"}
                </button>
            </div>
        </section>
    }
}
