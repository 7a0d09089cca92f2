use yew::prelude::*;

use super::super::{App, Msg};

/// Cool-down applied after an index change so overlapping navigation cannot
/// fire while the track animation is in flight.
pub const TRANSITION_LOCK_MS: u32 = 350;

/// Bounded horizontal paginator over the clothing slides. Pure geometry
/// lives in `shared::carousel`; this renders the track at the offset the
/// state dictates and forwards pointer/touch/keyboard input as messages.
pub fn render_carousel(app: &App, ctx: &Context<App>, slides: Vec<Html>) -> Html {
    let link = ctx.link();
    let state = &app.carousel;

    let offset = match app.drag_origin {
        Some(_) => state.drag_offset_px(app.drag_delta),
        None => state.base_offset_px(),
    };
    let track_style = format!(
        "transform: translateX({offset}px);{}",
        if app.drag_origin.is_some() {
            " transition: none;"
        } else {
            ""
        }
    );

    let on_mouse_down = link.callback(|e: MouseEvent| {
        e.prevent_default();
        Msg::DragStart(e.client_x() as f64)
    });
    let on_mouse_move = link.callback(|e: MouseEvent| Msg::DragMove(e.client_x() as f64));
    let on_mouse_up = link.callback(|_: MouseEvent| Msg::DragEnd);
    let on_mouse_leave = link.callback(|_: MouseEvent| Msg::DragEnd);
    let on_touch_start = link.batch_callback(|e: TouchEvent| {
        e.touches()
            .get(0)
            .map(|touch| Msg::DragStart(touch.client_x() as f64))
    });
    let on_touch_move = link.batch_callback(|e: TouchEvent| {
        e.touches()
            .get(0)
            .map(|touch| Msg::DragMove(touch.client_x() as f64))
    });
    let on_touch_end = link.callback(|_: TouchEvent| Msg::DragEnd);
    let on_key_down = link.batch_callback(|e: KeyboardEvent| match e.key().as_str() {
        "ArrowLeft" => {
            e.prevent_default();
            Some(Msg::CarouselPrev)
        }
        "ArrowRight" => {
            e.prevent_default();
            Some(Msg::CarouselNext)
        }
        _ => None,
    });

    html! {
        <div class="clothing-carousel" tabindex="0" onkeydown={on_key_down}>
            <button
                class="carousel-nav carousel-prev"
                aria-label="Previous items"
                disabled={state.at_start()}
                onclick={link.callback(|_| Msg::CarouselPrev)}
            >
                <i class="fa-solid fa-chevron-left"></i>
            </button>

            <div class="carousel-viewport" ref={app.viewport_ref.clone()}>
                <div
                    class={classes!("carousel-track", app.drag_origin.map(|_| "dragging"))}
                    style={track_style}
                    onmousedown={on_mouse_down}
                    onmousemove={on_mouse_move}
                    onmouseup={on_mouse_up}
                    onmouseleave={on_mouse_leave}
                    ontouchstart={on_touch_start}
                    ontouchmove={on_touch_move}
                    ontouchend={on_touch_end}
                >
                    { for slides.into_iter() }
                </div>
            </div>

            <button
                class="carousel-nav carousel-next"
                aria-label="Next items"
                disabled={state.at_end()}
                onclick={link.callback(|_| Msg::CarouselNext)}
            >
                <i class="fa-solid fa-chevron-right"></i>
            </button>

            <div class="carousel-indicators">
                { for (0..state.indicator_count()).map(|index| {
                    let active = index == state.current();
                    html! {
                        <button
                            class={classes!("carousel-indicator", active.then_some("active"))}
                            aria-label={format!("Go to slide {}", index + 1)}
                            onclick={link.callback(move |_| Msg::CarouselJump(index))}
                            key={index.to_string()}
                        />
                    }
                })}
            </div>
        </div>
    }
}
