use yew::prelude::*;

use super::super::{App, Msg};

/// Poll cadence against `/try-all-status/{session_id}`.
pub const POLL_INTERVAL_MS: u32 = 2000;
/// Pause between completion and navigating to the results page.
pub const REDIRECT_DELAY_MS: u32 = 1500;

pub fn render_progress(app: &App, ctx: &Context<App>) -> Html {
    let link = ctx.link();
    let percentage = app
        .batch_status
        .as_ref()
        .map(|status| status.progress_percentage)
        .unwrap_or(0.0);
    let detail = match &app.batch_status {
        Some(status) => format!(
            "Processing {}/{} items ({} successful, {} failed)",
            status.total_processed,
            status.total_items,
            status.completed_items,
            status.failed_items
        ),
        None => "Starting...".to_string(),
    };

    html! {
        <section class="progress-section">
            <h2 class="progress-title">
                { format!("Trying on all {} clothes...", app.batch_total) }
            </h2>
            <div class="progress-bar" role="progressbar" aria-label="Processing progress indicator">
                <div
                    class="progress-fill"
                    style={format!("width: {percentage}%;")}
                />
            </div>
            <p class="progress-text">{ detail }</p>
            <button class="btn btn-secondary" onclick={link.callback(|_| Msg::CancelBatch)}>
                <i class="fa-solid fa-ban"></i>{" Cancel"}
            </button>
        </section>
    }
}
