use gloo_timers::callback::Timeout;
use yew::prelude::*;

/// How long a toast stays up before auto-dismissing.
pub const TOAST_DURATION_MS: u32 = 5000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

impl Severity {
    pub fn icon(self) -> &'static str {
        match self {
            Severity::Success => "✓",
            Severity::Error => "✗",
            Severity::Info => "ℹ",
            Severity::Warning => "⚠",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Severity::Success => "toast-success",
            Severity::Error => "toast-error",
            Severity::Info => "toast-info",
            Severity::Warning => "toast-warning",
        }
    }
}

pub struct Toast {
    id: u64,
    severity: Severity,
    message: String,
    // Dropped (and thereby cancelled) together with the toast.
    _auto_dismiss: Timeout,
}

/// Stack of transient notifications. New toasts append; each removes itself
/// after [`TOAST_DURATION_MS`] unless dismissed first.
#[derive(Default)]
pub struct ToastStack {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl ToastStack {
    pub fn push(&mut self, severity: Severity, message: impl Into<String>, on_expire: Callback<u64>) {
        let id = self.next_id;
        self.next_id += 1;
        let auto_dismiss = Timeout::new(TOAST_DURATION_MS, move || on_expire.emit(id));
        self.toasts.push(Toast {
            id,
            severity,
            message: message.into(),
            _auto_dismiss: auto_dismiss,
        });
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        self.toasts.len() != before
    }

    pub fn render(&self, on_dismiss: &Callback<u64>) -> Html {
        html! {
            <div class="toast-container">
                { for self.toasts.iter().map(|toast| {
                    let id = toast.id;
                    let on_dismiss = on_dismiss.clone();
                    html! {
                        <div class={classes!("toast", toast.severity.css_class())} key={id.to_string()}>
                            <span class="toast-icon">{ toast.severity.icon() }</span>
                            <span class="toast-message">{ &toast.message }</span>
                            <button
                                class="toast-close"
                                aria-label="Dismiss notification"
                                onclick={Callback::from(move |_| on_dismiss.emit(id))}
                            >
                                {"×"}
                            </button>
                        </div>
                    }
                })}
            </div>
        }
    }
}
