//! 通知提示框
//!
//! 非 loading 的提示 3 秒后自动消失。

use std::time::Duration;

use leptos::prelude::*;
use zatca_admin::{Notifier, Toast, ToastId, ToastKind};

const AUTO_DISMISS: Duration = Duration::from_secs(3);

#[derive(Clone, Copy)]
pub struct ToastContext {
    toasts: RwSignal<Vec<(ToastId, Toast)>>,
}

impl ToastContext {
    pub fn new() -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(Toast::success(message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(Toast::error(message));
    }
}

impl Notifier for ToastContext {
    fn notify(&self, toast: Toast) -> ToastId {
        let id = ToastId::new();
        let auto_dismiss = toast.auto_dismiss();
        self.toasts.update(|list| list.push((id, toast)));
        if auto_dismiss {
            let ctx = *self;
            set_timeout(move || ctx.dismiss(id), AUTO_DISMISS);
        }
        id
    }

    fn dismiss(&self, id: ToastId) {
        self.toasts.update(|list| list.retain(|(t, _)| *t != id));
    }
}

pub fn use_toasts() -> ToastContext {
    use_context::<ToastContext>().expect("ToastContext should be provided")
}

#[component]
pub fn ToastHost() -> impl IntoView {
    let ctx = use_toasts();

    view! {
        <div class="toast toast-top toast-end z-50">
            <For
                each=move || ctx.toasts.get()
                key=|(id, _)| *id
                children=move |(_, toast)| {
                    let class = match toast.kind {
                        ToastKind::Success => "alert alert-success shadow-lg",
                        ToastKind::Error => "alert alert-error shadow-lg",
                        ToastKind::Loading => "alert alert-info shadow-lg",
                    };
                    view! {
                        <div class=class>
                            {(toast.kind == ToastKind::Loading)
                                .then(|| view! { <span class="loading loading-spinner loading-sm"></span> })}
                            <span>{toast.message}</span>
                        </div>
                    }
                }
            />
        </div>
    }
}
