use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn StatusPage(code: u16) -> impl IntoView {
    let message = match code {
        401 => "You are not authorized to view this page",
        404 => "Page not found",
        _ => "Something went wrong",
    };

    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="text-center">
                <h1 class="text-6xl font-bold text-error">{code}</h1>
                <p class="text-xl mt-4">{message}</p>
                <A href="/" attr:class="btn btn-primary mt-6">"Back to home"</A>
            </div>
        </div>
    }
}
