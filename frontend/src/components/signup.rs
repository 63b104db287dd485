use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use zatca_admin::auth::validate_registration;
use zatca_admin::{ApiError, AuthService, FieldErrors};
use zatca_shared::graphql::RegisterInput;

use crate::api::{use_api, use_config};
use crate::toast::use_toasts;

/// Account creation. No session is started; the user signs in afterwards.
#[component]
pub fn SignupPage() -> impl IntoView {
    let client = use_api();
    let config = use_config();
    let toasts = use_toasts();
    let navigate = use_navigate();

    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let is_submitting = RwSignal::new(false);
    let errors = RwSignal::new(FieldErrors::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let input = RegisterInput {
            name: name.get_untracked().trim().to_string(),
            email: email.get_untracked().trim().to_string(),
            password: password.get_untracked(),
        };
        if let Err(field_errors) = validate_registration(&input, &confirm.get_untracked()) {
            errors.set(field_errors);
            return;
        }

        is_submitting.set(true);
        errors.set(FieldErrors::new());

        let client = client.clone();
        let geo_echo_url = config.geo_echo_url.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            match AuthService::new(&*client, &geo_echo_url).register(input).await {
                Ok(_) => {
                    toasts.success("Account created, please sign in");
                    navigate("/login", Default::default());
                }
                Err(ApiError::Validation(field_errors)) => errors.set(field_errors),
                Err(e) => toasts.error(e.toast_message()),
            }
            is_submitting.set(false);
        });
    };

    let field = move |id: &'static str, label: &'static str, kind: &'static str, value: RwSignal<String>| {
        view! {
            <div class="form-control">
                <label class="label" for=id>
                    <span class="label-text">{label}</span>
                </label>
                <input
                    id=id
                    type=kind
                    on:input=move |ev| value.set(event_target_value(&ev))
                    prop:value=value
                    class="input input-bordered"
                />
                {move || errors.with(|e| e.get(id).cloned()).map(|msg| view! {
                    <span class="label-text-alt text-error mt-1">{msg}</span>
                })}
            </div>
        }
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">"Create an account"</h1>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        {field("name", "Name", "text", name)}
                        {field("email", "E-mail", "email", email)}
                        {field("password", "Password", "password", password)}
                        {field("confirm", "Confirm password", "password", confirm)}
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                "Sign up"
                            </button>
                        </div>
                        <p class="text-sm text-center mt-2">
                            "Already registered? " <A href="/login" attr:class="link link-primary">"Sign in"</A>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
