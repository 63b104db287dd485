use gloo_storage::{LocalStorage, Storage};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use tracing::warn;
use zatca_admin::auth::validate_credentials;
use zatca_admin::{ApiError, AuthService, FieldErrors, SessionAction, post_login_target};

use crate::api::{use_api, use_config};
use crate::auth::use_auth;
use crate::toast::use_toasts;
use crate::use_app_location;

// 只记住上次的邮箱，方便输入；密码从不落盘
const STORAGE_EMAIL_KEY: &str = "zatca_last_email";

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let client = use_api();
    let config = use_config();
    let toasts = use_toasts();
    let navigate = use_navigate();
    let location = use_app_location();

    let (email, set_email) = signal(LocalStorage::get::<String>(STORAGE_EMAIL_KEY).unwrap_or_default());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (errors, set_errors) = signal(FieldErrors::new());

    let error_for = move |field: &'static str| move || errors.with(|e| e.get(field).cloned());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if let Err(field_errors) = validate_credentials(&email.get_untracked(), &password.get_untracked()) {
            set_errors.set(field_errors);
            return;
        }

        set_is_submitting.set(true);
        set_errors.set(FieldErrors::new());

        let client = client.clone();
        let geo_echo_url = config.geo_echo_url.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            let email = email.get_untracked();
            let result = AuthService::new(&*client, &geo_echo_url)
                .login(&email, &password.get_untracked())
                .await;
            match result {
                Ok(user) => {
                    if let Err(e) = LocalStorage::set(STORAGE_EMAIL_KEY, email.trim()) {
                        warn!(error = %e, "could not remember the e-mail");
                    }
                    auth.dispatch(SessionAction::LoginSuccess(user));
                    let target = location.with_untracked(|l| post_login_target(l.return_url()));
                    navigate(
                        &target,
                        NavigateOptions {
                            replace: true,
                            ..Default::default()
                        },
                    );
                }
                Err(ApiError::Validation(field_errors)) => set_errors.set(field_errors),
                Err(ApiError::Unauthorized) => toasts.error("Invalid e-mail or password"),
                Err(e) => toasts.error(e.toast_message()),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Zatca Admin"</h1>
                    <p class="text-base-content/70">"Sign in to continue"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"E-mail"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                autocomplete="username"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                            />
                            {move || error_for("email")().map(|msg| view! {
                                <span class="label-text-alt text-error mt-1">{msg}</span>
                            })}
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                autocomplete="current-password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                            />
                            {move || error_for("password")().map(|msg| view! {
                                <span class="label-text-alt text-error mt-1">{msg}</span>
                            })}
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                } else {
                                    "Sign in".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-sm text-center mt-2">
                            "No account? " <A href="/signup" attr:class="link link-primary">"Sign up"</A>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
