//! 通用新增/编辑表单页
//!
//! 字段来自实体的静态表单定义；校验、附件上传与提交由核心的
//! `form::submit` 完成。

use std::collections::HashMap;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use tracing::warn;
use zatca_admin::form::{
    FieldKind, FieldSpec, FormMode, FormState, SubmitOutcome, fetch_options, schema_for, submit,
};
use zatca_admin::upload::{Attachment, Uploader};
use zatca_admin::{ApiError, Notifier, Toast};
use zatca_shared::graphql::{FindOne, IdArgs};
use zatca_shared::{Editable, EntityRef};

use crate::api::{use_api, use_config};
use crate::auth::use_auth;
use crate::toast::use_toasts;
use crate::web::{BrowserHttp, picked_file, read_file};

type Options = HashMap<&'static str, Vec<EntityRef>>;

pub fn form_page<E: Editable>(mode: FormMode) -> impl IntoView {
    let config = use_config();
    let client = use_api();
    let auth = use_auth();
    let toasts = use_toasts();
    let navigate = use_navigate();

    let schema = schema_for(E::KIND);
    let form = RwSignal::new(FormState::new());
    let options = RwSignal::new(Options::new());
    let loading = RwSignal::new(matches!(mode, FormMode::Edit(_)));

    // --- 下拉选项 ---
    for field in schema.fields {
        let FieldKind::Select(kind) = field.kind else {
            continue;
        };
        let client = client.clone();
        let name = field.name;
        spawn_local(async move {
            match fetch_options(&*client, kind).await {
                Ok(list) => options.update(|o| {
                    o.insert(name, list);
                }),
                Err(ApiError::Unauthorized) => auth.expire(&client),
                Err(e) => {
                    toasts.notify(Toast::error(e.toast_message()));
                }
            }
        });
    }

    // --- 编辑页：加载记录 ---
    if let FormMode::Edit(id) = &mode {
        let client = client.clone();
        let id = id.clone();
        spawn_local(async move {
            match client.execute::<FindOne<E>>(&IdArgs { id }).await {
                Ok(record) => form.update(|f| f.load_record(schema, &record)),
                Err(ApiError::Unauthorized) => auth.expire(&client),
                Err(e) => {
                    toasts.notify(Toast::error(e.toast_message()));
                }
            }
            loading.set(false);
        });
    }

    let title = match &mode {
        FormMode::Create => format!("New {}", schema.noun.to_lowercase()),
        FormMode::Edit(_) => format!("Edit {}", schema.noun.to_lowercase()),
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if form.with_untracked(|f| f.submitting) {
            return;
        }
        form.update(|f| f.submitting = true);

        let started = form.get_untracked();
        let mut state = started.clone();
        let mode = mode.clone();
        let client = client.clone();
        let config = config.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            let uploader = Uploader::new(BrowserHttp, toasts, &config)
                .with_bearer(client.cookies().access_token());
            let outcome = submit::<E, _, _, _, _>(&mut state, schema, &mode, &*client, &uploader).await;
            form.update(|f| f.finish_submit(&started, state));

            match outcome {
                SubmitOutcome::Saved { message, redirect } => {
                    toasts.notify(Toast::success(message));
                    navigate(&redirect, Default::default());
                }
                SubmitOutcome::Invalid => {}
                SubmitOutcome::Blocked => {
                    toasts.notify(Toast::error("Some files could not be uploaded"));
                }
                SubmitOutcome::Failed(message) => {
                    toasts.notify(Toast::error(message));
                }
                SubmitOutcome::Unauthorized => auth.expire(&client),
            }
        });
    };

    let fields = schema
        .fields
        .iter()
        .map(|field| field_view(*field, form, options))
        .collect_view();

    view! {
        <div class="card bg-base-100 shadow-xl max-w-2xl">
            <form class="card-body" on:submit=on_submit>
                <h2 class="card-title">{title}</h2>
                <Show when=move || loading.get()>
                    <span class="loading loading-spinner loading-md"></span>
                </Show>
                <fieldset class="contents" disabled=move || form.with(|f| f.submitting)>
                    {fields}
                </fieldset>
                <div class="form-control mt-6">
                    <button class="btn btn-primary" disabled=move || form.with(|f| f.submitting)>
                        {move || if form.with(|f| f.submitting) {
                            view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                        } else {
                            "Save".into_any()
                        }}
                    </button>
                </div>
            </form>
        </div>
    }
}

/// One labelled input with its inline error.
fn field_view(field: FieldSpec, form: RwSignal<FormState>, options: RwSignal<Options>) -> impl IntoView {
    let name = field.name;
    let value = move || form.with(|f| f.value(name).to_string());
    let set = move |v: String| form.update(|f| f.set_value(name, &v));
    let error = move || form.with(|f| f.error(name).map(str::to_string));
    let label = if field.required {
        format!("{} *", field.label)
    } else {
        field.label.to_string()
    };

    let input = match field.kind {
        FieldKind::Text | FieldKind::Email | FieldKind::Number | FieldKind::Integer | FieldKind::Date => {
            let input_type = match field.kind {
                FieldKind::Email => "email",
                FieldKind::Number | FieldKind::Integer => "number",
                FieldKind::Date => "date",
                _ => "text",
            };
            view! {
                <input
                    id=name
                    type=input_type
                    step={(field.kind == FieldKind::Number).then_some("any")}
                    class="input input-bordered"
                    prop:value=value
                    on:input=move |ev| set(event_target_value(&ev))
                />
            }
            .into_any()
        }
        FieldKind::Boolean => view! {
            <input
                id=name
                type="checkbox"
                class="toggle toggle-primary"
                prop:checked=move || matches!(value().as_str(), "true" | "on" | "1")
                on:change=move |ev| set(event_target_checked(&ev).to_string())
            />
        }
        .into_any(),
        FieldKind::List => view! {
            <textarea
                id=name
                rows="4"
                placeholder="One entry per line"
                class="textarea textarea-bordered"
                prop:value=value
                on:input=move |ev| set(event_target_value(&ev))
            ></textarea>
        }
        .into_any(),
        FieldKind::Select(_) => view! {
            <select
                id=name
                class="select select-bordered"
                prop:value=value
                on:change=move |ev| set(event_target_value(&ev))
            >
                <option value="">"Select..."</option>
                <For
                    each=move || options.with(|o| o.get(name).cloned().unwrap_or_default())
                    key=|opt| opt.id.clone()
                    children=move |opt| {
                        let selected = {
                            let id = opt.id.clone();
                            move || value() == id
                        };
                        view! { <option value=opt.id selected=selected>{opt.name}</option> }
                    }
                />
            </select>
        }
        .into_any(),
        FieldKind::Image | FieldKind::Video => {
            let accept = if field.kind == FieldKind::Image { "image/*" } else { "video/*" };
            let current = move || {
                form.with(|f| match f.attachment(name) {
                    Some(Attachment::Uploaded { path }) => Some(path.clone()),
                    Some(Attachment::Pending(file)) => Some(format!("{} (pending upload)", file.name)),
                    None => None,
                })
            };
            view! {
                <input
                    id=name
                    type="file"
                    accept=accept
                    class="file-input file-input-bordered"
                    on:change=move |ev| {
                        let Some(file) = picked_file(&ev) else { return };
                        spawn_local(async move {
                            match read_file(file).await {
                                Ok(pending) => form.update(|f| f.set_attachment(name, Attachment::Pending(pending))),
                                Err(e) => warn!(field = name, error = %e, "could not read picked file"),
                            }
                        });
                    }
                />
                <span class="text-xs opacity-70">{current}</span>
            }
            .into_any()
        }
    };

    view! {
        <div class="form-control">
            <label class="label" for=name>
                <span class="label-text">{label}</span>
            </label>
            {input}
            {move || error().map(|msg| view! {
                <label class="label">
                    <span class="label-text-alt text-error">{msg}</span>
                </label>
            })}
        </div>
    }
}
