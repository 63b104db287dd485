//! 通用列表页
//!
//! 一个实现服务所有实体：分页、搜索与竞态处理由核心的
//! `ListController` 完成，本组件只负责事件接线与渲染。

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use zatca_admin::debounce::Debouncer;
use zatca_admin::list::{
    ListChange, ListConfig, ListController, ListOutcome, ScrollBehavior, SearchUpdate, cached_list,
    fetch_list,
};
use zatca_admin::{AppRoute, Notifier, Toast};
use zatca_shared::{Entity, SEARCH_DEBOUNCE_MS};

use crate::api::{use_api, use_config};
use crate::auth::use_auth;
use crate::components::status::StatusPage;
use crate::toast::use_toasts;
use crate::use_app_location;

pub fn list_page<E: Entity>() -> AnyView {
    let config = use_config();
    let client = use_api();
    let auth = use_auth();
    let toasts = use_toasts();
    let navigate = use_navigate();
    let location = use_app_location();

    let Some(list_config) = ListConfig::for_kind(E::KIND, &config) else {
        return view! { <StatusPage code=404 /> }.into_any();
    };
    let controller = RwSignal::new(ListController::<E>::new(
        list_config,
        location.with_untracked(|l| l.page()),
    ));
    let debouncer = StoredValue::new(Debouncer::<String>::new());

    // --- 请求：每次都取得新的代数令牌，只有最新的响应会被应用 ---
    let fetch = move || {
        let Some(ticket) = controller.try_update(ListController::begin_fetch) else {
            return;
        };
        let list_config = controller.with_untracked(|c| c.config().clone());
        if let Some(cached) = cached_list::<E, _, _>(&*client, &list_config, &ticket) {
            controller.update(|c| {
                c.hydrate_from_cache(cached);
            });
        }

        let client = client.clone();
        spawn_local(async move {
            let result = fetch_list::<E, _, _>(&*client, &list_config, &ticket).await;
            match controller.try_update(|c| c.complete(&ticket, result)) {
                Some(ListOutcome::Failed(message)) => {
                    toasts.notify(Toast::error(message));
                }
                Some(ListOutcome::Unauthorized) => auth.expire(&client),
                _ => {}
            }
        });
    };

    // --- 挂载与翻页：页码来自 URL ---
    Effect::new({
        let fetch = fetch.clone();
        move |mounted: Option<()>| {
            let page = location.with(|l| l.page());
            let changed = controller.try_update(|c| c.set_page(page)).unwrap_or(false);
            let change = match (mounted, changed) {
                (None, _) => ListChange::Mount,
                (Some(()), true) => ListChange::Page,
                (Some(()), false) => return,
            };
            if controller.with_untracked(|c| c.needs_fetch(change)) {
                fetch();
            }
        }
    });

    // --- 搜索：500ms 防抖 ---
    let on_search = {
        let navigate = navigate.clone();
        move |text: String| {
            controller.update(|c| c.set_raw_search(&text));
            let mut ticket = None;
            debouncer.update_value(|d| ticket = Some(d.push(text)));
            let Some(ticket) = ticket else { return };

            let fetch = fetch.clone();
            let navigate = navigate.clone();
            spawn_local(async move {
                TimeoutFuture::new(SEARCH_DEBOUNCE_MS).await;
                let mut settled = None;
                debouncer.update_value(|d| settled = d.settle(ticket));
                let Some(text) = settled else { return };
                match controller.try_update(|c| c.set_search(&text)) {
                    Some(SearchUpdate::Applied) => {}
                    Some(SearchUpdate::PageReset) => {
                        let (href, scroll) = controller.with_untracked(|c| {
                            (location.with_untracked(|l| c.page_href(l, 1)), c.scroll())
                        });
                        navigate(&href, navigate_options(scroll));
                    }
                    Some(SearchUpdate::Unchanged) | None => return,
                }
                if controller.with_untracked(|c| c.needs_fetch(ListChange::Search)) {
                    fetch();
                }
            });
        }
    };

    let rows = move || controller.with(|c| c.visible_rows());
    let total_pages = move || controller.with(|c| c.total_pages());
    let current_page = move || controller.with(|c| c.page());
    let is_loading = move || controller.with(|c| c.is_loading());
    let has_thumbnails = move || rows().iter().any(|row| row.thumbnail().is_some());

    let go_to = {
        let navigate = navigate.clone();
        move |page: u32| {
            let (href, scroll) = controller.with_untracked(|c| {
                (location.with_untracked(|l| c.page_href(l, page)), c.scroll())
            });
            navigate(&href, navigate_options(scroll));
        }
    };

    // 只加载白名单主机上的缩略图
    let thumbnail_url = move |row: &E| {
        let url = config.asset_url(row.thumbnail()?);
        config.allows_image(&url).then_some(url)
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <div class="flex flex-col md:flex-row md:items-center justify-between gap-4">
                    <h2 class="card-title">{E::KIND.title()}</h2>
                    <div class="flex gap-2">
                        <input
                            type="search"
                            placeholder="Search..."
                            class="input input-bordered input-sm"
                            prop:value=move || controller.with(|c| c.raw_search().to_string())
                            on:input=move |ev| on_search(event_target_value(&ev))
                        />
                        <A href={AppRoute::New(E::KIND).to_path()} attr:class="btn btn-primary btn-sm">
                            "Add"
                        </A>
                    </div>
                </div>

                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <Show when=has_thumbnails>
                                    <th></th>
                                </Show>
                                {E::COLUMNS.iter().map(|col| view! { <th>{*col}</th> }).collect_view()}
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || is_loading() && rows().is_empty()>
                                <tr>
                                    <td colspan={(E::COLUMNS.len() + 1).to_string()} class="text-center py-8 text-base-content/50">
                                        <span class="loading loading-spinner loading-md"></span>
                                        " Loading..."
                                    </td>
                                </tr>
                            </Show>
                            <Show when=move || !is_loading() && rows().is_empty()>
                                <tr>
                                    <td colspan={(E::COLUMNS.len() + 1).to_string()} class="text-center py-8 text-base-content/50">
                                        "No records found."
                                    </td>
                                </tr>
                            </Show>
                            <For
                                each=rows
                                key=|row| row.id().to_string()
                                children=move |row: E| {
                                    let href = controller.with_untracked(|c| c.row_href(&row));
                                    let navigate = use_navigate();
                                    let thumb = thumbnail_url(&row);
                                    view! {
                                        <tr
                                            class="hover cursor-pointer"
                                            on:click=move |_| navigate(&href, Default::default())
                                        >
                                            <Show when=has_thumbnails>
                                                <td>
                                                    {thumb.clone().map(|src| view! {
                                                        <img src=src class="h-10 w-10 rounded object-cover" alt="" />
                                                    })}
                                                </td>
                                            </Show>
                                            {row.cells().into_iter().map(|cell| view! { <td>{cell}</td> }).collect_view()}
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>

                <div class="join self-center">
                    <button
                        class="join-item btn btn-sm"
                        disabled=move || current_page() <= 1
                        on:click={
                            let go_to = go_to.clone();
                            move |_| go_to(current_page().saturating_sub(1).max(1))
                        }
                    >
                        "«"
                    </button>
                    <button class="join-item btn btn-sm">
                        {move || format!("Page {} of {}", current_page(), total_pages().max(1))}
                    </button>
                    <button
                        class="join-item btn btn-sm"
                        disabled=move || current_page() >= total_pages()
                        on:click=move |_| go_to(current_page() + 1)
                    >
                        "»"
                    </button>
                </div>
            </div>
        </div>
    }
    .into_any()
}

fn navigate_options(scroll: ScrollBehavior) -> NavigateOptions {
    NavigateOptions {
        replace: true,
        scroll: scroll == ScrollBehavior::Reset,
        ..Default::default()
    }
}
