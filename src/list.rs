//! Generic list page controller.
//!
//! One controller drives every data grid. Whether search and pagination
//! happen on the server or in memory is a per-list [`PaginationStrategy`].
//! Every fetch carries a generation number and only the newest one may
//! replace the rows.

use std::collections::BTreeMap;

use tracing::{debug, warn};
use zatca_shared::graphql::{ListAll, ListPage, NoVariables, PageArgs};
use zatca_shared::{Entity, EntityKind, PAGE_SIZE};

use crate::api::GraphqlClient;
use crate::config::AppConfig;
use crate::cookies::CookieStore;
use crate::error::{ApiError, ApiResult};
use crate::request::HttpClient;
use crate::route::{AppRoute, Location};

// =========================================================
// 列表配置 (List Configuration)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationStrategy {
    /// `{size, page, search}` are sent to the server on every change.
    ServerPaged,
    /// The whole collection is fetched once and sliced in memory.
    ClientFiltered,
}

/// What a page change does to the scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Preserve,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListConfig {
    pub strategy: PaginationStrategy,
    pub scroll: ScrollBehavior,
    /// Entity-specific filter object sent with server-paged queries.
    pub filter: BTreeMap<String, String>,
}

impl ListConfig {
    pub fn server_paged() -> Self {
        Self {
            strategy: PaginationStrategy::ServerPaged,
            scroll: ScrollBehavior::Reset,
            filter: BTreeMap::new(),
        }
    }

    pub fn client_filtered() -> Self {
        Self {
            strategy: PaginationStrategy::ClientFiltered,
            scroll: ScrollBehavior::Preserve,
            filter: BTreeMap::new(),
        }
    }

    pub fn with_filter(mut self, key: &str, value: &str) -> Self {
        self.filter.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_scroll(mut self, scroll: ScrollBehavior) -> Self {
        self.scroll = scroll;
        self
    }

    /// Configuration of each entity's list page, `None` for entities
    /// without one.
    pub fn for_kind(kind: EntityKind, app: &AppConfig) -> Option<Self> {
        let config = match kind {
            EntityKind::Currency
            | EntityKind::Language
            | EntityKind::Promotion
            | EntityKind::Questionnaire
            | EntityKind::UserType
            | EntityKind::WorkoutGroup => Self::client_filtered(),
            EntityKind::User => {
                Self::server_paged().with_filter("userType", &app.customer_user_type)
            }
            EntityKind::Country
            | EntityKind::City
            | EntityKind::Equipment
            | EntityKind::MuscleGroup
            | EntityKind::WorkoutCategory
            | EntityKind::Exercise
            | EntityKind::ProgramDay => Self::server_paged(),
            EntityKind::Invoice => return None,
        };
        Some(config)
    }
}

// =========================================================
// 列表状态 (List State)
// =========================================================

/// What triggered a potential refetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    Mount,
    Page,
    Search,
}

/// Handle of one dispatched fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    pub args: PageArgs,
}

/// Rows returned by one fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct ListData<E> {
    pub rows: Vec<E>,
    /// Server-reported page count; `None` for in-memory lists.
    pub total_pages: Option<u32>,
}

/// Effect of a debounced search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchUpdate {
    Unchanged,
    Applied,
    /// Applied, and the list went back to page 1.
    PageReset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutcome {
    Applied,
    /// A newer fetch was dispatched; the response was dropped.
    Stale,
    /// Rows were kept; the message goes into a toast.
    Failed(String),
    /// Left to the guards.
    Unauthorized,
}

#[derive(Debug, Clone)]
pub struct ListController<E> {
    config: ListConfig,
    rows: Vec<E>,
    total_pages: u32,
    page: u32,
    raw_search: String,
    search: String,
    loading: bool,
    loaded: bool,
    generation: u64,
}

impl<E: Entity> ListController<E> {
    pub fn new(config: ListConfig, page: u32) -> Self {
        Self {
            config,
            rows: Vec::new(),
            total_pages: 0,
            page: page.max(1),
            raw_search: String::new(),
            search: String::new(),
            loading: false,
            loaded: false,
            generation: 0,
        }
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn raw_search(&self) -> &str {
        &self.raw_search
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn scroll(&self) -> ScrollBehavior {
        self.config.scroll
    }

    /// Page read from the URL. Returns whether it changed.
    pub fn set_page(&mut self, page: u32) -> bool {
        let page = page.max(1);
        if page == self.page {
            return false;
        }
        self.page = page;
        true
    }

    /// Text as typed, before the debounce.
    pub fn set_raw_search(&mut self, text: &str) {
        self.raw_search = text.to_string();
    }

    /// Debounced search text. A new search starts over on page 1.
    pub fn set_search(&mut self, text: &str) -> SearchUpdate {
        let text = text.trim();
        if text == self.search {
            return SearchUpdate::Unchanged;
        }
        self.search = text.to_string();
        if self.page > 1 {
            self.page = 1;
            SearchUpdate::PageReset
        } else {
            SearchUpdate::Applied
        }
    }

    /// In-memory lists only hit the network on mount.
    pub fn needs_fetch(&self, change: ListChange) -> bool {
        match change {
            ListChange::Mount => true,
            ListChange::Page | ListChange::Search => {
                self.config.strategy == PaginationStrategy::ServerPaged
            }
        }
    }

    /// Starts a fetch; any ticket issued earlier becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        let search = match self.config.strategy {
            PaginationStrategy::ServerPaged if !self.search.is_empty() => Some(self.search.clone()),
            _ => None,
        };
        FetchTicket {
            generation: self.generation,
            args: PageArgs {
                size: PAGE_SIZE,
                page: self.page,
                search,
                filter: self.config.filter.clone(),
            },
        }
    }

    /// Applies a response if it belongs to the newest fetch.
    pub fn complete(&mut self, ticket: &FetchTicket, result: ApiResult<ListData<E>>) -> ListOutcome {
        if ticket.generation != self.generation {
            debug!(
                kind = %E::KIND,
                ticket = ticket.generation,
                latest = self.generation,
                "dropping stale list response"
            );
            return ListOutcome::Stale;
        }
        self.loading = false;

        match result {
            Ok(data) => {
                self.replace(data);
                self.loaded = true;
                ListOutcome::Applied
            }
            Err(ApiError::Unauthorized) => ListOutcome::Unauthorized,
            Err(e) => {
                warn!(kind = %E::KIND, error = %e, "list fetch failed");
                ListOutcome::Failed(e.toast_message())
            }
        }
    }

    /// Shows cached rows until the first network response arrives.
    pub fn hydrate_from_cache(&mut self, data: ListData<E>) -> bool {
        if self.loaded {
            return false;
        }
        self.replace(data);
        true
    }

    fn replace(&mut self, data: ListData<E>) {
        self.total_pages = data.total_pages.unwrap_or(0);
        self.rows = data.rows;
    }

    /// Rows of the current page.
    pub fn visible_rows(&self) -> Vec<E> {
        match self.config.strategy {
            PaginationStrategy::ServerPaged => {
                self.rows.iter().take(PAGE_SIZE as usize).cloned().collect()
            }
            PaginationStrategy::ClientFiltered => {
                let filtered = filter_rows(&self.rows, &self.search);
                paginate(&filtered, self.page)
                    .iter()
                    .map(|row| (*row).clone())
                    .collect()
            }
        }
    }

    pub fn total_pages(&self) -> u32 {
        match self.config.strategy {
            PaginationStrategy::ServerPaged => self.total_pages,
            PaginationStrategy::ClientFiltered => {
                page_count(filter_rows(&self.rows, &self.search).len())
            }
        }
    }

    /// URL of another page, other query parameters kept.
    pub fn page_href(&self, location: &Location, page: u32) -> String {
        location.with_page(page).to_url()
    }

    /// Detail route of a row.
    pub fn row_href(&self, row: &E) -> String {
        AppRoute::Edit(E::KIND, row.id().to_string()).to_path()
    }
}

// =========================================================
// 内存过滤与分页 (In-memory filtering and pagination)
// =========================================================

/// Case-insensitive substring match on each row's search fields. An
/// empty query keeps every row.
pub fn filter_rows<'a, E: Entity>(rows: &'a [E], query: &str) -> Vec<&'a E> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return rows.iter().collect();
    }
    rows.iter()
        .filter(|row| {
            row.search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Slice of 1-based `page`; empty past the end.
pub fn paginate<T>(items: &[T], page: u32) -> &[T] {
    let size = PAGE_SIZE as usize;
    let start = (page.max(1) as usize - 1).saturating_mul(size);
    if start >= items.len() {
        return &[];
    }
    let end = (start + size).min(items.len());
    &items[start..end]
}

/// Pages needed for `count` rows; an empty list still has one page.
pub fn page_count(count: usize) -> u32 {
    let pages = count.div_ceil(PAGE_SIZE as usize).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

// =========================================================
// 网络请求 (Fetching)
// =========================================================

/// Issues the query matching the list's strategy.
pub async fn fetch_list<E, H, K>(
    client: &GraphqlClient<H, K>,
    config: &ListConfig,
    ticket: &FetchTicket,
) -> ApiResult<ListData<E>>
where
    E: Entity,
    H: HttpClient,
    K: CookieStore,
{
    match config.strategy {
        PaginationStrategy::ServerPaged => {
            let page = client.execute::<ListPage<E>>(&ticket.args).await?;
            Ok(ListData {
                rows: page.items,
                total_pages: Some(page.total_pages),
            })
        }
        PaginationStrategy::ClientFiltered => {
            let rows = client.execute::<ListAll<E>>(&NoVariables {}).await?;
            Ok(ListData {
                rows,
                total_pages: None,
            })
        }
    }
}

/// Cached result for the same query, if any.
pub fn cached_list<E, H, K>(
    client: &GraphqlClient<H, K>,
    config: &ListConfig,
    ticket: &FetchTicket,
) -> Option<ListData<E>>
where
    E: Entity,
    H: HttpClient,
    K: CookieStore,
{
    match config.strategy {
        PaginationStrategy::ServerPaged => {
            client
                .cached::<ListPage<E>>(&ticket.args)
                .map(|page| ListData {
                    rows: page.items,
                    total_pages: Some(page.total_pages),
                })
        }
        PaginationStrategy::ClientFiltered => client
            .cached::<ListAll<E>>(&NoVariables {})
            .map(|rows| ListData {
                rows,
                total_pages: None,
            }),
    }
}
