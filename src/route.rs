//! 路由定义模块 - 领域模型
//!
//! Pure route model: no DOM access. Defines every page of the console
//! and the guard properties attached to it.

use std::fmt::Display;

use zatca_shared::EntityKind;

use crate::ability::Capability;

/// Query parameter carrying the 1-based page number.
pub const QUERY_PAGE: &str = "page";
/// Query parameter carrying the post-login destination.
pub const QUERY_RETURN_URL: &str = "returnUrl";

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// Dashboard landing page.
    #[default]
    Home,
    Login,
    Signup,
    /// Data grid of one entity.
    List(EntityKind),
    /// Create form, `<base>/add`.
    New(EntityKind),
    /// Detail/edit form, `<base>/<id>`.
    Edit(EntityKind, String),
    NotAuthorized,
    NotFound,
    ServerError,
}

/// Invoices only have a create page.
fn has_list_page(kind: EntityKind) -> bool {
    kind != EntityKind::Invoice
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or("/");
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        match path {
            "/" => return Self::Home,
            "/login" => return Self::Login,
            "/signup" => return Self::Signup,
            "/401" => return Self::NotAuthorized,
            "/404" => return Self::NotFound,
            "/500" => return Self::ServerError,
            _ => {}
        }

        if let Some(kind) = EntityKind::from_route_base(path) {
            return if has_list_page(kind) {
                Self::List(kind)
            } else {
                Self::NotFound
            };
        }

        // `<base>/add` or `<base>/<id>`; bases may themselves contain `/`.
        if let Some((base, rest)) = path.rsplit_once('/') {
            match EntityKind::from_route_base(base) {
                Some(kind) if rest == "add" => return Self::New(kind),
                Some(kind) if has_list_page(kind) => return Self::Edit(kind, rest.to_string()),
                _ => {}
            }
        }

        Self::NotFound
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Signup => "/signup".to_string(),
            Self::List(kind) => kind.route_base().to_string(),
            Self::New(kind) => format!("{}/add", kind.route_base()),
            Self::Edit(kind, id) => format!("{}/{}", kind.route_base(), id),
            Self::NotAuthorized => "/401".to_string(),
            Self::NotFound => "/404".to_string(),
            Self::ServerError => "/500".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        !self.guest_only() && !self.is_error_page()
    }

    /// Pages an authenticated user is sent away from.
    pub fn guest_only(&self) -> bool {
        matches!(self, Self::Login | Self::Signup)
    }

    /// Error pages always render, whatever the session.
    pub fn is_error_page(&self) -> bool {
        matches!(self, Self::NotAuthorized | Self::NotFound | Self::ServerError)
    }

    /// Capability the ability guard checks before rendering.
    pub fn required_capability(&self) -> Option<Capability> {
        match self {
            Self::Home => Some(Capability::manage("home")),
            Self::List(kind) | Self::New(kind) | Self::Edit(kind, _) => {
                Some(Capability::manage(kind.subject()))
            }
            _ => None,
        }
    }

    /// Entity the page operates on.
    pub fn entity(&self) -> Option<EntityKind> {
        match self {
            Self::List(kind) | Self::New(kind) | Self::Edit(kind, _) => Some(*kind),
            _ => None,
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

// =========================================================
// Location (path + query string)
// =========================================================

/// A parsed browser location. The URL is the source of truth for the
/// current page number.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Location {
    /// Parses `"/city?page=2#x"`; an unreadable query string is dropped.
    pub fn parse(url: &str) -> Self {
        let url = url.split('#').next().unwrap_or_default();
        let (path, query) = match url.split_once('?') {
            Some((path, query)) => (path, query),
            None => (url, ""),
        };
        let query = serde_urlencoded::from_str::<Vec<(String, String)>>(query).unwrap_or_default();
        Self {
            path: if path.is_empty() { "/".to_string() } else { path.to_string() },
            query,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// 1-based page number; missing or invalid values read as page 1.
    pub fn page(&self) -> u32 {
        parse_page(self.get(QUERY_PAGE))
    }

    pub fn return_url(&self) -> Option<&str> {
        self.get(QUERY_RETURN_URL)
    }

    pub fn route(&self) -> AppRoute {
        AppRoute::from_path(&self.path)
    }

    /// Path and query as typed in the address bar.
    pub fn to_url(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        match serde_urlencoded::to_string(&self.query) {
            Ok(qs) => format!("{}?{}", self.path, qs),
            Err(_) => self.path.clone(),
        }
    }

    /// Same location with `page` replaced, other parameters kept.
    pub fn with_page(&self, page: u32) -> Self {
        let mut next = self.clone();
        next.query.retain(|(k, _)| k != QUERY_PAGE);
        next.query.push((QUERY_PAGE.to_string(), page.max(1).to_string()));
        next
    }
}

/// Reads a page parameter; anything but a positive integer is page 1.
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_routes() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Home);
        assert_eq!(AppRoute::from_path(""), AppRoute::Home);
        assert_eq!(AppRoute::from_path("/login"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/signup/"), AppRoute::Signup);
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
    }

    #[test]
    fn test_entity_routes() {
        assert_eq!(AppRoute::from_path("/city"), AppRoute::List(EntityKind::City));
        assert_eq!(
            AppRoute::from_path("/city?page=3"),
            AppRoute::List(EntityKind::City)
        );
        assert_eq!(
            AppRoute::from_path("/workout/groups"),
            AppRoute::List(EntityKind::WorkoutGroup)
        );
        assert_eq!(
            AppRoute::from_path("/workout/programmes-day/abc"),
            AppRoute::Edit(EntityKind::ProgramDay, "abc".into())
        );
        assert_eq!(
            AppRoute::from_path("/language/add"),
            AppRoute::New(EntityKind::Language)
        );
        assert_eq!(
            AppRoute::from_path("/invoices/add"),
            AppRoute::New(EntityKind::Invoice)
        );
        assert_eq!(AppRoute::from_path("/invoices"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/city/1/extra"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/workout/unknown"), AppRoute::NotFound);
    }

    #[test]
    fn test_paths_roundtrip() {
        let routes = [
            AppRoute::Home,
            AppRoute::Login,
            AppRoute::Signup,
            AppRoute::List(EntityKind::Equipment),
            AppRoute::New(EntityKind::Invoice),
            AppRoute::Edit(EntityKind::User, "42".into()),
            AppRoute::NotAuthorized,
        ];
        for route in routes {
            assert_eq!(AppRoute::from_path(&route.to_path()), route);
        }
    }

    #[test]
    fn test_guard_properties() {
        assert!(AppRoute::List(EntityKind::City).requires_auth());
        assert!(!AppRoute::Login.requires_auth());
        assert!(AppRoute::Signup.guest_only());
        assert!(AppRoute::NotFound.is_error_page());
        assert!(!AppRoute::NotFound.requires_auth());
        assert_eq!(
            AppRoute::Edit(EntityKind::City, "1".into()).required_capability(),
            Some(Capability::manage("city"))
        );
        assert_eq!(AppRoute::Login.required_capability(), None);
    }

    #[test]
    fn test_location_page() {
        assert_eq!(Location::parse("/city").page(), 1);
        assert_eq!(Location::parse("/city?page=4").page(), 4);
        assert_eq!(Location::parse("/city?page=0").page(), 1);
        assert_eq!(Location::parse("/city?page=abc").page(), 1);
        assert_eq!(Location::parse("/city?page=-2").page(), 1);
    }

    #[test]
    fn test_location_with_page_keeps_other_params() {
        let loc = Location::parse("/user?filter=coach&page=2");
        let next = loc.with_page(3);
        assert_eq!(next.to_url(), "/user?filter=coach&page=3");
        assert_eq!(next.route(), AppRoute::List(EntityKind::User));
    }

    #[test]
    fn test_return_url_is_decoded() {
        let loc = Location::parse("/login?returnUrl=%2Fcity%3Fpage%3D2");
        assert_eq!(loc.return_url(), Some("/city?page=2"));
    }
}
