//! 浏览器 Web API 适配层
//!
//! 核心 crate 只依赖 `HttpClient` / `CookieStore` 这两个抽象，
//! 此模块提供它们在浏览器中的实现：
//! - `http`: 基于 `gloo-net` 的 fetch 传输
//! - `cookies`: `document.cookie` 读写
//! - `file`: 读取 `<input type="file">` 选中的文件
//! - `logging`: 将 `tracing` 事件输出到浏览器控制台

mod cookies;
mod file;
mod http;
mod logging;

pub use cookies::DocumentCookies;
pub use file::{picked_file, read_file};
pub use http::BrowserHttp;
pub use logging::init_logging;
