//! `document.cookie` 读写

use percent_encoding::{NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::HtmlDocument;
use zatca_admin::CookieStore;

/// One year.
const MAX_AGE_SECS: u32 = 60 * 60 * 24 * 365;

/// Cookie jar of the current document.
///
/// Values are percent-encoded because the user cookie holds JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentCookies;

fn document() -> Option<HtmlDocument> {
    web_sys::window()?.document()?.dyn_into::<HtmlDocument>().ok()
}

fn write(cookie: &str) {
    let Some(doc) = document() else {
        warn!("no document; cookie not written");
        return;
    };
    if let Err(e) = doc.set_cookie(cookie) {
        warn!(error = ?e, "failed to write cookie");
    }
}

impl CookieStore for DocumentCookies {
    fn get(&self, name: &str) -> Option<String> {
        let raw = document()?.cookie().ok()?;
        raw.split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| percent_decode_str(value).decode_utf8_lossy().into_owned())
    }

    fn set(&self, name: &str, value: &str) {
        let value = utf8_percent_encode(value, NON_ALPHANUMERIC);
        write(&format!(
            "{name}={value}; path=/; max-age={MAX_AGE_SECS}; SameSite=Lax"
        ));
    }

    fn remove(&self, name: &str) {
        write(&format!("{name}=; path=/; max-age=0; SameSite=Lax"));
    }
}
