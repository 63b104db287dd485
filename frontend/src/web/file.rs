//! 文件选择读取

use js_sys::Uint8Array;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, File, HtmlInputElement};
use zatca_admin::upload::PendingFile;

/// First file of the `<input type="file">` that fired `ev`.
pub fn picked_file(ev: &Event) -> Option<File> {
    let input = ev.target()?.dyn_into::<HtmlInputElement>().ok()?;
    input.files()?.get(0)
}

/// Reads the whole file into memory.
pub async fn read_file(file: File) -> Result<PendingFile, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("{e:?}"))?;
    let bytes = Uint8Array::new(&buffer).to_vec();

    let content_type = match file.type_() {
        t if t.is_empty() => "application/octet-stream".to_string(),
        t => t,
    };

    Ok(PendingFile {
        name: file.name(),
        content_type,
        bytes,
    })
}
