//! HTTP 传输实现
//!
//! 使用 `gloo-net` 发送 `zatca_admin::request::HttpRequest`。

use gloo_net::http::{Request, RequestBuilder};
use js_sys::{Array, Uint8Array};
use web_sys::{Blob, BlobPropertyBag, FormData};
use zatca_admin::request::{FormPart, HttpMethod, HttpRequest, HttpResponse, RequestBody};
use zatca_admin::{HttpClient, TransportError};

/// fetch 传输，无状态，可随意复制
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserHttp;

fn builder(req: &HttpRequest) -> RequestBuilder {
    let mut builder = match req.method {
        HttpMethod::Get => Request::get(&req.url),
        HttpMethod::Post => Request::post(&req.url),
    };
    for (key, value) in &req.headers {
        builder = builder.header(key, value);
    }
    builder
}

/// 构建 multipart 表单，boundary 由浏览器生成
fn form_data(parts: &[FormPart]) -> Result<FormData, TransportError> {
    let err = |e| TransportError::Build(format!("{e:?}"));
    let form = FormData::new().map_err(err)?;

    for part in parts {
        match part {
            FormPart::Text { name, value } => form.append_with_str(name, value).map_err(err)?,
            FormPart::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                let chunks = Array::of1(&Uint8Array::from(bytes.as_slice()));
                let opts = BlobPropertyBag::new();
                opts.set_type(content_type);
                let blob = Blob::new_with_u8_array_sequence_and_options(&chunks, &opts)
                    .map_err(err)?;
                form.append_with_blob_and_filename(name, &blob, file_name)
                    .map_err(err)?;
            }
        }
    }
    Ok(form)
}

#[async_trait::async_trait(?Send)]
impl HttpClient for BrowserHttp {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let builder = builder(&req);
        let request = match &req.body {
            RequestBody::Empty => builder.build(),
            RequestBody::Json(body) => builder
                .header("Content-Type", "application/json")
                .body(body.as_str()),
            RequestBody::Multipart(parts) => builder.body(form_data(parts)?),
        }
        .map_err(|e| TransportError::Build(e.to_string()))?;

        let resp = request
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
