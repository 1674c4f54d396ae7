//! Loading static JSON resources.
//!
//! Feature logic talks to the [`Fetcher`] trait so it can be driven by a
//! stub outside the browser; [`BrowserFetcher`] is the `window.fetch`
//! implementation used by the app.

use std::future::Future;
use std::pin::Pin;

use serde::de::DeserializeOwned;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("{url} responded {status} {status_text}")]
    Status {
        url: String,
        status: u16,
        status_text: String,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<FetchError> for JsValue {
    fn from(e: FetchError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

pub type FetchFuture = Pin<Box<dyn Future<Output = Result<String, FetchError>>>>;

pub trait Fetcher {
    /// GET `url` and return the response body as text.
    fn get_text(&self, url: &str) -> FetchFuture;
}

/// GET `url` and decode the body as `T`.
pub async fn get_json<T: DeserializeOwned>(fetcher: &dyn Fetcher, url: &str) -> Result<T, FetchError> {
    let body = fetcher.get_text(url).await?;
    Ok(serde_json::from_str(&body)?)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserFetcher;

impl Fetcher for BrowserFetcher {
    fn get_text(&self, url: &str) -> FetchFuture {
        let url = url.to_string();
        Box::pin(async move { browser_get_text(&url).await })
    }
}

async fn browser_get_text(url: &str) -> Result<String, FetchError> {
    use web_sys::{Request, RequestInit, RequestMode, Response};

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::SameOrigin);

    let request = Request::new_with_str_and_init(url, &opts).map_err(js_error)?;
    let window = web_sys::window().ok_or_else(|| FetchError::Request("no global window".into()))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?;
    let resp: Response = resp_value.dyn_into().map_err(js_error)?;

    if !resp.ok() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: resp.status(),
            status_text: resp.status_text(),
        });
    }

    let text = JsFuture::from(resp.text().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    Ok(text.as_string().unwrap_or_default())
}

fn js_error(value: JsValue) -> FetchError {
    let message = value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.to_string()))
        })
        .unwrap_or_else(|| format!("{:?}", value));
    FetchError::Request(message)
}


#[cfg(test)]
mod tests {
    use super::testing::StubFetcher;
    use super::*;
    use futures::executor::block_on;
    use serde_json::Value;

    #[test]
    fn get_json_decodes_the_body() {
        let stub = StubFetcher::with("a.json", Ok(r#"{ "x": 1 }"#));
        let value: Value = block_on(get_json(&stub, "a.json")).unwrap();
        assert_eq!(value["x"], 1);
    }

    #[test]
    fn get_json_reports_bad_json() {
        let stub = StubFetcher::with("a.json", Ok("not json"));
        let err = block_on(get_json::<Value>(&stub, "a.json")).unwrap_err();
        assert!(matches!(err, FetchError::Json(_)));
    }
}
