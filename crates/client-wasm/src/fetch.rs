use log::debug;
use rtrack_core::error::PollError;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Response, window};

/// GET the feed with the browser's `fetch`. Error statuses still return their body.
pub async fn fetch_body(url: &str) -> Result<String, PollError> {
    let window = window().ok_or_else(|| PollError::Network("No window".to_string()))?;

    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(network_error)?;
    let response: Response = response.dyn_into().map_err(network_error)?;
    if !response.ok() {
        debug!("{url} answered {}", response.status());
    }

    let text = JsFuture::from(response.text().map_err(network_error)?)
        .await
        .map_err(network_error)?;
    text.as_string()
        .ok_or_else(|| PollError::InvalidJson("body is not text".to_string()))
}

fn network_error(e: JsValue) -> PollError {
    PollError::Network(format!("{e:?}"))
}
