#![forbid(unsafe_code)]

//! [`EmailSender`] over the `emailjs` browser SDK loaded by the page.

use folio_core::form::{EmailSender, SendError, SendResponse, TemplateParams};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::bridge;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = emailjs, js_name = init)]
    fn emailjs_init(public_key: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = emailjs, js_name = send)]
    fn emailjs_send(
        service_id: &str,
        template_id: &str,
        params: &JsValue,
    ) -> Result<js_sys::Promise, JsValue>;
}

/// Sends through the page's `emailjs` global.
#[derive(Debug, Clone, Copy)]
pub struct EmailJsSender {
    ready: bool,
}

impl EmailJsSender {
    /// Initialize the SDK once with the account's public key.
    ///
    /// A missing SDK is logged; every later send then fails.
    #[must_use]
    pub fn init(public_key: &str) -> Self {
        let ready = match emailjs_init(public_key) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(target: "folio.web", error = ?err, "emailjs unavailable");
                false
            }
        };
        Self { ready }
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.ready
    }
}

fn stringify(value: &JsValue) -> Option<String> {
    js_sys::JSON::stringify(value)
        .ok()
        .and_then(|s| s.as_string())
}

fn rejection(err: &JsValue) -> SendError {
    let message = err.as_string().or_else(|| {
        err.dyn_ref::<js_sys::Error>()
            .map(|e| String::from(e.message()))
    });
    bridge::send_rejection(stringify(err).as_deref(), message.as_deref())
}

impl EmailSender for EmailJsSender {
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        params: &TemplateParams,
    ) -> Result<SendResponse, SendError> {
        if !self.ready {
            return Err(SendError::new(None, "emailjs not initialized"));
        }
        let json = bridge::params_json(params)
            .map_err(|err| SendError::new(None, format!("params not serializable: {err}")))?;
        let params = js_sys::JSON::parse(&json).map_err(|err| rejection(&err))?;
        let promise =
            emailjs_send(service_id, template_id, &params).map_err(|err| rejection(&err))?;

        match JsFuture::from(promise).await {
            Ok(value) => bridge::send_response(&stringify(&value).unwrap_or_default()),
            Err(err) => Err(rejection(&err)),
        }
    }
}
