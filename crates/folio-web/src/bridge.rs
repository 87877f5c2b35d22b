#![forbid(unsafe_code)]

//! JSON shapes exchanged with the page: startup config and the email
//! widget's response and rejection objects.
//!
//! Kept free of `wasm-bindgen` types so it is testable on native targets;
//! the wasm side stringifies JS values before handing them over.

use folio_core::FolioConfig;
use folio_core::error::ConfigError;
use folio_core::form::{SendError, SendResponse, TemplateParams};
use serde::Deserialize;

/// `{status, text}` as resolved or rejected by the email widget.
#[derive(Debug, Default, Deserialize)]
struct WidgetStatus {
    #[serde(default)]
    status: Option<u16>,
    #[serde(default)]
    text: Option<String>,
}

/// Startup config. Missing or blank input means defaults.
pub fn parse_config(raw: Option<&str>) -> Result<FolioConfig, ConfigError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(FolioConfig::default()),
        Some(json) => FolioConfig::from_json_str(json),
    }
}

/// Template parameters as the JSON object handed to the widget.
pub fn params_json(params: &TemplateParams) -> serde_json::Result<String> {
    serde_json::to_string(params)
}

/// Interpret the value a send resolved with.
pub fn send_response(json: &str) -> Result<SendResponse, SendError> {
    let parsed: WidgetStatus = serde_json::from_str(json)
        .map_err(|err| SendError::new(None, format!("unreadable response: {err}")))?;
    match parsed.status {
        Some(status) if (200..300).contains(&status) => Ok(SendResponse {
            status,
            text: parsed.text.unwrap_or_default(),
        }),
        status => Err(SendError::new(
            status,
            parsed.text.unwrap_or_else(|| "unexpected response".to_string()),
        )),
    }
}

/// Interpret the value a send rejected with.
///
/// `json` is the stringified rejection and `message` its string form, when
/// either is available.
#[must_use]
pub fn send_rejection(json: Option<&str>, message: Option<&str>) -> SendError {
    let parsed = json
        .and_then(|raw| serde_json::from_str::<WidgetStatus>(raw).ok())
        .unwrap_or_default();
    let text = parsed
        .text
        .filter(|t| !t.is_empty())
        .or_else(|| message.map(str::to_string))
        .unwrap_or_else(|| "unknown error".to_string());
    SendError::new(parsed.status, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn blank_config_means_defaults() {
        assert_eq!(parse_config(None).unwrap(), FolioConfig::default());
        assert_eq!(parse_config(Some("  ")).unwrap(), FolioConfig::default());
    }

    #[test]
    fn config_overrides_are_validated() {
        let config = parse_config(Some(r#"{"counter":{"steps":10}}"#)).unwrap();
        assert_eq!(config.counter.steps, 10);
        assert!(parse_config(Some(r#"{"counter":{"steps":0}}"#)).is_err());
    }

    #[test]
    fn ok_response_is_accepted() {
        assert_eq!(
            send_response(r#"{"status":200,"text":"OK"}"#),
            Ok(SendResponse {
                status: 200,
                text: "OK".into(),
            })
        );
    }

    #[test]
    fn non_success_status_is_an_error() {
        let err = send_response(r#"{"status":400,"text":"The service ID is invalid"}"#).unwrap_err();
        assert_eq!(err.status, Some(400));
        assert_eq!(err.text, "The service ID is invalid");
        assert!(send_response("not json").is_err());
    }

    #[test]
    fn rejection_prefers_widget_text_then_message() {
        assert_eq!(
            send_rejection(Some(r#"{"status":412,"text":"bad template"}"#), Some("ignored")),
            SendError::new(Some(412), "bad template")
        );
        assert_eq!(
            send_rejection(Some("{}"), Some("NetworkError")),
            SendError::new(None, "NetworkError")
        );
        assert_eq!(send_rejection(None, None), SendError::new(None, "unknown error"));
    }

    #[test]
    fn params_serialize_with_template_field_names() {
        let params = TemplateParams {
            from_name: "Jane".into(),
            from_email: "jane@x.com".into(),
            message: "Hi".into(),
            to_name: "Owner".into(),
        };
        assert_eq!(
            params_json(&params).unwrap(),
            r#"{"from_name":"Jane","from_email":"jane@x.com","message":"Hi","to_name":"Owner"}"#
        );
    }
}
