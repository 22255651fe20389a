//! Blocking HTTP implementation of [`MerchantApi`] on top of `ureq`.
use super::MerchantApi;
use crate::config::{GatewayConfig, ADD_MERCHANT_PATH, UPLOAD_DOCUMENT_PATH};
use crate::error::{SubmissionError, UploadError};
use crate::registration::{Attachment, DocumentKind, MerchantRegistration};
use serde_json::Value;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use ureq::Agent;

/// Keys checked, in order, for the stored path in an upload response.
const UPLOAD_PATH_KEYS: [&str; 3] = ["filePath", "url", "path"];

/// Longest response body echoed into logs.
const LOGGED_BODY_BYTES: usize = 200;

/// Talks to the QuickCrate backend over HTTP.
#[derive(Clone)]
pub struct HttpMerchantApi {
    agent: Agent,
    config: GatewayConfig,
}

struct RawResponse {
    status: u16,
    body: String,
}

impl RawResponse {
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl HttpMerchantApi {
    pub fn new(config: GatewayConfig) -> Self {
        let agent_config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout()))
            .build();
        Self {
            agent: Agent::new_with_config(agent_config),
            config,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn read(
        mut response: ureq::http::Response<ureq::Body>,
    ) -> Result<RawResponse, ureq::Error> {
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;
        Ok(RawResponse { status, body })
    }
}

impl MerchantApi for HttpMerchantApi {
    fn upload_file(&self, file: &Attachment, kind: DocumentKind) -> Result<String, UploadError> {
        let url = self.config.endpoint(UPLOAD_DOCUMENT_PATH);
        let boundary = multipart_boundary();
        let body = multipart_body(&boundary, file, kind);
        let start = Instant::now();

        let response = self
            .agent
            .post(&url)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .send(&body[..])
            .and_then(Self::read)
            .map_err(|err| UploadError::Transport(err.to_string()))?;

        tracing::info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            status = response.status,
            kind = %kind,
            request_bytes = body.len(),
            "document upload complete"
        );
        if !response.is_success() {
            tracing::debug!(
                body = excerpt(&response.body),
                "upload rejected"
            );
            return Err(UploadError::Rejected {
                status: response.status,
                message: server_message(response.status, &response.body),
            });
        }
        let value: Value = serde_json::from_str(&response.body)
            .map_err(|err| UploadError::Transport(format!("parse upload response: {err}")))?;
        uploaded_path(&value).ok_or(UploadError::MissingPath)
    }

    fn register_merchant(&self, payload: &MerchantRegistration) -> Result<Value, SubmissionError> {
        let url = self.config.endpoint(ADD_MERCHANT_PATH);
        let start = Instant::now();

        let response = self
            .agent
            .post(&url)
            .send_json(payload)
            .and_then(Self::read)
            .map_err(|err| SubmissionError::Transport(err.to_string()))?;

        tracing::info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            status = response.status,
            "registration request complete"
        );
        if !response.is_success() {
            tracing::debug!(
                body = excerpt(&response.body),
                "registration rejected"
            );
            return Err(SubmissionError::Rejected {
                status: response.status,
                message: server_message(response.status, &response.body),
            });
        }
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response.body)
            .map_err(|err| SubmissionError::Transport(format!("parse registration response: {err}")))
    }
}

/// The server's `message` field, or a generic status line.
fn server_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|message| !message.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("HTTP error! status: {status}"))
}

/// Leading part of a response body, cut on a char boundary.
fn excerpt(body: &str) -> &str {
    if body.len() <= LOGGED_BODY_BYTES {
        return body;
    }
    let end = (0..=LOGGED_BODY_BYTES)
        .rev()
        .find(|index| body.is_char_boundary(*index))
        .unwrap_or(0);
    &body[..end]
}

/// First non-empty path-like field of an upload response.
fn uploaded_path(value: &Value) -> Option<String> {
    UPLOAD_PATH_KEYS
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .find(|path| !path.is_empty())
        .map(str::to_string)
}

fn multipart_boundary() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    format!("----quickcrate-{nanos:x}")
}

fn quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Encode the `file` and `type` parts of an upload request.
fn multipart_body(boundary: &str, file: &Attachment, kind: DocumentKind) -> Vec<u8> {
    let mut body = Vec::with_capacity(file.data.len() + 512);
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
            quoted(&file.name),
            file.content_type
        )
        .as_bytes(),
    );
    body.extend_from_slice(&file.data);
    body.extend_from_slice(
        format!(
            "\r\n--{boundary}\r\nContent-Disposition: form-data; name=\"type\"\r\n\r\n{}\r\n--{boundary}--\r\n",
            kind.upload_type()
        )
        .as_bytes(),
    );
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn server_message_prefers_json_message() {
        assert_eq!(
            server_message(400, r#"{"message":"Email already registered"}"#),
            "Email already registered"
        );
        assert_eq!(server_message(500, "<html>oops</html>"), "HTTP error! status: 500");
        assert_eq!(server_message(502, r#"{"message":""}"#), "HTTP error! status: 502");
    }

    #[test]
    fn logged_excerpt_stops_on_char_boundary() {
        assert_eq!(excerpt("short"), "short");
        let body = format!("{}é tail", "a".repeat(LOGGED_BODY_BYTES - 1));
        let cut = excerpt(&body);
        assert_eq!(cut.len(), LOGGED_BODY_BYTES - 1);
        assert!(cut.chars().all(|ch| ch == 'a'));
    }

    #[test]
    fn upload_path_takes_first_present_key() {
        assert_eq!(
            uploaded_path(&json!({ "url": "/u/1.pdf", "path": "/p/1.pdf" })),
            Some("/u/1.pdf".to_string())
        );
        assert_eq!(
            uploaded_path(&json!({ "filePath": "", "path": "/p/1.pdf" })),
            Some("/p/1.pdf".to_string())
        );
        assert_eq!(uploaded_path(&json!({ "ok": true })), None);
    }

    #[test]
    fn multipart_body_carries_file_and_type_parts() {
        let file = Attachment::new("kra \"pin\".pdf", "application/pdf", b"%PDF-1.4".to_vec());
        let body = multipart_body("XYZ", &file, DocumentKind::TaxCertificate);
        let text = String::from_utf8(body).expect("utf8 body");
        assert!(text.starts_with("--XYZ\r\n"));
        assert!(text.contains("filename=\"kra \\\"pin\\\".pdf\""));
        assert!(text.contains("Content-Type: application/pdf\r\n\r\n%PDF-1.4\r\n"));
        assert!(text.contains("name=\"type\"\r\n\r\nkrapin\r\n"));
        assert!(text.ends_with("--XYZ--\r\n"));
    }
}
