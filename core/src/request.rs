//! Configurable one-shot request over a single engine handle.
//!
//! # Design
//! `Request` owns one `curl::easy::Easy` handle for its whole lifetime and
//! records every configuration call as plain owned data. `execute` applies
//! the accumulated configuration onto the handle, runs the blocking
//! transfer, and folds every outcome (including transport failure) into a
//! returned `Response`. Because nothing is consumed by a transfer, a
//! `Request` can be executed again with the same configuration, though a
//! fresh request per call is the expected pattern.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use curl::easy::{Easy, Form, List};
use tracing::{debug, trace};

use crate::error::Error;
use crate::init;
use crate::method::Method;
use crate::response::Response;

/// One recorded multipart part; the engine form is rebuilt from these on
/// every `execute`.
#[derive(Debug, Clone)]
enum FormPart {
    File {
        name: String,
        path: PathBuf,
        filename: String,
    },
    Field {
        name: String,
        data: Vec<u8>,
    },
}

/// A single HTTP request: accumulate configuration, then `execute`.
///
/// The handle, header storage, and form parts are exclusively owned and
/// released when the `Request` is dropped. A `Request` is `Send` but not
/// `Sync`; use it from one thread at a time.
pub struct Request {
    handle: Easy,
    url: String,
    method: Method,
    headers: Vec<String>,
    body: Option<Vec<u8>>,
    proxy: Option<String>,
    user_agent: Option<String>,
    verify_ssl: Option<bool>,
    timeout: Option<Duration>,
    form: Option<Vec<FormPart>>,
}

/// Failure raised while applying configuration or performing the transfer.
/// Never escapes `execute`; it is rendered into the `Response` diagnostic.
#[derive(Debug, thiserror::Error)]
enum TransferError {
    #[error("{0}")]
    Engine(#[from] curl::Error),
    #[error("{0}")]
    Form(#[from] curl::FormError),
}

impl TransferError {
    /// Symbolic engine error plus whatever the engine wrote into its
    /// diagnostic buffer for this transfer.
    fn diagnostic(&self) -> String {
        match self {
            TransferError::Engine(err) => match err.extra_description() {
                Some(extra) => format!("{} {}", err.description(), extra),
                None => err.description().to_string(),
            },
            TransferError::Form(err) => err.to_string(),
        }
    }
}

impl Request {
    /// Create a request for `method` on `url`, acquiring a fresh engine
    /// handle.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        init::ensure_initialized();
        Self {
            handle: Easy::new(),
            url: url.into(),
            method,
            headers: Vec::new(),
            body: None,
            proxy: None,
            user_agent: None,
            verify_ssl: None,
            timeout: None,
            form: None,
        }
    }

    /// The target URL, as given at construction.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The HTTP verb this request will use.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Toggle TLS peer verification.
    pub fn set_verify_ssl(&mut self, verify: bool) {
        self.verify_ssl = Some(verify);
    }

    /// Route the transfer through an outbound proxy.
    pub fn set_proxy(&mut self, proxy: impl Into<String>) {
        self.proxy = Some(proxy.into());
    }

    /// Append a `name: value` header. Repeated names are all sent, in call
    /// order; nothing is deduplicated or merged.
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.push(format!("{name}: {value}"));
    }

    /// Set the request body. The engine copies the bytes when the transfer
    /// is applied, so the caller keeps no obligations.
    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) {
        self.body = Some(body.into());
    }

    /// Set the User-Agent directly on the handle, bypassing the header
    /// list.
    pub fn set_user_agent(&mut self, agent: impl Into<String>) {
        self.user_agent = Some(agent.into());
    }

    /// Bound the whole transfer (connect through last byte) by `timeout`.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    /// Start building a multipart form. Must be called before `add_file` /
    /// `add_field`; calling it again discards any parts added so far.
    pub fn make_form(&mut self) {
        self.form = Some(Vec::new());
    }

    /// Append a file-backed part. The file must exist, unmodified, until
    /// `execute` returns; the engine streams it during the transfer.
    pub fn add_file(
        &mut self,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        filename: impl Into<String>,
    ) -> Result<(), Error> {
        let form = self.form.as_mut().ok_or(Error::FormNotInitialized)?;
        form.push(FormPart::File {
            name: name.into(),
            path: path.into(),
            filename: filename.into(),
        });
        Ok(())
    }

    /// Append an in-memory data part.
    pub fn add_field(
        &mut self,
        name: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Result<(), Error> {
        let form = self.form.as_mut().ok_or(Error::FormNotInitialized)?;
        form.push(FormPart::Field {
            name: name.into(),
            data: data.into(),
        });
        Ok(())
    }

    /// Perform the blocking transfer and return its outcome.
    ///
    /// Total: transport failures (DNS, connect, TLS, timeout, malformed
    /// URL) come back as a `Response` with a reserved status code and a
    /// diagnostic string, never as a panic or an `Err`. Server-side 4xx
    /// and 5xx statuses are ordinary non-error responses.
    pub fn execute(&mut self) -> Response {
        init::ensure_initialized();
        trace!(method = %self.method, url = %self.url, "performing transfer");
        match self.transfer() {
            Ok((status_code, body)) => {
                let mut response = Response::new(self.url.clone(), status_code);
                response.text = String::from_utf8_lossy(&body).into_owned();
                response
            }
            Err(err) => {
                let diagnostic = err.diagnostic();
                debug!(url = %self.url, error = %diagnostic, "transfer failed");
                Response::transfer_failed(self.url.clone(), diagnostic)
            }
        }
    }

    /// Apply the accumulated configuration onto the handle and perform.
    fn transfer(&mut self) -> Result<(u16, Vec<u8>), TransferError> {
        self.handle.signal(false)?;
        self.handle.custom_request(self.method.as_str())?;
        self.handle.url(&self.url)?;
        self.handle.follow_location(true)?;
        if let Some(verify) = self.verify_ssl {
            self.handle.ssl_verify_peer(verify)?;
        }
        if let Some(proxy) = &self.proxy {
            self.handle.proxy(proxy)?;
        }
        if let Some(agent) = &self.user_agent {
            self.handle.useragent(agent)?;
        }
        if let Some(timeout) = self.timeout {
            self.handle.timeout(timeout)?;
        }
        if let Some(body) = &self.body {
            self.handle.post_fields_copy(body)?;
        }
        if !self.headers.is_empty() {
            let mut list = List::new();
            for header in &self.headers {
                list.append(header)?;
            }
            self.handle.http_headers(list)?;
        }
        if let Some(parts) = &self.form {
            let mut form = Form::new();
            for part in parts {
                match part {
                    FormPart::Field { name, data } => {
                        form.part(name).contents(data).add()?;
                    }
                    FormPart::File {
                        name,
                        path,
                        filename,
                    } => {
                        form.part(name).file(path).filename(filename).add()?;
                    }
                }
            }
            self.handle.httppost(form)?;
        }

        let mut body = Vec::new();
        {
            let mut transfer = self.handle.transfer();
            transfer.write_function(|chunk| {
                body.extend_from_slice(chunk);
                Ok(chunk.len())
            })?;
            transfer.perform()?;
        }
        let status_code = self.handle.response_code()? as u16;
        Ok((status_code, body))
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &self.headers.len())
            .field("has_form", &self.form.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::STATUS_TRANSFER_FAILED;

    #[test]
    fn headers_keep_duplicates_in_call_order() {
        let mut request = Request::new(Method::Get, "http://localhost");
        request.set_header("X-Token", "1");
        request.set_header("X-Token", "2");
        assert_eq!(request.headers, vec!["X-Token: 1", "X-Token: 2"]);
    }

    #[test]
    fn add_field_before_make_form_is_rejected() {
        let mut request = Request::new(Method::Post, "http://localhost");
        let err = request.add_field("a", "b").unwrap_err();
        assert_eq!(err, Error::FormNotInitialized);
    }

    #[test]
    fn add_file_before_make_form_is_rejected() {
        let mut request = Request::new(Method::Post, "http://localhost");
        let err = request.add_file("upload", "/tmp/nope", "nope.txt").unwrap_err();
        assert_eq!(err, Error::FormNotInitialized);
    }

    #[test]
    fn make_form_twice_discards_previous_parts() {
        let mut request = Request::new(Method::Post, "http://localhost");
        request.make_form();
        request.add_field("a", "b").unwrap();
        request.make_form();
        assert_eq!(request.form.as_ref().map(Vec::len), Some(0));
    }

    #[test]
    fn malformed_url_is_a_transfer_failure_not_a_panic() {
        let mut request = Request::new(Method::Get, "not a url");
        let response = request.execute();
        assert!(response.error);
        assert_eq!(response.status_code, STATUS_TRANSFER_FAILED);
        assert!(!response.error_string.is_empty());
        assert!(response.text.is_empty());
    }

    #[test]
    fn dropping_an_unexecuted_request_is_clean() {
        let mut request = Request::new(Method::Put, "http://localhost");
        request.set_header("X-A", "1");
        request.set_body("payload");
        request.make_form();
        request.add_field("a", "b").unwrap();
        drop(request);
    }

    #[test]
    fn request_moves_between_owners() {
        fn assert_send<T: Send>() {}
        assert_send::<Request>();

        let request = Request::new(Method::Delete, "http://localhost/thing");
        let mut moved = request;
        assert_eq!(moved.url(), "http://localhost/thing");
        assert_eq!(moved.method(), Method::Delete);
        moved.set_header("X-After-Move", "ok");
        drop(moved);
    }

    #[test]
    fn accessors_echo_construction_inputs() {
        let request = Request::new(Method::Patch, "http://example.com/v1");
        assert_eq!(request.url(), "http://example.com/v1");
        assert_eq!(request.method().as_str(), "PATCH");
    }
}
