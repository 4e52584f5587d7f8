// Copyright (c) 2020 Rafael Alcaraz Mercado. All rights reserved.
// Licensed under the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>.
// All files in the project carrying such notice may not be copied, modified, or distributed
// except according to those terms.
// THE SOURCE CODE IS AVAILABLE UNDER THE ABOVE CHOSEN LICENSE "AS IS", WITH NO WARRANTIES.

//! HTTP layer of the Harbor API. A [`Request`] describes where each parameter of
//! an operation goes (path, query, header or JSON body) and which status the
//! operation answers with on success; [`Transport`] sends it and turns every
//! other status into a [`TransportError::Status`] tagged with the operation.

use crate::config::Credentials;
use crate::operation::Operation;
use crate::schema::ResponseErrors;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const X_REQUEST_ID: &str = "X-Request-Id";
pub const X_TOTAL_COUNT: &str = "X-Total-Count";
pub const X_IS_RESOURCE_NAME: &str = "X-Is-Resource-Name";

/// Base path of the Harbor API, used when the client url carries no path.
pub const API_BASE_PATH: &str = "/api/v2.0";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid Harbor url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{operation}: failed to encode request body: {source}")]
    Encode {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },

    #[error("{operation}: request failed: {source}")]
    Request {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },

    #[error("{operation}: failed to decode response payload: {source}")]
    Decode {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },

    #[error("{operation}: Harbor API returned {status}: {errors}")]
    Status {
        operation: Operation,
        status: StatusCode,
        errors: ApiErrors,
    },
}

impl TransportError {
    /// Returns the operation and status of an error response from the server.
    pub fn operation_status(&self) -> Option<(Operation, StatusCode)> {
        match self {
            TransportError::Status {
                operation, status, ..
            } => Some((*operation, *status)),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.operation_status().map(|(_, status)| status)
    }
}

/// Body of a failed Harbor API response.
#[derive(Debug)]
pub enum ApiErrors {
    RawText(String),
    ApiError(ResponseErrors),
}

impl std::fmt::Display for ApiErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ApiErrors::RawText(text) => write!(f, "{}", text),
            ApiErrors::ApiError(response) => {
                let messages: Vec<String> = response
                    .errors
                    .iter()
                    .map(|error| format!("{}: {}", error.code, error.message))
                    .collect();
                write!(f, "{}", messages.join("; "))
            }
        }
    }
}

pub async fn get_harbor_api_error(response: reqwest::Response) -> ApiErrors {
    let raw_text = response.text().await.unwrap_or_default();
    match serde_json::from_str(&raw_text) {
        Ok(errors) => ApiErrors::ApiError(errors),
        Err(_) => ApiErrors::RawText(raw_text),
    }
}

/// Decoded response of a successful call.
#[derive(Debug)]
pub struct Response<T> {
    pub payload: T,
    /// Value of the `X-Total-Count` header sent with paged results.
    pub total_count: Option<i64>,
}

/// A single Harbor API call.
#[derive(Debug)]
pub struct Request {
    operation: Operation,
    method: Method,
    segments: Vec<String>,
    query: Vec<(&'static str, String)>,
    headers: Vec<(&'static str, String)>,
    body: Option<Result<Vec<u8>, serde_json::Error>>,
    success: StatusCode,
    tolerated: Vec<StatusCode>,
    timeout: Option<Duration>,
}

impl Request {
    /// Creates a request for `operation` on the path built from `segments`.
    /// Each segment is percent-encoded on its own, slashes included.
    pub fn new(operation: Operation, method: Method, segments: &[&str]) -> Request {
        Request {
            operation,
            method,
            segments: segments.iter().map(|s| s.to_string()).collect(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            success: StatusCode::OK,
            tolerated: Vec::new(),
            timeout: None,
        }
    }

    pub fn get(operation: Operation, segments: &[&str]) -> Request {
        Request::new(operation, Method::GET, segments)
    }

    pub fn head(operation: Operation, segments: &[&str]) -> Request {
        Request::new(operation, Method::HEAD, segments)
    }

    pub fn post(operation: Operation, segments: &[&str]) -> Request {
        Request::new(operation, Method::POST, segments)
    }

    pub fn put(operation: Operation, segments: &[&str]) -> Request {
        Request::new(operation, Method::PUT, segments)
    }

    pub fn patch(operation: Operation, segments: &[&str]) -> Request {
        Request::new(operation, Method::PATCH, segments)
    }

    pub fn delete(operation: Operation, segments: &[&str]) -> Request {
        Request::new(operation, Method::DELETE, segments)
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn query(mut self, key: &'static str, value: impl ToString) -> Request {
        self.query.push((key, value.to_string()));
        self
    }

    /// Adds the query parameter only when a value is supplied.
    pub fn query_opt(self, key: &'static str, value: Option<impl ToString>) -> Request {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Adds the query parameter only when the value is not empty.
    pub fn query_non_empty(self, key: &'static str, value: &str) -> Request {
        if value.is_empty() {
            self
        } else {
            self.query(key, value)
        }
    }

    pub fn header(mut self, name: &'static str, value: impl ToString) -> Request {
        self.headers.push((name, value.to_string()));
        self
    }

    /// Tells Harbor how to read a `project_name_or_id` path parameter.
    /// Numeric values are taken as IDs unless flagged as names.
    pub fn resource_name(self, name_or_id: &str) -> Request {
        if name_or_id.parse::<i64>().is_ok() {
            self
        } else {
            self.header(X_IS_RESOURCE_NAME, true)
        }
    }

    /// Flags a `project_name_or_id` path parameter as a name, even an all-digit one.
    pub fn by_name(self) -> Request {
        self.header(X_IS_RESOURCE_NAME, true)
    }

    /// Serializes `body` as the JSON request body. Encoding errors surface when sending.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Request {
        self.body = Some(serde_json::to_vec(body));
        self
    }

    /// Sets the documented success status of the operation (200 by default).
    pub fn expect(mut self, status: StatusCode) -> Request {
        self.success = status;
        self
    }

    /// Accepts an undocumented status as success as well.
    pub fn tolerate(mut self, status: StatusCode) -> Request {
        self.tolerated.push(status);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Request {
        self.timeout = Some(timeout);
        self
    }

    /// Adds the paging parameters for `page` plus the query and sort options.
    /// An explicit `q` already on the request takes precedence over the option.
    pub fn page(self, options: &crate::ClientOptions, page: i64) -> Request {
        let has_query = self.query.iter().any(|(key, _)| *key == "q");
        let mut request = self.query("page", page).query("page_size", options.page_size);
        if !has_query {
            request = request.query_non_empty("q", &options.query);
        }
        request.query_non_empty("sort", &options.sort)
    }
}

/// Sends requests to a Harbor instance.
#[derive(Debug, Clone)]
pub struct Transport {
    base: Url,
    http: reqwest::Client,
    credentials: Credentials,
}

impl Transport {
    /// Creates a transport for the Harbor instance at `url`. A url without a path
    /// is completed with the API base path (`/api/v2.0`).
    pub fn new(
        url: &str,
        http: reqwest::Client,
        credentials: Credentials,
    ) -> Result<Transport, TransportError> {
        let mut base = Url::parse(url).map_err(|e| TransportError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(TransportError::InvalidUrl {
                url: url.to_string(),
                reason: String::from("url cannot be a base"),
            });
        }
        if base.path() == "/" {
            base.set_path(API_BASE_PATH);
        }

        Ok(Transport {
            base,
            http,
            credentials,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Returns whether requests carry credentials.
    pub fn has_auth(&self) -> bool {
        self.credentials != Credentials::Anonymous
    }

    /// Adds authentication to request builder.
    fn add_builder_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Credentials::Basic { username, password } => {
                log::debug!("Using basic authentication");
                builder.basic_auth(username, Some(password))
            }
            Credentials::Anonymous => builder,
        }
    }

    fn url(&self, segments: &[String]) -> Result<Url, TransportError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::InvalidUrl {
                url: self.base.to_string(),
                reason: String::from("url cannot be a base"),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends the request and decodes the JSON payload. An empty body decodes as `null`.
    pub async fn send<T>(&self, request: Request) -> Result<Response<T>, TransportError>
    where
        T: DeserializeOwned,
    {
        let operation = request.operation;
        let response = self.dispatch(request).await?;
        let total_count = total_count(&response);
        let raw_data = response
            .text()
            .await
            .map_err(|source| TransportError::Request { operation, source })?;
        log::trace!("Operation:{} RawData:{}", operation, &raw_data);

        let raw_data = if raw_data.trim().is_empty() {
            "null"
        } else {
            raw_data.as_str()
        };
        let payload = serde_json::from_str(raw_data)
            .map_err(|source| TransportError::Decode { operation, source })?;

        Ok(Response {
            payload,
            total_count,
        })
    }

    /// Sends the request and discards whatever body comes back with the success status.
    pub async fn send_empty(&self, request: Request) -> Result<Response<()>, TransportError> {
        let operation = request.operation;
        let response = self.dispatch(request).await?;
        let total_count = total_count(&response);
        let raw_data = response
            .text()
            .await
            .map_err(|source| TransportError::Request { operation, source })?;
        log::trace!("Operation:{} RawData:{}", operation, &raw_data);

        Ok(Response {
            payload: (),
            total_count,
        })
    }

    /// Sends the request and returns the body as text.
    pub async fn send_text(&self, request: Request) -> Result<Response<String>, TransportError> {
        let operation = request.operation;
        let response = self.dispatch(request).await?;
        let total_count = total_count(&response);
        let payload = response
            .text()
            .await
            .map_err(|source| TransportError::Request { operation, source })?;

        Ok(Response {
            payload,
            total_count,
        })
    }

    async fn dispatch(&self, request: Request) -> Result<reqwest::Response, TransportError> {
        let Request {
            operation,
            method,
            segments,
            query,
            headers,
            body,
            success,
            tolerated,
            timeout,
        } = request;

        let url = self.url(&segments)?;
        let request_id = uuid::Uuid::new_v4().to_string();
        log::debug!(
            "{} -- {} {} request_id:{}",
            operation,
            &method,
            &url,
            &request_id
        );

        let mut builder = self
            .http
            .request(method, url)
            .header(X_REQUEST_ID, &request_id);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        for (name, value) in &headers {
            builder = builder.header(*name, value);
        }
        if let Some(body) = body {
            let body = body.map_err(|source| TransportError::Encode { operation, source })?;
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        builder = self.add_builder_auth(builder);

        let response = builder
            .send()
            .await
            .map_err(|source| TransportError::Request { operation, source })?;
        log::trace!(
            "Operation:{} RequestId:{} Response:{:?}",
            operation,
            &request_id,
            response
        );

        let status = response.status();
        if status == success {
            return Ok(response);
        }
        if tolerated.contains(&status) {
            log::warn!(
                "{} answered {} instead of {}, accepting it as success",
                operation,
                status,
                success
            );
            return Ok(response);
        }

        Err(TransportError::Status {
            operation,
            status,
            errors: get_harbor_api_error(response).await,
        })
    }
}

fn total_count(response: &reqwest::Response) -> Option<i64> {
    response
        .headers()
        .get(X_TOTAL_COUNT)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{api, harbor_error};
    use rstest::rstest;
    use wiremock::matchers::{
        basic_auth, body_json, header, header_exists, method, path, query_param,
    };
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport(server: &MockServer) -> Transport {
        Transport::new(
            &server.uri(),
            reqwest::Client::new(),
            Credentials::basic("admin", "Harbor12345"),
        )
        .unwrap()
    }

    #[test]
    fn base_path_is_completed() {
        let transport = Transport::new(
            "https://harbor.example.com",
            reqwest::Client::new(),
            Credentials::Anonymous,
        )
        .unwrap();
        assert_eq!(transport.base().as_str(), "https://harbor.example.com/api/v2.0");

        let transport = Transport::new(
            "https://harbor.example.com/proxy/api/v2.0",
            reqwest::Client::new(),
            Credentials::Anonymous,
        )
        .unwrap();
        assert_eq!(transport.base().path(), "/proxy/api/v2.0");
    }

    #[test]
    fn segments_are_escaped_individually() {
        let transport = Transport::new(
            "https://harbor.example.com",
            reqwest::Client::new(),
            Credentials::Anonymous,
        )
        .unwrap();
        let url = transport
            .url(&[
                String::from("projects"),
                String::from("library"),
                String::from("repositories"),
                String::from("a%2Fb"),
            ])
            .unwrap();
        assert_eq!(url.path(), "/api/v2.0/projects/library/repositories/a%252Fb");
    }

    #[test]
    fn resource_name_header_only_for_names() {
        let request = Request::get(Operation::GetProject, &["projects", "42"]).resource_name("42");
        assert!(request.headers.is_empty());

        let request =
            Request::get(Operation::GetProject, &["projects", "library"]).resource_name("library");
        assert_eq!(
            request.headers,
            vec![(X_IS_RESOURCE_NAME, String::from("true"))]
        );
    }

    #[test]
    fn by_name_flags_numeric_names() {
        let request = Request::get(Operation::GetProject, &["projects", "42"]).by_name();
        assert_eq!(
            request.headers,
            vec![(X_IS_RESOURCE_NAME, String::from("true"))]
        );
    }

    #[test]
    fn explicit_query_wins_over_options() {
        let options = crate::ClientOptions::default()
            .with_query("name=~other")
            .with_sort("name");
        let request = Request::get(Operation::ListRegistries, &["registries"])
            .query("q", "name=docker-hub")
            .page(&options, 2);
        assert_eq!(
            request.query,
            vec![
                ("q", String::from("name=docker-hub")),
                ("page", String::from("2")),
                ("page_size", String::from("10")),
                ("sort", String::from("name")),
            ]
        );
    }

    #[test]
    fn api_errors_display() {
        let errors: ResponseErrors = serde_json::from_str(
            r#"{"errors":[{"code":"NOT_FOUND","message":"project 7 not found"}]}"#,
        )
        .unwrap();
        assert_eq!(
            ApiErrors::ApiError(errors).to_string(),
            "NOT_FOUND: project 7 not found"
        );
        assert_eq!(ApiErrors::RawText(String::from("oops")).to_string(), "oops");
    }

    #[tokio::test]
    async fn send_decodes_payload_and_total_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(api("/labels")))
            .and(basic_auth("admin", "Harbor12345"))
            .and(header_exists(X_REQUEST_ID))
            .and(query_param("scope", "g"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header(X_TOTAL_COUNT, "7")
                    .set_body_json(serde_json::json!([1, 2, 3])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response: Response<Vec<i64>> = transport(&server)
            .send(Request::get(Operation::ListLabels, &["labels"]).query("scope", "g"))
            .await
            .unwrap();
        assert_eq!(response.payload, vec![1, 2, 3]);
        assert_eq!(response.total_count, Some(7));
    }

    #[tokio::test]
    async fn send_posts_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(api("/labels")))
            .and(header("Content-Type", "application/json"))
            .and(body_json(serde_json::json!({ "name": "qa" })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let response: Response<()> = transport(&server)
            .send(
                Request::post(Operation::CreateLabel, &["labels"])
                    .json(&serde_json::json!({ "name": "qa" }))
                    .expect(StatusCode::CREATED),
            )
            .await
            .unwrap();
        assert_eq!(response.total_count, None);
    }

    #[rstest]
    #[case(200)]
    #[case(201)]
    #[tokio::test]
    async fn send_empty_ignores_success_body(#[case] status: u16) {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(api("/projects/3")))
            .respond_with(
                ResponseTemplate::new(status)
                    .set_body_json(serde_json::json!({ "project_id": 3, "name": "library" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let request = Request::put(Operation::UpdateProject, &["projects", "3"])
            .expect(StatusCode::from_u16(status).unwrap());
        let response = transport(&server).send_empty(request).await.unwrap();
        assert_eq!(response.total_count, None);
    }

    #[tokio::test]
    async fn send_empty_keeps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path(api("/labels/4")))
            .respond_with(harbor_error(404))
            .mount(&server)
            .await;

        let err = transport(&server)
            .send_empty(Request::delete(Operation::DeleteLabel, &["labels", "4"]))
            .await
            .unwrap_err();
        assert_eq!(
            err.operation_status(),
            Some((Operation::DeleteLabel, StatusCode::NOT_FOUND))
        );
    }

    #[tokio::test]
    async fn undocumented_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(api("/retentions")))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let err = transport(&server)
            .send::<()>(
                Request::post(Operation::CreateRetention, &["retentions"])
                    .expect(StatusCode::CREATED),
            )
            .await
            .unwrap_err();
        assert_eq!(
            err.operation_status(),
            Some((Operation::CreateRetention, StatusCode::OK))
        );
    }

    #[tokio::test]
    async fn tolerated_status_is_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(api("/retentions")))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let response = transport(&server)
            .send::<()>(
                Request::post(Operation::CreateRetention, &["retentions"])
                    .expect(StatusCode::CREATED)
                    .tolerate(StatusCode::OK),
            )
            .await;
        assert!(response.is_ok());
    }

    #[tokio::test]
    async fn error_status_keeps_harbor_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(api("/projects/library")))
            .respond_with(harbor_error(404))
            .mount(&server)
            .await;

        let err = transport(&server)
            .send::<()>(Request::get(Operation::GetProject, &["projects", "library"]))
            .await
            .unwrap_err();
        match err {
            TransportError::Status {
                operation,
                status,
                errors: ApiErrors::ApiError(errors),
            } => {
                assert_eq!(operation, Operation::GetProject);
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(errors.errors[0].message, "status 404");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn error_status_keeps_raw_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(api("/ping")))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = transport(&server)
            .send_text(Request::get(Operation::GetPing, &["ping"]))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
        assert!(err.to_string().ends_with("bad gateway"));
    }

    #[tokio::test]
    async fn undecodable_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(api("/health")))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let err = transport(&server)
            .send::<serde_json::Value>(Request::get(Operation::GetHealth, &["health"]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TransportError::Decode {
                operation: Operation::GetHealth,
                ..
            }
        ));
    }
}
