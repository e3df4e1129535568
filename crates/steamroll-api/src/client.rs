/*
 * client.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Blocking REST client
 */

use crate::auth::{AuthConfig, normalize_base};
use crate::error::{ApiError, Result};
use crate::resource::Resource;
use reqwest::Method;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

/// Operations against the remote API.
///
/// Every call is synchronous and either returns the decoded response or an
/// error; nothing is retried.
pub trait Api {
    /// GET a single object.
    fn fetch_single(&self, resource: &Resource) -> Result<Value>;

    /// GET a paginated list, following `next` links and concatenating the
    /// `results` of every page.
    fn fetch_all(&self, resource: &Resource) -> Result<Vec<Value>>;

    /// POST `body` and return the created object.
    fn post(&self, resource: &Resource, body: &Value) -> Result<Value>;

    /// PATCH `body` and return the updated object.
    fn patch(&self, resource: &Resource, body: &Value) -> Result<Value>;

    /// PUT `body` and return the updated object.
    fn put(&self, resource: &Resource, body: &Value) -> Result<Value>;

    /// DELETE the resource.
    fn delete(&self, resource: &Resource) -> Result<()>;
}

/// [`Api`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpApi {
    base: String,
    client: Client,
}

impl HttpApi {
    /// Create a client for `base` with the credentials configured for it.
    ///
    /// # Errors
    ///
    /// [`ApiError::MissingAuth`] if `auth` has no entry for the base,
    /// [`ApiError::Config`] if a configured header is not a valid header.
    pub fn new(base: &str, auth: &AuthConfig) -> Result<Self> {
        let base = normalize_base(base);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (name, value) in auth.headers_for(&base)? {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|err| ApiError::Config(format!("header name '{}': {}", name, err)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|err| ApiError::Config(format!("header '{}': {}", name, err)))?;
            headers.insert(name, value);
        }

        let client = Client::builder()
            .user_agent(steamroll_util::user_agent())
            .default_headers(headers)
            .build()
            .map_err(|err| ApiError::Config(format!("HTTP client: {}", err)))?;

        Ok(Self { base, client })
    }

    /// The normalized base URL.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Full URL of a resource: `<base>/api/v1/<resource>/`.
    pub fn url(&self, resource: &Resource) -> String {
        format!("{}/api/v1/{}/", self.base, resource)
    }

    fn get(&self, url: &str) -> Result<Value> {
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| transport(&Method::GET, url, "", source))?;
        decode(Method::GET, url, String::new(), response)
    }

    fn send_json(&self, method: Method, resource: &Resource, body: &Value) -> Result<Value> {
        let url = self.url(resource);
        let sent = serde_json::to_string(body).map_err(|source| ApiError::Decode {
            url: url.clone(),
            source,
        })?;
        tracing::debug!(%method, %url, "Sending request");

        let response = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json")
            .body(sent.clone())
            .send()
            .map_err(|source| transport(&method, &url, &sent, source))?;
        decode(method, &url, sent, response)
    }
}

impl Api for HttpApi {
    fn fetch_single(&self, resource: &Resource) -> Result<Value> {
        self.get(&self.url(resource))
    }

    fn fetch_all(&self, resource: &Resource) -> Result<Vec<Value>> {
        let mut url = self.url(resource);
        let mut results = Vec::new();
        loop {
            let page = self.get(&url)?;
            let (items, next) = split_page(&url, page)?;
            results.extend(items);
            match next {
                Some(next) => url = next,
                None => break,
            }
        }
        tracing::debug!(%resource, count = results.len(), "Fetched list");
        Ok(results)
    }

    fn post(&self, resource: &Resource, body: &Value) -> Result<Value> {
        self.send_json(Method::POST, resource, body)
    }

    fn patch(&self, resource: &Resource, body: &Value) -> Result<Value> {
        self.send_json(Method::PATCH, resource, body)
    }

    fn put(&self, resource: &Resource, body: &Value) -> Result<Value> {
        self.send_json(Method::PUT, resource, body)
    }

    fn delete(&self, resource: &Resource) -> Result<()> {
        let url = self.url(resource);
        tracing::debug!(%url, "DELETE");
        let response = self
            .client
            .delete(&url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .map_err(|source| transport(&Method::DELETE, &url, "", source))?;
        decode(Method::DELETE, &url, String::new(), response).map(|_| ())
    }
}

/// The request never got a response. Logged like a failed request, minus
/// the status.
fn transport(method: &Method, url: &str, sent: &str, source: reqwest::Error) -> ApiError {
    tracing::error!(%method, %url, sent = %sent, error = %source, "Request failed");
    ApiError::Transport {
        method: method.to_string(),
        url: url.to_string(),
        sent: sent.to_string(),
        source,
    }
}

/// Check the status and decode the body. An empty body decodes as null.
fn decode(
    method: Method,
    url: &str,
    sent: String,
    response: reqwest::blocking::Response,
) -> Result<Value> {
    let status = response.status();
    let text = response
        .text()
        .map_err(|source| transport(&method, url, &sent, source))?;

    if !status.is_success() {
        tracing::error!(
            %method,
            %url,
            sent = %sent,
            status = status.as_u16(),
            body = %text,
            "Request failed"
        );
        return Err(ApiError::Request {
            method: method.to_string(),
            url: url.to_string(),
            sent,
            status: status.as_u16(),
            body: text,
        });
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|source| ApiError::Decode {
        url: url.to_string(),
        source,
    })
}

/// Split one page of a paginated list into its results and the next URL.
fn split_page(url: &str, page: Value) -> Result<(Vec<Value>, Option<String>)> {
    let Value::Object(mut page) = page else {
        return Err(ApiError::Unexpected {
            url: url.to_string(),
            message: "expected a paginated object".to_string(),
        });
    };
    let results = match page.remove("results") {
        Some(Value::Array(results)) => results,
        _ => {
            return Err(ApiError::Unexpected {
                url: url.to_string(),
                message: "missing 'results' list".to_string(),
            });
        }
    };
    let next = match page.remove("next") {
        Some(Value::String(next)) if !next.is_empty() => Some(next),
        _ => None,
    };
    Ok((results, next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn auth() -> AuthConfig {
        let mut auth = AuthConfig::new();
        auth.insert("pretix.example", "Authorization", "Token abc");
        auth
    }

    #[test]
    fn test_url() {
        let api = HttpApi::new("pretix.example", &auth()).unwrap();
        assert_eq!(api.base(), "https://pretix.example");
        assert_eq!(
            api.url(&Resource::event("acme", "conf").join("items")),
            "https://pretix.example/api/v1/organizers/acme/events/conf/items/"
        );
    }

    #[test]
    fn test_missing_auth() {
        let err = HttpApi::new("localhost:8000", &auth()).unwrap_err();
        assert!(matches!(err, ApiError::MissingAuth { .. }));
    }

    #[test]
    fn test_invalid_header() {
        let mut auth = AuthConfig::new();
        auth.insert("pretix.example", "Bad Header", "x");
        let err = HttpApi::new("pretix.example", &auth).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn test_transport_error_carries_request() {
        let mut auth = AuthConfig::new();
        auth.insert("http://localhost:99999", "Authorization", "Token abc");
        let api = HttpApi::new("http://localhost:99999", &auth).unwrap();

        let err = api
            .post(&Resource::events("acme"), &json!({"slug": "conf"}))
            .unwrap_err();
        match err {
            ApiError::Transport { method, url, sent, .. } => {
                assert_eq!(method, "POST");
                assert_eq!(url, "http://localhost:99999/api/v1/organizers/acme/events/");
                assert_eq!(sent, r#"{"slug":"conf"}"#);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_split_page() {
        let (results, next) = split_page(
            "u",
            json!({
                "count": 3,
                "next": "https://pretix.example/api/v1/x/?page=2",
                "results": [{"id": 1}],
            }),
        )
        .unwrap();
        assert_eq!(results, vec![json!({"id": 1})]);
        assert_eq!(next.as_deref(), Some("https://pretix.example/api/v1/x/?page=2"));

        let (_, next) = split_page("u", json!({"next": null, "results": []})).unwrap();
        assert!(next.is_none());
    }

    #[test]
    fn test_split_page_rejects_non_pages() {
        assert!(matches!(split_page("u", json!([1, 2])), Err(ApiError::Unexpected { .. })));
        assert!(matches!(split_page("u", json!({"next": null})), Err(ApiError::Unexpected { .. })));
    }
}
