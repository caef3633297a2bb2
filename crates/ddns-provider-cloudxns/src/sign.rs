//! CloudXNS request signing
//!
//! Every request carries `API-HMAC = md5(api_key + url + body + date + secret_key)`
//! in lower-case hex. `body` is the JSON body for POST and PUT requests with
//! parameters, and empty otherwise (GET, DELETE, or no parameters). The
//! server recomputes the digest, so the URL and body must be sent exactly
//! as signed.

use chrono::{DateTime, Utc};
use ddns_core::{Error, Result};
use md5::{Digest, Md5};
use serde_json::{Map, Value};

/// HTTP methods accepted by the CloudXNS API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether the JSON body takes part in the signature
    fn signs_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Format the `API-REQUEST-DATE` header value
///
/// `Fri, 01 Dec 2000 16:01:07 +0000`: the day is always two digits, unlike
/// `DateTime::to_rfc2822`. The string is part of the signature, so the
/// server-side format has to be matched exactly.
pub fn request_date(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S %z").to_string()
}

/// Compute the `API-HMAC` header value
pub fn sign(api_key: &str, url: &str, body: &str, date: &str, secret_key: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(api_key.as_bytes());
    hasher.update(url.as_bytes());
    hasher.update(body.as_bytes());
    hasher.update(date.as_bytes());
    hasher.update(secret_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// A fully signed request, ready to send once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub method: HttpMethod,
    /// Full URL including the query string
    pub url: String,
    /// JSON body, sent for non-GET requests with parameters
    pub body: Option<String>,
    /// `API-REQUEST-DATE` header value
    pub date: String,
    /// `API-HMAC` header value
    pub hmac: String,
}

impl SignedRequest {
    /// Lay out and sign a request
    ///
    /// GET parameters become a form-urlencoded query string in key order;
    /// `null` values are skipped. Other methods carry the parameters as a
    /// JSON object body.
    pub fn build(
        api_key: &str,
        secret_key: &str,
        base_url: &str,
        path: &str,
        method: HttpMethod,
        params: &Map<String, Value>,
        date: String,
    ) -> Result<Self> {
        let mut url = format!("{base_url}{path}");
        let mut body = None;

        if method == HttpMethod::Get {
            let query = query_string(params);
            if !query.is_empty() {
                url.push('?');
                url.push_str(&query);
            }
        } else if !params.is_empty() {
            let json = serde_json::to_string(params)
                .map_err(|e| Error::invalid_input(format!("Unserializable parameters: {e}")))?;
            body = Some(json);
        }

        let signed_body = match (&body, method.signs_body()) {
            (Some(json), true) => json.as_str(),
            _ => "",
        };
        let hmac = sign(api_key, &url, signed_body, &date, secret_key);

        Ok(Self {
            method,
            url,
            body,
            date,
            hmac,
        })
    }
}

fn query_string(params: &Map<String, Value>) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        let value = match value {
            Value::Null => continue,
            Value::String(s) => s.clone(),
            Value::Bool(true) => "1".to_string(),
            Value::Bool(false) => "0".to_string(),
            other => other.to_string(),
        };
        serializer.append_pair(key, &value);
    }
    serializer.finish()
}
