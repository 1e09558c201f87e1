//! Blocking HTTP implementation of [`Transport`].

use crate::config::ClientConfig;
use crate::error::{QobuzError, Result};
use crate::transport::{Params, Transport, USER_AUTH_TOKEN};
use md5::{Digest, Md5};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::{form_urlencoded, Url};

const APP_ID_HEADER: &str = "X-App-Id";

/// Talks to the Qobuz JSON API over HTTPS.
///
/// Every request is a GET with its parameters in the query string. The
/// user token travels as the `user_auth_token` parameter.
pub struct HttpTransport {
    http: Client,
    base_url: String,
    app_id: String,
    app_secret: Option<String>,
}

impl HttpTransport {
    /// Create a transport from a validated configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(
            APP_ID_HEADER,
            HeaderValue::from_str(&config.app_id)
                .map_err(|e| QobuzError::Config(format!("invalid app id: {e}")))?,
        );

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent)
            .default_headers(headers)
            .build()
            .map_err(QobuzError::Request)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            app_id: config.app_id,
            app_secret: config.app_secret,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// Full request URL with `query` encoded. Commas stay literal so that
    /// id lists reach the API as `1,2,3` rather than `1%2C2%2C3`.
    fn request_url(&self, endpoint: &str, query: &[(String, String)]) -> Result<Url> {
        let mut url =
            Url::parse(&self.url(endpoint)).map_err(|e| QobuzError::InvalidUrl(e.to_string()))?;
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(query)
            .finish();
        url.set_query(Some(&encoded.replace("%2C", ",")));
        Ok(url)
    }

    fn query(&self, endpoint: &str, params: &Params) -> Result<Vec<(String, String)>> {
        let mut query: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        query.push(("app_id".to_string(), self.app_id.clone()));

        if params.is_signed() {
            let secret = self.app_secret.as_deref().ok_or_else(|| {
                QobuzError::Config(format!("{endpoint} must be signed but no app secret is set"))
            })?;
            let timestamp = chrono::Utc::now().timestamp();
            query.push(("request_ts".to_string(), timestamp.to_string()));
            query.push((
                "request_sig".to_string(),
                request_signature(endpoint, params, timestamp, secret),
            ));
        }

        Ok(query)
    }
}

impl Transport for HttpTransport {
    fn request(&self, endpoint: &str, params: &Params) -> Result<Value> {
        let query = self.query(endpoint, params)?;
        let url = self.request_url(endpoint, &query)?;
        debug!(
            endpoint = %endpoint,
            params = params.len(),
            signed = params.is_signed(),
            "Sending API request"
        );

        let response = self.http.get(url).send().map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                QobuzError::ServerUnreachable(e.to_string())
            } else {
                QobuzError::Request(e)
            }
        })?;

        let status = response.status();

        if status.is_success() {
            response.json::<Value>().map_err(|e| {
                QobuzError::ParseError(format!("Failed to parse {endpoint} response: {e}"))
            })
        } else if status.as_u16() == 401 {
            let error_text = response.text().unwrap_or_default();
            warn!(endpoint = %endpoint, error = %error_text, "Request was not authorized");
            Err(QobuzError::AuthFailed(error_text))
        } else {
            let error_text = response.text().unwrap_or_default();
            Err(QobuzError::ServerError {
                status: status.as_u16(),
                message: error_text,
            })
        }
    }
}

/// Signature for a signed request: MD5 over the endpoint without slashes,
/// every parameter as `key` + `value` in key order (app id and user token
/// excluded), the timestamp and the app secret.
pub fn request_signature(endpoint: &str, params: &Params, timestamp: i64, secret: &str) -> String {
    let mut payload = endpoint.replace('/', "");
    for (key, value) in params.iter().filter(|(k, _)| *k != USER_AUTH_TOKEN && *k != "app_id") {
        payload.push_str(key);
        payload.push_str(value);
    }
    payload.push_str(&timestamp.to_string());
    payload.push_str(secret);
    md5_hex(&payload)
}

/// Compute the MD5 hex digest of a string.
pub(crate) fn md5_hex(input: &str) -> String {
    hex::encode(Md5::digest(input.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_md5_hex() {
        assert_eq!(md5_hex(""), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_signature_ignores_token_and_sorts_params() {
        let params = Params::new()
            .with("track_id", 5)
            .with("intent", "stream")
            .with("format_id", 27)
            .with_token(Some("tok"))
            .signed();

        assert_eq!(
            request_signature("track/getFileUrl", &params, 1700000000, "secret"),
            md5_hex("trackgetFileUrlformat_id27intentstreamtrack_id51700000000secret")
        );
    }

    #[test]
    fn test_url_joining() {
        let transport =
            HttpTransport::new(ClientConfig::new("1").with_base_url("https://example.com/api/"))
                .unwrap();
        assert_eq!(transport.base_url(), "https://example.com/api");
        assert_eq!(transport.url("album/get"), "https://example.com/api/album/get");
        assert_eq!(transport.url("/album/get"), "https://example.com/api/album/get");
    }

    #[test]
    fn test_request_url_keeps_commas() {
        let transport = HttpTransport::new(ClientConfig::new("1")).unwrap();
        let query = vec![
            ("track_ids".to_string(), "1,2,3".to_string()),
            ("query".to_string(), "a b&c".to_string()),
        ];

        let url = transport.request_url("playlist/addTracks", &query).unwrap();
        assert_eq!(url.path(), "/api.json/0.2/playlist/addTracks");
        assert_eq!(url.query(), Some("track_ids=1,2,3&query=a+b%26c"));
    }

    #[test]
    fn test_signed_request_needs_secret() {
        let transport = HttpTransport::new(ClientConfig::new("1")).unwrap();
        let result = transport.query("track/getFileUrl", &Params::new().signed());
        assert!(matches!(result, Err(QobuzError::Config(_))));
    }
}
