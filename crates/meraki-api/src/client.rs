// Hand-crafted async HTTP client for the Meraki Dashboard API v1.
//
// Base path: https://api.meraki.com/api/v1/
// Auth: `Authorization: Bearer <key>` header
//
// List endpoints paginate with a `perPage` query parameter and an RFC 5988
// `Link` response header; the client follows `rel=next` links until the
// header disappears and returns a flat Vec.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::types::{Device, DeviceAvailability, Network, Organization, SwitchPortStatus};

/// Page size requested from list endpoints (the dashboard maximum).
const PER_PAGE: &str = "1000";

// ── Error response shape from the dashboard ──────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    errors: Vec<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Meraki Dashboard API.
///
/// Uses bearer-token authentication and communicates via JSON REST
/// endpoints under `/api/v1/`.
pub struct DashboardClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DashboardClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an API key and transport config.
    ///
    /// Injects `Authorization: Bearer <key>` as a default header on every
    /// request; the header value is marked sensitive so it never appears
    /// in debug output.
    pub fn from_api_key(
        base_url: &str,
        api_key: &secrecy::SecretString,
        transport: &crate::TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut auth_value =
            HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
                .map_err(|_| Error::InvalidApiKey)?;
        auth_value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth_value);

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Parse the base URL and guarantee a trailing slash so relative
    /// joins like `organizations/{id}/networks` resolve under it.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// Join a relative path (e.g. `"organizations"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP plumbing ────────────────────────────────────────────────

    /// Single GET request, deserialized as `T`.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        Self::decode(&body)
    }

    /// Paginated GET: requests the first page with `perPage` plus the
    /// given params, then follows `Link: <…>; rel=next` headers until
    /// exhaustion. Returns the concatenation of all pages.
    async fn get_paged<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, Error> {
        let first = self.url(path)?;
        debug!("GET {first} params={params:?} (paged)");

        let mut resp = self
            .http
            .get(first)
            .query(&[("perPage", PER_PAGE)])
            .query(params)
            .send()
            .await?;

        let mut all = Vec::new();
        loop {
            let status = resp.status();
            if !status.is_success() {
                return Err(Self::parse_error(status, resp).await);
            }

            let next = next_link(resp.headers());
            let body = resp.text().await?;
            let page: Vec<T> = Self::decode(&body)?;
            all.extend(page);

            // The next link carries the full query (cursor included), so it
            // is followed verbatim.
            match next {
                Some(url) => {
                    debug!("GET {url} (next page)");
                    resp = self.http.get(url).send().await?;
                }
                None => break,
            }
        }

        Ok(all)
    }

    fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
        serde_json::from_str(body).map_err(|e| {
            // Cut the preview on a char boundary; error pages are arbitrary
            // text and byte 200 can land inside a multi-byte character.
            let mut cut = body.len().min(200);
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            let preview = &body[..cut];
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.to_owned(),
            }
        })
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::InvalidApiKey;
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = resp
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(1);
            return Error::RateLimited { retry_after_secs };
        }

        let raw = resp.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorResponse>(&raw) {
            Ok(err) if !err.errors.is_empty() => err.errors.join("; "),
            _ if raw.is_empty() => status.to_string(),
            _ => raw,
        };

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Organizations ────────────────────────────────────────────────

    /// List every organization the API key can see.
    ///
    /// `GET /organizations`
    pub async fn list_organizations(&self) -> Result<Vec<Organization>, Error> {
        self.get_paged("organizations", &[]).await
    }

    /// List all networks in an organization, exhausting pagination.
    ///
    /// `GET /organizations/{orgId}/networks`
    pub async fn list_organization_networks(&self, org_id: &str) -> Result<Vec<Network>, Error> {
        self.get_paged(&format!("organizations/{org_id}/networks"), &[])
            .await
    }

    /// List the organization's inventory devices, filtered server-side to
    /// the given product types and exhausting pagination.
    ///
    /// `GET /organizations/{orgId}/devices?productTypes[]=…`
    pub async fn list_organization_devices(
        &self,
        org_id: &str,
        product_types: &[&str],
    ) -> Result<Vec<Device>, Error> {
        let params: Vec<(&str, String)> = product_types
            .iter()
            .map(|t| ("productTypes[]", (*t).to_owned()))
            .collect();

        self.get_paged(&format!("organizations/{org_id}/devices"), &params)
            .await
    }

    /// Per-port status for one switch, with power figures aggregated over
    /// the trailing `timespan_secs` window.
    ///
    /// `GET /devices/{serial}/switch/ports/statuses?timespan=…`
    pub async fn get_switch_port_statuses(
        &self,
        serial: &str,
        timespan_secs: u64,
    ) -> Result<Vec<SwitchPortStatus>, Error> {
        self.get(
            &format!("devices/{serial}/switch/ports/statuses"),
            &[("timespan", timespan_secs.to_string())],
        )
        .await
    }

    /// Liveness of every matching device in the organization, in one
    /// batched (paginated) call.
    ///
    /// `GET /organizations/{orgId}/devices/availabilities?productTypes[]=…`
    pub async fn list_device_availabilities(
        &self,
        org_id: &str,
        product_types: &[&str],
    ) -> Result<Vec<DeviceAvailability>, Error> {
        let params: Vec<(&str, String)> = product_types
            .iter()
            .map(|t| ("productTypes[]", (*t).to_owned()))
            .collect();

        self.get_paged(
            &format!("organizations/{org_id}/devices/availabilities"),
            &params,
        )
        .await
    }
}

// ── Link header parsing ──────────────────────────────────────────────

/// Extract the `rel=next` target from an RFC 5988 `Link` header, if any.
fn next_link(headers: &HeaderMap) -> Option<Url> {
    let value = headers.get(reqwest::header::LINK)?.to_str().ok()?;

    value.split(',').find_map(|part| {
        let (target, rels) = part.trim().split_once(';')?;
        let target = target.trim().strip_prefix('<')?.strip_suffix('>')?;

        let is_next = rels.split(';').any(|p| {
            p.trim()
                .strip_prefix("rel=")
                .is_some_and(|rel| rel.trim_matches('"') == "next")
        });

        if is_next { Url::parse(target).ok() } else { None }
    })
}
