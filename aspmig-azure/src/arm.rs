//! Blocking Azure Resource Manager client.

use crate::token::TokenProvider;
use anyhow::{Context, bail};
use aspmig_domain::{AzureResources, EnvironmentDetails, ResourceQuery, ResourceRef};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::cell::OnceCell;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_MANAGEMENT_ENDPOINT: &str = "https://management.azure.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const RESOURCES_API_VERSION: &str = "2021-04-01";
const WEB_API_VERSION: &str = "2022-03-01";

/// Upper bound on `nextLink` pages followed for one listing.
const MAX_PAGES: usize = 50;

/// Connection settings for [`ArmClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArmConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for ArmConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_MANAGEMENT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// [`AzureResources`] over the management REST API.
///
/// The token is requested on first use and reused for the life of the client.
pub struct ArmClient {
    http: Client,
    endpoint: String,
    tokens: Box<dyn TokenProvider>,
    token: OnceCell<String>,
}

impl std::fmt::Debug for ArmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArmClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl ArmClient {
    pub fn new(config: &ArmConfig, tokens: Box<dyn TokenProvider>) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("aspmig/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            tokens,
            token: OnceCell::new(),
        })
    }

    fn token(&self) -> anyhow::Result<&str> {
        if let Some(token) = self.token.get() {
            return Ok(token);
        }
        let token = self
            .tokens
            .access_token()
            .context("failed to acquire an Azure access token")?;
        Ok(self.token.get_or_init(|| token))
    }

    fn get<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> anyhow::Result<T> {
        let token = self.token()?;
        debug!(url, "GET");
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .with_context(|| format!("GET {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            bail!("GET {url} returned {status}: {}", body.trim());
        }

        response
            .json::<T>()
            .with_context(|| format!("failed to parse response from {url}"))
    }

    /// Fetches the first page with `query`, then follows `nextLink` until `visit` returns
    /// `Some` or the listing ends.
    fn scan_pages<T, R>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        mut visit: impl FnMut(Vec<T>) -> Option<R>,
    ) -> anyhow::Result<Option<R>>
    where
        T: DeserializeOwned,
    {
        let mut page: Page<T> = self.get(url, query)?;
        for _ in 0..MAX_PAGES {
            if let Some(found) = visit(page.value) {
                return Ok(Some(found));
            }
            match page.next_link {
                Some(next) => page = self.get(&next, &[])?,
                None => return Ok(None),
            }
        }
        bail!("{url} returned more than {MAX_PAGES} pages")
    }
}

impl AzureResources for ArmClient {
    fn ensure_authenticated(&self) -> anyhow::Result<()> {
        self.token().map(|_| ())
    }

    fn find_resource(&self, query: &ResourceQuery<'_>) -> anyhow::Result<Option<ResourceRef>> {
        let url = resources_url(&self.endpoint, query);
        let filter = resource_filter(query.resource_type, query.name);
        let found = self.scan_pages(
            &url,
            &[("$filter", filter.as_str()), ("api-version", RESOURCES_API_VERSION)],
            |resources: Vec<GenericResource>| {
                resources
                    .into_iter()
                    .find(|r| r.name.eq_ignore_ascii_case(query.name))
            },
        )?;
        debug!(name = query.name, found = found.is_some(), "resource lookup");
        Ok(found.map(ResourceRef::from))
    }

    fn environment_details(&self, resource: &ResourceRef) -> anyhow::Result<EnvironmentDetails> {
        let url = format!("{}{}", self.endpoint, resource.id);
        let environment: HostingEnvironment =
            self.get(&url, &[("api-version", WEB_API_VERSION)])?;
        Ok(environment.into())
    }

    fn regions_for_sku(&self, subscription_id: &str, sku_tier: &str) -> anyhow::Result<Vec<String>> {
        let url = format!(
            "{}/subscriptions/{}/providers/Microsoft.Web/geoRegions",
            self.endpoint, subscription_id
        );
        let mut names = Vec::new();
        self.scan_pages(
            &url,
            &[("sku", sku_tier), ("api-version", WEB_API_VERSION)],
            |regions: Vec<GeoRegion>| -> Option<()> {
                names.extend(regions.into_iter().map(|r| r.name));
                None
            },
        )?;
        debug!(sku = sku_tier, regions = names.len(), "sku availability");
        Ok(names)
    }
}

fn resources_url(endpoint: &str, query: &ResourceQuery<'_>) -> String {
    match query.resource_group {
        Some(group) => format!(
            "{}/subscriptions/{}/resourceGroups/{}/resources",
            endpoint, query.subscription_id, group
        ),
        None => format!("{}/subscriptions/{}/resources", endpoint, query.subscription_id),
    }
}

/// OData filter for one resource of a given type. Quotes inside the name are doubled.
fn resource_filter(resource_type: &str, name: &str) -> String {
    format!(
        "resourceType eq '{}' and name eq '{}'",
        resource_type.replace('\'', "''"),
        name.replace('\'', "''")
    )
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
    #[serde(rename = "nextLink", default)]
    next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenericResource {
    id: String,
    name: String,
    #[serde(default)]
    location: Option<String>,
}

impl From<GenericResource> for ResourceRef {
    fn from(r: GenericResource) -> Self {
        ResourceRef {
            id: r.id,
            name: r.name,
            location: r.location,
        }
    }
}

#[derive(Debug, Deserialize)]
struct HostingEnvironment {
    name: String,
    location: String,
    #[serde(default)]
    kind: Option<String>,
}

impl From<HostingEnvironment> for EnvironmentDetails {
    fn from(e: HostingEnvironment) -> Self {
        EnvironmentDetails {
            name: e.name,
            location: e.location,
            kind: e.kind.filter(|k| !k.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeoRegion {
    name: String,
}
