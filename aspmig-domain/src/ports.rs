/// Subscription- or resource-group-scoped lookup of a single named resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceQuery<'a> {
    pub subscription_id: &'a str,
    pub resource_group: Option<&'a str>,
    pub resource_type: &'a str,
    pub name: &'a str,
}

/// A resource as returned by a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub id: String,
    pub name: String,
    pub location: Option<String>,
}

/// App Service Environment properties the tier decision needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentDetails {
    pub name: String,
    pub location: String,
    /// Version indicator, e.g. `ASEV2` or `ASEV3`. Older environments may not report one.
    pub kind: Option<String>,
}

/// Read-only access to Azure Resource Manager.
///
/// aspmig-domain uses this so tier resolution can be tested against in-memory fakes.
pub trait AzureResources {
    /// Acquires whatever credentials the lookups need. Called once before any lookup;
    /// a failure here aborts the run.
    fn ensure_authenticated(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn find_resource(&self, query: &ResourceQuery<'_>) -> anyhow::Result<Option<ResourceRef>>;

    fn environment_details(&self, resource: &ResourceRef) -> anyhow::Result<EnvironmentDetails>;

    /// Regions of the subscription that offer the given SKU tier.
    fn regions_for_sku(&self, subscription_id: &str, sku_tier: &str)
    -> anyhow::Result<Vec<String>>;
}
