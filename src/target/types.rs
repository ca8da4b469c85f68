use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub id: String,
    pub display_name: Option<String>,
}

/// Where a site lives inside a subscription.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteBinding {
    pub name: String,
    pub resource_group: String,
    pub location: Option<String>,
    pub resource_id: String,
}

/// Deployment repository endpoint plus its `username:password` pair.
#[derive(Clone, PartialEq)]
pub struct RepositoryAccess {
    pub uri: String,
    pub auth: String,
}

impl fmt::Debug for RepositoryAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryAccess")
            .field("uri", &self.uri)
            .field("auth", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, PartialEq)]
pub struct DeploymentTarget {
    site_name: String,
    endpoint_uri: String,
    username: String,
    password: String,
}

impl DeploymentTarget {
    pub fn new(
        site_name: impl Into<String>,
        endpoint_uri: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            site_name: site_name.into(),
            endpoint_uri: endpoint_uri.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Splits `access.auth` on its first colon. Returns `None` when there is no colon.
    pub fn from_repository(site_name: impl Into<String>, access: &RepositoryAccess) -> Option<Self> {
        let (username, password) = access.auth.split_once(':')?;
        Some(Self::new(site_name, access.uri.clone(), username, password))
    }

    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    pub fn endpoint_uri(&self) -> &str {
        &self.endpoint_uri
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn upload_uri(&self) -> String {
        format!("{}/zip", self.endpoint_uri.trim_end_matches('/'))
    }
}

impl fmt::Debug for DeploymentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeploymentTarget")
            .field("site_name", &self.site_name)
            .field("endpoint_uri", &self.endpoint_uri)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
