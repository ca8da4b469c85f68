use std::fmt;

#[derive(Debug, Clone)]
pub enum ControlPlaneError {
    AuthenticationFailed {
        reason: String,
    },

    AccessDenied {
        resource: String,
        message: String,
    },

    SubscriptionNotFound {
        subscription: Option<String>,
    },

    SiteNotFound {
        site: String,
        subscription: String,
    },

    Throttled {
        message: String,
    },

    Timeout {
        operation: String,
    },

    ConnectionFailed {
        reason: String,
    },

    InvalidResponse {
        operation: String,
        message: String,
    },

    Unknown {
        status: Option<u16>,
        code: Option<String>,
        message: String,
    },
}

impl ControlPlaneError {
    pub fn suggestion(&self) -> String {
        match self {
            ControlPlaneError::AuthenticationFailed { .. } => {
                "Try:\n  \
                 • Run: az account get-access-token --query accessToken -o tsv\n  \
                 • Export the result as AZURE_ACCESS_TOKEN (tokens expire after about an hour)".to_string()
            }

            ControlPlaneError::AccessDenied { resource, .. } => {
                format!(
                    "Request access to {resource}:\n  \
                     • The signed-in identity needs Website Contributor on the site\n  \
                     • Contact your subscription admin"
                )
            }

            ControlPlaneError::SubscriptionNotFound { subscription } => match subscription {
                Some(id) => format!(
                    "Subscription '{id}' is not visible to this token:\n  \
                     • Run: az account list -o table\n  \
                     • Check AZURE_SUBSCRIPTION_ID for typos"
                ),
                None => "No enabled subscription found:\n  \
                         • Run: az account list -o table\n  \
                         • Pass --subscription explicitly".to_string(),
            },

            ControlPlaneError::SiteNotFound { site, subscription } => {
                format!(
                    "Verify the site exists:\n  \
                     • Run: az webapp list --subscription {subscription} --query \"[?name=='{site}']\"\n  \
                     • Check for typos in the site name"
                )
            }

            ControlPlaneError::Throttled { .. } => {
                "The management API is throttling requests:\n  \
                 • Wait a minute and run the deployment again".to_string()
            }

            ControlPlaneError::Timeout { operation } => {
                format!(
                    "Operation '{operation}' timed out:\n  \
                     • Check connectivity to the management endpoint\n  \
                     • Raise --timeout-secs"
                )
            }

            ControlPlaneError::ConnectionFailed { .. } => {
                "Connection failed:\n  \
                 • Check your internet connection\n  \
                 • Verify --management-endpoint".to_string()
            }

            ControlPlaneError::InvalidResponse { .. } => {
                "The management API returned an unexpected payload:\n  \
                 • Run again with --verbose and inspect the response".to_string()
            }

            ControlPlaneError::Unknown { .. } => {
                "An unexpected error occurred:\n  \
                 • Check the error message for details\n  \
                 • Check Azure status: https://status.azure.com/".to_string()
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ControlPlaneError::AuthenticationFailed { .. } => "AUTH_FAILED",
            ControlPlaneError::AccessDenied { .. } => "ACCESS_DENIED",
            ControlPlaneError::SubscriptionNotFound { .. } => "SUBSCRIPTION_NOT_FOUND",
            ControlPlaneError::SiteNotFound { .. } => "SITE_NOT_FOUND",
            ControlPlaneError::Throttled { .. } => "THROTTLED",
            ControlPlaneError::Timeout { .. } => "TIMEOUT",
            ControlPlaneError::ConnectionFailed { .. } => "CONNECTION_FAILED",
            ControlPlaneError::InvalidResponse { .. } => "INVALID_RESPONSE",
            ControlPlaneError::Unknown { .. } => "UNKNOWN",
        }
    }
}

impl fmt::Display for ControlPlaneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlPlaneError::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }

            ControlPlaneError::AccessDenied { resource, message } => {
                write!(f, "Access denied to {resource}")?;
                if !message.is_empty() {
                    write!(f, ": {message}")?;
                }
                Ok(())
            }

            ControlPlaneError::SubscriptionNotFound { subscription } => match subscription {
                Some(id) => write!(f, "Subscription not found: {id}"),
                None => write!(f, "No enabled subscription available"),
            },

            ControlPlaneError::SiteNotFound { site, subscription } => {
                write!(f, "Site '{site}' not found in subscription {subscription}")
            }

            ControlPlaneError::Throttled { message } => {
                write!(f, "Request throttled: {message}")
            }

            ControlPlaneError::Timeout { operation } => {
                write!(f, "Timeout during {operation}")
            }

            ControlPlaneError::ConnectionFailed { reason } => {
                write!(f, "Connection failed: {reason}")
            }

            ControlPlaneError::InvalidResponse { operation, message } => {
                write!(f, "Invalid response from {operation}: {message}")
            }

            ControlPlaneError::Unknown { status, code, message } => {
                write!(f, "Control plane error")?;
                match (status, code) {
                    (Some(s), Some(c)) => write!(f, " [{s} {c}]")?,
                    (Some(s), None) => write!(f, " [{s}]")?,
                    (None, Some(c)) => write!(f, " [{c}]")?,
                    (None, None) => {}
                }
                write!(f, ": {message}")
            }
        }
    }
}

impl std::error::Error for ControlPlaneError {}
