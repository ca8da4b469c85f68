use super::control_plane_error::ControlPlaneError;
use regex::Regex;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ArmErrorEnvelope {
    error: ArmErrorBody,
}

#[derive(Debug, Deserialize)]
struct ArmErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Classify a non-success management API response.
///
/// ARM wraps failures as `{"error": {"code": "...", "message": "..."}}`; bodies
/// that don't follow that shape are kept verbatim as the message.
pub fn parse_response_error(status: u16, body: &str, context: ErrorContext) -> ControlPlaneError {
    let (code, message) = match serde_json::from_str::<ArmErrorEnvelope>(body) {
        Ok(env) => (
            env.error.code,
            env.error.message.unwrap_or_else(|| body.trim().to_string()),
        ),
        Err(_) => (None, body.trim().to_string()),
    };

    let code_str = code.clone().unwrap_or_default();

    match (status, code_str.as_str()) {
        (401, _)
        | (_, "InvalidAuthenticationToken")
        | (_, "ExpiredAuthenticationToken")
        | (_, "AuthenticationFailed") => ControlPlaneError::AuthenticationFailed {
            reason: if message.is_empty() {
                "The access token was rejected".to_string()
            } else {
                message
            },
        },

        (403, _) | (_, "AuthorizationFailed") => {
            let resource = extract_scope(&message)
                .or(context.resource)
                .unwrap_or_else(|| "resource".to_string());
            ControlPlaneError::AccessDenied { resource, message }
        }

        (404, "SubscriptionNotFound") | (404, "InvalidSubscriptionId") => {
            ControlPlaneError::SubscriptionNotFound {
                subscription: context.subscription,
            }
        }

        (404, _) => parse_not_found_error(code, message, context),

        (408, _) | (504, _) => ControlPlaneError::Timeout {
            operation: context.operation.unwrap_or_else(|| "request".to_string()),
        },

        (429, _) => ControlPlaneError::Throttled { message },

        _ => ControlPlaneError::Unknown {
            status: Some(status),
            code,
            message: if message.is_empty() {
                format!("HTTP {status}")
            } else {
                message
            },
        },
    }
}

/// Classify an error raised before any response arrived.
pub fn parse_transport_error(error: &reqwest::Error, context: ErrorContext) -> ControlPlaneError {
    let operation = context.operation.unwrap_or_else(|| "request".to_string());

    if error.is_timeout() {
        ControlPlaneError::Timeout { operation }
    } else if error.is_decode() {
        ControlPlaneError::InvalidResponse {
            operation,
            message: error.to_string(),
        }
    } else {
        ControlPlaneError::ConnectionFailed {
            reason: error.to_string(),
        }
    }
}

fn parse_not_found_error(code: Option<String>, message: String, context: ErrorContext) -> ControlPlaneError {
    if let (Some(site), Some(subscription)) = (context.site, context.subscription) {
        return ControlPlaneError::SiteNotFound { site, subscription };
    }

    ControlPlaneError::Unknown {
        status: Some(404),
        code: code.or_else(|| Some("NotFound".to_string())),
        message,
    }
}

fn extract_scope(message: &str) -> Option<String> {
    // "... does not have authorization to perform action 'X' over scope '/subscriptions/...'"
    let scope_re = Regex::new(r"over scope '([^']+)'").ok()?;
    scope_re.captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[derive(Debug, Default, Clone)]
pub struct ErrorContext {
    pub operation: Option<String>,
    pub resource: Option<String>,
    pub subscription: Option<String>,
    pub site: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operation(mut self, op: impl Into<String>) -> Self {
        self.operation = Some(op.into());
        self
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn with_subscription(mut self, subscription: impl Into<String>) -> Self {
        self.subscription = Some(subscription.into());
        self
    }

    /// Marks the request as a site lookup, so a 404 is reported as a missing site.
    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        let site = site.into();
        self.resource = Some(site.clone());
        self.site = Some(site);
        self
    }
}
