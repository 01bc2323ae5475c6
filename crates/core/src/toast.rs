//! Transient notifications.
//!
//! Fragment responses carry a toast in the `HX-Trigger` header; full-page
//! redirects store it in the session and show it once on the next page.

use serde::{Deserialize, Serialize};

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastLevel {
    Success,
    Error,
    Info,
}

/// A one-shot notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    /// Session key for the pending flash toast.
    pub const SESSION_KEY: &'static str = "flash_toast";

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Info,
            message: message.into(),
        }
    }

    /// `HX-Trigger` header value that raises the `toast` event, optionally
    /// alongside other events (e.g. `cart-updated`).
    #[must_use]
    pub fn hx_trigger(&self, also: &[&str]) -> String {
        let mut events = serde_json::Map::new();
        for event in also {
            events.insert((*event).to_string(), serde_json::Value::Null);
        }
        events.insert(
            "toast".to_string(),
            serde_json::to_value(self).unwrap_or(serde_json::Value::Null),
        );
        serde_json::Value::Object(events).to_string()
    }

    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self.level {
            ToastLevel::Success => "toast toast-success",
            ToastLevel::Error => "toast toast-error",
            ToastLevel::Info => "toast toast-info",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hx_trigger_carries_toast_and_extra_events() {
        let header = Toast::error("Failed to add to cart").hx_trigger(&["cart-updated"]);
        let value: serde_json::Value = serde_json::from_str(&header).unwrap();

        assert_eq!(value["toast"]["level"], "error");
        assert_eq!(value["toast"]["message"], "Failed to add to cart");
        assert!(value.get("cart-updated").is_some());
    }
}
