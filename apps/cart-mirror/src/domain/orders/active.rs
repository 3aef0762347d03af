//! The single active-order slot.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An in-progress order tracked outside the history list.
///
/// Status is free-form text because the kitchen-side UIs invent
/// intermediate states; only `ready` and `completed` are terminal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveOrder {
    /// Current status; `ready` and `completed` end the order's lifecycle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Caller-supplied fields preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ActiveOrder {
    /// Terminal status: the order is ready for pickup.
    pub const STATUS_READY: &'static str = "ready";
    /// Terminal status: the order is done.
    pub const STATUS_COMPLETED: &'static str = "completed";

    /// Whether the order is still in progress. An absent status counts as
    /// open; only the terminal statuses close it.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(
            self.status.as_deref(),
            Some(Self::STATUS_READY | Self::STATUS_COMPLETED)
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    use super::*;

    #[test_case(None, true ; "missing status is open")]
    #[test_case(Some("preparing"), true ; "intermediate status is open")]
    #[test_case(Some("ready"), false ; "ready is terminal")]
    #[test_case(Some("completed"), false ; "completed is terminal")]
    #[test_case(Some("READY"), true ; "status match is case sensitive")]
    fn open_state(status: Option<&str>, expected: bool) {
        let order = ActiveOrder {
            status: status.map(str::to_string),
            ..ActiveOrder::default()
        };
        assert_eq!(order.is_open(), expected);
    }

    #[test]
    fn extra_fields_roundtrip() {
        let order: ActiveOrder = serde_json::from_value(json!({
            "status": "preparing",
            "tableNumber": 12
        }))
        .unwrap();
        let back = serde_json::to_value(&order).unwrap();
        assert_eq!(back["tableNumber"], json!(12));
        assert_eq!(back["status"], json!("preparing"));
    }
}
