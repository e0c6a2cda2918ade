//! Order lifecycle: statuses, order types and the transition guard.
//!
//! ```text
//! pending -> confirmed -> preparing -> delivering -> completed   (delivery)
//! pending -> confirmed -> preparing -> completed                 (pickup)
//! any non-terminal status -> cancelled
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Status of an order. Stored as lowercase text in `orders.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Delivering,
    Completed,
    Cancelled,
}

/// How the customer receives the order. Stored in `orders.order_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Delivery,
    Pickup,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Delivering,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Delivering => "delivering",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// The single forward step from this status, if any.
    pub fn next(self, order_type: OrderType) -> Option<OrderStatus> {
        match (self, order_type) {
            (OrderStatus::Pending, _) => Some(OrderStatus::Confirmed),
            (OrderStatus::Confirmed, _) => Some(OrderStatus::Preparing),
            (OrderStatus::Preparing, OrderType::Delivery) => Some(OrderStatus::Delivering),
            (OrderStatus::Preparing, OrderType::Pickup) => Some(OrderStatus::Completed),
            (OrderStatus::Delivering, OrderType::Delivery) => Some(OrderStatus::Completed),
            _ => None,
        }
    }

    /// Statuses reachable in one step.
    pub fn allowed_transitions(self, order_type: OrderType) -> Vec<OrderStatus> {
        if self.is_terminal() {
            return Vec::new();
        }
        let mut allowed: Vec<OrderStatus> = self.next(order_type).into_iter().collect();
        allowed.push(OrderStatus::Cancelled);
        allowed
    }

    /// Validate a transition requested by staff.
    pub fn transition_to(self, target: OrderStatus, order_type: OrderType) -> Result<OrderStatus, String> {
        if self.allowed_transitions(order_type).contains(&target) {
            Ok(target)
        } else {
            Err(format!(
                "Cannot change order status from '{self}' to '{target}'"
            ))
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown order status '{s}'"))
    }
}

impl OrderType {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderType::Delivery => "delivery",
            OrderType::Pickup => "pickup",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delivery" => Ok(OrderType::Delivery),
            "pickup" => Ok(OrderType::Pickup),
            other => Err(format!("Unknown order type '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn delivery_happy_path() {
        let mut status = OrderStatus::Pending;
        let path = [
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Delivering,
            OrderStatus::Completed,
        ];
        for target in path {
            status = status.transition_to(target, OrderType::Delivery).unwrap();
        }
        assert!(status.is_terminal());
    }

    #[test]
    fn pickup_skips_delivering() {
        assert_eq!(
            OrderStatus::Preparing.next(OrderType::Pickup),
            Some(OrderStatus::Completed)
        );
        assert!(OrderStatus::Preparing
            .transition_to(OrderStatus::Delivering, OrderType::Pickup)
            .is_err());
    }

    #[test]
    fn cannot_skip_steps() {
        let err = OrderStatus::Pending
            .transition_to(OrderStatus::Preparing, OrderType::Delivery)
            .unwrap_err();
        assert!(err.contains("'pending' to 'preparing'"));
    }

    #[test]
    fn cancel_from_any_open_status() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Delivering,
        ] {
            assert_matches!(
                status.transition_to(OrderStatus::Cancelled, OrderType::Delivery),
                Ok(OrderStatus::Cancelled)
            );
        }
    }

    #[test]
    fn terminal_statuses_are_final() {
        assert!(OrderStatus::Completed
            .allowed_transitions(OrderType::Delivery)
            .is_empty());
        assert!(OrderStatus::Cancelled
            .transition_to(OrderStatus::Pending, OrderType::Pickup)
            .is_err());
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn order_type_parsing() {
        assert_eq!("pickup".parse::<OrderType>(), Ok(OrderType::Pickup));
        assert!("drone".parse::<OrderType>().is_err());
    }
}
