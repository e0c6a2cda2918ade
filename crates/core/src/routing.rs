//! Kitchen ticket routing.
//!
//! Each order item is printed at one production location: the product's own
//! location wins, otherwise the nearest category up the hierarchy that has
//! one. Items with no location anywhere land on the unrouted ticket.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::DbId;

/// Resolve the production location of a product.
///
/// `category_chain_locations` holds the location of the product's category
/// followed by each ancestor's, nearest first.
pub fn resolve_location(
    product_location: Option<DbId>,
    category_chain_locations: &[Option<DbId>],
) -> Option<DbId> {
    product_location.or_else(|| category_chain_locations.iter().copied().flatten().next())
}

/// A line that will be printed on a ticket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketLine {
    pub order_item_id: DbId,
    pub product_name: String,
    pub quantity: i32,
    pub notes: Option<String>,
    pub extras: Vec<String>,
}

/// One ticket per production location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KitchenTicket {
    pub production_location_id: Option<DbId>,
    pub production_location_name: String,
    pub lines: Vec<TicketLine>,
}

/// Label used for items without a production location.
pub const UNROUTED_LABEL: &str = "Unrouted";

/// Group lines into tickets by location.
///
/// `lines` pairs each ticket line with its resolved location id;
/// `location_names` maps ids to display names. Tickets are ordered by
/// location name, with the unrouted ticket last. Line order within a ticket
/// follows input order.
pub fn build_tickets(
    lines: Vec<(Option<DbId>, TicketLine)>,
    location_names: &BTreeMap<DbId, String>,
) -> Vec<KitchenTicket> {
    let mut routed: BTreeMap<(String, DbId), Vec<TicketLine>> = BTreeMap::new();
    let mut unrouted: Vec<TicketLine> = Vec::new();

    for (location, line) in lines {
        match location.and_then(|id| location_names.get(&id).map(|name| (name.clone(), id))) {
            Some(key) => routed.entry(key).or_default().push(line),
            None => unrouted.push(line),
        }
    }

    let mut tickets: Vec<KitchenTicket> = routed
        .into_iter()
        .map(|((name, id), lines)| KitchenTicket {
            production_location_id: Some(id),
            production_location_name: name,
            lines,
        })
        .collect();

    if !unrouted.is_empty() {
        tickets.push(KitchenTicket {
            production_location_id: None,
            production_location_name: UNROUTED_LABEL.to_string(),
            lines: unrouted,
        });
    }

    tickets
}
