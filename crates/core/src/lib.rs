//! Domain rules for the Comanda restaurant backend.
//!
//! Everything in this crate is pure: validators, status machines and price
//! calculations shared by the database and API layers. No I/O happens here.

pub mod catalog;
pub mod category;
pub mod checkout;
pub mod complements;
pub mod coupon;
pub mod customer;
pub mod delivery_fee;
pub mod error;
pub mod order_status;
pub mod pagination;
pub mod payment;
pub mod roles;
pub mod routing;
pub mod stock;
pub mod technical_sheet;
pub mod tenant;
pub mod types;
