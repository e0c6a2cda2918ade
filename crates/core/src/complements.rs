//! Complement group (addon) rules.
//!
//! A complement group constrains how many of its complements a customer may
//! pick for one product line: the summed quantity must lie in
//! `[min_select, max_select]`.

use crate::types::{Cents, DbId};

/// Selection bounds of a complement group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionBounds {
    pub min_select: i32,
    pub max_select: i32,
    pub is_required: bool,
}

impl SelectionBounds {
    /// Effective minimum, accounting for `is_required`.
    pub fn effective_min(&self) -> i32 {
        if self.is_required {
            self.min_select.max(1)
        } else {
            self.min_select
        }
    }
}

/// Validate group configuration as entered by staff.
pub fn validate_bounds(bounds: &SelectionBounds) -> Result<(), String> {
    if bounds.min_select < 0 {
        return Err("min_select cannot be negative".to_string());
    }
    if bounds.max_select < 1 {
        return Err("max_select must be at least 1".to_string());
    }
    if bounds.effective_min() > bounds.max_select {
        return Err("min_select cannot exceed max_select".to_string());
    }
    Ok(())
}

/// Validate the total quantity a customer picked from one group.
pub fn validate_selection(
    group_name: &str,
    bounds: &SelectionBounds,
    selected_quantity: i32,
) -> Result<(), String> {
    let min = bounds.effective_min();
    if selected_quantity < min {
        return Err(format!(
            "Choose at least {min} option(s) from '{group_name}'"
        ));
    }
    if selected_quantity > bounds.max_select {
        return Err(format!(
            "Choose at most {} option(s) from '{group_name}'",
            bounds.max_select
        ));
    }
    Ok(())
}

pub fn validate_complement_price(price_cents: Cents) -> Result<(), String> {
    if price_cents < 0 {
        return Err("Complement price cannot be negative".to_string());
    }
    Ok(())
}

/// Complement groups attached to a product must be listed once each.
pub fn validate_group_links(group_ids: &[DbId]) -> Result<(), String> {
    let mut seen = group_ids.to_vec();
    seen.sort_unstable();
    seen.dedup();
    if seen.len() != group_ids.len() {
        return Err("Duplicate complement group in list".to_string());
    }
    Ok(())
}
