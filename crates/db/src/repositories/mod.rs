//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Tenant-owned rows are always
//! filtered by `tenant_id`; a row that belongs to another tenant behaves as
//! if it did not exist.

pub mod category_repo;
pub mod complement_repo;
pub mod coupon_repo;
pub mod customer_repo;
pub mod delivery_area_repo;
pub mod ingredient_repo;
pub mod order_repo;
pub mod payment_method_repo;
pub mod product_repo;
pub mod production_location_repo;
pub mod tenant_repo;
pub mod unit_repo;
pub mod user_repo;

pub use category_repo::CategoryRepo;
pub use complement_repo::ComplementRepo;
pub use coupon_repo::CouponRepo;
pub use customer_repo::CustomerRepo;
pub use delivery_area_repo::DeliveryAreaRepo;
pub use ingredient_repo::IngredientRepo;
pub use order_repo::OrderRepo;
pub use payment_method_repo::PaymentMethodRepo;
pub use product_repo::ProductRepo;
pub use production_location_repo::ProductionLocationRepo;
pub use tenant_repo::TenantRepo;
pub use unit_repo::UnitRepo;
pub use user_repo::UserRepo;

/// Qualify every column of a column list with a table alias.
pub(crate) fn prefixed(columns: &str, alias: &str) -> String {
    columns
        .split(',')
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `%term%` pattern for `ILIKE`, with the wildcards in `term` matched literally.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("suc"), "%suc%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}
