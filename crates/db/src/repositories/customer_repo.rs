//! Repository for `customers` and `delivery_addresses`.
//!
//! Customers are created implicitly at checkout; the insert helpers run
//! inside the order transaction.

use comanda_core::types::DbId;
use sqlx::PgPool;

use crate::models::customer::{Customer, CustomerContact, DeliveryAddress, NewDeliveryAddress};

const COLUMNS: &str = "id, tenant_id, name, phone, email, created_at, updated_at";

const ADDRESS_COLUMNS: &str =
    "id, customer_id, neighborhood_id, street, number, complement, reference, created_at";

/// Provides lookups and checkout-time upserts for customers.
pub struct CustomerRepo;

impl CustomerRepo {
    pub async fn find_by_id(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers WHERE tenant_id = $1 AND id = $2");
        sqlx::query_as::<_, Customer>(&query)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_address(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DeliveryAddress>, sqlx::Error> {
        let query = format!("SELECT {ADDRESS_COLUMNS} FROM delivery_addresses WHERE id = $1");
        sqlx::query_as::<_, DeliveryAddress>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or refresh a customer keyed by phone inside `tx`.
    ///
    /// The latest name wins; an email is only replaced when one is given.
    pub async fn upsert_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        tenant_id: DbId,
        contact: &CustomerContact,
    ) -> Result<Customer, sqlx::Error> {
        let query = format!(
            "INSERT INTO customers (tenant_id, name, phone, email) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT ON CONSTRAINT uq_customers_tenant_phone DO UPDATE SET \
                name = EXCLUDED.name, \
                email = COALESCE(EXCLUDED.email, customers.email) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(tenant_id)
            .bind(&contact.name)
            .bind(&contact.phone)
            .bind(&contact.email)
            .fetch_one(&mut **tx)
            .await
    }

    /// Record the address an order is delivered to.
    pub async fn insert_address_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        customer_id: DbId,
        address: &NewDeliveryAddress,
    ) -> Result<DeliveryAddress, sqlx::Error> {
        let query = format!(
            "INSERT INTO delivery_addresses \
                (customer_id, neighborhood_id, street, number, complement, reference) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {ADDRESS_COLUMNS}"
        );
        sqlx::query_as::<_, DeliveryAddress>(&query)
            .bind(customer_id)
            .bind(address.neighborhood_id)
            .bind(&address.street)
            .bind(&address.number)
            .bind(&address.complement)
            .bind(&address.reference)
            .fetch_one(&mut **tx)
            .await
    }
}
