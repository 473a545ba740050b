//! PostgreSQL implementation of the `PartyStore` trait.

use async_trait::async_trait;
use parcelflow_core::error::DomainError;
use parcelflow_core::model::Party;
use parcelflow_core::store::PartyStore;
use sqlx::PgPool;

use crate::rows::{infra, party_from_row};

const SELECT_PARTY: &str = "
SELECT id, reference_code, name, email, phone, created_at
FROM parties
";

/// PostgreSQL-backed party store.
#[derive(Debug, Clone)]
pub struct PgPartyStore {
    pool: PgPool,
}

impl PgPartyStore {
    /// Creates a new `PgPartyStore` over a shared pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PartyStore for PgPartyStore {
    async fn find_by_reference_code(&self, code: &str) -> Result<Option<Party>, DomainError> {
        let row = sqlx::query(&format!("{SELECT_PARTY} WHERE reference_code = $1"))
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(infra)?;
        row.as_ref().map(party_from_row).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Party>, DomainError> {
        // Email is only a natural-key fallback and is not unique; take the
        // earliest record when duplicates exist.
        let row = sqlx::query(&format!(
            "{SELECT_PARTY} WHERE email = $1 ORDER BY created_at ASC LIMIT 1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(infra)?;
        row.as_ref().map(party_from_row).transpose()
    }

    async fn insert(&self, party: &Party) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO parties (id, reference_code, name, email, phone, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(party.id)
        .bind(&party.reference_code)
        .bind(&party.name)
        .bind(&party.email)
        .bind(&party.phone)
        .bind(party.created_at)
        .execute(&self.pool)
        .await
        .map_err(infra)?;
        Ok(())
    }
}
