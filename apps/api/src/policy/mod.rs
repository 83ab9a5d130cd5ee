use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::error;

/// Outcome of the policy check. A customer/policy pair is only ever
/// present when the claimant matched an active policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid { customer_id: i64, policy_id: i64 },
    Invalid,
}

/// Policy Validator: read-only lookup of an active policy for a claimant.
///
/// Deliberately infallible at the trait boundary. A lookup error or an
/// unreachable store is indistinguishable from "no active policy" to the
/// caller; the detail goes to the operator log only.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    async fn validate(&self, name: &str, email: &str) -> ValidationResult;
}

pub struct PgPolicyStore {
    pool: PgPool,
}

impl PgPolicyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PolicyStore for PgPolicyStore {
    async fn validate(&self, name: &str, email: &str) -> ValidationResult {
        let result = sqlx::query(
            r#"
            SELECT c.customer_id, p.policy_id
            FROM customers c
            JOIN policies p ON c.customer_id = p.customer_id
            WHERE c.name = $1 AND LOWER(c.email) = LOWER($2) AND p.status = 'Active'
            "#,
        )
        .bind(name)
        .bind(email)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(Some(row)) => ValidationResult::Valid {
                customer_id: row.get("customer_id"),
                policy_id: row.get("policy_id"),
            },
            Ok(None) => ValidationResult::Invalid,
            Err(e) => {
                error!("Policy lookup failed: {e}");
                ValidationResult::Invalid
            }
        }
    }
}
