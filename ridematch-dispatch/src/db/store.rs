//! Storage seam consumed by the matching engine

use async_trait::async_trait;
use chrono::Utc;
use ridematch_common::db::{Chair, RideRequest};
use ridematch_common::{ChairId, RideId};
use sqlx::SqlitePool;
use tracing::debug;

use super::{chairs, rides};
use crate::error::Result;

/// One chair → ride write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChairBinding {
    pub ride_id: RideId,
    pub chair_id: ChairId,
}

/// Storage operations the matching engine depends on
#[async_trait]
pub trait DispatchStore: Send + Sync {
    /// Rides without an assigned chair, ordered by id
    async fn waiting_rides(&self) -> Result<Vec<RideRequest>>;

    /// Active chairs with a known position and no ride in progress, ordered by id
    async fn eligible_chairs(&self) -> Result<Vec<Chair>>;

    /// Persist `bindings` in one transaction
    ///
    /// Each write is conditional; the returned vector holds, per binding,
    /// whether it landed. Any error rolls the whole chunk back.
    async fn commit_chunk(&self, bindings: &[ChairBinding]) -> Result<Vec<bool>>;

    /// Chairs currently bound to uncompleted rides
    async fn active_bindings(&self) -> Result<Vec<(ChairId, RideId)>>;
}

/// `DispatchStore` over the SQLite pool
#[derive(Clone)]
pub struct SqliteDispatchStore {
    pool: SqlitePool,
}

impl SqliteDispatchStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DispatchStore for SqliteDispatchStore {
    async fn waiting_rides(&self) -> Result<Vec<RideRequest>> {
        rides::waiting_rides(&self.pool).await
    }

    async fn eligible_chairs(&self) -> Result<Vec<Chair>> {
        chairs::eligible_chairs(&self.pool).await
    }

    async fn commit_chunk(&self, bindings: &[ChairBinding]) -> Result<Vec<bool>> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let mut applied = Vec::with_capacity(bindings.len());
        for binding in bindings {
            // Dropping `tx` on `?` rolls the chunk back
            let landed = rides::assign_chair(&mut tx, &binding.ride_id, &binding.chair_id, now).await?;
            if !landed {
                debug!(
                    ride_id = %binding.ride_id,
                    chair_id = %binding.chair_id,
                    "Conditional write matched no row"
                );
            }
            applied.push(landed);
        }

        tx.commit().await?;
        Ok(applied)
    }

    async fn active_bindings(&self) -> Result<Vec<(ChairId, RideId)>> {
        rides::active_bindings(&self.pool).await
    }
}
