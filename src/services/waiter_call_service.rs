use crate::entities::{WaiterCallStatus, waiter_call_entity as calls};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::change_feed::{ChangeFeed, ChangeKind, FeedTable};
use crate::utils::validate_table_id;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};

#[derive(Clone)]
pub struct WaiterCallService {
    pool: DatabaseConnection,
    feed: ChangeFeed,
}

impl WaiterCallService {
    pub fn new(pool: DatabaseConnection, feed: ChangeFeed) -> Self {
        Self { pool, feed }
    }

    pub async fn call_waiter(&self, table_id: &str) -> AppResult<WaiterCallResponse> {
        let table_id = validate_table_id(table_id)?;
        let model = calls::ActiveModel {
            table_id: Set(table_id),
            status: Set(WaiterCallStatus::Pending),
            created_at: Set(Utc::now()),
            completed_at: Set(None),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Table {} called a waiter (call #{})", model.table_id, model.id);
        self.feed
            .publish(FeedTable::WaiterCalls, ChangeKind::Insert, model.id);
        Ok(model.into())
    }

    /// Newest first
    pub async fn list_calls(
        &self,
        filter: &WaiterCallFilter,
    ) -> AppResult<Vec<WaiterCallResponse>> {
        let mut query = calls::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(calls::Column::Status.eq(status));
        }
        let models = query
            .order_by_desc(calls::Column::CreatedAt)
            .order_by_desc(calls::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    /// Completing a call stamps `completed_at`; completed calls are final.
    pub async fn update_status(
        &self,
        call_id: i64,
        target: WaiterCallStatus,
    ) -> AppResult<WaiterCallResponse> {
        let model = calls::Entity::find_by_id(call_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Waiter call {call_id} not found")))?;

        if model.status == target {
            return Ok(model.into());
        }
        if !model.status.can_transition_to(target) {
            return Err(AppError::InvalidTransition(format!(
                "Waiter call {call_id} cannot move from {} to {target}",
                model.status
            )));
        }

        let mut active = model.into_active_model();
        active.status = Set(target);
        if target == WaiterCallStatus::Completed {
            active.completed_at = Set(Some(Utc::now()));
        }
        let updated = active.update(&self.pool).await?;

        log::info!("Waiter call #{} for table {} -> {target}", updated.id, updated.table_id);
        self.feed
            .publish(FeedTable::WaiterCalls, ChangeKind::Update, updated.id);
        Ok(updated.into())
    }
}
