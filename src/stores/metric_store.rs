use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::errors::InternalError;
use crate::types::db::tab_metric;
use crate::types::internal::NewTabMetric;

/// Data points behind each dashboard tab
#[derive(Debug, Default)]
pub struct MetricStore {}

impl MetricStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn record(
        &self,
        conn: &impl ConnectionTrait,
        tab_id: i32,
        metric: NewTabMetric,
    ) -> Result<tab_metric::Model, InternalError> {
        let row = tab_metric::ActiveModel {
            tab_id: Set(tab_id),
            recorded_at: Set(metric.recorded_at),
            metric_name: Set(metric.metric_name),
            value: Set(metric.value),
            notes: Set(metric.notes),
            ..Default::default()
        };
        row.insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_tab_metric", e))
    }

    /// Newest first
    pub async fn records_for_tab(
        &self,
        conn: &impl ConnectionTrait,
        tab_id: i32,
    ) -> Result<Vec<tab_metric::Model>, InternalError> {
        tab_metric::Entity::find()
            .filter(tab_metric::Column::TabId.eq(tab_id))
            .order_by_desc(tab_metric::Column::RecordedAt)
            .order_by_desc(tab_metric::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_tab_metrics", e))
    }
}
