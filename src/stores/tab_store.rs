use sea_orm::ActiveValue::Set;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::errors::InternalError;
use crate::errors::internal::ResourceError;
use crate::types::db::tab;
use crate::types::internal::DashboardTab;

/// Dashboard tab reference data
#[derive(Debug, Default)]
pub struct TabStore {}

impl TabStore {
    pub fn new() -> Self {
        Self {}
    }

    /// Insert each tab in `tabs` that is not present yet. Returns how many were written.
    pub async fn ensure_tabs(&self, conn: &impl ConnectionTrait, tabs: &[DashboardTab]) -> Result<usize, InternalError> {
        let mut created = 0;
        for dashboard_tab in tabs {
            if self.find_by_name(conn, dashboard_tab.name()).await?.is_some() {
                continue;
            }

            let row = tab::ActiveModel {
                name: Set(dashboard_tab.name().to_string()),
                display_name: Set(dashboard_tab.display_name().to_string()),
                ..Default::default()
            };
            tab::Entity::insert(row)
                .exec_without_returning(conn)
                .await
                .map_err(|e| InternalError::database("insert_tab", e))?;
            created += 1;
        }
        Ok(created)
    }

    pub async fn list(&self, conn: &impl ConnectionTrait) -> Result<Vec<tab::Model>, InternalError> {
        tab::Entity::find()
            .order_by_asc(tab::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_tabs", e))
    }

    pub async fn find_by_name(&self, conn: &impl ConnectionTrait, name: &str) -> Result<Option<tab::Model>, InternalError> {
        tab::Entity::find()
            .filter(tab::Column::Name.eq(name))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_tab_by_name", e))
    }

    pub async fn get_by_name(&self, conn: &impl ConnectionTrait, name: &str) -> Result<tab::Model, InternalError> {
        self.find_by_name(conn, name)
            .await?
            .ok_or_else(|| ResourceError::tab_not_found(name))
    }

    /// Tabs whose names appear in `names`. Unknown names are skipped.
    pub async fn find_by_names(
        &self,
        conn: &impl ConnectionTrait,
        names: &[String],
    ) -> Result<Vec<tab::Model>, InternalError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        tab::Entity::find()
            .filter(tab::Column::Name.is_in(names.iter().map(String::as_str)))
            .order_by_asc(tab::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_tabs_by_names", e))
    }

    pub async fn find_by_ids(
        &self,
        conn: &impl ConnectionTrait,
        ids: impl IntoIterator<Item = i32>,
    ) -> Result<Vec<tab::Model>, InternalError> {
        let ids: Vec<i32> = ids.into_iter().collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        tab::Entity::find()
            .filter(tab::Column::Id.is_in(ids))
            .order_by_asc(tab::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_tabs_by_ids", e))
    }
}
