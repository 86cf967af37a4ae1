use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tab_metrics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub tab_id: i32,
    pub recorded_at: i64,
    pub metric_name: String,
    pub value: f64,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
