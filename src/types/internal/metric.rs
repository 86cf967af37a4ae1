use serde::Serialize;

use crate::types::db::tab_metric;

/// One stored data point rendered by a dashboard tab
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabMetric {
    pub id: i32,
    pub tab_id: i32,
    pub recorded_at: i64,
    pub metric_name: String,
    pub value: f64,
    pub notes: Option<String>,
}

impl From<tab_metric::Model> for TabMetric {
    fn from(model: tab_metric::Model) -> Self {
        Self {
            id: model.id,
            tab_id: model.tab_id,
            recorded_at: model.recorded_at,
            metric_name: model.metric_name,
            value: model.value,
            notes: model.notes,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewTabMetric {
    pub tab_name: String,
    pub recorded_at: i64,
    pub metric_name: String,
    pub value: f64,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_notes_serialize_as_null() {
        let metric = TabMetric {
            id: 3,
            tab_id: 2,
            recorded_at: 1_700_000_000,
            metric_name: "revenue".to_string(),
            value: 12.5,
            notes: None,
        };

        let json = serde_json::to_value(&metric).unwrap();
        assert_eq!(json["metric_name"], "revenue");
        assert!(json["notes"].is_null());
    }
}
