use serde::{Deserialize, Serialize};

pub const NO_DATA_LABEL: &str = "No data";

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

impl ChartPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    pub fn no_data() -> Self {
        Self::new(NO_DATA_LABEL, 0.0)
    }

    pub fn is_placeholder(&self) -> bool {
        self.label == NO_DATA_LABEL && self.value == 0.0
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
}
