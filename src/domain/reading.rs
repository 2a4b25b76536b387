// Water reading domain models
use chrono::NaiveDate;
use serde::Serialize;

/// One set of chemistry measurements, each field independently optional.
///
/// Attendants fill readings in over the course of a visit, so an
/// incomplete reading is ordinary input rather than an error.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WaterReading {
    pub ph: Option<f64>,
    pub temperature_f: Option<f64>,
    pub calcium_hardness: Option<f64>,
    pub alkalinity: Option<f64>,
    /// Recorded with weekly reads but not consumed by the saturation
    /// index formula, which assumes dissolved solids under 1000 ppm.
    pub tds: Option<f64>,
}

/// Daily sanitizer and equipment read, as returned by the backend.
/// Pool, resort and attendant names come from the joined report query
/// and are absent on plain per-pool fetches.
#[derive(Debug, Clone, Serialize)]
pub struct DailyRead {
    pub read_date: Option<NaiveDate>,
    pub chlorine: Option<f64>,
    pub ph: Option<f64>,
    pub temperature: Option<f64>,
    pub flow: Option<f64>,
    pub influent: Option<f64>,
    pub effluent: Option<f64>,
    pub pool_name: Option<String>,
    pub resort_name: Option<String>,
    pub attendant: Option<String>,
}

/// Weekly chemistry read, as returned by the backend.
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyRead {
    pub read_date: Option<NaiveDate>,
    pub tds: Option<f64>,
    pub alkalinity: Option<f64>,
    pub calcium_hardness: Option<f64>,
    pub saturation_index: Option<f64>,
    pub pool_name: Option<String>,
    pub resort_name: Option<String>,
    pub attendant: Option<String>,
}

impl WeeklyRead {
    /// View the stored chemistry as a reading. Weekly reads carry no pH
    /// or temperature; those live on the daily sheet.
    pub fn water_reading(&self) -> WaterReading {
        WaterReading {
            ph: None,
            temperature_f: None,
            calcium_hardness: self.calcium_hardness,
            alkalinity: self.alkalinity,
            tds: self.tds,
        }
    }
}

/// Daily read to record.
#[derive(Debug, Clone, Serialize)]
pub struct NewDailyRead {
    pub pool_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub read_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chlorine: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ph: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub influent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effluent: Option<f64>,
}

/// Weekly read to record. The saturation index is derived from the
/// submitted chemistry before the row is stored, never client-supplied.
#[derive(Debug, Clone, Serialize)]
pub struct NewWeeklyRead {
    pub pool_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub read_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alkalinity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calcium_hardness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturation_index: Option<f64>,
}
