// Chemical dosing recommendations
//
// Cup quantities are calibrated against a reference pool volume; the
// stock chart matches the printed dosing card for a 1,500 gallon pool.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::chemistry::{WaterBalance, round_to_hundredths};
use super::reading::WaterReading;

/// Dosing response for one additive.
#[derive(Debug, Clone, Deserialize)]
pub struct DosingCurve {
    /// Reading the treatment aims for, ppm.
    pub target_ppm: f64,
    /// No treatment is recommended at or above this reading, ppm.
    pub treat_below_ppm: f64,
    /// Cups of additive that raise the reading by 10 ppm at the
    /// reference volume.
    pub cups_per_ten_ppm: f64,
}

impl DosingCurve {
    /// Cups required to lift `current` toward the target, rounded to
    /// two decimals.
    ///
    /// Missing, negative and at-or-above-threshold readings all dose
    /// zero cups; "no action" is an answer, not an error.
    pub fn cups(&self, current: Option<f64>) -> f64 {
        let Some(current) = current else { return 0.0 };
        if current < 0.0 || current >= self.treat_below_ppm {
            return 0.0;
        }
        round_to_hundredths((self.target_ppm - current) / 10.0 * self.cups_per_ten_ppm)
    }
}

/// Dosing chart for both additives at a given pool volume.
#[derive(Debug, Clone, Deserialize)]
pub struct DosingChart {
    /// Pool volume the cup factors were calibrated for, gallons.
    pub reference_gallons: f64,
    /// Sodium bicarbonate curve (raises total alkalinity).
    pub alkalinity: DosingCurve,
    /// Calcium chloride curve (raises calcium hardness).
    pub calcium: DosingCurve,
}

impl Default for DosingChart {
    fn default() -> Self {
        Self {
            reference_gallons: 1500.0,
            alkalinity: DosingCurve {
                target_ppm: 100.0,
                treat_below_ppm: 80.0,
                cups_per_ten_ppm: 0.5,
            },
            calcium: DosingCurve {
                target_ppm: 300.0,
                treat_below_ppm: 200.0,
                cups_per_ten_ppm: 0.4,
            },
        }
    }
}

impl DosingChart {
    /// Rescale the cup factors for a pool of a different volume. The
    /// cups-per-10-ppm ratio is linear in gallons.
    pub fn for_volume(&self, gallons: f64) -> DosingChart {
        let scale = gallons / self.reference_gallons;
        DosingChart {
            reference_gallons: gallons,
            alkalinity: DosingCurve {
                cups_per_ten_ppm: self.alkalinity.cups_per_ten_ppm * scale,
                ..self.alkalinity.clone()
            },
            calcium: DosingCurve {
                cups_per_ten_ppm: self.calcium.cups_per_ten_ppm * scale,
                ..self.calcium.clone()
            },
        }
    }

    pub fn bicarb_cups(&self, alkalinity: Option<f64>) -> f64 {
        self.alkalinity.cups(alkalinity)
    }

    pub fn calcium_cups(&self, calcium_hardness: Option<f64>) -> f64 {
        self.calcium.cups(calcium_hardness)
    }

    /// Recommend both additives for a reading. The two doses are
    /// computed independently of one another.
    pub fn recommend(&self, reading: &WaterReading) -> TreatmentDosage {
        TreatmentDosage {
            bicarb_cups: self.bicarb_cups(reading.alkalinity),
            calcium_cups: self.calcium_cups(reading.calcium_hardness),
        }
    }
}

/// Recommended cups of each additive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TreatmentDosage {
    pub bicarb_cups: f64,
    pub calcium_cups: f64,
}

impl TreatmentDosage {
    pub fn is_no_action(&self) -> bool {
        self.bicarb_cups == 0.0 && self.calcium_cups == 0.0
    }
}

/// A logged treatment, as stored by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct Treatment {
    pub treatment_date: NaiveDate,
    pub bicarb_cups_added: Option<f64>,
    pub calcium_cups_added: Option<f64>,
}

/// A treatment to record.
#[derive(Debug, Clone, Serialize)]
pub struct NewTreatment {
    pub pool_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub treatment_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bicarb_cups_added: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calcium_cups_added: Option<f64>,
}

/// Dosing recommendation derived from a pool's last stored weekly read.
#[derive(Debug, Clone, Serialize)]
pub struct TreatmentPlan {
    pub pool_id: String,
    pub read_date: Option<NaiveDate>,
    pub alkalinity: Option<f64>,
    pub calcium_hardness: Option<f64>,
    pub saturation_index: Option<f64>,
    pub balance: Option<WaterBalance>,
    pub dosage: TreatmentDosage,
}
