// Langelier Saturation Index calculation
//
// LSI = pH + TF + CF + AF - TDSF
//
// TF, CF and AF are step factors read off the standard breakpoint tables;
// TDSF is a fixed constant for pools under 1000 ppm dissolved solids.
use serde::Serialize;

use super::reading::WaterReading;

/// Simplified TDS factor, valid for total dissolved solids under 1000 ppm.
const TDS_FACTOR: f64 = 12.1;

/// Temperature factor breakpoints (degrees F, inclusive upper bound).
const TEMPERATURE_FACTORS: [(f64, f64); 10] = [
    (32.0, 0.0),
    (38.0, 0.1),
    (46.0, 0.2),
    (53.0, 0.3),
    (60.0, 0.4),
    (66.0, 0.5),
    (76.0, 0.6),
    (84.0, 0.7),
    (94.0, 0.8),
    (105.0, 0.9),
];
const TEMPERATURE_CEILING: f64 = 1.0;

/// Calcium hardness factor breakpoints (ppm, inclusive upper bound).
const CALCIUM_FACTORS: [(f64, f64); 6] = [
    (25.0, 1.0),
    (50.0, 1.3),
    (100.0, 1.6),
    (200.0, 1.9),
    (400.0, 2.2),
    (800.0, 2.5),
];
const CALCIUM_CEILING: f64 = 2.6;

/// Total alkalinity factor breakpoints (ppm, inclusive upper bound).
const ALKALINITY_FACTORS: [(f64, f64); 6] = [
    (25.0, 1.4),
    (50.0, 1.7),
    (100.0, 2.0),
    (200.0, 2.3),
    (400.0, 2.6),
    (800.0, 2.9),
];
const ALKALINITY_CEILING: f64 = 3.0;

/// A computed saturation index, rounded to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SaturationIndex(f64);

impl SaturationIndex {
    pub fn value(self) -> f64 {
        self.0
    }

    pub fn balance(self) -> WaterBalance {
        WaterBalance::classify(self.0)
    }
}

/// Qualitative band for a saturation index, used only for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WaterBalance {
    Corrosive,
    Balanced,
    ScaleForming,
}

impl WaterBalance {
    /// Indexes at exactly +/-0.5 still count as balanced.
    pub fn classify(index: f64) -> WaterBalance {
        if index < -0.5 {
            WaterBalance::Corrosive
        } else if index > 0.5 {
            WaterBalance::ScaleForming
        } else {
            WaterBalance::Balanced
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WaterBalance::Corrosive => "Corrosive",
            WaterBalance::Balanced => "Balanced",
            WaterBalance::ScaleForming => "Scale-Forming",
        }
    }
}

/// Compute the saturation index for a reading.
///
/// Returns `None` when any of pH, temperature, calcium hardness or
/// alkalinity is missing or negative. A half-filled reading is expected
/// input (the attendant has not finished the sheet yet), not an error,
/// and the indeterminate result stays distinguishable from a true zero.
pub fn saturation_index(reading: &WaterReading) -> Option<SaturationIndex> {
    let ph = reading.ph?;
    let temperature_f = reading.temperature_f?;
    let calcium = reading.calcium_hardness?;
    let alkalinity = reading.alkalinity?;

    if ph < 0.0 || temperature_f < 0.0 || calcium < 0.0 || alkalinity < 0.0 {
        return None;
    }

    let index = ph
        + temperature_factor(temperature_f)
        + calcium_factor(calcium)
        + alkalinity_factor(alkalinity)
        - TDS_FACTOR;

    Some(SaturationIndex(round_to_hundredths(index)))
}

fn temperature_factor(temperature_f: f64) -> f64 {
    step_factor(&TEMPERATURE_FACTORS, TEMPERATURE_CEILING, temperature_f)
}

fn calcium_factor(calcium: f64) -> f64 {
    step_factor(&CALCIUM_FACTORS, CALCIUM_CEILING, calcium)
}

fn alkalinity_factor(alkalinity: f64) -> f64 {
    step_factor(&ALKALINITY_FACTORS, ALKALINITY_CEILING, alkalinity)
}

fn step_factor(table: &[(f64, f64)], ceiling: f64, value: f64) -> f64 {
    table
        .iter()
        .find(|(bound, _)| value <= *bound)
        .map(|(_, factor)| *factor)
        .unwrap_or(ceiling)
}

pub(crate) fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(ph: f64, temperature_f: f64, calcium: f64, alkalinity: f64) -> WaterReading {
        WaterReading {
            ph: Some(ph),
            temperature_f: Some(temperature_f),
            calcium_hardness: Some(calcium),
            alkalinity: Some(alkalinity),
            tds: None,
        }
    }

    #[test]
    fn test_balanced_reading_scores_zero() {
        // TF(80)=0.7, CF(250)=1.9, AF(90)=2.0 -> 7.5+0.7+1.9+2.0-12.1 = 0.0
        let index = saturation_index(&reading(7.5, 80.0, 250.0, 90.0)).unwrap();
        assert_eq!(index.value(), 0.0);
        assert_eq!(index.balance(), WaterBalance::Balanced);
    }

    #[test]
    fn test_missing_field_is_indeterminate() {
        let complete = reading(7.5, 80.0, 250.0, 90.0);

        let strips: [fn(&mut WaterReading); 4] = [
            |r| r.ph = None,
            |r| r.temperature_f = None,
            |r| r.calcium_hardness = None,
            |r| r.alkalinity = None,
        ];
        for strip in strips {
            let mut partial = complete;
            strip(&mut partial);
            assert_eq!(saturation_index(&partial), None);
        }
    }

    #[test]
    fn test_negative_field_is_indeterminate() {
        assert_eq!(saturation_index(&reading(-7.5, 80.0, 250.0, 90.0)), None);
        assert_eq!(saturation_index(&reading(7.5, -80.0, 250.0, 90.0)), None);
        assert_eq!(saturation_index(&reading(7.5, 80.0, -250.0, 90.0)), None);
        assert_eq!(saturation_index(&reading(7.5, 80.0, 250.0, -90.0)), None);
    }

    #[test]
    fn test_factor_boundaries_are_inclusive() {
        assert_eq!(temperature_factor(32.0), 0.0);
        assert_eq!(temperature_factor(32.0001), 0.1);
        assert_eq!(calcium_factor(100.0), 1.6);
        assert_eq!(calcium_factor(100.0001), 1.9);
        assert_eq!(alkalinity_factor(800.0), 2.9);
        assert_eq!(alkalinity_factor(800.0001), 3.0);
    }

    #[test]
    fn test_values_past_the_table_use_the_ceiling_factor() {
        assert_eq!(temperature_factor(212.0), 1.0);
        assert_eq!(calcium_factor(5000.0), 2.6);
        assert_eq!(alkalinity_factor(5000.0), 3.0);
    }

    #[test]
    fn test_zero_readings_use_the_smallest_bucket() {
        assert_eq!(temperature_factor(0.0), 0.0);
        assert_eq!(calcium_factor(0.0), 1.0);
        assert_eq!(alkalinity_factor(0.0), 1.4);
    }

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(WaterBalance::classify(-0.51), WaterBalance::Corrosive);
        assert_eq!(WaterBalance::classify(-0.5), WaterBalance::Balanced);
        assert_eq!(WaterBalance::classify(0.5), WaterBalance::Balanced);
        assert_eq!(WaterBalance::classify(0.51), WaterBalance::ScaleForming);
    }

    #[test]
    fn test_index_is_rounded_to_two_decimals() {
        // 7.333+0.7+1.9+2.0-12.1 = -0.167 -> -0.17
        let index = saturation_index(&reading(7.333, 80.0, 250.0, 90.0)).unwrap();
        assert_eq!(index.value(), -0.17);
    }

    #[test]
    fn test_tds_reading_does_not_shift_the_index() {
        let mut with_tds = reading(7.5, 80.0, 250.0, 90.0);
        with_tds.tds = Some(2400.0);
        assert_eq!(
            saturation_index(&with_tds),
            saturation_index(&reading(7.5, 80.0, 250.0, 90.0))
        );
    }

    #[test]
    fn test_identical_inputs_yield_identical_results() {
        let sample = reading(7.2, 88.0, 310.0, 120.0);
        assert_eq!(saturation_index(&sample), saturation_index(&sample));
    }
}
