//! Air Quality Index computation per the Indian CPCB methodology.
//!
//! Each pollutant has a fixed six-band breakpoint table mapping a
//! concentration range onto an index range. A pollutant's sub-index is the
//! linear interpolation of its concentration within the matching band, and
//! the composite AQI is the maximum sub-index across all six pollutants.

use serde::{Deserialize, Serialize};

/// One band of a pollutant breakpoint table.
///
/// Concentration and index bounds are inclusive on both ends; bands are
/// ordered ascending and contiguous.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub concentration_low: f64,
    pub concentration_high: f64,
    pub index_low: f64,
    pub index_high: f64,
}

const fn bp(c_low: f64, c_high: f64, i_low: f64, i_high: f64) -> Breakpoint {
    Breakpoint {
        concentration_low: c_low,
        concentration_high: c_high,
        index_low: i_low,
        index_high: i_high,
    }
}

/// The six pollutants that enter the composite AQI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pollutant {
    Pm2_5,
    Pm10,
    CarbonMonoxide,
    NitrogenDioxide,
    SulphurDioxide,
    Ozone,
}

impl Pollutant {
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm2_5,
        Pollutant::Pm10,
        Pollutant::CarbonMonoxide,
        Pollutant::NitrogenDioxide,
        Pollutant::SulphurDioxide,
        Pollutant::Ozone,
    ];

    /// CPCB breakpoint table for this pollutant.
    ///
    /// All tables are in µg/m³ except carbon monoxide, which is in mg/m³;
    /// the upstream feed reports CO in µg/m³, so it must be divided by 1000
    /// before lookup (see [`PollutantReadings::from_feed`]).
    #[must_use]
    pub const fn breakpoints(self) -> &'static [Breakpoint; 6] {
        // Tables live as const items so the returned references are 'static.
        const PM2_5: [Breakpoint; 6] = [
            bp(0.0, 30.0, 0.0, 50.0),
            bp(30.0, 60.0, 51.0, 100.0),
            bp(60.0, 90.0, 101.0, 200.0),
            bp(90.0, 120.0, 201.0, 300.0),
            bp(120.0, 250.0, 301.0, 400.0),
            bp(250.0, 350.0, 401.0, 500.0),
        ];
        const PM10: [Breakpoint; 6] = [
            bp(0.0, 50.0, 0.0, 50.0),
            bp(50.0, 100.0, 51.0, 100.0),
            bp(100.0, 250.0, 101.0, 200.0),
            bp(250.0, 350.0, 201.0, 300.0),
            bp(350.0, 430.0, 301.0, 400.0),
            bp(430.0, 600.0, 401.0, 500.0),
        ];
        const CO: [Breakpoint; 6] = [
            bp(0.0, 1.0, 0.0, 50.0),
            bp(1.0, 2.0, 51.0, 100.0),
            bp(2.0, 10.0, 101.0, 200.0),
            bp(10.0, 17.0, 201.0, 300.0),
            bp(17.0, 34.0, 301.0, 400.0),
            bp(34.0, 50.0, 401.0, 500.0),
        ];
        const NO2: [Breakpoint; 6] = [
            bp(0.0, 40.0, 0.0, 50.0),
            bp(40.0, 80.0, 51.0, 100.0),
            bp(80.0, 180.0, 101.0, 200.0),
            bp(180.0, 280.0, 201.0, 300.0),
            bp(280.0, 400.0, 301.0, 400.0),
            bp(400.0, 1000.0, 401.0, 500.0),
        ];
        const SO2: [Breakpoint; 6] = [
            bp(0.0, 40.0, 0.0, 50.0),
            bp(40.0, 80.0, 51.0, 100.0),
            bp(80.0, 380.0, 101.0, 200.0),
            bp(380.0, 800.0, 201.0, 300.0),
            bp(800.0, 1600.0, 301.0, 400.0),
            bp(1600.0, 2000.0, 401.0, 500.0),
        ];
        const O3: [Breakpoint; 6] = [
            bp(0.0, 50.0, 0.0, 50.0),
            bp(50.0, 100.0, 51.0, 100.0),
            bp(100.0, 168.0, 101.0, 200.0),
            bp(168.0, 208.0, 201.0, 300.0),
            bp(208.0, 748.0, 301.0, 400.0),
            bp(748.0, 1000.0, 401.0, 500.0),
        ];

        match self {
            Pollutant::Pm2_5 => &PM2_5,
            Pollutant::Pm10 => &PM10,
            Pollutant::CarbonMonoxide => &CO,
            Pollutant::NitrogenDioxide => &NO2,
            Pollutant::SulphurDioxide => &SO2,
            Pollutant::Ozone => &O3,
        }
    }

    /// Display label, matching the data-panel rows
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Pollutant::Pm2_5 => "PM₂.₅",
            Pollutant::Pm10 => "PM₁₀",
            Pollutant::CarbonMonoxide => "CO",
            Pollutant::NitrogenDioxide => "NO₂",
            Pollutant::SulphurDioxide => "SO₂",
            Pollutant::Ozone => "O₃",
        }
    }

    /// Unit of the concentration fed into the breakpoint lookup
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Pollutant::CarbonMonoxide => "mg/m³",
            _ => "μg/m³",
        }
    }
}

/// One AQI category band: index range, label and display color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AqiBand {
    pub low: f64,
    pub high: f64,
    pub label: &'static str,
    pub color: &'static str,
}

/// The six AQI category bands spanning 0–500, ascending.
pub const AQI_BANDS: [AqiBand; 6] = [
    AqiBand { low: 0.0, high: 50.0, label: "Good", color: "#009966" },
    AqiBand { low: 51.0, high: 100.0, label: "Satisfactory", color: "#ffde33" },
    AqiBand { low: 101.0, high: 200.0, label: "Moderate", color: "#ff9933" },
    AqiBand { low: 201.0, high: 300.0, label: "Poor", color: "#cc0033" },
    AqiBand { low: 301.0, high: 400.0, label: "Very Poor", color: "#660099" },
    AqiBand { low: 401.0, high: 500.0, label: "Severe", color: "#7e0023" },
];

/// Sentinel returned by [`aqi_color`] when a value falls outside every band.
pub const UNKNOWN_BAND: (&str, &str) = ("#000000", "Unknown");

/// Interpolate a concentration against a breakpoint table.
///
/// The first band (in table order) whose concentration range contains the
/// input wins; both range ends are inclusive, so an exact boundary value
/// belongs to the lower band. Concentrations below the first band clamp to
/// its `index_low`, and anything that matches no band clamps to the last
/// band's `index_high`. Out-of-table concentrations are never an error.
#[must_use]
pub fn sub_index(concentration: f64, breakpoints: &[Breakpoint]) -> f64 {
    for b in breakpoints {
        if b.concentration_low <= concentration && concentration <= b.concentration_high {
            return (b.index_high - b.index_low) / (b.concentration_high - b.concentration_low)
                * (concentration - b.concentration_low)
                + b.index_low;
        }
    }
    let first = &breakpoints[0];
    if concentration < first.concentration_low {
        first.index_low
    } else {
        breakpoints[breakpoints.len() - 1].index_high
    }
}

/// Resolve an AQI value to its `(color, label)` pair.
///
/// Scans the bands ascending, both range ends inclusive. Values outside
/// every band (negative, above 500, or in the fractional gaps between
/// bands) get the black "Unknown" sentinel.
#[must_use]
pub fn aqi_color(aqi: f64) -> (&'static str, &'static str) {
    for band in &AQI_BANDS {
        if band.low <= aqi && aqi <= band.high {
            return (band.color, band.label);
        }
    }
    UNKNOWN_BAND
}

/// Concentrations for the six monitored pollutants, in the units their
/// breakpoint tables expect (CO in mg/m³, everything else in µg/m³).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PollutantReadings {
    pub pm2_5: f64,
    pub pm10: f64,
    pub carbon_monoxide: f64,
    pub nitrogen_dioxide: f64,
    pub sulphur_dioxide: f64,
    pub ozone: f64,
}

impl PollutantReadings {
    /// Build readings from feed values, which report every pollutant in
    /// µg/m³. CO is converted to mg/m³ here.
    #[must_use]
    pub fn from_feed(
        pm2_5: f64,
        pm10: f64,
        carbon_monoxide_ug: f64,
        nitrogen_dioxide: f64,
        sulphur_dioxide: f64,
        ozone: f64,
    ) -> Self {
        Self {
            pm2_5,
            pm10,
            carbon_monoxide: carbon_monoxide_ug / 1000.0,
            nitrogen_dioxide,
            sulphur_dioxide,
            ozone,
        }
    }

    /// Concentration for one pollutant, in its table unit
    #[must_use]
    pub fn concentration(&self, pollutant: Pollutant) -> f64 {
        match pollutant {
            Pollutant::Pm2_5 => self.pm2_5,
            Pollutant::Pm10 => self.pm10,
            Pollutant::CarbonMonoxide => self.carbon_monoxide,
            Pollutant::NitrogenDioxide => self.nitrogen_dioxide,
            Pollutant::SulphurDioxide => self.sulphur_dioxide,
            Pollutant::Ozone => self.ozone,
        }
    }
}

/// The composite AQI: the maximum sub-index across the six pollutants.
///
/// Pure function of the readings; deterministic, no I/O.
#[must_use]
pub fn composite_aqi(readings: &PollutantReadings) -> f64 {
    Pollutant::ALL
        .iter()
        .map(|&p| sub_index(readings.concentration(p), p.breakpoints()))
        .fold(f64::MIN, f64::max)
}

/// Full AQI result for one location and time: per-pollutant sub-indices,
/// the composite value and its category.
#[derive(Debug, Clone, PartialEq)]
pub struct AqiReport {
    pub readings: PollutantReadings,
    pub sub_indices: [(Pollutant, f64); 6],
    pub aqi: f64,
    pub color: &'static str,
    pub label: &'static str,
}

impl AqiReport {
    #[must_use]
    pub fn compute(readings: PollutantReadings) -> Self {
        let sub_indices = Pollutant::ALL
            .map(|p| (p, sub_index(readings.concentration(p), p.breakpoints())));
        let aqi = sub_indices
            .iter()
            .map(|&(_, idx)| idx)
            .fold(f64::MIN, f64::max);
        let (color, label) = aqi_color(aqi);
        Self {
            readings,
            sub_indices,
            aqi,
            color,
            label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Pollutant::Pm2_5)]
    #[case(Pollutant::Pm10)]
    #[case(Pollutant::CarbonMonoxide)]
    #[case(Pollutant::NitrogenDioxide)]
    #[case(Pollutant::SulphurDioxide)]
    #[case(Pollutant::Ozone)]
    fn breakpoint_tables_are_contiguous(#[case] pollutant: Pollutant) {
        let table = pollutant.breakpoints();
        assert_eq!(table[0].concentration_low, 0.0);
        assert_eq!(table[0].index_low, 0.0);
        assert_eq!(table[5].index_high, 500.0);
        for pair in table.windows(2) {
            assert_eq!(pair[1].concentration_low, pair[0].concentration_high);
            assert_eq!(pair[1].index_low, pair[0].index_high + 1.0);
            assert!(pair[0].concentration_low < pair[0].concentration_high);
        }
    }

    #[rstest]
    #[case(Pollutant::Pm2_5)]
    #[case(Pollutant::Pm10)]
    #[case(Pollutant::CarbonMonoxide)]
    #[case(Pollutant::NitrogenDioxide)]
    #[case(Pollutant::SulphurDioxide)]
    #[case(Pollutant::Ozone)]
    fn band_bounds_interpolate_exactly(#[case] pollutant: Pollutant) {
        let table = pollutant.breakpoints();
        // The lower bound of band n+1 coincides with the upper bound of band
        // n, and the lower band wins, so only the first band's lower bound is
        // reachable as a lower bound.
        assert_eq!(sub_index(table[0].concentration_low, table), table[0].index_low);
        for band in table {
            let top = sub_index(band.concentration_high, table);
            assert!((top - band.index_high).abs() < 1e-9);
            let mid = (band.concentration_low + band.concentration_high) / 2.0;
            let expected_mid = (band.index_low + band.index_high) / 2.0;
            assert!((sub_index(mid, table) - expected_mid).abs() < 1e-9);
        }
    }

    #[test]
    fn shared_boundary_belongs_to_the_lower_band() {
        // PM2.5 tables share the value 30 between bands 1 and 2; the first
        // band in table order wins, so 30 maps to 50, not 51.
        let table = Pollutant::Pm2_5.breakpoints();
        assert_eq!(sub_index(30.0, table), 50.0);
        assert!((sub_index(60.0, table) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn below_table_clamps_to_floor() {
        let table = Pollutant::Pm2_5.breakpoints();
        assert_eq!(sub_index(-5.0, table), 0.0);
    }

    #[test]
    fn above_table_clamps_to_ceiling() {
        let table = Pollutant::Pm2_5.breakpoints();
        assert_eq!(sub_index(1000.0, table), 500.0);
    }

    #[rstest]
    #[case(0.0, "#009966", "Good")]
    #[case(50.0, "#009966", "Good")]
    #[case(75.0, "#ffde33", "Satisfactory")]
    #[case(150.0, "#ff9933", "Moderate")]
    #[case(250.0, "#cc0033", "Poor")]
    #[case(350.0, "#660099", "Very Poor")]
    #[case(500.0, "#7e0023", "Severe")]
    fn aqi_color_bands(#[case] value: f64, #[case] color: &str, #[case] label: &str) {
        assert_eq!(aqi_color(value), (color, label));
    }

    #[rstest]
    #[case(-1.0)]
    #[case(50.5)]
    #[case(501.0)]
    fn aqi_color_outside_bands_is_unknown(#[case] value: f64) {
        assert_eq!(aqi_color(value), UNKNOWN_BAND);
    }

    #[test]
    fn co_feed_conversion_to_milligrams() {
        let readings = PollutantReadings::from_feed(0.0, 0.0, 1000.0, 0.0, 0.0, 0.0);
        assert_eq!(readings.carbon_monoxide, 1.0);
    }

    #[test]
    fn composite_is_dominated_by_worst_pollutant() {
        // Each pollutant sits exactly at the top of its first band, so every
        // sub-index is 50 and so is the composite.
        let readings = PollutantReadings::from_feed(30.0, 50.0, 1000.0, 40.0, 40.0, 50.0);
        assert_eq!(composite_aqi(&readings), 50.0);

        let report = AqiReport::compute(readings);
        assert_eq!(report.aqi, 50.0);
        assert_eq!(report.label, "Good");
        for (_, idx) in report.sub_indices {
            assert_eq!(idx, 50.0);
        }
    }

    #[test]
    fn composite_tracks_single_bad_pollutant() {
        let readings = PollutantReadings::from_feed(45.0, 10.0, 100.0, 5.0, 5.0, 5.0);
        let report = AqiReport::compute(readings);
        // PM2.5 at 45 is the midpoint of its second band
        assert!((report.aqi - 75.5).abs() < 1e-9);
        assert_eq!(report.label, "Satisfactory");
    }

    #[test]
    fn pure_functions_are_idempotent() {
        let readings = PollutantReadings::from_feed(33.0, 72.0, 800.0, 41.0, 12.0, 61.0);
        let first = composite_aqi(&readings);
        let second = composite_aqi(&readings);
        assert_eq!(first, second);
        assert_eq!(aqi_color(first), aqi_color(second));
    }
}
