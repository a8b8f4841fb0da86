//! Per-security performance results and the figures a caller can pick from them.

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Performance of one security over one reporting window.
///
/// A record exists only if the security had activity in the window. A record
/// whose figures are all zero is a real result ("activity summing to zero"),
/// unlike a missing record ("no activity").
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    /// True time-weighted rate of return.
    pub ttwror: f64,
    /// Internal rate of return, annualised.
    pub irr: f64,
    /// Unrealised gains on holdings over the window.
    pub capital_gains: Money,
    pub capital_gains_percent: f64,
    /// Absolute performance: value change including dividends and fees.
    pub delta: Money,
    pub delta_percent: f64,
}

impl PerformanceRecord {
    /// Read one figure.
    pub fn get(&self, metric: PerformanceMetric) -> MetricValue {
        match metric {
            PerformanceMetric::TrueTimeWeightedRateOfReturn => MetricValue::Ratio(self.ttwror),
            PerformanceMetric::InternalRateOfReturn => MetricValue::Ratio(self.irr),
            PerformanceMetric::CapitalGains => MetricValue::Money(self.capital_gains.clone()),
            PerformanceMetric::CapitalGainsPercent => MetricValue::Ratio(self.capital_gains_percent),
            PerformanceMetric::Delta => MetricValue::Money(self.delta.clone()),
            PerformanceMetric::DeltaPercent => MetricValue::Ratio(self.delta_percent),
        }
    }
}

/// Selector for one figure of a [`PerformanceRecord`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PerformanceMetric {
    TrueTimeWeightedRateOfReturn,
    InternalRateOfReturn,
    CapitalGains,
    CapitalGainsPercent,
    Delta,
    DeltaPercent,
}

impl PerformanceMetric {
    pub const ALL: [PerformanceMetric; 6] = [
        PerformanceMetric::TrueTimeWeightedRateOfReturn,
        PerformanceMetric::InternalRateOfReturn,
        PerformanceMetric::CapitalGains,
        PerformanceMetric::CapitalGainsPercent,
        PerformanceMetric::Delta,
        PerformanceMetric::DeltaPercent,
    ];

    /// Whether the figure is a monetary amount rather than a ratio.
    pub fn is_monetary(self) -> bool {
        matches!(self, PerformanceMetric::CapitalGains | PerformanceMetric::Delta)
    }
}

/// One figure read from a record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MetricValue {
    Money(Money),
    Ratio(f64),
}

/// Sign of a figure.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl MetricValue {
    pub fn trend(&self) -> Trend {
        match self {
            MetricValue::Money(m) if m.is_negative() => Trend::Down,
            MetricValue::Money(m) if m.is_zero() => Trend::Flat,
            MetricValue::Money(_) => Trend::Up,
            MetricValue::Ratio(r) if *r < 0.0 => Trend::Down,
            MetricValue::Ratio(r) if *r > 0.0 => Trend::Up,
            // zero and NaN
            MetricValue::Ratio(_) => Trend::Flat,
        }
    }
}
