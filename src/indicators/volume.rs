// =============================================================================
// Volume indicators — trailing average volume and relative volume
// =============================================================================
//
// RelativeVolume compares each bar's volume against its trailing average:
// a value above 1.0 means participation is running hotter than usual.
// Division by a zero or undefined average yields undefined, not a panic.

use crate::indicators::sma::calculate_sma;

/// Trailing average volume and the per-bar relative volume, both aligned
/// 1:1 with the input.
#[derive(Debug, Clone)]
pub struct VolumeSeries {
    pub average: Vec<Option<f64>>,
    pub relative: Vec<Option<f64>>,
}

/// Compute the `period`-bar rolling mean of `volumes` and each bar's volume
/// divided by that mean.
pub fn calculate_relative_volume(volumes: &[f64], period: usize) -> VolumeSeries {
    let average = calculate_sma(volumes, period);

    let relative: Vec<Option<f64>> = volumes
        .iter()
        .zip(average.iter())
        .map(|(&v, avg)| match avg {
            Some(a) if *a > 0.0 => {
                let rel = v / a;
                if rel.is_finite() {
                    Some(rel)
                } else {
                    None
                }
            }
            _ => None,
        })
        .collect();

    VolumeSeries { average, relative }
}
