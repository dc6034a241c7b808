/// Diverging five-class palette, low to high.
pub const PALETTE: [&str; 5] = ["#d7191c", "#fdae61", "#ffffbf", "#abd9e9", "#2c7bb6"];

/// Fill for regions with no joined value.
pub const NO_DATA_FILL: &str = "#ccc";

/// Discrete quantile mapping from a value distribution onto `PALETTE`.
/// The domain is the sorted set of valid observations for one attribute, so
/// the scale must be rebuilt whenever the displayed attribute changes:
/// bucket boundaries are attribute-specific.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileScale {
    domain: Vec<f64>,
    thresholds: [f64; PALETTE.len() - 1],
}

impl QuantileScale {
    /// Build from per-row readings. Missing and non-finite entries are
    /// excluded from the domain.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut domain: Vec<f64> = values
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite())
            .collect();
        domain.sort_by(f64::total_cmp);

        let classes = PALETTE.len() as f64;
        let thresholds = std::array::from_fn(|i| {
            quantile_sorted(&domain, (i + 1) as f64 / classes).unwrap_or(f64::INFINITY)
        });
        Self { domain, thresholds }
    }

    /// Sorted valid observations the thresholds were derived from.
    pub fn domain(&self) -> &[f64] {
        &self.domain
    }

    /// Map a value to its color class. A value equal to a bucket boundary
    /// belongs to the upper bucket. With an empty domain everything maps to
    /// the lowest class; callers never consult the scale for missing values.
    pub fn color(&self, value: f64) -> &'static str {
        let class = self.thresholds.iter().take_while(|t| value >= **t).count();
        PALETTE[class]
    }
}

/// Linear interpolation quantile over a sorted sample (R-7, the convention
/// the rest of the charting world uses for quantile buckets).
fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let h = last as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(last);
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (h - h.floor()))
}

/// Min/max of the valid readings, if any.
pub fn extent<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = Option<f64>>,
{
    values
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Continuous value-to-pixel mapping for the bar chart's vertical axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return r0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Round tick values covering the domain, roughly `count` of them.
    /// Regenerated (not rescaled) whenever the domain changes.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (mut a, mut b) = self.domain;
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        let step = tick_step(a, b, count);
        if !(step > 0.0) || !step.is_finite() {
            return Vec::new();
        }
        let start = (a / step).ceil() as i64;
        let stop = (b / step).floor() as i64;
        (start..=stop).map(|i| i as f64 * step).collect()
    }
}

/// Largest of 1/2/5 x 10^k not exceeding the even subdivision of the span.
fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let span = stop - start;
    if span <= 0.0 {
        return 0.0;
    }
    let step = span / count.max(1) as f64;
    let power = 10f64.powf(step.log10().floor());
    let error = step / power;
    power
        * if error >= 50f64.sqrt() {
            10.0
        } else if error >= 10f64.sqrt() {
            5.0
        } else if error >= 2f64.sqrt() {
            2.0
        } else {
            1.0
        }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_is_sorted_valid_values_only() {
        let scale = QuantileScale::from_values([
            Some(30.0),
            None,
            Some(10.0),
            Some(f64::NAN),
            Some(20.0),
        ]);
        assert_eq!(scale.domain(), &[10.0, 20.0, 30.0]);
    }

    #[test]
    fn ten_values_split_two_per_class() {
        let scale =
            QuantileScale::from_values((1..=10).map(|v| Some(v as f64)));
        let classes: Vec<&str> = (1..=10).map(|v| scale.color(v as f64)).collect();
        for (pair, expected) in classes.chunks(2).zip(PALETTE) {
            assert_eq!(pair, [expected, expected]);
        }
    }

    #[test]
    fn color_is_deterministic_for_fixed_domain() {
        let values: Vec<Option<f64>> = vec![Some(5.0), Some(1.0), Some(9.0), Some(3.0)];
        let a = QuantileScale::from_values(values.clone());
        let b = QuantileScale::from_values(values);
        assert_eq!(a, b);
        assert_eq!(a.color(4.2), b.color(4.2));
    }

    #[test]
    fn extremes_map_to_palette_ends() {
        let scale = QuantileScale::from_values((1..=100).map(|v| Some(v as f64)));
        assert_eq!(scale.color(1.0), PALETTE[0]);
        assert_eq!(scale.color(100.0), PALETTE[4]);
        assert_eq!(scale.color(-50.0), PALETTE[0]);
        assert_eq!(scale.color(1e9), PALETTE[4]);
    }

    #[test]
    fn boundary_value_belongs_to_upper_class() {
        // Domain 1..=5: thresholds land exactly on 1.8, 2.6, 3.4, 4.2.
        let scale = QuantileScale::from_values((1..=5).map(|v| Some(v as f64)));
        assert_eq!(scale.color(1.8), PALETTE[1]);
        assert_eq!(scale.color(1.799), PALETTE[0]);
    }

    #[test]
    fn empty_domain_maps_everything_low() {
        let scale = QuantileScale::from_values([None, None]);
        assert!(scale.domain().is_empty());
        assert_eq!(scale.color(123.0), PALETTE[0]);
    }

    #[test]
    fn linear_scale_maps_endpoints_and_midpoint() {
        let scale = LinearScale::new((0.0, 100_000.0), (463.0, 0.0));
        assert_eq!(scale.scale(0.0), 463.0);
        assert_eq!(scale.scale(100_000.0), 0.0);
        assert_eq!(scale.scale(50_000.0), 231.5);
    }

    #[test]
    fn degenerate_domain_pins_to_range_start() {
        let scale = LinearScale::new((7.0, 7.0), (463.0, 0.0));
        assert_eq!(scale.scale(7.0), 463.0);
        assert_eq!(scale.scale(900.0), 463.0);
    }

    #[test]
    fn ticks_are_nice_and_cover_the_domain() {
        let scale = LinearScale::new((0.0, 100_000.0), (463.0, 0.0));
        let ticks = scale.ticks(10);
        assert_eq!(ticks.first(), Some(&0.0));
        assert_eq!(ticks.last(), Some(&100_000.0));
        assert_eq!(ticks.len(), 11);
        assert!(ticks.windows(2).all(|w| w[1] - w[0] == 10_000.0));
    }

    #[test]
    fn ticks_with_offset_domain_stay_inside() {
        let scale = LinearScale::new((872.0, 1906.0), (463.0, 0.0));
        let ticks = scale.ticks(10);
        assert!(!ticks.is_empty());
        assert!(ticks.iter().all(|t| *t >= 872.0 && *t <= 1906.0));
        assert!(ticks.windows(2).all(|w| w[1] - w[0] == 100.0));
    }

    #[test]
    fn ticks_for_empty_span_are_empty() {
        let scale = LinearScale::new((5.0, 5.0), (463.0, 0.0));
        assert!(scale.ticks(10).is_empty());
    }

    #[test]
    fn extent_skips_missing() {
        let extent = extent([Some(3.0), None, Some(-1.0), Some(10.0)]);
        assert_eq!(extent, Some((-1.0, 10.0)));
        assert_eq!(super::extent([None, None]), None);
    }
}
