// Descriptive statistics over f64 slices. NaN observations are skipped,
// and too few remaining observations give NaN.

fn observed(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| !v.is_nan()).collect()
}

pub fn mean(values: &[f64]) -> f64 {
    let values = observed(values);
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std(values: &[f64]) -> f64 {
    let values = observed(values);
    if values.len() < 2 {
        return f64::NAN;
    }
    let avg = mean(&values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Pearson correlation over the pairs where both sides are observed.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() {
        return f64::NAN;
    }
    let (x, y): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y.iter())
        .filter(|(a, b)| !a.is_nan() && !b.is_nan())
        .map(|(a, b)| (*a, *b))
        .unzip();
    if x.len() < 2 {
        return f64::NAN;
    }
    let mean_x = mean(&x);
    let mean_y = mean(&y);
    let numerator: f64 = x.iter().zip(y.iter()).map(|(xi, yi)| (xi - mean_x) * (yi - mean_y)).sum();
    let denominator_x: f64 = x.iter().map(|xi| (xi - mean_x).powi(2)).sum();
    let denominator_y: f64 = y.iter().map(|yi| (yi - mean_y).powi(2)).sum();
    let denominator = (denominator_x * denominator_y).sqrt();
    if denominator == 0.0 {
        f64::NAN
    } else {
        // Rounding can push a perfect correlation just past 1
        (numerator / denominator).clamp(-1.0, 1.0)
    }
}

/// Median of the non-NaN values.
pub fn median(values: &[f64]) -> f64 {
    let mut sorted = observed(values);
    if sorted.is_empty() {
        return f64::NAN;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_std_uses_n_minus_one() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        // population std is 2.0, sample std is sqrt(32 / 7)
        assert!((sample_std(&values) - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert!(sample_std(&[1.0]).is_nan());
    }

    #[test]
    fn pearson_of_linear_relation() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y: Vec<f64> = x.iter().map(|v| 3.0 - 2.0 * v).collect();
        assert_eq!(pearson(&x, &y), -1.0);
        assert_eq!(pearson(&x, &x), 1.0);
    }

    #[test]
    fn pearson_degenerate_inputs_are_nan() {
        assert!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_nan());
        assert!(pearson(&[1.0, 2.0], &[1.0]).is_nan());
        assert!(pearson(&[], &[]).is_nan());
    }

    #[test]
    fn nan_observations_are_skipped() {
        assert_eq!(mean(&[1.0, f64::NAN, 3.0]), 2.0);
        assert_eq!(sample_std(&[1.0, f64::NAN, 3.0]), 2f64.sqrt());
        assert!(mean(&[f64::NAN]).is_nan());
        assert!(sample_std(&[f64::NAN, 1.0]).is_nan());
        assert_eq!(pearson(&[1.0, 2.0, f64::NAN, 3.0], &[2.0, 4.0, 5.0, 6.0]), 1.0);
    }

    #[test]
    fn median_even_odd_and_nan() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&[f64::NAN, 5.0]), 5.0);
        assert!(median(&[]).is_nan());
        assert!(mean(&[]).is_nan());
    }
}
