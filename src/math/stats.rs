//! Reductions over per-volume scalar series.
//!
//! Non-finite values take part in `mean` as-is; `max` skips NaN.

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            Some(m) if m >= v => Some(m),
            _ => Some(v),
        })
}

pub fn count_above(values: &[f64], threshold: f64) -> usize {
    values.iter().filter(|v| **v > threshold).count()
}

pub fn max_abs<'a, I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a f64>,
{
    let abs: Vec<f64> = values.into_iter().map(|v| v.abs()).collect();
    max(&abs)
}
