use std::ops::Range;

/// A histogram bin covering `[start, end)`, or `[start, end]` for the last bin
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Count `values` into `bin_count` equal width bins spanning the range of the data
///
/// If every value is equal the range is widened by half a unit either side so the bins have
/// non-zero width. Non-finite values are ignored. Returns no bins when there is nothing to count.
pub fn histogram(values: &[f64], bin_count: usize) -> Vec<HistogramBin> {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let Some((min, max)) = finite.clone().fold(None, |bounds, v| match bounds {
        None => Some((v, v)),
        Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
    }) else {
        return Vec::new();
    };
    if bin_count == 0 {
        return Vec::new();
    }

    let (start, end) = if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let width = (end - start) / bin_count as f64;

    let mut bins = (0..bin_count)
        .map(|i| HistogramBin {
            start: start + width * i as f64,
            end: if i + 1 == bin_count {
                end
            } else {
                start + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect::<Vec<_>>();

    for value in finite {
        let index = (((value - start) / width) as usize).min(bin_count - 1);
        bins[index].count += 1;
    }

    bins
}

/// The x range covered by the bins and the largest bin count
pub fn histogram_bounds(bins: &[HistogramBin]) -> Option<(Range<f64>, usize)> {
    let first = bins.first()?;
    let last = bins.last()?;
    let max_count = bins.iter().map(|bin| bin.count).max()?;

    Some((first.start..last.end, max_count))
}
