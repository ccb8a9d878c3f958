use num::Float;

/// Piecewise-linear interpolation through `(xp, fp)` pairs sorted by `xp`,
/// holding the end values outside the sampled range. Similar to numpy.interp.
pub(crate) fn interp<F: Float>(x: F, xp: &[F], fp: &[F]) -> F {
    debug_assert_eq!(xp.len(), fp.len());

    let (Some(&first_x), Some(&last_x)) = (xp.first(), xp.last()) else {
        return F::zero();
    };

    if x <= first_x {
        return fp[0];
    }
    if x >= last_x {
        return fp[fp.len() - 1];
    }

    // First index whose x is strictly greater than the query
    let hi = xp.partition_point(|&p| p <= x);
    let lo = hi - 1;
    let (x1, x2) = (xp[lo], xp[hi]);
    let (y1, y2) = (fp[lo], fp[hi]);

    if x2 == x1 {
        return y2;
    }

    y1 + (x - x1) * (y2 - y1) / (x2 - x1)
}

/// Merges `extra` points into an already sorted sample vector, dropping
/// anything outside `[min, max]` and duplicates.
pub(crate) fn merge_points(samples: &mut Vec<f64>, extra: impl IntoIterator<Item = f64>, min: f64, max: f64) {
    samples.extend(extra.into_iter().filter(|p| p.is_finite() && *p >= min && *p <= max));
    samples.sort_unstable_by(f64::total_cmp);
    samples.dedup();
}

#[test]
fn test_interp() {
    let xs = [1., 2., 3.];
    let ys = [3., 2., 0.];
    let got: Vec<f64> = [0., 1., 1.5, 2.72, 3.24]
        .into_iter()
        .map(|x| interp(x, &xs, &ys))
        .collect();

    assert_eq!(got, vec![3., 3., 2.5, 0.5599999999999996, 0.]);

    let xs = [0., 1., 2., 3., 4.5];
    let ys = [0., 2., 5., 3., 2.];
    let got: Vec<f64> = [2.5, -1., 7.5].into_iter().map(|x| interp(x, &xs, &ys)).collect();

    assert_eq!(got, vec![4., 0., 2.]);
}

#[test]
fn test_merge_points() {
    let mut samples = vec![0., 1., 2.];

    merge_points(&mut samples, [1.5, 2., -1., 9., f64::NAN], 0., 2.);

    assert_eq!(samples, vec![0., 1., 1.5, 2.]);
}
