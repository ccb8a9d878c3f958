/// Evenly spaced samples over a closed interval, computed the way
/// `numpy.linspace` does so the last sample lands on `max`.
pub struct Linspace {
    start: f64,
    end: f64,
    step: f64,
    index: usize,
    len: usize,
}

impl Linspace {
    pub fn new(min: f64, max: f64, n: usize) -> Self {
        let step = if n > 1 {
            let num_steps = (n - 1) as f64;
            (max - min) / num_steps
        } else {
            0.
        };
        Linspace {
            start: min,
            end: max,
            step,
            index: 0,
            len: n,
        }
    }

    /// Number of samples needed to cover `min..=max` at `step`.
    pub fn sample_count(min: f64, max: f64, step: f64) -> usize {
        // floor is closest approx to what python does for int() conversion
        ((max - min) / step).floor() as usize + 1
    }
}

impl Iterator for Linspace {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<f64> {
        if self.index >= self.len {
            None
        } else {
            let i = self.index;
            self.index += 1;

            if i + 1 == self.len && self.len > 1 {
                return Some(self.end);
            }

            Some(self.start + self.step * i as f64)
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Linspace {}

#[test]
fn test_linspace_endpoints() {
    let samples: Vec<_> = Linspace::new(0., 10., 401).collect();

    assert_eq!(samples.len(), 401);
    assert_eq!(samples[0], 0.);
    assert_eq!(samples[200], 5.);
    assert_eq!(samples[400], 10.);
}

#[test]
fn test_linspace_single_sample() {
    assert_eq!(Linspace::new(3., 3., 1).collect::<Vec<_>>(), vec![3.]);
    assert_eq!(Linspace::new(0., 1., 0).count(), 0);
}

#[test]
fn test_sample_count() {
    assert_eq!(Linspace::sample_count(0., 10., 0.1), 101);
    assert_eq!(Linspace::sample_count(0., 20., 0.05), 401);
}
