use crate::sdk::geo::Coordinate;
use std::num::NonZeroUsize;

pub const DEFAULT_SAMPLE_STRIDE: NonZeroUsize = match NonZeroUsize::new(40) {
    Some(stride) => stride,
    None => unreachable!(),
};

/// Every `stride`-th point of the route, starting with the first one.
pub fn sample(geometry: &[Coordinate], stride: NonZeroUsize) -> Vec<Coordinate> {
    geometry.iter().step_by(stride.get()).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Vec<Coordinate> {
        (0..n)
            .map(|i| Coordinate::new(35.0 + i as f64 * 1e-5, 139.0).unwrap())
            .collect()
    }

    fn stride(k: usize) -> NonZeroUsize {
        NonZeroUsize::new(k).unwrap()
    }

    #[test]
    fn sample_size_is_ceil_of_length_over_stride() {
        for n in 1..=130 {
            let geometry = line(n);
            for k in [1, 2, 3, 7, 30, 40, 200] {
                let sampled = sample(&geometry, stride(k));
                assert_eq!(sampled.len(), n.div_ceil(k), "n={n} k={k}");
                assert_eq!(sampled[0], geometry[0]);
            }
        }
    }

    #[test]
    fn keeps_original_order_and_positions() {
        let geometry = line(95);
        let sampled = sample(&geometry, stride(30));
        assert_eq!(
            sampled,
            vec![geometry[0], geometry[30], geometry[60], geometry[90]]
        );
    }

    #[test]
    fn does_not_deduplicate() {
        let p = Coordinate::new(35.0, 139.0).unwrap();
        assert_eq!(sample(&[p, p, p, p], stride(2)), vec![p, p]);
    }

    #[test]
    fn empty_geometry_gives_empty_sample() {
        assert!(sample(&[], DEFAULT_SAMPLE_STRIDE).is_empty());
    }
}
