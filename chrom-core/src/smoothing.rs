use crate::{
    point::{centroid, Point3},
    FeatureError,
};

/// Default sliding window
pub const DEFAULT_WINDOW: usize = 50;

/// Sliding window mean over the bead sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathSmoother {
    window: usize,
}

impl Default for PathSmoother {
    fn default() -> Self {
        PathSmoother {
            window: DEFAULT_WINDOW,
        }
    }
}

impl PathSmoother {
    pub fn new(window: usize) -> Result<Self, FeatureError> {
        if window == 0 {
            return Err(FeatureError::InvalidWindow);
        }
        Ok(PathSmoother { window })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Means of `window` consecutive beads, starting at every index below `len - window`.
    ///
    /// The last window start is not visited, so the path has `len - window` points and is
    /// empty once the window reaches the chain length.
    pub fn smooth(&self, beads: &[Point3]) -> Vec<Point3> {
        let n = beads.len().saturating_sub(self.window);
        beads
            .windows(self.window)
            .take(n)
            .filter_map(centroid::<Point3>)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Vec<Point3> {
        (0..n).map(|i| Point3::from([i as f64, 0., 0.])).collect()
    }

    #[test]
    fn length() {
        let smoother = PathSmoother::new(50).unwrap();
        assert_eq!(smoother.smooth(&line(120)).len(), 70);
        assert_eq!(smoother.smooth(&line(51)).len(), 1);
        assert!(smoother.smooth(&line(50)).is_empty());
        assert!(smoother.smooth(&line(10)).is_empty());
    }

    #[test]
    fn means() {
        let smoother = PathSmoother::new(3).unwrap();
        let path = smoother.smooth(&line(6));

        assert_eq!(
            path,
            vec![
                Point3::from([1., 0., 0.]),
                Point3::from([2., 0., 0.]),
                Point3::from([3., 0., 0.]),
            ]
        );
    }

    #[test]
    fn zero_window() {
        assert!(matches!(
            PathSmoother::new(0),
            Err(FeatureError::InvalidWindow)
        ));
    }
}
