use serde::Serialize;

/// Minutes saved by driving straight to the building front.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Improvement {
    pub as_is_total: f64,
    pub to_be_total: f64,

    /// Negative when the direct plan is slower.
    pub improvement_minutes: f64,
    pub improvement_pct: f64,

    /// Indices of legs without a duration. They count as zero in the totals.
    pub missing_as_is: Vec<usize>,
    pub missing_to_be: Vec<usize>,
}

impl Improvement {
    pub fn is_complete(&self) -> bool {
        self.missing_as_is.is_empty() && self.missing_to_be.is_empty()
    }
}

fn total(legs: &[Option<f64>]) -> (f64, Vec<usize>) {
    let mut sum = 0.0;
    let mut missing = Vec::new();

    for (index, leg) in legs.iter().enumerate() {
        match leg {
            Some(minutes) => sum += minutes,
            None => missing.push(index),
        }
    }

    (sum, missing)
}

pub fn compute_improvement(as_is: &[Option<f64>], to_be: &[Option<f64>]) -> Improvement {
    let (as_is_total, missing_as_is) = total(as_is);
    let (to_be_total, missing_to_be) = total(to_be);

    let improvement_minutes = as_is_total - to_be_total;
    let improvement_pct = if as_is_total > 0.0 {
        improvement_minutes / as_is_total * 100.0
    } else {
        0.0
    };

    Improvement {
        as_is_total,
        to_be_total,
        improvement_minutes,
        improvement_pct,
        missing_as_is,
        missing_to_be,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_gate_walk_versus_direct() {
        let improvement = compute_improvement(&[Some(12.4), Some(3.1)], &[Some(13.2)]);

        assert!(close(improvement.as_is_total, 15.5));
        assert!(close(improvement.to_be_total, 13.2));
        assert!(close(improvement.improvement_minutes, 2.3));
        assert!((improvement.improvement_pct - 14.84).abs() < 0.01);
        assert!(improvement.is_complete());
    }

    #[test]
    fn test_negative_improvement_is_kept() {
        let improvement = compute_improvement(&[Some(10.0)], &[Some(12.5)]);

        assert!(close(improvement.improvement_minutes, -2.5));
        assert!(close(improvement.improvement_pct, -25.0));
    }

    #[test]
    fn test_zero_as_is_total() {
        let improvement = compute_improvement(&[Some(0.0)], &[Some(4.0)]);
        assert_eq!(improvement.improvement_pct, 0.0);

        let improvement = compute_improvement(&[None, None], &[None]);
        assert_eq!(improvement.as_is_total, 0.0);
        assert_eq!(improvement.improvement_minutes, 0.0);
        assert_eq!(improvement.improvement_pct, 0.0);
        assert!(!improvement.improvement_pct.is_nan());
    }

    #[test]
    fn test_missing_legs_are_listed() {
        let improvement = compute_improvement(&[Some(12.4), None], &[None]);

        assert!(close(improvement.as_is_total, 12.4));
        assert_eq!(improvement.to_be_total, 0.0);
        assert_eq!(improvement.missing_as_is, vec![1]);
        assert_eq!(improvement.missing_to_be, vec![0]);
        assert!(!improvement.is_complete());
    }
}
