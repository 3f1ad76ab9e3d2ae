//! Running statistics over temperature values.

use std::ops::AddAssign;

use serde_derive::*;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Stats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
}

impl Default for Stats {
    fn default() -> Self {
        Stats {
            count: 0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            sum: 0.,
        }
    }
}

impl Stats {
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

impl AddAssign<f64> for Stats {
    fn add_assign(&mut self, val: f64) {
        self.count += 1;
        self.sum += val;
        self.min = self.min.min(val);
        self.max = self.max.max(val);
    }
}

impl AddAssign<&Stats> for Stats {
    fn add_assign(&mut self, other: &Stats) {
        self.count += other.count;
        self.sum += other.sum;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }
}

#[cfg(test)]
mod tests {
    use super::Stats;

    #[test]
    fn accumulates() {
        let mut a = Stats::default();
        assert_eq!(a.mean(), None);
        for v in &[21.5, 30., 18.5] {
            a += *v;
        }
        assert_eq!(a.count, 3);
        assert_eq!(a.min, 18.5);
        assert_eq!(a.max, 30.);
        assert_eq!(a.mean(), Some(70. / 3.));
        assert_eq!(Stats::default().min, f64::INFINITY);

        let mut b = Stats::default();
        b += -4.;
        b += &a;
        assert_eq!(b.count, 4);
        assert_eq!(b.min, -4.);
        assert_eq!(b.max, 30.);
    }
}
