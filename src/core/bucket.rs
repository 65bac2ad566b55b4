use crate::domain::model::{BucketRange, BucketSize, PriceRatingBucket};
use crate::utils::error::{Result, WineError};
use crate::utils::validation::validate_positive_width;

impl BucketSize {
    pub fn new(price: f64, points: f64) -> Result<Self> {
        let size = Self { price, points };
        size.check()?;
        Ok(size)
    }

    pub fn check(&self) -> Result<()> {
        validate_positive_width("buckets.price", self.price)?;
        validate_positive_width("buckets.points", self.points)
    }
}

impl BucketRange {
    /// 把散佈圖上點擊的 (價格, 評分) 對應到所在的桶
    ///
    /// `price_min = floor(price / width) * width`，上界為下界加上桶寬。
    /// 同樣的輸入永遠得到同樣的桶，以桶的下界再算一次也會得到同一個桶。
    pub fn containing(price: f64, points: f64, size: BucketSize) -> Result<Self> {
        size.check()?;
        if !price.is_finite() || !points.is_finite() {
            return Err(WineError::validation(format!(
                "Cannot place ({}, {}) in a bucket",
                price, points
            )));
        }

        let (price_min, price_max) = floor_to(price, size.price);
        let (points_min, points_max) = floor_to(points, size.points);
        Ok(Self {
            price_min,
            price_max,
            points_min,
            points_max,
        })
    }

    pub fn contains(&self, price: f64, points: f64) -> bool {
        price >= self.price_min
            && price < self.price_max
            && points >= self.points_min
            && points < self.points_max
    }

    pub fn label(&self) -> String {
        format!(
            "${}–{} · {}–{} pts",
            self.price_min, self.price_max, self.points_min, self.points_max
        )
    }
}

impl From<&PriceRatingBucket> for BucketRange {
    fn from(bucket: &PriceRatingBucket) -> Self {
        Self {
            price_min: bucket.price_min,
            price_max: bucket.price_max,
            points_min: bucket.points_min,
            points_max: bucket.points_max,
        }
    }
}

/// 回傳 `(k * width, (k + 1) * width)`，保證 `k * width <= value < (k + 1) * width`
///
/// 小數桶寬（例如 0.1）的除法會有誤差，`floor` 之後再依兩個邊界修正 `k`。
fn floor_to(value: f64, width: f64) -> (f64, f64) {
    let mut k = (value / width).floor();
    if k * width > value {
        k -= 1.0;
    } else if (k + 1.0) * width <= value {
        k += 1.0;
    }
    (k * width, (k + 1.0) * width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_maps_to_decade_bucket() {
        let range = BucketRange::containing(23.4, 88.0, BucketSize::default()).unwrap();
        assert_eq!(range.price_min, 20.0);
        assert_eq!(range.price_max, 30.0);
        assert_eq!(range.points_min, 88.0);
        assert_eq!(range.points_max, 89.0);
    }

    #[test]
    fn test_bucket_is_idempotent() {
        let size = BucketSize::new(10.0, 1.0).unwrap();
        for (price, points) in [(23.4, 88.0), (9.99, 80.5), (150.0, 99.9), (0.0, 85.0)] {
            let first = BucketRange::containing(price, points, size).unwrap();
            let again = BucketRange::containing(price, points, size).unwrap();
            let from_lower = BucketRange::containing(first.price_min, first.points_min, size).unwrap();
            assert_eq!(first, again);
            assert_eq!(first, from_lower);
            assert!(first.contains(price, points));
        }
    }

    #[test]
    fn test_fractional_width_is_idempotent() {
        for width in [0.1, 0.3, 0.7] {
            let size = BucketSize::new(10.0, width).unwrap();
            for points in [4.3, 4.3018, 0.9, 2.1, 88.7, 91.0] {
                let first = BucketRange::containing(20.0, points, size).unwrap();
                assert!(
                    first.contains(20.0, points),
                    "{:?} should contain {} (width {})",
                    first,
                    points,
                    width
                );
                let from_lower =
                    BucketRange::containing(first.price_min, first.points_min, size).unwrap();
                assert_eq!(first, from_lower, "width {} point {}", width, points);
                assert!(first.contains(first.price_min, first.points_min));
            }
        }
    }

    #[test]
    fn test_upper_bound_is_exclusive() {
        let range = BucketRange::containing(30.0, 89.0, BucketSize::default()).unwrap();
        assert_eq!(range.price_min, 30.0);
        assert_eq!(range.points_min, 89.0);

        let lower = BucketRange::containing(29.99, 88.0, BucketSize::default()).unwrap();
        assert!(!lower.contains(30.0, 88.0));
        assert!(lower.contains(20.0, 88.0));
    }

    #[test]
    fn test_custom_bucket_size() {
        let size = BucketSize::new(25.0, 2.0).unwrap();
        let range = BucketRange::containing(61.0, 91.0, size).unwrap();
        assert_eq!((range.price_min, range.price_max), (50.0, 75.0));
        assert_eq!((range.points_min, range.points_max), (90.0, 92.0));
        assert_eq!(range.label(), "$50–75 · 90–92 pts");
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(BucketSize::new(0.0, 1.0).is_err());
        assert!(BucketSize::new(10.0, -1.0).is_err());
        assert!(BucketRange::containing(f64::NAN, 88.0, BucketSize::default()).is_err());
        assert!(BucketRange::containing(20.0, f64::INFINITY, BucketSize::default()).is_err());
    }
}
