use crate::domain::model::{BucketRange, HeatmapData, PriceRatingBucket};

/// 熱圖格子：`counts[y][x]`，x 為價格分類、y 為評分分類
#[derive(Debug, Clone)]
pub struct HeatmapGrid {
    data: HeatmapData,
    counts: Vec<Vec<u64>>,
}

impl HeatmapGrid {
    pub fn new(data: HeatmapData) -> Self {
        let width = data.x_categories.len();
        let height = data.y_categories.len();
        let mut counts = vec![vec![0u64; width]; height];

        for [x, y, count] in &data.data {
            let (x, y) = (*x as usize, *y as usize);
            if x < width && y < height {
                counts[y][x] = *count as u64;
            } else {
                tracing::warn!("Heatmap cell ({}, {}) outside {}x{} grid", x, y, width, height);
            }
        }

        Self { data, counts }
    }

    pub fn width(&self) -> usize {
        self.data.x_categories.len()
    }

    pub fn height(&self) -> usize {
        self.data.y_categories.len()
    }

    pub fn cell(&self, x: usize, y: usize) -> u64 {
        self.counts
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(0)
    }

    pub fn max_count(&self) -> u64 {
        self.data.max_count
    }

    pub fn total_wines(&self) -> u64 {
        self.data.total_wines
    }

    pub fn x_categories(&self) -> &[f64] {
        &self.data.x_categories
    }

    pub fn y_categories(&self) -> &[f64] {
        &self.data.y_categories
    }

    /// 先以 `"{x}_{y}"` 查 bucket_map，找不到時改用分類值落在哪個桶的邊界內
    pub fn bucket_for(&self, x: usize, y: usize) -> Option<&PriceRatingBucket> {
        if let Some(bucket) = self.data.bucket_map.get(&format!("{}_{}", x, y)) {
            return Some(bucket);
        }
        let price = *self.data.x_categories.get(x)?;
        let points = *self.data.y_categories.get(y)?;
        self.data
            .bucket_map
            .values()
            .find(|b| BucketRange::from(*b).contains(price, points))
    }

    /// 相對於最大值的強度等級 0..=4，0 表示空格
    pub fn intensity(&self, x: usize, y: usize) -> u8 {
        let count = self.cell(x, y);
        if count == 0 || self.data.max_count == 0 {
            return 0;
        }
        let ratio = count as f64 / self.data.max_count as f64;
        (ratio * 4.0).ceil().clamp(1.0, 4.0) as u8
    }
}
