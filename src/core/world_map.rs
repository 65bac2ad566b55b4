use crate::domain::model::{CountryStats, CountryStatsResponse, VarietyInfo};

pub const RATING_SCALE_MIN: f64 = 80.0;
pub const RATING_SCALE_MAX: f64 = 95.0;
const LOW_COLOR: Rgb = Rgb(0xf2, 0xda, 0x87);
const HIGH_COLOR: Rgb = Rgb(0xcc, 0x40, 0x25);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// 平均評分對應的地圖顏色，超出 80–95 的值夾在兩端
pub fn rating_color(avg_points: f64) -> Rgb {
    let t = ((avg_points - RATING_SCALE_MIN) / (RATING_SCALE_MAX - RATING_SCALE_MIN)).clamp(0.0, 1.0);
    let t = if t.is_nan() { 0.0 } else { t };
    let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
    Rgb(
        mix(LOW_COLOR.0, HIGH_COLOR.0),
        mix(LOW_COLOR.1, HIGH_COLOR.1),
        mix(LOW_COLOR.2, HIGH_COLOR.2),
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapDataItem {
    pub name: String,
    /// 平均評分
    pub value: f64,
    pub wine_count: u64,
    pub avg_price: Option<f64>,
    pub varieties: Vec<VarietyInfo>,
    pub original_name: String,
}

impl From<&CountryStats> for MapDataItem {
    fn from(stats: &CountryStats) -> Self {
        Self {
            name: stats.country.clone(),
            value: stats.avg_points,
            wine_count: stats.count,
            avg_price: stats.avg_price,
            varieties: stats.top_varieties.clone(),
            original_name: stats
                .original_country
                .clone()
                .unwrap_or_else(|| stats.country.clone()),
        }
    }
}

impl MapDataItem {
    pub fn color(&self) -> Rgb {
        rating_color(self.value)
    }

    pub fn top_variety(&self) -> Option<&VarietyInfo> {
        self.varieties.first()
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorldMapModel {
    items: Vec<MapDataItem>,
    selected: Option<usize>,
}

impl WorldMapModel {
    pub fn from_stats(response: &CountryStatsResponse) -> Self {
        Self {
            items: response.items.iter().map(MapDataItem::from).collect(),
            selected: None,
        }
    }

    /// 依顯示名稱或後端原始國名選取（不分大小寫），回傳查詢酒款時要用的國名
    pub fn select(&mut self, name: &str) -> Option<&str> {
        let needle = name.trim();
        let index = self.items.iter().position(|item| {
            item.name.eq_ignore_ascii_case(needle) || item.original_name.eq_ignore_ascii_case(needle)
        })?;
        self.selected = Some(index);
        Some(self.items[index].original_name.as_str())
    }

    pub fn selected(&self) -> Option<&MapDataItem> {
        self.selected.map(|i| &self.items[i])
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// 依平均評分由高到低排序
    pub fn ranked(&self) -> Vec<&MapDataItem> {
        let mut items: Vec<&MapDataItem> = self.items.iter().collect();
        items.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
        items
    }

    pub fn items(&self) -> &[MapDataItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
