//! 各儀表板面板的文字輸出

use crate::core::heatmap::HeatmapGrid;
use crate::core::rag::{AnswerSource, RagOutcome};
use crate::core::search::PageInfo;
use crate::core::world_map::WorldMapModel;
use crate::domain::model::{
    BucketRange, FilterOptions, PriceRatingBucket, Wine, WineFilters, WineInBucket,
    WineListResponse, WineSearchResponse, WineSearchResult,
};
use std::fmt::Write;

const SCATTER_POINTS_MIN: f64 = 80.0;
const SCATTER_POINTS_MAX: f64 = 100.0;
const DENSITY_GLYPHS: [char; 5] = [' ', '.', ':', '*', '#'];

pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) if p.is_finite() => format!("${:.2}", p),
        _ => "—".to_string(),
    }
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().filter(|s| !s.is_empty()).unwrap_or("—")
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

pub fn load_more_hint(has_more: bool, shown: usize) -> String {
    if has_more {
        format!("Showing {} wines · more available (load more)", shown)
    } else {
        format!("Showing all {} wines", shown)
    }
}

pub fn world_map(model: &WorldMapModel) -> String {
    let mut out = String::from("Global Wine Ratings\n");
    if model.is_empty() {
        out.push_str("No data available\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<28} {:>7} {:>8} {:>10}  {:<22} {}",
        "Country", "Rating", "Wines", "Avg price", "Top variety", "Colour"
    );
    for item in model.ranked() {
        let marker = match model.selected() {
            Some(selected) if selected.name == item.name => "▶ ",
            _ => "",
        };
        let variety = item
            .top_variety()
            .map(|v| format!("{} ({:.0}%)", v.name, v.percentage))
            .unwrap_or_else(|| "—".to_string());
        let _ = writeln!(
            out,
            "{:<28} {:>7.2} {:>8} {:>10}  {:<22} {}",
            truncate(&format!("{}{}", marker, item.name), 28),
            item.value,
            item.wine_count,
            format_price(item.avg_price),
            truncate(&variety, 22),
            item.color().hex()
        );
    }
    out
}

fn search_rows(out: &mut String, wines: &[WineSearchResult]) {
    let _ = writeln!(
        out,
        "{:>8}  {:<44} {:>6} {:>9}  {:<14} {}",
        "ID", "Title", "Points", "Price", "Country", "Variety"
    );
    for wine in wines {
        let points = if wine.points > 0 {
            wine.points.to_string()
        } else {
            "—".to_string()
        };
        let _ = writeln!(
            out,
            "{:>8}  {:<44} {:>6} {:>9}  {:<14} {}",
            wine.id,
            truncate(&wine.title, 44),
            points,
            format_price(wine.price),
            truncate(text(&wine.country), 14),
            text(&wine.variety)
        );
    }
}

pub fn country_wines(country: &str, wines: &[WineSearchResult], has_more: bool) -> String {
    let mut out = format!("Wines from {}\n", country);
    if wines.is_empty() {
        out.push_str("No wines found\n");
        return out;
    }
    search_rows(&mut out, wines);
    out.push_str(&load_more_hint(has_more, wines.len()));
    out.push('\n');
    out
}

pub fn search_results(
    response: &WineSearchResponse,
    filters: &WineFilters,
    page: PageInfo,
) -> String {
    let mut out = format!("Found {} wines\n", response.total);
    if response.items.is_empty() {
        out.push_str("No wines match your search\n");
    } else {
        search_rows(&mut out, &response.items);
    }
    if page.visible() {
        let _ = writeln!(
            out,
            "{}Page {} of {}{}",
            if page.has_previous() { "← " } else { "" },
            page.current,
            page.total_pages,
            if page.has_next() { " →" } else { "" }
        );
    }
    let query = filters.to_query_string();
    if !query.is_empty() {
        let _ = writeln!(out, "Filters: ?{}", query);
    }
    out
}

pub fn wine_list(response: &WineListResponse) -> String {
    let mut out = format!(
        "{} wines (page {}, {} per page)\n",
        response.total, response.page, response.limit
    );
    let rows: Vec<WineSearchResult> = response
        .wines
        .iter()
        .map(|w| WineSearchResult {
            id: w.id,
            title: w.title.clone(),
            price: w.price,
            points: w.points,
            country: w.country.clone(),
            variety: w.variety.clone(),
            winery: w.winery.clone(),
        })
        .collect();
    search_rows(&mut out, &rows);
    out
}

pub fn bucket_wines(range: &BucketRange, wines: &[WineInBucket], has_more: bool) -> String {
    let mut out = format!("Wines in {}\n", range.label());
    if wines.is_empty() {
        out.push_str("No wines in this bucket\n");
        return out;
    }
    let _ = writeln!(
        out,
        "{:>8}  {:<40} {:<24} {:>9} {:>6}",
        "ID", "Name", "Winery", "Price", "Points"
    );
    for wine in wines {
        let _ = writeln!(
            out,
            "{:>8}  {:<40} {:<24} {:>9} {:>6}",
            wine.id,
            truncate(&wine.name, 40),
            truncate(&wine.winery, 24),
            format_price(Some(wine.price)),
            wine.points
        );
    }
    out.push_str(&load_more_hint(has_more, wines.len()));
    out.push('\n');
    out
}

/// 以字元密度畫出價格（x）對評分（y）的聚合桶
pub fn scatter_plot(
    buckets: &[PriceRatingBucket],
    max_price: f64,
    width: usize,
    height: usize,
) -> String {
    let mut out = String::from("Wine Price vs Rating\n");
    if buckets.is_empty() {
        out.push_str("No data available\n");
        return out;
    }
    let width = width.max(10);
    let height = height.max(5);
    let max_price = if max_price > 0.0 { max_price } else { 200.0 };

    let mut cells = vec![vec![0u64; width]; height];
    let mut hidden = 0usize;
    for bucket in buckets {
        let price = (bucket.price_min + bucket.price_max) / 2.0;
        let points = (bucket.points_min + bucket.points_max) / 2.0;
        if price > max_price || !(SCATTER_POINTS_MIN..=SCATTER_POINTS_MAX).contains(&points) {
            hidden += 1;
            continue;
        }
        let x = ((price / max_price) * (width - 1) as f64).round() as usize;
        let y = (((points - SCATTER_POINTS_MIN) / (SCATTER_POINTS_MAX - SCATTER_POINTS_MIN))
            * (height - 1) as f64)
            .round() as usize;
        cells[height - 1 - y.min(height - 1)][x.min(width - 1)] += bucket.count;
    }

    let max_cell = cells.iter().flatten().copied().max().unwrap_or(0);
    for (row_index, row) in cells.iter().enumerate() {
        let points = SCATTER_POINTS_MAX
            - (row_index as f64 / (height - 1) as f64) * (SCATTER_POINTS_MAX - SCATTER_POINTS_MIN);
        let line: String = row.iter().map(|count| density_glyph(*count, max_cell)).collect();
        let _ = writeln!(out, "{:>5.0} |{}", points, line);
    }
    let _ = writeln!(out, "      +{}", "-".repeat(width));
    let _ = writeln!(
        out,
        "       $0{:>width$}",
        format!("${:.0}", max_price),
        width = width - 2
    );
    let total: u64 = buckets.iter().map(|b| b.count).sum();
    let _ = writeln!(out, "{} buckets, {} wines", buckets.len(), total);
    if hidden > 0 {
        let _ = writeln!(out, "{} buckets outside the plotted range", hidden);
    }
    out
}

fn density_glyph(count: u64, max: u64) -> char {
    if count == 0 || max == 0 {
        return DENSITY_GLYPHS[0];
    }
    let level = ((count as f64 / max as f64) * 4.0).ceil().clamp(1.0, 4.0) as usize;
    DENSITY_GLYPHS[level]
}

pub fn heatmap(grid: &HeatmapGrid) -> String {
    let mut out = String::from("Price vs Rating heatmap\n");
    if grid.width() == 0 || grid.height() == 0 {
        out.push_str("No data available\n");
        return out;
    }

    for y in (0..grid.height()).rev() {
        let label = grid.y_categories()[y];
        let line: String = (0..grid.width())
            .map(|x| DENSITY_GLYPHS[grid.intensity(x, y) as usize])
            .collect();
        let _ = writeln!(out, "{:>5} |{}", label, line);
    }
    let _ = writeln!(out, "      +{}", "-".repeat(grid.width()));
    if let (Some(first), Some(last)) = (grid.x_categories().first(), grid.x_categories().last()) {
        let _ = writeln!(out, "       ${} … ${}", first, last);
    }
    let _ = writeln!(
        out,
        "{} wines, densest cell {} wines",
        grid.total_wines(),
        grid.max_count()
    );

    let densest = (0..grid.height())
        .flat_map(|y| (0..grid.width()).map(move |x| (x, y)))
        .filter(|&(x, y)| grid.cell(x, y) > 0)
        .max_by_key(|&(x, y)| grid.cell(x, y));
    if let Some(bucket) = densest.and_then(|(x, y)| grid.bucket_for(x, y)) {
        let _ = writeln!(out, "Densest bucket: {}", BucketRange::from(bucket).label());
        for example in bucket.examples.iter().take(3) {
            let _ = writeln!(
                out,
                "  {} · {} · {} pts",
                example.name,
                format_price(Some(example.price)),
                example.points
            );
        }
    }
    out
}

pub fn rag_answer(outcome: &RagOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Q: {}", outcome.query);
    if outcome.source == AnswerSource::Cache {
        out.push_str("(cached answer)\n");
    }
    let _ = writeln!(out, "\n{}\n", outcome.answer.answer.trim());
    if outcome.answer.sources.is_empty() {
        return out;
    }
    out.push_str("Sources:\n");
    for (source, wine) in outcome.answer.sources.iter().zip(outcome.source_wines()) {
        let _ = writeln!(
            out,
            "  [{}] {} · {} · {}",
            wine.id,
            wine.title,
            text(&wine.country),
            text(&wine.variety)
        );
        if let Some(description) = source.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "      {}", truncate(description, 100));
        }
    }
    out
}

pub fn wine_detail(wine: &Wine) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", wine.title);
    let _ = writeln!(out, "{}", "=".repeat(wine.title.chars().count().min(80)));
    let _ = writeln!(out, "Rating:      {} points", wine.points);
    let _ = writeln!(out, "Price:       {}", format_price(wine.price));
    let _ = writeln!(out, "Winery:      {}", text(&wine.winery));
    let _ = writeln!(out, "Variety:     {}", text(&wine.variety));
    let _ = writeln!(out, "Designation: {}", text(&wine.designation));

    let region: Vec<&str> = [&wine.region_1, &wine.region_2, &wine.province, &wine.country]
        .into_iter()
        .filter_map(|v| v.as_deref().filter(|s| !s.is_empty()))
        .collect();
    let _ = writeln!(
        out,
        "Origin:      {}",
        if region.is_empty() {
            "—".to_string()
        } else {
            region.join(", ")
        }
    );

    if let Some(taster) = wine.taster_name.as_deref().filter(|s| !s.is_empty()) {
        match wine.taster_twitter_handle.as_deref().filter(|s| !s.is_empty()) {
            Some(handle) => {
                let _ = writeln!(out, "Taster:      {} ({})", taster, handle);
            }
            None => {
                let _ = writeln!(out, "Taster:      {}", taster);
            }
        }
    }
    if !wine.description.is_empty() {
        let _ = writeln!(out, "\n{}", wine.description.trim());
    }
    out
}

pub fn filter_lists(countries: &[String], varieties: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Countries ({}):", countries.len());
    let _ = writeln!(out, "  {}", countries.join(", "));
    let _ = writeln!(out, "Varieties ({}):", varieties.len());
    let _ = writeln!(out, "  {}", varieties.join(", "));
    out
}

pub fn filter_options(options: &FilterOptions) -> String {
    let mut out = String::new();
    for (label, values) in [
        ("Types", &options.types),
        ("Styles", &options.styles),
        ("Grapes", &options.grapes),
        ("Regions", &options.regions),
    ] {
        if !values.is_empty() {
            let _ = writeln!(out, "{} ({}): {}", label, values.len(), values.join(", "));
        }
    }
    if let Some(range) = options.price_range {
        let _ = writeln!(
            out,
            "Price range: {} – {}",
            format_price(Some(range.min)),
            format_price(Some(range.max))
        );
    }
    if let Some(range) = options.abv_range {
        let _ = writeln!(out, "ABV range:   {}% – {}%", range.min, range.max);
    }
    out
}
