use crate::core::Storage;
use crate::utils::error::{Result, WineError};
use crate::utils::validation::{validate_non_empty_string, validate_path};
use serde::Serialize;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ExportFormat {
    Csv,
    Json,
    Zip,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Zip => "zip",
        }
    }
}

/// 將載入的酒款清單寫入儲存空間
pub struct Exporter<S: Storage> {
    storage: S,
}

impl<S: Storage> Exporter<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// 寫出 `{name}.{ext}`，回傳檔案位置
    pub async fn export<T: Serialize>(
        &self,
        name: &str,
        rows: &[T],
        format: ExportFormat,
    ) -> Result<String> {
        validate_non_empty_string("export.name", name)?;
        let file_name = format!("{}.{}", name, format.extension());
        validate_path("export.file", &file_name)?;
        tracing::debug!("Exporting {} rows to {}", rows.len(), file_name);

        let data = match format {
            ExportFormat::Csv => to_csv(rows)?,
            ExportFormat::Json => serde_json::to_vec_pretty(rows)?,
            ExportFormat::Zip => to_zip(name, rows)?,
        };

        self.storage.write_file(&file_name, &data).await?;
        let location = self.storage.location(&file_name);
        tracing::info!("💾 Exported {} wines to {}", rows.len(), location);
        Ok(location)
    }
}

fn to_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| WineError::IoError(e.into_error()))
}

fn to_zip<T: Serialize>(name: &str, rows: &[T]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    zip.start_file::<_, ()>(format!("{}.csv", name), FileOptions::default())?;
    zip.write_all(&to_csv(rows)?)?;

    zip.start_file::<_, ()>(format!("{}.json", name), FileOptions::default())?;
    zip.write_all(&serde_json::to_vec_pretty(rows)?)?;

    zip.start_file::<_, ()>("metadata.json", FileOptions::default())?;
    let metadata = serde_json::json!({
        "name": name,
        "rows": rows.len(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });
    zip.write_all(serde_json::to_string_pretty(&metadata)?.as_bytes())?;

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
