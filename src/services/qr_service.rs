use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::validate_table_id;
use qrcode::QrCode;
use qrcode::render::svg;
use regex::Regex;
use std::sync::LazyLock;

pub const MAX_BULK_TABLES: u32 = 100;

static SVG_OUTER_SIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"width="\d+" height="\d+""#).expect("valid svg size pattern"));

/// Pins the outer `width`/`height` of a rendered code to `px`.
/// The `viewBox` is left alone, so the modules scale to fit.
fn with_outer_size(svg: &str, px: u32) -> String {
    SVG_OUTER_SIZE
        .replacen(svg, 1, format!(r#"width="{px}" height="{px}""#).as_str())
        .into_owned()
}

#[derive(Clone)]
pub struct QrService {
    base_url: String,
}

impl QrService {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Public URL a customer lands on after scanning the table's code.
    pub fn table_url(&self, table_id: &str) -> String {
        format!("{}/table/{}", self.base_url, table_id)
    }

    pub fn render_svg(&self, table_id: &str, size: QrSize) -> AppResult<TableQrCode> {
        let table_id = validate_table_id(table_id)?;
        let url = self.table_url(&table_id);
        let code = QrCode::new(url.as_bytes())?;
        let px = size.pixels();
        let rendered = code
            .render::<svg::Color>()
            .min_dimensions(px, px)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#ffffff"))
            .build();
        Ok(TableQrCode {
            table_id,
            url,
            svg: with_outer_size(&rendered, px),
        })
    }

    /// Codes for tables `start..=end`, used for printing a batch.
    pub fn bulk(&self, start: u32, end: u32, size: QrSize) -> AppResult<Vec<TableQrCode>> {
        if start == 0 || start > end {
            return Err(AppError::ValidationError(format!(
                "Invalid table range {start}-{end}"
            )));
        }
        if end - start + 1 > MAX_BULK_TABLES {
            return Err(AppError::ValidationError(format!(
                "At most {MAX_BULK_TABLES} tables per batch"
            )));
        }
        (start..=end)
            .map(|n| self.render_svg(&n.to_string(), size))
            .collect()
    }
}
