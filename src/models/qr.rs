use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QrSize {
    Sm,
    #[default]
    Md,
    Lg,
}

impl QrSize {
    pub fn pixels(self) -> u32 {
        match self {
            QrSize::Sm => 128,
            QrSize::Md => 192,
            QrSize::Lg => 256,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QrCodeQuery {
    pub size: Option<QrSize>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BulkQrCodeQuery {
    pub start: u32,
    pub end: u32,
    pub size: Option<QrSize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TableQrCode {
    pub table_id: String,
    pub url: String,
    pub svg: String,
}
