pub mod money;
pub mod table_id;

pub use money::{average_cents, format_usd};
pub use table_id::validate_table_id;
