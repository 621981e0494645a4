pub mod analytics;
pub mod common;
pub mod live;
pub mod order;
pub mod product;
pub mod qr;
pub mod table;
pub mod waiter_call;

pub use analytics::*;
pub use common::*;
pub use live::*;
pub use order::*;
pub use product::*;
pub use qr::*;
pub use table::*;
pub use waiter_call::*;
