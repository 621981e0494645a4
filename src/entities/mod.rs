pub mod orders;
pub mod products;
pub mod waiter_calls;

pub use orders as order_entity;
pub use orders::{OrderStatus, PaymentStatus};
pub use products as product_entity;
pub use waiter_calls as waiter_call_entity;
pub use waiter_calls::WaiterCallStatus;
