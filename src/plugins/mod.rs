pub mod dispatcher;
pub mod notifiers;
pub mod traits;

pub use dispatcher::NotificationDispatcher;
pub use traits::{NotificationSink, SinkReceipt, StockAlert};
