pub mod sink;

pub use sink::{NotificationSink, SinkError, SinkReceipt, StockAlert};
