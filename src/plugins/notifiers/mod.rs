// Notification sink implementations
pub mod desktop;
pub mod discord;

pub use desktop::DesktopSink;
pub use discord::DiscordSink;
