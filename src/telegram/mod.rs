mod enforcement;
mod handler;
mod monitor;
mod types;
mod utils;

pub use handler::TelegramService;
