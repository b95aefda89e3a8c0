pub mod card;
pub mod health;

pub use card::process_card;
pub use health::health_check;
