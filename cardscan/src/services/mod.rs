mod card;

pub use card::{CardService, ProcessedCard, Stage};
