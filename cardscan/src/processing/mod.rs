pub mod intake;
mod normalizer;
mod vcard;

pub use normalizer::normalize;
pub use vcard::VCardDocument;
