pub mod confidence;

pub use confidence::Confidence;
