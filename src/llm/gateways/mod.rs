pub mod mistral;

pub use mistral::{MistralConfig, MistralGateway};
