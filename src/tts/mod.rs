pub mod interface;
pub mod client;
pub mod stub;
pub mod factory;

pub use interface::Synthesizer;
pub use client::HttpSynthesizer;
pub use stub::SilentSynthesizer;
pub use factory::TTSFactory;
