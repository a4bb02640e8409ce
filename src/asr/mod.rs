pub mod interface;
pub mod client;
pub mod stub;
pub mod factory;

pub use interface::Transcriber;
pub use client::HttpTranscriber;
pub use stub::StubTranscriber;
pub use factory::ASRFactory;
