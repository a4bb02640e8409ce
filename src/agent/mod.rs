pub mod interface;
pub mod openai_compatible;
pub mod stub;
pub mod factory;

pub use interface::Responder;
pub use openai_compatible::OpenAICompatibleResponder;
pub use stub::EchoResponder;
pub use factory::ResponderFactory;
