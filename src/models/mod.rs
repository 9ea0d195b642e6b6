pub mod message;

pub use message::{ conversation_key, Message };
