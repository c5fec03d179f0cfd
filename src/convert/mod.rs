pub mod remote;
pub mod text;

pub use remote::RemoteConverter;
pub use text::TextConverter;
