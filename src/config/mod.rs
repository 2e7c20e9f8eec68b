pub mod fixture;
pub mod settings;
pub mod validator;

pub use fixture::*;
pub use settings::*;
pub use validator::*;
