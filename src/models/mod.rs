mod error;
pub use error::*;

mod address;
pub use address::*;

mod signing_key;
pub use signing_key::*;

mod secret_string;
pub use secret_string::*;
