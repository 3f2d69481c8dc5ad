mod address;
pub use address::*;

mod key;
pub use key::*;

mod resource;
pub use resource::*;
