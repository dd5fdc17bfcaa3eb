mod product;
mod sms;
mod status;

pub use product::*;
pub use sms::*;
pub use status::*;
