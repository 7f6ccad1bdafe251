mod friendship;
mod spot;
mod user;

pub use friendship::*;
pub use spot::*;
pub use user::*;
