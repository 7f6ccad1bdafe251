mod auth;
mod friends;
mod leaderboard;
mod spots;
mod users;

pub use auth::*;
pub use friends::*;
pub use leaderboard::*;
pub use spots::*;
pub use users::*;
