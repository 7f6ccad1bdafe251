pub mod auth;
pub mod friends;
pub mod leaderboard;
pub mod spots;
pub mod users;
