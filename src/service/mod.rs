//! Business-level operations over the repositories and the remote API client.

mod players;
mod users;

pub use players::PlayerService;
pub use users::UserService;
