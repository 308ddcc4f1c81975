pub mod attendance;
pub mod codec;
pub mod login_history;
pub mod products;
pub mod store;
pub mod tasks;
pub mod users;
