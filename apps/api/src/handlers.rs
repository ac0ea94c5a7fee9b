pub mod activity_feeds;
pub mod employees;
pub mod health;
pub mod search;
pub mod users;
