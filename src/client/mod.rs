pub mod api;

pub use api::{TwitterOAuthClient, UserProfile};
