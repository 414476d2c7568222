pub mod events;
pub mod place;
pub mod recommendation;
pub mod schedule;
pub mod search;
