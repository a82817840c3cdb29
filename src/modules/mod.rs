pub mod attendance;
pub mod auth;
pub mod booking;
pub mod committee;
pub mod member_staff;
pub mod rating;
pub mod schedule;
pub mod staff;
