mod assignment;
mod attendance;
mod booking;
mod member;
mod otp;
mod staff;
mod staff_rating;
mod time_slot;

pub use assignment::*;
pub use attendance::*;
pub use booking::*;
pub use member::*;
pub use otp::*;
pub use staff::*;
pub use staff_rating::*;
pub use time_slot::*;
