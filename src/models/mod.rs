//! Database model definitions

mod agency;
mod post;
mod review;
mod schedule;
mod travel_user;

pub use agency::*;
pub use post::*;
pub use review::*;
pub use schedule::*;
pub use travel_user::*;
