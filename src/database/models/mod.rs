pub mod group;
pub mod lottery;
pub mod lottery_log;
pub mod participant;
pub mod prize;
pub mod user;

pub use group::*;
pub use lottery::*;
#[allow(unused_imports)]
pub use lottery_log::*;
pub use participant::*;
pub use prize::*;
#[allow(unused_imports)]
pub use user::*;
