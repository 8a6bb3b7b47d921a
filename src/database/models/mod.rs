pub mod activity;
pub mod user;

pub use activity::{Activity, ActivityPatch, ActivityRow, CreateActivity, NewActivity};
pub use user::User;
