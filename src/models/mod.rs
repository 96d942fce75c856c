pub mod activity;
pub mod report;
pub mod settings;
pub mod stats;
pub mod user;

pub use activity::*;
pub use report::*;
pub use settings::*;
pub use stats::*;
pub use user::*;
