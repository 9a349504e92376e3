pub mod home;
pub mod result;

pub use home::home_page;
pub use result::result_page;
