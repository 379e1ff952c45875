mod health;
mod url;

pub use health::{api_info_handler, health_handler};
pub use url::{redirect_handler, shorten_handler};
