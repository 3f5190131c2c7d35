pub mod profiles;
pub mod saves;
pub mod serve;
pub mod status;
pub mod switch;
