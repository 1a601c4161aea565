mod health_check;
mod user;

pub use health_check::health_check;
pub use user::create_user;
pub use user::get_salary;
pub use user::login;
