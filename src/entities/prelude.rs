pub use super::bots::Entity as Bots;
pub use super::libraries::Entity as Libraries;
pub use super::tags::Entity as Tags;
pub use super::uptime::Entity as Uptime;
pub use super::users::Entity as Users;
