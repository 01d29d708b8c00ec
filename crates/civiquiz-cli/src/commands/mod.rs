pub mod categories;
pub mod chat;
pub mod init;
pub mod play;
pub mod sort;
pub mod validate;
