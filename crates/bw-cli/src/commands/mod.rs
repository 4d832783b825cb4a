pub mod init;
pub mod roll;
pub mod show;
