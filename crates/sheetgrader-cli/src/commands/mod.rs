pub mod init;
pub mod reorder;
pub mod score;
pub mod validate;
