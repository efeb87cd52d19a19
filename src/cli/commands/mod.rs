pub mod extract;
pub mod format;
pub mod helper;
pub mod init;
pub mod parse;
