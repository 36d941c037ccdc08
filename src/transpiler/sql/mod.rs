pub mod ansi;
pub mod oracle;
