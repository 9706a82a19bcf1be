pub mod enums;
pub mod header;
pub mod info;
pub mod msg;
pub mod pdus;
