pub mod msg_type;
