pub mod encode;

pub use encode::{encode_record, key_value, to_any_value};
