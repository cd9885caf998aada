pub mod input_handler;
pub mod input_state;
