pub mod user_msg;
