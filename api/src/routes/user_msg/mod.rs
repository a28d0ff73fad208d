pub mod user_msg_request;
pub mod user_msg_response;
pub mod user_msg_route;
