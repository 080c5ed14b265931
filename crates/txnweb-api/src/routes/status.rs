//! Liveness endpoints

use crate::reply::Reply;

pub const HELLO_MESSAGE: &str = "Hello, World!";
pub const RUNNING_MESSAGE: &str = "Service is running!";

pub async fn api_hello() -> Reply<&'static str> {
    Reply::success(HELLO_MESSAGE)
}

pub async fn api_status() -> Reply<&'static str> {
    Reply::success(RUNNING_MESSAGE)
}
