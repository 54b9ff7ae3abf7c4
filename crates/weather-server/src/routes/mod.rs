pub mod messages;
pub mod rest;
pub mod sse;
