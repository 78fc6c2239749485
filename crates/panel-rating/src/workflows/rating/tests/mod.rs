mod auth;
mod common;
mod gateway;
