mod client;
mod credential_pool;
