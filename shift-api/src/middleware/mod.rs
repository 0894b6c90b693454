/// Custom tower middleware

pub mod security;
