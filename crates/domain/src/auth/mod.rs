//! Authentication domain types

mod token;

pub use token::{
    ACCESS_TOKEN_KEY, PROFILE_KEY, REFRESH_TOKEN_KEY, Token, TokenGrant, token_preview,
};
