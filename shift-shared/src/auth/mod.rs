/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and the signup strength rule
/// - [`jwt`]: HS256 access/refresh tokens carrying the user id
/// - [`middleware`]: bearer-token authentication and the [`middleware::AuthContext`] extractor
///
/// Tokens identify the user only. The company a request acts on is resolved
/// per request from the store (see [`crate::tenancy`]), so creating a company
/// never requires re-issuing tokens.
///
/// # Example
///
/// ```no_run
/// use shift_shared::auth::jwt::{create_token, validate_access_token, Claims, TokenType};
/// use shift_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("opening-shift-7")?;
/// assert!(verify_password("opening-shift-7", &hash)?);
///
/// let secret = "a-secret-of-at-least-thirty-two-bytes";
/// let token = create_token(&Claims::new("user_1", "Ada", TokenType::Access), secret)?;
/// assert_eq!(validate_access_token(&token, secret)?.sub, "user_1");
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
