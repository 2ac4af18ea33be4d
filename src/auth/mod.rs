pub mod jwt;
pub mod session;

pub use jwt::{create_token, JwtSessionResolver, SessionClaims};
pub use session::{DynSessionResolver, Role, Session, SessionResolver, SessionUser};
