mod context;
mod token;

pub use context::{AuthContext, MemberContext};
pub use token::{decode_token, issue_token, Claims, TokenRequest};
