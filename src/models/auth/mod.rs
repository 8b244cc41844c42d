pub mod requests;
pub mod responses;

pub use requests::{LoginRequest, RefreshTokenRequest, UpdateProfileRequest};
pub use responses::{LoginResponse, RefreshTokenResponse, TokenVerificationResponse, UserInfoResponse};
