pub mod api_key;
pub mod otp;
