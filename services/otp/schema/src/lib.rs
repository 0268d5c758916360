pub mod api_keys;
pub mod otp_codes;
