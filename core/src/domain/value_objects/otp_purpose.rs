//! Screens that run an OTP challenge.

use serde::{Deserialize, Serialize};

/// Why a code was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    /// Existing user signing in
    Login,
    /// New account sign-up
    Registration,
    /// Logged-in user moving to a new phone number
    PhoneChange,
}

impl OtpPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Registration => "registration",
            Self::PhoneChange => "phone_change",
        }
    }
}

impl std::fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OtpPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "login" => Ok(Self::Login),
            "registration" | "register" | "signup" | "sign_up" => Ok(Self::Registration),
            "phone_change" | "change_number" => Ok(Self::PhoneChange),
            _ => Err(format!("Invalid OTP purpose: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("signup".parse::<OtpPurpose>().unwrap(), OtpPurpose::Registration);
        assert_eq!("change_number".parse::<OtpPurpose>().unwrap(), OtpPurpose::PhoneChange);
        assert_eq!("LOGIN".parse::<OtpPurpose>().unwrap(), OtpPurpose::Login);
        assert!("reset".parse::<OtpPurpose>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for purpose in [OtpPurpose::Login, OtpPurpose::Registration, OtpPurpose::PhoneChange] {
            assert_eq!(purpose.to_string().parse::<OtpPurpose>().unwrap(), purpose);
        }
    }
}
