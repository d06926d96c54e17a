//! Hosted onboarding links.
//!
//! The gateway's partner onboarding takes the platform's merchant reference
//! and a one-off token; the host completes KYC there and the gateway later
//! calls the onboarding webhook with the linked account id.

use rand::RngCore;
use url::Url;

use crate::domain::ports::{OnboardingRequest, PaymentGatewayError};

pub const DEFAULT_ONBOARDING_URL: &str = "https://razorpay.com/onboard";

const TOKEN_BYTES: usize = 8;

/// Random lowercase hex of `bytes` bytes.
pub(super) fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0_u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

pub(super) fn onboarding_url(
    base: &Url,
    request: &OnboardingRequest,
) -> Result<String, PaymentGatewayError> {
    if base.cannot_be_a_base() {
        return Err(PaymentGatewayError::transport(format!(
            "onboarding base {base} is not a hierarchical URL"
        )));
    }
    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair("merchant", &request.user.to_string())
        .append_pair("token", &random_hex(TOKEN_BYTES));
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PhoneNumber, UserId};

    #[test]
    fn links_carry_merchant_and_token() {
        let user = UserId::random();
        let request = OnboardingRequest {
            user,
            business_name: "Sea Breeze Stays".into(),
            phone: PhoneNumber::new("+919812345678").expect("phone"),
        };
        let base = Url::parse(DEFAULT_ONBOARDING_URL).expect("url");
        let link = Url::parse(&onboarding_url(&base, &request).expect("link")).expect("parse");

        let pairs: Vec<(String, String)> = link.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("merchant".into(), user.to_string()));
        assert_eq!(pairs[1].0, "token");
        assert_eq!(pairs[1].1.len(), TOKEN_BYTES * 2);
    }

    #[test]
    fn random_hex_has_requested_width() {
        let value = random_hex(8);
        assert_eq!(value.len(), 16);
        assert!(value.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
