//! Payment status vocabulary
//!
//! LiqPay reports the state of a payment as a lowercase string. Every literal the processor
//! documents is a variant here; anything else becomes [`PaymentStatus::Unknown`] and
//! classifies as nothing, so an unrecognized status is never mistaken for success.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    // Final
    Success,
    Failure,
    Error,
    Subscribed,
    Unsubscribed,
    Reversed,
    Sandbox,

    // Confirmation required
    OtpVerify,
    ThreeDsVerify,
    CvvVerify,
    SenderVerify,
    ReceiverVerify,
    PhoneVerify,
    IvrVerify,
    PinVerify,
    CaptchaVerify,
    PasswordVerify,
    SenderAppVerify,

    // Under review
    Processing,
    Prepared,
    WaitBitcoin,
    WaitSecure,
    WaitAccept,
    WaitLc,
    HoldWait,
    CashWait,
    WaitQr,
    WaitSender,
    WaitCard,
    WaitCompensation,
    InvoiceWait,
    WaitReserve,

    Unknown(String),
}

/// Coarse outcome of a status, before authenticity is taken into account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFlags {
    pub successful: bool,
    pub redirect_required: bool,
    pub cancelled: bool,
    pub pending: bool,
    pub under_review: bool,
}

impl PaymentStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "success" => Self::Success,
            "failure" => Self::Failure,
            "error" => Self::Error,
            "subscribed" => Self::Subscribed,
            "unsubscribed" => Self::Unsubscribed,
            "reversed" => Self::Reversed,
            "sandbox" => Self::Sandbox,
            "otp_verify" => Self::OtpVerify,
            "3ds_verify" => Self::ThreeDsVerify,
            "cvv_verify" => Self::CvvVerify,
            "sender_verify" => Self::SenderVerify,
            "receiver_verify" => Self::ReceiverVerify,
            "phone_verify" => Self::PhoneVerify,
            "ivr_verify" => Self::IvrVerify,
            "pin_verify" => Self::PinVerify,
            "captcha_verify" => Self::CaptchaVerify,
            "password_verify" => Self::PasswordVerify,
            "senderapp_verify" => Self::SenderAppVerify,
            "processing" => Self::Processing,
            "prepared" => Self::Prepared,
            "wait_bitcoin" => Self::WaitBitcoin,
            "wait_secure" => Self::WaitSecure,
            "wait_accept" => Self::WaitAccept,
            "wait_lc" => Self::WaitLc,
            "hold_wait" => Self::HoldWait,
            "cash_wait" => Self::CashWait,
            "wait_qr" => Self::WaitQr,
            "wait_sender" => Self::WaitSender,
            "wait_card" => Self::WaitCard,
            "wait_compensation" => Self::WaitCompensation,
            "invoice_wait" => Self::InvoiceWait,
            "wait_reserve" => Self::WaitReserve,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Error => "error",
            Self::Subscribed => "subscribed",
            Self::Unsubscribed => "unsubscribed",
            Self::Reversed => "reversed",
            Self::Sandbox => "sandbox",
            Self::OtpVerify => "otp_verify",
            Self::ThreeDsVerify => "3ds_verify",
            Self::CvvVerify => "cvv_verify",
            Self::SenderVerify => "sender_verify",
            Self::ReceiverVerify => "receiver_verify",
            Self::PhoneVerify => "phone_verify",
            Self::IvrVerify => "ivr_verify",
            Self::PinVerify => "pin_verify",
            Self::CaptchaVerify => "captcha_verify",
            Self::PasswordVerify => "password_verify",
            Self::SenderAppVerify => "senderapp_verify",
            Self::Processing => "processing",
            Self::Prepared => "prepared",
            Self::WaitBitcoin => "wait_bitcoin",
            Self::WaitSecure => "wait_secure",
            Self::WaitAccept => "wait_accept",
            Self::WaitLc => "wait_lc",
            Self::HoldWait => "hold_wait",
            Self::CashWait => "cash_wait",
            Self::WaitQr => "wait_qr",
            Self::WaitSender => "wait_sender",
            Self::WaitCard => "wait_card",
            Self::WaitCompensation => "wait_compensation",
            Self::InvoiceWait => "invoice_wait",
            Self::WaitReserve => "wait_reserve",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Failure | Self::Error | Self::Reversed)
    }

    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            Self::OtpVerify
                | Self::ThreeDsVerify
                | Self::CvvVerify
                | Self::SenderVerify
                | Self::ReceiverVerify
                | Self::PhoneVerify
                | Self::IvrVerify
                | Self::PinVerify
                | Self::CaptchaVerify
                | Self::PasswordVerify
                | Self::SenderAppVerify
        )
    }

    pub fn is_under_review(&self) -> bool {
        matches!(
            self,
            Self::Processing
                | Self::Prepared
                | Self::WaitBitcoin
                | Self::WaitSecure
                | Self::WaitAccept
                | Self::WaitLc
                | Self::HoldWait
                | Self::CashWait
                | Self::WaitQr
                | Self::WaitSender
                | Self::WaitCard
                | Self::WaitCompensation
                | Self::InvoiceWait
                | Self::WaitReserve
        )
    }

    /// Only a 3-D Secure challenge sends the payer elsewhere.
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::ThreeDsVerify)
    }

    /// Final success is mode-specific: `sandbox` in test mode, `success` otherwise.
    pub fn is_successful(&self, test_mode: bool) -> bool {
        if test_mode {
            matches!(self, Self::Sandbox)
        } else {
            matches!(self, Self::Success)
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    pub fn flags(&self, test_mode: bool) -> StatusFlags {
        StatusFlags {
            successful: self.is_successful(test_mode),
            redirect_required: self.is_redirect(),
            cancelled: self.is_cancelled(),
            pending: self.is_pending(),
            under_review: self.is_under_review(),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn classify(status: &str, test_mode: bool) -> StatusFlags {
    PaymentStatus::parse(status).flags(test_mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PENDING: [&str; 11] = [
        "otp_verify",
        "3ds_verify",
        "cvv_verify",
        "sender_verify",
        "receiver_verify",
        "phone_verify",
        "ivr_verify",
        "pin_verify",
        "captcha_verify",
        "password_verify",
        "senderapp_verify",
    ];

    const UNDER_REVIEW: [&str; 14] = [
        "processing",
        "prepared",
        "wait_bitcoin",
        "wait_secure",
        "wait_accept",
        "wait_lc",
        "hold_wait",
        "cash_wait",
        "wait_qr",
        "wait_sender",
        "wait_card",
        "wait_compensation",
        "invoice_wait",
        "wait_reserve",
    ];

    #[test]
    fn test_success_depends_on_mode() {
        assert!(classify("success", false).successful);
        assert!(!classify("success", true).successful);
        assert!(classify("sandbox", true).successful);
        assert!(!classify("sandbox", false).successful);
    }

    #[test]
    fn test_3ds_is_pending_and_redirect() {
        for test_mode in [false, true] {
            let flags = classify("3ds_verify", test_mode);
            assert!(flags.redirect_required);
            assert!(flags.pending);
            assert!(!flags.successful);
        }
    }

    #[test]
    fn test_negative_finals_only_cancel() {
        for status in ["failure", "error", "reversed"] {
            for test_mode in [false, true] {
                assert_eq!(
                    classify(status, test_mode),
                    StatusFlags {
                        cancelled: true,
                        ..StatusFlags::default()
                    },
                    "status {}",
                    status
                );
            }
        }
    }

    #[test]
    fn test_pending_group() {
        for status in PENDING {
            let flags = classify(status, false);
            assert!(flags.pending, "{} should be pending", status);
            assert!(!flags.under_review && !flags.cancelled && !flags.successful);
            assert_eq!(flags.redirect_required, status == "3ds_verify");
        }
    }

    #[test]
    fn test_under_review_group() {
        for status in UNDER_REVIEW {
            assert_eq!(
                classify(status, false),
                StatusFlags {
                    under_review: true,
                    ..StatusFlags::default()
                },
                "status {}",
                status
            );
        }
    }

    #[test]
    fn test_unknown_and_subscription_statuses_set_nothing() {
        for status in ["", "SUCCESS", "refunded", "subscribed", "unsubscribed"] {
            assert_eq!(classify(status, false), StatusFlags::default());
            assert_eq!(classify(status, true), StatusFlags::default());
        }
        assert!(!PaymentStatus::parse("Success").is_known());
        assert!(PaymentStatus::parse("subscribed").is_known());
    }

    #[test]
    fn test_literals_round_trip() {
        for status in PENDING.iter().chain(UNDER_REVIEW.iter()) {
            assert_eq!(PaymentStatus::parse(status).as_str(), *status);
        }
        assert_eq!(PaymentStatus::parse("wait_x").to_string(), "wait_x");
    }
}
