// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Twilio WhatsApp outbound channel for the Dukaan shop assistant.

pub mod channel;

pub use channel::TwilioWhatsAppChannel;
