//! Phone number utilities
//!
//! Phone numbers are opaque identifiers to the verification flow; these helpers
//! only exist to keep them out of logs in clear text.

/// Mask a phone number for display, keeping the last four characters (e.g. `+86*******1111`)
pub fn mask_phone_number(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }

    let visible_prefix = if chars[0] == '+' && chars.len() > 7 { 3 } else { 0 };
    let hidden = chars.len() - visible_prefix - 4;

    let mut masked = String::with_capacity(chars.len());
    masked.extend(&chars[..visible_prefix]);
    masked.extend(std::iter::repeat('*').take(hidden));
    masked.extend(&chars[chars.len() - 4..]);
    masked
}
