//! Customer contact validation.

/// Strip everything but digits from a phone number.
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// Validate a phone number: 10 or 11 digits after normalization (area code
/// plus landline or mobile number).
pub fn validate_phone(phone: &str) -> Result<String, String> {
    let digits = normalize_phone(phone);
    if !(10..=11).contains(&digits.len()) {
        return Err("Phone must have 10 or 11 digits including area code".to_string());
    }
    Ok(digits)
}

/// Loose email shape check; deliverability is not verified.
pub fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.') =>
        {
            Ok(())
        }
        _ => Err(format!("Invalid email address '{email}'")),
    }
}
