use std::str::FromStr;

use solana_program::pubkey::Pubkey;

use crate::error::LensError;

/// Characters kept on each side of a shortened address.
pub const SHORTENED_ADDRESS_CHARS: usize = 4;

pub fn parse_address(address: &str) -> Result<Pubkey, LensError> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(LensError::InvalidAddress(address.to_string()));
    }
    let pubkey =
        Pubkey::from_str(trimmed).map_err(|_| LensError::InvalidAddress(address.to_string()))?;
    validate_address(&pubkey)?;
    Ok(pubkey)
}

pub fn validate_address(address: &Pubkey) -> Result<(), LensError> {
    if address == &Pubkey::default() {
        return Err(LensError::InvalidAddress(address.to_string()));
    }
    Ok(())
}

/// Renders `abcd...wxyz` for display when no handle resolves.
pub fn shorten_address(address: &Pubkey) -> String {
    let text = address.to_string();
    if text.len() <= SHORTENED_ADDRESS_CHARS * 2 {
        return text;
    }
    format!(
        "{}...{}",
        &text[..SHORTENED_ADDRESS_CHARS],
        &text[text.len() - SHORTENED_ADDRESS_CHARS..]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_garbage_and_default() {
        assert!(parse_address("").is_err());
        assert!(parse_address("not-a-key").is_err());
        assert!(parse_address(&Pubkey::default().to_string()).is_err());
    }

    #[test]
    fn parse_accepts_padded_base58() {
        let key = Pubkey::new_unique();
        let parsed = parse_address(&format!("  {}  ", key)).unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn shorten_keeps_both_ends() {
        let key = Pubkey::new_unique();
        let text = key.to_string();
        let short = shorten_address(&key);
        assert!(short.starts_with(&text[..4]));
        assert!(short.ends_with(&text[text.len() - 4..]));
        assert_eq!(short.len(), 11);
    }
}
