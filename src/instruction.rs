use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    sysvar,
};

/// Instruction tags of the storefront programs, as encoded on the wire.
pub mod tag {
    pub const AUCTION_SET_AUTHORITY: u8 = 5;
    pub const VAULT_SET_AUTHORITY: u8 = 10;
    pub const METAPLEX_DECOMMISSION_AUCTION_MANAGER: u8 = 13;
}

/// Hand auction authority to `new_authority`.
/// Accounts expected:
/// 0. `[writable]` The auction
/// 1. `[signer]` The current authority
/// 2. `[]` The new authority
pub fn set_auction_authority(
    auction_program: &Pubkey,
    auction: &Pubkey,
    current_authority: &Pubkey,
    new_authority: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: *auction_program,
        accounts: vec![
            AccountMeta::new(*auction, false),
            AccountMeta::new_readonly(*current_authority, true),
            AccountMeta::new_readonly(*new_authority, false),
        ],
        data: vec![tag::AUCTION_SET_AUTHORITY],
    }
}

/// Hand vault authority to `new_authority`.
/// Accounts expected:
/// 0. `[writable]` The vault
/// 1. `[signer]` The current authority
/// 2. `[]` The new authority
pub fn set_vault_authority(
    vault_program: &Pubkey,
    vault: &Pubkey,
    current_authority: &Pubkey,
    new_authority: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: *vault_program,
        accounts: vec![
            AccountMeta::new(*vault, false),
            AccountMeta::new_readonly(*current_authority, true),
            AccountMeta::new_readonly(*new_authority, false),
        ],
        data: vec![tag::VAULT_SET_AUTHORITY],
    }
}

/// Move an initialized auction manager to disbursing so prizes can be returned.
/// Accounts expected:
/// 0. `[writable]` The auction manager
/// 1. `[writable]` The auction
/// 2. `[signer]` The auction manager authority
/// 3. `[]` The vault
/// 4. `[]` The store
/// 5. `[]` The auction program
/// 6. `[]` The clock sysvar
pub fn decommission_auction_manager(
    metaplex_program: &Pubkey,
    auction_manager: &Pubkey,
    auction: &Pubkey,
    authority: &Pubkey,
    vault: &Pubkey,
    store: &Pubkey,
    auction_program: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: *metaplex_program,
        accounts: vec![
            AccountMeta::new(*auction_manager, false),
            AccountMeta::new(*auction, false),
            AccountMeta::new_readonly(*authority, true),
            AccountMeta::new_readonly(*vault, false),
            AccountMeta::new_readonly(*store, false),
            AccountMeta::new_readonly(*auction_program, false),
            AccountMeta::new_readonly(sysvar::clock::id(), false),
        ],
        data: vec![tag::METAPLEX_DECOMMISSION_AUCTION_MANAGER],
    }
}
