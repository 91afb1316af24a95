//! Address to handle resolution.
//!
//! Handles are cosmetic: every entry point here recovers from lookup
//! failures locally and reports "absent" instead of an error.

use log::{debug, warn};
use solana_program::pubkey::Pubkey;

use crate::{error::LensResult, name_service::NameLookup, validation::shorten_address};

pub struct HandleResolver<L: NameLookup> {
    lookup: L,
}

impl<L: NameLookup> HandleResolver<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub async fn twitter_handle(&self, address: &Pubkey) -> Option<String> {
        match self.lookup.handle_and_registry_key(address).await {
            Ok(Some((handle, _registry_key))) if !handle.is_empty() => Some(handle),
            Ok(_) => None,
            Err(err) => {
                debug!(
                    "event=twitter_lookup module=resolver status=absent address={} error={}",
                    address, err
                );
                None
            }
        }
    }

    pub async fn find_owned_accounts(&self, address: &Pubkey) -> LensResult<Vec<Pubkey>> {
        self.lookup.owned_name_accounts(address).await
    }

    /// First candidate, in scan order, whose reverse lookup is non-empty.
    ///
    /// Candidates are tried one at a time; lookup `i + 1` starts only after
    /// lookup `i` has completed.
    pub async fn domain_handle(&self, address: &Pubkey) -> Option<String> {
        let candidates = match self.find_owned_accounts(address).await {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(
                    "event=name_scan module=resolver status=failed address={} error={}",
                    address, err
                );
                return None;
            }
        };

        for candidate in candidates {
            match self.lookup.reverse_lookup(&candidate).await {
                Ok(Some(domain)) if !domain.is_empty() => return Some(domain),
                Ok(_) => continue,
                Err(err) => {
                    debug!(
                        "event=reverse_lookup module=resolver status=skipped candidate={} error={}",
                        candidate, err
                    );
                    continue;
                }
            }
        }
        None
    }

    /// `@handle`, else the domain, else the shortened address.
    pub async fn display_name(&self, address: &Pubkey) -> String {
        if let Some(handle) = self.twitter_handle(address).await {
            return format!("@{handle}");
        }
        if let Some(domain) = self.domain_handle(address).await {
            return domain;
        }
        shorten_address(address)
    }
}
