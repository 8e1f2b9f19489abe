use anchor_lang::prelude::*;

use crate::constants::{MAX_METADATA_ENTRIES, MAX_METADATA_VALUE_LEN, MAX_SCHEMA_LEN};
use crate::error::VoucherError;

/// One key/value pair attached to a position.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct MetadataEntry {
    pub key: [u8; 32],
    pub value: Vec<u8>,
}

impl MetadataEntry {
    pub const SIZE: usize = 32 + 4 + MAX_METADATA_VALUE_LEN;
}

/// Registry record for one receipt token of a collection.
/// Seeds: [b"metadata", config.key(), token_id.to_le_bytes()]
#[account]
pub struct MetadataRecord {
    /// Collection the token belongs to (the program config).
    pub collection: Pubkey,
    /// Position id of the receipt token.
    pub token_id: u64,
    pub entries: Vec<MetadataEntry>,
    pub bump: u8,
}

impl MetadataRecord {
    pub const SIZE: usize = 8 + // discriminator
        32 + // collection
        8 +  // token_id
        4 + MAX_METADATA_ENTRIES * MetadataEntry::SIZE + // entries
        1;   // bump

    /// Value stored under `key`, empty when unset.
    pub fn read(&self, key: &[u8; 32]) -> Vec<u8> {
        self.entries
            .iter()
            .find(|e| e.key == *key)
            .map(|e| e.value.clone())
            .unwrap_or_default()
    }

    /// Inserts or replaces the value under `key`.
    pub fn write(&mut self, requester: &Pubkey, key: [u8; 32], value: Vec<u8>) -> Result<()> {
        require!(*requester != Pubkey::default(), VoucherError::RequesterNotLive);
        require!(
            value.len() <= MAX_METADATA_VALUE_LEN,
            VoucherError::MetadataValueTooLarge
        );

        if let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) {
            entry.value = value;
            return Ok(());
        }
        require!(
            self.entries.len() < MAX_METADATA_ENTRIES,
            VoucherError::MetadataRecordFull
        );
        self.entries.push(MetadataEntry { key, value });
        Ok(())
    }

    /// `write` restricted to the current token owner; `holder` is the
    /// default key when nobody provably holds the token.
    pub fn safe_write(
        &mut self,
        requester: &Pubkey,
        holder: &Pubkey,
        key: [u8; 32],
        value: Vec<u8>,
    ) -> Result<()> {
        if *requester == Pubkey::default() || requester != holder {
            msg!(
                "account {} does not own token {} of {}",
                requester,
                self.token_id,
                self.collection
            );
            return err!(VoucherError::RequesterNotOwner);
        }
        self.write(requester, key, value)
    }
}

/// Human-readable schema describing how values under `key` are encoded.
/// Seeds: [b"schema", config.key(), key]
#[account]
pub struct SchemaEntry {
    pub key: [u8; 32],
    pub schema: String,
    pub bump: u8,
}

impl SchemaEntry {
    pub const SIZE: usize = 8 + // discriminator
        32 + // key
        4 + MAX_SCHEMA_LEN + // schema
        1;   // bump

    pub fn set(&mut self, key: [u8; 32], schema: String) -> Result<()> {
        require!(schema.len() <= MAX_SCHEMA_LEN, VoucherError::SchemaTooLong);
        self.key = key;
        self.schema = schema;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::capability::content_id;
    use anchor_lang::error::Error;

    fn record() -> MetadataRecord {
        MetadataRecord {
            collection: Pubkey::new_unique(),
            token_id: 1,
            entries: Vec::new(),
            bump: 255,
        }
    }

    #[test]
    fn write_then_read() {
        let mut r = record();
        let requester = Pubkey::new_unique();
        let key = content_id("foobar");
        assert!(r.read(&key).is_empty());

        r.write(&requester, key, vec![1, 2, 3]).unwrap();
        assert_eq!(r.read(&key), vec![1, 2, 3]);

        r.write(&requester, key, vec![9]).unwrap();
        assert_eq!(r.read(&key), vec![9]);
        assert_eq!(r.entries.len(), 1);
    }

    #[test]
    fn zero_requester_rejected() {
        let mut r = record();
        assert_eq!(
            r.write(&Pubkey::default(), content_id("foobar"), vec![1])
                .unwrap_err(),
            Error::from(VoucherError::RequesterNotLive)
        );
        assert!(r.entries.is_empty());
    }

    #[test]
    fn safe_write_requires_holder() {
        let mut r = record();
        let owner = Pubkey::new_unique();
        let key = content_id("foobar");

        assert_eq!(
            r.safe_write(&Pubkey::default(), &owner, key, vec![1])
                .unwrap_err(),
            Error::from(VoucherError::RequesterNotOwner)
        );
        // Nobody holds the token: a zero requester still is not its owner.
        assert_eq!(
            r.safe_write(&Pubkey::default(), &Pubkey::default(), key, vec![1])
                .unwrap_err(),
            Error::from(VoucherError::RequesterNotOwner)
        );
        assert_eq!(
            r.safe_write(&Pubkey::new_unique(), &owner, key, vec![1])
                .unwrap_err(),
            Error::from(VoucherError::RequesterNotOwner)
        );
        assert!(r.entries.is_empty());

        r.safe_write(&owner, &owner, key, vec![7, 7]).unwrap();
        assert_eq!(r.read(&key), vec![7, 7]);
    }

    #[test]
    fn bounded_record() {
        let mut r = record();
        let requester = Pubkey::new_unique();
        assert_eq!(
            r.write(&requester, content_id("big"), vec![0; MAX_METADATA_VALUE_LEN + 1])
                .unwrap_err(),
            Error::from(VoucherError::MetadataValueTooLarge)
        );
        for i in 0..MAX_METADATA_ENTRIES {
            r.write(&requester, content_id(&format!("k{}", i)), vec![0; 4])
                .unwrap();
        }
        assert_eq!(
            r.write(&requester, content_id("one more"), vec![0])
                .unwrap_err(),
            Error::from(VoucherError::MetadataRecordFull)
        );
    }

    #[test]
    fn schema_replace_and_bound() {
        let mut s = SchemaEntry {
            key: [0; 32],
            schema: String::new(),
            bump: 255,
        };
        let key = content_id("foobar");
        s.set(key, "transfer(address,uint256)".to_string()).unwrap();
        assert_eq!(s.schema, "transfer(address,uint256)");
        s.set(key, "(u64,u64)".to_string()).unwrap();
        assert_eq!(s.schema, "(u64,u64)");
        assert_eq!(
            s.set(key, "x".repeat(MAX_SCHEMA_LEN + 1)).unwrap_err(),
            Error::from(VoucherError::SchemaTooLong)
        );
    }
}
