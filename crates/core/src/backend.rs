//! In-memory account state the VM executes against.

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use revm::{
    db::{CacheDB, EmptyDB},
    primitives::{AccountInfo, Bytecode, KECCAK_EMPTY},
};

/// Account state for an in-process VM.
///
/// A thin wrapper over revm's in-memory database with the seeding helpers
/// test setups need.
#[derive(Clone, Debug, Default)]
pub struct Backend {
    db: CacheDB<EmptyDB>,
}

impl Backend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the balance of `address`, creating the account if needed.
    pub fn set_balance(&mut self, address: Address, balance: U256) {
        let mut info = self.account_info(address);
        info.balance = balance;
        self.db.insert_account_info(address, info);
    }

    /// Installs runtime code at `address`, creating the account if needed.
    pub fn insert_code(&mut self, address: Address, code: impl Into<Bytes>) {
        let code: Bytes = code.into();
        let mut info = self.account_info(address);
        info.code_hash = keccak256(&code);
        info.code = Some(Bytecode::new_raw(code));
        self.db.insert_account_info(address, info);
    }

    /// Whether `address` currently has runtime code.
    pub fn has_code(&self, address: Address) -> bool {
        self.db.accounts.get(&address).map_or(false, |account| {
            account.info.code_hash != KECCAK_EMPTY && account.info.code_hash != B256::ZERO
        })
    }

    /// Direct access to the underlying database.
    pub fn db(&self) -> &CacheDB<EmptyDB> {
        &self.db
    }

    /// Mutable access to the underlying database.
    pub fn db_mut(&mut self) -> &mut CacheDB<EmptyDB> {
        &mut self.db
    }

    /// Lends the database out for a transaction, leaving an empty stand-in.
    pub(crate) fn take_db(&mut self) -> CacheDB<EmptyDB> {
        std::mem::take(&mut self.db)
    }

    /// Returns a database previously lent out with [`take_db`](Self::take_db).
    pub(crate) fn restore_db(&mut self, db: CacheDB<EmptyDB>) {
        self.db = db;
    }

    fn account_info(&self, address: Address) -> AccountInfo {
        self.db.accounts.get(&address).map(|account| account.info.clone()).unwrap_or_default()
    }
}
