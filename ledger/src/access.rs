//! Capability check for privileged ledger operations.

use crate::error::LedgerError;
use rbpool_types::Address;
use serde::{Deserialize, Serialize};

/// Trusts exactly one controller identity, registered once by the admin.
///
/// Every privileged call compares the caller to the registered controller by
/// equality. Before registration no caller passes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGuard {
    admin: Address,
    controller: Option<Address>,
}

impl AccessGuard {
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            controller: None,
        }
    }

    pub fn admin(&self) -> &Address {
        &self.admin
    }

    pub fn controller(&self) -> Option<&Address> {
        self.controller.as_ref()
    }

    /// Register the controller. Admin only, exactly once.
    pub fn register(&mut self, caller: &Address, controller: Address) -> Result<(), LedgerError> {
        if *caller != self.admin {
            return Err(LedgerError::Unauthorized { caller: *caller });
        }
        if self.controller.is_some() {
            return Err(LedgerError::ControllerAlreadySet);
        }
        self.controller = Some(controller);
        Ok(())
    }

    pub fn ensure_controller(&self, caller: &Address) -> Result<(), LedgerError> {
        match self.controller {
            Some(ref c) if c == caller => Ok(()),
            _ => Err(LedgerError::Unauthorized { caller: *caller }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::new([n; 32])
    }

    #[test]
    fn unregistered_guard_rejects_everyone() {
        let guard = AccessGuard::new(addr(1));
        assert!(guard.ensure_controller(&addr(1)).is_err());
        assert!(guard.ensure_controller(&addr(2)).is_err());
    }

    #[test]
    fn registered_controller_passes() {
        let mut guard = AccessGuard::new(addr(1));
        guard.register(&addr(1), addr(2)).unwrap();
        assert!(guard.ensure_controller(&addr(2)).is_ok());
        assert_eq!(
            guard.ensure_controller(&addr(1)),
            Err(LedgerError::Unauthorized { caller: addr(1) })
        );
    }

    #[test]
    fn only_admin_registers() {
        let mut guard = AccessGuard::new(addr(1));
        assert_eq!(
            guard.register(&addr(9), addr(2)),
            Err(LedgerError::Unauthorized { caller: addr(9) })
        );
        assert!(guard.controller().is_none());
    }

    #[test]
    fn registration_is_one_shot() {
        let mut guard = AccessGuard::new(addr(1));
        guard.register(&addr(1), addr(2)).unwrap();
        assert_eq!(
            guard.register(&addr(1), addr(3)),
            Err(LedgerError::ControllerAlreadySet)
        );
        assert_eq!(guard.controller(), Some(&addr(2)));
    }
}
