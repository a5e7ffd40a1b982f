//! Tenant ownership checks.
//!
//! Every read or write of a vendor-owned resource goes through the single
//! predicate here rather than re-deriving the comparison per handler.

use uuid::Uuid;

/// Resource carrying a back-reference to its owning vendor.
pub trait VendorOwned {
    fn owner_id(&self) -> Uuid;
}

/// The authorization predicate: does `actor` own `resource`?
pub fn owned_by<T: VendorOwned>(actor: Uuid, resource: &T) -> bool {
    resource.owner_id() == actor
}

impl VendorOwned for models::customer::Model {
    fn owner_id(&self) -> Uuid {
        self.vendor_id
    }
}

impl VendorOwned for models::loyalty_card::Model {
    fn owner_id(&self) -> Uuid {
        self.vendor_id
    }
}

impl VendorOwned for crate::loyalty::domain::Card {
    fn owner_id(&self) -> Uuid {
        self.vendor_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Owned(Uuid);
    impl VendorOwned for Owned {
        fn owner_id(&self) -> Uuid {
            self.0
        }
    }

    #[test]
    fn predicate_matches_owner_only() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let r = Owned(owner);
        assert!(owned_by(owner, &r));
        assert!(!owned_by(other, &r));
    }
}
