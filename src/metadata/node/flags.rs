//! Member selection for type enumeration.

use bitflags::bitflags;

bitflags! {
    #[derive(PartialEq, Eq, Clone, Copy, Debug)]
    /// Selects which members of a type are enumerated.
    ///
    /// A member is selected when both its storage class (`STATIC` or `INSTANCE`) and its
    /// accessibility (`PUBLIC` or `NON_PUBLIC`) are part of the flags.
    pub struct BindingFlags: u32 {
        /// Include members defined on the type
        const STATIC = 0x0008;
        /// Include per-instance members
        const INSTANCE = 0x0004;
        /// Include public members
        const PUBLIC = 0x0010;
        /// Include private, family and assembly members
        const NON_PUBLIC = 0x0020;
    }
}

impl Default for BindingFlags {
    /// Every member: static and instance, public and non-public
    fn default() -> Self {
        Self::all()
    }
}

impl BindingFlags {
    /// Every declared member, used when building the children of a type node
    #[must_use]
    pub fn declared() -> Self {
        Self::all()
    }

    /// Public static and instance members
    #[must_use]
    pub fn public_members() -> Self {
        Self::PUBLIC | Self::STATIC | Self::INSTANCE
    }

    /// Public and non-public instance members
    #[must_use]
    pub fn instance_members() -> Self {
        Self::INSTANCE | Self::PUBLIC | Self::NON_PUBLIC
    }

    /// Public and non-public static members
    #[must_use]
    pub fn static_members() -> Self {
        Self::STATIC | Self::PUBLIC | Self::NON_PUBLIC
    }

    /// Returns true if a member with the given storage class and accessibility is selected
    #[must_use]
    pub fn selects(self, is_static: bool, is_public: bool) -> bool {
        let storage = if is_static { Self::STATIC } else { Self::INSTANCE };
        let access = if is_public { Self::PUBLIC } else { Self::NON_PUBLIC };
        self.contains(storage | access)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selects() {
        assert!(BindingFlags::default().selects(true, false));
        assert!(BindingFlags::public_members().selects(false, true));
        assert!(!BindingFlags::public_members().selects(false, false));
        assert!(!BindingFlags::instance_members().selects(true, true));
        assert!(BindingFlags::static_members().selects(true, false));
        assert!(!BindingFlags::PUBLIC.selects(false, true));
    }
}
