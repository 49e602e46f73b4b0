pub(crate) mod deployer;
pub(crate) mod inventory;
