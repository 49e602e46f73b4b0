pub mod account;
pub mod api;
pub mod automation;
pub mod deploy;
pub mod gpu;
pub mod hostnode;
pub mod location;
pub mod preset;
pub mod spec;
pub mod virtual_machine;

pub use hostnode::HostnodeEntry;
pub use hostnode::Inventory;
pub use location::LocationInfo;
pub use spec::DeploySpec;
