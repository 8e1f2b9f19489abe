pub mod initialize;
pub mod grant_capability;
pub mod revoke_capability;
pub mod create_position;
pub mod redeem;
pub mod quote_redeemable;
pub mod write_metadata;
pub mod read_metadata;
pub mod set_schema;
pub mod get_schema;

pub use initialize::*;
pub use grant_capability::*;
pub use revoke_capability::*;
pub use create_position::*;
pub use redeem::*;
pub use quote_redeemable::*;
pub use write_metadata::*;
pub use read_metadata::*;
pub use set_schema::*;
pub use get_schema::*;
